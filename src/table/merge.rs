//! Cross-page table merging.
//!
//! A table that runs over a page break comes out of page assembly as two
//! table blocks: the last block of page N-1 and the first block of page N.
//! When the two look like halves of one table they are stitched back
//! together: column counts are reconciled, the later table's data rows are
//! appended to the earlier one, and its footnotes move along with them.

use super::html::{NodeId, TableHtml};
use crate::detect::full_to_half;
use crate::model::{Block, BlockType, PageInfo};
use crate::render::{merge_para_with_text, RenderOptions};

/// Caption suffixes that mark a continued table.
const CONTINUATION_MARKERS: [&str; 6] = [
    "(续)",
    "(续表)",
    "(续上表)",
    "(continued)",
    "(cont.)",
    "(cont’d)",
];

/// Maximum number of repeated header rows looked for.
const MAX_HEADER_ROWS: usize = 5;

/// Relative width difference above which two tables are not merged.
const WIDTH_TOLERANCE: f64 = 0.1;

/// Merge tables split across page boundaries, in place.
///
/// Pages are scanned from last to first so a table spanning three or more
/// pages collapses into the first page's block.
pub fn merge_tables(pages: &mut [PageInfo]) {
    for page_idx in (1..pages.len()).rev() {
        let (before, after) = pages.split_at_mut(page_idx);
        let Some(previous) = before[page_idx - 1].para_blocks.last_mut() else {
            continue;
        };
        let Some(current) = after[0].para_blocks.first_mut() else {
            continue;
        };
        if current.block_type != BlockType::Table || previous.block_type != BlockType::Table {
            continue;
        }

        let Some((mut soup1, mut soup2)) = can_merge_tables(current, previous) else {
            log::debug!(
                "table merge rejected between pages {} and {}",
                page_idx - 1,
                page_idx
            );
            continue;
        };

        let merged = perform_table_merge(&mut soup1, &mut soup2);

        let footnotes: Vec<Block> = current
            .children_of(BlockType::TableFootnote)
            .cloned()
            .map(|mut footnote| {
                footnote.cross_page = true;
                footnote
            })
            .collect();
        previous.blocks.extend(footnotes);

        if let Some(span) = previous
            .blocks
            .iter_mut()
            .filter(|b| b.block_type == BlockType::TableBody)
            .find_map(|b| b.first_span_mut())
        {
            span.html = Some(merged);
        }

        for block in current.blocks.iter_mut() {
            block.lines.clear();
            block.lines_deleted = true;
        }

        log::debug!(
            "merged table on page {} into page {}",
            page_idx,
            page_idx - 1
        );
    }
}

fn table_body_html(block: &Block) -> &str {
    block
        .children_of(BlockType::TableBody)
        .filter_map(|b| b.first_span())
        .last()
        .and_then(|span| span.html.as_deref())
        .unwrap_or("")
}

fn caption_marks_continuation(caption: &Block) -> bool {
    let text = full_to_half(merge_para_with_text(caption, &RenderOptions::default()).trim())
        .to_lowercase();
    CONTINUATION_MARKERS
        .iter()
        .any(|marker| text.ends_with(&marker.to_lowercase()))
}

/// Decide whether `current` continues `previous`; on success return the
/// parsed earlier and later tables.
fn can_merge_tables(current: &Block, previous: &Block) -> Option<(TableHtml, TableHtml)> {
    if current.has_child(BlockType::TableCaption)
        && !current
            .children_of(BlockType::TableCaption)
            .any(caption_marks_continuation)
    {
        return None;
    }

    if previous.has_child(BlockType::TableFootnote) {
        return None;
    }

    let current_html = table_body_html(current);
    let previous_html = table_body_html(previous);
    if current_html.is_empty() || previous_html.is_empty() {
        return None;
    }

    let current_width = current.bbox.width();
    let previous_width = previous.bbox.width();
    let min_width = current_width.min(previous_width);
    if !min_width.is_finite() || min_width <= 0.0 {
        return None;
    }
    if (current_width - previous_width).abs() / min_width >= WIDTH_TOLERANCE {
        return None;
    }

    let soup1 = TableHtml::parse(previous_html);
    let soup2 = TableHtml::parse(current_html);

    let tables_match = total_columns(&soup1) == total_columns(&soup2);
    if tables_match || rows_match(&soup1, &soup2) {
        Some((soup1, soup2))
    } else {
        None
    }
}

/// Column count of the widest row once rowspans and colspans are laid out.
///
/// A rowspan never reaches past the last row.
fn total_columns(table: &TableHtml) -> usize {
    let rows = table.rows();
    let mut occupied: Vec<Vec<bool>> = vec![Vec::new(); rows.len()];
    let mut max_cols = 0;

    for (row_idx, &row) in rows.iter().enumerate() {
        let mut col = 0;
        for cell in table.cells(row) {
            while occupied[row_idx].get(col).copied().unwrap_or(false) {
                col += 1;
            }

            let colspan = table.colspan(cell);
            let rowspan = table.rowspan(cell).min(rows.len() - row_idx);
            let end = col.saturating_add(colspan);
            for slots in &mut occupied[row_idx..row_idx + rowspan] {
                if slots.len() < end {
                    slots.resize(end, false);
                }
                slots[col..end].fill(true);
            }

            col = end;
            max_cols = max_cols.max(col);
        }
    }

    max_cols
}

fn row_columns(table: &TableHtml, row: NodeId) -> usize {
    table
        .cells(row)
        .iter()
        .fold(0, |sum, &c| sum.saturating_add(table.colspan(c)))
}

fn visual_columns(table: &TableHtml, row: NodeId) -> usize {
    table.cells(row).len()
}

fn row_colspans(table: &TableHtml, row: NodeId) -> Vec<usize> {
    table.cells(row).iter().map(|&c| table.colspan(c)).collect()
}

fn squash(text: &str) -> String {
    full_to_half(text).split_whitespace().collect()
}

/// Count the leading rows the later table repeats from the earlier one.
fn detect_table_headers(t1: &TableHtml, t2: &TableHtml) -> usize {
    let rows1 = t1.rows();
    let rows2 = t2.rows();
    let min_rows = rows1.len().min(rows2.len()).min(MAX_HEADER_ROWS);

    let mut header_rows = 0;
    for i in 0..min_rows {
        let cells1 = t1.cells(rows1[i]);
        let cells2 = t2.cells(rows2[i]);
        let same = cells1.len() == cells2.len()
            && cells1.iter().zip(&cells2).all(|(&c1, &c2)| {
                t1.colspan(c1) == t2.colspan(c2)
                    && t1.rowspan(c1) == t2.rowspan(c2)
                    && squash(&t1.text(c1)) == squash(&t2.text(c2))
            });
        if !same {
            break;
        }
        header_rows += 1;
    }
    header_rows
}

/// Compare the earlier table's last non-empty row with the later table's
/// first data row.
fn rows_match(t1: &TableHtml, t2: &TableHtml) -> bool {
    let rows1 = t1.rows();
    let rows2 = t2.rows();
    if rows1.is_empty() || rows2.is_empty() {
        return false;
    }

    let Some(&last_row) = rows1.iter().rev().find(|&&r| !t1.cells(r).is_empty()) else {
        return false;
    };
    let header_rows = detect_table_headers(t1, t2);
    let Some(&first_data_row) = rows2.get(header_rows) else {
        return false;
    };

    row_columns(t1, last_row) == row_columns(t2, first_data_row)
        || visual_columns(t1, last_row) == visual_columns(t2, first_data_row)
}

/// Widen short rows up to `target_cols`.
///
/// A row shaped exactly like the reference row takes the reference's
/// colspans; any other short row grows its last cell.
fn adjust_rows_colspan(
    table: &mut TableHtml,
    rows: &[NodeId],
    reference: &[usize],
    target_cols: usize,
    current_cols: usize,
) {
    for &row in rows {
        let cells = table.cells(row);
        let Some(&last_cell) = cells.last() else {
            continue;
        };
        if row_columns(table, row) >= target_cols {
            continue;
        }

        if row_colspans(table, row) == reference {
            for (&cell, &span) in cells.iter().zip(reference) {
                if span > 1 {
                    table.set_attr(cell, "colspan", span.to_string());
                }
            }
        } else {
            let span = table
                .colspan(last_cell)
                .saturating_add(target_cols.saturating_sub(current_cols));
            table.set_attr(last_cell, "colspan", span.to_string());
        }
    }
}

/// Append the later table's data rows to the earlier one and return the
/// merged HTML.
fn perform_table_merge(soup1: &mut TableHtml, soup2: &mut TableHtml) -> String {
    let header_rows = detect_table_headers(soup1, soup2);
    let rows1 = soup1.rows();
    let rows2 = soup2.rows();

    if !rows1.is_empty() && header_rows < rows2.len() {
        let cols1 = total_columns(soup1);
        let cols2 = total_columns(soup2);

        if cols1 >= cols2 {
            let reference = rows1
                .last()
                .map(|&row| row_colspans(soup1, row))
                .unwrap_or_default();
            adjust_rows_colspan(soup2, &rows2[header_rows..], &reference, cols1, cols2);
        } else {
            let reference = row_colspans(soup2, rows2[header_rows]);
            adjust_rows_colspan(soup1, &rows1, &reference, cols2, cols1);
        }
    }

    let target = soup1
        .first_element("tbody")
        .or_else(|| soup1.first_element("table"));
    let source_has_table =
        soup2.first_element("tbody").is_some() || soup2.first_element("table").is_some();

    if let Some(target) = target {
        if source_has_table {
            for &row in rows2.iter().skip(header_rows) {
                soup1.append_copy(target, soup2, row);
            }
        }
    }

    soup1.serialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::html::MAX_SPAN;

    #[test]
    fn test_total_columns_with_spans() {
        let t = TableHtml::parse(
            r#"<table><tr><td rowspan="2">a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>"#,
        );
        assert_eq!(total_columns(&t), 3);

        let t = TableHtml::parse(r#"<table><tr><td colspan="4">x</td></tr></table>"#);
        assert_eq!(total_columns(&t), 4);

        assert_eq!(total_columns(&TableHtml::parse("<p>no table</p>")), 0);
    }

    #[test]
    fn test_total_columns_clamps_huge_spans() {
        let t = TableHtml::parse(
            r#"<table><tr><td colspan="18446744073709551615">x</td><td>y</td></tr></table>"#,
        );
        assert_eq!(total_columns(&t), MAX_SPAN + 1);

        let t = TableHtml::parse(
            r#"<table><tr><td rowspan="18446744073709551615">a</td><td>b</td></tr><tr><td>c</td></tr></table>"#,
        );
        assert_eq!(total_columns(&t), 2);
    }

    #[test]
    fn test_merge_with_huge_spans_completes() {
        let mut t1 = TableHtml::parse(
            r#"<table><tr><td rowspan="99999999999">a</td><td>b</td><td>c</td></tr></table>"#,
        );
        let mut t2 = TableHtml::parse(
            r#"<table><tr><td colspan="99999999999999999999">d</td></tr></table>"#,
        );
        let html = perform_table_merge(&mut t1, &mut t2);
        assert!(html.contains(r#"<td rowspan="99999999999">a</td>"#));
        assert!(html.contains(">d</td>"));
    }

    #[test]
    fn test_detect_table_headers() {
        let t1 = TableHtml::parse(
            "<table><tr><th>Name</th><th>Qty</th></tr><tr><td>a</td><td>1</td></tr></table>",
        );
        let t2 = TableHtml::parse(
            "<table><tr><th>Ｎａｍｅ</th><th>Q ty</th></tr><tr><td>b</td><td>2</td></tr></table>",
        );
        assert_eq!(detect_table_headers(&t1, &t2), 1);

        let t3 = TableHtml::parse("<table><tr><td>b</td><td>2</td></tr></table>");
        assert_eq!(detect_table_headers(&t1, &t3), 0);
    }

    #[test]
    fn test_rows_match_by_visual_count() {
        let t1 = TableHtml::parse(
            r#"<table><tr><td colspan="2">a</td><td>b</td></tr></table>"#,
        );
        let t2 = TableHtml::parse("<table><tr><td>c</td><td>d</td></tr></table>");
        assert!(rows_match(&t1, &t2));

        let t3 = TableHtml::parse("<table><tr><td>c</td></tr></table>");
        assert!(!rows_match(&t1, &t3));
    }

    #[test]
    fn test_perform_merge_skips_header() {
        let mut t1 = TableHtml::parse(
            "<table><tr><th>H1</th><th>H2</th></tr><tr><td>a</td><td>1</td></tr></table>",
        );
        let mut t2 = TableHtml::parse(
            "<table><tr><th>H1</th><th>H2</th></tr><tr><td>b</td><td>2</td></tr></table>",
        );
        let html = perform_table_merge(&mut t1, &mut t2);
        assert_eq!(
            html,
            "<table><tbody><tr><th>H1</th><th>H2</th></tr><tr><td>a</td><td>1</td></tr>\
             <tr><td>b</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_perform_merge_grows_last_cell() {
        let mut t1 = TableHtml::parse(
            "<table><tr><td>a</td><td>b</td><td>c</td></tr></table>",
        );
        let mut t2 = TableHtml::parse("<table><tr><td>d</td><td>e</td></tr></table>");
        let html = perform_table_merge(&mut t1, &mut t2);
        assert!(html.contains(r#"<tr><td>d</td><td colspan="2">e</td></tr>"#));
    }

    #[test]
    fn test_perform_merge_widens_earlier_table() {
        let mut t1 = TableHtml::parse("<table><tr><td>a</td></tr></table>");
        let mut t2 = TableHtml::parse("<table><tr><td>b</td><td>c</td></tr></table>");
        let html = perform_table_merge(&mut t1, &mut t2);
        assert!(html.contains(r#"<tr><td colspan="2">a</td></tr>"#));
        assert!(html.contains("<tr><td>b</td><td>c</td></tr>"));
    }
}
