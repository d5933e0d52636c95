//! OTSL table-token decoding.
//!
//! OTSL encodes a table as a run of cell tokens, one row per `<nl>`:
//!
//! | token    | meaning                                   |
//! |----------|-------------------------------------------|
//! | `<fcel>` | cell with text (the text follows)         |
//! | `<ecel>` | empty cell                                |
//! | `<lcel>` | merged with the cell to the left          |
//! | `<ucel>` | merged with the cell above                |
//! | `<xcel>` | merged both left and up                   |
//! | `<nl>`   | end of row                                |

use super::escape_html;
use once_cell::sync::Lazy;
use regex::Regex;

const NL: &str = "<nl>";
const FCEL: &str = "<fcel>";
const ECEL: &str = "<ecel>";
const LCEL: &str = "<lcel>";
const UCEL: &str = "<ucel>";
const XCEL: &str = "<xcel>";

const TOKENS: [&str; 6] = [NL, FCEL, ECEL, LCEL, UCEL, XCEL];
const CELL_TOKENS: [&str; 5] = [FCEL, ECEL, LCEL, UCEL, XCEL];

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<nl>|<fcel>|<ecel>|<lcel>|<ucel>|<xcel>").expect("static regex"));

fn is_token(s: &str) -> bool {
    TOKENS.contains(&s)
}

/// One decoded cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Cell text, trimmed
    pub text: String,
    /// Number of rows covered
    pub row_span: usize,
    /// Number of columns covered
    pub col_span: usize,
    /// First covered row
    pub start_row: usize,
    /// First covered column
    pub start_col: usize,
    /// Render as `<th>`
    pub column_header: bool,
}

impl TableCell {
    fn end_row(&self) -> usize {
        self.start_row + self.row_span
    }

    fn end_col(&self) -> usize {
        self.start_col + self.col_span
    }
}

/// A decoded table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    /// Cells in token order
    pub cells: Vec<TableCell>,
    /// Number of grid rows
    pub num_rows: usize,
    /// Number of grid columns
    pub num_cols: usize,
}

/// Split the stream into the bare token sequence and the non-blank parts
/// (tokens and text runs interleaved).
fn extract_tokens_and_text(input: &str) -> (Vec<&str>, Vec<&str>) {
    let tokens: Vec<&str> = TOKEN_RE.find_iter(input).map(|m| m.as_str()).collect();

    let mut parts = Vec::new();
    let mut last = 0;
    for m in TOKEN_RE.find_iter(input) {
        parts.push(&input[last..m.start()]);
        parts.push(m.as_str());
        last = m.end();
    }
    parts.push(&input[last..]);
    parts.retain(|p| !p.trim().is_empty());

    (tokens, parts)
}

/// Group tokens into rows and pad every row with `<ecel>` to the widest.
fn split_rows<'a>(tokens: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut rows: Vec<Vec<&str>> = tokens
        .split(|t| *t == NL)
        .filter(|row| !row.is_empty())
        .map(|row| row.to_vec())
        .collect();

    let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(max_cols, ECEL);
    }
    rows
}

/// Re-walk the padded rows, re-attaching each text run to its token.
fn interleave_texts<'a>(rows: &[Vec<&'a str>], texts: &[&'a str]) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(texts.len() + rows.len());
    let mut idx = 0;

    for row in rows {
        for &token in row {
            out.push(token);
            if idx < texts.len() && texts[idx] == token {
                idx += 1;
                if idx < texts.len() && !is_token(texts[idx]) {
                    out.push(texts[idx]);
                    idx += 1;
                }
            }
        }
        out.push(NL);
        if idx < texts.len() && texts[idx] == NL {
            idx += 1;
        }
    }
    out
}

fn count_right(rows: &[Vec<&str>], row: usize, col: usize) -> usize {
    rows[row]
        .iter()
        .skip(col)
        .take_while(|t| **t == LCEL || **t == XCEL)
        .count()
}

fn count_down(rows: &[Vec<&str>], row: usize, col: usize) -> usize {
    rows.iter()
        .skip(row)
        .take_while(|r| r.get(col).is_some_and(|t| *t == UCEL || *t == XCEL))
        .count()
}

/// Decode an OTSL token stream into cells.
pub fn parse_otsl(content: &str) -> TableData {
    let (tokens, parts) = extract_tokens_and_text(content);
    let rows = split_rows(&tokens);
    let texts = if rows.is_empty() {
        parts
    } else {
        interleave_texts(&rows, &parts)
    };

    let mut cells = Vec::new();
    let (mut r_idx, mut c_idx) = (0usize, 0usize);

    for (i, &text) in texts.iter().enumerate() {
        if text == FCEL || text == ECEL {
            let mut cell_text = "";
            let mut right_offset = 1;
            if text == FCEL {
                if let Some(&next) = texts.get(i + 1) {
                    if !is_token(next) {
                        cell_text = next;
                        right_offset = 2;
                    }
                }
            }

            let next_right = texts.get(i + right_offset).copied().unwrap_or("");
            let next_bottom = rows
                .get(r_idx + 1)
                .and_then(|row| row.get(c_idx))
                .copied()
                .unwrap_or("");

            let mut col_span = 1;
            let mut row_span = 1;
            if next_right == LCEL || next_right == XCEL {
                col_span += count_right(&rows, r_idx, c_idx + 1);
            }
            if next_bottom == UCEL || next_bottom == XCEL {
                row_span += count_down(&rows, r_idx + 1, c_idx);
            }

            cells.push(TableCell {
                text: cell_text.trim().to_string(),
                row_span,
                col_span,
                start_row: r_idx,
                start_col: c_idx,
                column_header: false,
            });
        }

        if CELL_TOKENS.contains(&text) {
            c_idx += 1;
        }
        if text == NL {
            r_idx += 1;
            c_idx = 0;
        }
    }

    TableData {
        cells,
        num_rows: rows.len(),
        num_cols: rows.iter().map(Vec::len).max().unwrap_or(0),
    }
}

impl TableData {
    /// Owner of every grid position, as an index into `cells`.
    fn grid(&self) -> Vec<Vec<Option<usize>>> {
        let mut grid = vec![vec![None; self.num_cols]; self.num_rows];
        for (idx, cell) in self.cells.iter().enumerate() {
            let rows = cell.start_row.min(self.num_rows)..cell.end_row().min(self.num_rows);
            for row in rows {
                let cols = cell.start_col.min(self.num_cols)..cell.end_col().min(self.num_cols);
                for col in cols {
                    grid[row][col] = Some(idx);
                }
            }
        }
        grid
    }

    /// Render as an HTML `<table>`; empty when there are no cells.
    pub fn to_html(&self) -> String {
        if self.cells.is_empty() {
            return String::new();
        }

        let grid = self.grid();
        let mut html = String::from("<table>");
        for (i, row) in grid.iter().enumerate() {
            html.push_str("<tr>");
            for (j, owner) in row.iter().enumerate() {
                let Some(cell) = owner.map(|idx| &self.cells[idx]) else {
                    html.push_str("<td></td>");
                    continue;
                };
                if cell.start_row != i || cell.start_col != j {
                    continue;
                }

                let tag = if cell.column_header { "th" } else { "td" };
                html.push('<');
                html.push_str(tag);
                if cell.row_span > 1 {
                    html.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
                }
                if cell.col_span > 1 {
                    html.push_str(&format!(" colspan=\"{}\"", cell.col_span));
                }
                html.push('>');
                html.push_str(&escape_html(cell.text.trim()));
                html.push_str(&format!("</{}>", tag));
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }
}

/// Convert OTSL content to an HTML table.
///
/// A string that is already a complete `<table>…</table>` is returned as
/// is. A stream that yields no cells produces an empty string.
///
/// # Example
/// ```
/// use vlmdoc::table::convert_otsl_to_html;
///
/// let html = convert_otsl_to_html("<fcel>A<fcel>B<lcel><nl><fcel>C<fcel>D<lcel><nl>");
/// assert_eq!(
///     html,
///     r#"<table><tr><td>A</td><td colspan="2">B</td></tr><tr><td>C</td><td colspan="2">D</td></tr></table>"#
/// );
/// ```
pub fn convert_otsl_to_html(content: &str) -> String {
    if content.starts_with("<table") && content.ends_with("</table>") {
        return content.to_string();
    }
    parse_otsl(content).to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colspan_rows() {
        let data = parse_otsl("<fcel>A<fcel>B<lcel><nl><fcel>C<fcel>D<lcel><nl>");
        assert_eq!(data.num_rows, 2);
        assert_eq!(data.num_cols, 3);
        assert_eq!(data.cells.len(), 4);
        assert_eq!(data.cells[1].col_span, 2);
        assert_eq!(data.cells[3].col_span, 2);
        assert_eq!(data.cells[3].start_row, 1);
    }

    #[test]
    fn test_buyer_row() {
        let html = convert_otsl_to_html("<fcel>Buyer<fcel>PHONEPE PVT. LTD.<lcel><lcel><nl>");
        assert!(html.contains("<td>Buyer</td>"));
        assert!(html.contains(r#"<td colspan="3">PHONEPE PVT. LTD.</td>"#));
        for token in TOKENS {
            assert!(!html.contains(token));
        }
    }

    #[test]
    fn test_rowspan() {
        let html = convert_otsl_to_html("<fcel>A<fcel>B<nl><ucel><fcel>C<nl>");
        assert_eq!(
            html,
            r#"<table><tr><td rowspan="2">A</td><td>B</td></tr><tr><td>C</td></tr></table>"#
        );
    }

    #[test]
    fn test_xcel_block() {
        let data = parse_otsl("<fcel>A<lcel><fcel>B<nl><ucel><xcel><fcel>C<nl>");
        let a = &data.cells[0];
        assert_eq!((a.row_span, a.col_span), (2, 2));
        assert_eq!(data.cells.len(), 3);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let html = convert_otsl_to_html("<fcel>A<fcel>B<nl><fcel>C<nl>");
        assert_eq!(
            html,
            "<table><tr><td>A</td><td>B</td></tr><tr><td>C</td><td></td></tr></table>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let html = convert_otsl_to_html("<fcel>a < b & \"c\"<nl>");
        assert_eq!(html, "<table><tr><td>a &lt; b &amp; &quot;c&quot;</td></tr></table>");
    }

    #[test]
    fn test_passthrough_and_empty() {
        let table = "<table><tr><td>x</td></tr></table>";
        assert_eq!(convert_otsl_to_html(table), table);
        assert_eq!(convert_otsl_to_html(""), "");
        assert_eq!(convert_otsl_to_html("<nl><nl>"), "");
        assert_eq!(convert_otsl_to_html("just text"), "");
    }

    #[test]
    fn test_ecel_never_takes_text() {
        let data = parse_otsl("<ecel>stray<fcel>B<nl>");
        assert_eq!(data.cells[0].text, "");
        assert_eq!(data.cells[1].text, "B");
    }
}
