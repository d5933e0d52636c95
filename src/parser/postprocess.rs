//! Per-page block post-processing.
//!
//! Runs between layout parsing and page assembly: decodes table tokens to
//! HTML, normalizes equation LaTeX, folds equations that share an
//! `equation_block` parent into one array, and filters out blocks that
//! carry nothing.

use super::PostProcessOptions;
use crate::equation::{combine_equations, process_equation};
use crate::geometry::bbox_cover_ratio;
use crate::model::{BlockType, ContentBlock};
use crate::table::{convert_otsl_to_html, escape_html};
use once_cell::sync::Lazy;
use regex::Regex;

static OTSL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(fcel|lcel|ecel|ucel|xcel|nl)>").expect("static regex"));

static NON_FIRST_CELL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(lcel|ecel|ucel|xcel)>").expect("static regex"));

/// Share of an equation's area an `equation_block` must cover to own it.
const EQUATION_COVER_THRESHOLD: f64 = 0.9;

/// Convert simple OTSL content to a flat HTML table.
///
/// Spans are ignored: every `<fcel>` starts a cell and the other cell
/// tokens are removed. Returns an empty string when the content is blank,
/// carries no OTSL tokens or yields no cells. Content that is already a
/// `<table>` is returned trimmed.
pub fn parse_table_content(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with("<table") && trimmed.ends_with("</table>") {
        return trimmed.to_string();
    }
    if !OTSL_TOKEN.is_match(trimmed) {
        return String::new();
    }

    let without_cr = trimmed.replace('\r', "");
    let mut rows_html = String::new();
    for row in without_cr.split("<nl>").map(str::trim).filter(|r| !r.is_empty()) {
        let cells: Vec<String> = row
            .split("<fcel>")
            .map(|cell| NON_FIRST_CELL_TOKEN.replace_all(cell, "").trim().to_string())
            .filter(|cell| !cell.is_empty())
            .collect();
        if cells.is_empty() {
            continue;
        }

        rows_html.push_str("<tr>");
        for cell in &cells {
            rows_html.push_str("<td>");
            rows_html.push_str(&escape_html(cell));
            rows_html.push_str("</td>");
        }
        rows_html.push_str("</tr>");
    }

    if rows_html.is_empty() {
        return String::new();
    }
    format!("<table>{}</table>", rows_html)
}

/// Convert recognized table content to HTML.
///
/// OTSL content is decoded chunk by chunk (chunks separated by a blank
/// line). Other content goes through [`parse_table_content`], and as a last
/// resort each line is read as a `|`-separated row.
pub fn convert_table_to_html(table_text: &str) -> String {
    if table_text.contains("<fcel>") || table_text.contains("<ecel>") {
        return table_text
            .split("\n\n")
            .map(|chunk| {
                if chunk.contains("<fcel>") || chunk.contains("<ecel>") {
                    convert_otsl_to_html(chunk)
                } else {
                    chunk.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    let parsed = parse_table_content(table_text);
    if !parsed.is_empty() {
        return parsed;
    }

    let mut html = String::from("<table>\n");
    for line in table_text.trim().split('\n') {
        html.push_str("  <tr>\n");
        for cell in line.split('|').filter(|c| !c.trim().is_empty()) {
            html.push_str("    <td>");
            html.push_str(cell.trim());
            html.push_str("</td>\n");
        }
        html.push_str("  </tr>\n");
    }
    html.push_str("</table>");
    html
}

fn add_equation_brackets(content: &str) -> String {
    let mut out = content.trim().to_string();
    if !out.starts_with(r"\[") {
        out = format!("\\[\n{}", out);
    }
    if !out.ends_with(r"\]") {
        out = format!("{}\n\\]", out);
    }
    out
}

fn has_content(block: &ContentBlock) -> bool {
    block.content.as_deref().is_some_and(|c| !c.is_empty())
}

/// Fold equations covered by an `equation_block` into one array equation.
///
/// Only parents covering more than one equation produce a combined block;
/// every `equation_block` is dropped from the output.
fn handle_equation_block(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let span_indices: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.block_type == BlockType::Equation)
        .map(|(i, _)| i)
        .collect();

    let mut covered_by: Vec<(usize, Vec<usize>)> = Vec::new();
    for (sem_idx, sem) in blocks.iter().enumerate() {
        if sem.block_type != BlockType::EquationBlock {
            continue;
        }
        let covered: Vec<usize> = span_indices
            .iter()
            .copied()
            .filter(|&i| bbox_cover_ratio(&sem.bbox, &blocks[i].bbox) > EQUATION_COVER_THRESHOLD)
            .collect();
        if covered.len() > 1 {
            covered_by.push((sem_idx, covered));
        }
    }

    let is_covered = |idx: usize| covered_by.iter().any(|(_, spans)| spans.contains(&idx));
    let mut out = Vec::with_capacity(blocks.len());
    for (idx, block) in blocks.iter().enumerate() {
        if is_covered(idx) {
            continue;
        }
        if let Some((_, spans)) = covered_by.iter().find(|(sem, _)| *sem == idx) {
            let contents: Vec<&str> = spans
                .iter()
                .filter_map(|&i| blocks[i].content.as_deref())
                .filter(|c| !c.is_empty())
                .collect();
            if !contents.is_empty() {
                log::debug!(
                    "combined {} equations under equation_block #{}",
                    contents.len(),
                    idx
                );
                out.push(
                    ContentBlock::new(BlockType::Equation, block.bbox, block.angle)
                        .with_content(combine_equations(&contents)),
                );
            }
            continue;
        }
        if block.block_type == BlockType::EquationBlock {
            continue;
        }
        out.push(block.clone());
    }
    out
}

fn keep_block(block: &ContentBlock, options: &PostProcessOptions) -> bool {
    if !block.has_payload() && block.block_type != BlockType::Image {
        return false;
    }
    match block.block_type {
        BlockType::List => !options.abandon_list,
        BlockType::Header | BlockType::Footer | BlockType::PageNumber => !options.abandon_paratext,
        BlockType::EquationBlock => false,
        _ => true,
    }
}

/// Post-process one page of blocks.
///
/// # Example
/// ```
/// use vlmdoc::model::{BBox, BlockType, ContentBlock};
/// use vlmdoc::parser::{post_process_blocks, PostProcessOptions};
///
/// let table = ContentBlock::new(BlockType::Table, BBox::new(0.1, 0.1, 0.9, 0.5), 0)
///     .with_content("<fcel>A<fcel>B<nl>");
/// let blocks = post_process_blocks(vec![table], &PostProcessOptions::default());
/// assert_eq!(blocks[0].html.as_deref(), Some("<table><tr><td>A</td><td>B</td></tr></table>"));
/// ```
pub fn post_process_blocks(
    blocks: Vec<ContentBlock>,
    options: &PostProcessOptions,
) -> Vec<ContentBlock> {
    let mut processed = blocks;

    for block in processed.iter_mut() {
        if block.block_type == BlockType::Table && has_content(block) && block.html.is_none() {
            let content = block.content.as_deref().unwrap_or_default();
            block.html = Some(convert_table_to_html(content));
        }
    }

    if options.simple_post_process {
        return processed;
    }

    for block in processed.iter_mut() {
        if block.block_type == BlockType::Equation && has_content(block) {
            let content = block.content.as_deref().unwrap_or_default();
            block.content = Some(process_equation(content, false));
        }
    }

    if options.handle_equation_block {
        processed = handle_equation_block(processed);
    }

    for block in processed.iter_mut() {
        if block.block_type == BlockType::Equation && has_content(block) {
            let content = block.content.as_deref().unwrap_or_default();
            block.content = Some(add_equation_brackets(content));
        }
    }

    processed.retain(|b| keep_block(b, options));
    processed
}
