//! Paragraph text assembly.
//!
//! Joins the spans of one block into running text. Latin text gets a space
//! between spans and is de-hyphenated across line breaks; CJK text is
//! joined without artificial spaces.

use super::RenderOptions;
use crate::detect::{detect_lang, full_to_half_exclude_marks, is_cjk_lang, is_hyphen_at_line_end};
use crate::model::{Block, BlockType, Span, SpanType};
use serde::{Deserialize, Serialize};

/// Kind of an inline span in a v2 content list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineType {
    /// Plain text
    Text,
    /// Inline LaTeX
    EquationInline,
    /// Phonetic annotation
    Phonetic,
}

/// A typed run of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    /// Span kind
    #[serde(rename = "type")]
    pub span_type: InlineType,
    /// Span text
    pub content: String,
}

fn normalized(span: &Span) -> String {
    full_to_half_exclude_marks(span.text())
}

fn block_lang(block: &Block) -> &'static str {
    let text: String = block
        .spans()
        .filter(|s| s.span_type == SpanType::Text)
        .map(normalized)
        .collect();
    detect_lang(&text)
}

/// True when line `line_idx + 1` starts with a text span whose first
/// character is a lowercase ASCII letter.
fn next_line_starts_lowercase(block: &Block, line_idx: usize) -> bool {
    block
        .lines
        .get(line_idx + 1)
        .and_then(|line| line.spans.first())
        .filter(|span| span.span_type == SpanType::Text)
        .and_then(|span| normalized(span).chars().next())
        .is_some_and(|c| c.is_ascii_lowercase())
}

fn drop_last_char(text: &str) -> &str {
    text.char_indices()
        .next_back()
        .map(|(idx, _)| &text[..idx])
        .unwrap_or(text)
}

/// Join a block's spans into one string.
///
/// Inline equations are wrapped in the inline delimiters. Interline
/// equations become a display block when formulas are enabled, otherwise
/// a link to their crop (or nothing).
///
/// # Example
/// ```
/// use vlmdoc::model::{BBox, Block, BlockType, Line, Span, SpanType};
/// use vlmdoc::render::{merge_para_with_text, RenderOptions};
///
/// let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
/// let lines = vec![
///     Line::new(bbox, vec![Span::with_content(SpanType::Text, bbox, "docu-")]),
///     Line::new(bbox, vec![Span::with_content(SpanType::Text, bbox, "ment")]),
/// ];
/// let block = Block::leaf(BlockType::Text, bbox, 0, 0, lines);
/// assert_eq!(merge_para_with_text(&block, &RenderOptions::default()), "document ");
/// ```
pub fn merge_para_with_text(block: &Block, options: &RenderOptions) -> String {
    let lang = block_lang(block);
    let cjk = is_cjk_lang(lang);
    let delimiters = &options.delimiters;

    let mut para_text = String::new();
    for (i, line) in block.lines.iter().enumerate() {
        for (j, span) in line.spans.iter().enumerate() {
            let content = match span.span_type {
                SpanType::Text => normalized(span),
                SpanType::InlineEquation => format!(
                    "{}{}{}",
                    delimiters.inline.left,
                    span.text(),
                    delimiters.inline.right
                ),
                SpanType::InterlineEquation => {
                    if options.formula_enable {
                        format!(
                            "\n{}\n{}\n{}\n",
                            delimiters.display.left,
                            span.text(),
                            delimiters.display.right
                        )
                    } else {
                        match span.image_path.as_deref() {
                            Some(path) if !path.is_empty() => {
                                format!("![]({})", options.image_link(path))
                            }
                            _ => String::new(),
                        }
                    }
                }
                _ => String::new(),
            };

            let content = content.trim();
            if content.is_empty() {
                continue;
            }

            if span.span_type == SpanType::InterlineEquation {
                para_text.push_str(content);
                continue;
            }

            let is_last_span = j + 1 == line.spans.len();
            if cjk {
                para_text.push_str(content);
                if !is_last_span || span.span_type == SpanType::InlineEquation {
                    para_text.push(' ');
                }
            } else if matches!(span.span_type, SpanType::Text | SpanType::InlineEquation) {
                if is_last_span
                    && span.span_type == SpanType::Text
                    && is_hyphen_at_line_end(content)
                {
                    if next_line_starts_lowercase(block, i) {
                        para_text.push_str(drop_last_char(content));
                    } else {
                        para_text.push_str(content);
                    }
                } else {
                    para_text.push_str(content);
                    para_text.push(' ');
                }
            }
        }
    }
    para_text
}

/// Split a block's spans into typed inline runs.
///
/// Blank spans are skipped and consecutive text runs are merged. Text in a
/// `phonetic` block is typed [`InlineType::Phonetic`] and kept verbatim.
pub fn merge_para_with_text_v2(block: &Block) -> Vec<InlineSpan> {
    let cjk = is_cjk_lang(block_lang(block));
    let phonetic_block = block.block_type == BlockType::Phonetic;

    let mut out: Vec<InlineSpan> = Vec::new();
    for (i, line) in block.lines.iter().enumerate() {
        for (j, span) in line.spans.iter().enumerate() {
            if span.text().trim().is_empty() {
                continue;
            }

            let span_type = match span.span_type {
                SpanType::Text if phonetic_block => InlineType::Phonetic,
                SpanType::Text => InlineType::Text,
                SpanType::InlineEquation => InlineType::EquationInline,
                _ => continue,
            };

            if span_type != InlineType::Text {
                let content = match span.span_type {
                    SpanType::Text => normalized(span),
                    _ => span.text().to_string(),
                };
                out.push(InlineSpan { span_type, content });
                continue;
            }

            let content = normalized(span);
            let is_last_span = j + 1 == line.spans.len();
            let piece = if cjk {
                if is_last_span {
                    content
                } else {
                    format!("{} ", content)
                }
            } else if is_last_span && is_hyphen_at_line_end(&content) {
                if next_line_starts_lowercase(block, i) {
                    drop_last_char(&content).to_string()
                } else {
                    content
                }
            } else {
                format!("{} ", content)
            };

            match out.last_mut() {
                Some(last) if last.span_type == InlineType::Text => last.content.push_str(&piece),
                _ => out.push(InlineSpan {
                    span_type: InlineType::Text,
                    content: piece,
                }),
            }
        }
    }
    out
}
