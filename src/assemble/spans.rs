//! Span construction from recognized content.

use crate::detect::detect_lang;
use crate::model::{BBox, Span, SpanType};
use once_cell::sync::Lazy;
use regex::Regex;

static DISPLAY_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\[(.*?)\\\]").expect("static regex"));

static INLINE_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\((.+?)\\\)").expect("static regex"));

/// Strip the display brackets around an interline equation.
pub(crate) fn isolated_formula_clean(text: &str) -> String {
    let latex = text.strip_prefix(r"\[").unwrap_or(text);
    let latex = latex.strip_suffix(r"\]").unwrap_or(latex);
    latex.trim().to_string()
}

/// Strip a Markdown fence from recognized code.
///
/// The first line goes when it opens a fence, the last when it is a bare
/// closing fence.
pub(crate) fn code_content_clean(content: &str) -> String {
    let lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut start = 0;
    let mut end = lines.len();
    if lines.first().is_some_and(|line| line.starts_with("```")) {
        start = 1;
    }
    if end > start && lines[end - 1].trim() == "```" {
        end -= 1;
    }

    if start < end {
        lines[start..end].join("\n").trim().to_string()
    } else {
        String::new()
    }
}

/// Language tag for a code block; `txt` when nothing is detected.
pub(crate) fn guess_code_lang(content: &str) -> String {
    match detect_lang(content) {
        "" => "txt".to_string(),
        lang => lang.to_string(),
    }
}

/// Turn balanced `\[...\]` pairs inside running text into plain brackets.
pub(crate) fn clean_content(content: &str) -> String {
    let open = content.matches(r"\[").count();
    if open > 0 && open == content.matches(r"\]").count() {
        DISPLAY_BRACKETS
            .replace_all(content, |caps: &regex::Captures| format!("[{}]", &caps[1]))
            .into_owned()
    } else {
        content.to_string()
    }
}

/// Build the spans of a text-bearing block.
///
/// When `\(` and `\)` are balanced the text is split into alternating text
/// and inline equation spans; the flag reports whether that happened.
pub(crate) fn text_spans(content: &str, bbox: BBox) -> (Vec<Span>, bool) {
    let open = content.matches(r"\(").count();
    if open == 0 || open != content.matches(r"\)").count() {
        return (vec![Span::with_content(SpanType::Text, bbox, content)], false);
    }

    let mut spans = Vec::new();
    let push_text = |spans: &mut Vec<Span>, text: &str| {
        if !text.trim().is_empty() {
            spans.push(Span::with_content(SpanType::Text, bbox, text));
        }
    };

    let mut last_end = 0;
    for caps in INLINE_MATH.captures_iter(content) {
        let (Some(whole), Some(formula)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last_end {
            push_text(&mut spans, &content[last_end..whole.start()]);
        }
        spans.push(Span::with_content(
            SpanType::InlineEquation,
            bbox,
            formula.as_str().trim(),
        ));
        last_end = whole.end();
    }
    if last_end < content.len() {
        push_text(&mut spans, &content[last_end..]);
    }

    (spans, true)
}
