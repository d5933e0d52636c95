//! Script detection and character folding.
//!
//! The content assembler needs two small text decisions per block: whether
//! the block is written in a CJK script (no artificial spaces between
//! spans), and whether a line ends in a Latin hyphen that should be joined
//! with the next line.

use once_cell::sync::Lazy;
use regex::Regex;

static HYPHEN_AT_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]+-\s*$").expect("static regex"));

/// Offset between a full-width ASCII form and its half-width counterpart.
const FULL_WIDTH_OFFSET: u32 = 0xFEE0;

fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{30FF}')
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

fn is_han(c: char) -> bool {
    matches!(
        c,
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}'
    )
}

/// Guess the language of a text run.
///
/// Returns `""` for empty input, `ja` when kana is present, `ko` for Hangul,
/// `zh` for Han ideographs and `en` otherwise. Newlines are ignored.
///
/// # Example
/// ```
/// use vlmdoc::detect::detect_lang;
///
/// assert_eq!(detect_lang("hello"), "en");
/// assert_eq!(detect_lang("你好"), "zh");
/// ```
pub fn detect_lang(text: &str) -> &'static str {
    if text.is_empty() {
        return "";
    }

    let chars = text.chars().filter(|&c| c != '\n');
    let (mut kana, mut hangul, mut han) = (false, false, false);
    for c in chars {
        kana |= is_kana(c);
        hangul |= is_hangul(c);
        han |= is_han(c);
    }

    if kana {
        "ja"
    } else if hangul {
        "ko"
    } else if han {
        "zh"
    } else {
        "en"
    }
}

/// True for languages written without inter-word spaces.
pub fn is_cjk_lang(lang: &str) -> bool {
    matches!(lang, "zh" | "ja" | "ko")
}

/// True when the line ends with a Latin word followed by a hyphen.
pub fn is_hyphen_at_line_end(line: &str) -> bool {
    HYPHEN_AT_END.is_match(line)
}

fn shift_full_width(c: char) -> char {
    char::from_u32(c as u32 - FULL_WIDTH_OFFSET).unwrap_or(c)
}

/// Fold every full-width ASCII form (`U+FF01..=U+FF5E`) to half width.
pub fn full_to_half(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => shift_full_width(c),
            _ => c,
        })
        .collect()
}

/// Fold full-width letters and digits only, leaving punctuation alone.
pub fn full_to_half_exclude_marks(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}' | '\u{FF10}'..='\u{FF19}' => {
                shift_full_width(c)
            }
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_lang() {
        assert_eq!(detect_lang(""), "");
        assert_eq!(detect_lang("plain text"), "en");
        assert_eq!(detect_lang("表格\n数据"), "zh");
        assert_eq!(detect_lang("ひらがなと漢字"), "ja");
        assert_eq!(detect_lang("한국어"), "ko");
        assert_eq!(detect_lang("\n"), "en");
    }

    #[test]
    fn test_is_cjk_lang() {
        assert!(is_cjk_lang("zh"));
        assert!(is_cjk_lang("ko"));
        assert!(!is_cjk_lang("en"));
        assert!(!is_cjk_lang(""));
    }

    #[test]
    fn test_hyphen_at_line_end() {
        assert!(is_hyphen_at_line_end("exam-"));
        assert!(is_hyphen_at_line_end("a long exam-  "));
        assert!(!is_hyphen_at_line_end("2-"));
        assert!(!is_hyphen_at_line_end("word - more"));
    }

    #[test]
    fn test_full_to_half() {
        assert_eq!(full_to_half("（ＡＢＣ）１２"), "(ABC)12");
        assert_eq!(full_to_half("中文"), "中文");
    }

    #[test]
    fn test_full_to_half_exclude_marks() {
        assert_eq!(full_to_half_exclude_marks("（ＡＢＣ）１２"), "（ABC）12");
    }
}
