//! Equation LaTeX normalization.
//!
//! Recognized formulas go through a fixed chain of text passes before they
//! are stored. Each pass is a pure function of its input and can be run on
//! its own; [`process_equation`] runs all of them in order:
//!
//! 1. [`try_match_equation_left_right`]
//! 2. [`try_fix_equation_double_subscript`]
//! 3. [`try_fix_equation_eqqcolon`]
//! 4. [`try_fix_equation_big`]
//! 5. [`try_fix_equation_leq`]
//! 6. [`try_fix_unbalanced_braces`]
//!
//! The `debug` flag on every pass logs the rewrite at `debug` level.

mod big_delimiter;
mod left_right;

pub use left_right::try_match_equation_left_right;

use big_delimiter::BIG_DELIMITER_REPLACEMENTS;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static DOUBLE_SUBSCRIPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"_\s*\{([^{}]|\{[^{}]*\})*\}\s*_\s*\{([^{}]|\{[^{}]*\})*\}").expect("static regex")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\tag\s*\{([^}]*)\}").expect("static regex"));

fn log_rewrite(debug: bool, pass: &str, before: &str, after: &str) {
    if debug && before != after {
        log::debug!("equation {}: {} -> {}", pass, before, after);
    }
}

/// Remove `_{..}_{..}` double subscripts.
///
/// Both subscripts are dropped since there is no way to tell which one the
/// recognizer meant.
pub fn try_fix_equation_double_subscript(latex: &str, debug: bool) -> String {
    if !DOUBLE_SUBSCRIPT.is_match(latex) {
        return latex.to_string();
    }
    let out = DOUBLE_SUBSCRIPT.replace_all(latex, "").into_owned();
    log_rewrite(debug, "double-subscript", latex, &out);
    out
}

/// Spell out `\eqqcolon` and `\coloneqq`.
pub fn try_fix_equation_eqqcolon(latex: &str, debug: bool) -> String {
    let out = latex.replace(r"\eqqcolon", "=:").replace(r"\coloneqq", ":=");
    log_rewrite(debug, "eqqcolon", latex, &out);
    out
}

/// Strip braces wrapped around `\big`-family delimiter tokens.
pub fn try_fix_equation_big(latex: &str, debug: bool) -> String {
    let out = BIG_DELIMITER_REPLACEMENTS
        .iter()
        .fold(latex.to_string(), |acc, (pattern, replacement)| {
            if acc.contains(pattern) {
                acc.replace(pattern, replacement)
            } else {
                acc
            }
        });
    log_rewrite(debug, "big", latex, &out);
    out
}

/// Put a space after every `<` that is not already followed by whitespace.
pub fn try_fix_equation_leq(latex: &str, debug: bool) -> String {
    let mut out = String::with_capacity(latex.len() + 8);
    let mut chars = latex.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '<' && !chars.peek().is_some_and(|next| next.is_whitespace()) {
            out.push(' ');
        }
    }
    log_rewrite(debug, "leq", latex, &out);
    out
}

/// Remove `{` and `}` that have no partner.
///
/// A brace preceded by an odd run of backslashes is an escaped literal and
/// is left alone.
pub fn try_fix_unbalanced_braces(latex: &str, debug: bool) -> String {
    let bytes = latex.as_bytes();
    let mut stack: Vec<usize> = Vec::new();
    let mut unmatched: HashSet<usize> = HashSet::new();

    for (i, &b) in bytes.iter().enumerate() {
        if b != b'{' && b != b'}' {
            continue;
        }
        let backslashes = bytes[..i].iter().rev().take_while(|&&c| c == b'\\').count();
        if backslashes % 2 == 1 {
            continue;
        }
        if b == b'{' {
            stack.push(i);
        } else if stack.pop().is_none() {
            unmatched.insert(i);
        }
    }
    unmatched.extend(stack);

    if unmatched.is_empty() {
        return latex.to_string();
    }

    let out: String = latex
        .char_indices()
        .filter(|(i, _)| !unmatched.contains(i))
        .map(|(_, c)| c)
        .collect();
    log_rewrite(debug, "braces", latex, &out);
    out
}

/// Run every normalization pass over one formula.
///
/// # Example
/// ```
/// use vlmdoc::equation::process_equation;
///
/// assert_eq!(process_equation(r"a \coloneqq b}", false), "a := b");
/// ```
pub fn process_equation(content: &str, debug: bool) -> String {
    let out = try_match_equation_left_right(content, debug);
    let out = try_fix_equation_double_subscript(&out, debug);
    let out = try_fix_equation_eqqcolon(&out, debug);
    let out = try_fix_equation_big(&out, debug);
    let out = try_fix_equation_leq(&out, debug);
    try_fix_unbalanced_braces(&out, debug)
}

/// Stack several formulas into one left-aligned array.
///
/// When more than one `\tag{..}` occurs across the inputs, every tag is
/// rewritten to a plain `(..)` label.
pub fn combine_equations<S: AsRef<str>>(contents: &[S]) -> String {
    let total_tags: usize = contents
        .iter()
        .map(|c| TAG.find_iter(c.as_ref()).count())
        .sum();

    let mut out = String::from(r"\begin{array}{l} ");
    for content in contents {
        let content = content.as_ref();
        if total_tags > 1 {
            out.push_str(&TAG.replace_all(content, "(${1})"));
        } else {
            out.push_str(content);
        }
        out.push_str(r" \\ ");
    }
    out.push_str(r"\end{array}");
    out
}

/// Collapse whitespace runs and drop the whitespace after `\left`/`\right`.
pub fn normalize_equation_spacing(latex: &str) -> String {
    static WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));
    static LEFT_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\left\s+").expect("static regex"));
    static RIGHT_WS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\\right\s+").expect("static regex"));

    let collapsed = WS.replace_all(latex.trim(), " ");
    let left = LEFT_WS.replace_all(&collapsed, r"\left");
    RIGHT_WS.replace_all(&left, r"\right").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_subscript_removed() {
        assert_eq!(try_fix_equation_double_subscript("x_{i}_{j} + y", false), "x + y");
        assert_eq!(try_fix_equation_double_subscript("x_{i} + y_{j}", false), "x_{i} + y_{j}");
        assert_eq!(
            try_fix_equation_double_subscript("a_{b{c}} _ {d}=1", false),
            "a=1"
        );
    }

    #[test]
    fn test_eqqcolon() {
        assert_eq!(try_fix_equation_eqqcolon(r"a \eqqcolon b \coloneqq c", false), "a =: b := c");
    }

    #[test]
    fn test_big_delimiters() {
        assert_eq!(try_fix_equation_big(r"\big{(} x \big{)}", false), r"\big( x \big)");
        assert_eq!(try_fix_equation_big(r"\bigtimes_i A_i", false), r"\times_i A_i");
        assert_eq!(try_fix_equation_big(r"\big( x", false), r"\big( x");
    }

    #[test]
    fn test_big_table_is_literal() {
        for (pattern, _) in BIG_DELIMITER_REPLACEMENTS {
            assert!(pattern.starts_with('\\'), "unexpected pattern {pattern}");
        }
        assert_eq!(BIG_DELIMITER_REPLACEMENTS.len(), 313);
    }

    #[test]
    fn test_leq_spacing_idempotent() {
        let once = try_fix_equation_leq("a<b", false);
        assert_eq!(once, "a< b");
        assert_eq!(try_fix_equation_leq(&once, false), once);
        assert_eq!(try_fix_equation_leq("a<", false), "a< ");
    }

    #[test]
    fn test_unbalanced_braces() {
        assert_eq!(try_fix_unbalanced_braces("{a}}", false), "{a}");
        assert_eq!(try_fix_unbalanced_braces("{{a}", false), "{a}");
        assert_eq!(try_fix_unbalanced_braces(r"\{a", false), r"\{a");
        assert_eq!(try_fix_unbalanced_braces(r"\\{a", false), r"\\a");
        assert_eq!(try_fix_unbalanced_braces("}x{", false), "x");
    }

    #[test]
    fn test_unbalanced_braces_keeps_unicode() {
        assert_eq!(try_fix_unbalanced_braces("α{β}}γ", false), "α{β}γ");
    }

    #[test]
    fn test_process_equation_idempotent() {
        let once = process_equation(r"x_{1}_{2} < \big{(} y \big{)} }", false);
        let twice = process_equation(&once, false);
        assert_eq!(once, twice);
        assert_eq!(once, r"x < \big( y \big) ");
    }

    #[test]
    fn test_combine_equations() {
        let combined = combine_equations(&["a=1", "b=2"]);
        assert_eq!(combined, r"\begin{array}{l} a=1 \\ b=2 \\ \end{array}");
    }

    #[test]
    fn test_combine_equations_rewrites_tags() {
        let combined = combine_equations(&[r"a=1 \tag{1}", r"b=2 \tag {2}"]);
        assert!(combined.contains("a=1 (1)"));
        assert!(combined.contains("b=2 (2)"));

        let single = combine_equations(&[r"a=1 \tag{1}", "b=2"]);
        assert!(single.contains(r"\tag{1}"));
    }

    #[test]
    fn test_normalize_equation_spacing() {
        assert_eq!(
            normalize_equation_spacing("  \\left (  a \n+ b \\right )  "),
            r"\left( a + b \right)"
        );
    }
}
