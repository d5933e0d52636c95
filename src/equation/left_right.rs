//! `\left` / `\right` delimiter rematching.
//!
//! The recognizer sometimes drops one half of a `\left…\right` pair, which
//! makes the whole formula fail to typeset. When the counts disagree the
//! formula is cut into array cells (`&`, `\\`, `\begin{array}`,
//! `\end{array}`), cells are grouped by their owning array and column, and
//! every group whose delimiters still do not pair up gets a dangling
//! `\right.` or `\left.` next to the orphaned token.

use once_cell::sync::Lazy;
use regex::Regex;

/// Left delimiters recognized when counting and splitting.
const LEFT_TOKENS: [&str; 18] = [
    r"\left\lbrace",
    r"\left\lVert",
    r"\left\lvert",
    r"\left\rvert",
    r"\left\rVert",
    r"\left\vert",
    r"\left\Vert",
    r"\left\lfloor",
    r"\left\lbrack",
    r"\left\langle",
    r"\left|",
    r"\left\|",
    r"\left[",
    r"\left]",
    r"\left(",
    r"\left\{",
    r"\left\}",
    r"\left.",
];

/// Right delimiters recognized when counting and splitting.
const RIGHT_TOKENS: [&str; 18] = [
    r"\right\rbrace",
    r"\right\lVert",
    r"\right\lvert",
    r"\right\rvert",
    r"\right\rVert",
    r"\right\vert",
    r"\right\Vert",
    r"\right\rfloor",
    r"\right\rbrack",
    r"\right\rangle",
    r"\right|",
    r"\right\|",
    r"\right]",
    r"\right[",
    r"\right)",
    r"\right\}",
    r"\right\{",
    r"\right.",
];

/// Delimiters that take part in pairing but are not counted.
const EXTRA_LEFT_TOKENS: [&str; 2] = [r"\left)", r"\left/"];
const EXTRA_RIGHT_TOKENS: [&str; 2] = [r"\right(", r"\right/"];

/// Matching delimiter pairs. `\left.` and `\right.` stand in for either side.
const PAIRS: [(&str, &str); 17] = [
    (r"\left\lbrace", r"\right\rbrace"),
    (r"\left\lVert", r"\right\lVert"),
    (r"\left\lvert", r"\right\lvert"),
    (r"\left\vert", r"\right\vert"),
    (r"\left\Vert", r"\right\Vert"),
    (r"\left\lfloor", r"\right\rfloor"),
    (r"\left\lbrack", r"\right\rbrack"),
    (r"\left\langle", r"\right\rangle"),
    (r"\left|", r"\right|"),
    (r"\left\|", r"\right\|"),
    (r"\left[", r"\right]"),
    (r"\left]", r"\right["),
    (r"\left(", r"\right)"),
    (r"\left)", r"\right("),
    (r"\left\{", r"\right\}"),
    (r"\left\}", r"\right\{"),
    (r"\left/", r"\right/"),
];

const NULL_LEFT: &str = r"\left.";
const NULL_RIGHT: &str = r"\right.";
const ROW_SEPARATOR: &str = r"\\";
const BEGIN_ARRAY: &str = r"\begin{array}";
const END_ARRAY: &str = r"\end{array}";

fn alternation(tokens: &[&str]) -> String {
    tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

static LEFT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&alternation(&LEFT_TOKENS)).expect("static regex"));

static RIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&alternation(&RIGHT_TOKENS)).expect("static regex"));

static LEFT_RIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    let all: Vec<&str> = LEFT_TOKENS.iter().chain(RIGHT_TOKENS.iter()).copied().collect();
    Regex::new(&alternation(&all)).expect("static regex")
});

static ARRAY_DELIMITER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&|\\\\|\\begin\{array\}\s*\{[a-zA-Z\s]*\}|\\end\{array\}").expect("static regex")
});

fn count_left(latex: &str) -> usize {
    LEFT_RE.find_iter(latex).count()
}

fn count_right(latex: &str) -> usize {
    RIGHT_RE.find_iter(latex).count()
}

fn is_valid_token(token: &str) -> bool {
    LEFT_TOKENS.contains(&token)
        || RIGHT_TOKENS.contains(&token)
        || EXTRA_LEFT_TOKENS.contains(&token)
        || EXTRA_RIGHT_TOKENS.contains(&token)
}

fn is_pair(left: &str, right: &str) -> bool {
    PAIRS.iter().any(|&(l, r)| {
        (left == l || left == NULL_LEFT) && (right == r || right == NULL_RIGHT)
    })
}

/// Split `s` around every match of `re`, keeping the matches.
fn split_keeping<'a>(re: &Regex, s: &'a str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for m in re.find_iter(s) {
        parts.push(&s[last..m.start()]);
        parts.push(m.as_str());
        last = m.end();
    }
    parts.push(&s[last..]);
    parts
}

fn is_array_delimiter(node: &str) -> bool {
    node == "&" || node == ROW_SEPARATOR || node.contains(BEGIN_ARRAY) || node.contains(END_ARRAY)
}

/// One `\begin{array}` … `\end{array}` range over the node list.
#[derive(Debug, Clone)]
struct ArraySpan {
    tag: usize,
    start: usize,
    end: usize,
    contains: Vec<usize>,
}

fn tag_arrays(nodes: &[&str]) -> Vec<ArraySpan> {
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut arrays = Vec::new();
    let mut next_tag = 0;

    for (idx, node) in nodes.iter().enumerate() {
        if node.contains(BEGIN_ARRAY) {
            next_tag += 1;
            stack.push((next_tag, idx));
        } else if *node == END_ARRAY {
            if let Some((tag, start)) = stack.pop() {
                arrays.push(ArraySpan {
                    tag,
                    start,
                    end: idx,
                    contains: Vec::new(),
                });
            }
        }
    }

    let bounds: Vec<(usize, usize, usize)> = arrays.iter().map(|a| (a.tag, a.start, a.end)).collect();
    for array in arrays.iter_mut() {
        array.contains = bounds
            .iter()
            .filter(|&&(tag, start, end)| tag != array.tag && array.start < start && array.end > end)
            .map(|&(tag, _, _)| tag)
            .collect();
    }

    arrays.sort_by(|a, b| b.contains.len().cmp(&a.contains.len()));
    arrays
}

/// Tag each node with `(array, column)` of the innermost array holding it.
fn tag_elements(nodes: &[&str], arrays: &[ArraySpan]) -> Vec<Option<(usize, usize)>> {
    let mut tags = vec![None; nodes.len()];

    for array in arrays {
        let mut visible: Vec<Option<&str>> = nodes.iter().map(|n| Some(*n)).collect();
        for inner_tag in &array.contains {
            if let Some(inner) = arrays.iter().find(|a| a.tag == *inner_tag) {
                for slot in &mut visible[inner.start..=inner.end] {
                    *slot = None;
                }
            }
        }
        for (idx, slot) in visible.iter_mut().enumerate() {
            if idx < array.start || idx > array.end {
                *slot = None;
            }
        }

        let mut element_idx = 0;
        for (idx, node) in visible.iter().enumerate() {
            match *node {
                Some("&") | Some(ROW_SEPARATOR) => element_idx += 1,
                None => {}
                Some(_) => {
                    if tags[idx].is_none() {
                        tags[idx] = Some((array.tag, element_idx));
                    }
                }
            }
        }
    }

    tags
}

/// Pair delimiters across a group; returns the unpaired `(token, position)`s.
fn unpaired_delimiters(groups: &[Vec<String>]) -> Vec<(String, (usize, usize))> {
    let mut stack: Vec<(String, (usize, usize))> = Vec::new();
    for (group_idx, tokens) in groups.iter().enumerate() {
        for (token_idx, token) in tokens.iter().enumerate() {
            if !is_valid_token(token) {
                continue;
            }
            let closes_top = stack.last().is_some_and(|(top, _)| is_pair(top, token));
            if closes_top {
                stack.pop();
            } else {
                stack.push((token.clone(), (group_idx, token_idx)));
            }
        }
    }
    stack
}

fn clean_spans(nodes: &[&str], tags: &[Option<(usize, usize)>]) -> Vec<String> {
    let mut fixed: Vec<String> = nodes.iter().map(|n| n.to_string()).collect();

    let valid: Vec<usize> = (0..nodes.len()).filter(|&i| !is_array_delimiter(nodes[i])).collect();
    let mut keys: Vec<Option<(usize, usize)>> = Vec::new();
    for &idx in &valid {
        if !keys.contains(&tags[idx]) {
            keys.push(tags[idx]);
        }
    }

    for key in keys {
        let members: Vec<usize> = valid.iter().copied().filter(|&i| tags[i] == key).collect();
        let num_left: usize = members.iter().map(|&i| count_left(nodes[i])).sum();
        let num_right: usize = members.iter().map(|&i| count_right(nodes[i])).sum();
        if num_left == num_right {
            continue;
        }

        let mut groups: Vec<Vec<String>> = members
            .iter()
            .map(|&i| {
                split_keeping(&LEFT_RIGHT_RE, nodes[i])
                    .into_iter()
                    .filter(|part| !part.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect();

        for (token, (g, t)) in unpaired_delimiters(&groups) {
            if token.contains(r"\left") {
                groups[g][t] = format!("{} {}", groups[g][t], NULL_RIGHT);
            } else if token.contains(r"\right") {
                groups[g][t] = format!("{} {}", NULL_LEFT, groups[g][t]);
            }
        }

        for (&idx, group) in members.iter().zip(groups) {
            fixed[idx] = group.concat();
        }
    }

    fixed
}

fn fix_left_right_mismatch(latex: &str) -> String {
    let nodes: Vec<&str> = split_keeping(&ARRAY_DELIMITER_RE, latex.trim())
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();
    let arrays = tag_arrays(&nodes);
    let tags = tag_elements(&nodes, &arrays);
    clean_spans(&nodes, &tags).concat()
}

/// Repair unmatched `\left` / `\right` delimiters.
///
/// The input is returned unchanged when the counts already agree or when
/// `\begin{array}` and `\end{array}` do not balance. Note that the repaired
/// output drops the whitespace around array separators.
pub fn try_match_equation_left_right(latex: &str, debug: bool) -> String {
    if count_left(latex) == count_right(latex) {
        return latex.to_string();
    }
    if latex.matches(BEGIN_ARRAY).count() != latex.matches(END_ARRAY).count() {
        return latex.to_string();
    }

    let fixed = fix_left_right_mismatch(latex);
    if debug {
        log::debug!("fixed left/right mismatch: {} -> {}", latex, fixed);
    }
    fixed
}
