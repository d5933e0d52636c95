//! A small owned DOM for table fragments.
//!
//! Table HTML is parsed with `scraper` (html5ever fragment parsing, so a
//! bare `<tr>` inside `<table>` gets its implied `<tbody>`) and copied into
//! an arena the merge code can edit in place: read and rewrite attributes,
//! collect rows and cells in document order and graft rows from another
//! table.

use scraper::{ElementRef, Html};
use std::fmt;

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Handle to a node inside a [`TableHtml`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    children: Vec<NodeId>,
}

/// An editable table fragment.
#[derive(Debug, Clone, Default)]
pub struct TableHtml {
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

/// Largest `colspan`/`rowspan` honored; larger values are clamped.
pub(crate) const MAX_SPAN: usize = 1000;

/// Read a `colspan`/`rowspan` value: leading digits of the trimmed value,
/// clamped to [`MAX_SPAN`], `fallback` when there are none.
pub(crate) fn parse_span(value: Option<&str>, fallback: usize) -> usize {
    let Some(value) = value else {
        return fallback;
    };
    let digits: String = value
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return fallback;
    }
    digits
        .parse::<usize>()
        .map_or(MAX_SPAN, |span| span.min(MAX_SPAN))
}

impl TableHtml {
    /// Parse an HTML fragment.
    ///
    /// Comments, doctypes and processing instructions are dropped.
    pub fn parse(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        let mut table = Self::default();
        table.roots = table.import_children(fragment.root_element());
        table
    }

    fn import_children(&mut self, element: ElementRef<'_>) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                let kind = NodeKind::Element {
                    name: child_element.value().name().to_string(),
                    attrs: child_element
                        .value()
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                };
                let children = self.import_children(child_element);
                ids.push(self.push(kind, children));
            } else if let Some(text) = child.value().as_text() {
                ids.push(self.push(NodeKind::Text(text.to_string()), Vec::new()));
            }
        }
        ids
    }

    fn push(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        self.nodes.push(NodeData { kind, children });
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    /// Element name, `None` for text nodes.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    fn is_element(&self, id: NodeId, names: &[&str]) -> bool {
        self.name(id).is_some_and(|n| names.contains(&n))
    }

    /// All descendants of `from` (or of the whole fragment), pre-order.
    fn descendants(&self, from: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match from {
            Some(id) => self.node(id).children.iter().rev().copied().collect(),
            None => self.roots.iter().rev().copied().collect(),
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    /// First element with the given name, in document order.
    pub fn first_element(&self, name: &str) -> Option<NodeId> {
        self.descendants(None)
            .into_iter()
            .find(|&id| self.is_element(id, &[name]))
    }

    /// Every `<tr>` in document order, nested tables included.
    pub fn rows(&self) -> Vec<NodeId> {
        self.descendants(None)
            .into_iter()
            .filter(|&id| self.is_element(id, &["tr"]))
            .collect()
    }

    /// Every `<td>`/`<th>` below `row`, in document order.
    pub fn cells(&self, row: NodeId) -> Vec<NodeId> {
        self.descendants(Some(row))
            .into_iter()
            .filter(|&id| self.is_element(id, &["td", "th"]))
            .collect()
    }

    /// Attribute value.
    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Set an attribute, replacing the old value in place or appending.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            let value = value.into();
            match attrs.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value,
                None => attrs.push((key.to_string(), value)),
            }
        }
    }

    /// `colspan` of a cell, 1 when absent or unparsable.
    pub fn colspan(&self, cell: NodeId) -> usize {
        parse_span(self.attr(cell, "colspan"), 1)
    }

    /// `rowspan` of a cell, 1 when absent or unparsable.
    pub fn rowspan(&self, cell: NodeId) -> usize {
        parse_span(self.attr(cell, "rowspan"), 1)
    }

    /// Concatenated text of a node and its descendants.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let NodeKind::Text(t) = &self.node(id).kind {
            out.push_str(t);
        }
        for d in self.descendants(Some(id)) {
            if let NodeKind::Text(t) = &self.node(d).kind {
                out.push_str(t);
            }
        }
        out
    }

    /// Deep-copy `node` of `other` as the last child of `parent`.
    pub fn append_copy(&mut self, parent: NodeId, other: &TableHtml, node: NodeId) {
        let id = self.copy_from(other, node);
        self.nodes[parent.0].children.push(id);
    }

    fn copy_from(&mut self, other: &TableHtml, node: NodeId) -> NodeId {
        let source = other.node(node);
        let children: Vec<NodeId> = source
            .children
            .iter()
            .map(|&c| self.copy_from(other, c))
            .collect();
        self.push(source.kind.clone(), children)
    }

    /// Serialize the fragment back to HTML.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.write_node(&mut out, root);
        }
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId) {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
            NodeKind::Element { name, attrs } => {
                out.push('<');
                out.push_str(name);
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(v));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }
                for &child in &node.children {
                    self.write_node(out, child);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

impl fmt::Display for TableHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inserts_tbody() {
        let table = TableHtml::parse("<table><tr><td>a</td></tr></table>");
        assert_eq!(
            table.serialize(),
            "<table><tbody><tr><td>a</td></tr></tbody></table>"
        );
        assert!(table.first_element("tbody").is_some());
    }

    #[test]
    fn test_rows_and_cells() {
        let table = TableHtml::parse(
            r#"<table><tr><th colspan="2">h</th></tr><tr><td>1</td><td rowspan="3">2</td></tr></table>"#,
        );
        let rows = table.rows();
        assert_eq!(rows.len(), 2);

        let head = table.cells(rows[0]);
        assert_eq!(head.len(), 1);
        assert_eq!(table.colspan(head[0]), 2);
        assert_eq!(table.rowspan(head[0]), 1);

        let body = table.cells(rows[1]);
        assert_eq!(table.rowspan(body[1]), 3);
        assert_eq!(table.text(body[1]), "2");
    }

    #[test]
    fn test_set_attr_and_escape() {
        let mut table = TableHtml::parse("<table><tr><td>a &amp; b</td></tr></table>");
        let cell = table.cells(table.rows()[0])[0];
        assert_eq!(table.text(cell), "a & b");

        table.set_attr(cell, "colspan", "4");
        assert_eq!(table.colspan(cell), 4);
        assert!(table
            .serialize()
            .contains(r#"<td colspan="4">a &amp; b</td>"#));
    }

    #[test]
    fn test_append_copy() {
        let mut t1 = TableHtml::parse("<table><tr><td>1</td></tr></table>");
        let t2 = TableHtml::parse("<table><tr><td>2</td></tr></table>");
        let tbody = t1.first_element("tbody").unwrap();
        t1.append_copy(tbody, &t2, t2.rows()[0]);

        assert_eq!(t1.rows().len(), 2);
        assert_eq!(
            t1.to_string(),
            "<table><tbody><tr><td>1</td></tr><tr><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_void_elements() {
        let table = TableHtml::parse("<table><tr><td>a<br>b</td></tr></table>");
        assert!(table.serialize().contains("<td>a<br>b</td>"));
    }

    #[test]
    fn test_parse_span() {
        assert_eq!(parse_span(None, 1), 1);
        assert_eq!(parse_span(Some("3"), 1), 3);
        assert_eq!(parse_span(Some(" 2px"), 1), 2);
        assert_eq!(parse_span(Some("x"), 1), 1);
        assert_eq!(parse_span(Some("0"), 1), 0);
        assert_eq!(parse_span(Some("18446744073709551615"), 1), MAX_SPAN);
        assert_eq!(parse_span(Some("99999999999999999999999"), 1), MAX_SPAN);
        assert_eq!(parse_span(Some("1001"), 1), MAX_SPAN);
    }

    #[test]
    fn test_attribute_order_is_stable() {
        let html = r#"<table><tr><td rowspan="2" colspan="3" class="x" id="c" title="t">a</td></tr></table>"#;
        let first = TableHtml::parse(html).serialize();
        assert!(first.contains(r#"<td rowspan="2" colspan="3" class="x" id="c" title="t">a</td>"#));
        for _ in 0..50 {
            assert_eq!(TableHtml::parse(html).serialize(), first);
        }
    }
}
