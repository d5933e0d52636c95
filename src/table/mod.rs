//! Table decoding and cross-page stitching.
//!
//! - [`convert_otsl_to_html`] decodes recognized OTSL token streams into
//!   HTML tables with row/column spans.
//! - [`TableHtml`] is the editable fragment the merger works on.
//! - [`merge_tables`] joins a table split by a page break back into one.

mod html;
mod merge;
mod otsl;

pub use html::{NodeId, TableHtml};
pub use merge::merge_tables;
pub use otsl::{convert_otsl_to_html, parse_otsl, TableCell, TableData};

/// Escape cell text for HTML output.
pub(crate) fn escape_html(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).replace('\'', "&#39;")
}
