//! Rendering of middle documents to Markdown, content lists and JSON.

mod content_list;
mod json;
mod markdown;
mod options;
mod result;
mod text;

pub use content_list::{
    to_content_list, to_content_list_v2, ContentItem, ContentItemV2, ContentV2, ImageSource,
    ListItem, ListType, TableType,
};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::{
    DelimiterPair, LatexDelimiters, MakeMode, RenderOptions, FORMULA_ENABLE_ENV,
    TABLE_ENABLE_ENV, TABLE_MERGE_ENABLE_ENV,
};
pub use result::{ExtractionStats, RenderResult};
pub use text::{merge_para_with_text, merge_para_with_text_v2, InlineSpan, InlineType};

use crate::error::Result;
use crate::model::PageInfo;
use serde::Serialize;

/// Output of [`union_make`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UnionOutput {
    /// Markdown text (both Markdown modes)
    Markdown(String),
    /// Flat content list
    ContentList(Vec<ContentItem>),
    /// Per-page content list
    ContentListV2(Vec<Vec<ContentItemV2>>),
}

impl UnionOutput {
    /// The Markdown text, if this is Markdown output.
    pub fn as_markdown(&self) -> Option<&str> {
        match self {
            Self::Markdown(md) => Some(md),
            _ => None,
        }
    }
}

/// Render pages in the given mode.
///
/// `mode` overrides `options.make_mode`.
pub fn union_make(pages: &[PageInfo], mode: MakeMode, options: &RenderOptions) -> Result<UnionOutput> {
    let options = options.clone().with_make_mode(mode);
    Ok(match mode {
        MakeMode::MmMarkdown | MakeMode::NlpMarkdown => {
            UnionOutput::Markdown(to_markdown(pages, &options)?)
        }
        MakeMode::ContentList => UnionOutput::ContentList(to_content_list(pages, &options)?),
        MakeMode::ContentListV2 => UnionOutput::ContentListV2(to_content_list_v2(pages, &options)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Block, BlockType, Line, Span, SpanType};

    fn page() -> PageInfo {
        let bbox = BBox::new(0.0, 0.0, 50.0, 10.0);
        let span = Span::with_content(SpanType::Text, bbox, "hello");
        let mut page = PageInfo::new(0, 100, 100);
        page.para_blocks
            .push(Block::leaf(BlockType::Text, bbox, 0, 0, vec![Line::new(bbox, vec![span])]));
        page
    }

    #[test]
    fn test_union_make_modes() {
        let pages = [page(), PageInfo::new(1, 100, 100)];
        let options = RenderOptions::default();

        let md = union_make(&pages, MakeMode::MmMarkdown, &options).unwrap();
        assert_eq!(md.as_markdown(), Some("hello"));

        match union_make(&pages, MakeMode::ContentList, &options).unwrap() {
            UnionOutput::ContentList(items) => assert_eq!(items.len(), 1),
            other => panic!("unexpected output {:?}", other),
        }

        match union_make(&pages, MakeMode::ContentListV2, &options).unwrap() {
            UnionOutput::ContentListV2(pages) => {
                assert_eq!(pages.len(), 2);
                assert!(pages[1].is_empty());
            }
            other => panic!("unexpected output {:?}", other),
        }
    }
}
