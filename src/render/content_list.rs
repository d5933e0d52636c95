//! Content-list rendering.
//!
//! Version 1 is one flat record per block with its text already joined.
//! Version 2 groups records per page and keeps inline spans typed.

use super::text::{merge_para_with_text, merge_para_with_text_v2, InlineSpan};
use super::RenderOptions;
use crate::model::{Block, BlockType, PageInfo, SpanType};
use serde::{Deserialize, Serialize};

/// One record of a version 1 content list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Record type (`text`, `list`, `equation`, `image`, `table`, `code`,
    /// or the page-furniture block type)
    #[serde(rename = "type")]
    pub item_type: String,

    /// Joined text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Heading level of a title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_level: Option<i32>,

    /// Text encoding of an equation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_format: Option<String>,

    /// List member type or code flavor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,

    /// List members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_items: Option<Vec<String>>,

    /// Crop path (`{bucket}/{path}`), empty when none was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_caption: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_footnote: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_caption: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_footnote: Option<Vec<String>>,

    /// Table HTML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_caption: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_body: Option<String>,

    /// Guessed language of a code block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess_lang: Option<String>,

    /// Bbox in 0-1000 page space
    pub bbox: [i64; 4],

    /// Zero-based page index
    pub page_idx: usize,
}

impl ContentItem {
    fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            ..Self::default()
        }
    }
}

/// Crop reference in a version 2 record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    /// `{bucket}/{path}`
    pub path: String,
}

/// Table complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// No spans, no nesting
    SimpleTable,
    /// Row/column spans or a nested table
    ComplexTable,
}

/// Kind of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    TextList,
    ReferenceList,
}

/// One member of a version 2 list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Always `text`
    pub item_type: String,
    /// Member content
    pub item_content: Vec<InlineSpan>,
}

impl ListItem {
    fn text(item_content: Vec<InlineSpan>) -> Self {
        Self {
            item_type: "text".to_string(),
            item_content,
        }
    }
}

/// Typed payload of a version 2 record, serialized as
/// `{"type": ..., "content": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ContentV2 {
    PageHeader { page_header_content: Vec<InlineSpan> },
    PageFooter { page_footer_content: Vec<InlineSpan> },
    PageAsideText { page_aside_text_content: Vec<InlineSpan> },
    PageNumber { page_number_content: Vec<InlineSpan> },
    PageFootnote { page_footnote_content: Vec<InlineSpan> },
    Title {
        title_content: Vec<InlineSpan>,
        level: i32,
    },
    Paragraph { paragraph_content: Vec<InlineSpan> },
    EquationInterline {
        math_content: String,
        math_type: String,
        image_source: ImageSource,
    },
    Image {
        image_source: ImageSource,
        image_caption: Vec<InlineSpan>,
        image_footnote: Vec<InlineSpan>,
    },
    Table {
        image_source: ImageSource,
        table_caption: Vec<InlineSpan>,
        table_footnote: Vec<InlineSpan>,
        html: String,
        table_type: TableType,
        table_nest_level: u8,
    },
    Code {
        code_caption: Vec<InlineSpan>,
        code_content: Vec<InlineSpan>,
        code_language: String,
    },
    Algorithm {
        algorithm_caption: Vec<InlineSpan>,
        algorithm_content: Vec<InlineSpan>,
    },
    List {
        list_type: ListType,
        list_items: Vec<ListItem>,
    },
}

/// One record of a version 2 content list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItemV2 {
    #[serde(flatten)]
    pub content: ContentV2,

    /// Bbox in 0-1000 page space
    pub bbox: [i64; 4],
}

/// Title level clamped to `0..=4`; `0` means "not a heading".
pub(crate) fn title_level(block: &Block) -> i32 {
    match block.level.unwrap_or(1) {
        level if level > 4 => 4,
        level if level < 1 => 0,
        level => level,
    }
}

fn page_bbox(block: &Block, page: &PageInfo) -> [i64; 4] {
    block.bbox.to_thousandths(page.width(), page.height())
}

fn child_texts(block: &Block, child_type: BlockType, options: &RenderOptions) -> Vec<String> {
    block
        .children_of(child_type)
        .map(|child| merge_para_with_text(child, options))
        .collect()
}

fn child_spans(block: &Block, child_type: BlockType) -> Vec<InlineSpan> {
    block
        .children_of(child_type)
        .flat_map(merge_para_with_text_v2)
        .collect()
}

/// `(image_path, payload)` of the first body span that carries anything.
fn body_data(block: &Block) -> (String, String) {
    fn from_lines(block: &Block) -> (String, String) {
        for span in block.spans() {
            let path = span.image_path.clone().unwrap_or_default();
            match span.span_type {
                SpanType::Table => return (path, span.html.clone().unwrap_or_default()),
                SpanType::Image => return (path, String::new()),
                SpanType::InterlineEquation => return (path, span.text().to_string()),
                SpanType::Text => return (String::new(), span.text().to_string()),
                _ => {}
            }
        }
        (String::new(), String::new())
    }

    if block.blocks.is_empty() {
        return from_lines(block);
    }
    block
        .blocks
        .iter()
        .filter(|b| {
            matches!(
                b.block_type,
                BlockType::ImageBody | BlockType::TableBody | BlockType::CodeBody
            )
        })
        .map(from_lines)
        .find(|(path, data)| !path.is_empty() || !data.is_empty())
        .unwrap_or_default()
}

/// Build the version 1 record for one block. Unknown block types yield
/// `None`.
pub(crate) fn make_content_item(
    block: &Block,
    page: &PageInfo,
    options: &RenderOptions,
) -> Option<ContentItem> {
    let text_options = options.text_defaults();

    let mut item = match &block.block_type {
        BlockType::Text
        | BlockType::RefText
        | BlockType::Phonetic
        | BlockType::Header
        | BlockType::Footer
        | BlockType::PageNumber
        | BlockType::AsideText
        | BlockType::PageFootnote => ContentItem {
            text: Some(merge_para_with_text(block, &text_options)),
            ..ContentItem::new(block.block_type.as_str())
        },
        BlockType::List => ContentItem {
            sub_type: Some(block.sub_type.clone().unwrap_or_default()),
            list_items: Some(
                block
                    .blocks
                    .iter()
                    .map(|b| merge_para_with_text(b, &text_options))
                    .filter(|t| !t.trim().is_empty())
                    .collect(),
            ),
            ..ContentItem::new("list")
        },
        BlockType::Title => {
            let level = title_level(block);
            ContentItem {
                text: Some(merge_para_with_text(block, &text_options)),
                text_level: (level != 0).then_some(level),
                ..ContentItem::new("text")
            }
        }
        BlockType::InterlineEquation => ContentItem {
            text: Some(merge_para_with_text(block, &text_options)),
            text_format: Some("latex".to_string()),
            ..ContentItem::new("equation")
        },
        BlockType::Image => {
            let mut img_path = String::new();
            for body in block.children_of(BlockType::ImageBody) {
                for span in body.spans() {
                    match span.image_path.as_deref() {
                        Some(path) if span.span_type == SpanType::Image && !path.is_empty() => {
                            img_path = options.image_link(path);
                        }
                        _ => {}
                    }
                }
            }
            ContentItem {
                img_path: Some(img_path),
                image_caption: Some(child_texts(block, BlockType::ImageCaption, &text_options)),
                image_footnote: Some(child_texts(block, BlockType::ImageFootnote, &text_options)),
                ..ContentItem::new("image")
            }
        }
        BlockType::Table => {
            let mut img_path = String::new();
            let mut table_body = None;
            for body in block.children_of(BlockType::TableBody) {
                for span in body.spans().filter(|s| s.span_type == SpanType::Table) {
                    if let Some(html) = span.html.as_deref().filter(|h| !h.is_empty()) {
                        table_body = Some(html.to_string());
                    }
                    if let Some(path) = span.image_path.as_deref().filter(|p| !p.is_empty()) {
                        img_path = options.image_link(path);
                    }
                }
            }
            ContentItem {
                img_path: Some(img_path),
                table_caption: Some(child_texts(block, BlockType::TableCaption, &text_options)),
                table_footnote: Some(child_texts(block, BlockType::TableFootnote, &text_options)),
                table_body,
                ..ContentItem::new("table")
            }
        }
        BlockType::Code => {
            let mut item = ContentItem {
                sub_type: block.sub_type.clone(),
                code_caption: Some(child_texts(block, BlockType::CodeCaption, &text_options)),
                ..ContentItem::new("code")
            };
            for body in block.children_of(BlockType::CodeBody) {
                item.code_body = Some(merge_para_with_text(body, &text_options));
                if block.sub_type.as_deref() == Some("code") {
                    item.guess_lang = block.guess_lang.clone();
                }
            }
            item
        }
        other => {
            log::trace!("no content-list record for block type {}", other);
            return None;
        }
    };

    item.bbox = page_bbox(block, page);
    item.page_idx = page.page_idx;
    Some(item)
}

/// Build the version 2 record for one block. Unknown block types yield
/// `None`.
pub(crate) fn make_content_item_v2(
    block: &Block,
    page: &PageInfo,
    options: &RenderOptions,
) -> Option<ContentItemV2> {
    let content = match &block.block_type {
        BlockType::Header => ContentV2::PageHeader {
            page_header_content: merge_para_with_text_v2(block),
        },
        BlockType::Footer => ContentV2::PageFooter {
            page_footer_content: merge_para_with_text_v2(block),
        },
        BlockType::AsideText => ContentV2::PageAsideText {
            page_aside_text_content: merge_para_with_text_v2(block),
        },
        BlockType::PageNumber => ContentV2::PageNumber {
            page_number_content: merge_para_with_text_v2(block),
        },
        BlockType::PageFootnote => ContentV2::PageFootnote {
            page_footnote_content: merge_para_with_text_v2(block),
        },
        BlockType::Title => match title_level(block) {
            0 => ContentV2::Paragraph {
                paragraph_content: merge_para_with_text_v2(block),
            },
            level => ContentV2::Title {
                title_content: merge_para_with_text_v2(block),
                level,
            },
        },
        BlockType::Text | BlockType::Phonetic => ContentV2::Paragraph {
            paragraph_content: merge_para_with_text_v2(block),
        },
        BlockType::InterlineEquation => {
            let (image_path, math_content) = body_data(block);
            ContentV2::EquationInterline {
                math_content,
                math_type: "latex".to_string(),
                image_source: ImageSource {
                    path: options.image_link(&image_path),
                },
            }
        }
        BlockType::Image => {
            let (image_path, _) = body_data(block);
            ContentV2::Image {
                image_source: ImageSource {
                    path: options.image_link(&image_path),
                },
                image_caption: child_spans(block, BlockType::ImageCaption),
                image_footnote: child_spans(block, BlockType::ImageFootnote),
            }
        }
        BlockType::Table => {
            let (image_path, html) = body_data(block);
            let table_nest_level = if html.matches("<table").count() > 1 { 2 } else { 1 };
            let table_type = if html.contains("colspan")
                || html.contains("rowspan")
                || table_nest_level > 1
            {
                TableType::ComplexTable
            } else {
                TableType::SimpleTable
            };
            ContentV2::Table {
                image_source: ImageSource {
                    path: options.image_link(&image_path),
                },
                table_caption: child_spans(block, BlockType::TableCaption),
                table_footnote: child_spans(block, BlockType::TableFootnote),
                html,
                table_type,
                table_nest_level,
            }
        }
        BlockType::Code => {
            let caption = child_spans(block, BlockType::CodeCaption);
            let content = block
                .children_of(BlockType::CodeBody)
                .last()
                .map(merge_para_with_text_v2)
                .unwrap_or_default();
            match block.sub_type.as_deref() {
                Some("algorithm") => ContentV2::Algorithm {
                    algorithm_caption: caption,
                    algorithm_content: content,
                },
                Some("code") => ContentV2::Code {
                    code_caption: caption,
                    code_content: content,
                    code_language: block.guess_lang.clone().unwrap_or_else(|| "txt".to_string()),
                },
                other => {
                    log::trace!("no content-list v2 record for code sub-type {:?}", other);
                    return None;
                }
            }
        }
        BlockType::RefText => ContentV2::List {
            list_type: ListType::ReferenceList,
            list_items: vec![ListItem::text(merge_para_with_text_v2(block))],
        },
        BlockType::List => ContentV2::List {
            list_type: if block.sub_type.as_deref() == Some("ref_text") {
                ListType::ReferenceList
            } else {
                ListType::TextList
            },
            list_items: block
                .blocks
                .iter()
                .map(merge_para_with_text_v2)
                .filter(|spans| !spans.is_empty())
                .map(ListItem::text)
                .collect(),
        },
        other => {
            log::trace!("no content-list v2 record for block type {}", other);
            return None;
        }
    };

    Some(ContentItemV2 {
        content,
        bbox: page_bbox(block, page),
    })
}

/// Render pages as a version 1 content list (kept blocks, then discarded
/// blocks, per page).
pub fn to_content_list(pages: &[PageInfo], options: &RenderOptions) -> crate::Result<Vec<ContentItem>> {
    options.validate()?;
    Ok(pages
        .iter()
        .flat_map(|page| {
            page.para_blocks
                .iter()
                .chain(&page.discarded_blocks)
                .filter_map(move |block| make_content_item(block, page, options))
        })
        .collect())
}

/// Render pages as a version 2 content list: one array per page.
pub fn to_content_list_v2(
    pages: &[PageInfo],
    options: &RenderOptions,
) -> crate::Result<Vec<Vec<ContentItemV2>>> {
    options.validate()?;
    Ok(pages
        .iter()
        .map(|page| {
            page.para_blocks
                .iter()
                .chain(&page.discarded_blocks)
                .filter_map(|block| make_content_item_v2(block, page, options))
                .collect()
        })
        .collect())
}
