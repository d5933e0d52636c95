//! Page tree types: blocks, lines and spans.

use super::BBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block type tag.
///
/// Tags are an open set: the recognizer may emit types this crate has never
/// seen, which are kept verbatim in [`BlockType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Text,
    Title,
    Image,
    ImageBody,
    ImageCaption,
    ImageFootnote,
    Table,
    TableBody,
    TableCaption,
    TableFootnote,
    Code,
    CodeBody,
    CodeCaption,
    Algorithm,
    Equation,
    EquationBlock,
    InterlineEquation,
    List,
    RefText,
    Phonetic,
    Header,
    Footer,
    PageNumber,
    AsideText,
    PageFootnote,
    /// Any tag outside the known set
    Other(String),
}

impl BlockType {
    /// Parse a tag. Matching is case-insensitive.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "title" => Self::Title,
            "image" => Self::Image,
            "image_body" => Self::ImageBody,
            "image_caption" => Self::ImageCaption,
            "image_footnote" => Self::ImageFootnote,
            "table" => Self::Table,
            "table_body" => Self::TableBody,
            "table_caption" => Self::TableCaption,
            "table_footnote" => Self::TableFootnote,
            "code" => Self::Code,
            "code_body" => Self::CodeBody,
            "code_caption" => Self::CodeCaption,
            "algorithm" => Self::Algorithm,
            "equation" => Self::Equation,
            "equation_block" => Self::EquationBlock,
            "interline_equation" => Self::InterlineEquation,
            "list" => Self::List,
            "ref_text" => Self::RefText,
            "phonetic" => Self::Phonetic,
            "header" => Self::Header,
            "footer" => Self::Footer,
            "page_number" => Self::PageNumber,
            "aside_text" => Self::AsideText,
            "page_footnote" => Self::PageFootnote,
            other => Self::Other(other.to_string()),
        }
    }

    /// The tag as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Title => "title",
            Self::Image => "image",
            Self::ImageBody => "image_body",
            Self::ImageCaption => "image_caption",
            Self::ImageFootnote => "image_footnote",
            Self::Table => "table",
            Self::TableBody => "table_body",
            Self::TableCaption => "table_caption",
            Self::TableFootnote => "table_footnote",
            Self::Code => "code",
            Self::CodeBody => "code_body",
            Self::CodeCaption => "code_caption",
            Self::Algorithm => "algorithm",
            Self::Equation => "equation",
            Self::EquationBlock => "equation_block",
            Self::InterlineEquation => "interline_equation",
            Self::List => "list",
            Self::RefText => "ref_text",
            Self::Phonetic => "phonetic",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::PageNumber => "page_number",
            Self::AsideText => "aside_text",
            Self::PageFootnote => "page_footnote",
            Self::Other(tag) => tag,
        }
    }

    /// Page furniture that ends up in `discarded_blocks`.
    pub fn is_discarded(&self) -> bool {
        matches!(
            self,
            Self::Header | Self::Footer | Self::PageNumber | Self::AsideText | Self::PageFootnote
        )
    }

    /// Types whose recognized content is carried as a single text span.
    pub fn carries_text_span(&self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::Title
                | Self::ImageCaption
                | Self::ImageFootnote
                | Self::TableCaption
                | Self::TableFootnote
                | Self::CodeCaption
                | Self::RefText
                | Self::Phonetic
                | Self::Header
                | Self::Footer
                | Self::PageNumber
                | Self::AsideText
                | Self::PageFootnote
                | Self::List
        )
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<BlockType> for String {
    fn from(t: BlockType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Span content type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpanType {
    Text,
    Image,
    Table,
    InlineEquation,
    InterlineEquation,
    /// Any other span tag
    Other(String),
}

impl SpanType {
    /// The tag as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Table => "table",
            Self::InlineEquation => "inline_equation",
            Self::InterlineEquation => "interline_equation",
            Self::Other(tag) => tag,
        }
    }

    /// True for spans that point at a cropped region of the page image.
    pub fn needs_crop(&self) -> bool {
        matches!(self, Self::Image | Self::Table | Self::InterlineEquation)
    }
}

impl From<String> for SpanType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => Self::Text,
            "image" => Self::Image,
            "table" => Self::Table,
            "inline_equation" => Self::InlineEquation,
            "interline_equation" => Self::InterlineEquation,
            _ => Self::Other(tag),
        }
    }
}

impl From<SpanType> for String {
    fn from(t: SpanType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for SpanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Span bounding box
    pub bbox: BBox,

    /// Content type
    #[serde(rename = "type")]
    pub span_type: SpanType,

    /// Recognized text or LaTeX
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Table HTML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Relative path of the cropped image, if one was saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

impl Span {
    /// Create a span with no content.
    pub fn new(span_type: SpanType, bbox: BBox) -> Self {
        Self {
            bbox,
            span_type,
            content: None,
            html: None,
            image_path: None,
        }
    }

    /// Create a span carrying text content.
    pub fn with_content(span_type: SpanType, bbox: BBox, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::new(span_type, bbox)
        }
    }

    /// Content as a string slice, empty when absent.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Per-line metadata attached to code bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineExtra {
    /// `code` or `algorithm`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,

    /// Guessed programming or natural language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess_lang: Option<String>,
}

/// A visual text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Line bounding box
    pub bbox: BBox,

    /// Spans in reading order
    pub spans: Vec<Span>,

    /// Optional metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<LineExtra>,
}

impl Line {
    /// Create a line from spans.
    pub fn new(bbox: BBox, spans: Vec<Span>) -> Self {
        Self {
            bbox,
            spans,
            extra: None,
        }
    }
}

/// A node in the page tree.
///
/// Leaf blocks carry `lines`; two-layer and list blocks carry child
/// `blocks`. The `index` is the block's position in the detection stream and
/// is the only ordering key downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block bounding box (page pixel space)
    pub bbox: BBox,

    /// Block type tag
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Rotation in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub angle: u16,

    /// Reading-order index
    pub index: usize,

    /// Lines of a leaf block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<Line>,

    /// Children of a container block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,

    /// List member type or code flavor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,

    /// Guessed code language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess_lang: Option<String>,

    /// Title level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,

    /// Set on footnotes moved here by a cross-page table merge
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cross_page: bool,

    /// Set on blocks whose content was merged into the previous page
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub lines_deleted: bool,
}

impl Block {
    /// Create a leaf block.
    pub fn leaf(block_type: BlockType, bbox: BBox, angle: u16, index: usize, lines: Vec<Line>) -> Self {
        Self {
            bbox,
            block_type,
            angle,
            index,
            lines,
            blocks: Vec::new(),
            sub_type: None,
            guess_lang: None,
            level: None,
            cross_page: false,
            lines_deleted: false,
        }
    }

    /// Create a container block.
    pub fn container(block_type: BlockType, bbox: BBox, index: usize, blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::leaf(block_type, bbox, 0, index, Vec::new())
        }
    }

    /// Iterate over every span of the block's own lines.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines.iter().flat_map(|line| line.spans.iter())
    }

    /// Children of the given type, in order.
    pub fn children_of(&self, block_type: BlockType) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().filter(move |b| b.block_type == block_type)
    }

    /// True if any child has the given type.
    pub fn has_child(&self, block_type: BlockType) -> bool {
        self.blocks.iter().any(|b| b.block_type == block_type)
    }

    /// First span of the first line, if any.
    pub fn first_span(&self) -> Option<&Span> {
        self.lines.first().and_then(|line| line.spans.first())
    }

    /// Mutable first span of the first line, if any.
    pub fn first_span_mut(&mut self) -> Option<&mut Span> {
        self.lines.first_mut().and_then(|line| line.spans.first_mut())
    }
}
