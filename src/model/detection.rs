//! Raw detections as produced by the layout parser.

use super::{BBox, BlockType};
use serde::{Deserialize, Serialize};

/// One detected region before page assembly.
///
/// `bbox` is in unit space (`0..=1`) once it leaves the layout parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Detected type tag
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Region in unit space
    pub bbox: BBox,

    /// Rotation in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub angle: u16,

    /// Recognized content, filled after the layout pass
    #[serde(default)]
    pub content: Option<String>,

    /// Table HTML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Relative path of the saved crop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// Title level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
}

impl ContentBlock {
    /// Create a detection with no content.
    pub fn new(block_type: BlockType, bbox: BBox, angle: u16) -> Self {
        Self {
            block_type,
            bbox,
            angle,
            content: None,
            html: None,
            image_path: None,
            level: None,
        }
    }

    /// Set content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set table HTML.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Set the saved image path.
    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Set title level.
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// True when the block has non-blank content, html or an image path.
    pub fn has_payload(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
            || self.html.as_deref().is_some_and(|h| !h.is_empty())
            || self.image_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}
