//! Document-level types.

use super::Block;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Backend tag written into every middle document.
pub const BACKEND_NAME: &str = "vlm";

/// Version string written into every middle document.
pub const VERSION_NAME: &str = "2.7.1";

/// One assembled page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Kept content, sorted by reading-order index
    pub para_blocks: Vec<Block>,

    /// Headers, footers, page numbers, aside text and page footnotes
    pub discarded_blocks: Vec<Block>,

    /// Page size in pixels `[width, height]`
    pub page_size: [u32; 2],

    /// Zero-based page index
    pub page_idx: usize,
}

impl PageInfo {
    /// Create an empty page.
    pub fn new(page_idx: usize, width: u32, height: u32) -> Self {
        Self {
            para_blocks: Vec::new(),
            discarded_blocks: Vec::new(),
            page_size: [width, height],
            page_idx,
        }
    }

    /// Page width in pixels.
    pub fn width(&self) -> f64 {
        f64::from(self.page_size[0])
    }

    /// Page height in pixels.
    pub fn height(&self) -> f64 {
        f64::from(self.page_size[1])
    }

    /// Check if the page has no kept content.
    pub fn is_empty(&self) -> bool {
        self.para_blocks.is_empty()
    }
}

/// The assembled document ("middle document").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiddleDocument {
    /// Pages in order
    pub pdf_info: Vec<PageInfo>,

    /// Backend tag
    #[serde(rename = "_backend")]
    pub backend: String,

    /// Version string
    #[serde(rename = "_version_name")]
    pub version_name: String,
}

impl MiddleDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            pdf_info: Vec::new(),
            backend: BACKEND_NAME.to_string(),
            version_name: VERSION_NAME.to_string(),
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pdf_info.len()
    }

    /// Get a page by zero-based index.
    pub fn page(&self, idx: usize) -> Option<&PageInfo> {
        self.pdf_info.get(idx)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pdf_info.is_empty()
    }

    /// Load a middle document from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for MiddleDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_document_field_names() {
        let mut doc = MiddleDocument::new();
        doc.pdf_info.push(PageInfo::new(0, 612, 792));

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_backend"], "vlm");
        assert_eq!(json["_version_name"], "2.7.1");
        assert_eq!(json["pdf_info"][0]["page_size"][0], 612);
        assert_eq!(json["pdf_info"][0]["page_idx"], 0);
    }

    #[test]
    fn test_from_json_round_trip() {
        let mut doc = MiddleDocument::new();
        doc.pdf_info.push(PageInfo::new(3, 100, 200));
        let json = serde_json::to_string(&doc).unwrap();

        let back = MiddleDocument::from_json(&json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.page(0).map(|p| p.page_idx), Some(3));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(MiddleDocument::from_json("not json").is_err());
    }
}
