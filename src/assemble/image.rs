//! Crop boundary for image, table and equation regions.
//!
//! Page assembly does not touch pixels. For every region that needs a crop
//! it asks an [`ImageCutter`] for a relative path and stores whatever comes
//! back in the span's `image_path`.

use crate::model::{BBox, SpanType};
use md5::{Digest, Md5};

/// A region of a page to crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRequest {
    /// Type of the span being cropped
    pub span_type: SpanType,
    /// Region in page pixel space
    pub bbox: BBox,
    /// Zero-based page index
    pub page_idx: usize,
    /// Digest of the page raster (see [`page_digest`])
    pub page_digest: String,
}

/// Produces crops for page regions.
pub trait ImageCutter: Send + Sync {
    /// Crop the region and return its relative path, or `None` when no
    /// crop was written.
    fn cut(&self, request: &CropRequest) -> Option<String>;
}

/// Cutter that never writes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageCutter;

impl ImageCutter for NoImageCutter {
    fn cut(&self, _request: &CropRequest) -> Option<String> {
        None
    }
}

impl<F> ImageCutter for F
where
    F: Fn(&CropRequest) -> Option<String> + Send + Sync,
{
    fn cut(&self, request: &CropRequest) -> Option<String> {
        self(request)
    }
}

/// Deterministic file name for a crop.
///
/// The name is the MD5 hex of
/// `{span_type}/{page_digest}_{page}_{x0}_{y0}_{x1}_{y1}` with `.jpg`
/// appended; coordinates are truncated to integers.
pub fn crop_file_name(request: &CropRequest) -> String {
    let b = &request.bbox;
    let key = format!(
        "{}/{}_{}_{}_{}_{}_{}",
        request.span_type,
        request.page_digest,
        request.page_idx,
        b.x0.trunc() as i64,
        b.y0.trunc() as i64,
        b.x1.trunc() as i64,
        b.y1.trunc() as i64
    );
    format!("{:x}.jpg", Md5::digest(key.as_bytes()))
}

/// Upper-case MD5 hex of a page raster.
pub fn page_digest(bytes: &[u8]) -> String {
    format!("{:X}", Md5::digest(bytes))
}
