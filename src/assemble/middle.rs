//! Middle document construction.

use super::classify::PageAssembler;
use super::image::{CropRequest, ImageCutter};
use crate::model::{ContentBlock, MiddleDocument, PageInfo};
use crate::render::RenderOptions;
use crate::table::merge_tables;
use rayon::prelude::*;

/// One page of detections ready for assembly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageInput {
    /// Detections in unit space, in detection order
    pub blocks: Vec<ContentBlock>,
    /// Page width in pixels
    pub width: f64,
    /// Page height in pixels
    pub height: f64,
    /// Digest of the page raster, passed on to the image cutter
    pub digest: Option<String>,
}

impl PageInput {
    /// Create a page input without a raster digest.
    pub fn new(blocks: Vec<ContentBlock>, width: f64, height: f64) -> Self {
        Self {
            blocks,
            width,
            height,
            digest: None,
        }
    }

    /// Set the raster digest.
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }
}

/// Options for building a middle document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiddleOptions {
    /// Assemble pages in parallel
    pub parallel: bool,

    /// Tables are rendered as HTML (required for merging)
    pub table_enable: bool,

    /// Merge tables split across pages
    pub table_merge_enable: bool,
}

impl Default for MiddleOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            table_enable: true,
            table_merge_enable: true,
        }
    }
}

impl MiddleOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel page assembly.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enable or disable table HTML.
    pub fn with_tables(mut self, enable: bool) -> Self {
        self.table_enable = enable;
        self
    }

    /// Enable or disable cross-page table merging.
    pub fn with_table_merge(mut self, enable: bool) -> Self {
        self.table_merge_enable = enable;
        self
    }

    /// Take the table switches from render options.
    pub fn from_render_options(options: &RenderOptions) -> Self {
        Self::default()
            .with_tables(options.table_enable)
            .with_table_merge(options.table_merge_enable)
    }

    fn merges_tables(&self) -> bool {
        self.table_enable && self.table_merge_enable
    }
}

/// Assemble one page and crop its image, table and equation regions.
pub fn blocks_to_page_info(
    blocks: &[ContentBlock],
    width: f64,
    height: f64,
    page_idx: usize,
    digest: Option<&str>,
    cutter: &dyn ImageCutter,
) -> PageInfo {
    let mut page = PageAssembler::new(blocks, width, height);
    let page_digest = digest.unwrap_or_default();

    page.for_each_span_mut(|span| {
        if !span.span_type.needs_crop() {
            return;
        }
        let path = if span.bbox.is_degenerate() {
            None
        } else {
            cutter.cut(&CropRequest {
                span_type: span.span_type.clone(),
                bbox: span.bbox,
                page_idx,
                page_digest: page_digest.to_string(),
            })
        };
        span.image_path = Some(path.unwrap_or_default());
    });

    page.into_page_info(page_idx)
}

/// Build the middle document for a sequence of pages.
///
/// Pages are assembled independently (in parallel unless disabled); the
/// cross-page table merge then runs over the finished pages in order.
pub fn result_to_middle_json(
    pages: &[PageInput],
    options: &MiddleOptions,
    cutter: &dyn ImageCutter,
) -> MiddleDocument {
    let build = |(idx, input): (usize, &PageInput)| {
        blocks_to_page_info(
            &input.blocks,
            input.width,
            input.height,
            idx,
            input.digest.as_deref(),
            cutter,
        )
    };

    let mut doc = MiddleDocument::new();
    doc.pdf_info = if options.parallel {
        pages.par_iter().enumerate().map(build).collect()
    } else {
        pages.iter().enumerate().map(build).collect()
    };

    if options.merges_tables() {
        merge_tables(&mut doc.pdf_info);
    }

    log::debug!("assembled {} pages", doc.pdf_info.len());
    doc
}
