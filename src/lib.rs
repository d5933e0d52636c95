//! # vlmdoc
//!
//! Document reconstruction from vision-language layout detections.
//!
//! A page-understanding model reports each page as a bag of typed boxes
//! plus recognized text. This library turns that bag into a reading-order
//! page tree (the "middle document") and renders it as Markdown, HTML
//! tables and content lists.
//!
//! ## Quick Start
//!
//! ```
//! use vlmdoc::{Pipeline, RawPage};
//!
//! fn main() -> vlmdoc::Result<()> {
//!     let layout = "<|box_start|>100 100 900 150<|box_end|><|ref_start|>title<|ref_end|>\n\
//!                   <|box_start|>100 200 900 400<|box_end|><|ref_start|>text<|ref_end|>";
//!     let page = RawPage::new(layout, 612.0, 792.0)
//!         .with_contents(vec!["Introduction".to_string(), "Hello world.".to_string()]);
//!
//!     let result = Pipeline::new().run(&[page])?;
//!     assert_eq!(result.to_markdown()?, "# Introduction\n\nHello world.");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout parsing**: the model's box/ref token grammar, with parse statistics
//! - **Equation repair**: bracket, brace and delimiter normalization of LaTeX
//! - **Table decoding**: OTSL tokens to HTML with row and column spans
//! - **Structural assembly**: captions, footnotes and list items tied to their owners
//! - **Cross-page tables**: split tables stitched back together
//! - **Parallel processing**: pages are assembled with Rayon

pub mod assemble;
pub mod detect;
pub mod equation;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod render;
pub mod table;

// Re-export commonly used types
pub use assemble::{
    result_to_middle_json, CropRequest, ImageCutter, MiddleOptions, NoImageCutter, PageAssembler,
    PageInput,
};
pub use error::{Error, Result};
pub use model::{
    BBox, Block, BlockType, ContentBlock, Line, MiddleDocument, PageInfo, Span, SpanType,
};
pub use parser::{LayoutStats, PostProcessOptions};
pub use render::{
    ContentItem, ContentItemV2, JsonFormat, MakeMode, RenderOptions, RenderResult, UnionOutput,
};

use parser::{
    apply_extracted_contents, normalize_blocks_to_unit, parse_layout_detection_with_stats,
    post_process_blocks, DEFAULT_SKIP_TYPES,
};
use rayon::prelude::*;
use std::path::Path;

/// Raw recognition output for one page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPage {
    /// Layout text in the box/ref token grammar
    pub layout: String,
    /// Recognized content, one entry per block that is sent for recognition
    pub contents: Vec<String>,
    /// Page width in pixels
    pub width: f64,
    /// Page height in pixels
    pub height: f64,
    /// Digest of the page raster (see [`assemble::page_digest`])
    pub digest: Option<String>,
}

impl RawPage {
    /// Create a page from its layout text and size.
    pub fn new(layout: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            layout: layout.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the recognized contents.
    pub fn with_contents(mut self, contents: Vec<String>) -> Self {
        self.contents = contents;
        self
    }

    /// Set the raster digest.
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }
}

/// Builder for the full reconstruction pipeline.
///
/// # Example
///
/// ```
/// use vlmdoc::{MakeMode, Pipeline, RawPage, RenderOptions};
///
/// let page = RawPage::new(
///     "<|box_start|>0 0 500 500<|box_end|><|ref_start|>text<|ref_end|>",
///     100.0,
///     100.0,
/// )
/// .with_contents(vec!["body".to_string()]);
///
/// let result = Pipeline::new()
///     .with_render_options(RenderOptions::default().with_make_mode(MakeMode::NlpMarkdown))
///     .sequential()
///     .run(&[page])?;
/// assert_eq!(result.document().page_count(), 1);
/// # Ok::<(), vlmdoc::Error>(())
/// ```
pub struct Pipeline {
    post_process: PostProcessOptions,
    render_options: RenderOptions,
    parallel: bool,
    cutter: Box<dyn ImageCutter>,
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn new() -> Self {
        Self {
            post_process: PostProcessOptions::default(),
            render_options: RenderOptions::default(),
            parallel: true,
            cutter: Box::new(NoImageCutter),
        }
    }

    /// Set block post-processing options.
    pub fn with_post_process(mut self, options: PostProcessOptions) -> Self {
        self.post_process = options;
        self
    }

    /// Set render options; the table switches also control merging.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the image cutter used for image, table and equation crops.
    pub fn with_image_cutter(mut self, cutter: impl ImageCutter + 'static) -> Self {
        self.cutter = Box::new(cutter);
        self
    }

    fn middle_options(&self) -> MiddleOptions {
        MiddleOptions::from_render_options(&self.render_options).with_parallel(self.parallel)
    }

    /// Parse one page's layout text into post-processed detections.
    pub fn prepare_page(&self, page: &RawPage) -> (Vec<ContentBlock>, LayoutStats) {
        let parsed = parse_layout_detection_with_stats(&page.layout);
        let mut blocks = parsed.blocks;
        apply_extracted_contents(&mut blocks, &DEFAULT_SKIP_TYPES, page.contents.as_slice());
        (post_process_blocks(blocks, &self.post_process), parsed.stats)
    }

    /// Run the pipeline over raw pages.
    pub fn run(&self, pages: &[RawPage]) -> Result<PipelineResult> {
        self.render_options.validate()?;

        let prepared: Vec<(Vec<ContentBlock>, LayoutStats)> = if self.parallel {
            pages.par_iter().map(|page| self.prepare_page(page)).collect()
        } else {
            pages.iter().map(|page| self.prepare_page(page)).collect()
        };

        let mut layout_stats = Vec::with_capacity(pages.len());
        let inputs: Vec<PageInput> = prepared
            .into_iter()
            .zip(pages)
            .map(|((blocks, stats), page)| {
                layout_stats.push(stats);
                PageInput {
                    blocks,
                    width: page.width,
                    height: page.height,
                    digest: page.digest.clone(),
                }
            })
            .collect();

        let document = result_to_middle_json(&inputs, &self.middle_options(), self.cutter.as_ref());
        Ok(PipelineResult {
            document,
            layout_stats,
            render_options: self.render_options.clone(),
        })
    }

    /// Run the pipeline over already parsed detections.
    ///
    /// Boxes given in the 0-1000 grid are rescaled to unit space first.
    pub fn run_blocks(&self, mut pages: Vec<PageInput>) -> Result<PipelineResult> {
        self.render_options.validate()?;

        for page in &mut pages {
            normalize_blocks_to_unit(&mut page.blocks);
        }
        let document = result_to_middle_json(&pages, &self.middle_options(), self.cutter.as_ref());
        Ok(PipelineResult {
            document,
            layout_stats: Vec::new(),
            render_options: self.render_options.clone(),
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of running the pipeline.
pub struct PipelineResult {
    /// The assembled document
    pub document: MiddleDocument,
    /// Layout parse counters per page (empty for [`Pipeline::run_blocks`])
    pub layout_stats: Vec<LayoutStats>,
    /// Render options to use
    render_options: RenderOptions,
}

impl PipelineResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document.pdf_info, &self.render_options)
    }

    /// Convert to Markdown with statistics.
    pub fn to_markdown_with_stats(&self) -> Result<RenderResult> {
        render::to_markdown_with_stats(&self.document.pdf_info, &self.render_options)
    }

    /// Convert a single page to Markdown.
    pub fn page_markdown(&self, page_idx: usize) -> Result<String> {
        let page = self
            .document
            .page(page_idx)
            .ok_or(Error::PageOutOfRange(page_idx, self.document.page_count()))?;
        render::to_markdown(std::slice::from_ref(page), &self.render_options)
    }

    /// Convert to a flat content list.
    pub fn to_content_list(&self) -> Result<Vec<ContentItem>> {
        render::to_content_list(&self.document.pdf_info, &self.render_options)
    }

    /// Convert to a per-page content list.
    pub fn to_content_list_v2(&self) -> Result<Vec<Vec<ContentItemV2>>> {
        render::to_content_list_v2(&self.document.pdf_info, &self.render_options)
    }

    /// Render in the given mode.
    pub fn union_make(&self, mode: MakeMode) -> Result<UnionOutput> {
        render::union_make(&self.document.pdf_info, mode, &self.render_options)
    }

    /// Serialize the middle document to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Write the middle document as JSON to a file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P, format: JsonFormat) -> Result<()> {
        std::fs::write(path, self.to_json(format)?)?;
        Ok(())
    }

    /// Get the document.
    pub fn document(&self) -> &MiddleDocument {
        &self.document
    }

    /// Total number of layout lines dropped while parsing.
    pub fn skipped_lines(&self) -> usize {
        self.layout_stats.iter().map(LayoutStats::skipped).sum()
    }
}
