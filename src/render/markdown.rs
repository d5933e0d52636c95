//! Markdown rendering for middle documents.

use crate::error::Result;
use crate::model::{Block, BlockType, PageInfo, SpanType};

use super::content_list::title_level;
use super::text::merge_para_with_text;
use super::{ExtractionStats, MakeMode, RenderOptions, RenderResult};

/// Convert pages to Markdown.
///
/// Uses text-only output when `options.make_mode` is
/// [`MakeMode::NlpMarkdown`], multimodal output otherwise.
pub fn to_markdown(pages: &[PageInfo], options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(pages)
}

/// Convert pages to Markdown with statistics.
pub fn to_markdown_with_stats(pages: &[PageInfo], options: &RenderOptions) -> Result<RenderResult> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render_with_stats(pages)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    text_options: RenderOptions,
    stats: ExtractionStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        let text_options = options.text_defaults();
        Self {
            options,
            text_options,
            stats: ExtractionStats::new(),
        }
    }

    fn mode(&self) -> MakeMode {
        match self.options.make_mode {
            MakeMode::NlpMarkdown => MakeMode::NlpMarkdown,
            _ => MakeMode::MmMarkdown,
        }
    }

    /// Render pages to Markdown.
    pub fn render(mut self, pages: &[PageInfo]) -> Result<String> {
        self.options.validate()?;
        Ok(self.render_internal(pages))
    }

    /// Render pages to Markdown with extraction statistics.
    pub fn render_with_stats(mut self, pages: &[PageInfo]) -> Result<RenderResult> {
        self.options.validate()?;
        let content = self.render_internal(pages);
        self.stats.count_text(&content);
        Ok(RenderResult::new(content, self.stats))
    }

    fn render_internal(&mut self, pages: &[PageInfo]) -> String {
        let mut paragraphs = Vec::new();
        for page in pages {
            self.stats.page_count += 1;
            paragraphs.extend(self.render_page(page));
        }
        paragraphs.join("\n\n")
    }

    /// Render one page's kept blocks; blank paragraphs are dropped.
    pub fn render_page(&mut self, page: &PageInfo) -> Vec<String> {
        let mut out = Vec::new();
        for block in &page.para_blocks {
            let Some(text) = self.render_block(block) else {
                continue;
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            self.stats.record_block(block);
            out.push(text.to_string());
        }
        out
    }

    fn merge(&self, block: &Block) -> String {
        merge_para_with_text(block, &self.options)
    }

    fn merge_plain(&self, block: &Block) -> String {
        merge_para_with_text(block, &self.text_options)
    }

    fn render_block(&self, block: &Block) -> Option<String> {
        let text = match block.block_type {
            BlockType::Text
            | BlockType::InterlineEquation
            | BlockType::Phonetic
            | BlockType::RefText => self.merge(block),
            BlockType::List => block
                .blocks
                .iter()
                .map(|item| format!("{}  \n", self.merge(item)))
                .collect(),
            BlockType::Title => {
                let level = title_level(block) as usize;
                format!("{} {}", "#".repeat(level), self.merge_plain(block))
            }
            BlockType::Image if self.mode() == MakeMode::NlpMarkdown => return None,
            BlockType::Image => self.render_image(block),
            BlockType::Table if self.mode() == MakeMode::NlpMarkdown => return None,
            BlockType::Table => self.render_table(block),
            BlockType::Code => self.render_code(block),
            _ => return None,
        };
        Some(text)
    }

    fn image_links(&self, block: &Block) -> String {
        let mut out = String::new();
        for body in block.children_of(BlockType::ImageBody) {
            for span in body.spans().filter(|s| s.span_type == SpanType::Image) {
                if let Some(path) = span.image_path.as_deref().filter(|p| !p.is_empty()) {
                    out.push_str(&format!("![]({})", self.options.image_link(path)));
                }
            }
        }
        out
    }

    fn render_image(&self, block: &Block) -> String {
        let mut out = String::new();
        if block.has_child(BlockType::ImageFootnote) {
            for caption in block.children_of(BlockType::ImageCaption) {
                out.push_str(&format!("{}  \n", self.merge_plain(caption)));
            }
            out.push_str(&self.image_links(block));
            for footnote in block.children_of(BlockType::ImageFootnote) {
                out.push_str(&format!("  \n{}", self.merge_plain(footnote)));
            }
        } else {
            out.push_str(&self.image_links(block));
            for caption in block.children_of(BlockType::ImageCaption) {
                out.push_str(&format!("  \n{}", self.merge_plain(caption)));
            }
        }
        out
    }

    fn render_table(&self, block: &Block) -> String {
        let mut out = String::new();
        for caption in block.children_of(BlockType::TableCaption) {
            out.push_str(&format!("{}  \n", self.merge_plain(caption)));
        }
        for body in block.children_of(BlockType::TableBody) {
            for span in body.spans().filter(|s| s.span_type == SpanType::Table) {
                let html = span.html.as_deref().filter(|h| !h.is_empty());
                let path = span.image_path.as_deref().filter(|p| !p.is_empty());
                match (self.options.table_enable, html, path) {
                    (true, Some(html), _) => out.push_str(&format!("\n{}\n", html)),
                    (_, _, Some(path)) => {
                        out.push_str(&format!("![]({})", self.options.image_link(path)))
                    }
                    _ => {}
                }
            }
        }
        for footnote in block.children_of(BlockType::TableFootnote) {
            out.push_str(&format!("\n{}  ", self.merge_plain(footnote)));
        }
        out
    }

    fn render_code(&self, block: &Block) -> String {
        let mut out = String::new();
        for caption in block.children_of(BlockType::CodeCaption) {
            out.push_str(&format!("{}  \n", self.merge_plain(caption)));
        }
        for body in block.children_of(BlockType::CodeBody) {
            match block.sub_type.as_deref() {
                Some("code") => out.push_str(&format!(
                    "```{}\n{}\n```",
                    block.guess_lang.as_deref().unwrap_or(""),
                    self.merge_plain(body)
                )),
                Some("algorithm") => out.push_str(&self.merge_plain(body)),
                _ => {}
            }
        }
        out
    }
}
