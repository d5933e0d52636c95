//! Markdown output paired with block counts.

use serde::{Deserialize, Serialize};

use super::content_list::title_level;
use crate::model::{Block, BlockType};

/// Rendered Markdown and what went into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered Markdown
    pub content: String,

    /// Counts of emitted blocks
    pub stats: ExtractionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: ExtractionStats) -> Self {
        Self { content, stats }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Per-kind counts of the blocks a render emitted.
///
/// Only blocks that produced non-blank output are counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages visited
    pub page_count: u32,

    /// Text, reference and phonetic blocks, plus titles of level 0
    pub paragraph_count: u32,

    /// Titles rendered as `#` headings
    pub heading_count: u32,

    pub table_count: u32,

    pub image_count: u32,

    /// Interline equations
    pub equation_count: u32,

    /// Code and algorithm blocks
    pub code_block_count: u32,

    /// Members of list blocks
    pub list_item_count: u32,

    /// Non-whitespace characters in the output
    pub char_count: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one emitted top-level block.
    pub fn record_block(&mut self, block: &Block) {
        match block.block_type {
            BlockType::Title if title_level(block) > 0 => self.heading_count += 1,
            BlockType::Title | BlockType::Text | BlockType::RefText | BlockType::Phonetic => {
                self.paragraph_count += 1
            }
            BlockType::InterlineEquation => self.equation_count += 1,
            BlockType::List => self.list_item_count += block.blocks.len() as u32,
            BlockType::Image => self.image_count += 1,
            BlockType::Table => self.table_count += 1,
            BlockType::Code => self.code_block_count += 1,
            _ => {}
        }
    }

    /// Add the non-whitespace characters of `text`.
    pub fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn block(block_type: BlockType, level: Option<i32>) -> Block {
        let mut block = Block::leaf(block_type, BBox::new(0.0, 0.0, 1.0, 1.0), 0, 0, Vec::new());
        block.level = level;
        block
    }

    #[test]
    fn test_count_text() {
        let mut stats = ExtractionStats::new();
        stats.count_text("Hello, world!\n# T");
        assert_eq!(stats.char_count, 15);
    }

    #[test]
    fn test_record_block() {
        let mut stats = ExtractionStats::new();
        stats.record_block(&block(BlockType::Title, Some(2)));
        stats.record_block(&block(BlockType::Title, Some(0)));
        stats.record_block(&block(BlockType::RefText, None));
        stats.record_block(&block(BlockType::Header, None));

        let list = Block::container(
            BlockType::List,
            BBox::new(0.0, 0.0, 1.0, 1.0),
            0,
            vec![block(BlockType::Text, None), block(BlockType::Text, None)],
        );
        stats.record_block(&list);

        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.list_item_count, 2);
        assert_eq!(
            stats,
            ExtractionStats {
                heading_count: 1,
                paragraph_count: 2,
                list_item_count: 2,
                ..Default::default()
            }
        );
    }
}
