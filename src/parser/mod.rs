//! Layout parsing and per-page block post-processing.
//!
//! Turns the recognition model's raw layout text into [`ContentBlock`]s,
//! back-fills recognized content and prepares the blocks for page
//! assembly.
//!
//! [`ContentBlock`]: crate::model::ContentBlock

mod content;
mod layout;
mod options;
mod postprocess;

pub use content::{apply_extracted_contents, DEFAULT_SKIP_TYPES};
pub use layout::{
    normalize_blocks_to_unit, parse_layout_detection, parse_layout_detection_with_stats,
    LayoutParse, LayoutStats,
};
pub use options::PostProcessOptions;
pub use postprocess::{convert_table_to_html, parse_table_content, post_process_blocks};
