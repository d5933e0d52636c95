//! Document model types.
//!
//! This module defines the page tree that bridges layout detections and
//! rendered output: detections ([`ContentBlock`]) are assembled into
//! [`Block`]s grouped per [`PageInfo`] inside a [`MiddleDocument`].

mod bbox;
mod block;
mod detection;
mod document;

pub use bbox::BBox;
pub use block::{Block, BlockType, Line, LineExtra, Span, SpanType};
pub use detection::ContentBlock;
pub use document::{MiddleDocument, PageInfo, BACKEND_NAME, VERSION_NAME};
