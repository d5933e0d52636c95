//! Page assembly: from unit-space detections to the middle document.
//!
//! Each page is classified on its own ([`PageAssembler`]); the resulting
//! pages are then stitched together by the cross-page table merge in
//! [`result_to_middle_json`].

mod classify;
mod image;
mod list;
mod middle;
mod spans;
mod tie_up;
mod two_layer;

pub use classify::PageAssembler;
pub use image::{crop_file_name, page_digest, CropRequest, ImageCutter, NoImageCutter};
pub use list::fix_list_blocks;
pub use middle::{blocks_to_page_info, result_to_middle_json, MiddleOptions, PageInput};
pub use tie_up::{reduct_overlap, tie_up_by_distance, tie_up_by_index, TieUp};
pub use two_layer::{fix_two_layer, TwoLayerKind};
