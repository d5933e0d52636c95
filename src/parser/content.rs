//! Back-filling recognized content onto parsed blocks.

use crate::model::ContentBlock;

/// Block types that are never sent for content recognition.
pub const DEFAULT_SKIP_TYPES: [&str; 3] = ["image", "list", "equation_block"];

/// Assign recognition results to blocks in emission order.
///
/// Blocks whose type is in `skip_types` receive nothing; every other block
/// takes the next string from `contents`. Once `contents` is exhausted the
/// remaining blocks are left untouched.
pub fn apply_extracted_contents<S: AsRef<str>>(
    blocks: &mut [ContentBlock],
    skip_types: &[&str],
    contents: &[S],
) {
    let mut next = contents.iter();
    for block in blocks.iter_mut() {
        if skip_types.contains(&block.block_type.as_str()) {
            continue;
        }
        let Some(content) = next.next() else {
            break;
        };
        block.content = Some(content.as_ref().to_string());
    }
}
