//! Folding of text blocks into the list blocks that cover them.

use crate::geometry::overlap_ratio_in_bbox1;
use crate::model::Block;

/// Share of a text block's own area a list must cover to absorb it.
const LIST_COVER_THRESHOLD: f64 = 0.8;

/// Move every `text`/`ref_text` block covered by a list into that list.
///
/// Lists that absorb nothing are dropped. Each kept list gets the most
/// frequent member type as its `sub_type`, ties going to the type seen
/// first. Returns the kept lists and the remaining text and reference
/// blocks.
pub fn fix_list_blocks(
    mut lists: Vec<Block>,
    text_blocks: Vec<Block>,
    ref_text_blocks: Vec<Block>,
) -> (Vec<Block>, Vec<Block>, Vec<Block>) {
    for list in &mut lists {
        list.blocks.clear();
        list.lines.clear();
    }

    let mut absorb = |block: Block| -> Option<Block> {
        match lists
            .iter_mut()
            .find(|list| overlap_ratio_in_bbox1(&block.bbox, &list.bbox) >= LIST_COVER_THRESHOLD)
        {
            Some(list) => {
                list.blocks.push(block);
                None
            }
            None => Some(block),
        }
    };

    let text_blocks: Vec<Block> = text_blocks.into_iter().filter_map(&mut absorb).collect();
    let ref_text_blocks: Vec<Block> = ref_text_blocks.into_iter().filter_map(&mut absorb).collect();

    lists.retain(|list| !list.blocks.is_empty());
    for list in &mut lists {
        list.sub_type = Some(dominant_member_type(list));
    }

    (lists, text_blocks, ref_text_blocks)
}

fn dominant_member_type(list: &Block) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for member in &list.blocks {
        let tag = member.block_type.as_str();
        match counts.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, n)) => *n += 1,
            None => counts.push((tag, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (tag, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((tag, n));
        }
    }
    best.map_or_else(|| "unknown".to_string(), |(tag, _)| tag.to_string())
}
