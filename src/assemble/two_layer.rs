//! Grouping of bodies with their captions and footnotes.

use super::tie_up::{reduct_overlap, tie_up_by_index};
use crate::model::{Block, BlockType};
use std::collections::HashSet;

/// The three families of two-layer blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoLayerKind {
    Image,
    Table,
    Code,
}

impl TwoLayerKind {
    /// Type of the parent block.
    pub fn container_type(self) -> BlockType {
        match self {
            Self::Image => BlockType::Image,
            Self::Table => BlockType::Table,
            Self::Code => BlockType::Code,
        }
    }

    /// Type of the body child.
    pub fn body_type(self) -> BlockType {
        match self {
            Self::Image => BlockType::ImageBody,
            Self::Table => BlockType::TableBody,
            Self::Code => BlockType::CodeBody,
        }
    }

    /// Type of caption children.
    pub fn caption_type(self) -> BlockType {
        match self {
            Self::Image => BlockType::ImageCaption,
            Self::Table => BlockType::TableCaption,
            Self::Code => BlockType::CodeCaption,
        }
    }

    /// Type of footnote children; code blocks have none.
    pub fn footnote_type(self) -> Option<BlockType> {
        match self {
            Self::Image => Some(BlockType::ImageFootnote),
            Self::Table => Some(BlockType::TableFootnote),
            Self::Code => None,
        }
    }

    /// True for any of the member types.
    pub fn owns(self, block_type: &BlockType) -> bool {
        *block_type == self.body_type()
            || *block_type == self.caption_type()
            || self.footnote_type().as_ref() == Some(block_type)
    }
}

struct Group {
    body: Block,
    captions: Vec<Block>,
    footnotes: Vec<Block>,
}

fn of_type(blocks: &[Block], block_type: Option<BlockType>) -> Vec<Block> {
    match block_type {
        Some(t) => blocks.iter().filter(|b| b.block_type == t).cloned().collect(),
        None => Vec::new(),
    }
}

/// Footnotes that precede their body move to the closest other body at or
/// before them; footnotes with no such body are rejected.
fn rehome_misplaced_footnotes(groups: &mut [Group], rejected: &mut Vec<Block>) {
    let mut misplaced: Vec<(Block, usize)> = Vec::new();
    for (group_idx, group) in groups.iter_mut().enumerate() {
        let body_index = group.body.index;
        let (valid, early): (Vec<Block>, Vec<Block>) = std::mem::take(&mut group.footnotes)
            .into_iter()
            .partition(|f| f.index >= body_index);
        group.footnotes = valid;
        misplaced.extend(early.into_iter().map(|f| (f, group_idx)));
    }

    for (footnote, original) in misplaced {
        let best = groups
            .iter()
            .enumerate()
            .filter(|(idx, g)| *idx != original && g.body.index <= footnote.index)
            .min_by_key(|(_, g)| footnote.index - g.body.index)
            .map(|(idx, _)| idx);

        match best {
            Some(idx) => groups[idx].footnotes.push(footnote),
            None => rejected.push(footnote),
        }
    }
}

/// Keep the contiguous run of captions ending nearest the body.
///
/// A single-index gap is tolerated when the missing index is the body's own.
fn keep_contiguous_captions(group: &mut Group, rejected: &mut Vec<Block>) {
    if group.captions.is_empty() {
        return;
    }
    let body_index = group.body.index;
    let mut captions = std::mem::take(&mut group.captions);
    captions.sort_by(|a, b| b.index.cmp(&a.index));

    let mut cut = captions.len();
    for i in 1..captions.len() {
        let prev = captions[i - 1].index;
        let curr = captions[i].index;
        if curr + 1 == prev {
            continue;
        }
        let single_gap = curr + 2 == prev && curr + 1 == body_index;
        if !single_gap {
            cut = i;
            break;
        }
    }

    rejected.extend(captions.drain(cut..));
    captions.reverse();
    group.captions = captions;
}

/// Keep the contiguous run of footnotes starting at the lowest index.
fn keep_contiguous_footnotes(group: &mut Group, rejected: &mut Vec<Block>) {
    if group.footnotes.is_empty() {
        return;
    }
    let footnotes = &mut group.footnotes;
    footnotes.sort_by_key(|f| f.index);

    let cut = (1..footnotes.len())
        .find(|&i| footnotes[i].index != footnotes[i - 1].index + 1)
        .unwrap_or(footnotes.len());
    rejected.extend(footnotes.drain(cut..));
}

/// Build two-layer blocks of one kind from the page's member blocks.
///
/// Returns the two-layer blocks and the members left unattached, each
/// unattached block appearing once.
pub fn fix_two_layer(blocks: &[Block], kind: TwoLayerKind) -> (Vec<Block>, Vec<Block>) {
    let bodies = reduct_overlap(of_type(blocks, Some(kind.body_type())));
    let captions = reduct_overlap(of_type(blocks, Some(kind.caption_type())));
    let footnotes = reduct_overlap(of_type(blocks, kind.footnote_type()));

    let with_captions = tie_up_by_index(&bodies, &captions);
    let mut with_footnotes = tie_up_by_index(&bodies, &footnotes);

    let mut groups: Vec<Group> = with_captions
        .into_iter()
        .map(|entry| {
            let footnotes = with_footnotes
                .iter_mut()
                .find(|f| f.subject_idx == entry.subject_idx)
                .map(|f| std::mem::take(&mut f.objects))
                .unwrap_or_default();
            Group {
                body: entry.subject,
                captions: entry.objects,
                footnotes,
            }
        })
        .collect();

    let mut rejected: Vec<Block> = Vec::new();
    if kind != TwoLayerKind::Code {
        rehome_misplaced_footnotes(&mut groups, &mut rejected);
        for group in &mut groups {
            keep_contiguous_captions(group, &mut rejected);
            keep_contiguous_footnotes(group, &mut rejected);
        }
    }

    let mut processed: HashSet<usize> = HashSet::new();
    let fixed: Vec<Block> = groups
        .into_iter()
        .map(|group| {
            processed.insert(group.body.index);
            processed.extend(group.captions.iter().map(|c| c.index));
            processed.extend(group.footnotes.iter().map(|f| f.index));

            let bbox = group.body.bbox;
            let index = group.body.index;
            let mut children = vec![group.body];
            children.extend(group.captions);
            children.extend(group.footnotes);
            children.sort_by_key(|b| b.index);
            Block::container(kind.container_type(), bbox, index, children)
        })
        .collect();

    let mut not_included: Vec<Block> = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();
    for block in rejected {
        if seen.insert(block.index) {
            not_included.push(block);
        }
    }
    for block in blocks {
        if !processed.contains(&block.index) && seen.insert(block.index) {
            not_included.push(block.clone());
        }
    }

    (fixed, not_included)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn member(block_type: BlockType, index: usize, y0: f64) -> Block {
        Block::leaf(block_type, BBox::new(0.0, y0, 100.0, y0 + 10.0), 0, index, Vec::new())
    }

    fn child_indices(block: &Block) -> Vec<usize> {
        block.blocks.iter().map(|b| b.index).collect()
    }

    #[test]
    fn test_caption_and_footnote_attached() {
        let blocks = vec![
            member(BlockType::TableCaption, 0, 0.0),
            member(BlockType::TableBody, 1, 20.0),
            member(BlockType::TableFootnote, 2, 40.0),
        ];
        let (fixed, rest) = fix_two_layer(&blocks, TwoLayerKind::Table);

        assert!(rest.is_empty());
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].block_type, BlockType::Table);
        assert_eq!(fixed[0].index, 1);
        assert_eq!(child_indices(&fixed[0]), vec![0, 1, 2]);
    }

    #[test]
    fn test_misplaced_footnote_rehomed() {
        // The footnote at 3 is index-nearest to the body at 4, but precedes it.
        let blocks = vec![
            member(BlockType::ImageBody, 0, 0.0),
            member(BlockType::ImageFootnote, 3, 20.0),
            member(BlockType::ImageBody, 4, 40.0),
        ];
        let (fixed, rest) = fix_two_layer(&blocks, TwoLayerKind::Image);

        assert!(rest.is_empty());
        assert_eq!(child_indices(&fixed[0]), vec![0, 3]);
        assert_eq!(child_indices(&fixed[1]), vec![4]);
    }

    #[test]
    fn test_misplaced_footnote_without_home_rejected() {
        let blocks = vec![
            member(BlockType::ImageFootnote, 0, 0.0),
            member(BlockType::ImageBody, 1, 20.0),
        ];
        let (fixed, rest) = fix_two_layer(&blocks, TwoLayerKind::Image);

        assert_eq!(child_indices(&fixed[0]), vec![1]);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].index, 0);
    }

    #[test]
    fn test_caption_gap_breaks_run() {
        let blocks = vec![
            member(BlockType::TableCaption, 0, 0.0),
            member(BlockType::TableCaption, 2, 20.0),
            member(BlockType::TableCaption, 3, 40.0),
            member(BlockType::TableBody, 4, 60.0),
        ];
        let (fixed, rest) = fix_two_layer(&blocks, TwoLayerKind::Table);

        assert_eq!(child_indices(&fixed[0]), vec![2, 3, 4]);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].index, 0);
    }

    #[test]
    fn test_caption_gap_at_body_tolerated() {
        let blocks = vec![
            member(BlockType::ImageCaption, 0, 0.0),
            member(BlockType::ImageBody, 1, 20.0),
            member(BlockType::ImageCaption, 2, 40.0),
        ];
        let (fixed, rest) = fix_two_layer(&blocks, TwoLayerKind::Image);

        assert!(rest.is_empty());
        assert_eq!(child_indices(&fixed[0]), vec![0, 1, 2]);
    }

    #[test]
    fn test_contained_body_falls_out() {
        let outer = Block::leaf(BlockType::ImageBody, BBox::new(0.0, 0.0, 100.0, 100.0), 0, 0, Vec::new());
        let inner = Block::leaf(BlockType::ImageBody, BBox::new(10.0, 10.0, 20.0, 20.0), 0, 1, Vec::new());
        let (fixed, rest) = fix_two_layer(&[outer, inner], TwoLayerKind::Image);

        assert_eq!(fixed.len(), 1);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].index, 1);
    }

    #[test]
    fn test_code_keeps_all_captions() {
        let blocks = vec![
            member(BlockType::CodeCaption, 0, 0.0),
            member(BlockType::CodeBody, 1, 20.0),
            member(BlockType::CodeCaption, 3, 40.0),
        ];
        let (fixed, rest) = fix_two_layer(&blocks, TwoLayerKind::Code);

        assert!(rest.is_empty());
        assert_eq!(child_indices(&fixed[0]), vec![0, 1, 3]);
    }
}
