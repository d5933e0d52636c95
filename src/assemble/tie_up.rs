//! Pairing of subjects (bodies) with objects (captions, footnotes).

use crate::geometry::{bbox_center_distance, bbox_distance, is_in};
use crate::model::Block;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A subject with the objects attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TieUp {
    /// The subject block
    pub subject: Block,
    /// Attached objects, in attachment order
    pub objects: Vec<Block>,
    /// Position of the subject in the input slice
    pub subject_idx: usize,
}

/// Drop every block whose box lies entirely inside another block's box.
///
/// Two blocks with identical boxes contain each other and are both dropped.
pub fn reduct_overlap(blocks: Vec<Block>) -> Vec<Block> {
    let keep: Vec<bool> = (0..blocks.len())
        .map(|i| {
            !(0..blocks.len()).any(|j| i != j && is_in(&blocks[i].bbox, &blocks[j].bbox))
        })
        .collect();

    blocks
        .into_iter()
        .zip(keep)
        .filter_map(|(block, keep)| keep.then_some(block))
        .collect()
}

fn materialize(subjects: &[Block], objects: &[Block], pairs: Vec<(usize, Vec<usize>)>) -> Vec<TieUp> {
    pairs
        .into_iter()
        .map(|(sub_idx, obj_idxs)| TieUp {
            subject: subjects[sub_idx].clone(),
            objects: obj_idxs.into_iter().map(|i| objects[i].clone()).collect(),
            subject_idx: sub_idx,
        })
        .collect()
}

/// Attach each object to the subject nearest in reading order.
///
/// Ties on index distance go to the subject whose center is closest; when
/// that ties too, the earlier subject wins. Every subject gets an entry,
/// in input order.
pub fn tie_up_by_index(subjects: &[Block], objects: &[Block]) -> Vec<TieUp> {
    let mut pairs: Vec<(usize, Vec<usize>)> = (0..subjects.len()).map(|i| (i, Vec::new())).collect();
    if subjects.is_empty() {
        return Vec::new();
    }

    for (obj_idx, object) in objects.iter().enumerate() {
        let mut min_diff = usize::MAX;
        let mut best: Vec<usize> = Vec::new();
        for (idx, subject) in subjects.iter().enumerate() {
            let diff = subject.index.abs_diff(object.index);
            match diff.cmp(&min_diff) {
                Ordering::Less => {
                    min_diff = diff;
                    best = vec![idx];
                }
                Ordering::Equal => best.push(idx),
                Ordering::Greater => {}
            }
        }

        let mut target = best[0];
        if best.len() > 1 {
            let mut min_dist = f64::INFINITY;
            for &idx in &best {
                let dist = bbox_center_distance(&subjects[idx].bbox, &object.bbox);
                if dist < min_dist {
                    min_dist = dist;
                    target = idx;
                }
            }
        }
        pairs[target].1.push(obj_idx);
    }

    materialize(subjects, objects, pairs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Subject,
    Object,
}

/// Pair subjects and objects by geometry alone.
///
/// Repeatedly takes the unpaired box closest to the top-left corner of the
/// remaining boxes and pairs it with the nearest box of the other kind. A
/// pair is rejected when its distance is at least three times the distance
/// from the object to its nearest subject. Objects left over are attached to
/// their nearest subject; subjects left over get an empty entry.
pub fn tie_up_by_distance(subjects: &[Block], objects: &[Block]) -> Vec<TieUp> {
    let bbox_of = |kind: Kind, idx: usize| match kind {
        Kind::Subject => &subjects[idx].bbox,
        Kind::Object => &objects[idx].bbox,
    };

    let all: Vec<(Kind, usize)> = (0..subjects.len())
        .map(|i| (Kind::Subject, i))
        .chain((0..objects.len()).map(|i| (Kind::Object, i)))
        .collect();

    let mut seen: HashSet<(Kind, usize)> = HashSet::new();
    let mut seen_subjects: HashSet<usize> = HashSet::new();
    let mut pairs: Vec<(usize, Vec<usize>)> = Vec::new();

    while subjects.len() > seen_subjects.len() {
        let mut candidates: Vec<(Kind, usize)> =
            all.iter().copied().filter(|c| !seen.contains(c)).collect();
        if candidates.is_empty() {
            break;
        }

        let left_x = candidates
            .iter()
            .map(|&(k, i)| bbox_of(k, i).x0)
            .fold(f64::INFINITY, f64::min);
        let top_y = candidates
            .iter()
            .map(|&(k, i)| bbox_of(k, i).y0)
            .fold(f64::INFINITY, f64::min);
        let corner_dist = |&(k, i): &(Kind, usize)| {
            let b = bbox_of(k, i);
            (b.x0 - left_x).powi(2) + (b.y0 - top_y).powi(2)
        };
        candidates.sort_by(|a, b| {
            corner_dist(a)
                .partial_cmp(&corner_dist(b))
                .unwrap_or(Ordering::Equal)
        });

        let (first_kind, first_idx) = candidates[0];
        let first_bbox = bbox_of(first_kind, first_idx);
        candidates.sort_by(|&(ka, ia), &(kb, ib)| {
            bbox_distance(first_bbox, bbox_of(ka, ia))
                .partial_cmp(&bbox_distance(first_bbox, bbox_of(kb, ib)))
                .unwrap_or(Ordering::Equal)
        });

        let Some(&(_, next_idx)) = candidates.iter().skip(1).find(|(k, _)| *k != first_kind) else {
            break;
        };

        let (sub_idx, obj_idx) = match first_kind {
            Kind::Subject => (first_idx, next_idx),
            Kind::Object => (next_idx, first_idx),
        };

        let pair_dis = bbox_distance(&subjects[sub_idx].bbox, &objects[obj_idx].bbox);
        let nearest_dis = subjects
            .iter()
            .map(|s| bbox_distance(&s.bbox, &objects[obj_idx].bbox))
            .fold(f64::INFINITY, f64::min);

        seen.insert((Kind::Subject, sub_idx));
        if pair_dis >= 3.0 * nearest_dis {
            continue;
        }

        seen.insert((Kind::Object, obj_idx));
        seen_subjects.insert(sub_idx);
        pairs.push((sub_idx, vec![obj_idx]));
    }

    for (obj_idx, object) in objects.iter().enumerate() {
        if !seen.insert((Kind::Object, obj_idx)) {
            continue;
        }

        let mut nearest_dis = f64::INFINITY;
        let mut nearest: Option<usize> = None;
        for (sub_idx, subject) in subjects.iter().enumerate() {
            let dist = bbox_distance(&object.bbox, &subject.bbox);
            if dist < nearest_dis {
                nearest_dis = dist;
                nearest = Some(sub_idx);
            }
        }
        let Some(sub_idx) = nearest else {
            continue;
        };

        if seen_subjects.contains(&sub_idx) {
            if let Some(entry) = pairs.iter_mut().find(|(s, _)| *s == sub_idx) {
                entry.1.push(obj_idx);
            }
        } else {
            pairs.push((sub_idx, vec![obj_idx]));
            seen_subjects.insert(sub_idx);
        }
    }

    for sub_idx in 0..subjects.len() {
        if !seen_subjects.contains(&sub_idx) {
            pairs.push((sub_idx, Vec::new()));
        }
    }

    materialize(subjects, objects, pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, BlockType};

    fn block(index: usize, x0: f64, y0: f64, x1: f64, y1: f64) -> Block {
        Block::leaf(BlockType::Text, BBox::new(x0, y0, x1, y1), 0, index, Vec::new())
    }

    #[test]
    fn test_reduct_overlap_keeps_maximal_boxes() {
        let kept = reduct_overlap(vec![
            block(0, 0.0, 0.0, 100.0, 100.0),
            block(1, 10.0, 10.0, 50.0, 50.0),
            block(2, 200.0, 0.0, 300.0, 100.0),
        ]);
        let indices: Vec<usize> = kept.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_reduct_overlap_drops_identical_pair() {
        let kept = reduct_overlap(vec![
            block(0, 0.0, 0.0, 10.0, 10.0),
            block(1, 0.0, 0.0, 10.0, 10.0),
        ]);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_tie_up_by_index_nearest() {
        let subjects = [block(2, 0.0, 0.0, 100.0, 100.0), block(8, 0.0, 300.0, 100.0, 400.0)];
        let objects = [block(1, 0.0, 0.0, 1.0, 1.0), block(9, 0.0, 0.0, 1.0, 1.0)];
        let result = tie_up_by_index(&subjects, &objects);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].objects[0].index, 1);
        assert_eq!(result[1].objects[0].index, 9);
    }

    #[test]
    fn test_tie_up_by_index_breaks_ties_by_center_distance() {
        // Body at index 5, footnotes at 4 and 6 tie on index distance.
        let subjects = [
            block(3, 0.0, 0.0, 100.0, 100.0),
            block(7, 0.0, 500.0, 100.0, 600.0),
        ];
        let objects = [block(5, 0.0, 450.0, 100.0, 480.0)];
        let result = tie_up_by_index(&subjects, &objects);

        assert!(result[0].objects.is_empty());
        assert_eq!(result[1].objects.len(), 1);
    }

    #[test]
    fn test_tie_up_by_index_no_subjects() {
        let objects = [block(0, 0.0, 0.0, 1.0, 1.0)];
        assert!(tie_up_by_index(&[], &objects).is_empty());
    }

    #[test]
    fn test_tie_up_by_distance_pairs_neighbors() {
        let subjects = [
            block(0, 0.0, 0.0, 100.0, 100.0),
            block(1, 0.0, 300.0, 100.0, 400.0),
        ];
        let objects = [
            block(2, 0.0, 110.0, 100.0, 120.0),
            block(3, 0.0, 410.0, 100.0, 420.0),
        ];
        let result = tie_up_by_distance(&subjects, &objects);

        assert_eq!(result.len(), 2);
        for entry in &result {
            assert_eq!(entry.objects.len(), 1);
            assert_eq!(entry.objects[0].index, entry.subject.index + 2);
        }
    }

    #[test]
    fn test_tie_up_by_distance_keeps_lonely_subject() {
        let subjects = [block(0, 0.0, 0.0, 100.0, 100.0)];
        let result = tie_up_by_distance(&subjects, &[]);
        assert_eq!(result.len(), 1);
        assert!(result[0].objects.is_empty());
    }
}
