//! Geometry primitives over axis-aligned boxes.

use crate::model::BBox;

/// True when all four edges of `inner` lie inside `outer`.
pub fn is_in(inner: &BBox, outer: &BBox) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Relative placement of `b2` with respect to `b1`: (left, right, bottom, top).
fn relative_pos(b1: &BBox, b2: &BBox) -> (bool, bool, bool, bool) {
    let left = b2.x1 < b1.x0;
    let right = b1.x1 < b2.x0;
    let bottom = b2.y1 < b1.y0;
    let top = b1.y1 < b2.y0;
    (left, right, bottom, top)
}

/// Edge-to-edge distance between two boxes; zero when they overlap.
pub fn bbox_distance(b1: &BBox, b2: &BBox) -> f64 {
    let dist = |p: (f64, f64), q: (f64, f64)| (p.0 - q.0).hypot(p.1 - q.1);
    match relative_pos(b1, b2) {
        (true, _, _, true) => dist((b1.x0, b1.y1), (b2.x1, b2.y0)),
        (true, _, true, _) => dist((b1.x0, b1.y0), (b2.x1, b2.y1)),
        (_, true, true, _) => dist((b1.x1, b1.y0), (b2.x0, b2.y1)),
        (_, true, _, true) => dist((b1.x1, b1.y1), (b2.x0, b2.y0)),
        (true, _, _, _) => b1.x0 - b2.x1,
        (_, true, _, _) => b2.x0 - b1.x1,
        (_, _, true, _) => b1.y0 - b2.y1,
        (_, _, _, true) => b2.y0 - b1.y1,
        _ => 0.0,
    }
}

/// Euclidean distance between box centers.
pub fn bbox_center_distance(b1: &BBox, b2: &BBox) -> f64 {
    let (c1x, c1y) = b1.center();
    let (c2x, c2y) = b2.center();
    (c1x - c2x).hypot(c1y - c2y)
}

/// Intersection area divided by the area of `bbox1`.
///
/// Returns 0 when the boxes do not touch or `bbox1` has no area.
pub fn overlap_ratio_in_bbox1(bbox1: &BBox, bbox2: &BBox) -> f64 {
    let x_left = bbox1.x0.max(bbox2.x0);
    let y_top = bbox1.y0.max(bbox2.y0);
    let x_right = bbox1.x1.min(bbox2.x1);
    let y_bottom = bbox1.y1.min(bbox2.y1);

    if x_right < x_left || y_bottom < y_top {
        return 0.0;
    }

    let area1 = bbox1.area();
    if area1 == 0.0 {
        return 0.0;
    }
    (x_right - x_left) * (y_bottom - y_top) / area1
}

/// Fraction of `inner`'s area covered by `outer`.
pub fn bbox_cover_ratio(outer: &BBox, inner: &BBox) -> f64 {
    let x_a = outer.x0.max(inner.x0);
    let y_a = outer.y0.max(inner.y0);
    let x_b = outer.x1.min(inner.x1);
    let y_b = outer.y1.min(inner.y1);
    let inter = (x_b - x_a).max(0.0) * (y_b - y_a).max(0.0);
    let area = inner.area().max(0.0);
    if area == 0.0 {
        return 0.0;
    }
    inter / area
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(x0: f64, y0: f64, x1: f64, y1: f64) -> BBox {
        BBox::new(x0, y0, x1, y1)
    }

    #[test]
    fn test_is_in() {
        assert!(is_in(&b(1.0, 1.0, 2.0, 2.0), &b(0.0, 0.0, 3.0, 3.0)));
        assert!(is_in(&b(0.0, 0.0, 3.0, 3.0), &b(0.0, 0.0, 3.0, 3.0)));
        assert!(!is_in(&b(0.0, 0.0, 3.0, 3.0), &b(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn test_bbox_distance_side_by_side() {
        assert_eq!(bbox_distance(&b(0.0, 0.0, 1.0, 1.0), &b(2.0, 0.0, 3.0, 1.0)), 1.0);
        assert_eq!(bbox_distance(&b(2.0, 0.0, 3.0, 1.0), &b(0.0, 0.0, 1.0, 1.0)), 1.0);
        assert_eq!(bbox_distance(&b(0.0, 0.0, 1.0, 1.0), &b(0.0, 3.0, 1.0, 4.0)), 2.0);
    }

    #[test]
    fn test_bbox_distance_diagonal() {
        let d = bbox_distance(&b(0.0, 0.0, 1.0, 1.0), &b(4.0, 5.0, 6.0, 6.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_distance_overlap_is_zero() {
        assert_eq!(bbox_distance(&b(0.0, 0.0, 2.0, 2.0), &b(1.0, 1.0, 3.0, 3.0)), 0.0);
    }

    #[test]
    fn test_center_distance() {
        let d = bbox_center_distance(&b(0.0, 0.0, 2.0, 2.0), &b(3.0, 4.0, 5.0, 6.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_ratio() {
        assert_eq!(overlap_ratio_in_bbox1(&b(0.0, 0.0, 2.0, 2.0), &b(1.0, 1.0, 3.0, 3.0)), 0.25);
        assert_eq!(overlap_ratio_in_bbox1(&b(0.0, 0.0, 1.0, 1.0), &b(2.0, 2.0, 3.0, 3.0)), 0.0);
        assert_eq!(overlap_ratio_in_bbox1(&b(1.0, 1.0, 1.0, 2.0), &b(0.0, 0.0, 3.0, 3.0)), 0.0);
    }

    #[test]
    fn test_cover_ratio_measures_inner() {
        let outer = b(0.0, 0.0, 10.0, 10.0);
        let inner = b(5.0, 5.0, 15.0, 15.0);
        assert_eq!(bbox_cover_ratio(&outer, &inner), 0.25);
        assert_eq!(bbox_cover_ratio(&outer, &b(1.0, 1.0, 2.0, 2.0)), 1.0);
    }
}
