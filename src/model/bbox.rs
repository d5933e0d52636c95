//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle `(x0, y0, x1, y1)`.
///
/// Serialized as a plain `[x0, y0, x1, y1]` array. Producers keep
/// `x0 <= x1` and `y0 <= y1`; a zero-area box never leaves the layout
/// parser.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    /// Left edge
    pub x0: f64,
    /// Top edge
    pub y0: f64,
    /// Right edge
    pub x1: f64,
    /// Bottom edge
    pub y1: f64,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Box area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center point.
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Largest of the four coordinates.
    pub fn max_coord(&self) -> f64 {
        self.x0.max(self.y0).max(self.x1).max(self.y1)
    }

    /// True when the box has no area in at least one dimension.
    pub fn is_degenerate(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Divide every coordinate by `factor`.
    pub fn scaled_down(&self, factor: f64) -> Self {
        Self::new(
            self.x0 / factor,
            self.y0 / factor,
            self.x1 / factor,
            self.y1 / factor,
        )
    }

    /// Map a unit-space box onto a `width x height` pixel page.
    ///
    /// Coordinates are truncated toward zero and re-ordered so the result
    /// always satisfies `x0 <= x1`, `y0 <= y1`.
    pub fn to_pixels(&self, width: f64, height: f64) -> Self {
        let mut x0 = (self.x0 * width).trunc();
        let mut y0 = (self.y0 * height).trunc();
        let mut x1 = (self.x1 * width).trunc();
        let mut y1 = (self.y1 * height).trunc();
        if x1 < x0 {
            std::mem::swap(&mut x0, &mut x1);
        }
        if y1 < y0 {
            std::mem::swap(&mut y0, &mut y1);
        }
        Self::new(x0, y0, x1, y1)
    }

    /// Rescale a pixel box to the 0-1000 integer space of a page.
    pub fn to_thousandths(&self, page_width: f64, page_height: f64) -> [i64; 4] {
        let scale = |v: f64, dim: f64| (v * 1000.0 / dim).trunc() as i64;
        [
            scale(self.x0, page_width),
            scale(self.y0, page_height),
            scale(self.x1, page_width),
            scale(self.y1, page_height),
        ]
    }

    /// Coordinates as an array.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

impl From<[f64; 4]> for BBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        b.to_array()
    }
}
