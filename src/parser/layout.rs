//! Layout token parsing.
//!
//! The recognition model describes a page as one line per detected region:
//!
//! ```text
//! <|box_start|>x0 y0 x1 y1<|box_end|><|ref_start|>type<|ref_end|>tail
//! ```
//!
//! Coordinates are integers on a 0-1000 grid. Lines that do not match the
//! grammar, or whose box is out of range or has no area, are dropped and
//! counted in [`LayoutStats`].

use crate::model::{BBox, BlockType, ContentBlock};
use once_cell::sync::Lazy;
use regex::Regex;

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<\|box_start\|>([\d.]+)\s+([\d.]+)\s+([\d.]+)\s+([\d.]+)<\|box_end\|><\|ref_start\|>(\w+?)<\|ref_end\|>(.*)$",
    )
    .expect("static regex")
});

/// Rotation markers and the angle each one encodes.
const ANGLE_MARKERS: [(&str, u16); 4] = [
    ("<|rotate_up|>", 0),
    ("<|rotate_right|>", 90),
    ("<|rotate_down|>", 180),
    ("<|rotate_left|>", 270),
];

/// Size of the model's coordinate grid.
const GRID: f64 = 1000.0;

/// Counters describing one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Non-blank input lines
    pub total_lines: usize,
    /// Lines that produced a block
    pub parsed: usize,
    /// Lines that did not match the grammar
    pub skipped_unmatched: usize,
    /// Lines with a coordinate outside `0..=1000`
    pub skipped_out_of_range: usize,
    /// Lines whose box has zero width or height
    pub skipped_degenerate: usize,
}

impl LayoutStats {
    /// Total number of dropped lines.
    pub fn skipped(&self) -> usize {
        self.skipped_unmatched + self.skipped_out_of_range + self.skipped_degenerate
    }
}

/// Blocks plus the counters of the parse that produced them.
#[derive(Debug, Clone, Default)]
pub struct LayoutParse {
    /// Parsed blocks in emission order
    pub blocks: Vec<ContentBlock>,
    /// Parse counters
    pub stats: LayoutStats,
}

enum BoxOutcome {
    Valid(BBox),
    OutOfRange,
    Degenerate,
}

fn convert_bbox(coords: [f64; 4]) -> BoxOutcome {
    if coords.iter().any(|&c| !(0.0..=GRID).contains(&c)) {
        return BoxOutcome::OutOfRange;
    }

    let [mut x0, mut y0, mut x1, mut y1] = coords;
    if x1 < x0 {
        std::mem::swap(&mut x0, &mut x1);
    }
    if y1 < y0 {
        std::mem::swap(&mut y0, &mut y1);
    }
    if x0 == x1 || y0 == y1 {
        return BoxOutcome::Degenerate;
    }

    BoxOutcome::Valid(BBox::new(x0, y0, x1, y1).scaled_down(GRID))
}

fn parse_angle(tail: &str) -> u16 {
    ANGLE_MARKERS
        .iter()
        .find(|(marker, _)| tail.contains(marker))
        .map(|&(_, angle)| angle)
        .unwrap_or(0)
}

/// Parse a coordinate capture, truncating toward zero.
///
/// The grammar admits things like `1.2.3`; those fail to parse and are
/// treated as out of range.
fn parse_coord(raw: &str) -> f64 {
    raw.parse::<f64>().map(f64::trunc).unwrap_or(f64::NAN)
}

/// Parse layout output into blocks, keeping the parse counters.
pub fn parse_layout_detection_with_stats(raw: &str) -> LayoutParse {
    let mut parse = LayoutParse::default();

    for line in raw.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        parse.stats.total_lines += 1;

        let Some(caps) = LINE_PATTERN.captures(line) else {
            parse.stats.skipped_unmatched += 1;
            continue;
        };

        let coords = [
            parse_coord(&caps[1]),
            parse_coord(&caps[2]),
            parse_coord(&caps[3]),
            parse_coord(&caps[4]),
        ];
        let bbox = match convert_bbox(coords) {
            BoxOutcome::Valid(bbox) => bbox,
            BoxOutcome::OutOfRange => {
                parse.stats.skipped_out_of_range += 1;
                continue;
            }
            BoxOutcome::Degenerate => {
                parse.stats.skipped_degenerate += 1;
                continue;
            }
        };

        let block_type = BlockType::from_tag(&caps[5]);
        let angle = parse_angle(&caps[6]);
        parse.blocks.push(ContentBlock::new(block_type, bbox, angle));
        parse.stats.parsed += 1;
    }

    if parse.stats.skipped() > 0 {
        log::debug!(
            "layout parse: {} of {} lines dropped ({} unmatched, {} out of range, {} degenerate)",
            parse.stats.skipped(),
            parse.stats.total_lines,
            parse.stats.skipped_unmatched,
            parse.stats.skipped_out_of_range,
            parse.stats.skipped_degenerate
        );
    }

    parse
}

/// Parse layout output into blocks.
///
/// # Example
/// ```
/// use vlmdoc::parser::parse_layout_detection;
///
/// let raw = "<|box_start|>0 0 500 500<|box_end|><|ref_start|>text<|ref_end|>";
/// let blocks = parse_layout_detection(raw);
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].bbox.x1, 0.5);
/// ```
pub fn parse_layout_detection(raw: &str) -> Vec<ContentBlock> {
    parse_layout_detection_with_stats(raw).blocks
}

/// Bring boxes expressed on the 0-1000 grid back to unit space.
///
/// A block is rescaled when its largest coordinate exceeds 1.5; blocks that
/// are already in unit space are left alone.
pub fn normalize_blocks_to_unit(blocks: &mut [ContentBlock]) {
    for block in blocks.iter_mut() {
        if block.bbox.max_coord() > 1.5 {
            block.bbox = block.bbox.scaled_down(GRID);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(coords: &str, tag: &str, tail: &str) -> String {
        format!("<|box_start|>{coords}<|box_end|><|ref_start|>{tag}<|ref_end|>{tail}")
    }

    #[test]
    fn test_two_text_blocks() {
        let raw = format!(
            "{}\n{}",
            line("0 0 500 500", "text", ""),
            line("500 500 1000 1000", "text", "")
        );
        let blocks = parse_layout_detection(&raw);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].bbox, BBox::new(0.0, 0.0, 0.5, 0.5));
        assert_eq!(blocks[1].bbox, BBox::new(0.5, 0.5, 1.0, 1.0));
        assert!(blocks.iter().all(|b| b.block_type == BlockType::Text));
        assert!(blocks.iter().all(|b| b.content.is_none()));
    }

    #[test]
    fn test_recovers_integer_coordinates() {
        let blocks = parse_layout_detection(&line("12 34 567 890", "title", ""));
        let b = blocks[0].bbox;
        let back = [b.x0, b.y0, b.x1, b.y1].map(|v| (v * 1000.0).round() as i64);
        assert_eq!(back, [12, 34, 567, 890]);
    }

    #[test]
    fn test_rejects_out_of_range_and_degenerate() {
        let raw = [
            line("0 0 1001 10", "text", ""),
            line("10 10 10 50", "text", ""),
            line("10 10 50 10", "text", ""),
            "garbage".to_string(),
            String::new(),
            line("10 10 50 50", "text", ""),
        ]
        .join("\n");
        let parse = parse_layout_detection_with_stats(&raw);

        assert_eq!(parse.blocks.len(), 1);
        assert_eq!(parse.stats.total_lines, 5);
        assert_eq!(parse.stats.parsed, 1);
        assert_eq!(parse.stats.skipped_out_of_range, 1);
        assert_eq!(parse.stats.skipped_degenerate, 2);
        assert_eq!(parse.stats.skipped_unmatched, 1);
        assert_eq!(parse.stats.skipped(), 4);
    }

    #[test]
    fn test_swaps_reversed_coordinates() {
        let blocks = parse_layout_detection(&line("800 900 200 100", "image", ""));
        assert_eq!(blocks[0].bbox, BBox::new(0.2, 0.1, 0.8, 0.9));
    }

    #[test]
    fn test_truncates_decimal_coordinates() {
        let blocks = parse_layout_detection(&line("10.9 20.2 30.7 40.5", "text", ""));
        assert_eq!(blocks[0].bbox, BBox::new(0.01, 0.02, 0.03, 0.04));
    }

    #[test]
    fn test_angle_and_case() {
        let raw = [
            line("0 0 10 10", "TABLE", "<|rotate_left|>"),
            line("0 0 10 10", "text", "<|rotate_down|>"),
            line("0 0 10 10", "text", "<|rotate_right|>"),
            line("0 0 10 10", "text", "no marker"),
        ]
        .join("\n");
        let blocks = parse_layout_detection(&raw);

        assert_eq!(blocks[0].block_type, BlockType::Table);
        assert_eq!(blocks[0].angle, 270);
        assert_eq!(blocks[1].angle, 180);
        assert_eq!(blocks[2].angle, 90);
        assert_eq!(blocks[3].angle, 0);
    }

    #[test]
    fn test_unknown_tag_kept() {
        let blocks = parse_layout_detection(&line("0 0 10 10", "sidebar", ""));
        assert_eq!(blocks[0].block_type, BlockType::Other("sidebar".to_string()));
    }

    #[test]
    fn test_normalize_blocks_to_unit() {
        let mut blocks = vec![
            ContentBlock::new(BlockType::Text, BBox::new(100.0, 200.0, 300.0, 400.0), 0),
            ContentBlock::new(BlockType::Text, BBox::new(0.1, 0.2, 0.3, 0.4), 0),
        ];
        normalize_blocks_to_unit(&mut blocks);

        assert_eq!(blocks[0].bbox, BBox::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(blocks[1].bbox, BBox::new(0.1, 0.2, 0.3, 0.4));
    }
}
