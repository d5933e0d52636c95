//! Cross-page table merging through the middle document builder.

use vlmdoc::model::{BBox, Block, BlockType, ContentBlock, MiddleDocument};
use vlmdoc::{result_to_middle_json, MiddleOptions, NoImageCutter, PageInput};

const HEADER: &str = "<tr><th>H</th><th>V</th></tr>";

fn table_html(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(k, v)| format!("<tr><td>{}</td><td>{}</td></tr>", k, v))
        .collect();
    format!("<table>{}{}</table>", HEADER, body)
}

fn table(x0: f64, y0: f64, x1: f64, y1: f64, rows: &[(&str, &str)]) -> ContentBlock {
    ContentBlock::new(BlockType::Table, BBox::new(x0, y0, x1, y1), 0).with_html(table_html(rows))
}

fn text(block_type: BlockType, bbox: BBox, content: &str) -> ContentBlock {
    ContentBlock::new(block_type, bbox, 0).with_content(content)
}

fn page(blocks: Vec<ContentBlock>) -> PageInput {
    PageInput::new(blocks, 1000.0, 1000.0)
}

fn build(pages: &[PageInput], options: &MiddleOptions) -> MiddleDocument {
    result_to_middle_json(pages, options, &NoImageCutter)
}

fn body_html(block: &Block) -> &str {
    block
        .children_of(BlockType::TableBody)
        .find_map(|b| b.first_span())
        .and_then(|span| span.html.as_deref())
        .unwrap_or("")
}

fn last_table(doc: &MiddleDocument, page_idx: usize) -> &Block {
    let block = doc.pdf_info[page_idx].para_blocks.last().unwrap();
    assert_eq!(block.block_type, BlockType::Table);
    block
}

fn two_page_input() -> Vec<PageInput> {
    vec![
        page(vec![
            text(BlockType::Text, BBox::new(0.1, 0.1, 0.9, 0.2), "Intro"),
            table(0.1, 0.3, 0.9, 0.9, &[("a", "1")]),
        ]),
        page(vec![
            text(
                BlockType::TableCaption,
                BBox::new(0.1, 0.01, 0.9, 0.05),
                "Table 1 (continued)",
            ),
            table(0.1, 0.06, 0.9, 0.5, &[("b", "2")]),
            text(
                BlockType::TableFootnote,
                BBox::new(0.1, 0.51, 0.9, 0.55),
                "Source: survey",
            ),
        ]),
    ]
}

#[test]
fn test_continued_table_merges_into_previous_page() {
    let doc = build(&two_page_input(), &MiddleOptions::default());

    let merged = last_table(&doc, 0);
    assert_eq!(
        body_html(merged),
        "<table><tbody><tr><th>H</th><th>V</th></tr><tr><td>a</td><td>1</td></tr>\
         <tr><td>b</td><td>2</td></tr></tbody></table>"
    );

    let footnotes: Vec<&Block> = merged.children_of(BlockType::TableFootnote).collect();
    assert_eq!(footnotes.len(), 1);
    assert!(footnotes[0].cross_page);
}

#[test]
fn test_merged_away_table_is_emptied() {
    let doc = build(&two_page_input(), &MiddleOptions::default());

    let continued = doc.pdf_info[1].para_blocks.first().unwrap();
    assert_eq!(continued.block_type, BlockType::Table);
    assert!(!continued.blocks.is_empty());
    for child in &continued.blocks {
        assert!(child.lines.is_empty());
        assert!(child.lines_deleted);
    }

    let json = serde_json::to_string(&doc).unwrap();
    assert!(json.contains("\"lines_deleted\":true"));
    assert!(json.contains("\"cross_page\":true"));
}

#[test]
fn test_three_page_table_collapses_into_first() {
    let pages = vec![
        page(vec![table(0.1, 0.5, 0.9, 0.95, &[("a", "1")])]),
        page(vec![table(0.1, 0.05, 0.9, 0.95, &[("b", "2")])]),
        page(vec![table(0.1, 0.05, 0.9, 0.4, &[("c", "3")])]),
    ];
    let doc = build(&pages, &MiddleOptions::default());

    assert_eq!(
        body_html(last_table(&doc, 0)),
        "<table><tbody><tr><th>H</th><th>V</th></tr><tr><td>a</td><td>1</td></tr>\
         <tr><td>b</td><td>2</td></tr><tr><td>c</td><td>3</td></tr></tbody></table>"
    );
    assert!(doc.pdf_info[2].para_blocks[0]
        .blocks
        .iter()
        .all(|b| b.lines_deleted));
}

#[test]
fn test_width_mismatch_blocks_merge() {
    let pages = vec![
        page(vec![table(0.1, 0.3, 0.9, 0.9, &[("a", "1")])]),
        page(vec![table(0.1, 0.05, 0.5, 0.5, &[("b", "2")])]),
    ];
    let doc = build(&pages, &MiddleOptions::default());

    assert_eq!(body_html(last_table(&doc, 0)), table_html(&[("a", "1")]));
    assert!(doc.pdf_info[1].para_blocks[0]
        .blocks
        .iter()
        .all(|b| !b.lines_deleted));
}

#[test]
fn test_footnote_on_previous_table_blocks_merge() {
    let pages = vec![
        page(vec![
            table(0.1, 0.3, 0.9, 0.85, &[("a", "1")]),
            text(
                BlockType::TableFootnote,
                BBox::new(0.1, 0.86, 0.9, 0.9),
                "Note: end of table",
            ),
        ]),
        page(vec![table(0.1, 0.05, 0.9, 0.5, &[("b", "2")])]),
    ];
    let doc = build(&pages, &MiddleOptions::default());

    assert_eq!(body_html(last_table(&doc, 0)), table_html(&[("a", "1")]));
}

#[test]
fn test_unrelated_caption_blocks_merge() {
    let pages = vec![
        page(vec![table(0.1, 0.3, 0.9, 0.9, &[("a", "1")])]),
        page(vec![
            text(BlockType::TableCaption, BBox::new(0.1, 0.01, 0.9, 0.05), "Table 2"),
            table(0.1, 0.06, 0.9, 0.5, &[("b", "2")]),
        ]),
    ];
    let doc = build(&pages, &MiddleOptions::default());

    assert_eq!(body_html(last_table(&doc, 0)), table_html(&[("a", "1")]));
}

#[test]
fn test_merge_can_be_disabled() {
    let options = MiddleOptions::new().with_table_merge(false);
    let doc = build(&two_page_input(), &options);

    assert_eq!(body_html(last_table(&doc, 0)), table_html(&[("a", "1")]));
    assert_eq!(last_table(&doc, 0).children_of(BlockType::TableFootnote).count(), 0);

    let sequential = MiddleOptions::new().with_parallel(false).with_table_merge(false);
    assert_eq!(build(&two_page_input(), &sequential), doc);
}

#[test]
fn test_merged_span_attributes_serialize_stably() {
    let earlier = concat!(
        r#"<table><tr><th colspan="2" class="h" id="hd">H</th></tr>"#,
        r#"<tr><td rowspan="2" class="k" title="key">a</td><td>1</td></tr>"#,
        r#"<tr><td>1b</td></tr></table>"#,
    );
    let later = concat!(
        r#"<table><tr><th colspan="2" class="h" id="hd">H</th></tr>"#,
        r#"<tr><td>b</td><td colspan="1" rowspan="1" class="v" title="t">2</td></tr></table>"#,
    );
    let pages = || {
        vec![
            page(vec![ContentBlock::new(
                BlockType::Table,
                BBox::new(0.1, 0.3, 0.9, 0.9),
                0,
            )
            .with_html(earlier)]),
            page(vec![ContentBlock::new(
                BlockType::Table,
                BBox::new(0.1, 0.05, 0.9, 0.5),
                0,
            )
            .with_html(later)]),
        ]
    };

    let expected = concat!(
        r#"<table><tbody><tr><th colspan="2" class="h" id="hd">H</th></tr>"#,
        r#"<tr><td rowspan="2" class="k" title="key">a</td><td>1</td></tr>"#,
        r#"<tr><td>1b</td></tr>"#,
        r#"<tr><td>b</td><td colspan="1" rowspan="1" class="v" title="t">2</td></tr>"#,
        r#"</tbody></table>"#,
    );
    let first = build(&pages(), &MiddleOptions::default());
    assert_eq!(body_html(last_table(&first, 0)), expected);

    for _ in 0..20 {
        assert_eq!(build(&pages(), &MiddleOptions::default()), first);
    }
}

#[test]
fn test_huge_spans_do_not_abort_merge() {
    let earlier = r#"<table><tr><td rowspan="18446744073709551615">a</td><td>1</td></tr></table>"#;
    let later = r#"<table><tr><td colspan="18446744073709551615">b</td><td>2</td></tr></table>"#;
    let pages = vec![
        page(vec![
            ContentBlock::new(BlockType::Table, BBox::new(0.1, 0.3, 0.9, 0.9), 0).with_html(earlier),
        ]),
        page(vec![
            ContentBlock::new(BlockType::Table, BBox::new(0.1, 0.05, 0.9, 0.5), 0).with_html(later),
        ]),
    ];
    let doc = build(&pages, &MiddleOptions::default());

    let html = body_html(last_table(&doc, 0));
    assert!(html.contains(">a</td>"));
    assert!(html.contains(">b</td>"));
}
