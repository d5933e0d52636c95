//! Rendering of assembled documents through the public API.

use std::collections::HashMap;

use vlmdoc::model::{BBox, BlockType, ContentBlock, MiddleDocument};
use vlmdoc::render::{ContentV2, TableType, TABLE_ENABLE_ENV};
use vlmdoc::{
    CropRequest, JsonFormat, MakeMode, PageInput, Pipeline, PipelineResult, RenderOptions,
    UnionOutput,
};

const TABLE_HTML: &str = "<table><tr><td>a</td><td>1</td></tr></table>";

fn block(block_type: BlockType, y0: f64, y1: f64) -> ContentBlock {
    ContentBlock::new(block_type, BBox::new(0.1, y0, 0.9, y1), 0)
}

fn report_page() -> PageInput {
    PageInput::new(
        vec![
            block(BlockType::Title, 0.05, 0.1)
                .with_content("Results")
                .with_level(2),
            block(BlockType::TableCaption, 0.12, 0.15).with_content("Table 1: Scores"),
            block(BlockType::Table, 0.16, 0.4).with_html(TABLE_HTML),
            block(BlockType::TableFootnote, 0.41, 0.44).with_content("n = 3"),
            block(BlockType::Equation, 0.5, 0.55).with_content(r"\[E=mc^2\]"),
            block(BlockType::Code, 0.6, 0.7).with_content("```\nprint(1)\n```"),
            block(BlockType::Text, 0.8, 0.85).with_content("Done."),
        ],
        1000.0,
        1000.0,
    )
}

fn render(options: RenderOptions) -> PipelineResult {
    Pipeline::new()
        .with_render_options(options.with_image_bucket("images"))
        .with_image_cutter(|_: &CropRequest| Some("crop.jpg".to_string()))
        .run_blocks(vec![report_page()])
        .unwrap()
}

#[test]
fn test_markdown_document() {
    let md = render(RenderOptions::default()).to_markdown().unwrap();

    assert!(md.starts_with("## Results\n\nTable 1: Scores   \n\n<table>"));
    assert!(md.contains(&format!("{}\n\nn = 3\n\n", TABLE_HTML)));
    assert!(md.contains("\n\n$$\nE=mc^2\n$$\n\n"));
    assert!(md.contains("\nprint(1) \n```"));
    assert!(md.ends_with("```\n\nDone."));
}

#[test]
fn test_disabled_formulas_and_tables_link_crops() {
    let result = render(RenderOptions::default().with_formula(false).with_tables(false));
    let md = result.to_markdown().unwrap();

    assert!(md.contains("Table 1: Scores   \n![](images/crop.jpg)\nn = 3"));
    assert!(md.contains("\n\n![](images/crop.jpg)\n\n"));
    assert!(!md.contains("$$"));
    assert!(!md.contains("<table>"));
}

#[test]
fn test_nlp_markdown_keeps_text_only() {
    let result = render(RenderOptions::default());
    let output = result.union_make(MakeMode::NlpMarkdown).unwrap();
    let md = output.as_markdown().unwrap();

    assert!(md.starts_with("## Results"));
    assert!(!md.contains("<table>"));
    assert!(!md.contains("Table 1"));
    assert!(md.contains("E=mc^2"));
    assert!(md.ends_with("Done."));
}

#[test]
fn test_page_markdown_matches_single_page_document() {
    let result = render(RenderOptions::default());
    assert_eq!(result.page_markdown(0).unwrap(), result.to_markdown().unwrap());
}

#[test]
fn test_markdown_stats() {
    let stats = render(RenderOptions::default())
        .to_markdown_with_stats()
        .unwrap()
        .stats;

    assert_eq!(stats.page_count, 1);
    assert_eq!(stats.heading_count, 1);
    assert_eq!(stats.table_count, 1);
    assert_eq!(stats.equation_count, 1);
    assert_eq!(stats.code_block_count, 1);
    assert_eq!(stats.paragraph_count, 1);
    assert_eq!(stats.image_count, 0);
}

#[test]
fn test_content_list_records() {
    let items = render(RenderOptions::default()).to_content_list().unwrap();
    let types: Vec<&str> = items.iter().map(|i| i.item_type.as_str()).collect();
    assert_eq!(types, ["text", "table", "equation", "code", "text"]);

    assert_eq!(items[0].text_level, Some(2));
    assert_eq!(items[0].bbox, [100, 50, 900, 100]);

    let table = &items[1];
    assert_eq!(table.table_body.as_deref(), Some(TABLE_HTML));
    assert_eq!(table.img_path.as_deref(), Some("images/crop.jpg"));
    assert_eq!(table.table_caption, Some(vec!["Table 1: Scores ".to_string()]));
    assert_eq!(table.table_footnote, Some(vec!["n = 3 ".to_string()]));

    assert_eq!(items[2].text.as_deref(), Some("$$\nE=mc^2\n$$"));
    assert_eq!(items[2].text_format.as_deref(), Some("latex"));

    assert_eq!(items[3].sub_type.as_deref(), Some("code"));
    assert_eq!(items[3].code_body.as_deref(), Some("print(1) "));
    assert!(items.iter().all(|i| i.page_idx == 0));
}

#[test]
fn test_content_list_v2_records() {
    let pages = render(RenderOptions::default()).to_content_list_v2().unwrap();
    assert_eq!(pages.len(), 1);
    let records = &pages[0];
    assert_eq!(records.len(), 5);

    match &records[0].content {
        ContentV2::Title { title_content, level } => {
            assert_eq!(*level, 2);
            assert_eq!(title_content[0].content, "Results ");
        }
        other => panic!("expected title, got {:?}", other),
    }

    match &records[1].content {
        ContentV2::Table {
            html,
            table_type,
            table_nest_level,
            image_source,
            ..
        } => {
            assert_eq!(html, TABLE_HTML);
            assert_eq!(*table_type, TableType::SimpleTable);
            assert_eq!(*table_nest_level, 1);
            assert_eq!(image_source.path, "images/crop.jpg");
        }
        other => panic!("expected table, got {:?}", other),
    }

    match &records[2].content {
        ContentV2::EquationInterline {
            math_content,
            math_type,
            ..
        } => {
            assert_eq!(math_content, "E=mc^2");
            assert_eq!(math_type, "latex");
        }
        other => panic!("expected equation, got {:?}", other),
    }

    assert!(matches!(records[3].content, ContentV2::Code { .. }));

    let json = serde_json::to_value(&records[4]).unwrap();
    assert_eq!(json["type"], "paragraph");
    assert_eq!(json["content"]["paragraph_content"][0]["type"], "text");
    assert_eq!(json["content"]["paragraph_content"][0]["content"], "Done. ");
    assert_eq!(json["bbox"], serde_json::json!([100, 800, 900, 850]));
}

#[test]
fn test_union_make_dispatches_on_mode() {
    let result = render(RenderOptions::default());

    match result.union_make(MakeMode::ContentList).unwrap() {
        UnionOutput::ContentList(items) => assert_eq!(items.len(), 5),
        other => panic!("unexpected output {:?}", other),
    }
    match result.union_make(MakeMode::ContentListV2).unwrap() {
        UnionOutput::ContentListV2(pages) => assert_eq!(pages[0].len(), 5),
        other => panic!("unexpected output {:?}", other),
    }
    assert_eq!(
        result.union_make(MakeMode::MmMarkdown).unwrap().as_markdown(),
        Some(result.to_markdown().unwrap().as_str())
    );
}

#[test]
fn test_make_mode_names() {
    assert_eq!("content_list_v2".parse::<MakeMode>().unwrap(), MakeMode::ContentListV2);
    assert_eq!("MM_MD".parse::<MakeMode>().unwrap(), MakeMode::MmMarkdown);
    assert!("html".parse::<MakeMode>().is_err());
    assert_eq!(MakeMode::NlpMarkdown.to_string(), "nlp_markdown");
}

#[test]
fn test_options_from_lookup_drive_rendering() {
    let env: HashMap<&str, &str> = [(TABLE_ENABLE_ENV, "false")].into_iter().collect();
    let options = RenderOptions::from_lookup(|name| env.get(name).map(|v| v.to_string())).unwrap();
    assert!(!options.table_enable);

    let md = render(options).to_markdown().unwrap();
    assert!(!md.contains("<table>"));
    assert!(md.contains("![](images/crop.jpg)"));
}

#[test]
fn test_json_output_round_trips() {
    let result = render(RenderOptions::default());

    let compact = result.to_json(JsonFormat::Compact).unwrap();
    assert!(compact.starts_with(r#"{"pdf_info":[{"#));
    assert!(!compact.contains('\n'));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("middle.json");
    result.save_json(&path, JsonFormat::Pretty).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();

    let restored = MiddleDocument::from_json(&saved).unwrap();
    assert_eq!(&restored, result.document());
}
