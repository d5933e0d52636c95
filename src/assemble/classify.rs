//! Per-page classification of detections into the page tree.

use super::list::fix_list_blocks;
use super::spans::{
    clean_content, code_content_clean, guess_code_lang, isolated_formula_clean, text_spans,
};
use super::two_layer::{fix_two_layer, TwoLayerKind};
use crate::model::{BBox, Block, BlockType, ContentBlock, Line, LineExtra, PageInfo, Span, SpanType};

/// Builds the block tree of one page.
///
/// Detections are scaled to page pixels, re-typed into span-bearing blocks
/// and sorted into role collections. Bodies are then grouped with their
/// captions and footnotes, text is folded into lists, and everything left
/// unattached becomes plain text.
#[derive(Debug, Clone, Default)]
pub struct PageAssembler {
    width: f64,
    height: f64,
    image_blocks: Vec<Block>,
    table_blocks: Vec<Block>,
    code_blocks: Vec<Block>,
    interline_equation_blocks: Vec<Block>,
    text_blocks: Vec<Block>,
    title_blocks: Vec<Block>,
    ref_text_blocks: Vec<Block>,
    phonetic_blocks: Vec<Block>,
    discarded_blocks: Vec<Block>,
    list_blocks: Vec<Block>,
}

fn single_line(block_type: BlockType, bbox: BBox, angle: u16, index: usize, spans: Vec<Span>) -> Block {
    Block::leaf(block_type, bbox, angle, index, vec![Line::new(bbox, spans)])
}

/// Scale one detection to pixels and give it its span structure.
fn build_block(detection: &ContentBlock, index: usize, width: f64, height: f64) -> Block {
    let bbox = detection.bbox.to_pixels(width, height);
    let angle = detection.angle;
    let content = detection.content.as_deref().unwrap_or("");

    match &detection.block_type {
        BlockType::Image => single_line(
            BlockType::ImageBody,
            bbox,
            angle,
            index,
            vec![Span::new(SpanType::Image, bbox)],
        ),
        BlockType::Table => {
            let mut span = Span::new(SpanType::Table, bbox);
            span.html = Some(
                detection
                    .html
                    .clone()
                    .or_else(|| detection.content.clone())
                    .unwrap_or_default(),
            );
            single_line(BlockType::TableBody, bbox, angle, index, vec![span])
        }
        BlockType::Equation => {
            let span = Span::with_content(
                SpanType::InterlineEquation,
                bbox,
                isolated_formula_clean(content),
            );
            single_line(BlockType::InterlineEquation, bbox, angle, index, vec![span])
        }
        BlockType::Code | BlockType::Algorithm => {
            let code = code_content_clean(content);
            let guess_lang = guess_code_lang(&code);
            let (spans, has_inline_math) = text_spans(&clean_content(&code), bbox);
            let sub_type = if detection.block_type == BlockType::Code && has_inline_math {
                "algorithm"
            } else {
                detection.block_type.as_str()
            };

            let mut line = Line::new(bbox, spans);
            line.extra = Some(LineExtra {
                sub_type: Some(sub_type.to_string()),
                guess_lang: Some(guess_lang),
            });
            Block::leaf(BlockType::CodeBody, bbox, angle, index, vec![line])
        }
        known if known.carries_text_span() => {
            let (spans, _) = text_spans(&clean_content(content), bbox);
            let mut block = single_line(known.clone(), bbox, angle, index, spans);
            if *known == BlockType::Title {
                block.level = detection.level;
            }
            block
        }
        unknown => {
            log::trace!("block {} of type {} kept as text", index, unknown);
            let (spans, _) = text_spans(&clean_content(content), bbox);
            single_line(BlockType::Text, bbox, angle, index, spans)
        }
    }
}

impl PageAssembler {
    /// Assemble a page from unit-space detections and the page size.
    ///
    /// The page size is truncated to whole pixels before scaling.
    pub fn new(detections: &[ContentBlock], width: f64, height: f64) -> Self {
        let width = width.trunc();
        let height = height.trunc();
        let mut page = Self {
            width,
            height,
            ..Self::default()
        };

        let mut image_members = Vec::new();
        let mut table_members = Vec::new();
        let mut code_members = Vec::new();
        for (index, detection) in detections.iter().enumerate() {
            let block = build_block(detection, index, width, height);
            let target = match &block.block_type {
                t if TwoLayerKind::Image.owns(t) => &mut image_members,
                t if TwoLayerKind::Table.owns(t) => &mut table_members,
                t if TwoLayerKind::Code.owns(t) => &mut code_members,
                BlockType::InterlineEquation => &mut page.interline_equation_blocks,
                BlockType::Text => &mut page.text_blocks,
                BlockType::Title => &mut page.title_blocks,
                BlockType::RefText => &mut page.ref_text_blocks,
                BlockType::Phonetic => &mut page.phonetic_blocks,
                BlockType::List => &mut page.list_blocks,
                t if t.is_discarded() => &mut page.discarded_blocks,
                _ => continue,
            };
            target.push(block);
        }

        let (lists, text, ref_text) = fix_list_blocks(
            std::mem::take(&mut page.list_blocks),
            std::mem::take(&mut page.text_blocks),
            std::mem::take(&mut page.ref_text_blocks),
        );
        page.list_blocks = lists;
        page.text_blocks = text;
        page.ref_text_blocks = ref_text;

        let (images, image_rest) = fix_two_layer(&image_members, TwoLayerKind::Image);
        let (tables, table_rest) = fix_two_layer(&table_members, TwoLayerKind::Table);
        let (mut codes, code_rest) = fix_two_layer(&code_members, TwoLayerKind::Code);
        for code in &mut codes {
            apply_code_flavor(code);
        }
        page.image_blocks = images;
        page.table_blocks = tables;
        page.code_blocks = codes;

        for mut block in image_rest.into_iter().chain(table_rest).chain(code_rest) {
            log::trace!(
                "unattached {} block {} degraded to text",
                block.block_type,
                block.index
            );
            block.block_type = BlockType::Text;
            page.text_blocks.push(block);
        }

        page
    }

    /// Page size in whole pixels.
    pub fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn image_blocks(&self) -> &[Block] {
        &self.image_blocks
    }

    pub fn table_blocks(&self) -> &[Block] {
        &self.table_blocks
    }

    pub fn code_blocks(&self) -> &[Block] {
        &self.code_blocks
    }

    pub fn interline_equation_blocks(&self) -> &[Block] {
        &self.interline_equation_blocks
    }

    pub fn text_blocks(&self) -> &[Block] {
        &self.text_blocks
    }

    pub fn title_blocks(&self) -> &[Block] {
        &self.title_blocks
    }

    pub fn ref_text_blocks(&self) -> &[Block] {
        &self.ref_text_blocks
    }

    pub fn phonetic_blocks(&self) -> &[Block] {
        &self.phonetic_blocks
    }

    pub fn list_blocks(&self) -> &[Block] {
        &self.list_blocks
    }

    /// Headers, footers, page numbers, aside text and page footnotes.
    pub fn discarded_blocks(&self) -> &[Block] {
        &self.discarded_blocks
    }

    /// Visit every span on the page, including those of child blocks.
    pub fn for_each_span_mut<F: FnMut(&mut Span)>(&mut self, mut f: F) {
        let groups = [
            &mut self.image_blocks,
            &mut self.table_blocks,
            &mut self.code_blocks,
            &mut self.interline_equation_blocks,
            &mut self.text_blocks,
            &mut self.title_blocks,
            &mut self.ref_text_blocks,
            &mut self.phonetic_blocks,
            &mut self.discarded_blocks,
            &mut self.list_blocks,
        ];
        for group in groups {
            for block in group.iter_mut() {
                visit_spans(block, &mut f);
            }
        }
    }

    /// Merge the role collections into reading order.
    pub fn into_page_info(self, page_idx: usize) -> PageInfo {
        let mut page = PageInfo::new(page_idx, self.width as u32, self.height as u32);

        let mut blocks: Vec<Block> = [
            self.image_blocks,
            self.table_blocks,
            self.code_blocks,
            self.ref_text_blocks,
            self.phonetic_blocks,
            self.title_blocks,
            self.text_blocks,
            self.interline_equation_blocks,
            self.list_blocks,
        ]
        .into_iter()
        .flatten()
        .collect();
        blocks.sort_by_key(|b| b.index);

        page.para_blocks = blocks;
        page.discarded_blocks = self.discarded_blocks;
        page
    }
}

fn visit_spans<F: FnMut(&mut Span)>(block: &mut Block, f: &mut F) {
    for line in &mut block.lines {
        for span in &mut line.spans {
            f(span);
        }
    }
    for child in &mut block.blocks {
        visit_spans(child, f);
    }
}

/// Lift the code flavor recorded on the body line onto the code block.
fn apply_code_flavor(code: &mut Block) {
    let mut flavor: Option<(Option<String>, Option<String>)> = None;
    for body in code.blocks.iter_mut().filter(|b| b.block_type == BlockType::CodeBody) {
        flavor = Some(match body.lines.first_mut() {
            Some(line) => {
                let extra = line.extra.take().unwrap_or_default();
                let guess_lang = match extra.sub_type.as_deref() {
                    Some("code") => extra.guess_lang,
                    _ => None,
                };
                (extra.sub_type, guess_lang)
            }
            None => (Some("code".to_string()), Some("txt".to_string())),
        });
    }
    if let Some((sub_type, guess_lang)) = flavor {
        code.sub_type = sub_type;
        code.guess_lang = guess_lang;
    }
}
