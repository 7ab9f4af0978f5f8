use super::metrics::ASCENT_FACTOR;
use super::{
    DocumentBackend, Frame, LayoutBlock, Page, RenderError, RenderFormat, RenderedDocument,
    TextLine, PAGE_HEIGHT, PAGE_WIDTH,
};
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

const FONT_NAME: Name<'static> = Name(b"F1");

/// PDF output using the built-in Helvetica face, so no font program is embedded.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfBackend;

impl DocumentBackend for PdfBackend {
    fn format(&self) -> RenderFormat {
        RenderFormat::Pdf
    }

    fn encode(&self, document: &RenderedDocument) -> Result<Vec<u8>, RenderError> {
        if document.pages.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let font_id = alloc.bump();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let mut page_ids = Vec::with_capacity(document.pages.len());
        for (index, page) in document.pages.iter().enumerate() {
            let page_id = alloc.bump();
            let content_id = alloc.bump();
            let drawn = draw_page(index, page)?;

            let mut annotation_ids = Vec::with_capacity(drawn.links.len());
            for (rect, url) in &drawn.links {
                let annotation_id = alloc.bump();
                let mut annotation = pdf.annotation(annotation_id);
                annotation
                    .subtype(AnnotationType::Link)
                    .rect(*rect)
                    .border(0.0, 0.0, 0.0, None);
                annotation
                    .action()
                    .action_type(ActionType::Uri)
                    .uri(Str(url.as_bytes()));
                annotation_ids.push(annotation_id);
            }

            let mut writer = pdf.page(page_id);
            writer
                .media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
                .parent(tree_id)
                .contents(content_id);
            writer.resources().fonts().pair(FONT_NAME, font_id);
            if !annotation_ids.is_empty() {
                writer.annotations(annotation_ids);
            }
            writer.finish();

            pdf.stream(content_id, &drawn.content);
            page_ids.push(page_id);
        }

        pdf.pages(tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        Ok(pdf.finish())
    }
}

struct DrawnPage {
    content: Vec<u8>,
    links: Vec<(Rect, String)>,
}

fn draw_page(index: usize, page: &Page) -> Result<DrawnPage, RenderError> {
    let mut content = Content::new();
    let mut links = Vec::new();

    for block in &page.blocks {
        match block {
            LayoutBlock::Banner { frame, color } => {
                let (r, g, b) = color.unit();
                let (x, y, w, h) = flip(frame);
                content.set_fill_rgb(r, g, b);
                content.rect(x, y, w, h);
                content.fill_nonzero();
            }
            LayoutBlock::Callout {
                frame,
                stroke,
                lines,
            } => {
                let (r, g, b) = stroke.unit();
                let (x, y, w, h) = flip(frame);
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(1.0);
                content.rect(x, y, w, h);
                content.stroke();
                for line in lines {
                    draw_line(&mut content, index, line, &mut links)?;
                }
            }
            other => {
                for line in other.lines() {
                    draw_line(&mut content, index, line, &mut links)?;
                }
            }
        }
    }

    Ok(DrawnPage {
        content: content.finish(),
        links,
    })
}

fn flip(frame: &Frame) -> (f32, f32, f32, f32) {
    (
        frame.x,
        PAGE_HEIGHT - frame.y - frame.height,
        frame.width,
        frame.height,
    )
}

fn draw_line(
    content: &mut Content,
    page: usize,
    line: &TextLine,
    links: &mut Vec<(Rect, String)>,
) -> Result<(), RenderError> {
    let size = line.size();
    let baseline = PAGE_HEIGHT - (line.y + ASCENT_FACTOR * size);
    if line.y < 0.0 || baseline < 0.0 || line.x < 0.0 || line.x > PAGE_WIDTH {
        return Err(RenderError::OutOfBounds {
            page: page + 1,
            text: line.text(),
        });
    }

    let mut x = line.x;
    for span in &line.spans {
        let (r, g, b) = span.color.unit();
        let encoded = win_ansi(&span.text);
        content.set_fill_rgb(r, g, b);
        content.begin_text();
        content.set_font(FONT_NAME, span.size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, baseline]);
        content.show(Str(&encoded));
        content.end_text();
        x += super::metrics::text_width(&span.text, span.size);
    }

    if line.underline {
        if let Some(first) = line.spans.first() {
            let (r, g, b) = first.color.unit();
            content.set_stroke_rgb(r, g, b);
            content.set_line_width((size / 14.0).max(0.5));
            content.move_to(line.x, baseline - 1.5);
            content.line_to(x, baseline - 1.5);
            content.stroke();
        }
    }

    if let Some(url) = &line.link {
        links.push((
            Rect::new(line.x, baseline - 2.0, x, baseline + size),
            url.clone(),
        ));
    }
    Ok(())
}

/// Maps text onto the WinAnsi code page used by the standard Helvetica font. Characters with
/// no WinAnsi slot become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{00A0}'..='\u{00FF}' => ch as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        })
        .collect()
}
