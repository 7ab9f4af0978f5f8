use super::{
    Align, DocumentBackend, LayoutBlock, RenderError, RenderFormat, RenderedDocument, Span,
    TextLine,
};
use std::fmt::Write as _;

/// Self-contained HTML page, suitable as an e-mail body when a PDF cannot be attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlBackend;

impl DocumentBackend for HtmlBackend {
    fn format(&self) -> RenderFormat {
        RenderFormat::Html
    }

    fn encode(&self, document: &RenderedDocument) -> Result<Vec<u8>, RenderError> {
        if document.pages.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let title = document
            .blocks()
            .find_map(|block| match block {
                LayoutBlock::Title { lines } => lines.last().map(TextLine::text),
                _ => None,
            })
            .unwrap_or_default();
        writeln!(html, "<title>{}</title>", escape_html(&title)).expect("write title");
        html.push_str(
            "</head>\n<body style=\"font-family: Helvetica, Arial, sans-serif; max-width: 612px; margin: 0 auto;\">\n",
        );

        for (index, page) in document.pages.iter().enumerate() {
            writeln!(html, "<section class=\"page\" data-page=\"{}\">", index + 1)
                .expect("write page");
            for block in &page.blocks {
                render_block(&mut html, block);
            }
            html.push_str("</section>\n");
        }

        html.push_str("</body>\n</html>\n");
        Ok(html.into_bytes())
    }
}

fn render_block(html: &mut String, block: &LayoutBlock) {
    match block {
        LayoutBlock::Banner { frame, color } => {
            writeln!(
                html,
                "<div style=\"height: {}px; background: {};\"></div>",
                frame.height,
                color.hex()
            )
            .expect("write banner");
        }
        LayoutBlock::Title { lines } => {
            for (level, line) in lines.iter().enumerate() {
                let tag = format!("h{}", level.min(2) + 1);
                writeln!(
                    html,
                    "<{tag} style=\"text-align: center; margin: 4px 0;\">{}</{tag}>",
                    spans(&line.spans)
                )
                .expect("write title line");
            }
        }
        LayoutBlock::SectionHeader { line, .. } => {
            writeln!(
                html,
                "<h4 style=\"text-decoration: underline; margin: 16px 0 6px;\">{}</h4>",
                spans(&line.spans)
            )
            .expect("write section header");
        }
        LayoutBlock::Line { line } => paragraph(html, line, ""),
        LayoutBlock::Field { lines, .. } => {
            let joined: Vec<Span> = lines.iter().flat_map(|line| line.spans.clone()).collect();
            writeln!(html, "<p style=\"margin: 2px 0;\">{}</p>", spans(&joined))
                .expect("write field");
        }
        LayoutBlock::Paragraph { lines, .. } => {
            let text = lines
                .iter()
                .map(TextLine::text)
                .collect::<Vec<_>>()
                .join(" ");
            let color = lines
                .first()
                .and_then(|line| line.spans.first())
                .map(|span| span.color.hex())
                .unwrap_or_default();
            writeln!(
                html,
                "<p style=\"margin: 2px 0 2px 20px; color: {color};\">{}</p>",
                escape_html(&text)
            )
            .expect("write paragraph");
        }
        LayoutBlock::Callout { stroke, lines, .. } => {
            writeln!(
                html,
                "<div style=\"border: 1px solid {}; padding: 10px; margin: 8px 0;\">",
                stroke.hex()
            )
            .expect("write callout");
            for line in lines {
                paragraph(html, line, "");
            }
            html.push_str("</div>\n");
        }
        LayoutBlock::Footer { lines } => {
            html.push_str("<footer style=\"margin-top: 32px;\">\n");
            for line in lines {
                paragraph(html, line, " font-size: 9pt;");
            }
            html.push_str("</footer>\n");
        }
    }
}

fn paragraph(html: &mut String, line: &TextLine, extra_style: &str) {
    let align = match line.align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    };
    let body = match &line.link {
        Some(url) => format!(
            "<a href=\"{}\">{}</a>",
            escape_html(url),
            spans(&line.spans)
        ),
        None => spans(&line.spans),
    };
    writeln!(
        html,
        "<p style=\"text-align: {align}; margin: 2px 0;{extra_style}\">{body}</p>"
    )
    .expect("write line");
}

fn spans(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        write!(
            out,
            "<span style=\"color: {}; font-size: {}pt;\">{}</span>",
            span.color.hex(),
            span.size,
            escape_html(&span.text)
        )
        .expect("write span");
    }
    out
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
