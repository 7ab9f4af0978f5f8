use super::{DocumentBackend, LayoutBlock, RenderError, RenderFormat, RenderedDocument, TextLine};

const WIDTH: usize = 72;

/// Plain-text rendition for channels that cannot carry attachments.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl DocumentBackend for TextBackend {
    fn format(&self) -> RenderFormat {
        RenderFormat::Text
    }

    fn encode(&self, document: &RenderedDocument) -> Result<Vec<u8>, RenderError> {
        if document.pages.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut out = Vec::new();
        for (index, page) in document.pages.iter().enumerate() {
            if index > 0 {
                out.push(String::new());
                out.push(format!("{:-^WIDTH$}", format!(" page {} ", index + 1)));
                out.push(String::new());
            }
            for block in &page.blocks {
                render_block(&mut out, block);
            }
        }

        let mut text = out.join("\n");
        text.push('\n');
        Ok(text.into_bytes())
    }
}

fn render_block(out: &mut Vec<String>, block: &LayoutBlock) {
    match block {
        LayoutBlock::Banner { .. } => out.push("=".repeat(WIDTH)),
        LayoutBlock::Title { lines } => {
            out.extend(lines.iter().map(|line| centered(&line.text())));
            out.push(String::new());
        }
        LayoutBlock::SectionHeader { title, .. } => {
            out.push(String::new());
            out.push(title.to_uppercase());
            out.push("-".repeat(title.chars().count()));
        }
        LayoutBlock::Line { line } => out.push(aligned(line)),
        LayoutBlock::Field { lines, .. } => {
            for (index, line) in lines.iter().enumerate() {
                if index == 0 {
                    out.push(line.text());
                } else {
                    out.push(format!("    {}", line.text()));
                }
            }
        }
        LayoutBlock::Paragraph { lines, .. } => {
            out.extend(lines.iter().map(|line| format!("    {}", line.text())));
        }
        LayoutBlock::Callout { lines, .. } => {
            out.push(format!("+{}+", "-".repeat(WIDTH - 2)));
            for line in lines {
                out.push(format!("| {:<width$} |", line.text(), width = WIDTH - 4));
            }
            out.push(format!("+{}+", "-".repeat(WIDTH - 2)));
        }
        LayoutBlock::Footer { lines } => {
            out.push(String::new());
            for line in lines {
                match &line.link {
                    Some(url) => out.push(centered(&format!("{} <{}>", line.text(), url))),
                    None => out.push(centered(&line.text())),
                }
            }
        }
    }
}

fn aligned(line: &TextLine) -> String {
    match line.align {
        super::Align::Left => line.text(),
        super::Align::Center => centered(&line.text()),
        super::Align::Right => format!("{:>WIDTH$}", line.text()),
    }
}

fn centered(text: &str) -> String {
    format!("{text:^WIDTH$}").trim_end().to_string()
}
