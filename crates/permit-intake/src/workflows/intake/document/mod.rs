//! Paginated application document.
//!
//! [`DocumentRenderer`] lays a submission out into a [`RenderedDocument`]: pages of positioned
//! [`LayoutBlock`]s in top-down page coordinates (points, origin at the top-left corner). A
//! [`DocumentBackend`] then serializes the finished layout. Nothing is encoded until the whole
//! layout exists, so a failed render never leaves a partial buffer behind.

mod html;
mod layout;
pub(crate) mod metrics;
mod pdf;
mod template;
mod text;

pub use html::HtmlBackend;
pub use layout::LayoutEngine;
pub use pdf::PdfBackend;
pub use template::{DocumentRenderer, PAGINATION_THRESHOLD};
pub use text::TextBackend;

use mime::Mime;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// US Letter.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 50.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const ACCENT: Color = Color(0xff, 0x00, 0x88);
    pub const NAVY: Color = Color(0x1b, 0x2f, 0x52);
    pub const BODY: Color = Color(0x33, 0x33, 0x33);
    pub const PARAGRAPH: Color = Color(0x55, 0x55, 0x55);
    pub const LABEL: Color = Color(0x66, 0x66, 0x66);
    pub const MUTED: Color = Color(0x99, 0x99, 0x99);
    pub const RULE: Color = Color(0xdd, 0xdd, 0xdd);
    pub const BLACK: Color = Color(0x00, 0x00, 0x00);

    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub size: f32,
    pub color: Color,
}

impl Span {
    pub fn new(text: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            size,
            color,
        }
    }
}

/// One line of styled text. `x` is the resolved left edge after alignment within
/// `[left, left + width]`; `y` is the top of the line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub align: Align,
    pub spans: Vec<Span>,
    pub underline: bool,
    pub link: Option<String>,
}

impl TextLine {
    pub fn placed(left: f32, width: f32, y: f32, align: Align, spans: Vec<Span>) -> Self {
        let measured: f32 = spans
            .iter()
            .map(|span| metrics::text_width(&span.text, span.size))
            .sum();
        let x = match align {
            Align::Left => left,
            Align::Center => left + (width - measured).max(0.0) / 2.0,
            Align::Right => left + (width - measured).max(0.0),
        };
        Self {
            x,
            y,
            align,
            spans,
            underline: false,
            link: None,
        }
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn linked(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn width(&self) -> f32 {
        self.spans
            .iter()
            .map(|span| metrics::text_width(&span.text, span.size))
            .sum()
    }

    pub fn size(&self) -> f32 {
        self.spans
            .iter()
            .map(|span| span.size)
            .fold(0.0_f32, f32::max)
    }

    pub fn height(&self) -> f32 {
        metrics::line_height(self.size())
    }
}

/// One renderable unit on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutBlock {
    Banner { frame: Frame, color: Color },
    Title { lines: Vec<TextLine> },
    /// Free-standing line such as the application date, a bullet or the investment total.
    Line { line: TextLine },
    SectionHeader { title: String, line: TextLine },
    Field {
        label: String,
        value: String,
        lines: Vec<TextLine>,
    },
    Paragraph { text: String, lines: Vec<TextLine> },
    Callout {
        frame: Frame,
        stroke: Color,
        lines: Vec<TextLine>,
    },
    Footer { lines: Vec<TextLine> },
}

impl LayoutBlock {
    pub fn lines(&self) -> &[TextLine] {
        match self {
            Self::Banner { .. } => &[],
            Self::Line { line } | Self::SectionHeader { line, .. } => std::slice::from_ref(line),
            Self::Title { lines }
            | Self::Field { lines, .. }
            | Self::Paragraph { lines, .. }
            | Self::Callout { lines, .. }
            | Self::Footer { lines } => lines,
        }
    }

    /// Plain text of the block, lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines()
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub blocks: Vec<LayoutBlock>,
}

impl Page {
    pub fn section_titles(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            LayoutBlock::SectionHeader { title, .. } => Some(title.as_str()),
            _ => None,
        })
    }

    pub fn field(&self, label: &str) -> Option<&str> {
        self.blocks.iter().find_map(|block| match block {
            LayoutBlock::Field { label: l, value, .. } if l == label => Some(value.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedDocument {
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &LayoutBlock> {
        self.pages.iter().flat_map(|page| page.blocks.iter())
    }

    /// Zero-based index of the page carrying a section header.
    pub fn page_of_section(&self, title: &str) -> Option<usize> {
        self.pages
            .iter()
            .position(|page| page.section_titles().any(|t| t == title))
    }

    /// First field row with `label`, across all pages.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.pages.iter().find_map(|page| page.field(label))
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document has no pages")]
    Empty,
    #[error("text on page {page} lies outside the page: {text:?}")]
    OutOfBounds { page: usize, text: String },
}

/// Serializes a finished layout.
pub trait DocumentBackend: Send + Sync {
    fn format(&self) -> RenderFormat;

    fn encode(&self, document: &RenderedDocument) -> Result<Vec<u8>, RenderError>;

    fn content_type(&self) -> Mime {
        self.format().content_type()
    }

    fn extension(&self) -> &'static str {
        self.format().extension()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    #[default]
    Pdf,
    Html,
    Text,
}

impl RenderFormat {
    pub const ALL: [RenderFormat; 3] = [RenderFormat::Pdf, RenderFormat::Html, RenderFormat::Text];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Text => "txt",
        }
    }

    pub fn content_type(self) -> Mime {
        match self {
            Self::Pdf => mime::APPLICATION_PDF,
            Self::Html => mime::TEXT_HTML_UTF_8,
            Self::Text => mime::TEXT_PLAIN_UTF_8,
        }
    }

    /// Matches on type and subtype only, ignoring parameters such as charset.
    pub fn from_mime(value: &Mime) -> Option<Self> {
        Self::ALL.into_iter().find(|format| {
            let candidate = format.content_type();
            candidate.type_() == value.type_() && candidate.subtype() == value.subtype()
        })
    }

    pub fn backend(self) -> Box<dyn DocumentBackend> {
        match self {
            Self::Pdf => Box::new(PdfBackend),
            Self::Html => Box::new(HtmlBackend),
            Self::Text => Box::new(TextBackend),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Text => "text",
        })
    }
}

#[derive(Debug, Error)]
#[error("unknown document format `{0}` (expected pdf, html or text)")]
pub struct UnknownFormat(pub String);

impl FromStr for RenderFormat {
    type Err = UnknownFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "html" | "htm" => Ok(Self::Html),
            "text" | "txt" | "plain" => Ok(Self::Text),
            _ => Err(UnknownFormat(raw.to_string())),
        }
    }
}
