use super::metrics::{line_height, text_width, wrap};
use super::{
    Align, Color, Frame, LayoutBlock, Page, RenderedDocument, Span, TextLine, CONTENT_WIDTH,
    MARGIN, PAGE_HEIGHT,
};

const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - MARGIN;

/// Top-down cursor over a growing list of pages.
///
/// Flowing content (rows, paragraphs, headers) continues on a fresh page when it would cross
/// the bottom margin. Callouts reserve their full height up front. Absolute placements
/// (banner, footer) never move the cursor.
#[derive(Debug)]
pub struct LayoutEngine {
    finished: Vec<Page>,
    current: Page,
    cursor: f32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: Page::default(),
            cursor: MARGIN,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Pages started so far, including the current one.
    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    pub fn move_to(&mut self, y: f32) {
        self.cursor = y;
    }

    /// Advance by `lines` line heights of text at `size`.
    pub fn move_down(&mut self, lines: f32, size: f32) {
        self.cursor += lines * line_height(size);
    }

    pub fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.finished.push(page);
        self.cursor = MARGIN;
    }

    /// Breaks the page when the cursor sits below `threshold`. Returns whether it did.
    pub fn break_if_below(&mut self, threshold: f32) -> bool {
        if self.cursor > threshold {
            self.new_page();
            true
        } else {
            false
        }
    }

    /// Guarantees `height` points of room below the cursor, breaking the page if needed.
    /// A fresh page always counts as having room.
    pub fn reserve(&mut self, height: f32) -> f32 {
        if self.cursor + height > BOTTOM_LIMIT && self.cursor > MARGIN {
            self.new_page();
        }
        self.cursor
    }

    /// Places a block without touching the cursor.
    pub fn place(&mut self, block: LayoutBlock) {
        self.current.blocks.push(block);
    }

    pub fn banner(&mut self, height: f32, color: Color) {
        self.place(LayoutBlock::Banner {
            frame: Frame {
                x: 0.0,
                y: 0.0,
                width: super::PAGE_WIDTH,
                height,
            },
            color,
        });
    }

    /// One single-line block in the content column; the cursor ends below it.
    pub fn line(&mut self, spans: Vec<Span>, align: Align) {
        let size = spans.iter().map(|span| span.size).fold(0.0_f32, f32::max);
        let top = self.reserve(line_height(size));
        let line = TextLine::placed(MARGIN, CONTENT_WIDTH, top, align, spans);
        self.cursor += line.height();
        self.place(LayoutBlock::Line { line });
    }

    /// Centered lines of differing sizes, stacked at the cursor.
    pub fn title(&mut self, lines: Vec<(String, f32, Color)>) {
        let mut placed = Vec::with_capacity(lines.len());
        for (text, size, color) in lines {
            let top = self.reserve(line_height(size));
            let line = TextLine::placed(
                MARGIN,
                CONTENT_WIDTH,
                top,
                Align::Center,
                vec![Span::new(text, size, color)],
            );
            self.cursor += line.height();
            placed.push(line);
        }
        self.place(LayoutBlock::Title { lines: placed });
    }

    pub fn section_header(&mut self, title: &str, size: f32, color: Color) {
        let top = self.reserve(line_height(size));
        let line = TextLine::placed(
            MARGIN,
            CONTENT_WIDTH,
            top,
            Align::Left,
            vec![Span::new(title, size, color)],
        )
        .underlined();
        self.cursor += line.height();
        self.place(LayoutBlock::SectionHeader {
            title: title.to_string(),
            line,
        });
    }

    /// `label: value`, with the value wrapping under the content column.
    ///
    /// A row that fits on one page moves whole. Taller rows fill the current page and
    /// continue on the next, one block per page.
    pub fn field(&mut self, label: &str, value: &str, size: f32, colors: (Color, Color)) {
        let (label_color, value_color) = colors;
        let prefix = format!("{label}: ");
        let prefix_width = text_width(&prefix, size);
        let wrapped = wrap(value, size, CONTENT_WIDTH - prefix_width, CONTENT_WIDTH);
        let height = line_height(size) * wrapped.len() as f32;
        if height <= BOTTOM_LIMIT - MARGIN {
            self.reserve(height);
        }

        let mut lines = Vec::with_capacity(wrapped.len());
        for (index, chunk) in wrapped.into_iter().enumerate() {
            if self.cursor + line_height(size) > BOTTOM_LIMIT && self.cursor > MARGIN {
                if !lines.is_empty() {
                    self.place(LayoutBlock::Field {
                        label: label.to_string(),
                        value: value.to_string(),
                        lines: std::mem::take(&mut lines),
                    });
                }
                self.new_page();
            }
            let mut spans = Vec::with_capacity(2);
            if index == 0 {
                spans.push(Span::new(prefix.clone(), size, label_color));
            }
            spans.push(Span::new(chunk, size, value_color));
            let line = TextLine::placed(MARGIN, CONTENT_WIDTH, self.cursor, Align::Left, spans);
            self.cursor += line.height();
            lines.push(line);
        }
        self.place(LayoutBlock::Field {
            label: label.to_string(),
            value: value.to_string(),
            lines,
        });
    }

    /// Wrapped body text. Long paragraphs are split across pages, one block per page.
    pub fn paragraph(&mut self, text: &str, size: f32, color: Color, indent: f32) {
        let width = CONTENT_WIDTH - indent;
        let mut lines = Vec::new();
        for chunk in wrap(text, size, width, width) {
            let height = line_height(size);
            if self.cursor + height > BOTTOM_LIMIT && self.cursor > MARGIN {
                if !lines.is_empty() {
                    self.place(LayoutBlock::Paragraph {
                        text: text.to_string(),
                        lines: std::mem::take(&mut lines),
                    });
                }
                self.new_page();
            }
            lines.push(TextLine::placed(
                MARGIN + indent,
                width,
                self.cursor,
                Align::Left,
                vec![Span::new(chunk, size, color)],
            ));
            self.cursor += height;
        }
        self.place(LayoutBlock::Paragraph {
            text: text.to_string(),
            lines,
        });
    }

    /// A stroked box of fixed height. `lines` are positioned relative to the box top by the
    /// caller through `build`; the cursor is left at the box top for the caller to advance.
    pub fn callout<F>(&mut self, height: f32, stroke: Color, build: F) -> f32
    where
        F: FnOnce(f32) -> Vec<TextLine>,
    {
        let top = self.reserve(height);
        let lines = build(top);
        self.place(LayoutBlock::Callout {
            frame: Frame {
                x: MARGIN,
                y: top,
                width: CONTENT_WIDTH,
                height,
            },
            stroke,
            lines,
        });
        top
    }

    /// Absolute lines at a fixed position on the current page.
    pub fn footer(&mut self, lines: Vec<TextLine>) {
        self.place(LayoutBlock::Footer { lines });
    }

    pub fn finish(mut self) -> RenderedDocument {
        self.finished.push(self.current);
        RenderedDocument {
            pages: self.finished,
        }
    }
}
