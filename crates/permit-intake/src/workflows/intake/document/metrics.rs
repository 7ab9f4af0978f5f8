//! Helvetica advance widths (1/1000 em) for line measuring and alignment.

/// Printable ASCII, `' '` through `'~'`.
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

/// Ascender, descender and line gap, as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.156;
pub const ASCENT_FACTOR: f32 = 0.718;

fn glyph_width(ch: char) -> u16 {
    match ch {
        ' '..='~' => ASCII_WIDTHS[ch as usize - 0x20],
        '\u{2022}' => 350,
        '\u{2013}' => 556,
        '\u{2014}' => 1000,
        '\u{2018}' | '\u{2019}' => 222,
        '\u{201C}' | '\u{201D}' => 333,
        '\u{00A0}' => 278,
        _ => DEFAULT_WIDTH,
    }
}

pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(ch))).sum();
    units as f32 * size / 1000.0
}

pub fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR
}

/// Greedy word wrap. The first line may be narrower (a label already sits in front of it).
/// Words wider than a whole line are split by character. Always yields at least one line.
pub fn wrap(text: &str, size: f32, first_width: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let limit = if lines.is_empty() { first_width } else { width };
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, size) <= limit {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        for ch in word.chars() {
            let limit = if lines.is_empty() { first_width } else { width };
            current.push(ch);
            if current.chars().count() > 1 && text_width(&current, size) > limit {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
