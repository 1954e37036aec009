/// Measures rendered text width in the same unit as the page geometry.
pub trait TextMeasure {
    /// Width of `text` at `font_size` points.
    fn width(&self, text: &str, bold: bool, font_size: f32) -> f32;
}

/// Advance widths of the base-14 Helvetica fonts, in points.
///
/// Matches the fonts the PDF backend references, so layout and output agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Helvetica;

/// Helvetica advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
const REGULAR: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
const BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {..~
];

const BULLET: u16 = 350;
const FALLBACK: u16 = 556;

impl Helvetica {
    fn advance(c: char, bold: bool) -> u16 {
        let table = if bold { &BOLD } else { &REGULAR };
        match c {
            ' '..='~' => table[c as usize - 0x20],
            '•' => BULLET,
            _ => FALLBACK,
        }
    }
}

impl TextMeasure for Helvetica {
    fn width(&self, text: &str, bold: bool, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(Self::advance(c, bold))).sum();
        units as f32 * font_size / 1000.0
    }
}
