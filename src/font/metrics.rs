//! Advance-width tables for the built-in fonts, in 1/1000 em.
//!
//! Only printable ASCII is tabulated. Anything else measures with the
//! font's default width, except the no-break space which measures as a space.

/// Widths for U+0020..=U+007E, indexed by `code - 32`.
type AsciiWidths = [u16; 95];

#[rustfmt::skip]
const HELVETICA: AsciiWidths = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: AsciiWidths = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const COURIER: AsciiWidths = [600; 95];

/// Metrics for one built-in font.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    widths: &'static AsciiWidths,
    pub default_width: u16,
}

impl StandardFontMetrics {
    pub const HELVETICA: StandardFontMetrics = StandardFontMetrics {
        widths: &HELVETICA,
        default_width: 556,
    };

    pub const HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
        widths: &HELVETICA_BOLD,
        default_width: 556,
    };

    pub const COURIER: StandardFontMetrics = StandardFontMetrics {
        widths: &COURIER,
        default_width: 600,
    };

    /// Advance width of `ch` in 1/1000 em.
    pub fn units(&self, ch: char) -> u16 {
        let ch = if ch == '\u{a0}' { ' ' } else { ch };
        match ch as u32 {
            code @ 32..=126 => self.widths[(code - 32) as usize],
            _ => self.default_width,
        }
    }

    /// Advance width of `ch` in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.units(ch) as f64 / 1000.0 * font_size
    }
}
