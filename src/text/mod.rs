//! # Text Measurement and Line Breaking
//!
//! Greedy line breaking over multi-style text. Break opportunities come from
//! UAX#14 (unicode-linebreak); widths come from a [`TextMeasurer`], so the
//! same input breaks the same way wherever the measurer agrees.

use unicode_linebreak::{linebreaks, BreakOpportunity};

/// The font a piece of text is measured with.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Size in points (actual scale).
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

/// Width measurement. Implementations must be deterministic.
pub trait TextMeasurer {
    /// Advance width of one character in points.
    fn char_width(&self, ch: char, font: &FontSpec) -> f64;

    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font)).sum()
    }
}

/// A character tagged with the index of the font it is set in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyledChar {
    pub ch: char,
    pub font: usize,
}

/// One line after breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    pub chars: Vec<StyledChar>,
    /// X offset of each character from the line start.
    pub char_positions: Vec<f64>,
    /// Width without trailing spaces.
    pub width: f64,
    /// Font of the text that produced this line, for sizing empty lines.
    pub font_hint: usize,
}

const SOFT_HYPHEN: char = '\u{00AD}';

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// UAX#14 break opportunities indexed by char position: entry `i` is the
/// opportunity *before* char `i`. Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }
    result
}

/// Break styled text into lines no wider than `max_width`.
///
/// A word wider than the line is split between characters. Newlines force a
/// break; a soft hyphen is an extra break point that renders as `-` when
/// taken. Empty input yields one empty line.
pub fn break_runs_into_lines(
    measurer: &dyn TextMeasurer,
    chars: &[StyledChar],
    fonts: &[FontSpec],
    max_width: f64,
) -> Vec<BrokenLine> {
    if chars.is_empty() {
        return vec![make_line(&[], &[], 0)];
    }

    let widths: Vec<f64> = chars
        .iter()
        .map(|sc| {
            if sc.ch == SOFT_HYPHEN || is_newline(sc.ch) {
                0.0
            } else {
                measurer.char_width(sc.ch, &fonts[sc.font])
            }
        })
        .collect();

    let plain: String = chars.iter().map(|sc| sc.ch).collect();
    let break_opps = compute_break_opportunities(&plain);

    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0.0;
    let mut last_break: Option<usize> = None;

    for (i, sc) in chars.iter().enumerate() {
        if i > 0 {
            match break_opps[i] {
                Some(BreakOpportunity::Mandatory) => {
                    let end = if is_newline(chars[i - 1].ch) { i - 1 } else { i };
                    lines.push(line_from(chars, &widths, line_start, end));
                    line_start = i;
                    line_width = 0.0;
                    last_break = None;
                }
                Some(BreakOpportunity::Allowed) => last_break = Some(i - 1),
                None => {}
            }
        }

        if sc.ch == SOFT_HYPHEN {
            last_break = Some(i);
            continue;
        }
        if is_newline(sc.ch) {
            continue;
        }

        let w = widths[i];
        // Spaces may hang past the edge; trailing spaces do not count.
        if line_width + w > max_width && line_start < i && sc.ch != ' ' {
            if let Some(bp) = last_break.filter(|bp| *bp >= line_start) {
                if chars[bp].ch == SOFT_HYPHEN {
                    let mut line_chars = visible(&chars[line_start..bp]);
                    let hyphen_font = if bp > line_start { chars[bp - 1].font } else { chars[bp].font };
                    line_chars.push(StyledChar {
                        ch: '-',
                        font: hyphen_font,
                    });
                    let line_widths: Vec<f64> = line_chars
                        .iter()
                        .map(|c| measurer.char_width(c.ch, &fonts[c.font]))
                        .collect();
                    lines.push(make_line(&line_chars, &line_widths, hyphen_font));
                } else {
                    lines.push(line_from(chars, &widths, line_start, bp + 1));
                }
                line_start = bp + 1;
                line_width = widths[line_start..=i].iter().sum();
                last_break = None;
                continue;
            }

            // No break opportunity on this line: split the word here.
            lines.push(line_from(chars, &widths, line_start, i));
            line_start = i;
            line_width = w;
            last_break = None;
            continue;
        }

        line_width += w;
    }

    lines.push(line_from(chars, &widths, line_start, chars.len()));
    if let Some(last) = chars.last().filter(|sc| is_newline(sc.ch)) {
        // Text ending in a newline has an empty last line.
        lines.push(make_line(&[], &[], last.font));
    }
    lines
}

fn visible(chars: &[StyledChar]) -> Vec<StyledChar> {
    chars
        .iter()
        .filter(|sc| sc.ch != SOFT_HYPHEN && !is_newline(sc.ch))
        .copied()
        .collect()
}

fn line_from(chars: &[StyledChar], widths: &[f64], start: usize, end: usize) -> BrokenLine {
    let hint = chars
        .get(start)
        .or_else(|| chars.get(end))
        .map(|sc| sc.font)
        .unwrap_or(0);
    let (kept, kept_widths): (Vec<StyledChar>, Vec<f64>) = chars[start..end]
        .iter()
        .zip(&widths[start..end])
        .filter(|(sc, _)| sc.ch != SOFT_HYPHEN && !is_newline(sc.ch))
        .map(|(sc, w)| (*sc, *w))
        .unzip();
    make_line(&kept, &kept_widths, hint)
}

fn make_line(chars: &[StyledChar], widths: &[f64], font_hint: usize) -> BrokenLine {
    let mut positions = Vec::with_capacity(chars.len());
    let mut x = 0.0;
    for &w in widths {
        positions.push(x);
        x += w;
    }

    let mut effective_width = x;
    let mut i = chars.len();
    while i > 0 && chars[i - 1].ch == ' ' {
        i -= 1;
        effective_width -= widths[i];
    }

    BrokenLine {
        chars: chars.to_vec(),
        char_positions: positions,
        width: effective_width,
        font_hint,
    }
}

impl BrokenLine {
    pub fn text(&self) -> String {
        self.chars.iter().map(|sc| sc.ch).collect()
    }
}
