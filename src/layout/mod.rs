//! # Rich-Text Layout
//!
//! Turns a question, an answer and their resolved styles into positioned
//! text runs inside a box. The pipeline:
//!
//! 1. Build a flow: question text, separator, then answer segments from the
//!    markup parser, each character tagged with its font.
//! 2. Break the flow into lines against the box's inner width.
//! 3. Stack lines top to bottom. A line is as tall as its largest font times
//!    the paragraph-spacing multiplier, and its baseline sits at a fixed
//!    ascent inside that height.
//! 4. Align each line and emit one run per line per contiguous style.
//!
//! The inline variant flows both sides together. The block variant lays out
//! two independent regions, stacked or side by side.
//!
//! Nothing here shrinks text to fit. [`Layout::overflows`] tells the caller
//! when the content is taller than the box.

use crate::markup::{MarkupParser, TextSegment};
use crate::model::{Element, LayoutVariant, ParagraphSpacing, QuestionPosition, TextAlign};
use crate::resolve::{RichTextStyle, Side};
use crate::text::{break_runs_into_lines, BrokenLine, FontSpec, StyledChar, TextMeasurer};
use serde::{Deserialize, Serialize};

/// Tunable layout constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub spacing_small: f64,
    pub spacing_medium: f64,
    pub spacing_large: f64,
    /// Baseline offset below the glyph box top, as a fraction of font size.
    pub ascent_ratio: f64,
    /// Gap between block regions when the element sets none.
    pub default_gap: f64,
    /// Question region share in percent for side-by-side blocks.
    pub default_question_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing_small: 1.0,
            spacing_medium: 1.2,
            spacing_large: 1.5,
            ascent_ratio: 0.8,
            default_gap: 0.0,
            default_question_width: 40.0,
        }
    }
}

impl LayoutConfig {
    pub fn spacing_multiplier(&self, spacing: ParagraphSpacing) -> f64 {
        match spacing {
            ParagraphSpacing::Small => self.spacing_small,
            ParagraphSpacing::Medium => self.spacing_medium,
            ParagraphSpacing::Large => self.spacing_large,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Inline only: start the answer on a new line.
    pub answer_on_new_row: bool,
    pub question_position: QuestionPosition,
    /// Percent of the box width; `None` uses the configured default.
    pub question_width: Option<f64>,
    /// Space between block regions; `None` uses the configured default.
    pub gap: Option<f64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            answer_on_new_row: false,
            question_position: QuestionPosition::Top,
            question_width: None,
            gap: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutInput<'a> {
    pub question_text: &'a str,
    /// Answer markup or plain text.
    pub answer_text: &'a str,
    /// Whether `answer_text` is markup. Plain text is laid out as written.
    pub answer_markup: bool,
    pub question_style: &'a RichTextStyle,
    pub answer_style: &'a RichTextStyle,
    pub layout_box: LayoutBox,
    pub variant: LayoutVariant,
    pub options: LayoutOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// Both sides flowing together.
    Inline,
    Question,
    Answer,
}

/// A rectangle text is laid out in, relative to the box origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub kind: RegionKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Height of the laid-out content, padding included.
    pub content_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePosition {
    pub region: usize,
    /// Top of the line box.
    pub top: f64,
    pub baseline: f64,
    pub height: f64,
    /// Left edge after alignment.
    pub x: f64,
    /// Width without trailing spaces.
    pub width: f64,
}

/// A run of identically styled text on one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedRun {
    pub text: String,
    pub x: f64,
    /// Baseline.
    pub y: f64,
    pub width: f64,
    pub line: usize,
    pub side: RunSide,
    pub font_family: String,
    pub font_size: f64,
    pub font_bold: bool,
    pub font_italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    pub font_opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunSide {
    Question,
    Answer,
}

impl From<Side> for RunSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Question => RunSide::Question,
            Side::Answer => RunSide::Answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub runs: Vec<PositionedRun>,
    pub line_positions: Vec<LinePosition>,
    pub regions: Vec<Region>,
    /// Height of everything laid out, padding included.
    pub content_height: f64,
}

impl Layout {
    /// Is the content taller than the box?
    pub fn overflows(&self, layout_box: &LayoutBox) -> bool {
        self.content_height > layout_box.height + 1e-6
    }
}

/// Lay out with the default [`LayoutConfig`].
pub fn layout(input: &LayoutInput<'_>, parser: &dyn MarkupParser, measurer: &dyn TextMeasurer) -> Layout {
    layout_with_config(input, parser, measurer, &LayoutConfig::default())
}

pub fn layout_with_config(
    input: &LayoutInput<'_>,
    parser: &dyn MarkupParser,
    measurer: &dyn TextMeasurer,
    config: &LayoutConfig,
) -> Layout {
    let b = input.layout_box;
    let mut out = Layout {
        runs: Vec::new(),
        line_positions: Vec::new(),
        regions: Vec::new(),
        content_height: 0.0,
    };

    match input.variant {
        LayoutVariant::Inline => {
            let mut flow = Flow::default();
            flow.push_text(input.question_text, input.question_style, Side::Question);
            let answer = answer_segments(parser, input);
            if !input.question_text.is_empty() && !answer.is_empty() {
                if input.options.answer_on_new_row {
                    flow.push_text("\n", input.question_style, Side::Question);
                } else if !input.question_text.ends_with(' ') {
                    flow.push_text(" ", input.question_style, Side::Question);
                }
            }
            flow.push_segments(&answer, input.answer_style, Side::Answer);
            let region = Frame {
                kind: RegionKind::Inline,
                x: 0.0,
                y: 0.0,
                width: b.width,
            };
            out.content_height = place(&mut out, &flow, region, b.padding, measurer, config);
        }
        LayoutVariant::Block => {
            let mut question = Flow::default();
            question.push_text(input.question_text, input.question_style, Side::Question);
            let mut answer = Flow::default();
            answer.push_segments(&answer_segments(parser, input), input.answer_style, Side::Answer);
            out.content_height = place_block(&mut out, &question, &answer, input, measurer, config);
        }
    }

    log::debug!(
        "Laid out {} lines in {} regions, content height {:.2}",
        out.line_positions.len(),
        out.regions.len(),
        out.content_height
    );
    out
}

/// Answer segments, or the source as one plain run when it is not markup or
/// the parser finds nothing in non-empty text.
fn answer_segments(parser: &dyn MarkupParser, input: &LayoutInput<'_>) -> Vec<TextSegment> {
    let source = input.answer_text;
    if !input.answer_markup {
        if source.is_empty() {
            return Vec::new();
        }
        return vec![TextSegment::plain(source)];
    }
    let segments = parser.parse(source);
    if segments.is_empty() && !source.trim().is_empty() {
        return vec![TextSegment::plain(source)];
    }
    segments
}

fn place_block(
    out: &mut Layout,
    question: &Flow,
    answer: &Flow,
    input: &LayoutInput<'_>,
    measurer: &dyn TextMeasurer,
    config: &LayoutConfig,
) -> f64 {
    let b = input.layout_box;
    let gap = input.options.gap.unwrap_or(config.default_gap).max(0.0);
    let frame = |kind, x, y, width| Frame { kind, x, y, width };

    match input.options.question_position {
        QuestionPosition::Top | QuestionPosition::Bottom => {
            let ((first, first_kind), (second, second_kind)) =
                if input.options.question_position == QuestionPosition::Top {
                    ((question, RegionKind::Question), (answer, RegionKind::Answer))
                } else {
                    ((answer, RegionKind::Answer), (question, RegionKind::Question))
                };
            let h1 = place(out, first, frame(first_kind, 0.0, 0.0, b.width), b.padding, measurer, config);
            let h2 = place(out, second, frame(second_kind, 0.0, h1 + gap, b.width), b.padding, measurer, config);
            h1 + gap + h2
        }
        QuestionPosition::Left | QuestionPosition::Right => {
            let share = input
                .options
                .question_width
                .unwrap_or(config.default_question_width)
                .clamp(0.0, 100.0);
            let q_width = b.width * share / 100.0;
            let a_width = (b.width - q_width - gap).max(0.0);
            let (qx, ax) = if input.options.question_position == QuestionPosition::Left {
                (0.0, q_width + gap)
            } else {
                (a_width + gap, 0.0)
            };
            let hq = place(out, question, frame(RegionKind::Question, qx, 0.0, q_width), b.padding, measurer, config);
            let ha = place(out, answer, frame(RegionKind::Answer, ax, 0.0, a_width), b.padding, measurer, config);
            hq.max(ha)
        }
    }
}

struct Frame {
    kind: RegionKind,
    x: f64,
    y: f64,
    width: f64,
}

/// Everything a character's font index points at.
#[derive(Debug, Clone, PartialEq)]
struct RunFont {
    spec: FontSpec,
    color: Option<String>,
    opacity: f64,
    spacing: ParagraphSpacing,
    align: TextAlign,
    side: Side,
}

#[derive(Debug, Default)]
struct Flow {
    chars: Vec<StyledChar>,
    fonts: Vec<RunFont>,
}

impl Flow {
    fn font_index(&mut self, font: RunFont) -> usize {
        match self.fonts.iter().position(|f| *f == font) {
            Some(i) => i,
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        }
    }

    fn push_text(&mut self, text: &str, style: &RichTextStyle, side: Side) {
        self.push_segments(&[TextSegment::plain(text)], style, side);
    }

    fn push_segments(&mut self, segments: &[TextSegment], style: &RichTextStyle, side: Side) {
        for segment in segments.iter().filter(|s| !s.text.is_empty()) {
            let font = self.font_index(RunFont {
                spec: FontSpec {
                    family: style.font_family.clone(),
                    size: style.font_size,
                    bold: style.font_bold || segment.bold,
                    italic: style.font_italic || segment.italic,
                },
                color: segment.color.clone().or_else(|| style.font_color.clone()),
                opacity: style.font_opacity,
                spacing: style.paragraph_spacing,
                align: style.align,
                side,
            });
            self.chars
                .extend(segment.text.chars().map(|ch| StyledChar { ch, font }));
        }
        // An empty side still needs a font for sizing its empty line.
        if self.fonts.is_empty() {
            self.font_index(RunFont {
                spec: FontSpec {
                    family: style.font_family.clone(),
                    size: style.font_size,
                    bold: style.font_bold,
                    italic: style.font_italic,
                },
                color: style.font_color.clone(),
                opacity: style.font_opacity,
                spacing: style.paragraph_spacing,
                align: style.align,
                side,
            });
        }
    }
}

/// Lay out one flow in a frame. Returns the frame's content height.
fn place(
    out: &mut Layout,
    flow: &Flow,
    frame: Frame,
    padding: f64,
    measurer: &dyn TextMeasurer,
    config: &LayoutConfig,
) -> f64 {
    let padding = padding.max(0.0);
    let inner_width = (frame.width - 2.0 * padding).max(0.0);
    let specs: Vec<FontSpec> = flow.fonts.iter().map(|f| f.spec.clone()).collect();
    let lines = break_runs_into_lines(measurer, &flow.chars, &specs, inner_width);

    let region = out.regions.len();
    let mut top = frame.y + padding;
    for line in &lines {
        let lead = leading_font(flow, line);
        let size = lead.spec.size;
        let height = size * config.spacing_multiplier(lead.spacing);
        let baseline = top + (height - size) / 2.0 + size * config.ascent_ratio;

        let align = line
            .chars
            .first()
            .map(|sc| flow.fonts[sc.font].align)
            .unwrap_or(lead.align);
        let slack = (inner_width - line.width).max(0.0);
        let offset = match align {
            TextAlign::Left | TextAlign::Justify => 0.0,
            TextAlign::Center => slack / 2.0,
            TextAlign::Right => slack,
        };
        let x = frame.x + padding + offset;

        let line_index = out.line_positions.len();
        push_runs(out, flow, line, x, baseline, line_index, measurer);
        out.line_positions.push(LinePosition {
            region,
            top,
            baseline,
            height,
            x,
            width: line.width,
        });
        top += height;
    }

    let content_height = top + padding - frame.y;
    out.regions.push(Region {
        kind: frame.kind,
        x: frame.x,
        y: frame.y,
        width: frame.width,
        content_height,
    });
    content_height
}

/// The font that sets the height of a line: its largest, first on ties.
fn leading_font<'f>(flow: &'f Flow, line: &BrokenLine) -> &'f RunFont {
    let mut lead = &flow.fonts[line.font_hint.min(flow.fonts.len() - 1)];
    let mut first = true;
    for sc in &line.chars {
        let font = &flow.fonts[sc.font];
        if first || font.spec.size > lead.spec.size {
            lead = font;
            first = false;
        }
    }
    lead
}

fn push_runs(
    out: &mut Layout,
    flow: &Flow,
    line: &BrokenLine,
    x: f64,
    baseline: f64,
    line_index: usize,
    measurer: &dyn TextMeasurer,
) {
    let mut start = 0;
    while start < line.chars.len() {
        let font_idx = line.chars[start].font;
        let mut end = start + 1;
        while end < line.chars.len() && line.chars[end].font == font_idx {
            end += 1;
        }
        let text: String = line.chars[start..end].iter().map(|sc| sc.ch).collect();
        let font = &flow.fonts[font_idx];
        out.runs.push(PositionedRun {
            width: measurer.measure(&text, &font.spec),
            text,
            x: x + line.char_positions[start],
            y: baseline,
            line: line_index,
            side: font.side.into(),
            font_family: font.spec.family.clone(),
            font_size: font.spec.size,
            font_bold: font.spec.bold,
            font_italic: font.spec.italic,
            font_color: font.color.clone(),
            font_opacity: font.opacity,
        });
        start = end;
    }
}

/// Question text from a stored payload. Payloads are either plain text or a
/// JSON object with a `text` or `question` string field.
pub fn question_text_from_payload(raw: &str) -> String {
    if raw.trim_start().starts_with('{') {
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(raw) {
            if let Some(text) = ["text", "question"]
                .iter()
                .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            {
                return text.to_string();
            }
        }
    }
    raw.to_string()
}

/// The text an element carries, ready for layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementContent {
    pub question: String,
    /// Markup when the element has formatted text, else plain text.
    pub answer: String,
    pub answer_is_markup: bool,
}

impl ElementContent {
    pub fn of(element: &Element) -> Self {
        let formatted = element.formatted_text.clone().filter(|t| !t.is_empty());
        let answer_is_markup = formatted.is_some();
        let answer = formatted
            .or_else(|| element.text.clone())
            .unwrap_or_default();
        if !element.is_qna() {
            return Self {
                question: String::new(),
                answer,
                answer_is_markup,
            };
        }
        Self {
            question: element
                .question_text
                .as_deref()
                .map(question_text_from_payload)
                .unwrap_or_default(),
            answer,
            answer_is_markup,
        }
    }
}

/// Layout input for a placed element: its own box, the padding of its
/// resolved box style, and the layout options stored on it.
pub fn element_input<'a>(
    element: &Element,
    content: &'a ElementContent,
    box_style: &RichTextStyle,
    question_style: &'a RichTextStyle,
    answer_style: &'a RichTextStyle,
) -> LayoutInput<'a> {
    LayoutInput {
        question_text: &content.question,
        answer_text: &content.answer,
        answer_markup: content.answer_is_markup,
        question_style,
        answer_style,
        layout_box: LayoutBox {
            width: element.width.max(0.0),
            height: element.height.max(0.0),
            padding: box_style.padding,
        },
        variant: if element.is_qna() {
            element.effective_variant()
        } else {
            LayoutVariant::Inline
        },
        options: LayoutOptions {
            answer_on_new_row: element.answer_in_new_row.unwrap_or(false),
            question_position: element.question_position.unwrap_or_default(),
            question_width: element.question_width.filter(|w| *w > 0.0),
            gap: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::markup::{StripTagsParser, XmlMarkupParser};

    fn question_style() -> RichTextStyle {
        RichTextStyle {
            font_size: 58.0,
            font_bold: true,
            ..Default::default()
        }
    }

    fn answer_style() -> RichTextStyle {
        RichTextStyle::default()
    }

    fn input<'a>(
        q: &'a str,
        a: &'a str,
        qs: &'a RichTextStyle,
        as_: &'a RichTextStyle,
        variant: LayoutVariant,
    ) -> LayoutInput<'a> {
        LayoutInput {
            question_text: q,
            answer_text: a,
            answer_markup: true,
            question_style: qs,
            answer_style: as_,
            layout_box: LayoutBox {
                width: 200.0,
                height: 300.0,
                padding: 10.0,
            },
            variant,
            options: LayoutOptions::default(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn inline_single_line_geometry() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let l = layout(&input("Q", "A", &qs, &as_, LayoutVariant::Inline), &XmlMarkupParser, &ctx);

        assert_eq!(l.line_positions.len(), 1);
        let line = &l.line_positions[0];
        assert!(close(line.height, 58.0 * 1.2));
        assert!(close(line.baseline, 10.0 + (58.0 * 1.2 - 58.0) / 2.0 + 58.0 * 0.8));
        assert!(close(l.content_height, 58.0 * 1.2 + 20.0));

        let texts: Vec<&str> = l.runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Q ", "A"]);
        assert_eq!(l.runs[0].side, RunSide::Question);
        assert_eq!(l.runs[1].side, RunSide::Answer);
        assert!(close(l.runs[0].x, 10.0));
        assert!(l.runs[1].x > l.runs[0].x);
        assert!(!l.overflows(&LayoutBox {
            width: 200.0,
            height: 300.0,
            padding: 10.0
        }));
    }

    #[test]
    fn layout_is_deterministic() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let i = input("Q", "A", &qs, &as_, LayoutVariant::Inline);
        assert_eq!(layout(&i, &XmlMarkupParser, &ctx), layout(&i, &XmlMarkupParser, &ctx));
    }

    #[test]
    fn separator_is_a_single_space() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let l = layout(&input("Q", "A", &qs, &as_, LayoutVariant::Inline), &XmlMarkupParser, &ctx);
        assert_eq!(l.runs[0].text, "Q ");

        let l = layout(&input("Q ", "A", &qs, &as_, LayoutVariant::Inline), &XmlMarkupParser, &ctx);
        assert_eq!(l.runs[0].text, "Q ", "no second space after a trailing one");
    }

    #[test]
    fn answer_on_new_row_breaks_the_line() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let mut i = input("Q", "A", &qs, &as_, LayoutVariant::Inline);
        i.options.answer_on_new_row = true;
        let l = layout(&i, &XmlMarkupParser, &ctx);
        assert_eq!(l.line_positions.len(), 2);
        assert_eq!(l.runs[0].text, "Q");
        assert_eq!(l.runs[1].text, "A");
        assert_eq!(l.runs[1].line, 1);
        assert!(close(l.line_positions[1].height, 50.0 * 1.2));
        assert!(close(l.content_height, 58.0 * 1.2 + 50.0 * 1.2 + 20.0));
    }

    #[test]
    fn empty_answer_has_no_separator() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let l = layout(&input("Q", "", &qs, &as_, LayoutVariant::Inline), &XmlMarkupParser, &ctx);
        assert_eq!(l.runs.len(), 1);
        assert_eq!(l.runs[0].text, "Q");
    }

    #[test]
    fn markup_in_the_answer() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let l = layout(
            &input("Q", "a <b>b</b>", &qs, &as_, LayoutVariant::Inline),
            &XmlMarkupParser,
            &ctx,
        );
        let bold: Vec<&str> = l
            .runs
            .iter()
            .filter(|r| r.side == RunSide::Answer && r.font_bold)
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(bold, vec!["b"]);
    }

    struct NothingParser;

    impl MarkupParser for NothingParser {
        fn parse(&self, _source: &str) -> Vec<TextSegment> {
            Vec::new()
        }
    }

    #[test]
    fn parser_yielding_nothing_keeps_the_raw_text() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let l = layout(&input("", "raw", &qs, &as_, LayoutVariant::Inline), &NothingParser, &ctx);
        assert_eq!(l.runs.len(), 1);
        assert_eq!(l.runs[0].text, "raw");
    }

    #[test]
    fn largest_font_sets_line_height_and_spacing() {
        let qs = question_style();
        let mut as_ = answer_style();
        as_.font_size = 80.0;
        as_.paragraph_spacing = ParagraphSpacing::Large;
        let ctx = FontContext::new();
        let l = layout(&input("Q", "A", &qs, &as_, LayoutVariant::Inline), &StripTagsParser, &ctx);
        assert!(close(l.line_positions[0].height, 80.0 * 1.5));
    }

    #[test]
    fn wrapping_respects_inner_width() {
        let qs = RichTextStyle {
            font_size: 20.0,
            ..Default::default()
        };
        let as_ = qs.clone();
        let ctx = FontContext::new();
        let l = layout(
            &input("What is your favourite", "memory from the summer holidays", &qs, &as_, LayoutVariant::Inline),
            &XmlMarkupParser,
            &ctx,
        );
        assert!(l.line_positions.len() > 1);
        for line in &l.line_positions {
            assert!(line.width <= 180.0 + 1e-9);
        }
        assert!(close(l.content_height, l.line_positions.len() as f64 * 24.0 + 20.0));
    }

    #[test]
    fn center_and_right_alignment() {
        let qs = RichTextStyle {
            align: TextAlign::Center,
            ..question_style()
        };
        let as_ = answer_style();
        let ctx = FontContext::new();
        let l = layout(&input("Q", "", &qs, &as_, LayoutVariant::Inline), &XmlMarkupParser, &ctx);
        let line = &l.line_positions[0];
        assert!(close(line.x, 10.0 + (180.0 - line.width) / 2.0));

        let qs = RichTextStyle {
            align: TextAlign::Right,
            ..question_style()
        };
        let l = layout(&input("Q", "", &qs, &as_, LayoutVariant::Inline), &XmlMarkupParser, &ctx);
        let line = &l.line_positions[0];
        assert!(close(line.x + line.width, 190.0));
    }

    #[test]
    fn block_stacks_two_regions() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let mut i = input("Q", "A", &qs, &as_, LayoutVariant::Block);
        i.options.gap = Some(5.0);
        let l = layout(&i, &XmlMarkupParser, &ctx);
        assert_eq!(l.regions.len(), 2);
        assert_eq!(l.regions[0].kind, RegionKind::Question);
        assert_eq!(l.regions[1].kind, RegionKind::Answer);
        let qh = 58.0 * 1.2 + 20.0;
        assert!(close(l.regions[1].y, qh + 5.0));
        assert!(close(l.content_height, qh + 5.0 + 50.0 * 1.2 + 20.0));
    }

    #[test]
    fn block_question_at_bottom() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let mut i = input("Q", "A", &qs, &as_, LayoutVariant::Block);
        i.options.question_position = QuestionPosition::Bottom;
        let l = layout(&i, &XmlMarkupParser, &ctx);
        assert_eq!(l.regions[0].kind, RegionKind::Answer);
        assert!(close(l.regions[1].y, 50.0 * 1.2 + 20.0));
    }

    #[test]
    fn block_side_by_side() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let mut i = input("Q", "A", &qs, &as_, LayoutVariant::Block);
        i.options.question_position = QuestionPosition::Left;
        i.options.gap = Some(10.0);
        let l = layout(&i, &XmlMarkupParser, &ctx);
        let (q, a) = (&l.regions[0], &l.regions[1]);
        assert!(close(q.width, 80.0));
        assert!(close(a.x, 90.0));
        assert!(close(a.width, 110.0));
        assert!(close(l.content_height, 58.0 * 1.2 + 20.0));

        i.options.question_position = QuestionPosition::Right;
        let l = layout(&i, &XmlMarkupParser, &ctx);
        assert!(close(l.regions[0].x, 120.0));
        assert!(close(l.regions[1].x, 0.0));
    }

    #[test]
    fn block_always_has_two_regions() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let l = layout(&input("", "", &qs, &as_, LayoutVariant::Block), &XmlMarkupParser, &ctx);
        assert_eq!(l.regions.len(), 2);
        assert!(l.runs.is_empty());
    }

    #[test]
    fn overflow_is_reported_not_fixed() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        let mut i = input("Q", "A", &qs, &as_, LayoutVariant::Inline);
        i.layout_box.height = 40.0;
        let l = layout(&i, &XmlMarkupParser, &ctx);
        assert!(l.overflows(&i.layout_box));
        assert_eq!(l.runs[0].font_size, 58.0);
    }

    #[test]
    fn question_payloads() {
        assert_eq!(question_text_from_payload(r#"{"text": "Favourite food?"}"#), "Favourite food?");
        assert_eq!(question_text_from_payload(r#"{"question": "Why?", "id": 3}"#), "Why?");
        assert_eq!(question_text_from_payload("{not json"), "{not json");
        assert_eq!(question_text_from_payload(r#"{"id": 3}"#), r#"{"id": 3}"#);
        assert_eq!(question_text_from_payload("plain"), "plain");
    }

    #[test]
    fn element_content_prefers_formatted_text() {
        let mut el = Element::new("e", crate::model::ElementKind::Qna);
        el.question_text = Some(r#"{"text": "Best day?"}"#.to_string());
        el.text = Some("plain".to_string());
        el.formatted_text = Some("<b>rich</b>".to_string());
        let content = ElementContent::of(&el);
        assert_eq!(content.question, "Best day?");
        assert_eq!(content.answer, "<b>rich</b>");
        assert!(content.answer_is_markup);

        el.formatted_text = Some(String::new());
        let content = ElementContent::of(&el);
        assert_eq!(content.answer, "plain");
        assert!(!content.answer_is_markup);
    }

    #[test]
    fn plain_answers_keep_angle_brackets() {
        let (qs, as_) = (question_style(), answer_style());
        let ctx = FontContext::new();
        for text in ["I <3 you", "x < y and y > z", "a<b"] {
            let mut el = Element::new("t", crate::model::ElementKind::Text);
            el.width = 2000.0;
            el.height = 300.0;
            el.text = Some(text.to_string());
            let content = ElementContent::of(&el);
            let input = element_input(&el, &content, &as_, &qs, &as_);
            let l = layout(&input, &XmlMarkupParser, &ctx);
            let laid: String = l.runs.iter().map(|r| r.text.as_str()).collect();
            assert_eq!(laid, text);
        }
    }

    #[test]
    fn free_text_has_no_question() {
        let mut el = Element::new("t", crate::model::ElementKind::Text);
        el.question_text = Some("ignored".to_string());
        el.text = Some("hello".to_string());
        let content = ElementContent::of(&el);
        assert_eq!(content.question, "");
        assert_eq!(content.answer, "hello");
    }
}
