//! # Style Resolution
//!
//! Decides the final style of a placed element by merging, per facet:
//!
//! ```text
//!   element facet settings    questionSettings / answerSettings, element.font, ...
//!         ↓
//!   element shared settings   textSettings, top-level fontSize, ...
//!         ↓
//!   theme category default    element.theme → page theme → book theme → "default"
//!         ↓
//!   hard-coded fallback       58 for questions, 50 for answers and body text
//! ```
//!
//! The result is fully populated except for colors. A color nobody set stays
//! `None` so the renderer's own ink color applies.
//!
//! Resolution is a pure function of `(catalog, element, page, book)`. The
//! interactive editor and the export pipeline call the same functions, which
//! is what keeps their output identical.

pub mod cache;
pub mod cascade;

pub use cache::StyleCache;

use crate::catalog::{Catalog, Palette, StyleDefaults, Theme, DEFAULT_ID};
use crate::model::{
    BackgroundSettings, Book, BorderSettings, Element, ElementCategory, FontSettings,
    LayoutVariant, Page, ParagraphSpacing, RuledLinesSettings, TextAlign, TextSettings,
};
use crate::units::{self, normalize_opacity, Quantity, ScaleProfile};
use cascade::{cascade, first_set, Layer};
use serde::Serialize;

pub const QUESTION_FONT_SIZE: f64 = 58.0;
pub const ANSWER_FONT_SIZE: f64 = 50.0;
pub const BODY_FONT_SIZE: f64 = 50.0;
pub const FONT_FAMILY: &str = "Arial, sans-serif";
pub const PADDING: f64 = 4.0;

// Actual-scale fallbacks
const BORDER_WIDTH: f64 = 2.0;
const RULED_LINE_WIDTH: f64 = 1.6;
const RULED_LINE_OPACITY: f64 = 0.5;
const SHAPE_STROKE_WIDTH: f64 = 4.0;

/// A fully resolved text style, ready for measurement and drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextStyle {
    /// Font size on the actual scale.
    pub font_size: f64,
    pub font_family: String,
    pub font_bold: bool,
    pub font_italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    pub font_opacity: f64,
    pub paragraph_spacing: ParagraphSpacing,
    pub align: TextAlign,
    pub padding: f64,
    pub border: ResolvedBorder,
    pub background: ResolvedBackground,
    pub ruled_lines: ResolvedRuledLines,
}

impl Default for RichTextStyle {
    fn default() -> Self {
        Self {
            font_size: BODY_FONT_SIZE,
            font_family: FONT_FAMILY.to_string(),
            font_bold: false,
            font_italic: false,
            font_color: None,
            font_opacity: 1.0,
            paragraph_spacing: ParagraphSpacing::default(),
            align: TextAlign::default(),
            padding: PADDING,
            border: ResolvedBorder::default(),
            background: ResolvedBackground::default(),
            ruled_lines: ResolvedRuledLines::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBorder {
    pub enabled: bool,
    /// Stroke width on the actual scale.
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub opacity: f64,
    pub theme: String,
}

impl Default for ResolvedBorder {
    fn default() -> Self {
        Self {
            enabled: false,
            width: BORDER_WIDTH,
            color: None,
            opacity: 1.0,
            theme: DEFAULT_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBackground {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub opacity: f64,
}

impl Default for ResolvedBackground {
    fn default() -> Self {
        Self {
            enabled: false,
            color: None,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRuledLines {
    pub enabled: bool,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub opacity: f64,
    pub theme: String,
}

impl Default for ResolvedRuledLines {
    fn default() -> Self {
        Self {
            enabled: false,
            width: RULED_LINE_WIDTH,
            color: None,
            opacity: RULED_LINE_OPACITY,
            theme: DEFAULT_ID.to_string(),
        }
    }
}

/// Resolved style of a shape, brush stroke, line, or image frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    pub stroke_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub fill_opacity: f64,
    pub corner_radius: f64,
    pub opacity: f64,
    pub border: ResolvedBorder,
}

/// Both sides of a question/answer element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QnaStyles {
    pub variant: LayoutVariant,
    /// Block variant with per-side settings enabled.
    pub individual: bool,
    pub question: RichTextStyle,
    pub answer: RichTextStyle,
}

/// One side of a question/answer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Question,
    Answer,
}

impl Side {
    fn category(self) -> ElementCategory {
        match self {
            Side::Question => ElementCategory::Question,
            Side::Answer => ElementCategory::Answer,
        }
    }

    fn settings(self, element: &Element) -> Option<&TextSettings> {
        match self {
            Side::Question => element.question_settings.as_ref(),
            Side::Answer => element.answer_settings.as_ref(),
        }
    }

    fn fallback_font_size(self) -> f64 {
        match self {
            Side::Question => QUESTION_FONT_SIZE,
            Side::Answer => ANSWER_FONT_SIZE,
        }
    }
}

/// The theme id an element renders with.
///
/// `element.theme` only counts when it names a catalog theme; otherwise it is
/// the element's stroke style ("rough", ...). A page `themeId` key overrides
/// the book even when its value is `null`, which selects `"default"`.
pub fn effective_theme_id<'a>(
    catalog: &Catalog,
    element: &'a Element,
    page: &'a Page,
    book: &'a Book,
) -> &'a str {
    if let Some(theme) = element
        .theme
        .as_deref()
        .filter(|t| catalog.has_theme(t))
    {
        return theme;
    }
    page_theme_id(page, book)
}

/// The theme id a page renders with, ignoring element overrides.
pub fn page_theme_id<'a>(page: &'a Page, book: &'a Book) -> &'a str {
    if let Some(explicit) = &page.theme_id {
        return explicit.as_deref().filter(|t| !t.is_empty()).unwrap_or(DEFAULT_ID);
    }
    page.background
        .as_ref()
        .and_then(|bg| bg.page_theme.as_deref())
        .filter(|t| !t.is_empty())
        .or_else(|| book.declared_theme())
        .unwrap_or(DEFAULT_ID)
}

/// The palette explicitly chosen for a page (page key, else book), if any.
/// A present-but-null page key means "no explicit palette".
pub fn explicit_palette_id<'a>(page: &'a Page, book: &'a Book) -> Option<&'a str> {
    let chosen = match &page.color_palette_id {
        Some(explicit) => explicit.as_deref(),
        None => book.color_palette_id.as_deref(),
    };
    chosen.filter(|p| !p.is_empty())
}

/// The palette a page uses: the explicit choice when the catalog knows it,
/// else the page theme's default palette.
pub fn effective_palette<'c>(catalog: &'c Catalog, page: &Page, book: &Book) -> &'c Palette {
    match explicit_palette_id(page, book).filter(|p| catalog.has_palette(p)) {
        Some(id) => catalog.palette(Some(id)),
        None => catalog.theme_palette(Some(page_theme_id(page, book))),
    }
}

/// Id of the palette a page uses.
pub fn effective_palette_id<'c>(catalog: &'c Catalog, page: &Page, book: &Book) -> &'c str {
    &effective_palette(catalog, page, book).id
}

/// Style of an element as a whole. For question/answer elements this is the
/// shared box style; use [`resolve_question_style`] and
/// [`resolve_answer_style`] for the two sides.
pub fn resolve_style(catalog: &Catalog, element: &Element, page: &Page, book: &Book) -> RichTextStyle {
    let ctx = Context::new(catalog, element, page, book);
    let nested = nested_blocks(element);
    let flat = flat_keys(element);
    let empty = TextSettings::default();
    let text_settings = element.text_settings.as_ref().unwrap_or(&empty);

    if element.is_qna() {
        let layers = [
            (Layer::ElementFacet, text_settings),
            (Layer::ElementShared, &nested),
            (Layer::ElementShared, &flat),
        ];
        let theme = [ctx.theme.defaults_for(ElementCategory::Text)];
        let align = alignment(element, None, &theme);
        return ctx.build(&layers, &theme, BODY_FONT_SIZE, align);
    }

    let category = element.category();
    let layers = [
        (Layer::ElementFacet, &nested),
        (Layer::ElementShared, &flat),
        (Layer::ElementShared, text_settings),
    ];
    let fallback = match category {
        ElementCategory::Question => QUESTION_FONT_SIZE,
        ElementCategory::Answer => ANSWER_FONT_SIZE,
        _ => BODY_FONT_SIZE,
    };
    let mut theme = vec![ctx.theme.defaults_for(category)];
    if category != ElementCategory::Text {
        theme.push(ctx.theme.defaults_for(ElementCategory::Text));
    }
    let align = alignment(element, None, &theme);
    ctx.build(&layers, &theme, fallback, align)
}

pub fn resolve_question_style(catalog: &Catalog, element: &Element, page: &Page, book: &Book) -> RichTextStyle {
    resolve_side_style(catalog, element, page, book, Side::Question)
}

pub fn resolve_answer_style(catalog: &Catalog, element: &Element, page: &Page, book: &Book) -> RichTextStyle {
    resolve_side_style(catalog, element, page, book, Side::Answer)
}

/// Style of one side of a question/answer element.
pub fn resolve_side_style(
    catalog: &Catalog,
    element: &Element,
    page: &Page,
    book: &Book,
    side: Side,
) -> RichTextStyle {
    let ctx = Context::new(catalog, element, page, book);
    let empty = TextSettings::default();
    let own = side.settings(element).unwrap_or(&empty);
    let shared = element.text_settings.as_ref().unwrap_or(&empty);

    let layers = [(Layer::ElementFacet, own), (Layer::ElementShared, shared)];
    let theme = [
        ctx.theme.defaults_for(side.category()),
        ctx.theme.defaults_for(ElementCategory::Text),
    ];
    let own_align = if uses_individual_settings(element) {
        own.align
    } else {
        None
    };
    let align = alignment(element, own_align, &theme);
    ctx.build(&layers, &theme, side.fallback_font_size(), align)
}

pub fn resolve_qna_styles(catalog: &Catalog, element: &Element, page: &Page, book: &Book) -> QnaStyles {
    QnaStyles {
        variant: element.effective_variant(),
        individual: uses_individual_settings(element),
        question: resolve_question_style(catalog, element, page, book),
        answer: resolve_answer_style(catalog, element, page, book),
    }
}

/// Style of a shape, brush stroke, line, or image frame.
pub fn resolve_shape_style(catalog: &Catalog, element: &Element, page: &Page, book: &Book) -> ShapeStyle {
    let theme_id = effective_theme_id(catalog, element, page, book);
    let theme = catalog.theme(Some(theme_id));
    let defaults = theme.defaults_for(element.category());
    let stroke_style = element
        .theme
        .as_deref()
        .filter(|t| !catalog.has_theme(t));
    let profile = catalog.scale_profile(Some(theme_id)).with_stroke_style(stroke_style);

    let stroke_width = first_set(&[
        (Layer::ElementFacet, element.stroke_width),
        (Layer::Theme, defaults.stroke_width),
    ])
    .filter(|w| *w >= 0.0)
    .map(|w| profile.to_actual(Quantity::StrokeWidth, w))
    .unwrap_or(SHAPE_STROKE_WIDTH);

    let corner_radius = first_set(&[
        (Layer::ElementFacet, element.corner_radius),
        (Layer::Theme, defaults.corner_radius),
    ])
    .filter(|r| *r >= 0.0)
    .map(|r| profile.to_actual(Quantity::CornerRadius, r))
    .unwrap_or(0.0);

    let border = cascade(&[
        (Layer::ElementFacet, element.border.as_ref()),
        (Layer::Theme, defaults.border.as_ref()),
    ]);

    ShapeStyle {
        stroke: first_set(&[
            (Layer::ElementFacet, element.stroke.clone()),
            (Layer::Theme, defaults.stroke.clone()),
        ]),
        stroke_width,
        fill: first_set(&[
            (Layer::ElementFacet, element.fill.clone()),
            (Layer::Theme, defaults.fill.clone()),
        ]),
        fill_opacity: first_set(&[
            (Layer::ElementFacet, element.fill_opacity),
            (Layer::Theme, defaults.fill_opacity),
        ])
        .map(normalize_opacity)
        .unwrap_or(1.0),
        corner_radius,
        opacity: first_set(&[
            (Layer::ElementFacet, element.opacity),
            (Layer::Theme, defaults.opacity),
        ])
        .map(normalize_opacity)
        .unwrap_or(1.0),
        border: finish_border(border, profile),
    }
}

/// Block variant with per-side settings turned on.
pub fn uses_individual_settings(element: &Element) -> bool {
    element.effective_variant() == LayoutVariant::Block
        && element.qna_individual_settings.unwrap_or(false)
}

/// Shared alignment chain, with an optional per-side value in front and the
/// theme's category default behind it.
fn alignment(element: &Element, own: Option<TextAlign>, theme: &[&StyleDefaults]) -> TextAlign {
    let shared = [
        element.align,
        element.format.as_ref().and_then(|f| f.text_align),
        element.question_settings.as_ref().and_then(|s| s.align),
        element.answer_settings.as_ref().and_then(|s| s.align),
        element.text_settings.as_ref().and_then(|s| s.align),
    ];
    std::iter::once(own)
        .chain(shared)
        .flatten()
        .next()
        .or_else(|| theme.iter().find_map(|d| d.align))
        .unwrap_or_default()
}

/// Nested facet blocks of a non-composite element as one settings layer.
fn nested_blocks(element: &Element) -> TextSettings {
    TextSettings {
        font: element.font.clone(),
        border: element.border.clone(),
        background: element.background.clone(),
        ruled_lines: element.ruled_lines.clone(),
        ..Default::default()
    }
}

/// Top-level style keys of an element as one settings layer.
fn flat_keys(element: &Element) -> TextSettings {
    let font = element.flat_font();
    TextSettings {
        font_size: font.font_size,
        font_family: font.font_family,
        font_bold: font.font_bold,
        font_italic: font.font_italic,
        font_color: font.font_color,
        font_opacity: font.font_opacity,
        paragraph_spacing: element.paragraph_spacing,
        align: element.align,
        padding: element.padding,
        ..Default::default()
    }
}

fn finish_border(border: BorderSettings, profile: ScaleProfile) -> ResolvedBorder {
    let theme = border.border_theme.unwrap_or_else(|| DEFAULT_ID.to_string());
    let stroke = profile.with_stroke_style(Some(theme.as_str()));
    ResolvedBorder {
        enabled: border.enabled.unwrap_or(false),
        width: border
            .border_width
            .filter(|w| *w >= 0.0)
            .map(|w| stroke.to_actual(Quantity::StrokeWidth, w))
            .unwrap_or(BORDER_WIDTH),
        color: border.border_color,
        opacity: border.border_opacity.map(normalize_opacity).unwrap_or(1.0),
        theme,
    }
}

/// Everything resolution needs that is fixed per element.
struct Context<'a> {
    theme: &'a Theme,
    profile: ScaleProfile,
    qna2: bool,
}

impl<'a> Context<'a> {
    fn new(catalog: &'a Catalog, element: &Element, page: &Page, book: &Book) -> Self {
        let theme_id = effective_theme_id(catalog, element, page, book);
        Self {
            theme: catalog.theme(Some(theme_id)),
            profile: catalog.scale_profile(Some(theme_id)),
            qna2: element.is_qna2(),
        }
    }

    fn normalize_font_size(&self, raw: f64) -> f64 {
        if self.qna2 && units::looks_like_common_font_size(raw) {
            return raw * self.profile.font_size;
        }
        self.profile.to_actual(Quantity::FontSize, raw)
    }

    fn build(
        &self,
        layers: &[(Layer, &TextSettings)],
        theme: &[&StyleDefaults],
        fallback_font_size: f64,
        align: TextAlign,
    ) -> RichTextStyle {
        let element_fonts: Vec<(Layer, FontSettings)> =
            layers.iter().map(|(l, s)| (*l, s.font_facet())).collect();
        let mut font_layers: Vec<(Layer, Option<&FontSettings>)> =
            element_fonts.iter().map(|(l, f)| (*l, Some(f))).collect();
        font_layers.extend(theme.iter().map(|d| (Layer::Theme, d.font.as_ref())));
        let font: FontSettings = cascade(&font_layers);

        let border = cascade(&self.block_layers(layers, theme, |s| s.border.as_ref(), |d| d.border.as_ref()));
        let background: BackgroundSettings =
            cascade(&self.block_layers(layers, theme, |s| s.background.as_ref(), |d| d.background.as_ref()));
        let ruled_lines: RuledLinesSettings =
            cascade(&self.block_layers(layers, theme, |s| s.ruled_lines.as_ref(), |d| d.ruled_lines.as_ref()));

        let paragraph_spacing = first_set(
            &layers
                .iter()
                .map(|(l, s)| (*l, s.paragraph_spacing))
                .chain(theme.iter().map(|d| (Layer::Theme, d.paragraph_spacing)))
                .collect::<Vec<_>>(),
        )
        .unwrap_or_default();

        let padding = first_set(
            &layers
                .iter()
                .map(|(l, s)| (*l, s.padding))
                .chain(theme.iter().map(|d| (Layer::Theme, d.padding)))
                .collect::<Vec<_>>(),
        )
        .filter(|p| *p >= 0.0)
        .unwrap_or(PADDING);

        let ruled_theme = ruled_lines
            .ruled_lines_theme
            .unwrap_or_else(|| DEFAULT_ID.to_string());
        let ruled_stroke = self.profile.with_stroke_style(Some(ruled_theme.as_str()));

        RichTextStyle {
            font_size: font
                .font_size
                .filter(|s| *s > 0.0)
                .map(|s| self.normalize_font_size(s))
                .unwrap_or(fallback_font_size),
            font_family: font
                .font_family
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| FONT_FAMILY.to_string()),
            font_bold: font.font_bold.unwrap_or(false),
            font_italic: font.font_italic.unwrap_or(false),
            font_color: font.font_color,
            font_opacity: font.font_opacity.map(normalize_opacity).unwrap_or(1.0),
            paragraph_spacing,
            align,
            padding,
            border: finish_border(border, self.profile),
            background: ResolvedBackground {
                enabled: background.enabled.unwrap_or(false),
                color: background.background_color,
                opacity: background
                    .background_opacity
                    .map(normalize_opacity)
                    .unwrap_or(1.0),
            },
            ruled_lines: ResolvedRuledLines {
                enabled: ruled_lines.enabled.unwrap_or(false),
                width: ruled_lines
                    .line_width
                    .filter(|w| *w >= 0.0)
                    .map(|w| ruled_stroke.to_actual(Quantity::StrokeWidth, w))
                    .unwrap_or(RULED_LINE_WIDTH),
                color: ruled_lines.line_color,
                opacity: ruled_lines
                    .line_opacity
                    .map(normalize_opacity)
                    .unwrap_or(RULED_LINE_OPACITY),
                theme: ruled_theme,
            },
        }
    }

    fn block_layers<'s, T>(
        &self,
        layers: &[(Layer, &'s TextSettings)],
        theme: &[&'s StyleDefaults],
        from_settings: impl Fn(&'s TextSettings) -> Option<&'s T>,
        from_theme: impl Fn(&'s StyleDefaults) -> Option<&'s T>,
    ) -> Vec<(Layer, Option<&'s T>)> {
        layers
            .iter()
            .map(|(l, s)| (*l, from_settings(*s)))
            .chain(theme.iter().map(|d| (Layer::Theme, from_theme(*d))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, TextFormat, TextType};

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn qna() -> Element {
        Element::new("e1", ElementKind::Qna)
    }

    fn settings_with_size(size: f64) -> TextSettings {
        TextSettings {
            font_size: Some(size),
            ..Default::default()
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let c = catalog();
        let mut el = qna();
        el.question_settings = Some(settings_with_size(20.0));
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        assert_eq!(
            resolve_question_style(&c, &el, &page, &book),
            resolve_question_style(&c, &el, &page, &book)
        );
        assert_eq!(resolve_style(&c, &el, &page, &book), resolve_style(&c, &el, &page, &book));
    }

    #[test]
    fn element_setting_overrides_theme_default() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = qna();
        el.question_settings = Some(settings_with_size(20.0));
        assert_eq!(resolve_question_style(&c, &el, &page, &book).font_size, 64.0);

        el.question_settings = None;
        assert_eq!(resolve_question_style(&c, &el, &page, &book).font_size, 58.0);
    }

    #[test]
    fn text_settings_sit_between_facet_and_theme() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = qna();
        el.text_settings = Some(TextSettings {
            font_size: Some(15.0),
            font_family: Some("Georgia, serif".to_string()),
            ..Default::default()
        });
        el.answer_settings = Some(settings_with_size(12.0));
        let answer = resolve_answer_style(&c, &el, &page, &book);
        assert_eq!(answer.font_size, 12.0 * 3.2);
        assert_eq!(answer.font_family, "Georgia, serif");

        let question = resolve_question_style(&c, &el, &page, &book);
        assert_eq!(question.font_size, 48.0);
        assert!(question.font_bold, "bold comes from the theme question default");
    }

    #[test]
    fn hard_coded_fallbacks_apply_without_theme_data() {
        let c = Catalog::from_json(
            r#"[{"id": "default", "name": "Bare", "palette": "default"}]"#,
            r##"[{"id": "default", "name": "Bare", "colors": {
                "primary": "#000", "secondary": "#111", "accent": "#222",
                "background": "#fff", "surface": "#eee", "text": "#000"}}]"##,
        )
        .unwrap();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let el = qna();
        let q = resolve_question_style(&c, &el, &page, &book);
        let a = resolve_answer_style(&c, &el, &page, &book);
        assert_eq!(q.font_size, QUESTION_FONT_SIZE);
        assert_eq!(a.font_size, ANSWER_FONT_SIZE);
        assert_eq!(a.font_family, FONT_FAMILY);
        assert_eq!(a.paragraph_spacing, ParagraphSpacing::Medium);
        assert_eq!(a.align, TextAlign::Left);
        assert_eq!(a.font_color, None);
    }

    #[test]
    fn alignment_falls_back_to_format_text_align() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = qna();
        el.format = Some(TextFormat {
            text_align: Some(TextAlign::Center),
        });
        let styles = resolve_qna_styles(&c, &el, &page, &book);
        assert_eq!(styles.variant, LayoutVariant::Inline);
        assert_eq!(styles.question.align, TextAlign::Center);
        assert_eq!(styles.answer.align, TextAlign::Center);
    }

    #[test]
    fn shared_alignment_ignores_side_order_in_inline_mode() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = qna();
        el.question_settings = Some(TextSettings {
            align: Some(TextAlign::Right),
            ..Default::default()
        });
        el.answer_settings = Some(TextSettings {
            align: Some(TextAlign::Center),
            ..Default::default()
        });
        let styles = resolve_qna_styles(&c, &el, &page, &book);
        assert_eq!(styles.question.align, TextAlign::Right);
        assert_eq!(styles.answer.align, TextAlign::Right);
    }

    #[test]
    fn individual_block_settings_align_each_side() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = qna();
        el.layout_variant = Some(LayoutVariant::Block);
        el.qna_individual_settings = Some(true);
        el.align = Some(TextAlign::Justify);
        el.question_settings = Some(TextSettings {
            align: Some(TextAlign::Right),
            ..Default::default()
        });
        let styles = resolve_qna_styles(&c, &el, &page, &book);
        assert!(styles.individual);
        assert_eq!(styles.question.align, TextAlign::Right);
        assert_eq!(styles.answer.align, TextAlign::Justify);

        el.qna_individual_settings = Some(false);
        let styles = resolve_qna_styles(&c, &el, &page, &book);
        assert_eq!(styles.question.align, TextAlign::Justify);
    }

    #[test]
    fn qna2_common_sizes_are_upconverted() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = Element::new("e", ElementKind::Qna2);
        el.answer_settings = Some(settings_with_size(14.0));
        assert_eq!(resolve_answer_style(&c, &el, &page, &book).font_size, 14.0 * 3.2);

        el.answer_settings = Some(settings_with_size(40.0));
        assert_eq!(resolve_answer_style(&c, &el, &page, &book).font_size, 40.0);
    }

    #[test]
    fn unset_colors_are_omitted() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let el = qna();
        let style = resolve_answer_style(&c, &el, &page, &book);
        assert_eq!(style.font_color, None);
        assert_eq!(style.border.color, None);
        assert_eq!(style.background.color, None);

        let mut el = qna();
        el.answer_settings = Some(TextSettings {
            font_color: Some("#ff0000".to_string()),
            ..Default::default()
        });
        let style = resolve_answer_style(&c, &el, &page, &book);
        assert_eq!(style.font_color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn theme_chain_element_page_book_default() {
        let c = catalog();
        let mut book = Book::new("b1");
        let mut page = Page::new("p1", 1);
        let mut el = qna();
        assert_eq!(effective_theme_id(&c, &el, &page, &book), "default");

        book.book_theme = Some("vintage".to_string());
        assert_eq!(effective_theme_id(&c, &el, &page, &book), "vintage");

        page.theme_id = Some(Some("notebook".to_string()));
        assert_eq!(effective_theme_id(&c, &el, &page, &book), "notebook");

        page.theme_id = Some(None);
        assert_eq!(effective_theme_id(&c, &el, &page, &book), "default");

        el.theme = Some("playful".to_string());
        assert_eq!(effective_theme_id(&c, &el, &page, &book), "playful");

        el.theme = Some("rough".to_string());
        assert_eq!(effective_theme_id(&c, &el, &page, &book), "default");
    }

    #[test]
    fn unknown_theme_resolves_like_default() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let mut book = Book::new("b1");
        let el = qna();
        let default_style = resolve_question_style(&c, &el, &page, &book);
        book.book_theme = Some("vanished".to_string());
        assert_eq!(resolve_question_style(&c, &el, &page, &book), default_style);
    }

    #[test]
    fn theme_defaults_supply_colors_and_ruled_lines() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let mut book = Book::new("b1");
        book.book_theme = Some("notebook".to_string());
        let el = qna();
        let answer = resolve_answer_style(&c, &el, &page, &book);
        assert_eq!(answer.font_color.as_deref(), Some("#1e293b"));
        assert!(answer.ruled_lines.enabled);
        assert_eq!(answer.ruled_lines.width, 2.0);
        assert_eq!(answer.paragraph_spacing, ParagraphSpacing::Large);
    }

    #[test]
    fn rough_border_is_thicker() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = Element::new("t", ElementKind::Text);
        el.border = Some(BorderSettings {
            enabled: Some(true),
            border_width: Some(2.0),
            ..Default::default()
        });
        assert_eq!(resolve_style(&c, &el, &page, &book).border.width, 4.0);

        el.border.as_mut().unwrap().border_theme = Some("rough".to_string());
        assert_eq!(resolve_style(&c, &el, &page, &book).border.width, 6.0);
    }

    #[test]
    fn plain_text_element_reads_nested_then_flat() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = Element::new("t", ElementKind::Text);
        el.font_size = Some(10.0);
        el.font_bold = Some(true);
        el.font = Some(FontSettings {
            font_size: Some(12.0),
            ..Default::default()
        });
        let style = resolve_style(&c, &el, &page, &book);
        assert_eq!(style.font_size, 12.0 * 3.2);
        assert!(style.font_bold);
    }

    #[test]
    fn question_text_type_uses_question_fallback() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let book = Book::new("b1");
        let mut el = Element::new("q", ElementKind::Text);
        el.text_type = Some(TextType::Question);
        let style = resolve_style(&c, &el, &page, &book);
        assert_eq!(style.font_size, 58.0);
        assert!(style.font_bold);
    }

    #[test]
    fn shape_style_converts_stroke_and_radius() {
        let c = catalog();
        let page = Page::new("p1", 1);
        let mut book = Book::new("b1");
        let mut el = Element::new("s", ElementKind::Rect);
        let style = resolve_shape_style(&c, &el, &page, &book);
        assert_eq!(style.stroke.as_deref(), Some("#1f2937"));
        assert_eq!(style.stroke_width, 8.0);
        assert_eq!(style.corner_radius, 0.0);

        el.theme = Some("rough".to_string());
        el.corner_radius = Some(10.0);
        let style = resolve_shape_style(&c, &el, &page, &book);
        assert_eq!(style.stroke_width, 12.0);
        assert_eq!(style.corner_radius, 20.0);

        book.book_theme = Some("playful".to_string());
        el.theme = None;
        el.corner_radius = None;
        let style = resolve_shape_style(&c, &el, &page, &book);
        assert_eq!(style.fill.as_deref(), Some("#a8d8f7"));
        assert_eq!(style.corner_radius, 64.0);
        assert_eq!(style.fill_opacity, 0.6);
    }

    #[test]
    fn palette_chain() {
        let c = catalog();
        let mut book = Book::new("b1");
        let mut page = Page::new("p1", 1);
        book.book_theme = Some("vintage".to_string());
        assert_eq!(effective_palette(&c, &page, &book).id, "sepia");

        book.color_palette_id = Some("ocean".to_string());
        assert_eq!(effective_palette(&c, &page, &book).id, "ocean");

        page.color_palette_id = Some(None);
        assert_eq!(effective_palette(&c, &page, &book).id, "sepia");

        page.color_palette_id = Some(Some("forest".to_string()));
        assert_eq!(effective_palette(&c, &page, &book).id, "forest");

        page.color_palette_id = Some(Some("gone".to_string()));
        assert_eq!(effective_palette(&c, &page, &book).id, "sepia");
    }
}
