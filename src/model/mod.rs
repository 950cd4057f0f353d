//! # Book Model
//!
//! The input representation: a book owns pages, a page owns placed elements.
//! Everything deserializes straight from the editor's JSON (camelCase keys).
//!
//! Style data on elements is deliberately partial. Every style field is an
//! `Option`, and the resolver fills the gaps from the page, the book, and the
//! theme. Two serde details matter for that cascade:
//!
//! - Page-level overrides (`themeId`, `colorPaletteId`, `layoutTemplateId`)
//!   are `Option<Option<String>>`. A missing key inherits from the book; a
//!   present key is an explicit page choice even when its value is `null`.
//! - Nested settings blocks are tolerant. A block with the wrong shape
//!   deserializes as empty instead of rejecting the whole document, and
//!   numeric fields accept numeric strings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A book: top of the inheritance chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Theme id chosen for the whole book.
    #[serde(default)]
    pub book_theme: Option<String>,
    /// Legacy spelling of `bookTheme`. Consulted after it.
    #[serde(default)]
    pub theme_id: Option<String>,
    #[serde(default)]
    pub color_palette_id: Option<String>,
    #[serde(default)]
    pub layout_template_id: Option<String>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// A printable page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub page_number: u32,
    /// Placed elements in z-order.
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default, deserialize_with = "lenient")]
    pub background: Option<PageBackground>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub color_palette_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit", skip_serializing_if = "Option::is_none")]
    pub layout_template_id: Option<Option<String>>,
}

/// Background block stored on a page.
///
/// Holds either a full explicit background (when `type` and `value` are both
/// set) or just bookkeeping such as the page theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBackground {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<BackgroundKind>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub opacity: Option<f64>,
    /// Theme the page background was composed for.
    #[serde(default)]
    pub page_theme: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pattern_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pattern_stroke_width: Option<f64>,
    #[serde(default)]
    pub pattern_foreground_color: Option<String>,
    #[serde(default)]
    pub pattern_background_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pattern_background_opacity: Option<f64>,
    #[serde(default)]
    pub background_image_template_id: Option<String>,
    #[serde(default)]
    pub image_size: Option<String>,
    #[serde(default)]
    pub image_repeat: Option<bool>,
    #[serde(default)]
    pub image_position: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub image_width: Option<f64>,
    #[serde(default)]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Pattern,
    Image,
}

/// A fully decided page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackgroundDescriptor {
    #[serde(rename_all = "camelCase")]
    Color { value: String, opacity: f64 },
    #[serde(rename_all = "camelCase")]
    Pattern {
        /// Pattern style name ("dots", "grid", "lines", ...).
        value: String,
        opacity: f64,
        pattern_size: f64,
        pattern_stroke_width: f64,
        pattern_foreground_color: String,
        pattern_background_color: String,
        pattern_background_opacity: f64,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        /// Image URL.
        value: String,
        opacity: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background_image_template_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_size: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_repeat: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_position: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background_color: Option<String>,
    },
}

impl BackgroundDescriptor {
    pub fn opacity(&self) -> f64 {
        match self {
            BackgroundDescriptor::Color { opacity, .. }
            | BackgroundDescriptor::Pattern { opacity, .. }
            | BackgroundDescriptor::Image { opacity, .. } => *opacity,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            BackgroundDescriptor::Color { value, .. }
            | BackgroundDescriptor::Pattern { value, .. }
            | BackgroundDescriptor::Image { value, .. } => value,
        }
    }
}

impl PageBackground {
    /// The explicit background this block describes, if it describes one.
    ///
    /// Opacity is carried through raw; the background composer normalizes it.
    pub fn explicit_descriptor(&self) -> Option<BackgroundDescriptor> {
        let kind = self.kind?;
        let value = self.value.clone().filter(|v| !v.is_empty())?;
        let opacity = self.opacity.unwrap_or(1.0);
        Some(match kind {
            BackgroundKind::Color => BackgroundDescriptor::Color { value, opacity },
            BackgroundKind::Pattern => BackgroundDescriptor::Pattern {
                value,
                opacity,
                pattern_size: self.pattern_size.unwrap_or(20.0),
                pattern_stroke_width: self.pattern_stroke_width.unwrap_or(1.0),
                pattern_foreground_color: self
                    .pattern_foreground_color
                    .clone()
                    .unwrap_or_else(|| "#666666".to_string()),
                pattern_background_color: self
                    .pattern_background_color
                    .clone()
                    .unwrap_or_else(|| "#ffffff".to_string()),
                pattern_background_opacity: self.pattern_background_opacity.unwrap_or(1.0),
            },
            BackgroundKind::Image => BackgroundDescriptor::Image {
                value,
                opacity,
                background_image_template_id: self.background_image_template_id.clone(),
                image_size: self.image_size.clone(),
                image_repeat: self.image_repeat,
                image_position: self.image_position.clone(),
                image_width: self.image_width,
                background_color: self.background_color.clone(),
            },
        })
    }
}

/// What kind of object an element is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Text,
    Image,
    Placeholder,
    Sticker,
    Rect,
    Circle,
    Triangle,
    Polygon,
    Heart,
    Star,
    #[serde(rename = "speech-bubble")]
    SpeechBubble,
    Brush,
    Line,
    Qna,
    Qna2,
    #[serde(other)]
    Other,
}

/// Finer-grained discriminator for text-bearing elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    Question,
    Answer,
    Qna,
    Qna2,
    FreeText,
    Text,
    #[serde(other)]
    Other,
}

/// The theme catalog bucket an element draws its defaults from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementCategory {
    Text,
    Question,
    Answer,
    Image,
    Shape,
    Brush,
    Line,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphSpacing {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    #[default]
    Inline,
    Block,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

/// Font facet. Sizes may be on either scale; the resolver normalizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSettings {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_bold: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub font_opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderSettings {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub border_opacity: Option<f64>,
    /// Stroke style: "default", "rough", "dashed", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSettings {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub background_opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuledLinesSettings {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub line_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruled_lines_theme: Option<String>,
}

/// A settings block on a composite element (`questionSettings`,
/// `answerSettings`, `textSettings`).
///
/// Font keys may appear flat on the block or inside a nested `font` object;
/// the flat keys win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSettings {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_bold: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub font_opacity: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub paragraph_spacing: Option<ParagraphSpacing>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ruled_lines: Option<RuledLinesSettings>,
}

impl TextSettings {
    /// Font facet of this block: flat keys over the nested `font` object.
    pub fn font_facet(&self) -> FontSettings {
        let nested = self.font.clone().unwrap_or_default();
        FontSettings {
            font_size: self.font_size.or(nested.font_size),
            font_family: self.font_family.clone().or(nested.font_family),
            font_bold: self.font_bold.or(nested.font_bold),
            font_italic: self.font_italic.or(nested.font_italic),
            font_color: self.font_color.clone().or(nested.font_color),
            font_opacity: self.font_opacity.or(nested.font_opacity),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

/// A placed object on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text_type: Option<TextType>,
    /// Element-level theme override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,

    /// Plain text content (free text, or the answer of a Q&A element).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Rich-text markup for the same content, preferred over `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_text: Option<String>,
    /// Question text or a JSON-encoded question payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,

    // Top-level (shared) text style
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_bold: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub font_opacity: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub paragraph_spacing: Option<ParagraphSpacing>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub format: Option<TextFormat>,

    // Nested facet blocks
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ruled_lines: Option<RuledLinesSettings>,

    // Composite Q&A blocks
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub question_settings: Option<TextSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub answer_settings: Option<TextSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text_settings: Option<TextSettings>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub layout_variant: Option<LayoutVariant>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub qna_individual_settings: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub answer_in_new_row: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub question_position: Option<QuestionPosition>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub question_width: Option<f64>,

    // Shape style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Element {
    /// Create an element of the given kind with no style.
    pub fn new(id: &str, kind: ElementKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            ..Default::default()
        }
    }

    /// Is this a composite question/answer element?
    pub fn is_qna(&self) -> bool {
        matches!(self.kind, ElementKind::Qna | ElementKind::Qna2)
            || matches!(self.text_type, Some(TextType::Qna | TextType::Qna2))
    }

    pub fn is_qna2(&self) -> bool {
        self.kind == ElementKind::Qna2 || self.text_type == Some(TextType::Qna2)
    }

    /// The theme bucket for the element as a whole. Composite elements use
    /// `Text` for their shared box; their question and answer sides read the
    /// `Question` and `Answer` buckets.
    pub fn category(&self) -> ElementCategory {
        match self.text_type {
            Some(TextType::Question) => return ElementCategory::Question,
            Some(TextType::Answer) => return ElementCategory::Answer,
            _ => {}
        }
        match self.kind {
            ElementKind::Text | ElementKind::Qna | ElementKind::Qna2 | ElementKind::Other => {
                ElementCategory::Text
            }
            ElementKind::Image | ElementKind::Placeholder | ElementKind::Sticker => {
                ElementCategory::Image
            }
            ElementKind::Brush => ElementCategory::Brush,
            ElementKind::Line => ElementCategory::Line,
            ElementKind::Rect
            | ElementKind::Circle
            | ElementKind::Triangle
            | ElementKind::Polygon
            | ElementKind::Heart
            | ElementKind::Star
            | ElementKind::SpeechBubble => ElementCategory::Shape,
        }
    }

    /// Layout variant actually used. qna2 is always inline.
    pub fn effective_variant(&self) -> LayoutVariant {
        if self.is_qna2() {
            LayoutVariant::Inline
        } else {
            self.layout_variant.unwrap_or_default()
        }
    }

    /// Font keys set directly on the element (`fontSize`, `fontFamily`, ...).
    pub fn flat_font(&self) -> FontSettings {
        FontSettings {
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            font_bold: self.font_bold,
            font_italic: self.font_italic,
            font_color: self.font_color.clone(),
            font_opacity: self.font_opacity,
        }
    }
}

impl Page {
    pub fn new(id: &str, page_number: u32) -> Self {
        Self {
            id: id.to_string(),
            page_number,
            ..Default::default()
        }
    }
}

impl Book {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    /// Theme id declared on the book, if any.
    pub fn declared_theme(&self) -> Option<&str> {
        self.book_theme
            .as_deref()
            .or(self.theme_id.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// Deserialize a present key into `Some(value)`, keeping `null` as
/// `Some(None)`. Paired with `#[serde(default)]` a missing key stays `None`.
fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize anything; fall back to `T::default()` when the value has the
/// wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Numbers, or strings holding numbers. Anything else is absent.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}
