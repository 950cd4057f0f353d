//! Themes: per-category partial style defaults plus page background settings.
//!
//! Font sizes in theme data are stored on the actual (render) scale. Stroke
//! widths and corner radii are stored on the common scale, the same way the
//! editor writes them onto elements.

use crate::model::{
    BackgroundSettings, BorderSettings, ElementCategory, FontSettings, ParagraphSpacing,
    RuledLinesSettings, TextAlign,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Id of the palette this theme uses unless the user picks another.
    pub palette: String,
    #[serde(default)]
    pub element_defaults: ElementDefaults,
    #[serde(default)]
    pub page_settings: PageSettings,
    #[serde(default)]
    pub scale: ScaleOverrides,
}

impl Theme {
    pub fn defaults_for(&self, category: ElementCategory) -> &StyleDefaults {
        self.element_defaults.for_category(category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDefaults {
    pub text: StyleDefaults,
    pub question: StyleDefaults,
    pub answer: StyleDefaults,
    pub image: StyleDefaults,
    pub shape: StyleDefaults,
    pub brush: StyleDefaults,
    pub line: StyleDefaults,
}

impl ElementDefaults {
    pub fn for_category(&self, category: ElementCategory) -> &StyleDefaults {
        match category {
            ElementCategory::Text => &self.text,
            ElementCategory::Question => &self.question,
            ElementCategory::Answer => &self.answer,
            ElementCategory::Image => &self.image,
            ElementCategory::Shape => &self.shape,
            ElementCategory::Brush => &self.brush,
            ElementCategory::Line => &self.line,
        }
    }
}

/// A partial style object. Any key may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_spacing: Option<ParagraphSpacing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruled_lines: Option<RuledLinesSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub background_color: Option<String>,
    pub background_opacity: Option<f64>,
    pub background_pattern: Option<BackgroundPattern>,
    pub background_image: Option<BackgroundImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundPattern {
    pub enabled: bool,
    /// Pattern style name: "dots", "grid", "lines", "cross", ...
    pub style: String,
    pub size: f64,
    pub stroke_width: f64,
    /// Opacity of the pattern ink.
    pub opacity: f64,
    /// Opacity of the pattern's backdrop.
    pub background_opacity: f64,
}

impl Default for BackgroundPattern {
    fn default() -> Self {
        Self {
            enabled: false,
            style: "dots".to_string(),
            size: 20.0,
            stroke_width: 1.0,
            opacity: 1.0,
            background_opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundImage {
    pub enabled: bool,
    pub template_id: Option<String>,
    /// "cover", "contain" or "stretch".
    pub size: String,
    pub repeat: bool,
    pub position: Option<String>,
    /// Width in percent of the page, for `contain` sizing.
    pub width: Option<f64>,
    pub opacity: f64,
}

impl Default for BackgroundImage {
    fn default() -> Self {
        Self {
            enabled: false,
            template_id: None,
            size: "cover".to_string(),
            repeat: false,
            position: None,
            width: None,
            opacity: 1.0,
        }
    }
}

/// Theme-specific actual-per-common ratios for the unit converters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleOverrides {
    pub font_size: Option<f64>,
    pub stroke_width: Option<f64>,
    pub corner_radius: Option<f64>,
}
