//! # Font Management
//!
//! Maps CSS-style family lists ("Courier New, monospace") to concrete font
//! metrics. Built-in Helvetica and Courier tables cover the generic families;
//! TrueType/OpenType fonts registered at startup are measured with ttf-parser.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use crate::error::QuireError;
use crate::text::{FontSpec, TextMeasurer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The built-in fonts. Oblique variants share the upright widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => StandardFontMetrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => StandardFontMetrics::HELVETICA_BOLD,
            // Courier is monospaced at every weight.
            _ => StandardFontMetrics::COURIER,
        }
    }

    fn select(monospace: bool, bold: bool, italic: bool) -> Self {
        match (monospace, bold, italic) {
            (false, false, false) => Self::Helvetica,
            (false, true, false) => Self::HelveticaBold,
            (false, false, true) => Self::HelveticaOblique,
            (false, true, true) => Self::HelveticaBoldOblique,
            (true, false, false) => Self::Courier,
            (true, true, false) => Self::CourierBold,
            (true, false, true) => Self::CourierOblique,
            (true, true, true) => Self::CourierBoldOblique,
        }
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl CustomFontMetrics {
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    pub fn from_font_data(data: &[u8]) -> Result<Self, QuireError> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| QuireError::Font(format!("unreadable font data: {}", e)))?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph) = face.glyph_index(ch) {
                advance_widths.insert(ch, face.glyph_hor_advance(glyph).unwrap_or(0));
            }
        }

        let default_advance = advance_widths
            .get(&' ')
            .copied()
            .filter(|w| *w > 0)
            .unwrap_or(units_per_em / 2);

        Ok(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }
}

/// A custom font to register, as it appears in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontEntry {
    /// Family name as used in style data ("Inter", "Comic Sans MS").
    pub family: String,
    /// Base64-encoded font data, or a data URI (`data:font/ttf;base64,...`).
    pub src: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub italic: bool,
}

fn default_weight() -> u32 {
    400
}

impl FontEntry {
    pub fn decode(&self) -> Result<Vec<u8>, QuireError> {
        use base64::Engine;
        let b64 = match self.src.strip_prefix("data:") {
            Some(uri) => uri
                .split_once(',')
                .map(|(_, data)| data)
                .ok_or_else(|| QuireError::Font(format!("font '{}': data URI without a comma", self.family)))?,
            None => self.src.as_str(),
        };
        base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|e| QuireError::Font(format!("font '{}': {}", self.family, e)))
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FontKey {
    /// Lowercased family name.
    family: String,
    bold: bool,
    italic: bool,
}

/// Metrics the measurer settled on for one font request.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedFont<'a> {
    Standard(StandardFont),
    Custom(&'a CustomFontMetrics),
}

/// Custom fonts by family, weight and style.
#[derive(Debug, Default)]
pub struct FontRegistry {
    custom: HashMap<FontKey, CustomFontMetrics>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom font. Weights of 600 and above count as bold.
    pub fn register(&mut self, family: &str, weight: u32, italic: bool, data: &[u8]) -> Result<(), QuireError> {
        let metrics = CustomFontMetrics::from_font_data(data)?;
        log::debug!("Registered font '{}' (weight {}, italic {})", family, weight, italic);
        self.custom.insert(
            FontKey {
                family: family.trim().to_lowercase(),
                bold: weight >= 600,
                italic,
            },
            metrics,
        );
        Ok(())
    }

    pub fn register_entry(&mut self, entry: &FontEntry) -> Result<(), QuireError> {
        let data = entry.decode()?;
        self.register(&entry.family, entry.weight, entry.italic, &data)
    }

    pub fn len(&self) -> usize {
        self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }

    /// Pick metrics for a family list. The first registered family wins,
    /// trying the exact style before the upright regular face. With no
    /// registered match, monospace families measure as Courier and
    /// everything else as Helvetica.
    pub fn resolve(&self, family_list: &str, bold: bool, italic: bool) -> ResolvedFont<'_> {
        let families: Vec<String> = family_list
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();

        for family in &families {
            for (b, i) in [(bold, italic), (false, false)] {
                let key = FontKey {
                    family: family.clone(),
                    bold: b,
                    italic: i,
                };
                if let Some(m) = self.custom.get(&key) {
                    return ResolvedFont::Custom(m);
                }
            }
        }

        let monospace = families
            .iter()
            .any(|f| f == "monospace" || f.starts_with("courier"));
        ResolvedFont::Standard(StandardFont::select(monospace, bold, italic))
    }
}

/// Text measurement backed by the font registry.
#[derive(Debug, Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with every configured font registered.
    pub fn with_fonts(entries: &[FontEntry]) -> Result<Self, QuireError> {
        let mut ctx = Self::new();
        for entry in entries {
            ctx.registry.register_entry(entry)?;
        }
        Ok(ctx)
    }

    pub fn resolve(&self, font: &FontSpec) -> ResolvedFont<'_> {
        self.registry.resolve(&font.family, font.bold, font.italic)
    }
}

impl TextMeasurer for FontContext {
    fn char_width(&self, ch: char, font: &FontSpec) -> f64 {
        match self.resolve(font) {
            ResolvedFont::Standard(std_font) => std_font.metrics().char_width(ch, font.size),
            ResolvedFont::Custom(m) => m.char_width(ch, font.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(family: &str, bold: bool) -> FontSpec {
        FontSpec {
            family: family.to_string(),
            size: 12.0,
            bold,
            italic: false,
        }
    }

    #[test]
    fn sans_serif_measures_as_helvetica() {
        let ctx = FontContext::new();
        let w = ctx.char_width(' ', &spec("Arial, sans-serif", false));
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn bold_is_wider() {
        let ctx = FontContext::new();
        let regular = ctx.char_width('A', &spec("Arial", false));
        let bold = ctx.char_width('A', &spec("Arial", true));
        assert!(bold > regular, "Bold A should be wider than regular A");
    }

    #[test]
    fn monospace_families_measure_as_courier() {
        let ctx = FontContext::new();
        let f = spec("'Courier New', monospace", false);
        assert_eq!(ctx.char_width('i', &f), ctx.char_width('W', &f));
        assert!(matches!(ctx.resolve(&f), ResolvedFont::Standard(StandardFont::Courier)));
        assert!(matches!(
            ctx.resolve(&spec("Menlo, monospace", true)),
            ResolvedFont::Standard(StandardFont::CourierBold)
        ));
    }

    #[test]
    fn unknown_family_falls_back_to_helvetica() {
        let ctx = FontContext::new();
        let w1 = ctx.char_width('A', &spec("Helvetica", false));
        let w2 = ctx.char_width('A', &spec("UnknownFont", false));
        assert!((w1 - w2).abs() < 0.001);
    }

    #[test]
    fn garbage_font_data_is_an_error() {
        let mut registry = FontRegistry::new();
        let err = registry.register("Broken", 400, false, b"not a font").unwrap_err();
        assert!(matches!(err, QuireError::Font(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn font_entry_accepts_data_uris_and_raw_base64() {
        let raw = FontEntry {
            family: "X".to_string(),
            src: "aGVsbG8=".to_string(),
            weight: 400,
            italic: false,
        };
        assert_eq!(raw.decode().unwrap(), b"hello");

        let uri = FontEntry {
            src: "data:font/ttf;base64,aGVsbG8=".to_string(),
            ..raw.clone()
        };
        assert_eq!(uri.decode().unwrap(), b"hello");

        let bad = FontEntry {
            src: "data:font/ttf;base64".to_string(),
            ..raw
        };
        assert!(bad.decode().is_err());
    }
}
