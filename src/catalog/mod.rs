//! # Theme & Palette Catalog
//!
//! An immutable, explicitly constructed bundle of every theme and palette the
//! resolver may consult. Callers build one at startup and pass `&Catalog`
//! into the resolver, background composer and CLI; nothing here is global.
//!
//! Lookups never fail. An unknown or missing id falls back to the `"default"`
//! entry, which the constructor guarantees exists. A catalog without one is a
//! broken initialization sequence and is rejected loudly.

pub mod palette;
pub mod theme;

pub use palette::{Palette, PaletteColors};
pub use theme::{
    BackgroundImage, BackgroundPattern, ElementDefaults, PageSettings, ScaleOverrides,
    StyleDefaults, Theme,
};

use crate::error::QuireError;
use crate::units::ScaleProfile;
use std::collections::HashMap;

/// Fallback id for both themes and palettes.
pub const DEFAULT_ID: &str = "default";

/// Built-in catalog data, for callers that override only one half.
pub const BUILTIN_THEMES: &str = include_str!("data/themes.json");
pub const BUILTIN_PALETTES: &str = include_str!("data/palettes.json");

#[derive(Debug, Clone)]
pub struct Catalog {
    themes: Vec<Theme>,
    palettes: Vec<Palette>,
    theme_index: HashMap<String, usize>,
    palette_index: HashMap<String, usize>,
    default_theme: usize,
    default_palette: usize,
}

impl Catalog {
    /// Build a catalog, validating that both defaults exist and that every
    /// theme points at a known palette.
    pub fn new(themes: Vec<Theme>, palettes: Vec<Palette>) -> Result<Self, QuireError> {
        let theme_index: HashMap<String, usize> = themes
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        let palette_index: HashMap<String, usize> = palettes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        let default_theme = *theme_index
            .get(DEFAULT_ID)
            .ok_or_else(|| QuireError::Catalog("no \"default\" theme".to_string()))?;
        let default_palette = *palette_index
            .get(DEFAULT_ID)
            .ok_or_else(|| QuireError::Catalog("no \"default\" palette".to_string()))?;

        if let Some(theme) = themes.iter().find(|t| !palette_index.contains_key(&t.palette)) {
            return Err(QuireError::Catalog(format!(
                "theme '{}' references unknown palette '{}'",
                theme.id, theme.palette
            )));
        }

        Ok(Self {
            themes,
            palettes,
            theme_index,
            palette_index,
            default_theme,
            default_palette,
        })
    }

    /// Parse themes and palettes from JSON arrays.
    pub fn from_json(themes_json: &str, palettes_json: &str) -> Result<Self, QuireError> {
        let themes: Vec<Theme> = serde_json::from_str(themes_json)?;
        let palettes: Vec<Palette> = serde_json::from_str(palettes_json)?;
        Self::new(themes, palettes)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, QuireError> {
        Self::from_json(BUILTIN_THEMES, BUILTIN_PALETTES)
    }

    /// Look up a theme, falling back to `"default"`.
    pub fn theme(&self, id: Option<&str>) -> &Theme {
        match id {
            Some(id) => match self.theme_index.get(id) {
                Some(&i) => &self.themes[i],
                None => {
                    log::debug!("Unknown theme '{}', using \"{}\"", id, DEFAULT_ID);
                    &self.themes[self.default_theme]
                }
            },
            None => &self.themes[self.default_theme],
        }
    }

    /// Look up a palette, falling back to `"default"`.
    pub fn palette(&self, id: Option<&str>) -> &Palette {
        match id {
            Some(id) => match self.palette_index.get(id) {
                Some(&i) => &self.palettes[i],
                None => {
                    log::debug!("Unknown palette '{}', using \"{}\"", id, DEFAULT_ID);
                    &self.palettes[self.default_palette]
                }
            },
            None => &self.palettes[self.default_palette],
        }
    }

    pub fn has_theme(&self, id: &str) -> bool {
        self.theme_index.contains_key(id)
    }

    pub fn has_palette(&self, id: &str) -> bool {
        self.palette_index.contains_key(id)
    }

    /// The palette a theme uses by default.
    pub fn theme_palette(&self, theme_id: Option<&str>) -> &Palette {
        let theme = self.theme(theme_id);
        self.palette(Some(&theme.palette))
    }

    /// Unit-conversion ratios for a theme: the built-in profile for the id as
    /// given (which may be a stroke style such as "rough" rather than a
    /// catalog theme), with any ratios the resolved theme declares on top.
    pub fn scale_profile(&self, theme_id: Option<&str>) -> ScaleProfile {
        let base = ScaleProfile::for_theme(theme_id);
        let theme = self.theme(theme_id);
        ScaleProfile {
            font_size: theme.scale.font_size.unwrap_or(base.font_size),
            stroke_width: theme.scale.stroke_width.unwrap_or(base.stroke_width),
            corner_radius: theme.scale.corner_radius.unwrap_or(base.corner_radius),
        }
    }

    pub fn themes(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    pub fn palettes(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }
}
