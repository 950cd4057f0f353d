//! # Unit Conversion
//!
//! The editor shows slider-friendly "common" values (font size 8-24, stroke
//! width 1-20, corner radius 0-50). Renderers work on the "actual" scale.
//! The two are related by a per-quantity ratio, which some themes change:
//! hand-drawn themes draw strokes thicker for the same logical width.
//!
//! `common_to_actual` never rescales a value that is already above the common
//! range. Stored data has mixed scales and call sites are not always sure
//! which one they hold, so an out-of-range value is taken to be actual
//! already and passed through unchanged.
//!
//! `actual_to_common` rounds to one decimal, which makes every integer common
//! value survive a round trip exactly.

use crate::catalog::Catalog;
use std::ops::RangeInclusive;

/// Theme ids (or stroke styles) that render strokes visually thicker.
const ROUGH_THEMES: &[&str] = &["rough", "sketchy", "hand-drawn"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    FontSize,
    StrokeWidth,
    CornerRadius,
}

impl Quantity {
    /// The range shown by UI controls.
    pub fn common_range(self) -> RangeInclusive<f64> {
        match self {
            Quantity::FontSize => 8.0..=24.0,
            Quantity::StrokeWidth => 1.0..=20.0,
            Quantity::CornerRadius => 0.0..=50.0,
        }
    }

    fn common_max(self) -> f64 {
        *self.common_range().end()
    }
}

/// Actual-per-common ratios for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleProfile {
    pub font_size: f64,
    pub stroke_width: f64,
    pub corner_radius: f64,
}

impl Default for ScaleProfile {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl ScaleProfile {
    pub const STANDARD: ScaleProfile = ScaleProfile {
        font_size: 3.2,
        stroke_width: 2.0,
        corner_radius: 2.0,
    };

    pub const ROUGH: ScaleProfile = ScaleProfile {
        font_size: 3.2,
        stroke_width: 3.0,
        corner_radius: 2.0,
    };

    /// Built-in profile for a theme id. Unknown ids get the standard profile.
    pub fn for_theme(theme: Option<&str>) -> Self {
        match theme {
            Some(t) if ROUGH_THEMES.contains(&t) => Self::ROUGH,
            _ => Self::STANDARD,
        }
    }

    /// This profile with the stroke ratio of a stroke style, for borders and
    /// ruled lines that carry their own style ("rough", "default", ...).
    pub fn with_stroke_style(self, style: Option<&str>) -> Self {
        match style {
            Some(s) if ROUGH_THEMES.contains(&s) => ScaleProfile {
                stroke_width: Self::ROUGH.stroke_width,
                ..self
            },
            _ => self,
        }
    }

    pub fn ratio(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::FontSize => self.font_size,
            Quantity::StrokeWidth => self.stroke_width,
            Quantity::CornerRadius => self.corner_radius,
        }
    }

    pub fn to_actual(&self, quantity: Quantity, value: f64) -> f64 {
        if value > quantity.common_max() {
            return value;
        }
        value * self.ratio(quantity)
    }

    pub fn to_common(&self, quantity: Quantity, value: f64) -> f64 {
        round_tenth(value / self.ratio(quantity))
    }
}

fn round_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// Ratios come from `Catalog::scale_profile`, theme `scale` overrides included.

pub fn common_to_actual_font_size(catalog: &Catalog, value: f64, theme: Option<&str>) -> f64 {
    catalog.scale_profile(theme).to_actual(Quantity::FontSize, value)
}

pub fn actual_to_common_font_size(catalog: &Catalog, value: f64, theme: Option<&str>) -> f64 {
    catalog.scale_profile(theme).to_common(Quantity::FontSize, value)
}

pub fn common_to_actual_stroke_width(catalog: &Catalog, value: f64, theme: Option<&str>) -> f64 {
    catalog.scale_profile(theme).to_actual(Quantity::StrokeWidth, value)
}

pub fn actual_to_common_stroke_width(catalog: &Catalog, value: f64, theme: Option<&str>) -> f64 {
    catalog.scale_profile(theme).to_common(Quantity::StrokeWidth, value)
}

pub fn common_to_actual_corner_radius(catalog: &Catalog, value: f64, theme: Option<&str>) -> f64 {
    catalog.scale_profile(theme).to_actual(Quantity::CornerRadius, value)
}

pub fn actual_to_common_corner_radius(catalog: &Catalog, value: f64, theme: Option<&str>) -> f64 {
    catalog.scale_profile(theme).to_common(Quantity::CornerRadius, value)
}

/// Clamp an opacity into `[0, 1]`. Values above 1 are percentages.
pub fn normalize_opacity(value: f64) -> f64 {
    if !value.is_finite() {
        return 1.0;
    }
    let v = if value > 1.0 { value / 100.0 } else { value };
    v.clamp(0.0, 1.0)
}

/// qna2 elements store font sizes that are usually on the common scale.
/// A value in `(0, 24]` is taken to be common and gets upconverted.
pub fn looks_like_common_font_size(value: f64) -> bool {
    value > 0.0 && value <= Quantity::FontSize.common_max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn font_size_round_trip_on_common_integers() {
        let c = catalog();
        for v in 8..=24 {
            let v = v as f64;
            let actual = common_to_actual_font_size(&c, v, None);
            assert_eq!(actual_to_common_font_size(&c, actual, None), v, "round trip of {v}");
        }
    }

    #[test]
    fn stroke_and_radius_round_trip_for_every_profile() {
        let c = catalog();
        for theme in [None, Some("sketchy"), Some("default")] {
            for v in 1..=20 {
                let v = v as f64;
                let actual = common_to_actual_stroke_width(&c, v, theme);
                assert_eq!(actual_to_common_stroke_width(&c, actual, theme), v);
            }
            for v in 0..=50 {
                let v = v as f64;
                let actual = common_to_actual_corner_radius(&c, v, theme);
                assert_eq!(actual_to_common_corner_radius(&c, actual, theme), v);
            }
        }
    }

    #[test]
    fn already_actual_values_pass_through() {
        let c = catalog();
        assert_eq!(common_to_actual_font_size(&c, 58.0, None), 58.0);
        assert_eq!(common_to_actual_font_size(&c, 20.0, None), 64.0);
        assert!((common_to_actual_font_size(&c, 24.0, None) - 76.8).abs() < 1e-9);
        assert_eq!(common_to_actual_stroke_width(&c, 30.0, Some("sketchy")), 30.0);
    }

    #[test]
    fn rough_themes_draw_thicker_strokes() {
        let c = catalog();
        let standard = common_to_actual_stroke_width(&c, 4.0, Some("default"));
        let rough = common_to_actual_stroke_width(&c, 4.0, Some("rough"));
        assert_eq!(standard, 8.0);
        assert_eq!(rough, 12.0);
        assert_eq!(
            common_to_actual_font_size(&c, 12.0, Some("rough")),
            common_to_actual_font_size(&c, 12.0, None)
        );
    }

    #[test]
    fn stroke_style_overrides_only_the_stroke_ratio() {
        let custom = ScaleProfile {
            font_size: 4.0,
            stroke_width: 1.5,
            corner_radius: 1.0,
        };
        let rough = custom.with_stroke_style(Some("rough"));
        assert_eq!(rough.stroke_width, 3.0);
        assert_eq!(rough.font_size, 4.0);
        assert_eq!(custom.with_stroke_style(Some("dashed")), custom);
        assert_eq!(custom.with_stroke_style(None), custom);
    }

    #[test]
    fn question_default_is_about_eighteen_common() {
        let c = catalog();
        assert_eq!(actual_to_common_font_size(&c, 58.0, None), 18.1);
    }

    #[test]
    fn opacity_normalization() {
        assert_eq!(normalize_opacity(0.4), 0.4);
        assert_eq!(normalize_opacity(80.0), 0.8);
        assert_eq!(normalize_opacity(-1.0), 0.0);
        assert_eq!(normalize_opacity(500.0), 1.0);
        assert_eq!(normalize_opacity(f64::NAN), 1.0);
    }

    #[test]
    fn common_scale_heuristic() {
        assert!(looks_like_common_font_size(14.0));
        assert!(looks_like_common_font_size(24.0));
        assert!(!looks_like_common_font_size(0.0));
        assert!(!looks_like_common_font_size(50.0));
    }

    #[test]
    fn theme_declared_ratios_apply_both_ways() {
        let c = Catalog::from_json(
            r#"[
                {"id": "default", "name": "Default", "palette": "default"},
                {"id": "big", "name": "Big", "palette": "default", "scale": {"fontSize": 4}}
            ]"#,
            r##"[{"id": "default", "name": "Default", "colors": {
                "primary": "#000", "secondary": "#111", "accent": "#222",
                "background": "#fff", "surface": "#eee", "text": "#000"}}]"##,
        )
        .unwrap();
        assert_eq!(common_to_actual_font_size(&c, 20.0, Some("big")), 80.0);
        assert_eq!(actual_to_common_font_size(&c, 80.0, Some("big")), 20.0);
        for v in 8..=24 {
            let v = v as f64;
            let actual = common_to_actual_font_size(&c, v, Some("big"));
            assert_eq!(actual_to_common_font_size(&c, actual, Some("big")), v);
        }
        // Stroke and radius keep the built-in ratios.
        assert_eq!(common_to_actual_stroke_width(&c, 4.0, Some("big")), 8.0);
    }
}
