//! # Background Composer
//!
//! Produces the single background descriptor a page renders with. Sources are
//! tried in a fixed order and the first that yields something wins:
//!
//! 1. an explicit background stored on the page,
//! 2. the theme's background image, looked up through an
//!    [`ImageTemplateResolver`],
//! 3. the theme's background pattern, inked in palette colors,
//! 4. the palette background color.
//!
//! A tier that cannot be satisfied (unknown template, resolver failure, empty
//! URL) downgrades to the next one with a warning. Composition itself never
//! fails.

use crate::catalog::{BackgroundImage, Catalog, Palette};
use crate::model::{BackgroundDescriptor, BackgroundKind, Book, Page, PageBackground};
use crate::resolve::{effective_palette, explicit_palette_id, page_theme_id};
use crate::units::normalize_opacity;
use std::collections::HashMap;
use thiserror::Error;

/// Everything a template resolver may use to build the image URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTemplateOptions {
    /// "cover", "contain" or "stretch".
    pub size: String,
    pub repeat: bool,
    pub position: Option<String>,
    /// Percent of the page width.
    pub width: Option<f64>,
    pub opacity: f64,
    pub background_color: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ImageTemplateError {
    #[error("Unknown image template '{0}'")]
    UnknownTemplate(String),
    #[error("Image template '{template_id}' unavailable: {reason}")]
    Unavailable { template_id: String, reason: String },
}

/// Turns a background-image template id into an image URL.
pub trait ImageTemplateResolver {
    /// `Ok(None)` means the template exists but has nothing to show.
    fn resolve(
        &self,
        template_id: &str,
        options: &ImageTemplateOptions,
    ) -> Result<Option<String>, ImageTemplateError>;
}

/// A resolver that knows no templates. Every image tier downgrades.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageTemplates;

impl ImageTemplateResolver for NoImageTemplates {
    fn resolve(
        &self,
        template_id: &str,
        _options: &ImageTemplateOptions,
    ) -> Result<Option<String>, ImageTemplateError> {
        Err(ImageTemplateError::UnknownTemplate(template_id.to_string()))
    }
}

/// Template id → URL lookup table.
#[derive(Debug, Clone, Default)]
pub struct ImageTemplateTable {
    urls: HashMap<String, String>,
}

impl ImageTemplateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template_id: impl Into<String>, url: impl Into<String>) {
        self.urls.insert(template_id.into(), url.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ImageTemplateTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            urls: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ImageTemplateResolver for ImageTemplateTable {
    fn resolve(
        &self,
        template_id: &str,
        _options: &ImageTemplateOptions,
    ) -> Result<Option<String>, ImageTemplateError> {
        self.urls
            .get(template_id)
            .map(|url| Some(url.clone()))
            .ok_or_else(|| ImageTemplateError::UnknownTemplate(template_id.to_string()))
    }
}

/// Compose the background for a theme and palette, honoring an explicit page
/// background when one is present.
pub fn compose_background(
    catalog: &Catalog,
    theme_id: Option<&str>,
    palette: &Palette,
    page_override: Option<&PageBackground>,
    resolver: &dyn ImageTemplateResolver,
) -> BackgroundDescriptor {
    if let Some(explicit) = page_override.and_then(PageBackground::explicit_descriptor) {
        return normalized(explicit);
    }

    let theme = catalog.theme(theme_id);
    let settings = &theme.page_settings;

    if let Some(image) = settings.background_image.as_ref().filter(|i| i.enabled) {
        if let Some(descriptor) = theme_image(&theme.id, image, settings.background_color.clone(), resolver) {
            return descriptor;
        }
    }

    if let Some(pattern) = settings.background_pattern.as_ref().filter(|p| p.enabled) {
        let backdrop = if palette.colors.primary.is_empty() {
            palette.colors.background.clone()
        } else {
            palette.colors.primary.clone()
        };
        return BackgroundDescriptor::Pattern {
            value: pattern.style.clone(),
            opacity: normalize_opacity(pattern.opacity),
            pattern_size: pattern.size,
            pattern_stroke_width: pattern.stroke_width,
            pattern_foreground_color: palette.colors.background.clone(),
            pattern_background_color: backdrop,
            pattern_background_opacity: normalize_opacity(pattern.background_opacity),
        };
    }

    BackgroundDescriptor::Color {
        value: palette.colors.background.clone(),
        opacity: settings.background_opacity.map(normalize_opacity).unwrap_or(1.0),
    }
}

fn theme_image(
    theme_id: &str,
    image: &BackgroundImage,
    background_color: Option<String>,
    resolver: &dyn ImageTemplateResolver,
) -> Option<BackgroundDescriptor> {
    let Some(template_id) = image.template_id.as_deref().filter(|t| !t.is_empty()) else {
        log::warn!("Theme '{}' enables a background image without a template", theme_id);
        return None;
    };
    let options = ImageTemplateOptions {
        size: image.size.clone(),
        repeat: image.repeat,
        position: image.position.clone(),
        width: image.width,
        opacity: normalize_opacity(image.opacity),
        background_color,
    };

    let url = match resolver.resolve(template_id, &options) {
        Ok(Some(url)) if !url.is_empty() => url,
        Ok(_) => {
            log::warn!("Image template '{}' resolved to nothing, using pattern or color", template_id);
            return None;
        }
        Err(e) => {
            log::warn!("{}, using pattern or color", e);
            return None;
        }
    };

    Some(BackgroundDescriptor::Image {
        value: url,
        opacity: options.opacity,
        background_image_template_id: Some(template_id.to_string()),
        image_size: Some(options.size),
        image_repeat: Some(options.repeat),
        image_position: options.position,
        image_width: options.width,
        background_color: options.background_color,
    })
}

fn normalized(mut descriptor: BackgroundDescriptor) -> BackgroundDescriptor {
    match &mut descriptor {
        BackgroundDescriptor::Color { opacity, .. } | BackgroundDescriptor::Image { opacity, .. } => {
            *opacity = normalize_opacity(*opacity);
        }
        BackgroundDescriptor::Pattern {
            opacity,
            pattern_background_opacity,
            ..
        } => {
            *opacity = normalize_opacity(*opacity);
            *pattern_background_opacity = normalize_opacity(*pattern_background_opacity);
        }
    }
    descriptor
}

/// Compose a page's background from the theme and palette its cascade picks.
pub fn compose_page_background(
    catalog: &Catalog,
    page: &Page,
    book: &Book,
    resolver: &dyn ImageTemplateResolver,
) -> BackgroundDescriptor {
    compose_background(
        catalog,
        Some(page_theme_id(page, book)),
        effective_palette(catalog, page, book),
        page.background.as_ref(),
        resolver,
    )
}

/// The palette to use after switching from `previous_theme` to `new_theme`.
///
/// A palette that merely followed the old theme (its default, or nothing
/// chosen) follows the new theme too. A palette the user picked is kept.
pub fn palette_after_theme_change(
    catalog: &Catalog,
    previous_theme: Option<&str>,
    current_palette: Option<&str>,
    new_theme: &str,
) -> String {
    let previous_default = &catalog.theme_palette(previous_theme).id;
    match current_palette {
        Some(current) if current != previous_default => current.to_string(),
        _ => catalog.theme_palette(Some(new_theme)).id.clone(),
    }
}

/// Switch a page to a new theme: record the theme, carry the palette over by
/// [`palette_after_theme_change`], and replace the page background with the
/// new theme's.
pub fn apply_page_theme_change(
    catalog: &Catalog,
    page: &mut Page,
    book: &Book,
    new_theme: &str,
    resolver: &dyn ImageTemplateResolver,
) -> BackgroundDescriptor {
    let previous_theme = page_theme_id(page, book).to_string();
    let palette_id = palette_after_theme_change(
        catalog,
        Some(&previous_theme),
        explicit_palette_id(page, book),
        new_theme,
    );
    log::debug!(
        "Page '{}': theme '{}' -> '{}', palette '{}'",
        page.id,
        previous_theme,
        new_theme,
        palette_id
    );

    let palette = if catalog.has_palette(&palette_id) {
        catalog.palette(Some(&palette_id))
    } else {
        catalog.theme_palette(Some(new_theme))
    };
    let descriptor = compose_background(catalog, Some(new_theme), palette, None, resolver);
    page.theme_id = Some(Some(new_theme.to_string()));
    page.color_palette_id = Some(Some(palette_id));
    page.background = Some(stored_background(&descriptor, new_theme));
    descriptor
}

/// The page-background block that persists a composed descriptor.
pub fn stored_background(descriptor: &BackgroundDescriptor, page_theme: &str) -> PageBackground {
    let mut stored = PageBackground {
        value: Some(descriptor.value().to_string()),
        opacity: Some(descriptor.opacity()),
        page_theme: Some(page_theme.to_string()),
        ..Default::default()
    };
    match descriptor {
        BackgroundDescriptor::Color { .. } => stored.kind = Some(BackgroundKind::Color),
        BackgroundDescriptor::Pattern {
            pattern_size,
            pattern_stroke_width,
            pattern_foreground_color,
            pattern_background_color,
            pattern_background_opacity,
            ..
        } => {
            stored.kind = Some(BackgroundKind::Pattern);
            stored.pattern_size = Some(*pattern_size);
            stored.pattern_stroke_width = Some(*pattern_stroke_width);
            stored.pattern_foreground_color = Some(pattern_foreground_color.clone());
            stored.pattern_background_color = Some(pattern_background_color.clone());
            stored.pattern_background_opacity = Some(*pattern_background_opacity);
        }
        BackgroundDescriptor::Image {
            background_image_template_id,
            image_size,
            image_repeat,
            image_position,
            image_width,
            background_color,
            ..
        } => {
            stored.kind = Some(BackgroundKind::Image);
            stored.background_image_template_id = background_image_template_id.clone();
            stored.image_size = image_size.clone();
            stored.image_repeat = *image_repeat;
            stored.image_position = image_position.clone();
            stored.image_width = *image_width;
            stored.background_color = background_color.clone();
        }
    }
    stored
}
