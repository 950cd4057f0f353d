//! Priority-ordered merging of partial style objects.
//!
//! Every facet is resolved from the same fixed list of layers. Callers hand
//! over `(Layer, source)` pairs in any order; the merge walks them by layer
//! priority (and by position within a layer) and takes each field from the
//! first source that sets it.

use crate::model::{BackgroundSettings, BorderSettings, FontSettings, RuledLinesSettings};

/// Where a value comes from. Lower variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Settings for exactly this facet (`questionSettings`, `element.font`).
    ElementFacet,
    /// Settings shared by the whole element (`textSettings`, top-level keys).
    ElementShared,
    /// The theme's default for the element category.
    Theme,
}

/// A partial object whose fields can be filled from a lower-priority one.
pub trait Merge: Clone + Default {
    /// Fill every field of `self` that is unset with the value from `lower`.
    fn fill_from(&mut self, lower: &Self);
}

macro_rules! impl_merge {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl Merge for $ty {
            fn fill_from(&mut self, lower: &Self) {
                $(
                    if self.$field.is_none() {
                        self.$field = lower.$field.clone();
                    }
                )*
            }
        }
    };
}

impl_merge!(FontSettings {
    font_size,
    font_family,
    font_bold,
    font_italic,
    font_color,
    font_opacity,
});

impl_merge!(BorderSettings {
    enabled,
    border_width,
    border_color,
    border_opacity,
    border_theme,
});

impl_merge!(BackgroundSettings {
    enabled,
    background_color,
    background_opacity,
});

impl_merge!(RuledLinesSettings {
    enabled,
    line_width,
    line_color,
    line_opacity,
    ruled_lines_theme,
});

/// Merge partial objects by layer priority.
pub fn cascade<T: Merge>(layers: &[(Layer, Option<&T>)]) -> T {
    let mut ordered: Vec<&(Layer, Option<&T>)> = layers.iter().collect();
    ordered.sort_by_key(|(layer, _)| *layer);

    let mut merged = T::default();
    for (_, source) in ordered {
        if let Some(source) = source {
            merged.fill_from(source);
        }
    }
    merged
}

/// First value set, by layer priority.
pub fn first_set<T: Clone>(layers: &[(Layer, Option<T>)]) -> Option<T> {
    let mut ordered: Vec<&(Layer, Option<T>)> = layers.iter().collect();
    ordered.sort_by_key(|(layer, _)| *layer);
    ordered.into_iter().find_map(|(_, v)| v.clone())
}
