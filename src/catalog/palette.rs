//! Color palettes: named sets of semantic color roles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The six semantic roles every palette defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub id: String,
    pub name: String,
    pub colors: PaletteColors,
    /// Named sub-roles ("pageBackground", "questionText", ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parts: BTreeMap<String, String>,
    /// Contrast quality tag, e.g. "AA" or "AAA".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<String>,
}
