//! Structured error types for quire.
//!
//! Almost nothing in the resolver or layout engine can fail: missing
//! references and malformed partial input fall back to defaults. What is left
//! here is input parsing, catalog construction, custom fonts, and misuse of
//! the per-book style cache.

use thiserror::Error;

/// The unified error type returned by the public quire API.
#[derive(Debug, Error)]
pub enum QuireError {
    /// JSON input failed to parse as a book, page, element, or catalog.
    #[error("Failed to parse input: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// The catalog is unusable (no "default" theme or palette, or a theme
    /// points at a palette that does not exist). This is an initialization
    /// bug, not a data problem.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A custom font could not be decoded or parsed.
    #[error("Font error: {0}")]
    Font(String),

    /// A style cache bound to one book was used with another book.
    #[error("Style cache belongs to book '{expected}', got book '{actual}'")]
    CacheBookMismatch { expected: String, actual: String },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => "Unexpected end of input. Is the JSON truncated?".to_string(),
            serde_json::error::Category::Io => String::new(),
        };
        QuireError::Parse { source: e, hint }
    }
}
