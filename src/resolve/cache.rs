//! Per-book memoization of resolved text styles.
//!
//! Resolution is pure, so the result is a function of its inputs. The cache
//! key is the serialized element plus every page and book field the cascade
//! reads, so an edit to any of them misses naturally and nothing needs
//! explicit invalidation. A cache is bound to one book; handing it another
//! book is a caller bug and returns an error instead of a wrong style. A book
//! without an id is bound by its book-level theme and palette selection.

use super::{resolve_answer_style, resolve_question_style, resolve_style, RichTextStyle};
use crate::catalog::Catalog;
use crate::error::QuireError;
use crate::model::{Book, Element, Page};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Which style of an element to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    /// The element as a whole (the shared box for Q&A elements).
    Element,
    Question,
    Answer,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageKey<'a> {
    theme_id: &'a Option<Option<String>>,
    color_palette_id: &'a Option<Option<String>>,
    page_theme: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookKey<'a> {
    book_theme: &'a Option<String>,
    theme_id: &'a Option<String>,
    color_palette_id: &'a Option<String>,
}

/// What identifies the book a cache was created for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BookBinding {
    Id(String),
    Anonymous {
        book_theme: Option<String>,
        theme_id: Option<String>,
        color_palette_id: Option<String>,
    },
}

impl BookBinding {
    fn of(book: &Book) -> Self {
        if !book.id.is_empty() {
            return BookBinding::Id(book.id.clone());
        }
        BookBinding::Anonymous {
            book_theme: book.book_theme.clone(),
            theme_id: book.theme_id.clone(),
            color_palette_id: book.color_palette_id.clone(),
        }
    }
}

impl fmt::Display for BookBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookBinding::Id(id) => f.write_str(id),
            BookBinding::Anonymous {
                book_theme,
                theme_id,
                color_palette_id,
            } => write!(
                f,
                "<no id, theme {}, palette {}>",
                book_theme.as_deref().or(theme_id.as_deref()).unwrap_or("-"),
                color_palette_id.as_deref().unwrap_or("-")
            ),
        }
    }
}

pub struct StyleCache<'c> {
    catalog: &'c Catalog,
    book: BookBinding,
    entries: HashMap<(Facet, String), RichTextStyle>,
    hits: usize,
    misses: usize,
}

impl<'c> StyleCache<'c> {
    pub fn new(catalog: &'c Catalog, book: &Book) -> Self {
        Self {
            catalog,
            book: BookBinding::of(book),
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Resolve a style, reusing an earlier result for identical inputs.
    pub fn resolve(
        &mut self,
        element: &Element,
        page: &Page,
        book: &Book,
        facet: Facet,
    ) -> Result<RichTextStyle, QuireError> {
        let binding = BookBinding::of(book);
        if binding != self.book {
            return Err(QuireError::CacheBookMismatch {
                expected: self.book.to_string(),
                actual: binding.to_string(),
            });
        }

        let key = (facet, cache_key(element, page, book)?);
        if let Some(style) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(style.clone());
        }

        self.misses += 1;
        let style = match facet {
            Facet::Element => resolve_style(self.catalog, element, page, book),
            Facet::Question => resolve_question_style(self.catalog, element, page, book),
            Facet::Answer => resolve_answer_style(self.catalog, element, page, book),
        };
        self.entries.insert(key, style.clone());
        Ok(style)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since construction or the last [`clear`](Self::clear).
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

fn cache_key(element: &Element, page: &Page, book: &Book) -> Result<String, QuireError> {
    let page_key = PageKey {
        theme_id: &page.theme_id,
        color_palette_id: &page.color_palette_id,
        page_theme: page.background.as_ref().and_then(|bg| bg.page_theme.as_deref()),
    };
    let book_key = BookKey {
        book_theme: &book.book_theme,
        theme_id: &book.theme_id,
        color_palette_id: &book.color_palette_id,
    };
    Ok(serde_json::to_string(&(element, page_key, book_key))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, TextSettings};

    fn fixture() -> (Catalog, Element, Page, Book) {
        let mut el = Element::new("e1", ElementKind::Qna);
        el.question_settings = Some(TextSettings {
            font_size: Some(20.0),
            ..Default::default()
        });
        (Catalog::builtin().unwrap(), el, Page::new("p1", 1), Book::new("b1"))
    }

    #[test]
    fn repeated_lookups_hit() {
        let (catalog, el, page, book) = fixture();
        let mut cache = StyleCache::new(&catalog, &book);
        let first = cache.resolve(&el, &page, &book, Facet::Question).unwrap();
        let second = cache.resolve(&el, &page, &book, Facet::Question).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.font_size, 64.0);
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn edits_change_the_key() {
        let (catalog, mut el, mut page, book) = fixture();
        let mut cache = StyleCache::new(&catalog, &book);
        cache.resolve(&el, &page, &book, Facet::Question).unwrap();

        el.question_settings.as_mut().unwrap().font_size = Some(10.0);
        let edited = cache.resolve(&el, &page, &book, Facet::Question).unwrap();
        assert_eq!(edited.font_size, 32.0);

        page.theme_id = Some(Some("notebook".to_string()));
        let rethemed = cache.resolve(&el, &page, &book, Facet::Answer).unwrap();
        assert_eq!(rethemed.font_family, "Courier New, monospace");
        assert_eq!(cache.stats(), (0, 3));
    }

    #[test]
    fn facets_are_cached_separately() {
        let (catalog, el, page, book) = fixture();
        let mut cache = StyleCache::new(&catalog, &book);
        let q = cache.resolve(&el, &page, &book, Facet::Question).unwrap();
        let a = cache.resolve(&el, &page, &book, Facet::Answer).unwrap();
        assert_ne!(q.font_size, a.font_size);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn other_book_is_rejected() {
        let (catalog, el, page, book) = fixture();
        let mut cache = StyleCache::new(&catalog, &book);
        let other = Book::new("b2");
        let err = cache.resolve(&el, &page, &other, Facet::Element).unwrap_err();
        assert!(matches!(err, QuireError::CacheBookMismatch { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn books_without_ids_are_told_apart() {
        let (catalog, el, page, _) = fixture();
        let mut vintage = Book::new("");
        vintage.book_theme = Some("vintage".to_string());
        let mut notebook = Book::new("");
        notebook.book_theme = Some("notebook".to_string());

        let mut cache = StyleCache::new(&catalog, &vintage);
        cache.resolve(&el, &page, &vintage, Facet::Answer).unwrap();
        cache.resolve(&el, &page, &vintage, Facet::Answer).unwrap();
        assert_eq!(cache.stats(), (1, 1));

        let err = cache.resolve(&el, &page, &notebook, Facet::Answer).unwrap_err();
        match err {
            QuireError::CacheBookMismatch { expected, actual } => {
                assert!(expected.contains("vintage"));
                assert!(actual.contains("notebook"));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }
}
