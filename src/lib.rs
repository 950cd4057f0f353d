//! # Quire
//!
//! Style resolution and text layout for printable books.
//!
//! A book is edited as loose, partial JSON: an element may set a font size and
//! nothing else, a page may pick its own palette, a theme fills in the rest.
//! Quire turns that into fully decided values. Every text element and every
//! question/answer block gets one concrete style per side. Every page gets one
//! background. Every piece of text gets positioned runs that a renderer can
//! draw without measuring anything itself.
//!
//! Resolution is pure: the same book against the same catalog always yields
//! the same result, whether the catalog is the built-in one or loaded from
//! files.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON)
//!       ↓
//!   [model]       Book, pages, elements with partial style data
//!       ↓
//!   [catalog]     Themes and palettes, looked up by id
//!       ↓
//!   [resolve]     Element/page/book/theme cascade, unit conversion
//!       ↓
//!   [background]  Page background tiers
//!   [layout]      Q&A and free-text layout over [markup], [text], [font]
//!       ↓
//!   [report]      Everything above for a whole book, as JSON
//! ```

pub mod background;
pub mod catalog;
pub mod error;
pub mod font;
pub mod layout;
pub mod markup;
pub mod model;
pub mod report;
pub mod resolve;
pub mod text;
pub mod units;

pub use catalog::Catalog;
pub use error::QuireError;

use background::NoImageTemplates;
use font::FontContext;
use layout::{element_input, ElementContent, Layout, LayoutConfig};
use markup::{MarkupParser, XmlMarkupParser};
use model::{Book, Element, Page};
use report::{BookReport, ReportContext};
use text::TextMeasurer;

/// Parse a book from the editor's JSON.
pub fn parse_book(json: &str) -> Result<Book, QuireError> {
    Ok(serde_json::from_str(json)?)
}

/// Lay out the text of one element with its resolved styles.
///
/// Question/answer elements get both sides; free text elements lay out their
/// text alone. Elements that carry no text use the same path and come back
/// with empty runs.
pub fn layout_element(
    catalog: &Catalog,
    element: &Element,
    page: &Page,
    book: &Book,
    parser: &dyn MarkupParser,
    measurer: &dyn TextMeasurer,
) -> Layout {
    let box_style = resolve::resolve_style(catalog, element, page, book);
    let content = ElementContent::of(element);
    if element.is_qna() {
        let styles = resolve::resolve_qna_styles(catalog, element, page, book);
        let input = element_input(element, &content, &box_style, &styles.question, &styles.answer);
        layout::layout(&input, parser, measurer)
    } else {
        let input = element_input(element, &content, &box_style, &box_style, &box_style);
        layout::layout(&input, parser, measurer)
    }
}

/// Report a book given as JSON against the built-in catalog, with the
/// default fonts and markup parser and no image templates.
pub fn report_json(json: &str) -> Result<BookReport, QuireError> {
    let book = parse_book(json)?;
    let catalog = Catalog::builtin()?;
    let fonts = FontContext::new();
    let config = LayoutConfig::default();
    let ctx = ReportContext {
        catalog: &catalog,
        templates: &NoImageTemplates,
        parser: &XmlMarkupParser,
        measurer: &fonts,
        config: &config,
    };
    report::report_book(&ctx, &book)
}
