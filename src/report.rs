//! Whole-book resolution report.
//!
//! Walks every page of a book and records what each one renders with: the
//! composed background, and for each element its resolved style plus, for
//! text-bearing elements, the positioned layout. This is what the CLI writes
//! out.

use crate::background::{compose_page_background, ImageTemplateResolver};
use crate::catalog::Catalog;
use crate::error::QuireError;
use crate::layout::{element_input, layout_with_config, ElementContent, Layout, LayoutConfig};
use crate::markup::MarkupParser;
use crate::model::{BackgroundDescriptor, Book, Element, ElementCategory, ElementKind, Page};
use crate::resolve::cache::Facet;
use crate::resolve::{
    effective_palette_id, page_theme_id, resolve_shape_style, uses_individual_settings, QnaStyles,
    RichTextStyle, ShapeStyle, StyleCache,
};
use crate::text::TextMeasurer;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReport {
    pub book_id: String,
    pub pages: Vec<PageReport>,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub page_id: String,
    pub page_number: u32,
    pub theme_id: String,
    pub palette_id: String,
    pub background: BackgroundDescriptor,
    pub elements: Vec<ElementReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementReport {
    pub element_id: String,
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<RichTextStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qna: Option<QnaStyles>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    pub overflows: bool,
}

/// Everything besides the book that a report needs.
pub struct ReportContext<'a> {
    pub catalog: &'a Catalog,
    pub templates: &'a dyn ImageTemplateResolver,
    pub parser: &'a dyn MarkupParser,
    pub measurer: &'a dyn TextMeasurer,
    pub config: &'a LayoutConfig,
}

pub fn report_book(ctx: &ReportContext<'_>, book: &Book) -> Result<BookReport, QuireError> {
    let mut cache = StyleCache::new(ctx.catalog, book);
    let mut pages = Vec::with_capacity(book.pages.len());

    for page in &book.pages {
        let mut elements = Vec::with_capacity(page.elements.len());
        for element in &page.elements {
            elements.push(report_element(ctx, &mut cache, element, page, book)?);
        }
        pages.push(PageReport {
            page_id: page.id.clone(),
            page_number: page.page_number,
            theme_id: page_theme_id(page, book).to_string(),
            palette_id: effective_palette_id(ctx.catalog, page, book).to_string(),
            background: compose_page_background(ctx.catalog, page, book, ctx.templates),
            elements,
        });
    }

    let (cache_hits, cache_misses) = cache.stats();
    log::debug!(
        "Reported book '{}': {} pages, {} cached styles ({} hits)",
        book.id,
        pages.len(),
        cache.len(),
        cache_hits
    );
    Ok(BookReport {
        book_id: book.id.clone(),
        pages,
        cache_hits,
        cache_misses,
    })
}

fn report_element(
    ctx: &ReportContext<'_>,
    cache: &mut StyleCache<'_>,
    element: &Element,
    page: &Page,
    book: &Book,
) -> Result<ElementReport, QuireError> {
    let mut report = ElementReport {
        element_id: element.id.clone(),
        kind: element.kind,
        text_style: None,
        qna: None,
        shape: None,
        layout: None,
        overflows: false,
    };

    if !is_text_bearing(element) {
        report.shape = Some(resolve_shape_style(ctx.catalog, element, page, book));
        return Ok(report);
    }

    let box_style = cache.resolve(element, page, book, Facet::Element)?;
    let content = ElementContent::of(element);
    let laid_out = if element.is_qna() {
        let qna = QnaStyles {
            variant: element.effective_variant(),
            individual: uses_individual_settings(element),
            question: cache.resolve(element, page, book, Facet::Question)?,
            answer: cache.resolve(element, page, book, Facet::Answer)?,
        };
        let input = element_input(element, &content, &box_style, &qna.question, &qna.answer);
        let laid_out = layout_with_config(&input, ctx.parser, ctx.measurer, ctx.config);
        report.overflows = laid_out.overflows(&input.layout_box);
        report.qna = Some(qna);
        laid_out
    } else {
        let input = element_input(element, &content, &box_style, &box_style, &box_style);
        let laid_out = layout_with_config(&input, ctx.parser, ctx.measurer, ctx.config);
        report.overflows = laid_out.overflows(&input.layout_box);
        laid_out
    };

    report.text_style = Some(box_style);
    report.layout = Some(laid_out);
    Ok(report)
}

fn is_text_bearing(element: &Element) -> bool {
    element.is_qna()
        || matches!(
            element.category(),
            ElementCategory::Text | ElementCategory::Question | ElementCategory::Answer
        )
}
