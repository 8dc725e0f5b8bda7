//! Queryable HTML documents.
//!
//! A thin layer over [`scraper`]: parse markup once, then look elements up
//! by CSS selector and read their inner markup or attributes.

use scraper::{ElementRef, Html, Selector};

/// A CSS selector that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

/// A parsed HTML document.
///
/// Parsing is lenient: any text yields a document, with `<html>`, `<head>`
/// and `<body>` synthesized where the markup omits them.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self { html: Html::parse_document(markup) }
    }

    /// Returns the first element matching `selector`, in document order.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'_>>, SelectorError> {
        let compiled = Selector::parse(selector).map_err(|e| SelectorError {
            selector: selector.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(self.html.select(&compiled).next().map(Element))
    }
}

/// An element borrowed from a [`Document`].
#[derive(Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl Element<'_> {
    /// Serialized markup of the element's children, without its own tags.
    pub fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }
}
