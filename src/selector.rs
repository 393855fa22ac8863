//! Element targets: CSS strings, element handles, collections or query functions

use std::fmt;

use scraper::{ElementRef, Html};

use crate::error::{ExtractError, Result};

type Query<'a> = Box<dyn Fn(&'a Html) -> Vec<ElementRef<'a>> + 'a>;

/// Anything that resolves to an ordered set of elements in a document
pub enum Selector<'a> {
    /// CSS selector evaluated against the whole document
    Css(String),
    /// Already-located element
    Element(ElementRef<'a>),
    /// Already-located elements, kept in the given order
    Elements(Vec<ElementRef<'a>>),
    /// Custom lookup over the document
    Query(Query<'a>),
}

impl<'a> Selector<'a> {
    pub fn query<F>(f: F) -> Self
    where
        F: Fn(&'a Html) -> Vec<ElementRef<'a>> + 'a,
    {
        Selector::Query(Box::new(f))
    }

    /// Resolve to matching elements in document order
    pub fn resolve(self, document: &'a Html) -> Result<Vec<ElementRef<'a>>> {
        match self {
            Selector::Css(css) => {
                let selector = parse_css(&css)?;
                Ok(document.select(&selector).collect())
            }
            Selector::Element(element) => Ok(vec![element]),
            Selector::Elements(elements) => Ok(elements),
            Selector::Query(query) => Ok(query(document)),
        }
    }
}

pub(crate) fn parse_css(css: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(css).map_err(|e| ExtractError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => f.write_str(css),
            Selector::Element(element) => write!(f, "<{}>", element.value().name()),
            Selector::Elements(elements) => write!(f, "[{} elements]", elements.len()),
            Selector::Query(_) => f.write_str("<query>"),
        }
    }
}

impl fmt::Debug for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({self})")
    }
}

impl From<&str> for Selector<'_> {
    fn from(css: &str) -> Self {
        Selector::Css(css.to_string())
    }
}

impl From<String> for Selector<'_> {
    fn from(css: String) -> Self {
        Selector::Css(css)
    }
}

impl From<&String> for Selector<'_> {
    fn from(css: &String) -> Self {
        Selector::Css(css.clone())
    }
}

impl<'a> From<ElementRef<'a>> for Selector<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Selector::Element(element)
    }
}

impl<'a> From<Vec<ElementRef<'a>>> for Selector<'a> {
    fn from(elements: Vec<ElementRef<'a>>) -> Self {
        Selector::Elements(elements)
    }
}
