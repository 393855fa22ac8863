//! Extraction engine: selector -> element -> facet text -> typed value

use scraper::{ElementRef, Html};

use crate::converters::{self, Converter};
use crate::error::{ExtractError, Result};
use crate::method::{read_facets, MethodList};
use crate::selector::Selector;

/// Typed field extraction over one parsed document
///
/// ```
/// use typed_crawler::{converters, Crawler};
///
/// let crawler = Crawler::parse(r#"<span class="count" data-n="42">forty-two</span>"#);
/// let n = crawler.get_with(".count", &converters::int(), &".n".parse().unwrap()).unwrap();
/// assert_eq!(n, 42.0);
/// ```
pub struct Crawler {
    document: Html,
}

impl Crawler {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    /// Parse a full HTML document
    pub fn parse(markup: &str) -> Self {
        Self::from_document(Html::parse_document(markup))
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// All elements the selector resolves to, in document order
    pub fn select<'a>(&'a self, selector: impl Into<Selector<'a>>) -> Result<Vec<ElementRef<'a>>> {
        selector.into().resolve(&self.document)
    }

    /// Trimmed text of the first match
    pub fn text<'a>(&'a self, selector: impl Into<Selector<'a>>) -> Result<String> {
        self.get(selector, &converters::string())
    }

    /// Convert the first match using the converter's default methods
    pub fn get<'a, T: 'static>(
        &'a self,
        selector: impl Into<Selector<'a>>,
        converter: &Converter<T>,
    ) -> Result<T> {
        self.extract_first(selector.into(), converter, None)
    }

    /// Convert the first match, reading facets in the order of `methods`
    pub fn get_with<'a, T: 'static>(
        &'a self,
        selector: impl Into<Selector<'a>>,
        converter: &Converter<T>,
        methods: &MethodList,
    ) -> Result<T> {
        self.extract_first(selector.into(), converter, Some(methods))
    }

    /// Convert every match; zero matches is an empty result, not an error
    pub fn get_all<'a, T: 'static>(
        &'a self,
        selector: impl Into<Selector<'a>>,
        converter: &Converter<T>,
    ) -> Result<Vec<T>> {
        self.extract_each(selector.into(), converter, None)
    }

    pub fn get_all_with<'a, T: 'static>(
        &'a self,
        selector: impl Into<Selector<'a>>,
        converter: &Converter<T>,
        methods: &MethodList,
    ) -> Result<Vec<T>> {
        self.extract_each(selector.into(), converter, Some(methods))
    }

    fn extract_first<'a, T: 'static>(
        &'a self,
        selector: Selector<'a>,
        converter: &Converter<T>,
        methods: Option<&MethodList>,
    ) -> Result<T> {
        let name = selector.to_string();
        let elements = selector.resolve(&self.document)?;
        tracing::debug!(selector = %name, matches = elements.len(), "resolved selector");

        let element = elements
            .first()
            .ok_or(ExtractError::SelectorNotFound { selector: name })?;

        convert_element(element, converter, methods)
    }

    fn extract_each<'a, T: 'static>(
        &'a self,
        selector: Selector<'a>,
        converter: &Converter<T>,
        methods: Option<&MethodList>,
    ) -> Result<Vec<T>> {
        let name = selector.to_string();
        let elements = selector.resolve(&self.document)?;
        tracing::debug!(selector = %name, matches = elements.len(), "resolved selector");

        elements
            .iter()
            .map(|element| convert_element(element, converter, methods))
            .collect()
    }
}

fn convert_element<T: 'static>(
    element: &ElementRef<'_>,
    converter: &Converter<T>,
    methods: Option<&MethodList>,
) -> Result<T> {
    let methods = methods.unwrap_or_else(|| converter.default_methods());
    let text = read_facets(element, methods);
    Ok(converter.convert(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{boolean, int, optional, regexp, slug, src, string};
    use crate::error::ConversionError;
    use crate::method::Method;
    use regex::Regex;

    const HTML: &str = r#"
    <div id="root">
        <p class="title" data-id="123">Hello World</p>
        <span class="value" data-flag="true">42</span>
        <time class="date" datetime="2025-07-21T10:00:00Z">July 21, 2025</time>
        <a class="link" href="/anime/one-piece/ep-1000">Watch</a>
        <img class="lazy" data-src="/img/lazy.png" src="/img/placeholder.png">
        <img class="eager" src="/img/eager.png">
        <span class="empty">   </span>
    </div>
    "#;

    fn methods(spelling: &str) -> MethodList {
        spelling.parse().unwrap()
    }

    #[test]
    fn test_text_default() {
        let crawler = Crawler::parse(HTML);
        assert_eq!(crawler.text(".title").unwrap(), "Hello World");
        assert_eq!(crawler.get(".title", &string()).unwrap(), "Hello World");
    }

    #[test]
    fn test_html_and_attributes() {
        let crawler = Crawler::parse(HTML);
        let s = string();
        assert_eq!(crawler.get_with(".title", &s, &methods("html")).unwrap(), "Hello World");
        assert_eq!(crawler.get_with(".title", &s, &methods("attr-data-id")).unwrap(), "123");
        assert_eq!(crawler.get_with(".title", &s, &methods(":data-id")).unwrap(), "123");
        assert_eq!(crawler.get_with(".value", &s, &methods("data-flag")).unwrap(), "true");
        assert_eq!(crawler.get_with(".value", &s, &methods(".flag")).unwrap(), "true");
    }

    #[test]
    fn test_typed_converters() {
        let crawler = Crawler::parse(HTML);
        assert_eq!(crawler.get(".value", &int()).unwrap(), 42.0);
        assert!(crawler.get_with(".value", &boolean(), &methods(".flag")).unwrap());
        assert_eq!(
            crawler.get(".link", &slug(1, None)).unwrap(),
            "one-piece/ep-1000"
        );
    }

    #[test]
    fn test_missing_element() {
        let crawler = Crawler::parse(HTML);
        let err = crawler.text(".nope").unwrap_err();
        assert!(matches!(err, ExtractError::SelectorNotFound { ref selector } if selector == ".nope"));
        assert_eq!(err.to_string(), "Element not found for selector: .nope");

        assert!(crawler.get_all(".nope", &string()).unwrap().is_empty());
    }

    #[test]
    fn test_method_fallback() {
        let crawler = Crawler::parse(HTML);
        let order = MethodList::try_from(vec![Method::attr("title"), Method::Text]).unwrap();
        assert_eq!(crawler.get_with(".value", &int(), &order).unwrap(), 42.0);
    }

    #[test]
    fn test_source_converter_prefers_data_src() {
        let crawler = Crawler::parse(HTML);
        assert_eq!(crawler.get(".lazy", &src()).unwrap(), "/img/lazy.png");
        assert_eq!(crawler.get(".eager", &src()).unwrap(), "/img/eager.png");
    }

    #[test]
    fn test_empty_text_reaches_converter() {
        let crawler = Crawler::parse(HTML);
        assert_eq!(crawler.text(".empty").unwrap(), "");
        assert_eq!(crawler.get(".empty", &optional(int())).unwrap(), None);
        assert!(crawler.get(".empty", &int()).unwrap().is_nan());

        let email = regexp(Regex::new(r"\w+@\w+\.\w+").unwrap(), string());
        let err = crawler.get(".empty", &email).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Conversion(ConversionError::NoMatch { .. })
        ));
    }

    #[test]
    fn test_get_all_in_document_order() {
        let crawler = Crawler::parse(
            r#"<ul><li data-n="1">a</li><li>b</li><li data-n="3">c</li></ul>"#,
        );
        assert_eq!(crawler.get_all("li", &string()).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(
            crawler
                .get_all_with("li", &optional(int()), &methods(".n"))
                .unwrap(),
            vec![Some(1.0), None, Some(3.0)]
        );
    }

    #[test]
    fn test_element_handles() {
        let crawler = Crawler::parse(
            r#"<article><h2>First</h2><a href="/p/1">x</a></article>
               <article><h2>Second</h2><a href="/p/2">y</a></article>"#,
        );
        let cards = crawler.select("article").unwrap();
        assert_eq!(cards.len(), 2);

        let whole = crawler.get_all(cards.clone(), &string()).unwrap();
        assert_eq!(whole, vec!["Firstx", "Secondy"]);

        let links = scraper::Selector::parse("a").unwrap();
        let second = cards[1];
        let id = crawler
            .get(
                Selector::query(move |_| second.select(&links).collect()),
                &slug(1, None),
            )
            .unwrap();
        assert_eq!(id, "2");
    }
}
