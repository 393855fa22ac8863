//! Facet selection: which textual readout of an element to convert
//!
//! Methods parse from the spellings `text`, `html`, `attr-<name>`,
//! `data-<name>` and the shorthands `:<name>` / `.<name>`. Shorthands are
//! normalized while parsing, so a `Method` only ever holds canonical variants.

use std::fmt;
use std::str::FromStr;

use scraper::ElementRef;

use crate::error::ExtractError;

/// How to read raw text out of a matched element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// Concatenated text of all descendant text nodes
    Text,
    /// Serialized inner HTML
    Html,
    /// Named attribute, empty when absent
    Attribute(String),
    /// `data-*` attribute, empty when absent
    Data(String),
}

impl Method {
    pub fn attr(name: impl Into<String>) -> Self {
        Method::Attribute(name.into())
    }

    pub fn data(name: impl Into<String>) -> Self {
        Method::Data(name.into())
    }

    /// Read this facet from `element`, untrimmed
    pub fn read(&self, element: &ElementRef<'_>) -> String {
        match self {
            Method::Text => element.text().collect(),
            Method::Html => element.inner_html(),
            Method::Attribute(name) => element.value().attr(name).unwrap_or_default().to_string(),
            Method::Data(name) => element
                .value()
                .attr(&data_attribute_name(name))
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl FromStr for Method {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ExtractError::InvalidMethod(s.to_string());

        let named = |name: &str, build: fn(String) -> Method| {
            if name.is_empty() {
                Err(invalid())
            } else {
                Ok(build(name.to_string()))
            }
        };

        match s {
            "text" => Ok(Method::Text),
            "html" => Ok(Method::Html),
            _ => {
                if let Some(name) = s.strip_prefix(':') {
                    named(name, Method::Attribute)
                } else if let Some(name) = s.strip_prefix('.') {
                    named(name, Method::Data)
                } else if let Some(name) = s.strip_prefix("attr-") {
                    named(name, Method::Attribute)
                } else if let Some(name) = s.strip_prefix("data-") {
                    named(name, Method::Data)
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Text => f.write_str("text"),
            Method::Html => f.write_str("html"),
            Method::Attribute(name) => write!(f, "attr-{name}"),
            Method::Data(name) => write!(f, "data-{name}"),
        }
    }
}

/// Map a dataset key to its attribute: `flag` -> `data-flag`, `userId` -> `data-user-id`
fn data_attribute_name(name: &str) -> String {
    let mut attr = String::with_capacity(name.len() + 6);
    attr.push_str("data-");
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            attr.push('-');
            attr.push(c.to_ascii_lowercase());
        } else {
            attr.push(c);
        }
    }
    attr
}

/// Ordered, non-empty list of methods tried until one yields text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodList(Vec<Method>);

impl MethodList {
    /// Append a lower-priority fallback
    pub fn then(mut self, method: Method) -> Self {
        self.0.push(method);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Method> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Method] {
        &self.0
    }

    /// Parse each spelling in order
    pub fn parse<S: AsRef<str>>(spellings: &[S]) -> Result<Self, ExtractError> {
        let methods = spellings
            .iter()
            .map(|s| s.as_ref().trim().parse())
            .collect::<Result<Vec<Method>, _>>()?;
        Self::try_from(methods)
    }
}

impl From<Method> for MethodList {
    fn from(method: Method) -> Self {
        MethodList(vec![method])
    }
}

impl TryFrom<Vec<Method>> for MethodList {
    type Error = ExtractError;

    fn try_from(methods: Vec<Method>) -> Result<Self, Self::Error> {
        if methods.is_empty() {
            return Err(ExtractError::InvalidMethod(String::new()));
        }
        Ok(MethodList(methods))
    }
}

/// Comma-separated, e.g. `".src, :src"`
impl FromStr for MethodList {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        Self::parse(&parts)
    }
}

impl<'a> IntoIterator for &'a MethodList {
    type Item = &'a Method;
    type IntoIter = std::slice::Iter<'a, Method>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Try each method against `element` in order and keep the first non-empty
/// trimmed text. Returns an empty string when every facet is empty.
pub fn read_facets(element: &ElementRef<'_>, methods: &MethodList) -> String {
    for method in methods {
        let raw = method.read(element);
        let text = raw.trim();
        if !text.is_empty() {
            tracing::debug!(%method, "facet resolved");
            return text.to_string();
        }
        tracing::debug!(%method, "facet empty, falling back");
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn test_parse_spellings() {
        assert_eq!("text".parse::<Method>().unwrap(), Method::Text);
        assert_eq!("html".parse::<Method>().unwrap(), Method::Html);
        assert_eq!(
            "attr-data-id".parse::<Method>().unwrap(),
            Method::attr("data-id")
        );
        assert_eq!("data-flag".parse::<Method>().unwrap(), Method::data("flag"));
    }

    #[test]
    fn test_shorthands_normalize() {
        assert_eq!(
            ":href".parse::<Method>().unwrap(),
            "attr-href".parse::<Method>().unwrap()
        );
        assert_eq!(
            ".flag".parse::<Method>().unwrap(),
            "data-flag".parse::<Method>().unwrap()
        );
        assert_eq!(":href".parse::<Method>().unwrap().to_string(), "attr-href");
    }

    #[test]
    fn test_invalid_methods() {
        for bad in ["", "attr", "attr-", ":", ".", "inner", "Text"] {
            assert!(
                matches!(bad.parse::<Method>(), Err(ExtractError::InvalidMethod(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(MethodList::try_from(Vec::new()).is_err());
    }

    #[test]
    fn test_method_list_from_str() {
        let list: MethodList = ".src, :src".parse().unwrap();
        assert_eq!(
            list,
            MethodList::from(Method::data("src")).then(Method::attr("src"))
        );
    }

    #[test]
    fn test_read_each_facet() {
        let doc = Html::parse_fragment(
            r#"<p class="t" title="x" data-user-id="7"> Hi <b>there</b> </p>"#,
        );
        let el = first(&doc, ".t");

        assert_eq!(Method::Text.read(&el), " Hi there ");
        assert_eq!(Method::Html.read(&el), " Hi <b>there</b> ");
        assert_eq!(Method::attr("title").read(&el), "x");
        assert_eq!(Method::attr("missing").read(&el), "");
        assert_eq!(Method::data("userId").read(&el), "7");
        assert_eq!(Method::data("user-id").read(&el), "7");
    }

    #[test]
    fn test_read_facets_first_non_empty_wins() {
        let doc = Html::parse_fragment(r#"<span class="v" data-n="  " title="42">text</span>"#);
        let el = first(&doc, ".v");

        let methods =
            MethodList::try_from(vec![Method::data("n"), Method::attr("title"), Method::Text])
                .unwrap();
        assert_eq!(read_facets(&el, &methods), "42");

        let all_empty =
            MethodList::try_from(vec![Method::data("n"), Method::attr("nope")]).unwrap();
        assert_eq!(read_facets(&el, &all_empty), "");
    }
}
