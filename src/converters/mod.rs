//! Converters: raw facet text to typed values
//!
//! A [`Converter`] pairs a transform with the facet order it reads by
//! default. Primitives live here; pattern and path-slicing combinators and
//! the date adapters have their own modules.

mod date;
mod numeric;
mod pattern;

pub use date::*;
pub use numeric::*;
pub use pattern::*;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ConversionError;
use crate::method::{Method, MethodList};

type Transform<T> = dyn Fn(&str) -> Result<T, ConversionError> + Send + Sync;

/// Reusable text-to-value transform with a default method order
pub struct Converter<T> {
    transform: Arc<Transform<T>>,
    methods: MethodList,
}

impl<T> Clone for Converter<T> {
    fn clone(&self) -> Self {
        Self {
            transform: Arc::clone(&self.transform),
            methods: self.methods.clone(),
        }
    }
}

impl<T> fmt::Debug for Converter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Converter<T> {
    pub fn new<F>(transform: F, methods: impl Into<MethodList>) -> Self
    where
        F: Fn(&str) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        Self {
            transform: Arc::new(transform),
            methods: methods.into(),
        }
    }

    /// Run the transform on already-trimmed text
    pub fn convert(&self, input: &str) -> Result<T, ConversionError> {
        (self.transform)(input)
    }

    pub fn default_methods(&self) -> &MethodList {
        &self.methods
    }

    /// Same transform, different default methods
    pub fn with_methods(mut self, methods: impl Into<MethodList>) -> Self {
        self.methods = methods.into();
        self
    }

    /// Post-process converted values, keeping the default methods
    pub fn map<U, F>(self, f: F) -> Converter<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let inner = self.transform;
        Converter {
            transform: Arc::new(move |input: &str| inner(input).map(&f)),
            methods: self.methods,
        }
    }
}

/// Build an ad hoc converter
pub fn custom<T, F>(transform: F, methods: impl Into<MethodList>) -> Converter<T>
where
    T: 'static,
    F: Fn(&str) -> Result<T, ConversionError> + Send + Sync + 'static,
{
    Converter::new(transform, methods)
}

/// Yield `None` on empty input instead of running `inner`
pub fn optional<T: 'static>(inner: Converter<T>) -> Converter<Option<T>> {
    let methods = inner.methods.clone();
    let transform = inner.transform;
    Converter::new(
        move |input: &str| {
            if input.is_empty() {
                Ok(None)
            } else {
                transform(input).map(Some)
            }
        },
        methods,
    )
}

pub fn string() -> Converter<String> {
    Converter::new(|input: &str| Ok(input.to_string()), Method::Text)
}

/// False for empty text and, case-insensitively, `false`, `0`, `null`, `undefined`
pub fn truthy(input: &str) -> bool {
    !(input.is_empty()
        || input.eq_ignore_ascii_case("false")
        || input == "0"
        || input.eq_ignore_ascii_case("null")
        || input.eq_ignore_ascii_case("undefined"))
}

pub fn boolean() -> Converter<bool> {
    Converter::new(|input: &str| Ok(truthy(input)), Method::Text)
}

/// Leading-integer parse; `NaN` when no digits lead the text
pub fn int() -> Converter<f64> {
    Converter::new(|input: &str| Ok(parse_int_prefix(input)), Method::Text)
}

/// Leading-float parse; `NaN` when no number leads the text
pub fn float() -> Converter<f64> {
    Converter::new(|input: &str| Ok(parse_float_prefix(input)), Method::Text)
}

/// UTF-8 bytes of the text
pub fn buffer() -> Converter<Vec<u8>> {
    Converter::new(|input: &str| Ok(input.as_bytes().to_vec()), Method::Text)
}

pub fn json() -> Converter<Value> {
    Converter::new(
        |input: &str| serde_json::from_str(input).map_err(ConversionError::from),
        Method::Text,
    )
}

/// Media source URL: `data-src` (lazy loaders) before `src`
pub fn src() -> Converter<String> {
    string().with_methods(MethodList::from(Method::data("src")).then(Method::attr("src")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_identity() {
        assert_eq!(string().convert("Hello World").unwrap(), "Hello World");
        assert_eq!(string().convert("").unwrap(), "");
        assert_eq!(string().default_methods().as_slice(), &[Method::Text]);
    }

    #[test]
    fn test_boolean_rule() {
        let conv = boolean();
        for falsy in ["", "false", "FALSE", "0", "null", "NULL", "Null", "undefined", "UnDeFiNeD"] {
            assert!(!conv.convert(falsy).unwrap(), "{falsy:?} should be false");
        }
        for truthy in ["true", "1", "yes", "no", "00", " "] {
            assert!(conv.convert(truthy).unwrap(), "{truthy:?} should be true");
        }
    }

    #[test]
    fn test_optional_wrapper() {
        let conv = optional(int());
        assert_eq!(conv.convert("").unwrap(), None);
        assert_eq!(conv.convert("12px").unwrap(), Some(12.0));

        let opt_bool = optional(boolean());
        assert_eq!(opt_bool.convert("").unwrap(), None);
        assert_eq!(opt_bool.convert("false").unwrap(), Some(false));
        assert_eq!(opt_bool.convert("on").unwrap(), Some(true));

        let opt_str = optional(string());
        assert_eq!(opt_str.convert("").unwrap(), None);
        assert_eq!(opt_str.convert("x").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_optional_keeps_methods() {
        let conv = optional(src());
        assert_eq!(
            conv.default_methods().as_slice(),
            &[Method::data("src"), Method::attr("src")]
        );
    }

    #[test]
    fn test_json_failure_propagates() {
        let value = json().convert(r#"{"a": [1, 2]}"#).unwrap();
        assert_eq!(value["a"][1], 2);

        assert!(matches!(json().convert("{oops"), Err(ConversionError::Json(_))));
        assert!(matches!(json().convert(""), Err(ConversionError::Json(_))));
        assert_eq!(optional(json()).convert("").unwrap(), None);
    }

    #[test]
    fn test_buffer_encodes_utf8() {
        assert_eq!(buffer().convert("é").unwrap(), vec![0xc3, 0xa9]);
    }

    #[test]
    fn test_custom_and_map() {
        let upper = custom(
            |input: &str| {
                if input.is_empty() {
                    Err(ConversionError::Custom("empty".into()))
                } else {
                    Ok(input.to_uppercase())
                }
            },
            Method::attr("title"),
        );
        assert_eq!(upper.convert("abc").unwrap(), "ABC");
        assert!(upper.convert("").is_err());

        let len = upper.map(|s| s.len());
        assert_eq!(len.convert("abcd").unwrap(), 4);
        assert_eq!(len.default_methods().as_slice(), &[Method::attr("title")]);
    }
}
