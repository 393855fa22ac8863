//! Combinators that cut a substring out of the raw text before converting it

use regex::Regex;

use super::Converter;
use crate::error::ConversionError;
use crate::method::Method;

/// Run `pattern` against the text and convert the first capture group
/// (or the whole match when there is no group) with `inner`.
///
/// Fails with [`ConversionError::NoMatch`] when the pattern does not match.
pub fn regexp<T: 'static>(pattern: Regex, inner: Converter<T>) -> Converter<T> {
    Converter::new(
        move |input: &str| {
            let captures = pattern
                .captures(input)
                .ok_or_else(|| ConversionError::NoMatch {
                    pattern: pattern.as_str().to_string(),
                })?;

            let matched = captures
                .get(1)
                .or_else(|| captures.get(0))
                .map(|m| m.as_str())
                .unwrap_or_default();

            inner.convert(matched)
        },
        Method::Text,
    )
}

/// Slice `/`-separated path segments `start..=end`, ignoring empty segments.
///
/// `end` is inclusive; `None` runs to the last segment. Reads `href` by default.
pub fn slug(start: usize, end: Option<usize>) -> Converter<String> {
    Converter::new(
        move |input: &str| Ok(slice_segments(input, start, end)),
        Method::attr("href"),
    )
}

fn slice_segments(path: &str, start: usize, end: Option<usize>) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let stop = end
        .map(|e| e.saturating_add(1))
        .unwrap_or(segments.len())
        .min(segments.len());

    if start >= stop {
        return String::new();
    }

    segments[start..stop].join("/")
}
