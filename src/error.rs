//! Error types for selection, conversion and document retrieval

use thiserror::Error;

/// A converter could not turn raw text into a value
#[derive(Error, Debug)]
pub enum ConversionError {
    /// `regexp` converter found nothing in the input
    #[error("No match found for pattern: {pattern}")]
    NoMatch { pattern: String },

    /// Structured-value payload was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input could not be read as a date/time
    #[error("Invalid date: {input:?}")]
    InvalidDate { input: String },

    /// Input did not line up with a date template or format string
    #[error("Input {input:?} does not match template {template:?}")]
    TemplateMismatch { input: String, template: String },

    /// Raised by user-supplied converters
    #[error("{0}")]
    Custom(String),
}

/// Errors surfaced by the extraction engine
#[derive(Error, Debug)]
pub enum ExtractError {
    /// `get` matched zero elements
    #[error("Element not found for selector: {selector}")]
    SelectorNotFound { selector: String },

    /// CSS selector failed to parse
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Method spelling is not one of text, html, attr-*, data-*, :*, .*
    #[error("Invalid method: {0:?}")]
    InvalidMethod(String),

    /// Converter name is not in the registry
    #[error("Unknown converter type: {0:?}")]
    UnknownType(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Document retrieval failed
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid fetch configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Server answered with a non-success status; the body is kept for inspection
    #[error("Failed to fetch {url} (HTTP {status})")]
    Status { url: String, status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Blocking(#[from] ureq::Error),
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
