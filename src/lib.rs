//! Typed field extraction from HTML
//!
//! Locate an element with a selector, read one of its facets (text, inner
//! HTML, an attribute or a `data-*` attribute) and convert it to a typed value:
//! - Converters for primitives, optional values, regex captures and URL slugs
//! - Ordered method fallback (`.src` then `:src`, first non-empty wins)
//! - Batch extraction from a JSON request, exposed over FFI
//! - Async and blocking document loading over HTTP

pub mod batch;
pub mod converters;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod ffi;
pub mod method;
pub mod registry;
pub mod selector;

pub use batch::{extract_fields, ExtractionRequest, ExtractionResult, FieldSpec, SlugRange};
pub use converters::Converter;
pub use crawler::Crawler;
pub use error::{ConversionError, ExtractError, FetchError, Result};
pub use fetch::{FetchConfig, LoadRequest};
pub use method::{read_facets, Method, MethodList};
pub use registry::{converter_for, ConverterKind, ConverterType};
pub use selector::Selector;
