//! Batch field extraction driven by a serializable request
//!
//! Each field names a selector, a converter type and optionally a method
//! order, a regex and a slug range. Fields fail independently: a failing
//! field is reported under `errors` and the rest of the batch still runs.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::converters::{self, Converter};
use crate::crawler::Crawler;
use crate::error::Result;
use crate::method::MethodList;
use crate::registry::ConverterType;

/// Extraction request, usually deserialized from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub fields: Vec<FieldSpec>,
}

/// Single field to extract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Output key
    pub alias: String,
    /// CSS selector
    pub selector: String,
    /// Converter name: str, bool, int, float, buffer, json, date, src (suffix `?` for optional)
    #[serde(default = "default_type", rename = "type")]
    pub type_name: String,
    /// Method spellings tried in order; empty uses the converter default
    #[serde(default)]
    pub methods: Vec<String>,
    /// Convert every match into an array instead of only the first
    #[serde(default)]
    pub all: bool,
    /// Regex applied before conversion (first capture group wins)
    #[serde(default)]
    pub pattern: Option<String>,
    /// Path segment range; replaces the converter type with a string slug
    #[serde(default)]
    pub slug: Option<SlugRange>,
}

fn default_type() -> String {
    "str".to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlugRange {
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
}

/// Values and errors keyed by field alias
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub values: HashMap<String, Value>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub errors: HashMap<String, String>,
}

impl FieldSpec {
    pub fn new(alias: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            selector: selector.into(),
            type_name: default_type(),
            methods: Vec::new(),
            all: false,
            pattern: None,
            slug: None,
        }
    }

    /// Build the converter this field describes
    pub fn converter(&self) -> Result<Converter<Value>> {
        let base = match self.slug {
            Some(range) => converters::slug(range.start, range.end).map(Value::String),
            None => self.type_name.parse::<ConverterType>()?.converter(),
        };

        match &self.pattern {
            Some(pattern) => {
                let methods = base.default_methods().clone();
                Ok(converters::regexp(Regex::new(pattern)?, base).with_methods(methods))
            }
            None => Ok(base),
        }
    }

    /// Explicit method order, if any
    pub fn method_list(&self) -> Result<Option<MethodList>> {
        if self.methods.is_empty() {
            Ok(None)
        } else {
            MethodList::parse(&self.methods).map(Some)
        }
    }

    /// Extract this field from an already-parsed document
    pub fn extract(&self, crawler: &Crawler) -> Result<Value> {
        let converter = self.converter()?;
        let selector = self.selector.as_str();

        match (self.method_list()?, self.all) {
            (Some(methods), true) => crawler
                .get_all_with(selector, &converter, &methods)
                .map(Value::Array),
            (None, true) => crawler.get_all(selector, &converter).map(Value::Array),
            (Some(methods), false) => crawler.get_with(selector, &converter, &methods),
            (None, false) => crawler.get(selector, &converter),
        }
    }
}

/// Run every field of `request` against one crawler
pub fn extract_fields_from(crawler: &Crawler, request: &ExtractionRequest) -> ExtractionResult {
    let mut result = ExtractionResult::default();

    for field in &request.fields {
        match field.extract(crawler) {
            Ok(value) => {
                result.values.insert(field.alias.clone(), value);
            }
            Err(e) => {
                tracing::warn!(alias = %field.alias, error = %e, "field extraction failed");
                result.values.insert(field.alias.clone(), Value::Null);
                result.errors.insert(field.alias.clone(), e.to_string());
            }
        }
    }

    result
}

/// Parse `html` once and extract every requested field
pub fn extract_fields(html: &str, request: &ExtractionRequest) -> ExtractionResult {
    let crawler = Crawler::parse(html);
    extract_fields_from(&crawler, request)
}
