//! Named converter lookup
//!
//! Maps type names such as `int` or `date?` to a [`ConverterType`]. Named
//! converters produce `serde_json::Value` so callers that only know a type
//! name at runtime (batch requests, FFI) get uniformly shaped output.

use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::converters::{self, Converter};
use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConverterKind {
    Str,
    Bool,
    Int,
    Float,
    Buffer,
    Json,
    Date,
    Src,
}

impl ConverterKind {
    pub const ALL: [ConverterKind; 8] = [
        ConverterKind::Str,
        ConverterKind::Bool,
        ConverterKind::Int,
        ConverterKind::Float,
        ConverterKind::Buffer,
        ConverterKind::Json,
        ConverterKind::Date,
        ConverterKind::Src,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConverterKind::Str => "str",
            ConverterKind::Bool => "bool",
            ConverterKind::Int => "int",
            ConverterKind::Float => "float",
            ConverterKind::Buffer => "buffer",
            ConverterKind::Json => "json",
            ConverterKind::Date => "date",
            ConverterKind::Src => "src",
        }
    }

    /// Converter producing a JSON value for this kind
    pub fn converter(self) -> Converter<Value> {
        match self {
            ConverterKind::Str => converters::string().map(Value::String),
            ConverterKind::Src => converters::src().map(Value::String),
            ConverterKind::Bool => converters::boolean().map(Value::Bool),
            ConverterKind::Int => converters::int().map(number_value),
            ConverterKind::Float => converters::float().map(number_value),
            ConverterKind::Buffer => converters::buffer().map(Value::from),
            ConverterKind::Json => converters::json(),
            // invalid dates become null
            ConverterKind::Date => converters::date()
                .map(|dt| dt.map_or(Value::Null, |dt| Value::String(dt.to_rfc3339()))),
        }
    }
}

/// Whole numbers render as JSON integers; `NaN` and infinities become `null`
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// A converter kind plus whether empty input yields `null`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConverterType {
    pub kind: ConverterKind,
    pub optional: bool,
}

impl ConverterType {
    pub fn required(kind: ConverterKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    pub fn optional(kind: ConverterKind) -> Self {
        Self {
            kind,
            optional: true,
        }
    }

    pub fn converter(self) -> Converter<Value> {
        let base = self.kind.converter();
        if self.optional {
            converters::optional(base).map(|v| v.unwrap_or(Value::Null))
        } else {
            base
        }
    }
}

impl FromStr for ConverterType {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let (base, optional) = match name.strip_suffix('?') {
            Some(base) => (base, true),
            None => (name, false),
        };

        ConverterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == base)
            .map(|kind| ConverterType { kind, optional })
            .ok_or_else(|| ExtractError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for ConverterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// Look up a converter by name, e.g. `"int?"`
pub fn converter_for(name: &str) -> Result<Converter<Value>, ExtractError> {
    Ok(name.parse::<ConverterType>()?.converter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::MethodList;
    use serde_json::json;

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "int".parse::<ConverterType>().unwrap(),
            ConverterType::required(ConverterKind::Int)
        );
        assert_eq!(
            "date?".parse::<ConverterType>().unwrap(),
            ConverterType::optional(ConverterKind::Date)
        );
        for kind in ConverterKind::ALL {
            let ty: ConverterType = format!("{}?", kind.name()).parse().unwrap();
            assert_eq!(ty.to_string(), format!("{}?", kind.name()));
        }
        assert!(matches!(
            "integer".parse::<ConverterType>(),
            Err(ExtractError::UnknownType(_))
        ));
        assert!("?".parse::<ConverterType>().is_err());
    }

    #[test]
    fn test_named_values() {
        assert_eq!(converter_for("str").unwrap().convert("hi").unwrap(), json!("hi"));
        assert_eq!(converter_for("bool").unwrap().convert("NULL").unwrap(), json!(false));
        assert_eq!(converter_for("int").unwrap().convert("42px").unwrap(), json!(42));
        assert_eq!(converter_for("float").unwrap().convert("1.5").unwrap(), json!(1.5));
        assert_eq!(converter_for("int").unwrap().convert("n/a").unwrap(), Value::Null);
        assert_eq!(converter_for("buffer").unwrap().convert("AB").unwrap(), json!([65, 66]));
        assert_eq!(
            converter_for("json").unwrap().convert(r#"{"a":1}"#).unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            converter_for("date").unwrap().convert("2025-07-21T10:00:00Z").unwrap(),
            json!("2025-07-21T10:00:00+00:00")
        );
        assert_eq!(
            converter_for("date").unwrap().convert("July 21, 2025").unwrap(),
            json!("2025-07-21T00:00:00+00:00")
        );
        assert_eq!(converter_for("date").unwrap().convert("soon").unwrap(), Value::Null);
    }

    #[test]
    fn test_optional_names_yield_null() {
        for kind in ConverterKind::ALL {
            let conv = ConverterType::optional(kind).converter();
            assert_eq!(conv.convert("").unwrap(), Value::Null, "{}", kind.name());
        }
        // required variants keep their own empty-input policy
        assert_eq!(converter_for("str").unwrap().convert("").unwrap(), json!(""));
        assert_eq!(converter_for("bool").unwrap().convert("").unwrap(), json!(false));
        assert!(converter_for("json").unwrap().convert("").is_err());
    }

    #[test]
    fn test_src_keeps_fallback_methods() {
        let conv = converter_for("src?").unwrap();
        assert_eq!(
            conv.default_methods(),
            &".src, :src".parse::<MethodList>().unwrap()
        );
    }
}
