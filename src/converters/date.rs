//! Date converters
//!
//! `date()` accepts machine formats (RFC 3339, RFC 2822, ISO dates with or
//! without time) and the human-readable forms browsers print, such as
//! `July 21, 2025` or `Mon Jul 21 2025 10:00:00 GMT+0000`. Values without an
//! offset are taken as UTC. Unparseable text yields `None`, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_english::Dialect;
use regex::Regex;

use super::Converter;
use crate::error::{ConversionError, ExtractError};
use crate::method::Method;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
];

// %B also accepts abbreviated month names
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%B %d %Y", "%d %B %Y"];

/// `Date.prototype.toString` shapes, after the `(Zone Name)` suffix is cut
const JS_OFFSET_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";
const JS_GMT_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT";
const JS_DATE_FORMAT: &str = "%a %b %d %Y";

/// Template placeholders understood by [`template_date`]
const TEMPLATE_TOKENS: &str = "YYYY|MM|DD|hh|mm|ss";

/// Best-effort parse of a timestamp; `None` stands in for an invalid date
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_js_date_string(input) {
        return Some(dt);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let date_only = NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    if date_only.is_some() {
        return date_only;
    }

    // everything else: slash dates, 12-hour clocks, unix timestamps
    dateparser::parse_with(input, &Utc, NaiveTime::MIN).ok()
}

fn parse_js_date_string(input: &str) -> Option<DateTime<Utc>> {
    let input = match input.find(" (") {
        Some(idx) if input.ends_with(')') => &input[..idx],
        _ => input,
    };

    if let Ok(dt) = DateTime::parse_from_str(input, JS_OFFSET_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, JS_GMT_FORMAT) {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(input, JS_DATE_FORMAT)
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Lenient date: `None` for empty or unrecognised text
pub fn date() -> Converter<Option<DateTime<Utc>>> {
    Converter::new(|input: &str| Ok(parse_date(input)), Method::Text)
}

/// Natural-language date such as `tomorrow`, `next friday` or `3 days ago`,
/// resolved against `reference` (now when `None`).
///
/// Text the parser cannot place yields `None`.
pub fn natural_date(reference: Option<DateTime<Utc>>) -> Converter<Option<DateTime<Utc>>> {
    Converter::new(
        move |input: &str| {
            if input.is_empty() {
                return Ok(None);
            }
            let now = reference.unwrap_or_else(Utc::now);
            match chrono_english::parse_date_string(input, now, Dialect::Us) {
                Ok(dt) => Ok(Some(dt)),
                Err(e) => {
                    tracing::debug!(input, error = ?e, "natural date not recognised");
                    Ok(None)
                }
            }
        },
        Method::Text,
    )
}

/// Strict strftime-style parse, e.g. `"%H:%M:%S %d/%m/%Y"`.
///
/// Formats carrying `%z` keep their offset; date-only formats resolve to midnight UTC.
pub fn formatted_date(format: impl Into<String>) -> Converter<DateTime<Utc>> {
    let format = format.into();
    Converter::new(
        move |input: &str| {
            if let Ok(dt) = DateTime::parse_from_str(input, &format) {
                return Ok(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, &format) {
                return Ok(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(input, &format)
                .ok()
                .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
                .ok_or_else(|| ConversionError::TemplateMismatch {
                    input: input.to_string(),
                    template: format.clone(),
                })
        },
        Method::Text,
    )
}

/// Placeholder template such as `"DD/MM/YYYY hh:mm"`.
///
/// Each of `YYYY MM DD hh mm ss` matches a digit run; everything else must
/// match literally and the whole input must be consumed. Missing parts
/// default to 1970-01-01 00:00:00 UTC.
pub fn template_date(template: &str) -> Result<Converter<DateTime<Utc>>, ExtractError> {
    let tokens_re = Regex::new(TEMPLATE_TOKENS)?;

    let mut pattern = String::from("^");
    let mut tokens = Vec::new();
    let mut last = 0;
    for token in tokens_re.find_iter(template) {
        pattern.push_str(&regex::escape(&template[last..token.start()]));
        pattern.push_str(r"(\d+)");
        tokens.push(token.as_str().to_string());
        last = token.end();
    }
    pattern.push_str(&regex::escape(&template[last..]));
    pattern.push('$');

    let matcher = Regex::new(&pattern)?;
    let template = template.to_string();

    Ok(Converter::new(
        move |input: &str| {
            let mismatch = || ConversionError::TemplateMismatch {
                input: input.to_string(),
                template: template.clone(),
            };
            let invalid = || ConversionError::InvalidDate {
                input: input.to_string(),
            };

            let captures = matcher.captures(input).ok_or_else(mismatch)?;

            let mut parts = DateParts::default();
            for (i, token) in tokens.iter().enumerate() {
                let raw = captures.get(i + 1).map(|m| m.as_str()).unwrap_or_default();
                let value: u32 = raw.parse().map_err(|_| invalid())?;
                parts.set(token, value);
            }

            parts.to_datetime().ok_or_else(invalid)
        },
        Method::Text,
    ))
}

struct DateParts {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl Default for DateParts {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl DateParts {
    fn set(&mut self, token: &str, value: u32) {
        match token {
            "YYYY" => self.year = value,
            "MM" => self.month = value,
            "DD" => self.day = value,
            "hh" => self.hour = value,
            "mm" => self.minute = value,
            "ss" => self.second = value,
            _ => {}
        }
    }

    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let year = i32::try_from(self.year).ok()?;
        let naive = NaiveDate::from_ymd_opt(year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)?;
        Some(Utc.from_utc_datetime(&naive))
    }
}
