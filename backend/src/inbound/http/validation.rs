//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialise into `Option` fields so that absent values
//! surface as `ArgumentRequired` naming the field rather than as a generic
//! JSON error.

use actix_web::web;
use chrono::NaiveDate;
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn malformed(field: FieldName, value: &str, expectation: &str) -> Error {
    let field = field.as_str();
    Error::incorrect_data(format!("{field} must be {expectation}"))
        .with_details(json!({ "field": field, "value": value }))
}

/// Present, non-blank text, trimmed.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(raw.trim().to_owned()),
        _ => Err(Error::missing_field(field.as_str())),
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| malformed(field, value, "a date formatted YYYY-MM-DD"))
}

pub(crate) fn required_date(value: Option<String>, field: FieldName) -> Result<NaiveDate, Error> {
    let raw = required_text(value, field)?;
    parse_date(&raw, field)
}

pub(crate) fn optional_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    match value {
        Some(raw) if raw.trim().is_empty() => Err(Error::missing_field(field.as_str())),
        Some(raw) => parse_date(&raw, field).map(Some),
        None => Ok(None),
    }
}

/// Convert a raw identifier into a typed id.
///
/// Absent, non-numeric and non-positive ids all fail `ArgumentRequired`: the
/// caller did not supply a usable reference.
pub(crate) fn parse_id<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i64>,
{
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| {
            Error::argument_required(format!("{} must be a positive integer", field.as_str()))
                .with_details(json!({ "field": field.as_str(), "value": raw }))
        })
}

pub(crate) fn required_id<T>(value: Option<i64>, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i64>,
{
    let raw = value.ok_or_else(|| Error::missing_field(field.as_str()))?;
    T::try_from(raw).map_err(|_| {
        Error::argument_required(format!("{} must be a positive integer", field.as_str()))
            .with_details(json!({ "field": field.as_str(), "value": raw }))
    })
}

/// JSON extractor configuration rendering malformed bodies as `IncorrectData`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected request body");
        Error::incorrect_data(format!("malformed request body: {err}")).into()
    })
}
