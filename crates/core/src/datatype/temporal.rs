//! Date and time datatypes.
//!
//! Wire formats are chosen by converters through the
//! [`Format`](crate::Format) decoration. In-process coercion from text only
//! understands the canonical forms: RFC 3339 for timestamps and ISO 8601
//! (`%Y-%m-%d`) for dates.

use chrono::{DateTime, NaiveDate};

use crate::datatype::mismatch;
use crate::error::CheckError;
use crate::value::Value;

/// Canonical text format of a [`DateType`].
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Timestamps with a UTC offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatetimeType;

impl DatetimeType {
    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        match &value {
            Value::DateTime(_) => Ok(value),
            Value::String(s) if coerce && !strict => DateTime::parse_from_rfc3339(s)
                .map(Value::DateTime)
                .map_err(|e| {
                    CheckError::invalid(format!("{s:?} is not an RFC 3339 timestamp: {e}"))
                }),
            _ => Err(mismatch("Datetime", &value)),
        }
    }
}

/// Calendar dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateType;

impl DateType {
    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        match &value {
            Value::Date(_) => Ok(value),
            Value::String(s) if coerce && !strict => NaiveDate::parse_from_str(s, ISO_DATE)
                .map(Value::Date)
                .map_err(|e| CheckError::invalid(format!("{s:?} is not an ISO 8601 date: {e}"))),
            _ => Err(mismatch("Date", &value)),
        }
    }
}
