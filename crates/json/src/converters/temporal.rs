use std::fmt::{Display, Write as _};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use databind_core::mapper::{Deserializer, Serializer};
use databind_core::{Context, Format, ISO_DATE, Location, MapperError, Value};

/// Naive timestamps without an offset are read as UTC.
const NAIVE_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Render with a user supplied format. Invalid format strings surface as a
/// value mismatch instead of a formatting panic.
fn render(
    location: &Location<'_>,
    formatted: impl Display,
    format: &str,
) -> Result<Value, MapperError> {
    let mut out = String::new();
    write!(out, "{formatted}")
        .map_err(|_| location.value_mismatch(format!("invalid format string {format:?}")))?;
    Ok(Value::String(out))
}

fn formats<'a>(ctx: &'a Context<'_>, location: &Location<'a>) -> Option<&'a [String]> {
    ctx.decoration::<Format>(location)
        .map(Format::formats)
        .filter(|formats| !formats.is_empty())
}

/// Timestamps as text. The [`Format`] decoration selects the wire formats,
/// RFC 3339 is used otherwise.
pub(crate) struct DatetimeConverter;

impl DatetimeConverter {
    fn parse(text: &str, format: &str) -> Option<Value> {
        DateTime::parse_from_str(text, format)
            .or_else(|_| {
                NaiveDateTime::parse_from_str(text, format).map(|dt| dt.and_utc().fixed_offset())
            })
            .ok()
            .map(Value::DateTime)
    }
}

impl Deserializer for DatetimeConverter {
    fn deserialize(
        &self,
        ctx: &Context<'_>,
        location: &Location<'_>,
    ) -> Result<Value, MapperError> {
        let Value::String(text) = location.value() else {
            return Err(location.type_mismatch());
        };
        let parsed = match formats(ctx, location) {
            Some(formats) => formats.iter().find_map(|format| Self::parse(text, format)),
            None => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(Value::DateTime)
                .or_else(|| Self::parse(text, NAIVE_DATETIME)),
        };
        parsed.ok_or_else(|| location.value_mismatch(format!("{text:?} is not a valid timestamp")))
    }
}

impl Serializer for DatetimeConverter {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let Value::DateTime(datetime) = location.value() else {
            return Err(location.type_mismatch());
        };
        match formats(ctx, location).and_then(<[String]>::first) {
            Some(format) => render(location, datetime.format(format), format),
            None => Ok(Value::String(datetime.to_rfc3339())),
        }
    }
}

/// Calendar dates as text, ISO 8601 unless a [`Format`] decoration says
/// otherwise.
pub(crate) struct DateConverter;

impl Deserializer for DateConverter {
    fn deserialize(
        &self,
        ctx: &Context<'_>,
        location: &Location<'_>,
    ) -> Result<Value, MapperError> {
        let Value::String(text) = location.value() else {
            return Err(location.type_mismatch());
        };
        let iso = [ISO_DATE.to_owned()];
        formats(ctx, location)
            .unwrap_or(&iso[..])
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
            .map(Value::Date)
            .ok_or_else(|| location.value_mismatch(format!("{text:?} is not a valid date")))
    }
}

impl Serializer for DateConverter {
    fn serialize(&self, ctx: &Context<'_>, location: &Location<'_>) -> Result<Value, MapperError> {
        let Value::Date(date) = location.value() else {
            return Err(location.type_mismatch());
        };
        let format = formats(ctx, location)
            .and_then(<[String]>::first)
            .map_or(ISO_DATE, String::as_str);
        render(location, date.format(format), format)
    }
}
