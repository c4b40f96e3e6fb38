//! Scalar datatypes.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::datatype::mismatch;
use crate::error::{CheckError, TypeDefError};
use crate::value::Value;

/// Booleans. Non-strict booleans coerce other values by truthiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanType {
    pub strict: bool,
}

impl Default for BooleanType {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl BooleanType {
    pub const fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        match value {
            Value::Bool(_) => Ok(value),
            _ if self.strict || strict => Err(mismatch("Boolean", &value)),
            _ if coerce => Ok(Value::Bool(value.truthy())),
            _ => Ok(value),
        }
    }
}

/// Strings. Non-strict strings coerce other values to their text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringType {
    pub strict: bool,
}

impl Default for StringType {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl StringType {
    pub const fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        match value {
            Value::String(_) => Ok(value),
            _ if self.strict || strict => Err(mismatch("String", &value)),
            _ if coerce => Ok(Value::String(value.to_plain_string())),
            _ => Ok(value),
        }
    }
}

/// Integers. Non-strict integers parse strings and truncate fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerType {
    pub strict: bool,
}

impl Default for IntegerType {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl IntegerType {
    pub const fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        if let Value::Integer(_) = value {
            return Ok(value);
        }
        if self.strict || strict {
            return Err(mismatch("Integer", &value));
        }
        if !coerce {
            return Ok(value);
        }
        match &value {
            Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
            Value::String(s) => s.trim().parse::<i64>().map(Value::Integer).map_err(|_| {
                CheckError::invalid(format!("invalid literal for Integer: {s:?}"))
            }),
            Value::Float(x) => {
                let truncated = x.trunc();
                // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound.
                if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                    Ok(Value::Integer(truncated as i64))
                } else {
                    Err(CheckError::invalid(format!("{x} is out of range for Integer")))
                }
            }
            Value::Decimal(d) => d
                .trunc()
                .to_i64()
                .map(Value::Integer)
                .ok_or_else(|| CheckError::invalid(format!("{d} is out of range for Integer"))),
            _ => Err(mismatch("Integer", &value)),
        }
    }
}

/// In-process representation of a [`DecimalType`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalBacking {
    /// `f64`.
    #[default]
    Float,
    /// Arbitrary precision [`Decimal`].
    Decimal,
}

/// Numbers backed by a float or an arbitrary precision decimal.
///
/// Integers, floats and decimals are always accepted. Strings are accepted
/// when the type is not strict or when it is decimal-backed, since the
/// textual form is the lossless wire representation of a decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalType {
    backing: DecimalBacking,
    scale: Option<u32>,
    strict: bool,
}

impl Default for DecimalType {
    fn default() -> Self {
        Self::float()
    }
}

impl DecimalType {
    /// Float-backed, strict.
    pub const fn float() -> Self {
        Self {
            backing: DecimalBacking::Float,
            scale: None,
            strict: true,
        }
    }

    /// Decimal-backed, strict.
    pub const fn decimal() -> Self {
        Self {
            backing: DecimalBacking::Decimal,
            scale: None,
            strict: true,
        }
    }

    /// Round coerced decimals to `scale` fractional digits. Only valid for
    /// decimal-backed types.
    pub fn with_scale(mut self, scale: u32) -> Result<Self, TypeDefError> {
        if self.backing != DecimalBacking::Decimal {
            return Err(TypeDefError::InvalidParameter {
                datatype: "Decimal",
                message: "a rounding scale requires decimal backing".into(),
            });
        }
        self.scale = Some(scale);
        Ok(self)
    }

    #[must_use = "builder methods must be chained or built"]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub const fn backing(&self) -> DecimalBacking {
        self.backing
    }

    pub const fn scale(&self) -> Option<u32> {
        self.scale
    }

    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether `value` is an acceptable input before coercion.
    pub fn accepts_input(&self, value: &Value, strict: bool) -> bool {
        match value {
            Value::Integer(_) | Value::Float(_) | Value::Decimal(_) => true,
            Value::String(_) => !(self.strict || strict) || self.backing == DecimalBacking::Decimal,
            _ => false,
        }
    }

    /// Convert an accepted input to the backing representation.
    pub fn coerce(&self, value: &Value) -> Result<Value, CheckError> {
        match self.backing {
            DecimalBacking::Float => {
                let x = match value {
                    Value::Integer(i) => *i as f64,
                    Value::Float(x) => *x,
                    Value::Decimal(d) => d
                        .to_f64()
                        .ok_or_else(|| CheckError::invalid(format!("{d} is out of range")))?,
                    Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                        CheckError::invalid(format!("invalid literal for Decimal: {s:?}"))
                    })?,
                    other => return Err(mismatch("Decimal", other)),
                };
                Ok(Value::Float(x))
            }
            DecimalBacking::Decimal => {
                let d = match value {
                    Value::Integer(i) => Decimal::from(*i),
                    Value::Float(x) => Decimal::from_f64(*x).ok_or_else(|| {
                        CheckError::invalid(format!("{x} cannot be represented as Decimal"))
                    })?,
                    Value::Decimal(d) => *d,
                    Value::String(s) => Decimal::from_str(s.trim()).map_err(|_| {
                        CheckError::invalid(format!("invalid literal for Decimal: {s:?}"))
                    })?,
                    other => return Err(mismatch("Decimal", other)),
                };
                Ok(Value::Decimal(self.scale.map_or(d, |scale| d.round_dp(scale))))
            }
        }
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        if !self.accepts_input(&value, strict) {
            return Err(mismatch("Decimal", &value));
        }
        if coerce { self.coerce(&value) } else { Ok(value) }
    }
}

/// String values restricted to a fixed set of members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    members: Vec<String>,
}

impl EnumType {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }

    /// Message for a string that is not a member.
    pub fn not_a_member(&self, member: &str) -> String {
        format!("{member:?} is not a valid enumeration value for {}", self.name)
    }

    pub(crate) fn check(&self, value: Value) -> Result<Value, CheckError> {
        let member = match &value {
            Value::String(s) => s,
            _ => return Err(mismatch(&self.name, &value)),
        };
        if !self.contains(member) {
            return Err(CheckError::invalid(self.not_a_member(member)));
        }
        Ok(value)
    }
}
