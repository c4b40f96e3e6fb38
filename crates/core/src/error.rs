//! Error types.
//!
//! Errors are split by the phase that produces them:
//!
//! - [`TypeDefError`]: a native type expression could not be translated.
//! - [`CheckError`]: a value failed a datatype's own check.
//! - [`FieldError`]: a field or field spec was declared inconsistently.
//! - [`StructError`]: struct construction failed.
//! - [`MapperError`]: a conversion failed at a location.
//!
//! [`Error`] wraps all of them for APIs that span phases.

use std::fmt;

use thiserror::Error;

use crate::datatype::DatatypeKind;
use crate::location::Path;
use crate::mapper::Direction;

/// A type expression no adapter accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TypeDefError {
    #[error("invalid type definition: {def}")]
    Invalid { def: String },

    #[error("invalid type parameters for {datatype}: {message}")]
    InvalidParameter {
        datatype: &'static str,
        message: String,
    },

    #[error("forward declaration {name} is already closed")]
    ProxyAlreadyClosed { name: String },
}

impl TypeDefError {
    pub fn invalid(def: impl fmt::Display) -> Self {
        Self::Invalid {
            def: def.to_string(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "invalid_type_def",
            Self::InvalidParameter { .. } => "invalid_type_parameter",
            Self::ProxyAlreadyClosed { .. } => "proxy_already_closed",
        }
    }
}

/// A value a datatype does not accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CheckError {
    #[error("expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    /// Right kind of value, unusable content (e.g. a malformed number).
    #[error("{message}")]
    Invalid { message: String },

    #[error("{actual} is not accepted by any of {expected}")]
    NoMatch {
        expected: String,
        actual: String,
        errors: Vec<CheckError>,
    },

    #[error("forward declaration {name} is not closed")]
    UnresolvedProxy { name: String },
}

impl CheckError {
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Whether the value had the wrong shape, as opposed to bad content.
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. } | Self::NoMatch { .. })
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Mismatch { .. } | Self::NoMatch { .. } => "type_mismatch",
            Self::Invalid { .. } => "value_mismatch",
            Self::UnresolvedProxy { .. } => "unresolved_proxy",
        }
    }
}

/// Inconsistent field declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FieldError {
    #[error("field name is already set to {current:?}, cannot rename to {requested:?}")]
    NameAlreadySet { current: String, requested: String },

    #[error("field has no name")]
    Unnamed,

    #[error("field {name:?} is registered under the mismatching key {key:?}")]
    NameMismatch { key: String, name: String },

    #[error("field {name:?}: nullable cannot be set explicitly for an Optional type")]
    NullableWithOptional { name: String },

    #[error("field {name:?}: default is null but the field is declared non-nullable")]
    NullDefaultNotNullable { name: String },

    #[error("invalid type for field {}: {source}", .name.as_deref().unwrap_or("<unnamed>"))]
    TypeDef {
        name: Option<String>,
        #[source]
        source: TypeDefError,
    },
}

impl FieldError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TypeDef { .. } => "invalid_type_def",
            _ => "invalid_field",
        }
    }
}

/// Struct construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StructError {
    #[error("{name} expected at most {expected} arguments, got {got}")]
    TooManyArguments {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("duplicate arguments for {name}: {field:?}")]
    DuplicateArgument { name: String, field: String },

    #[error("missing required argument {field:?} for {name}")]
    MissingArgument { name: String, field: String },

    #[error("unexpected keyword arguments for {name}: {}", .keywords.join(", "))]
    UnexpectedKeywords { name: String, keywords: Vec<String> },

    #[error("invalid value for {name}.{field}: {source}")]
    InvalidArgument {
        name: String,
        field: String,
        #[source]
        source: CheckError,
    },

    #[error("{name} has no field {field:?}")]
    UnknownField { name: String, field: String },
}

impl StructError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TooManyArguments { .. } => "too_many_arguments",
            Self::DuplicateArgument { .. } => "duplicate_argument",
            Self::MissingArgument { .. } => "missing_argument",
            Self::UnexpectedKeywords { .. } => "unexpected_keywords",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::UnknownField { .. } => "unknown_field",
        }
    }
}

/// A conversion failure at a location.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MapperError {
    /// The value does not have the shape the datatype expects.
    TypeMismatch {
        path: Path,
        expected: String,
        actual: String,
        /// Replaces the default "expected X, got Y" text when set.
        message: Option<String>,
    },

    /// The value has the right shape but is not acceptable.
    ValueMismatch { path: Path, message: String },

    /// No member of a multi type accepted the value.
    MultiFailed {
        path: Path,
        direction: Direction,
        datatype: String,
        actual: String,
        errors: Vec<MapperError>,
    },

    /// The mapper has no converter for the datatype in this direction.
    NoConverter {
        path: Path,
        kind: DatatypeKind,
        direction: Direction,
    },

    /// A native class has no codec for this direction.
    NoClassCodec {
        path: Path,
        class: String,
        direction: Direction,
    },

    /// A forward declaration was used before being closed.
    UnresolvedProxy { path: Path, name: String },
}

impl MapperError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ValueMismatch { .. } => "value_mismatch",
            Self::MultiFailed { .. } => "multi_failed",
            Self::NoConverter { .. } => "no_converter",
            Self::NoClassCodec { .. } => "no_class_codec",
            Self::UnresolvedProxy { .. } => "unresolved_proxy",
        }
    }

    pub const fn path(&self) -> &Path {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::ValueMismatch { path, .. }
            | Self::MultiFailed { path, .. }
            | Self::NoConverter { path, .. }
            | Self::NoClassCodec { path, .. }
            | Self::UnresolvedProxy { path, .. } => path,
        }
    }

    /// Type mismatches, including multi types where every member mismatched.
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. } | Self::MultiFailed { .. })
    }

    pub const fn is_value_mismatch(&self) -> bool {
        matches!(self, Self::ValueMismatch { .. })
    }

    /// Whether the mapper itself is misconfigured for this datatype.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoConverter { .. } | Self::NoClassCodec { .. } | Self::UnresolvedProxy { .. }
        )
    }

    /// The error text without the location prefix.
    pub fn message(&self) -> String {
        match self {
            Self::TypeMismatch {
                message: Some(message),
                ..
            } => message.clone(),
            Self::TypeMismatch {
                expected, actual, ..
            } => format!("expected {expected:?}, got {actual:?}"),
            Self::ValueMismatch { message, .. } => message.clone(),
            Self::MultiFailed {
                direction,
                datatype,
                actual,
                errors,
                ..
            } => {
                let mut out = format!("unable to {direction} {datatype} for value {actual:?}");
                for error in errors {
                    out.push_str(&format!("\n  * {}", error.message()));
                }
                out
            }
            Self::NoConverter {
                kind, direction, ..
            } => format!("no {direction}r registered for datatype {kind}"),
            Self::NoClassCodec {
                class, direction, ..
            } => format!("class {class} has no {direction}r"),
            Self::UnresolvedProxy { name, .. } => {
                format!("forward declaration {name} is not closed")
            }
        }
    }
}

impl fmt::Display for MapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.path(), self.message())
    }
}

impl std::error::Error for MapperError {}

/// Any databind error.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    TypeDef(#[from] TypeDefError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Struct(#[from] StructError),

    #[error(transparent)]
    Mapper(#[from] MapperError),
}

impl Error {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TypeDef(err) => err.code(),
            Self::Check(err) => err.code(),
            Self::Field(err) => err.code(),
            Self::Struct(err) => err.code(),
            Self::Mapper(err) => err.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::PathSegment;
    use pretty_assertions::assert_eq;

    fn path(segments: &[PathSegment]) -> Path {
        segments.iter().cloned().collect()
    }

    #[test]
    fn type_mismatch_message() {
        let err = MapperError::TypeMismatch {
            path: path(&[PathSegment::Index(1)]),
            expected: "String".into(),
            actual: "array".into(),
            message: None,
        };
        assert_eq!(err.to_string(), r#"at $[1]: expected "String", got "array""#);
        assert_eq!(err.code(), "type_mismatch");
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn custom_message_replaces_default() {
        let err = MapperError::TypeMismatch {
            path: Path::root(),
            expected: "Integer".into(),
            actual: "string".into(),
            message: Some("not a number".into()),
        };
        assert_eq!(err.to_string(), "at $: not a number");
    }

    #[test]
    fn multi_failure_lists_members() {
        let err = MapperError::MultiFailed {
            path: Path::root(),
            direction: Direction::Deserialize,
            datatype: "Multi<Integer | String>".into(),
            actual: "array".into(),
            errors: vec![MapperError::TypeMismatch {
                path: Path::root(),
                expected: "Integer".into(),
                actual: "array".into(),
                message: None,
            }],
        };
        assert_eq!(
            err.to_string(),
            "at $: unable to deserialize Multi<Integer | String> for value \"array\"\n  \
             * expected \"Integer\", got \"array\""
        );
        assert!(err.is_type_mismatch());
        assert!(!err.is_value_mismatch());
    }

    #[test]
    fn struct_errors_render() {
        let err = StructError::UnexpectedKeywords {
            name: "Point".into(),
            keywords: vec!["w".into(), "z".into()],
        };
        assert_eq!(err.to_string(), "unexpected keyword arguments for Point: w, z");
        assert_eq!(err.code(), "unexpected_keywords");
        assert_eq!(Error::from(err).code(), "unexpected_keywords");
    }
}
