use databind_core::{IntoJsonError, MapperError, TypeDefError};
use thiserror::Error;

/// Errors of the JSON entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonError {
    #[error(transparent)]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    TypeDef(#[from] TypeDefError),

    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The converted value has no JSON representation.
    #[error(transparent)]
    NotJson(#[from] IntoJsonError),
}

impl JsonError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Mapper(err) => err.code(),
            Self::TypeDef(err) => err.code(),
            Self::Syntax(_) => "syntax",
            Self::NotJson(_) => "not_json",
        }
    }
}
