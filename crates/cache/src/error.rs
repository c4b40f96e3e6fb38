use databind_json::JsonError;
use thiserror::Error;

/// Failures of a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    #[error("store backend failed: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub const fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}

/// Failures of a [`MappedStore`](crate::MappedStore).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The value could not be mapped to or from its stored form.
    #[error("cannot map value for key {key:?}: {source}")]
    Mapping {
        key: String,
        #[source]
        source: JsonError,
    },
}

impl CacheError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Store(StoreError::KeyNotFound { .. }) => "key_not_found",
            Self::Store(_) => "store",
            Self::Mapping { source, .. } => source.code(),
        }
    }
}
