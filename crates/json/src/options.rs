//! Module configuration.

use databind_core::CollectionKind;
use serde::{Deserialize, Serialize};

/// Options of a [`JsonModule`](crate::JsonModule).
///
/// Loadable from any serde format; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Serialize every decimal datatype as a string, float-backed ones
    /// included.
    pub decimal_as_string: bool,

    /// Emit arbitrary precision decimals as decimal values. Otherwise they
    /// are written as strings so no digits are lost. Ignored when
    /// `decimal_as_string` is set.
    pub supports_decimal: bool,

    /// JSON-side container for serialized collections.
    pub collection_as: CollectionKind,

    /// Reject unknown keys for every struct, not only for structs decorated
    /// as strict.
    pub strict_structs: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            decimal_as_string: false,
            supports_decimal: false,
            collection_as: CollectionKind::List,
            strict_structs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_configs_fill_defaults() {
        let options: JsonOptions =
            serde_json::from_str(r#"{"decimal_as_string": true, "collection_as": "set"}"#).unwrap();
        assert_eq!(
            options,
            JsonOptions {
                decimal_as_string: true,
                collection_as: CollectionKind::Set,
                ..JsonOptions::default()
            }
        );
    }
}
