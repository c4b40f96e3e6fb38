//! Converter lookup table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::datatype::DatatypeKind;
use crate::mapper::{Deserializer, Direction, Serializer};

/// Converters keyed by datatype kind, one table per direction.
///
/// Registering a converter for a kind that already has one replaces it.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    deserializers: HashMap<DatatypeKind, Arc<dyn Deserializer>>,
    serializers: HashMap<DatatypeKind, Arc<dyn Serializer>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_deserializer(
        &mut self,
        kind: DatatypeKind,
        deserializer: impl Deserializer + 'static,
    ) -> &mut Self {
        debug!(%kind, "registered deserializer");
        self.deserializers.insert(kind, Arc::new(deserializer));
        self
    }

    pub fn register_serializer(
        &mut self,
        kind: DatatypeKind,
        serializer: impl Serializer + 'static,
    ) -> &mut Self {
        debug!(%kind, "registered serializer");
        self.serializers.insert(kind, Arc::new(serializer));
        self
    }

    /// Register one converter for both directions.
    pub fn register_duplex<C>(&mut self, kind: DatatypeKind, converter: C) -> &mut Self
    where
        C: Deserializer + Serializer + 'static,
    {
        debug!(%kind, "registered duplex converter");
        let converter = Arc::new(converter);
        self.deserializers.insert(kind, converter.clone());
        self.serializers.insert(kind, converter);
        self
    }

    pub fn deserializer(&self, kind: DatatypeKind) -> Option<&dyn Deserializer> {
        self.deserializers.get(&kind).map(AsRef::as_ref)
    }

    pub fn serializer(&self, kind: DatatypeKind) -> Option<&dyn Serializer> {
        self.serializers.get(&kind).map(AsRef::as_ref)
    }

    /// Whether a converter is registered for `kind` in `direction`.
    pub fn contains(&self, kind: DatatypeKind, direction: Direction) -> bool {
        match direction {
            Direction::Deserialize => self.deserializers.contains_key(&kind),
            Direction::Serialize => self.serializers.contains_key(&kind),
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut deserializers: Vec<_> = self.deserializers.keys().map(|k| k.name()).collect();
        let mut serializers: Vec<_> = self.serializers.keys().map(|k| k.name()).collect();
        deserializers.sort_unstable();
        serializers.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("deserializers", &deserializers)
            .field("serializers", &serializers)
            .finish()
    }
}
