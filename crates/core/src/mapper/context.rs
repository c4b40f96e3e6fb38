use tracing::trace;

use crate::datatype::Datatype;
use crate::decoration::{Decoration, Decorations};
use crate::error::MapperError;
use crate::location::{Location, PathSegment};
use crate::mapper::{Direction, ObjectMapper};
use crate::value::Value;

/// State shared by every converter of one mapper call.
#[derive(Debug, Clone, Copy)]
pub struct Context<'m> {
    mapper: &'m ObjectMapper,
    direction: Direction,
    decorations: &'m Decorations,
}

impl<'m> Context<'m> {
    pub const fn new(
        mapper: &'m ObjectMapper,
        direction: Direction,
        decorations: &'m Decorations,
    ) -> Self {
        Self {
            mapper,
            direction,
            decorations,
        }
    }

    pub const fn mapper(&self) -> &'m ObjectMapper {
        self.mapper
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Decorations passed to the mapper call.
    pub const fn decorations(&self) -> &'m Decorations {
        self.decorations
    }

    /// First decoration of type `T`, looking at the field holding the
    /// location before the call-level decorations.
    pub fn decoration<'s, T: Decoration>(&'s self, location: &Location<'s>) -> Option<&'s T> {
        location.decoration::<T>().or_else(|| self.decorations.first::<T>())
    }

    /// Convert the value at `location` with the converter registered for its
    /// datatype.
    pub fn convert(&self, location: &Location<'_>) -> Result<Value, MapperError> {
        let Some(datatype) = location.datatype().resolved() else {
            return Err(MapperError::UnresolvedProxy {
                path: location.path().clone(),
                name: location.datatype().to_string(),
            });
        };
        let location = location.relocate(location.value(), datatype);
        let kind = datatype.kind();
        trace!(
            path = %location.path(),
            %datatype,
            direction = %self.direction,
            "dispatching conversion"
        );

        let converters = self.mapper.converters();
        let no_converter = || MapperError::NoConverter {
            path: location.path().clone(),
            kind,
            direction: self.direction,
        };
        match self.direction {
            Direction::Deserialize => converters
                .deserializer(kind)
                .ok_or_else(no_converter)?
                .deserialize(self, &location),
            Direction::Serialize => converters
                .serializer(kind)
                .ok_or_else(no_converter)?
                .serialize(self, &location),
        }
    }

    /// Convert a child of `parent` reached through `segment`.
    pub fn convert_child(
        &self,
        parent: &Location<'_>,
        segment: impl Into<PathSegment>,
        value: &Value,
        datatype: &Datatype,
        decorations: &Decorations,
    ) -> Result<Value, MapperError> {
        self.convert(&parent.child(segment, value, datatype, decorations))
    }
}
