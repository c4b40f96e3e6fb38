//! One converter per datatype kind.
//!
//! Every converter implements both directions. Deserialization reads
//! JSON-shaped values; serialization produces them.

mod class;
mod container;
mod multi;
mod scalar;
mod structure;
mod temporal;
mod union;

use databind_core::{CheckError, Location, MapperError};

pub(crate) use class::ClassConverter;
pub(crate) use container::{CollectionConverter, ObjectConverter};
pub(crate) use multi::MultiConverter;
pub(crate) use scalar::{AnyConverter, DecimalConverter, EnumConverter, ScalarConverter};
pub(crate) use structure::StructConverter;
pub(crate) use temporal::{DateConverter, DatetimeConverter};
pub(crate) use union::UnionConverter;

/// The datatype variant a converter was registered for. Anything else is a
/// type mismatch at the location.
macro_rules! expect_datatype {
    ($location:expr, $variant:ident) => {
        match $location.datatype() {
            databind_core::Datatype::$variant(datatype) => datatype,
            _ => return Err($location.type_mismatch()),
        }
    };
}
pub(crate) use expect_datatype;

/// Map a failed in-process check to a mapper error at `location`.
pub(crate) fn check_failed(location: &Location<'_>, err: &CheckError) -> MapperError {
    if err.is_mismatch() {
        location.type_mismatch()
    } else {
        location.value_mismatch(err.to_string())
    }
}
