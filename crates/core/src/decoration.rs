//! Decorations: typed metadata attached to fields, structs, classes and
//! mapper calls.
//!
//! A decoration is any `Debug + Send + Sync + 'static` type that opts in by
//! implementing [`Decoration`]. Consumers look decorations up by type:
//!
//! ```rust
//! use databind_core::{Decoration, Decorations, Strict};
//!
//! #[derive(Debug)]
//! struct Alias(&'static str);
//! impl Decoration for Alias {}
//!
//! let decorations = Decorations::new().with(Alias("id")).with(Strict);
//! assert_eq!(decorations.first::<Alias>().map(|a| a.0), Some("id"));
//! assert!(decorations.has::<Strict>());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Upcast helper so `dyn Decoration` can be downcast.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Marker trait for metadata the mapper and its converters understand.
pub trait Decoration: AsAny + fmt::Debug + Send + Sync {}

/// Ordered list of decorations.
#[derive(Clone, Default)]
pub struct Decorations(Vec<Arc<dyn Decoration>>);

impl Decorations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder form of [`push`](Self::push).
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, decoration: impl Decoration) -> Self {
        self.push(decoration);
        self
    }

    pub fn push(&mut self, decoration: impl Decoration) {
        self.0.push(Arc::new(decoration));
    }

    pub fn push_shared(&mut self, decoration: Arc<dyn Decoration>) {
        self.0.push(decoration);
    }

    /// Append all decorations of `other` after the existing ones.
    pub fn extend(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }

    /// The first decoration of type `T`, if any.
    pub fn first<T: Decoration>(&self) -> Option<&T> {
        self.0.iter().find_map(|d| d.as_ref().as_any().downcast_ref::<T>())
    }

    /// All decorations of type `T` in attachment order.
    pub fn all<T: Decoration>(&self) -> impl Iterator<Item = &T> {
        self.0.iter().filter_map(|d| d.as_ref().as_any().downcast_ref::<T>())
    }

    pub fn has<T: Decoration>(&self) -> bool {
        self.first::<T>().is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Decorations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl<D: Decoration> From<D> for Decorations {
    fn from(decoration: D) -> Self {
        Self::new().with(decoration)
    }
}

// ==================== Standard decorations ====================

/// Reject unknown keys when deserializing a struct. Attach to a struct
/// definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strict;

impl Decoration for Strict {}

/// Field decoration: the field collects every key no other field consumed,
/// and its entries are flattened into the parent object on serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remainder;

impl Decoration for Remainder {}

/// Field decoration: the field receives the raw payload of its enclosing
/// struct. The field is derived and never serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Raw;

impl Decoration for Raw {}

/// Field decoration: the field receives the key under which its enclosing
/// struct was found in the parent object. The field is derived and never
/// serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InheritKey;

impl Decoration for InheritKey {}

/// Mapper-call decoration: omit fields whose value equals their default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipDefaults;

impl Decoration for SkipDefaults {}

/// Date and time formats. The first format is used for serialization, all
/// of them are tried in order for deserialization. Formats use chrono's
/// `strftime` syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    formats: Vec<String>,
}

impl Format {
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }
}

impl Decoration for Format {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    impl Decoration for Label {}

    #[test]
    fn lookup_by_type_keeps_attachment_order() {
        let decorations = Decorations::new()
            .with(Label("a"))
            .with(Strict)
            .with(Label("b"));
        assert_eq!(decorations.len(), 3);
        assert_eq!(decorations.first::<Label>(), Some(&Label("a")));
        let labels: Vec<_> = decorations.all::<Label>().map(|l| l.0).collect();
        assert_eq!(labels, ["a", "b"]);
        assert!(!decorations.has::<Raw>());
    }

    #[test]
    fn extend_appends() {
        let mut a = Decorations::from(Strict);
        a.extend(&Decorations::from(Raw));
        assert!(a.has::<Strict>() && a.has::<Raw>());
    }
}
