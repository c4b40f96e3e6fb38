//! Positions inside a value tree.
//!
//! A [`Location`] pairs the value being converted with its datatype, the
//! decorations of the field that holds it and the [`Path`] from the root.
//! Paths render as `$`, `$.key`, `$[1]` or `$."x:y"` for keys that are not
//! plain identifiers.

use std::fmt::{self, Display, Formatter};

use smallvec::SmallVec;

use crate::datatype::Datatype;
use crate::decoration::{Decoration, Decorations};
use crate::error::MapperError;
use crate::value::Value;

/// One step from a parent value to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key access: .key
    Key(String),
    /// Array index access: [index]
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) if is_identifier(key) => write!(f, ".{key}"),
            Self::Key(key) => write!(f, ".{key:?}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Path from the root of a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(SmallVec<[PathSegment; 8]>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path with `segment` appended.
    #[must_use]
    pub fn join(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A value under conversion, with everything a converter needs to know
/// about where it sits.
#[derive(Debug, Clone)]
pub struct Location<'a> {
    value: &'a Value,
    datatype: &'a Datatype,
    decorations: &'a Decorations,
    path: Path,
}

impl<'a> Location<'a> {
    /// Root location of a conversion.
    pub fn root(value: &'a Value, datatype: &'a Datatype, decorations: &'a Decorations) -> Self {
        Self {
            value,
            datatype,
            decorations,
            path: Path::root(),
        }
    }

    /// Location of a child value reached through `segment`.
    pub fn child<'b>(
        &self,
        segment: impl Into<PathSegment>,
        value: &'b Value,
        datatype: &'b Datatype,
        decorations: &'b Decorations,
    ) -> Location<'b> {
        Location {
            value,
            datatype,
            decorations,
            path: self.path.join(segment),
        }
    }

    /// Same path and decorations, different value and datatype. Used when a
    /// converter delegates the whole value to another datatype.
    pub fn relocate<'b>(&self, value: &'b Value, datatype: &'b Datatype) -> Location<'b>
    where
        'a: 'b,
    {
        Location {
            value,
            datatype,
            decorations: self.decorations,
            path: self.path.clone(),
        }
    }

    /// Same path, everything else replaced. Used for values that are
    /// flattened into their parent, like remainder fields.
    pub fn alongside<'b>(
        &self,
        value: &'b Value,
        datatype: &'b Datatype,
        decorations: &'b Decorations,
    ) -> Location<'b> {
        Location {
            value,
            datatype,
            decorations,
            path: self.path.clone(),
        }
    }

    pub const fn value(&self) -> &'a Value {
        self.value
    }

    pub const fn datatype(&self) -> &'a Datatype {
        self.datatype
    }

    pub const fn decorations(&self) -> &'a Decorations {
        self.decorations
    }

    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// The object key this location was reached through, if any.
    pub fn key(&self) -> Option<&str> {
        match self.path.last() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// First decoration of type `T` on the field holding this value.
    pub fn decoration<T: Decoration>(&self) -> Option<&'a T> {
        self.decorations.first::<T>()
    }

    // ==================== Error helpers ====================

    /// The value does not have the shape the datatype expects.
    pub fn type_mismatch(&self) -> MapperError {
        MapperError::TypeMismatch {
            path: self.path.clone(),
            expected: self.datatype.to_string(),
            actual: self.value.type_name().into_owned(),
            message: None,
        }
    }

    /// Type mismatch with a custom message replacing the default one.
    pub fn type_mismatch_with(&self, message: impl Into<String>) -> MapperError {
        MapperError::TypeMismatch {
            path: self.path.clone(),
            expected: self.datatype.to_string(),
            actual: self.value.type_name().into_owned(),
            message: Some(message.into()),
        }
    }

    /// The value has the right shape but is not acceptable.
    pub fn value_mismatch(&self, message: impl Into<String>) -> MapperError {
        MapperError::ValueMismatch {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "$")]
    #[case(&[PathSegment::Key("a".into())], "$.a")]
    #[case(&[PathSegment::Index(1)], "$[1]")]
    #[case(&[PathSegment::Key("x:y".into())], r#"$."x:y""#)]
    #[case(
        &[PathSegment::Key("items".into()), PathSegment::Index(0), PathSegment::Key("id".into())],
        "$.items[0].id"
    )]
    fn path_display(#[case] segments: &[PathSegment], #[case] expected: &str) {
        let path: Path = segments.iter().cloned().collect::<Path>();
        assert_eq!(path.to_string(), expected);
    }

    #[test]
    fn child_locations_extend_the_path() {
        let value = Value::from(1);
        let datatype = Datatype::Any;
        let decorations = Decorations::new();
        let root = Location::root(&value, &datatype, &decorations);
        let child = root.child("a", &value, &datatype, &decorations);
        let grandchild = child.child(3_usize, &value, &datatype, &decorations);
        assert_eq!(grandchild.path().to_string(), "$.a[3]");
        assert_eq!(child.key(), Some("a"));
        assert_eq!(grandchild.key(), None);
        assert!(root.path().is_root());
    }
}
