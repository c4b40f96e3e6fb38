use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::datatype::mismatch;
use crate::error::CheckError;
use crate::structs::StructDef;
use crate::value::Value;

/// Default discriminator key of a [`UnionType`].
pub const DEFAULT_TYPE_KEY: &str = "type";

/// Maps union discriminators to member structs and back.
pub trait UnionResolver: fmt::Debug + Send + Sync {
    /// Member struct for a discriminator.
    fn resolve(&self, name: &str) -> Option<Arc<StructDef>>;

    /// Discriminator for a value, if its type is a member.
    fn reverse(&self, value: &Value) -> Option<String>;

    /// All discriminators, when the resolver can enumerate them.
    fn members(&self) -> Option<Vec<String>> {
        None
    }
}

/// Resolver over a fixed, ordered member table.
#[derive(Debug, Clone, Default)]
pub struct StaticUnionResolver {
    members: IndexMap<String, Arc<StructDef>>,
}

impl StaticUnionResolver {
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, Arc<StructDef>)>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, def: Arc<StructDef>) {
        self.members.insert(name.into(), def);
    }
}

impl UnionResolver for StaticUnionResolver {
    fn resolve(&self, name: &str) -> Option<Arc<StructDef>> {
        self.members.get(name).cloned()
    }

    fn reverse(&self, value: &Value) -> Option<String> {
        let instance = value.as_struct()?;
        self.members
            .iter()
            .find(|(_, def)| Arc::ptr_eq(instance.def(), def))
            .map(|(name, _)| name.clone())
    }

    fn members(&self) -> Option<Vec<String>> {
        Some(self.members.keys().cloned().collect())
    }
}

/// A struct selected among named members by a discriminator key.
///
/// In flat mode the discriminator sits beside the member's fields:
/// `{"type": "a", "value": 1}`. In nested mode the member's fields live
/// under a key named after the discriminator:
/// `{"type": "a", "a": {"value": 1}}`.
#[derive(Debug, Clone)]
pub struct UnionType {
    resolver: Arc<dyn UnionResolver>,
    type_key: String,
    nested: bool,
}

impl UnionType {
    pub fn new(resolver: impl UnionResolver + 'static) -> Self {
        Self::with_resolver(Arc::new(resolver))
    }

    pub fn with_resolver(resolver: Arc<dyn UnionResolver>) -> Self {
        Self {
            resolver,
            type_key: DEFAULT_TYPE_KEY.to_owned(),
            nested: false,
        }
    }

    /// Union over a fixed member table.
    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = (S, Arc<StructDef>)>,
        S: Into<String>,
    {
        Self::new(StaticUnionResolver::new(members))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_type_key(mut self, type_key: impl Into<String>) -> Self {
        self.type_key = type_key.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    pub fn resolver(&self) -> &dyn UnionResolver {
        self.resolver.as_ref()
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    pub const fn is_nested(&self) -> bool {
        self.nested
    }

    pub(crate) fn check(&self, value: Value) -> Result<Value, CheckError> {
        if value.is_struct() && self.resolver.reverse(&value).is_some() {
            Ok(value)
        } else {
            Err(mismatch(self, &value))
        }
    }
}

impl PartialEq for UnionType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.resolver), Arc::as_ptr(&other.resolver))
            && self.type_key == other.type_key
            && self.nested == other.nested
    }
}

impl Display for UnionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.resolver.members() {
            Some(members) => write!(f, "Union<{}>", members.join(" | ")),
            None => f.write_str("Union"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::StringType;
    use crate::structs::Field;

    fn member(name: &str) -> Arc<StructDef> {
        StructDef::builder(name)
            .field("value", Field::new(StringType::default()))
            .build()
            .unwrap()
    }

    #[test]
    fn resolves_both_ways() {
        let (a, b) = (member("A"), member("B"));
        let resolver = StaticUnionResolver::new([("a", Arc::clone(&a)), ("b", Arc::clone(&b))]);
        assert!(resolver.resolve("a").is_some_and(|def| Arc::ptr_eq(&def, &a)));
        assert!(resolver.resolve("c").is_none());
        let instance = Value::Struct(b.from_kwargs([("value", "x")]).unwrap());
        assert_eq!(resolver.reverse(&instance).as_deref(), Some("b"));
        assert_eq!(resolver.reverse(&Value::from("x")), None);
    }

    #[test]
    fn display_lists_members() {
        let union = UnionType::from_members([("a", member("A")), ("b", member("B"))]);
        assert_eq!(union.to_string(), "Union<a | b>");
        assert_eq!(union.type_key(), "type");
        assert!(!union.is_nested());
    }

    #[test]
    fn check_requires_a_registered_member() {
        let a = member("A");
        let union = UnionType::from_members([("a", Arc::clone(&a))]);
        let instance = Value::Struct(a.from_kwargs([("value", "x")]).unwrap());
        assert!(union.check(instance).is_ok());
        let stranger = Value::Struct(member("A").from_kwargs([("value", "x")]).unwrap());
        assert!(union.check(stranger).is_err());
    }
}
