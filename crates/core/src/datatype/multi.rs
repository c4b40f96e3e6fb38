use std::fmt::{self, Display, Formatter};

use crate::datatype::Datatype;
use crate::error::CheckError;
use crate::value::Value;

/// A value of any of the member types. Members are tried in declaration
/// order and the first that accepts the value wins.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiType {
    types: Vec<Datatype>,
}

impl MultiType {
    pub fn new<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Datatype>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn types(&self) -> &[Datatype] {
        &self.types
    }

    pub(crate) fn check(
        &self,
        value: Value,
        strict: bool,
        coerce: bool,
    ) -> Result<Value, CheckError> {
        let mut errors = Vec::with_capacity(self.types.len());
        for datatype in &self.types {
            match datatype.check_value(value.clone(), strict, coerce) {
                Ok(checked) => return Ok(checked),
                Err(err) => errors.push(err),
            }
        }
        Err(CheckError::NoMatch {
            expected: self.to_string(),
            actual: value.type_name().into_owned(),
            errors,
        })
    }
}

impl Display for MultiType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Multi<")?;
        for (i, datatype) in self.types.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{datatype}")?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{IntegerType, ObjectType, StringType};

    fn int_str_object() -> MultiType {
        MultiType::new([
            Datatype::from(IntegerType::default()),
            Datatype::from(StringType::default()),
            Datatype::from(ObjectType::any()),
        ])
    }

    #[test]
    fn first_member_wins() {
        let t = int_str_object();
        assert_eq!(t.check(Value::from(42), false, true).unwrap(), Value::from(42));
        assert_eq!(t.check(Value::from("42"), false, true).unwrap(), Value::from("42"));
    }

    #[test]
    fn all_failures_are_collected() {
        let err = int_str_object()
            .check(Value::array(["foo"]), false, true)
            .unwrap_err();
        match err {
            CheckError::NoMatch { errors, actual, .. } => {
                assert_eq!(errors.len(), 3);
                assert_eq!(actual, "array");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
