use databind_core::{Datatype, ObjectMapper, TypeDef, Value};

use crate::error::JsonError;

/// `serde_json` entry points on an [`ObjectMapper`].
pub trait JsonMapperExt {
    /// Deserialize a parsed JSON document.
    fn from_json_value(
        &self,
        json: serde_json::Value,
        datatype: &Datatype,
    ) -> Result<Value, JsonError>;

    /// Serialize into a JSON document.
    fn to_json_value(
        &self,
        value: &Value,
        datatype: &Datatype,
    ) -> Result<serde_json::Value, JsonError>;

    /// Parse and deserialize JSON text.
    fn from_json_str(&self, text: &str, datatype: &Datatype) -> Result<Value, JsonError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        self.from_json_value(json, datatype)
    }

    /// Serialize to compact JSON text.
    fn to_json_string(&self, value: &Value, datatype: &Datatype) -> Result<String, JsonError> {
        Ok(serde_json::to_string(&self.to_json_value(value, datatype)?)?)
    }

    /// Parse and deserialize JSON text against a native type expression.
    fn from_json_str_as(&self, text: &str, def: impl Into<TypeDef>) -> Result<Value, JsonError>;
}

impl JsonMapperExt for ObjectMapper {
    fn from_json_value(
        &self,
        json: serde_json::Value,
        datatype: &Datatype,
    ) -> Result<Value, JsonError> {
        Ok(self.deserialize(&Value::from(json), datatype)?)
    }

    fn to_json_value(
        &self,
        value: &Value,
        datatype: &Datatype,
    ) -> Result<serde_json::Value, JsonError> {
        let serialized = self.serialize(value, datatype)?;
        Ok(serde_json::Value::try_from(serialized)?)
    }

    fn from_json_str_as(&self, text: &str, def: impl Into<TypeDef>) -> Result<Value, JsonError> {
        let datatype = self.types().translate(&def.into())?;
        self.from_json_str(text, &datatype)
    }
}
