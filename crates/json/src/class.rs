//! JSON codecs for native classes.

use databind_core::{ClassType, NativeObject, Value};

use crate::decoration::{JsonDeserializer, JsonSerializer};

/// A native type with a JSON representation.
///
/// ```rust
/// use databind_core::{ObjectMapper, Value};
/// use databind_json::{JsonClass, JsonModule, json_class};
///
/// #[derive(Debug, PartialEq)]
/// struct Rgb(u8, u8, u8);
///
/// impl JsonClass for Rgb {
///     fn to_json(&self) -> Value {
///         Value::from(format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2))
///     }
///
///     fn from_json(value: &Value) -> Option<Self> {
///         let hex = value.as_str()?.strip_prefix('#')?;
///         let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
///         Some(Self(channel(0)?, channel(2)?, channel(4)?))
///     }
/// }
///
/// let mapper = ObjectMapper::new(JsonModule::default());
/// let datatype = json_class::<Rgb>().into();
/// let red = mapper.deserialize(&Value::from("#ff0000"), &datatype).unwrap();
/// assert_eq!(red, Value::native(Rgb(255, 0, 0)));
/// assert_eq!(mapper.serialize(&red, &datatype).unwrap(), Value::from("#ff0000"));
/// ```
pub trait JsonClass: NativeObject + PartialEq + Sized {
    fn to_json(&self) -> Value;

    /// `None` when the payload does not describe an instance.
    fn from_json(value: &Value) -> Option<Self>;
}

/// Class datatype for `T` with its [`JsonClass`] codec attached.
pub fn json_class<T: JsonClass>() -> ClassType {
    ClassType::of::<T>()
        .decorate(JsonSerializer::new(|_, location| {
            Ok(location
                .value()
                .as_native()
                .and_then(|native| native.downcast_ref::<T>())
                .map(T::to_json))
        }))
        .decorate(JsonDeserializer::new(|_, location| {
            Ok(T::from_json(location.value()).map(Value::native))
        }))
}
