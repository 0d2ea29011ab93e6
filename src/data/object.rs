use crate::error::{InvalidDataError, InvalidDataKind, Result};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::iter::FromIterator;

/// An untyped JSON object with insertion-ordered keys.
///
/// Every model keeps one of these inside its flattened [`Extra`](crate::data::Extra) field, so that
/// fields added by the server after this client was built are kept, and written back out unchanged.
///
/// # Example
///
/// ```
/// use billing_models::data::JsonObject;
/// use serde_json::json;
///
/// let object = JsonObject::from_value(json!({ "id": "price_1", "quantity": 3 })).unwrap();
///
/// assert_eq!(object.get_str("id"), Some("price_1"));
/// assert_eq!(object.get::<u32>("quantity").unwrap(), Some(3));
/// assert_eq!(object.get::<u32>("missing").unwrap(), None);
/// ```
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonObject(Map<String, Value>);

impl JsonObject {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON value, failing if it isn't an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(InvalidDataError::new(
                InvalidDataKind::NotAnObject,
                format!("expected a JSON object, found {}", type_name(&other)),
            )),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Serializes a model into a raw object.
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(model)?)
    }

    /// Deserializes a model from a copy of this object.
    pub fn to_model<T: DeserializeOwned>(&self) -> Result<T> {
        self.clone().into_model()
    }

    /// Deserializes a model, consuming this object.
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.into_value())?)
    }

    /// Returns the field as a string slice, or `None` if it is absent or not a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn get_element(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Deserializes a field. Absent and `null` fields are both `None`.
    pub fn get<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value).map(Some).map_err(|e| {
                InvalidDataError::new(
                    InvalidDataKind::InvalidField,
                    format!("field `{}` has an unexpected type", field),
                )
                .with_source(e)
            }),
        }
    }

    /// Deserializes a field that must be present and non-null.
    pub fn required<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        self.get(field)?.ok_or_else(|| {
            InvalidDataError::new(
                InvalidDataKind::MissingField,
                format!("missing required field `{}`", field),
            )
        })
    }

    /// Serializes `value` into `field`, replacing any previous value.
    pub fn set<T: Serialize + ?Sized>(&mut self, field: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.0.insert(field.to_owned(), value);
        Ok(())
    }

    pub fn insert<K: Into<String>>(&mut self, field: K, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for JsonObject {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<JsonObject> for Value {
    fn from(object: JsonObject) -> Self {
        object.into_value()
    }
}

impl FromIterator<(String, Value)> for JsonObject {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(Map::from_iter(iter))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
