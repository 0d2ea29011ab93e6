use crate::data::JsonObject;
use crate::error::{InvalidDataError, InvalidDataKind, Result};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

/// A model record with a fixed set of declared fields.
///
/// Implementations are generated by `define_record!` and `define_union!`.
pub trait Record {
    /// Wire names of every declared field, excluding `extra`.
    const FIELDS: &'static [&'static str];
}

/// Fields of a record `R` that this version of the client doesn't know about.
///
/// Never holds a key that `R` declares itself, so encoding a record can't write a field twice,
/// and a payload's discriminator can't be overridden from here.
///
/// # Example
///
/// ```
/// use billing_models::data::{PercentageDiscount, Record};
/// use billing_models::InvalidDataKind;
/// use serde_json::json;
///
/// let mut discount = PercentageDiscount::default();
/// assert!(discount.extra.insert("expires_at", json!("2030-01-01")).is_ok());
///
/// let err = discount.extra.insert("discount_type", json!("amount")).unwrap_err();
/// assert_eq!(err.kind(), InvalidDataKind::DeclaredField);
/// assert!(PercentageDiscount::FIELDS.contains(&"discount_type"));
/// ```
pub struct Extra<R> {
    object: JsonObject,
    record: PhantomData<fn() -> R>,
}

impl<R> Extra<R> {
    pub fn new() -> Self {
        Self {
            object: JsonObject::new(),
            record: PhantomData,
        }
    }

    pub fn as_object(&self) -> &JsonObject {
        &self.object
    }

    pub fn into_object(self) -> JsonObject {
        self.object
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.object.remove(field)
    }
}

impl<R: Record> Extra<R> {
    /// Wraps a raw object, failing with [`InvalidDataKind::DeclaredField`] if any of its keys is
    /// declared by `R`.
    pub fn from_object(object: JsonObject) -> Result<Self> {
        if let Some((field, _)) = object.iter().find(|(field, _)| R::FIELDS.contains(&field.as_str()))
        {
            return Err(declared_field(field));
        }

        Ok(Self {
            object,
            record: PhantomData,
        })
    }

    /// Inserts a raw value. Declared fields are rejected; set them on the record instead.
    pub fn insert<K: Into<String>>(&mut self, field: K, value: Value) -> Result<Option<Value>> {
        let field = field.into();
        if R::FIELDS.contains(&field.as_str()) {
            return Err(declared_field(&field));
        }
        Ok(self.object.insert(field, value))
    }

    /// Serializes `value` into `field`. Declared fields are rejected as in [`Extra::insert`].
    pub fn set<T: Serialize + ?Sized>(&mut self, field: &str, value: &T) -> Result<()> {
        self.insert(field, serde_json::to_value(value)?).map(|_| ())
    }
}

fn declared_field(field: &str) -> InvalidDataError {
    tracing::debug!(field, "rejected declared field in unknown fields");
    InvalidDataError::new(
        InvalidDataKind::DeclaredField,
        format!("`{}` is a declared field of this record", field),
    )
}

impl<R> Deref for Extra<R> {
    type Target = JsonObject;

    fn deref(&self) -> &JsonObject {
        &self.object
    }
}

impl<R> Default for Extra<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Extra<R> {
    fn clone(&self) -> Self {
        Self {
            object: self.object.clone(),
            record: PhantomData,
        }
    }
}

impl<R> PartialEq for Extra<R> {
    fn eq(&self, rhs: &Self) -> bool {
        self.object == rhs.object
    }
}

impl<R> fmt::Debug for Extra<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.object, f)
    }
}

impl<R> Serialize for Extra<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.object.serialize(serializer)
    }
}

impl<'de, R: Record> Deserialize<'de> for Extra<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let object = JsonObject::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

// Defines a model record: the declared fields, a flattened `extra` holding everything else, and
// the `Record` impl listing the declared field names. Field names are the wire names.
macro_rules! define_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Default, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
            /// Fields not known to this version of the client.
            #[serde(flatten)]
            pub extra: $crate::data::Extra<$name>,
        }

        impl $crate::data::Record for $name {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
        }
    };
}

pub(crate) use define_record;
