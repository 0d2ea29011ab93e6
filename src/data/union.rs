//! Runtime support for polymorphic fields.
//!
//! A *tagged* union reads one string field (the discriminator) and decodes the whole object as
//! the payload registered for that value. An *untagged* union has no discriminator and tries its
//! candidates in order. Both are plain Rust enums with one variant per payload, so `match` on
//! them is checked for exhaustiveness by the compiler.

use crate::data::JsonObject;
use crate::error::{AggregateInvalidDataError, InvalidDataError, Result};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// A payload type with a fixed discriminator value.
pub trait Discriminated {
    /// Name of the discriminator field, e.g. `"discount_type"`.
    const FIELD: &'static str;
    /// The value of the discriminator field for this payload, e.g. `"percentage"`.
    const VALUE: &'static str;
}

/// The discriminator field of a payload.
///
/// This always serializes to `V::VALUE`, and only deserializes from that exact string, so the
/// discriminator can't be set to something that disagrees with the payload type.
pub struct Discriminator<V>(PhantomData<fn() -> V>);

impl<V> Discriminator<V> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V: Discriminated> Discriminator<V> {
    pub fn as_str(&self) -> &'static str {
        V::VALUE
    }
}

impl<V> Default for Discriminator<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for Discriminator<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> Copy for Discriminator<V> {}

impl<V> PartialEq for Discriminator<V> {
    fn eq(&self, _rhs: &Self) -> bool {
        true
    }
}

impl<V> Eq for Discriminator<V> {}

impl<V: Discriminated> fmt::Debug for Discriminator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", V::VALUE)
    }
}

impl<V: Discriminated> Serialize for Discriminator<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(V::VALUE)
    }
}

impl<'de, V: Discriminated> Deserialize<'de> for Discriminator<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value == V::VALUE {
            Ok(Self::new())
        } else {
            Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&value),
                &V::VALUE,
            ))
        }
    }
}

/// A payload type that is one of the variants of the union `U`.
pub trait VariantOf<U>: Sized + Into<U> {
    /// Returns the payload if `union` currently holds this variant.
    fn pick(union: &U) -> Option<&Self>;
}

/// One row of a tagged union's registry.
pub struct TaggedEntry<U> {
    /// The discriminator value selecting this variant.
    pub discriminator: &'static str,
    /// Name of the payload type, used in errors.
    pub name: &'static str,
    pub decode: fn(Value) -> serde_json::Result<U>,
}

/// One candidate of an untagged union, tried in registry order.
pub struct UntaggedEntry<U> {
    /// Name of the payload type, used in errors.
    pub name: &'static str,
    pub decode: fn(&Value) -> serde_json::Result<U>,
}

/// A union selected by a discriminator field. Implemented by `define_union!`.
pub trait TaggedUnion: Sized + 'static {
    /// Name of the union type, used in errors.
    const NAME: &'static str;
    const DISCRIMINATOR_FIELD: &'static str;
    /// Every variant of the union. Discriminator values are unique.
    const REGISTRY: &'static [TaggedEntry<Self>];

    /// Decodes a raw object as whichever variant its discriminator names.
    ///
    /// The discriminator is authoritative: if the payload doesn't fit the variant it selects, this
    /// fails with [`ShapeMismatch`](crate::error::InvalidDataKind::ShapeMismatch) rather than
    /// trying other variants.
    fn decode(object: JsonObject) -> Result<Self> {
        decode_tagged(object)
    }

    fn decode_value(value: Value) -> Result<Self> {
        Self::decode(JsonObject::from_value(value)?)
    }

    /// Encodes the held payload. The union adds nothing of its own to the output.
    fn encode(&self) -> Result<Value>
    where
        Self: Serialize,
    {
        Ok(serde_json::to_value(self)?)
    }
}

/// A union without a discriminator. Implemented by `define_untagged_union!`.
pub trait UntaggedUnion: Sized + 'static {
    /// Name of the union type, used in errors.
    const NAME: &'static str;
    /// Candidates, in the order they are attempted.
    const REGISTRY: &'static [UntaggedEntry<Self>];

    /// Decodes the first candidate that accepts `value`.
    fn decode(value: Value) -> Result<Self, AggregateInvalidDataError> {
        decode_untagged(value)
    }

    fn encode(&self) -> Result<Value>
    where
        Self: Serialize,
    {
        Ok(serde_json::to_value(self)?)
    }
}

/// Looks up the discriminator in `U`'s registry and decodes the matching payload.
pub fn decode_tagged<U: TaggedUnion>(object: JsonObject) -> Result<U> {
    let discriminator = match object.get_element(U::DISCRIMINATOR_FIELD) {
        Some(Value::String(value)) => value.as_str(),
        found => {
            tracing::debug!(
                union = U::NAME,
                field = U::DISCRIMINATOR_FIELD,
                present = found.is_some(),
                "missing discriminator"
            );
            return Err(InvalidDataError::missing_discriminator(
                U::NAME,
                U::DISCRIMINATOR_FIELD,
            ));
        }
    };

    let entry = match U::REGISTRY
        .iter()
        .find(|entry| entry.discriminator == discriminator)
    {
        Some(entry) => entry,
        None => {
            tracing::debug!(union = U::NAME, discriminator, "unknown discriminator");
            return Err(InvalidDataError::unknown_variant(
                U::NAME,
                U::DISCRIMINATOR_FIELD,
                discriminator,
            ));
        }
    };

    tracing::trace!(
        union = U::NAME,
        discriminator = entry.discriminator,
        variant = entry.name,
        "decoding tagged union"
    );

    (entry.decode)(object.into_value())
        .map_err(|e| InvalidDataError::shape_mismatch(U::NAME, entry.name, e))
}

/// Tries each of `U`'s candidates in order, returning the first that decodes.
pub fn decode_untagged<U: UntaggedUnion>(
    value: Value,
) -> Result<U, AggregateInvalidDataError> {
    let mut errors = Vec::with_capacity(U::REGISTRY.len());

    for entry in U::REGISTRY {
        match (entry.decode)(&value) {
            Ok(union) => {
                tracing::trace!(union = U::NAME, variant = entry.name, "decoded untagged union");
                return Ok(union);
            }
            Err(e) => {
                tracing::debug!(union = U::NAME, variant = entry.name, error = %e, "candidate rejected");
                errors.push(InvalidDataError::shape_mismatch(U::NAME, entry.name, e));
            }
        }
    }

    Err(AggregateInvalidDataError::new(U::NAME, errors))
}

// Defines a tagged union, its payload structs and the glue between them.
//
// Each payload gets a `Discriminator<Self>` field named after the discriminator field, followed by
// the declared fields and a flattened `extra` holding unknown fields. The discriminator field is
// one of the payload's declared fields, so `extra` can never carry a second one.
macro_rules! define_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($field:ident) {
            $(
                $(#[doc = $doc:expr])+
                $variant:ident ($discriminator:literal) => $payload:ident {
                    $(
                        $(#[$field_meta:meta])*
                        $field_vis:vis $payload_field:ident : $ty:ty,
                    )*
                },
            )+
        }
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            $vis enum $name {
                $(
                    $(#[doc = $doc])+
                    $variant($payload),
                )+
            }

            $(
                $(#[doc = $doc])+
                ///
                #[doc = concat!("Variant of [`", stringify!($name), "`] selected by `",
                    stringify!($field), "` = `\"", $discriminator, "\"`.")]
                #[derive(Default, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
                $vis struct $payload {
                    #[doc = concat!("Always `\"", $discriminator, "\"`.")]
                    pub $field: $crate::data::Discriminator<$payload>,
                    $(
                        $(#[$field_meta])*
                        $field_vis $payload_field: $ty,
                    )*
                    /// Fields not known to this version of the client.
                    #[serde(flatten)]
                    pub extra: $crate::data::Extra<$payload>,
                }

                impl $crate::data::Record for $payload {
                    const FIELDS: &'static [&'static str] =
                        &[stringify!($field), $(stringify!($payload_field)),*];
                }

                impl $crate::data::Discriminated for $payload {
                    const FIELD: &'static str = stringify!($field);
                    const VALUE: &'static str = $discriminator;
                }

                impl From<$payload> for $name {
                    fn from(value: $payload) -> Self {
                        Self::$variant(value)
                    }
                }

                impl std::convert::TryFrom<$name> for $payload {
                    type Error = $name;

                    fn try_from(value: $name) -> std::result::Result<Self, Self::Error> {
                        match value {
                            $name::$variant(inner) => Ok(inner),
                            #[allow(unreachable_patterns)]
                            other => Err(other),
                        }
                    }
                }

                impl $crate::data::VariantOf<$name> for $payload {
                    fn pick(union: &$name) -> Option<&Self> {
                        match union {
                            $name::$variant(inner) => Some(inner),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }
                }
            )+

            #[doc = concat!("Handler for every variant of [`", stringify!($name), "`], used with [`",
                stringify!($name), "::visit`].")]
            $vis trait [<$name Visitor>] {
                type Output;

                $(
                    #[doc = concat!("Called when the union holds [`", stringify!($payload), "`].")]
                    fn [<visit_ $variant:snake>](&mut self, value: &$payload) -> Self::Output;
                )+
            }

            impl $name {
                /// Name of the field that selects the variant.
                pub const DISCRIMINATOR_FIELD: &'static str = stringify!($field);

                /// The discriminator value of the held payload.
                pub fn discriminator(&self) -> &'static str {
                    match self {
                        $(Self::$variant(_) => $discriminator,)+
                    }
                }

                /// The type name of the held payload.
                pub fn variant_name(&self) -> &'static str {
                    match self {
                        $(Self::$variant(_) => stringify!($payload),)+
                    }
                }

                /// Returns the payload if this union holds a `P`.
                pub fn try_pick<P: $crate::data::VariantOf<Self>>(&self) -> Option<&P> {
                    P::pick(self)
                }

                /// Calls the visitor method for the held payload.
                pub fn visit<V: [<$name Visitor>]>(&self, visitor: &mut V) -> V::Output {
                    match self {
                        $(Self::$variant(value) => visitor.[<visit_ $variant:snake>](value),)+
                    }
                }
            }

            impl $crate::data::TaggedUnion for $name {
                const NAME: &'static str = stringify!($name);
                const DISCRIMINATOR_FIELD: &'static str = stringify!($field);
                const REGISTRY: &'static [$crate::data::TaggedEntry<Self>] = &[
                    $(
                        $crate::data::TaggedEntry {
                            discriminator: $discriminator,
                            name: stringify!($payload),
                            decode: |value| serde_json::from_value::<$payload>(value).map(Self::$variant),
                        },
                    )+
                ];
            }

            impl serde::Serialize for $name {
                fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    match self {
                        $(Self::$variant(value) => serde::Serialize::serialize(value, serializer),)+
                    }
                }
            }

            impl<'de> serde::Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let object = <$crate::data::JsonObject as serde::Deserialize>::deserialize(deserializer)?;
                    <Self as $crate::data::TaggedUnion>::decode(object)
                        .map_err(serde::de::Error::custom)
                }
            }
        }
    };
}

pub(crate) use define_union;

// Defines an untagged union over existing payload types, tried in declaration order.
macro_rules! define_untagged_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[doc = $doc:expr])+
                $variant:ident($payload:ty),
            )+
        }
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            $vis enum $name {
                $(
                    $(#[doc = $doc])+
                    $variant($payload),
                )+
            }

            $(
                impl From<$payload> for $name {
                    fn from(value: $payload) -> Self {
                        Self::$variant(value)
                    }
                }

                impl std::convert::TryFrom<$name> for $payload {
                    type Error = $name;

                    fn try_from(value: $name) -> std::result::Result<Self, Self::Error> {
                        match value {
                            $name::$variant(inner) => Ok(inner),
                            #[allow(unreachable_patterns)]
                            other => Err(other),
                        }
                    }
                }

                impl $crate::data::VariantOf<$name> for $payload {
                    fn pick(union: &$name) -> Option<&Self> {
                        match union {
                            $name::$variant(inner) => Some(inner),
                            #[allow(unreachable_patterns)]
                            _ => None,
                        }
                    }
                }
            )+

            #[doc = concat!("Handler for every variant of [`", stringify!($name), "`], used with [`",
                stringify!($name), "::visit`].")]
            $vis trait [<$name Visitor>] {
                type Output;

                $(
                    #[doc = concat!("Called when the union holds [`", stringify!($payload), "`].")]
                    fn [<visit_ $variant:snake>](&mut self, value: &$payload) -> Self::Output;
                )+
            }

            impl $name {
                /// The type name of the held payload.
                pub fn variant_name(&self) -> &'static str {
                    match self {
                        $(Self::$variant(_) => stringify!($payload),)+
                    }
                }

                /// Returns the payload if this union holds a `P`.
                pub fn try_pick<P: $crate::data::VariantOf<Self>>(&self) -> Option<&P> {
                    P::pick(self)
                }

                /// Calls the visitor method for the held payload.
                pub fn visit<V: [<$name Visitor>]>(&self, visitor: &mut V) -> V::Output {
                    match self {
                        $(Self::$variant(value) => visitor.[<visit_ $variant:snake>](value),)+
                    }
                }
            }

            impl $crate::data::UntaggedUnion for $name {
                const NAME: &'static str = stringify!($name);
                const REGISTRY: &'static [$crate::data::UntaggedEntry<Self>] = &[
                    $(
                        $crate::data::UntaggedEntry {
                            name: stringify!($payload),
                            decode: |value| <$payload as serde::Deserialize>::deserialize(value).map(Self::$variant),
                        },
                    )+
                ];
            }

            impl serde::Serialize for $name {
                fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    match self {
                        $(Self::$variant(value) => serde::Serialize::serialize(value, serializer),)+
                    }
                }
            }

            impl<'de> serde::Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                    <Self as $crate::data::UntaggedUnion>::decode(value)
                        .map_err(serde::de::Error::custom)
                }
            }
        }
    };
}

pub(crate) use define_untagged_union;
