use crate::error::{InvalidDataError, InvalidDataKind, Result};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A closed set of symbols with fixed wire strings, used as the known half of an [`ApiEnum`].
///
/// Implementations are generated by `define_known_values!`.
pub trait KnownValue: Copy + PartialEq + 'static {
    /// Every `(raw value, symbol)` pair, in declaration order.
    const VALUES: &'static [(&'static str, Self)];

    /// The wire string for this symbol.
    fn as_str(&self) -> &'static str;

    /// Looks up the symbol for a wire string.
    fn from_raw(raw: &str) -> Option<Self> {
        Self::VALUES
            .iter()
            .find(|(value, _)| *value == raw)
            .map(|(_, symbol)| *symbol)
    }
}

// Defines a plain enum along with its `KnownValue` table.
macro_rules! define_known_values {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $raw:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[doc = concat!("\n\nWire value `\"", $raw, "\"`.")]
                $variant,
            )+
        }

        impl $crate::data::KnownValue for $name {
            const VALUES: &'static [(&'static str, Self)] = &[$(($raw, Self::$variant)),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $raw,)+
                }
            }
        }
    };
}

pub(crate) use define_known_values;

/// Wrapper for an enum-valued field that also accepts values this client doesn't know about.
///
/// The raw string received from the server is always kept, and is what gets serialized back out,
/// so unknown values survive a round trip. Comparison and hashing use the raw string only.
///
/// # Example
///
/// ```
/// use billing_models::data::{ApiEnum, Cadence};
///
/// let known = ApiEnum::<Cadence>::from_raw("monthly");
/// assert_eq!(known.known(), Some(Cadence::Monthly));
/// assert_eq!(known, Cadence::Monthly);
/// assert_eq!(known, ApiEnum::new(Cadence::Monthly));
///
/// let unknown = ApiEnum::<Cadence>::from_raw("fortnightly");
/// assert_eq!(unknown.known(), None);
/// assert_eq!(unknown.as_str(), "fortnightly");
/// assert!(unknown.validate().is_ok());
/// assert!(unknown.validate_known().is_err());
/// ```
#[derive(Clone)]
pub struct ApiEnum<T> {
    raw: Cow<'static, str>,
    known: Option<T>,
}

impl<T: KnownValue> ApiEnum<T> {
    /// Creates a new value from a known symbol.
    pub fn new(symbol: T) -> Self {
        Self {
            raw: Cow::Borrowed(symbol.as_str()),
            known: Some(symbol),
        }
    }

    /// Creates a new value from a raw string. This never fails; unrecognized strings are kept
    /// as-is with no symbol attached.
    pub fn from_raw<S>(raw: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        let raw = raw.into();
        let known = T::from_raw(&raw);
        Self { raw, known }
    }

    /// Fails with [`InvalidDataKind::UnrecognizedEnumValue`] unless the value is known.
    ///
    /// Use this where the caller can only act on the closed set of values.
    pub fn validate_known(&self) -> Result<()> {
        match self.known {
            Some(_) => Ok(()),
            None => Err(InvalidDataError::new(
                InvalidDataKind::UnrecognizedEnumValue,
                format!(
                    "{:?} is not one of {:?}",
                    self.raw,
                    T::VALUES.iter().map(|(raw, _)| *raw).collect::<Vec<_>>()
                ),
            )),
        }
    }
}

impl<T> ApiEnum<T> {
    /// Returns the raw string exactly as it was received or constructed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_raw(self) -> Cow<'static, str> {
        self.raw
    }

    /// Returns the known symbol, or `None` for an unrecognized value.
    pub fn known(&self) -> Option<T>
    where
        T: Copy,
    {
        self.known
    }

    pub fn is_known(&self) -> bool {
        self.known.is_some()
    }

    /// Always succeeds. Unrecognized values are valid for an open enum.
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: KnownValue> From<T> for ApiEnum<T> {
    fn from(symbol: T) -> Self {
        Self::new(symbol)
    }
}

impl<T: KnownValue + Default> Default for ApiEnum<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> PartialEq for ApiEnum<T> {
    fn eq(&self, rhs: &Self) -> bool {
        self.raw == rhs.raw
    }
}

impl<T> Eq for ApiEnum<T> {}

impl<T: KnownValue> PartialEq<T> for ApiEnum<T> {
    fn eq(&self, rhs: &T) -> bool {
        self.raw == rhs.as_str()
    }
}

impl<T> PartialEq<str> for ApiEnum<T> {
    fn eq(&self, rhs: &str) -> bool {
        self.raw == rhs
    }
}

impl<T> PartialEq<&str> for ApiEnum<T> {
    fn eq(&self, rhs: &&str) -> bool {
        self.raw == *rhs
    }
}

impl<T> Hash for ApiEnum<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state)
    }
}

impl<T: fmt::Debug> fmt::Debug for ApiEnum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.known {
            Some(symbol) => write!(f, "{:?}", symbol),
            None => write!(f, "Unrecognized({:?})", self.raw),
        }
    }
}

impl<T> fmt::Display for ApiEnum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<T> Serialize for ApiEnum<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de, T: KnownValue> Deserialize<'de> for ApiEnum<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        // Reuse the static string for known values
        Ok(match T::from_raw(&raw) {
            Some(symbol) => Self::new(symbol),
            None => Self {
                raw: Cow::Owned(raw),
                known: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    type Result = std::result::Result<(), Box<dyn std::error::Error>>;

    define_known_values! {
        #[derive(Default)]
        pub enum Frequency {
            #[default]
            Daily = "daily",
            Monthly = "monthly",
        }
    }

    type OpenFrequency = ApiEnum<Frequency>;

    #[test]
    fn known_value() {
        let value = OpenFrequency::from_raw("daily");
        assert_eq!(value.known(), Some(Frequency::Daily));
        assert_eq!(value.as_str(), "daily");
        assert!(value.is_known());
    }

    #[test]
    fn unrecognized_value() {
        let value = OpenFrequency::from_raw("weekly");
        assert_eq!(value.known(), None);
        assert_eq!(value.as_str(), "weekly");
        assert!(value.validate().is_ok());

        let err = value.validate_known().unwrap_err();
        assert_eq!(err.kind(), InvalidDataKind::UnrecognizedEnumValue);
        assert_eq!(err.message(), r#""weekly" is not one of ["daily", "monthly"]"#);
    }

    #[test]
    fn forward_compatible_raw_is_kept() {
        let value = OpenFrequency::from_raw("some-future-value");
        assert_eq!(value.known(), None);
        assert_eq!(value.into_raw(), "some-future-value");
    }

    #[test]
    fn partial_eq() {
        assert_eq!(OpenFrequency::new(Frequency::Monthly), Frequency::Monthly);
        assert_ne!(OpenFrequency::new(Frequency::Monthly), Frequency::Daily);
        assert_eq!(
            OpenFrequency::from_raw("monthly"),
            OpenFrequency::new(Frequency::Monthly)
        );

        // Unknown values compare on the raw string
        assert_eq!(
            OpenFrequency::from_raw("weekly"),
            OpenFrequency::from_raw(String::from("weekly"))
        );
        assert_ne!(
            OpenFrequency::from_raw("weekly"),
            OpenFrequency::from_raw("Weekly")
        );
        assert_eq!(OpenFrequency::from_raw("weekly"), "weekly");
    }

    #[test]
    fn hash_uses_raw_value() {
        let mut set = HashSet::new();
        set.insert(OpenFrequency::from_raw("weekly"));
        set.insert(OpenFrequency::from_raw("weekly".to_owned()));
        set.insert(OpenFrequency::new(Frequency::Daily));
        set.insert(OpenFrequency::from_raw("daily"));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serialize() -> Result {
        assert_eq!(
            serde_json::to_value(OpenFrequency::new(Frequency::Daily))?,
            json!("daily")
        );
        assert_eq!(
            serde_json::to_value(OpenFrequency::from_raw("hourly"))?,
            json!("hourly")
        );

        Ok(())
    }

    #[test]
    fn deserialize() -> Result {
        assert_eq!(
            serde_json::from_value::<OpenFrequency>(json!("monthly"))?.known(),
            Some(Frequency::Monthly)
        );
        assert_eq!(
            serde_json::from_value::<OpenFrequency>(json!("hourly"))?,
            OpenFrequency::from_raw("hourly")
        );
        assert!(serde_json::from_value::<OpenFrequency>(json!(7)).is_err());

        Ok(())
    }

    #[test]
    fn default_and_display() {
        let value = OpenFrequency::default();
        assert_eq!(value, Frequency::Daily);
        assert_eq!(value.to_string(), "daily");
        assert_eq!(format!("{:?}", value), "Daily");
        assert_eq!(
            format!("{:?}", OpenFrequency::from_raw("hourly")),
            r#"Unrecognized("hourly")"#
        );
    }
}
