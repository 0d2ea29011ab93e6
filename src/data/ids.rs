use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_ids {
    ($(
        $(#[$meta:meta])*
        $name:ident,
    )+) => {
        $(
            $(#[$meta])*
            ///
            /// This is a newtype wrapper rather than a plain `String` so that IDs of different
            /// resources can't be mixed up, and short IDs are stored inline.
            #[derive(Default, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(smol_str::SmolStr);

            impl $name {
                pub fn new<S: AsRef<str>>(value: S) -> Self {
                    Self(smol_str::SmolStr::new(value))
                }

                pub fn as_str(&self) -> &str {
                    self.0.as_str()
                }

                /// Consumes this value and returns the inner `String` representation.
                pub fn into_string(self) -> String {
                    self.0.to_string()
                }
            }

            impl From<String> for $name {
                fn from(value: String) -> Self {
                    Self(value.into())
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.into())
                }
            }

            impl PartialEq<str> for $name {
                fn eq(&self, rhs: &str) -> bool {
                    self.as_str() == rhs
                }
            }

            impl PartialEq<&str> for $name {
                fn eq(&self, rhs: &&str) -> bool {
                    self.as_str() == *rhs
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )+
    };
}

define_ids! {
    /// ID of a price.
    PriceId,
    /// ID of a billable item.
    ItemId,
    /// ID of a price adjustment.
    AdjustmentId,
}
