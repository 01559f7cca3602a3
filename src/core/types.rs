//! Strongly-typed wrappers for game concepts
//!
//! Distinct string newtypes so that a definition id can never be passed
//! where an ability key or a counter kind is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                $name(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

string_newtype!(
    /// Card subtype (creature type, land type, etc.)
    ///
    /// Examples: "Goblin", "Warrior", "Forest"
    Subtype
);

string_newtype!(
    /// Counter kind (e.g., "+1/+1", "-1/-1", "charge")
    CounterType
);

string_newtype!(
    /// Card name (distinct from other string types)
    CardName
);

string_newtype!(
    /// Player name (distinct from other string types)
    PlayerName
);

string_newtype!(
    /// Key of a card definition in the card database
    ///
    /// Distinct from a `CardId`, which names one runtime instance.
    DefinitionId
);

string_newtype!(
    /// Key of an ability factory in the ability registry
    AbilityKey
);

impl CounterType {
    pub fn plus_one_plus_one() -> Self {
        CounterType::new("+1/+1")
    }

    pub fn minus_one_minus_one() -> Self {
        CounterType::new("-1/-1")
    }
}
