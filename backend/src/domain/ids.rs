//! Strongly typed identifiers for pets, owners and catalog rows.
//!
//! Identifiers mirror the relational store's surrogate keys: positive
//! 64-bit integers. Construction rejects zero and negative values so that a
//! malformed path segment never reaches storage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raised when an identifier is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a positive integer, got {value}")]
pub struct IdValidationError {
    kind: &'static str,
    value: i64,
}

impl IdValidationError {
    /// Name of the identifier that failed validation, e.g. `pet_id`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw key.
            pub fn new(value: i64) -> Result<Self, IdValidationError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(IdValidationError { kind: $label, value })
                }
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdValidationError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a pet.
    PetId => "pet_id"
);
define_id!(
    /// Identifier of the user owning pets.
    UserId => "user_id"
);
define_id!(
    /// Identifier of a food catalog row.
    FoodId => "food_id"
);
define_id!(
    /// Identifier of an activity catalog row.
    ActivityId => "activity_id"
);
define_id!(
    /// Identifier of a pet type catalog row.
    PetTypeId => "pet_type_id"
);
define_id!(
    /// Identifier of a ledger entry.
    LedgerEntryId => "entry_id"
);
