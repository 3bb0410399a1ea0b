//! Identifier types for registry records and callers.
//!
//! Gene and population identifiers are dense sequence numbers (0, 1, 2, ...)
//! assigned by the registry store -- never reused or reassigned, even after a
//! gene is terminated. They are newtypes over `u64` so the two sequences
//! cannot be mixed at compile time.
//!
//! Callers (gene creators, population operators, the registry owner) are
//! identified by [`ActorId`], a UUID v7 wrapper.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around a `u64` sequence number.
macro_rules! define_sequence_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// Wrap a raw sequence number.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Return the inner sequence number.
            #[must_use]
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_sequence_id! {
    /// Unique identifier for a gene record. Dense and monotonic: the first
    /// gene is 0, the next 1, and so on for the registry's lifetime.
    GeneId
}

define_sequence_id! {
    /// Unique identifier for a population record. An independent counter
    /// from [`GeneId`], also dense and monotonic.
    PopulationId
}

/// Identity of a caller interacting with the registry.
///
/// An actor is a gene's `creator`, a population's `evolution_operator`, or
/// the registry owner. Backed by UUID v7 (time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Create a new actor identity using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ActorId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<ActorId> for Uuid {
    fn from(id: ActorId) -> Self {
        id.0
    }
}
