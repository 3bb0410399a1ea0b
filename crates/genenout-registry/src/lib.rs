//! Registry store and event journal for the GENENOUT gene registry.
//!
//! This crate is the pure bookkeeping layer beneath the evolution engine.
//! It holds every [`Gene`] and [`Population`] record ever created, assigns
//! dense monotonically increasing identifiers, maintains the per-creator
//! index and the global aggregates, and appends observable events to an
//! ordered journal.
//!
//! # Architecture
//!
//! - [`store`] -- The [`RegistryStore`]: record tables, id counters,
//!   creator index, aggregates.
//! - [`journal`] -- The [`EventJournal`]: append-only ordered event log.
//!
//! No domain validation happens here -- liveness, authorization, and policy
//! thresholds are the engine's responsibility. The store guarantees only
//! identity: ids are dense, unique, and never reused or reassigned, even
//! after a gene is terminated.
//!
//! [`Gene`]: genenout_types::Gene
//! [`Population`]: genenout_types::Population

pub mod journal;
pub mod store;

// Re-export primary types at crate root.
pub use journal::EventJournal;
pub use store::RegistryStore;

use genenout_types::{GeneId, PopulationId};

/// Errors that can occur at the bookkeeping layer.
///
/// The lookup variants are ordinary caller-visible failures. The sequencing
/// and overflow variants are defensive: they guard invariants that are
/// unreachable through the engine's operations and surface there as
/// internal invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The referenced gene id was never allocated.
    #[error("gene {0} does not exist")]
    GeneNotFound(GeneId),

    /// The referenced population id was never allocated.
    #[error("population {0} does not exist")]
    PopulationNotFound(PopulationId),

    /// An inserted record did not carry the next dense id.
    #[error("{kind} id out of sequence: expected {expected}, got {actual}")]
    IdOutOfSequence {
        /// Which record table detected the violation (`"gene"` or
        /// `"population"`).
        kind: &'static str,
        /// The id the table would assign next.
        expected: u64,
        /// The id the record actually carried.
        actual: u64,
    },

    /// An id or aggregate counter would overflow.
    #[error("{counter} counter overflow")]
    CounterOverflow {
        /// Which counter reached its limit.
        counter: &'static str,
    },
}
