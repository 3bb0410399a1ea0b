//! Error types for the evolution engine.
//!
//! All domain errors are surfaced synchronously at the operation boundary
//! with no partial state change and no internal retry. A failed operation
//! leaves the registry byte-for-byte identical to before the call.

use genenout_registry::RegistryError;
use genenout_types::{ActorId, GeneId};

/// Errors that can occur during an engine operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A referenced gene or population id was never allocated.
    #[error("not found: {0}")]
    NotFound(RegistryError),

    /// Crossover attempted with one or both parents terminated.
    #[error(
        "parents must be alive: gene {parent_a} alive={parent_a_alive}, \
         gene {parent_b} alive={parent_b_alive}"
    )]
    ParentsNotAlive {
        /// First parent id.
        parent_a: GeneId,
        /// Whether the first parent was alive.
        parent_a_alive: bool,
        /// Second parent id.
        parent_b: GeneId,
        /// Whether the second parent was alive.
        parent_b_alive: bool,
    },

    /// Caller is neither the record's creator/operator nor the registry
    /// owner.
    #[error("caller {caller} is not authorized to {action}")]
    NotAuthorized {
        /// The rejected caller.
        caller: ActorId,
        /// The operation that was attempted.
        action: &'static str,
    },

    /// Population creation called with an empty, oversized, or dangling
    /// membership.
    #[error("invalid population membership: {reason}")]
    PopulationSizeInvalid {
        /// What was wrong with the membership.
        reason: String,
    },

    /// An id counter or aggregate inconsistency was detected.
    ///
    /// Defensive and unreachable through the public surface; not
    /// user-recoverable.
    #[error("invariant violation: {context}")]
    InvariantViolation {
        /// Description of the inconsistency.
        context: String,
    },
}
