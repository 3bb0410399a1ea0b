//! Evolution engine for the GENENOUT gene registry.
//!
//! Implements every state-changing domain operation as an atomic transition
//! over the registry store: genesis creation, crossover, fitness updates
//! with Omega-Prime achievement detection, gene termination, population
//! formation, and population evolution (tournament selection + breeding).
//!
//! Each operation validates all preconditions against the current state,
//! computes its delta, then commits and journals events -- or returns an
//! error with the state byte-for-byte unchanged. Pseudo-randomness is
//! derived from a monotonic step counter, the caller identity, and a digest
//! of prior state, so replaying the same ordered operation sequence against
//! the same initial state always yields identical records and events.
//!
//! # Modules
//!
//! - [`engine`] -- The [`EvolutionEngine`] and its operation surface
//! - [`policy`] -- Fixed policy parameters and the [`EvolutionPolicy`] config
//! - [`entropy`] -- Deterministic entropy derivation and the draw-counting
//!   test double
//! - [`genetics`] -- DNA recombination and mutation
//! - [`selection`] -- Tournament selection over population members
//! - [`error`] -- The [`EngineError`] operation-boundary error type

pub mod engine;
pub mod entropy;
pub mod error;
pub mod genetics;
pub mod policy;
pub mod selection;

// Re-export the primary surface at crate root.
pub use engine::EvolutionEngine;
pub use entropy::{CountingEntropy, DigestEntropy, DrawContext, EntropySource, StepRng};
pub use error::EngineError;
pub use policy::{
    CROSSOVER_RATE, EvolutionPolicy, MAX_POPULATION_SIZE, MUTATION_RATE, OMEGA_PRIME_THRESHOLD,
    PolicyError,
};
