//! Shared type definitions for the GENENOUT gene registry.
//!
//! This crate is the single source of truth for all types used across the
//! GENENOUT workspace: identifiers, the DNA fingerprint, the gene and
//! population records, and the observable event enum.
//!
//! # Modules
//!
//! - [`ids`] -- Sequence-id wrappers for genes and populations, plus
//!   UUID-backed actor identity
//! - [`dna`] -- The fixed-width [`DnaSequence`] fingerprint
//! - [`records`] -- The [`Gene`] and [`Population`] records
//! - [`events`] -- The [`RegistryEvent`] enum emitted by the engine
//! - [`digest`] -- Deterministic 64-bit mixing used for fingerprints and
//!   entropy derivation

pub mod digest;
pub mod dna;
pub mod events;
pub mod ids;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use dna::{DNA_WIDTH, DnaSequence};
pub use events::RegistryEvent;
pub use ids::{ActorId, GeneId, PopulationId};
pub use records::{Gene, Population};
