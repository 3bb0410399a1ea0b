//! The gene and population records held by the registry store.
//!
//! Records are created by the evolution engine and mutated in place through
//! its operations; they are never deleted. A [`Population`] references genes
//! by id without owning them -- a gene's lifetime is independent of any
//! population that lists it.

use serde::{Deserialize, Serialize};

use crate::dna::DnaSequence;
use crate::ids::{ActorId, GeneId, PopulationId};

/// A registry record representing one individual: DNA fingerprint, fitness
/// score, lineage, and liveness flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    /// Dense sequence number assigned at creation; immutable, never reused.
    pub id: GeneId,
    /// Fixed-width binary fingerprint, opaque beyond equality and hashing.
    pub dna_sequence: DnaSequence,
    /// Identity of the caller that produced this gene; authorizes fitness
    /// updates and termination.
    pub creator: ActorId,
    /// `0` for genesis genes; offspring carry
    /// `max(parent_a.generation, parent_b.generation) + 1`.
    pub generation: u32,
    /// Caller-supplied score; updatable in either direction.
    pub fitness: u64,
    /// `true` at creation; cleared only by explicit termination and never
    /// reset.
    pub is_alive: bool,
    /// First parent (`None` for genesis genes).
    pub parent_a: Option<GeneId>,
    /// Second parent (`None` for genesis genes).
    pub parent_b: Option<GeneId>,
    /// Set the first time fitness reaches the Omega-Prime threshold; never
    /// cleared.
    pub achieved_omega_prime: bool,
}

impl Gene {
    /// Whether this gene was created without parents.
    #[must_use]
    pub const fn is_genesis(&self) -> bool {
        self.parent_a.is_none() && self.parent_b.is_none()
    }
}

/// A bounded group of gene references with an aggregate fitness and its own
/// generation counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    /// Dense sequence number assigned at creation; independent of gene ids.
    pub id: PopulationId,
    /// Ordered member gene ids; non-empty, bounded by the policy's maximum
    /// population size. Entries are references, not ownership.
    pub gene_ids: Vec<GeneId>,
    /// Starts at `0`; incremented by exactly one on each successful
    /// evolution step.
    pub generation: u32,
    /// Integer mean of member fitness (truncating division), recomputed
    /// after every membership change.
    pub average_fitness: u64,
    /// Identity of the caller that created the population; the only actor
    /// authorized to evolve it.
    pub evolution_operator: ActorId,
}
