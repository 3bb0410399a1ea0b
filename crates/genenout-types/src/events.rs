//! Observable events appended to the registry's journal.
//!
//! Every successful state-changing operation appends its events in a fixed
//! order before returning. The journal is append-only and ordered, so
//! external subscribers can replay registry history from it.

use serde::{Deserialize, Serialize};

use crate::dna::DnaSequence;
use crate::ids::{ActorId, GeneId, PopulationId};

/// An event recorded by the evolution engine.
///
/// Population creation and population evolution both emit
/// [`RegistryEvent::PopulationEvolved`]; consumers cannot distinguish the
/// two by event type alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A new gene entered the registry (genesis or offspring).
    GeneCreated {
        /// The new gene's id.
        id: GeneId,
        /// The caller that produced the gene.
        creator: ActorId,
        /// The gene's DNA fingerprint.
        dna_sequence: DnaSequence,
    },

    /// An offspring gene was bred from two parents.
    GeneEvolved {
        /// The offspring gene's id.
        offspring: GeneId,
        /// First parent.
        parent_a: GeneId,
        /// Second parent.
        parent_b: GeneId,
        /// The offspring's generation number.
        generation: u32,
    },

    /// A gene's fitness score was set.
    FitnessUpdated {
        /// The gene whose fitness changed.
        id: GeneId,
        /// The new fitness value.
        fitness: u64,
    },

    /// A gene's fitness first reached the Omega-Prime threshold.
    ///
    /// Emitted at most once per gene for the registry's lifetime.
    OmegaPrimeAchieved {
        /// The achieving gene.
        id: GeneId,
        /// The fitness value that crossed the threshold.
        fitness: u64,
    },

    /// A population was created or completed an evolution step.
    PopulationEvolved {
        /// The population's id.
        id: PopulationId,
        /// The population's generation after the step (`0` at creation).
        generation: u32,
        /// The recomputed average fitness of the membership.
        average_fitness: u64,
    },
}
