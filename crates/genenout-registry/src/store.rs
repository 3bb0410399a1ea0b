//! The registry store: authoritative holder of all gene and population
//! records.
//!
//! # Design
//!
//! - **Append-mostly**: records are inserted and mutated in place, never
//!   deleted.
//! - **Dense ids**: record tables are `Vec`s indexed directly by the
//!   sequence number, giving O(1) lookup and append.
//! - **Identity**: an id, once assigned, never changes meaning. Termination
//!   flags a gene dead but its id and record remain.
//! - **Aggregates**: `total_genes` and `omega_prime_count` are owned here;
//!   increments are checked.

use std::collections::BTreeMap;

use genenout_types::digest::mix64;
use genenout_types::{ActorId, Gene, GeneId, Population, PopulationId};

use crate::RegistryError;

/// Authoritative record tables, id counters, creator index, and global
/// aggregates for the registry.
///
/// The store performs no domain validation. Its one structural check is
/// dense-id sequencing on insert, a defensive guard that is unreachable
/// when callers allocate ids via [`next_gene_id`] / [`next_population_id`].
///
/// [`next_gene_id`]: RegistryStore::next_gene_id
/// [`next_population_id`]: RegistryStore::next_population_id
#[derive(Debug, Default)]
pub struct RegistryStore {
    /// All gene records, indexed by `GeneId` (dense).
    genes: Vec<Gene>,
    /// All population records, indexed by `PopulationId` (dense).
    populations: Vec<Population>,
    /// Gene ids per creator, in insertion order.
    genes_by_creator: BTreeMap<ActorId, Vec<GeneId>>,
    /// Count of distinct genes that have achieved Omega-Prime.
    omega_prime_count: u64,
}

impl RegistryStore {
    /// Create a new empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            genes: Vec::new(),
            populations: Vec::new(),
            genes_by_creator: BTreeMap::new(),
            omega_prime_count: 0,
        }
    }

    // -----------------------------------------------------------------
    // Id allocation
    // -----------------------------------------------------------------

    /// The id the next gene insertion will receive.
    ///
    /// Strictly greater than every previously assigned gene id.
    #[must_use]
    pub fn next_gene_id(&self) -> GeneId {
        GeneId::new(u64::try_from(self.genes.len()).unwrap_or(u64::MAX))
    }

    /// The id the next population insertion will receive.
    ///
    /// An independent counter from gene ids.
    #[must_use]
    pub fn next_population_id(&self) -> PopulationId {
        PopulationId::new(u64::try_from(self.populations.len()).unwrap_or(u64::MAX))
    }

    // -----------------------------------------------------------------
    // Insertion
    // -----------------------------------------------------------------

    /// Append a gene record and index it under its creator.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdOutOfSequence`] if the record does not
    /// carry the next dense gene id.
    pub fn insert_gene(&mut self, gene: Gene) -> Result<GeneId, RegistryError> {
        let expected = self.next_gene_id();
        if gene.id != expected {
            return Err(RegistryError::IdOutOfSequence {
                kind: "gene",
                expected: expected.into_inner(),
                actual: gene.id.into_inner(),
            });
        }

        let id = gene.id;
        self.genes_by_creator
            .entry(gene.creator)
            .or_default()
            .push(id);
        self.genes.push(gene);
        tracing::debug!(%id, "gene record inserted");
        Ok(id)
    }

    /// Append a population record.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IdOutOfSequence`] if the record does not
    /// carry the next dense population id.
    pub fn insert_population(
        &mut self,
        population: Population,
    ) -> Result<PopulationId, RegistryError> {
        let expected = self.next_population_id();
        if population.id != expected {
            return Err(RegistryError::IdOutOfSequence {
                kind: "population",
                expected: expected.into_inner(),
                actual: population.id.into_inner(),
            });
        }

        let id = population.id;
        self.populations.push(population);
        tracing::debug!(%id, "population record inserted");
        Ok(id)
    }

    // -----------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------

    /// Look up a gene record.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::GeneNotFound`] if the id was never
    /// allocated.
    pub fn gene(&self, id: GeneId) -> Result<&Gene, RegistryError> {
        usize::try_from(id.into_inner())
            .ok()
            .and_then(|index| self.genes.get(index))
            .ok_or(RegistryError::GeneNotFound(id))
    }

    /// Look up a gene record mutably.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::GeneNotFound`] if the id was never
    /// allocated.
    pub fn gene_mut(&mut self, id: GeneId) -> Result<&mut Gene, RegistryError> {
        usize::try_from(id.into_inner())
            .ok()
            .and_then(|index| self.genes.get_mut(index))
            .ok_or(RegistryError::GeneNotFound(id))
    }

    /// Look up a population record.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PopulationNotFound`] if the id was never
    /// allocated.
    pub fn population(&self, id: PopulationId) -> Result<&Population, RegistryError> {
        usize::try_from(id.into_inner())
            .ok()
            .and_then(|index| self.populations.get(index))
            .ok_or(RegistryError::PopulationNotFound(id))
    }

    /// Look up a population record mutably.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PopulationNotFound`] if the id was never
    /// allocated.
    pub fn population_mut(
        &mut self,
        id: PopulationId,
    ) -> Result<&mut Population, RegistryError> {
        usize::try_from(id.into_inner())
            .ok()
            .and_then(|index| self.populations.get_mut(index))
            .ok_or(RegistryError::PopulationNotFound(id))
    }

    /// Gene ids created by the given actor, in insertion order.
    ///
    /// Empty if the actor has created no genes.
    #[must_use]
    pub fn genes_of(&self, creator: ActorId) -> &[GeneId] {
        self.genes_by_creator
            .get(&creator)
            .map_or(&[], Vec::as_slice)
    }

    // -----------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------

    /// Count of all genes ever created.
    #[must_use]
    pub fn total_genes(&self) -> u64 {
        u64::try_from(self.genes.len()).unwrap_or(u64::MAX)
    }

    /// Count of all populations ever created.
    #[must_use]
    pub fn total_populations(&self) -> u64 {
        u64::try_from(self.populations.len()).unwrap_or(u64::MAX)
    }

    /// Count of distinct genes that have achieved Omega-Prime.
    #[must_use]
    pub const fn omega_prime_count(&self) -> u64 {
        self.omega_prime_count
    }

    /// Record one more distinct Omega-Prime achievement.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CounterOverflow`] if the counter is
    /// saturated; unreachable in practice since the count is bounded by
    /// the number of genes.
    pub fn record_omega_prime(&mut self) -> Result<(), RegistryError> {
        self.omega_prime_count = self
            .omega_prime_count
            .checked_add(1)
            .ok_or(RegistryError::CounterOverflow {
                counter: "omega_prime_count",
            })?;
        Ok(())
    }

    /// Deterministic digest of the store's counters.
    ///
    /// Folded into step entropy derivation so that selection outcomes
    /// depend on prior state, as the execution model requires. Identical
    /// stores always produce identical digests.
    #[must_use]
    pub fn state_digest(&self) -> u64 {
        let mut digest = mix64(self.total_genes());
        digest = mix64(digest ^ self.total_populations());
        mix64(digest ^ self.omega_prime_count)
    }
}

#[cfg(test)]
mod tests {
    use genenout_types::DnaSequence;

    use super::*;

    fn genesis(store: &RegistryStore, creator: ActorId, label: &str) -> Gene {
        Gene {
            id: store.next_gene_id(),
            dna_sequence: DnaSequence::derive(label),
            creator,
            generation: 0,
            fitness: 0,
            is_alive: true,
            parent_a: None,
            parent_b: None,
            achieved_omega_prime: false,
        }
    }

    #[test]
    fn new_store_is_empty() {
        let store = RegistryStore::new();
        assert_eq!(store.total_genes(), 0);
        assert_eq!(store.total_populations(), 0);
        assert_eq!(store.omega_prime_count(), 0);
        assert_eq!(store.next_gene_id(), GeneId::new(0));
    }

    #[test]
    fn gene_ids_are_dense() {
        let mut store = RegistryStore::new();
        let creator = ActorId::new();

        let first = store.insert_gene(genesis(&store, creator, "A"));
        let second = store.insert_gene(genesis(&store, creator, "B"));

        assert_eq!(first.ok(), Some(GeneId::new(0)));
        assert_eq!(second.ok(), Some(GeneId::new(1)));
        assert_eq!(store.next_gene_id(), GeneId::new(2));
        assert_eq!(store.total_genes(), 2);
    }

    #[test]
    fn out_of_sequence_insert_rejected() {
        let mut store = RegistryStore::new();
        let creator = ActorId::new();
        let mut gene = genesis(&store, creator, "A");
        gene.id = GeneId::new(7);

        let result = store.insert_gene(gene);
        assert!(matches!(
            result,
            Err(RegistryError::IdOutOfSequence {
                kind: "gene",
                expected: 0,
                actual: 7,
            })
        ));
        assert_eq!(store.total_genes(), 0);
    }

    #[test]
    fn lookup_missing_gene_fails() {
        let store = RegistryStore::new();
        let result = store.gene(GeneId::new(3));
        assert_eq!(result.err(), Some(RegistryError::GeneNotFound(GeneId::new(3))));
    }

    #[test]
    fn lookup_missing_population_fails() {
        let store = RegistryStore::new();
        let result = store.population(PopulationId::new(0));
        assert_eq!(
            result.err(),
            Some(RegistryError::PopulationNotFound(PopulationId::new(0))),
        );
    }

    #[test]
    fn creator_index_preserves_insertion_order() {
        let mut store = RegistryStore::new();
        let alice = ActorId::new();
        let bob = ActorId::new();

        let _ = store.insert_gene(genesis(&store, alice, "A"));
        let _ = store.insert_gene(genesis(&store, bob, "B"));
        let _ = store.insert_gene(genesis(&store, alice, "C"));

        assert_eq!(store.genes_of(alice), &[GeneId::new(0), GeneId::new(2)]);
        assert_eq!(store.genes_of(bob), &[GeneId::new(1)]);
        assert!(store.genes_of(ActorId::new()).is_empty());
    }

    #[test]
    fn population_counter_is_independent() {
        let mut store = RegistryStore::new();
        let operator = ActorId::new();
        let _ = store.insert_gene(genesis(&store, operator, "A"));

        let population = Population {
            id: store.next_population_id(),
            gene_ids: vec![GeneId::new(0)],
            generation: 0,
            average_fitness: 0,
            evolution_operator: operator,
        };
        let inserted = store.insert_population(population);

        assert_eq!(inserted.ok(), Some(PopulationId::new(0)));
        assert_eq!(store.total_populations(), 1);
        assert_eq!(store.next_gene_id(), GeneId::new(1));
    }

    #[test]
    fn omega_prime_counter_increments() {
        let mut store = RegistryStore::new();
        assert!(store.record_omega_prime().is_ok());
        assert!(store.record_omega_prime().is_ok());
        assert_eq!(store.omega_prime_count(), 2);
    }

    #[test]
    fn state_digest_tracks_counters() {
        let mut store = RegistryStore::new();
        let before = store.state_digest();
        let _ = store.insert_gene(genesis(&store, ActorId::new(), "A"));
        assert_ne!(store.state_digest(), before);
    }

    #[test]
    fn identical_stores_share_digests() {
        let store_a = RegistryStore::new();
        let store_b = RegistryStore::new();
        assert_eq!(store_a.state_digest(), store_b.state_digest());
    }
}
