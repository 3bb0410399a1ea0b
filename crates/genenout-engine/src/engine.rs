//! The evolution engine and its operation surface.
//!
//! The engine owns the registry store and the event journal and is the only
//! writer to either. State-changing operations take `&mut self`, so the
//! execution model is single-writer and strictly serialized: one operation
//! runs to completion -- success or failure -- before the next begins.
//! Read-only queries take `&self` and observe only fully-applied writes.
//!
//! Every operation follows validate-then-commit: all preconditions are
//! checked against current state before any mutation, so a failed call
//! leaves the registry byte-for-byte unchanged.

use tracing::{debug, info};

use genenout_registry::{EventJournal, RegistryError, RegistryStore};
use genenout_types::{
    ActorId, DnaSequence, Gene, GeneId, Population, PopulationId, RegistryEvent,
};

use crate::entropy::{DigestEntropy, DrawContext, EntropySource, StepRng};
use crate::error::EngineError;
use crate::genetics;
use crate::policy::EvolutionPolicy;
use crate::selection::{self, Contender};

/// The stateful evolution engine over a gene registry.
///
/// Generic over its [`EntropySource`] so harnesses can inject counted or
/// fixed sources; production code uses [`DigestEntropy`].
#[derive(Debug)]
pub struct EvolutionEngine<E = DigestEntropy> {
    /// Authoritative record tables and aggregates.
    store: RegistryStore,
    /// Append-only observable event log.
    journal: EventJournal,
    /// The registry owner, captured at construction; may update fitness or
    /// terminate any gene.
    owner: ActorId,
    /// Fixed policy parameters.
    policy: EvolutionPolicy,
    /// Source of per-operation base draws.
    entropy: E,
    /// Monotonic count of applied state-changing operations.
    step: u64,
}

impl EvolutionEngine {
    /// Create an engine with the default policy and production entropy.
    #[must_use]
    pub fn new(owner: ActorId) -> Self {
        Self::with_policy(owner, EvolutionPolicy::default())
    }

    /// Create an engine with a custom policy and production entropy.
    #[must_use]
    pub fn with_policy(owner: ActorId, policy: EvolutionPolicy) -> Self {
        Self::with_entropy(owner, policy, DigestEntropy::new())
    }
}

impl<E: EntropySource> EvolutionEngine<E> {
    /// Create an engine with a custom policy and entropy source.
    #[must_use]
    pub const fn with_entropy(owner: ActorId, policy: EvolutionPolicy, entropy: E) -> Self {
        Self {
            store: RegistryStore::new(),
            journal: EventJournal::new(),
            owner,
            policy,
            entropy,
            step: 0,
        }
    }

    // -----------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------

    /// Look up a gene record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the id was never allocated.
    pub fn gene(&self, id: GeneId) -> Result<&Gene, EngineError> {
        self.store.gene(id).map_err(EngineError::NotFound)
    }

    /// Look up a population record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the id was never allocated.
    pub fn population(&self, id: PopulationId) -> Result<&Population, EngineError> {
        self.store.population(id).map_err(EngineError::NotFound)
    }

    /// Gene ids created by the given actor, in insertion order.
    #[must_use]
    pub fn user_genes(&self, actor: ActorId) -> &[GeneId] {
        self.store.genes_of(actor)
    }

    /// Count of all genes ever created.
    #[must_use]
    pub fn total_genes(&self) -> u64 {
        self.store.total_genes()
    }

    /// Count of distinct genes that have achieved Omega-Prime.
    #[must_use]
    pub const fn omega_prime_count(&self) -> u64 {
        self.store.omega_prime_count()
    }

    /// All events emitted so far, in emission order.
    #[must_use]
    pub fn events(&self) -> &[RegistryEvent] {
        self.journal.events()
    }

    /// Events emitted at or after the given offset.
    #[must_use]
    pub fn events_since(&self, offset: usize) -> &[RegistryEvent] {
        self.journal.events_since(offset)
    }

    /// The registry owner captured at construction.
    #[must_use]
    pub const fn owner(&self) -> ActorId {
        self.owner
    }

    /// The active policy parameters.
    #[must_use]
    pub const fn policy(&self) -> &EvolutionPolicy {
        &self.policy
    }

    /// Number of state-changing operations applied so far.
    #[must_use]
    pub const fn steps_applied(&self) -> u64 {
        self.step
    }

    /// The entropy source, for harnesses inspecting draw counts.
    #[must_use]
    pub const fn entropy(&self) -> &E {
        &self.entropy
    }

    // -----------------------------------------------------------------
    // State-changing operations
    // -----------------------------------------------------------------

    /// Create a genesis gene: generation 0, alive, fitness 0, no parents.
    ///
    /// Emits [`RegistryEvent::GeneCreated`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] only on store
    /// exhaustion.
    pub fn create_genesis(
        &mut self,
        caller: ActorId,
        dna_sequence: DnaSequence,
    ) -> Result<GeneId, EngineError> {
        let next_step = self.next_step()?;

        let id = self.store.next_gene_id();
        let gene = Gene {
            id,
            dna_sequence,
            creator: caller,
            generation: 0,
            fitness: 0,
            is_alive: true,
            parent_a: None,
            parent_b: None,
            achieved_omega_prime: false,
        };
        self.store.insert_gene(gene).map_err(Self::invariant)?;
        self.journal.append(RegistryEvent::GeneCreated {
            id,
            creator: caller,
            dna_sequence,
        });
        self.step = next_step;

        debug!(%id, creator = %caller, "genesis gene created");
        Ok(id)
    }

    /// Breed an offspring gene from two living parents.
    ///
    /// Offspring DNA is a deterministic recombination of the parents'
    /// sequences with policy-rate mutation; its generation is one above
    /// the older parent. Emits [`RegistryEvent::GeneCreated`] then
    /// [`RegistryEvent::GeneEvolved`]. There is no cap on offspring count.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if either parent id was never
    /// allocated, or [`EngineError::ParentsNotAlive`] if either parent is
    /// terminated. On failure no gene id is consumed.
    pub fn crossover(
        &mut self,
        caller: ActorId,
        parent_a: GeneId,
        parent_b: GeneId,
    ) -> Result<GeneId, EngineError> {
        let next_step = self.next_step()?;

        let first = self.store.gene(parent_a).map_err(EngineError::NotFound)?;
        let second = self.store.gene(parent_b).map_err(EngineError::NotFound)?;
        if !(first.is_alive && second.is_alive) {
            return Err(EngineError::ParentsNotAlive {
                parent_a,
                parent_a_alive: first.is_alive,
                parent_b,
                parent_b_alive: second.is_alive,
            });
        }
        let generation = Self::offspring_generation(first.generation, second.generation)?;
        let dna_a = first.dna_sequence;
        let dna_b = second.dna_sequence;

        let base_draw = self.entropy.base_draw(&DrawContext {
            step: next_step,
            caller,
            state_digest: self.store.state_digest(),
        });
        let mut stream = StepRng::new(base_draw);
        let dna_sequence = genetics::recombine(&dna_a, &dna_b, &self.policy, &mut stream);

        let id = self.commit_offspring(caller, parent_a, parent_b, generation, dna_sequence)?;
        self.step = next_step;

        debug!(%id, %parent_a, %parent_b, generation, "offspring bred");
        Ok(id)
    }

    /// Set a gene's fitness score.
    ///
    /// Decreases are legal; monotonicity is not enforced. The first time
    /// the new value reaches the Omega-Prime threshold the achievement
    /// flag is set, the global count increments by exactly one, and
    /// [`RegistryEvent::OmegaPrimeAchieved`] is emitted. A given gene can
    /// trigger the achievement at most once for the registry's lifetime.
    /// Always emits [`RegistryEvent::FitnessUpdated`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the gene does not exist, or
    /// [`EngineError::NotAuthorized`] if the caller is neither the gene's
    /// creator nor the registry owner. On failure fitness is unchanged.
    pub fn update_fitness(
        &mut self,
        caller: ActorId,
        gene_id: GeneId,
        fitness: u64,
    ) -> Result<(), EngineError> {
        let next_step = self.next_step()?;

        let gene = self.store.gene(gene_id).map_err(EngineError::NotFound)?;
        if caller != gene.creator && caller != self.owner {
            return Err(EngineError::NotAuthorized {
                caller,
                action: "update fitness",
            });
        }
        let achieves = fitness >= self.policy.omega_prime_threshold && !gene.achieved_omega_prime;

        if achieves {
            self.store.record_omega_prime().map_err(Self::invariant)?;
        }
        let record = self.store.gene_mut(gene_id).map_err(Self::invariant)?;
        record.fitness = fitness;
        if achieves {
            record.achieved_omega_prime = true;
            self.journal
                .append(RegistryEvent::OmegaPrimeAchieved { id: gene_id, fitness });
            info!(%gene_id, fitness, "omega-prime achieved");
        }
        self.journal
            .append(RegistryEvent::FitnessUpdated { id: gene_id, fitness });
        self.step = next_step;

        debug!(%gene_id, fitness, "fitness updated");
        Ok(())
    }

    /// Terminate a gene.
    ///
    /// Idempotent: re-terminating an already-dead gene rewrites the flag
    /// identically and is not an error. Termination emits no event and
    /// never frees the gene's id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the gene does not exist, or
    /// [`EngineError::NotAuthorized`] if the caller is neither the gene's
    /// creator nor the registry owner.
    pub fn terminate_gene(&mut self, caller: ActorId, gene_id: GeneId) -> Result<(), EngineError> {
        let next_step = self.next_step()?;

        let gene = self.store.gene(gene_id).map_err(EngineError::NotFound)?;
        if caller != gene.creator && caller != self.owner {
            return Err(EngineError::NotAuthorized {
                caller,
                action: "terminate this gene",
            });
        }

        let record = self.store.gene_mut(gene_id).map_err(Self::invariant)?;
        record.is_alive = false;
        self.step = next_step;

        debug!(%gene_id, "gene terminated");
        Ok(())
    }

    /// Form a population over existing genes.
    ///
    /// Membership is ordered, non-empty, bounded by the policy maximum,
    /// and may contain duplicate ids. Average fitness is the truncated
    /// integer mean of the members' current fitness. Emits
    /// [`RegistryEvent::PopulationEvolved`] with generation 0 -- the same
    /// event type later evolution steps use.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PopulationSizeInvalid`] if the membership is
    /// empty, exceeds the policy maximum, or references a gene id that was
    /// never allocated. On failure no population id is consumed.
    pub fn create_population(
        &mut self,
        caller: ActorId,
        gene_ids: Vec<GeneId>,
    ) -> Result<PopulationId, EngineError> {
        let next_step = self.next_step()?;

        if gene_ids.is_empty() {
            return Err(EngineError::PopulationSizeInvalid {
                reason: String::from("membership must not be empty"),
            });
        }
        if gene_ids.len() > self.policy.max_population_size {
            return Err(EngineError::PopulationSizeInvalid {
                reason: format!(
                    "membership of {} exceeds the maximum of {}",
                    gene_ids.len(),
                    self.policy.max_population_size,
                ),
            });
        }
        for id in &gene_ids {
            if self.store.gene(*id).is_err() {
                return Err(EngineError::PopulationSizeInvalid {
                    reason: format!("membership references unknown gene {id}"),
                });
            }
        }
        let average_fitness = self.average_fitness(&gene_ids)?;

        let id = self.store.next_population_id();
        let population = Population {
            id,
            gene_ids,
            generation: 0,
            average_fitness,
            evolution_operator: caller,
        };
        self.store
            .insert_population(population)
            .map_err(Self::invariant)?;
        self.journal.append(RegistryEvent::PopulationEvolved {
            id,
            generation: 0,
            average_fitness,
        });
        self.step = next_step;

        debug!(%id, operator = %caller, average_fitness, "population created");
        Ok(id)
    }

    /// Run one evolution step over a population.
    ///
    /// Exactly one base pseudo-random draw is taken for the entire step.
    /// Each of `len` breeding rounds runs two tournaments whose candidate
    /// indices derive from that draw via modular offsets; the winners
    /// breed through the same recombination as [`crossover`], each
    /// offspring emitting [`RegistryEvent::GeneCreated`] and
    /// [`RegistryEvent::GeneEvolved`]. Membership is then replaced with
    /// the offspring, generation increments by one, average fitness is
    /// recomputed, and [`RegistryEvent::PopulationEvolved`] is emitted
    /// last.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the population does not exist,
    /// or [`EngineError::NotAuthorized`] if the caller is not its
    /// evolution operator.
    ///
    /// [`crossover`]: EvolutionEngine::crossover
    pub fn evolve_population(
        &mut self,
        caller: ActorId,
        population_id: PopulationId,
    ) -> Result<(), EngineError> {
        let next_step = self.next_step()?;

        let population = self
            .store
            .population(population_id)
            .map_err(EngineError::NotFound)?;
        if caller != population.evolution_operator {
            return Err(EngineError::NotAuthorized {
                caller,
                action: "evolve this population",
            });
        }
        let member_ids = population.gene_ids.clone();
        let next_generation = population.generation.checked_add(1).ok_or_else(|| {
            EngineError::InvariantViolation {
                context: String::from("population generation overflow"),
            }
        })?;
        let contenders = self.member_snapshot(population_id, &member_ids)?;

        // One draw for the whole step; tournaments and mutation both
        // expand from it.
        let base_draw = self.entropy.base_draw(&DrawContext {
            step: next_step,
            caller,
            state_digest: self.store.state_digest(),
        });
        let mut stream = StepRng::new(base_draw);

        let mut offspring_ids = Vec::with_capacity(contenders.len());
        for round in 0..contenders.len() {
            let round_index = u64::try_from(round).unwrap_or(u64::MAX);
            let first = selection::tournament(&contenders, base_draw, round_index, 0)
                .ok_or_else(Self::empty_tournament)?;
            let second = selection::tournament(&contenders, base_draw, round_index, 1)
                .ok_or_else(Self::empty_tournament)?;
            let generation = Self::offspring_generation(first.generation, second.generation)?;
            let dna_sequence =
                genetics::recombine(&first.dna, &second.dna, &self.policy, &mut stream);
            let offspring =
                self.commit_offspring(caller, first.id, second.id, generation, dna_sequence)?;
            offspring_ids.push(offspring);
        }

        let average_fitness = self.average_fitness(&offspring_ids)?;
        let rounds = offspring_ids.len();
        let record = self
            .store
            .population_mut(population_id)
            .map_err(Self::invariant)?;
        record.gene_ids = offspring_ids;
        record.generation = next_generation;
        record.average_fitness = average_fitness;
        self.journal.append(RegistryEvent::PopulationEvolved {
            id: population_id,
            generation: next_generation,
            average_fitness,
        });
        self.step = next_step;

        info!(
            %population_id,
            generation = next_generation,
            average_fitness,
            rounds,
            "population evolved"
        );
        Ok(())
    }

    // -----------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------

    /// The step number the next applied operation will carry.
    fn next_step(&self) -> Result<u64, EngineError> {
        self.step
            .checked_add(1)
            .ok_or_else(|| EngineError::InvariantViolation {
                context: String::from("step counter overflow"),
            })
    }

    /// Map a bookkeeping-layer failure to an internal invariant violation.
    fn invariant(source: RegistryError) -> EngineError {
        EngineError::InvariantViolation {
            context: source.to_string(),
        }
    }

    /// Error for a tournament over an empty membership (unreachable:
    /// populations are non-empty by construction).
    fn empty_tournament() -> EngineError {
        EngineError::InvariantViolation {
            context: String::from("tournament over empty membership"),
        }
    }

    /// Offspring generation: one above the older parent.
    fn offspring_generation(first: u32, second: u32) -> Result<u32, EngineError> {
        first
            .max(second)
            .checked_add(1)
            .ok_or_else(|| EngineError::InvariantViolation {
                context: String::from("offspring generation overflow"),
            })
    }

    /// Register an offspring gene and journal its creation events.
    fn commit_offspring(
        &mut self,
        caller: ActorId,
        parent_a: GeneId,
        parent_b: GeneId,
        generation: u32,
        dna_sequence: DnaSequence,
    ) -> Result<GeneId, EngineError> {
        let id = self.store.next_gene_id();
        let gene = Gene {
            id,
            dna_sequence,
            creator: caller,
            generation,
            fitness: 0,
            is_alive: true,
            parent_a: Some(parent_a),
            parent_b: Some(parent_b),
            achieved_omega_prime: false,
        };
        self.store.insert_gene(gene).map_err(Self::invariant)?;
        self.journal.append(RegistryEvent::GeneCreated {
            id,
            creator: caller,
            dna_sequence,
        });
        self.journal.append(RegistryEvent::GeneEvolved {
            offspring: id,
            parent_a,
            parent_b,
            generation,
        });
        Ok(id)
    }

    /// Snapshot a population's members for the tournaments.
    fn member_snapshot(
        &self,
        population_id: PopulationId,
        member_ids: &[GeneId],
    ) -> Result<Vec<Contender>, EngineError> {
        let mut contenders = Vec::with_capacity(member_ids.len());
        for id in member_ids {
            let gene =
                self.store
                    .gene(*id)
                    .map_err(|source| EngineError::InvariantViolation {
                        context: format!(
                            "population {population_id} references missing gene: {source}"
                        ),
                    })?;
            contenders.push(Contender {
                id: *id,
                fitness: gene.fitness,
                generation: gene.generation,
                dna: gene.dna_sequence,
            });
        }
        Ok(contenders)
    }

    /// Truncated integer mean of the given genes' current fitness.
    fn average_fitness(&self, gene_ids: &[GeneId]) -> Result<u64, EngineError> {
        let mut sum: u128 = 0;
        for id in gene_ids {
            let gene = self.store.gene(*id).map_err(Self::invariant)?;
            sum = sum
                .checked_add(u128::from(gene.fitness))
                .ok_or_else(|| EngineError::InvariantViolation {
                    context: String::from("fitness sum overflow"),
                })?;
        }
        let count = u128::try_from(gene_ids.len()).unwrap_or(u128::MAX);
        let average = sum
            .checked_div(count)
            .ok_or_else(|| EngineError::InvariantViolation {
                context: String::from("average of empty membership"),
            })?;
        u64::try_from(average).map_err(|source| EngineError::InvariantViolation {
            context: format!("average fitness out of range: {source}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EvolutionEngine {
        EvolutionEngine::new(ActorId::new())
    }

    #[test]
    fn genesis_gene_has_expected_shape() {
        let mut engine = engine();
        let caller = ActorId::new();
        let dna = DnaSequence::derive("GENESIS");

        let id = engine.create_genesis(caller, dna);
        assert_eq!(id.ok(), Some(GeneId::new(0)));

        if let Ok(gene) = engine.gene(GeneId::new(0)) {
            assert_eq!(gene.dna_sequence, dna);
            assert_eq!(gene.creator, caller);
            assert_eq!(gene.generation, 0);
            assert_eq!(gene.fitness, 0);
            assert!(gene.is_alive);
            assert!(gene.is_genesis());
            assert!(!gene.achieved_omega_prime);
        }
    }

    #[test]
    fn genesis_tracks_user_genes() {
        let mut engine = engine();
        let caller = ActorId::new();
        let _ = engine.create_genesis(caller, DnaSequence::derive("GENESIS"));

        assert_eq!(engine.user_genes(caller), &[GeneId::new(0)]);
        assert_eq!(engine.total_genes(), 1);
    }

    #[test]
    fn crossover_links_parents() {
        let mut engine = engine();
        let caller = ActorId::new();
        let _ = engine.create_genesis(caller, DnaSequence::derive("PARENT1"));
        let _ = engine.create_genesis(caller, DnaSequence::derive("PARENT2"));

        let offspring = engine.crossover(caller, GeneId::new(0), GeneId::new(1));
        assert_eq!(offspring.ok(), Some(GeneId::new(2)));

        if let Ok(gene) = engine.gene(GeneId::new(2)) {
            assert_eq!(gene.generation, 1);
            assert_eq!(gene.parent_a, Some(GeneId::new(0)));
            assert_eq!(gene.parent_b, Some(GeneId::new(1)));
            assert_eq!(gene.creator, caller);
        }
    }

    #[test]
    fn crossover_requires_living_parents() {
        let mut engine = engine();
        let caller = ActorId::new();
        let _ = engine.create_genesis(caller, DnaSequence::derive("PARENT1"));
        let _ = engine.create_genesis(caller, DnaSequence::derive("PARENT2"));
        let _ = engine.terminate_gene(caller, GeneId::new(0));

        let result = engine.crossover(caller, GeneId::new(0), GeneId::new(1));
        assert!(matches!(
            result,
            Err(EngineError::ParentsNotAlive {
                parent_a_alive: false,
                parent_b_alive: true,
                ..
            })
        ));
        // No gene id was consumed by the failed attempt.
        assert_eq!(engine.total_genes(), 2);
    }

    #[test]
    fn owner_may_update_any_gene() {
        let owner = ActorId::new();
        let mut engine = EvolutionEngine::new(owner);
        let creator = ActorId::new();
        let _ = engine.create_genesis(creator, DnaSequence::derive("GENESIS"));

        assert!(engine.update_fitness(owner, GeneId::new(0), 500).is_ok());
        assert_eq!(engine.gene(GeneId::new(0)).map(|g| g.fitness).ok(), Some(500));
    }

    #[test]
    fn stranger_may_not_update_fitness() {
        let mut engine = engine();
        let creator = ActorId::new();
        let stranger = ActorId::new();
        let _ = engine.create_genesis(creator, DnaSequence::derive("GENESIS"));

        let result = engine.update_fitness(stranger, GeneId::new(0), 500);
        assert!(matches!(result, Err(EngineError::NotAuthorized { .. })));
        assert_eq!(engine.gene(GeneId::new(0)).map(|g| g.fitness).ok(), Some(0));
    }

    #[test]
    fn termination_is_idempotent() {
        let mut engine = engine();
        let caller = ActorId::new();
        let _ = engine.create_genesis(caller, DnaSequence::derive("GENESIS"));

        assert!(engine.terminate_gene(caller, GeneId::new(0)).is_ok());
        assert!(engine.terminate_gene(caller, GeneId::new(0)).is_ok());
        assert_eq!(engine.gene(GeneId::new(0)).map(|g| g.is_alive).ok(), Some(false));
    }

    #[test]
    fn empty_membership_rejected() {
        let mut engine = engine();
        let result = engine.create_population(ActorId::new(), Vec::new());
        assert!(matches!(
            result,
            Err(EngineError::PopulationSizeInvalid { .. })
        ));
    }

    #[test]
    fn dangling_membership_rejected() {
        let mut engine = engine();
        let caller = ActorId::new();
        let _ = engine.create_genesis(caller, DnaSequence::derive("GENESIS"));

        let result = engine.create_population(caller, vec![GeneId::new(0), GeneId::new(9)]);
        assert!(matches!(
            result,
            Err(EngineError::PopulationSizeInvalid { .. })
        ));
        assert!(engine.population(PopulationId::new(0)).is_err());
    }

    #[test]
    fn duplicate_membership_allowed() {
        let mut engine = engine();
        let caller = ActorId::new();
        let _ = engine.create_genesis(caller, DnaSequence::derive("GENESIS"));

        let result = engine.create_population(caller, vec![GeneId::new(0), GeneId::new(0)]);
        assert!(result.is_ok());
    }

    #[test]
    fn evolve_requires_the_operator() {
        let mut engine = engine();
        let operator = ActorId::new();
        let stranger = ActorId::new();
        let _ = engine.create_genesis(operator, DnaSequence::derive("GENESIS"));
        let population = engine.create_population(operator, vec![GeneId::new(0)]);
        assert!(population.is_ok());

        let result = engine.evolve_population(stranger, PopulationId::new(0));
        assert!(matches!(result, Err(EngineError::NotAuthorized { .. })));
    }

    #[test]
    fn evolve_missing_population_fails() {
        let mut engine = engine();
        let result = engine.evolve_population(ActorId::new(), PopulationId::new(0));
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }
}
