//! Demonstration driver for the GENENOUT gene registry.
//!
//! Walks the engine's public surface end to end: genesis creation,
//! crossover, fitness updates with an Omega-Prime achievement, population
//! formation, and one evolution step. Every value printed here comes from
//! the read surface -- the driver holds no state of its own.
//!
//! # Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load the evolution policy (`genenout-policy.yaml` if present)
//! 3. Create the engine and two genesis genes
//! 4. Breed an offspring and update fitness scores
//! 5. Report achievement statistics
//! 6. Form a population and evolve it once

use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use genenout_engine::{EvolutionEngine, EvolutionPolicy};
use genenout_types::{ActorId, DnaSequence, PopulationId};

/// Path checked for an optional policy override file.
const POLICY_PATH: &str = "genenout-policy.yaml";

/// Application entry point for the demonstration driver.
///
/// # Errors
///
/// Returns an error if any engine operation or the policy load fails.
fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("genenout-demo starting");

    // 2. Load the evolution policy.
    let policy = load_policy()?;
    info!(
        omega_prime_threshold = policy.omega_prime_threshold,
        mutation_rate = policy.mutation_rate,
        crossover_rate = policy.crossover_rate,
        max_population_size = policy.max_population_size,
        "Policy loaded"
    );

    // 3. Create the engine and two genesis genes.
    let owner = ActorId::new();
    let user = ActorId::new();
    let mut engine = EvolutionEngine::with_policy(owner, policy);
    info!(%owner, %user, "Engine initialized");

    let alpha = engine.create_genesis(user, DnaSequence::derive("ALPHA_GENE"))?;
    let beta = engine.create_genesis(user, DnaSequence::derive("BETA_GENE"))?;
    for id in [alpha, beta] {
        let gene = engine.gene(id)?;
        info!(%id, dna = %gene.dna_sequence, generation = gene.generation, "Genesis gene created");
    }

    // 4. Breed an offspring and update fitness scores.
    let offspring = engine.crossover(user, alpha, beta)?;
    let record = engine.gene(offspring)?;
    info!(
        %offspring,
        dna = %record.dna_sequence,
        generation = record.generation,
        parent_a = %alpha,
        parent_b = %beta,
        "Crossover complete"
    );

    engine.update_fitness(user, alpha, 750_000)?;
    engine.update_fitness(user, beta, 850_000)?;
    engine.update_fitness(user, offspring, 1_200_000)?;
    for id in [alpha, beta, offspring] {
        let gene = engine.gene(id)?;
        info!(%id, fitness = gene.fitness, omega_prime = gene.achieved_omega_prime, "Fitness updated");
    }

    // 5. Report achievement statistics.
    let total = engine.total_genes();
    let achieved = engine.omega_prime_count();
    info!(
        total_genes = total,
        omega_prime_count = achieved,
        "Omega-Prime statistics"
    );

    // 6. Form a population and evolve it once.
    let mut members = vec![alpha, beta, offspring];
    for index in 0..3_u64 {
        let label = format!("POPULATION_GENE_{index}");
        let id = engine.create_genesis(user, DnaSequence::derive(&label))?;
        let fitness = index
            .checked_add(1)
            .and_then(|n| n.checked_mul(200_000))
            .context("fitness computation overflow")?;
        engine.update_fitness(user, id, fitness)?;
        members.push(id);
    }

    let population = engine.create_population(user, members)?;
    report_population(&engine, population, "Population created")?;

    engine.evolve_population(user, population)?;
    report_population(&engine, population, "Population evolved")?;

    info!(
        total_genes = engine.total_genes(),
        omega_prime_count = engine.omega_prime_count(),
        events = engine.events().len(),
        user_genes = engine.user_genes(user).len(),
        "Final statistics"
    );

    Ok(())
}

/// Load the policy override file if present, otherwise the defaults.
fn load_policy() -> anyhow::Result<EvolutionPolicy> {
    let path = Path::new(POLICY_PATH);
    if path.exists() {
        EvolutionPolicy::from_yaml_file(path)
            .with_context(|| format!("failed to load policy from {POLICY_PATH}"))
    } else {
        Ok(EvolutionPolicy::default())
    }
}

/// Log a population's current record.
fn report_population(
    engine: &EvolutionEngine,
    id: PopulationId,
    message: &'static str,
) -> anyhow::Result<()> {
    let record = engine.population(id)?;
    info!(
        %id,
        generation = record.generation,
        average_fitness = record.average_fitness,
        size = record.gene_ids.len(),
        "{message}"
    );
    Ok(())
}
