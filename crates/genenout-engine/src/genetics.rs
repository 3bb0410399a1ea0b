//! DNA recombination and mutation.
//!
//! Offspring DNA is a single-cut-point byte recombination of the two parent
//! sequences: the first `crossover_rate` percent of bytes come from the
//! first parent, the remainder from the second. Each byte then has a
//! `mutation_rate` percent chance of being replaced by a byte drawn from
//! the operation's deterministic stream.
//!
//! Only structural properties of offspring (generation, parent links) are
//! externally observable; this byte-level scheme is the documented choice
//! and is fully determined by the stream it is given.

use rand::Rng;

use genenout_types::{DNA_WIDTH, DnaSequence};

use crate::policy::EvolutionPolicy;

/// Breed an offspring fingerprint from two parent sequences.
///
/// Deterministic given the stream: the same parents, policy, and stream
/// state always produce the same offspring.
#[must_use]
pub fn recombine(
    parent_a: &DnaSequence,
    parent_b: &DnaSequence,
    policy: &EvolutionPolicy,
    rng: &mut impl Rng,
) -> DnaSequence {
    let cut = cut_point(policy.crossover_rate);
    let mut child = [0_u8; DNA_WIDTH];

    let parent_pairs = parent_a.as_bytes().iter().zip(parent_b.as_bytes().iter());
    for (index, (slot, (byte_a, byte_b))) in child.iter_mut().zip(parent_pairs).enumerate() {
        *slot = if index < cut { *byte_a } else { *byte_b };
        if rng.random_range(0..100_u8) < policy.mutation_rate {
            *slot = rng.random();
        }
    }

    DnaSequence::from_bytes(child)
}

/// Byte offset where inheritance switches from the first parent to the
/// second, clamped to the sequence width.
fn cut_point(crossover_rate: u8) -> usize {
    DNA_WIDTH
        .saturating_mul(usize::from(crossover_rate))
        .checked_div(100)
        .unwrap_or(0)
        .min(DNA_WIDTH)
}
