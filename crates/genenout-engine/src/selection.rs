//! Tournament selection over population members.
//!
//! All tournament rounds of one evolution step derive their candidate
//! indices from a **single** base draw via modular offsets -- there is no
//! per-round randomness. For breeding round `i` and parent slot `s`, the
//! two candidate offsets are `base + 4*i + 2*s` and `base + 4*i + 2*s + 1`,
//! each reduced modulo the membership size. The higher-fitness candidate
//! wins; ties go to the lower gene id, so selection is fully deterministic.

use core::cmp::Ordering;

use genenout_types::{DnaSequence, GeneId};

/// Snapshot of one population member entering the tournaments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contender {
    /// The member gene's id.
    pub id: GeneId,
    /// Fitness at the start of the evolution step.
    pub fitness: u64,
    /// Generation at the start of the evolution step.
    pub generation: u32,
    /// DNA fingerprint used for breeding.
    pub dna: DnaSequence,
}

/// Run one tournament and return the winning contender.
///
/// `round` is the breeding round index, `slot` selects the first or second
/// parent (0 or 1). Returns `None` only for an empty membership, which the
/// engine rules out before evolving.
#[must_use]
pub fn tournament(
    contenders: &[Contender],
    base_draw: u64,
    round: u64,
    slot: u64,
) -> Option<&Contender> {
    let first_offset = round.wrapping_mul(4).wrapping_add(slot.wrapping_mul(2));
    let second_offset = first_offset.wrapping_add(1);

    let first = candidate(contenders, base_draw, first_offset)?;
    let second = candidate(contenders, base_draw, second_offset)?;
    Some(winner(first, second))
}

/// Resolve the contender at a modular offset from the base draw.
fn candidate(contenders: &[Contender], base_draw: u64, offset: u64) -> Option<&Contender> {
    let len = u64::try_from(contenders.len()).ok()?;
    let index = base_draw.wrapping_add(offset).checked_rem(len)?;
    contenders.get(usize::try_from(index).ok()?)
}

/// Compare two contenders: higher fitness wins, ties go to the lower id.
fn winner<'a>(first: &'a Contender, second: &'a Contender) -> &'a Contender {
    match first.fitness.cmp(&second.fitness) {
        Ordering::Greater => first,
        Ordering::Less => second,
        Ordering::Equal => {
            if first.id <= second.id {
                first
            } else {
                second
            }
        }
    }
}
