//! The append-only event journal.
//!
//! Every successful state-changing operation appends its observable events
//! here, in the order the operation defines, before returning. Entries are
//! never modified, removed, or reordered, so a subscriber that remembers
//! its last offset can consume the log incrementally.

use genenout_types::RegistryEvent;

/// Ordered, append-only log of [`RegistryEvent`] values.
#[derive(Debug, Default)]
pub struct EventJournal {
    /// All events, in emission order.
    entries: Vec<RegistryEvent>,
}

impl EventJournal {
    /// Create a new empty journal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of events recorded so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal has no events.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an event to the log.
    pub fn append(&mut self, event: RegistryEvent) {
        self.entries.push(event);
    }

    /// All events, in emission order.
    #[must_use]
    pub fn events(&self) -> &[RegistryEvent] {
        &self.entries
    }

    /// Events recorded at or after the given offset.
    ///
    /// An offset past the end yields an empty slice, so subscribers can
    /// poll with their last-seen length without bounds bookkeeping.
    #[must_use]
    pub fn events_since(&self, offset: usize) -> &[RegistryEvent] {
        self.entries.get(offset..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use genenout_types::{ActorId, DnaSequence, GeneId};

    use super::*;

    fn created(id: u64) -> RegistryEvent {
        RegistryEvent::GeneCreated {
            id: GeneId::new(id),
            creator: ActorId::new(),
            dna_sequence: DnaSequence::derive("JOURNAL"),
        }
    }

    #[test]
    fn new_journal_is_empty() {
        let journal = EventJournal::new();
        assert!(journal.is_empty());
        assert_eq!(journal.len(), 0);
        assert!(journal.events().is_empty());
    }

    #[test]
    fn append_preserves_order() {
        let mut journal = EventJournal::new();
        journal.append(created(0));
        journal.append(created(1));

        let ids: Vec<_> = journal
            .events()
            .iter()
            .filter_map(|event| match event {
                RegistryEvent::GeneCreated { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![GeneId::new(0), GeneId::new(1)]);
    }

    #[test]
    fn events_since_slices_the_tail() {
        let mut journal = EventJournal::new();
        journal.append(created(0));
        journal.append(created(1));
        journal.append(created(2));

        assert_eq!(journal.events_since(0).len(), 3);
        assert_eq!(journal.events_since(2).len(), 1);
        assert!(journal.events_since(3).is_empty());
        assert!(journal.events_since(100).is_empty());
    }
}
