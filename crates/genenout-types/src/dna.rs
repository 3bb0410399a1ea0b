//! The fixed-width DNA fingerprint carried by every gene.
//!
//! A [`DnaSequence`] is opaque to the engine beyond equality, hashing, and
//! byte access during recombination. Callers supply genesis fingerprints;
//! [`DnaSequence::derive`] provides a deterministic way to produce one from
//! a label.

use serde::{Deserialize, Serialize};

use crate::digest::{fold_bytes, mix64};

/// Width of a DNA fingerprint in bytes.
pub const DNA_WIDTH: usize = 32;

/// A fixed-width binary fingerprint identifying a gene's genetic material.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DnaSequence([u8; DNA_WIDTH]);

impl DnaSequence {
    /// Wrap raw fingerprint bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DNA_WIDTH]) -> Self {
        Self(bytes)
    }

    /// Borrow the fingerprint bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DNA_WIDTH] {
        &self.0
    }

    /// Derive a fingerprint deterministically from a label.
    ///
    /// The label is folded to a 64-bit seed and expanded across the full
    /// width through the [`mix64`] bijection. The same label always yields
    /// the same fingerprint, on every build.
    #[must_use]
    pub fn derive(label: &str) -> Self {
        let seed = fold_bytes(label.as_bytes());
        let mut bytes = [0_u8; DNA_WIDTH];
        for (word_index, chunk) in bytes.chunks_mut(8).enumerate() {
            let word = mix64(seed ^ u64::try_from(word_index).unwrap_or(u64::MAX));
            for (slot, byte) in chunk.iter_mut().zip(word.to_le_bytes().iter()) {
                *slot = *byte;
            }
        }
        Self(bytes)
    }
}

impl core::fmt::Debug for DnaSequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "DnaSequence({self})")
    }
}

impl core::fmt::Display for DnaSequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; DNA_WIDTH]> for DnaSequence {
    fn from(bytes: [u8; DNA_WIDTH]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(DnaSequence::derive("ALPHA_GENE"), DnaSequence::derive("ALPHA_GENE"));
    }

    #[test]
    fn derive_separates_labels() {
        assert_ne!(DnaSequence::derive("ALPHA_GENE"), DnaSequence::derive("BETA_GENE"));
    }

    #[test]
    fn display_is_hex_of_full_width() {
        let dna = DnaSequence::from_bytes([0xAB; DNA_WIDTH]);
        let hex = dna.to_string();
        assert_eq!(hex.len(), DNA_WIDTH.saturating_mul(2));
        assert!(hex.chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn roundtrip_serde() {
        let original = DnaSequence::derive("SERDE");
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<DnaSequence, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }
}
