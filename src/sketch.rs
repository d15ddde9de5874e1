//! KmerSketch: sorted, deduplicated 7-mer codes with saturating counts.
//!
//! A sketch is the compositional signature of a sequence. Two sketches are
//! compared by a linear sorted merge (see [`crate::overlap`]) instead of a
//! quadratic alignment.

use crate::encode::kmer_codes;
use crate::radix::radix_sort_u16;

/// One sketch entry: a packed k-mer and its occurrence count (capped at 255).
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, Hash)]
pub struct KmerCount {
    /// Packed k-mer code, `< 4^KMER_LEN`.
    pub code: u16,
    /// Occurrences in the source sequence, saturating at `u8::MAX`.
    pub count: u8,
}

/// Sorted distinct k-mers of a sequence.
///
/// Entries are strictly ascending by `code`. Sequences shorter than
/// [`crate::KMER_LEN`] have an empty sketch.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct KmerSketch {
    entries: Vec<KmerCount>,
}

impl KmerSketch {
    /// Build the sketch of `seq`.
    pub fn build(seq: &[u8]) -> Self {
        let mut codes: Vec<u16> = kmer_codes(seq).collect();
        if codes.is_empty() {
            return Self::default();
        }
        radix_sort_u16(&mut codes);

        let mut entries: Vec<KmerCount> = Vec::new();
        for code in codes {
            if let Some(last) = entries.last_mut() {
                if last.code == code {
                    last.count = last.count.saturating_add(1);
                    continue;
                }
            }
            entries.push(KmerCount { code, count: 1 });
        }
        entries.shrink_to_fit();
        Self { entries }
    }

    /// Sketch entries in ascending code order.
    #[inline]
    pub fn entries(&self) -> &[KmerCount] {
        &self.entries
    }

    /// Number of distinct k-mers.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total k-mer occurrences after saturation.
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }
}
