//! SeqIndex: owned, identifier-keyed collection of sketched sequences.
//!
//! Records are kept in insertion order; removal preserves the relative order
//! of the remaining records. That order is the base order of every scan and
//! the tie-break of ranked search.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::sketch::KmerSketch;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors returned by SeqIndex mutation.
pub enum IndexError {
    /// Insert of an id that is already stored.
    #[error("sequence id already indexed: {0}")]
    DuplicateId(String),
    /// Remove of an id that is not stored.
    #[error("sequence id not indexed: {0}")]
    MissingId(String),
}

/// An indexed sequence: id, raw sequence and its k-mer sketch.
///
/// Built once on insertion and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceRecord {
    id: String,
    seq: String,
    sketch: KmerSketch,
}

impl SequenceRecord {
    /// Sketch `seq` and wrap it with its id.
    pub fn new(id: impl Into<String>, seq: impl Into<String>) -> Self {
        let seq = seq.into();
        let sketch = KmerSketch::build(seq.as_bytes());
        Self {
            id: id.into(),
            seq,
            sketch,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn seq(&self) -> &str {
        &self.seq
    }

    #[inline]
    pub fn sketch(&self) -> &KmerSketch {
        &self.sketch
    }

    /// Length of the raw sequence in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// In-memory sequence index.
#[derive(Clone, Debug, Default)]
pub struct SeqIndex {
    records: Vec<SequenceRecord>,
    slots: FxHashMap<String, usize>,
}

impl SeqIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sketch and store `seq` under `id`.
    ///
    /// # Errors
    ///
    /// [`IndexError::DuplicateId`] if `id` is already stored; the index is
    /// left untouched.
    pub fn insert(&mut self, id: impl Into<String>, seq: impl Into<String>) -> Result<(), IndexError> {
        let id = id.into();
        if self.slots.contains_key(&id) {
            return Err(IndexError::DuplicateId(id));
        }
        let record = SequenceRecord::new(id.clone(), seq);
        debug!(id = %id, len = record.len(), kmers = record.sketch().len(), "indexed sequence");
        self.slots.insert(id, self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Remove and return the record stored under `id`.
    ///
    /// # Errors
    ///
    /// [`IndexError::MissingId`] if `id` is not stored.
    pub fn remove(&mut self, id: &str) -> Result<SequenceRecord, IndexError> {
        let slot = self
            .slots
            .remove(id)
            .ok_or_else(|| IndexError::MissingId(id.to_owned()))?;
        let record = self.records.remove(slot);
        for s in self.slots.values_mut() {
            if *s > slot {
                *s -= 1;
            }
        }
        debug!(id = %id, "removed sequence");
        Ok(record)
    }

    /// Record stored under `id`.
    pub fn get(&self, id: &str) -> Option<&SequenceRecord> {
        self.slots.get(id).map(|&s| &self.records[s])
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, SequenceRecord> {
        self.records.iter()
    }

    /// Ids in index order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(SequenceRecord::id)
    }

    #[inline]
    pub(crate) fn records(&self) -> &[SequenceRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a SeqIndex {
    type Item = &'a SequenceRecord;
    type IntoIter = std::slice::Iter<'a, SequenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
