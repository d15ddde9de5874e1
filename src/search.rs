//! Ranked and prefix search over a [`SeqIndex`].
//!
//! Ranked search scores every record by k-mer overlap, sorts descending
//! (stable, so equal scores keep index order), then verifies candidates in
//! that order with the exact alignment identity. The walk stops once
//! `max_rejects` consecutive candidates fail the threshold.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, trace};

use crate::align::global_similarity;
use crate::index::{SeqIndex, SequenceRecord};
use crate::overlap::overlap_score;
use crate::sketch::KmerSketch;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SearchError {
    #[error("similarity threshold must be within [0, 1], got {0}")]
    Threshold(f64),
}

/// Ranked search parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchParams {
    similarity: f64,
    max_rejects: usize,
    parallel: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            similarity: 0.97,
            max_rejects: 8,
            parallel: false,
        }
    }
}

impl SearchParams {
    /// Minimum alignment identity for a hit, in `[0, 1]`.
    pub fn with_similarity(mut self, s: f64) -> Self {
        self.similarity = s;
        self
    }
    /// Consecutive rejections that end the scan (0 stops at the first one).
    pub fn max_rejects(mut self, n: usize) -> Self {
        self.max_rejects = n;
        self
    }
    /// Score candidates on the rayon pool. The verification walk stays sequential.
    pub fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }
    pub fn rejects_limit(&self) -> usize {
        self.max_rejects
    }
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Check the threshold is a number within `[0, 1]`.
    pub fn validate(&self) -> Result<(), SearchError> {
        if (0.0..=1.0).contains(&self.similarity) {
            Ok(())
        } else {
            Err(SearchError::Threshold(self.similarity))
        }
    }
}

impl SeqIndex {
    /// Ids of records whose alignment identity with `query` reaches the
    /// threshold, in descending k-mer overlap order.
    ///
    /// `query` is sketched on the fly and not inserted. An undefined overlap
    /// ranks as `0.0`; an undefined identity counts as a rejection.
    pub fn ranked_search(&self, query: &str, params: &SearchParams) -> Vec<String> {
        let q = query.as_bytes();
        let q_sketch = KmerSketch::build(q);

        let score = |record: &SequenceRecord| -> f64 {
            overlap_score(&q_sketch, record.sketch(), q.len(), record.len()).unwrap_or(0.0)
        };

        // Parallel collect keeps index order, so both paths sort the same input.
        let mut ranked: Vec<(f64, &SequenceRecord)> = if params.is_parallel() {
            self.records().par_iter().map(|r| (score(r), r)).collect()
        } else {
            self.records().iter().map(|r| (score(r), r)).collect()
        };
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        let limit = params.rejects_limit();
        let mut hits = Vec::new();
        let mut rejects = 0usize;
        let mut verified = 0usize;
        for &(kscore, record) in &ranked {
            verified += 1;
            let accepted = match global_similarity(q, record.seq().as_bytes()) {
                Ok(g) => {
                    trace!(id = record.id(), kscore, identity = g, "verified candidate");
                    g >= params.similarity()
                }
                Err(e) => {
                    trace!(id = record.id(), kscore, error = %e, "unverifiable candidate");
                    false
                }
            };
            if accepted {
                hits.push(record.id().to_owned());
                rejects = 0;
            } else {
                rejects += 1;
                // only after a rejection: with limit 0 acceptances keep the walk going
                if rejects >= limit {
                    break;
                }
            }
        }

        debug!(
            candidates = ranked.len(),
            verified,
            hits = hits.len(),
            early_exit = verified < ranked.len(),
            "ranked search"
        );
        hits
    }

    /// Ids of records whose sequence starts with `query`, in index order.
    pub fn prefix_search(&self, query: &str) -> Vec<String> {
        let hits: Vec<String> = self
            .iter()
            .filter(|r| r.seq().starts_with(query))
            .map(|r| r.id().to_owned())
            .collect();
        debug!(hits = hits.len(), "prefix search");
        hits
    }
}
