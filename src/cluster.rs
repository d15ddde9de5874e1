//! Greedy representative clustering on top of [`SeqIndex`].
//!
//! A run dereplicates the input into unique sequences, drops uniques below
//! the abundance cutoff and clusters the rest in decreasing abundance. A
//! unique joins the first representative returned by the search, otherwise
//! it founds a new cluster and becomes a searchable representative. Dropped
//! uniques are then mapped onto the representatives without founding
//! clusters of their own.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::{debug, info};

use crate::index::{IndexError, SeqIndex};
use crate::search::{SearchError, SearchParams};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClusterError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Clustering configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterConfig {
    search: SearchParams,
    min_size: usize,
    prefix_dereplication: bool,
    derep_fast_len: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            search: SearchParams::default(),
            min_size: 2,
            prefix_dereplication: false,
            derep_fast_len: 200,
        }
    }
}

impl ClusterConfig {
    /// Ranked search parameters used to find a representative.
    pub fn search(mut self, p: SearchParams) -> Self {
        self.search = p;
        self
    }
    /// Uniques with a lower abundance do not found clusters in [`Clusterer::cluster`].
    pub fn min_size(mut self, n: usize) -> Self {
        self.min_size = n;
        self
    }
    /// Try an exact prefix match against representatives before alignment.
    pub fn prefix_dereplication(mut self, yes: bool) -> Self {
        self.prefix_dereplication = yes;
        self
    }
    /// Bases of the sequence compared by prefix dereplication.
    pub fn derep_fast_len(mut self, n: usize) -> Self {
        self.derep_fast_len = n;
        self
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }
}

/// A distinct sequence and the ids of every input record carrying it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unique {
    seq: String,
    // first occurrence first
    ids: Vec<String>,
}

impl Unique {
    pub fn new(id: impl Into<String>, seq: impl Into<String>) -> Self {
        Self {
            seq: seq.into(),
            ids: vec![id.into()],
        }
    }

    /// Id of the first record with this sequence.
    pub fn id(&self) -> &str {
        &self.ids[0]
    }

    pub fn seq(&self) -> &str {
        &self.seq
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn abundance(&self) -> usize {
        self.ids.len()
    }
}

/// Collapse identical sequences, ordered by decreasing abundance.
///
/// Equal abundances keep first-occurrence order.
///
/// # Errors
///
/// [`IndexError::DuplicateId`] if an id occurs twice.
pub fn dereplicate<I, S, T>(records: I) -> Result<Vec<Unique>, IndexError>
where
    I: IntoIterator<Item = (S, T)>,
    S: Into<String>,
    T: Into<String>,
{
    let mut uniques: Vec<Unique> = Vec::new();
    let mut slot_of: FxHashMap<String, usize> = FxHashMap::default();
    let mut ids: FxHashSet<String> = FxHashSet::default();

    for (id, seq) in records {
        let id: String = id.into();
        let seq: String = seq.into();
        if !ids.insert(id.clone()) {
            return Err(IndexError::DuplicateId(id));
        }
        match slot_of.get(&seq).copied() {
            Some(slot) => uniques[slot].ids.push(id),
            None => {
                slot_of.insert(seq.clone(), uniques.len());
                uniques.push(Unique::new(id, seq));
            }
        }
    }

    uniques.sort_by(|a, b| b.abundance().cmp(&a.abundance()));
    debug!(records = ids.len(), uniques = uniques.len(), "dereplicated");
    Ok(uniques)
}

/// Outcome of adding one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assignment {
    /// The record founded a new cluster.
    Representative,
    /// The record joined the cluster of `rep`.
    Member { rep: String },
}

/// A cluster, representative first in `members`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    members: Vec<String>,
}

impl Cluster {
    /// A singleton cluster around `rep`.
    pub fn new(rep: impl Into<String>) -> Self {
        Self {
            members: vec![rep.into()],
        }
    }

    pub fn push(&mut self, member: impl Into<String>) {
        self.members.push(member.into());
    }

    pub fn representative(&self) -> &str {
        &self.members[0]
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Result of a clustering run.
#[derive(Clone, Debug)]
pub struct Clustering {
    /// Clusters in creation order.
    pub clusters: Vec<Cluster>,
    /// Every representative.
    pub representatives: SeqIndex,
    /// Ids below the abundance cutoff that matched no representative.
    pub unassigned: Vec<String>,
}

/// Incremental greedy clusterer.
pub struct Clusterer {
    cfg: ClusterConfig,
    reps: SeqIndex,
    clusters: Vec<Cluster>,
    // rep id -> position in `clusters`
    slot_of: FxHashMap<String, usize>,
    seen: FxHashSet<String>,
}

impl Clusterer {
    /// # Errors
    ///
    /// [`ClusterError::Search`] if the similarity threshold is out of range.
    pub fn new(cfg: ClusterConfig) -> Result<Self, ClusterError> {
        cfg.search.validate()?;
        Ok(Self {
            cfg,
            reps: SeqIndex::new(),
            clusters: Vec::new(),
            slot_of: Default::default(),
            seen: Default::default(),
        })
    }

    /// Assign `seq` to an existing cluster or open a new one.
    ///
    /// # Errors
    ///
    /// [`IndexError::DuplicateId`] if `id` was already added.
    pub fn add(&mut self, id: &str, seq: &str) -> Result<Assignment, ClusterError> {
        self.add_unique(&Unique::new(id, seq))
    }

    /// Assign a dereplicated sequence; all of its ids land in one cluster.
    ///
    /// # Errors
    ///
    /// [`IndexError::DuplicateId`] if any of its ids was already added.
    pub fn add_unique(&mut self, unique: &Unique) -> Result<Assignment, ClusterError> {
        self.check_unseen(unique)?;

        let assignment = match self.find_rep(unique.seq()) {
            Some(rep) => {
                debug!(id = unique.id(), rep = %rep, "joined cluster");
                self.join(&rep, unique);
                Assignment::Member { rep }
            }
            None => {
                self.reps.insert(unique.id(), unique.seq())?;
                self.slot_of.insert(unique.id().to_owned(), self.clusters.len());
                let mut cluster = Cluster::new(unique.id());
                for id in &unique.ids()[1..] {
                    cluster.push(id.as_str());
                }
                self.clusters.push(cluster);
                self.seen.extend(unique.ids().iter().cloned());
                debug!(id = unique.id(), abundance = unique.abundance(), "new representative");
                Assignment::Representative
            }
        };
        Ok(assignment)
    }

    /// Run a full clustering over `records`.
    ///
    /// Uniques reaching `min_size` are clustered in decreasing abundance.
    /// The others join the representative found for them, or are reported
    /// in [`Clustering::unassigned`].
    ///
    /// # Errors
    ///
    /// [`IndexError::DuplicateId`] on a repeated record id.
    pub fn cluster<I, S, T>(mut self, records: I) -> Result<Clustering, ClusterError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let uniques = dereplicate(records)?;
        let min_size = self.cfg.min_size;
        let (abundant, rare): (Vec<Unique>, Vec<Unique>) = uniques
            .into_iter()
            .partition(|u| u.abundance() >= min_size);

        for unique in &abundant {
            self.add_unique(unique)?;
        }

        let mut unassigned = Vec::new();
        let mut mapped = 0usize;
        for unique in &rare {
            self.check_unseen(unique)?;
            match self.find_rep(unique.seq()) {
                Some(rep) => {
                    self.join(&rep, unique);
                    mapped += 1;
                }
                None => unassigned.extend(unique.ids().iter().cloned()),
            }
        }
        info!(
            abundant = abundant.len(),
            below_min_size = rare.len(),
            mapped,
            unassigned = unassigned.len(),
            min_size,
            "mapped low-abundance sequences"
        );

        let mut done = self.finish();
        done.unassigned = unassigned;
        Ok(done)
    }

    /// Representatives indexed so far.
    pub fn representatives(&self) -> &SeqIndex {
        &self.reps
    }

    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Clusters in creation order.
    pub fn finish(self) -> Clustering {
        info!(
            sequences = self.seen.len(),
            clusters = self.clusters.len(),
            "clustering finished"
        );
        Clustering {
            clusters: self.clusters,
            representatives: self.reps,
            unassigned: Vec::new(),
        }
    }

    fn check_unseen(&self, unique: &Unique) -> Result<(), IndexError> {
        match unique.ids().iter().find(|id| self.seen.contains(id.as_str())) {
            Some(id) => Err(IndexError::DuplicateId(id.clone())),
            None => Ok(()),
        }
    }

    fn find_rep(&self, seq: &str) -> Option<String> {
        if self.cfg.prefix_dereplication {
            let key = seq.get(..self.cfg.derep_fast_len).unwrap_or(seq);
            if let Some(rep) = self.reps.prefix_search(key).into_iter().next() {
                return Some(rep);
            }
        }
        self.reps.ranked_search(seq, &self.cfg.search).into_iter().next()
    }

    fn join(&mut self, rep: &str, unique: &Unique) {
        let slot = self.slot_of[rep];
        for id in unique.ids() {
            self.clusters[slot].push(id.as_str());
        }
        self.seen.extend(unique.ids().iter().cloned());
    }
}
