//! In-memory k-mer sketch index and search core for greedy OTU clustering.
//!
//! - 7-mer sketches (sorted codes + saturating 8-bit counts) built on insert
//! - Containment-style k-mer overlap as a cheap ranking signal
//! - Exact unit-cost global alignment identity as the verifier
//! - Ranked search with consecutive-reject early exit, and exact prefix search
//! - Abundance-ordered greedy clustering driver and cluster/representative writers
//!
//! Index iteration is insertion order; ranked search breaks score ties in
//! that order, so results are deterministic.

pub mod align;
pub mod cluster;
pub mod encode;
mod index;
mod io;
pub mod overlap;
mod radix;
mod search;
pub mod sketch;

pub use align::{AlignmentCounts, SimilarityError, align_counts, global_similarity};
pub use cluster::{
    Assignment, Cluster, ClusterConfig, ClusterError, Clusterer, Clustering, Unique, dereplicate,
};
pub use encode::KMER_LEN;
pub use index::{IndexError, SeqIndex, SequenceRecord};
pub use io::ClusterWriter;
pub use overlap::{common_kmers, overlap_score};
pub use search::{SearchError, SearchParams};
pub use sketch::{KmerCount, KmerSketch};
