//! Cheap k-mer containment scoring between two sketches.
//!
//! The score ranks candidates before the exact alignment check; it is never
//! an accept/reject decision on its own.

use std::cmp::Ordering;

use crate::align::SimilarityError;
use crate::encode::KMER_LEN;
use crate::sketch::KmerSketch;

/// Containment-weighted overlap of two sketches.
///
/// Sums `min(count_a, count_b)` over shared k-mers and divides by the k-mer
/// count of the shorter raw sequence (`min(len_a, len_b) - KMER_LEN + 1`).
///
/// # Errors
///
/// [`SimilarityError::Undefined`] if the shorter sequence has no k-mers.
pub fn overlap_score(
    a: &KmerSketch,
    b: &KmerSketch,
    len_a: usize,
    len_b: usize,
) -> Result<f64, SimilarityError> {
    let shorter = len_a.min(len_b);
    if shorter < KMER_LEN {
        return Err(SimilarityError::Undefined { len_a, len_b });
    }
    let shared: usize = merge_shared(a, b)
        .map(|(ca, cb)| ca.min(cb) as usize)
        .sum();
    Ok(shared as f64 / (shorter - KMER_LEN + 1) as f64)
}

/// Number of distinct k-mers present in both sketches.
pub fn common_kmers(a: &KmerSketch, b: &KmerSketch) -> usize {
    merge_shared(a, b).count()
}

/// Sorted-merge intersection, yielding the count pair of every shared k-mer.
fn merge_shared<'a>(a: &'a KmerSketch, b: &'a KmerSketch) -> impl Iterator<Item = (u8, u8)> + 'a {
    let (xa, xb) = (a.entries(), b.entries());
    let (mut i, mut j) = (0usize, 0usize);
    std::iter::from_fn(move || {
        while i < xa.len() && j < xb.len() {
            match xa[i].code.cmp(&xb[j].code) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    let pair = (xa[i].count, xb[j].count);
                    i += 1;
                    j += 1;
                    return Some(pair);
                }
            }
        }
        None
    })
}
