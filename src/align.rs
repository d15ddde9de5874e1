//! Exact global alignment identity (unit-cost Needleman-Wunsch).
//!
//! Costs: match 0, mismatch 1, gap 1. The traceback only tallies diagonal
//! columns, so the identity is `matches / (matches + mismatches)`; gap
//! columns are left out of the denominator.
//!
//! Back-pointer ties resolve Left, then Up, then Diagonal. The choice changes
//! which columns the traceback lands on, so it is part of the score.

use thiserror::Error;

const MISMATCH: u32 = 1;
const GAP: u32 = 1;

/// Raised when a similarity has no defined value for the given inputs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityError {
    /// No aligned (non-gap) column, or no k-mers in the shorter sequence.
    #[error("similarity undefined for sequence lengths {len_a} and {len_b}")]
    Undefined { len_a: usize, len_b: usize },
}

#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Step {
    Diag,
    Up,
    Left,
}

/// Column tallies along the traceback path.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct AlignmentCounts {
    pub matches: usize,
    pub mismatches: usize,
    /// Gap columns, in either sequence.
    pub gaps: usize,
    len_a: usize,
    len_b: usize,
}

impl AlignmentCounts {
    /// Identity over non-gap columns.
    ///
    /// # Errors
    ///
    /// [`SimilarityError::Undefined`] if the path has no diagonal step.
    pub fn identity(&self) -> Result<f64, SimilarityError> {
        let aligned = self.matches + self.mismatches;
        if aligned == 0 {
            return Err(SimilarityError::Undefined {
                len_a: self.len_a,
                len_b: self.len_b,
            });
        }
        Ok(self.matches as f64 / aligned as f64)
    }

    /// Edit cost of the alignment.
    pub fn cost(&self) -> usize {
        self.mismatches * MISMATCH as usize + self.gaps * GAP as usize
    }
}

/// Global identity of `a` against `b`.
///
/// # Errors
///
/// [`SimilarityError::Undefined`] when either input is empty.
pub fn global_similarity(a: &[u8], b: &[u8]) -> Result<f64, SimilarityError> {
    align_counts(a, b).identity()
}

/// Align `a` (rows) against `b` (columns) and tally the traceback.
pub fn align_counts(a: &[u8], b: &[u8]) -> AlignmentCounts {
    let n = a.len();
    let m = b.len();
    let rows = n + 1;
    let cols = m + 1;

    let mut cost = vec![0u32; rows * cols];
    let mut back = vec![Step::Diag; rows * cols];

    let idx = |i: usize, j: usize| -> usize { i * cols + j };

    for i in 1..rows {
        cost[idx(i, 0)] = i as u32 * GAP;
        back[idx(i, 0)] = Step::Up;
    }
    for j in 1..cols {
        cost[idx(0, j)] = j as u32 * GAP;
        back[idx(0, j)] = Step::Left;
    }

    for i in 1..rows {
        let ai = a[i - 1];
        for j in 1..cols {
            let sub = if ai == b[j - 1] { 0 } else { MISMATCH };
            let d = cost[idx(i - 1, j - 1)] + sub;
            let u = cost[idx(i - 1, j)] + GAP;
            let l = cost[idx(i, j - 1)] + GAP;
            let c = d.min(u).min(l);

            cost[idx(i, j)] = c;
            back[idx(i, j)] = if c == l {
                Step::Left
            } else if c == u {
                Step::Up
            } else {
                Step::Diag
            };
        }
    }

    let mut counts = AlignmentCounts {
        len_a: n,
        len_b: m,
        ..Default::default()
    };
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        match back[idx(i, j)] {
            Step::Diag => {
                if a[i - 1] == b[j - 1] {
                    counts.matches += 1;
                } else {
                    counts.mismatches += 1;
                }
                i -= 1;
                j -= 1;
            }
            Step::Up => {
                counts.gaps += 1;
                i -= 1;
            }
            Step::Left => {
                counts.gaps += 1;
                j -= 1;
            }
        }
    }
    counts
}
