//! Nucleotide encoding: 2-bit mapping and packing of fixed-length k-mers.
//!
//! Conventions
//! - `A=0, C=1, G=2, T=3`. Every other byte (including lowercase and `N`)
//!   folds to the code of `A`; no error is raised.
//! - K-mers are packed most-significant base first, so a 7-mer lands in the
//!   lower 14 bits of a `u16`.

/// K-mer length used for sketching.
pub const KMER_LEN: usize = 7;

/// Number of distinct k-mer codes (`4^KMER_LEN`).
pub const KMER_SPACE: usize = 1 << (2 * KMER_LEN);

/// 256-entry LUT: ASCII -> 2-bit (A=0, C=1, G=2, T=3), anything else 0.
pub static MAP_LUT: [u8; 256] = {
    let mut t = [0u8; 256];
    t[b'C' as usize] = 1;
    t[b'G' as usize] = 2;
    t[b'T' as usize] = 3;
    t
};

/// 2-bit code of a single nucleotide.
#[inline]
pub fn map_base(b: u8) -> u8 {
    MAP_LUT[b as usize]
}

/// Pack a k-mer window into a base-4 integer, first base most significant.
///
/// Only the first [`KMER_LEN`] bytes of `window` are used; shorter windows
/// pack what they have.
#[inline]
pub fn encode_kmer(window: &[u8]) -> u16 {
    window
        .iter()
        .take(KMER_LEN)
        .fold(0u16, |code, &b| (code << 2) | map_base(b) as u16)
}

/// Rolling iterator over the packed codes of every overlapping window.
///
/// Yields `seq.len() - KMER_LEN + 1` codes, or nothing if the sequence is
/// shorter than [`KMER_LEN`].
pub fn kmer_codes(seq: &[u8]) -> impl Iterator<Item = u16> + '_ {
    const MASK: u16 = (KMER_SPACE - 1) as u16;
    let mut code: u16 = 0;
    seq.iter().enumerate().filter_map(move |(i, &b)| {
        code = ((code << 2) | map_base(b) as u16) & MASK;
        (i + 1 >= KMER_LEN).then_some(code)
    })
}
