//! In-place LSD radix sort for `u16` k-mer codes.
//! 8-bit passes, 2 rounds. Stable via counting + prefix sums.

/// Sort `keys` in ascending order.
/// The scratch buffer is allocated once and reused across both passes.
pub fn radix_sort_u16(keys: &mut [u16]) {
    let n = keys.len();
    if n <= 1 {
        return;
    }

    let mut tmp = vec![0u16; n];

    for pass in 0..2 {
        let shift = pass * 8;
        let mut counts = [0usize; 256];

        for &k in keys.iter() {
            counts[((k >> shift) & 0xFF) as usize] += 1;
        }

        // Prefix sums -> positions
        let mut sum = 0usize;
        for c in counts.iter_mut() {
            let cnt = *c;
            *c = sum;
            sum += cnt;
        }

        for &k in keys.iter() {
            let b = ((k >> shift) & 0xFF) as usize;
            tmp[counts[b]] = k;
            counts[b] += 1;
        }

        keys.copy_from_slice(&tmp);
    }
}
