use std::arch::x86_64::*;

use super::fallback;

/**
The number of bytes scanned per vectorized block.
*/
pub(super) const BLOCK_SIZE: usize = 32;

/**
Vectorized quote scan.

Loads the input in 32-byte blocks, compares every lane against a broadcast
`"`, and compacts the comparison into a 32-bit mask. Set bits are drained
least-significant-first so offsets come out in ascending order. The residual
`len % 32` bytes are finished by the scalar fallback.

Loads are unaligned: the mask positions are relative to the block start, so
where the block sits in memory doesn't affect the offsets produced.
*/
// SAFETY: Callers must ensure AVX2 is available
#[target_feature(enable = "avx2")]
pub(super) unsafe fn scan(input: &[u8], quotes: &mut Vec<u32>) {
    let len = input.len();
    let quote = _mm256_set1_epi8(b'"' as i8);

    let mut offset = 0;

    while offset + BLOCK_SIZE <= len {
        let block = _mm256_loadu_si256(input.as_ptr().add(offset) as *const __m256i);

        let matches = _mm256_cmpeq_epi8(block, quote);
        let mut mask = _mm256_movemask_epi8(matches) as u32;

        while mask != 0 {
            let bit = mask.trailing_zeros();
            test_assert!(bit < BLOCK_SIZE as u32);

            quotes.push((offset + bit as usize) as u32);

            // clear the lowest set bit
            mask &= mask - 1;
        }

        offset += BLOCK_SIZE;
    }

    test_assert!(len - offset < BLOCK_SIZE);

    fallback::scan(input, offset, quotes);
}
