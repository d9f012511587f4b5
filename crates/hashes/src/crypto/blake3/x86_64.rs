//! BLAKE3 SSE4.1 compression.
//!
//! The 4x4 state lives in four row vectors. Each round runs G on the columns,
//! rotates rows 1..3 so the diagonals line up as columns, runs G again, and
//! rotates back. 16- and 8-bit rotations are byte shuffles; message vectors
//! are assembled with `pinsrd`.

#![allow(clippy::indexing_slicing)] // schedule indices < 16

use core::arch::x86_64::*;

use super::{IV, MSG_SCHEDULE};

#[target_feature(enable = "sse2,ssse3,sse4.1")]
unsafe fn compress_sse41_impl(
  chaining_value: &[u32; 8],
  block_words: &[u32; 16],
  counter: u64,
  block_len: u32,
  flags: u32,
) -> [u32; 16] {
  // SAFETY: every load and store covers exactly four `u32`s inside the
  // fixed-size arrays; SSE4.1 is guaranteed by this function's contract.
  unsafe {
    let rot16 = _mm_setr_epi8(2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9, 14, 15, 12, 13);
    let rot8 = _mm_setr_epi8(1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12);

    let cv_lo = _mm_loadu_si128(chaining_value.as_ptr().cast());
    let cv_hi = _mm_loadu_si128(chaining_value.as_ptr().add(4).cast());

    let mut row0 = cv_lo;
    let mut row1 = cv_hi;
    let mut row2 = _mm_loadu_si128(IV.as_ptr().cast());
    let mut row3 = _mm_setr_epi32(counter as i32, (counter >> 32) as i32, block_len as i32, flags as i32);

    let m = block_words;

    macro_rules! gather {
      ($s:expr, $a:expr, $b:expr, $c:expr, $d:expr) => {{
        let v = _mm_cvtsi32_si128(m[$s[$a]] as i32);
        let v = _mm_insert_epi32(v, m[$s[$b]] as i32, 1);
        let v = _mm_insert_epi32(v, m[$s[$c]] as i32, 2);
        _mm_insert_epi32(v, m[$s[$d]] as i32, 3)
      }};
    }

    macro_rules! g {
      ($mx:expr, $my:expr) => {{
        row0 = _mm_add_epi32(_mm_add_epi32(row0, row1), $mx);
        row3 = _mm_shuffle_epi8(_mm_xor_si128(row3, row0), rot16);
        row2 = _mm_add_epi32(row2, row3);
        row1 = _mm_xor_si128(row1, row2);
        row1 = _mm_or_si128(_mm_srli_epi32(row1, 12), _mm_slli_epi32(row1, 20));
        row0 = _mm_add_epi32(_mm_add_epi32(row0, row1), $my);
        row3 = _mm_shuffle_epi8(_mm_xor_si128(row3, row0), rot8);
        row2 = _mm_add_epi32(row2, row3);
        row1 = _mm_xor_si128(row1, row2);
        row1 = _mm_or_si128(_mm_srli_epi32(row1, 7), _mm_slli_epi32(row1, 25));
      }};
    }

    for s in &MSG_SCHEDULE {
      g!(gather!(s, 0, 2, 4, 6), gather!(s, 1, 3, 5, 7));

      // diagonalize
      row1 = _mm_shuffle_epi32(row1, 0b00_11_10_01);
      row2 = _mm_shuffle_epi32(row2, 0b01_00_11_10);
      row3 = _mm_shuffle_epi32(row3, 0b10_01_00_11);

      g!(gather!(s, 8, 10, 12, 14), gather!(s, 9, 11, 13, 15));

      // undiagonalize
      row1 = _mm_shuffle_epi32(row1, 0b10_01_00_11);
      row2 = _mm_shuffle_epi32(row2, 0b01_00_11_10);
      row3 = _mm_shuffle_epi32(row3, 0b00_11_10_01);
    }

    row0 = _mm_xor_si128(row0, row2);
    row1 = _mm_xor_si128(row1, row3);
    row2 = _mm_xor_si128(row2, cv_lo);
    row3 = _mm_xor_si128(row3, cv_hi);

    let mut out = [0u32; 16];
    _mm_storeu_si128(out.as_mut_ptr().cast(), row0);
    _mm_storeu_si128(out.as_mut_ptr().add(4).cast(), row1);
    _mm_storeu_si128(out.as_mut_ptr().add(8).cast(), row2);
    _mm_storeu_si128(out.as_mut_ptr().add(12).cast(), row3);
    out
  }
}

/// Only reachable through `kernels::kernel`, whose callers check
/// `x86::SSE41_READY` first.
pub(super) fn compress_sse41(
  chaining_value: &[u32; 8],
  block_words: &[u32; 16],
  counter: u64,
  block_len: u32,
  flags: u32,
) -> [u32; 16] {
  // SAFETY: dispatch and the conformance harness hand this backend out only
  // when SSE2, SSSE3 and SSE4.1 were detected.
  unsafe { compress_sse41_impl(chaining_value, block_words, counter, block_len, flags) }
}
