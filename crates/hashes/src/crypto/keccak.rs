//! Keccak-f[1600] permutation and the sponge shared by SHA-3 and Keccak.
//!
//! The permutation has several bit-identical backends (see [`kernels`]). The
//! sponge resolves one of them through [`dispatch`] when it is created and
//! keeps the function pointer, so the per-block cost is a single indirect call.
//!
//! The sponge keeps no byte buffer: input is XORed straight into the state at
//! `absorb_index`, and whole rate-sized blocks are XORed lane by lane. Rates
//! need not be lane-aligned; a trailing partial lane is XORed byte-wise.

#![allow(clippy::indexing_slicing)] // lane indices are bounded by the 25-lane state

#[doc(hidden)]
pub mod dispatch;
#[cfg(feature = "alloc")]
pub(crate) mod kernel_test;
pub mod kernels;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod x86_64;

use self::kernels::PermuteFn;

/// State width in bytes (`rate + capacity`).
pub const STATE_LEN: usize = 200;

/// Number of 64-bit lanes.
pub const LANES: usize = 25;

pub(crate) const ROUNDS: usize = 24;

pub(crate) const RC: [u64; ROUNDS] = [
  0x0000000000000001,
  0x0000000000008082,
  0x800000000000808a,
  0x8000000080008000,
  0x000000000000808b,
  0x0000000080000001,
  0x8000000080008081,
  0x8000000000008009,
  0x000000000000008a,
  0x0000000000000088,
  0x0000000080008009,
  0x000000008000000a,
  0x000000008000808b,
  0x800000000000008b,
  0x8000000000008089,
  0x8000000000008003,
  0x8000000000008002,
  0x8000000000000080,
  0x000000000000800a,
  0x800000008000000a,
  0x8000000080008081,
  0x8000000000008080,
  0x0000000080000001,
  0x8000000080008008,
];

/// Rotation offset of each lane, indexed by `x + 5 * y`.
pub(crate) const RHO: [u32; LANES] = [
  0, 1, 62, 28, 27, //
  36, 44, 6, 55, 20, //
  3, 10, 43, 25, 39, //
  41, 45, 15, 21, 8, //
  18, 2, 61, 56, 14,
];

// ─────────────────────────────────────────────────────────────────────────────
// Permutation
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! chi_row {
  ($o0:ident, $o1:ident, $o2:ident, $o3:ident, $o4:ident; $b0:ident, $b1:ident, $b2:ident, $b3:ident, $b4:ident) => {
    $o0 = $b0 ^ (!$b1 & $b2);
    $o1 = $b1 ^ (!$b2 & $b3);
    $o2 = $b2 ^ (!$b3 & $b4);
    $o3 = $b3 ^ (!$b4 & $b0);
    $o4 = $b4 ^ (!$b0 & $b1);
  };
}

/// 24 rounds over named locals.
///
/// `#[inline(always)]` so that each backend wrapper compiles the body under its
/// own `#[target_feature]` set.
#[inline(always)]
pub(crate) fn keccak_rounds(state: &mut [u64; LANES]) {
  let [
    mut a0,
    mut a1,
    mut a2,
    mut a3,
    mut a4,
    mut a5,
    mut a6,
    mut a7,
    mut a8,
    mut a9,
    mut a10,
    mut a11,
    mut a12,
    mut a13,
    mut a14,
    mut a15,
    mut a16,
    mut a17,
    mut a18,
    mut a19,
    mut a20,
    mut a21,
    mut a22,
    mut a23,
    mut a24,
  ] = *state;

  for &rc in &RC {
    // θ: column parities
    let c0 = a0 ^ a5 ^ a10 ^ a15 ^ a20;
    let c1 = a1 ^ a6 ^ a11 ^ a16 ^ a21;
    let c2 = a2 ^ a7 ^ a12 ^ a17 ^ a22;
    let c3 = a3 ^ a8 ^ a13 ^ a18 ^ a23;
    let c4 = a4 ^ a9 ^ a14 ^ a19 ^ a24;

    let d0 = c4 ^ c1.rotate_left(1);
    let d1 = c0 ^ c2.rotate_left(1);
    let d2 = c1 ^ c3.rotate_left(1);
    let d3 = c2 ^ c4.rotate_left(1);
    let d4 = c3 ^ c0.rotate_left(1);

    // θ folded into ρ + π: lane (x, y) lands at (y, 2x + 3y)
    let b0 = a0 ^ d0;
    let b1 = (a6 ^ d1).rotate_left(44);
    let b2 = (a12 ^ d2).rotate_left(43);
    let b3 = (a18 ^ d3).rotate_left(21);
    let b4 = (a24 ^ d4).rotate_left(14);

    let b5 = (a3 ^ d3).rotate_left(28);
    let b6 = (a9 ^ d4).rotate_left(20);
    let b7 = (a10 ^ d0).rotate_left(3);
    let b8 = (a16 ^ d1).rotate_left(45);
    let b9 = (a22 ^ d2).rotate_left(61);

    let b10 = (a1 ^ d1).rotate_left(1);
    let b11 = (a7 ^ d2).rotate_left(6);
    let b12 = (a13 ^ d3).rotate_left(25);
    let b13 = (a19 ^ d4).rotate_left(8);
    let b14 = (a20 ^ d0).rotate_left(18);

    let b15 = (a4 ^ d4).rotate_left(27);
    let b16 = (a5 ^ d0).rotate_left(36);
    let b17 = (a11 ^ d1).rotate_left(10);
    let b18 = (a17 ^ d2).rotate_left(15);
    let b19 = (a23 ^ d3).rotate_left(56);

    let b20 = (a2 ^ d2).rotate_left(62);
    let b21 = (a8 ^ d3).rotate_left(55);
    let b22 = (a14 ^ d4).rotate_left(39);
    let b23 = (a15 ^ d0).rotate_left(41);
    let b24 = (a21 ^ d1).rotate_left(2);

    // χ
    chi_row!(a0, a1, a2, a3, a4; b0, b1, b2, b3, b4);
    chi_row!(a5, a6, a7, a8, a9; b5, b6, b7, b8, b9);
    chi_row!(a10, a11, a12, a13, a14; b10, b11, b12, b13, b14);
    chi_row!(a15, a16, a17, a18, a19; b15, b16, b17, b18, b19);
    chi_row!(a20, a21, a22, a23, a24; b20, b21, b22, b23, b24);

    // ι
    a0 ^= rc;
  }

  *state = [
    a0, a1, a2, a3, a4, a5, a6, a7, a8, a9, a10, a11, a12, a13, a14, a15, a16, a17, a18, a19, a20, a21, a22, a23, a24,
  ];
}

/// Keccak-f[1600], fully unrolled scalar rounds.
pub fn keccakf_portable(state: &mut [u64; LANES]) {
  keccak_rounds(state);
}

// ─────────────────────────────────────────────────────────────────────────────
// Sponge
// ─────────────────────────────────────────────────────────────────────────────

/// Domain-separation byte XORed in front of the `pad10*1` terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PadByte {
  /// Original Keccak submission padding.
  Keccak = 0x01,
  /// FIPS 202 SHA-3 padding.
  Sha3 = 0x06,
}

impl PadByte {
  #[inline]
  #[must_use]
  pub const fn byte(self) -> u8 {
    self as u8
  }
}

/// Rate in bytes for a `len`-byte digest (`200 - 2 * len`).
///
/// Returns `None` when the result would not be a usable rate.
#[inline]
#[must_use]
pub const fn rate_for_digest_len(len: usize) -> Option<usize> {
  if len == 0 || len >= STATE_LEN / 2 {
    return None;
  }
  let rate = STATE_LEN - 2 * len;
  if is_valid_rate(rate) { Some(rate) } else { None }
}

/// A rate is any byte count in `1..200`, leaving at least one byte of capacity.
#[inline]
#[must_use]
pub const fn is_valid_rate(rate: usize) -> bool {
  rate != 0 && rate < STATE_LEN
}

#[derive(Clone)]
pub(crate) struct KeccakCore {
  state: [u64; LANES],
  rate: usize,
  absorb_index: usize,
  permute: PermuteFn,
}

impl core::fmt::Debug for KeccakCore {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("KeccakCore")
      .field("rate", &self.rate)
      .field("absorb_index", &self.absorb_index)
      .finish_non_exhaustive()
  }
}

impl KeccakCore {
  /// `rate` must satisfy [`is_valid_rate`]; callers check before constructing.
  #[inline]
  pub(crate) fn new(rate: usize) -> Self {
    debug_assert!(is_valid_rate(rate));
    Self {
      state: [0u64; LANES],
      rate,
      absorb_index: 0,
      permute: dispatch::permute_fn(),
    }
  }

  #[cfg(any(test, feature = "alloc"))]
  #[inline]
  pub(crate) fn with_permute(rate: usize, permute: PermuteFn) -> Self {
    Self {
      permute,
      ..Self::new(rate)
    }
  }

  #[inline]
  pub(crate) const fn rate(&self) -> usize {
    self.rate
  }

  /// Back to the all-zero state, same rate and backend.
  #[inline]
  pub(crate) fn reset(&mut self) {
    self.state = [0u64; LANES];
    self.absorb_index = 0;
  }

  pub(crate) fn update(&mut self, mut data: &[u8]) {
    if data.is_empty() {
      return;
    }

    if self.absorb_index != 0 {
      let take = core::cmp::min(self.rate - self.absorb_index, data.len());
      let (head, rest) = data.split_at(take);
      xor_bytes(&mut self.state, self.absorb_index, head);
      self.absorb_index += take;
      data = rest;

      if self.absorb_index == self.rate {
        (self.permute)(&mut self.state);
        self.absorb_index = 0;
      }
    }

    // absorb_index is 0 here whenever data is non-empty
    while data.len() >= self.rate {
      let (block, rest) = data.split_at(self.rate);
      xor_lanes(&mut self.state, block);
      (self.permute)(&mut self.state);
      data = rest;
    }

    if !data.is_empty() {
      xor_bytes(&mut self.state, 0, data);
      self.absorb_index = data.len();
    }
  }

  /// Padded and permuted copy of the state, ready to squeeze.
  #[inline]
  fn finalize_state(&self, pad: PadByte) -> [u64; LANES] {
    let mut state = self.state;
    xor_bytes(&mut state, self.absorb_index, &[pad.byte()]);
    xor_bytes(&mut state, self.rate - 1, &[0x80]);
    (self.permute)(&mut state);
    state
  }

  /// Squeeze `out.len()` bytes. Any length is accepted, including lengths
  /// beyond the rate.
  pub(crate) fn finalize_into(&self, pad: PadByte, mut out: &mut [u8]) {
    let mut state = self.finalize_state(pad);
    loop {
      let take = core::cmp::min(self.rate, out.len());
      let (window, rest) = core::mem::take(&mut out).split_at_mut(take);
      lanes_to_bytes(&state, window);
      out = rest;
      if out.is_empty() {
        break;
      }
      (self.permute)(&mut state);
    }
  }

  #[inline]
  pub(crate) fn finalize_fixed<const OUT: usize>(&self, pad: PadByte) -> [u8; OUT] {
    let mut out = [0u8; OUT];
    self.finalize_into(pad, &mut out);
    out
  }
}

/// Fixed-output sponge type: rate, output width and padding are all static.
macro_rules! fixed_sponge_digest {
  ($(#[$meta:meta])* $name:ident, rate = $rate:expr, out = $out:expr, pad = $pad:expr) => {
    $(#[$meta])*
    #[derive(Clone, Debug)]
    pub struct $name {
      core: $crate::crypto::keccak::KeccakCore,
    }

    impl $name {
      /// Sponge rate in bytes.
      pub const RATE: usize = $rate;
    }

    impl Default for $name {
      #[inline]
      fn default() -> Self {
        Self {
          core: $crate::crypto::keccak::KeccakCore::new($rate),
        }
      }
    }

    impl traits::Digest for $name {
      const OUTPUT_SIZE: usize = $out;
      type Output = [u8; $out];

      #[inline]
      fn new() -> Self {
        Self::default()
      }

      #[inline]
      fn update(&mut self, data: &[u8]) {
        self.core.update(data);
      }

      #[inline]
      fn finalize(&self) -> Self::Output {
        self.core.finalize_fixed::<$out>($pad)
      }

      #[inline]
      fn reset(&mut self) {
        self.core.reset();
      }
    }
  };
}

pub(crate) use fixed_sponge_digest;

/// XOR a whole rate-sized block into the leading lanes.
#[inline(always)]
fn xor_lanes(state: &mut [u64; LANES], block: &[u8]) {
  let (chunks, tail) = block.as_chunks::<8>();
  for (lane, chunk) in state.iter_mut().zip(chunks) {
    *lane ^= u64::from_le_bytes(*chunk);
  }
  if !tail.is_empty() {
    xor_bytes(state, chunks.len() * 8, tail);
  }
}

/// XOR `bytes` into the state starting at byte `offset` (little-endian lanes).
#[inline(always)]
fn xor_bytes(state: &mut [u64; LANES], offset: usize, bytes: &[u8]) {
  for (i, &b) in bytes.iter().enumerate() {
    let pos = offset + i;
    state[pos / 8] ^= u64::from(b) << (8 * (pos % 8));
  }
}

#[inline(always)]
fn lanes_to_bytes(state: &[u64; LANES], out: &mut [u8]) {
  for (chunk, lane) in out.chunks_mut(8).zip(state.iter()) {
    let bytes = lane.to_le_bytes();
    chunk.copy_from_slice(&bytes[..chunk.len()]);
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use super::*;

  fn sponge(rate: usize, pad: PadByte, data: &[u8], out_len: usize) -> alloc::vec::Vec<u8> {
    let mut core = KeccakCore::with_permute(rate, keccakf_portable);
    core.update(data);
    let mut out = alloc::vec![0u8; out_len];
    core.finalize_into(pad, &mut out);
    out
  }

  #[test]
  fn rho_table_matches_unrolled_body() {
    // Offsets follow the triangular numbers along the (x, y) -> (y, 2x + 3y) walk.
    let mut expected = [0u32; LANES];
    let (mut x, mut y) = (1usize, 0usize);
    for t in 0..24u32 {
      expected[x + 5 * y] = ((t + 1) * (t + 2) / 2) % 64;
      let nx = y;
      let ny = (2 * x + 3 * y) % 5;
      x = nx;
      y = ny;
    }
    assert_eq!(RHO, expected);
  }

  #[test]
  fn standard_rates_from_digest_len() {
    assert_eq!(rate_for_digest_len(28), Some(144));
    assert_eq!(rate_for_digest_len(32), Some(136));
    assert_eq!(rate_for_digest_len(48), Some(104));
    assert_eq!(rate_for_digest_len(64), Some(72));
    assert_eq!(rate_for_digest_len(30), Some(140));
    assert_eq!(rate_for_digest_len(1), Some(198));
    assert_eq!(rate_for_digest_len(99), Some(2));
    assert_eq!(rate_for_digest_len(0), None);
    assert_eq!(rate_for_digest_len(100), None);
  }

  #[test]
  fn rate_validation() {
    assert!(is_valid_rate(1));
    assert!(is_valid_rate(8));
    assert!(is_valid_rate(137));
    assert!(is_valid_rate(199));
    assert!(!is_valid_rate(0));
    assert!(!is_valid_rate(200));
  }

  /// One byte at a time through the state, no lane shortcuts.
  fn bytewise_sponge(rate: usize, pad: PadByte, data: &[u8], out_len: usize) -> alloc::vec::Vec<u8> {
    let mut state = [0u64; LANES];
    let mut pos = 0;
    for &b in data {
      xor_bytes(&mut state, pos, &[b]);
      pos += 1;
      if pos == rate {
        keccakf_portable(&mut state);
        pos = 0;
      }
    }
    xor_bytes(&mut state, pos, &[pad.byte()]);
    xor_bytes(&mut state, rate - 1, &[0x80]);
    keccakf_portable(&mut state);

    let mut out = alloc::vec::Vec::with_capacity(out_len);
    let mut pos = 0;
    while out.len() < out_len {
      if pos == rate {
        keccakf_portable(&mut state);
        pos = 0;
      }
      out.push((state[pos / 8] >> (8 * (pos % 8))) as u8);
      pos += 1;
    }
    out
  }

  #[test]
  fn unaligned_rates_match_bytewise_sponge() {
    let data: alloc::vec::Vec<u8> = (0..600u32).map(|i| (i * 7 + 3) as u8).collect();
    for rate in [1usize, 2, 7, 100, 137, 140, 198, 199] {
      for len in [0usize, 1, rate - 1, rate, rate + 1, 3 * rate + 5, 600] {
        let msg = &data[..len.min(data.len())];
        for out_len in [1usize, 30, rate, rate + 3, 2 * rate + 1] {
          assert_eq!(
            sponge(rate, PadByte::Sha3, msg, out_len),
            bytewise_sponge(rate, PadByte::Sha3, msg, out_len),
            "rate={rate} len={} out={out_len}",
            msg.len()
          );
        }

        let mut split = KeccakCore::with_permute(rate, keccakf_portable);
        for part in msg.chunks(13) {
          split.update(part);
        }
        let mut out = alloc::vec![0u8; 64];
        split.finalize_into(PadByte::Keccak, &mut out);
        assert_eq!(out, bytewise_sponge(rate, PadByte::Keccak, msg, 64), "rate={rate} streamed");
      }
    }
  }

  #[test]
  fn bytewise_sponge_agrees_on_standard_rate() {
    assert_eq!(
      bytewise_sponge(136, PadByte::Sha3, b"abc", 32),
      sponge(136, PadByte::Sha3, b"abc", 32)
    );
  }

  #[test]
  fn exact_rate_input_is_permuted_once_during_absorb() {
    let data = [0x5au8; 136];
    let mut core = KeccakCore::with_permute(136, keccakf_portable);
    core.update(&data);
    assert_eq!(core.absorb_index, 0);

    let mut split = KeccakCore::with_permute(136, keccakf_portable);
    split.update(&data[..100]);
    split.update(&data[100..]);
    assert_eq!(split.absorb_index, 0);
    assert_eq!(core.state, split.state);
  }

  #[test]
  fn squeeze_longer_than_rate_extends_prefix() {
    let short = sponge(72, PadByte::Sha3, b"squeeze", 72);
    let long = sponge(72, PadByte::Sha3, b"squeeze", 200);
    assert_eq!(&long[..72], &short[..]);
    assert_ne!(&long[72..144], &long[..72]);
  }

  #[test]
  fn zero_length_output_is_accepted() {
    assert!(sponge(136, PadByte::Keccak, b"abc", 0).is_empty());
  }

  #[test]
  fn pad_bytes_separate_domains() {
    assert_ne!(
      sponge(136, PadByte::Keccak, b"hello", 32),
      sponge(136, PadByte::Sha3, b"hello", 32)
    );
  }

  #[test]
  fn reset_restores_initial_state() {
    let mut core = KeccakCore::with_permute(104, keccakf_portable);
    core.update(b"some bytes that are thrown away");
    core.reset();
    core.update(b"abc");
    let mut a = [0u8; 48];
    core.finalize_into(PadByte::Sha3, &mut a);
    assert_eq!(a.to_vec(), sponge(104, PadByte::Sha3, b"abc", 48));
  }
}
