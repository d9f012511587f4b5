//! Keccak (pre-FIPS 202 padding) hashes and the custom-rate sponge.
//!
//! `Keccak224` .. `Keccak512` are SHA-3 with the original submission's `0x01`
//! domain byte. [`KeccakSponge`] opens the sponge up completely: any valid
//! rate, either padding byte, and any output length.

use traits::VariableDigest;

use super::keccak::{KeccakCore, PadByte, fixed_sponge_digest, is_valid_rate, rate_for_digest_len};

fixed_sponge_digest!(
  /// Keccak-224.
  Keccak224, rate = 144, out = 28, pad = PadByte::Keccak
);
fixed_sponge_digest!(
  /// Keccak-256, as used by Ethereum.
  Keccak256, rate = 136, out = 32, pad = PadByte::Keccak
);
fixed_sponge_digest!(
  /// Keccak-384.
  Keccak384, rate = 104, out = 48, pad = PadByte::Keccak
);
fixed_sponge_digest!(
  /// Keccak-512.
  Keccak512, rate = 72, out = 64, pad = PadByte::Keccak
);

/// Keccak sponge with a caller-chosen rate and padding byte.
///
/// The output length is whatever buffer is handed to
/// [`finalize_into`](VariableDigest::finalize_into); outputs longer than the
/// rate are squeezed over several permutations.
///
/// ```rust
/// use hashes::crypto::{Keccak256, KeccakSponge, PadByte};
/// use hashes::{Digest, VariableDigest};
///
/// let mut sponge = KeccakSponge::new(136, PadByte::Keccak).unwrap();
/// sponge.update(b"hello");
/// let mut out = [0u8; 32];
/// sponge.finalize_into(&mut out);
/// assert_eq!(out, Keccak256::digest(b"hello"));
/// ```
#[derive(Clone, Debug)]
pub struct KeccakSponge {
  core: KeccakCore,
  pad: PadByte,
}

impl KeccakSponge {
  /// `None` unless `rate` is in `1..200`.
  #[must_use]
  pub fn new(rate: usize, pad: PadByte) -> Option<Self> {
    is_valid_rate(rate).then(|| Self {
      core: KeccakCore::new(rate),
      pad,
    })
  }

  /// Sponge sized for a `len`-byte digest, rate `200 - 2 * len`.
  #[must_use]
  pub fn for_digest_len(len: usize, pad: PadByte) -> Option<Self> {
    Self::new(rate_for_digest_len(len)?, pad)
  }

  #[inline]
  #[must_use]
  pub fn rate(&self) -> usize {
    self.core.rate()
  }

  #[inline]
  #[must_use]
  pub fn pad(&self) -> PadByte {
    self.pad
  }

  /// Forget all absorbed input; rate and padding are kept.
  #[inline]
  pub fn reset(&mut self) {
    self.core.reset();
  }
}

impl VariableDigest for KeccakSponge {
  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.core.update(data);
  }

  #[inline]
  fn finalize_into(&self, out: &mut [u8]) {
    self.core.finalize_into(self.pad, out);
  }
}
