//! Caller-chosen output length.

/// A digest whose output length is picked at finalization time.
///
/// This is the "flexible" finalization shape: the caller hands in a buffer and
/// the primitive fills all of it. Fixed-size primitives implement
/// [`Digest`](crate::Digest) instead and have no length argument at all.
pub trait VariableDigest: Clone {
  /// Absorb more input.
  fn update(&mut self, data: &[u8]);

  /// Fill `out` with the digest. Every byte of `out` is written.
  ///
  /// Like [`Digest::finalize`](crate::Digest::finalize), this leaves the state
  /// untouched.
  fn finalize_into(&self, out: &mut [u8]);

  /// One-shot: absorb `data` into a fresh state and fill `out`.
  #[inline]
  fn digest_into(data: &[u8], out: &mut [u8])
  where
    Self: Default,
  {
    let mut h = Self::default();
    h.update(data);
    h.finalize_into(out);
  }
}
