//! Fixed-size digest trait.
//!
//! This is the Rust shape of the four-function contract shared by every
//! primitive: `init` is [`Digest::new`] (or [`Digest::reset`]), `update` is
//! [`Digest::update`], `final` is [`Digest::finalize`], and `oneshot` is
//! [`Digest::digest`].

use core::fmt::Debug;

/// Cryptographic hash function producing a fixed-size digest.
///
/// # Chunking invariance
///
/// Implementations must produce the same digest no matter how the input is
/// split across [`update`](Digest::update) calls, including zero-length calls.
///
/// # Example
///
/// ```rust
/// # use traits::Digest;
/// # #[derive(Clone, Default)]
/// # struct XorDigest(u8);
/// # impl Digest for XorDigest {
/// #   const OUTPUT_SIZE: usize = 1;
/// #   type Output = [u8; 1];
/// #   fn new() -> Self { Self(0) }
/// #   fn update(&mut self, data: &[u8]) { self.0 = data.iter().fold(self.0, |a, &b| a ^ b); }
/// #   fn finalize(&self) -> Self::Output { [self.0] }
/// #   fn reset(&mut self) { self.0 = 0; }
/// # }
/// let mut h = XorDigest::new();
/// h.update(b"hel");
/// h.update(b"");
/// h.update(b"lo");
/// assert_eq!(h.finalize(), XorDigest::digest(b"hello"));
/// ```
pub trait Digest: Clone + Default {
  /// Output size in bytes.
  const OUTPUT_SIZE: usize;

  /// The digest output type.
  ///
  /// Typically `[u8; N]`.
  type Output: Copy + Eq + Debug + AsRef<[u8]>;

  /// Create a new hasher in its initial state.
  #[must_use]
  fn new() -> Self;

  /// Update the hasher with additional data.
  fn update(&mut self, data: &[u8]);

  /// Update the hasher with multiple non-contiguous buffers.
  #[inline]
  fn update_vectored(&mut self, bufs: &[&[u8]]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Update the hasher with `std::io::IoSlice` buffers.
  #[cfg(feature = "std")]
  #[inline]
  fn update_io_slices(&mut self, bufs: &[std::io::IoSlice<'_>]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Finalize and return the digest.
  ///
  /// This method does not consume the hasher, allowing further updates if needed.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Reset the hasher to its initial state.
  fn reset(&mut self);

  /// Compute the digest of data in one shot.
  #[inline]
  #[must_use]
  fn digest(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  /// Compute the digest of multiple buffers in one shot.
  #[inline]
  #[must_use]
  fn digest_vectored(bufs: &[&[u8]]) -> Self::Output {
    let mut h = Self::new();
    h.update_vectored(bufs);
    h.finalize()
  }
}
