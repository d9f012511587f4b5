//! Generic hasher: one handle, any supported algorithm and digest length.
//!
//! A [`Hasher`] starts unconfigured. [`configure`](Hasher::configure) picks an
//! algorithm family ([`HashTy`]) and a digest length (0 selects the family
//! default), resolves them to a concrete primitive and allocates its context.
//! After that the handle behaves like any incremental hash: `init`, `update`,
//! `finalize`, plus the one-shot [`hash`](Hasher::hash) and
//! [`digest`](Hasher::digest).
//!
//! ```rust
//! use hashes::crypto::Sha3_256;
//! use hashes::evp::{HashTy, Hasher};
//! use hashes::Digest;
//!
//! let mut h = Hasher::new();
//! h.configure(HashTy::Sha3, 0)?;
//! h.update(b"hello")?;
//! let mut out = [0u8; 32];
//! h.finalize(&mut out)?;
//! assert_eq!(out, Sha3_256::digest(b"hello"));
//! # Ok::<(), hashes::evp::EvpError>(())
//! ```
//!
//! KECCAK and SHA3 also have a custom mode
//! ([`set_keccak_custom`](Hasher::set_keccak_custom)) that runs the raw sponge
//! with a caller-chosen rate and any digest length.
//!
//! Nothing here panics or aborts: every failure is an [`EvpError`], logged at
//! `error` level where it is raised.

mod error;

use alloc::{boxed::Box, vec::Vec};
use core::{fmt, str::FromStr};

use blake2::{Blake2bVar, Blake2sVar};
use digest::{Update as _, VariableOutput};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use traits::{Digest, VariableDigest};

pub use self::error::{EvpError, UnknownHashTy};
use crate::crypto::{
  Blake3, Keccak224, Keccak256, Keccak384, Keccak512, KeccakSponge, PadByte, Sha3_224, Sha3_256, Sha3_384, Sha3_512,
  keccak::{STATE_LEN, is_valid_rate, rate_for_digest_len},
};

// ─────────────────────────────────────────────────────────────────────────────
// Algorithm tags
// ─────────────────────────────────────────────────────────────────────────────

/// Algorithm family a [`Hasher`] can be configured to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HashTy {
  Blake2b = 0,
  Blake2s = 1,
  Blake3 = 2,
  Keccak = 3,
  Md5 = 4,
  Sha1 = 5,
  Sha2 = 6,
  Sha3 = 7,
}

impl HashTy {
  pub const ALL: [Self; 8] = [
    Self::Blake2b,
    Self::Blake2s,
    Self::Blake3,
    Self::Keccak,
    Self::Md5,
    Self::Sha1,
    Self::Sha2,
    Self::Sha3,
  ];

  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Blake2b => "blake2b",
      Self::Blake2s => "blake2s",
      Self::Blake3 => "blake3",
      Self::Keccak => "keccak",
      Self::Md5 => "md5",
      Self::Sha1 => "sha1",
      Self::Sha2 => "sha2",
      Self::Sha3 => "sha3",
    }
  }

  /// Tag for a numeric index (the `repr(u8)` discriminant).
  #[inline]
  #[must_use]
  pub const fn from_index(index: u8) -> Option<Self> {
    match index {
      0 => Some(Self::Blake2b),
      1 => Some(Self::Blake2s),
      2 => Some(Self::Blake3),
      3 => Some(Self::Keccak),
      4 => Some(Self::Md5),
      5 => Some(Self::Sha1),
      6 => Some(Self::Sha2),
      7 => Some(Self::Sha3),
      _ => None,
    }
  }

  /// Digest length selected by a requested length of 0.
  #[inline]
  #[must_use]
  pub const fn default_digest_len(self) -> usize {
    match self {
      Self::Blake2b => 64,
      Self::Md5 => 16,
      Self::Sha1 => 20,
      Self::Blake2s | Self::Blake3 | Self::Keccak | Self::Sha2 | Self::Sha3 => 32,
    }
  }
}

impl fmt::Display for HashTy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for HashTy {
  type Err = UnknownHashTy;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|ty| ty.as_str().eq_ignore_ascii_case(s))
      .ok_or(UnknownHashTy)
  }
}

/// Name for a numeric tag, `"unknown"` when out of range.
#[must_use]
pub fn hashty_name(index: u8) -> &'static str {
  match HashTy::from_index(index) {
    Some(ty) => ty.as_str(),
    None => {
      log::warn!("hash type index {index} is out of bounds");
      "unknown"
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Call shapes
// ─────────────────────────────────────────────────────────────────────────────

/// How a context is (re)started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitMode {
  /// No parameters.
  #[default]
  Generic,
  /// Raw Keccak sponge with an explicit rate and padding byte.
  Keccak { rate: usize, pad: PadByte },
}

/// How a context produces its digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalMode {
  /// The primitive has exactly one output width.
  Fixed(usize),
  /// The primitive is told the width at finalization.
  Flexible(usize),
}

impl FinalMode {
  #[inline]
  #[must_use]
  pub const fn digest_len(self) -> usize {
    match self {
      Self::Fixed(len) | Self::Flexible(len) => len,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Contexts
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming state of whichever primitive a [`Hasher`] resolved to.
#[derive(Clone)]
pub enum Context {
  Blake2b(Blake2bVar),
  Blake2s(Blake2sVar),
  Blake3(Blake3),
  Md5(Md5),
  Sha1(Sha1),
  Sha224(Sha224),
  Sha256(Sha256),
  Sha384(Sha384),
  Sha512(Sha512),
  Sha3_224(Sha3_224),
  Sha3_256(Sha3_256),
  Sha3_384(Sha3_384),
  Sha3_512(Sha3_512),
  Keccak224(Keccak224),
  Keccak256(Keccak256),
  Keccak384(Keccak384),
  Keccak512(Keccak512),
  KeccakCustom(KeccakSponge),
}

impl Context {
  /// Fresh context for an already resolved configuration.
  fn new(hashty: HashTy, len: usize, init: InitMode) -> Result<Self, EvpError> {
    let unsupported = EvpError::UnsupportedDigestLength { hashty, len };

    if let InitMode::Keccak { rate, pad } = init {
      return KeccakSponge::new(rate, pad)
        .map(Self::KeccakCustom)
        .ok_or(EvpError::InvalidKeccakRate { rate });
    }

    let ctx = match (hashty, len) {
      (HashTy::Blake2b, _) => Self::Blake2b(Blake2bVar::new(len).map_err(|_| unsupported)?),
      (HashTy::Blake2s, _) => Self::Blake2s(Blake2sVar::new(len).map_err(|_| unsupported)?),
      (HashTy::Blake3, 1..) => Self::Blake3(Blake3::new()),
      (HashTy::Md5, 16) => Self::Md5(Md5::default()),
      (HashTy::Sha1, 20) => Self::Sha1(Sha1::default()),
      (HashTy::Sha2, 28) => Self::Sha224(Sha224::default()),
      (HashTy::Sha2, 32) => Self::Sha256(Sha256::default()),
      (HashTy::Sha2, 48) => Self::Sha384(Sha384::default()),
      (HashTy::Sha2, 64) => Self::Sha512(Sha512::default()),
      (HashTy::Sha3, 28) => Self::Sha3_224(Sha3_224::new()),
      (HashTy::Sha3, 32) => Self::Sha3_256(Sha3_256::new()),
      (HashTy::Sha3, 48) => Self::Sha3_384(Sha3_384::new()),
      (HashTy::Sha3, 64) => Self::Sha3_512(Sha3_512::new()),
      (HashTy::Keccak, 28) => Self::Keccak224(Keccak224::new()),
      (HashTy::Keccak, 32) => Self::Keccak256(Keccak256::new()),
      (HashTy::Keccak, 48) => Self::Keccak384(Keccak384::new()),
      (HashTy::Keccak, 64) => Self::Keccak512(Keccak512::new()),
      _ => return Err(unsupported),
    };
    Ok(ctx)
  }

  /// Bytes of primitive state behind this context.
  #[must_use]
  pub fn size(&self) -> usize {
    use core::mem::size_of_val;
    match self {
      Self::Blake2b(c) => size_of_val(c),
      Self::Blake2s(c) => size_of_val(c),
      Self::Blake3(c) => size_of_val(c),
      Self::Md5(c) => size_of_val(c),
      Self::Sha1(c) => size_of_val(c),
      Self::Sha224(c) => size_of_val(c),
      Self::Sha256(c) => size_of_val(c),
      Self::Sha384(c) => size_of_val(c),
      Self::Sha512(c) => size_of_val(c),
      Self::Sha3_224(c) => size_of_val(c),
      Self::Sha3_256(c) => size_of_val(c),
      Self::Sha3_384(c) => size_of_val(c),
      Self::Sha3_512(c) => size_of_val(c),
      Self::Keccak224(c) => size_of_val(c),
      Self::Keccak256(c) => size_of_val(c),
      Self::Keccak384(c) => size_of_val(c),
      Self::Keccak512(c) => size_of_val(c),
      Self::KeccakCustom(c) => size_of_val(c),
    }
  }

  fn name(&self) -> &'static str {
    match self {
      Self::Blake2b(_) => "blake2b",
      Self::Blake2s(_) => "blake2s",
      Self::Blake3(_) => "blake3",
      Self::Md5(_) => "md5",
      Self::Sha1(_) => "sha1",
      Self::Sha224(_) => "sha224",
      Self::Sha256(_) => "sha256",
      Self::Sha384(_) => "sha384",
      Self::Sha512(_) => "sha512",
      Self::Sha3_224(_) => "sha3-224",
      Self::Sha3_256(_) => "sha3-256",
      Self::Sha3_384(_) => "sha3-384",
      Self::Sha3_512(_) => "sha3-512",
      Self::Keccak224(_) => "keccak224",
      Self::Keccak256(_) => "keccak256",
      Self::Keccak384(_) => "keccak384",
      Self::Keccak512(_) => "keccak512",
      Self::KeccakCustom(_) => "keccak-custom",
    }
  }

  fn update(&mut self, data: &[u8]) {
    match self {
      Self::Blake2b(c) => c.update(data),
      Self::Blake2s(c) => c.update(data),
      Self::Blake3(c) => Digest::update(c, data),
      Self::Md5(c) => c.update(data),
      Self::Sha1(c) => c.update(data),
      Self::Sha224(c) => c.update(data),
      Self::Sha256(c) => c.update(data),
      Self::Sha384(c) => c.update(data),
      Self::Sha512(c) => c.update(data),
      Self::Sha3_224(c) => c.update(data),
      Self::Sha3_256(c) => c.update(data),
      Self::Sha3_384(c) => c.update(data),
      Self::Sha3_512(c) => c.update(data),
      Self::Keccak224(c) => c.update(data),
      Self::Keccak256(c) => c.update(data),
      Self::Keccak384(c) => c.update(data),
      Self::Keccak512(c) => c.update(data),
      Self::KeccakCustom(c) => c.update(data),
    }
  }

  /// `out` is exactly the configured digest length. Peer contexts are
  /// finalized on a copy so the context itself keeps absorbing.
  fn finalize_into(&self, out: &mut [u8]) -> Result<(), EvpError> {
    match self {
      Self::Blake2b(c) => finish_variable(c.clone(), out),
      Self::Blake2s(c) => finish_variable(c.clone(), out),
      Self::Blake3(c) => {
        c.finalize_into(out);
        Ok(())
      }
      Self::Md5(c) => copy_out(out, &digest::Digest::finalize(c.clone())),
      Self::Sha1(c) => copy_out(out, &digest::Digest::finalize(c.clone())),
      Self::Sha224(c) => copy_out(out, &digest::Digest::finalize(c.clone())),
      Self::Sha256(c) => copy_out(out, &digest::Digest::finalize(c.clone())),
      Self::Sha384(c) => copy_out(out, &digest::Digest::finalize(c.clone())),
      Self::Sha512(c) => copy_out(out, &digest::Digest::finalize(c.clone())),
      Self::Sha3_224(c) => copy_out(out, &c.finalize()),
      Self::Sha3_256(c) => copy_out(out, &c.finalize()),
      Self::Sha3_384(c) => copy_out(out, &c.finalize()),
      Self::Sha3_512(c) => copy_out(out, &c.finalize()),
      Self::Keccak224(c) => copy_out(out, &c.finalize()),
      Self::Keccak256(c) => copy_out(out, &c.finalize()),
      Self::Keccak384(c) => copy_out(out, &c.finalize()),
      Self::Keccak512(c) => copy_out(out, &c.finalize()),
      Self::KeccakCustom(c) => {
        c.finalize_into(out);
        Ok(())
      }
    }
  }
}

impl fmt::Debug for Context {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Context").field(&self.name()).finish()
  }
}

fn finish_variable<V: VariableOutput>(ctx: V, out: &mut [u8]) -> Result<(), EvpError> {
  let needed = ctx.output_size();
  ctx
    .finalize_variable(out)
    .map_err(|_| EvpError::OutputTooShort { needed, got: out.len() })
}

fn copy_out(out: &mut [u8], digest: &[u8]) -> Result<(), EvpError> {
  if out.len() != digest.len() {
    return Err(EvpError::OutputTooShort {
      needed: digest.len(),
      got: out.len(),
    });
  }
  out.copy_from_slice(digest);
  Ok(())
}

#[inline]
fn fail(err: EvpError) -> EvpError {
  log::error!("evp: {err}");
  err
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Runtime-polymorphic hasher handle.
///
/// Keccak custom mode and rate are handle settings read by the next
/// [`configure`](Self::configure); they survive [`cleanup`](Self::cleanup).
#[derive(Debug, Default)]
pub struct Hasher {
  hashty: Option<HashTy>,
  digest_len: usize,
  keccak_custom: bool,
  keccak_rate: u16,
  init_mode: InitMode,
  final_mode: FinalMode,
  ctx: Option<Box<Context>>,
}

impl Default for FinalMode {
  fn default() -> Self {
    Self::Fixed(0)
  }
}

impl Hasher {
  /// Unconfigured handle.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Consume and drop the handle and its context.
  pub fn delete(self) {
    log::trace!("evp delete ({:?})", self.hashty);
  }

  /// Resolve the init and final shapes for `(hashty, len)` under the current
  /// keccak settings. `len` is already nonzero.
  fn plan(&self, hashty: HashTy, len: usize) -> Result<(InitMode, FinalMode), EvpError> {
    let unsupported = EvpError::UnsupportedDigestLength { hashty, len };

    let pad = match hashty {
      HashTy::Keccak => PadByte::Keccak,
      HashTy::Sha3 => PadByte::Sha3,
      _ => return Self::plan_generic(hashty, len).ok_or(unsupported),
    };

    if !self.keccak_custom {
      return Self::plan_generic(hashty, len).ok_or(unsupported);
    }

    let rate = match self.keccak_rate {
      0 => rate_for_digest_len(len).ok_or(EvpError::InvalidKeccakRate {
        rate: STATE_LEN.saturating_sub(len.saturating_mul(2)),
      })?,
      rate => {
        let rate = usize::from(rate);
        if !is_valid_rate(rate) {
          return Err(EvpError::InvalidKeccakRate { rate });
        }
        rate
      }
    };
    Ok((InitMode::Keccak { rate, pad }, FinalMode::Flexible(len)))
  }

  fn plan_generic(hashty: HashTy, len: usize) -> Option<(InitMode, FinalMode)> {
    let fin = match hashty {
      HashTy::Blake2b if (1..=64).contains(&len) => FinalMode::Flexible(len),
      HashTy::Blake2s if (1..=32).contains(&len) => FinalMode::Flexible(len),
      HashTy::Blake3 if len >= 1 => FinalMode::Flexible(len),
      HashTy::Md5 if len == 16 => FinalMode::Fixed(len),
      HashTy::Sha1 if len == 20 => FinalMode::Fixed(len),
      HashTy::Keccak | HashTy::Sha2 | HashTy::Sha3 if matches!(len, 28 | 32 | 48 | 64) => FinalMode::Fixed(len),
      _ => return None,
    };
    Some((InitMode::Generic, fin))
  }

  /// Select algorithm and digest length (0 = family default) and allocate a
  /// fresh context. A previous context is dropped first; on error the handle
  /// is left unconfigured.
  pub fn configure(&mut self, hashty: HashTy, digest_len: usize) -> Result<(), EvpError> {
    self.ctx = None;
    self.hashty = None;
    self.digest_len = 0;

    let len = if digest_len == 0 { hashty.default_digest_len() } else { digest_len };
    let (init_mode, final_mode) = self.plan(hashty, len).map_err(fail)?;
    let ctx = Box::new(Context::new(hashty, len, init_mode).map_err(fail)?);

    log::debug!(
      "evp configure {hashty} digest_len={len} context={} ctx_size={}",
      ctx.name(),
      ctx.size()
    );

    self.hashty = Some(hashty);
    self.digest_len = len;
    self.init_mode = init_mode;
    self.final_mode = final_mode;
    self.ctx = Some(ctx);
    Ok(())
  }

  /// Drop the context. The handle can be configured again.
  pub fn cleanup(&mut self) {
    if let Some(hashty) = self.hashty.take() {
      log::debug!("evp cleanup {hashty}");
    }
    self.ctx = None;
    self.digest_len = 0;
    self.init_mode = InitMode::Generic;
    self.final_mode = FinalMode::default();
  }

  /// [`cleanup`](Self::cleanup) followed by [`configure`](Self::configure).
  pub fn reinit(&mut self, hashty: HashTy, digest_len: usize) -> Result<(), EvpError> {
    self.cleanup();
    self.configure(hashty, digest_len)
  }

  fn context_mut(&mut self) -> Result<&mut Context, EvpError> {
    self.ctx.as_deref_mut().ok_or(EvpError::Unconfigured).map_err(fail)
  }

  fn context(&self) -> Result<&Context, EvpError> {
    self.ctx.as_deref().ok_or(EvpError::Unconfigured).map_err(fail)
  }

  /// Restart the configured context, discarding absorbed input.
  pub fn init(&mut self) -> Result<(), EvpError> {
    let hashty = self.hashty.ok_or(EvpError::Unconfigured).map_err(fail)?;
    let fresh = Context::new(hashty, self.digest_len, self.init_mode).map_err(fail)?;
    log::trace!("evp init {hashty} ({:?})", self.init_mode);
    *self.context_mut()? = fresh;
    Ok(())
  }

  pub fn update(&mut self, data: &[u8]) -> Result<(), EvpError> {
    self.context_mut()?.update(data);
    Ok(())
  }

  /// The `digest_len()`-byte prefix of `out` receives the digest; the rest of
  /// `out` is left alone.
  pub fn finalize(&self, out: &mut [u8]) -> Result<(), EvpError> {
    let ctx = self.context()?;
    let dst = self.output_prefix(out)?;
    log::trace!("evp finalize {} ({:?})", ctx.name(), self.final_mode);
    ctx.finalize_into(dst).map_err(fail)
  }

  /// Allocating [`finalize`](Self::finalize).
  pub fn finalize_vec(&self) -> Result<Vec<u8>, EvpError> {
    self.context()?;
    let mut out = Vec::new();
    out.try_reserve_exact(self.digest_len).map_err(|_| fail(EvpError::Alloc))?;
    out.resize(self.digest_len, 0);
    self.finalize(&mut out)?;
    Ok(out)
  }

  /// One-shot digest of `data` with the configured primitive. The streaming
  /// context is neither read nor modified.
  pub fn hash(&self, data: &[u8], out: &mut [u8]) -> Result<(), EvpError> {
    let hashty = self.hashty.ok_or(EvpError::Unconfigured).map_err(fail)?;
    let dst = self.output_prefix(out)?;
    let mut ctx = Context::new(hashty, self.digest_len, self.init_mode).map_err(fail)?;
    ctx.update(data);
    ctx.finalize_into(dst).map_err(fail)
  }

  /// `init`, `update(data)` and `finalize(out)` on the streaming context.
  pub fn digest(&mut self, data: &[u8], out: &mut [u8]) -> Result<(), EvpError> {
    self.init()?;
    self.update(data)?;
    self.finalize(out)
  }

  fn output_prefix<'o>(&self, out: &'o mut [u8]) -> Result<&'o mut [u8], EvpError> {
    let got = out.len();
    out.get_mut(..self.digest_len).ok_or_else(|| {
      fail(EvpError::OutputTooShort {
        needed: self.digest_len,
        got,
      })
    })
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Accessors
  // ───────────────────────────────────────────────────────────────────────────

  /// Configured family, `None` while unconfigured.
  #[inline]
  #[must_use]
  pub fn hashty(&self) -> Option<HashTy> {
    self.hashty
  }

  /// Configured digest length in bytes, 0 while unconfigured.
  #[inline]
  #[must_use]
  pub fn digest_len(&self) -> usize {
    self.digest_len
  }

  /// Bytes of primitive state, 0 while unconfigured.
  #[inline]
  #[must_use]
  pub fn ctx_size(&self) -> usize {
    self.ctx.as_deref().map_or(0, Context::size)
  }

  #[inline]
  #[must_use]
  pub fn is_configured(&self) -> bool {
    self.ctx.is_some()
  }

  #[inline]
  #[must_use]
  pub fn init_mode(&self) -> InitMode {
    self.init_mode
  }

  #[inline]
  #[must_use]
  pub fn final_mode(&self) -> FinalMode {
    self.final_mode
  }

  /// Run KECCAK and SHA3 as a raw sponge from the next `configure` on.
  #[inline]
  pub fn set_keccak_custom(&mut self, custom: bool) {
    self.keccak_custom = custom;
  }

  #[inline]
  #[must_use]
  pub fn keccak_custom(&self) -> bool {
    self.keccak_custom
  }

  /// Sponge rate for custom mode; 0 derives it as `200 - 2 * digest_len`.
  #[inline]
  pub fn set_keccak_rate(&mut self, rate: u16) {
    self.keccak_rate = rate;
  }

  #[inline]
  #[must_use]
  pub fn keccak_rate(&self) -> u16 {
    self.keccak_rate
  }
}
