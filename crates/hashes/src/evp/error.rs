use thiserror::Error;

use super::HashTy;

/// Everything a [`Hasher`](super::Hasher) call can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EvpError {
  #[error("unexpected digest length {len} for {hashty}")]
  UnsupportedDigestLength { hashty: HashTy, len: usize },
  #[error("argument named rate is {rate}, expected a value in 1..200")]
  InvalidKeccakRate { rate: usize },
  #[error("hasher context is (null)")]
  Unconfigured,
  #[error("argument named digest is too short: need {needed} bytes, got {got}")]
  OutputTooShort { needed: usize, got: usize },
  #[error("bad alloc hasher context")]
  Alloc,
}

/// [`HashTy`](super::HashTy) name that did not parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unknown hash type name")]
pub struct UnknownHashTy;
