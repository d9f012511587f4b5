//! Core hashing contracts for ferrohash.
//!
//! This crate provides the traits every ferrohash primitive conforms to, the
//! in-tree ones (Keccak, SHA-3, BLAKE3) as well as anything the generic
//! dispatcher forwards to. It is `no_std` compatible and has zero dependencies.
//!
//! # Trait Hierarchy
//!
//! | Trait | Purpose | Examples |
//! |-------|---------|----------|
//! | [`Digest`] | Fixed-size digests with `init`/`update`/`final`/one-shot | SHA3-256, Keccak-256, BLAKE3 |
//! | [`VariableDigest`] | Digest length chosen by the caller at finalization | BLAKE3, custom Keccak sponge |
//! | [`Xof`] | Extendable output streams | BLAKE3 XOF |
//!
//! # Fallibility Discipline
//!
//! Primitives never fail: malformed input is ruled out by types, not checked at
//! runtime. This crate denies `unwrap`, `expect`, and indexing in non-test code.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod digest;
mod variable;
mod xof;

pub use digest::Digest;
pub use variable::VariableDigest;
pub use xof::Xof;
