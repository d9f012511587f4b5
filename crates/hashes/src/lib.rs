//! Keccak/SHA-3, BLAKE3 and a generic hasher dispatcher.
//!
//! This crate is `no_std` compatible. The in-tree primitives need nothing
//! beyond `core`; the [`evp`] dispatcher needs `alloc` and the `peers` feature,
//! which pulls in the RustCrypto MD5, SHA-1, SHA-2 and BLAKE2 crates.
//!
//! # Modules
//!
//! - [`crypto`] - Keccak-f[1600] sponge family and BLAKE3.
//! - [`evp`] - one handle that can be configured to any supported algorithm.
//! - [`hex`] - lowercase hex rendering of digests.
//!
//! # Backends
//!
//! Keccak-f[1600] and BLAKE3 compression each have several interchangeable
//! backends. The best one the CPU supports is chosen on first use and logged at
//! `debug` level; `FERROHASH_KECCAK_KERNEL` and `FERROHASH_BLAKE3_KERNEL` pin a
//! backend by name.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod crypto;
#[cfg(all(feature = "alloc", feature = "peers"))]
pub mod evp;
#[cfg(feature = "alloc")]
pub mod hex;

pub use traits::{Digest, VariableDigest, Xof};

#[doc(hidden)]
pub mod __internal {
  #[cfg(feature = "alloc")]
  pub mod kernel_test {
    pub use crate::crypto::{
      blake3::kernel_test::{
        KernelResult as Blake3KernelResult, run_all_blake3_kernels, verify_blake3_kernels,
      },
      keccak::kernel_test::{
        KernelResult as KeccakKernelResult, run_all_keccakf1600_kernels, verify_keccakf1600_kernels,
      },
    };
  }
}
