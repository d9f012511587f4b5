//! Keccak/SHA-3 and BLAKE3 with runtime-selected backends, plus a generic hasher.
//!
//! # Quick Start
//!
//! ```
//! use ferrohash::{Digest, Sha3_256};
//!
//! // One-shot computation
//! let digest = Sha3_256::digest(b"hello");
//!
//! // Streaming computation
//! let mut hasher = Sha3_256::new();
//! hasher.update(b"hel");
//! hasher.update(b"lo");
//! assert_eq!(hasher.finalize(), digest);
//! ```
//!
//! The generic hasher picks the algorithm at runtime:
//!
//! ```
//! # #[cfg(all(feature = "alloc", feature = "peers"))]
//! # {
//! use ferrohash::evp::{HashTy, Hasher};
//!
//! let mut h = Hasher::new();
//! h.configure(HashTy::Blake3, 64)?;
//! h.update(b"hello")?;
//! assert_eq!(h.finalize_vec()?.len(), 64);
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | Yes | Runtime CPU detection and `FERROHASH_*` environment knobs |
//! | `alloc` | Yes | Generic hasher and hex helpers (implied by `std`) |
//! | `peers` | Yes | MD5, SHA-1, SHA-2 and BLAKE2 through the generic hasher |
//!
//! Without `std`, backend choice uses compile-time target features only.
#![cfg_attr(not(feature = "std"), no_std)]

pub use hashes::crypto::{
  Blake3, Blake3Xof, Keccak224, Keccak256, Keccak384, Keccak512, KeccakSponge, PadByte, Sha3_224, Sha3_256, Sha3_384,
  Sha3_512,
};
#[cfg(all(feature = "alloc", feature = "peers"))]
pub use hashes::evp;
#[cfg(feature = "alloc")]
pub use hashes::hex;
pub use hashes::{crypto, Digest, VariableDigest, Xof};
pub use platform::{Caps, Detected, OverrideError};

/// CPU capability detection and overrides.
pub mod cpu {
  #[cfg(feature = "std")]
  pub use platform::describe;
  pub use platform::{caps, get, has_override, try_set_caps_override};
}

/// Names of the backends new hashers will use, `(keccak, blake3)`.
#[must_use]
pub fn active_kernels() -> (&'static str, &'static str) {
  (
    hashes::crypto::keccak::dispatch::active_kernel().as_str(),
    hashes::crypto::blake3::dispatch::active_kernel().as_str(),
  )
}
