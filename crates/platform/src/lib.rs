//! CPU detection and capabilities for ferrohash.
//!
//! This crate is the **single source of truth** for CPU feature detection
//! across the ferrohash workspace. Hash kernels (Keccak-f[1600] round bodies,
//! BLAKE3 compression) declare the capabilities they need; dispatchers ask
//! this crate what the machine has and pick the best match once per process.
//!
//! # Main Entry Point
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! if platform::caps().has(x86::AVX2_READY) {
//!     // AVX2 Keccak kernel is safe to run
//! }
//! ```
//!
//! # Configuration
//!
//! | Knob | Effect |
//! |------|--------|
//! | `FERROHASH_FORCE_PORTABLE=1` | detection reports no SIMD features |
//! | [`try_set_caps_override`] | replace detection (tests, bare metal) |
//!
//! # Design Philosophy
//!
//! 1. **One API**: Algorithms query `platform::caps()` instead of doing ad-hoc detection.
//! 2. **Zero-cost when possible**: Compile-time features are detected via `cfg!`.
//! 3. **Cached otherwise**: Runtime detection is cached in a `OnceLock`.
//! 4. **Miri-safe**: Under Miri, always returns portable-only caps.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::{Arch, Caps};
pub use detect::{Detected, FORCE_PORTABLE_ENV, OverrideError, caps_static};

/// Get detected CPU capabilities and architecture.
///
/// # Caching
///
/// - With `std`: Results are cached in a `OnceLock` (one-time detection).
/// - Without `std`: Only compile-time features are reported.
///
/// An installed override (see [`try_set_caps_override`]) wins over detection.
#[inline]
#[must_use]
pub fn get() -> Detected {
  detect::get()
}

/// Get just the CPU capabilities.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::get().caps
}

/// Set or clear the capabilities override.
///
/// Kernel dispatchers cache their choice on first use, so install overrides
/// before hashing anything. Fails without `std` or on a poisoned lock.
///
/// # Example
///
/// ```ignore
/// platform::try_set_caps_override(Some(platform::Caps::NONE))?;
/// // ... everything dispatches to portable kernels ...
/// platform::try_set_caps_override(None)?;
/// ```
#[cold]
pub fn try_set_caps_override(value: Option<Caps>) -> Result<(), OverrideError> {
  detect::try_set_override(value)
}

/// Panicking form of [`try_set_caps_override`], for test harnesses.
///
/// # Panics
///
/// Panics if the override cannot be stored.
#[cfg(any(test, feature = "testing"))]
#[cold]
pub fn set_caps_override(value: Option<Caps>) {
  if let Err(err) = detect::try_set_override(value) {
    panic!("platform::set_caps_override failed: {err}");
  }
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}

/// One-line description of the detected platform, for logs and diagnostics.
#[cfg(feature = "std")]
#[must_use]
pub fn describe() -> std::string::String {
  use std::{string::String, vec::Vec};

  let d = get();
  let names: Vec<&str> = d.caps.feature_names().collect();
  let mut s = String::from(d.arch.name());
  if !names.is_empty() {
    s.push_str(" [");
    s.push_str(&names.join(", "));
    s.push(']');
  }
  if has_override() {
    s.push_str(" (override)");
  }
  s
}
