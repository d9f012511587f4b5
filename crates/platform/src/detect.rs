//! Runtime CPU detection.
//!
//! This module provides the unified [`get()`] function that returns detected
//! CPU capabilities. It handles:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (via `is_x86_feature_detected!` / `is_aarch64_feature_detected!`)
//! - Caching (via `OnceLock` with `std`; without `std` only compile-time caps exist)
//! - User-supplied overrides for bare metal and testing
//! - Environment configuration (`FERROHASH_FORCE_PORTABLE`)
//! - Miri fallback (always returns portable caps)

use crate::caps::{Arch, Caps};

/// Environment switch that forces portable kernels everywhere.
///
/// `FERROHASH_FORCE_PORTABLE=1` (or `true`) makes detection report an empty
/// capability set, so every dispatcher falls back to its portable kernel.
pub const FORCE_PORTABLE_ENV: &str = "FERROHASH_FORCE_PORTABLE";

/// Result of capability detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detected {
  pub caps: Caps,
  pub arch: Arch,
}

impl Detected {
  /// No SIMD features; every kernel falls back to portable code.
  #[inline]
  #[must_use]
  pub const fn portable() -> Self {
    Self {
      caps: Caps::NONE,
      arch: Arch::current(),
    }
  }
}

/// Why a capability override could not be installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum OverrideError {
  /// Overrides need `std` synchronization primitives.
  #[error("capability overrides require the `std` feature")]
  Unsupported,
  /// A thread panicked while holding the override lock.
  #[error("capability override lock is poisoned")]
  Poisoned,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache and Override
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "std")]
use std::sync::{OnceLock, RwLock};

#[cfg(all(feature = "std", not(miri)))]
static STD_CACHE: OnceLock<Detected> = OnceLock::new();

#[cfg(feature = "std")]
static OVERRIDE: RwLock<Option<Caps>> = RwLock::new(None);

#[inline]
#[must_use]
pub fn get() -> Detected {
  #[cfg(miri)]
  {
    Detected::portable()
  }

  #[cfg(not(miri))]
  {
    #[cfg(feature = "std")]
    {
      if let Some(caps) = get_override() {
        return Detected {
          caps,
          arch: Arch::current(),
        };
      }
      *STD_CACHE.get_or_init(detect_uncached)
    }

    #[cfg(not(feature = "std"))]
    {
      Detected {
        caps: caps_static(),
        arch: Arch::current(),
      }
    }
  }
}

#[cold]
pub fn try_set_override(value: Option<Caps>) -> Result<(), OverrideError> {
  #[cfg(feature = "std")]
  {
    let mut guard = OVERRIDE.write().map_err(|_| OverrideError::Poisoned)?;
    *guard = value;
    Ok(())
  }

  #[cfg(not(feature = "std"))]
  {
    let _ = value;
    Err(OverrideError::Unsupported)
  }
}

#[inline]
#[must_use]
pub fn has_override() -> bool {
  #[cfg(feature = "std")]
  {
    OVERRIDE.read().map(|g| g.is_some()).unwrap_or(false)
  }

  #[cfg(not(feature = "std"))]
  {
    false
  }
}

#[cfg(feature = "std")]
#[inline]
fn get_override() -> Option<Caps> {
  OVERRIDE.read().ok().and_then(|g| *g)
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection
// ─────────────────────────────────────────────────────────────────────────────

/// `$cap` for every `target_feature` the compiler may assume.
macro_rules! assumed {
  ($caps:ident; $($feat:tt => $cap:expr),+ $(,)?) => {
    $(
      if cfg!(target_feature = $feat) {
        $caps = $caps.union($cap);
      }
    )+
  };
}

/// Features the compiler was told it may assume (`-C target-feature`).
#[must_use]
pub const fn caps_static() -> Caps {
  #[allow(unused_mut)]
  let mut caps = Caps::NONE;

  #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
  {
    use crate::caps::x86::*;
    assumed!(caps;
      "sse2" => SSE2, "ssse3" => SSSE3, "sse4.1" => SSE41,
      "avx" => AVX, "avx2" => AVX2, "bmi1" => BMI1, "bmi2" => BMI2,
    );
  }

  #[cfg(target_arch = "aarch64")]
  {
    use crate::caps::aarch64::*;
    assumed!(caps; "neon" => NEON, "sha3" => SHA3);
  }

  caps
}

#[cfg(feature = "std")]
fn force_portable() -> bool {
  std::env::var(FORCE_PORTABLE_ENV)
    .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
    .unwrap_or(false)
}

#[cfg(all(feature = "std", not(miri)))]
#[cold]
fn detect_uncached() -> Detected {
  if force_portable() {
    log::debug!("{FORCE_PORTABLE_ENV} set, reporting portable capabilities");
    return Detected::portable();
  }

  let caps = caps_static().union(runtime_caps());
  log::debug!("detected {} capabilities: {:?}", Arch::current(), caps);
  Detected {
    caps,
    arch: Arch::current(),
  }
}

/// `$cap` for every feature the running CPU reports through `$probe!`.
#[cfg(feature = "std")]
macro_rules! probed {
  ($probe:ident; $($feat:tt => $cap:expr),+ $(,)?) => {{
    let mut caps = Caps::NONE;
    $(
      if std::arch::$probe!($feat) {
        caps |= $cap;
      }
    )+
    caps
  }};
}

#[cfg(all(feature = "std", any(target_arch = "x86_64", target_arch = "x86")))]
fn runtime_caps() -> Caps {
  use crate::caps::x86::*;
  probed!(is_x86_feature_detected;
    "sse2" => SSE2, "ssse3" => SSSE3, "sse4.1" => SSE41,
    "avx" => AVX, "avx2" => AVX2, "bmi1" => BMI1, "bmi2" => BMI2,
  )
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn runtime_caps() -> Caps {
  use crate::caps::aarch64::*;
  probed!(is_aarch64_feature_detected; "neon" => NEON, "sha3" => SHA3)
}

#[cfg(all(
  feature = "std",
  not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64"))
))]
fn runtime_caps() -> Caps {
  Caps::NONE
}
