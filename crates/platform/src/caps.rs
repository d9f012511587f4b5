//! CPU capability representation.
//!
//! This module answers the question: "What instructions can I legally run on
//! this machine?" Hash kernels declare the [`Caps`] they require and dispatch
//! only picks a kernel when the detected set is a superset.
//!
//! # Bit Layout
//!
//! - Bits 0-63: x86/x86_64 features
//! - Bits 64-127: aarch64 features
//!
//! # Usage
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! let c = platform::caps();
//! if c.has(x86::AVX2_READY) {
//!     // AVX2 Keccak round body
//! }
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities as a feature bitset. `Copy`, and cheap to compare.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(u128);

impl Caps {
  /// No features. Portable kernels require exactly this.
  pub const NONE: Self = Self(0);

  /// Capability set from raw bits. Test builds only.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(bits: u128) -> Self {
    Self(bits)
  }

  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn as_raw(self) -> u128 {
    self.0
  }

  /// `true` when every feature in `required` is present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    self.0 & required.0 == required.0
  }

  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Features in `self` that are not in `other`.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self(self.0 & !other.0)
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Single-feature set; `bit` must be below 128.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    Self(1u128 << bit)
  }

  /// Names of the known features present in this set, in bit order.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    NAMED.iter().filter(move |(_, c)| self.has(*c)).map(|(name, _)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_set().entries(self.feature_names()).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "x86")]
    {
      Self::X86
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")))]
    {
      Self::Other
    }
  }

  /// Returns the human-readable name for this architecture.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86/x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86/x86_64 CPU features used by ferrohash kernels.
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSSE3: Caps = Caps::bit(1);
  pub const SSE41: Caps = Caps::bit(2);
  pub const AVX: Caps = Caps::bit(3);
  pub const AVX2: Caps = Caps::bit(4);
  pub const BMI1: Caps = Caps::bit(5);
  pub const BMI2: Caps = Caps::bit(6);

  /// SSE4.1 BLAKE3 compression (implies SSSE3 shuffles).
  pub const SSE41_READY: Caps = SSE2.union(SSSE3).union(SSE41);

  /// AVX2 Keccak round body; BMI2 gives `rorx` and `andn` for rho and chi.
  pub const AVX2_READY: Caps = AVX.union(AVX2).union(BMI1).union(BMI2);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 CPU features used by ferrohash kernels.
pub mod aarch64 {
  use super::Caps;

  pub const NEON: Caps = Caps::bit(64);
  /// FEAT_SHA3.
  pub const SHA3: Caps = Caps::bit(65);

  /// Keccak round body compiled with the SHA3 extension enabled.
  pub const SHA3_READY: Caps = NEON.union(SHA3);
}

const NAMED: &[(&str, Caps)] = &[
  ("sse2", x86::SSE2),
  ("ssse3", x86::SSSE3),
  ("sse4.1", x86::SSE41),
  ("avx", x86::AVX),
  ("avx2", x86::AVX2),
  ("bmi1", x86::BMI1),
  ("bmi2", x86::BMI2),
  ("neon", aarch64::NEON),
  ("sha3", aarch64::SHA3),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, vec::Vec};

  use super::*;

  #[test]
  fn none_is_subset_of_everything() {
    assert!(Caps::NONE.has(Caps::NONE));
    assert!(x86::AVX2_READY.has(Caps::NONE));
    assert!(!Caps::NONE.has(x86::SSE2));
  }

  #[test]
  fn combined_masks_require_all_parts() {
    assert!(x86::AVX2_READY.has(x86::AVX2));
    assert!(x86::AVX2_READY.has(x86::BMI2));
    assert!(!x86::AVX2.has(x86::AVX2_READY));
    assert_eq!(x86::AVX2_READY.feature_names().count(), 4);
    assert!(aarch64::SHA3_READY.has(aarch64::NEON));
  }

  #[test]
  fn bit_lands_in_the_right_word() {
    assert_eq!(Caps::bit(0).as_raw(), 1);
    assert_eq!(Caps::bit(64).as_raw(), 1u128 << 64);
    assert_eq!(aarch64::NEON, Caps::from_raw(1u128 << 64));
    assert_eq!(Caps::bit(127).as_raw(), 1u128 << 127);
  }

  #[test]
  fn difference_clears_only_requested_bits() {
    let c = x86::AVX2_READY.difference(x86::AVX2);
    assert!(!c.has(x86::AVX2));
    assert!(c.has(x86::BMI2));
    assert!(Caps::NONE.difference(x86::SSE2).is_empty());
  }

  #[test]
  fn every_named_feature_backs_a_kernel() {
    let kernel_features = x86::SSE41_READY | x86::AVX2_READY | aarch64::SHA3_READY;
    for (name, cap) in NAMED {
      assert!(kernel_features.has(*cap), "{name} is not required by any kernel");
    }
    assert_eq!(kernel_features.feature_names().count(), NAMED.len());
  }

  #[test]
  fn debug_lists_feature_names() {
    let names: Vec<_> = (x86::SSE2 | aarch64::SHA3).feature_names().collect();
    assert_eq!(names, ["sse2", "sha3"]);
    assert_eq!(format!("{:?}", x86::SSE2), "{\"sse2\"}");
  }
}
