//! Keccak-f[1600] backends.
//!
//! Every backend computes the same permutation. [`required_caps`] is the
//! contract dispatch checks before handing a backend out.

#![allow(clippy::indexing_slicing)] // x/y loops stay inside the 5x5 lane grid

use platform::Caps;

use super::{LANES, RC, RHO, keccakf_portable};

pub type PermuteFn = fn(&mut [u64; LANES]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeccakKernelId {
  Portable = 0,
  Compact = 1,
  #[cfg(target_arch = "x86_64")]
  X86Avx2 = 2,
  #[cfg(target_arch = "aarch64")]
  Aarch64Sha3 = 3,
}

#[cfg(target_arch = "x86_64")]
pub const ALL: &[KeccakKernelId] = &[
  KeccakKernelId::Portable,
  KeccakKernelId::Compact,
  KeccakKernelId::X86Avx2,
];

#[cfg(target_arch = "aarch64")]
pub const ALL: &[KeccakKernelId] = &[
  KeccakKernelId::Portable,
  KeccakKernelId::Compact,
  KeccakKernelId::Aarch64Sha3,
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub const ALL: &[KeccakKernelId] = &[KeccakKernelId::Portable, KeccakKernelId::Compact];

impl KeccakKernelId {
  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Portable => "portable",
      Self::Compact => "compact",
      #[cfg(target_arch = "x86_64")]
      Self::X86Avx2 => "x86-avx2",
      #[cfg(target_arch = "aarch64")]
      Self::Aarch64Sha3 => "aarch64-sha3",
    }
  }
}

impl core::fmt::Display for KeccakKernelId {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Look a backend up by its [`as_str`](KeccakKernelId::as_str) name.
///
/// Names of backends for other architectures are not known here.
#[must_use]
pub fn id_from_name(name: &str) -> Option<KeccakKernelId> {
  ALL.iter().copied().find(|id| id.as_str() == name)
}

/// The backend's permutation, or `None` when this CPU lacks its
/// [`required_caps`].
#[must_use]
pub fn permute_fn(id: KeccakKernelId) -> Option<PermuteFn> {
  platform::caps().has(required_caps(id)).then(|| permute_fn_unchecked(id))
}

/// Caller must have checked [`required_caps`] against the running CPU.
pub(super) fn permute_fn_unchecked(id: KeccakKernelId) -> PermuteFn {
  match id {
    KeccakKernelId::Portable => keccakf_portable,
    KeccakKernelId::Compact => keccakf_compact,
    #[cfg(target_arch = "x86_64")]
    KeccakKernelId::X86Avx2 => super::x86_64::keccakf_avx2,
    #[cfg(target_arch = "aarch64")]
    KeccakKernelId::Aarch64Sha3 => super::aarch64::keccakf_sha3,
  }
}

#[inline]
#[must_use]
pub const fn required_caps(id: KeccakKernelId) -> Caps {
  match id {
    KeccakKernelId::Portable | KeccakKernelId::Compact => Caps::NONE,
    #[cfg(target_arch = "x86_64")]
    KeccakKernelId::X86Avx2 => platform::caps::x86::AVX2_READY,
    #[cfg(target_arch = "aarch64")]
    KeccakKernelId::Aarch64Sha3 => platform::caps::aarch64::SHA3_READY,
  }
}

/// Table-driven rounds: θ over column parities, then ρ and π through the
/// offset table, then χ row by row.
pub fn keccakf_compact(state: &mut [u64; LANES]) {
  for &rc in &RC {
    let mut c = [0u64; 5];
    for (x, parity) in c.iter_mut().enumerate() {
      *parity = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
    }
    for x in 0..5 {
      let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
      for y in 0..5 {
        state[x + 5 * y] ^= d;
      }
    }

    let mut b = [0u64; LANES];
    for x in 0..5 {
      for y in 0..5 {
        b[y + 5 * ((2 * x + 3 * y) % 5)] = state[x + 5 * y].rotate_left(RHO[x + 5 * y]);
      }
    }

    for y in 0..5 {
      for x in 0..5 {
        state[x + 5 * y] = b[x + 5 * y] ^ (!b[(x + 1) % 5 + 5 * y] & b[(x + 2) % 5 + 5 * y]);
      }
    }

    state[0] ^= rc;
  }
}
