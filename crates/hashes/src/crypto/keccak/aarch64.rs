//! aarch64 Keccak-f[1600] backend.
//!
//! The scalar round body compiled with `neon,sha3` enabled. Lanes stay in
//! general-purpose registers, so no `eor3`/`rax1`/`bcax` is emitted.

use super::{LANES, keccak_rounds};

#[target_feature(enable = "neon,sha3")]
unsafe fn keccakf_sha3_impl(state: &mut [u64; LANES]) {
  keccak_rounds(state);
}

pub(super) fn keccakf_sha3(state: &mut [u64; LANES]) {
  // SAFETY: dispatch hands this backend out only when NEON and SHA3 were
  // detected (see `kernels::required_caps`).
  unsafe { keccakf_sha3_impl(state) }
}
