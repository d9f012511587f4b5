//! x86_64 Keccak-f[1600] backend.
//!
//! The unrolled round body compiled with AVX2 and BMI1/BMI2 enabled, which lets
//! the code generator use `rorx` for ρ and `andn` for χ.

use super::{LANES, keccak_rounds};

#[target_feature(enable = "avx2,bmi1,bmi2")]
unsafe fn keccakf_avx2_impl(state: &mut [u64; LANES]) {
  keccak_rounds(state);
}

/// Only reachable through `kernels::permute_fn_unchecked`, whose callers check
/// `x86::AVX2_READY` first.
pub(super) fn keccakf_avx2(state: &mut [u64; LANES]) {
  // SAFETY: callers obtain this backend only when AVX2, BMI1 and BMI2 were
  // detected (see `kernels::required_caps`).
  unsafe { keccakf_avx2_impl(state) }
}
