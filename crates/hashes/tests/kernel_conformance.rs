//! Every backend the running CPU supports must agree bit for bit.

use hashes::{
  Digest as _,
  __internal::kernel_test::{
    run_all_blake3_kernels, run_all_keccakf1600_kernels, verify_blake3_kernels, verify_keccakf1600_kernels,
  },
  crypto::{
    Blake3, Sha3_256,
    blake3::{dispatch as blake3_dispatch, kernels as blake3_kernels},
    keccak::{dispatch as keccak_dispatch, kernels as keccak_kernels},
  },
};
use proptest::prelude::*;

#[test]
fn portable_backends_always_run() {
  let keccak = run_all_keccakf1600_kernels(b"");
  assert!(keccak.iter().any(|r| r.name == "portable"));
  assert!(keccak.iter().any(|r| r.name == "compact"));

  let blake3 = run_all_blake3_kernels(b"");
  assert!(blake3.iter().any(|r| r.name == "portable"));
}

#[test]
fn active_backends_are_listed_and_supported() {
  let caps = platform::caps();

  let k = keccak_dispatch::active_kernel();
  assert!(caps.has(keccak_kernels::required_caps(k)));
  assert_eq!(keccak_kernels::id_from_name(k.as_str()), Some(k));

  let b = blake3_dispatch::active_kernel();
  assert!(caps.has(blake3_kernels::required_caps(b)));
  assert_eq!(blake3_kernels::id_from_name(b.as_str()), Some(b));
}

#[test]
fn harness_digests_match_public_types() {
  let data = b"conformance";
  for r in run_all_keccakf1600_kernels(data) {
    assert_eq!(r.sha3_256, Sha3_256::digest(data), "keccak backend {}", r.name);
  }
  for r in run_all_blake3_kernels(data) {
    assert_eq!(r.digest, Blake3::digest(data), "blake3 backend {}", r.name);
  }
}

#[test]
fn unknown_names_do_not_resolve() {
  assert_eq!(keccak_kernels::id_from_name("x86-avx512"), None);
  assert_eq!(blake3_kernels::id_from_name(""), None);
}

proptest! {
  #[test]
  fn keccak_backends_agree(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
    prop_assert_eq!(verify_keccakf1600_kernels(&data), Ok(()));
  }

  #[test]
  fn blake3_backends_agree(data in proptest::collection::vec(any::<u8>(), 0..8192)) {
    prop_assert_eq!(verify_blake3_kernels(&data), Ok(()));
  }
}
