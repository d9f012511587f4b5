#![no_main]

use hashes::__internal::kernel_test::{verify_blake3_kernels, verify_keccakf1600_kernels};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  if let Err(e) = verify_keccakf1600_kernels(data) {
    panic!("{e}");
  }
  if let Err(e) = verify_blake3_kernels(data) {
    panic!("{e}");
  }
});
