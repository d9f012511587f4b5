extern crate alloc;

use alloc::vec::Vec;

use traits::{Digest as _, Xof as _};

use super::{
  Blake3,
  kernels::{ALL, Blake3KernelId, kernel as kernel_for_id, required_caps},
};

/// Bytes of XOF output compared per backend, enough to cross two output blocks.
const XOF_LEN: usize = 131;

#[derive(Clone, Debug)]
pub struct KernelResult {
  pub name: &'static str,
  pub digest: [u8; 32],
  pub xof: [u8; XOF_LEN],
}

fn hasher_for_kernel(id: Blake3KernelId) -> Blake3 {
  Blake3::with_kernel(kernel_for_id(id))
}

fn run_kernel(id: Blake3KernelId, data: &[u8]) -> KernelResult {
  let mut h = hasher_for_kernel(id);
  h.update(data);
  let mut xof = [0u8; XOF_LEN];
  h.finalize_xof().squeeze(&mut xof);
  KernelResult {
    name: id.as_str(),
    digest: h.finalize(),
    xof,
  }
}

#[must_use]
pub fn run_all_blake3_kernels(data: &[u8]) -> Vec<KernelResult> {
  let caps = platform::caps();
  ALL
    .iter()
    .copied()
    .filter(|&id| caps.has(required_caps(id)))
    .map(|id| run_kernel(id, data))
    .collect()
}

pub fn verify_blake3_kernels(data: &[u8]) -> Result<(), &'static str> {
  let results = run_all_blake3_kernels(data);
  let Some((first, rest)) = results.split_first() else {
    return Ok(());
  };
  for r in rest {
    if r.digest != first.digest {
      return Err("blake3 kernel mismatch");
    }
    if r.xof != first.xof {
      return Err("blake3 xof mismatch across kernels");
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
  }

  #[test]
  fn every_kernel_matches_official_crate() {
    let caps = platform::caps();
    let lens = [0usize, 1, 63, 64, 65, 1023, 1024, 1025, 2048, 2049, 5000, 8193];

    for &id in ALL {
      if !caps.has(required_caps(id)) {
        continue;
      }

      for &len in &lens {
        let msg = pattern(len);
        let expected = *blake3::hash(&msg).as_bytes();
        assert_eq!(run_kernel(id, &msg).digest, expected, "kernel={} len={len}", id.as_str());

        for &chunk in &[1usize, 7, 63, 64, 65, 1024, 4096] {
          let mut h = hasher_for_kernel(id);
          for part in msg.chunks(chunk) {
            h.update(part);
          }
          assert_eq!(
            h.finalize(),
            expected,
            "blake3 streaming mismatch kernel={} len={} chunk={}",
            id.as_str(),
            len,
            chunk
          );
        }
      }
    }
  }

  #[test]
  fn xof_prefix_matches_official_crate() {
    let caps = platform::caps();
    let data = pattern(1234);

    let mut expected = [0u8; XOF_LEN];
    {
      let mut h = blake3::Hasher::new();
      h.update(&data);
      h.finalize_xof().fill(&mut expected);
    }

    for &id in ALL {
      if caps.has(required_caps(id)) {
        assert_eq!(run_kernel(id, &data).xof, expected, "blake3 xof mismatch kernel={}", id.as_str());
      }
    }
  }

  #[test]
  fn run_all_agree() {
    verify_blake3_kernels(b"abc").expect("kernels should agree");
    verify_blake3_kernels(&pattern(8192)).expect("kernels should agree");
  }
}
