extern crate alloc;

use alloc::vec::Vec;

use super::{
  KeccakCore, LANES, PadByte, STATE_LEN,
  kernels::{ALL, permute_fn_unchecked, required_caps},
};

#[derive(Clone, Debug)]
pub struct KernelResult {
  pub name: &'static str,
  pub state: [u64; LANES],
  /// SHA3-256 of the same input, through the sponge driven by this backend.
  pub sha3_256: [u8; 32],
}

fn state_from_bytes(data: &[u8]) -> [u64; LANES] {
  let mut buf = [0u8; STATE_LEN];
  for (dst, src) in buf.iter_mut().zip(data) {
    *dst = *src;
  }

  let mut out = [0u64; LANES];
  let (chunks, _) = buf.as_chunks::<8>();
  for (lane, chunk) in out.iter_mut().zip(chunks) {
    *lane = u64::from_le_bytes(*chunk);
  }
  out
}

/// Run every backend this CPU supports: one permutation of `data` loaded as a
/// state, and a full SHA3-256 of `data`.
#[must_use]
pub fn run_all_keccakf1600_kernels(data: &[u8]) -> Vec<KernelResult> {
  let caps = platform::caps();
  let init = state_from_bytes(data);

  ALL
    .iter()
    .copied()
    .filter(|&id| caps.has(required_caps(id)))
    .map(|id| {
      let permute = permute_fn_unchecked(id);
      let mut state = init;
      permute(&mut state);

      let mut sponge = KeccakCore::with_permute(136, permute);
      sponge.update(data);

      KernelResult {
        name: id.as_str(),
        state,
        sha3_256: sponge.finalize_fixed(PadByte::Sha3),
      }
    })
    .collect()
}

pub fn verify_keccakf1600_kernels(data: &[u8]) -> Result<(), &'static str> {
  let results = run_all_keccakf1600_kernels(data);
  let Some((first, rest)) = results.split_first() else {
    return Ok(());
  };
  for r in rest {
    if r.state != first.state {
      return Err("keccakf1600 kernel mismatch");
    }
    if r.sha3_256 != first.sha3_256 {
      return Err("keccak sponge mismatch across kernels");
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_state_permutes_to_known_vector() {
    let expected: [u64; LANES] = [
      0xF1258F7940E1DDE7,
      0x84D5CCF933C0478A,
      0xD598261EA65AA9EE,
      0xBD1547306F80494D,
      0x8B284E056253D057,
      0xFF97A42D7F8E6FD4,
      0x90FEE5A0A44647C4,
      0x8C5BDA0CD6192E76,
      0xAD30A6F71B19059C,
      0x30935AB7D08FFC64,
      0xEB5AA93F2317D635,
      0xA9A6E6260D712103,
      0x81A57C16DBCF555F,
      0x43B831CD0347C826,
      0x01F22F1A11A5569F,
      0x05E5635A21D9AE61,
      0x64BEFEF28CC970F2,
      0x613670957BC46611,
      0xB87C5A554FD00ECB,
      0x8C3EE88A1CCF32C8,
      0x940C7922AE3A2614,
      0x1841F924A2C509E4,
      0x16F53526E70465C2,
      0x75F644E97F30A13B,
      0xEAF1FF7B5CECA249,
    ];

    let results = run_all_keccakf1600_kernels(&[]);
    // portable and compact run everywhere
    assert!(results.len() >= 2);
    for r in results {
      assert_eq!(r.state, expected, "keccak-f[1600] mismatch for kernel={}", r.name);
    }
  }

  #[test]
  fn empty_sha3_256_agrees_with_known_digest() {
    let expected = [
      0xa7, 0xff, 0xc6, 0xf8, 0xbf, 0x1e, 0xd7, 0x66, 0x51, 0xc1, 0x47, 0x56, 0xa0, 0x61, 0xd6, 0x62, 0xf5, 0x80, 0xff,
      0x4d, 0xe4, 0x3b, 0x49, 0xfa, 0x82, 0xd8, 0x0a, 0x4b, 0x80, 0xf8, 0x43, 0x4a,
    ];
    for r in run_all_keccakf1600_kernels(&[]) {
      assert_eq!(r.sha3_256, expected, "sha3-256 mismatch for kernel={}", r.name);
    }
  }

  #[test]
  fn run_all_agree() {
    verify_keccakf1600_kernels(b"abc").expect("kernels should agree");
    verify_keccakf1600_kernels(&[0u8; 200]).expect("kernels should agree");
    verify_keccakf1600_kernels(&[0xa5u8; 137]).expect("kernels should agree");
  }
}
