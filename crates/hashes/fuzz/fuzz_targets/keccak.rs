#![no_main]

use hashes::{
  Digest as _, VariableDigest as _,
  crypto::{Keccak256, Keccak512, KeccakSponge, PadByte, Sha3_224, Sha3_256, Sha3_384, Sha3_512},
};
use libfuzzer_sys::fuzz_target;

fn stream<D: hashes::Digest>(data: &[u8], split: usize) -> D::Output {
  let (a, b) = data.split_at(split.min(data.len()));
  let mut h = D::new();
  h.update(a);
  h.update(&[]);
  h.update(b);
  h.finalize()
}

fuzz_target!(|data: &[u8]| {
  use sha3::Digest as _;

  let split = data.first().copied().unwrap_or(0) as usize;

  assert_eq!(&Sha3_224::digest(data)[..], &sha3::Sha3_224::digest(data)[..]);
  assert_eq!(&Sha3_256::digest(data)[..], &sha3::Sha3_256::digest(data)[..]);
  assert_eq!(&Sha3_384::digest(data)[..], &sha3::Sha3_384::digest(data)[..]);
  assert_eq!(&Sha3_512::digest(data)[..], &sha3::Sha3_512::digest(data)[..]);
  assert_eq!(&Keccak256::digest(data)[..], &sha3::Keccak256::digest(data)[..]);
  assert_eq!(&Keccak512::digest(data)[..], &sha3::Keccak512::digest(data)[..]);

  assert_eq!(stream::<Sha3_256>(data, split), Sha3_256::digest(data));
  assert_eq!(stream::<Keccak512>(data, split), Keccak512::digest(data));

  // any rate in 1..200; a long squeeze starts with the short one
  let rate = usize::from(data.get(1).copied().unwrap_or(137)) % 199 + 1;
  if let Some(mut s) = KeccakSponge::new(rate, PadByte::Keccak) {
    s.update(data);
    let mut long = [0u8; 600];
    let mut short = [0u8; 37];
    s.finalize_into(&mut long);
    s.finalize_into(&mut short);
    assert_eq!(&long[..37], &short[..]);
  }
});
