use hashes::{
  Digest as _, VariableDigest as _,
  crypto::{Keccak224, Keccak256, Keccak384, Keccak512, KeccakSponge, PadByte},
};
use proptest::prelude::*;

fn keccak224_ref(data: &[u8]) -> [u8; 28] {
  use sha3::Digest as _;
  let out = sha3::Keccak224::digest(data);
  let mut bytes = [0u8; 28];
  bytes.copy_from_slice(&out);
  bytes
}

fn keccak256_ref(data: &[u8]) -> [u8; 32] {
  use sha3::Digest as _;
  let out = sha3::Keccak256::digest(data);
  let mut bytes = [0u8; 32];
  bytes.copy_from_slice(&out);
  bytes
}

fn keccak384_ref(data: &[u8]) -> [u8; 48] {
  use sha3::Digest as _;
  let out = sha3::Keccak384::digest(data);
  let mut bytes = [0u8; 48];
  bytes.copy_from_slice(&out);
  bytes
}

fn keccak512_ref(data: &[u8]) -> [u8; 64] {
  use sha3::Digest as _;
  let out = sha3::Keccak512::digest(data);
  let mut bytes = [0u8; 64];
  bytes.copy_from_slice(&out);
  bytes
}

proptest! {
  #[test]
  fn keccak224_matches_sha3_crate(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    prop_assert_eq!(Keccak224::digest(&data), keccak224_ref(&data));
  }

  #[test]
  fn keccak256_matches_sha3_crate(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    prop_assert_eq!(Keccak256::digest(&data), keccak256_ref(&data));
  }

  #[test]
  fn keccak384_matches_sha3_crate(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    prop_assert_eq!(Keccak384::digest(&data), keccak384_ref(&data));
  }

  #[test]
  fn keccak512_matches_sha3_crate(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    prop_assert_eq!(Keccak512::digest(&data), keccak512_ref(&data));
  }

  #[test]
  fn keccak256_streaming_matches_sha3_crate(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
    let expected = keccak256_ref(&data);

    let mut h = Keccak256::new();
    let mut i = 0usize;
    while i < data.len() {
      let step = (data[i] as usize % 97) + 1;
      let end = core::cmp::min(data.len(), i + step);
      h.update(&data[i..end]);
      i = end;
    }

    prop_assert_eq!(h.finalize(), expected);
  }

  #[test]
  fn sponge_at_standard_rates_matches_sha3_crate(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
    let mut out = [0u8; 64];

    let mut s = KeccakSponge::for_digest_len(28, PadByte::Keccak).unwrap();
    s.update(&data);
    s.finalize_into(&mut out[..28]);
    prop_assert_eq!(&out[..28], &keccak224_ref(&data)[..]);

    let mut s = KeccakSponge::for_digest_len(48, PadByte::Keccak).unwrap();
    s.update(&data);
    s.finalize_into(&mut out[..48]);
    prop_assert_eq!(&out[..48], &keccak384_ref(&data)[..]);

    let mut s = KeccakSponge::new(72, PadByte::Keccak).unwrap();
    s.update(&data);
    s.finalize_into(&mut out);
    prop_assert_eq!(out, keccak512_ref(&data));
  }

  #[test]
  fn sponge_output_is_prefix_stable(
    data in proptest::collection::vec(any::<u8>(), 0..512),
    rate_lanes in 1usize..25,
    short in 0usize..300,
    extra in 0usize..300,
  ) {
    let mut s = KeccakSponge::new(rate_lanes * 8, PadByte::Sha3).unwrap();
    s.update(&data);
    let mut long = vec![0u8; short + extra];
    s.finalize_into(&mut long);
    let mut head = vec![0u8; short];
    s.finalize_into(&mut head);
    prop_assert_eq!(&long[..short], &head[..]);
  }
}

#[test]
fn known_vectors() {
  assert_eq!(
    hashes::hex::to_hex(&Keccak256::digest(b"hello")),
    "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
  );
  assert_eq!(
    hashes::hex::to_hex(&Keccak256::digest(b"")),
    "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
  );
}

#[test]
fn rate_sized_inputs_match_sha3_crate() {
  for rate in [Keccak224::RATE, Keccak256::RATE, Keccak384::RATE, Keccak512::RATE] {
    for len in [rate - 1, rate, rate + 1, 3 * rate] {
      let data = vec![0x5Cu8; len];
      assert_eq!(Keccak224::digest(&data), keccak224_ref(&data), "len={len}");
      assert_eq!(Keccak256::digest(&data), keccak256_ref(&data), "len={len}");
      assert_eq!(Keccak384::digest(&data), keccak384_ref(&data), "len={len}");
      assert_eq!(Keccak512::digest(&data), keccak512_ref(&data), "len={len}");
    }
  }
}
