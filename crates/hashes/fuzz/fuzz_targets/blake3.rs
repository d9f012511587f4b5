#![no_main]

use hashes::{Digest as _, Xof as _, crypto::Blake3};
use libfuzzer_sys::fuzz_target;

fn parse_u16_le(input: &[u8]) -> u16 {
  match input {
    [] => 0,
    [b] => u16::from(*b),
    [a, b, ..] => u16::from_le_bytes([*a, *b]),
  }
}

fuzz_target!(|data: &[u8]| {
  assert_eq!(Blake3::digest(data), *blake3::hash(data).as_bytes());

  let out_len = usize::from(parse_u16_le(data)) % 2049;
  let split = if out_len == 0 {
    0
  } else {
    usize::from(data.get(2).copied().unwrap_or(0)) % (out_len + 1)
  };

  let mut ours = vec![0u8; out_len];
  {
    let mut h = Blake3::new();
    h.update(data);
    let mut reader = h.finalize_xof();
    let (a, b) = ours.split_at_mut(split);
    reader.squeeze(a);
    reader.squeeze(b);
  }

  let mut expected = vec![0u8; out_len];
  {
    let mut h = blake3::Hasher::new();
    h.update(data);
    h.finalize_xof().fill(&mut expected);
  }

  assert_eq!(ours, expected);
});
