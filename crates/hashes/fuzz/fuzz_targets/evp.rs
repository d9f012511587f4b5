#![no_main]

use hashes::evp::{EvpError, HashTy, Hasher, hashty_name};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let [index, len, custom, rate, rest @ ..] = data else {
    return;
  };

  let Some(hashty) = HashTy::from_index(*index % 9) else {
    assert_eq!(hashty_name(*index % 9), "unknown");
    return;
  };

  let mut h = Hasher::new();
  h.set_keccak_custom(*custom & 1 == 1);
  h.set_keccak_rate(u16::from(*rate));

  match h.configure(hashty, usize::from(*len)) {
    Ok(()) => {}
    Err(EvpError::UnsupportedDigestLength { .. } | EvpError::InvalidKeccakRate { .. }) => {
      assert!(!h.is_configured());
      assert_eq!(h.update(rest), Err(EvpError::Unconfigured));
      return;
    }
    Err(e) => panic!("unexpected configure error: {e}"),
  }

  let n = h.digest_len();
  let (a, b) = rest.split_at(rest.len() / 2);
  h.update(a).unwrap();
  h.update(b).unwrap();
  let streamed = h.finalize_vec().unwrap();
  assert_eq!(streamed.len(), n);

  let mut oneshot = vec![0u8; n];
  h.hash(rest, &mut oneshot).unwrap();
  assert_eq!(streamed, oneshot);

  let mut short = vec![0u8; n - 1];
  assert_eq!(
    h.finalize(&mut short),
    Err(EvpError::OutputTooShort { needed: n, got: n - 1 })
  );
});
