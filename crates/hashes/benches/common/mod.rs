use core::hint::black_box;

/// SplitMix64 step. Only used to keep bench inputs away from all-zero buffers.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
  *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
  let mut z = *state;
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

pub fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut state = seed ^ len as u64;
  let mut out = Vec::with_capacity(len + 8);
  while out.len() < len {
    out.extend_from_slice(&splitmix64(&mut state).to_le_bytes());
  }
  out.truncate(len);
  black_box(&out);
  out
}

/// Sizes straddling the SHA3-256 rate (136), the BLAKE3 block (64) and chunk
/// (1024), plus a few bulk sizes.
pub fn sized_inputs() -> Vec<(usize, Vec<u8>)> {
  let sizes = [0usize, 1, 32, 63, 64, 65, 135, 136, 137, 1023, 1024, 1025, 4096, 16 * 1024, 64 * 1024, 1024 * 1024];
  sizes
    .into_iter()
    .map(|len| (len, pseudo_random_bytes(len, 0xF3E0_4A5B_0000_0001)))
    .collect()
}

pub fn set_throughput(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>, len: usize) {
  if len == 0 {
    group.throughput(criterion::Throughput::Elements(1));
  } else {
    group.throughput(criterion::Throughput::Bytes(len as u64));
  }
}
