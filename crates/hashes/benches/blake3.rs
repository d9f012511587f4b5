//! BLAKE3 against the official `blake3` crate.

use core::{hint::black_box, time::Duration};

use criterion::{BenchmarkId, Criterion, SamplingMode, Throughput, criterion_group, criterion_main};
use hashes::{Digest as _, Xof as _, crypto::Blake3};

mod common;

#[inline]
fn official_hash_bytes(input: &[u8]) -> [u8; 32] {
  *blake3::hash(input).as_bytes()
}

fn blake3_oneshot_comparison(c: &mut Criterion) {
  let inputs = common::sized_inputs();
  let mut group = c.benchmark_group("blake3/oneshot");
  group.sample_size(40);
  group.warm_up_time(Duration::from_secs(2));
  group.measurement_time(Duration::from_secs(4));
  group.sampling_mode(SamplingMode::Flat);

  for (len, data) in &inputs {
    common::set_throughput(&mut group, *len);

    group.bench_with_input(BenchmarkId::new("ferrohash", len), data, |b, d| {
      b.iter(|| black_box(Blake3::digest(black_box(d))))
    });

    group.bench_with_input(BenchmarkId::new("official", len), data, |b, d| {
      b.iter(|| black_box(official_hash_bytes(black_box(d))))
    });
  }

  group.finish();
}

fn blake3_streaming(c: &mut Criterion) {
  let data = common::pseudo_random_bytes(1024 * 1024, 0xB1AE_E3B1_A1E3_0001);

  let mut group = c.benchmark_group("blake3/streaming");
  group.sample_size(30);
  group.throughput(Throughput::Bytes(data.len() as u64));

  for chunk_size in [64, 1024, 4096, 65536] {
    group.bench_function(format!("ferrohash/{chunk_size}B-chunks"), |b| {
      b.iter(|| {
        let mut h = Blake3::new();
        for chunk in data.chunks(chunk_size) {
          h.update(chunk);
        }
        black_box(h.finalize())
      })
    });
  }

  group.finish();
}

fn blake3_xof(c: &mut Criterion) {
  let mut group = c.benchmark_group("blake3/xof");

  for out_len in [32usize, 64, 1024, 16 * 1024] {
    group.throughput(Throughput::Bytes(out_len as u64));
    let mut out = vec![0u8; out_len];

    group.bench_function(BenchmarkId::new("ferrohash", out_len), |b| {
      b.iter(|| {
        Blake3::xof(black_box(b"xof bench")).squeeze(&mut out);
        black_box(&out);
      })
    });

    group.bench_function(BenchmarkId::new("official", out_len), |b| {
      b.iter(|| {
        let mut h = blake3::Hasher::new();
        h.update(black_box(b"xof bench"));
        h.finalize_xof().fill(&mut out);
        black_box(&out);
      })
    });
  }

  group.finish();
}

criterion_group!(benches, blake3_oneshot_comparison, blake3_streaming, blake3_xof);
criterion_main!(benches);
