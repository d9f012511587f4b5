//! BLAKE3 (hash + XOF).
//!
//! Input is split into 1 KiB chunks; each chunk is compressed block by block
//! into a chaining value, and chaining values are merged pairwise into a binary
//! tree through a stack whose height is the popcount of completed chunks. The
//! root node is rerun with an output-block counter to produce any number of
//! output bytes.
//!
//! Compression has a portable and an SSE4.1 backend, chosen once per process by
//! [`dispatch`].

#![allow(clippy::indexing_slicing)] // fixed-size arrays, schedule indices < 16

use core::cmp::min;

use traits::{Digest, VariableDigest, Xof};

#[doc(hidden)]
pub mod dispatch;
#[cfg(feature = "alloc")]
pub(crate) mod kernel_test;
pub mod kernels;
#[cfg(target_arch = "x86_64")]
mod x86_64;

use self::kernels::Kernel;

/// Default digest length in bytes.
pub const OUT_LEN: usize = 32;
pub const BLOCK_LEN: usize = 64;
pub const CHUNK_LEN: usize = 1024;

const CHUNK_START: u32 = 1 << 0;
const CHUNK_END: u32 = 1 << 1;
const PARENT: u32 = 1 << 2;
const ROOT: u32 = 1 << 3;

/// Enough for 2^54 chunks, i.e. every input addressable by a `u64` length.
const MAX_DEPTH: usize = 54;

pub(crate) const IV: [u32; 8] = [
  0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// `MSG_SCHEDULE[round][i]` is the message word fed to slot `i` of that round.
pub(crate) const MSG_SCHEDULE: [[usize; 16]; 7] = [
  [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
  [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8],
  [3, 4, 10, 12, 13, 2, 7, 14, 6, 5, 9, 0, 11, 15, 8, 1],
  [10, 7, 12, 9, 14, 3, 13, 15, 4, 0, 11, 2, 5, 8, 1, 6],
  [12, 13, 9, 11, 15, 10, 14, 8, 7, 2, 5, 3, 0, 1, 6, 4],
  [9, 14, 11, 5, 8, 12, 15, 1, 13, 3, 0, 10, 2, 6, 4, 7],
  [11, 15, 5, 0, 1, 9, 8, 6, 14, 10, 2, 12, 3, 4, 7, 13],
];

// ─────────────────────────────────────────────────────────────────────────────
// Compression
// ─────────────────────────────────────────────────────────────────────────────

#[inline(always)]
fn g(v: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, mx: u32, my: u32) {
  v[a] = v[a].wrapping_add(v[b]).wrapping_add(mx);
  v[d] = (v[d] ^ v[a]).rotate_right(16);
  v[c] = v[c].wrapping_add(v[d]);
  v[b] = (v[b] ^ v[c]).rotate_right(12);
  v[a] = v[a].wrapping_add(v[b]).wrapping_add(my);
  v[d] = (v[d] ^ v[a]).rotate_right(8);
  v[c] = v[c].wrapping_add(v[d]);
  v[b] = (v[b] ^ v[c]).rotate_right(7);
}

#[inline(always)]
fn round(v: &mut [u32; 16], m: &[u32; 16], s: &[usize; 16]) {
  // columns
  g(v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
  g(v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
  g(v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
  g(v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
  // diagonals
  g(v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
  g(v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
  g(v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
  g(v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
}

/// Portable compression function. Returns all 16 output words: the first 8
/// are the next chaining value, all 16 are one block of root output.
pub(crate) fn compress_portable(
  chaining_value: &[u32; 8],
  block_words: &[u32; 16],
  counter: u64,
  block_len: u32,
  flags: u32,
) -> [u32; 16] {
  let cv = chaining_value;
  let mut v = [
    cv[0],
    cv[1],
    cv[2],
    cv[3],
    cv[4],
    cv[5],
    cv[6],
    cv[7],
    IV[0],
    IV[1],
    IV[2],
    IV[3],
    counter as u32,
    (counter >> 32) as u32,
    block_len,
    flags,
  ];

  for schedule in &MSG_SCHEDULE {
    round(&mut v, block_words, schedule);
  }

  for i in 0..8 {
    v[i] ^= v[i + 8];
    v[i + 8] ^= cv[i];
  }
  v
}

#[inline(always)]
fn first_8_words(words: [u32; 16]) -> [u32; 8] {
  [
    words[0], words[1], words[2], words[3], words[4], words[5], words[6], words[7],
  ]
}

#[inline(always)]
fn words_from_block(block: &[u8; BLOCK_LEN]) -> [u32; 16] {
  let mut words = [0u32; 16];
  let (chunks, _) = block.as_chunks::<4>();
  for (w, chunk) in words.iter_mut().zip(chunks) {
    *w = u32::from_le_bytes(*chunk);
  }
  words
}

#[inline(always)]
fn words_to_bytes(words: &[u32; 16]) -> [u8; 2 * OUT_LEN] {
  let mut out = [0u8; 2 * OUT_LEN];
  let (chunks, _) = out.as_chunks_mut::<4>();
  for (chunk, w) in chunks.iter_mut().zip(words) {
    *chunk = w.to_le_bytes();
  }
  out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree nodes
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to run a node's final compression, either as a
/// non-root chaining value or as root output at any block counter.
#[derive(Clone, Copy)]
struct OutputState {
  kernel: Kernel,
  input_chaining_value: [u32; 8],
  block_words: [u32; 16],
  counter: u64,
  block_len: u32,
  flags: u32,
}

impl OutputState {
  #[inline]
  fn chaining_value(&self) -> [u32; 8] {
    first_8_words((self.kernel.compress)(
      &self.input_chaining_value,
      &self.block_words,
      self.counter,
      self.block_len,
      self.flags,
    ))
  }

  /// Root output block `output_block_counter`; the node's own counter is
  /// replaced by the block counter.
  #[inline]
  fn root_output_block(&self, output_block_counter: u64) -> [u8; 2 * OUT_LEN] {
    words_to_bytes(&(self.kernel.compress)(
      &self.input_chaining_value,
      &self.block_words,
      output_block_counter,
      self.block_len,
      self.flags | ROOT,
    ))
  }
}

#[inline]
fn parent_output(kernel: Kernel, left_child_cv: [u32; 8], right_child_cv: [u32; 8]) -> OutputState {
  let mut block_words = [0u32; 16];
  block_words[..8].copy_from_slice(&left_child_cv);
  block_words[8..].copy_from_slice(&right_child_cv);
  OutputState {
    kernel,
    input_chaining_value: IV,
    block_words,
    counter: 0,
    block_len: BLOCK_LEN as u32,
    flags: PARENT,
  }
}

/// One chunk in progress. The chunk's last block always stays buffered so
/// `CHUNK_END` (and `ROOT`) can be applied when the output is requested.
#[derive(Clone, Copy)]
struct ChunkState {
  kernel: Kernel,
  chaining_value: [u32; 8],
  chunk_counter: u64,
  block: [u8; BLOCK_LEN],
  block_len: u8,
  blocks_compressed: u8,
}

impl ChunkState {
  #[inline]
  fn new(chunk_counter: u64, kernel: Kernel) -> Self {
    Self {
      kernel,
      chaining_value: IV,
      chunk_counter,
      block: [0u8; BLOCK_LEN],
      block_len: 0,
      blocks_compressed: 0,
    }
  }

  #[inline]
  fn len(&self) -> usize {
    BLOCK_LEN * self.blocks_compressed as usize + self.block_len as usize
  }

  #[inline]
  fn start_flag(&self) -> u32 {
    if self.blocks_compressed == 0 { CHUNK_START } else { 0 }
  }

  /// Caller never passes more than the chunk's remaining capacity.
  fn update(&mut self, mut input: &[u8]) {
    while !input.is_empty() {
      // A full buffered block is compressed only once more input shows it is
      // not the chunk's last.
      if self.block_len as usize == BLOCK_LEN {
        let block_words = words_from_block(&self.block);
        self.chaining_value = first_8_words((self.kernel.compress)(
          &self.chaining_value,
          &block_words,
          self.chunk_counter,
          BLOCK_LEN as u32,
          self.start_flag(),
        ));
        self.blocks_compressed += 1;
        self.block = [0u8; BLOCK_LEN];
        self.block_len = 0;
      }

      let take = min(BLOCK_LEN - self.block_len as usize, input.len());
      let (head, rest) = input.split_at(take);
      self.block[self.block_len as usize..][..take].copy_from_slice(head);
      self.block_len += take as u8;
      input = rest;
    }
  }

  #[inline]
  fn output(&self) -> OutputState {
    OutputState {
      kernel: self.kernel,
      input_chaining_value: self.chaining_value,
      block_words: words_from_block(&self.block),
      counter: self.chunk_counter,
      block_len: u32::from(self.block_len),
      flags: self.start_flag() | CHUNK_END,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hasher
// ─────────────────────────────────────────────────────────────────────────────

/// Incremental BLAKE3 hasher.
///
/// [`Digest::finalize`] gives the default 32-byte hash; [`finalize_xof`](Self::finalize_xof)
/// or [`VariableDigest::finalize_into`] give any other length. A shorter output
/// is always a prefix of a longer one.
#[derive(Clone)]
pub struct Blake3 {
  kernel: Kernel,
  chunk_state: ChunkState,
  cv_stack: [[u32; 8]; MAX_DEPTH],
  cv_stack_len: u8,
}

impl Default for Blake3 {
  #[inline]
  fn default() -> Self {
    Self::with_kernel(dispatch::kernel())
  }
}

impl core::fmt::Debug for Blake3 {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Blake3")
      .field("kernel", &self.kernel.id)
      .field("chunk_counter", &self.chunk_state.chunk_counter)
      .field("cv_stack_len", &self.cv_stack_len)
      .finish_non_exhaustive()
  }
}

impl Blake3 {
  #[inline]
  pub(crate) fn with_kernel(kernel: Kernel) -> Self {
    Self {
      kernel,
      chunk_state: ChunkState::new(0, kernel),
      cv_stack: [[0u32; 8]; MAX_DEPTH],
      cv_stack_len: 0,
    }
  }

  /// One-shot XOF reader over `data`.
  #[inline]
  #[must_use]
  pub fn xof(data: &[u8]) -> Blake3Xof {
    let mut h = Self::new();
    Digest::update(&mut h, data);
    h.finalize_xof()
  }

  #[inline]
  fn push_stack(&mut self, cv: [u32; 8]) {
    self.cv_stack[self.cv_stack_len as usize] = cv;
    self.cv_stack_len += 1;
  }

  #[inline]
  fn pop_stack(&mut self) -> [u32; 8] {
    self.cv_stack_len -= 1;
    self.cv_stack[self.cv_stack_len as usize]
  }

  /// Merge a finished chunk into the tree. Every trailing zero bit of
  /// `total_chunks` is a completed subtree whose root sits on the stack.
  fn add_chunk_chaining_value(&mut self, mut new_cv: [u32; 8], mut total_chunks: u64) {
    while total_chunks & 1 == 0 {
      new_cv = parent_output(self.kernel, self.pop_stack(), new_cv).chaining_value();
      total_chunks >>= 1;
    }
    self.push_stack(new_cv);
  }

  /// Fold the current chunk up through the stack. `ROOT` is applied later,
  /// only to the node this returns.
  fn root_output(&self) -> OutputState {
    let mut output = self.chunk_state.output();
    let mut parent_nodes_remaining = self.cv_stack_len as usize;
    while parent_nodes_remaining > 0 {
      parent_nodes_remaining -= 1;
      output = parent_output(
        self.kernel,
        self.cv_stack[parent_nodes_remaining],
        output.chaining_value(),
      );
    }
    output
  }

  /// Finalize into an extendable output reader positioned at byte 0.
  #[must_use]
  #[inline]
  pub fn finalize_xof(&self) -> Blake3Xof {
    Blake3Xof::new(self.root_output())
  }

  /// Name of the compression backend this hasher runs on.
  #[inline]
  #[must_use]
  pub fn kernel_name(&self) -> &'static str {
    self.kernel.id.as_str()
  }
}

impl Digest for Blake3 {
  const OUTPUT_SIZE: usize = OUT_LEN;
  type Output = [u8; OUT_LEN];

  #[inline]
  fn new() -> Self {
    Self::default()
  }

  fn update(&mut self, mut input: &[u8]) {
    while !input.is_empty() {
      if self.chunk_state.len() == CHUNK_LEN {
        let chunk_cv = self.chunk_state.output().chaining_value();
        let total_chunks = self.chunk_state.chunk_counter + 1;
        self.add_chunk_chaining_value(chunk_cv, total_chunks);
        self.chunk_state = ChunkState::new(total_chunks, self.kernel);
      }

      let take = min(CHUNK_LEN - self.chunk_state.len(), input.len());
      let (head, rest) = input.split_at(take);
      self.chunk_state.update(head);
      input = rest;
    }
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    let block = self.root_output().root_output_block(0);
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&block[..OUT_LEN]);
    out
  }

  #[inline]
  fn reset(&mut self) {
    *self = Self::with_kernel(self.kernel);
  }
}

impl VariableDigest for Blake3 {
  #[inline]
  fn update(&mut self, data: &[u8]) {
    Digest::update(self, data);
  }

  #[inline]
  fn finalize_into(&self, out: &mut [u8]) {
    self.finalize_xof().squeeze(out);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// XOF
// ─────────────────────────────────────────────────────────────────────────────

/// Seekable BLAKE3 output stream.
///
/// Output block `n` is the root compression rerun with counter `n`, so any
/// position can be reached without generating the bytes before it.
#[derive(Clone)]
pub struct Blake3Xof {
  output: OutputState,
  position: u64,
  buf: [u8; 2 * OUT_LEN],
  buf_block: Option<u64>,
}

impl Blake3Xof {
  #[inline]
  fn new(output: OutputState) -> Self {
    Self {
      output,
      position: 0,
      buf: [0u8; 2 * OUT_LEN],
      buf_block: None,
    }
  }

  /// Byte offset of the next squeezed byte.
  #[inline]
  #[must_use]
  pub fn position(&self) -> u64 {
    self.position
  }

  /// Move the read position to byte `position` of the output stream.
  #[inline]
  pub fn set_position(&mut self, position: u64) {
    self.position = position;
  }
}

impl core::fmt::Debug for Blake3Xof {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Blake3Xof")
      .field("position", &self.position)
      .finish_non_exhaustive()
  }
}

impl Xof for Blake3Xof {
  fn squeeze(&mut self, mut out: &mut [u8]) {
    const BLOCK: u64 = 2 * OUT_LEN as u64;

    while !out.is_empty() {
      let block = self.position / BLOCK;
      let offset = (self.position % BLOCK) as usize;

      // Whole blocks go straight to the caller.
      if offset == 0 && out.len() >= 2 * OUT_LEN {
        let (dst, rest) = core::mem::take(&mut out).split_at_mut(2 * OUT_LEN);
        dst.copy_from_slice(&self.output.root_output_block(block));
        self.position = self.position.wrapping_add(BLOCK);
        out = rest;
        continue;
      }

      if self.buf_block != Some(block) {
        self.buf = self.output.root_output_block(block);
        self.buf_block = Some(block);
      }

      let take = min(2 * OUT_LEN - offset, out.len());
      let (dst, rest) = core::mem::take(&mut out).split_at_mut(take);
      dst.copy_from_slice(&self.buf[offset..offset + take]);
      self.position = self.position.wrapping_add(take as u64);
      out = rest;
    }
  }
}
