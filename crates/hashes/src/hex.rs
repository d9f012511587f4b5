//! Lowercase hex form of digests.

use alloc::{string::String, vec::Vec};

pub use ::hex::FromHexError;

/// Two lowercase hex characters per byte, no separators.
#[inline]
#[must_use]
pub fn to_hex(digest: &[u8]) -> String {
  ::hex::encode(digest)
}

/// Parse hex in either case.
#[inline]
pub fn from_hex(s: &str) -> Result<Vec<u8>, FromHexError> {
  ::hex::decode(s)
}

/// `true` when `hex_str` spells `digest`, ignoring ASCII case.
#[must_use]
pub fn eq_hex(digest: &[u8], hex_str: &str) -> bool {
  if hex_str.len() != digest.len().saturating_mul(2) {
    return false;
  }
  let (pairs, _) = hex_str.as_bytes().as_chunks::<2>();
  digest.iter().zip(pairs).all(|(&b, &[hi, lo])| {
    let nibble = |c: u8| char::from(c.to_ascii_lowercase()).to_digit(16);
    nibble(hi) == Some(u32::from(b >> 4)) && nibble(lo) == Some(u32::from(b & 0x0f))
  })
}

/// Write `digest` as hex followed by a newline.
#[cfg(feature = "std")]
pub fn write_hex<W: std::io::Write + ?Sized>(writer: &mut W, digest: &[u8]) -> std::io::Result<()> {
  writeln!(writer, "{}", to_hex(digest))
}
