//! SHA-3 (FIPS 202) fixed-output hashes.
//!
//! All four widths share the Keccak-f[1600] sponge with the `0x06` domain
//! byte; only the rate (`200 - 2 * output`) differs.

use super::keccak::{PadByte, fixed_sponge_digest};

fixed_sponge_digest!(
  /// SHA3-224.
  Sha3_224, rate = 144, out = 28, pad = PadByte::Sha3
);
fixed_sponge_digest!(
  /// SHA3-256.
  Sha3_256, rate = 136, out = 32, pad = PadByte::Sha3
);
fixed_sponge_digest!(
  /// SHA3-384.
  Sha3_384, rate = 104, out = 48, pad = PadByte::Sha3
);
fixed_sponge_digest!(
  /// SHA3-512.
  Sha3_512, rate = 72, out = 64, pad = PadByte::Sha3
);
