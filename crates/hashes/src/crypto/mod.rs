//! Cryptographic hash functions implemented in-tree.

pub mod blake3;
pub mod keccak;
pub mod keccak_hash;
pub mod sha3;

pub use blake3::{Blake3, Blake3Xof};
pub use keccak::PadByte;
pub use keccak_hash::{Keccak224, Keccak256, Keccak384, Keccak512, KeccakSponge};
pub use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};
