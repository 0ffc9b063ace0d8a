//! Cryptographic capabilities used by the fair-random protocol.
//!
//! This module provides:
//! - MacAlgorithm and MacDigest for keyed commitments
//! - SecretKey for the per-exchange 256-bit key
//! - EntropySource for injectable secure randomness

mod entropy;
mod key;
mod mac;

pub use entropy::{EntropySource, ScriptedEntropy, SystemEntropy};
pub use key::{SecretKey, KEY_LEN};
pub use mac::{HmacSha256, HmacSha3_256, MacAlgorithm, MacDigest};
