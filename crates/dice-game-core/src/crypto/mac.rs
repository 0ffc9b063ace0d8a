//! Keyed message authentication used to commit to a secret value.

use crate::error::{GameError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sha3::Sha3_256;
use std::fmt;
use subtle::ConstantTimeEq;

/// Computes a keyed authentication digest of at least 256 bits
pub trait MacAlgorithm {
    /// Human-readable algorithm name
    fn name(&self) -> &'static str;

    /// Digest of `message` under `key`
    fn compute(&self, key: &[u8], message: &[u8]) -> Result<MacDigest>;
}

/// HMAC over SHA3-256
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha3_256;

impl MacAlgorithm for HmacSha3_256 {
    fn name(&self) -> &'static str {
        "HMAC-SHA3-256"
    }

    fn compute(&self, key: &[u8], message: &[u8]) -> Result<MacDigest> {
        let mut mac = <Hmac<Sha3_256> as Mac>::new_from_slice(key)
            .map_err(|e| GameError::InvalidKey(e.to_string()))?;
        mac.update(message);
        Ok(MacDigest(mac.finalize().into_bytes().to_vec()))
    }
}

/// HMAC over SHA-256
#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSha256;

impl MacAlgorithm for HmacSha256 {
    fn name(&self) -> &'static str {
        "HMAC-SHA256"
    }

    fn compute(&self, key: &[u8], message: &[u8]) -> Result<MacDigest> {
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key)
            .map_err(|e| GameError::InvalidKey(e.to_string()))?;
        mac.update(message);
        Ok(MacDigest(mac.finalize().into_bytes().to_vec()))
    }
}

/// Published digest of a commitment
#[derive(Clone, Eq)]
pub struct MacDigest(Vec<u8>);

impl MacDigest {
    /// Create from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse a digest from hex (either case)
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| GameError::invalid(format!("Digest is not valid hex: {}", e)))?;
        if bytes.is_empty() {
            return Err(GameError::invalid("Digest must not be empty."));
        }
        Ok(Self(bytes))
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Uppercase hex without separators
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }
}

impl PartialEq for MacDigest {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && bool::from(self.0.ct_eq(&other.0))
    }
}

impl fmt::Debug for MacDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacDigest({})", hex::encode_upper(&self.0[..self.0.len().min(8)]))
    }
}

impl fmt::Display for MacDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
