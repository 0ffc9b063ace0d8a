//! Injectable sources of secure randomness.

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use std::collections::VecDeque;

/// Secure randomness as the protocol consumes it
pub trait EntropySource {
    /// Fill `dest` with random bytes
    fn fill_bytes(&mut self, dest: &mut [u8]);

    /// Uniformly distributed integer in `[0, bound)`. `bound` must be positive.
    fn below(&mut self, bound: u32) -> u32;
}

/// Entropy backed by a cryptographically secure generator
#[derive(Clone, Debug, Default)]
pub struct SystemEntropy<R = OsRng>(R);

impl SystemEntropy<OsRng> {
    /// Entropy straight from the operating system
    pub fn os() -> Self {
        Self(OsRng)
    }
}

impl<R: RngCore + CryptoRng> SystemEntropy<R> {
    /// Wrap any cryptographically secure generator
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: RngCore + CryptoRng> EntropySource for SystemEntropy<R> {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }

    fn below(&mut self, bound: u32) -> u32 {
        // Rejection sampling, no modulo bias
        self.0.gen_range(0..bound)
    }
}

/// Deterministic entropy for tests.
///
/// Bytes are filled with a fixed pattern and `below` hands out queued values
/// reduced modulo the bound, then `0` once the queue is empty.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEntropy {
    values: VecDeque<u32>,
    fill_byte: u8,
}

impl ScriptedEntropy {
    /// Queue the values `below` will return, in order
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fill_byte: 0x42,
        }
    }

    /// Byte used to fill keys
    pub fn with_fill_byte(mut self, byte: u8) -> Self {
        self.fill_byte = byte;
        self
    }

    /// Values not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl EntropySource for ScriptedEntropy {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.fill_byte);
    }

    fn below(&mut self, bound: u32) -> u32 {
        self.values.pop_front().unwrap_or(0) % bound
    }
}
