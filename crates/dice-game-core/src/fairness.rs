//! Commit-reveal exchange producing one jointly determined random integer.
//!
//! The first contributor draws a secret in `[0, range)` and a fresh key, and
//! publishes `MAC(key, secret)`. Only after the digest is out does the
//! counterpart supply its own value. The result is
//! `(secret + counterpart) mod range`, which is uniform whenever the secret
//! is, whatever the counterpart picked. Revealing key and secret lets the
//! counterpart recompute the digest and catch a dishonest first contributor.

use crate::crypto::{EntropySource, MacAlgorithm, MacDigest, SecretKey};
use crate::error::{GameError, Result};
use std::fmt;
use tracing::{debug, error};
use uuid::Uuid;

/// Identifier of one exchange, for log correlation
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExchangeId(Uuid);

impl ExchangeId {
    /// Create a new random exchange ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExchangeId({})", self.0)
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encoding of the secret integer fed to the MAC
pub fn encode_secret(secret: u32) -> [u8; 4] {
    secret.to_le_bytes()
}

/// An exchange in progress: digest published, key and secret still private
pub struct FairExchange {
    id: ExchangeId,
    range: u32,
    key: SecretKey,
    secret: u32,
    digest: MacDigest,
    counterpart: Option<u32>,
}

impl FairExchange {
    /// Draw a key and a secret in `[0, range)` and commit to the secret
    pub fn begin<M, E>(range: u32, mac: &M, entropy: &mut E) -> Result<Self>
    where
        M: MacAlgorithm + ?Sized,
        E: EntropySource + ?Sized,
    {
        if range == 0 {
            return Err(GameError::invalid("Range must be a positive integer."));
        }

        let key = SecretKey::generate(entropy);
        let secret = entropy.below(range);
        let digest = mac.compute(key.as_bytes(), &encode_secret(secret))?;
        let id = ExchangeId::new();

        debug!(exchange = %id, range, digest = %digest, mac = mac.name(), "Commitment published");

        Ok(Self {
            id,
            range,
            key,
            secret,
            digest,
            counterpart: None,
        })
    }

    pub fn id(&self) -> ExchangeId {
        self.id
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    /// Digest to publish before asking for the counterpart value
    pub fn digest(&self) -> &MacDigest {
        &self.digest
    }

    /// Record the counterpart's contribution
    pub fn supply_counterpart_value(&mut self, value: u32) -> Result<()> {
        if self.counterpart.is_some() {
            return Err(GameError::Protocol(format!(
                "counterpart value already supplied for exchange {}",
                self.id
            )));
        }
        if value >= self.range {
            return Err(GameError::Range {
                value,
                range: self.range,
            });
        }
        debug!(exchange = %self.id, value, "Counterpart value supplied");
        self.counterpart = Some(value);
        Ok(())
    }

    /// Disclose key and secret together with the combined result.
    ///
    /// Consumes the exchange so its secret material cannot be reused.
    pub fn reveal(self) -> Result<Reveal> {
        let counterpart = self.counterpart.ok_or_else(|| {
            GameError::Protocol(format!(
                "reveal called before the counterpart value was supplied for exchange {}",
                self.id
            ))
        })?;

        let result = ((u64::from(self.secret) + u64::from(counterpart)) % u64::from(self.range)) as u32;
        debug!(exchange = %self.id, secret = self.secret, counterpart, result, "Exchange revealed");

        Ok(Reveal {
            id: self.id,
            range: self.range,
            key: self.key,
            secret: self.secret,
            counterpart,
            result,
            digest: self.digest,
        })
    }
}

impl fmt::Debug for FairExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FairExchange")
            .field("id", &self.id)
            .field("range", &self.range)
            .field("digest", &self.digest)
            .field("counterpart", &self.counterpart)
            .finish_non_exhaustive()
    }
}

/// Everything disclosed at the end of an exchange
#[derive(Debug)]
pub struct Reveal {
    id: ExchangeId,
    range: u32,
    key: SecretKey,
    secret: u32,
    counterpart: u32,
    result: u32,
    digest: MacDigest,
}

impl Reveal {
    pub fn id(&self) -> ExchangeId {
        self.id
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn key(&self) -> &SecretKey {
        &self.key
    }

    pub fn secret(&self) -> u32 {
        self.secret
    }

    pub fn counterpart(&self) -> u32 {
        self.counterpart
    }

    /// `(secret + counterpart) mod range`
    pub fn result(&self) -> u32 {
        self.result
    }

    pub fn digest(&self) -> &MacDigest {
        &self.digest
    }

    /// Check the published digest against the revealed key and secret
    pub fn verify<M: MacAlgorithm + ?Sized>(&self, mac: &M) -> Result<()> {
        verify(mac, &self.digest, &self.key, self.secret)
    }
}

/// Recompute `MAC(key, secret)` and compare it with the published digest.
///
/// A mismatch means the first contributor cheated and is reported as a
/// [`GameError::TrustViolation`].
pub fn verify<M: MacAlgorithm + ?Sized>(
    mac: &M,
    digest: &MacDigest,
    key: &SecretKey,
    secret: u32,
) -> Result<()> {
    let recomputed = mac.compute(key.as_bytes(), &encode_secret(secret))?;
    if &recomputed != digest {
        error!(published = %digest, recomputed = %recomputed, "Commitment verification failed");
        return Err(GameError::TrustViolation {
            published: digest.to_hex(),
            recomputed: recomputed.to_hex(),
        });
    }
    Ok(())
}
