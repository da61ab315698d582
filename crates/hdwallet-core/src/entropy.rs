//! Entropy sources for mnemonic generation
//!
//! Generation never reaches for a global RNG: callers hand an
//! [`EntropySource`] to [`crate::mnemonic::generate`]. Production code uses
//! [`OsEntropy`]; tests inject a seeded `StdRng` or [`FixedEntropy`].

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Error, Debug)]
pub enum EntropyError {
    #[error("Random source failed: {0}")]
    SourceFailed(String),
    #[error("Entropy exhausted: requested {requested} bytes, {available} available")]
    Exhausted { requested: usize, available: usize },
}

/// A blocking source of cryptographically secure random bytes.
pub trait EntropySource {
    /// Fill `dest` completely or fail.
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// Any cryptographic RNG is an entropy source.
impl<R: RngCore + CryptoRng> EntropySource for R {
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.try_fill_bytes(dest)
            .map_err(|e| EntropyError::SourceFailed(e.to_string()))
    }
}

/// The operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.fill_entropy(dest)
    }
}

/// Replays caller-supplied bytes, in order.
///
/// Only meant for known-vector tests: every byte is handed out once and the
/// source fails with [`EntropyError::Exhausted`] once drained.
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct FixedEntropy {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    offset: usize,
}

impl FixedEntropy {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            offset: 0,
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }
}

impl EntropySource for FixedEntropy {
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        if dest.len() > self.remaining() {
            return Err(EntropyError::Exhausted {
                requested: dest.len(),
                available: self.remaining(),
            });
        }
        let end = self.offset + dest.len();
        let chunk = self.bytes.get(self.offset..end).ok_or(EntropyError::Exhausted {
            requested: dest.len(),
            available: 0,
        })?;
        dest.copy_from_slice(chunk);
        self.offset = end;
        Ok(())
    }
}
