//! BIP-39 seed derivation
//!
//! Stretches a mnemonic and optional passphrase into a 64-byte seed with
//! PBKDF2-HMAC-SHA512. No checksum validation happens here; restore flows
//! call [`crate::mnemonic::validate`] first.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// PBKDF2 rounds mandated by BIP-39
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Seed length in bytes
pub const SEED_LEN: usize = 64;

/// A 64-byte BIP-39 seed, zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(redacted)")
    }
}

/// Derive the seed for `mnemonic` and `passphrase`.
///
/// Both inputs are NFKD-normalized before hashing.
pub fn to_seed(mnemonic: &str, passphrase: &str) -> Seed {
    let password = Zeroizing::new(mnemonic.nfkd().collect::<String>());
    let salt = Zeroizing::new(format!("mnemonic{}", passphrase).nfkd().collect::<String>());

    let mut seed = [0u8; SEED_LEN];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed);
    let out = Seed(seed);
    seed.zeroize();
    out
}
