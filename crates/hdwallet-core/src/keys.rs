//! BIP-32 key derivation
//!
//! Derives the master extended key from a BIP-39 seed, then walks child keys
//! (normal or hardened) along a derivation path. Curve arithmetic modulo the
//! secp256k1 order is delegated to libsecp256k1 through the `secp256k1` crate.

use std::fmt;

use hmac::{Hmac, Mac};
use secp256k1::{PublicKey as Secp256k1PublicKey, Scalar, Secp256k1, SecretKey, Signing};
use sha2::Sha512;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::path::{DerivationPath, DerivationSegment, PathError};
use crate::seed::Seed;

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for master key generation
const MASTER_KEY_DOMAIN: &[u8] = b"Bitcoin seed";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid seed: master key is zero or not below the curve order")]
    InvalidSeed,
    #[error("Invalid child key at index {index}: retry with the next index")]
    InvalidChildKey { index: u32, hardened: bool },
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error(transparent)]
    Path(#[from] PathError),
}

/// A private key and chain code pair, zeroized on drop.
///
/// The private key is always a valid secp256k1 scalar in `[1, n)`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    private_key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedKey {
    /// Build from raw parts, rejecting a private key outside `[1, n)`.
    pub fn new(private_key: [u8; 32], chain_code: [u8; 32]) -> Result<Self, KeyError> {
        SecretKey::from_slice(&private_key)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self {
            private_key,
            chain_code,
        })
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    fn secret_key(&self) -> Result<SecretKey, KeyError> {
        SecretKey::from_slice(&self.private_key)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("private_key", &"<redacted>")
            .field("chain_code", &"<redacted>")
            .finish()
    }
}

/// An extended key annotated with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedKey {
    pub path: String,
    pub key: ExtendedKey,
}

fn hmac_sha512(key: &[u8], data: &[&[u8]]) -> [u8; 64] {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts any key length");
    for part in data {
        mac.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Split an HMAC-SHA512 output into (IL, IR).
fn split(mut i: [u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&i[..32]);
    right.copy_from_slice(&i[32..]);
    i.zeroize();
    (left, right)
}

/// Derive the master extended key: HMAC-SHA512("Bitcoin seed", seed).
pub fn master_key(seed: &Seed) -> Result<ExtendedKey, KeyError> {
    let (mut il, ir) = split(hmac_sha512(MASTER_KEY_DOMAIN, &[seed.as_bytes()]));
    let valid = SecretKey::from_slice(&il).is_ok();
    if !valid {
        il.zeroize();
        return Err(KeyError::InvalidSeed);
    }
    Ok(ExtendedKey {
        private_key: il,
        chain_code: ir,
    })
}

/// Derive one child of `parent`.
///
/// `index` must be below 2^31; `hardened` selects the hardened branch. Fails
/// with [`KeyError::InvalidChildKey`] when IL ≥ n or the child key is zero;
/// the caller decides whether to move on to the next index.
pub fn derive_child(
    parent: &ExtendedKey,
    index: u32,
    hardened: bool,
) -> Result<ExtendedKey, KeyError> {
    let segment = DerivationSegment::new(index, hardened)?;
    derive_segment(&Secp256k1::signing_only(), parent, segment)
}

fn derive_segment<C: Signing>(
    secp: &Secp256k1<C>,
    parent: &ExtendedKey,
    segment: DerivationSegment,
) -> Result<ExtendedKey, KeyError> {
    let parent_secret = parent.secret_key()?;
    let wire_index = segment.wire_index().to_be_bytes();

    let i = if segment.is_hardened() {
        hmac_sha512(
            &parent.chain_code,
            &[&[0u8], &parent.private_key, &wire_index],
        )
    } else {
        let parent_public = Secp256k1PublicKey::from_secret_key(secp, &parent_secret);
        hmac_sha512(&parent.chain_code, &[&parent_public.serialize(), &wire_index])
    };
    let (mut il, ir) = split(i);

    let invalid = || KeyError::InvalidChildKey {
        index: segment.index(),
        hardened: segment.is_hardened(),
    };
    let tweak = Scalar::from_be_bytes(il).map_err(|_| invalid());
    il.zeroize();
    // add_tweak fails only when IL + k_par ≡ 0 (mod n)
    let child = parent_secret.add_tweak(&tweak?).map_err(|_| invalid())?;

    Ok(ExtendedKey {
        private_key: child.secret_bytes(),
        chain_code: ir,
    })
}

/// Walk `path` from `master`, returning the final key and one
/// [`DerivedKey`] per segment, in order.
pub fn derive_path(
    master: &ExtendedKey,
    path: &DerivationPath,
) -> Result<(ExtendedKey, Vec<DerivedKey>), KeyError> {
    let secp = Secp256k1::signing_only();
    let mut current = master.clone();
    let mut walked = DerivationPath::master();
    let mut chain = Vec::with_capacity(path.len());

    for &segment in path.segments() {
        current = derive_segment(&secp, &current, segment)?;
        walked = walked.child(segment);
        log::debug!("Derived {}", walked);
        chain.push(DerivedKey {
            path: walked.to_string(),
            key: current.clone(),
        });
    }

    Ok((current, chain))
}
