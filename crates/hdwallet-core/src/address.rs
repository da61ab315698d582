//! Public keys and EIP-55 addresses
//!
//! `private_key · G` on secp256k1 (constant-time, via libsecp256k1), then
//! Keccak-256 of the 64-byte point, last 20 bytes, EIP-55 mixed-case hex.

use std::fmt;

use secp256k1::{PublicKey as Secp256k1PublicKey, Secp256k1, SecretKey};
use serde::Serialize;
use sha3::{Digest, Keccak256};
use thiserror::Error;

use crate::keys::KeyError;

/// Length of a rendered address, `0x` included
pub const ADDRESS_LEN: usize = 42;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: {0} hex characters (expected 40)")]
    InvalidLength(usize),
    #[error("Invalid address: non-hex character")]
    InvalidHex,
}

/// Uncompressed secp256k1 point, x ‖ y, without the SEC1 `0x04` prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 64]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// SEC1 uncompressed form (`0x04 ‖ x ‖ y`).
    pub fn to_uncompressed(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = 0x04;
        out[1..].copy_from_slice(&self.0);
        out
    }

    /// SEC1 compressed form (`0x02|0x03 ‖ x`).
    pub fn to_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out[0] = if self.0[63] & 1 == 0 { 0x02 } else { 0x03 };
        out[1..].copy_from_slice(&self.0[..32]);
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// A `0x`-prefixed, EIP-55 checksummed address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compute `private_key · G`.
pub fn private_to_public(private_key: &[u8; 32]) -> Result<PublicKey, KeyError> {
    let secret = SecretKey::from_slice(private_key)
        .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;
    let point = Secp256k1PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret);

    let mut xy = [0u8; 64];
    xy.copy_from_slice(&point.serialize_uncompressed()[1..]);
    Ok(PublicKey(xy))
}

/// Keccak-256 of the point, last 20 bytes, EIP-55 casing.
pub fn public_to_address(public_key: &PublicKey) -> Address {
    let hash = Keccak256::digest(public_key.as_bytes());
    Address(checksum_encode(&hex::encode(&hash[12..])))
}

pub fn private_to_address(private_key: &[u8; 32]) -> Result<Address, KeyError> {
    Ok(public_to_address(&private_to_public(private_key)?))
}

/// Apply EIP-55 casing to 40 lowercase hex characters; returns `0x…`.
///
/// Hex character `i` is upper-cased iff it is a letter and nibble `i` of
/// Keccak-256(lowercase hex) is ≥ 8.
fn checksum_encode(lower_hex: &str) -> String {
    let hash = Keccak256::digest(lower_hex.as_bytes());
    let mut out = String::with_capacity(ADDRESS_LEN);
    out.push_str("0x");
    for (i, c) in lower_hex.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn strip_hex_prefix(address: &str) -> &str {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address)
}

/// Re-case any 40-hex-character address (prefix optional, any case).
pub fn to_checksum_address(address: &str) -> Result<Address, AddressError> {
    let digits = strip_hex_prefix(address);
    if digits.len() != 40 {
        return Err(AddressError::InvalidLength(digits.len()));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressError::InvalidHex);
    }
    Ok(Address(checksum_encode(&digits.to_ascii_lowercase())))
}

/// Accepts `0x` + 40 hex characters that are all-lowercase, all-uppercase,
/// or correctly checksummed mixed case.
pub fn is_valid_address(address: &str) -> bool {
    if address.len() != ADDRESS_LEN {
        return false;
    }
    let Some(digits) = address.strip_prefix("0x") else {
        return false;
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        checksum_encode(&digits.to_ascii_lowercase()) == address
    } else {
        true
    }
}
