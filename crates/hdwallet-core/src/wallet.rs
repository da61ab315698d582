//! Wallet generation, restore and batch address derivation
//!
//! Composes the lower layers:
//!
//! ```text
//! entropy -> mnemonic -> seed -> master key -> derive_path -> public key -> address
//! ```
//!
//! Every operation either returns complete key material or fails without
//! returning any.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::address::{private_to_public, public_to_address, Address, PublicKey};
use crate::entropy::EntropySource;
use crate::keys::{derive_child, derive_path, master_key, DerivedKey, ExtendedKey, KeyError};
use crate::mnemonic::{self, MnemonicError, Strength};
use crate::path::{DerivationPath, DerivationSegment, PathError};
use crate::seed::{to_seed, Seed};

/// Change index for external (receiving) addresses
const EXTERNAL_CHAIN: u32 = 0;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Everything derived for one wallet.
#[derive(Clone)]
pub struct WalletInfo {
    /// Canonical mnemonic: single-space separated words
    pub mnemonic: Zeroizing<String>,
    pub seed: Seed,
    pub master_key: ExtendedKey,
    /// One entry per path segment
    pub derived_keys: Vec<DerivedKey>,
    pub private_key: Zeroizing<[u8; 32]>,
    pub public_key: PublicKey,
    pub address: Address,
    pub strength: Strength,
    pub word_count: usize,
    /// Canonical path (`'` hardened marker)
    pub path: String,
}

impl fmt::Debug for WalletInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletInfo")
            .field("mnemonic", &"<redacted>")
            .field("strength", &self.strength)
            .field("word_count", &self.word_count)
            .field("path", &self.path)
            .field("public_key", &self.public_key)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Hex-encoded view of a [`WalletInfo`] for display layers.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    pub mnemonic: String,
    pub word_count: usize,
    pub strength_bits: usize,
    pub seed: String,
    pub master_private_key: String,
    pub master_chain_code: String,
    pub derivation: Vec<DerivedKeySummary>,
    pub path: String,
    pub private_key: String,
    pub public_key: String,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize)]
pub struct DerivedKeySummary {
    pub path: String,
    pub private_key: String,
    pub chain_code: String,
}

impl WalletInfo {
    pub fn summary(&self) -> WalletSummary {
        WalletSummary {
            mnemonic: self.mnemonic.to_string(),
            word_count: self.word_count,
            strength_bits: self.strength.bits(),
            seed: self.seed.to_hex(),
            master_private_key: hex::encode(self.master_key.private_key()),
            master_chain_code: hex::encode(self.master_key.chain_code()),
            derivation: self
                .derived_keys
                .iter()
                .map(|d| DerivedKeySummary {
                    path: d.path.clone(),
                    private_key: hex::encode(d.key.private_key()),
                    chain_code: hex::encode(d.key.chain_code()),
                })
                .collect(),
            path: self.path.clone(),
            private_key: hex::encode(*self.private_key),
            public_key: self.public_key.to_hex(),
            address: self.address.clone(),
        }
    }
}

/// One address from [`derive_multiple_addresses`].
#[derive(Clone, Serialize)]
pub struct AddressInfo {
    pub path: String,
    pub address: Address,
    #[serde(serialize_with = "serialize_hex")]
    pub private_key: Zeroizing<[u8; 32]>,
}

impl fmt::Debug for AddressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressInfo")
            .field("path", &self.path)
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

fn serialize_hex<S: Serializer>(
    bytes: &Zeroizing<[u8; 32]>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(**bytes))
}

/// Generate a fresh wallet from `source`.
pub fn generate_wallet<E: EntropySource + ?Sized>(
    source: &mut E,
    strength: Strength,
    passphrase: &str,
    path: &str,
) -> Result<WalletInfo, WalletError> {
    let path: DerivationPath = path.parse()?;
    let phrase = Zeroizing::new(mnemonic::generate(strength, source)?);
    let wallet = build_wallet(phrase, strength, passphrase, &path)?;
    log::info!(
        "Generated {}-word wallet at {}: {}",
        wallet.word_count,
        wallet.path,
        wallet.address
    );
    Ok(wallet)
}

/// Restore a wallet from an existing mnemonic.
///
/// The mnemonic must pass validation; whitespace is normalized to single
/// spaces before seed derivation.
pub fn restore_wallet(
    phrase: &str,
    passphrase: &str,
    path: &str,
) -> Result<WalletInfo, WalletError> {
    let path: DerivationPath = path.parse()?;
    let (phrase, strength) = checked_mnemonic(phrase)?;
    let wallet = build_wallet(phrase, strength, passphrase, &path)?;
    log::info!(
        "Restored {}-word wallet at {}: {}",
        wallet.word_count,
        wallet.path,
        wallet.address
    );
    Ok(wallet)
}

/// Derive `count` receiving addresses at `<base_path>/0/<i>`, `i` ascending.
pub fn derive_multiple_addresses(
    phrase: &str,
    count: u32,
    passphrase: &str,
    base_path: &str,
) -> Result<Vec<AddressInfo>, WalletError> {
    let base: DerivationPath = base_path.parse()?;
    // The last index must be a valid normal child
    if let Some(last) = count.checked_sub(1) {
        DerivationSegment::normal(last)?;
    }
    let (phrase, _) = checked_mnemonic(phrase)?;

    let seed = to_seed(&phrase, passphrase);
    let master = master_key(&seed)?;
    let (account, _) = derive_path(&master, &base)?;
    let external = derive_child(&account, EXTERNAL_CHAIN, false)?;

    let mut addresses = Vec::new();
    for i in 0..count {
        let segment = DerivationSegment::normal(i)?;
        let key = derive_child(&external, segment.index(), false)?;
        let address = public_to_address(&private_to_public(key.private_key())?);
        addresses.push(AddressInfo {
            path: format!("{}/{}/{}", base, EXTERNAL_CHAIN, segment),
            address,
            private_key: Zeroizing::new(*key.private_key()),
        });
    }

    log::info!("Derived {} addresses under {}/{}", count, base, EXTERNAL_CHAIN);
    Ok(addresses)
}

/// Validate and canonicalize a mnemonic.
fn checked_mnemonic(phrase: &str) -> Result<(Zeroizing<String>, Strength), WalletError> {
    let entropy = mnemonic::to_entropy(phrase).map_err(|e| {
        log::warn!("Rejected mnemonic: {}", e);
        e
    })?;
    let canonical = Zeroizing::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "));
    Ok((canonical, entropy.strength()))
}

fn build_wallet(
    phrase: Zeroizing<String>,
    strength: Strength,
    passphrase: &str,
    path: &DerivationPath,
) -> Result<WalletInfo, WalletError> {
    let seed = to_seed(&phrase, passphrase);
    let master = master_key(&seed)?;
    let (key, derived_keys) = derive_path(&master, path)?;
    let public_key = private_to_public(key.private_key())?;
    let address = public_to_address(&public_key);

    Ok(WalletInfo {
        mnemonic: phrase,
        seed,
        master_key: master,
        derived_keys,
        private_key: Zeroizing::new(*key.private_key()),
        public_key,
        address,
        strength,
        word_count: strength.word_count(),
        path: path.to_string(),
    })
}
