//! hdwallet Core
//!
//! Hierarchical-deterministic key derivation for Ethereum-style wallets.
//!
//! # Key Derivation
//!
//! From a single BIP-39 mnemonic:
//! - Seed via PBKDF2-HMAC-SHA512 (BIP-39)
//! - Master and child keys via HMAC-SHA512 chaining (BIP-32)
//! - Addresses along m/44'/60'/0'/0/i (BIP-44), EIP-55 checksummed
//!
//! # Example
//!
//! ```
//! use hdwallet_core::{restore_wallet, ETHEREUM_PATH};
//!
//! let mnemonic = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
//! let wallet = restore_wallet(mnemonic, "", ETHEREUM_PATH).unwrap();
//! assert_eq!(wallet.address.as_str(), "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
//! ```

pub mod address;
pub mod config;
pub mod entropy;
pub mod keys;
pub mod mnemonic;
pub mod path;
pub mod seed;
pub mod units;
pub mod wallet;

pub use address::{
    is_valid_address, private_to_address, private_to_public, public_to_address,
    to_checksum_address, Address, AddressError, PublicKey,
};
pub use config::WalletConfig;
pub use entropy::{EntropyError, EntropySource, FixedEntropy, OsEntropy};
pub use keys::{derive_child, derive_path, master_key, DerivedKey, ExtendedKey, KeyError};
pub use mnemonic::{Entropy, MnemonicError, Strength};
pub use path::{
    DerivationPath, DerivationSegment, PathError, ETHEREUM_ACCOUNT_PATH, ETHEREUM_PATH,
    HARDENED_OFFSET,
};
pub use seed::{to_seed, Seed};
pub use units::{ether_to_wei, wei_to_ether, UnitsError};
pub use wallet::{
    derive_multiple_addresses, generate_wallet, restore_wallet, AddressInfo, WalletError,
    WalletInfo, WalletSummary,
};
