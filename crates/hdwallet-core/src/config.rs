//! Derivation defaults, parsed from TOML with environment variable overrides.
//!
//! Priority: environment variables > config file > defaults.
//!
//! Passphrases are never read from configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::entropy::EntropySource;
use crate::mnemonic::Strength;
use crate::path::{self, ETHEREUM_ACCOUNT_PATH, ETHEREUM_PATH};
use crate::wallet::{self, AddressInfo, WalletInfo};

/// Upper bound for `addresses.count`
pub const MAX_ADDRESS_COUNT: u32 = 1000;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Wallet generation / restore settings
    #[serde(default)]
    pub wallet: WalletSection,

    /// Batch address derivation settings
    #[serde(default)]
    pub addresses: AddressSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSection {
    /// Entropy bits: 128, 160, 192, 224 or 256
    #[serde(default = "default_strength")]
    pub strength: usize,

    /// Path of the wallet's primary key
    #[serde(default = "default_derivation_path")]
    pub derivation_path: String,
}

impl Default for WalletSection {
    fn default() -> Self {
        Self {
            strength: default_strength(),
            derivation_path: default_derivation_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSection {
    /// Account path; addresses are derived at `<base_path>/0/<i>`
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Number of addresses to derive
    #[serde(default = "default_count")]
    pub count: u32,
}

impl Default for AddressSection {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            count: default_count(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_strength() -> usize {
    128
}

fn default_derivation_path() -> String {
    ETHEREUM_PATH.to_string()
}

fn default_base_path() -> String {
    ETHEREUM_ACCOUNT_PATH.to_string()
}

fn default_count() -> u32 {
    5
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).with_context(|| "Failed to parse TOML config")
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `HDWALLET_STRENGTH`
    /// - `HDWALLET_DERIVATION_PATH`
    /// - `HDWALLET_BASE_PATH`
    /// - `HDWALLET_ADDRESS_COUNT`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("HDWALLET_STRENGTH") {
            match v.parse::<usize>() {
                Ok(bits) => self.wallet.strength = bits,
                Err(_) => log::warn!("Ignoring unparsable HDWALLET_STRENGTH: {}", v),
            }
        }
        if let Ok(v) = std::env::var("HDWALLET_DERIVATION_PATH") {
            self.wallet.derivation_path = v;
        }
        if let Ok(v) = std::env::var("HDWALLET_BASE_PATH") {
            self.addresses.base_path = v;
        }
        if let Ok(v) = std::env::var("HDWALLET_ADDRESS_COUNT") {
            match v.parse::<u32>() {
                Ok(count) => self.addresses.count = count,
                Err(_) => log::warn!("Ignoring unparsable HDWALLET_ADDRESS_COUNT: {}", v),
            }
        }
    }

    /// The configured strength as a typed value.
    pub fn strength(&self) -> Result<Strength> {
        Strength::try_from(self.wallet.strength).context("wallet.strength")
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        self.strength()?;

        path::parse(&self.wallet.derivation_path).context("wallet.derivation_path")?;
        path::parse(&self.addresses.base_path).context("addresses.base_path")?;

        anyhow::ensure!(
            self.addresses.count >= 1,
            "addresses.count must be >= 1"
        );
        anyhow::ensure!(
            self.addresses.count <= MAX_ADDRESS_COUNT,
            "addresses.count must be <= {}",
            MAX_ADDRESS_COUNT
        );

        Ok(())
    }
}

// ============================================================================
// Configured wallet operations
// ============================================================================

impl WalletConfig {
    /// Generate a wallet with the configured strength and path.
    pub fn generate_wallet<E: EntropySource + ?Sized>(
        &self,
        source: &mut E,
        passphrase: &str,
    ) -> Result<WalletInfo> {
        self.validate()?;
        let wallet = wallet::generate_wallet(
            source,
            self.strength()?,
            passphrase,
            &self.wallet.derivation_path,
        )?;
        Ok(wallet)
    }

    /// Restore a wallet at the configured path.
    pub fn restore_wallet(&self, mnemonic: &str, passphrase: &str) -> Result<WalletInfo> {
        self.validate()?;
        let wallet = wallet::restore_wallet(mnemonic, passphrase, &self.wallet.derivation_path)
            .context("Failed to restore wallet")?;
        Ok(wallet)
    }

    /// Derive the configured number of addresses under the configured account.
    pub fn derive_addresses(&self, mnemonic: &str, passphrase: &str) -> Result<Vec<AddressInfo>> {
        self.validate()?;
        let addresses = wallet::derive_multiple_addresses(
            mnemonic,
            self.addresses.count,
            passphrase,
            &self.addresses.base_path,
        )
        .context("Failed to derive addresses")?;
        Ok(addresses)
    }
}

// ============================================================================
// Tests
// ============================================================================
