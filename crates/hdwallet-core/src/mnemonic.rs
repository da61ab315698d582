//! BIP-39 mnemonic encoding
//!
//! Converts entropy to a checksummed word sequence and back. The English word
//! list itself comes from the `bip39` crate; the bit packing and checksum
//! handling live here.
//!
//! ```text
//! entropy (ENT bits) || SHA-256(entropy)[..ENT/32 bits]  ->  11-bit groups  ->  words
//! ```

use std::fmt;

use bip39::Language;
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::entropy::{EntropyError, EntropySource};

/// Bits per word index
const BITS_PER_WORD: usize = 11;

#[derive(Error, Debug)]
pub enum MnemonicError {
    #[error("Invalid strength: {0} bits (expected 128, 160, 192, 224 or 256)")]
    InvalidStrength(usize),
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

/// Supported entropy strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strength {
    Bits128,
    Bits160,
    Bits192,
    Bits224,
    Bits256,
}

impl Strength {
    pub const ALL: [Strength; 5] = [
        Strength::Bits128,
        Strength::Bits160,
        Strength::Bits192,
        Strength::Bits224,
        Strength::Bits256,
    ];

    pub fn bits(self) -> usize {
        match self {
            Self::Bits128 => 128,
            Self::Bits160 => 160,
            Self::Bits192 => 192,
            Self::Bits224 => 224,
            Self::Bits256 => 256,
        }
    }

    pub fn entropy_bytes(self) -> usize {
        self.bits() / 8
    }

    pub fn checksum_bits(self) -> usize {
        self.bits() / 32
    }

    /// 12, 15, 18, 21 or 24
    pub fn word_count(self) -> usize {
        (self.bits() + self.checksum_bits()) / BITS_PER_WORD
    }

    pub fn from_word_count(words: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.word_count() == words)
    }
}

impl TryFrom<usize> for Strength {
    type Error = MnemonicError;

    fn try_from(bits: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.bits() == bits)
            .ok_or(MnemonicError::InvalidStrength(bits))
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.bits())
    }
}

/// Raw mnemonic entropy, zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Entropy(Vec<u8>);

impl Entropy {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn strength(&self) -> Strength {
        // Only constructed from a validated length
        Strength::try_from(self.0.len() * 8).unwrap_or(Strength::Bits128)
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entropy({} bits, redacted)", self.0.len() * 8)
    }
}

/// Generate a new mnemonic of the given strength from `source`.
pub fn generate<E: EntropySource + ?Sized>(
    strength: Strength,
    source: &mut E,
) -> Result<String, MnemonicError> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    let result = source
        .fill_entropy(&mut entropy)
        .map_err(MnemonicError::from)
        .and_then(|()| from_entropy(&entropy));
    entropy.zeroize();
    result
}

/// Encode caller-supplied entropy as a mnemonic.
///
/// The entropy length must match one of the supported strengths.
pub fn from_entropy(entropy: &[u8]) -> Result<String, MnemonicError> {
    let strength = Strength::try_from(entropy.len() * 8)?;
    let checksum = Sha256::digest(entropy)[0];
    let word_list = Language::English.word_list();

    let mut words = Vec::with_capacity(strength.word_count());
    let mut acc: u32 = 0;
    let mut acc_bits = 0;
    let checksum_byte = checksum >> (8 - strength.checksum_bits());

    let stream = entropy
        .iter()
        .map(|&b| (u32::from(b), 8))
        .chain(std::iter::once((
            u32::from(checksum_byte),
            strength.checksum_bits(),
        )));
    for (value, width) in stream {
        acc = (acc << width) | value;
        acc_bits += width;
        while acc_bits >= BITS_PER_WORD {
            acc_bits -= BITS_PER_WORD;
            let index = (acc >> acc_bits) & 0x7ff;
            words.push(word_list[index as usize]);
        }
        acc &= (1 << acc_bits) - 1;
    }
    acc.zeroize();

    Ok(words.join(" "))
}

/// Decode a mnemonic back to its entropy, checking words and checksum.
pub fn to_entropy(mnemonic: &str) -> Result<Entropy, MnemonicError> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    let strength = Strength::from_word_count(words.len()).ok_or_else(|| {
        MnemonicError::InvalidMnemonic(format!("invalid word count: {}", words.len()))
    })?;

    let mut entropy = Entropy(Vec::with_capacity(strength.entropy_bytes()));
    let mut acc: u32 = 0;
    let mut acc_bits = 0;
    for (position, word) in words.iter().enumerate() {
        let index = Language::English.find_word(word).ok_or_else(|| {
            MnemonicError::InvalidMnemonic(format!("unknown word at position {}", position + 1))
        })?;
        acc = (acc << BITS_PER_WORD) | u32::from(index);
        acc_bits += BITS_PER_WORD;
        while acc_bits >= 8 && entropy.0.len() < strength.entropy_bytes() {
            acc_bits -= 8;
            entropy.0.push((acc >> acc_bits) as u8);
        }
        acc &= (1 << acc_bits) - 1;
    }

    // Whatever is left in the accumulator is the checksum
    debug_assert_eq!(acc_bits, strength.checksum_bits());
    let expected = Sha256::digest(entropy.as_bytes())[0] >> (8 - strength.checksum_bits());
    let matches = acc == u32::from(expected);
    acc.zeroize();
    if !matches {
        return Err(MnemonicError::InvalidMnemonic("checksum mismatch".into()));
    }

    Ok(entropy)
}

/// Check a mnemonic's word count, words and checksum.
pub fn validate(mnemonic: &str) -> bool {
    to_entropy(mnemonic).is_ok()
}
