//! BIP-32 derivation path parsing
//!
//! Grammar: `m ( "/" index ( "'" | "h" | "H" )? )*`, with every index below
//! 2^31. Output always uses `'` as the hardened marker.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Offset added to hardened child indices on the wire
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// BIP-44 Ethereum path for the first address: m/44'/60'/0'/0/0
pub const ETHEREUM_PATH: &str = "m/44'/60'/0'/0/0";

/// BIP-44 Ethereum account path: m/44'/60'/0'
pub const ETHEREUM_ACCOUNT_PATH: &str = "m/44'/60'/0'";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Invalid path format: {0}")]
    InvalidPathFormat(String),
    #[error("Invalid index: {0}")]
    InvalidIndex(String),
}

/// One step of a derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationSegment {
    index: u32,
    hardened: bool,
}

impl DerivationSegment {
    /// Fails with `InvalidIndex` if `index >= 2^31`.
    pub fn new(index: u32, hardened: bool) -> Result<Self, PathError> {
        if index >= HARDENED_OFFSET {
            return Err(PathError::InvalidIndex(format!(
                "{} is not below 2^31",
                index
            )));
        }
        Ok(Self { index, hardened })
    }

    pub fn normal(index: u32) -> Result<Self, PathError> {
        Self::new(index, false)
    }

    pub fn hardened(index: u32) -> Result<Self, PathError> {
        Self::new(index, true)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// Index as serialized into the HMAC input (`index + 2^31` when hardened).
    pub fn wire_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for DerivationSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

impl FromStr for DerivationSegment {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        // u32::from_str accepts a leading '+', BIP-32 indices do not
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathError::InvalidIndex(format!("'{}' is not a number", s)));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| PathError::InvalidIndex(format!("'{}' is out of range", s)))?;
        Self::new(index, hardened)
    }
}

/// An ordered list of derivation segments rooted at `m`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<DerivationSegment>);

impl DerivationPath {
    /// The bare master path `m`.
    pub fn master() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[DerivationSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: DerivationSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl From<Vec<DerivationSegment>> for DerivationPath {
    fn from(segments: Vec<DerivationSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).map(Self)
    }
}

/// Parse a textual path such as `m/44'/60'/0'/0/0`.
pub fn parse(path: &str) -> Result<Vec<DerivationSegment>, PathError> {
    if path == "m" {
        return Ok(Vec::new());
    }
    let rest = path.strip_prefix("m/").ok_or_else(|| {
        PathError::InvalidPathFormat(format!("'{}' must start with 'm/'", path))
    })?;
    rest.split('/').map(DerivationSegment::from_str).collect()
}
