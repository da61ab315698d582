//! Wei / ether conversion
//!
//! Amounts are exact: wei is an integer, ether is a decimal string with at
//! most 18 fractional digits. No floating point is involved.

use thiserror::Error;

/// Fractional digits of one ether
pub const ETHER_DECIMALS: usize = 18;

/// 10^18
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Too many decimals: {0} (at most 18)")]
    TooManyDecimals(usize),
    #[error("Amount overflows u128 wei")]
    Overflow,
}

/// Render `wei` as an ether decimal, trailing zeros trimmed.
///
/// `1_500_000_000_000_000_000` → `"1.5"`, `0` → `"0"`.
pub fn wei_to_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = ETHER_DECIMALS);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Parse an ether decimal such as `"1.5"`, `"0.000000000000000001"` or `"42"`.
pub fn ether_to_wei(ether: &str) -> Result<u128, UnitsError> {
    let (whole, fraction) = match ether.split_once('.') {
        Some((w, f)) => (w, f),
        None => (ether, ""),
    };

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(UnitsError::InvalidAmount(ether.to_string()));
    }
    if fraction.len() > ETHER_DECIMALS {
        return Err(UnitsError::TooManyDecimals(fraction.len()));
    }

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| UnitsError::Overflow)?
            .checked_mul(WEI_PER_ETHER)
            .ok_or(UnitsError::Overflow)?
    };
    let fraction_wei = if fraction.is_empty() {
        0
    } else {
        let scale = 10u128.pow((ETHER_DECIMALS - fraction.len()) as u32);
        // At most 18 digits, fits comfortably
        fraction
            .parse::<u128>()
            .map_err(|_| UnitsError::InvalidAmount(ether.to_string()))?
            * scale
    };

    whole_wei
        .checked_add(fraction_wei)
        .ok_or(UnitsError::Overflow)
}
