//! USDC amount input handling.

use ethers::types::U256;
use ethers::utils::parse_units;

use crate::consts::USDC_DECIMALS;
use crate::prelude::Result;
use crate::Error;

/// Strips everything but ASCII digits and the first decimal point from raw input.
pub fn sanitize_amount(input: &str) -> String {
    let mut seen_point = false;
    input
        .chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Scales a decimal USDC amount to its 6-decimal integer value.
///
/// Fractional digits past the sixth are truncated, not rejected.
pub fn parse_usdc(amount: &str) -> Result<U256> {
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidAmount(amount.to_string()));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = &fraction[..fraction.len().min(USDC_DECIMALS as usize)];
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };

    let scaled = parse_units(&normalized, USDC_DECIMALS)
        .map_err(|e| Error::AmountOverflow(format!("{normalized}: {e}")))?;
    Ok(scaled.into())
}

/// Parses `amount` and enforces an optional lower bound in whole USDC.
pub fn validate_amount(amount: &str, minimum: Option<u64>) -> Result<U256> {
    let value = parse_usdc(amount)?;
    if let Some(minimum) = minimum {
        let floor = U256::from(minimum) * U256::exp10(USDC_DECIMALS as usize);
        if value < floor {
            return Err(Error::BelowMinimum {
                amount: amount.to_string(),
                minimum,
            });
        }
    }
    Ok(value)
}

/// Narrows a scaled amount to the `uint64` width the bridge uses.
pub fn to_u64(value: U256) -> Result<u64> {
    if value > U256::from(u64::MAX) {
        return Err(Error::AmountOverflow(value.to_string()));
    }
    Ok(value.as_u64())
}
