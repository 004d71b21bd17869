//! Exact decimal <-> base-unit conversion
//!
//! Token balances can exceed f64 precision, so every conversion on the
//! threshold-comparison path stays in integer/string arithmetic. Floats
//! never touch these values.

use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::U256;

use crate::models::errors::{AppError, AppResult};

/// Convert a human-readable decimal amount (e.g. "25000" or "0.5") into the
/// token's smallest unit, given its on-chain decimals count. Thresholds are
/// non-negative; a signed amount is a configuration error, not an absolute
/// value.
pub fn to_base_units(amount: &str, decimals: u8) -> AppResult<U256> {
    let parsed = parse_units(amount, decimals).map_err(|e| {
        AppError::invalid_value(format!("Invalid decimal amount '{}': {}", amount, e))
    })?;
    match parsed {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(AppError::invalid_value(format!(
            "Balance threshold cannot be negative: '{}'",
            amount
        ))),
    }
}

/// Render a base-unit balance back to a human-readable decimal string.
pub fn to_display_units(amount: U256, decimals: u8) -> String {
    format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}
