//! Token amount parsing and decimal serialization.
//!
//! Amounts are carried as [`U256`] end to end. `U256::MAX` is the sentinel for
//! "unlimited" approvals and "never expires" deadlines.

use super::formatting::without_0x_prefix;
use alloy::primitives::U256;

/// Parses a non-negative integer amount.
///
/// Accepts decimal digits or a `0x`-prefixed hex string. Negative values,
/// fractional values and values above `U256::MAX` are rejected.
pub fn parse_amount(value: &str) -> Result<U256, String> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		return Err("amount is empty".to_string());
	}
	if trimmed.starts_with('-') {
		return Err(format!("amount '{}' is negative", value));
	}

	let is_hex = trimmed.starts_with("0x") || trimmed.starts_with("0X");
	let digits = if is_hex {
		without_0x_prefix(trimmed)
	} else {
		trimmed
	};
	let well_formed = !digits.is_empty()
		&& if is_hex {
			digits.chars().all(|c| c.is_ascii_hexdigit())
		} else {
			digits.chars().all(|c| c.is_ascii_digit())
		};
	if !well_formed {
		return Err(format!("amount '{}' is not an integer", value));
	}

	let radix = if is_hex { 16 } else { 10 };
	U256::from_str_radix(digits, radix)
		.map_err(|e| format!("amount '{}' is out of range: {}", value, e))
}

/// Serde adapter writing [`U256`] as a decimal string.
///
/// Deserialization goes through [`parse_amount`], so hex strings are read as
/// well.
pub mod u256_decimal {
	use alloy::primitives::U256;
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(value)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
		let raw = String::deserialize(deserializer)?;
		super::parse_amount(&raw).map_err(serde::de::Error::custom)
	}
}
