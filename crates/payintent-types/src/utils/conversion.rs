//! Conversion utilities for caller supplied address strings.

use super::formatting::without_0x_prefix;
use alloy::primitives::Address;

/// Parses a 20-byte hex address.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase addresses are
/// accepted as-is; mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Result<Address, String> {
	let trimmed = value.trim();
	let hex_part = without_0x_prefix(trimmed);

	if hex_part.len() != 40 {
		return Err(format!(
			"expected 40 hex characters, got {} in '{}'",
			hex_part.len(),
			value
		));
	}
	if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(format!("non-hex character in '{}'", value));
	}

	let address: Address = hex_part
		.parse()
		.map_err(|e| format!("cannot parse '{}': {}", value, e))?;

	let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
	let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
	if has_lower && has_upper {
		let checksummed = address.to_checksum(None);
		if without_0x_prefix(&checksummed) != hex_part {
			return Err(format!("checksum mismatch for '{}'", value));
		}
	}

	Ok(address)
}

/// Serde adapter writing [`Address`] as EIP-55 checksummed hex.
///
/// Deserialization goes through [`parse_address`], so a mixed-case input
/// with a bad checksum is rejected.
pub mod checksummed_address {
	use alloy::primitives::Address;
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&value.to_checksum(None))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
		let raw = String::deserialize(deserializer)?;
		super::parse_address(&raw).map_err(serde::de::Error::custom)
	}
}
