//! Hex string helpers.

/// Strips a leading `0x` or `0X`.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

/// Shortens a hex value for log output, keeping the prefix and four bytes.
pub fn truncate_hex(value: &str) -> String {
	match value.get(..10) {
		Some(head) if value.len() > 10 => format!("{}..", head),
		_ => value.to_string(),
	}
}
