//! Permit signature parsing.

use crate::utils::without_0x_prefix;
use crate::ValidationError;
use alloy::primitives::{Bytes, Signature, B256, U256};

/// A structurally valid 65-byte ECDSA signature over a permit payload.
///
/// The raw bytes are kept intact for embedding in the meta-transaction; the
/// parsed form provides the `v/r/s` split the distribution contract expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitSignature {
	raw: Bytes,
	parsed: Signature,
}

impl PermitSignature {
	/// Length of an `r ‖ s ‖ v` signature in bytes.
	pub const LENGTH: usize = 65;

	/// Parses a hex-encoded signature, with or without `0x` prefix.
	///
	/// The input must decode to exactly 65 bytes, `v` must be one of
	/// 0, 1, 27 or 28, and neither `r` nor `s` may be zero.
	pub fn parse(value: &str) -> Result<Self, ValidationError> {
		let hex_part = without_0x_prefix(value.trim());
		let bytes = hex::decode(hex_part).map_err(|e| {
			ValidationError::InvalidSignatureFormat(format!("signature is not valid hex: {}", e))
		})?;

		if bytes.len() != Self::LENGTH {
			return Err(ValidationError::InvalidSignatureFormat(format!(
				"expected {} bytes, got {}",
				Self::LENGTH,
				bytes.len()
			)));
		}

		let v = bytes[64];
		if !matches!(v, 0 | 1 | 27 | 28) {
			return Err(ValidationError::InvalidSignatureFormat(format!(
				"invalid recovery id v={}",
				v
			)));
		}

		let parsed = Signature::from_raw(&bytes).map_err(|e| {
			ValidationError::InvalidSignatureFormat(format!("cannot parse signature: {}", e))
		})?;
		if parsed.r() == U256::ZERO || parsed.s() == U256::ZERO {
			return Err(ValidationError::InvalidSignatureFormat(
				"r and s must be non-zero".into(),
			));
		}

		Ok(Self { raw: Bytes::from(bytes), parsed })
	}

	/// Returns the signature bytes exactly as supplied.
	pub fn as_bytes(&self) -> &Bytes {
		&self.raw
	}

	/// Returns the parsed signature.
	pub fn signature(&self) -> &Signature {
		&self.parsed
	}

	/// Recovery id in the 27/28 form used by `ecrecover`.
	pub fn v(&self) -> u8 {
		27 + u8::from(self.parsed.v())
	}

	/// The `r` component.
	pub fn r(&self) -> B256 {
		B256::from(self.parsed.r())
	}

	/// The `s` component.
	pub fn s(&self) -> B256 {
		B256::from(self.parsed.s())
	}
}
