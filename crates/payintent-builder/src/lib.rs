//! Typed-data builders for the two signing steps of a payment.
//!
//! A payment is authorized in two signatures:
//!
//! 1. [`PermitPayloadBuilder`] produces an ERC-2612 permit letting the
//!    distribution contract pull `totalPrice` from the payer.
//! 2. [`MetaTransactionPayloadBuilder`] produces the distribution
//!    meta-transaction, embedding the permit signature from step 1.
//!
//! Both signatures go to a relayer, which calls the distribution contract.
//! [`encode_distribution_call`] produces the calldata the contract expects,
//! and [`verify_permit_signature`] checks a permit signature before it is
//! embedded.

use alloy::primitives::Address;
use payintent_provider::ProviderError;
use payintent_types::{DistributionMessage, PermitMessage, TypedDataPayload, ValidationError};
use thiserror::Error;

pub mod calldata;
pub mod meta_transaction;
pub mod permit;
pub mod verify;

pub use calldata::encode_distribution_call;
pub use meta_transaction::MetaTransactionPayloadBuilder;
pub use permit::PermitPayloadBuilder;
pub use verify::{recover_signer, verify_meta_transaction_signature, verify_permit_signature};

/// Typed data for an ERC-2612 permit.
pub type PermitPayload = TypedDataPayload<PermitMessage>;
/// Typed data for a distribution meta-transaction.
pub type MetaTransactionPayload = TypedDataPayload<DistributionMessage>;

/// Errors returned by the builders.
#[derive(Debug, Error)]
pub enum BuildError {
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	#[error("Invalid amount: {0}")]
	InvalidAmount(String),
	#[error("Invalid signature format: {0}")]
	InvalidSignatureFormat(String),
	#[error("Invalid intent: {0}")]
	InvalidIntent(String),
	/// The provider is connected to a different chain than the intent names.
	#[error("Chain mismatch: intent targets chain {expected}, provider is on chain {actual}")]
	ChainMismatch { expected: u64, actual: u64 },
	/// A signature was produced by someone other than the expected signer.
	#[error("Signer mismatch: expected {expected}, recovered {recovered}")]
	SignerMismatch { expected: Address, recovered: Address },
	#[error("Provider error: {0}")]
	Provider(#[from] ProviderError),
	#[error("Encoding error: {0}")]
	Encoding(String),
}

impl From<ValidationError> for BuildError {
	fn from(err: ValidationError) -> Self {
		match err {
			ValidationError::InvalidAddress(msg) => BuildError::InvalidAddress(msg),
			ValidationError::InvalidAmount(msg) => BuildError::InvalidAmount(msg),
			ValidationError::InvalidSignatureFormat(msg) => BuildError::InvalidSignatureFormat(msg),
			ValidationError::InvalidIntent(msg) => BuildError::InvalidIntent(msg),
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validation_errors_keep_their_kind() {
		let err: BuildError = ValidationError::InvalidAmount("totalPrice: negative".into()).into();
		assert!(matches!(err, BuildError::InvalidAmount(_)));
		assert_eq!(err.to_string(), "Invalid amount: totalPrice: negative");

		let err: BuildError = ValidationError::InvalidSignatureFormat("short".into()).into();
		assert!(matches!(err, BuildError::InvalidSignatureFormat(_)));
	}

	#[test]
	fn test_provider_errors_are_wrapped() {
		let err: BuildError = ProviderError::Network("timeout".into()).into();
		assert_eq!(err.to_string(), "Provider error: Network error: timeout");
	}
}
