//! Common types for the payment intent signing helpers.
//!
//! This crate defines the data shared by every other crate in the workspace:
//! the caller supplied payment intent and its validated form, the EIP-712
//! payload container handed to wallets, the Solidity struct definitions the
//! payloads hash to, and the chain name registry used to bind payloads to a
//! network.

/// Payment intent model and structural validation.
pub mod intent;
/// Chain name to chain id resolution.
pub mod networks;
/// EIP-712 typed data payload container.
pub mod payload;
/// Permit signature parsing.
pub mod signature;
/// Protocol specific message definitions.
pub mod standards;
/// Utility functions for hex, address and amount handling.
pub mod utils;

use thiserror::Error;

// Re-export all types for convenient access
pub use intent::{IntentParameters, PaymentIntent, RawAmount, RawTransfer, Transfer, ValidatedIntent};
pub use networks::NetworkRegistry;
pub use payload::{Eip712Field, Eip712Message, Eip712Types, PayloadDomain, TypedDataPayload};
pub use signature::PermitSignature;
pub use standards::{
	distribution::{DistributionMessage, DISTRIBUTE_FUNCTION_NAME},
	eip2612::PermitMessage,
};
pub use utils::{current_timestamp, parse_address, parse_amount, truncate_hex};

/// Errors raised while validating caller supplied input.
///
/// Every variant is a structural or semantic problem with the input itself;
/// none of them are produced by network access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// An address field is not a 20-byte hex address or fails its checksum.
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	/// An amount is negative, non-numeric or does not fit in 256 bits.
	#[error("Invalid amount: {0}")]
	InvalidAmount(String),
	/// A signature is not a well-formed 65-byte ECDSA signature.
	#[error("Invalid signature format: {0}")]
	InvalidSignatureFormat(String),
	/// The intent is structurally valid but semantically unusable.
	#[error("Invalid intent: {0}")]
	InvalidIntent(String),
}
