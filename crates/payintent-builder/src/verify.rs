//! Signature recovery against built payloads.

use crate::{BuildError, MetaTransactionPayload, PermitPayload};
use alloy::primitives::Address;
use payintent_types::{Eip712Message, PermitSignature, TypedDataPayload};

/// Recovers the address that signed `payload`.
pub fn recover_signer<M: Eip712Message>(
	payload: &TypedDataPayload<M>,
	signature: &str,
) -> Result<Address, BuildError> {
	let signature = PermitSignature::parse(signature)?;
	signature
		.signature()
		.recover_address_from_prehash(&payload.signing_hash())
		.map_err(|e| BuildError::InvalidSignatureFormat(format!("cannot recover signer: {}", e)))
}

fn expect_signer(expected: Address, recovered: Address) -> Result<Address, BuildError> {
	if recovered != expected {
		return Err(BuildError::SignerMismatch { expected, recovered });
	}
	Ok(recovered)
}

/// Checks that `signature` is the permit owner's signature over `payload`.
pub fn verify_permit_signature(
	payload: &PermitPayload,
	signature: &str,
) -> Result<Address, BuildError> {
	let recovered = recover_signer(payload, signature)?;
	tracing::debug!(%recovered, owner = %payload.value().owner, "Recovered permit signer");
	expect_signer(payload.value().owner, recovered)
}

/// Checks that `signature` is the meta-transaction user's signature over
/// `payload`.
pub fn verify_meta_transaction_signature(
	payload: &MetaTransactionPayload,
	signature: &str,
) -> Result<Address, BuildError> {
	let recovered = recover_signer(payload, signature)?;
	expect_signer(payload.value().user, recovered)
}
