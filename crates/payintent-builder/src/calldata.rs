//! Calldata for the distribution contract's entry point.

use crate::BuildError;
use alloy::primitives::Bytes;
use alloy::sol_types::SolCall;
use payintent_types::standards::distribution::bindings::IPaymentDistributor::distributeTokensWithPermitCall;
use payintent_types::{PaymentIntent, PermitSignature, ValidatedIntent, DISTRIBUTE_FUNCTION_NAME};

/// ABI-encodes `distributeTokensWithPermit` for `intent`, splitting the
/// permit signature into `v`, `r` and `s`.
pub fn encode_distribution_call(
	intent: &PaymentIntent,
	permit_signature: &str,
) -> Result<Bytes, BuildError> {
	let signature = PermitSignature::parse(permit_signature)?;
	let intent = intent.validate()?;
	intent.check_distribution()?;
	check_entry_point(&intent)?;

	let call = distributeTokensWithPermitCall {
		paymentToken: intent.payment_token,
		from: intent.from,
		transfers: intent.transfers.into_iter().map(Into::into).collect(),
		totalPrice: intent.total_price,
		deadline: intent.deadline,
		v: signature.v(),
		r: signature.r(),
		s: signature.s(),
	};

	Ok(call.abi_encode().into())
}

/// Rejects intents that name a different entry point.
fn check_entry_point(intent: &ValidatedIntent) -> Result<(), BuildError> {
	if let Some(name) = &intent.function_name {
		if name.trim() != DISTRIBUTE_FUNCTION_NAME {
			return Err(BuildError::InvalidIntent(format!(
				"functionName '{}' is not {}",
				name, DISTRIBUTE_FUNCTION_NAME
			)));
		}
	}

	if let Some(signature) = &intent.function_signature {
		let normalized: String = signature
			.trim()
			.trim_start_matches("function")
			.chars()
			.filter(|c| !c.is_whitespace())
			.collect();
		if normalized != distributeTokensWithPermitCall::SIGNATURE {
			return Err(BuildError::InvalidIntent(format!(
				"functionSignature '{}' does not match {}",
				signature,
				distributeTokensWithPermitCall::SIGNATURE
			)));
		}
	}

	Ok(())
}
