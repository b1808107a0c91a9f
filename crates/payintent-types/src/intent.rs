//! Payment intent model.
//!
//! A [`PaymentIntent`] is the caller supplied description of a payment: which
//! token pays, who pays, who receives what, and until when the approval is
//! valid. Every field is kept exactly as supplied so that malformed input can
//! be reported with a precise [`ValidationError`] instead of a generic parse
//! failure. [`PaymentIntent::validate`] turns it into a [`ValidatedIntent`]
//! with typed addresses and amounts.

use crate::utils::{checksummed_address, parse_address, parse_amount, u256_decimal};
use crate::ValidationError;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Numeric field as supplied by the caller.
///
/// Deserializes from a JSON string or a JSON number; the value is only
/// interpreted during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawAmount(String);

impl RawAmount {
	/// Wraps a raw amount string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Parses the amount into a [`U256`].
	pub fn parse(&self) -> Result<U256, String> {
		parse_amount(&self.0)
	}
}

impl fmt::Display for RawAmount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for RawAmount {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<U256> for RawAmount {
	fn from(value: U256) -> Self {
		Self(value.to_string())
	}
}

impl<'de> Deserialize<'de> for RawAmount {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Repr {
			Text(String),
			Number(serde_json::Number),
		}

		Ok(match Repr::deserialize(deserializer)? {
			Repr::Text(text) => Self(text),
			Repr::Number(number) => Self(number.to_string()),
		})
	}
}

/// A single `(recipient, amount)` pair as supplied by the caller.
///
/// Accepted either as a two-element array `["0x..", "1000"]` or as an object
/// `{"recipient": "0x..", "amount": "1000"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTransfer {
	/// Positional form.
	Pair(String, RawAmount),
	/// Keyed form.
	Entry {
		/// Recipient address.
		recipient: String,
		/// Amount sent to the recipient.
		amount: RawAmount,
	},
}

impl RawTransfer {
	/// Creates a transfer in positional form.
	pub fn new(recipient: impl Into<String>, amount: impl Into<RawAmount>) -> Self {
		Self::Pair(recipient.into(), amount.into())
	}

	/// Returns the raw recipient address.
	pub fn recipient(&self) -> &str {
		match self {
			Self::Pair(recipient, _) | Self::Entry { recipient, .. } => recipient,
		}
	}

	/// Returns the raw amount.
	pub fn amount(&self) -> &RawAmount {
		match self {
			Self::Pair(_, amount) | Self::Entry { amount, .. } => amount,
		}
	}
}

/// Payment parameters nested inside an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentParameters {
	/// ERC-20 token used for payment.
	pub payment_token_address: String,
	/// Payer address.
	pub from_address: String,
	/// Ordered recipient list.
	pub transfers: Vec<RawTransfer>,
	/// Total amount to approve and distribute.
	pub total_price: RawAmount,
	/// Expiry of the permit signature.
	pub deadline: RawAmount,
}

/// A requested payment action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
	/// Network name (`"polygon"`) or decimal chain id (`"137"`).
	pub chain: String,
	/// Contract that executes the distribution.
	pub contract_address: String,
	/// Name of the on-chain entry point.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub function_name: Option<String>,
	/// Human readable signature of the on-chain entry point.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub function_signature: Option<String>,
	/// Payment parameters.
	pub parameters: IntentParameters,
}

/// A recipient and the amount distributed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
	/// Recipient address.
	#[serde(with = "checksummed_address")]
	pub recipient: Address,
	/// Amount in the token's smallest unit.
	#[serde(with = "u256_decimal")]
	pub amount: U256,
}

impl From<(Address, U256)> for Transfer {
	fn from((recipient, amount): (Address, U256)) -> Self {
		Self { recipient, amount }
	}
}

/// A [`PaymentIntent`] whose addresses and amounts have been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIntent {
	/// Network identifier, unresolved.
	pub chain: String,
	/// Distribution contract.
	pub contract_address: Address,
	/// Payment token.
	pub payment_token: Address,
	/// Payer.
	pub from: Address,
	/// Ordered transfers.
	pub transfers: Vec<Transfer>,
	/// Total amount permitted.
	pub total_price: U256,
	/// Permit deadline.
	pub deadline: U256,
	/// Name of the on-chain entry point, if supplied.
	pub function_name: Option<String>,
	/// Signature of the on-chain entry point, if supplied.
	pub function_signature: Option<String>,
}

fn address_field(field: &str, value: &str) -> Result<Address, ValidationError> {
	parse_address(value).map_err(|e| ValidationError::InvalidAddress(format!("{}: {}", field, e)))
}

impl PaymentIntent {
	/// Validates every address and amount in the intent.
	///
	/// Address problems are reported as [`ValidationError::InvalidAddress`],
	/// bad `totalPrice`/`deadline` values as [`ValidationError::InvalidAmount`],
	/// and bad transfer amounts as [`ValidationError::InvalidIntent`]. The
	/// transfer list itself is not checked here; see
	/// [`ValidatedIntent::check_distribution`].
	pub fn validate(&self) -> Result<ValidatedIntent, ValidationError> {
		if self.chain.trim().is_empty() {
			return Err(ValidationError::InvalidIntent("chain is empty".into()));
		}

		let contract_address = address_field("contractAddress", &self.contract_address)?;
		let params = &self.parameters;
		let payment_token = address_field("paymentTokenAddress", &params.payment_token_address)?;
		let from = address_field("fromAddress", &params.from_address)?;

		let total_price = params
			.total_price
			.parse()
			.map_err(|e| ValidationError::InvalidAmount(format!("totalPrice: {}", e)))?;
		let deadline = params
			.deadline
			.parse()
			.map_err(|e| ValidationError::InvalidAmount(format!("deadline: {}", e)))?;

		let transfers = params
			.transfers
			.iter()
			.enumerate()
			.map(|(index, transfer)| {
				let recipient =
					address_field(&format!("transfers[{}].recipient", index), transfer.recipient())?;
				let amount = transfer.amount().parse().map_err(|e| {
					ValidationError::InvalidIntent(format!("transfers[{}].amount: {}", index, e))
				})?;
				Ok(Transfer { recipient, amount })
			})
			.collect::<Result<Vec<_>, ValidationError>>()?;

		Ok(ValidatedIntent {
			chain: self.chain.trim().to_string(),
			contract_address,
			payment_token,
			from,
			transfers,
			total_price,
			deadline,
			function_name: self.function_name.clone(),
			function_signature: self.function_signature.clone(),
		})
	}
}

impl ValidatedIntent {
	/// Sum of all transfer amounts, or `None` on overflow.
	pub fn transfers_total(&self) -> Option<U256> {
		self.transfers
			.iter()
			.try_fold(U256::ZERO, |acc, transfer| acc.checked_add(transfer.amount))
	}

	/// Checks that the intent describes a usable distribution.
	///
	/// The transfer list must be non-empty and its sum must not exceed
	/// `totalPrice`, since the permit only approves `totalPrice`.
	pub fn check_distribution(&self) -> Result<(), ValidationError> {
		if self.transfers.is_empty() {
			return Err(ValidationError::InvalidIntent(
				"at least one transfer is required".into(),
			));
		}

		let total = self.transfers_total().ok_or_else(|| {
			ValidationError::InvalidIntent("sum of transfer amounts overflows uint256".into())
		})?;
		if total > self.total_price {
			return Err(ValidationError::InvalidIntent(format!(
				"transfers sum to {} which exceeds totalPrice {}",
				total, self.total_price
			)));
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;

	const EXAMPLE_INTENT: &str = r#"{
		"chain": "polygon",
		"contractAddress": "0xA65cc7AF14003464A87294E92FaCD304A61059ac",
		"functionName": "distributeTokensWithPermit",
		"functionSignature": "function distributeTokensWithPermit(address,address,(address,uint256)[],uint256,uint256,uint8,bytes32,bytes32)",
		"parameters": {
			"paymentTokenAddress": "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359",
			"fromAddress": "0x61406EdAa39799EECe2D6567498E0D9C61fef1B6",
			"transfers": [["0x90b710825db8AAb007B6Bd9F15894e61F8f3c77c", "1000"]],
			"totalPrice": "1000",
			"deadline": "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
		}
	}"#;

	fn example() -> PaymentIntent {
		serde_json::from_str(EXAMPLE_INTENT).unwrap()
	}

	#[test]
	fn test_validate_example_intent() {
		let validated = example().validate().unwrap();

		assert_eq!(validated.chain, "polygon");
		assert_eq!(
			validated.payment_token,
			address!("0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359")
		);
		assert_eq!(validated.total_price, U256::from(1000u64));
		assert_eq!(validated.deadline, U256::MAX);
		assert_eq!(
			validated.transfers,
			vec![Transfer {
				recipient: address!("0x90b710825db8AAb007B6Bd9F15894e61F8f3c77c"),
				amount: U256::from(1000u64),
			}]
		);
		assert!(validated.check_distribution().is_ok());
	}

	#[test]
	fn test_transfers_accept_keyed_form_and_numbers() {
		let mut intent = example();
		intent.parameters.transfers = serde_json::from_str(
			r#"[{"recipient": "0x90b710825db8aab007b6bd9f15894e61f8f3c77c", "amount": 400},
			    ["0x90b710825db8aab007b6bd9f15894e61f8f3c77c", "600"]]"#,
		)
		.unwrap();

		let validated = intent.validate().unwrap();
		assert_eq!(validated.transfers.len(), 2);
		assert_eq!(validated.transfers[0].amount, U256::from(400u64));
		assert_eq!(validated.transfers[1].amount, U256::from(600u64));
		assert_eq!(validated.transfers_total(), Some(U256::from(1000u64)));
	}

	#[test]
	fn test_negative_total_price_is_invalid_amount() {
		let mut intent = example();
		intent.parameters.total_price = serde_json::from_str("-1").unwrap();

		let err = intent.validate().unwrap_err();
		assert!(matches!(err, ValidationError::InvalidAmount(_)));
		assert!(err.to_string().contains("totalPrice"));
	}

	#[test]
	fn test_non_numeric_deadline_is_invalid_amount() {
		let mut intent = example();
		intent.parameters.deadline = RawAmount::new("tomorrow");

		assert!(matches!(intent.validate(), Err(ValidationError::InvalidAmount(_))));
	}

	#[test]
	fn test_negative_transfer_amount_is_invalid_intent() {
		let mut intent = example();
		intent.parameters.transfers =
			vec![RawTransfer::new("0x90b710825db8aab007b6bd9f15894e61f8f3c77c", "-5")];

		let err = intent.validate().unwrap_err();
		assert!(matches!(err, ValidationError::InvalidIntent(_)));
		assert!(err.to_string().contains("transfers[0]"));
	}

	#[test]
	fn test_malformed_token_is_invalid_address() {
		let mut intent = example();
		intent.parameters.payment_token_address = "0x3c49".into();

		let err = intent.validate().unwrap_err();
		assert!(matches!(err, ValidationError::InvalidAddress(_)));
		assert!(err.to_string().contains("paymentTokenAddress"));
	}

	#[test]
	fn test_check_distribution_rejects_empty_and_oversized() {
		let mut validated = example().validate().unwrap();
		validated.transfers.clear();
		assert!(matches!(
			validated.check_distribution(),
			Err(ValidationError::InvalidIntent(_))
		));

		let mut validated = example().validate().unwrap();
		validated.transfers[0].amount = U256::from(1001u64);
		let err = validated.check_distribution().unwrap_err();
		assert!(err.to_string().contains("exceeds totalPrice"));
	}

	#[test]
	fn test_check_distribution_rejects_overflow() {
		let mut validated = example().validate().unwrap();
		validated.total_price = U256::MAX;
		validated.transfers = vec![
			Transfer::from((Address::ZERO, U256::MAX)),
			Transfer::from((Address::ZERO, U256::from(1u64))),
		];

		assert!(validated.transfers_total().is_none());
		assert!(validated.check_distribution().is_err());
	}

	#[test]
	fn test_missing_field_fails_to_parse() {
		let result: Result<PaymentIntent, _> =
			serde_json::from_str(r#"{"chain": "polygon", "contractAddress": "0x00"}"#);
		assert!(result.is_err());
	}
}
