//! ERC-2612 permit payloads.

use crate::{BuildError, PermitPayload};
use alloy::primitives::Address;
use payintent_config::Config;
use payintent_provider::{ContractReader, ProviderError};
use payintent_types::{
	parse_address, NetworkRegistry, PayloadDomain, PaymentIntent, PermitMessage, TypedDataPayload,
};

/// Builds the permit a payer signs to let the distribution contract pull
/// `totalPrice` of the payment token.
#[derive(Debug, Clone, Default)]
pub struct PermitPayloadBuilder {
	networks: NetworkRegistry,
}

impl PermitPayloadBuilder {
	pub fn new(networks: NetworkRegistry) -> Self {
		Self { networks }
	}

	/// Uses the networks known to `config`.
	pub fn from_config(config: &Config) -> Self {
		Self::new(config.network_registry())
	}

	/// Builds the permit for `owner` described by `intent`.
	///
	/// The intent is validated before any call is made through `reader`. The
	/// token nonce, name and version are then read concurrently.
	pub async fn build(
		&self,
		owner: &str,
		intent: &PaymentIntent,
		reader: &dyn ContractReader,
	) -> Result<PermitPayload, BuildError> {
		let intent = intent.validate()?;
		let chain_id = self.networks.resolve(&intent.chain)?;
		let owner = resolve_owner(owner, reader).await?;

		let connected = reader.chain_id().await?;
		if connected != chain_id {
			return Err(BuildError::ChainMismatch {
				expected: chain_id,
				actual: connected,
			});
		}

		let token = intent.payment_token;
		let (nonce, name, version) = tokio::try_join!(
			reader.permit_nonce(token, owner),
			reader.token_name(token),
			reader.token_version(token),
		)?;

		tracing::info!(
			chain_id,
			%token,
			%owner,
			%nonce,
			"Built permit payload"
		);

		Ok(TypedDataPayload::new(
			PayloadDomain {
				name,
				version,
				chain_id,
				verifying_contract: token,
			},
			PermitMessage {
				owner,
				spender: intent.contract_address,
				value: intent.total_price,
				nonce,
				deadline: intent.deadline,
			},
		))
	}
}

/// Hex addresses are parsed locally; anything else is handed to the reader.
async fn resolve_owner(owner: &str, reader: &dyn ContractReader) -> Result<Address, BuildError> {
	let trimmed = owner.trim();
	if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
		return parse_address(trimmed).map_err(|e| BuildError::InvalidAddress(format!("owner: {}", e)));
	}
	if let Ok(address) = parse_address(trimmed) {
		return Ok(address);
	}

	reader.resolve_address(trimmed).await.map_err(|e| match e {
		ProviderError::InvalidAddress(msg) => BuildError::InvalidAddress(format!("owner: {}", msg)),
		other => BuildError::Provider(other),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::example_intent;
	use alloy::primitives::{address, U256};
	use payintent_provider::MockContractReader;

	const OWNER: &str = "0x61406EdAa39799EECe2D6567498E0D9C61fef1B6";
	const TOKEN: Address = address!("3c499c542cEF5E3811e1192ce70d8cC03d5c3359");

	fn usdc_reader(chain_id: u64) -> MockContractReader {
		let mut reader = MockContractReader::new();
		reader.expect_chain_id().returning(move || Ok(chain_id));
		reader
			.expect_permit_nonce()
			.withf(|token, _| *token == TOKEN)
			.returning(|_, _| Ok(U256::from(5u64)));
		reader
			.expect_token_name()
			.returning(|_| Ok("USD Coin".to_string()));
		reader
			.expect_token_version()
			.returning(|_| Ok("2".to_string()));
		reader
	}

	#[tokio::test]
	async fn test_build_example_permit() {
		let reader = usdc_reader(137);
		let payload = PermitPayloadBuilder::default()
			.build(OWNER, &example_intent(), &reader)
			.await
			.unwrap();

		let domain = payload.domain();
		assert_eq!(domain.name, "USD Coin");
		assert_eq!(domain.version, "2");
		assert_eq!(domain.chain_id, 137);
		assert_eq!(domain.verifying_contract, TOKEN);

		let value = payload.value();
		assert_eq!(value.owner, address!("61406EdAa39799EECe2D6567498E0D9C61fef1B6"));
		assert_eq!(value.spender, address!("A65cc7AF14003464A87294E92FaCD304A61059ac"));
		assert_eq!(value.value, U256::from(1000u64));
		assert_eq!(value.nonce, U256::from(5u64));
		assert_eq!(value.deadline, U256::MAX);
		assert_eq!(payload.primary_type(), "Permit");
	}

	#[tokio::test]
	async fn test_payload_json_shape() {
		let reader = usdc_reader(137);
		let payload = PermitPayloadBuilder::default()
			.build(OWNER, &example_intent(), &reader)
			.await
			.unwrap();

		let json = serde_json::to_value(&payload).unwrap();
		assert_eq!(json["domain"]["verifyingContract"], "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359");
		assert_eq!(json["domain"]["chainId"], 137);
		assert_eq!(json["value"]["value"], "1000");
		assert_eq!(json["types"]["Permit"][0]["name"], "owner");
	}

	#[tokio::test]
	async fn test_build_is_idempotent() {
		let reader = usdc_reader(137);
		let builder = PermitPayloadBuilder::default();
		let intent = example_intent();

		let first = builder.build(OWNER, &intent, &reader).await.unwrap();
		let second = builder.build(OWNER, &intent, &reader).await.unwrap();
		assert_eq!(first, second);
		assert_eq!(
			serde_json::to_string(&first).unwrap(),
			serde_json::to_string(&second).unwrap()
		);
	}

	#[tokio::test]
	async fn test_negative_total_price_fails_before_io() {
		let mut intent = example_intent();
		intent.parameters.total_price = "-1".into();

		// No expectations: any call on the reader would panic
		let reader = MockContractReader::new();
		let err = PermitPayloadBuilder::default()
			.build(OWNER, &intent, &reader)
			.await
			.unwrap_err();
		assert!(matches!(err, BuildError::InvalidAmount(_)));
	}

	#[tokio::test]
	async fn test_malformed_owner_is_invalid_address() {
		let reader = MockContractReader::new();
		let err = PermitPayloadBuilder::default()
			.build("0x1234", &example_intent(), &reader)
			.await
			.unwrap_err();
		assert!(matches!(err, BuildError::InvalidAddress(_)));
	}

	#[tokio::test]
	async fn test_malformed_token_is_invalid_address() {
		let mut intent = example_intent();
		intent.parameters.payment_token_address = "0xnot-a-token".into();

		let reader = MockContractReader::new();
		let err = PermitPayloadBuilder::default()
			.build(OWNER, &intent, &reader)
			.await
			.unwrap_err();
		assert!(matches!(err, BuildError::InvalidAddress(msg) if msg.contains("paymentTokenAddress")));
	}

	#[tokio::test]
	async fn test_named_owner_goes_through_reader() {
		let mut reader = usdc_reader(137);
		reader
			.expect_resolve_address()
			.withf(|name| name == "payer.eth")
			.returning(|_| Ok(address!("61406EdAa39799EECe2D6567498E0D9C61fef1B6")));

		let payload = PermitPayloadBuilder::default()
			.build("payer.eth", &example_intent(), &reader)
			.await
			.unwrap();
		assert_eq!(payload.value().owner.to_string(), OWNER);
	}

	#[tokio::test]
	async fn test_chain_mismatch() {
		let mut reader = MockContractReader::new();
		reader.expect_chain_id().returning(|| Ok(1));

		let err = PermitPayloadBuilder::default()
			.build(OWNER, &example_intent(), &reader)
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			BuildError::ChainMismatch {
				expected: 137,
				actual: 1
			}
		));
	}

	#[tokio::test]
	async fn test_unknown_chain_is_invalid_intent() {
		let mut intent = example_intent();
		intent.chain = "atlantis".into();

		let reader = MockContractReader::new();
		let err = PermitPayloadBuilder::default()
			.build(OWNER, &intent, &reader)
			.await
			.unwrap_err();
		assert!(matches!(err, BuildError::InvalidIntent(_)));
	}

	#[tokio::test]
	async fn test_configured_network() {
		let config = payintent_config::ConfigBuilder::new()
			.network("anvil", 31337, None)
			.build();
		let mut intent = example_intent();
		intent.chain = "anvil".into();

		let reader = usdc_reader(31337);
		let payload = PermitPayloadBuilder::from_config(&config)
			.build(OWNER, &intent, &reader)
			.await
			.unwrap();
		assert_eq!(payload.domain().chain_id, 31337);
	}

	#[tokio::test]
	async fn test_reverting_token_surfaces_provider_error() {
		let mut reader = MockContractReader::new();
		reader.expect_chain_id().returning(|| Ok(137));
		reader.expect_permit_nonce().returning(|token, _| {
			Err(ProviderError::ContractCall {
				contract: token,
				method: "nonces(address)".into(),
				reason: "execution reverted".into(),
			})
		});
		reader
			.expect_token_name()
			.returning(|_| Ok("Plain Token".to_string()));
		reader
			.expect_token_version()
			.returning(|_| Ok("1".to_string()));

		let err = PermitPayloadBuilder::default()
			.build(OWNER, &example_intent(), &reader)
			.await
			.unwrap_err();
		assert!(matches!(err, BuildError::Provider(ProviderError::ContractCall { .. })));
	}
}
