//! Distribution meta-transaction payloads.

use crate::{BuildError, MetaTransactionPayload};
use alloy::primitives::U256;
use payintent_config::{Config, MetaTransactionConfig};
use payintent_provider::SignerContext;
use payintent_types::{
	truncate_hex, DistributionMessage, NetworkRegistry, PayloadDomain, PaymentIntent,
	PermitSignature, TypedDataPayload,
};

/// Builds the meta-transaction a relayer submits to the distribution
/// contract, carrying the payer's permit signature.
#[derive(Debug, Clone, Default)]
pub struct MetaTransactionPayloadBuilder {
	networks: NetworkRegistry,
	settings: MetaTransactionConfig,
}

impl MetaTransactionPayloadBuilder {
	pub fn new(networks: NetworkRegistry, settings: MetaTransactionConfig) -> Self {
		Self { networks, settings }
	}

	/// Uses the networks and meta-transaction settings of `config`.
	pub fn from_config(config: &Config) -> Self {
		Self::new(config.network_registry(), config.meta_transaction.clone())
	}

	/// Builds the meta-transaction for `intent`, embedding `permit_signature`
	/// byte for byte.
	///
	/// `userDeadline` is the signer's current time plus the configured
	/// lifetime and is unrelated to the permit deadline.
	pub async fn build(
		&self,
		permit_signature: &str,
		intent: &PaymentIntent,
		signer: &dyn SignerContext,
	) -> Result<MetaTransactionPayload, BuildError> {
		let signature = PermitSignature::parse(permit_signature)?;
		let intent = intent.validate()?;
		intent.check_distribution()?;
		let chain_id = self.networks.resolve(&intent.chain)?;

		let user = signer.address().await?;
		let user_nonce = signer.fresh_nonce().await?;
		let user_deadline = U256::from(
			signer
				.current_timestamp()
				.saturating_add(self.settings.deadline_seconds),
		);

		tracing::info!(
			chain_id,
			target = %intent.contract_address,
			%user,
			transfers = intent.transfers.len(),
			permit_signature = %truncate_hex(permit_signature),
			%user_deadline,
			"Built meta-transaction payload"
		);

		Ok(TypedDataPayload::new(
			PayloadDomain {
				name: self.settings.domain_name.clone(),
				version: self.settings.domain_version.clone(),
				chain_id,
				verifying_contract: intent.contract_address,
			},
			DistributionMessage {
				chain_id,
				target: intent.contract_address,
				payment_token: intent.payment_token,
				from: intent.from,
				transfers: intent.transfers,
				total_price: intent.total_price,
				permit_deadline: intent.deadline,
				permit_signature: signature.as_bytes().clone(),
				user,
				user_nonce,
				user_deadline,
			},
		))
	}
}
