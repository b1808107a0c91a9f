//! Contract reads over an alloy provider.

use crate::{ContractReader, ProviderError};
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use payintent_types::standards::eip2612::bindings::IERC20Permit;

/// [`ContractReader`] backed by a JSON-RPC node.
#[derive(Clone)]
pub struct AlloyContractReader {
	provider: DynProvider,
}

impl AlloyContractReader {
	/// Wraps an existing provider.
	pub fn new(provider: DynProvider) -> Self {
		Self { provider }
	}

	/// Connects to a node over HTTP.
	pub fn connect(rpc_url: &str) -> Result<Self, ProviderError> {
		let url = rpc_url
			.parse()
			.map_err(|e| ProviderError::Network(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;
		let provider = ProviderBuilder::new()
			.disable_recommended_fillers()
			.connect_http(url)
			.erased();
		Ok(Self { provider })
	}

	/// Performs an `eth_call` and decodes its single return value.
	async fn call<C: SolCall>(&self, token: Address, call: C) -> Result<C::Return, ProviderError> {
		let request = TransactionRequest::default()
			.with_to(token)
			.with_input(call.abi_encode());

		let output = self.provider.call(request).await.map_err(|e| {
			if e.as_error_resp().is_some() {
				ProviderError::ContractCall {
					contract: token,
					method: C::SIGNATURE.to_string(),
					reason: e.to_string(),
				}
			} else {
				ProviderError::Network(format!("Failed to call {}: {}", C::SIGNATURE, e))
			}
		})?;

		C::abi_decode_returns(&output).map_err(|e| ProviderError::ContractCall {
			contract: token,
			method: C::SIGNATURE.to_string(),
			reason: format!("cannot decode return data: {}", e),
		})
	}
}

#[async_trait]
impl ContractReader for AlloyContractReader {
	async fn chain_id(&self) -> Result<u64, ProviderError> {
		self.provider
			.get_chain_id()
			.await
			.map_err(|e| ProviderError::Network(format!("Failed to get chain id: {}", e)))
	}

	async fn permit_nonce(&self, token: Address, owner: Address) -> Result<U256, ProviderError> {
		let nonce = self.call(token, IERC20Permit::noncesCall { owner }).await?;
		tracing::debug!(%token, %owner, %nonce, "Read permit nonce");
		Ok(nonce)
	}

	async fn token_name(&self, token: Address) -> Result<String, ProviderError> {
		self.call(token, IERC20Permit::nameCall {}).await
	}

	async fn token_version(&self, token: Address) -> Result<String, ProviderError> {
		self.call(token, IERC20Permit::versionCall {}).await
	}
}
