//! Signer contexts for the meta-transaction builder.

use crate::{random_nonce, ProviderError, SignerContext};
use alloy::primitives::{Address, U256};
use alloy::signers::Signer;
use async_trait::async_trait;

/// Context backed by an alloy signer.
///
/// Nonces are random, so no signer state has to be tracked between calls.
#[derive(Debug, Clone)]
pub struct WalletContext<S> {
	signer: S,
}

impl<S: Signer + Send + Sync> WalletContext<S> {
	pub fn new(signer: S) -> Self {
		Self { signer }
	}
}

#[async_trait]
impl<S: Signer + Send + Sync> SignerContext for WalletContext<S> {
	async fn address(&self) -> Result<Address, ProviderError> {
		Ok(self.signer.address())
	}

	async fn fresh_nonce(&self) -> Result<U256, ProviderError> {
		Ok(random_nonce())
	}

	fn current_timestamp(&self) -> u64 {
		payintent_types::current_timestamp()
	}
}

/// Context for a signer known only by address, e.g. an external wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressContext {
	address: Address,
}

impl AddressContext {
	pub fn new(address: Address) -> Self {
		Self { address }
	}
}

#[async_trait]
impl SignerContext for AddressContext {
	async fn address(&self) -> Result<Address, ProviderError> {
		Ok(self.address)
	}

	async fn fresh_nonce(&self) -> Result<U256, ProviderError> {
		Ok(random_nonce())
	}

	fn current_timestamp(&self) -> u64 {
		payintent_types::current_timestamp()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::address;
	use alloy::signers::local::PrivateKeySigner;

	// Well-known anvil development key
	const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[tokio::test]
	async fn test_wallet_context_address() {
		let signer: PrivateKeySigner = DEV_KEY.parse().unwrap();
		let context = WalletContext::new(signer);

		assert_eq!(
			context.address().await.unwrap(),
			address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);
	}

	#[tokio::test]
	async fn test_nonces_differ_between_calls() {
		let context = AddressContext::new(Address::ZERO);
		let first = context.fresh_nonce().await.unwrap();
		let second = context.fresh_nonce().await.unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn test_timestamp_is_recent() {
		let context = AddressContext::new(Address::ZERO);
		// 2023-11-14
		assert!(context.current_timestamp() > 1_700_000_000);
	}
}
