//! Capabilities the payload builders depend on.
//!
//! Builders never own a node connection or a wallet. They receive a
//! [`ContractReader`] for read-only token queries and a [`SignerContext`] for
//! the caller's identity, nonce source and clock. Both are passed explicitly
//! to every build call.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use payintent_types::parse_address;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
	pub mod signer;
}

pub use implementations::evm::alloy::AlloyContractReader;
pub use implementations::signer::{AddressContext, WalletContext};

/// Errors raised by a provider or signer capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
	/// The node could not be reached or returned a transport level error.
	#[error("Network error: {0}")]
	Network(String),
	/// A contract call reverted or returned undecodable data.
	#[error("Call to {method} on {contract} failed: {reason}")]
	ContractCall {
		contract: Address,
		method: String,
		reason: String,
	},
	/// An address or name could not be resolved.
	#[error("Invalid address: {0}")]
	InvalidAddress(String),
	/// The signer context failed to provide its address or nonce.
	#[error("Signer error: {0}")]
	Signer(String),
}

/// Read-only access to token contracts on one chain.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ContractReader: Send + Sync {
	/// Chain id of the connected node.
	async fn chain_id(&self) -> Result<u64, ProviderError>;

	/// ERC-2612 `nonces(owner)` of `token`.
	async fn permit_nonce(&self, token: Address, owner: Address) -> Result<U256, ProviderError>;

	/// ERC-20 `name()` of `token`, used as the permit domain name.
	async fn token_name(&self, token: Address) -> Result<String, ProviderError>;

	/// EIP-712 domain version of `token`.
	async fn token_version(&self, token: Address) -> Result<String, ProviderError>;

	/// Resolves an account identifier to an address.
	///
	/// The default accepts hex addresses only.
	async fn resolve_address(&self, name: &str) -> Result<Address, ProviderError> {
		parse_address(name).map_err(ProviderError::InvalidAddress)
	}
}

/// Identity, nonce source and clock of the party signing a meta-transaction.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait SignerContext: Send + Sync {
	/// Address that will sign the meta-transaction.
	async fn address(&self) -> Result<Address, ProviderError>;

	/// A nonce not used by any previous meta-transaction of this signer.
	async fn fresh_nonce(&self) -> Result<U256, ProviderError>;

	/// Current unix time in seconds.
	fn current_timestamp(&self) -> u64;
}

/// Random 128-bit nonce widened to `uint256`.
pub(crate) fn random_nonce() -> U256 {
	U256::from(uuid::Uuid::new_v4().as_u128())
}
