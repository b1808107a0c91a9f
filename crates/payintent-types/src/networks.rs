//! Chain name resolution.
//!
//! Intents name their network (`"polygon"`), while EIP-712 domains need a
//! numeric chain id. The registry starts with the public networks the
//! payment contracts are deployed on and can be extended from configuration.

use crate::ValidationError;
use std::collections::HashMap;

/// Networks known without any configuration.
const BUILTIN_NETWORKS: &[(&str, u64)] = &[
	("ethereum", 1),
	("mainnet", 1),
	("sepolia", 11_155_111),
	("polygon", 137),
	("matic", 137),
	("amoy", 80_002),
	("arbitrum", 42_161),
	("optimism", 10),
	("base", 8_453),
];

/// Maps network names to chain ids.
///
/// Lookups are case-insensitive. A decimal string is accepted as a chain id
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRegistry {
	chains: HashMap<String, u64>,
}

impl Default for NetworkRegistry {
	fn default() -> Self {
		Self {
			chains: BUILTIN_NETWORKS
				.iter()
				.map(|(name, chain_id)| (name.to_string(), *chain_id))
				.collect(),
		}
	}
}

impl NetworkRegistry {
	/// Creates a registry holding only the built-in networks.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or overrides a network.
	pub fn with_network(mut self, name: &str, chain_id: u64) -> Self {
		self.insert(name, chain_id);
		self
	}

	/// Adds or overrides a network in place.
	pub fn insert(&mut self, name: &str, chain_id: u64) {
		self.chains.insert(name.trim().to_lowercase(), chain_id);
	}

	/// Resolves a network name or decimal chain id.
	pub fn resolve(&self, chain: &str) -> Result<u64, ValidationError> {
		let key = chain.trim().to_lowercase();
		if let Some(chain_id) = self.chains.get(&key) {
			return Ok(*chain_id);
		}

		match key.parse::<u64>() {
			Ok(chain_id) if chain_id > 0 => Ok(chain_id),
			_ => Err(ValidationError::InvalidIntent(format!(
				"unknown chain '{}'",
				chain
			))),
		}
	}
}
