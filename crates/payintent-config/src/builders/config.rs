//! Configuration builder for tests and embedders that skip TOML.

use crate::{Config, MetaTransactionConfig, NetworkConfig};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
	networks: HashMap<String, NetworkConfig>,
	meta_transaction: MetaTransactionConfig,
}

impl ConfigBuilder {
	/// Creates a builder holding the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a named network.
	pub fn network(mut self, name: &str, chain_id: u64, rpc_url: Option<&str>) -> Self {
		self.networks.insert(
			name.to_string(),
			NetworkConfig {
				chain_id,
				rpc_url: rpc_url.map(str::to_string),
			},
		);
		self
	}

	/// Sets the meta-transaction domain name.
	pub fn domain_name(mut self, name: &str) -> Self {
		self.meta_transaction.domain_name = name.to_string();
		self
	}

	/// Sets the meta-transaction domain version.
	pub fn domain_version(mut self, version: &str) -> Self {
		self.meta_transaction.domain_version = version.to_string();
		self
	}

	/// Sets the meta-transaction lifetime in seconds.
	pub fn deadline_seconds(mut self, seconds: u64) -> Self {
		self.meta_transaction.deadline_seconds = seconds;
		self
	}

	/// Builds the `Config`. Call [`Config::validate`] to check it.
	pub fn build(self) -> Config {
		Config {
			networks: self.networks,
			meta_transaction: self.meta_transaction,
		}
	}
}
