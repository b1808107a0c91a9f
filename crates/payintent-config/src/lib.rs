//! Configuration for the payment intent payload builders.
//!
//! Configuration is read from TOML. String values may reference environment
//! variables as `${VAR}` or `${VAR:-default}`.
//!
//! A file may pull in others with `include = ["networks.toml"]`; included
//! files may include further files. Every top-level section must be defined
//! in exactly one file.

pub mod builders;
mod loader;

use payintent_types::NetworkRegistry;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

pub use builders::config::ConfigBuilder;

/// Failure to load a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A file could not be found or read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// The TOML is malformed or does not match the schema.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// The values are well-formed but unusable.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	/// Networks keyed by the name intents use in their `chain` field.
	#[serde(default)]
	pub networks: HashMap<String, NetworkConfig>,
	/// Signing domain and expiry of meta-transaction payloads.
	#[serde(default)]
	pub meta_transaction: MetaTransactionConfig,
}

/// A named network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
	pub chain_id: u64,
	/// JSON-RPC endpoint used for token reads.
	#[serde(default)]
	pub rpc_url: Option<String>,
}

/// Settings for the meta-transaction payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MetaTransactionConfig {
	/// EIP-712 domain name of the distribution contract.
	#[serde(default = "default_domain_name")]
	pub domain_name: String,
	/// EIP-712 domain version of the distribution contract.
	#[serde(default = "default_domain_version")]
	pub domain_version: String,
	/// Lifetime of a meta-transaction signature, counted from when the
	/// payload is built.
	#[serde(default = "default_deadline_seconds")]
	pub deadline_seconds: u64,
}

impl Default for MetaTransactionConfig {
	fn default() -> Self {
		Self {
			domain_name: default_domain_name(),
			domain_version: default_domain_version(),
			deadline_seconds: default_deadline_seconds(),
		}
	}
}

fn default_domain_name() -> String {
	"PaymentDistributor".to_string()
}

fn default_domain_version() -> String {
	"1".to_string()
}

/// Returns the default meta-transaction lifetime of one hour.
fn default_deadline_seconds() -> u64 {
	3600
}

/// Shortest accepted meta-transaction lifetime.
pub const MIN_DEADLINE_SECONDS: u64 = 60;
/// Longest accepted meta-transaction lifetime (7 days).
pub const MAX_DEADLINE_SECONDS: u64 = 7 * 24 * 3600;

/// Largest configuration file accepted, in bytes.
const MAX_CONFIG_SIZE: usize = 1024 * 1024;

/// `${NAME}` or `${NAME:-default}` with bounded name and default lengths.
static ENV_VAR_PATTERN: LazyLock<Result<Regex, regex::Error>> =
	LazyLock::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}"));

/// Substitutes `${NAME}` and `${NAME:-default}` references.
///
/// A reference to an unset variable without a default is an error.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	if input.len() > MAX_CONFIG_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_CONFIG_SIZE
		)));
	}

	let pattern = ENV_VAR_PATTERN
		.as_ref()
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut output = String::with_capacity(input.len());
	let mut copied_up_to = 0;
	for cap in pattern.captures_iter(input) {
		let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};

		let value = match std::env::var(name.as_str()) {
			Ok(value) => value,
			Err(_) => cap
				.get(2)
				.map(|default| default.as_str().to_string())
				.ok_or_else(|| {
					ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						name.as_str()
					))
				})?,
		};

		output.push_str(&input[copied_up_to..whole.start()]);
		output.push_str(&value);
		copied_up_to = whole.end();
	}
	output.push_str(&input[copied_up_to..]);

	Ok(output)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Validates the configuration.
	///
	/// - Network names must be non-empty
	/// - Chain ids must be non-zero and unique across networks
	/// - RPC URLs, when present, must be non-empty
	/// - The meta-transaction domain name and version must be non-empty
	/// - `deadline_seconds` must lie within 60 seconds and 7 days
	pub fn validate(&self) -> Result<(), ConfigError> {
		let mut seen_chain_ids = HashSet::new();
		for (name, network) in &self.networks {
			if name.trim().is_empty() {
				return Err(ConfigError::Validation("Network name cannot be empty".into()));
			}
			if network.chain_id == 0 {
				return Err(ConfigError::Validation(format!(
					"Network '{}' must have a non-zero chain_id",
					name
				)));
			}
			if !seen_chain_ids.insert(network.chain_id) {
				return Err(ConfigError::Validation(format!(
					"Chain id {} is configured for more than one network",
					network.chain_id
				)));
			}
			if matches!(&network.rpc_url, Some(url) if url.trim().is_empty()) {
				return Err(ConfigError::Validation(format!(
					"Network '{}' has an empty rpc_url",
					name
				)));
			}
		}

		let meta = &self.meta_transaction;
		if meta.domain_name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"meta_transaction.domain_name cannot be empty".into(),
			));
		}
		if meta.domain_version.trim().is_empty() {
			return Err(ConfigError::Validation(
				"meta_transaction.domain_version cannot be empty".into(),
			));
		}
		if !(MIN_DEADLINE_SECONDS..=MAX_DEADLINE_SECONDS).contains(&meta.deadline_seconds) {
			return Err(ConfigError::Validation(format!(
				"meta_transaction.deadline_seconds must be between {} and {}, got {}",
				MIN_DEADLINE_SECONDS, MAX_DEADLINE_SECONDS, meta.deadline_seconds
			)));
		}

		Ok(())
	}

	/// Built-in networks extended and overridden by the configured ones.
	pub fn network_registry(&self) -> NetworkRegistry {
		self.networks
			.iter()
			.fold(NetworkRegistry::new(), |registry, (name, network)| {
				registry.with_network(name, network.chain_id)
			})
	}

	/// RPC URL configured for a chain id, if any.
	pub fn rpc_url(&self, chain_id: u64) -> Option<&str> {
		self.networks
			.values()
			.find(|network| network.chain_id == chain_id)
			.and_then(|network| network.rpc_url.as_deref())
	}
}

/// Parses a TOML string, resolving environment variables and validating the
/// result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("PAYINTENT_TEST_HOST", "localhost");
		std::env::set_var("PAYINTENT_TEST_PORT", "8545");

		let input = "url = \"http://${PAYINTENT_TEST_HOST}:${PAYINTENT_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "url = \"http://localhost:8545\"");

		std::env::remove_var("PAYINTENT_TEST_HOST");
		std::env::remove_var("PAYINTENT_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${PAYINTENT_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${PAYINTENT_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("PAYINTENT_MISSING_VAR"));
	}

	#[test]
	fn test_empty_config_uses_defaults() {
		let config: Config = "".parse().unwrap();

		assert!(config.networks.is_empty());
		assert_eq!(config.meta_transaction.domain_name, "PaymentDistributor");
		assert_eq!(config.meta_transaction.domain_version, "1");
		assert_eq!(config.meta_transaction.deadline_seconds, 3600);
	}

	#[test]
	fn test_config_with_env_vars() {
		std::env::set_var("PAYINTENT_TEST_RPC", "http://localhost:8545");

		let config_str = r#"
[networks.anvil]
chain_id = 31337
rpc_url = "${PAYINTENT_TEST_RPC}"

[networks.polygon]
chain_id = 137
rpc_url = "${PAYINTENT_POLYGON_RPC:-https://polygon-rpc.com}"

[meta_transaction]
domain_name = "Distributor"
domain_version = "2"
deadline_seconds = 600
"#;

		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.rpc_url(31337), Some("http://localhost:8545"));
		assert_eq!(config.rpc_url(137), Some("https://polygon-rpc.com"));
		assert_eq!(config.rpc_url(1), None);
		assert_eq!(config.meta_transaction.domain_name, "Distributor");
		assert_eq!(config.meta_transaction.deadline_seconds, 600);

		std::env::remove_var("PAYINTENT_TEST_RPC");
	}

	#[test]
	fn test_network_registry_extends_builtins() {
		let config: Config = r#"
[networks.anvil]
chain_id = 31337
"#
		.parse()
		.unwrap();

		let registry = config.network_registry();
		assert_eq!(registry.resolve("anvil").unwrap(), 31337);
		assert_eq!(registry.resolve("polygon").unwrap(), 137);
	}

	#[test]
	fn test_duplicate_chain_id_rejected() {
		let result: Result<Config, _> = r#"
[networks.local]
chain_id = 31337

[networks.anvil]
chain_id = 31337
"#
		.parse();

		let err = result.unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
		assert!(err.to_string().contains("31337"));
	}

	#[test]
	fn test_zero_chain_id_rejected() {
		let result: Result<Config, _> = "[networks.broken]\nchain_id = 0\n".parse();
		assert!(result.unwrap_err().to_string().contains("non-zero chain_id"));
	}

	#[test]
	fn test_empty_rpc_url_rejected() {
		let result: Result<Config, _> =
			"[networks.anvil]\nchain_id = 31337\nrpc_url = \"\"\n".parse();
		assert!(result.unwrap_err().to_string().contains("empty rpc_url"));
	}

	#[test]
	fn test_deadline_bounds() {
		let too_short: Result<Config, _> = "[meta_transaction]\ndeadline_seconds = 10\n".parse();
		assert!(too_short
			.unwrap_err()
			.to_string()
			.contains("deadline_seconds"));

		let too_long: Result<Config, _> =
			"[meta_transaction]\ndeadline_seconds = 999999999\n".parse();
		assert!(too_long.is_err());

		let week: Result<Config, _> = "[meta_transaction]\ndeadline_seconds = 604800\n".parse();
		assert!(week.is_ok());
	}

	#[test]
	fn test_empty_domain_name_rejected() {
		let result: Result<Config, _> = "[meta_transaction]\ndomain_name = \" \"\n".parse();
		assert!(result.unwrap_err().to_string().contains("domain_name"));
	}

	#[test]
	fn test_parse_error_is_concise() {
		let result: Result<Config, _> = "[networks.anvil]\nchain_id = \"not a number\"\n".parse();
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}
}
