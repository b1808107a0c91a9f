//! Subcommands of the `payintent` binary.

use clap::Subcommand;
use payintent_builder::{
	encode_distribution_call, MetaTransactionPayloadBuilder, PermitPayloadBuilder,
};
use payintent_config::Config;
use payintent_provider::{AddressContext, AlloyContractReader};
use payintent_types::{parse_address, Eip712Message, PaymentIntent, TypedDataPayload};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Build the ERC-2612 permit typed data the payer signs first
	Permit {
		/// Payment intent JSON file
		#[arg(long)]
		intent: PathBuf,
		/// Token owner who will sign the permit
		#[arg(long)]
		owner: String,
		/// RPC endpoint; defaults to the configured one for the intent's chain
		#[arg(long, env = "PAYINTENT_RPC_URL")]
		rpc_url: Option<String>,
		/// Print `eth_signTypedData_v4` JSON instead of the payload
		#[arg(long)]
		typed_data: bool,
	},
	/// Build the distribution meta-transaction embedding a permit signature
	MetaTx {
		/// Payment intent JSON file
		#[arg(long)]
		intent: PathBuf,
		/// Permit signature, 65 bytes hex
		#[arg(long)]
		signature: String,
		/// Address that will sign the meta-transaction
		#[arg(long)]
		signer: String,
		/// Print `eth_signTypedData_v4` JSON instead of the payload
		#[arg(long)]
		typed_data: bool,
	},
	/// Encode the `distributeTokensWithPermit` calldata
	Calldata {
		/// Payment intent JSON file
		#[arg(long)]
		intent: PathBuf,
		/// Permit signature, 65 bytes hex
		#[arg(long)]
		signature: String,
	},
}

impl Command {
	/// Runs the command, returning what should be printed.
	pub async fn run(&self, config: &Config) -> Result<String, Box<dyn Error>> {
		match self {
			Command::Permit {
				intent,
				owner,
				rpc_url,
				typed_data,
			} => {
				let intent = read_intent(intent).await?;
				let chain_id = config.network_registry().resolve(&intent.chain)?;
				let rpc_url = rpc_url
					.as_deref()
					.or_else(|| config.rpc_url(chain_id))
					.ok_or_else(|| format!("No rpc_url configured for chain {}", chain_id))?;

				tracing::debug!(chain_id, rpc_url, "Connecting to node");
				let reader = AlloyContractReader::connect(rpc_url)?;
				let payload = PermitPayloadBuilder::from_config(config)
					.build(owner, &intent, &reader)
					.await?;
				render(&payload, *typed_data)
			},
			Command::MetaTx {
				intent,
				signature,
				signer,
				typed_data,
			} => {
				let intent = read_intent(intent).await?;
				let signer = AddressContext::new(parse_address(signer)?);
				let payload = MetaTransactionPayloadBuilder::from_config(config)
					.build(signature, &intent, &signer)
					.await?;
				render(&payload, *typed_data)
			},
			Command::Calldata { intent, signature } => {
				let intent = read_intent(intent).await?;
				let calldata = encode_distribution_call(&intent, signature)?;
				Ok(calldata.to_string())
			},
		}
	}
}

async fn read_intent(path: &Path) -> Result<PaymentIntent, Box<dyn Error>> {
	let content = tokio::fs::read_to_string(path)
		.await
		.map_err(|e| format!("Cannot read intent {}: {}", path.display(), e))?;
	let intent = serde_json::from_str(&content)
		.map_err(|e| format!("Malformed intent {}: {}", path.display(), e))?;
	Ok(intent)
}

fn render<M: Eip712Message>(
	payload: &TypedDataPayload<M>,
	typed_data: bool,
) -> Result<String, Box<dyn Error>> {
	let json = if typed_data {
		serde_json::to_string_pretty(&payload.to_typed_data_json()?)?
	} else {
		serde_json::to_string_pretty(payload)?
	};
	Ok(json)
}
