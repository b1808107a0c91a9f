//! Command line harness for the payment intent payload builders.
//!
//! Reads a payment intent from a JSON file and prints the typed data to sign,
//! or the calldata for the distribution contract, to stdout. Logs go to
//! stderr.

use clap::Parser;
use payintent_config::Config;

mod commands;

use commands::Command;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file; built-in defaults are used when omitted
	#[arg(short, long, env = "PAYINTENT_CONFIG")]
	config: Option<String>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
	fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();

	let config = match &args.config {
		Some(path) => {
			let config = Config::from_file(path).await?;
			tracing::info!(path = %path, networks = config.networks.len(), "Loaded configuration");
			config
		},
		None => Config::default(),
	};

	let output = args.command.run(&config).await?;
	println!("{}", output);
	Ok(())
}
