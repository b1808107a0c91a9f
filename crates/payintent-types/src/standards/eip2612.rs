//! ERC-2612 permit.
//!
//! A permit is an off-chain approval: the token owner signs a `Permit` struct
//! under the token's own EIP-712 domain and anyone may submit it.

use crate::payload::Eip712Message;
use crate::utils::{checksummed_address, u256_decimal};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Solidity bindings for ERC-2612.
pub mod bindings {
	use alloy::sol;

	sol! {
		struct Permit {
			address owner;
			address spender;
			uint256 value;
			uint256 nonce;
			uint256 deadline;
		}

		interface IERC20Permit {
			function name() external view returns (string);
			function version() external view returns (string);
			function nonces(address owner) external view returns (uint256);
		}
	}
}

/// The `Permit` message in its wallet-facing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitMessage {
	#[serde(with = "checksummed_address")]
	pub owner: Address,
	#[serde(with = "checksummed_address")]
	pub spender: Address,
	#[serde(with = "u256_decimal")]
	pub value: U256,
	#[serde(with = "u256_decimal")]
	pub nonce: U256,
	#[serde(with = "u256_decimal")]
	pub deadline: U256,
}

impl Eip712Message for PermitMessage {
	type Struct = bindings::Permit;

	fn to_sol_struct(&self) -> Self::Struct {
		bindings::Permit {
			owner: self.owner,
			spender: self.spender,
			value: self.value,
			nonce: self.nonce,
			deadline: self.deadline,
		}
	}
}
