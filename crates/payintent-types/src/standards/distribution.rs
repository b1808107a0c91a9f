//! Payment distributor meta-transaction.
//!
//! The user signs a `PaymentDistribution` under the distributor's domain; a
//! relayer submits it together with the embedded permit signature, and the
//! distributor calls `distributeTokensWithPermit` on the user's behalf.

use crate::intent::Transfer;
use crate::payload::Eip712Message;
use crate::utils::{checksummed_address, u256_decimal};
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Name of the on-chain entry point that executes a distribution.
pub const DISTRIBUTE_FUNCTION_NAME: &str = "distributeTokensWithPermit";

/// Solidity bindings for the payment distributor.
pub mod bindings {
	use alloy::sol;

	sol! {
		struct Transfer {
			address recipient;
			uint256 amount;
		}

		struct PaymentDistribution {
			uint256 chainId;
			address target;
			address paymentToken;
			address from;
			Transfer[] transfers;
			uint256 totalPrice;
			uint256 permitDeadline;
			bytes permitSignature;
			address user;
			uint256 userNonce;
			uint256 userDeadline;
		}

		interface IPaymentDistributor {
			function distributeTokensWithPermit(
				address paymentToken,
				address from,
				Transfer[] transfers,
				uint256 totalPrice,
				uint256 deadline,
				uint8 v,
				bytes32 r,
				bytes32 s
			) external;
		}
	}
}

impl From<Transfer> for bindings::Transfer {
	fn from(transfer: Transfer) -> Self {
		Self { recipient: transfer.recipient, amount: transfer.amount }
	}
}

/// The `PaymentDistribution` message in its wallet-facing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionMessage {
	pub chain_id: u64,
	/// Distribution contract.
	#[serde(with = "checksummed_address")]
	pub target: Address,
	#[serde(with = "checksummed_address")]
	pub payment_token: Address,
	/// Account the tokens are pulled from.
	#[serde(with = "checksummed_address")]
	pub from: Address,
	pub transfers: Vec<Transfer>,
	#[serde(with = "u256_decimal")]
	pub total_price: U256,
	/// Deadline of the embedded permit.
	#[serde(with = "u256_decimal")]
	pub permit_deadline: U256,
	/// Permit signature exactly as produced by the wallet.
	pub permit_signature: Bytes,
	/// Account authorizing the meta-transaction.
	#[serde(with = "checksummed_address")]
	pub user: Address,
	#[serde(with = "u256_decimal")]
	pub user_nonce: U256,
	#[serde(with = "u256_decimal")]
	pub user_deadline: U256,
}

impl Eip712Message for DistributionMessage {
	type Struct = bindings::PaymentDistribution;

	fn to_sol_struct(&self) -> Self::Struct {
		bindings::PaymentDistribution {
			chainId: U256::from(self.chain_id),
			target: self.target,
			paymentToken: self.payment_token,
			from: self.from,
			transfers: self.transfers.iter().copied().map(Into::into).collect(),
			totalPrice: self.total_price,
			permitDeadline: self.permit_deadline,
			permitSignature: self.permit_signature.clone(),
			user: self.user,
			userNonce: self.user_nonce,
			userDeadline: self.user_deadline,
		}
	}
}
