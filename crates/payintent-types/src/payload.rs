//! EIP-712 typed data payloads.
//!
//! A [`TypedDataPayload`] is the `{domain, types, value}` triple a wallet
//! signs. Its `types` are derived from the Solidity struct the message hashes
//! to, so the JSON handed to the wallet and the digest computed locally can
//! never disagree on field order or naming.

use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::{Eip712Domain, SolStruct};
use crate::utils::checksummed_address;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// A single member of an EIP-712 struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Field {
	/// Member name.
	pub name: String,
	/// Solidity type of the member.
	#[serde(rename = "type")]
	pub r#type: String,
}

/// EIP-712 type schema keyed by struct name.
pub type Eip712Types = BTreeMap<String, Vec<Eip712Field>>;

/// A message that can be wrapped in a [`TypedDataPayload`].
///
/// The serialized form is what wallets display and sign; [`Self::Struct`] is
/// the Solidity definition used for hashing.
pub trait Eip712Message: Serialize {
	/// Solidity struct this message hashes as.
	type Struct: SolStruct;

	/// Converts the message into its Solidity struct.
	fn to_sol_struct(&self) -> Self::Struct;
}

/// EIP-712 domain binding a payload to a contract and chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadDomain {
	/// Signing domain name.
	pub name: String,
	/// Signing domain version.
	pub version: String,
	/// Chain the signature is valid on.
	pub chain_id: u64,
	/// Contract that verifies the signature.
	#[serde(with = "checksummed_address")]
	pub verifying_contract: Address,
}

impl PayloadDomain {
	/// Converts into the alloy domain used for hashing.
	pub fn to_eip712_domain(&self) -> Eip712Domain {
		Eip712Domain::new(
			Some(self.name.clone().into()),
			Some(self.version.clone().into()),
			Some(U256::from(self.chain_id)),
			Some(self.verifying_contract),
			None,
		)
	}
}

/// Parses an EIP-712 `encodeType` string into a type schema.
///
/// `"Mail(Person from,string contents)Person(string name)"` yields two
/// entries, `Mail` and `Person`, with their members in declaration order.
pub fn parse_encode_type(encoded: &str) -> Eip712Types {
	let mut types = Eip712Types::new();

	for definition in encoded.split_terminator(')') {
		let Some((name, members)) = definition.split_once('(') else {
			continue;
		};
		let fields = members
			.split(',')
			.filter_map(|member| {
				let (ty, field_name) = member.trim().rsplit_once(' ')?;
				Some(Eip712Field {
					name: field_name.to_string(),
					r#type: ty.to_string(),
				})
			})
			.collect();
		types.insert(name.to_string(), fields);
	}

	types
}

/// Immutable EIP-712 payload ready to be handed to a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataPayload<M> {
	domain: PayloadDomain,
	types: Eip712Types,
	primary_type: String,
	value: M,
}

impl<M: Eip712Message> TypedDataPayload<M> {
	/// Wraps a message under a domain, deriving the type schema.
	pub fn new(domain: PayloadDomain, value: M) -> Self {
		Self {
			domain,
			types: parse_encode_type(&<M::Struct as SolStruct>::eip712_encode_type()),
			primary_type: <M::Struct as SolStruct>::NAME.to_string(),
			value,
		}
	}

	/// The signing domain.
	pub fn domain(&self) -> &PayloadDomain {
		&self.domain
	}

	/// The type schema, without `EIP712Domain`.
	pub fn types(&self) -> &Eip712Types {
		&self.types
	}

	/// Name of the top-level struct.
	pub fn primary_type(&self) -> &str {
		&self.primary_type
	}

	/// The message to sign.
	pub fn value(&self) -> &M {
		&self.value
	}

	/// EIP-712 domain separator.
	pub fn domain_separator(&self) -> B256 {
		self.domain.to_eip712_domain().separator()
	}

	/// EIP-712 digest: keccak256(0x1901 || domainSeparator || hashStruct(value)).
	pub fn signing_hash(&self) -> B256 {
		self.value
			.to_sol_struct()
			.eip712_signing_hash(&self.domain.to_eip712_domain())
	}

	/// Renders the payload as `eth_signTypedData_v4` JSON.
	pub fn to_typed_data_json(&self) -> Result<serde_json::Value, serde_json::Error> {
		let mut types = serde_json::to_value(&self.types)?;
		types["EIP712Domain"] = json!([
			{ "name": "name", "type": "string" },
			{ "name": "version", "type": "string" },
			{ "name": "chainId", "type": "uint256" },
			{ "name": "verifyingContract", "type": "address" },
		]);

		Ok(json!({
			"types": types,
			"primaryType": self.primary_type,
			"domain": self.domain,
			"message": serde_json::to_value(&self.value)?,
		}))
	}

	/// Converts the payload into alloy's dynamic typed data.
	pub fn to_typed_data(&self) -> Result<TypedData, serde_json::Error> {
		serde_json::from_value(self.to_typed_data_json()?)
	}
}
