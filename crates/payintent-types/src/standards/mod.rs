//! Solidity definitions of the messages wallets are asked to sign.

/// Payment distributor meta-transaction and entry point.
pub mod distribution;
/// ERC-2612 permit.
pub mod eip2612;
