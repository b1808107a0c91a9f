//! Utility functions for common type conversions and transformations.
//!
//! This module provides helpers for hex prefix handling, address and amount
//! parsing, and timestamps used throughout the payment intent crates.

pub mod amount;
pub mod conversion;
pub mod formatting;
pub mod helpers;

pub use amount::{parse_amount, u256_decimal};
pub use conversion::{checksummed_address, parse_address};
pub use formatting::{truncate_hex, without_0x_prefix};
pub use helpers::current_timestamp;
