//! Helper utilities for common operations.

/// Returns the current UNIX timestamp in seconds, or 0 if the system clock
/// reports a time before the epoch.
pub fn current_timestamp() -> u64 {
	u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
