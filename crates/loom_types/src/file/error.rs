//! Error types for container parsing and manipulation.

use thiserror::Error;

/// Errors that can occur when parsing or manipulating LFL container files
#[derive(Debug, Error)]
pub enum LflError {
	/// Not enough data to parse
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Decryption produced a blob whose header fields are out of range
	#[error("Corrupt container: {reason}")]
	CorruptContainer {
		/// What failed the post-decryption sanity check
		reason: String,
	},

	/// Width, height or resource directory checks failed
	#[error("Invalid room: {reason}")]
	InvalidRoom {
		/// Which header check failed
		reason: String,
	},

	/// Object offsets cross, go backward, or the OBCD run is truncated
	#[error("Invalid object table: object {index} spans {start:#06X}..{end:#06X}")]
	InvalidObjectTable {
		/// Index of the offending object
		index: usize,
		/// Start of the rejected region
		start: usize,
		/// End of the rejected region
		end: usize,
	},

	/// Both object image layouts were rejected
	#[error("Undecodable object image: {size} byte payload matched no known layout")]
	UndecodableImage {
		/// Size of the rejected payload
		size: usize,
	},

	/// Master index section truncated or malformed
	#[error("Invalid master index: {reason}")]
	InvalidIndex {
		/// Which section failed and why
		reason: String,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
