//! Stream obfuscation codec for LFL container files.
//!
//! Every byte of every `NN.LFL` file on disk is XORed with `0xFF`. Applying
//! the transform twice yields the original bytes, so a single function covers
//! both directions.

/// XOR key applied to every byte of an LFL file
pub const XOR_KEY: u8 = 0xFF;

/// Decrypts (or re-encrypts) an LFL byte stream.
///
/// The transform is an involution: `decrypt(decrypt(x)) == x`.
pub fn decrypt(data: &[u8]) -> Vec<u8> {
	data.iter().map(|b| b ^ XOR_KEY).collect()
}

/// In-place variant of [`decrypt`] for callers that already own the buffer.
pub fn decrypt_in_place(data: &mut [u8]) {
	for b in data.iter_mut() {
		*b ^= XOR_KEY;
	}
}
