//! Benchmark helper utilities for loom-rs
//!
//! Generates synthetic RLE strip streams and full room blobs so the
//! benchmarks run without real game data checked into the repository.

/// Common strip heights used by the benchmarks
pub mod heights {
	/// Object tier height for small payloads
	pub const OBJECT_SMALL: usize = 32;
	/// Object tier height for medium payloads
	pub const OBJECT_MEDIUM: usize = 48;
	/// Object tier height for large payloads
	pub const OBJECT_LARGE: usize = 64;
	/// Typical room background height
	pub const ROOM: usize = 144;
}

/// Generates an RLE stream that fills one strip at the given height.
///
/// Mixes all three opcode classes so the decoder's dispatch paths are all
/// exercised: single-color runs, repeat-previous runs, and dither runs.
pub fn generate_strip_stream(height: usize) -> Vec<u8> {
	let total = 8 * height;
	let mut stream = Vec::new();
	let mut emitted = 0usize;

	while emitted < total {
		match (emitted / 7) % 3 {
			0 => {
				// Single color run of 7, color cycles through the palette
				let color = (emitted % 16) as u8;
				stream.push(0x70 | color);
				emitted += 7;
			}
			1 => {
				// Repeat-previous run of 7
				stream.push(0x87);
				emitted += 7;
			}
			_ => {
				// Dither run of 7 alternating two colors
				stream.push(0xC7);
				stream.push(0x3A);
				emitted += 7;
			}
		}
	}

	stream
}

/// Builds a decrypted room blob with the given number of background strips.
///
/// The blob carries a valid header, a one-slot resource directory pointing
/// at the SMAP, and `strips` RLE columns at `height`.
pub fn generate_room_blob(strips: usize, height: usize) -> Vec<u8> {
	let strip_stream = generate_strip_stream(height);
	let smap_ptr = 0x40usize;
	let table_size = strips * 2;

	let mut blob = vec![0u8; smap_ptr + 2 + table_size];
	blob[4..6].copy_from_slice(&((strips * 8) as u16).to_le_bytes());
	blob[6..8].copy_from_slice(&(height as u16).to_le_bytes());
	blob[0x0A..0x0C].copy_from_slice(&(smap_ptr as u16).to_le_bytes());

	// Strip table is relative to the SMAP pointer
	let mut rel_offset = 2 + table_size;
	for i in 0..strips {
		let pos = smap_ptr + 2 + i * 2;
		blob[pos..pos + 2].copy_from_slice(&(rel_offset as u16).to_le_bytes());
		rel_offset += strip_stream.len();
	}
	for _ in 0..strips {
		blob.extend_from_slice(&strip_stream);
	}

	blob
}

#[cfg(test)]
mod tests {
	use super::*;
	use loom_types::file::{RoomFile, decode_strip};

	#[test]
	fn test_strip_stream_fills_strip() {
		let stream = generate_strip_stream(heights::ROOM);
		let decoded = decode_strip(&stream, heights::ROOM);
		assert_eq!(decoded.len(), 8 * heights::ROOM);
	}

	#[test]
	fn test_room_blob_parses() {
		let blob = generate_room_blob(40, heights::ROOM);
		let room = RoomFile::from_cleartext(blob).unwrap();
		let background = room.background().unwrap();
		assert_eq!(background.strip_count(), 40);
	}
}
