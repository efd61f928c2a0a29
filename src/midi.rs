//! Standard MIDI file wrapping for extracted sound streams.
//!
//! Sound resources are raw Roland MT-32 event streams with no file header.
//! Wrapping one as a Standard MIDI File is purely structural: an `MThd`
//! declaring format 0 with one track, then an `MTrk` whose payload is the
//! raw stream plus an end-of-track marker. Every multi-byte integer in the
//! wrapper is big-endian, unlike everything inside the containers.

/// Ticks per quarter note declared in the header
pub const TICKS_PER_QUARTER: u16 = 480;

/// Delta time 0 + end-of-track meta event
const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Wraps a raw MT-32 event stream as a format-0 Standard MIDI File.
pub fn wrap_sound(raw: &[u8]) -> Vec<u8> {
	let track_len = raw.len() + END_OF_TRACK.len();
	let mut midi = Vec::with_capacity(14 + 8 + track_len);

	// MThd: length 6, format 0, one track
	midi.extend_from_slice(b"MThd");
	midi.extend_from_slice(&6u32.to_be_bytes());
	midi.extend_from_slice(&0u16.to_be_bytes());
	midi.extend_from_slice(&1u16.to_be_bytes());
	midi.extend_from_slice(&TICKS_PER_QUARTER.to_be_bytes());

	// MTrk: raw events plus end-of-track
	midi.extend_from_slice(b"MTrk");
	midi.extend_from_slice(&(track_len as u32).to_be_bytes());
	midi.extend_from_slice(raw);
	midi.extend_from_slice(&END_OF_TRACK);

	midi
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_header_layout() {
		let midi = wrap_sound(&[]);
		assert_eq!(&midi[0..4], b"MThd");
		assert_eq!(&midi[4..8], &[0, 0, 0, 6]);
		assert_eq!(&midi[8..10], &[0, 0]); // format 0
		assert_eq!(&midi[10..12], &[0, 1]); // one track
		assert_eq!(&midi[12..14], &[0x01, 0xE0]); // 480 tpq, big-endian
	}

	#[test]
	fn test_track_wraps_raw_stream() {
		let raw = [0x90u8, 0x3C, 0x40];
		let midi = wrap_sound(&raw);
		assert_eq!(&midi[14..18], b"MTrk");
		// Track length counts the payload plus the end-of-track marker
		assert_eq!(&midi[18..22], &7u32.to_be_bytes());
		assert_eq!(&midi[22..25], &raw);
		assert_eq!(&midi[25..29], &[0x00, 0xFF, 0x2F, 0x00]);
		assert_eq!(midi.len(), 29);
	}

	#[test]
	fn test_empty_stream_still_terminates() {
		let midi = wrap_sound(&[]);
		assert_eq!(&midi[18..22], &4u32.to_be_bytes());
		assert_eq!(&midi[22..26], &[0x00, 0xFF, 0x2F, 0x00]);
	}
}
