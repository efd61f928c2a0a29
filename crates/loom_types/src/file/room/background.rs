//! Background image reconstruction.
//!
//! Inside the container, the background's strip table lives at
//! `smap_ptr + 2` with offsets relative to `smap_ptr`, so the raw bytes only
//! make sense at their original position in the blob. [`RoomImage`]
//! normalizes that into a relocatable blob:
//!
//! ```text
//! [u16 width][u16 height][u16 strip_offset] * n [strip bytes...]
//! ```
//!
//! with offsets relative to the blob's own start, so the emitted file can be
//! re-parsed without the enclosing room.

use crate::file::LflError;
use crate::file::ega::{Image, OffsetBase, STRIP_WIDTH, StripOffsetTable, decode_strip};
use crate::file::room::header::RoomHeader;

/// Upper bound on background strips, before the width-derived bound
pub const BACKGROUND_STRIP_CAP: usize = 200;

/// Size of the width/height prefix in a normalized blob
const BLOB_HEADER_SIZE: usize = 4;

/// A normalized, self-describing background image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomImage {
	width: u16,
	height: u16,
	strips: Vec<Vec<u8>>,
}

impl RoomImage {
	/// Pulls the SMAP out of a room blob and normalizes it.
	///
	/// Returns `None` when slot 0 holds no usable strip table; callers
	/// record the background as missing and move on.
	pub fn extract(blob: &[u8], header: &RoomHeader) -> Option<Self> {
		let smap = header.smap_ptr();
		let table_start = smap + 2;
		if table_start >= blob.len() {
			return None;
		}

		let max_strips = (header.width() as usize).div_ceil(STRIP_WIDTH).min(BACKGROUND_STRIP_CAP);
		let table = StripOffsetTable::parse(
			blob,
			table_start,
			OffsetBase::Pointer(smap),
			table_start,
			max_strips,
		);
		if table.is_empty() {
			return None;
		}

		let strips =
			table.strip_ranges(blob.len()).into_iter().map(|r| blob[r].to_vec()).collect();

		Some(Self {
			width: header.width(),
			height: header.height(),
			strips,
		})
	}

	/// Image width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Image height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Number of strips carried.
	pub fn strip_count(&self) -> usize {
		self.strips.len()
	}

	/// The raw RLE strip payloads.
	pub fn strips(&self) -> &[Vec<u8>] {
		&self.strips
	}

	/// Serializes the normalized blob with self-relative strip offsets.
	pub fn to_bytes(&self) -> Vec<u8> {
		let table_size = self.strips.len() * 2;
		let data_size: usize = self.strips.iter().map(Vec::len).sum();
		let mut out = Vec::with_capacity(BLOB_HEADER_SIZE + table_size + data_size);

		out.extend_from_slice(&self.width.to_le_bytes());
		out.extend_from_slice(&self.height.to_le_bytes());

		let mut offset = BLOB_HEADER_SIZE + table_size;
		for strip in &self.strips {
			out.extend_from_slice(&(offset as u16).to_le_bytes());
			offset += strip.len();
		}
		for strip in &self.strips {
			out.extend_from_slice(strip);
		}

		out
	}

	/// Re-parses a normalized blob.
	///
	/// The strip table starts right after the width/height prefix and its
	/// offsets are relative to the blob start; the table's own length is
	/// implied by the first offset.
	pub fn from_bytes(data: &[u8]) -> Result<Self, LflError> {
		if data.len() < BLOB_HEADER_SIZE + 2 {
			return Err(LflError::InsufficientData {
				expected: BLOB_HEADER_SIZE + 2,
				actual: data.len(),
			});
		}

		let width = u16::from_le_bytes([data[0], data[1]]);
		let height = u16::from_le_bytes([data[2], data[3]]);

		let first = u16::from_le_bytes([data[4], data[5]]) as usize;
		if first < BLOB_HEADER_SIZE + 2 || first > data.len() || (first - BLOB_HEADER_SIZE) % 2 != 0
		{
			return Err(LflError::CorruptContainer {
				reason: format!("first strip offset {first:#06X} does not follow the table"),
			});
		}
		let strip_count = (first - BLOB_HEADER_SIZE) / 2;

		let table = StripOffsetTable::parse(
			data,
			BLOB_HEADER_SIZE,
			OffsetBase::RegionStart,
			first,
			strip_count,
		);
		if table.len() != strip_count {
			return Err(LflError::CorruptContainer {
				reason: format!(
					"strip table holds {} of {} expected entries",
					table.len(),
					strip_count
				),
			});
		}

		let strips =
			table.strip_ranges(data.len()).into_iter().map(|r| data[r].to_vec()).collect();

		Ok(Self {
			width,
			height,
			strips,
		})
	}

	/// Decodes the strips into a bitmap at the room's height.
	pub fn decode(&self) -> Option<Image> {
		let blob = self.to_bytes();
		let table = StripOffsetTable::parse(
			&blob,
			BLOB_HEADER_SIZE,
			OffsetBase::RegionStart,
			BLOB_HEADER_SIZE + 2,
			self.strips.len(),
		);
		Image::decode(&blob, &table, self.height as usize)
	}

	/// Decodes a single strip column, mainly for inspection tooling.
	pub fn decode_strip_at(&self, index: usize) -> Option<Vec<u8>> {
		self.strips.get(index).map(|s| decode_strip(s, self.height as usize))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Room blob with a two-strip SMAP at 0x40.
	fn room_with_smap() -> (Vec<u8>, RoomHeader) {
		let mut blob = vec![0u8; 0x60];
		blob[4..6].copy_from_slice(&16u16.to_le_bytes());
		blob[6..8].copy_from_slice(&4u16.to_le_bytes());
		// Directory slot 0 -> SMAP at 0x40
		blob[0x0A..0x0C].copy_from_slice(&0x40u16.to_le_bytes());

		// SMAP: 2 reserved bytes, then the strip table (offsets relative
		// to 0x40), then two strips of two bytes each
		blob[0x42..0x44].copy_from_slice(&6u16.to_le_bytes());
		blob[0x44..0x46].copy_from_slice(&8u16.to_le_bytes());
		blob[0x46] = 0x05;
		blob[0x47] = 0x08;
		blob[0x48] = 0x07;
		blob[0x49] = 0x08;
		// Cap the last strip at two bytes
		let blob_len = 0x4A;
		let blob = blob[..blob_len].to_vec();

		let header = RoomHeader::from_bytes(&blob).unwrap();
		(blob, header)
	}

	#[test]
	fn test_extract_normalizes_strips() {
		let (blob, header) = room_with_smap();
		let image = RoomImage::extract(&blob, &header).unwrap();
		assert_eq!(image.width(), 16);
		assert_eq!(image.height(), 4);
		assert_eq!(image.strip_count(), 2);
		assert_eq!(image.strips()[0], vec![0x05, 0x08]);
		assert_eq!(image.strips()[1], vec![0x07, 0x08]);
	}

	#[test]
	fn test_to_bytes_layout() {
		let (blob, header) = room_with_smap();
		let image = RoomImage::extract(&blob, &header).unwrap();
		let bytes = image.to_bytes();
		// width, height, two offsets, then the strip data
		assert_eq!(&bytes[0..2], &16u16.to_le_bytes());
		assert_eq!(&bytes[2..4], &4u16.to_le_bytes());
		assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 8);
		assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 10);
		assert_eq!(&bytes[8..], &[0x05, 0x08, 0x07, 0x08]);
	}

	#[test]
	fn test_offsets_are_contiguous() {
		let (blob, header) = room_with_smap();
		let image = RoomImage::extract(&blob, &header).unwrap();
		let bytes = image.to_bytes();
		let n = image.strip_count();
		let mut offsets = Vec::new();
		for i in 0..n {
			offsets.push(u16::from_le_bytes([bytes[4 + i * 2], bytes[5 + i * 2]]) as usize);
		}
		for i in 0..n - 1 {
			assert_eq!(offsets[i + 1] - offsets[i], image.strips()[i].len());
		}
	}

	#[test]
	fn test_round_trip() {
		let (blob, header) = room_with_smap();
		let image = RoomImage::extract(&blob, &header).unwrap();
		let reparsed = RoomImage::from_bytes(&image.to_bytes()).unwrap();
		assert_eq!(reparsed, image);
	}

	#[test]
	fn test_decode_matches_strip_contents() {
		let (blob, header) = room_with_smap();
		let image = RoomImage::extract(&blob, &header).unwrap();
		let bitmap = image.decode().unwrap();
		assert_eq!(bitmap.width(), 16);
		// Strip 0 paints color 5 from its top-left, strip 1 color 7
		assert_eq!(bitmap.get(0, 0), 5);
		assert_eq!(bitmap.get(8, 3), 7);
	}

	#[test]
	fn test_missing_smap_is_none() {
		let mut blob = vec![0u8; 0x20];
		blob[4..6].copy_from_slice(&16u16.to_le_bytes());
		blob[6..8].copy_from_slice(&4u16.to_le_bytes());
		// Slot 0 points at the very end of the blob
		blob[0x0A..0x0C].copy_from_slice(&0x1Fu16.to_le_bytes());
		let header = RoomHeader::from_bytes(&blob).unwrap();
		assert!(RoomImage::extract(&blob, &header).is_none());
	}
}
