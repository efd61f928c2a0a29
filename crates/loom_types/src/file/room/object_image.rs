//! Object image layout detection and decoding.
//!
//! Object image payloads come in two layouts and nothing in the data says
//! which. Detection is by trial: parse a strip offset table under each
//! layout's rules and accept the first that yields at least one strip with
//! strictly increasing, in-range offsets.
//!
//! | Layout | Table start | Minimum strip offset |
//! |--------|-------------|----------------------|
//! | With 8-byte header | byte 8 | 10 |
//! | Bare bundle        | byte 0 | 2  |
//! | Fallback (2/4/6)   | header size | header size + 2 |
//!
//! Payload height is not stored either; it is chosen by a size tier that
//! callers can override through [`HeightPolicy`].

use crate::file::LflError;
use crate::file::ega::{Image, OffsetBase, StripOffsetTable};

/// Upper bound on strips in a single object image
pub const OBJECT_STRIP_CAP: usize = 80;

/// Smallest payload worth attempting layout detection on
const MIN_IMAGE_PAYLOAD: usize = 16;

/// The strip-table layout a payload was decoded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectImageLayout {
	/// Strip table at byte 8, after a fixed header
	Headered,
	/// Strip table at byte 0, no header
	Bare,
	/// Fallback layout with an unusual header size (2, 4 or 6)
	Custom(usize),
}

impl ObjectImageLayout {
	/// Detection priority order.
	pub const PRIORITY: [ObjectImageLayout; 5] = [
		ObjectImageLayout::Headered,
		ObjectImageLayout::Bare,
		ObjectImageLayout::Custom(2),
		ObjectImageLayout::Custom(4),
		ObjectImageLayout::Custom(6),
	];

	/// Bytes preceding the strip offset table.
	pub fn header_size(self) -> usize {
		match self {
			ObjectImageLayout::Headered => 8,
			ObjectImageLayout::Bare => 0,
			ObjectImageLayout::Custom(size) => size,
		}
	}

	/// Lowest strip offset the layout accepts; anything below it is still
	/// header or table territory.
	fn min_strip_offset(self) -> usize {
		self.header_size() + 2
	}
}

impl std::fmt::Display for ObjectImageLayout {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ObjectImageLayout::Headered => write!(f, "headered"),
			ObjectImageLayout::Bare => write!(f, "bare"),
			ObjectImageLayout::Custom(size) => write!(f, "custom-{size}"),
		}
	}
}

/// Height selection for object images.
///
/// The container stores no height for object payloads; the decoder picks
/// one from the payload size. The tier bounds live here rather than in the
/// decoder so a caller that learns an object's real height from elsewhere
/// can supply it through [`HeightPolicy::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightPolicy {
	/// Payloads larger than this decode at `large_height`
	pub large_threshold: usize,
	/// Height for the largest tier
	pub large_height: usize,
	/// Payloads larger than this (but not large) decode at `medium_height`
	pub medium_threshold: usize,
	/// Height for the middle tier
	pub medium_height: usize,
	/// Height for everything smaller
	pub default_height: usize,
}

impl Default for HeightPolicy {
	fn default() -> Self {
		Self {
			large_threshold: 2000,
			large_height: 64,
			medium_threshold: 500,
			medium_height: 48,
			default_height: 32,
		}
	}
}

impl HeightPolicy {
	/// Tiered height for a payload of the given size.
	pub fn height_for(&self, payload_len: usize) -> usize {
		if payload_len > self.large_threshold {
			self.large_height
		} else if payload_len > self.medium_threshold {
			self.medium_height
		} else {
			self.default_height
		}
	}

	/// Resolves the decode height, preferring an explicit per-object value.
	pub fn resolve(&self, payload_len: usize, explicit: Option<usize>) -> usize {
		explicit.unwrap_or_else(|| self.height_for(payload_len))
	}
}

/// A decoded object image together with the layout that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedObject {
	/// Which strip-table layout the detector accepted
	pub layout: ObjectImageLayout,
	/// The decoded bitmap
	pub image: Image,
}

/// Outcome of examining one object image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectImage {
	/// Empty or all-zero payload; the object has no image
	Absent,
	/// Plain-text run; object metadata rather than pixels
	Metadata,
	/// A bitmap decoded under the tagged layout
	Decoded(DecodedObject),
}

/// True when the head of the payload reads as plain text.
///
/// At least 75% printable bytes over the first 32 bytes classes the payload
/// as metadata, not an image.
pub fn looks_like_text(payload: &[u8]) -> bool {
	let head = &payload[..payload.len().min(32)];
	if head.is_empty() {
		return false;
	}
	let printable =
		head.iter().filter(|&&b| (0x20..0x7F).contains(&b) || b == b'\t' || b == b'\n').count();
	printable * 4 >= head.len() * 3
}

/// Parses a strip offset table under one layout's rules.
fn try_layout(payload: &[u8], layout: ObjectImageLayout) -> Option<StripOffsetTable> {
	let header_size = layout.header_size();
	if payload.len() < header_size + 4 {
		return None;
	}

	let table = StripOffsetTable::parse(
		payload,
		header_size,
		OffsetBase::RegionStart,
		layout.min_strip_offset(),
		OBJECT_STRIP_CAP,
	);
	if table.is_empty() { None } else { Some(table) }
}

/// Runs the layout priority list and returns the first match.
pub fn detect_layout(payload: &[u8]) -> Option<(ObjectImageLayout, StripOffsetTable)> {
	ObjectImageLayout::PRIORITY
		.into_iter()
		.find_map(|layout| try_layout(payload, layout).map(|table| (layout, table)))
}

/// Decodes one object image payload.
///
/// Payloads that are empty, all zero, or mostly printable text never reach
/// layout detection. Both layouts failing is an [`LflError::UndecodableImage`].
pub fn decode_object_image(
	payload: &[u8],
	policy: &HeightPolicy,
	explicit_height: Option<usize>,
) -> Result<ObjectImage, LflError> {
	if payload.len() < MIN_IMAGE_PAYLOAD {
		return Ok(ObjectImage::Absent);
	}
	if payload.len() <= 20 && payload[..16].iter().all(|&b| b == 0) {
		return Ok(ObjectImage::Absent);
	}
	if looks_like_text(payload) {
		return Ok(ObjectImage::Metadata);
	}

	let Some((layout, table)) = detect_layout(payload) else {
		return Err(LflError::UndecodableImage {
			size: payload.len(),
		});
	};

	let height = policy.resolve(payload.len(), explicit_height);
	let image = Image::decode(payload, &table, height).ok_or(LflError::UndecodableImage {
		size: payload.len(),
	})?;

	Ok(ObjectImage::Decoded(DecodedObject {
		layout,
		image,
	}))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_headered_layout_detected() {
		// Zero header, table at byte 8 pointing at byte 10, single-color strip
		let mut payload = vec![0u8; 40];
		payload[8..10].copy_from_slice(&10u16.to_le_bytes());
		payload[10] = 0x05;
		payload[11] = 0xFF;
		let result = decode_object_image(&payload, &HeightPolicy::default(), None).unwrap();
		let ObjectImage::Decoded(decoded) = result else {
			panic!("expected a decoded image");
		};
		assert_eq!(decoded.layout, ObjectImageLayout::Headered);
		assert_eq!(decoded.image.width(), 8);
	}

	#[test]
	fn test_bare_layout_detected() {
		// Table at byte 0: one strip at byte 2
		let mut payload = vec![0u8; 24];
		payload[0..2].copy_from_slice(&2u16.to_le_bytes());
		payload[2] = 0x05;
		payload[3] = 0xFF;
		payload[20] = 1;
		let result = decode_object_image(&payload, &HeightPolicy::default(), None).unwrap();
		let ObjectImage::Decoded(decoded) = result else {
			panic!("expected a decoded image");
		};
		assert_eq!(decoded.layout, ObjectImageLayout::Bare);
	}

	#[test]
	fn test_text_payload_is_metadata() {
		let payload = b"a perfectly ordinary object name".to_vec();
		let result = decode_object_image(&payload, &HeightPolicy::default(), None).unwrap();
		assert_eq!(result, ObjectImage::Metadata);
	}

	#[test]
	fn test_all_zero_payload_is_absent() {
		let payload = vec![0u8; 20];
		let result = decode_object_image(&payload, &HeightPolicy::default(), None).unwrap();
		assert_eq!(result, ObjectImage::Absent);
	}

	#[test]
	fn test_garbage_payload_is_undecodable() {
		// High bytes everywhere: every candidate table entry lands out of range
		let payload = vec![0xEEu8; 64];
		assert!(matches!(
			decode_object_image(&payload, &HeightPolicy::default(), None),
			Err(LflError::UndecodableImage {
				..
			})
		));
	}

	#[test]
	fn test_height_tiers() {
		let policy = HeightPolicy::default();
		assert_eq!(policy.height_for(2500), 64);
		assert_eq!(policy.height_for(800), 48);
		assert_eq!(policy.height_for(100), 32);
	}

	#[test]
	fn test_explicit_height_overrides_tier() {
		let policy = HeightPolicy::default();
		assert_eq!(policy.resolve(2500, Some(17)), 17);
		assert_eq!(policy.resolve(2500, None), 64);
	}

	#[test]
	fn test_looks_like_text_threshold() {
		assert!(looks_like_text(b"OBJECT: anvil, heavy, gray iron."));
		assert!(!looks_like_text(&[0x80u8; 32]));
	}
}
