//! Room container (`NN.LFL`) support for the `loom-rs` project.
//!
//! A room file is an XOR-obfuscated blob holding, in order: a fixed header,
//! a resource directory of absolute 16-bit offsets, the object table, and
//! the payloads everything points at. This module owns the cleartext blob
//! and hands out parsed views of it.
//!
//! # File Structure
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00   | 4    | Reserved prefix (uninterpreted) |
//! | 0x04   | 2    | Width in pixels (LE) |
//! | 0x06   | 2    | Height in pixels (LE) |
//! | 0x08   | 1    | Object count |
//! | 0x09   | 1    | Reserved |
//! | 0x0A   | ..   | Resource directory, LE u16 absolute offsets, zero-terminated |
//! | 29     | ..   | Object table: N OBIM offsets then N OBCD offsets |

pub mod background;
pub mod header;
pub mod object_image;
pub mod objects;

pub use background::RoomImage;
pub use header::{DirectoryEntry, RoomHeader};

use std::io::Read;
use std::ops::Range;
use std::path::Path;

use crate::file::{LflError, crypt, room::objects::ObjectTable};

/// A decrypted room container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	/// Cleartext bytes of the whole container
	data: Vec<u8>,

	/// Parsed fixed header and resource directory
	header: RoomHeader,
}

impl File {
	/// Opens and decrypts an `NN.LFL` file from the given path.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, LflError> {
		let encrypted = std::fs::read(path)?;
		Self::from_encrypted_bytes(&encrypted)
	}

	/// Decrypts and parses a raw on-disk byte stream.
	pub fn from_encrypted_bytes(encrypted: &[u8]) -> Result<Self, LflError> {
		Self::from_cleartext(crypt::decrypt(encrypted))
	}

	/// Parses an already-decrypted blob.
	pub fn from_cleartext(data: Vec<u8>) -> Result<Self, LflError> {
		let header = RoomHeader::from_bytes(&data)?;
		Ok(Self {
			data,
			header,
		})
	}

	/// Decrypts and parses a room from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, LflError> {
		let mut encrypted = Vec::new();
		reader.read_to_end(&mut encrypted)?;
		Self::from_encrypted_bytes(&encrypted)
	}

	/// Cleartext container bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Parsed room header.
	pub fn header(&self) -> &RoomHeader {
		&self.header
	}

	/// Parses the OBIM/OBCD object table.
	pub fn objects(&self) -> Result<ObjectTable, LflError> {
		ObjectTable::parse(&self.data)
	}

	/// Reconstructs the background image, when slot 0 holds a usable SMAP.
	pub fn background(&self) -> Option<RoomImage> {
		RoomImage::extract(&self.data, &self.header)
	}

	/// Byte range of each deduplicated directory resource.
	///
	/// A resource runs from its offset to the next resource's offset, the
	/// last one to the end of the blob, mirroring how the engine sliced
	/// them.
	pub fn resource_ranges(&self) -> Vec<(&DirectoryEntry, Range<usize>)> {
		let entries = self.header.directory();
		let mut ranges = Vec::with_capacity(entries.len());
		for (i, entry) in entries.iter().enumerate() {
			let end = match entries.get(i + 1) {
				Some(next) => next.offset(),
				None => self.data.len(),
			};
			ranges.push((entry, entry.offset()..end.max(entry.offset())));
		}
		ranges
	}
}
