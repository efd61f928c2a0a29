//! File type support for the `loom-rs` project.

mod error;

pub mod crypt;
pub mod ega;
pub mod index;
pub mod room;

/// Offset of the resource directory inside a room blob (0x0A)
pub const RESOURCE_DIRECTORY_OFFSET: usize = 0x0A;

/// Offset of the object table inside a room blob
pub const OBJECT_TABLE_OFFSET: usize = 29;

// Re-export unified error type
pub use error::LflError;

// Re-export main file types
pub use ega::{
	Color, EGA_PALETTE, Image, OffsetBase, StripOffsetTable, palette::palette_color,
	strip::decode_strip,
};
pub use index::{File as MasterIndex, IndexEntry, ResourceSection};
pub use room::{
	File as RoomFile, RoomHeader, RoomImage,
	object_image::{DecodedObject, HeightPolicy, ObjectImageLayout},
	objects::{ObjectEntry, ObjectPayload, ObjectTable},
};
