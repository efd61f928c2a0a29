//! This crate provides core data types and file format support for the `loom-rs` project.
//!
//! # File Formats
//!
//! - **LFL**: Per-room container files (`NN.LFL`), XOR-obfuscated, holding a room
//!   header, a resource directory, an object table and the payloads they point at
//! - **Master index**: The `00.LFL` file routing global resource ids to rooms
//! - **EGA strips**: 8-pixel-wide run-length-encoded image columns used by both
//!   room backgrounds and object images
//!
//! # Examples
//!
//! ```no_run
//! use loom_types::file::RoomFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let room = RoomFile::open("01.LFL")?;
//! println!("room is {}x{}", room.header().width(), room.header().height());
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use loom_types::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export commonly used file types at crate root for convenience
pub use file::{
	Color, EGA_PALETTE, HeightPolicy, Image, IndexEntry, LflError, MasterIndex, ObjectImageLayout,
	ObjectTable, OffsetBase, RoomFile, RoomHeader, RoomImage,
};
