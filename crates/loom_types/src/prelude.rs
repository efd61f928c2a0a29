//! Prelude module for `loom_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use loom_types::prelude::*;
//!
//! let cleartext = crypt::decrypt(&[0x00, 0xFF]);
//! let policy = HeightPolicy::default();
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Palette types
	Color,
	DecodedObject,
	EGA_PALETTE,

	// Object image types
	HeightPolicy,
	// Image types
	Image,
	IndexEntry,

	// Error type
	LflError,
	// Master index types
	MasterIndex,
	ObjectEntry,
	ObjectImageLayout,

	// Room types
	ObjectTable,
	OffsetBase,
	RoomFile,
	RoomHeader,
	RoomImage,
	StripOffsetTable,
};

#[doc(inline)]
pub use crate::file::crypt;

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
