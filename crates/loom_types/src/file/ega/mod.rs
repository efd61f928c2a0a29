//! EGA strip graphics support for the `loom-rs` project.
//!
//! Room backgrounds and object images share one pixel format: a row of
//! 8-pixel-wide vertical strips, each strip run-length-encoded on its own,
//! addressed through a table of little-endian 16-bit strip offsets. This
//! module provides the fixed 16-color palette, the per-strip decoder and
//! the table-driven image assembler.

pub mod image;
pub mod palette;
pub mod strip;

pub use image::{Image, OffsetBase, StripOffsetTable};
pub use palette::{Color, EGA_PALETTE, palette_color};
pub use strip::{STRIP_WIDTH, decode_strip};
