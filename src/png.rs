//! PNG emission for decoded indexed-color bitmaps.

use std::path::Path;

use image::{Rgb, RgbImage};
use loom_types::file::ega::palette_color;
use loom_types::file::{Image, RoomImage};

/// Expands an indexed bitmap through the fixed palette into an RGB image.
pub fn to_rgb(bitmap: &Image) -> RgbImage {
	RgbImage::from_fn(bitmap.width() as u32, bitmap.height() as u32, |x, y| {
		let color = palette_color(bitmap.get(x as usize, y as usize));
		Rgb([color.r, color.g, color.b])
	})
}

/// Writes a decoded bitmap as a PNG file.
pub fn write_png(bitmap: &Image, path: &Path) -> image::ImageResult<()> {
	to_rgb(bitmap).save(path)
}

/// Decodes and writes a reconstructed background, when it decodes at all.
pub fn write_background_png(background: &RoomImage, path: &Path) -> image::ImageResult<bool> {
	match background.decode() {
		Some(bitmap) => {
			write_png(&bitmap, path)?;
			Ok(true)
		}
		None => Ok(false),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use loom_types::file::ega::{OffsetBase, StripOffsetTable};

	#[test]
	fn test_rgb_expansion_uses_palette() {
		// Single strip of color 9 (light blue), height 2
		let region = [0x02, 0x00, 0x09, 0x10];
		let table = StripOffsetTable::parse(&region, 0, OffsetBase::RegionStart, 2, 80);
		let bitmap = Image::decode(&region, &table, 2).unwrap();
		let rgb = to_rgb(&bitmap);
		assert_eq!(rgb.dimensions(), (8, 2));
		assert_eq!(rgb.get_pixel(0, 0).0, [0x55, 0x55, 0xFF]);
	}
}
