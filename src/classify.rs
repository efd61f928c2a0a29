//! Heuristic resource typing.
//!
//! Directory resources carry no type tag, so extraction guesses from size
//! and byte entropy. The guess is advisory: slot 0 is always the background
//! regardless of what the heuristic says, and consumers may override the
//! rest.

use std::fmt;

/// Advisory resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
	/// Slot-0 background image
	Background,
	/// Strip-encoded graphic data
	Graphic,
	/// Script bytecode
	Script,
	/// MIDI stream data
	Sound,
	/// Small lookup table
	Palette,
	/// Nothing matched
	Unknown,
}

impl ResourceType {
	/// Type string used in the manifest.
	pub fn as_str(self) -> &'static str {
		match self {
			ResourceType::Background => "background",
			ResourceType::Graphic => "graphic",
			ResourceType::Script => "script",
			ResourceType::Sound => "sound",
			ResourceType::Palette => "palette",
			ResourceType::Unknown => "unknown",
		}
	}

	/// Output directory the type's payloads land in.
	pub fn dir_name(self) -> &'static str {
		match self {
			ResourceType::Background => "background",
			ResourceType::Graphic => "graphics",
			ResourceType::Script => "scripts",
			ResourceType::Sound => "sounds",
			ResourceType::Palette => "palettes",
			ResourceType::Unknown => "unknown",
		}
	}
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Shannon entropy over byte frequencies, normalized to `0.0..=1.0`.
pub fn shannon_entropy(data: &[u8]) -> f64 {
	if data.is_empty() {
		return 0.0;
	}

	let mut counts = [0usize; 256];
	for &b in data {
		counts[b as usize] += 1;
	}

	let len = data.len() as f64;
	let mut entropy = 0.0;
	for &count in &counts {
		if count > 0 {
			let p = count as f64 / len;
			entropy -= p * p.log2();
		}
	}

	// A byte carries at most 8 bits
	(entropy / 8.0).min(1.0)
}

/// Guesses the type of a non-background directory resource.
pub fn classify(data: &[u8]) -> ResourceType {
	let size = data.len();
	if size < 100 {
		return ResourceType::Palette;
	}

	let entropy = shannon_entropy(data);
	if entropy < 0.3 {
		ResourceType::Script
	} else if size > 1000 && entropy > 0.7 {
		ResourceType::Graphic
	} else if size < 2000 && entropy > 0.6 {
		ResourceType::Sound
	} else {
		ResourceType::Unknown
	}
}
