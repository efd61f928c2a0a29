//! Catalog manifest assembly and atomic emission.
//!
//! The manifest is the machine-readable record tying every emitted file
//! back to its source room and resource id. Ordering is stable: rooms
//! ascend by number, resources within a room ascend by primary id, and the
//! top-level keys are serialized in sorted order so repeated runs diff
//! cleanly.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

/// One emitted artifact.
///
/// `path` is relative to the output root and always names a file that was
/// written before this entry was appended.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceEntry {
	/// Primary resource id within the room
	pub id: u16,
	/// Advisory type string
	#[serde(rename = "type")]
	pub kind: String,
	/// Emitted file name
	pub filename: String,
	/// Output-root-relative path of the emitted file
	pub path: String,
	/// Size of the emitted file in bytes
	pub size: u32,
	/// Directory slots sharing this resource, when aliased
	#[serde(skip_serializing_if = "Option::is_none")]
	pub aliases: Option<Vec<u8>>,
	/// Decoded width, for image resources
	#[serde(skip_serializing_if = "Option::is_none")]
	pub width: Option<u16>,
	/// Decoded height, for image resources
	#[serde(skip_serializing_if = "Option::is_none")]
	pub height: Option<u16>,
	/// Strip count, for reconstructed backgrounds
	#[serde(skip_serializing_if = "Option::is_none")]
	pub strips: Option<u16>,
	/// Strip-table layout an object image decoded under
	#[serde(skip_serializing_if = "Option::is_none")]
	pub layout: Option<String>,
}

impl ResourceEntry {
	/// Minimal entry; callers fill the optional fields as they learn them.
	pub fn new(id: u16, kind: &str, filename: String, path: String, size: u32) -> Self {
		Self {
			id,
			kind: kind.to_string(),
			filename,
			path,
			size,
			aliases: None,
			width: None,
			height: None,
			strips: None,
			layout: None,
		}
	}
}

/// One room's worth of manifest entries.
#[derive(Debug, Clone, Serialize)]
pub struct RoomEntry {
	/// Two-digit room number
	pub room: String,
	/// Room width in pixels
	pub width: u16,
	/// Room height in pixels
	pub height: u16,
	/// Set when slot 0 held no usable background
	#[serde(skip_serializing_if = "Option::is_none")]
	pub background: Option<String>,
	/// Emitted resources, ascending by primary id
	pub resources: Vec<ResourceEntry>,
}

/// The complete catalog record.
///
/// Field order is the serialization order; keep it alphabetical so the
/// top-level JSON keys come out sorted.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
	/// Game identity string
	pub game: String,
	/// Per-room entries, ascending by room number
	pub rooms: Vec<RoomEntry>,
	/// Total resource entries across all rooms
	pub total_resources: u32,
	/// Number of rooms that produced an entry
	pub total_rooms: u32,
	/// Game version string
	pub version: String,
}

impl Manifest {
	/// Assembles the final record with stable ordering.
	pub fn build(game: &str, version: &str, mut rooms: Vec<RoomEntry>) -> Self {
		rooms.sort_by(|a, b| a.room.cmp(&b.room));
		for room in &mut rooms {
			room.resources.sort_by_key(|r| r.id);
		}
		let total_resources = rooms.iter().map(|r| r.resources.len() as u32).sum();

		Self {
			game: game.to_string(),
			total_rooms: rooms.len() as u32,
			total_resources,
			version: version.to_string(),
			rooms,
		}
	}

	/// Serializes to pretty JSON (2-space indent, trailing newline).
	pub fn to_json(&self) -> serde_json::Result<String> {
		let mut json = serde_json::to_string_pretty(self)?;
		json.push('\n');
		Ok(json)
	}

	/// Atomically replaces `path` with the serialized manifest.
	///
	/// Writes to a sibling temp file first and renames over the target, so
	/// a crash mid-write never leaves a half manifest behind.
	pub fn write(&self, path: &Path) -> io::Result<()> {
		let json = self.to_json().map_err(io::Error::other)?;
		let tmp = path.with_extension("json.tmp");
		fs::write(&tmp, json)?;
		fs::rename(&tmp, path)?;
		Ok(())
	}
}
