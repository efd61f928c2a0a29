//! The per-room extraction pipeline.
//!
//! Each room moves through a linear set of stages:
//!
//! ```text
//! Decrypted -> HeaderParsed -> BackgroundEmitted? -> ObjectsParsed
//!           -> ResourcesClassified -> ManifestAppended
//! ```
//!
//! Any stage may fail the room, which records the reason and moves on to
//! the next room without touching the others. Only infrastructure failures
//! (I/O, manifest serialization) abort the whole run.
//!
//! Resources are always written before the manifest entry that references
//! them, and the manifest itself is replaced atomically at the very end.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use loom_types::file::room::objects::ObjectPayload;
use loom_types::file::{
	HeightPolicy, LflError, MasterIndex, ResourceSection, RoomFile,
	room::object_image::{self, ObjectImage},
};
use thiserror::Error;

use crate::classify::{self, ResourceType};
use crate::manifest::{Manifest, ResourceEntry, RoomEntry};
use crate::{midi, png};

/// Errors that end a room or, for the infrastructure kinds, the run.
#[derive(Debug, Error)]
pub enum ExtractError {
	/// Two resources resolved to the same output path
	#[error("path collision: {}", path.display())]
	PathCollision {
		/// The path both resources wanted
		path: PathBuf,
	},

	/// Container parsing failed
	#[error(transparent)]
	Lfl(#[from] LflError),

	/// Underlying read or write failed
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// Manifest serialization failed
	#[error("manifest: {0}")]
	Manifest(#[from] serde_json::Error),
}

impl ExtractError {
	/// Infrastructure errors abort the run; everything else fails one room.
	pub fn is_fatal(&self) -> bool {
		matches!(self, ExtractError::Io(_) | ExtractError::Manifest(_))
	}
}

/// Stages of the per-room pipeline, used for failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStage {
	/// Blob decrypted into memory
	Decrypted,
	/// Header and resource directory parsed
	HeaderParsed,
	/// Background reconstructed and written
	BackgroundEmitted,
	/// Object table walked and object images decoded
	ObjectsParsed,
	/// Remaining directory resources typed and written
	ResourcesClassified,
	/// Room entry handed to the manifest
	ManifestAppended,
}

impl fmt::Display for RoomStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			RoomStage::Decrypted => "decrypted",
			RoomStage::HeaderParsed => "header-parsed",
			RoomStage::BackgroundEmitted => "background-emitted",
			RoomStage::ObjectsParsed => "objects-parsed",
			RoomStage::ResourcesClassified => "resources-classified",
			RoomStage::ManifestAppended => "manifest-appended",
		};
		write!(f, "{name}")
	}
}

/// A room that fell out of the pipeline.
#[derive(Debug)]
pub struct RoomFailure {
	/// Two-digit room number
	pub room: String,
	/// Stage the room reached before failing
	pub stage: RoomStage,
	/// What went wrong
	pub reason: String,
}

/// Options controlling a full extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
	/// Directory holding the `NN.LFL` inputs
	pub input_dir: PathBuf,
	/// Output root; created on demand
	pub output_dir: PathBuf,
	/// Game identity recorded in the manifest
	pub game: String,
	/// Game version recorded in the manifest
	pub version: String,
	/// Height selection for object images
	pub height_policy: HeightPolicy,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct ExtractSummary {
	/// Rooms that produced a manifest entry
	pub rooms_extracted: usize,
	/// Rooms that failed, with stage and reason
	pub failures: Vec<RoomFailure>,
	/// Total resource entries written
	pub resources_written: usize,
}

/// Runs the full extraction over every `NN.LFL` in the input directory.
pub fn run(opts: &ExtractOptions) -> Result<ExtractSummary, ExtractError> {
	let inputs = find_containers(&opts.input_dir)?;
	if inputs.is_empty() {
		warn!("no .LFL containers under {}", opts.input_dir.display());
	}

	if let Some(index_path) = inputs.iter().find(|(n, _)| *n == 0).map(|(_, p)| p) {
		match MasterIndex::open(index_path) {
			Ok(index) => log_index_summary(&index),
			Err(e) => warn!("master index unreadable: {e}"),
		}
	}

	fs::create_dir_all(&opts.output_dir)?;

	let mut rooms = Vec::new();
	let mut failures = Vec::new();
	for (number, path) in inputs.iter().filter(|(n, _)| *n != 0) {
		let label = format!("{number:02}");
		info!("room {label}: extracting {}", path.display());

		let mut stage = RoomStage::Decrypted;
		match extract_room(opts, &label, path, &mut stage) {
			Ok(entry) => rooms.push(entry),
			Err(e) if e.is_fatal() => return Err(e),
			Err(e) => {
				warn!("room {label}: failed after {stage}: {e}");
				// A failed room is omitted entirely, never half emitted
				let room_dir = opts.output_dir.join(format!("room_{label}"));
				if room_dir.exists() {
					fs::remove_dir_all(&room_dir)?;
				}
				failures.push(RoomFailure {
					room: label,
					stage,
					reason: e.to_string(),
				});
			}
		}
	}

	let resources_written = rooms.iter().map(|r| r.resources.len()).sum();
	let manifest = Manifest::build(&opts.game, &opts.version, rooms);
	manifest.write(&opts.output_dir.join("resources.json"))?;
	info!(
		"extracted {} rooms, {} resources, {} failures",
		manifest.total_rooms,
		manifest.total_resources,
		failures.len()
	);

	Ok(ExtractSummary {
		rooms_extracted: manifest.total_rooms as usize,
		failures,
		resources_written,
	})
}

/// Finds `NN.LFL` files and returns them sorted by room number.
fn find_containers(dir: &Path) -> Result<Vec<(u8, PathBuf)>, ExtractError> {
	let mut found = Vec::new();
	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();
		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		if let Some(number) = parse_container_name(name) {
			found.push((number, path));
		}
	}
	found.sort_by_key(|(number, _)| *number);
	Ok(found)
}

/// Accepts `NN.LFL` (case-insensitive extension), returning the room number.
fn parse_container_name(name: &str) -> Option<u8> {
	let (stem, ext) = name.split_at_checked(2)?;
	if !ext.eq_ignore_ascii_case(".lfl") {
		return None;
	}
	stem.parse::<u8>().ok()
}

fn log_index_summary(index: &MasterIndex) {
	info!(
		"master index: version {:#06X}, {} global objects",
		index.version(),
		index.object_flags().len()
	);
	for section in ResourceSection::ORDER {
		let entries = index.section(section);
		let present = entries.iter().filter(|e| e.is_present()).count();
		debug!("master index: {section}: {present}/{} present", entries.len());
	}
}

/// Tracks written paths so two resources can never share one.
struct RoomWriter {
	output_root: PathBuf,
	room_dir: String,
	written: HashSet<PathBuf>,
}

impl RoomWriter {
	fn new(output_root: &Path, room_label: &str) -> Self {
		Self {
			output_root: output_root.to_path_buf(),
			room_dir: format!("room_{room_label}"),
			written: HashSet::new(),
		}
	}

	/// Writes one resource file, creating parents, and returns the
	/// manifest-relative path.
	fn write(&mut self, subdir: &str, filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
		let relative = format!("{}/{subdir}/{filename}", self.room_dir);
		let absolute = self.output_root.join(&self.room_dir).join(subdir).join(filename);

		if !self.written.insert(absolute.clone()) {
			return Err(ExtractError::PathCollision {
				path: absolute,
			});
		}

		if let Some(parent) = absolute.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(&absolute, bytes)?;
		Ok(relative)
	}

	/// Absolute path for a supplementary file (PNG/MIDI next to a `.bin`).
	fn sibling(&mut self, subdir: &str, filename: &str) -> Result<PathBuf, ExtractError> {
		let absolute = self.output_root.join(&self.room_dir).join(subdir).join(filename);
		if !self.written.insert(absolute.clone()) {
			return Err(ExtractError::PathCollision {
				path: absolute,
			});
		}
		Ok(absolute)
	}
}

/// Extracts one room into the output tree and returns its manifest entry.
///
/// `stage` always holds the last stage the room completed, for failure
/// reporting.
fn extract_room(
	opts: &ExtractOptions,
	label: &str,
	path: &Path,
	stage: &mut RoomStage,
) -> Result<RoomEntry, ExtractError> {
	let room = RoomFile::open(path)?;
	*stage = RoomStage::HeaderParsed;
	let header = room.header();
	debug!(
		"room {label}: {}x{}, {} directory entries, {} declared objects",
		header.width(),
		header.height(),
		header.directory().len(),
		header.object_count()
	);

	let mut writer = RoomWriter::new(&opts.output_dir, label);
	let mut entry = RoomEntry {
		room: label.to_string(),
		width: header.width(),
		height: header.height(),
		background: None,
		resources: Vec::new(),
	};

	emit_background(&room, label, &mut writer, &mut entry)?;
	*stage = RoomStage::BackgroundEmitted;

	emit_objects(&room, label, opts, &mut writer, &mut entry)?;
	*stage = RoomStage::ObjectsParsed;

	emit_directory_resources(&room, label, &mut writer, &mut entry)?;
	*stage = RoomStage::ResourcesClassified;

	debug!("room {label}: {} resources emitted", entry.resources.len());
	Ok(entry)
}

/// BackgroundEmitted stage: normalize the SMAP and write it out.
///
/// A room without a usable background is still extracted; the manifest
/// records the background as missing.
fn emit_background(
	room: &RoomFile,
	label: &str,
	writer: &mut RoomWriter,
	entry: &mut RoomEntry,
) -> Result<(), ExtractError> {
	let Some(background) = room.background() else {
		warn!("room {label}: no usable background in slot 0");
		entry.background = Some("missing".to_string());
		return Ok(());
	};

	let blob = background.to_bytes();
	let path = writer.write("background", "background.bin", &blob)?;

	let mut resource = ResourceEntry::new(
		0,
		ResourceType::Background.as_str(),
		"background.bin".to_string(),
		path,
		blob.len() as u32,
	);
	resource.width = Some(background.width());
	resource.height = Some(background.height());
	resource.strips = Some(background.strip_count() as u16);
	entry.resources.push(resource);

	let png_path = writer.sibling("background", "background.png")?;
	match png::write_background_png(&background, &png_path) {
		Ok(true) => debug!("room {label}: background decoded to PNG"),
		Ok(false) => warn!("room {label}: background strips did not decode"),
		Err(e) => warn!("room {label}: background PNG failed: {e}"),
	}

	Ok(())
}

/// ObjectsParsed stage: slice the object table, decode each image payload.
fn emit_objects(
	room: &RoomFile,
	label: &str,
	opts: &ExtractOptions,
	writer: &mut RoomWriter,
	entry: &mut RoomEntry,
) -> Result<(), ExtractError> {
	let table = room.objects()?;
	debug!("room {label}: object table holds {} entries", table.len());

	for object in &table {
		let payload = match object.payload(room.data()) {
			ObjectPayload::Absent => continue,
			ObjectPayload::Metadata(_) => {
				debug!("room {label}: object {} is metadata only", object.index());
				continue;
			}
			ObjectPayload::Image(payload) => payload,
		};

		let id = object.index() as u16;
		let filename = format!("object_{id:03}.bin");

		match object_image::decode_object_image(payload, &opts.height_policy, None) {
			Ok(ObjectImage::Decoded(decoded)) => {
				let path = writer.write(ResourceType::Graphic.dir_name(), &filename, payload)?;
				let mut resource = ResourceEntry::new(
					id,
					ResourceType::Graphic.as_str(),
					filename.clone(),
					path,
					payload.len() as u32,
				);
				resource.width = Some(decoded.image.width() as u16);
				resource.height = Some(decoded.image.height() as u16);
				resource.layout = Some(decoded.layout.to_string());
				entry.resources.push(resource);

				let png_name = format!("object_{id:03}.png");
				let png_path = writer.sibling(ResourceType::Graphic.dir_name(), &png_name)?;
				if let Err(e) = png::write_png(&decoded.image, &png_path) {
					warn!("room {label}: object {id} PNG failed: {e}");
				}
			}
			Ok(ObjectImage::Absent | ObjectImage::Metadata) => {
				debug!("room {label}: object {id} carries no image");
			}
			Err(LflError::UndecodableImage {
				size,
			}) => {
				// Keep the bytes around even when no layout matched
				let path = writer.write(ResourceType::Unknown.dir_name(), &filename, payload)?;
				entry.resources.push(ResourceEntry::new(
					id,
					ResourceType::Unknown.as_str(),
					filename,
					path,
					size as u32,
				));
			}
			Err(e) => return Err(e.into()),
		}
	}

	Ok(())
}

/// ResourcesClassified stage: type and write the non-background directory
/// resources.
fn emit_directory_resources(
	room: &RoomFile,
	label: &str,
	writer: &mut RoomWriter,
	entry: &mut RoomEntry,
) -> Result<(), ExtractError> {
	for (dir_entry, range) in room.resource_ranges() {
		if dir_entry.is_background() {
			continue;
		}

		let data = &room.data()[range];
		let id = u16::from(dir_entry.primary_id());
		let kind = classify::classify(data);
		debug!("room {label}: resource {id} classified {kind} ({} bytes)", data.len());

		let filename = match kind {
			ResourceType::Script | ResourceType::Sound => format!("{label}_{id}.bin"),
			_ => format!("res_{id:03}.bin"),
		};
		let path = writer.write(kind.dir_name(), &filename, data)?;

		let mut resource =
			ResourceEntry::new(id, kind.as_str(), filename.clone(), path, data.len() as u32);
		if dir_entry.aliases().len() > 1 {
			resource.aliases = Some(dir_entry.aliases().to_vec());
		}
		entry.resources.push(resource);

		if kind == ResourceType::Sound {
			let midi_name = format!("{label}_{id}.mid");
			let midi_path = writer.sibling(kind.dir_name(), &midi_name)?;
			fs::write(&midi_path, midi::wrap_sound(data))?;
		}
	}

	Ok(())
}
