//! Command-line front end for the LFL asset extractor.
//!
//! # Usage Examples
//!
//! ```bash
//! # Extract every room plus the manifest
//! loom-rs extract game/ -o decoded/
//!
//! # Dump the 00.LFL routing tables
//! loom-rs index game/00.LFL
//!
//! # Inspect one room's header and resource directory
//! loom-rs info game/01.LFL --hex
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::error;
use loom_rs::extract::{self, ExtractOptions};
use loom_types::file::{HeightPolicy, MasterIndex, ResourceSection, RoomFile};

#[derive(Parser)]
#[command(name = "loom-rs")]
#[command(version)]
#[command(about = "LFL container asset extractor", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Extract every room into standard-format artifacts plus a manifest
	Extract {
		/// Directory containing the NN.LFL containers
		#[arg(value_name = "INPUT_DIR")]
		input: PathBuf,

		/// Output directory for the decoded tree
		#[arg(short, long, value_name = "DIR", default_value = "decoded")]
		output: PathBuf,

		/// Game identity recorded in the manifest
		#[arg(long, default_value = "LOOM")]
		game: String,

		/// Game version recorded in the manifest
		#[arg(long, default_value = "SCUMM v3")]
		game_version: String,
	},

	/// Dump the master index routing tables from 00.LFL
	Index {
		/// Path to the master index file
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},

	/// Inspect one room container's header and resource directory
	Info {
		/// Path to an NN.LFL file
		#[arg(value_name = "FILE")]
		file: PathBuf,

		/// Also hex-dump the first bytes of each resource
		#[arg(long)]
		hex: bool,
	},
}

fn main() -> ExitCode {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let result = match cli.command {
		Commands::Extract {
			input,
			output,
			game,
			game_version,
		} => cmd_extract(input, output, game, game_version),
		Commands::Index {
			file,
		} => cmd_index(&file),
		Commands::Info {
			file,
			hex,
		} => cmd_info(&file, hex),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{e:#}");
			ExitCode::FAILURE
		}
	}
}

fn cmd_extract(
	input: PathBuf,
	output: PathBuf,
	game: String,
	game_version: String,
) -> anyhow::Result<()> {
	let opts = ExtractOptions {
		input_dir: input,
		output_dir: output,
		game,
		version: game_version,
		height_policy: HeightPolicy::default(),
	};
	let summary = extract::run(&opts).context("extraction failed")?;

	println!(
		"{} rooms extracted, {} resources written",
		summary.rooms_extracted, summary.resources_written
	);
	for failure in &summary.failures {
		println!("room {} failed after {}: {}", failure.room, failure.stage, failure.reason);
	}
	Ok(())
}

fn cmd_index(file: &Path) -> anyhow::Result<()> {
	let index =
		MasterIndex::open(file).with_context(|| format!("cannot open {}", file.display()))?;

	println!("version magic: {:#06X}", index.version());
	println!("global objects: {}", index.object_flags().len());
	for section in ResourceSection::ORDER {
		let entries = index.section(section);
		println!("\n{section} resources: {}", entries.len());
		for (id, entry) in entries.iter().enumerate() {
			if entry.is_present() {
				println!("  [{id:3}] room {:3} offset {:#06X}", entry.room, entry.offset);
			} else {
				println!("  [{id:3}] absent");
			}
		}
	}
	Ok(())
}

fn cmd_info(file: &Path, hex_dump: bool) -> anyhow::Result<()> {
	let room = RoomFile::open(file).with_context(|| format!("cannot open {}", file.display()))?;
	let header = room.header();

	println!("container: {} ({} bytes)", file.display(), room.data().len());
	println!("room: {}x{} px", header.width(), header.height());
	println!("declared objects: {}", header.object_count());
	println!("reserved prefix: {}", hex::encode(header.reserved()));

	println!("\nresource directory ({} entries):", header.directory().len());
	for (entry, range) in room.resource_ranges() {
		let aliases: Vec<String> = entry.aliases().iter().map(u8::to_string).collect();
		println!(
			"  [{}] offset {:#06X}, {} bytes",
			aliases.join(","),
			entry.offset(),
			range.len()
		);
		if hex_dump {
			let head = &room.data()[range.start..range.end.min(range.start + 16)];
			println!("        {}", hex::encode(head));
		}
	}

	match room.objects() {
		Ok(table) => {
			println!("\nobject table: {} entries", table.len());
			for object in &table {
				println!(
					"  [{:3}] OBIM {:#06X}..{:#06X}  OBCD {:#06X}..{:#06X}",
					object.index(),
					object.obim_range().start,
					object.obim_range().end,
					object.obcd_range().start,
					object.obcd_range().end
				);
			}
		}
		Err(e) => println!("\nobject table unreadable: {e}"),
	}

	Ok(())
}
