//! `loom-rs` turns the encrypted `NN.LFL` containers of a classic 16-color
//! adventure game into inspectable, standard-format artifacts: normalized
//! background images, per-object sprites, raw scripts, Standard MIDI
//! wrappings of the Roland MT-32 sound streams, and a JSON manifest tying
//! every artifact back to its source room and resource id.
//!
//! Container parsing lives in [`loom_types`]; this crate adds the
//! extraction pipeline around it: heuristic resource typing, output
//! writers, and the manifest.

pub mod classify;
pub mod extract;
pub mod manifest;
pub mod midi;
pub mod png;

pub use loom_types;
