//! Benchmark suite for RLE strip decoding
//!
//! Measures the per-strip decoder on its own and the full background
//! reconstruction path over a synthetic room blob.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use loom_benches::{generate_room_blob, generate_strip_stream, heights};
use loom_types::file::{RoomFile, decode_strip};
use std::hint::black_box;

/// Benchmark one strip at each of the standard heights
fn bench_decode_strip(c: &mut Criterion) {
	let mut group = c.benchmark_group("strip_decode");

	let cases = [
		("object_small", heights::OBJECT_SMALL),
		("object_medium", heights::OBJECT_MEDIUM),
		("object_large", heights::OBJECT_LARGE),
		("room", heights::ROOM),
	];

	for (name, height) in cases {
		let stream = generate_strip_stream(height);
		group.throughput(Throughput::Elements((8 * height) as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &stream, |b, stream| {
			b.iter(|| black_box(decode_strip(black_box(stream), height)));
		});
	}

	group.finish();
}

/// Benchmark background extraction over whole synthetic rooms
fn bench_background_extract(c: &mut Criterion) {
	let mut group = c.benchmark_group("background_extract");

	for strips in [10usize, 40, 80] {
		let blob = generate_room_blob(strips, heights::ROOM);
		let room = RoomFile::from_cleartext(blob).unwrap();
		let pixels = (strips * 8 * heights::ROOM) as u64;
		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(BenchmarkId::new("strips", strips), &room, |b, room| {
			b.iter(|| {
				let background = room.background().unwrap();
				black_box(background.decode())
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decode_strip, bench_background_extract);
criterion_main!(benches);
