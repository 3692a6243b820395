use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use knet_rs::{ByteReader, DecodeOptions, FrameReader, decode, decode_bcd, decode_with};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{ContainerBuilder, SubBlock};

/// Generate realistic accelerogram-like samples (smooth with small diffs).
fn seismic_samples(n: usize, amplitude: f64) -> Vec<i32> {
    (0..n)
        .map(|i| {
            let drift = (i as f64 * 0.05).sin() * amplitude;
            let noise = ((i as f64 * 1.7).sin() * 3.0) as i32;
            drift as i32 + noise
        })
        .collect()
}

/// 60 one-second frames at 100 Hz with the given width code per frame.
fn make_container(width: u8) -> Vec<u8> {
    let mut builder = ContainerBuilder::new().earthquake(true);
    for f in 0..60 {
        let samples = seismic_samples(100, 2.0 + f as f64 * 0.01);
        let block = |s: &[i32]| {
            if width == 0 {
                SubBlock::nibbles(s, 0)
            } else {
                SubBlock::fixed(width, s)
            }
        };
        builder = builder.frame(block(&samples), block(&samples), block(&samples));
    }
    builder.build()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(3 * 60 * 100));

    for (name, width) in [("nibble", 0u8), ("int8", 1), ("int16", 2), ("int24", 3), ("int32", 4)] {
        let data = make_container(width);
        group.bench_function(format!("{name}/6000samp"), |b| {
            b.iter(|| decode(black_box(&data)).unwrap())
        });
    }

    let data = make_container(2);
    group.bench_function("int16/physical", |b| {
        b.iter(|| {
            decode_with(
                black_box(&data),
                DecodeOptions::new().with_physical_units(true),
            )
            .unwrap()
        })
    });
    group.bench_function("int16/frame_reader", |b| {
        b.iter(|| {
            let header = knet_rs::parse_header(black_box(&data)).unwrap();
            FrameReader::new(ByteReader::at(&data, header.data_offset))
                .map(|f| f.unwrap().channels.ns.samples.len())
                .sum::<usize>()
        })
    });

    group.finish();
}

fn bench_bcd(c: &mut Criterion) {
    c.bench_function("bcd/latitude", |b| {
        b.iter(|| decode_bcd(black_box(&[0x03u8, 0x61, 0x23, 0x4E][..]), 8, 5).unwrap())
    });
}

criterion_group!(benches, bench_decode, bench_bcd);
criterion_main!(benches);
