use criterion::{Criterion, criterion_group, criterion_main};
use enc28j60_status::{StatusVector, decode};
use std::hint::black_box;

fn decode_hex(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_hex");
    group.bench_function("receive", |b| {
        b.iter(|| decode(black_box("0x3c 0x00 0x80 0x02")))
    });
    group.bench_function("transmit", |b| {
        b.iter(|| decode(black_box("40 00 80 00 40 00 00")))
    });
    group.bench_function("invalid_length", |b| b.iter(|| decode(black_box("abc"))));
    group.finish();
}

fn decode_bytes(c: &mut Criterion) {
    let tsv: [u8; 7] = [0x40, 0x00, 0x80, 0x00, 0x40, 0x00, 0x00];
    c.bench_function("decode_bytes_transmit", |b| {
        b.iter(|| StatusVector::from_bytes(black_box(&tsv)))
    });
}

criterion_group!(benches, decode_hex, decode_bytes);
criterion_main!(benches);
