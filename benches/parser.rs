//! Parser benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use termbuf::parser::Parser;

fn count_actions(input: &[u8]) -> usize {
    let mut parser = Parser::new();
    let mut count = 0;
    parser.parse(input, |action| {
        black_box(action);
        count += 1;
    });
    count
}

fn bench_parse_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let plain_text = "Hello, World! ".repeat(1000);
    group.throughput(Throughput::Bytes(plain_text.len() as u64));

    group.bench_function("plain_text", |b| {
        b.iter(|| count_actions(black_box(plain_text.as_bytes())))
    });

    group.finish();
}

fn bench_parse_csi_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    // Cursor movement and SGR
    let csi_heavy = "\x1b[1;31mRed\x1b[0m \x1b[5;10H\x1b[2J\x1b[38;2;10;20;30m".repeat(100);
    group.throughput(Throughput::Bytes(csi_heavy.len() as u64));

    group.bench_function("csi_sequences", |b| {
        b.iter(|| count_actions(black_box(csi_heavy.as_bytes())))
    });

    group.finish();
}

fn bench_parse_osc_flood(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    // Long OSC payloads are counted, never stored
    let payload = "A".repeat(64 * 1024);
    let osc = format!("\x1b]8;;{}\x1b\\", payload).repeat(4);
    group.throughput(Throughput::Bytes(osc.len() as u64));

    group.bench_function("osc_flood", |b| {
        b.iter(|| count_actions(black_box(osc.as_bytes())))
    });

    group.finish();
}

fn bench_parse_utf8(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let utf8 = "Hello, 世界! 🎉 ".repeat(500);
    group.throughput(Throughput::Bytes(utf8.len() as u64));

    group.bench_function("utf8_content", |b| {
        b.iter(|| count_actions(black_box(utf8.as_bytes())))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_plain_text,
    bench_parse_csi_sequences,
    bench_parse_osc_flood,
    bench_parse_utf8
);

criterion_main!(benches);
