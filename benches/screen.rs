//! Screen benchmarks

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use termbuf::core::Screen;
use termbuf::Terminal;

fn bench_screen_print(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let text = "Hello, World! ".repeat(100);

    group.bench_function("print_chars", |b| {
        b.iter(|| {
            let mut screen = Screen::new(80, 24, 1000);
            for c in text.chars() {
                screen.print(c);
            }
            black_box(screen)
        })
    });

    group.finish();
}

fn bench_screen_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    // Enough output to fill and then evict scrollback
    let input: String = (0..5000)
        .map(|i| format!("Line {}: Some text content here\r\n", i))
        .collect();
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("scroll", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24, 1000);
            term.feed(black_box(input.as_bytes()));
            black_box(term.scrollback_len())
        })
    });

    group.finish();
}

fn bench_screen_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    group.bench_function("resize", |b| {
        b.iter_batched(
            || {
                let mut term = Terminal::new(80, 24, 1000);
                term.feed("Hello, World!\r\n".repeat(500).as_bytes());
                term
            },
            |mut term| {
                term.set_size(120, 40);
                term.set_size(80, 24);
                term.set_size(132, 50);
                term
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_screen_full_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    // Simulate a full screen redraw (like vim opening)
    let mut setup_input = String::new();
    for row in 1..=24 {
        setup_input.push_str(&format!("\x1b[{};1H", row));
        setup_input.push_str(&"X".repeat(80));
    }

    group.throughput(Throughput::Bytes(setup_input.len() as u64));

    group.bench_function("full_redraw", |b| {
        b.iter(|| {
            let mut term = Terminal::new(80, 24, 1000);
            term.feed(black_box(setup_input.as_bytes()));
            black_box(term.cursor().row)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_screen_print,
    bench_screen_scroll,
    bench_screen_resize,
    bench_screen_full_redraw
);

criterion_main!(benches);
