//! Criterion benchmarks for the Camlink line codec.
//!
//! Measures per-line decode and encode latency for typical command-sized
//! lines and for pathological long lines.
//!
//! Run with:
//! ```bash
//! cargo bench --package camlink-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use camlink_core::{decode_line, encode_command};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A buffer holding `count` LF-terminated copies of `line`.
fn make_buffer(line: &str, count: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity((line.len() + 1) * count);
    for _ in 0..count {
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
    }
    buf
}

// ── Benchmark groups ──────────────────────────────────────────────────────────

/// Benchmarks `decode_line` against lines of increasing length.
fn bench_decode(c: &mut Criterion) {
    let cases: &[(&str, Vec<u8>)] = &[
        ("command", make_buffer("start", 1)),
        ("crlf", b"start\r\nrest".to_vec()),
        ("line_64", make_buffer(&"x".repeat(64), 1)),
        ("line_4096", make_buffer(&"x".repeat(4096), 1)),
    ];

    let mut group = c.benchmark_group("decode_line");
    for (name, buf) in cases {
        group.bench_with_input(BenchmarkId::new("buf", name), buf, |b, buf| {
            b.iter(|| decode_line(black_box(buf), black_box(false)).expect("complete line"))
        });
    }
    group.finish();
}

/// Benchmarks draining a coalesced multi-line buffer, the read-loop hot path.
fn bench_drain_buffer(c: &mut Criterion) {
    let buf = make_buffer("heart", 100);

    c.bench_function("drain_100_lines", |b| {
        b.iter(|| {
            let mut rest: &[u8] = black_box(&buf);
            let mut count = 0usize;
            while let Some((line, consumed)) = decode_line(rest, false) {
                black_box(line);
                rest = &rest[consumed..];
                count += 1;
            }
            assert_eq!(count, 100);
        })
    });
}

/// Benchmarks `encode_command` for command-sized and long payloads.
fn bench_encode(c: &mut Criterion) {
    let cases: &[(&str, String)] = &[
        ("command", "start".to_string()),
        ("line_64", "x".repeat(64)),
        ("line_4096", "x".repeat(4096)),
    ];

    let mut group = c.benchmark_group("encode_command");
    for (name, text) in cases {
        group.bench_with_input(BenchmarkId::new("text", name), text, |b, text| {
            b.iter(|| encode_command(black_box(text)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_drain_buffer, bench_encode);
criterion_main!(benches);
