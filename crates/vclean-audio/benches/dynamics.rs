//! Speech Cleanup Benchmarks
//!
//! Compares sequential and rayon-parallel compression and measures the
//! gate on long multi-channel buffers.
//!
//! # Running Benchmarks
//! ```bash
//! cargo bench --package vclean-audio --bench dynamics
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use vclean_audio::{CompressorConfig, DynamicsCompressor, SpeechGate, SpeechInterval, Waveform};

const SAMPLE_RATE: u32 = 48_000;

/// Synthetic speech-like signal: an amplitude-modulated tone per channel.
fn create_test_waveform(channels: usize, seconds: usize) -> Waveform {
    let frames = SAMPLE_RATE as usize * seconds;
    let data = (0..channels)
        .map(|ch| {
            (0..frames)
                .map(|i| {
                    let t = i as f32 / SAMPLE_RATE as f32;
                    let envelope = 0.5 + 0.45 * (t * 3.0 + ch as f32).sin();
                    envelope * (t * 220.0 * std::f32::consts::TAU).sin()
                })
                .collect()
        })
        .collect();

    Waveform::new(data, SAMPLE_RATE).expect("valid benchmark waveform")
}

/// One interval every second, 600 ms long.
fn create_intervals(seconds: usize) -> Vec<SpeechInterval> {
    (0..seconds)
        .map(|s| SpeechInterval::unchecked(s as f64 + 0.2, s as f64 + 0.8))
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    let parallel = DynamicsCompressor::new(CompressorConfig::speech()).expect("valid config");
    let sequential = parallel.clone().sequential();

    for channels in [1, 2, 6] {
        let waveform = create_test_waveform(channels, 10);
        group.throughput(Throughput::Elements(
            (waveform.num_frames() * waveform.num_channels()) as u64,
        ));

        group.bench_with_input(
            BenchmarkId::new("sequential", format!("{}ch", channels)),
            &waveform,
            |b, w| b.iter(|| black_box(sequential.compress(black_box(w)))),
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", format!("{}ch", channels)),
            &waveform,
            |b, w| b.iter(|| black_box(parallel.compress(black_box(w)))),
        );
    }

    group.finish();
}

fn bench_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate");

    let gate = SpeechGate::default();
    for seconds in [10, 60] {
        let waveform = create_test_waveform(2, seconds);
        let intervals = create_intervals(seconds);

        group.throughput(Throughput::Elements(waveform.num_frames() as u64));
        group.bench_with_input(
            BenchmarkId::new("stereo", format!("{}s", seconds)),
            &(waveform, intervals),
            |b, (w, iv)| b.iter(|| black_box(gate.gate(black_box(w), black_box(iv)))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_compress, bench_gate);
criterion_main!(benches);
