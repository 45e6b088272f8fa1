//! Benchmarks for the R-peak detectors and their shared stages
//!
//! Run with: cargo bench -p ecgd-core --bench detector_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecgd_core::adaptive::{AdaptiveConfig, AdaptiveThresholdPicker};
use ecgd_core::prelude::*;
use ecgd_core::primitives::{bandpass, moving_average};
use ecgd_core::wavelet::{SwtAnalyzer, WaveletType};
use std::f64::consts::PI;
use std::time::Duration;

/// Gaussian pulses once per `rr` samples over a slow baseline wander.
fn synthetic_ecg(fs: f64, seconds: f64, rr: usize) -> Vec<f64> {
    let n = (fs * seconds) as usize;
    let sigma = 0.012 * fs;
    let half = (6.0 * sigma) as usize;
    let mut x: Vec<f64> = (0..n)
        .map(|i| 0.1 * (2.0 * PI * 0.3 * i as f64 / fs).sin())
        .collect();
    for p in (rr / 2..n).step_by(rr) {
        for i in p.saturating_sub(half)..(p + half + 1).min(n) {
            let z = (i as f64 - p as f64) / sigma;
            x[i] += (-0.5 * z * z).exp();
        }
    }
    x
}

// ============================================================================
// Detector Benchmarks
// ============================================================================

fn bench_detectors(c: &mut Criterion) {
    let mut group = c.benchmark_group("detectors");
    group.measurement_time(Duration::from_secs(5));

    let fs = 250.0;
    let ecg = synthetic_ecg(fs, 60.0, 200);
    let detectors = Detectors::new(fs).expect("valid sampling rate");
    group.throughput(Throughput::Elements(ecg.len() as u64));

    for (name, kind) in Detectors::detector_list() {
        group.bench_with_input(BenchmarkId::new("one_minute", name), &kind, |b, &kind| {
            b.iter(|| detectors.detect(kind, black_box(&ecg)))
        });
    }

    group.finish();
}

fn bench_record_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_length");

    let fs = 360.0;
    let detectors = Detectors::new(fs).expect("valid sampling rate");
    for minutes in [1.0, 5.0, 30.0] {
        let ecg = synthetic_ecg(fs, minutes * 60.0, 290);
        group.throughput(Throughput::Elements(ecg.len() as u64));
        group.bench_with_input(BenchmarkId::new("pan_tompkins", minutes), &ecg, |b, ecg| {
            b.iter(|| detectors.pan_tompkins_detector(black_box(ecg)))
        });
    }

    group.finish();
}

// ============================================================================
// Stage Benchmarks
// ============================================================================

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    let fs = 250.0;
    let ecg = synthetic_ecg(fs, 60.0, 200);
    group.throughput(Throughput::Elements(ecg.len() as u64));

    group.bench_function("bandpass_5_15", |b| {
        b.iter(|| bandpass(black_box(&ecg), fs, 5.0, 15.0, 1))
    });

    group.bench_function("moving_average_150ms", |b| {
        b.iter(|| moving_average(black_box(&ecg), 37))
    });

    let swt = SwtAnalyzer::new(WaveletType::Db3, 3);
    let padded = &ecg[..ecg.len() / 8 * 8];
    group.bench_function("swt_db3_level3", |b| b.iter(|| swt.detail(black_box(padded))));

    let picker = AdaptiveThresholdPicker::new(AdaptiveConfig::pan_tompkins(), fs);
    group.bench_function("adaptive_picker", |b| b.iter(|| picker.detect(black_box(&ecg))));

    group.finish();
}

criterion_group!(detector_benches, bench_detectors, bench_record_length);
criterion_group!(stage_benches, bench_stages);
criterion_main!(detector_benches, stage_benches);
