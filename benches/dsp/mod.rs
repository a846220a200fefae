//! Benchmarks for low-level DSP primitives.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use dsp_kernels::dsp::{
    autowah::AutoWah,
    filter::SVFilter,
    fosc::{FmControls, Fosc},
    pareq::PeakingEq,
    pshift::PitchShift,
    reverb::JcReverb,
    wavetable::{sine_table, DEFAULT_TABLE_SIZE},
};

use crate::{test_signal, BLOCK_SIZES};

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_fosc(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/fosc");
    let table = sine_table(DEFAULT_TABLE_SIZE);

    for &size in BLOCK_SIZES {
        for (name, index) in [("pure", 0.0), ("index_5", 5.0)] {
            let controls = FmControls {
                base_frequency: 440.0,
                carrier_multiplier: 1.0,
                modulating_multiplier: 1.5,
                modulation_index: index,
                amplitude: 1.0,
            };
            let mut osc = Fosc::new(SAMPLE_RATE as f64);
            let mut buffer = vec![0.0f32; size];
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = osc.next_sample(black_box(&table), black_box(&controls));
                    }
                })
            });
        }
    }

    group.finish();
}

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);

        let mut filter = SVFilter::bandpass(1000.0, SAMPLE_RATE);
        filter.set_resonance(0.8);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("bandpass", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = filter.process(black_box(x));
                }
            })
        });

        // Cutoff moving every sample, as under the wah sweep
        let mut filter = SVFilter::bandpass(1000.0, SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("swept", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    filter.set_cutoff(400.0 + i as f32);
                    *sample = filter.process(black_box(input[i]));
                }
            })
        });
    }

    group.finish();
}

pub fn bench_autowah(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/autowah");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut wah = AutoWah::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("full_wah", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += wah.process(black_box(sample), 1.0, 1.0, 0.5);
                }
                sum
            })
        });
    }

    group.finish();
}

pub fn bench_pitch_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pitch_shift");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        for (name, shift) in [("unison", 0.0), ("fifth_up", 7.0), ("octave_down", -12.0)] {
            let mut shifter = PitchShift::new();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        sum += shifter.process(black_box(sample), shift, 1024.0, 512.0);
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}

pub fn bench_pareq(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/pareq");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);

        let mut eq = PeakingEq::new(SAMPLE_RATE);
        eq.set(2_000.0, 4.0, 1.0);
        group.bench_with_input(BenchmarkId::new("static", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += eq.process(black_box(sample));
                }
                sum
            })
        });

        // Coefficients recomputed every sample
        let mut eq = PeakingEq::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("sweeping", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &sample) in input.iter().enumerate() {
                    eq.set(500.0 + i as f32, 4.0, 1.0);
                    sum += eq.process(black_box(sample));
                }
                sum
            })
        });
    }

    group.finish();
}

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut reverb = JcReverb::new();
        group.bench_with_input(BenchmarkId::new("jc", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    sum += reverb.process(black_box(sample));
                }
                sum
            })
        });
    }

    group.finish();
}
