//! Benchmarks for whole kernels driven through `process`.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use dsp_kernels::{AudioBuffers, DspKernel, KernelType};

use crate::{test_signal, BLOCK_SIZES};

const SAMPLE_RATE: f64 = 48_000.0;

fn stereo_kernel(kind: KernelType) -> Box<dyn DspKernel> {
    let mut kernel = kind.create();
    // Setup failure means the bench itself is broken.
    kernel
        .initialize(2, SAMPLE_RATE)
        .expect("kernel should initialize for stereo at 48kHz");
    kernel
}

pub fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernels/stereo");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);

        for kind in KernelType::ALL {
            let mut kernel = stereo_kernel(kind);
            let mut left = input.clone();
            let mut right = input.clone();
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &size, |b, _| {
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
                    kernel.process(
                        black_box(&mut AudioBuffers::in_place(&mut channels)),
                        size as u32,
                        0,
                    );
                })
            });
        }
    }

    group.finish();
}

/// Every block gets a new target on every parameter, so ramps never settle.
pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernels/automated");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);

        for kind in KernelType::ALL {
            if kind.parameters().is_empty() {
                continue;
            }
            let mut kernel = stereo_kernel(kind);
            let handle = kernel.handle();
            let mut left = input.clone();
            let mut right = input.clone();
            let mut flip = false;

            group.bench_with_input(BenchmarkId::new(kind.name(), size), &size, |b, _| {
                b.iter(|| {
                    flip = !flip;
                    for descriptor in handle.parameters() {
                        let value = if flip { descriptor.max } else { descriptor.min };
                        let _ = handle.set_parameter_value(descriptor.address, value);
                    }
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
                    kernel.process(&mut AudioBuffers::in_place(&mut channels), size as u32, 0);
                })
            });
        }
    }

    group.finish();
}
