use std::{f32::consts::TAU, sync::Arc, thread};

use dsp_kernels::{
    kernels::{FmOscillator, PitchShifter},
    AudioBuffers, DspKernel, KernelConfig, KernelType, LifecycleState, MIN_SAMPLE_RATE,
};

const SAMPLE_RATE: f64 = 48_000.0;

fn signal(len: usize, seed: f32) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let t = n as f32 / SAMPLE_RATE as f32;
            0.5 * (TAU * (220.0 + seed) * t).sin() + 0.3 * (TAU * 1_337.0 * t).sin()
        })
        .collect()
}

fn ready(kind: KernelType, channels: usize) -> Box<dyn DspKernel> {
    let mut kernel = kind.create();
    kernel.initialize(channels, SAMPLE_RATE).unwrap();
    kernel
}

/// Run `kernel` in place over `frames` mono frames in one call.
fn run(kernel: &mut dyn DspKernel, input: &[f32]) -> Vec<f32> {
    let mut buf = input.to_vec();
    let mut channels = [buf.as_mut_slice()];
    kernel.process(
        &mut AudioBuffers::in_place(&mut channels),
        input.len() as u32,
        0,
    );
    buf
}

/// Move every parameter toward the middle of its range.
fn automate(kernel: &dyn DspKernel) {
    for descriptor in kernel.parameters() {
        let mid = descriptor.min + 0.5 * (descriptor.max - descriptor.min);
        kernel
            .set_parameter_value(descriptor.address, 0.5 * (descriptor.default + mid))
            .unwrap();
    }
}

#[test]
fn finite_input_gives_finite_output_for_every_kernel() {
    for kind in KernelType::ALL {
        for &channels in &[1usize, 2, 5] {
            let mut kernel = ready(kind, channels);
            automate(kernel.as_ref());

            let mut bufs: Vec<Vec<f32>> = (0..channels).map(|c| signal(3000, c as f32)).collect();
            let mut slices: Vec<&mut [f32]> = bufs.iter_mut().map(Vec::as_mut_slice).collect();
            for &(frames, offset) in &[(1u32, 0u32), (511, 1), (1024, 512), (1464, 1536)] {
                kernel.process(&mut AudioBuffers::in_place(&mut slices), frames, offset);
            }

            assert!(
                bufs.iter().flatten().all(|s| s.is_finite()),
                "{kind} with {channels} channels"
            );
        }
    }
}

#[test]
fn out_of_range_values_store_the_boundary() {
    for kind in KernelType::ALL {
        let kernel = kind.create();
        for descriptor in kind.parameters() {
            let address = descriptor.address;
            assert_eq!(kernel.set_parameter_value(address, descriptor.max + 1e6), Ok(descriptor.max));
            assert_eq!(kernel.parameter_value(address), Some(descriptor.max));
            assert_eq!(kernel.set_parameter_value(address, f32::NEG_INFINITY), Ok(descriptor.min));
            assert_eq!(kernel.parameter_value(address), Some(descriptor.min));
            assert!(kernel.set_parameter_value(address, f32::NAN).is_err());
            assert_eq!(kernel.parameter_value(address), Some(descriptor.min));
        }
    }
}

/// Move every parameter a quarter of the way from its default toward a bound.
fn retarget_away_from_defaults(kernel: &dyn DspKernel) {
    for d in kernel.parameters() {
        let target = if d.max > d.default {
            d.default + 0.25 * (d.max - d.default)
        } else {
            d.default - 0.25 * (d.default - d.min)
        };
        kernel.set_parameter_value(d.address, target).unwrap();
    }
}

#[test]
fn setting_the_current_value_changes_nothing() {
    for kind in KernelType::ALL {
        let mut plain = ready(kind, 1);
        let mut touched = ready(kind, 1);
        retarget_away_from_defaults(plain.as_ref());
        retarget_away_from_defaults(touched.as_ref());

        // Twice the default ramp length, so every ramp has settled.
        let input = signal(6144, 3.0);
        assert_eq!(run(plain.as_mut(), &input[..2048]), run(touched.as_mut(), &input[..2048]));

        for d in kind.parameters() {
            let current = touched.current_value(d.address).unwrap();
            assert_eq!(Some(current), touched.parameter_value(d.address), "{kind} {}", d.identifier);
            assert_ne!(current, d.default, "{kind} {} never left its default", d.identifier);
            touched.set_parameter_value(d.address, current).unwrap();
        }

        for block in input[2048..].chunks(1024) {
            assert_eq!(run(plain.as_mut(), block), run(touched.as_mut(), block), "{kind}");
        }
    }
}

#[test]
fn lowest_accepted_sample_rate_never_panics() {
    for kind in KernelType::ALL {
        for rate in [MIN_SAMPLE_RATE, 2.0] {
            let mut kernel = kind.create();
            kernel.initialize(1, rate).unwrap();
            retarget_away_from_defaults(kernel.as_ref());
            let out = run(kernel.as_mut(), &signal(64, 0.0));
            assert!(out.iter().all(|s| s.is_finite()), "{kind} at {rate} Hz");
        }
        assert!(kind.create().initialize(1, MIN_SAMPLE_RATE * 0.5).is_err());
    }
}

#[test]
fn stopped_kernels_bypass_by_channel_policy() {
    for kind in KernelType::ALL {
        let mut kernel = ready(kind, 2);
        let handle = kernel.handle();
        handle.stop();

        let left_in = signal(512, 0.0);
        let right_in = signal(512, 9.0);
        let mut left = left_in.clone();
        let mut right = right_in.clone();
        let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
        kernel.process(&mut AudioBuffers::in_place(&mut channels), 512, 0);

        if kind.is_generator() {
            assert!(left.iter().chain(&right).all(|&s| s == 0.0), "{kind}");
        } else {
            assert_eq!(left, left_in, "{kind}");
            assert_eq!(right, right_in, "{kind}");
        }

        handle.start();
        assert!(handle.is_started());
        if kind.is_generator() {
            let out = run(kernel.as_mut(), &[0.0; 512]);
            assert!(out.iter().any(|&s| s != 0.0), "{kind} stayed silent after start");
        }
    }
}

#[test]
fn reset_reproduces_the_initial_state() {
    for kind in KernelType::ALL {
        let mut used = ready(kind, 1);
        run(used.as_mut(), &signal(6000, 1.0));
        used.reset();

        let mut fresh = ready(kind, 1);
        let input = signal(4096, 7.0);
        assert_eq!(run(used.as_mut(), &input), run(fresh.as_mut(), &input), "{kind}");

        used.reset();
        let silence = vec![0.0; 2048];
        let after = run(used.as_mut(), &silence);
        if !kind.is_generator() {
            assert!(after.iter().all(|&s| s == 0.0), "{kind} rang after reset");
        }
    }
}

#[test]
fn splitting_a_block_at_any_frame_is_bit_identical() {
    const FRAMES: usize = 1500;
    for kind in KernelType::ALL {
        for &split in &[1usize, 64, 733, 1499] {
            let input = signal(FRAMES, 2.0);

            let mut whole = ready(kind, 1);
            automate(whole.as_ref());
            let expected = run(whole.as_mut(), &input);

            let mut parts = ready(kind, 1);
            automate(parts.as_ref());
            let mut buf = input.clone();
            let mut channels = [buf.as_mut_slice()];
            let mut buffers = AudioBuffers::in_place(&mut channels);
            parts.process(&mut buffers, split as u32, 0);
            parts.process(&mut buffers, (FRAMES - split) as u32, split as u32);

            assert_eq!(buf, expected, "{kind} split at {split}");
        }
    }
}

#[test]
fn pitch_shift_of_zero_is_a_window_delay() {
    let mut kernel = PitchShifter::new();
    kernel.initialize(1, 44_100.0).unwrap();
    let window = kernel.parameter_value(1).unwrap() as usize;
    assert_eq!(window, 1024);

    let input = signal(8192, 0.0);
    let output = run(&mut kernel, &input);
    for n in window..input.len() {
        assert!((output[n] - input[n - window]).abs() < 1e-6, "frame {n}");
    }
}

#[test]
fn channel_mismatch_never_goes_out_of_bounds() {
    for kind in KernelType::ALL {
        // Fewer, shorter buffers than requested.
        let mut kernel = ready(kind, 4);
        let mut short = vec![0.25; 64];
        let mut channels = [short.as_mut_slice()];
        kernel.process(&mut AudioBuffers::in_place(&mut channels), 512, 32);
        assert!(short.iter().all(|s| s.is_finite()));

        // More buffers than configured: extras are untouched.
        let mut kernel = ready(kind, 2);
        let mut bufs = vec![vec![0.25f32; 128]; 4];
        let mut slices: Vec<&mut [f32]> = bufs.iter_mut().map(Vec::as_mut_slice).collect();
        kernel.process(&mut AudioBuffers::in_place(&mut slices), 128, 0);
        assert!(bufs[2..].iter().flatten().all(|&s| s == 0.25), "{kind}");

        // Separate buffers with a missing input channel.
        let input = signal(128, 0.0);
        let inputs = [input.as_slice()];
        let mut left = vec![9.0; 128];
        let mut right = vec![9.0; 128];
        let mut outputs = [left.as_mut_slice(), right.as_mut_slice()];
        kernel.reset();
        kernel.process(&mut AudioBuffers::separate(&inputs, &mut outputs), 128, 0);
        assert!(left.iter().chain(&right).all(|&s| s != 9.0 && s.is_finite()), "{kind}");
    }
}

#[test]
fn nan_input_yields_finite_output() {
    for kind in KernelType::ALL {
        let mut kernel = ready(kind, 1);
        let mut input = signal(512, 0.0);
        input[10] = f32::NAN;
        input[200] = f32::INFINITY;
        input[300] = f32::NEG_INFINITY;
        assert!(run(kernel.as_mut(), &input).iter().all(|s| s.is_finite()), "{kind}");
    }
}

#[test]
fn lifecycle_misuse_degrades_to_silence() {
    for kind in KernelType::ALL {
        let mut kernel = kind.create();
        assert!(run(kernel.as_mut(), &signal(64, 0.0)).iter().all(|&s| s == 0.0));

        kernel.initialize(1, SAMPLE_RATE).unwrap();
        kernel.deinit();
        assert_eq!(kernel.lifecycle(), LifecycleState::Deinitialized);
        assert!(run(kernel.as_mut(), &signal(64, 0.0)).iter().all(|&s| s == 0.0));
    }
}

#[test]
fn configure_applies_the_ramp_duration() {
    let mut kernel = KernelType::AutoWah.create();
    let config = KernelConfig::default().channels(1).ramp_duration(0.0);
    kernel.configure(&config).unwrap();
    assert_eq!(kernel.handle().ramp_duration(), 0.0);

    kernel.set_parameter_value(2, 1.0).unwrap();
    run(kernel.as_mut(), &[0.0]);
    assert_eq!(kernel.current_value(2), Some(1.0));

    assert!(kernel.configure(&KernelConfig::default().channels(0)).is_err());
}

#[test]
fn handles_update_targets_from_another_thread() {
    let mut kernel = FmOscillator::new();
    kernel.initialize(2, SAMPLE_RATE).unwrap();
    let handle = kernel.handle();

    let writer = thread::spawn(move || {
        for i in 0..2_000 {
            handle.set_parameter("baseFrequency", 100.0 + i as f32).unwrap();
            handle.set_parameter("modulationIndex", (i % 10) as f32).unwrap();
            if i % 500 == 0 {
                let table: Arc<[f32]> = Arc::from(vec![0.1f32; 32 + i]);
                // The queue may be full if the audio side is behind.
                let _ = handle.set_wavetable(table, 0);
            }
        }
    });

    let mut left = vec![0.0; 256];
    let mut right = vec![0.0; 256];
    for _ in 0..200 {
        let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
        kernel.process(&mut AudioBuffers::in_place(&mut channels), 256, 0);
        assert!(left.iter().all(|s| s.is_finite()));
        assert_eq!(left, right);
    }
    writer.join().unwrap();

    assert_eq!(kernel.parameter_value(0), Some(2_099.0));
}

#[test]
fn handle_keeps_working_after_its_kernel_is_dropped() {
    let kernel = ready(KernelType::AutoWah, 1);
    let handle = kernel.handle();
    drop(kernel);

    assert_eq!(handle.set_parameter("mix", 0.5), Ok(0.5));
    assert_eq!(handle.parameter_value(1), Some(0.5));
    handle.stop();
    assert!(!handle.is_started());
}
