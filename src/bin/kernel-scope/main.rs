//! kernel-scope - play one DSP kernel live and automate its parameters
//!
//! Run with: cargo run -- --kernel auto-wah

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use dsp_kernels::{KernelType, DEFAULT_RAMP_SECONDS};
use tracing_subscriber::EnvFilter;

use app::Scope;

#[derive(Parser, Debug)]
#[command(name = "kernel-scope", version, about = "Listen to a DSP kernel and tweak it live")]
struct Args {
    /// Kernel to play (fm-oscillator, auto-wah, pitch-shifter, peaking-equalizer, chowning-reverb)
    #[arg(short, long, default_value = "fm-oscillator")]
    kernel: KernelType,

    /// Frequency of the FM tone feeding effect kernels (Hz)
    #[arg(long, default_value_t = 220.0)]
    source_frequency: f32,

    /// Seconds a parameter change takes to settle
    #[arg(long, default_value_t = DEFAULT_RAMP_SECONDS)]
    ramp: f32,

    /// Log destination; the terminal belongs to the UI while it runs
    #[arg(long, default_value = "kernel-scope.log")]
    log_file: PathBuf,

    /// Print every kernel and its parameters, then exit
    #[arg(long)]
    list: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if args.list {
        print_catalogue();
        return Ok(());
    }

    let log = File::create(&args.log_file)
        .wrap_err_with(|| format!("failed to create log file {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    Scope::new(args.kernel)
        .source_frequency(args.source_frequency)
        .ramp_duration(args.ramp)
        .run()
}

fn print_catalogue() {
    for kind in KernelType::ALL {
        let role = if kind.is_generator() { "generator" } else { "effect" };
        match kind.wavetable_slots() {
            0 => println!("{kind} ({role})"),
            slots => println!("{kind} ({role}, {slots} wavetable slot(s))"),
        }
        for p in kind.parameters() {
            println!(
                "  {:>2}  {:<22} {:>9.3} ..= {:<9.3} default {}",
                p.address, p.identifier, p.min, p.max, p.default
            );
        }
    }
}
