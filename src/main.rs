use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use glam::Vec2;

mod run;

/// Runs a 2D FLIP fluid and records every frame to disk.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory the recording is written to.
    #[arg(short, long, default_value = "output/fluid")]
    output: PathBuf,
    /// Frames per second, also the inverse of the time step.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Length of the recording, in seconds.
    #[arg(short, long, default_value_t = 10.0)]
    duration: f32,
    #[arg(long, default_value_t = 20.0)]
    width: f32,
    #[arg(long, default_value_t = 20.0)]
    height: f32,
    #[arg(long, default_value_t = 0.5)]
    cell_size: f32,
    /// Number of particles in the spawn disc.
    #[arg(short = 'n', long, default_value_t = 2000)]
    particles: usize,
    #[arg(long, default_value_t = 0.1)]
    particle_radius: f32,
    /// Blend between PIC (`0`) and FLIP (`1`) velocity updates.
    #[arg(long, default_value_t = 0.9)]
    flip_ratio: f32,
    #[arg(long, default_value_t = 100)]
    pressure_iters: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Adds a circular obstacle below the spawn disc.
    #[arg(long)]
    obstacle: bool,
    /// Counteracts volume loss from particle drift.
    #[arg(long)]
    compensate_drift: bool,
}

impl Args {
    fn boundary(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run::run_d2(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
