use glam::Vec2;
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use thiserror::Error;

use eddy_fluids::{
    flip::{FlipFluid2D, FlipFluid2DParams, StepStatus},
    obstacle::circle::Circle,
    scene::Scene,
    ConfigError, FluidConfig, SimulationError,
};
use eddy_io::encode::{EncodingError, FluidDataEncoder};

use crate::Args;

pub fn run_d2(args: &Args) -> Result<(), RunError> {
    let boundary = args.boundary();

    let config = FluidConfig {
        boundary,
        cell_size: args.cell_size,
        num_particles: args.particles,
        particle_radius: args.particle_radius,
        spawn_center: boundary * Vec2::new(-0.2, 0.2),
        spawn_radius: 0.25 * boundary.min_element(),
        seed: args.seed,
        ..Default::default()
    };

    let fluid = FlipFluid2D::new(&config)?;
    let params = FlipFluid2DParams {
        flip_ratio: args.flip_ratio,
        num_pressure_iters: args.pressure_iters,
        compensate_drift: args.compensate_drift,
        ..Default::default()
    };

    let mut scene = Scene::flip_2d(fluid, params)?;

    if args.obstacle {
        let radius = 0.1 * boundary.min_element();
        scene.add_obstacle(Circle::new(boundary * Vec2::new(-0.1, -0.25), radius));
    }

    let frames = (args.duration * args.fps as f32).round().max(0.0) as u64;
    let dt = 1.0 / args.fps as f32;

    let mut encoder = FluidDataEncoder::new(args.output.clone(), frames, args.fps)?;
    encoder.encode_metadata(&scene)?;

    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)?
        .progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(frames).with_style(style);

    let mut diverged_frames = 0;
    for frame in (0..frames).progress_with(progress) {
        if let StepStatus::Diverged { clamped } = scene.advance(dt)? {
            log::debug!("frame {frame}: clamped {clamped} particle velocities");
            diverged_frames += 1;
        }

        encoder.encode_frame(&scene)?;
    }

    if diverged_frames > 0 {
        log::warn!("velocities were clamped in {diverged_frames} of {frames} frames");
    }

    log::info!("wrote {} frames to {:?}", encoder.current_frame(), args.output);

    Ok(())
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
    #[error("failed to record fluid: {0}")]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Template(#[from] indicatif::style::TemplateError),
}
