use glam::{UVec2, Vec2};
use ndarray::Array2;

use crate::{
    obstacle::{Obstacle, ObstacleSet},
    ConfigError, Fluid, FluidConfig, SimulationError,
};

use super::{
    density::update_particle_density,
    grid::Grid,
    particles::ParticleSet,
    pressure::solve_incompressibility,
    separate::push_particles_apart,
    spatial_hash::SpatialHash,
    transfer::{transfer_velocities_to_grid, transfer_velocities_to_particles},
    CellType, StepStatus,
};

#[derive(Debug, Clone)]
pub struct FlipFluid2D {
    /// Cell lattice.
    grid: Grid,
    /// Particles carrying the fluid volume.
    particles: ParticleSet,
    /// Cell→particle index used by particle separation.
    hash: SpatialHash,
    /// Cells marked solid through [`FlipFluid2D::set_solid`], independent of obstacles.
    static_solid: Array2<bool>,
    /// The density of the fluid, in kg/m³.
    density: f32,
}

impl FlipFluid2D {
    /// Spawns `config.num_particles` particles inside the spawn disc.
    pub fn new(config: &FluidConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let particles = ParticleSet::spawn_disc(
            config.num_particles,
            config.spawn_center,
            config.spawn_radius,
            config.particle_radius,
            config.seed,
        );

        Self::with_particles(config, particles)
    }

    /// Places particles at rest at the given positions, ignoring the spawn settings.
    pub fn from_positions(config: &FluidConfig, positions: Vec<Vec2>) -> Result<Self, ConfigError> {
        config.validate()?;

        let particles = ParticleSet::from_positions(positions, config.particle_radius);

        Self::with_particles(config, particles)
    }

    fn with_particles(config: &FluidConfig, particles: ParticleSet) -> Result<Self, ConfigError> {
        let resolution = config.resolution()?;
        let grid = Grid::new(config.boundary, resolution);
        let hash = SpatialHash::new(&grid, particles.len());
        let static_solid = Array2::from_elem((grid.nx, grid.ny), false);

        log::info!(
            "created {}x{} grid with cell size {} for {} particles of radius {}",
            grid.nx,
            grid.ny,
            grid.spacing,
            particles.len(),
            particles.radius(),
        );

        let mut fluid = Self {
            grid,
            particles,
            hash,
            static_solid,
            density: config.density,
        };

        fluid.clamp_to_boundary();
        fluid.push_particles_apart(config.settle_iters);

        Ok(fluid)
    }

    /// Marks cell `(x, y)` as a static solid. Out-of-range cells are ignored.
    pub fn set_solid(&mut self, x: usize, y: usize, solid: bool) {
        if let Some(s) = self.static_solid.get_mut((x, y)) {
            *s = solid;
        }

        if let Some(s) = self.grid.solid.get_mut((x, y)) {
            *s = solid;
        }
    }

    pub fn push_particles_apart(&mut self, num_iters: usize) {
        push_particles_apart(&mut self.particles, &self.grid, &mut self.hash, num_iters);
        self.clamp_to_boundary();
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = &Vec2> {
        self.particles.positions().iter()
    }

    pub fn iter_particles(&self) -> impl Iterator<Item = (&Vec2, &Vec2)> {
        self.particles.iter()
    }

    pub fn positions(&self) -> &[Vec2] {
        self.particles.positions()
    }

    pub fn velocities(&self) -> &[Vec2] {
        self.particles.velocities()
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Size of the grid, in cells.
    pub fn size(&self) -> UVec2 {
        self.grid.grid_size
    }

    pub fn spacing(&self) -> f32 {
        self.grid.spacing
    }

    pub fn boundary(&self) -> Vec2 {
        self.grid.boundary
    }

    /// Lower and upper corners of the boundary rectangle.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half = 0.5 * self.grid.boundary;
        (-half, half)
    }

    /// Type of cell `(x, y)`, or `None` outside the grid.
    pub fn cell_type(&self, x: usize, y: usize) -> Option<CellType> {
        self.grid.cell_type.get((x, y)).copied()
    }

    pub fn cell_velocity(&self, x: usize, y: usize) -> Option<Vec2> {
        self.grid.velocity.get((x, y)).copied()
    }

    /// Grid velocity magnitudes, for visualisation.
    pub fn cell_speeds(&self) -> Array2<f32> {
        self.grid.cell_speeds()
    }

    /// Pressure accumulated by the latest projection.
    pub fn pressure(&self) -> &Array2<f32> {
        &self.grid.pressure
    }

    pub fn densities(&self) -> &Array2<f32> {
        &self.grid.densities
    }

    pub fn divergence(&self, x: usize, y: usize) -> f32 {
        self.grid.divergence(x, y)
    }

    pub fn max_divergence(&self) -> f32 {
        self.grid.max_divergence()
    }

    pub fn num_fluid_cells(&self) -> usize {
        self.grid.num_fluid_cells()
    }

    fn clamp_to_boundary(&mut self) {
        let (min, max) = self.bounds();
        self.particles.clamp_to_bounds(min, max);
    }

    /// Rebuilds the solid mask from the static cells and the obstacles covering cell centres.
    fn set_obstacles(&mut self, obstacles: &ObstacleSet) {
        self.grid.solid.assign(&self.static_solid);

        if obstacles.is_empty() {
            return;
        }

        let h = self.grid.spacing;
        let origin = -0.5 * self.grid.boundary;

        for ((i, j), solid) in self.grid.solid.indexed_iter_mut() {
            let p = origin + Vec2::new(i as f32 + 0.5, j as f32 + 0.5) * h;
            if obstacles.sdf(p).distance < 0.0 {
                *solid = true;
            }
        }
    }

    /// Moves particles inside obstacles back to the surface and drops their inward velocity.
    fn handle_obstacle_collisions(&mut self, obstacles: &ObstacleSet) {
        for (p, v) in self.particles.iter_mut() {
            let sdf = obstacles.sdf(*p);
            if sdf.distance >= 0.0 {
                continue;
            }

            *p -= sdf.distance * sdf.gradient;

            let vn = v.dot(sdf.gradient);
            if vn < 0.0 {
                *v -= vn * sdf.gradient;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlipFluid2DParams {
    /// Acceleration applied to every particle.
    pub gravity: Vec2,
    /// Blend between PIC (`0`) and FLIP (`1`). Clamped to `[0, 1]`.
    pub flip_ratio: f32,
    /// Scale of the grid-to-particle weight denominator.
    pub gtop_relaxation: f32,
    pub num_pressure_iters: usize,
    /// Push-apart iterations per step.
    pub num_particle_iters: usize,
    pub over_relaxation: f32,
    pub separate_particles: bool,
    /// Counteract volume loss by pushing fluid out of over-dense cells.
    pub compensate_drift: bool,
    pub density_stiffness: f32,
    /// Velocity components beyond this bound are treated as solver instability and clamped.
    pub velocity_limit: f32,
}

impl Default for FlipFluid2DParams {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8),
            flip_ratio: 0.9,
            gtop_relaxation: 1.0,
            num_pressure_iters: 100,
            num_particle_iters: 3,
            over_relaxation: 1.9,
            separate_particles: true,
            compensate_drift: false,
            density_stiffness: 1.0,
            velocity_limit: 20.0,
        }
    }
}

impl FlipFluid2DParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            let value = if self.gravity.x.is_finite() { self.gravity.y } else { self.gravity.x };
            return Err(ConfigError::InvalidParameter { name: "gravity", value });
        }

        if !self.flip_ratio.is_finite() {
            return Err(ConfigError::InvalidParameter { name: "flip_ratio", value: self.flip_ratio });
        }

        if !self.gtop_relaxation.is_finite() || self.gtop_relaxation <= 0.0 {
            return Err(ConfigError::InvalidParameter { name: "gtop_relaxation", value: self.gtop_relaxation });
        }

        if !self.over_relaxation.is_finite() || self.over_relaxation <= 0.0 || self.over_relaxation >= 2.0 {
            return Err(ConfigError::InvalidParameter { name: "over_relaxation", value: self.over_relaxation });
        }

        if !self.density_stiffness.is_finite() || self.density_stiffness < 0.0 {
            return Err(ConfigError::InvalidParameter { name: "density_stiffness", value: self.density_stiffness });
        }

        if self.velocity_limit.is_nan() || self.velocity_limit <= 0.0 {
            return Err(ConfigError::InvalidParameter { name: "velocity_limit", value: self.velocity_limit });
        }

        Ok(())
    }
}

impl Fluid for FlipFluid2D {
    type Params = FlipFluid2DParams;

    fn step(&mut self, dt: f32, params: &Self::Params, obstacles: &ObstacleSet) -> Result<StepStatus, SimulationError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimulationError::InvalidTimeStep(dt));
        }

        params.validate()?;

        self.set_obstacles(obstacles);

        self.particles.integrate(dt, params.gravity);
        self.clamp_to_boundary();

        if params.separate_particles {
            self.push_particles_apart(params.num_particle_iters);
        }

        if !obstacles.is_empty() {
            self.handle_obstacle_collisions(obstacles);
            self.clamp_to_boundary();
        }

        transfer_velocities_to_grid(&self.particles, &mut self.grid);

        let drift_stiffness = if params.compensate_drift {
            update_particle_density(&self.particles, &mut self.grid);
            Some(params.density_stiffness)
        } else {
            None
        };

        solve_incompressibility(
            &mut self.grid,
            params.num_pressure_iters,
            dt,
            self.density,
            params.over_relaxation,
            drift_stiffness,
        );

        transfer_velocities_to_particles(&mut self.particles, &self.grid, params.flip_ratio, params.gtop_relaxation);

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "{} fluid cells, residual divergence {}",
                self.grid.num_fluid_cells(),
                self.grid.max_divergence(),
            );
        }

        let clamped = self.particles.clamp_velocities(params.velocity_limit);
        if clamped > 0 {
            log::warn!(
                "clamped the velocity of {clamped} particles to {}, the solver is likely unstable",
                params.velocity_limit,
            );
            return Ok(StepStatus::Diverged { clamped });
        }

        Ok(StepStatus::Stable)
    }

    fn particle_radius(&self) -> f32 {
        self.particles.radius()
    }
}
