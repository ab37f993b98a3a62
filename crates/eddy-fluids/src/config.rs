use glam::{UVec2, Vec2};

use crate::ConfigError;

/// Upper bound on `nx * ny`.
pub const MAX_CELLS: usize = 1 << 26;

/// Initialization input for a [`FlipFluid2D`](crate::flip::flip_2d::FlipFluid2D).
#[derive(Debug, Clone, PartialEq)]
pub struct FluidConfig {
    /// Extent of the boundary rectangle, centred on the origin.
    pub boundary: Vec2,
    /// Desired cell size. The actual cell size is derived from the resulting resolution.
    pub cell_size: f32,
    /// Number of particles spawned at initialization.
    pub num_particles: usize,
    /// Radius shared by every particle.
    pub particle_radius: f32,
    /// Centre of the spawn disc.
    pub spawn_center: Vec2,
    /// Radius of the spawn disc.
    pub spawn_radius: f32,
    /// Seed for the spawn generator.
    pub seed: u64,
    /// Push-apart iterations run once right after spawning.
    pub settle_iters: usize,
    /// The density of the fluid, in kg/m³.
    ///
    /// Water is `1000` kg/m³.
    pub density: f32,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            boundary: Vec2::new(20.0, 20.0),
            cell_size: 1.0,
            num_particles: 50,
            particle_radius: 0.25,
            spawn_center: Vec2::new(5.0, 5.0),
            spawn_radius: 1.0,
            seed: 0,
            settle_iters: 3,
            density: 1000.0,
        }
    }
}

impl FluidConfig {
    /// Derives the particle radius from the scale of a reference shape, whose scale is its
    /// diameter.
    pub fn with_reference_scale(mut self, scale: f32) -> Self {
        self.particle_radius = 0.5 * scale;
        self
    }

    /// Number of cells along each axis.
    pub fn resolution(&self) -> Result<UVec2, ConfigError> {
        if !self.boundary.is_finite() || self.boundary.min_element() <= 0.0 {
            return Err(ConfigError::NonPositiveBoundary(self.boundary.into()));
        }

        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::NonPositiveCellSize(self.cell_size));
        }

        let cells = (self.boundary / self.cell_size).round().max(Vec2::ONE);
        if !cells.is_finite() || cells.x * cells.y > MAX_CELLS as f32 {
            return Err(ConfigError::DegenerateGrid {
                cell_size: self.cell_size,
                boundary: self.boundary.into(),
            });
        }

        Ok(cells.as_uvec2())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolution()?;

        if !self.particle_radius.is_finite() || self.particle_radius <= 0.0 {
            return Err(ConfigError::NonPositiveParticleRadius(self.particle_radius));
        }

        if !self.spawn_radius.is_finite() || self.spawn_radius < 0.0 {
            return Err(ConfigError::InvalidParameter { name: "spawn_radius", value: self.spawn_radius });
        }

        if !self.spawn_center.is_finite() {
            let value = if self.spawn_center.x.is_finite() { self.spawn_center.y } else { self.spawn_center.x };
            return Err(ConfigError::InvalidParameter { name: "spawn_center", value });
        }

        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(ConfigError::InvalidParameter { name: "density", value: self.density });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_rounds_to_nearest_cell_count() {
        let config = FluidConfig {
            boundary: Vec2::new(10.0, 4.0),
            cell_size: 1.0,
            ..Default::default()
        };

        assert_eq!(config.resolution(), Ok(UVec2::new(10, 4)));
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        let config = FluidConfig { cell_size: 0.0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveCellSize(0.0)));

        let config = FluidConfig { cell_size: -1.0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveCellSize(-1.0)));

        let config = FluidConfig { boundary: Vec2::new(0.0, 3.0), ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveBoundary([0.0, 3.0])));
    }

    #[test]
    fn oversized_cells_yield_a_single_cell() {
        let config = FluidConfig {
            boundary: Vec2::new(1.0, 1.0),
            cell_size: 5.0,
            ..Default::default()
        };

        assert_eq!(config.resolution(), Ok(UVec2::new(1, 1)));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn huge_grids_are_rejected() {
        let config = FluidConfig {
            boundary: Vec2::new(1.0e6, 1.0e6),
            cell_size: 0.01,
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(ConfigError::DegenerateGrid { .. })));

        let config = FluidConfig {
            boundary: Vec2::new(8192.0, 8192.0),
            cell_size: 1.0,
            ..Default::default()
        };

        assert_eq!(config.resolution(), Ok(UVec2::new(8192, 8192)));
    }

    #[test]
    fn reference_scale_is_a_diameter() {
        let config = FluidConfig::default().with_reference_scale(0.3);
        assert_eq!(config.particle_radius, 0.15);
    }
}
