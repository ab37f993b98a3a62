pub mod flip_2d;
pub mod grid;
pub mod particles;
pub mod spatial_hash;
pub mod separate;
pub mod transfer;
pub mod pressure;
pub mod density;

pub use flip_2d::{FlipFluid2D, FlipFluid2DParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Fluid,
    Solid,
    Air,
}

/// Outcome of a single simulation step.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Stable,
    /// Particle velocities exceeded the instability threshold and were clamped.
    Diverged {
        /// Number of particles whose velocity was clamped.
        clamped: usize,
    },
}

impl StepStatus {
    pub fn is_stable(&self) -> bool {
        matches!(self, StepStatus::Stable)
    }
}
