use obstacle::ObstacleSet;

pub mod config;
pub mod error;
pub mod flip;
pub mod obstacle;
pub mod scene;

pub use config::FluidConfig;
pub use error::{ConfigError, SimulationError};
pub use flip::{CellType, StepStatus};

pub trait Fluid {
    type Params;

    fn step(&mut self, dt: f32, params: &Self::Params, obstacles: &ObstacleSet) -> Result<StepStatus, SimulationError>;

    fn particle_radius(&self) -> f32;
}
