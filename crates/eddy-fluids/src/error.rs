use thiserror::Error;

/// Rejected initialization input or tunable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("boundary size must be positive and finite, got {0:?}")]
    NonPositiveBoundary([f32; 2]),
    #[error("cell size must be positive and finite, got {0}")]
    NonPositiveCellSize(f32),
    #[error("cell size {cell_size} yields too many cells for boundary {boundary:?}")]
    DegenerateGrid {
        cell_size: f32,
        boundary: [f32; 2],
    },
    #[error("particle radius must be positive and finite, got {0}")]
    NonPositiveParticleRadius(f32),
    #[error("invalid value {value} for parameter `{name}`")]
    InvalidParameter {
        name: &'static str,
        value: f32,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),
    #[error(transparent)]
    InvalidParams(#[from] ConfigError),
}
