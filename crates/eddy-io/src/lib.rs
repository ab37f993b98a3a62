use std::io::Write;

use encode::{EncodingError, FluidFrameEncoder};
use glam::{UVec2, Vec2};
use eddy_fluids::{flip::FlipFluid2D, Fluid};

pub mod encode;
pub mod decode;
pub mod as_bytes;

/// Static description of a recorded fluid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidLayout {
    pub particle_radius: f32,
    /// Extent of the boundary rectangle.
    pub boundary: Vec2,
    /// Grid size, in cells.
    pub resolution: UVec2,
    /// Cell size.
    pub spacing: f32,
}

pub trait EncodeFluid {
    fn layout(&self) -> FluidLayout;

    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError>;
}

impl EncodeFluid for FlipFluid2D {
    fn layout(&self) -> FluidLayout {
        FluidLayout {
            particle_radius: self.particle_radius(),
            boundary: self.boundary(),
            resolution: self.size(),
            spacing: self.spacing(),
        }
    }

    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError> {
        let speeds = self.cell_speeds();

        encoder.encode_section(self.num_particles(), self.iter_positions().copied())?;
        encoder.encode_section(speeds.len(), speeds.iter().copied())?;
        encoder.encode_section(self.pressure().len(), self.pressure().iter().copied())?;

        Ok(())
    }
}
