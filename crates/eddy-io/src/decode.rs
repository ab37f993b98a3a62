use std::{fs::File, io::{BufReader, Read}, path::PathBuf};

use glam::{UVec2, Vec2};
use thiserror::Error;

use crate::{as_bytes::AsBytes, encode::frame_path, FluidLayout};

/// Reads back a recording written by [`FluidDataEncoder`](crate::encode::FluidDataEncoder).
pub struct FluidDataDecoder {
    /// The path to the directory into which the fluid data resides.
    path: PathBuf,
    num_frames: u64,
    current_frame: u64,
}

impl FluidDataDecoder {
    pub fn new(path: PathBuf) -> FluidDataDecoder {
        Self {
            path,
            num_frames: 0,
            current_frame: 0,
        }
    }

    fn read_value<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R) -> Result<T, DecodingError> {
        let mut bytes = [0; N];
        reader.read_exact(&mut bytes)?;

        Ok(T::from_bytes(bytes))
    }

    fn read_section<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R) -> Result<Vec<T>, DecodingError> {
        let len = Self::read_value::<8, u64, _>(reader)? as usize;
        (0..len).map(|_| Self::read_value::<N, T, _>(reader)).collect()
    }

    pub fn decode_metadata(&mut self) -> Result<FluidMetadata, DecodingError> {
        let path = self.path.join("_meta");
        let mut reader = BufReader::new(File::open(path)?);

        let dim = Self::read_value::<1, u8, _>(&mut reader)?;
        if dim != 2 {
            return Err(DecodingError::InvalidDimension(dim));
        }

        let fps = Self::read_value::<4, u32, _>(&mut reader)?;
        let num_frames = Self::read_value::<8, u64, _>(&mut reader)?;
        let particle_radius = Self::read_value::<4, f32, _>(&mut reader)?;
        let boundary = Self::read_value::<8, Vec2, _>(&mut reader)?;
        let resolution = UVec2::new(
            Self::read_value::<4, u32, _>(&mut reader)?,
            Self::read_value::<4, u32, _>(&mut reader)?,
        );
        let spacing = Self::read_value::<4, f32, _>(&mut reader)?;

        self.num_frames = num_frames;

        Ok(FluidMetadata {
            fps,
            num_frames,
            layout: FluidLayout {
                particle_radius,
                boundary,
                resolution,
                spacing,
            },
        })
    }

    /// Decodes the next frame, or `None` once every frame has been read.
    pub fn decode_frame(&mut self) -> Result<Option<FluidFrameData>, DecodingError> {
        if self.current_frame >= self.num_frames {
            return Ok(None)
        }

        let path = frame_path(&self.path, self.num_frames, self.current_frame);
        let mut reader = BufReader::new(File::open(path)?);

        let positions = Self::read_section::<8, Vec2, _>(&mut reader)?;
        let cell_speeds = Self::read_section::<4, f32, _>(&mut reader)?;
        let pressure = Self::read_section::<4, f32, _>(&mut reader)?;

        self.current_frame += 1;

        Ok(Some(FluidFrameData {
            positions,
            cell_speeds,
            pressure,
        }))
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FluidMetadata {
    pub fps: u32,
    pub num_frames: u64,
    pub layout: FluidLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FluidFrameData {
    /// Particle positions.
    pub positions: Vec<Vec2>,
    /// Grid velocity magnitudes, flattened as `x * ny + y`.
    pub cell_speeds: Vec<f32>,
    /// Pressure of the grid, flattened like `cell_speeds`.
    pub pressure: Vec<f32>,
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unsupported fluid dimension {0}")]
    InvalidDimension(u8),
}
