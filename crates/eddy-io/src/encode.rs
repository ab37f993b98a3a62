use std::{fs::File, io::{BufWriter, Write}, path::PathBuf};

use thiserror::Error;

use eddy_fluids::{scene::Scene, Fluid};

use crate::EncodeFluid;

use super::as_bytes::AsBytes;

/// Writes a recording as a directory holding a `_meta` file and one `.dat` file per frame.
pub struct FluidDataEncoder {
    /// The path to the directory into which the fluid data will be placed.
    path: PathBuf,
    num_frames: u64,
    fps: u32,
    current_frame: u64,
}

impl FluidDataEncoder {
    pub fn new(path: PathBuf, num_frames: u64, fps: u32) -> Result<FluidDataEncoder, EncodingError> {
        std::fs::create_dir_all(&path)?;

        Ok(Self {
            path,
            num_frames,
            fps,
            current_frame: 0,
        })
    }

    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn encode_metadata<F>(&mut self, scene: &Scene<F>) -> Result<(), EncodingError>
    where
        F: Fluid + EncodeFluid,
    {
        let path = self.path.join("_meta");
        let mut writer = BufWriter::new(File::create(path)?);
        let layout = scene.fluid.layout();

        writer.write_all(&2u8.to_bytes())?;
        writer.write_all(&self.fps.to_bytes())?;
        writer.write_all(&self.num_frames.to_bytes())?;
        writer.write_all(&layout.particle_radius.to_bytes())?;
        writer.write_all(&layout.boundary.to_bytes())?;
        writer.write_all(&layout.resolution.x.to_bytes())?;
        writer.write_all(&layout.resolution.y.to_bytes())?;
        writer.write_all(&layout.spacing.to_bytes())?;
        writer.flush()?;

        log::debug!("wrote metadata for {} frames at {} fps to {:?}", self.num_frames, self.fps, self.path);

        Ok(())
    }

    pub fn encode_frame<F>(&mut self, scene: &Scene<F>) -> Result<(), EncodingError>
    where
        F: Fluid + EncodeFluid,
    {
        let path = frame_path(&self.path, self.num_frames, self.current_frame);
        let writer = BufWriter::new(File::create(path)?);

        let mut encoder = FluidFrameEncoder { writer };
        scene.fluid.encode_state(&mut encoder)?;
        encoder.writer.flush()?;

        self.current_frame += 1;

        Ok(())
    }
}

/// Path of a frame file, zero-padded to the width of the last frame number.
pub(crate) fn frame_path(dir: &std::path::Path, num_frames: u64, frame: u64) -> PathBuf {
    let max_digits = num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) + 1;
    let zeros = max_digits.saturating_sub(frame.checked_ilog10().unwrap_or(0) + 1);

    dir.join(format!("{}{frame}.dat", "0".repeat(zeros as usize)))
}

pub struct FluidFrameEncoder<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FluidFrameEncoder<W> {
    /// Writes `len` followed by the bytes of each value.
    pub fn encode_section<const N: usize, T, I>(&mut self, len: usize, values: I) -> Result<(), EncodingError>
    where
        I: Iterator<Item = T>,
        T: AsBytes<N>,
    {
        self.writer.write_all(&(len as u64).to_bytes())?;

        let bytes: Vec<_> = values.flat_map(|v| v.to_bytes()).collect();
        self.writer.write_all(&bytes)?;

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
