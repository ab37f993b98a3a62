use glam::Vec2;
use ndarray::azip;

use super::{grid::Grid, particles::ParticleSet, CellType};

/// Upper bound of the fractional offset inside a cell, keeping the far corners from taking the
/// whole weight at a cell border.
const MAX_FRACTION: f32 = 0.98;

/// Bilinear stencil of a particle over the four corners of its base cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stencil {
    /// Corners `(Xc, Yc)`, `(Xc+1, Yc)`, `(Xc, Yc+1)` and `(Xc+1, Yc+1)`.
    pub corners: [(isize, isize); 4],
    pub weights: [f32; 4],
}

impl Stencil {
    pub fn new(grid: &Grid, pos: Vec2) -> Self {
        let base = grid.cell_of(pos);
        let t = (grid.to_grid(pos) - base.as_vec2()).clamp(Vec2::ZERO, Vec2::splat(MAX_FRACTION));
        let s = 1.0 - t;

        let (x, y) = (base.x as isize, base.y as isize);

        Self {
            corners: [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)],
            weights: [s.x * s.y, t.x * s.y, s.x * t.y, t.x * t.y],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ((isize, isize), f32)> + '_ {
        self.corners.iter().copied().zip(self.weights.iter().copied())
    }
}

/// Classifies cells by occupancy and scatters particle velocities onto the grid.
///
/// Every grid velocity ends up as the weighted average of the particle velocities that touched
/// it, or zero where nothing did.
pub fn transfer_velocities_to_grid(particles: &ParticleSet, grid: &mut Grid) {
    grid.reset();

    for p in particles.positions() {
        let pi = grid.cell_of(*p);
        let cell = (pi.x as usize, pi.y as usize);

        if grid.cell_type[cell] == CellType::Air {
            grid.cell_type[cell] = CellType::Fluid;
        }
    }

    for (&pos, &vel) in particles.iter() {
        let stencil = Stencil::new(grid, pos);

        for ((x, y), w) in stencil.iter() {
            if !grid.in_bounds(x, y) {
                continue;
            }

            let cell = (x as usize, y as usize);
            grid.velocity[cell] += vel * w;
            grid.weight[cell] += Vec2::splat(w);
        }
    }

    azip!((vel in &mut grid.velocity, &w in &grid.weight) {
        if w.x > 0.0 {
            vel.x /= w.x;
        }

        if w.y > 0.0 {
            vel.y /= w.y;
        }
    });
}

/// Gathers grid velocities back onto the particles, blending PIC and FLIP.
///
/// Only corners inside the grid that are not `Air` or `Solid` contribute. Particles without a
/// single valid corner keep their velocity. `flip_ratio` is clamped to `[0, 1]`, where `1` is
/// pure FLIP and `0` pure PIC.
pub fn transfer_velocities_to_particles(
    particles: &mut ParticleSet,
    grid: &Grid,
    flip_ratio: f32,
    relaxation: f32,
) {
    let flip_ratio = flip_ratio.clamp(0.0, 1.0);

    for i in 0..particles.len() {
        let stencil = Stencil::new(grid, particles.position(i));

        let mut d = 0.0;
        let mut vel = Vec2::ZERO;
        let mut delta = Vec2::ZERO;

        for ((x, y), w) in stencil.iter() {
            if !grid.is_valid(x, y, false) {
                continue;
            }

            let cell = (x as usize, y as usize);
            d += w;
            vel += w * grid.velocity[cell];
            delta += w * (grid.velocity[cell] - grid.prev_velocity[cell]);
        }

        if d <= 0.0 {
            continue;
        }

        let d = d * relaxation;
        let v = particles.velocity(i);

        let picv = vel / d;
        let flipv = v + delta / d;

        particles.set_velocity(i, flip_ratio * flipv + (1.0 - flip_ratio) * picv);
    }
}
