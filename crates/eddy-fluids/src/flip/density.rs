use glam::Vec2;
use ndarray::azip;

use super::{grid::Grid, particles::ParticleSet, CellType};

/// Splats particle counts onto cell centres and measures the rest density the first time there
/// are fluid cells to average over.
pub fn update_particle_density(particles: &ParticleSet, grid: &mut Grid) {
    grid.densities.fill(0.0);

    let max = (grid.grid_size - 1).as_vec2();

    for p in particles.positions() {
        let g = (grid.to_grid(*p) - 0.5).clamp(Vec2::ZERO, max);

        let p0 = g.floor().as_uvec2();
        let t = g - p0.as_vec2();
        let p1 = (p0 + 1).min(grid.grid_size - 1);
        let s = 1.0 - t;

        let (x0, y0) = (p0.x as usize, p0.y as usize);
        let (x1, y1) = (p1.x as usize, p1.y as usize);

        grid.densities[(x0, y0)] += s.x * s.y;
        grid.densities[(x1, y0)] += t.x * s.y;
        grid.densities[(x1, y1)] += t.x * t.y;
        grid.densities[(x0, y1)] += s.x * t.y;
    }

    if grid.rest_density == 0.0 {
        let mut sum: f32 = 0.0;
        let mut num_fluid_cells: usize = 0;

        azip!((&cell_type in &grid.cell_type, &density in &grid.densities) {
            if cell_type == CellType::Fluid {
                sum += density;
                num_fluid_cells += 1;
            }
        });

        if num_fluid_cells > 0 {
            grid.rest_density = sum / num_fluid_cells as f32;
            log::debug!("measured rest density {} over {num_fluid_cells} fluid cells", grid.rest_density);
        }
    }
}
