use super::{grid::Grid, CellType};

/// Gauss-Seidel projection of the grid velocities towards zero divergence in fluid cells.
///
/// Sweeps the interior cells in place for exactly `num_iters` iterations; the boundary ring is
/// never solved directly. Faces towards `Air` stay open, faces towards `Solid` cells are closed.
/// The pressure field is accumulated for diagnostics only.
///
/// With `drift_stiffness` set and a measured rest density, compressed cells get an extra
/// outward flux proportional to their excess density.
pub fn solve_incompressibility(
    grid: &mut Grid,
    num_iters: usize,
    dt: f32,
    density: f32,
    over_relaxation: f32,
    drift_stiffness: Option<f32>,
) {
    grid.pressure.fill(0.0);
    grid.snapshot_velocities();

    let cp = density * grid.spacing / dt;

    for _iter in 0..num_iters {
        for i in 1..grid.nx.saturating_sub(1) {
            for j in 1..grid.ny.saturating_sub(1) {
                if grid.cell_type[(i, j)] != CellType::Fluid {
                    continue;
                }

                let center = (i, j);
                let right = (i + 1, j);
                let top = (i, j + 1);

                let (x, y) = (i as isize, j as isize);
                let sx0 = grid.validity(x - 1, y, true);
                let sx1 = grid.validity(x + 1, y, true);
                let sy0 = grid.validity(x, y - 1, true);
                let sy1 = grid.validity(x, y + 1, true);
                let s = sx0 + sx1 + sy0 + sy1;

                if s == 0.0 {
                    continue;
                }

                let mut div = sx1 * grid.velocity[right].x - sx0 * grid.velocity[center].x
                    + sy1 * grid.velocity[top].y - sy0 * grid.velocity[center].y;

                if let Some(k) = drift_stiffness {
                    if grid.rest_density > 0.0 {
                        let compression = grid.densities[center] - grid.rest_density;
                        if compression > 0.0 {
                            div -= k * compression;
                        }
                    }
                }

                let mut p = -div / s;
                p *= over_relaxation;
                grid.pressure[center] += cp * p;

                grid.velocity[center].x -= sx0 * p;
                grid.velocity[right].x += sx1 * p;
                grid.velocity[center].y -= sy0 * p;
                grid.velocity[top].y += sy1 * p;
            }
        }
    }
}
