use super::{grid::Grid, particles::ParticleSet, spatial_hash::SpatialHash};

/// Pushes overlapping particles apart until no pair within the same 3×3 block of cells is
/// closer than two particle radii, or `num_iters` sweeps have run.
///
/// Only positions change. Coincident pairs have no push direction and are left alone.
pub fn push_particles_apart(
    particles: &mut ParticleSet,
    grid: &Grid,
    hash: &mut SpatialHash,
    num_iters: usize,
) {
    if particles.is_empty() || num_iters == 0 {
        return;
    }

    hash.build(particles, grid);

    let min_dist = 2.0 * particles.radius();
    let min_dist2 = min_dist * min_dist;
    let nx = grid.nx as isize;
    let ny = grid.ny as isize;

    for _iter in 0..num_iters {
        for i in 0..particles.len() {
            let p = particles.position(i);

            let pi = grid.to_grid(p).floor();
            let (px, py) = (pi.x as isize, pi.y as isize);
            let x0 = (px - 1).clamp(0, nx - 1) as usize;
            let x1 = (px + 1).clamp(0, nx - 1) as usize;
            let y0 = (py - 1).clamp(0, ny - 1) as usize;
            let y1 = (py + 1).clamp(0, ny - 1) as usize;

            for xi in x0..=x1 {
                for yi in y0..=y1 {
                    for &id in hash.cell_particles(xi, yi) {
                        if id == i {
                            continue;
                        }

                        let p = particles.position(i);
                        let q = particles.position(id);
                        let mut delta = q - p;
                        let d2 = delta.length_squared();
                        if d2 > min_dist2 || d2 == 0.0 {
                            continue;
                        }

                        let d = d2.sqrt();
                        let s = 0.5 * (min_dist - d) / d;
                        delta *= s;

                        particles.displace(i, -delta);
                        particles.displace(id, delta);
                    }
                }
            }
        }
    }
}
