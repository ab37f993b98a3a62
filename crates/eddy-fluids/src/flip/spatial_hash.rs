use super::{grid::Grid, particles::ParticleSet};

/// Dense cell→particle index built with a counting sort over the grid's cells.
///
/// The index reflects the particle positions at the time of [`SpatialHash::build`] and must be
/// rebuilt once positions move on.
#[derive(Debug, Clone, Default)]
pub struct SpatialHash {
    /// Number of particles per cell.
    cell_particle_count: Vec<usize>,
    /// Offset of each cell's first particle in `cell_particle_indices`, plus a trailing guard.
    first_cell_particle: Vec<usize>,
    /// Particle ids ordered by cell.
    cell_particle_indices: Vec<usize>,
    ny: usize,
}

impl SpatialHash {
    pub fn new(grid: &Grid, n_particles: usize) -> Self {
        Self {
            cell_particle_count: vec![0; grid.num_cells()],
            first_cell_particle: vec![0; grid.num_cells() + 1],
            cell_particle_indices: vec![0; n_particles],
            ny: grid.ny,
        }
    }

    pub fn build(&mut self, particles: &ParticleSet, grid: &Grid) {
        let num_cells = grid.num_cells();
        self.ny = grid.ny;
        self.cell_particle_count.resize(num_cells, 0);
        self.first_cell_particle.resize(num_cells + 1, 0);
        self.cell_particle_indices.resize(particles.len(), 0);

        self.cell_particle_count.fill(0);
        self.first_cell_particle.fill(0);

        for p in particles.positions() {
            let pi = grid.cell_of(*p);
            let cell_nr = pi.x as usize * self.ny + pi.y as usize;
            self.cell_particle_count[cell_nr] += 1;
        }

        let mut first = 0;

        for (count, first_cell) in self.cell_particle_count.iter().zip(self.first_cell_particle.iter_mut()) {
            first += count;
            *first_cell = first;
        }

        self.first_cell_particle[num_cells] = first;

        for (i, p) in particles.positions().iter().enumerate() {
            let pi = grid.cell_of(*p);
            let cell_nr = pi.x as usize * self.ny + pi.y as usize;
            self.first_cell_particle[cell_nr] -= 1;
            self.cell_particle_indices[self.first_cell_particle[cell_nr]] = i;
        }
    }

    /// Ids of the particles in cell `(x, y)`.
    #[inline]
    pub fn cell_particles(&self, x: usize, y: usize) -> &[usize] {
        let cell_nr = x * self.ny + y;
        let first = self.first_cell_particle[cell_nr];
        let last = self.first_cell_particle[cell_nr + 1];
        &self.cell_particle_indices[first..last]
    }

    pub fn cell_count(&self, x: usize, y: usize) -> usize {
        self.cell_particle_count[x * self.ny + y]
    }
}
