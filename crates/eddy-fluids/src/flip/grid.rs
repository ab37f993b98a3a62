use glam::{UVec2, Vec2};
use ndarray::{azip, Array2};

use super::CellType;

/// Fixed-resolution cell lattice.
///
/// Cells are stored with shape `(nx, ny)` in standard layout, so the flattened index of cell
/// `(x, y)` is `x * ny + y`. Velocities are staggered: the x-component of a cell lives on its
/// left face and the y-component on its bottom face.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Size of the boundary rectangle, in meters. The rectangle is centred on the origin.
    pub boundary: Vec2,
    /// Size of the grid, in cells.
    pub grid_size: UVec2,
    /// Number of cells in the X direction.
    pub nx: usize,
    /// Number of cells in the Y direction.
    pub ny: usize,
    /// Cell size.
    pub spacing: f32,
    /// 1.0 / spacing.
    pub inv_spacing: f32,

    /// Grid velocities.
    pub velocity: Array2<Vec2>,
    /// Grid velocities before the latest projection.
    pub prev_velocity: Array2<Vec2>,
    /// Accumulated interpolation weights.
    pub weight: Array2<Vec2>,
    /// Accumulated pressure of the latest projection.
    pub pressure: Array2<f32>,
    /// Static solid cells.
    pub solid: Array2<bool>,
    /// Grid cell types (`Fluid`, `Solid` or `Air`).
    pub cell_type: Array2<CellType>,
    /// Particle densities sampled at cell centres.
    pub densities: Array2<f32>,
    /// Mean fluid cell density once measured, `0.0` before that.
    pub rest_density: f32,
}

impl Grid {
    pub fn new(boundary: Vec2, grid_size: UVec2) -> Self {
        let nx = grid_size.x as usize;
        let ny = grid_size.y as usize;
        let h = f32::max(boundary.x / grid_size.x as f32, boundary.y / grid_size.y as f32);
        let shape = (nx, ny);

        Self {
            boundary,
            grid_size,
            nx,
            ny,
            spacing: h,
            inv_spacing: h.recip(),
            velocity: Array2::from_elem(shape, Vec2::ZERO),
            prev_velocity: Array2::from_elem(shape, Vec2::ZERO),
            weight: Array2::from_elem(shape, Vec2::ZERO),
            pressure: Array2::zeros(shape),
            solid: Array2::from_elem(shape, false),
            cell_type: Array2::from_elem(shape, CellType::Air),
            densities: Array2::zeros(shape),
            rest_density: 0.0,
        }
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.nx * self.ny
    }

    /// Flattened index of cell `(x, y)`, clamped into `[0, num_cells)`.
    ///
    /// Out-of-range coordinates alias to some boundary cell. Use [`Grid::in_bounds`] or
    /// [`Grid::is_valid`] where exactness matters.
    #[inline]
    pub fn cell_index(&self, x: isize, y: isize) -> usize {
        let idx = x * self.ny as isize + y;
        idx.clamp(0, self.num_cells() as isize - 1) as usize
    }

    /// Inverse of the flattened index.
    #[inline]
    pub fn cell_coords(&self, idx: usize) -> (usize, usize) {
        (idx / self.ny, idx % self.ny)
    }

    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.nx && (y as usize) < self.ny
    }

    /// Whether cell `(x, y)` can exchange velocity with its neighbours.
    ///
    /// Out-of-range and `Solid` cells are never valid. `Air` cells are valid only when
    /// `air_is_valid` is set.
    pub fn is_valid(&self, x: isize, y: isize, air_is_valid: bool) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }

        match self.cell_type[(x as usize, y as usize)] {
            CellType::Fluid => true,
            CellType::Air => air_is_valid,
            CellType::Solid => false,
        }
    }

    #[inline]
    pub(crate) fn validity(&self, x: isize, y: isize, air_is_valid: bool) -> f32 {
        if self.is_valid(x, y, air_is_valid) { 1.0 } else { 0.0 }
    }

    /// Position relative to the lower-left corner of the boundary, in cells.
    #[inline]
    pub fn to_grid(&self, pos: Vec2) -> Vec2 {
        (pos + 0.5 * self.boundary) * self.inv_spacing
    }

    /// Cell containing `pos`, clamped to the grid.
    #[inline]
    pub fn cell_of(&self, pos: Vec2) -> UVec2 {
        let g = self.to_grid(pos).floor();
        // `as_uvec2` saturates negative values to zero.
        g.as_uvec2().min(self.grid_size - 1)
    }

    /// Clears the grid for a new particle-to-grid transfer.
    ///
    /// Velocities are snapshotted first, then every non-solid cell becomes `Air` and the
    /// velocity and weight accumulators are zeroed.
    pub fn reset(&mut self) {
        self.snapshot_velocities();

        azip!((cell_type in &mut self.cell_type, &s in &self.solid) {
            *cell_type = if s { CellType::Solid } else { CellType::Air };
        });

        self.velocity.fill(Vec2::ZERO);
        self.weight.fill(Vec2::ZERO);
    }

    #[inline]
    pub fn snapshot_velocities(&mut self) {
        self.prev_velocity.assign(&self.velocity);
    }

    /// Net flux out of cell `(x, y)` through its valid faces.
    ///
    /// Faces towards `Air` count as open, faces towards `Solid` cells or the domain edge as
    /// closed.
    pub fn divergence(&self, x: usize, y: usize) -> f32 {
        let (xi, yi) = (x as isize, y as isize);
        let sx0 = self.validity(xi - 1, yi, true);
        let sx1 = self.validity(xi + 1, yi, true);
        let sy0 = self.validity(xi, yi - 1, true);
        let sy1 = self.validity(xi, yi + 1, true);

        let center = self.velocity[(x, y)];
        let right = if x + 1 < self.nx { self.velocity[(x + 1, y)].x } else { 0.0 };
        let top = if y + 1 < self.ny { self.velocity[(x, y + 1)].y } else { 0.0 };

        sx1 * right - sx0 * center.x + sy1 * top - sy0 * center.y
    }

    /// Largest absolute divergence over all fluid cells.
    pub fn max_divergence(&self) -> f32 {
        self.cell_type
            .indexed_iter()
            .filter(|(_, cell_type)| **cell_type == CellType::Fluid)
            .map(|((x, y), _)| self.divergence(x, y).abs())
            .fold(0.0, f32::max)
    }

    pub fn num_fluid_cells(&self) -> usize {
        self.cell_type.iter().filter(|&&c| c == CellType::Fluid).count()
    }

    /// Magnitude of the grid velocity in every cell.
    pub fn cell_speeds(&self) -> Array2<f32> {
        self.velocity.map(|v| v.length())
    }
}
