use super::{
    flip::{FlipFluid2D, FlipFluid2DParams, StepStatus},
    obstacle::{Obstacle, ObstacleId, ObstacleSet},
    ConfigError, Fluid, SimulationError,
};

pub struct Scene<F: Fluid> {
    /// The fluid for this scene.
    pub fluid: F,
    /// The parameters for this scene's fluid.
    params: F::Params,
    /// The obstacles in this scene.
    obstacles: ObstacleSet,
    /// The number of obstacles (used for IDs).
    n_obstacles: usize,
}

impl<F: Fluid> Scene<F> {
    #[inline(always)]
    pub fn new(fluid: F, params: F::Params) -> Self {
        Self {
            fluid,
            params,
            obstacles: ObstacleSet::default(),
            n_obstacles: 0,
        }
    }

    pub fn params(&self) -> &F::Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut F::Params {
        &mut self.params
    }

    /// Adds an obstacle to the set, returning its ID.
    pub fn add_obstacle<T: Obstacle + 'static>(&mut self, obstacle: T) -> ObstacleId {
        let i = self.n_obstacles;
        self.n_obstacles += 1;

        self.obstacles.obstacles.insert(i, Box::new(obstacle));
        ObstacleId(i)
    }

    /// Removes an obstacle from the set, given its ID.
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Option<Box<dyn Obstacle>> {
        self.obstacles.obstacles.remove(&id.0)
    }

    /// Insert an obstacle into the set at the given ID, overriding and returning the old value if
    /// it was previously in the set.
    pub fn insert_obstacle<T: Obstacle + 'static>(&mut self, id: ObstacleId, obstacle: T) -> Option<Box<dyn Obstacle>> {
        self.obstacles.obstacles.insert(id.0, Box::new(obstacle))
    }

    /// Advances the simulation by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> Result<StepStatus, SimulationError> {
        self.fluid.step(
            dt,
            &self.params,
            &self.obstacles,
        )
    }
}

impl Scene<FlipFluid2D> {
    /// Validates the parameters before building the scene.
    pub fn flip_2d(fluid: FlipFluid2D, params: FlipFluid2DParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self::new(fluid, params))
    }
}
