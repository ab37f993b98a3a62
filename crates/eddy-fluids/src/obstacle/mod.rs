use std::collections::HashMap;

use glam::Vec2;

pub mod circle;

/// A static obstacle, described by its signed distance field.
pub trait Obstacle {
    fn sdf(&self, p: Vec2) -> Sdf;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sdf {
    /// Signed distance to the surface, negative inside.
    pub distance: f32,
    /// Outward unit normal of the nearest surface point.
    pub gradient: Vec2,
}

impl Sdf {
    pub fn new(distance: f32, gradient: Vec2) -> Sdf {
        Sdf { distance, gradient }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObstacleId(pub usize);

#[derive(Default)]
pub struct ObstacleSet {
    pub obstacles: HashMap<usize, Box<dyn Obstacle>>,
}

impl ObstacleSet {
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl Obstacle for ObstacleSet {
    fn sdf(&self, p: Vec2) -> Sdf {
        let mut dist = f32::MAX;
        let mut gradient = Vec2::ZERO;

        for obstacle in self.obstacles.values() {
            let sd = obstacle.sdf(p);
            if dist > sd.distance {
                dist = sd.distance;
                gradient = sd.gradient;
            }
        }

        Sdf::new(dist, gradient)
    }
}
