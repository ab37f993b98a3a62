use glam::Vec2;

use super::{Obstacle, Sdf};

#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub position: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Circle {
            position: pos,
            radius,
        }
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.position = pos;
    }
}

impl Obstacle for Circle {
    fn sdf(&self, p: Vec2) -> Sdf {
        let offset = p - self.position;
        let d = offset.length();

        Sdf {
            distance: d - self.radius,
            // The centre has no preferred direction; push upwards.
            gradient: offset.try_normalize().unwrap_or(Vec2::Y),
        }
    }
}
