use glam::Vec2;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Fixed-size structure-of-arrays particle storage. A particle's identity is its index.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    /// Particle positions.
    positions: Vec<Vec2>,
    /// Particle velocities.
    velocities: Vec<Vec2>,
    /// Radius shared by all particles.
    radius: f32,
}

impl ParticleSet {
    /// Creates particles at rest at the given positions.
    pub fn from_positions(positions: Vec<Vec2>, radius: f32) -> Self {
        let velocities = vec![Vec2::ZERO; positions.len()];

        Self {
            positions,
            velocities,
            radius,
        }
    }

    /// Spawns `count` particles uniformly inside a disc.
    pub fn spawn_disc(count: usize, center: Vec2, spawn_radius: f32, radius: f32, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);

        let positions = std::iter::repeat_with(|| {
            // Square root keeps the area density uniform.
            let r = spawn_radius * rng.gen::<f32>().sqrt();
            let theta = rng.gen_range(0.0..std::f32::consts::TAU);
            center + r * Vec2::from_angle(theta)
        })
        .take(count)
        .collect();

        Self::from_positions(positions, radius)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec2 {
        self.positions[i]
    }

    #[inline]
    pub fn velocity(&self, i: usize) -> Vec2 {
        self.velocities[i]
    }

    #[inline]
    pub fn set_velocity(&mut self, i: usize, vel: Vec2) {
        self.velocities[i] = vel;
    }

    #[inline]
    pub fn displace(&mut self, i: usize, delta: Vec2) {
        self.positions[i] += delta;
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Vec2, &Vec2)> {
        self.positions.iter().zip(self.velocities.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&mut Vec2, &mut Vec2)> {
        self.positions.iter_mut().zip(self.velocities.iter_mut())
    }

    /// Applies gravity and advances positions by one explicit Euler step.
    pub fn integrate(&mut self, dt: f32, gravity: Vec2) {
        for (p, v) in self.iter_mut() {
            *v += dt * gravity;
            *p += *v * dt;
        }
    }

    /// Clamps every particle into the rectangle `[min, max]`.
    ///
    /// The velocity component along a clamped axis is zeroed.
    pub fn clamp_to_bounds(&mut self, min: Vec2, max: Vec2) {
        for (p, v) in self.iter_mut() {
            if p.x < min.x {
                p.x = min.x;
                v.x = 0.0;
            }

            if p.x > max.x {
                p.x = max.x;
                v.x = 0.0;
            }

            if p.y < min.y {
                p.y = min.y;
                v.y = 0.0;
            }

            if p.y > max.y {
                p.y = max.y;
                v.y = 0.0;
            }
        }
    }

    /// Clamps velocity components to `[-limit, limit]`, returning how many particles changed.
    pub fn clamp_velocities(&mut self, limit: f32) -> usize {
        let mut clamped = 0;

        for v in self.velocities.iter_mut() {
            let c = v.clamp(Vec2::splat(-limit), Vec2::splat(limit));
            if c != *v {
                *v = c;
                clamped += 1;
            }
        }

        clamped
    }
}

#[cfg(test)]
mod tests {
    use more_asserts::assert_le;

    use super::*;

    #[test]
    fn spawn_stays_inside_disc() {
        let center = Vec2::new(5.0, -2.0);
        let particles = ParticleSet::spawn_disc(200, center, 1.5, 0.1, 7);

        assert_eq!(particles.len(), 200);
        for (p, v) in particles.iter() {
            assert_le!(p.distance(center), 1.5 + 1e-5);
            assert_eq!(*v, Vec2::ZERO);
        }
    }

    #[test]
    fn spawn_is_deterministic_per_seed() {
        let a = ParticleSet::spawn_disc(10, Vec2::ZERO, 1.0, 0.1, 3);
        let b = ParticleSet::spawn_disc(10, Vec2::ZERO, 1.0, 0.1, 3);
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn integrate_applies_gravity_then_moves() {
        let mut particles = ParticleSet::from_positions(vec![Vec2::ZERO], 0.1);
        particles.integrate(0.5, Vec2::new(0.0, -2.0));

        assert_eq!(particles.velocity(0), Vec2::new(0.0, -1.0));
        assert_eq!(particles.position(0), Vec2::new(0.0, -0.5));
    }

    #[test]
    fn clamping_zeroes_velocity_instead_of_reflecting() {
        let mut particles = ParticleSet::from_positions(vec![Vec2::new(6.0, -1.0)], 0.1);
        particles.set_velocity(0, Vec2::new(3.0, 2.0));
        particles.clamp_to_bounds(Vec2::splat(-5.0), Vec2::splat(5.0));

        assert_eq!(particles.position(0), Vec2::new(5.0, -1.0));
        assert_eq!(particles.velocity(0), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn velocity_clamp_counts_particles() {
        let mut particles = ParticleSet::from_positions(vec![Vec2::ZERO; 3], 0.1);
        particles.set_velocity(0, Vec2::new(0.0, 25.0));
        particles.set_velocity(1, Vec2::new(-30.0, -30.0));
        particles.set_velocity(2, Vec2::new(1.0, 1.0));

        assert_eq!(particles.clamp_velocities(20.0), 2);
        assert_eq!(particles.velocity(0), Vec2::new(0.0, 20.0));
        assert_eq!(particles.velocity(1), Vec2::new(-20.0, -20.0));
        assert_eq!(particles.velocity(2), Vec2::new(1.0, 1.0));
    }
}
