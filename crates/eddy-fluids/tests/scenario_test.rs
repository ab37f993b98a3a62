//! Whole-frame scenarios driven through `Scene::advance`.

use eddy_fluids::{
    flip::{FlipFluid2D, FlipFluid2DParams},
    obstacle::{circle::Circle, Obstacle},
    scene::Scene,
    CellType, ConfigError, FluidConfig, SimulationError,
};
use glam::Vec2;
use more_asserts::{assert_ge, assert_le, assert_lt};

fn block_config() -> FluidConfig {
    FluidConfig {
        boundary: Vec2::new(10.0, 10.0),
        cell_size: 1.0,
        particle_radius: 0.1,
        ..Default::default()
    }
}

/// Centre of cell `(x, y)` on a 10×10 unit grid centred on the origin.
fn cell_centre(x: usize, y: usize) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - 5.0
}

#[test]
fn four_particle_block_single_frame() {
    let positions = vec![cell_centre(2, 2), cell_centre(2, 3), cell_centre(3, 2), cell_centre(3, 3)];
    let fluid = FlipFluid2D::from_positions(&block_config(), positions).unwrap();
    let params = FlipFluid2DParams {
        gravity: Vec2::new(0.0, -9.8),
        ..Default::default()
    };
    let mut scene = Scene::flip_2d(fluid, params).unwrap();

    let status = scene.advance(0.016).unwrap();
    assert!(status.is_stable());

    let fluid = &scene.fluid;
    assert_eq!(fluid.size().to_array(), [10, 10]);
    assert_eq!(fluid.spacing(), 1.0);

    for p in fluid.iter_positions() {
        assert_le!(p.x.abs(), 5.0);
        assert_le!(p.y.abs(), 5.0);
    }

    for x in 0..10 {
        for y in 0..10 {
            let expected = if (2..4).contains(&x) && (2..4).contains(&y) {
                CellType::Fluid
            } else {
                CellType::Air
            };
            assert_eq!(fluid.cell_type(x, y), Some(expected), "cell ({x}, {y})");
        }
    }

    for v in fluid.velocities() {
        assert!(v.x.abs() < 1e-5);
        assert!((v.y + 0.1568).abs() < 1e-4, "y velocity {}", v.y);
    }
}

#[test]
fn particle_count_and_containment_hold_over_many_frames() {
    let config = FluidConfig {
        boundary: Vec2::new(10.0, 10.0),
        cell_size: 0.5,
        num_particles: 400,
        particle_radius: 0.1,
        spawn_center: Vec2::new(-2.0, 2.0),
        spawn_radius: 2.0,
        seed: 11,
        ..Default::default()
    };
    let fluid = FlipFluid2D::new(&config).unwrap();
    let mut scene = Scene::flip_2d(fluid, FlipFluid2DParams::default()).unwrap();

    for _ in 0..120 {
        let _ = scene.advance(1.0 / 60.0).unwrap();

        let fluid = &scene.fluid;
        assert_eq!(fluid.num_particles(), 400);
        for (p, v) in fluid.iter_particles() {
            assert!(p.is_finite() && v.is_finite());
            assert_ge!(p.x, -5.0);
            assert_le!(p.x, 5.0);
            assert_ge!(p.y, -5.0);
            assert_le!(p.y, 5.0);
        }
    }
}

#[test]
fn fluid_settles_towards_the_floor() {
    let config = FluidConfig {
        boundary: Vec2::new(10.0, 10.0),
        cell_size: 0.5,
        num_particles: 200,
        particle_radius: 0.1,
        spawn_center: Vec2::new(0.0, 2.0),
        spawn_radius: 1.5,
        ..Default::default()
    };
    let fluid = FlipFluid2D::new(&config).unwrap();
    let start = fluid.positions().iter().map(|p| p.y).sum::<f32>() / 200.0;

    let mut scene = Scene::flip_2d(fluid, FlipFluid2DParams::default()).unwrap();
    for _ in 0..60 {
        let _ = scene.advance(1.0 / 60.0).unwrap();
    }

    let end = scene.fluid.positions().iter().map(|p| p.y).sum::<f32>() / 200.0;
    assert_lt!(end, start);
}

#[test]
fn pure_pic_and_pure_flip_both_stay_finite() {
    for flip_ratio in [0.0, 1.0] {
        let config = FluidConfig {
            num_particles: 150,
            particle_radius: 0.2,
            spawn_center: Vec2::ZERO,
            spawn_radius: 2.0,
            ..Default::default()
        };
        let fluid = FlipFluid2D::new(&config).unwrap();
        let params = FlipFluid2DParams {
            flip_ratio,
            ..Default::default()
        };
        let mut scene = Scene::flip_2d(fluid, params).unwrap();

        for _ in 0..30 {
            let _ = scene.advance(1.0 / 60.0).unwrap();
        }

        assert!(scene.fluid.velocities().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn drift_compensation_runs_with_obstacles() {
    let config = FluidConfig {
        boundary: Vec2::new(10.0, 10.0),
        cell_size: 0.5,
        num_particles: 200,
        particle_radius: 0.1,
        spawn_center: Vec2::new(0.0, 3.0),
        spawn_radius: 1.0,
        ..Default::default()
    };
    let fluid = FlipFluid2D::new(&config).unwrap();
    let params = FlipFluid2DParams {
        compensate_drift: true,
        ..Default::default()
    };
    let mut scene = Scene::flip_2d(fluid, params).unwrap();
    let id = scene.add_obstacle(Circle::new(Vec2::new(0.0, -2.0), 1.0));

    for _ in 0..60 {
        let _ = scene.advance(1.0 / 60.0).unwrap();
    }

    for p in scene.fluid.iter_positions() {
        assert_ge!(p.distance(Vec2::new(0.0, -2.0)), 1.0 - 1e-3);
    }

    assert!(scene.remove_obstacle(id).is_some());
    assert!(scene.remove_obstacle(id).is_none());
}

#[test]
fn invalid_params_are_rejected() {
    let fluid = FlipFluid2D::from_positions(&block_config(), vec![Vec2::ZERO]).unwrap();
    let params = FlipFluid2DParams {
        over_relaxation: 2.5,
        ..Default::default()
    };

    assert!(matches!(
        Scene::flip_2d(fluid, params),
        Err(ConfigError::InvalidParameter { name: "over_relaxation", .. })
    ));
}

#[test]
fn unvalidated_scene_rejects_invalid_params_on_advance() {
    let fluid = FlipFluid2D::from_positions(&block_config(), vec![Vec2::ZERO]).unwrap();
    let params = FlipFluid2DParams {
        velocity_limit: -1.0,
        ..Default::default()
    };
    let mut scene = Scene::new(fluid, params);

    assert!(matches!(
        scene.advance(0.016),
        Err(SimulationError::InvalidParams(ConfigError::InvalidParameter { name: "velocity_limit", .. }))
    ));
    assert_eq!(scene.fluid.velocities(), [Vec2::ZERO]);

    scene.params_mut().velocity_limit = 20.0;
    assert_eq!(scene.params().velocity_limit, 20.0);
    assert!(scene.advance(0.016).unwrap().is_stable());
}

#[test]
fn replacing_an_obstacle_moves_the_solid_cells() {
    let fluid = FlipFluid2D::from_positions(&block_config(), vec![cell_centre(2, 7)]).unwrap();
    let mut scene = Scene::flip_2d(fluid, FlipFluid2DParams::default()).unwrap();

    let mut circle = Circle::new(Vec2::new(0.0, -2.0), 1.0);
    let id = scene.add_obstacle(circle);

    let _ = scene.advance(0.016).unwrap();
    assert_eq!(scene.fluid.cell_type(5, 3), Some(CellType::Solid));
    assert_eq!(scene.fluid.cell_type(8, 8), Some(CellType::Air));

    circle.set_position(Vec2::new(3.0, 3.0));
    let old = scene.insert_obstacle(id, circle).unwrap();
    assert_eq!(old.sdf(Vec2::new(0.0, -2.0)).distance, -1.0);

    let _ = scene.advance(0.016).unwrap();
    assert_eq!(scene.fluid.cell_type(5, 3), Some(CellType::Air));
    assert_eq!(scene.fluid.cell_type(8, 8), Some(CellType::Solid));

    assert!(scene.insert_obstacle(id, Circle::new(Vec2::ZERO, 0.5)).is_some());
}
