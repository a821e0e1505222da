use float_cmp::approx_eq;
use nalgebra::Vector3;
use rsteer::algorithms::FlockMode;
use rsteer::engine::{
    scene_catalog, SCENE_ALIGN_SEPARATE, SCENE_FLOWFIELD, SCENE_PATH, SCENE_PATH_SIMPLE,
    SCENE_SEEK, SCENE_SEPARATION_SEEK, SCENE_WALLS,
};
use rsteer::{Engine, EngineError, SceneConfig};

fn engine(id: &str, seed: u64) -> Engine {
    let mut e = Engine::new_builtin(id, Some(seed)).unwrap();
    if scene_catalog().iter().any(|s| s.id == id && s.uses_target) {
        e.set_target(Some(Vector3::new(12.0, -4.0, 6.0))).unwrap();
    }
    e
}

#[test]
fn speed_is_clamped_in_every_scene() {
    for info in scene_catalog() {
        let mut e = engine(info.id, 7);
        for _ in 0..300 {
            e.tick();
            for v in e.simulator().vehicles() {
                assert!(
                    v.velocity().iter().all(|c| c.abs() <= v.max_speed() + 1e-12),
                    "{}: velocity {:?} above {}",
                    info.id,
                    v.velocity(),
                    v.max_speed()
                );
            }
        }
    }
}

#[test]
fn single_behaviour_forces_stay_within_max_force() {
    let scenes = [
        SCENE_SEEK,
        SCENE_WALLS,
        SCENE_FLOWFIELD,
        SCENE_PATH_SIMPLE,
        SCENE_PATH,
        SCENE_ALIGN_SEPARATE,
    ];
    for id in scenes {
        let mut e = engine(id, 3);
        for step in 0..200 {
            let mode = if step % 2 == 0 { FlockMode::Align } else { FlockMode::Separate };
            e.tick_with(mode);
            let sim = e.simulator();
            for (v, f) in sim.vehicles().iter().zip(sim.last_forces()) {
                assert!(f.iter().all(|c| c.abs() <= v.max_force() + 1e-12), "{}: {:?}", id, f);
            }
        }
    }
}

#[test]
fn periodic_scene_wraps_to_opposite_face() {
    let mut e = engine(SCENE_ALIGN_SEPARATE, 1);
    {
        let v = e.simulator_mut().vehicle_mut(0).unwrap();
        v.teleport(Vector3::new(40.0 + 1e-6, 0.0, 0.0));
        v.set_velocity(Vector3::new(0.2, 0.0, 0.0));
    }
    e.tick_with(FlockMode::Align);
    assert_eq!(e.simulator().vehicles()[0].position().x, -40.0);
}

#[test]
fn walls_scene_keeps_vehicle_near_the_box() {
    let mut e = engine(SCENE_WALLS, 9);
    for _ in 0..3000 {
        e.tick();
        let p = e.simulator().vehicles()[0].position();
        assert!(p.iter().all(|c| c.abs() < 35.0), "escaped to {:?}", p);
    }
}

#[test]
fn segment_scene_never_passes_the_finish() {
    let mut e = engine(SCENE_PATH_SIMPLE, 4);
    let finish = e.line_path().unwrap().end.x;
    for _ in 0..1500 {
        e.tick();
        assert!(e.simulator().vehicles().iter().all(|v| v.position().x <= finish));
    }
}

#[test]
fn seek_scene_reaches_target() {
    let mut e = engine(SCENE_SEEK, 0);
    let target = Vector3::new(10.0, 0.0, 0.0);
    e.set_target(Some(target)).unwrap();
    let mut closest = f64::INFINITY;
    for _ in 0..200 {
        e.tick();
        closest = closest.min((e.simulator().vehicles()[0].position() - target).norm());
    }
    assert!(closest < 0.5);
}

#[test]
fn cleared_target_leaves_only_separation() {
    let mut e = engine(SCENE_SEPARATION_SEEK, 2);
    e.set_target(None).unwrap();
    assert!(e.target().is_none());
    let before = e.simulator().vehicles().to_vec();
    e.tick();
    for (i, f) in e.simulator().last_forces().iter().enumerate() {
        assert_eq!(*f, before[i].separate(&before) * 3.0);
    }
}

#[test]
fn seek_without_target_applies_no_force() {
    let mut e = engine(SCENE_SEEK, 0);
    e.set_target(None).unwrap();
    let start = *e.simulator().vehicles()[0].velocity();
    for _ in 0..5 {
        e.tick();
        assert!(e.simulator().last_forces().iter().all(|f| *f == Vector3::zeros()));
    }
    assert_eq!(*e.simulator().vehicles()[0].velocity(), start);
}

#[test]
fn empty_flock_still_advances_the_clock() {
    let cfg = SceneConfig {
        vehicles: 0,
        ..SceneConfig::for_scene(SCENE_SEPARATION_SEEK).unwrap()
    };
    let mut e = Engine::from_config(cfg).unwrap();
    e.frame(0.5, FlockMode::Align);
    e.tick();
    assert_eq!(e.steps(), 2);
    assert!(e.positions_flat().is_empty());
}

#[test]
fn tiny_field_resolution_is_an_error_not_a_panic() {
    let cfg = SceneConfig {
        resolution: 1e-6,
        ..SceneConfig::for_scene(SCENE_FLOWFIELD).unwrap()
    };
    assert!(matches!(
        Engine::from_config(cfg),
        Err(EngineError::FieldTooLarge { .. })
    ));
}

#[test]
fn frame_caps_wall_clock_and_steps_once() {
    let mut e = engine(SCENE_FLOWFIELD, 5);
    assert_eq!(e.frame(5.0, FlockMode::Align), 1.0);
    assert_eq!(e.frame(0.25, FlockMode::Align), 0.25);
    assert_eq!(e.steps(), 2);
    assert!(approx_eq!(f64, e.elapsed(), 1.25, epsilon = 1e-12));
}

#[test]
fn seeds_drive_waypoints() {
    let a = engine(SCENE_PATH, 11).path_points_flat();
    let b = engine(SCENE_PATH, 11).path_points_flat();
    let c = engine(SCENE_PATH, 12).path_points_flat();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 6 * 3);
}

#[test]
fn field_rebuild_with_explicit_seed_is_reproducible() {
    let mut a = engine(SCENE_FLOWFIELD, 1);
    let mut b = engine(SCENE_FLOWFIELD, 2);
    assert_eq!(a.rebuild_field(Some(99)).unwrap(), 99);
    b.rebuild_field(Some(99)).unwrap();
    assert_eq!(a.flow_vectors_flat(), b.flow_vectors_flat());
    assert_eq!(a.flow_vectors_flat().len(), 8 * 8 * 8 * 6);
}

#[test]
fn reset_returns_every_vehicle_to_its_start() {
    let mut e = engine(SCENE_SEPARATION_SEEK, 6);
    for _ in 0..50 {
        e.tick();
    }
    e.reset();
    for v in e.simulator().vehicles() {
        assert_eq!(v.position(), v.start_position());
    }
}

#[test]
fn trails_are_exported_for_trail_scenes() {
    let mut e = engine(SCENE_SEEK, 0);
    e.tick();
    assert_eq!(e.trails_flat().len(), 100 * 3);
    e.set_trails(0);
    assert!(e.trails_flat().is_empty());
}

#[test]
fn engine_builds_from_ron() {
    let cfg = SceneConfig::from_ron_str(
        r#"(
            scene: "separation-and-seek",
            seed: Some(3),
            vehicles: 5,
            extent: (80.0, 60.0, 60.0),
            max_speed: (min: 0.3, max: 0.3),
            max_force: (min: 0.005, max: 0.005),
        )"#,
    )
    .unwrap();
    let e = Engine::from_config(cfg).unwrap();
    assert_eq!(e.len(), 5);
    assert_eq!(e.seed(), 3);
}

#[test]
fn unknown_scene_in_config_is_rejected() {
    let cfg = SceneConfig {
        scene: "wander".to_string(),
        ..SceneConfig::default()
    };
    assert!(matches!(Engine::from_config(cfg), Err(EngineError::UnknownScene(_))));
}

#[test]
fn catalog_target_flag_matches_set_target() {
    for info in scene_catalog() {
        let mut e = Engine::new_builtin(info.id, Some(1)).unwrap();
        let result = e.set_target(Some(Vector3::new(20.0, 10.0, 0.0)));
        if info.uses_target {
            assert!(result.is_ok(), "{}", info.id);
        } else {
            assert!(matches!(result, Err(EngineError::ParamsMismatch { .. })), "{}", info.id);
        }
    }
}
