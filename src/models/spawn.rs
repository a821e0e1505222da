use crate::config::SceneConfig;
use crate::sim::VehicleConfig;
use nalgebra::Vector3;
use rand::Rng;

/// How the starting velocity of a spawned vehicle is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialVelocity {
    Rest,
    /// `(max_speed, 0, 0)`.
    Forward,
    /// Each axis drawn from `(0.3 + r * max_speed) / 2`, all positive.
    Launch,
    /// Each axis drawn from `[-max_speed, max_speed)`.
    Jitter,
}

impl InitialVelocity {
    fn sample<R: Rng + ?Sized>(self, max_speed: f64, rng: &mut R) -> [f64; 3] {
        match self {
            InitialVelocity::Rest => [0.0; 3],
            InitialVelocity::Forward => [max_speed, 0.0, 0.0],
            InitialVelocity::Launch => {
                let mut axis = || (0.3 + rng.gen_range(0.0..1.0) * max_speed) / 2.0;
                [axis(), axis(), axis()]
            }
            InitialVelocity::Jitter => {
                let mut axis = || (rng.gen_range(0.0..1.0) - 0.5) * 2.0 * max_speed;
                [axis(), axis(), axis()]
            }
        }
    }
}

fn vehicle<R: Rng + ?Sized>(
    scene: &SceneConfig,
    position: [f64; 3],
    velocity: InitialVelocity,
    rng: &mut R,
) -> VehicleConfig {
    let max_speed = scene.max_speed.sample(rng);
    let max_force = scene.max_force.sample(rng);
    VehicleConfig {
        position,
        velocity: velocity.sample(max_speed, rng),
        max_speed,
        max_force,
        radius: scene.separation_radius,
        speed_clamp: scene.speed_clamp,
        trail_length: scene.trail_len(),
    }
}

/// All vehicles at the origin.
pub fn at_origin<R: Rng + ?Sized>(
    scene: &SceneConfig,
    velocity: InitialVelocity,
    rng: &mut R,
) -> Vec<VehicleConfig> {
    (0..scene.vehicles)
        .map(|_| vehicle(scene, [0.0; 3], velocity, rng))
        .collect()
}

/// Uniformly scattered inside the scene's centred box.
pub fn scattered<R: Rng + ?Sized>(
    scene: &SceneConfig,
    velocity: InitialVelocity,
    rng: &mut R,
) -> Vec<VehicleConfig> {
    let [w, h, d] = scene.extent;
    (0..scene.vehicles)
        .map(|_| {
            let position = [
                -w / 2.0 + rng.gen_range(0.0..1.0) * w,
                -h / 2.0 + rng.gen_range(0.0..1.0) * h,
                -d / 2.0 + rng.gen_range(0.0..1.0) * d,
            ];
            vehicle(scene, position, velocity, rng)
        })
        .collect()
}

/// Lined up at `start.x`, with y and z scaled towards zero from the start
/// point's own coordinates.
pub fn at_path_start<R: Rng + ?Sized>(
    scene: &SceneConfig,
    start: &Vector3<f64>,
    velocity: InitialVelocity,
    rng: &mut R,
) -> Vec<VehicleConfig> {
    (0..scene.vehicles)
        .map(|_| {
            let position = [
                start.x,
                start.y * rng.gen_range(0.0..1.0),
                start.z * rng.gen_range(0.0..1.0),
            ];
            vehicle(scene, position, velocity, rng)
        })
        .collect()
}
