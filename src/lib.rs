use nalgebra::Vector3;

pub mod algorithms;
pub mod config;
pub mod engine;
pub mod error;
pub mod flowfield;
pub mod math;
pub mod models;
pub mod path;
pub mod sim;
pub mod steering;
pub mod trail;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{SceneConfig, SpeedRange};
pub use engine::Engine;
pub use error::{ConfigError, EngineError};
pub use flowfield::{FlowField, Noise2D, SimplexNoise};
pub use math::SpeedClamp;
pub use path::{LinePath, Path};
pub use sim::{SteeringField, Simulator, VehicleConfig, VehicleSnapshot};
pub use steering::boundaries::{Bounds, Containment};
pub use steering::path_following::PathProbe;
pub use steering::SeekSpeed;
pub use trail::Trail;

/// Separation sensing radius used by the crowd demos.
pub const DEFAULT_RADIUS: f64 = 2.0;

/// Autonomous agent: position, velocity and a per-step force accumulator.
#[derive(Debug, Clone)]
pub struct Vehicle {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
    start_position: Vector3<f64>,
    max_speed: f64,
    max_force: f64,
    radius: f64,
    speed_clamp: SpeedClamp,
    trail: Option<Trail>,
}

impl Vehicle {
    /// Vehicle at rest at `position`. The position is remembered as the start
    /// point for [`Vehicle::reset`].
    pub fn new(position: Vector3<f64>, max_speed: f64, max_force: f64) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            start_position: position,
            max_speed,
            max_force,
            radius: DEFAULT_RADIUS,
            speed_clamp: SpeedClamp::PerAxis,
            trail: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_speed_clamp(mut self, speed_clamp: SpeedClamp) -> Self {
        self.speed_clamp = speed_clamp;
        self
    }

    /// Keep the last `len` positions. A zero length disables the trail.
    pub fn with_trail(mut self, len: usize) -> Self {
        self.set_trail(len);
        self
    }

    pub fn set_trail(&mut self, len: usize) {
        self.trail = if len == 0 {
            None
        } else {
            Some(Trail::filled(len, self.position))
        };
    }

    /// One unit step of Euler integration.
    ///
    /// The speed limit is applied per axis by default, so diagonal motion can
    /// exceed `max_speed` by up to sqrt(3). Tuned force constants assume this.
    pub fn update(&mut self) {
        self.velocity += self.acceleration;
        self.velocity = self.speed_clamp.apply(self.velocity, self.max_speed);
        self.position += self.velocity;
        self.acceleration = Vector3::zeros();

        if let Some(trail) = &mut self.trail {
            trail.push(self.position);
        }
    }

    /// Accumulate a force for the next [`Vehicle::update`]. No clamping here.
    pub fn apply_force(&mut self, force: Vector3<f64>) {
        self.acceleration += force;
    }

    /// Back to the start position (lap restart). Velocity is kept.
    pub fn reset(&mut self) {
        self.position = self.start_position;
        self.acceleration = Vector3::zeros();
        self.reset_trail();
    }

    /// Move without touching the start position; the trail restarts here so no
    /// streak is drawn across the jump.
    pub fn teleport(&mut self, position: Vector3<f64>) {
        self.position = position;
        self.reset_trail();
    }

    pub(crate) fn set_position_axis(&mut self, axis: usize, value: f64) {
        self.position[axis] = value;
    }

    pub(crate) fn reset_trail(&mut self) {
        if let Some(trail) = &mut self.trail {
            trail.reset(self.position);
        }
    }

    pub fn set_velocity(&mut self, velocity: Vector3<f64>) { self.velocity = velocity; }
    pub fn set_start_position(&mut self, position: Vector3<f64>) { self.start_position = position; }
    pub fn set_max_speed(&mut self, max_speed: f64) { self.max_speed = max_speed; }
    pub fn set_max_force(&mut self, max_force: f64) { self.max_force = max_force; }

    pub fn position(&self) -> &Vector3<f64> { &self.position }
    pub fn velocity(&self) -> &Vector3<f64> { &self.velocity }
    pub fn acceleration(&self) -> &Vector3<f64> { &self.acceleration }
    pub fn start_position(&self) -> &Vector3<f64> { &self.start_position }
    pub fn max_speed(&self) -> f64 { self.max_speed }
    pub fn max_force(&self) -> f64 { self.max_force }
    pub fn radius(&self) -> f64 { self.radius }
    pub fn speed_clamp(&self) -> SpeedClamp { self.speed_clamp }

    /// Position history, oldest first, if a trail is enabled.
    pub fn trail(&self) -> Option<&Trail> {
        self.trail.as_ref()
    }

    /// Snapshot of [x, y, z, vx, vy, vz].
    pub fn state_array(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ]
    }

    /// Build a config that recreates this vehicle from its current state.
    pub fn to_config(&self) -> VehicleConfig {
        VehicleConfig {
            position: [self.position.x, self.position.y, self.position.z],
            velocity: [self.velocity.x, self.velocity.y, self.velocity.z],
            max_speed: self.max_speed,
            max_force: self.max_force,
            radius: self.radius,
            speed_clamp: self.speed_clamp,
            trail_length: self.trail.as_ref().map(Trail::capacity).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn update_integrates_and_clears_acceleration() {
        let mut v = Vehicle::new(Vector3::zeros(), 1.0, 0.1);
        v.apply_force(Vector3::new(0.5, 0.0, 0.0));
        v.apply_force(Vector3::new(0.25, 0.0, 0.0));
        v.update();
        assert!(approx_eq!(f64, v.velocity().x, 0.75, epsilon = 1e-12));
        assert!(approx_eq!(f64, v.position().x, 0.75, epsilon = 1e-12));
        assert_eq!(*v.acceleration(), Vector3::zeros());
    }

    #[test]
    fn speed_is_clamped_per_axis_after_update() {
        let mut v = Vehicle::new(Vector3::zeros(), 0.3, 10.0)
            .with_velocity(Vector3::new(0.2, -0.2, 0.0));
        v.apply_force(Vector3::new(5.0, -5.0, 5.0));
        v.update();
        for c in v.velocity().iter() {
            assert!(c.abs() <= 0.3 + 1e-12);
        }
        // Per-axis clamp is not a magnitude clamp.
        assert!(v.velocity().norm() > 0.3);
    }

    #[test]
    fn magnitude_clamp_caps_true_speed() {
        let mut v = Vehicle::new(Vector3::zeros(), 0.3, 10.0)
            .with_speed_clamp(SpeedClamp::Magnitude);
        v.apply_force(Vector3::new(5.0, -5.0, 5.0));
        v.update();
        assert!(v.velocity().norm() <= 0.3 + 1e-12);
    }

    #[test]
    fn reset_returns_to_start_and_refills_trail() {
        let start = Vector3::new(1.0, 2.0, 3.0);
        let mut v = Vehicle::new(start, 1.0, 0.1)
            .with_velocity(Vector3::new(1.0, 0.0, 0.0))
            .with_trail(4);
        for _ in 0..3 {
            v.update();
        }
        assert_ne!(*v.position(), start);
        v.reset();
        assert_eq!(*v.position(), start);
        let trail = v.trail().unwrap();
        assert!(trail.iter().all(|p| *p == start));
        assert_eq!(trail.len(), 4);
    }

    #[test]
    fn trail_records_positions_after_update() {
        let mut v = Vehicle::new(Vector3::zeros(), 1.0, 0.1)
            .with_velocity(Vector3::new(1.0, 0.0, 0.0))
            .with_trail(3);
        v.update();
        v.update();
        let xs: Vec<f64> = v.trail().unwrap().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }
}
