use crate::error::{EngineError, EngineResult};
use crate::math::SpeedClamp;
use crate::Vehicle;
use log::trace;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Largest wall-clock delta a frame may report, in seconds.
pub const MAX_FRAME_DELTA: f64 = 1.0;

/// Clamp a frame delta into `[0, MAX_FRAME_DELTA]`. Long pauses (a
/// backgrounded tab) would otherwise report huge deltas.
pub fn cap_frame_delta(delta: f64) -> f64 {
    if delta.is_finite() {
        delta.clamp(0.0, MAX_FRAME_DELTA)
    } else {
        0.0
    }
}

/// Initial configuration of one vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub max_speed: f64,
    pub max_force: f64,
    /// Separation sensing radius.
    pub radius: f64,
    pub speed_clamp: SpeedClamp,
    /// Trail length; 0 disables it.
    pub trail_length: usize,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            velocity: [0.0; 3],
            max_speed: 0.3,
            max_force: 0.005,
            radius: crate::DEFAULT_RADIUS,
            speed_clamp: SpeedClamp::PerAxis,
            trail_length: 0,
        }
    }
}

impl VehicleConfig {
    pub fn new(position: [f64; 3], max_speed: f64, max_force: f64) -> Self {
        Self {
            position,
            max_speed,
            max_force,
            ..Self::default()
        }
    }

    pub fn build(&self) -> Vehicle {
        Vehicle::new(Vector3::from(self.position), self.max_speed, self.max_force)
            .with_velocity(Vector3::from(self.velocity))
            .with_radius(self.radius)
            .with_speed_clamp(self.speed_clamp)
            .with_trail(self.trail_length)
    }
}

/// Serializable per-vehicle state for UI/debug output.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleSnapshot {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub max_speed: f64,
    pub max_force: f64,
    pub force: [f64; 3],
}

/// Steering for a whole flock. `steer` is the read phase: it sees every
/// vehicle as it was at the start of the step. `after_update` runs per vehicle
/// once its own integration is done (wrapping, lap resets).
pub trait SteeringField: Sync {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64>;

    fn after_update(&self, _vehicle: &mut Vehicle) {}
}

// Closures of the form Fn(index, vehicles) -> force steer without a post phase.
impl<F> SteeringField for F
where
    F: Fn(usize, &[Vehicle]) -> Vector3<f64> + Sync,
{
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        (self)(index, vehicles)
    }
}

/// Steps a flock with a strict read/write split: all forces are computed from
/// the same snapshot, then each vehicle applies, integrates and is corrected.
#[derive(Debug)]
pub struct Simulator {
    vehicles: Vec<Vehicle>,
    forces: Vec<Vector3<f64>>,
    steps: u64,
    elapsed: f64,
}

impl Simulator {
    pub fn new(configs: &[VehicleConfig]) -> Self {
        Self::from_vehicles(configs.iter().map(VehicleConfig::build).collect())
    }

    pub fn from_vehicles(vehicles: Vec<Vehicle>) -> Self {
        let n = vehicles.len();
        Self {
            vehicles,
            forces: vec![Vector3::zeros(); n],
            steps: 0,
            elapsed: 0.0,
        }
    }

    pub fn len(&self) -> usize { self.vehicles.len() }
    pub fn is_empty(&self) -> bool { self.vehicles.is_empty() }
    pub fn steps(&self) -> u64 { self.steps }
    pub fn elapsed(&self) -> f64 { self.elapsed }
    pub fn vehicles(&self) -> &[Vehicle] { &self.vehicles }

    pub fn vehicle(&self, i: usize) -> Option<&Vehicle> {
        self.vehicles.get(i)
    }

    pub fn vehicle_mut(&mut self, i: usize) -> EngineResult<&mut Vehicle> {
        let len = self.vehicles.len();
        self.vehicles
            .get_mut(i)
            .ok_or(EngineError::IndexOutOfRange { index: i, len })
    }

    /// Add a capped frame delta to the wall-clock accumulator.
    pub fn advance_clock(&mut self, delta: f64) -> f64 {
        let delta = cap_frame_delta(delta);
        self.elapsed += delta;
        delta
    }

    /// Queue an external force on vehicle `i` for the next step.
    pub fn apply_force(&mut self, i: usize, f: Vector3<f64>) -> EngineResult<()> {
        self.vehicle_mut(i)?.apply_force(f);
        Ok(())
    }

    pub fn apply_uniform_force(&mut self, f: Vector3<f64>) {
        for v in self.vehicles.iter_mut() {
            v.apply_force(f);
        }
    }

    /// Integrate with whatever forces were queued, no steering.
    pub fn step(&mut self) {
        for (v, f) in self.vehicles.iter_mut().zip(self.forces.iter_mut()) {
            *f = *v.acceleration();
            v.update();
        }
        self.steps += 1;
    }

    /// One unit step under `field`.
    pub fn step_with_field<F: SteeringField + ?Sized>(&mut self, field: &F) {
        if self.vehicles.is_empty() {
            self.steps += 1;
            return;
        }
        for (i, f) in self.forces.iter_mut().enumerate() {
            *f = field.steer(i, &self.vehicles);
        }
        self.write_phase(field);
    }

    /// Same as [`Simulator::step_with_field`] with the read phase spread over
    /// the rayon pool. Results are identical.
    #[cfg(feature = "parallel")]
    pub fn step_par_with_field<F: SteeringField + ?Sized>(&mut self, field: &F) {
        use rayon::prelude::*;
        if self.vehicles.is_empty() {
            self.steps += 1;
            return;
        }
        let vehicles = &self.vehicles;
        self.forces
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, f)| *f = field.steer(i, vehicles));
        self.write_phase(field);
    }

    fn write_phase<F: SteeringField + ?Sized>(&mut self, field: &F) {
        for (v, f) in self.vehicles.iter_mut().zip(self.forces.iter_mut()) {
            v.apply_force(*f);
            *f = *v.acceleration();
            v.update();
            field.after_update(v);
        }
        self.steps += 1;
        trace!("step {} done for {} vehicles", self.steps, self.vehicles.len());
    }

    /// Every vehicle back to its start position.
    pub fn reset(&mut self) {
        for v in self.vehicles.iter_mut() {
            v.reset();
        }
    }

    pub fn set_trails(&mut self, len: usize) {
        for v in self.vehicles.iter_mut() {
            v.set_trail(len);
        }
    }

    /// Force applied to each vehicle during the last step.
    pub fn last_forces(&self) -> &[Vector3<f64>] {
        &self.forces
    }

    /// Nx6 matrix of (x, y, z, vx, vy, vz).
    pub fn state_matrix(&self) -> Vec<[f64; 6]> {
        self.vehicles.iter().map(Vehicle::state_array).collect()
    }

    pub fn positions_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vehicles.len() * 3);
        for v in &self.vehicles {
            let p = v.position();
            out.push(p.x as f32);
            out.push(p.y as f32);
            out.push(p.z as f32);
        }
        out
    }

    pub fn states_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vehicles.len() * 6);
        for row in self.state_matrix() {
            out.extend(row.iter().map(|c| *c as f32));
        }
        out
    }

    /// Trails of every vehicle back to back; vehicles without a trail are
    /// skipped.
    pub fn trails_flat(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for v in &self.vehicles {
            if let Some(t) = v.trail() {
                out.extend(t.to_flat());
            }
        }
        out
    }

    pub fn snapshots(&self) -> Vec<VehicleSnapshot> {
        self.vehicles
            .iter()
            .zip(self.forces.iter())
            .map(|(v, f)| VehicleSnapshot {
                position: [v.position().x, v.position().y, v.position().z],
                velocity: [v.velocity().x, v.velocity().y, v.velocity().z],
                max_speed: v.max_speed(),
                max_force: v.max_force(),
                force: [f.x, f.y, f.z],
            })
            .collect()
    }
}
