use crate::error::EngineResult;
use crate::path::{LinePath, Path};
use crate::sim::SteeringField;
use crate::Vehicle;
use log::trace;
use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PATH_POINTS: usize = 6;
pub const DEFAULT_PATH_EXTENT: [f64; 3] = [100.0, 20.0, 30.0];
pub const DEFAULT_PATH_RADIUS: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathParams {
    pub points: usize,
    pub extent: [f64; 3],
    pub radius: f64,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            points: DEFAULT_PATH_POINTS,
            extent: DEFAULT_PATH_EXTENT,
            radius: DEFAULT_PATH_RADIUS,
        }
    }
}

impl PathParams {
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> EngineResult<Path> {
        Path::random(self.points, Vector3::from(self.extent), self.radius, rng)
    }
}

/// Lap along one straight segment; vehicles past `end.x` restart.
#[derive(Debug, Clone)]
pub struct SimplePathFollowing {
    path: LinePath,
}

impl SimplePathFollowing {
    pub fn new(path: LinePath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &LinePath { &self.path }
}

impl SteeringField for SimplePathFollowing {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        vehicles[index].follow_line(&self.path)
    }

    fn after_update(&self, vehicle: &mut Vehicle) {
        if vehicle.lap_reset_past(self.path.end.x) {
            trace!("lap restart on line path");
        }
    }
}

/// Lap along a random polyline; vehicles past the last waypoint restart.
#[derive(Debug, Clone)]
pub struct PathFollowing {
    pub params: PathParams,
    path: Path,
}

impl PathFollowing {
    pub fn new<R: Rng + ?Sized>(params: PathParams, rng: &mut R) -> EngineResult<Self> {
        let path = params.build(rng)?;
        Ok(Self { params, path })
    }

    pub fn with_path(params: PathParams, path: Path) -> Self {
        Self { params, path }
    }

    pub fn path(&self) -> &Path { &self.path }
    pub fn path_mut(&mut self) -> &mut Path { &mut self.path }
}

impl SteeringField for PathFollowing {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        vehicles[index].follow_path(&self.path)
    }

    fn after_update(&self, vehicle: &mut Vehicle) {
        if vehicle.lap_reset_past(self.path.last().x) {
            trace!("lap restart on path");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Simulator, VehicleConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn vehicles_lap_and_restart() {
        let mut rng = StdRng::seed_from_u64(3);
        let algo = PathFollowing::new(PathParams::default(), &mut rng).unwrap();
        let first = *algo.path().first();
        let mut cfg = VehicleConfig::new([first.x, first.y, first.z], 0.3, 0.005);
        cfg.velocity = [0.3, 0.0, 0.0];
        let mut sim = Simulator::new(&[cfg]);
        let finish = algo.path().last().x;
        let mut restarted = false;
        for _ in 0..2000 {
            let before = sim.vehicles()[0].position().x;
            sim.step_with_field(&algo);
            let after = sim.vehicles()[0].position().x;
            assert!(after <= finish);
            if after < before - 1.0 {
                assert_eq!(after, first.x);
                restarted = true;
                break;
            }
        }
        assert!(restarted);
    }

    #[test]
    fn line_path_brings_vehicle_into_tube() {
        let path = LinePath::new(
            Vector3::new(-50.0, 0.0, 0.0),
            Vector3::new(50.0, 0.0, 0.0),
            2.0,
        )
        .unwrap();
        let algo = SimplePathFollowing::new(path);
        let mut cfg = VehicleConfig::new([-50.0, 8.0, 0.0], 0.4, 0.01);
        cfg.velocity = [0.4, 0.0, 0.0];
        let mut sim = Simulator::new(&[cfg]);
        for _ in 0..200 {
            sim.step_with_field(&algo);
        }
        assert!(sim.vehicles()[0].position().y.abs() < 4.0);
    }
}
