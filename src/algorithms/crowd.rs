use crate::path::Path;
use crate::sim::SteeringField;
use crate::steering::boundaries::Bounds;
use crate::Vehicle;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Separation outweighs the goal-seeking behaviour in both crowd demos.
pub const DEFAULT_SEPARATION_WEIGHT: f64 = 3.0;
pub const DEFAULT_FOLLOW_WEIGHT: f64 = 1.0;
pub const DEFAULT_CROWD_SEEK_WEIGHT: f64 = 0.1;
pub const DEFAULT_CROWD_EXTENT: [f64; 3] = [80.0, 60.0, 60.0];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrowdParams {
    pub separation_weight: f64,
    pub follow_weight: f64,
}

impl Default for CrowdParams {
    fn default() -> Self {
        Self {
            separation_weight: DEFAULT_SEPARATION_WEIGHT,
            follow_weight: DEFAULT_FOLLOW_WEIGHT,
        }
    }
}

/// Many vehicles sharing one polyline while keeping apart.
#[derive(Debug, Clone)]
pub struct CrowdPathFollowing {
    pub params: CrowdParams,
    path: Path,
}

impl CrowdPathFollowing {
    pub fn new(params: CrowdParams, path: Path) -> Self {
        Self { params, path }
    }

    pub fn path(&self) -> &Path { &self.path }
    pub fn path_mut(&mut self) -> &mut Path { &mut self.path }
}

impl SteeringField for CrowdPathFollowing {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        let v = &vehicles[index];
        v.separate(vehicles) * self.params.separation_weight
            + v.follow_path(&self.path) * self.params.follow_weight
    }

    fn after_update(&self, vehicle: &mut Vehicle) {
        vehicle.lap_reset_past(self.path.last().x);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationSeekParams {
    pub separation_weight: f64,
    pub seek_weight: f64,
    pub extent: [f64; 3],
}

impl Default for SeparationSeekParams {
    fn default() -> Self {
        Self {
            separation_weight: DEFAULT_SEPARATION_WEIGHT,
            seek_weight: DEFAULT_CROWD_SEEK_WEIGHT,
            extent: DEFAULT_CROWD_EXTENT,
        }
    }
}

/// A swarm chasing the pointer while avoiding crowding, in a periodic box.
#[derive(Debug, Clone)]
pub struct SeparationAndSeek {
    pub params: SeparationSeekParams,
    target: Option<Vector3<f64>>,
    bounds: Bounds,
}

impl SeparationAndSeek {
    pub fn new(params: SeparationSeekParams) -> Self {
        let bounds = Bounds::from_extent(Vector3::from(params.extent));
        Self {
            params,
            target: None,
            bounds,
        }
    }

    pub fn set_target(&mut self, target: Option<Vector3<f64>>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<&Vector3<f64>> {
        self.target.as_ref()
    }

    pub fn bounds(&self) -> &Bounds { &self.bounds }
}

impl SteeringField for SeparationAndSeek {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        let v = &vehicles[index];
        v.separate(vehicles) * self.params.separation_weight
            + v.seek_max_speed(self.target.as_ref()) * self.params.seek_weight
    }

    fn after_update(&self, vehicle: &mut Vehicle) {
        vehicle.wrap(&self.bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Simulator, VehicleConfig};

    fn huddle() -> Simulator {
        Simulator::new(&[
            VehicleConfig::new([0.0, 0.0, 0.0], 0.2, 0.005),
            VehicleConfig::new([0.5, 0.0, 0.0], 0.2, 0.005),
            VehicleConfig::new([0.0, 0.5, 0.0], 0.2, 0.005),
        ])
    }

    fn spread(sim: &Simulator) -> f64 {
        let vs = sim.vehicles();
        let mut min = f64::INFINITY;
        for i in 0..vs.len() {
            for j in (i + 1)..vs.len() {
                min = min.min((vs[i].position() - vs[j].position()).norm());
            }
        }
        min
    }

    #[test]
    fn separation_spreads_a_huddle() {
        let mut sim = huddle();
        let algo = SeparationAndSeek::new(SeparationSeekParams::default());
        let before = spread(&sim);
        for _ in 0..100 {
            sim.step_with_field(&algo);
        }
        assert!(spread(&sim) > before);
    }

    #[test]
    fn weights_scale_forces() {
        let sim = huddle();
        let mut algo = SeparationAndSeek::new(SeparationSeekParams::default());
        algo.set_target(Some(Vector3::new(0.0, 0.0, 30.0)));
        let vs = sim.vehicles();
        let expected = vs[0].separate(vs) * 3.0 + vs[0].seek_max_speed(algo.target()) * 0.1;
        assert_eq!(algo.steer(0, vs), expected);
    }

    #[test]
    fn crowd_combines_separation_and_follow() {
        let path = Path::from_points(
            vec![Vector3::new(-50.0, 0.0, 0.0), Vector3::new(50.0, 0.0, 0.0)],
            2.0,
        )
        .unwrap();
        let algo = CrowdPathFollowing::new(CrowdParams::default(), path);
        let sim = huddle();
        let vs = sim.vehicles();
        let expected = vs[1].separate(vs) * 3.0 + vs[1].follow_path(algo.path());
        assert_eq!(algo.steer(1, vs), expected);
    }
}
