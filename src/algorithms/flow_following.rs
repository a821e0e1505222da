use crate::error::EngineResult;
use crate::flowfield::FlowField;
use crate::sim::SteeringField;
use crate::steering::boundaries::Bounds;
use crate::Vehicle;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FIELD_SIZE: f64 = 40.0;
pub const DEFAULT_RESOLUTION: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    pub extent: [f64; 3],
    pub resolution: f64,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            extent: [DEFAULT_FIELD_SIZE; 3],
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

/// Vehicles drift along a noise flow field inside a periodic box.
#[derive(Debug, Clone)]
pub struct FlowFollowing {
    pub params: FlowParams,
    field: FlowField,
    bounds: Bounds,
}

impl FlowFollowing {
    pub fn new(params: FlowParams, seed: u64) -> EngineResult<Self> {
        let extent = Vector3::from(params.extent);
        let field = FlowField::new(extent, params.resolution, seed)?;
        Ok(Self {
            params,
            field,
            bounds: Bounds::from_extent(extent),
        })
    }

    pub fn field(&self) -> &FlowField { &self.field }
    pub fn field_mut(&mut self) -> &mut FlowField { &mut self.field }
    pub fn bounds(&self) -> &Bounds { &self.bounds }
}

impl SteeringField for FlowFollowing {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        vehicles[index].follow_flow(&self.field)
    }

    fn after_update(&self, vehicle: &mut Vehicle) {
        vehicle.wrap(&self.bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Simulator, VehicleConfig};

    #[test]
    fn vehicles_stay_in_periodic_box() {
        let algo = FlowFollowing::new(FlowParams::default(), 11).unwrap();
        let configs: Vec<VehicleConfig> = (0..8)
            .map(|i| VehicleConfig::new([i as f64 * 4.0 - 16.0, 0.0, 0.0], 0.5, 0.002))
            .collect();
        let mut sim = Simulator::new(&configs);
        for _ in 0..500 {
            sim.step_with_field(&algo);
            for v in sim.vehicles() {
                assert!(algo.bounds().contains(v.position()));
            }
        }
    }

    #[test]
    fn forces_respect_max_force() {
        let algo = FlowFollowing::new(FlowParams::default(), 5).unwrap();
        let mut sim = Simulator::new(&[VehicleConfig::new([3.0, -7.0, 12.0], 0.4, 0.002)]);
        for _ in 0..50 {
            sim.step_with_field(&algo);
            assert!(sim.last_forces()[0].iter().all(|c| c.abs() <= 0.002 + 1e-15));
        }
    }
}
