use crate::sim::SteeringField;
use crate::steering::SeekSpeed;
use crate::Vehicle;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEEK_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekParams {
    /// The pointer demo seeks at unit speed.
    pub speed: SeekSpeed,
    pub weight: f64,
}

impl Default for SeekParams {
    fn default() -> Self {
        Self {
            speed: SeekSpeed::Unit,
            weight: DEFAULT_SEEK_WEIGHT,
        }
    }
}

/// Every vehicle chases one externally driven target (the pointer).
#[derive(Debug, Clone, Default)]
pub struct SeekTarget {
    pub params: SeekParams,
    target: Option<Vector3<f64>>,
}

impl SeekTarget {
    pub fn new(params: SeekParams) -> Self {
        Self { params, target: None }
    }

    /// `None` while the pointer has no intersection; seeking is then a no-op.
    pub fn set_target(&mut self, target: Option<Vector3<f64>>) {
        self.target = target;
    }

    pub fn target(&self) -> Option<&Vector3<f64>> {
        self.target.as_ref()
    }
}

impl SteeringField for SeekTarget {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        vehicles[index].seek(self.target.as_ref(), self.params.speed) * self.params.weight
    }
}
