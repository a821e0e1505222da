use crate::sim::SteeringField;
use crate::steering::boundaries::{Bounds, Containment};
use crate::Vehicle;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BOX_SIZE: f64 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallsParams {
    pub box_size: f64,
}

impl Default for WallsParams {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
        }
    }
}

/// Free flight inside a cube, steering back whenever a wall is crossed.
#[derive(Debug, Clone)]
pub struct StayWithinWalls {
    pub params: WallsParams,
}

impl StayWithinWalls {
    pub fn new(params: WallsParams) -> Self {
        Self { params }
    }

    pub fn containment(&self) -> Containment {
        Containment::SteerBack(Bounds::cube(self.params.box_size))
    }
}

impl SteeringField for StayWithinWalls {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        self.containment().force(&vehicles[index])
    }
}
