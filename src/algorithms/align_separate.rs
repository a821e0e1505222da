use crate::sim::SteeringField;
use crate::steering::boundaries::Bounds;
use crate::Vehicle;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NEIGHBOR_DISTANCE: f64 = 10.0;
pub const DEFAULT_ALIGN_EXTENT: [f64; 3] = [80.0, 60.0, 60.0];

/// Behaviour picked by the harness for each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlockMode {
    #[default]
    Align,
    Separate,
}

impl FlockMode {
    pub fn next(self) -> Self {
        match self {
            FlockMode::Align => FlockMode::Separate,
            FlockMode::Separate => FlockMode::Align,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignSeparateParams {
    pub neighbor_distance: f64,
    pub extent: [f64; 3],
}

impl Default for AlignSeparateParams {
    fn default() -> Self {
        Self {
            neighbor_distance: DEFAULT_NEIGHBOR_DISTANCE,
            extent: DEFAULT_ALIGN_EXTENT,
        }
    }
}

/// Either align with or separate from neighbours, in a periodic box. Holds no
/// mode: use [`AlignSeparate::with_mode`] per step.
#[derive(Debug, Clone)]
pub struct AlignSeparate {
    pub params: AlignSeparateParams,
    bounds: Bounds,
}

impl AlignSeparate {
    pub fn new(params: AlignSeparateParams) -> Self {
        let bounds = Bounds::from_extent(Vector3::from(params.extent));
        Self { params, bounds }
    }

    pub fn with_mode(&self, mode: FlockMode) -> ModeSteering<'_> {
        ModeSteering { algo: self, mode }
    }

    pub fn bounds(&self) -> &Bounds { &self.bounds }
}

pub struct ModeSteering<'a> {
    algo: &'a AlignSeparate,
    mode: FlockMode,
}

impl SteeringField for ModeSteering<'_> {
    fn steer(&self, index: usize, vehicles: &[Vehicle]) -> Vector3<f64> {
        let v = &vehicles[index];
        match self.mode {
            FlockMode::Align => v.align(vehicles, self.algo.params.neighbor_distance),
            FlockMode::Separate => v.separate(vehicles),
        }
    }

    fn after_update(&self, vehicle: &mut Vehicle) {
        vehicle.wrap(&self.algo.bounds);
    }
}
