//! Per-vehicle steering behaviours. Every behaviour returns a force clamped to
//! `±max_force` per axis and leaves applying and weighting it to the caller.

use crate::math::clamp_per_axis;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub mod boundaries;
pub mod flow;
pub mod path_following;
pub mod seek;
pub mod separation;

/// Desired speed used when seeking.
///
/// The pointer-follow demo seeks at unit speed, the crowd demos at
/// `max_speed`. With small `max_speed` the two differ a lot, so both are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekSpeed {
    Unit,
    #[default]
    MaxSpeed,
}

/// Reynolds steering: desired minus velocity, clamped per axis.
pub fn steer_towards(desired: Vector3<f64>, velocity: &Vector3<f64>, max_force: f64) -> Vector3<f64> {
    clamp_per_axis(desired - velocity, max_force)
}
