use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Squared magnitudes below this are treated as zero-length.
pub const NORMALIZE_EPS: f64 = 1.0e-12;

/// How a vehicle's speed limit is enforced after integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedClamp {
    /// Each velocity component is clamped into [-max, max] independently.
    #[default]
    PerAxis,
    /// The velocity vector is scaled down to at most `max` in length.
    Magnitude,
}

impl SpeedClamp {
    pub fn apply(self, v: Vector3<f64>, max: f64) -> Vector3<f64> {
        match self {
            SpeedClamp::PerAxis => clamp_per_axis(v, max),
            SpeedClamp::Magnitude => limit_magnitude(v, max),
        }
    }
}

/// Clamp every component into [-limit, limit].
pub fn clamp_per_axis(v: Vector3<f64>, limit: f64) -> Vector3<f64> {
    let limit = limit.abs();
    v.map(|c| c.clamp(-limit, limit))
}

pub fn limit_magnitude(v: Vector3<f64>, max: f64) -> Vector3<f64> {
    let max = max.abs();
    let n2 = v.norm_squared();
    if n2 > max * max && n2 > NORMALIZE_EPS {
        v * (max / n2.sqrt())
    } else {
        v
    }
}

/// Unit vector along `v`, or zero for a degenerate or non-finite input.
pub fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    let n2 = v.norm_squared();
    if n2 < NORMALIZE_EPS || !n2.is_finite() {
        Vector3::zeros()
    } else {
        v / n2.sqrt()
    }
}

pub fn is_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}
