use super::{steer_towards, SeekSpeed};
use crate::math::normalize_or_zero;
use crate::path::{is_point_on_segment, normal_point, LinePath, Path, SEGMENT_TOLERANCE};
use crate::Vehicle;
use nalgebra::Vector3;

/// How far ahead of the vehicle the future position is predicted.
pub const LOOKAHEAD_DISTANCE: f64 = 4.0;
/// How far past the normal point the steering target sits.
pub const TARGET_OFFSET: f64 = 10.0;

/// Everything `follow_path` looked at, for debug drawing.
#[derive(Debug, Clone, Default)]
pub struct PathProbe {
    pub predicted: Vector3<f64>,
    /// Candidate per segment: the normal point, or the nearer endpoint when
    /// the projection falls outside the segment.
    pub candidates: Vec<Vector3<f64>>,
    pub normal: Option<Vector3<f64>>,
    pub target: Option<Vector3<f64>>,
    pub distance: f64,
    /// Whether `distance` exceeded the path radius.
    pub correcting: bool,
}

impl Vehicle {
    /// Predicted position `LOOKAHEAD_DISTANCE` ahead along the velocity.
    /// A stationary vehicle predicts its own position.
    pub fn predict(&self) -> Vector3<f64> {
        self.position() + normalize_or_zero(*self.velocity()) * LOOKAHEAD_DISTANCE
    }

    /// Stay within the tube around a single segment.
    pub fn follow_line(&self, path: &LinePath) -> Vector3<f64> {
        let predicted = self.predict();
        let normal = normal_point(&predicted, &path.start, &path.end);
        let distance = (predicted - normal).norm();
        if distance > path.radius {
            let target = normal + path.direction() * TARGET_OFFSET;
            self.seek(Some(&target), SeekSpeed::MaxSpeed)
        } else {
            Vector3::zeros()
        }
    }

    /// Stay within the tube around a polyline.
    pub fn follow_path(&self, path: &Path) -> Vector3<f64> {
        let probe = self.probe_path(path);
        match probe.target {
            Some(target) if probe.correcting => self.seek(Some(&target), SeekSpeed::MaxSpeed),
            _ => Vector3::zeros(),
        }
    }

    /// Closest-segment search used by [`Vehicle::follow_path`].
    ///
    /// The look-ahead past the chosen normal point is scaled by
    /// `TARGET_OFFSET * (1 - 1/distance)`, which shrinks as the vehicle nears
    /// the path and flips sign below a distance of 1. It only matters while
    /// `distance > radius`.
    pub fn probe_path(&self, path: &Path) -> PathProbe {
        let predicted = self.predict();
        let mut probe = PathProbe {
            predicted,
            candidates: Vec::with_capacity(path.len().saturating_sub(1)),
            distance: f64::INFINITY,
            ..PathProbe::default()
        };

        for (a, b) in path.segments() {
            let mut normal = normal_point(&predicted, a, b);
            let distance = if is_point_on_segment(a, b, &normal, SEGMENT_TOLERANCE) {
                (predicted - normal).norm()
            } else {
                let da = (predicted - a).norm();
                let db = (predicted - b).norm();
                normal = if da < db { *a } else { *b };
                da.min(db)
            };
            probe.candidates.push(normal);

            if distance < probe.distance {
                probe.distance = distance;
                let dir = normalize_or_zero(b - a) * (TARGET_OFFSET * (1.0 - 1.0 / distance));
                probe.normal = Some(normal);
                probe.target = Some(normal + dir);
            }
        }

        probe.correcting = probe.distance > path.radius();
        probe
    }

    /// Lap restart once past `finish_x`. Returns whether the vehicle was reset.
    pub fn lap_reset_past(&mut self, finish_x: f64) -> bool {
        if self.position().x > finish_x {
            self.reset();
            true
        } else {
            false
        }
    }
}
