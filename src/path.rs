use crate::error::{EngineError, EngineResult};
use crate::math::normalize_or_zero;
use log::debug;
use nalgebra::Vector3;
use rand::Rng;

pub const DEFAULT_PATH_RADIUS: f64 = 3.0;
pub const DEFAULT_LINE_RADIUS: f64 = 2.0;
/// Slack allowed by [`is_point_on_segment`].
pub const SEGMENT_TOLERANCE: f64 = 0.1;

/// Orthogonal projection of `p` onto the infinite line through `a` and `b`.
///
/// A degenerate segment (`a == b`) projects everything onto `a`.
pub fn normal_point(p: &Vector3<f64>, a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    let ab = normalize_or_zero(b - a);
    a + ab * (p - a).dot(&ab)
}

/// Whether `p` lies between `a` and `b`, by comparing |ab| with |pa| + |pb|.
pub fn is_point_on_segment(a: &Vector3<f64>, b: &Vector3<f64>, p: &Vector3<f64>, tolerance: f64) -> bool {
    let difference = (b - a).norm() - ((p - a).norm() + (p - b).norm());
    difference.abs() < tolerance
}

/// Single straight segment with a tolerance tube.
#[derive(Debug, Clone)]
pub struct LinePath {
    pub start: Vector3<f64>,
    pub end: Vector3<f64>,
    pub radius: f64,
}

impl LinePath {
    pub fn new(start: Vector3<f64>, end: Vector3<f64>, radius: f64) -> EngineResult<Self> {
        check_radius(radius)?;
        Ok(Self { start, end, radius })
    }

    /// Diagonal through a `w × h × d` box: from the left-back third to the
    /// right-front two thirds of the height.
    pub fn across(extent: Vector3<f64>) -> Self {
        Self {
            start: Vector3::new(-extent.x / 2.0, extent.y / 3.0, -extent.z / 2.0),
            end: Vector3::new(extent.x / 2.0, 2.0 * extent.y / 3.0, extent.z / 2.0),
            radius: DEFAULT_LINE_RADIUS,
        }
    }

    pub fn direction(&self) -> Vector3<f64> {
        normalize_or_zero(self.end - self.start)
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// Ordered waypoints spread along the x axis, forming `len - 1` segments.
///
/// Regeneration keeps the x span `[start_x, end_x]` and redraws y and z
/// inside the box `origin..origin + extent`.
#[derive(Debug, Clone)]
pub struct Path {
    points: Vec<Vector3<f64>>,
    radius: f64,
    origin: Vector3<f64>,
    extent: Vector3<f64>,
    start_x: f64,
    end_x: f64,
}

impl Path {
    /// Random path of `points_count` waypoints evenly spaced on x across
    /// `extent.x`, with y in `[0, extent.y)` and z in `[-extent.z/2, extent.z/2)`.
    pub fn random<R: Rng + ?Sized>(
        points_count: usize,
        extent: Vector3<f64>,
        radius: f64,
        rng: &mut R,
    ) -> EngineResult<Self> {
        if points_count < 2 {
            return Err(EngineError::TooFewWaypoints { count: points_count });
        }
        check_radius(radius)?;
        if !extent.iter().all(|c| c.is_finite() && *c > 0.0) {
            return Err(EngineError::InvalidExtent);
        }
        let mut path = Self {
            points: Vec::with_capacity(points_count),
            radius,
            origin: Vector3::new(-extent.x / 2.0, 0.0, -extent.z / 2.0),
            extent,
            start_x: -extent.x / 2.0,
            end_x: extent.x / 2.0,
        };
        path.fill_points(points_count, rng);
        Ok(path)
    }

    pub fn from_points(points: Vec<Vector3<f64>>, radius: f64) -> EngineResult<Self> {
        if points.len() < 2 {
            return Err(EngineError::TooFewWaypoints { count: points.len() });
        }
        check_radius(radius)?;
        let (lo, hi) = points.iter().fold(
            (Vector3::repeat(f64::INFINITY), Vector3::repeat(f64::NEG_INFINITY)),
            |(lo, hi), p| (lo.inf(p), hi.sup(p)),
        );
        let start_x = points[0].x;
        let end_x = points[points.len() - 1].x;
        Ok(Self {
            points,
            radius,
            origin: lo,
            extent: hi - lo,
            start_x,
            end_x,
        })
    }

    /// Replace every waypoint with a fresh random sequence of the same length.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.points.len();
        self.fill_points(n, rng);
        debug!("regenerated path with {} waypoints", n);
    }

    fn fill_points<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        let step_x = (self.end_x - self.start_x) / (count - 1) as f64;
        self.points.clear();
        for i in 0..count {
            self.points.push(Vector3::new(
                self.start_x + step_x * i as f64,
                self.origin.y + rng.gen_range(0.0..1.0) * self.extent.y,
                self.origin.z + rng.gen_range(0.0..1.0) * self.extent.z,
            ));
        }
    }

    pub fn points(&self) -> &[Vector3<f64>] { &self.points }
    pub fn radius(&self) -> f64 { self.radius }
    pub fn extent(&self) -> &Vector3<f64> { &self.extent }
    /// Lower corner of the box waypoints are drawn from.
    pub fn origin(&self) -> &Vector3<f64> { &self.origin }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn set_radius(&mut self, radius: f64) -> EngineResult<()> {
        check_radius(radius)?;
        self.radius = radius;
        Ok(())
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Vector3<f64>, &Vector3<f64>)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    pub fn first(&self) -> &Vector3<f64> {
        &self.points[0]
    }

    pub fn last(&self) -> &Vector3<f64> {
        &self.points[self.points.len() - 1]
    }

    pub fn points_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.points.len() * 3);
        for p in &self.points {
            out.push(p.x as f32);
            out.push(p.y as f32);
            out.push(p.z as f32);
        }
        out
    }
}

fn check_radius(radius: f64) -> EngineResult<()> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidRadius(radius))
    }
}
