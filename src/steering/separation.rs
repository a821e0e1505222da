use super::steer_towards;
use crate::math::normalize_or_zero;
use crate::Vehicle;
use nalgebra::Vector3;

impl Vehicle {
    /// Repulsion from every neighbour closer than `radius`.
    ///
    /// Each contributes a unit vector pointing away from it divided by the
    /// distance. Neighbours at distance zero (including `self` when it is part
    /// of the slice) are skipped. Naive O(n) scan per vehicle.
    pub fn separate(&self, neighbors: &[Vehicle]) -> Vector3<f64> {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for other in neighbors {
            let diff = self.position() - other.position();
            let distance = diff.norm();
            if distance > 0.0 && distance < self.radius() {
                sum += diff / (distance * distance);
                count += 1;
            }
        }
        if count == 0 {
            return Vector3::zeros();
        }
        let desired = normalize_or_zero(sum) * self.max_speed();
        steer_towards(desired, self.velocity(), self.max_force())
    }

    /// Match the average heading of neighbours within `neighbor_distance`.
    pub fn align(&self, neighbors: &[Vehicle], neighbor_distance: f64) -> Vector3<f64> {
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for other in neighbors {
            let distance = (self.position() - other.position()).norm();
            if distance > 0.0 && distance < neighbor_distance {
                sum += other.velocity();
                count += 1;
            }
        }
        if count == 0 {
            return Vector3::zeros();
        }
        let desired = normalize_or_zero(sum / count as f64) * self.max_speed();
        if desired == Vector3::zeros() {
            return Vector3::zeros();
        }
        steer_towards(desired, self.velocity(), self.max_force())
    }
}
