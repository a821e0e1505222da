use super::steer_towards;
use crate::flowfield::FlowField;
use crate::math::normalize_or_zero;
use crate::Vehicle;
use nalgebra::Vector3;

impl Vehicle {
    /// Steer along the flow vector of the cell the vehicle is in. Unlike path
    /// following there is no look-ahead.
    pub fn follow_flow(&self, field: &FlowField) -> Vector3<f64> {
        let desired = normalize_or_zero(field.lookup(self.position())) * self.max_speed();
        steer_towards(desired, self.velocity(), self.max_force())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steers_along_cell_vector() {
        let field = FlowField::with_noise(Vector3::new(20.0, 20.0, 20.0), 10.0, 0, &|_: f64, _: f64| 0.25)
            .unwrap();
        let v = Vehicle::new(Vector3::new(100.0, 0.0, 0.0), 0.4, 0.002);
        let f = v.follow_flow(&field);
        assert!((f.y - 0.002).abs() < 1e-15);
        assert!(f.x.abs() < 1e-15);
    }
}
