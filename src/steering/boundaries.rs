use super::steer_towards;
use crate::math::normalize_or_zero;
use crate::Vehicle;
use log::trace;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub half_extent: [f64; 3],
}

impl Bounds {
    /// Box of full size `extent`.
    pub fn from_extent(extent: Vector3<f64>) -> Self {
        Self {
            half_extent: [extent.x / 2.0, extent.y / 2.0, extent.z / 2.0],
        }
    }

    pub fn cube(size: f64) -> Self {
        Self::from_extent(Vector3::repeat(size))
    }

    pub fn half(&self) -> Vector3<f64> {
        Vector3::from(self.half_extent)
    }

    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        (0..3).all(|axis| p[axis].abs() <= self.half_extent[axis])
    }
}

/// How a vehicle is kept inside its domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// Steer back in while outside; never teleports.
    SteerBack(Bounds),
    /// Periodic box: leaving one face re-enters at the opposite one.
    Wrap(Bounds),
}

impl Containment {
    /// Force contribution for the read phase. Only steer-back produces one.
    pub fn force(&self, vehicle: &Vehicle) -> Vector3<f64> {
        match self {
            Containment::SteerBack(bounds) => vehicle.steer_back(bounds),
            Containment::Wrap(_) => Vector3::zeros(),
        }
    }

    /// Post-integration correction. Only wrap moves the vehicle.
    pub fn after_update(&self, vehicle: &mut Vehicle) {
        if let Containment::Wrap(bounds) = self {
            vehicle.wrap(bounds);
        }
    }
}

impl Vehicle {
    /// Steer-back containment.
    ///
    /// Every axis outside `±half` gets a desired velocity of `∓max_speed`, the
    /// others keep the current velocity; the result is rescaled to
    /// `max_speed` and steered towards. Zero while inside.
    pub fn steer_back(&self, bounds: &Bounds) -> Vector3<f64> {
        let ms = self.max_speed();
        let mut desired = *self.velocity();
        let mut outside = false;
        for axis in 0..3 {
            let half = bounds.half_extent[axis];
            let p = self.position()[axis];
            if p < -half {
                desired[axis] = ms;
                outside = true;
            } else if p > half {
                desired[axis] = -ms;
                outside = true;
            }
        }
        if !outside {
            return Vector3::zeros();
        }
        let desired = normalize_or_zero(desired) * ms;
        steer_towards(desired, self.velocity(), self.max_force())
    }

    /// Wrap every axis outside `±half` to the opposite face. Returns whether
    /// the vehicle moved; the trail is collapsed so no streak crosses the box.
    pub fn wrap(&mut self, bounds: &Bounds) -> bool {
        let mut wrapped = false;
        for axis in 0..3 {
            let half = bounds.half_extent[axis];
            let p = self.position()[axis];
            if p > half {
                self.set_position_axis(axis, -half);
                wrapped = true;
            } else if p < -half {
                self.set_position_axis(axis, half);
                wrapped = true;
            }
        }
        if wrapped {
            trace!("vehicle wrapped to {:?}", self.position());
            self.reset_trail();
        }
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_moves_to_opposite_face() {
        let bounds = Bounds::cube(30.0);
        let mut v = Vehicle::new(Vector3::new(15.0 + 1e-6, 0.0, 0.0), 0.3, 0.005).with_trail(5);
        assert!(v.wrap(&bounds));
        assert_eq!(v.position().x, -15.0);
        assert!(v.trail().unwrap().iter().all(|p| p.x == -15.0));

        let mut v = Vehicle::new(Vector3::new(0.0, -16.0, 20.0), 0.3, 0.005);
        assert!(v.wrap(&bounds));
        assert_eq!(*v.position(), Vector3::new(0.0, 15.0, -15.0));
    }

    #[test]
    fn wrap_inside_does_nothing() {
        let bounds = Bounds::cube(30.0);
        let mut v = Vehicle::new(Vector3::new(14.0, -14.0, 0.0), 0.3, 0.005);
        assert!(!v.wrap(&bounds));
        assert_eq!(*v.position(), Vector3::new(14.0, -14.0, 0.0));
    }

    #[test]
    fn steer_back_pushes_inward() {
        let bounds = Bounds::cube(30.0);
        let v = Vehicle::new(Vector3::new(-15.5, 0.0, 0.0), 0.3, 0.005)
            .with_velocity(Vector3::new(-0.2, 0.0, 0.1));
        let f = v.steer_back(&bounds);
        assert!(f.x > 0.0);
        assert!(f.x <= 0.005);

        let v = Vehicle::new(Vector3::new(15.5, 0.0, 0.0), 0.3, 0.005)
            .with_velocity(Vector3::new(0.2, 0.0, 0.0));
        assert!(v.steer_back(&bounds).x < 0.0);
    }

    #[test]
    fn steer_back_inside_is_zero() {
        let bounds = Bounds::cube(30.0);
        let v = Vehicle::new(Vector3::new(5.0, 5.0, 5.0), 0.3, 0.005)
            .with_velocity(Vector3::new(0.2, 0.1, 0.0));
        assert_eq!(v.steer_back(&bounds), Vector3::zeros());
    }

    #[test]
    fn steer_back_returns_vehicle_to_box() {
        let bounds = Bounds::cube(30.0);
        let mut v = Vehicle::new(Vector3::new(14.0, 0.0, 0.0), 0.3, 0.005)
            .with_velocity(Vector3::new(0.3, 0.0, 0.0));
        let mut exited = false;
        let mut returned = false;
        for _ in 0..2000 {
            let f = Containment::SteerBack(bounds).force(&v);
            v.apply_force(f);
            v.update();
            if v.position().x > 15.0 {
                exited = true;
            } else if exited {
                returned = true;
                break;
            }
        }
        assert!(exited && returned);
    }
}
