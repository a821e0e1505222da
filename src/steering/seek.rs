use super::{steer_towards, SeekSpeed};
use crate::math::{is_finite, normalize_or_zero};
use crate::Vehicle;
use nalgebra::Vector3;

impl Vehicle {
    /// Steering force towards `target`.
    ///
    /// A missing or non-finite target yields zero, as does standing exactly on
    /// the target.
    pub fn seek(&self, target: Option<&Vector3<f64>>, speed: SeekSpeed) -> Vector3<f64> {
        let Some(target) = target.filter(|t| is_finite(t)) else {
            return Vector3::zeros();
        };
        let dir = normalize_or_zero(target - self.position());
        if dir == Vector3::zeros() {
            return Vector3::zeros();
        }
        let desired_speed = match speed {
            SeekSpeed::Unit => 1.0,
            SeekSpeed::MaxSpeed => self.max_speed(),
        };
        steer_towards(dir * desired_speed, self.velocity(), self.max_force())
    }

    pub fn seek_unit_speed(&self, target: Option<&Vector3<f64>>) -> Vector3<f64> {
        self.seek(target, SeekSpeed::Unit)
    }

    pub fn seek_max_speed(&self, target: Option<&Vector3<f64>>) -> Vector3<f64> {
        self.seek(target, SeekSpeed::MaxSpeed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_target_is_a_no_op() {
        let v = Vehicle::new(Vector3::zeros(), 0.3, 0.01);
        assert_eq!(v.seek_max_speed(None), Vector3::zeros());
        let bad = Vector3::new(f64::NAN, 1.0, 0.0);
        assert_eq!(v.seek_unit_speed(Some(&bad)), Vector3::zeros());
    }

    #[test]
    fn on_target_gives_zero_force() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        let v = Vehicle::new(p, 0.3, 0.01).with_velocity(Vector3::new(0.1, 0.0, 0.0));
        assert_eq!(v.seek_max_speed(Some(&p)), Vector3::zeros());
    }

    #[test]
    fn force_is_clamped_per_axis() {
        let v = Vehicle::new(Vector3::zeros(), 0.3, 0.004)
            .with_velocity(Vector3::new(-0.3, 0.3, 0.0));
        let f = v.seek_unit_speed(Some(&Vector3::new(10.0, -10.0, 5.0)));
        for c in f.iter() {
            assert!(c.abs() <= 0.004 + 1e-15);
        }
        assert!(f.x > 0.0 && f.y < 0.0);
    }

    #[test]
    fn unit_and_max_speed_differ() {
        let v = Vehicle::new(Vector3::zeros(), 0.2, 10.0);
        let target = Vector3::new(5.0, 0.0, 0.0);
        assert!((v.seek_unit_speed(Some(&target)).x - 1.0).abs() < 1e-12);
        assert!((v.seek_max_speed(Some(&target)).x - 0.2).abs() < 1e-12);
    }

    #[test]
    fn seeking_converges_without_backtracking() {
        let target = Vector3::new(10.0, 0.0, 0.0);
        let mut v = Vehicle::new(Vector3::zeros(), 0.3, 0.05);
        let mut dist = (target - v.position()).norm();
        let mut steps = 0;
        while dist > v.max_speed() {
            let f = v.seek_max_speed(Some(&target));
            v.apply_force(f);
            v.update();
            let next = (target - v.position()).norm();
            assert!(next < dist, "distance grew at step {}", steps);
            dist = next;
            steps += 1;
            assert!(steps < 1000);
        }
    }
}
