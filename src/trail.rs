use nalgebra::Vector3;
use std::collections::VecDeque;

/// Fixed-capacity position history, oldest first.
///
/// Always holds exactly `capacity` points: it starts filled with the spawn
/// position and every push drops the oldest entry.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Vector3<f64>>,
    capacity: usize,
}

impl Trail {
    pub fn filled(capacity: usize, position: Vector3<f64>) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: std::iter::repeat(position).take(capacity).collect(),
            capacity,
        }
    }

    pub fn push(&mut self, position: Vector3<f64>) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(position);
    }

    /// Collapse the whole history onto `position`.
    pub fn reset(&mut self, position: Vector3<f64>) {
        for p in self.points.iter_mut() {
            *p = position;
        }
    }

    pub fn capacity(&self) -> usize { self.capacity }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&Vector3<f64>> {
        self.points.back()
    }

    /// Flat [x, y, z]* copy for line-buffer uploads.
    pub fn to_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.points.len() * 3);
        for p in &self.points {
            out.push(p.x as f32);
            out.push(p.y as f32);
            out.push(p.z as f32);
        }
        out
    }
}
