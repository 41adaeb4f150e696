//! Polygon vertices: a position and the surface normal at that position.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// The normal is stored as given; callers orient it.
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { pos, normal }
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Interpolate position and normal between `self` (`t = 0`) and
    /// `other` (`t = 1`). Used when a plane splits an edge.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        let new_pos = self.pos + (other.pos - self.pos) * t;
        let new_normal = self.normal + (other.normal - self.normal) * t;
        Vertex::new(new_pos, new_normal)
    }
}

#[cfg(test)]
mod tests {
    use super::Vertex;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn interpolate_midpoint() {
        let a = Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z());
        let b = Vertex::new(Point3::new(2.0, 0.0, 0.0), Vector3::z());
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.pos, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mid.normal, Vector3::z());
    }

    #[test]
    fn flip_negates_normal() {
        let mut v = Vertex::new(Point3::origin(), Vector3::z());
        v.flip();
        assert_eq!(v.normal, -Vector3::z());
    }
}
