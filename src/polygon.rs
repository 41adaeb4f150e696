//! Planar polygons with cached plane and bounding box.

use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::plane::Plane;
use crate::vertex::Vertex;
use nalgebra::{Point3, partial_max, partial_min};
use std::fmt::Debug;
use std::num::NonZeroU32;
use std::sync::OnceLock;

/// A convex polygon in 3D space, the building block of a [`Mesh`](crate::mesh::Mesh).
///
/// Vertices wind counter-clockwise when viewed from the front side of
/// `plane`. `S` is a caller-supplied metadata type carried through boolean
/// operations.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone + Send + Sync + Debug> {
    /// Vertices in winding order. At least three.
    pub vertices: Vec<Vertex>,

    /// The plane all vertices lie on.
    pub plane: Plane,

    /// Lazily calculated AABB spanning `vertices`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Polygon<S> {
    /// Build a polygon, deriving its plane from the first three vertices.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Build a polygon with an explicitly supplied plane. Used when
    /// splitting, where the parent's plane is more accurate than one
    /// recomputed from the fragment.
    pub fn with_plane(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Reverse winding order, flip all vertex normals and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    /// Recompute the plane from the current vertex positions and assign its
    /// normal to every vertex.
    pub fn set_new_normal(&mut self) {
        self.plane = Plane::from_vertices(&self.vertices);
        let n = self.plane.normal();
        for v in &mut self.vertices {
            v.normal = n;
        }
    }

    /// Fan-triangulate this polygon. All polygons produced by this crate
    /// (sweep walls, sphere quads, split fragments) are convex, so a fan
    /// from the first vertex suffices.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let n = self.vertices.len();
        if n < 3 {
            return Vec::new();
        }
        (1..n - 1)
            .map(|i| {
                [
                    self.vertices[0].clone(),
                    self.vertices[i].clone(),
                    self.vertices[i + 1].clone(),
                ]
            })
            .collect()
    }

    /// Triangulate, then subdivide each triangle `levels` times by edge
    /// midpoints, yielding `4^levels` triangles per input triangle.
    pub fn subdivide_triangles(&self, levels: NonZeroU32) -> Vec<[Vertex; 3]> {
        let mut triangles = self.triangulate();
        for _ in 0..levels.get() {
            triangles = triangles
                .into_iter()
                .flat_map(|tri| {
                    let [a, b, c] = tri;
                    let ab = a.interpolate(&b, 0.5);
                    let bc = b.interpolate(&c, 0.5);
                    let ca = c.interpolate(&a, 0.5);
                    [
                        [a.clone(), ab.clone(), ca.clone()],
                        [ab.clone(), b.clone(), bc.clone()],
                        [ca.clone(), bc.clone(), c.clone()],
                        [ab, bc, ca],
                    ]
                })
                .collect();
        }
        triangles
    }

    /// AABB spanning this polygon's vertices.
    pub fn bounding_box(&self) -> &Aabb {
        self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins.x = *partial_min(&mins.x, &v.pos.x).unwrap();
                mins.y = *partial_min(&mins.y, &v.pos.y).unwrap();
                mins.z = *partial_min(&mins.z, &v.pos.z).unwrap();
                maxs.x = *partial_max(&maxs.x, &v.pos.x).unwrap();
                maxs.y = *partial_max(&maxs.y, &v.pos.y).unwrap();
                maxs.z = *partial_max(&maxs.z, &v.pos.z).unwrap();
            }
            Aabb::new(mins, maxs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn quad() -> Polygon<()> {
        Polygon::new(
            vec![
                Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
                Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
                Vertex::new(Point3::new(1.0, 1.0, 0.0), Vector3::z()),
                Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
            ],
            None,
        )
    }

    #[test]
    fn quad_triangulates_into_two() {
        assert_eq!(quad().triangulate().len(), 2);
    }

    #[test]
    fn subdivision_quadruples_triangles() {
        let one = NonZeroU32::new(1).unwrap();
        let two = NonZeroU32::new(2).unwrap();
        assert_eq!(quad().subdivide_triangles(one).len(), 8);
        assert_eq!(quad().subdivide_triangles(two).len(), 32);
    }

    #[test]
    fn flip_reverses_plane() {
        let mut p = quad();
        let n = p.plane.normal();
        p.flip();
        assert_eq!(p.plane.normal(), -n);
    }
}
