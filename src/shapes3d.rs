//! 3D primitive solids.

use crate::float_types::{PI, Real, TAU};
use crate::mesh::Mesh;
use crate::polygon::Polygon;
use crate::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Construct a UV sphere of the given `radius` centered at the origin.
    ///
    /// `segments` is the longitudinal resolution (around the poles axis),
    /// `stacks` the latitudinal one. Pole cells degenerate to triangles,
    /// every other cell is a quad; all normals point outward.
    ///
    /// # Example
    /// ```
    /// use manamesh::mesh::Mesh;
    /// let ball: Mesh<()> = Mesh::sphere(10.0, 32, 16, None);
    /// assert!(ball.is_manifold());
    /// ```
    pub fn sphere(radius: Real, segments: usize, stacks: usize, metadata: Option<S>) -> Mesh<S> {
        let mut polygons = Vec::with_capacity(segments * stacks);

        for i in 0..segments {
            for j in 0..stacks {
                let mut vertices = Vec::with_capacity(4);

                let vertex = |theta: Real, phi: Real| {
                    let dir =
                        Vector3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
                    Vertex::new(Point3::from(dir * radius), dir)
                };

                let theta0 = i as Real / segments as Real * TAU;
                let theta1 = (i + 1) as Real / segments as Real * TAU;
                let phi0 = j as Real / stacks as Real * PI;
                let phi1 = (j + 1) as Real / stacks as Real * PI;

                vertices.push(vertex(theta0, phi0));
                if j > 0 {
                    vertices.push(vertex(theta1, phi0));
                }
                if j < stacks - 1 {
                    vertices.push(vertex(theta1, phi1));
                }
                vertices.push(vertex(theta0, phi1));

                polygons.push(Polygon::new(vertices, metadata.clone()));
            }
        }

        Mesh::from_polygons(&polygons, metadata)
    }
}

#[cfg(test)]
mod tests {
    use crate::float_types::{PI, Real};
    use crate::mesh::Mesh;

    #[test]
    fn sphere_is_watertight() {
        let ball: Mesh<()> = Mesh::sphere(2.0, 16, 8, None);
        assert_eq!(ball.polygons.len(), 16 * 8);
        assert!(ball.is_manifold());
    }

    #[test]
    fn sphere_volume_approaches_analytic() {
        let radius: Real = 2.0;
        let ball: Mesh<()> = Mesh::sphere(radius, 64, 32, None);
        let analytic = 4.0 / 3.0 * PI * radius.powi(3);
        let measured = ball.volume();
        // Tessellated volume is below the analytic value but close.
        assert!(measured < analytic);
        assert!(measured > 0.97 * analytic);
    }
}
