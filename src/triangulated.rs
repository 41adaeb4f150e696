//! The seam between solids and the triangle-based exporters.

use crate::vertex::Vertex;

/// Anything that can walk its boundary as triangles. The STL writers take
/// any `Triangulated3D`, so a mesh never has to be flattened up front.
pub trait Triangulated3D {
    /// Call `f` once per triangle, counterclockwise from outside.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Vertex; 3]);
}
