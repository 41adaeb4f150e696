//! STL export, plus the meshing parameters used to refine a mesh before it
//! is written out.

use crate::errors::{PipelineError, PipelineResult};
use crate::float_types::EPSILON;
use crate::mesh::Mesh;
use crate::triangulated::Triangulated3D;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::io::Cursor;
use std::num::NonZeroU32;
use std::path::Path;

/// Refinement applied to a mesh before export.
///
/// `fineness` levels of midpoint subdivision quadruple the triangle count
/// each; `optimize` recomputes vertex normals from the face planes;
/// `allow_quad` keeps four-sided faces instead of fanning them into
/// triangles. Curved (second-order) elements are not representable in a
/// triangle soup, so requesting them is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshingParams {
    pub fineness: u32,
    pub second_order: bool,
    pub optimize: bool,
    pub allow_quad: bool,
}

impl MeshingParams {
    /// The refinement used for the high-resolution export.
    pub const fn fine() -> Self {
        MeshingParams {
            fineness: 2,
            second_order: false,
            optimize: true,
            allow_quad: false,
        }
    }

    /// Apply this refinement to `mesh`, returning the refined copy.
    pub fn apply<S: Clone + Debug + Send + Sync>(
        &self,
        mesh: &Mesh<S>,
    ) -> PipelineResult<Mesh<S>> {
        if self.second_order {
            return Err(PipelineError::InvalidParameter {
                parameter: "second_order",
                reason: "curved elements cannot be represented in a triangle mesh".into(),
            });
        }
        let mut out = if self.allow_quad {
            mesh.clone()
        } else {
            mesh.triangulate()
        };
        if let Some(levels) = NonZeroU32::new(self.fineness) {
            out = out.subdivide_triangles(levels);
        }
        if self.optimize {
            out.renormalize();
        }
        Ok(out)
    }
}

impl Default for MeshingParams {
    fn default() -> Self {
        MeshingParams {
            fineness: 0,
            second_order: false,
            optimize: true,
            allow_quad: false,
        }
    }
}

/// Convert a shape to an ASCII STL string with the given solid `name`.
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    to_stl_ascii_multi(&[shape], name)
}

/// Convert several shapes to one ASCII STL solid. STL has no per-solid
/// structure worth preserving here, so the facets are simply concatenated.
pub fn to_stl_ascii_multi<T: Triangulated3D>(shapes: &[&T], name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    for shape in shapes {
        shape.visit_triangles(|tri| {
            let n = facet_normal(&tri);
            out.push_str(&format!("  facet normal {:.6} {:.6} {:.6}\n", n.x, n.y, n.z));
            out.push_str("    outer loop\n");
            for v in &tri {
                let p = v.pos;
                out.push_str(&format!("      vertex {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
            }
            out.push_str("    endloop\n");
            out.push_str("  endfacet\n");
        });
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Convert a shape to binary STL bytes.
pub fn to_stl_binary<T: Triangulated3D>(shape: &T, name: &str) -> std::io::Result<Vec<u8>> {
    to_stl_binary_multi(&[shape], name)
}

/// Convert several shapes to one binary STL, facets concatenated.
pub fn to_stl_binary_multi<T: Triangulated3D>(
    shapes: &[&T],
    _name: &str,
) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    for shape in shapes {
        shape.visit_triangles(|tri| {
            let n = facet_normal(&tri);
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|v| {
                    let p = v.pos;
                    Vertex::new([p.x as f32, p.y as f32, p.z as f32])
                }),
            });
        });
    }

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Facet normal from the triangle's own geometry, falling back to the stored
/// vertex normal for slivers.
fn facet_normal(tri: &[crate::vertex::Vertex; 3]) -> nalgebra::Vector3<crate::float_types::Real> {
    let cross = (tri[1].pos - tri[0].pos).cross(&(tri[2].pos - tri[0].pos));
    if cross.norm() > EPSILON {
        cross.normalize()
    } else {
        tri[0].normal
    }
}

/// Write `shape` to `path` as ASCII STL.
pub fn write_stl_ascii<T: Triangulated3D>(
    shape: &T,
    path: &Path,
    name: &str,
) -> PipelineResult<()> {
    std::fs::write(path, to_stl_ascii(shape, name))?;
    tracing::info!(path = %path.display(), "wrote ASCII STL");
    Ok(())
}

/// Write `shape` to `path` as binary STL.
pub fn write_stl_binary<T: Triangulated3D>(
    shape: &T,
    path: &Path,
    name: &str,
) -> PipelineResult<()> {
    write_stl_binary_multi(&[shape], path, name)
}

/// Write several shapes to `path` as one binary STL.
pub fn write_stl_binary_multi<T: Triangulated3D>(
    shapes: &[&T],
    path: &Path,
    name: &str,
) -> PipelineResult<()> {
    let bytes = to_stl_binary_multi(shapes, name)?;
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), solids = shapes.len(), "wrote binary STL");
    Ok(())
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self, name: &str) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::MeshingParams;
    use crate::mesh::Mesh;

    #[test]
    fn binary_stl_has_the_right_size() {
        let sphere: Mesh<()> = Mesh::sphere(1.0, 8, 4, None);
        let tri_count: usize = sphere
            .polygons
            .iter()
            .map(|p| p.vertices.len().saturating_sub(2))
            .sum();
        let bytes = sphere.to_stl_binary("ball").unwrap();
        // 80-byte header + u32 count + 50 bytes per triangle
        assert_eq!(bytes.len(), 84 + 50 * tri_count);
    }

    #[test]
    fn ascii_stl_is_named_and_closed() {
        let sphere: Mesh<()> = Mesh::sphere(1.0, 8, 4, None);
        let text = sphere.to_stl_ascii("ball");
        assert!(text.starts_with("solid ball\n"));
        assert!(text.ends_with("endsolid ball\n"));
        assert!(text.contains("facet normal"));
    }

    #[test]
    fn multi_solid_export_concatenates_facets() {
        let a: Mesh<()> = Mesh::sphere(1.0, 8, 4, None);
        let b = a.translate(3.0, 0.0, 0.0);
        let single = a.to_stl_binary("pair").unwrap();
        let pair = super::to_stl_binary_multi(&[&a, &b], "pair").unwrap();
        assert_eq!(pair.len() - 84, 2 * (single.len() - 84));
    }

    #[test]
    fn fineness_quadruples_triangles_per_level() {
        let sphere: Mesh<()> = Mesh::sphere(1.0, 8, 4, None);
        let base = sphere.triangulate().polygons.len();
        let params = MeshingParams {
            fineness: 2,
            ..MeshingParams::default()
        };
        let refined = params.apply(&sphere).unwrap();
        assert_eq!(refined.polygons.len(), base * 16);
    }

    #[test]
    fn second_order_is_rejected() {
        let sphere: Mesh<()> = Mesh::sphere(1.0, 8, 4, None);
        let params = MeshingParams {
            second_order: true,
            ..MeshingParams::default()
        };
        assert!(params.apply(&sphere).is_err());
    }

    #[test]
    fn refinement_preserves_watertightness() {
        let sphere: Mesh<()> = Mesh::sphere(1.0, 8, 4, None);
        let refined = MeshingParams::fine().apply(&sphere).unwrap();
        assert!(refined.is_manifold());
    }
}
