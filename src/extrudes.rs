//! Sweeping 2D `Sketch`s along 3D paths into `Mesh`s.

use crate::errors::{PipelineError, PipelineResult};
use crate::float_types::{EPSILON, Real};
use crate::frame::ProfileOrientation;
use crate::mesh::Mesh;
use crate::polygon::Polygon;
use crate::sketch::Sketch;
use crate::vertex::Vertex;
use geo::{CoordsIter, Polygon as GeoPolygon};
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// How the profile is oriented at each point along the path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameMode {
    /// Parallel transport: carry the profile along with the minimal rotation
    /// between successive tangents. No spurious twist on straight runs, and
    /// any holonomy picked up around a closed path is spread evenly so the
    /// seam matches.
    #[default]
    NonFrenet,
    /// Frenet frames: align the profile with the curve's tangent and
    /// curvature normal. Twists wherever the curvature direction swings.
    Frenet,
}

/// Settings for [`Sketch::sweep`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepConfig {
    /// Placement of the first profile slice. Ignored by
    /// [`FrameMode::Frenet`], which derives every slice from the curve.
    pub orientation: ProfileOrientation,
    /// Cap open ends so the result encloses a volume.
    pub solid: bool,
    pub frame_mode: FrameMode,
}

impl SweepConfig {
    pub const fn new(orientation: ProfileOrientation) -> Self {
        SweepConfig {
            orientation,
            solid: true,
            frame_mode: FrameMode::NonFrenet,
        }
    }
}

impl<S: Clone + Debug + Send + Sync> Sketch<S> {
    /// Sweep this sketch along `path`, placing one copy of the profile at
    /// every path vertex and stitching side walls between successive slices.
    ///
    /// If the first and last points coincide (within `EPSILON`) the path is
    /// treated as closed: the duplicate endpoint is dropped, the walls wrap
    /// around, and no caps are added. Open solid sweeps are capped at both
    /// ends.
    pub fn sweep(&self, path: &[Point3<Real>], config: &SweepConfig) -> PipelineResult<Mesh<S>> {
        if path.len() < 2 {
            return Err(PipelineError::SweepGeometry {
                reason: format!("path needs at least 2 points, got {}", path.len()),
            });
        }
        let polys_2d = self.polygons_2d();
        if polys_2d.is_empty() {
            return Err(PipelineError::SweepGeometry {
                reason: "profile sketch contains no polygons".into(),
            });
        }

        let closed = (path[0] - path[path.len() - 1]).norm() < EPSILON;
        let pts: &[Point3<Real>] = if closed {
            &path[..path.len() - 1]
        } else {
            path
        };
        let n_path = pts.len();
        if closed && n_path < 3 {
            return Err(PipelineError::SweepGeometry {
                reason: "closed path needs at least 3 distinct points".into(),
            });
        }
        for i in 0..n_path - 1 {
            if (pts[i + 1] - pts[i]).norm() < EPSILON {
                return Err(PipelineError::SweepGeometry {
                    reason: format!("path points {} and {} coincide", i, i + 1),
                });
            }
        }

        // collect every ring (exterior and holes), normalized to first == last
        let mut rings: Vec<Vec<[Real; 2]>> = Vec::new();
        for poly in &polys_2d {
            for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
                let mut coords: Vec<[Real; 2]> =
                    ring.coords_iter().map(|c| [c.x, c.y]).collect();
                if coords.len() < 3 {
                    continue;
                }
                if coords.first() != coords.last() {
                    coords.push(coords[0]);
                }
                rings.push(coords);
            }
        }
        if rings.is_empty() {
            return Err(PipelineError::SweepGeometry {
                reason: "profile sketch has no usable rings".into(),
            });
        }

        let profile_radius = rings
            .iter()
            .flatten()
            .map(|c| (c[0] * c[0] + c[1] * c[1]).sqrt())
            .fold(0.0 as Real, Real::max);
        warn_on_tight_bends(pts, closed, profile_radius);

        let orientations = match config.frame_mode {
            FrameMode::NonFrenet => transport_orientations(pts, closed, config),
            FrameMode::Frenet => frenet_orientations(pts, closed),
        };
        let slice_xforms: Vec<Matrix4<Real>> = pts
            .iter()
            .zip(&orientations)
            .map(|(p, rot)| {
                ProfileOrientation {
                    rotation: UnitQuaternion::from_rotation_matrix(rot),
                    base: *p,
                }
                .to_matrix()
            })
            .collect();

        let mut out_polys: Vec<Polygon<S>> = Vec::new();

        // side walls, two triangles per cell
        let band_count = if closed { n_path } else { n_path - 1 };
        for ring in &rings {
            let v_per_ring = ring.len() - 1;
            let slices: Vec<Vec<Point3<Real>>> = slice_xforms
                .iter()
                .map(|xf| ring.iter().map(|&c| map_profile_point(c, xf)).collect())
                .collect();
            for i in 0..band_count {
                let j = (i + 1) % n_path;
                let slice_i = &slices[i];
                let slice_j = &slices[j];
                for k in 0..v_per_ring {
                    let v0 = slice_i[k];
                    let v1 = slice_i[k + 1];
                    let v2 = slice_j[k + 1];
                    let v3 = slice_j[k];
                    out_polys.push(Polygon::new(
                        vec![
                            Vertex::new(v0, Vector3::zeros()),
                            Vertex::new(v1, Vector3::zeros()),
                            Vertex::new(v2, Vector3::zeros()),
                        ],
                        self.metadata.clone(),
                    ));
                    out_polys.push(Polygon::new(
                        vec![
                            Vertex::new(v0, Vector3::zeros()),
                            Vertex::new(v2, Vector3::zeros()),
                            Vertex::new(v3, Vector3::zeros()),
                        ],
                        self.metadata.clone(),
                    ));
                }
            }
        }

        // caps for open solid sweeps
        if !closed && config.solid {
            for poly in &polys_2d {
                let tris = triangulate_profile(poly);
                let start = &slice_xforms[0];
                let end = &slice_xforms[n_path - 1];
                for t in &tris {
                    // start cap faces backwards along the path
                    out_polys.push(Polygon::new(
                        vec![
                            Vertex::new(map_profile_point(t[2], start), Vector3::zeros()),
                            Vertex::new(map_profile_point(t[1], start), Vector3::zeros()),
                            Vertex::new(map_profile_point(t[0], start), Vector3::zeros()),
                        ],
                        self.metadata.clone(),
                    ));
                    out_polys.push(Polygon::new(
                        vec![
                            Vertex::new(map_profile_point(t[0], end), Vector3::zeros()),
                            Vertex::new(map_profile_point(t[1], end), Vector3::zeros()),
                            Vertex::new(map_profile_point(t[2], end), Vector3::zeros()),
                        ],
                        self.metadata.clone(),
                    ));
                }
            }
        }

        let mut mesh = Mesh::from_polygons(&out_polys, self.metadata.clone());
        mesh.renormalize();
        Ok(mesh)
    }
}

/// Map a profile-space point (x, y, 0) through a slice transform.
#[inline]
fn map_profile_point(p2: [Real; 2], m: &Matrix4<Real>) -> Point3<Real> {
    let out = m * Point3::new(p2[0], p2[1], 0.0).to_homogeneous();
    Point3::new(out.x, out.y, out.z)
}

/// Outgoing unit tangent at path vertex `i`.
fn outgoing_tangent(pts: &[Point3<Real>], i: usize, closed: bool) -> Vector3<Real> {
    let n = pts.len();
    if i == n - 1 && !closed {
        (pts[i] - pts[i - 1]).normalize()
    } else {
        (pts[(i + 1) % n] - pts[i]).normalize()
    }
}

/// Parallel-transport frames: seed the first slice from the configured
/// orientation, then carry it forward with the minimal rotation between
/// successive tangents. For closed paths the residual twist accumulated
/// around the loop is distributed evenly so the last band meets the first.
fn transport_orientations(
    pts: &[Point3<Real>],
    closed: bool,
    config: &SweepConfig,
) -> Vec<Rotation3<Real>> {
    let n_path = pts.len();
    let mut orientations: Vec<Rotation3<Real>> = Vec::with_capacity(n_path);

    let mut dir_prev = outgoing_tangent(pts, 0, closed);
    let mut orientation = config.orientation.rotation.to_rotation_matrix();
    orientations.push(orientation);

    for i in 1..n_path {
        let dir_curr = outgoing_tangent(pts, i, closed);
        let rot_between =
            Rotation3::rotation_between(&dir_prev, &dir_curr).unwrap_or_else(Rotation3::identity);
        orientation = rot_between * orientation;
        orientations.push(orientation);
        dir_prev = dir_curr;
    }

    if closed {
        // transporting once more around the seam should reproduce the first
        // frame; whatever it is off by is a pure twist about the tangent
        let dir_first = outgoing_tangent(pts, 0, closed);
        let rot_back =
            Rotation3::rotation_between(&dir_prev, &dir_first).unwrap_or_else(Rotation3::identity);
        let looped = rot_back * orientation;
        let delta = orientations[0].inverse() * looped;
        let spun = delta * Vector3::x();
        let holonomy = spun.y.atan2(spun.x);
        if holonomy.abs() > EPSILON {
            for (i, rot) in orientations.iter_mut().enumerate() {
                let untwist = Rotation3::from_axis_angle(
                    &Vector3::z_axis(),
                    -holonomy * (i as Real) / (n_path as Real),
                );
                *rot *= untwist;
            }
        }
    }

    orientations
}

/// Frenet frames: tangent from a central difference, normal from the turn
/// between the incoming and outgoing directions. Straight stretches carry
/// the previous normal forward.
fn frenet_orientations(pts: &[Point3<Real>], closed: bool) -> Vec<Rotation3<Real>> {
    let n = pts.len();
    let mut orientations = Vec::with_capacity(n);
    let mut prev_normal: Option<Vector3<Real>> = None;

    for i in 0..n {
        let t_in = if i == 0 {
            if closed {
                (pts[0] - pts[n - 1]).normalize()
            } else {
                outgoing_tangent(pts, 0, closed)
            }
        } else {
            (pts[i] - pts[i - 1]).normalize()
        };
        let t_out = outgoing_tangent(pts, i, closed);
        let tangent = (t_in + t_out).normalize();

        let turn = t_out - t_in;
        let mut normal = if turn.norm() > EPSILON {
            // project the curvature direction into the plane normal to the tangent
            let rejected = turn - tangent * turn.dot(&tangent);
            if rejected.norm() > EPSILON {
                rejected.normalize()
            } else {
                prev_normal.unwrap_or_else(|| perpendicular_to(&tangent))
            }
        } else {
            prev_normal.unwrap_or_else(|| perpendicular_to(&tangent))
        };
        // keep the normal field continuous across inflections
        if let Some(prev) = prev_normal {
            if normal.dot(&prev) < 0.0 {
                normal = -normal;
            }
        }
        let binormal = tangent.cross(&normal).normalize();
        let normal = binormal.cross(&tangent);
        prev_normal = Some(normal);

        orientations.push(Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
            normal, binormal, tangent,
        ])));
    }

    orientations
}

/// Any unit vector perpendicular to `v`.
fn perpendicular_to(v: &Vector3<Real>) -> Vector3<Real> {
    let candidate = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&candidate).normalize()
}

/// Warn when the profile is wider than the tightest bend of the path, which
/// makes the swept walls fold through themselves locally.
fn warn_on_tight_bends(pts: &[Point3<Real>], closed: bool, profile_radius: Real) {
    let n = pts.len();
    if n < 3 || profile_radius <= 0.0 {
        return;
    }
    let triple_count = if closed { n } else { n - 2 };
    let mut min_radius = Real::INFINITY;
    let mut min_index = 0;
    for i in 0..triple_count {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let c = pts[(i + 2) % n];
        let area2 = (b - a).cross(&(c - a)).norm();
        if area2 < EPSILON {
            continue;
        }
        let radius =
            (b - a).norm() * (c - b).norm() * (a - c).norm() / (2.0 * area2);
        if radius < min_radius {
            min_radius = radius;
            min_index = (i + 1) % n;
        }
    }
    if min_radius < profile_radius {
        tracing::warn!(
            min_bend_radius = min_radius,
            profile_radius,
            near_sample = min_index,
            "profile is wider than the tightest bend of the path; walls will locally self-intersect"
        );
    }
}

/// Ear-cut triangulation of a 2D polygon (outer boundary plus holes).
/// Every output triangle is normalized to counter-clockwise winding.
fn triangulate_profile(poly: &GeoPolygon<Real>) -> Vec<[[Real; 2]; 3]> {
    use geo::TriangulateEarcut;
    let triangulation = poly.earcut_triangles_raw();
    let vertices = triangulation.vertices;
    triangulation
        .triangle_indices
        .chunks_exact(3)
        .map(|tri| {
            let mut t = [
                [vertices[2 * tri[0]], vertices[2 * tri[0] + 1]],
                [vertices[2 * tri[1]], vertices[2 * tri[1] + 1]],
                [vertices[2 * tri[2]], vertices[2 * tri[2] + 1]],
            ];
            let doubled_area = (t[1][0] - t[0][0]) * (t[2][1] - t[0][1])
                - (t[2][0] - t[0][0]) * (t[1][1] - t[0][1]);
            if doubled_area < 0.0 {
                t.swap(1, 2);
            }
            t
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{FrameMode, SweepConfig};
    use crate::float_types::{PI, Real};
    use crate::frame::ProfileOrientation;
    use crate::sketch::Sketch;
    use nalgebra::Point3;

    fn straight_path(len: Real, steps: usize) -> Vec<Point3<Real>> {
        (0..=steps)
            .map(|i| Point3::new(0.0, 0.0, len * (i as Real) / (steps as Real)))
            .collect()
    }

    fn circle_path(radius: Real, n: usize) -> Vec<Point3<Real>> {
        (0..=n)
            .map(|i| {
                let theta = 2.0 * PI * (i as Real) / (n as Real);
                Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
            })
            .collect()
    }

    fn config_for(path: &[Point3<Real>]) -> SweepConfig {
        SweepConfig::new(ProfileOrientation::from_initial_direction(path[0], path[1]).unwrap())
    }

    #[test]
    fn straight_sweep_matches_prism_volume() {
        let profile: Sketch<()> = Sketch::circle(1.0, 32, None);
        let path = straight_path(4.0, 8);
        let solid = profile.sweep(&path, &config_for(&path)).unwrap();
        assert!(solid.is_manifold());
        // cross-section area of the 32-gon times the length
        let area = 0.5 * 32.0 * (2.0 * PI / 32.0).sin();
        let expected = area * 4.0;
        let volume = solid.volume();
        assert!(
            (volume - expected).abs() < 1e-6 * expected,
            "volume {} vs {}",
            volume,
            expected
        );
    }

    #[test]
    fn square_profile_sweeps_into_a_box() {
        let profile: Sketch<()> = Sketch::polygon(
            &[[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]],
            None,
        );
        let path = straight_path(3.0, 4);
        let solid = profile.sweep(&path, &config_for(&path)).unwrap();
        assert!(solid.is_manifold());
        assert!((solid.volume() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn closed_path_produces_a_watertight_torus() {
        let profile: Sketch<()> = Sketch::circle(0.5, 16, None);
        let path = circle_path(3.0, 48);
        let torus = profile.sweep(&path, &config_for(&path)).unwrap();
        assert!(torus.is_manifold());
        // pappus: V = 2 pi R A, loosened for the polygonal approximations
        let analytic = 2.0 * PI * 3.0 * PI * 0.25;
        let volume = torus.volume();
        assert!(
            volume > 0.9 * analytic && volume < analytic,
            "torus volume {} vs analytic {}",
            volume,
            analytic
        );
    }

    #[test]
    fn frenet_sweep_of_a_circle_is_watertight() {
        let profile: Sketch<()> = Sketch::circle(0.4, 12, None);
        let path = circle_path(3.0, 48);
        let mut config = config_for(&path);
        config.frame_mode = FrameMode::Frenet;
        let torus = profile.sweep(&path, &config).unwrap();
        assert!(torus.is_manifold());
    }

    #[test]
    fn shell_sweep_leaves_open_ends() {
        let profile: Sketch<()> = Sketch::circle(1.0, 12, None);
        let path = straight_path(2.0, 4);
        let mut config = config_for(&path);
        config.solid = false;
        let shell = profile.sweep(&path, &config).unwrap();
        assert!(!shell.is_manifold());
        // walls only: two triangles per cell, no cap triangles
        assert_eq!(shell.polygons.len(), 12 * 4 * 2);
    }

    #[test]
    fn short_paths_are_rejected() {
        let profile: Sketch<()> = Sketch::circle(1.0, 12, None);
        let path = [Point3::new(0.0, 0.0, 0.0)];
        assert!(
            profile
                .sweep(
                    &path,
                    &SweepConfig::new(
                        ProfileOrientation::from_initial_direction(
                            Point3::origin(),
                            Point3::new(0.0, 0.0, 1.0),
                        )
                        .unwrap()
                    )
                )
                .is_err()
        );
    }

    #[test]
    fn empty_profiles_are_rejected() {
        let empty: Sketch<()> = Sketch::new();
        let path = straight_path(1.0, 2);
        assert!(empty.sweep(&path, &config_for(&path)).is_err());
    }

    #[test]
    fn duplicate_path_points_are_rejected() {
        let profile: Sketch<()> = Sketch::circle(1.0, 12, None);
        let p = Point3::new(1.0, 0.0, 0.0);
        let path = [Point3::origin(), p, p, Point3::new(2.0, 0.0, 0.0)];
        let config = SweepConfig::new(
            ProfileOrientation::from_initial_direction(path[0], path[1]).unwrap(),
        );
        assert!(profile.sweep(&path, &config).is_err());
    }
}
