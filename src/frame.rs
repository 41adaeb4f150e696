//! Initial orientation of a swept profile: the minimal rotation that carries
//! the sketch plane's normal onto the path's start tangent.

use crate::errors::{PipelineError, PipelineResult};
use crate::float_types::{EPSILON, Real};
use nalgebra::{Matrix4, Point3, Translation3, UnitQuaternion, Vector3};

/// Placement of the profile at the start of a sweep path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileOrientation {
    /// Rotation taking the profile's +Z normal onto the start tangent.
    pub rotation: UnitQuaternion<Real>,
    /// Start point of the path; the profile is centered here.
    pub base: Point3<Real>,
}

impl ProfileOrientation {
    /// Orient a profile at `p0` facing along the chord from `p0` to `p1`.
    ///
    /// Uses the shortest-arc rotation between the profile normal and the
    /// tangent, which is well defined for every direction including straight
    /// up and straight down.
    pub fn from_initial_direction(
        p0: Point3<Real>,
        p1: Point3<Real>,
    ) -> PipelineResult<Self> {
        let chord = p1 - p0;
        if chord.norm() < EPSILON {
            return Err(PipelineError::DegenerateFrame {
                reason: format!(
                    "path start points coincide ({:?} and {:?})",
                    p0, p1
                ),
            });
        }
        let rotation = UnitQuaternion::rotation_between(&Vector3::z(), &chord)
            .unwrap_or_else(|| {
                // chord is anti-parallel to +Z: flip around X
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), crate::float_types::PI)
            });
        Ok(ProfileOrientation {
            rotation,
            base: p0,
        })
    }

    /// Homogeneous transform placing profile-space points into world space.
    pub fn to_matrix(&self) -> Matrix4<Real> {
        Translation3::from(self.base.coords).to_homogeneous() * self.rotation.to_homogeneous()
    }
}
