//! End-to-end generation of the mana item: a sphere pierced by a tube swept
//! along a hypotrochoid, exported as STL at two resolutions together with a
//! JSON project document.

use crate::curve::Hypotrochoid;
use crate::document::Document;
use crate::errors::{PipelineError, PipelineResult};
use crate::extrudes::{FrameMode, SweepConfig};
use crate::float_types::{PI, Real, parry3d::bounding_volume::BoundingVolume};
use crate::frame::ProfileOrientation;
use crate::io::{MeshingParams, write_stl_binary_multi};
use crate::mesh::Mesh;
use crate::sketch::Sketch;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;

/// Everything the ornament is generated from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrnamentParams {
    /// The path curve the tube follows.
    pub curve: Hypotrochoid,
    /// Parameter span to sample; `6π` closes the default curve exactly.
    pub span: Real,
    /// Number of path samples, endpoints included.
    pub path_samples: usize,
    /// Radius of the tube's circular cross-section.
    pub tube_radius: Real,
    /// Segments in the tube's cross-section polygon.
    pub profile_segments: usize,
    /// Radius of the sphere the tube is carved out of.
    pub sphere_radius: Real,
    /// Longitudinal segments of the sphere.
    pub sphere_segments: usize,
    /// Latitudinal stacks of the sphere.
    pub sphere_stacks: usize,
    /// How the tube profile is oriented along the path.
    pub frame_mode: FrameMode,
}

impl Default for OrnamentParams {
    fn default() -> Self {
        OrnamentParams {
            curve: Hypotrochoid::default(),
            span: 6.0 * PI,
            path_samples: 200,
            tube_radius: 0.5,
            profile_segments: 24,
            sphere_radius: 10.0,
            sphere_segments: 32,
            sphere_stacks: 16,
            frame_mode: FrameMode::NonFrenet,
        }
    }
}

impl OrnamentParams {
    fn validate(&self) -> PipelineResult<()> {
        if self.tube_radius <= 0.0 {
            return Err(PipelineError::InvalidParameter {
                parameter: "tube_radius",
                reason: format!("must be positive, got {}", self.tube_radius),
            });
        }
        if self.sphere_radius <= 0.0 {
            return Err(PipelineError::InvalidParameter {
                parameter: "sphere_radius",
                reason: format!("must be positive, got {}", self.sphere_radius),
            });
        }
        if self.profile_segments < 3 {
            return Err(PipelineError::InvalidParameter {
                parameter: "profile_segments",
                reason: format!("need at least 3, got {}", self.profile_segments),
            });
        }
        if self.sphere_segments < 3 || self.sphere_stacks < 2 {
            return Err(PipelineError::InvalidParameter {
                parameter: "sphere_segments",
                reason: format!(
                    "need at least 3 segments and 2 stacks, got {}x{}",
                    self.sphere_segments, self.sphere_stacks
                ),
            });
        }
        Ok(())
    }
}

/// The two solids a run produces. Both are exported, the way the tube stays
/// visible inside the translucent cut sphere in the original model.
#[derive(Clone, Debug)]
pub struct GeneratedSolids {
    /// The tube swept along the hypotrochoid.
    pub tube: Mesh<()>,
    /// The sphere with the tube carved out of it.
    pub ornament: Mesh<()>,
}

/// Generate the pierced sphere from `params`.
pub fn generate(params: &OrnamentParams) -> PipelineResult<Mesh<()>> {
    Ok(generate_solids(params)?.ornament)
}

/// Generate both the tube and the pierced sphere.
pub fn generate_solids(params: &OrnamentParams) -> PipelineResult<GeneratedSolids> {
    params.validate()?;

    let path = params.curve.sample(params.span, params.path_samples)?;
    let orientation = ProfileOrientation::from_initial_direction(path[0], path[1])?;
    tracing::debug!(samples = path.len(), "sampled hypotrochoid path");

    let profile: Sketch<()> = Sketch::circle(params.tube_radius, params.profile_segments, None);
    let config = SweepConfig {
        orientation,
        solid: true,
        frame_mode: params.frame_mode,
    };
    let tube = profile.sweep(&path, &config)?;
    tracing::debug!(polygons = tube.polygons.len(), "swept tube");

    let sphere: Mesh<()> = Mesh::sphere(
        params.sphere_radius,
        params.sphere_segments,
        params.sphere_stacks,
        None,
    );

    let pierced = subtract(&sphere, &tube)?;
    tracing::info!(
        polygons = pierced.polygons.len(),
        volume = pierced.volume(),
        "generated ornament"
    );
    Ok(GeneratedSolids {
        tube,
        ornament: pierced,
    })
}

/// Subtract `cutter` from `base`, validating the result.
///
/// A cutter that cannot touch the base leaves it unchanged (with a warning);
/// a difference that consumes the base entirely is an error.
pub fn subtract<S: Clone + Debug + Send + Sync>(
    base: &Mesh<S>,
    cutter: &Mesh<S>,
) -> PipelineResult<Mesh<S>> {
    if !base.bounding_box().intersects(&cutter.bounding_box()) {
        tracing::warn!("cutter does not overlap the base solid; nothing subtracted");
        return Ok(base.clone());
    }
    let out = base.difference(cutter);
    if out.polygons.is_empty() {
        return Err(PipelineError::BooleanOperation {
            reason: "difference produced an empty mesh".into(),
        });
    }
    Ok(out)
}

/// Run the whole pipeline: generate the solids and write the project
/// document plus coarse and fine binary STLs into `out_dir`. Each STL
/// contains both the tube and the pierced sphere.
pub fn export(params: &OrnamentParams, out_dir: &Path) -> PipelineResult<Document> {
    std::fs::create_dir_all(out_dir)?;
    let solids = generate_solids(params)?;

    let mut doc = Document::new("mana_item", *params);
    doc.record_solid("tube", &solids.tube);
    doc.record_solid("ornament", &solids.ornament);

    let coarse_path = out_dir.join("mana_item.stl");
    write_stl_binary_multi(&[&solids.tube, &solids.ornament], &coarse_path, "mana_item")?;
    doc.record_output(&coarse_path);

    let refinement = MeshingParams::fine();
    let fine_tube = refinement.apply(&solids.tube)?;
    let fine_ornament = refinement.apply(&solids.ornament)?;
    let fine_path = out_dir.join("mana_item_fine.stl");
    write_stl_binary_multi(&[&fine_tube, &fine_ornament], &fine_path, "mana_item")?;
    doc.record_output(&fine_path);

    doc.save(&out_dir.join("mana_item.json"))?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::{OrnamentParams, generate, subtract};
    use crate::mesh::Mesh;
    use nalgebra::Vector3;

    fn quick_params() -> OrnamentParams {
        OrnamentParams {
            path_samples: 80,
            profile_segments: 8,
            sphere_segments: 16,
            sphere_stacks: 8,
            ..OrnamentParams::default()
        }
    }

    #[test]
    fn reduced_resolution_ornament_is_carved_from_the_sphere() {
        let params = quick_params();
        let ornament = generate(&params).unwrap();
        assert!(!ornament.polygons.is_empty());

        let sphere: Mesh<()> = Mesh::sphere(
            params.sphere_radius,
            params.sphere_segments,
            params.sphere_stacks,
            None,
        );
        assert!(ornament.volume() < sphere.volume());
        // carving cannot grow the extents
        let bb = ornament.bounding_box();
        assert!(bb.maxs.x <= params.sphere_radius + 1e-6);
        assert!(bb.mins.x >= -params.sphere_radius - 1e-6);
    }

    #[test]
    fn disjoint_cutter_is_a_no_op() {
        let base: Mesh<()> = Mesh::sphere(1.0, 8, 4, None);
        let cutter = Mesh::sphere(1.0, 8, 4, None).translate_vector(Vector3::new(10.0, 0.0, 0.0));
        let out = subtract(&base, &cutter).unwrap();
        assert_eq!(out.polygons.len(), base.polygons.len());
    }

    #[test]
    fn subtracting_a_solid_from_itself_is_an_error() {
        let base: Mesh<()> = Mesh::sphere(1.0, 8, 4, None);
        assert!(subtract(&base, &base.clone()).is_err());
    }

    #[test]
    fn nonpositive_tube_radius_is_rejected() {
        let params = OrnamentParams {
            tube_radius: 0.0,
            ..quick_params()
        };
        assert!(generate(&params).is_err());
    }

    #[test]
    fn degenerate_sphere_resolution_is_rejected() {
        let params = OrnamentParams {
            sphere_stacks: 1,
            ..quick_params()
        };
        assert!(generate(&params).is_err());
    }
}
