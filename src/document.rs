//! The project document: a JSON record of the parameters behind a generation
//! run and the files it produced, saved next to the exported meshes.

use crate::errors::{PipelineError, PipelineResult};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::pipeline::OrnamentParams;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::Path;

/// Current document format version.
pub const FORMAT_VERSION: u32 = 1;

const FORMAT_NAME: &str = "manamesh";

/// Measurements of one generated solid, captured at export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidStats {
    /// Which solid the numbers describe.
    pub name: String,
    /// Polygon count before any export-time refinement.
    pub polygons: usize,
    /// Enclosed volume, by the divergence theorem.
    pub volume: Real,
}

/// The top-level project file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Format identifier.
    pub format: String,
    /// Format version number.
    pub version: u32,
    /// Human-readable project name.
    pub name: String,
    /// The parameters the geometry was generated from.
    pub params: OrnamentParams,
    /// Per-solid measurements from the run.
    pub solids: Vec<SolidStats>,
    /// File names written by the run, in order.
    pub outputs: Vec<String>,
}

impl Document {
    pub fn new(name: impl Into<String>, params: OrnamentParams) -> Self {
        Document {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            name: name.into(),
            params,
            solids: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Remember an exported file by name.
    pub fn record_output(&mut self, path: &Path) {
        self.outputs.push(path.display().to_string());
    }

    /// Capture polygon count and volume for a named solid.
    pub fn record_solid<S: Clone + Debug + Send + Sync>(
        &mut self,
        name: impl Into<String>,
        mesh: &Mesh<S>,
    ) {
        self.solids.push(SolidStats {
            name: name.into(),
            polygons: mesh.polygons.len(),
            volume: mesh.volume(),
        });
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON, validating the format identifier and version.
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let doc: Document = serde_json::from_str(json)?;
        if doc.format != FORMAT_NAME {
            return Err(PipelineError::ProjectFormat {
                reason: format!("unknown format identifier `{}`", doc.format),
            });
        }
        if doc.version > FORMAT_VERSION {
            return Err(PipelineError::ProjectFormat {
                reason: format!(
                    "document version {} is newer than supported version {}",
                    doc.version, FORMAT_VERSION
                ),
            });
        }
        Ok(doc)
    }

    /// Write the document to `path`.
    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "wrote project document");
        Ok(())
    }

    /// Read a document back from `path`.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::pipeline::OrnamentParams;

    #[test]
    fn document_round_trips_through_json() {
        let mut doc = Document::new("mana_item", OrnamentParams::default());
        doc.record_output(std::path::Path::new("mana_item.stl"));
        let json = doc.to_json().unwrap();
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back.name, "mana_item");
        assert_eq!(back.params, OrnamentParams::default());
        assert_eq!(back.outputs, vec!["mana_item.stl"]);
    }

    #[test]
    fn solid_stats_survive_serialization() {
        let ball = crate::mesh::Mesh::<()>::sphere(2.0, 16, 8, None);
        let mut doc = Document::new("mana_item", OrnamentParams::default());
        doc.record_solid("ornament", &ball);
        let back = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back.solids.len(), 1);
        assert_eq!(back.solids[0].name, "ornament");
        assert_eq!(back.solids[0].polygons, ball.polygons.len());
        assert!(back.solids[0].volume > 0.0);
    }

    #[test]
    fn foreign_formats_are_rejected() {
        let doc = Document::new("x", OrnamentParams::default());
        let json = doc.to_json().unwrap().replace("manamesh", "waffle-iron");
        assert!(Document::from_json(&json).is_err());
    }

    #[test]
    fn future_versions_are_rejected() {
        let doc = Document::new("x", OrnamentParams::default());
        let json = doc
            .to_json()
            .unwrap()
            .replace("\"version\": 1", "\"version\": 99");
        assert!(Document::from_json(&json).is_err());
    }
}
