//! Error types for the generation pipeline.
//!
//! Every stage failure is fatal to the run: the pipeline is a strict
//! sequential chain, so errors propagate up to the caller unchanged.

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// All the ways a generation run can fail.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A shape or meshing parameter is outside its valid domain.
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Why the value is rejected.
        reason: String,
    },

    /// The profile orientation at the path start is undefined.
    #[error("degenerate frame: {reason}")]
    DegenerateFrame {
        /// Why no orientation exists.
        reason: String,
    },

    /// The sweep cannot produce a valid tube from its inputs.
    #[error("sweep geometry error: {reason}")]
    SweepGeometry {
        /// Why the sweep is rejected.
        reason: String,
    },

    /// A boolean operation produced an invalid result.
    #[error("boolean operation error: {reason}")]
    BooleanOperation {
        /// Why the result is rejected.
        reason: String,
    },

    /// Writing a mesh or project file failed.
    #[error("export failed: {0}")]
    ExportIo(#[from] std::io::Error),

    /// Serializing the project document failed.
    #[error("project file error: {0}")]
    ProjectFile(#[from] serde_json::Error),

    /// A project document declares a format or version this build cannot read.
    #[error("unsupported project document: {reason}")]
    ProjectFormat {
        /// What the document declared.
        reason: String,
    },
}
