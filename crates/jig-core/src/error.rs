//! Rebuild errors

use jig_cad::CadError;

/// Error aborting an assembly rebuild
///
/// Every variant is fatal to the current rebuild; the previously displayed
/// scene stays as it was.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Joint '{joint}' not found on part '{part}'")]
    JointNotFound { part: String, joint: String },

    #[error("Geometry build failed: {0}")]
    Geometry(#[from] CadError),

    #[error("Duplicate joint '{joint}' on part '{part}'")]
    DuplicateJoint { part: String, joint: String },

    #[error("Duplicate part key: {0}")]
    DuplicatePart(String),

    #[error("Unknown part key: {0}")]
    UnknownPart(String),

    #[error("Part '{0}' is referenced before it is placed")]
    UnplacedReference(String),

    #[error("Part '{0}' is placed more than once")]
    PlacedTwice(String),

    #[error("Part '{0}' has no placement")]
    UnplacedPart(String),
}

/// Result type for rebuilds
pub type BuildResult<T> = Result<T, BuildError>;
