//! Error type for metadata generation.

use thiserror::Error;

use crate::operators::GeometryError;
use crate::polynomial::QuadratureError;

/// Error type for [`generate_metadata`](super::generate_metadata).
///
/// Any error aborts the whole pass; no partial result is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetadataError {
    /// Bad arguments: empty mesh, too few GLL points, bad tolerance.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A face cannot carry a GLL grid.
    #[error("Malformed mesh at face {face}: {detail}")]
    MalformedMesh { face: usize, detail: String },

    /// A boundary node of a face matches no node of any other face.
    #[error("Inconsistent topology: node ({i}, {j}) of face {face} is not shared with any other face")]
    InconsistentTopology { face: usize, i: usize, j: usize },

    /// Options that cannot be combined.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl MetadataError {
    /// Create a malformed-mesh error.
    pub fn malformed(face: usize, detail: impl Into<String>) -> Self {
        Self::MalformedMesh {
            face,
            detail: detail.into(),
        }
    }

    /// Attach a face to a geometry error.
    pub fn from_geometry(face: usize, err: GeometryError) -> Self {
        Self::malformed(face, err.to_string())
    }
}

impl From<QuadratureError> for MetadataError {
    fn from(err: QuadratureError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_keeps_context() {
        let err = MetadataError::from_geometry(7, GeometryError::Folded { i: 1, j: 2 });
        match &err {
            MetadataError::MalformedMesh { face, detail } => {
                assert_eq!(*face, 7);
                assert!(detail.contains("(1, 2)"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("face 7"));
    }

    #[test]
    fn test_quadrature_error_is_invalid_input() {
        let err: MetadataError = QuadratureError::TooFewPoints(1).into();
        assert!(matches!(err, MetadataError::InvalidInput(_)));
    }
}
