//! Error type shared by the mesh readers and the mesh constructor.

use thiserror::Error;

/// Error type for mesh construction and mesh file I/O.
#[derive(Debug, Error)]
pub enum MeshError {
    /// File could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file contents.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported Gmsh format version.
    #[error("Unsupported Gmsh version: {0}")]
    UnsupportedVersion(String),

    /// File extension not recognised by [`read_mesh`](super::read_mesh).
    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    /// Missing required section or variable.
    #[error("Missing section: {0}")]
    MissingSection(String),

    /// A face references a vertex that does not exist or has too few vertices.
    #[error("Invalid face {face}: {detail}")]
    InvalidFace { face: usize, detail: String },

    /// The mesh has no faces.
    #[error("Mesh contains no faces")]
    Empty,

    /// NetCDF library error (Exodus input).
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// Reading this format needs a disabled cargo feature.
    #[error("Reading {0} meshes requires the `netcdf` feature")]
    FeatureDisabled(&'static str),
}

impl MeshError {
    /// Create an invalid-face error.
    pub fn invalid_face(face: usize, detail: impl Into<String>) -> Self {
        Self::InvalidFace {
            face,
            detail: detail.into(),
        }
    }
}
