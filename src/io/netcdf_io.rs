//! NetCDF output of GLL metadata.
//!
//! The file layout matches what spectral element models read at start-up:
//!
//! ```text
//! dimensions:
//!     np = <points per direction> ;
//!     nelem = <faces> ;
//! variables:
//!     int GLLnodes(np, np, nelem) ;      // 1-based global node index
//!         GLLnodes:start_index = 1 ;
//!     double J(np, np, nelem) ;          // quadrature-weighted Jacobian
//! ```
//!
//! Global attributes record the generation options and the accumulated
//! Jacobian so a file can be checked without recomputing it.
//!
//! # Example
//!
//! ```rust,ignore
//! use gllmeta_rs::io::{MetadataWriter, WriterConfig};
//!
//! let config = WriterConfig::new("gllmeta.nc").with_mesh_file("outCSne30.g");
//! MetadataWriter::new(config).write(&metadata)?;
//! ```

use std::path::PathBuf;

#[cfg(feature = "netcdf")]
use chrono::Utc;
#[cfg(feature = "netcdf")]
use netcdf::create;
use thiserror::Error;

use crate::metadata::GllMetadata;

/// Error type for metadata output.
#[derive(Debug, Error)]
pub enum WriterError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// Data that cannot be represented in the file
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Feature not enabled
    #[error("NetCDF feature not enabled")]
    FeatureDisabled,
}

/// Configuration for metadata output.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Output file path
    pub path: PathBuf,
    /// Title attribute
    pub title: Option<String>,
    /// Source attribute (generator name/version)
    pub source: Option<String>,
    /// Mesh file the metadata was generated from
    pub mesh_file: Option<String>,
}

impl WriterConfig {
    /// Create a new configuration with the given output path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: None,
            source: Some(format!("gllmeta-rs {}", env!("CARGO_PKG_VERSION"))),
            mesh_file: None,
        }
    }

    /// Set the title attribute.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the source attribute.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Record the input mesh file.
    pub fn with_mesh_file(mut self, mesh_file: impl Into<String>) -> Self {
        self.mesh_file = Some(mesh_file.into());
        self
    }
}

/// Writes [`GllMetadata`] to a NetCDF file.
#[derive(Debug, Clone)]
pub struct MetadataWriter {
    config: WriterConfig,
}

impl MetadataWriter {
    /// Create a writer.
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Whether this build can write files (the `netcdf` feature).
    pub const fn is_available() -> bool {
        cfg!(feature = "netcdf")
    }

    /// Write the metadata, replacing any existing file.
    #[cfg(feature = "netcdf")]
    pub fn write(&self, metadata: &GllMetadata) -> Result<(), WriterError> {
        let config = &self.config;
        let nodes = one_based_nodes(metadata)?;

        let mut file = create(&config.path)?;

        file.add_dimension("np", metadata.n_points)?;
        file.add_dimension("nelem", metadata.n_faces)?;

        {
            let mut var = file.add_variable::<i32>("GLLnodes", &["np", "np", "nelem"])?;
            var.put_attribute("long_name", "global GLL node index")?;
            var.put_attribute("start_index", 1i32)?;
            var.put_values(&nodes, ..)?;
        }

        {
            let mut var = file.add_variable::<f64>("J", &["np", "np", "nelem"])?;
            var.put_attribute("long_name", "GLL quadrature weight times local Jacobian")?;
            var.put_values(metadata.jacobian.as_slice(), ..)?;
        }

        file.add_attribute("np", metadata.n_points as i32)?;
        file.add_attribute("bubble", metadata.bubble.to_string().as_str())?;
        file.add_attribute("tolerance", metadata.tolerance)?;
        file.add_attribute("n_global_nodes", metadata.n_global_nodes as i64)?;
        file.add_attribute("accumulated_jacobian", metadata.accumulated_jacobian)?;
        file.add_attribute(
            "unmatched_boundary_nodes",
            metadata.unmatched_boundary_nodes as i64,
        )?;

        if let Some(ref title) = config.title {
            file.add_attribute("title", title.as_str())?;
        }
        if let Some(ref source) = config.source {
            file.add_attribute("source", source.as_str())?;
        }
        if let Some(ref mesh_file) = config.mesh_file {
            file.add_attribute("mesh_file", mesh_file.as_str())?;
        }

        let now = Utc::now();
        file.add_attribute(
            "history",
            format!("{}: Created by gllmeta-rs", now.format("%Y-%m-%d %H:%M:%S UTC")).as_str(),
        )?;

        tracing::info!(
            path = %config.path.display(),
            n_points = metadata.n_points,
            n_faces = metadata.n_faces,
            "wrote GLL metadata"
        );

        Ok(())
    }

    /// Write the metadata (unavailable without the `netcdf` feature).
    #[cfg(not(feature = "netcdf"))]
    pub fn write(&self, _metadata: &GllMetadata) -> Result<(), WriterError> {
        Err(WriterError::FeatureDisabled)
    }
}

/// Node tensor as 1-based `i32`, in file layout.
pub fn one_based_nodes(metadata: &GllMetadata) -> Result<Vec<i32>, WriterError> {
    metadata
        .nodes
        .as_slice()
        .iter()
        .map(|index| {
            index
                .next()
                .to_i32()
                .ok_or_else(|| WriterError::InvalidData(format!("node index {index} exceeds i32")))
        })
        .collect()
}
