//! # gllmeta-rs
//!
//! Spectral element metadata for spherical surface meshes.
//!
//! For every face of a quadrilateral mesh on the unit sphere and every
//! Gauss-Lobatto-Legendre (GLL) node on it, this crate computes:
//! - a global degree-of-freedom index, shared by all faces meeting at a point
//! - the quadrature-weighted local Jacobian of the projected bilinear map
//!
//! The building blocks are:
//! - Quadrature rules (Gauss-Lobatto-Legendre)
//! - Mesh representation, cubed-sphere generation, Gmsh and Exodus input
//! - Local map geometry and bubble area correction
//! - Coordinate-based global node numbering
//! - NetCDF output (`netcdf` feature)
//!
//! # Example
//!
//! ```
//! use gllmeta_rs::{MetadataConfig, SphereMesh, generate_metadata};
//!
//! let mesh = SphereMesh::cubed_sphere(4);
//! let meta = generate_metadata(&mesh, &MetadataConfig::new(4)).unwrap();
//!
//! assert_eq!(meta.nodes.shape(), [4, 4, 96]);
//! assert!(meta.area_error(4.0 * std::f64::consts::PI) < 1e-2);
//! ```

pub mod io;
pub mod mesh;
pub mod metadata;
pub mod operators;
pub mod polynomial;
pub mod types;

// Re-export main types for convenience
pub use io::{MetadataWriter, WriterConfig, WriterError};
pub use mesh::{MeshError, SphereMesh, read_mesh};
pub use metadata::{
    GllMetadata, MetadataConfig, MetadataError, MetadataTensor, NodeRegistry, TopologyPolicy,
    generate_metadata,
};
pub use operators::{BubbleCorrection, FaceGeometry, GeometryError};
pub use polynomial::{GaussLobattoRule, QuadratureError};
pub use types::{FaceIndex, GlobalNodeIndex};
