//! Spectral element metadata: global node numbering and Jacobian weights.
//!
//! [`generate_metadata`] turns a [`SphereMesh`](crate::mesh::SphereMesh) and a
//! number of GLL points per direction into two `[nP][nP][nFaces]` tensors:
//!
//! - `nodes`: the global degree-of-freedom index of every local node, shared
//!   by all faces that meet at the same point
//! - `jacobian`: the quadrature-weighted local area element, whose sum
//!   approximates the total mesh area
//!
//! Node identity is decided by coordinates through a [`NodeRegistry`].

mod error;
mod generator;
mod resolver;
mod tensor;

pub use error::MetadataError;
pub use generator::{
    DEFAULT_TOLERANCE, GllMetadata, MetadataConfig, TopologyPolicy, generate_metadata,
};
pub use resolver::NodeRegistry;
pub use tensor::MetadataTensor;
