//! Output of generated metadata.
//!
//! - **NetCDF metadata files**: `GLLnodes` and `J` tensors plus generation
//!   attributes (writing requires the `netcdf` feature)
//!
//! Mesh input lives in [`crate::mesh`].

mod netcdf_io;

pub use netcdf_io::{MetadataWriter, WriterConfig, WriterError, one_based_nodes};
