//! Strongly-typed domain types.
//!
//! - [`FaceIndex`] / [`GlobalNodeIndex`]: index newtypes that cannot be mixed up
//! - [`Vec3`]: vector arithmetic for `[f64; 3]` coordinates
//!
//! # Example
//!
//! ```
//! use gllmeta_rs::types::{FaceIndex, Vec3};
//!
//! let areas = vec![1.0, 2.0];
//! assert_eq!(areas[FaceIndex::new(1)], 2.0);
//!
//! let n = [1.0, 0.0, 0.0].cross(&[0.0, 1.0, 0.0]);
//! assert_eq!(n, [0.0, 0.0, 1.0]);
//! ```

mod indices;
mod vector;

pub use indices::{FaceIndex, GlobalNodeIndex};
pub use vector::Vec3;
