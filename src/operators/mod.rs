//! Per-face operators: local map geometry and area correction.
//!
//! This module provides:
//! - The projected bilinear map of a spherical quadrilateral and its
//!   Jacobian at GLL nodes (`FaceGeometry`)
//! - Bubble correction of the resulting weights (`BubbleCorrection`)
//!
//! Everything here works on one face at a time and owns no shared state, so
//! faces can be processed in any order or in parallel.

mod bubble;
mod geometric;

pub use bubble::BubbleCorrection;
pub use geometric::{FaceGeometry, GeometryError, LocalMapSample, apply_local_map};
