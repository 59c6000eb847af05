//! One-dimensional Gauss-Lobatto-Legendre quadrature.
//!
//! This module provides:
//! - Legendre polynomials and their derivatives
//! - GLL nodes and weights on [-1, 1]
//! - [`GaussLobattoRule`], the rule object consumed by the metadata generator

mod legendre;
mod nodes;

pub use legendre::{legendre, legendre_and_derivative};
pub use nodes::{GaussLobattoRule, QuadratureError, gauss_lobatto_nodes, gauss_lobatto_weights};
