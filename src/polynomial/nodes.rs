//! Gauss-Lobatto-Legendre nodes and weights.
//!
//! The n GLL points of a rule of polynomial order N = n - 1 are the roots of
//! (1-x²)P'_N(x). They include both endpoints, which is what lets adjacent
//! spectral elements share their edge and corner nodes.

use std::f64::consts::PI;

use thiserror::Error;

use super::legendre::{legendre, legendre_and_derivative};

/// Error type for quadrature construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuadratureError {
    /// A Lobatto rule needs both endpoints, so at least two points.
    #[error("Gauss-Lobatto rule needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

/// Compute Gauss-Lobatto-Legendre nodes for polynomial order N.
///
/// Returns N+1 ascending nodes in [-1, 1], endpoints exact.
/// Newton iteration starts from the Chebyshev-Lobatto nodes.
pub fn gauss_lobatto_nodes(order: usize) -> Vec<f64> {
    let n = order;
    if n == 0 {
        return vec![0.0];
    }

    let mut nodes: Vec<f64> = (0..=n).map(|j| -(PI * j as f64 / n as f64).cos()).collect();
    nodes[0] = -1.0;
    nodes[n] = 1.0;

    // With L(x) = (1-x²)P'_N(x) the Legendre ODE gives L'(x) = -N(N+1)P_N(x),
    // so the Newton step is x += (1-x²)P'_N / (N(N+1)P_N).
    let scale = (n * (n + 1)) as f64;
    for x in nodes.iter_mut().take(n).skip(1) {
        for _ in 0..100 {
            let (p_n, dp_n) = legendre_and_derivative(n, *x);
            let update = (1.0 - *x * *x) * dp_n / (scale * p_n);
            *x += update;
            if update.abs() < 1e-15 {
                break;
            }
        }
    }

    // Exact antisymmetry: x_j == -x_{N-j}.
    for j in 0..(n + 1) / 2 {
        let mirrored = 0.5 * (nodes[n - j] - nodes[j]);
        nodes[j] = -mirrored;
        nodes[n - j] = mirrored;
    }
    if n % 2 == 0 {
        nodes[n / 2] = 0.0;
    }

    nodes
}

/// Compute Gauss-Lobatto-Legendre weights w_j = 2 / (N(N+1) P_N(x_j)²).
pub fn gauss_lobatto_weights(order: usize, nodes: &[f64]) -> Vec<f64> {
    let n = order;
    if n == 0 {
        return vec![2.0];
    }

    let denom = (n * (n + 1)) as f64;
    nodes
        .iter()
        .map(|&x| {
            let p_n = legendre(n, x);
            2.0 / (denom * p_n * p_n)
        })
        .collect()
}

/// A one-dimensional Gauss-Lobatto quadrature rule.
///
/// `GaussLobattoRule::new(n)` builds the n-point rule on [-1, 1], exact for
/// polynomials up to degree 2n - 3.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussLobattoRule {
    /// Abscissae in ascending order.
    pub abscissae: Vec<f64>,
    /// Positive integration weights.
    pub weights: Vec<f64>,
}

impl GaussLobattoRule {
    /// Build the n-point rule on [-1, 1].
    pub fn new(n_points: usize) -> Result<Self, QuadratureError> {
        if n_points < 2 {
            return Err(QuadratureError::TooFewPoints(n_points));
        }
        let order = n_points - 1;
        let abscissae = gauss_lobatto_nodes(order);
        let weights = gauss_lobatto_weights(order, &abscissae);
        Ok(Self { abscissae, weights })
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.abscissae.len()
    }

    /// Whether the rule has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.abscissae.is_empty()
    }

    /// The same rule mapped affinely to [0, 1].
    ///
    /// Abscissae become (x + 1) / 2 and weights are halved, so they sum to 1.
    pub fn unit_interval(&self) -> Self {
        Self {
            abscissae: self.abscissae.iter().map(|&x| 0.5 * (x + 1.0)).collect(),
            weights: self.weights.iter().map(|&w| 0.5 * w).collect(),
        }
    }

    /// Integrate a function sampled at the abscissae.
    pub fn integrate(&self, f: impl Fn(f64) -> f64) -> f64 {
        self.abscissae
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}
