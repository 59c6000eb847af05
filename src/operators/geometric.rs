//! Geometric factors for spherical quadrilateral elements.
//!
//! A face with corners n0..n3 is parametrized over the unit square by the
//! bilinear map
//!
//! Xc(α, β) = n0 (1-α)(1-β) + n1 α(1-β) + n2 αβ + n3 (1-α)β
//!
//! followed by radial (gnomonic) projection X = Xc / |Xc|. Straight edges of
//! the bilinear patch project to great-circle arcs, so the image of the unit
//! square is exactly the spherical quadrilateral spanned by the corners.
//!
//! The tangent vectors of the projected surface are
//!
//! ∂X/∂α = (I - X Xᵀ) ∂Xc/∂α / |Xc|,  ∂X/∂β = (I - X Xᵀ) ∂Xc/∂β / |Xc|
//!
//! and the local area element is J = |∂X/∂α × ∂X/∂β|.

use thiserror::Error;

use crate::polynomial::GaussLobattoRule;
use crate::types::Vec3;

/// Error raised while evaluating the local map of one face.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The bilinear point passes through the sphere centre.
    #[error("local map passes through the origin at point ({i}, {j})")]
    ThroughOrigin { i: usize, j: usize },

    /// The Jacobian vanishes or is not finite.
    #[error("degenerate Jacobian {jacobian:e} at point ({i}, {j})")]
    Degenerate { i: usize, j: usize, jacobian: f64 },

    /// The oriented Jacobian changes sign inside the face.
    #[error("element folds over itself at point ({i}, {j})")]
    Folded { i: usize, j: usize },
}

/// Position and tangent vectors of the projected map at one parameter point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalMapSample {
    /// Projected point on the unit sphere.
    pub position: [f64; 3],
    /// ∂X/∂α
    pub d_alpha: [f64; 3],
    /// ∂X/∂β
    pub d_beta: [f64; 3],
}

impl LocalMapSample {
    /// Oriented area element (∂X/∂α × ∂X/∂β) · X.
    ///
    /// Positive when the corners run counter-clockwise seen from outside.
    #[inline]
    pub fn oriented_jacobian(&self) -> f64 {
        self.d_alpha.cross(&self.d_beta).dot(&self.position)
    }

    /// Unsigned area element |∂X/∂α × ∂X/∂β|.
    #[inline]
    pub fn jacobian(&self) -> f64 {
        self.d_alpha.cross(&self.d_beta).norm()
    }
}

/// Evaluate the projected bilinear map of a quadrilateral at (α, β) ∈ [0, 1]².
///
/// Returns `None` if the bilinear point is the origin.
pub fn apply_local_map(corners: &[[f64; 3]; 4], alpha: f64, beta: f64) -> Option<LocalMapSample> {
    let [n0, n1, n2, n3] = corners;

    let xc = n0
        .scale((1.0 - alpha) * (1.0 - beta))
        .add(&n1.scale(alpha * (1.0 - beta)))
        .add(&n2.scale(alpha * beta))
        .add(&n3.scale((1.0 - alpha) * beta));

    let r = xc.norm();
    if !(r > 0.0) || !r.is_finite() {
        return None;
    }
    let position = xc.scale(1.0 / r);

    // Tangents of the flat bilinear patch.
    let dxc_alpha = n1.sub(n0).scale(1.0 - beta).add(&n2.sub(n3).scale(beta));
    let dxc_beta = n3.sub(n0).scale(1.0 - alpha).add(&n2.sub(n1).scale(alpha));

    let project = |v: [f64; 3]| v.sub(&position.scale(position.dot(&v))).scale(1.0 / r);

    Some(LocalMapSample {
        position,
        d_alpha: project(dxc_alpha),
        d_beta: project(dxc_beta),
    })
}

/// Projected GLL nodes and raw quadrature-weighted Jacobians of one face.
///
/// Both vectors have `n²` entries in local order `j * n + i`, where `i`
/// indexes α and `j` indexes β.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceGeometry {
    /// Number of GLL points per direction.
    pub n_points: usize,
    /// Projected node positions.
    pub positions: Vec<[f64; 3]>,
    /// w_i w_j J(α_i, β_j) with weights of the [0, 1] rule.
    pub weights: Vec<f64>,
}

impl FaceGeometry {
    /// Evaluate the local map of a quadrilateral at every GLL node.
    ///
    /// `rule` must be the [0, 1] rule (see [`GaussLobattoRule::unit_interval`]).
    pub fn compute(corners: &[[f64; 3]; 4], rule: &GaussLobattoRule) -> Result<Self, GeometryError> {
        let n = rule.len();
        let mut positions = Vec::with_capacity(n * n);
        let mut weights = Vec::with_capacity(n * n);
        let mut orientation = 0.0_f64;

        for j in 0..n {
            for i in 0..n {
                let sample = apply_local_map(corners, rule.abscissae[i], rule.abscissae[j])
                    .ok_or(GeometryError::ThroughOrigin { i, j })?;

                let jacobian = sample.jacobian();
                if !(jacobian > 0.0) || !jacobian.is_finite() {
                    return Err(GeometryError::Degenerate { i, j, jacobian });
                }

                let oriented = sample.oriented_jacobian();
                if orientation == 0.0 {
                    orientation = oriented.signum();
                } else if oriented * orientation <= 0.0 {
                    return Err(GeometryError::Folded { i, j });
                }

                positions.push(sample.position);
                weights.push(rule.weights[i] * rule.weights[j] * jacobian);
            }
        }

        Ok(Self {
            n_points: n,
            positions,
            weights,
        })
    }

    /// Discrete area of the face: the sum of its weights.
    pub fn area(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Local (i, j) of a flat local index.
    #[inline]
    pub fn local_ij(&self, local: usize) -> (usize, usize) {
        (local % self.n_points, local / self.n_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::SphereMesh;
    use crate::types::FaceIndex;

    fn octant_quad() -> [[f64; 3]; 4] {
        // A spherical quad strictly inside the first octant.
        [
            [1.0, 0.2, 0.2],
            [0.2, 1.0, 0.2],
            [0.2, 1.0, 1.0],
            [1.0, 0.2, 1.0],
        ]
    }

    fn unit_rule(n: usize) -> GaussLobattoRule {
        GaussLobattoRule::new(n).unwrap().unit_interval()
    }

    #[test]
    fn test_corners_map_to_projected_vertices() {
        let corners = octant_quad();
        let params = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        for (corner, &(a, b)) in corners.iter().zip(&params) {
            let sample = apply_local_map(&corners, a, b).unwrap();
            let expected = corner.normalized().unwrap();
            assert!(sample.position.distance(&expected) < 1e-15);
        }
    }

    #[test]
    fn test_tangents_are_tangent_to_sphere() {
        let sample = apply_local_map(&octant_quad(), 0.3, 0.7).unwrap();
        assert!(sample.d_alpha.dot(&sample.position).abs() < 1e-14);
        assert!(sample.d_beta.dot(&sample.position).abs() < 1e-14);
    }

    #[test]
    fn test_tangent_matches_finite_difference() {
        let corners = octant_quad();
        let h = 1e-6;
        let sample = apply_local_map(&corners, 0.4, 0.6).unwrap();
        let plus = apply_local_map(&corners, 0.4 + h, 0.6).unwrap().position;
        let minus = apply_local_map(&corners, 0.4 - h, 0.6).unwrap().position;
        let fd = plus.sub(&minus).scale(0.5 / h);
        assert!(fd.distance(&sample.d_alpha) < 1e-8);
    }

    #[test]
    fn test_origin_is_rejected() {
        // Corners sum to zero, so the bilinear patch passes through the centre.
        let corners = [
            [1.0, 0.0, 0.5],
            [0.0, 1.0, -0.5],
            [-1.0, 0.0, 0.5],
            [0.0, -1.0, -0.5],
        ];
        assert!(apply_local_map(&corners, 0.5, 0.5).is_none());
        assert!(apply_local_map(&corners, 0.0, 0.0).is_some());
    }

    #[test]
    fn test_collapsed_edge_is_degenerate() {
        let mut corners = octant_quad();
        corners[1] = corners[0];
        let err = FaceGeometry::compute(&corners, &unit_rule(3)).unwrap_err();
        assert!(matches!(err, GeometryError::Degenerate { i: 0, j: 0, .. }));
    }

    #[test]
    fn test_bowtie_is_folded() {
        let mut corners = octant_quad();
        corners.swap(2, 3);
        let err = FaceGeometry::compute(&corners, &unit_rule(4)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Folded { .. } | GeometryError::Degenerate { .. }
        ));
    }

    #[test]
    fn test_area_converges_to_geometric_area() {
        let mesh = SphereMesh::cubed_sphere(3);
        let face = FaceIndex::new(4);
        let corners = mesh.quad_corners(face).unwrap();
        let exact = mesh.face(face).area;

        let error = |n: usize| {
            let geom = FaceGeometry::compute(&corners, &unit_rule(n)).unwrap();
            (geom.area() - exact).abs()
        };

        let (e2, e4, e8) = (error(2), error(4), error(8));
        assert!(e4 < e2, "n=4 error {e4} not below n=2 error {e2}");
        assert!(e8 < e4, "n=8 error {e8} not below n=4 error {e4}");
        assert!(e8 < 1e-10, "n=8 error {e8}");
    }

    #[test]
    fn test_orientation_does_not_change_weights() {
        let mesh = SphereMesh::cubed_sphere(2);
        let corners = mesh.quad_corners(FaceIndex::new(5)).unwrap();
        let reversed = [corners[0], corners[3], corners[2], corners[1]];
        let rule = unit_rule(4);

        let a = FaceGeometry::compute(&corners, &rule).unwrap();
        let b = FaceGeometry::compute(&reversed, &rule).unwrap();
        assert!((a.area() - b.area()).abs() < 1e-14);
    }

    #[test]
    fn test_local_ordering() {
        let geom = FaceGeometry::compute(&octant_quad(), &unit_rule(3)).unwrap();
        assert_eq!(geom.positions.len(), 9);
        assert_eq!(geom.local_ij(5), (2, 1));
        // Local index 1 is (α, β) = (1/2, 0): the midpoint of the first edge.
        let mid = octant_quad()[0].add(&octant_quad()[1]).normalized().unwrap();
        assert!(geom.positions[1].distance(&mid) < 1e-15);
    }
}
