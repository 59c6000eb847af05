//! GLL metadata generation.
//!
//! The pass runs in three phases:
//! 1. Per-face geometry: projected GLL nodes, quadrature-weighted Jacobians
//!    and the optional bubble correction. Faces are independent and run in
//!    parallel with the `parallel` feature.
//! 2. Global numbering: nodes are resolved by coordinates in face order
//!    (j outer, i inner), so indices never depend on thread scheduling.
//! 3. Totals: weights are accumulated in face order for reproducible sums.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::mesh::SphereMesh;
use crate::operators::{BubbleCorrection, FaceGeometry};
use crate::polynomial::GaussLobattoRule;
use crate::types::{FaceIndex, GlobalNodeIndex};

use super::error::MetadataError;
use super::resolver::NodeRegistry;
use super::tensor::MetadataTensor;

/// Default distance below which two nodes are the same point.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// What to do with a face boundary node no other face shares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TopologyPolicy {
    /// Keep the fresh index, warn and count the node.
    #[default]
    Lenient,
    /// Fail with [`MetadataError::InconsistentTopology`].
    Strict,
}

/// Options for [`generate_metadata`].
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataConfig {
    /// GLL points per direction (nP ≥ 2).
    pub n_points: usize,
    /// Area correction of the weights.
    pub bubble: BubbleCorrection,
    /// Node matching tolerance in normalized sphere coordinates.
    pub tolerance: f64,
    /// Handling of unshared boundary nodes.
    pub topology: TopologyPolicy,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            n_points: 4,
            bubble: BubbleCorrection::None,
            tolerance: DEFAULT_TOLERANCE,
            topology: TopologyPolicy::Lenient,
        }
    }
}

impl MetadataConfig {
    /// Create a configuration with `n_points` GLL points and default options.
    pub fn new(n_points: usize) -> Self {
        Self {
            n_points,
            ..Default::default()
        }
    }

    /// Set the number of GLL points per direction.
    pub fn with_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }

    /// Set the bubble correction.
    pub fn with_bubble(mut self, bubble: BubbleCorrection) -> Self {
        self.bubble = bubble;
        self
    }

    /// Set the node matching tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the topology policy.
    pub fn with_topology(mut self, topology: TopologyPolicy) -> Self {
        self.topology = topology;
        self
    }

    fn validate(&self) -> Result<(), MetadataError> {
        if self.n_points < 2 {
            return Err(MetadataError::InvalidInput(format!(
                "at least 2 GLL points per direction are required, got {}",
                self.n_points
            )));
        }
        if self.n_points < self.bubble.min_points() {
            return Err(MetadataError::ConfigurationError(format!(
                "{} bubble correction needs at least {} GLL points, got {}",
                self.bubble,
                self.bubble.min_points(),
                self.n_points
            )));
        }
        Ok(())
    }
}

/// Result of a metadata pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GllMetadata {
    /// GLL points per direction.
    pub n_points: usize,
    /// Number of faces.
    pub n_faces: usize,
    /// Global node index of every (face, i, j), 0-based.
    pub nodes: MetadataTensor<GlobalNodeIndex>,
    /// Quadrature-weighted Jacobian of every (face, i, j).
    pub jacobian: MetadataTensor<f64>,
    /// Number of distinct global nodes K; `nodes` covers exactly [0, K).
    pub n_global_nodes: usize,
    /// Sum of all weights, accumulated in face order.
    pub accumulated_jacobian: f64,
    /// Boundary nodes no other face shares (0 for a closed conforming mesh).
    pub unmatched_boundary_nodes: usize,
    /// Bubble correction that was applied.
    pub bubble: BubbleCorrection,
    /// Node matching tolerance that was used.
    pub tolerance: f64,
}

impl GllMetadata {
    /// Absolute deviation of the accumulated Jacobian from an expected total.
    pub fn area_error(&self, expected: f64) -> f64 {
        (self.accumulated_jacobian - expected).abs()
    }

    /// Signed residual of the accumulated Jacobian against an expected total.
    ///
    /// Negative when the quadrature underestimates the area.
    pub fn area_residual(&self, expected: f64) -> f64 {
        self.accumulated_jacobian - expected
    }

    /// Discrete area of one face.
    pub fn face_area(&self, face: FaceIndex) -> f64 {
        self.jacobian.face_values(face).iter().sum()
    }
}

/// Generate global node indices and Jacobian weights for every face.
///
/// # Example
///
/// ```
/// use gllmeta_rs::mesh::SphereMesh;
/// use gllmeta_rs::metadata::{MetadataConfig, generate_metadata};
///
/// let mesh = SphereMesh::cubed_sphere(2);
/// let meta = generate_metadata(&mesh, &MetadataConfig::new(4)).unwrap();
///
/// assert_eq!(meta.n_global_nodes, 6 * 2 * 2 * 3 * 3 + 2);
/// assert!(meta.area_error(4.0 * std::f64::consts::PI) < 1e-2);
/// ```
pub fn generate_metadata(
    mesh: &SphereMesh,
    config: &MetadataConfig,
) -> Result<GllMetadata, MetadataError> {
    let n_faces = mesh.n_faces();
    if n_faces == 0 {
        return Err(MetadataError::InvalidInput("mesh contains no faces".to_string()));
    }
    config.validate()?;
    let mut registry = NodeRegistry::new(config.tolerance)?;

    let n = config.n_points;
    let rule = GaussLobattoRule::new(n)?.unit_interval();

    info!(
        n_faces,
        n_points = n,
        bubble = %config.bubble,
        tolerance = config.tolerance,
        "generating GLL metadata"
    );

    let faces = compute_face_geometry(mesh, &rule, config.bubble)?;

    // Global numbering, strictly in face order.
    let mut nodes = MetadataTensor::filled(n, n_faces, GlobalNodeIndex::ZERO);
    let mut jacobian = MetadataTensor::filled(n, n_faces, 0.0);
    let mut seen_in_face: HashMap<GlobalNodeIndex, (usize, usize)> = HashMap::new();

    for (face, geom) in FaceIndex::iter(n_faces).zip(&faces) {
        seen_in_face.clear();
        for (local, (position, &weight)) in geom.positions.iter().zip(&geom.weights).enumerate() {
            let (i, j) = geom.local_ij(local);
            let index = registry.resolve(position);

            if let Some((pi, pj)) = seen_in_face.insert(index, (i, j)) {
                return Err(MetadataError::malformed(
                    face.get(),
                    format!("local nodes ({pi}, {pj}) and ({i}, {j}) coincide"),
                ));
            }

            nodes.set(face, i, j, index);
            jacobian.set(face, i, j, weight);
        }
    }

    let n_global_nodes = registry.len();
    let unmatched_boundary_nodes = check_boundary_sharing(&nodes, n_global_nodes, config.topology)?;

    let accumulated_jacobian: f64 = faces.iter().map(FaceGeometry::area).sum();

    info!(
        n_global_nodes,
        accumulated_jacobian,
        geometric_area = mesh.total_area(),
        "GLL metadata complete"
    );

    Ok(GllMetadata {
        n_points: n,
        n_faces,
        nodes,
        jacobian,
        n_global_nodes,
        accumulated_jacobian,
        unmatched_boundary_nodes,
        bubble: config.bubble,
        tolerance: config.tolerance,
    })
}

/// Per-face geometry for the whole mesh, in face order.
///
/// On failure the error of the lowest-index failing face is returned.
fn compute_face_geometry(
    mesh: &SphereMesh,
    rule: &GaussLobattoRule,
    bubble: BubbleCorrection,
) -> Result<Vec<FaceGeometry>, MetadataError> {
    #[cfg(feature = "parallel")]
    let results: Vec<Result<FaceGeometry, MetadataError>> = {
        use rayon::prelude::*;

        (0..mesh.n_faces())
            .into_par_iter()
            .map(|k| face_geometry(mesh, FaceIndex::new(k), rule, bubble))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<FaceGeometry, MetadataError>> = FaceIndex::iter(mesh.n_faces())
        .map(|k| face_geometry(mesh, k, rule, bubble))
        .collect();

    results.into_iter().collect()
}

fn face_geometry(
    mesh: &SphereMesh,
    face: FaceIndex,
    rule: &GaussLobattoRule,
    bubble: BubbleCorrection,
) -> Result<FaceGeometry, MetadataError> {
    let k = face.get();
    let corners = mesh.quad_corners(face).ok_or_else(|| {
        MetadataError::malformed(
            k,
            format!(
                "{} vertices, only quadrilateral faces are supported",
                mesh.face(face).n_vertices()
            ),
        )
    })?;

    let mut geom =
        FaceGeometry::compute(&corners, rule).map_err(|e| MetadataError::from_geometry(k, e))?;
    let raw_area = geom.area();
    let geometric_area = mesh.face(face).area;

    if bubble != BubbleCorrection::None {
        let corrected = bubble.apply(&geom.weights, geom.n_points, geometric_area);
        if let Some((local, &w)) = corrected
            .iter()
            .enumerate()
            .find(|&(_, &w)| !(w > 0.0) || !w.is_finite())
        {
            let (i, j) = geom.local_ij(local);
            return Err(MetadataError::malformed(
                k,
                format!("{bubble} bubble correction gives weight {w:e} at node ({i}, {j})"),
            ));
        }
        geom.weights = corrected;
    }

    debug!(
        face = k,
        raw_area,
        geometric_area,
        corrected_area = geom.area(),
        "face geometry"
    );

    Ok(geom)
}

/// Count boundary nodes referenced by a single face.
///
/// Under [`TopologyPolicy::Strict`] the first one, in face then local
/// order, is an error.
fn check_boundary_sharing(
    nodes: &MetadataTensor<GlobalNodeIndex>,
    n_global_nodes: usize,
    policy: TopologyPolicy,
) -> Result<usize, MetadataError> {
    let n = nodes.n_points();

    // Local nodes of one face are distinct, so this counts faces per node.
    let mut references = vec![0usize; n_global_nodes];
    for &index in nodes.as_slice() {
        references[index] += 1;
    }

    let is_boundary = |i: usize, j: usize| i == 0 || j == 0 || i + 1 == n || j + 1 == n;
    let mut total = 0;

    for face in FaceIndex::iter(nodes.n_faces()) {
        let mut unmatched = 0;
        for j in 0..n {
            for i in 0..n {
                if !is_boundary(i, j) || references[nodes.get(face, i, j)] > 1 {
                    continue;
                }
                if policy == TopologyPolicy::Strict {
                    return Err(MetadataError::InconsistentTopology {
                        face: face.get(),
                        i,
                        j,
                    });
                }
                unmatched += 1;
            }
        }
        if unmatched > 0 {
            warn!(
                face = face.get(),
                unmatched, "boundary nodes not shared with any other face"
            );
            total += unmatched;
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    /// Two quads sharing the edge v1-v2, on the +x side of the sphere.
    fn two_face_patch(reverse_order: bool) -> SphereMesh {
        let s = 0.4;
        let vertices = vec![
            [1.0, -s, -s],
            [1.0, 0.0, -s],
            [1.0, 0.0, s],
            [1.0, -s, s],
            [1.0, s, -s],
            [1.0, s, s],
        ];
        let mut faces = vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]];
        if reverse_order {
            faces.reverse();
        }
        SphereMesh::new(vertices, faces).unwrap()
    }

    #[test]
    fn test_cubed_sphere_dof_count() {
        for (ne, np) in [(1, 2), (2, 4), (3, 3)] {
            let mesh = SphereMesh::cubed_sphere(ne);
            let meta = generate_metadata(&mesh, &MetadataConfig::new(np)).unwrap();
            assert_eq!(meta.n_global_nodes, 6 * ne * ne * (np - 1) * (np - 1) + 2);
            assert_eq!(meta.unmatched_boundary_nodes, 0);
        }
    }

    #[test]
    fn test_indices_are_contiguous() {
        let mesh = SphereMesh::cubed_sphere(2);
        let meta = generate_metadata(&mesh, &MetadataConfig::new(4)).unwrap();

        let mut used = vec![false; meta.n_global_nodes];
        for &index in meta.nodes.as_slice() {
            used[index] = true;
        }
        assert!(used.iter().all(|&u| u));
        assert!(meta.n_global_nodes < meta.n_faces * 16);
    }

    #[test]
    fn test_first_face_numbered_in_local_order() {
        let mesh = SphereMesh::cubed_sphere(1);
        let meta = generate_metadata(&mesh, &MetadataConfig::new(3)).unwrap();
        let first: Vec<usize> = meta
            .nodes
            .face_values(FaceIndex::ZERO)
            .iter()
            .map(|g| g.get())
            .collect();
        assert_eq!(first, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_shared_edge_independent_of_face_order() {
        let np = 4;
        let forward = generate_metadata(&two_face_patch(false), &MetadataConfig::new(np)).unwrap();
        let reversed = generate_metadata(&two_face_patch(true), &MetadataConfig::new(np)).unwrap();

        assert_eq!(forward.n_global_nodes, 2 * np * np - np);
        assert_eq!(reversed.n_global_nodes, forward.n_global_nodes);

        // Forward: face 0 edge i = n-1 meets face 1 edge i = 0.
        for j in 0..np {
            let a = forward.nodes.get(FaceIndex::new(0), np - 1, j);
            let b = forward.nodes.get(FaceIndex::new(1), 0, j);
            assert_eq!(a, b);
        }
        // Reversed: the same physical faces, swapped in mesh order.
        for j in 0..np {
            let a = reversed.nodes.get(FaceIndex::new(1), np - 1, j);
            let b = reversed.nodes.get(FaceIndex::new(0), 0, j);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_open_patch_policies() {
        let mesh = two_face_patch(false);
        let np = 3;

        let lenient = generate_metadata(&mesh, &MetadataConfig::new(np)).unwrap();
        // Each face has 4 (np - 1) boundary nodes, np of them shared.
        assert_eq!(lenient.unmatched_boundary_nodes, 2 * (4 * (np - 1) - np));

        let strict = MetadataConfig::new(np).with_topology(TopologyPolicy::Strict);
        assert_eq!(
            generate_metadata(&mesh, &strict),
            Err(MetadataError::InconsistentTopology { face: 0, i: 0, j: 0 })
        );
    }

    #[test]
    fn test_closed_mesh_passes_strict() {
        let mesh = SphereMesh::cubed_sphere(2);
        let config = MetadataConfig::new(3).with_topology(TopologyPolicy::Strict);
        assert!(generate_metadata(&mesh, &config).is_ok());
    }

    #[test]
    fn test_triangle_is_malformed() {
        let vertices = vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let mesh = SphereMesh::new(vertices, vec![vec![0, 1, 2]]).unwrap();
        let err = generate_metadata(&mesh, &MetadataConfig::new(4)).unwrap_err();
        assert!(matches!(err, MetadataError::MalformedMesh { face: 0, .. }));
    }

    #[test]
    fn test_degenerate_face_reports_lowest_face() {
        let mut mesh = SphereMesh::cubed_sphere(2);
        for k in [17, 5] {
            let v0 = mesh.faces[k].vertices[0];
            mesh.faces[k].vertices[1] = v0;
        }
        let err = generate_metadata(&mesh, &MetadataConfig::new(4)).unwrap_err();
        assert!(matches!(err, MetadataError::MalformedMesh { face: 5, .. }));
    }

    #[test]
    fn test_invalid_configuration() {
        let mesh = SphereMesh::cubed_sphere(1);

        for np in [0, 1] {
            assert!(matches!(
                generate_metadata(&mesh, &MetadataConfig::new(np)),
                Err(MetadataError::InvalidInput(_))
            ));
        }

        let interior = MetadataConfig::new(2).with_bubble(BubbleCorrection::Interior);
        assert!(matches!(
            generate_metadata(&mesh, &interior),
            Err(MetadataError::ConfigurationError(_))
        ));

        for tolerance in [0.0, 1e-20] {
            let bad_tol = MetadataConfig::new(3).with_tolerance(tolerance);
            assert!(matches!(
                generate_metadata(&mesh, &bad_tol),
                Err(MetadataError::InvalidInput(_))
            ));
        }

        let empty = SphereMesh {
            vertices: Vec::new(),
            faces: Vec::new(),
        };
        assert!(matches!(
            generate_metadata(&empty, &MetadataConfig::new(4)),
            Err(MetadataError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_uniform_bubble_matches_face_areas() {
        let mesh = SphereMesh::cubed_sphere(2);
        let config = MetadataConfig::new(3).with_bubble(BubbleCorrection::Uniform);
        let meta = generate_metadata(&mesh, &config).unwrap();

        for face in FaceIndex::iter(mesh.n_faces()) {
            assert!((meta.face_area(face) - mesh.face(face).area).abs() < 1e-14);
        }
        assert!(meta.area_error(4.0 * PI) < 1e-12);
    }

    #[test]
    fn test_interior_bubble_keeps_boundary_weights() {
        let mesh = SphereMesh::cubed_sphere(2);
        let raw = generate_metadata(&mesh, &MetadataConfig::new(4)).unwrap();
        let config = MetadataConfig::new(4).with_bubble(BubbleCorrection::Interior);
        let corrected = generate_metadata(&mesh, &config).unwrap();

        assert_eq!(raw.nodes, corrected.nodes);
        for face in FaceIndex::iter(mesh.n_faces()) {
            for j in 0..4 {
                for i in 0..4 {
                    let a = raw.jacobian.get(face, i, j);
                    let b = corrected.jacobian.get(face, i, j);
                    if (1..3).contains(&i) && (1..3).contains(&j) {
                        assert_ne!(a, b);
                    } else {
                        assert_eq!(a, b);
                    }
                }
            }
            assert!((corrected.face_area(face) - mesh.face(face).area).abs() < 1e-14);
        }
    }

    #[test]
    fn test_area_residual_keeps_sign() {
        let mesh = SphereMesh::cubed_sphere(2);
        let meta = generate_metadata(&mesh, &MetadataConfig::new(3)).unwrap();
        let total = meta.accumulated_jacobian;

        assert!((meta.area_residual(total - 1.0) - 1.0).abs() < 1e-12);
        assert!((meta.area_residual(total + 1.0) + 1.0).abs() < 1e-12);
        assert!((meta.area_error(total + 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(
            meta.area_residual(4.0 * PI).abs(),
            meta.area_error(4.0 * PI)
        );
    }

    #[test]
    fn test_idempotent() {
        let mesh = SphereMesh::cubed_sphere(3);
        let config = MetadataConfig::new(5).with_bubble(BubbleCorrection::Uniform);
        let a = generate_metadata(&mesh, &config).unwrap();
        let b = generate_metadata(&mesh, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.accumulated_jacobian.to_bits(), b.accumulated_jacobian.to_bits());
    }

    #[test]
    fn test_coarse_tolerance_collapses_face_nodes() {
        let mesh = SphereMesh::cubed_sphere(1);
        let config = MetadataConfig::new(4).with_tolerance(1.0);
        let err = generate_metadata(&mesh, &config).unwrap_err();
        assert!(matches!(err, MetadataError::MalformedMesh { face: 0, .. }));
    }
}
