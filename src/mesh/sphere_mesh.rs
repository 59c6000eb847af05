//! Surface mesh of polygonal faces on the unit sphere.
//!
//! The mesh stores:
//! - Vertex coordinates (Cartesian, on or near the unit sphere)
//! - Face-vertex connectivity (counter-clockwise seen from outside)
//! - The geometric area of every face
//!
//! Quadrilateral corner convention, matching the local map in
//! [`crate::operators`]:
//! - v0: (α, β) = (0, 0)
//! - v1: (α, β) = (1, 0)
//! - v2: (α, β) = (1, 1)
//! - v3: (α, β) = (0, 1)

use crate::types::{FaceIndex, Vec3};

use super::error::MeshError;

/// A polygonal face of a [`SphereMesh`].
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    /// Vertex indices in traversal order.
    pub vertices: Vec<usize>,
    /// Geometric area of the spherical polygon spanned by the vertices.
    pub area: f64,
}

impl Face {
    /// Number of vertices (and edges).
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the face is a quadrilateral.
    #[inline]
    pub fn is_quad(&self) -> bool {
        self.vertices.len() == 4
    }
}

/// Unstructured surface mesh of a sphere.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    /// Vertex coordinates: vertices[v] = [x, y, z]
    pub vertices: Vec<[f64; 3]>,
    /// Faces in mesh order.
    pub faces: Vec<Face>,
}

impl SphereMesh {
    /// Build a mesh from vertices and face connectivity and compute face areas.
    ///
    /// Fails if the mesh is empty, a face has fewer than three vertices, or a
    /// face references a vertex that does not exist.
    pub fn new(vertices: Vec<[f64; 3]>, faces: Vec<Vec<usize>>) -> Result<Self, MeshError> {
        if faces.is_empty() {
            return Err(MeshError::Empty);
        }

        for (k, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::invalid_face(
                    k,
                    format!("{} vertices, need at least 3", face.len()),
                ));
            }
            if let Some(&v) = face.iter().find(|&&v| v >= vertices.len()) {
                return Err(MeshError::invalid_face(
                    k,
                    format!("vertex {v} out of range ({} vertices)", vertices.len()),
                ));
            }
        }

        let mut mesh = Self {
            vertices,
            faces: faces
                .into_iter()
                .map(|vertices| Face { vertices, area: 0.0 })
                .collect(),
        };
        mesh.calculate_face_areas();
        Ok(mesh)
    }

    /// Number of faces.
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices.
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Face by index.
    #[inline]
    pub fn face(&self, k: FaceIndex) -> &Face {
        &self.faces[k.get()]
    }

    /// Vertex coordinates of a face, in traversal order.
    pub fn face_coordinates(&self, k: FaceIndex) -> Vec<[f64; 3]> {
        self.face(k)
            .vertices
            .iter()
            .map(|&v| self.vertices[v])
            .collect()
    }

    /// Corner coordinates of a quadrilateral face, `None` for other polygons.
    pub fn quad_corners(&self, k: FaceIndex) -> Option<[[f64; 3]; 4]> {
        let face = self.face(k);
        match face.vertices.as_slice() {
            &[a, b, c, d] => Some([
                self.vertices[a],
                self.vertices[b],
                self.vertices[c],
                self.vertices[d],
            ]),
            _ => None,
        }
    }

    /// Recompute the geometric area of every face and return the total.
    pub fn calculate_face_areas(&mut self) -> f64 {
        let mut total = 0.0;
        for k in FaceIndex::iter(self.faces.len()) {
            let area = spherical_polygon_area(&self.face_coordinates(k));
            self.faces[k.get()].area = area;
            total += area;
        }
        total
    }

    /// Sum of the stored face areas.
    pub fn total_area(&self) -> f64 {
        self.faces.iter().map(|f| f.area).sum()
    }

    /// Face areas in mesh order.
    pub fn face_areas(&self) -> Vec<f64> {
        self.faces.iter().map(|f| f.area).collect()
    }
}

/// Area of the spherical triangle with unit-vector corners a, b, c.
///
/// Van Oosterom–Strackee: tan(E/2) = a·(b×c) / (1 + a·b + b·c + c·a).
/// The result is signed: positive for counter-clockwise corners seen from
/// outside the sphere.
pub fn spherical_triangle_area(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    let triple = a.dot(&b.cross(c));
    let denom = 1.0 + a.dot(b) + b.dot(c) + c.dot(a);
    2.0 * triple.atan2(denom)
}

/// Area of a spherical polygon whose corners are joined by great-circle arcs.
///
/// Corners are projected onto the unit sphere first. The polygon is split
/// into a fan from its first corner; the absolute value of the signed sum is
/// returned, so either orientation gives the same area.
pub fn spherical_polygon_area(corners: &[[f64; 3]]) -> f64 {
    if corners.len() < 3 {
        return 0.0;
    }

    let unit: Vec<[f64; 3]> = corners
        .iter()
        .map(|p| p.normalized().unwrap_or([0.0; 3]))
        .collect();

    let signed: f64 = unit
        .windows(2)
        .skip(1)
        .map(|pair| spherical_triangle_area(&unit[0], &pair[0], &pair[1]))
        .sum();

    signed.abs()
}
