//! Dense `[nP][nP][nFaces]` arrays.

use crate::types::FaceIndex;

/// A dense array of shape `[n_points][n_points][n_faces]` in one flat buffer.
///
/// The face index varies fastest, matching the layout of the `GLLnodes` and
/// `J` variables in output files: element `(face, i, j)` lives at
/// `(j * n_points + i) * n_faces + face`.
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataTensor<T> {
    n_points: usize,
    n_faces: usize,
    data: Vec<T>,
}

impl<T: Copy> MetadataTensor<T> {
    /// Create a tensor filled with `value`.
    pub fn filled(n_points: usize, n_faces: usize, value: T) -> Self {
        Self {
            n_points,
            n_faces,
            data: vec![value; n_points * n_points * n_faces],
        }
    }

    /// Value at (face, i, j).
    #[inline]
    pub fn get(&self, face: FaceIndex, i: usize, j: usize) -> T {
        self.data[self.offset(face, i, j)]
    }

    /// Set the value at (face, i, j).
    #[inline]
    pub fn set(&mut self, face: FaceIndex, i: usize, j: usize, value: T) {
        let k = self.offset(face, i, j);
        self.data[k] = value;
    }

    /// Values of one face in local order `j * n_points + i`.
    pub fn face_values(&self, face: FaceIndex) -> Vec<T> {
        let n = self.n_points;
        (0..n * n)
            .map(|local| self.get(face, local % n, local / n))
            .collect()
    }
}

impl<T> MetadataTensor<T> {
    /// Flat offset of (face, i, j).
    #[inline]
    pub fn offset(&self, face: FaceIndex, i: usize, j: usize) -> usize {
        debug_assert!(i < self.n_points && j < self.n_points && face.get() < self.n_faces);
        (j * self.n_points + i) * self.n_faces + face.get()
    }

    /// Number of GLL points per direction.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Number of faces.
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.n_faces
    }

    /// Shape as `[n_points, n_points, n_faces]`.
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        [self.n_points, self.n_points, self.n_faces]
    }

    /// The flat buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the tensor and return the flat buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}
