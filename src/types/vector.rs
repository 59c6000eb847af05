//! Three-component vector arithmetic on `[f64; 3]`.
//!
//! Mesh vertices, projected GLL nodes and tangent vectors are all stored as
//! plain arrays; [`Vec3`] supplies the handful of operations the geometry
//! code needs without introducing a wrapper type.

/// Arithmetic on Cartesian 3-vectors.
pub trait Vec3: Copy {
    /// Component-wise sum.
    fn add(&self, other: &Self) -> Self;

    /// Component-wise difference `self - other`.
    fn sub(&self, other: &Self) -> Self;

    /// Scalar multiple.
    fn scale(&self, c: f64) -> Self;

    /// Dot product.
    fn dot(&self, other: &Self) -> f64;

    /// Right-handed cross product `self × other`.
    fn cross(&self, other: &Self) -> Self;

    /// Euclidean norm.
    fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Squared Euclidean norm.
    fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean distance.
    fn distance(&self, other: &Self) -> f64 {
        self.sub(other).norm()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    fn normalized(&self) -> Option<Self> {
        let n = self.norm();
        if n > 0.0 && n.is_finite() {
            Some(self.scale(1.0 / n))
        } else {
            None
        }
    }
}

impl Vec3 for [f64; 3] {
    #[inline]
    fn add(&self, other: &Self) -> Self {
        [self[0] + other[0], self[1] + other[1], self[2] + other[2]]
    }

    #[inline]
    fn sub(&self, other: &Self) -> Self {
        [self[0] - other[0], self[1] - other[1], self[2] - other[2]]
    }

    #[inline]
    fn scale(&self, c: f64) -> Self {
        [c * self[0], c * self[1], c * self[2]]
    }

    #[inline]
    fn dot(&self, other: &Self) -> f64 {
        self[0] * other[0] + self[1] * other[1] + self[2] * other[2]
    }

    #[inline]
    fn cross(&self, other: &Self) -> Self {
        [
            self[1] * other[2] - self[2] * other[1],
            self[2] * other[0] - self[0] * other[2],
            self[0] * other[1] - self[1] * other[0],
        ]
    }
}
