//! Strongly-typed index newtypes.
//!
//! Mesh faces and global degrees of freedom are both plain integers in the
//! output tensors; these wrappers keep them apart inside the crate.

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);

            /// Increment index by one.
            #[inline]
            pub fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        // Direct Vec indexing
        impl<T> std::ops::Index<$name> for Vec<T> {
            type Output = T;
            #[inline]
            fn index(&self, idx: $name) -> &T {
                &self[idx.0]
            }
        }

        impl<T> std::ops::IndexMut<$name> for Vec<T> {
            #[inline]
            fn index_mut(&mut self, idx: $name) -> &mut T {
                &mut self[idx.0]
            }
        }
    };
}

define_index!(
    /// Index of a face (spectral element) in a mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use gllmeta_rs::types::FaceIndex;
    ///
    /// let face = FaceIndex::new(42);
    /// assert_eq!(face.get(), 42);
    /// ```
    FaceIndex,
    "F"
);

define_index!(
    /// Global degree-of-freedom index of a GLL node.
    ///
    /// Every local node of every face that coincides with the same physical
    /// point carries the same `GlobalNodeIndex`. Indices form the contiguous
    /// range `[0, K)` in first-seen order.
    ///
    /// # Example
    ///
    /// ```
    /// use gllmeta_rs::types::GlobalNodeIndex;
    ///
    /// let dof = GlobalNodeIndex::new(7);
    /// assert_eq!(dof.next().get(), 8);
    /// assert_eq!(format!("{dof}"), "G7");
    /// ```
    GlobalNodeIndex,
    "G"
);

impl FaceIndex {
    /// Create an iterator over [0, n) face indices.
    pub fn iter(n: usize) -> impl ExactSizeIterator<Item = FaceIndex> {
        (0..n).map(FaceIndex)
    }
}

impl GlobalNodeIndex {
    /// Convert to the 32-bit integer stored in output files.
    ///
    /// Returns `None` if the index does not fit.
    #[inline]
    pub fn to_i32(self) -> Option<i32> {
        i32::try_from(self.0).ok()
    }
}
