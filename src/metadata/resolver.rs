//! Coordinate-based global node numbering.
//!
//! Adjacent faces traverse a shared edge in opposite directions and carry
//! no explicit edge topology, so coincident GLL nodes are identified purely
//! by position. The registry hashes points into cubic cells whose side is
//! the matching tolerance; any registered point within tolerance of a query
//! lies in one of the 27 cells around it.

use std::collections::HashMap;

use crate::types::{GlobalNodeIndex, Vec3};

use super::error::MetadataError;

type CellKey = [i64; 3];

/// Cells per unit length above which cell indices of unit-sphere points
/// could reach the `i64` range.
const MAX_CELLS_PER_UNIT: f64 = (1u64 << 62) as f64;

/// Registry assigning global indices to points in first-seen order.
#[derive(Clone, Debug)]
pub struct NodeRegistry {
    tolerance: f64,
    positions: Vec<[f64; 3]>,
    cells: HashMap<CellKey, Vec<GlobalNodeIndex>>,
}

impl NodeRegistry {
    /// Create an empty registry.
    ///
    /// Points closer than `tolerance` (Euclidean distance) are the same node.
    /// The tolerance must be positive, finite and large enough that unit
    /// coordinates divided by it still fit a 64-bit cell index.
    pub fn new(tolerance: f64) -> Result<Self, MetadataError> {
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(MetadataError::InvalidInput(format!(
                "node tolerance must be positive and finite, got {tolerance}"
            )));
        }
        if 1.0 / tolerance >= MAX_CELLS_PER_UNIT {
            return Err(MetadataError::InvalidInput(format!(
                "node tolerance {tolerance:e} is too small for cell hashing"
            )));
        }
        Ok(Self {
            tolerance,
            positions: Vec::new(),
            cells: HashMap::new(),
        })
    }

    /// Number of distinct nodes registered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no node has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position a node was first registered with.
    pub fn position(&self, index: GlobalNodeIndex) -> Option<[f64; 3]> {
        self.positions.get(index.get()).copied()
    }

    /// Look up a point without registering it.
    ///
    /// If several registered nodes lie within tolerance, the lowest index wins.
    pub fn find(&self, point: &[f64; 3]) -> Option<GlobalNodeIndex> {
        let [cx, cy, cz] = self.cell_of(point);
        let mut best: Option<GlobalNodeIndex> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = [
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    ];
                    let Some(bucket) = self.cells.get(&key) else {
                        continue;
                    };
                    for &index in bucket {
                        if best.is_some_and(|b| b <= index) {
                            continue;
                        }
                        if self.positions[index].distance(point) < self.tolerance {
                            best = Some(index);
                        }
                    }
                }
            }
        }

        best
    }

    /// Return the index of a matching node, registering the point if none exists.
    pub fn resolve(&mut self, point: &[f64; 3]) -> GlobalNodeIndex {
        if let Some(index) = self.find(point) {
            return index;
        }

        let index = GlobalNodeIndex::new(self.positions.len());
        self.positions.push(*point);
        self.cells.entry(self.cell_of(point)).or_default().push(index);
        index
    }

    fn cell_of(&self, point: &[f64; 3]) -> CellKey {
        point.map(|x| (x / self.tolerance).floor() as i64)
    }
}
