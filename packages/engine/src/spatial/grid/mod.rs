//! SpatialGrid - uniform-cell broad phase
//!
//! The plane is cut into square cells of `cell_size` world units. Each cell
//! lists the bodies whose AABB touches it, and each body remembers the cells
//! it was written into so removal never has to scan the map.
//!
//! The grid is unbounded: cells exist only while something occupies them.
//! Re-inserting a body replaces its previous membership, so the engine simply
//! re-inserts after every position change instead of tracking cell deltas.

use std::collections::HashMap;

use crate::core::{ConfigError, Rect};
use crate::physics::BodyHandle;

/// Default cell edge length in world units
pub const DEFAULT_CELL_SIZE: f32 = 64.0;

/// Two signed cell coordinates packed into one integer key
pub type CellKey = i64;

#[inline]
pub fn cell_key(cx: i32, cy: i32) -> CellKey {
    ((cx as i64) << 32) | (cy as u32 as i64)
}

#[inline]
pub fn cell_coords(key: CellKey) -> (i32, i32) {
    ((key >> 32) as i32, key as i32)
}

/// Inclusive cell range covered by an AABB
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl CellRange {
    fn keys(self) -> impl Iterator<Item = CellKey> {
        (self.min_y..=self.max_y)
            .flat_map(move |cy| (self.min_x..=self.max_x).map(move |cx| cell_key(cx, cy)))
    }
}

pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<BodyHandle>>,
    /// Cells each body was written into
    owned: HashMap<BodyHandle, Vec<CellKey>>,
}

impl SpatialGrid {
    /// Create an empty grid. `cell_size` must be positive and finite.
    pub fn new(cell_size: f32) -> Result<Self, ConfigError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
            owned: HashMap::new(),
        })
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of indexed bodies
    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.owned.contains_key(&handle)
    }

    /// Cells spanned by `aabb`: `floor(x / size) ..= floor((x + w) / size)` on each axis.
    #[inline]
    pub fn cell_range(&self, aabb: &Rect) -> CellRange {
        let inv = 1.0 / self.cell_size;
        CellRange {
            min_x: (aabb.left() * inv).floor() as i32,
            min_y: (aabb.top() * inv).floor() as i32,
            max_x: (aabb.right() * inv).floor() as i32,
            max_y: (aabb.bottom() * inv).floor() as i32,
        }
    }

    /// Index `handle` under every cell `aabb` touches, replacing any earlier membership.
    pub fn insert(&mut self, handle: BodyHandle, aabb: &Rect) {
        self.remove(handle);

        let range = self.cell_range(aabb);
        let span = (range.max_x as i64 - range.min_x as i64 + 1)
            * (range.max_y as i64 - range.min_y as i64 + 1);
        let mut keys = Vec::with_capacity(span.clamp(1, 64) as usize);
        for key in range.keys() {
            self.cells.entry(key).or_default().push(handle);
            keys.push(key);
        }
        self.owned.insert(handle, keys);
    }

    /// Drop `handle` from every cell it occupies. Unknown handles are ignored.
    pub fn remove(&mut self, handle: BodyHandle) {
        let Some(keys) = self.owned.remove(&handle) else {
            return;
        };
        for key in keys {
            if let Some(bucket) = self.cells.get_mut(&key) {
                if let Some(pos) = bucket.iter().position(|h| *h == handle) {
                    bucket.swap_remove(pos);
                }
                if bucket.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Every handle sharing a cell with `aabb`, sorted and deduplicated.
    pub fn query(&self, aabb: &Rect) -> Vec<BodyHandle> {
        let mut out = Vec::new();
        for key in self.cell_range(aabb).keys() {
            if let Some(bucket) = self.cells.get(&key) {
                out.extend_from_slice(bucket);
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Possible overlaps for `handle`: everything sharing a cell with `aabb`, minus itself.
    ///
    /// May contain bodies that do not actually overlap; never omits one that does.
    pub fn candidates(&self, handle: BodyHandle, aabb: &Rect) -> Vec<BodyHandle> {
        let mut out = self.query(aabb);
        out.retain(|h| *h != handle);
        out
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.owned.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(i: u32) -> BodyHandle {
        BodyHandle::new(i, 0)
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        assert!(SpatialGrid::new(0.0).is_err());
        assert!(SpatialGrid::new(-8.0).is_err());
        assert!(SpatialGrid::new(f32::NAN).is_err());
        assert!(SpatialGrid::new(DEFAULT_CELL_SIZE).is_ok());
    }

    #[test]
    fn cell_keys_round_trip_negative_coordinates() {
        for &(x, y) in &[(0, 0), (-1, 5), (7, -3), (i32::MIN, i32::MAX)] {
            assert_eq!(cell_coords(cell_key(x, y)), (x, y));
        }
        assert_ne!(cell_key(1, 0), cell_key(0, 1));
    }

    #[test]
    fn cell_range_includes_right_and_bottom_edges() {
        let grid = SpatialGrid::new(10.0).unwrap();
        let r = grid.cell_range(&Rect::new(-5.0, 0.0, 15.0, 10.0));
        assert_eq!(r, CellRange { min_x: -1, min_y: 0, max_x: 1, max_y: 1 });
    }

    #[test]
    fn reinsert_replaces_previous_cells() {
        let mut grid = SpatialGrid::new(10.0).unwrap();
        grid.insert(h(1), &Rect::new(0.0, 0.0, 5.0, 5.0));
        grid.insert(h(2), &Rect::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(grid.candidates(h(2), &Rect::new(1.0, 1.0, 2.0, 2.0)), vec![h(1)]);

        grid.insert(h(1), &Rect::new(100.0, 100.0, 5.0, 5.0));
        assert!(grid.candidates(h(2), &Rect::new(1.0, 1.0, 2.0, 2.0)).is_empty());
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn remove_is_idempotent_and_frees_cells() {
        let mut grid = SpatialGrid::new(10.0).unwrap();
        grid.insert(h(1), &Rect::new(0.0, 0.0, 25.0, 5.0));
        assert_eq!(grid.cell_count(), 3);
        grid.remove(h(1));
        grid.remove(h(1));
        grid.remove(h(9));
        assert_eq!(grid.cell_count(), 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn candidates_are_sorted_unique_and_exclude_self() {
        let mut grid = SpatialGrid::new(10.0).unwrap();
        let big = Rect::new(0.0, 0.0, 30.0, 30.0);
        grid.insert(h(3), &big);
        grid.insert(h(1), &big);
        grid.insert(h(2), &Rect::new(5.0, 5.0, 1.0, 1.0));
        assert_eq!(grid.candidates(h(3), &big), vec![h(1), h(2)]);

        grid.clear();
        assert!(grid.candidates(h(3), &big).is_empty());
    }
}
