//! Well-composed solid sets.
//!
//! The surface produced by the resolver is the boundary of the solid leaf
//! set. That boundary is a 2-manifold with one vertex per lattice point
//! exactly when, around every lattice point, the eight leaf cells of the
//! 2×2×2 block split into a face-connected solid part and a face-connected
//! non-solid part. Two cubes touching only along an edge or at a corner
//! break that rule.
//!
//! [`SolidMap::regularize`] restores it by filling exterior leaf cells. Cells
//! outside the root cube are never filled, so the outside stays reachable.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use super::grid::{CellCoord, LatticePoint};
use super::octree::Octree;
use crate::error::{ManifoldError, Result};

/// Octant bits of the three face-adjacent octants differ in one bit each.
const AXIS_BITS: [usize; 3] = [1, 2, 4];

/// The 2×2×2 block of leaf cells around a lattice point.
///
/// Octant `o = dx | dy << 1 | dz << 2` is the cell at `vertex + (dx, dy, dz) - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// Solid octants.
    pub solid: u8,
    /// Octants outside the root cube (never solid, never filled).
    pub outside: u8,
}

impl Block {
    /// Both the solid and the non-solid octants are face-connected.
    pub fn is_well_composed(self) -> bool {
        components(self.solid).len() <= 1 && components(!self.solid).len() <= 1
    }

    /// Octants to fill to move the block towards a well-composed one.
    ///
    /// `None` when the block is already well-composed or no legal fill
    /// exists.
    pub fn repair(self) -> Option<u8> {
        let empty = !self.solid;
        let holes = components(empty);
        if holes.len() > 1 {
            let keep = holes
                .iter()
                .position(|&h| h & self.outside != 0)
                .or_else(|| {
                    holes
                        .iter()
                        .enumerate()
                        .max_by_key(|&(i, h)| (h.count_ones(), Reverse(i)))
                        .map(|(i, _)| i)
                })?;
            let fill = holes
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != keep)
                .fold(0u8, |acc, (_, &h)| acc | h);
            return Some(fill);
        }

        let parts = components(self.solid);
        if parts.len() > 1 {
            let fillable = empty & !self.outside;
            let first = neighbors(parts[0]) & fillable;
            let others = parts[1..]
                .iter()
                .fold(0u8, |acc, &p| acc | neighbors(p));
            // Prefer an octant that joins the first part to another one
            let joining = first & others;
            let pick = if joining != 0 { joining } else { first };
            if pick == 0 {
                return None;
            }
            return Some(1 << pick.trailing_zeros());
        }

        None
    }
}

/// Octants face-adjacent to any octant in `mask`, excluding `mask` itself.
fn neighbors(mask: u8) -> u8 {
    let mut out = 0u8;
    for o in octants(mask) {
        for bit in AXIS_BITS {
            out |= 1 << (o ^ bit);
        }
    }
    out & !mask
}

/// Indices of the set bits of `mask`, lowest first.
fn octants(mask: u8) -> impl Iterator<Item = usize> {
    (0..8).filter(move |o| mask & (1 << o) != 0)
}

/// Face-connected components of the octants in `mask`, ordered by their
/// lowest octant.
pub(crate) fn components(mask: u8) -> Vec<u8> {
    let mut remaining = mask;
    let mut out = Vec::new();
    while remaining != 0 {
        let seed = 1u8 << remaining.trailing_zeros();
        let mut component = seed;
        let mut frontier = seed;
        while frontier != 0 {
            let o = frontier.trailing_zeros() as usize;
            frontier &= frontier - 1;
            for bit in AXIS_BITS {
                let n = 1u8 << (o ^ bit);
                if mask & n != 0 && component & n == 0 {
                    component |= n;
                    frontier |= n;
                }
            }
        }
        remaining &= !component;
        out.push(component);
    }
    out
}

/// Leaf cell of octant `o` in the block around `vertex`.
#[inline]
pub fn octant_cell(vertex: [i64; 3], octant: usize) -> [i64; 3] {
    [
        vertex[0] + (octant & 1) as i64 - 1,
        vertex[1] + ((octant >> 1) & 1) as i64 - 1,
        vertex[2] + ((octant >> 2) & 1) as i64 - 1,
    ]
}

#[inline]
fn signed(point: LatticePoint) -> [i64; 3] {
    [point.x as i64, point.y as i64, point.z as i64]
}

/// Leaf-level solidity over an [`Octree`] plus the cells filled on top of it.
#[derive(Debug, Clone)]
pub struct SolidMap<'a> {
    tree: &'a Octree,
    filled: HashSet<CellCoord>,
}

impl<'a> SolidMap<'a> {
    /// Solid map with nothing filled yet.
    pub fn new(tree: &'a Octree) -> Self {
        Self {
            tree,
            filled: HashSet::new(),
        }
    }

    /// The underlying octree.
    #[inline]
    pub fn tree(&self) -> &'a Octree {
        self.tree
    }

    /// Whether the leaf cell `coord` is solid. Cells outside the root are not.
    pub fn is_solid(&self, coord: [i64; 3]) -> bool {
        match self.tree.leaf_kind(coord) {
            None => false,
            Some(kind) if kind.is_solid() => true,
            Some(_) => self
                .tree
                .frame()
                .leaf(coord)
                .is_some_and(|leaf| self.filled.contains(&leaf)),
        }
    }

    /// The block around lattice point `vertex`.
    pub fn block(&self, vertex: [i64; 3]) -> Block {
        let frame = self.tree.frame();
        let mut block = Block {
            solid: 0,
            outside: 0,
        };
        for o in 0..8 {
            let cell = octant_cell(vertex, o);
            if frame.leaf(cell).is_none() {
                block.outside |= 1 << o;
            } else if self.is_solid(cell) {
                block.solid |= 1 << o;
            }
        }
        block
    }

    /// Cells filled so far.
    #[inline]
    pub fn filled(&self) -> &HashSet<CellCoord> {
        &self.filled
    }

    /// Leaves that can carry surface: occupied and filled, in lexicographic
    /// order. Interior leaves never touch a non-solid cell.
    pub fn boundary_cells(&self) -> Vec<CellCoord> {
        let mut cells: Vec<CellCoord> = self
            .tree
            .occupied_leaves()
            .into_iter()
            .map(|(coord, _)| coord)
            .chain(self.filled.iter().copied())
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Fill exterior cells until every block around a boundary lattice point
    /// is well-composed, or no legal fill remains for it.
    ///
    /// Returns the number of cells filled. Fails with
    /// [`ManifoldError::ResourceExhausted`] past `max_filled` cells.
    pub fn regularize(&mut self, max_filled: usize) -> Result<usize> {
        let frame = *self.tree.frame();
        let before = self.filled.len();

        let mut pending: BTreeSet<[i64; 3]> = BTreeSet::new();
        for (coord, _) in self.tree.occupied_leaves() {
            pending.extend(coord.corners().into_iter().map(signed));
        }

        while let Some(vertex) = pending.pop_first() {
            let Some(fill) = self.block(vertex).repair() else {
                continue;
            };

            for o in octants(fill) {
                let Some(leaf) = frame.leaf(octant_cell(vertex, o)) else {
                    continue;
                };
                if self.filled.len() >= max_filled {
                    return Err(ManifoldError::ResourceExhausted {
                        what: "filled cells",
                        requested: self.filled.len() + 1,
                        limit: max_filled,
                    });
                }
                if self.filled.insert(leaf) {
                    pending.extend(leaf.corners().into_iter().map(signed));
                }
            }
        }

        Ok(self.filled.len() - before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::manifold::fixtures::tree_for;

    fn all_blocks_well_composed(map: &SolidMap<'_>) -> bool {
        let r = map.tree().frame().resolution() as i64;
        (0..=r).all(|x| (0..=r).all(|y| (0..=r).all(|z| map.block([x, y, z]).is_well_composed())))
    }

    #[test]
    fn test_components() {
        assert!(components(0).is_empty());
        assert_eq!(components(0xFF), vec![0xFF]);
        // Antipodal octants 0 and 7
        assert_eq!(components(0b1000_0001), vec![0b0000_0001, 0b1000_0000]);
        // Octants 0, 1, 3 form an L
        assert_eq!(components(0b0000_1011), vec![0b0000_1011]);
    }

    #[test]
    fn test_block_classification() {
        let full = Block { solid: 0xFF, outside: 0 };
        let single = Block { solid: 0b0000_0001, outside: 0 };
        let edge = Block { solid: 0b1001_0000, outside: 0 };
        let corner = Block { solid: 0b1000_0001, outside: 0 };
        assert!(full.is_well_composed());
        assert!(single.is_well_composed());
        assert!(!edge.is_well_composed());
        assert!(!corner.is_well_composed());
    }

    #[test]
    fn test_repair_edge_joins_parts() {
        // Octants 4 and 7 share only an edge; octant 5 touches both
        let edge = Block { solid: 0b1001_0000, outside: 0 };
        assert_eq!(edge.repair(), Some(0b0010_0000));
        assert_eq!(Block { solid: 0b1011_0000, outside: 0 }.repair(), None);
    }

    #[test]
    fn test_repair_split_complement_keeps_outside() {
        // Non-solid octants 0 and 7 only; 7 lies outside the root
        let block = Block { solid: 0b0111_1110, outside: 0b1000_0000 };
        assert_eq!(block.repair(), Some(0b0000_0001));
        // Without outside octants the lowest of equal parts is kept
        let block = Block { solid: 0b0111_1110, outside: 0 };
        assert_eq!(block.repair(), Some(0b1000_0000));
    }

    #[test]
    fn test_octant_cell() {
        assert_eq!(octant_cell([3, 3, 3], 0), [2, 2, 2]);
        assert_eq!(octant_cell([3, 3, 3], 7), [3, 3, 3]);
        assert_eq!(octant_cell([3, 3, 3], 2), [2, 3, 2]);
    }

    #[test]
    fn test_single_cell_needs_nothing() {
        let tree = tree_for(&[[2, 2, 2]], 3);
        let mut map = SolidMap::new(&tree);
        assert_eq!(map.regularize(usize::MAX).unwrap(), 0);
        assert!(all_blocks_well_composed(&map));
        assert_eq!(map.boundary_cells(), vec![CellCoord::new(2, 2, 2)]);
    }

    #[test]
    fn test_edge_contact_is_filled() {
        let tree = tree_for(&[[2, 2, 2], [3, 3, 2]], 3);
        let mut map = SolidMap::new(&tree);
        assert!(!map.block([3, 3, 2]).is_well_composed());
        let filled = map.regularize(usize::MAX).unwrap();
        assert!(filled > 0);
        assert!(all_blocks_well_composed(&map));
    }

    #[test]
    fn test_corner_contact_is_filled() {
        let tree = tree_for(&[[2, 2, 2], [3, 3, 3]], 3);
        let mut map = SolidMap::new(&tree);
        assert!(!map.block([3, 3, 3]).is_well_composed());
        map.regularize(usize::MAX).unwrap();
        assert!(all_blocks_well_composed(&map));
        let cells = map.boundary_cells();
        assert!(cells.contains(&CellCoord::new(2, 2, 2)));
        assert!(cells.contains(&CellCoord::new(3, 3, 3)));
    }

    #[test]
    fn test_corner_contact_at_root_boundary() {
        // Diagonal cells touching the root face z = 0
        let tree = tree_for(&[[0, 0, 0], [1, 1, 0]], 2);
        let mut map = SolidMap::new(&tree);
        map.regularize(usize::MAX).unwrap();
        assert!(all_blocks_well_composed(&map));
        assert!(!map.is_solid([1, 1, -1]));
    }

    #[test]
    fn test_fill_budget() {
        let tree = tree_for(&[[2, 2, 2], [3, 3, 3]], 3);
        let mut map = SolidMap::new(&tree);
        let err = map.regularize(0).unwrap_err();
        assert!(matches!(err, ManifoldError::ResourceExhausted { limit: 0, .. }));
    }
}
