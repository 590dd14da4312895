//! Arena octree over the input faces.
//!
//! Cells live in a flat `Vec` and are addressed by index; a hash map from
//! [`CellKey`] (level plus integer coordinates) to index gives direct lookup.
//! Children are stored as indices in their parent, there are no parent
//! pointers. A cell either has exactly eight children or is a leaf:
//!
//! - an **occupied** leaf at the target depth, owning the faces that touch it;
//! - an **empty** leaf at any level, never subdivided further.
//!
//! Faces are binned with a closed test, so a face on a cell boundary lands in
//! the cells on both sides. Only the cell behind it becomes occupied (see
//! [`face_supports_box`]); the one in front stays empty. Re-running on a
//! surface that already lies on the lattice then gives back the same cells.
//!
//! After construction, empty leaves are classified as [`CellKind::Exterior`]
//! when they can be reached from the boundary of the root cube through other
//! empty leaves, and as [`CellKind::Interior`] otherwise (enclosed cavities).

use std::collections::{HashMap, VecDeque};

use rayon::prelude::*;

use super::bounds::Aabb;
use super::grid::{CellCoord, GridFrame};
use super::overlap::{face_supports_box, triangle_overlaps_box};
use crate::error::{ManifoldError, Result};
use crate::mesh::TriangleMesh;

/// Face lists longer than this are filtered in parallel.
const PARALLEL_FACE_THRESHOLD: usize = 2048;

/// Box inflation used by the overlap test, relative to the root side.
const OVERLAP_TOLERANCE: f64 = 1e-10;

/// Identity of a cell: its level and integer coordinates at that level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    /// Level (0 = root).
    pub level: u32,
    /// Coordinates in cells of this level.
    pub coord: [u32; 3],
}

impl CellKey {
    /// The root cell.
    pub const ROOT: CellKey = CellKey {
        level: 0,
        coord: [0, 0, 0],
    };

    /// Key of child `index`, where bit 0/1/2 of the index select the upper
    /// half along x/y/z.
    #[inline]
    pub fn child(self, index: usize) -> CellKey {
        CellKey {
            level: self.level + 1,
            coord: [
                self.coord[0] * 2 + (index as u32 & 1),
                self.coord[1] * 2 + ((index as u32 >> 1) & 1),
                self.coord[2] * 2 + ((index as u32 >> 2) & 1),
            ],
        }
    }

    /// Whether the cell touches the boundary of the root cube.
    #[inline]
    pub fn touches_root_boundary(self) -> bool {
        let last = (1u32 << self.level) - 1;
        self.coord.iter().any(|&c| c == 0 || c == last)
    }
}

/// What a cell is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// Subdivided; arena indices of the eight children.
    Branch([usize; 8]),
    /// Leaf at the target depth touching at least one face.
    Occupied,
    /// Empty leaf connected to the outside of the root cube.
    Exterior,
    /// Empty leaf enclosed by occupied cells.
    Interior,
}

impl CellKind {
    /// Occupied and interior leaves are solid.
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, CellKind::Occupied | CellKind::Interior)
    }
}

/// A cell record in the arena.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Level and coordinates.
    pub key: CellKey,
    /// Branch, occupied or empty.
    pub kind: CellKind,
    /// Input faces touching the cell; kept for leaves at the target depth.
    pub faces: Vec<u32>,
}

/// Octree over a mesh's faces.
#[derive(Debug, Clone)]
pub struct Octree {
    frame: GridFrame,
    cells: Vec<Cell>,
    index: HashMap<CellKey, usize>,
}

/// Face ids are stored as `u32`.
fn face_id_bound(num_faces: usize) -> Result<u32> {
    u32::try_from(num_faces).map_err(|_| ManifoldError::ResourceExhausted {
        what: "face indices",
        requested: num_faces,
        limit: u32::MAX as usize,
    })
}

impl Octree {
    /// Build the octree for `mesh` in `frame`, down to the frame's depth.
    ///
    /// Every face is registered in each cell it touches, boundaries included.
    /// Cells without faces are not subdivided. A leaf is occupied when at
    /// least one of its faces supports it. Fails with
    /// [`ManifoldError::ResourceExhausted`] if more than `max_cells` cells
    /// would be created or the arena cannot grow.
    pub fn build(
        frame: GridFrame,
        mesh: &TriangleMesh,
        max_cells: usize,
        parallel: bool,
    ) -> Result<Self> {
        let depth = frame.depth();
        let tolerance = frame.side() * OVERLAP_TOLERANCE;
        let mut tree = Octree {
            frame,
            cells: Vec::new(),
            index: HashMap::new(),
        };

        let num_faces = face_id_bound(mesh.num_faces())?;
        let root_bounds = frame.cell_bounds(0, [0, 0, 0]);
        let supported = |faces: &[u32], bounds: &Aabb| {
            faces.iter().any(|&f| {
                let tri = mesh.face_positions(f as usize);
                face_supports_box(&tri, bounds, &root_bounds, tolerance)
            })
        };

        let all_faces: Vec<u32> = (0..num_faces).collect();
        let solid = depth > 0 || supported(all_faces.as_slice(), &root_bounds);
        let mut stack: Vec<(usize, Vec<u32>)> = Vec::new();
        let root = tree.push(CellKey::ROOT, all_faces, solid, depth, max_cells, &mut stack)?;
        debug_assert_eq!(root, 0);

        while let Some((id, faces)) = stack.pop() {
            let key = tree.cells[id].key;
            let mut children = [0usize; 8];

            for (i, child) in children.iter_mut().enumerate() {
                let child_key = key.child(i);
                let bounds = frame.cell_bounds(child_key.level, child_key.coord);
                let touches = |&&f: &&u32| {
                    let tri = mesh.face_positions(f as usize);
                    triangle_overlaps_box(&tri, &bounds, tolerance)
                };
                let child_faces: Vec<u32> = if parallel && faces.len() > PARALLEL_FACE_THRESHOLD {
                    faces.par_iter().filter(touches).copied().collect()
                } else {
                    faces.iter().filter(touches).copied().collect()
                };
                let solid = child_key.level < depth || supported(child_faces.as_slice(), &bounds);
                *child = tree.push(child_key, child_faces, solid, depth, max_cells, &mut stack)?;
            }

            tree.cells[id].kind = CellKind::Branch(children);
        }

        tree.classify_regions();
        Ok(tree)
    }

    /// Append a cell, queueing it for subdivision when it needs one.
    ///
    /// `solid` only matters at the target depth, where a leaf whose faces all
    /// lie in front of it is empty.
    fn push(
        &mut self,
        key: CellKey,
        faces: Vec<u32>,
        solid: bool,
        depth: u32,
        max_cells: usize,
        stack: &mut Vec<(usize, Vec<u32>)>,
    ) -> Result<usize> {
        if self.cells.len() >= max_cells {
            return Err(ManifoldError::ResourceExhausted {
                what: "octree cells",
                requested: self.cells.len() + 1,
                limit: max_cells,
            });
        }
        self.cells
            .try_reserve(1)
            .map_err(|_| ManifoldError::ResourceExhausted {
                what: "octree arena",
                requested: self.cells.len() + 1,
                limit: self.cells.capacity(),
            })?;

        let id = self.cells.len();
        let (kind, kept) = if faces.is_empty() {
            (CellKind::Interior, Vec::new())
        } else if key.level == depth {
            // Empty leaves start out as interior until the flood fill
            let kind = if solid { CellKind::Occupied } else { CellKind::Interior };
            (kind, faces)
        } else {
            // Placeholder until the children exist
            stack.push((id, faces));
            (CellKind::Branch([0; 8]), Vec::new())
        };

        self.cells.push(Cell {
            key,
            kind,
            faces: kept,
        });
        self.index.insert(key, id);
        Ok(id)
    }

    /// Flood exterior space from the root boundary through empty leaves.
    fn classify_regions(&mut self) {
        let mut queue = VecDeque::new();
        for (id, cell) in self.cells.iter_mut().enumerate() {
            if cell.kind == CellKind::Interior && cell.key.touches_root_boundary() {
                cell.kind = CellKind::Exterior;
                queue.push_back(id);
            }
        }

        let mut touching = Vec::new();
        while let Some(id) = queue.pop_front() {
            let key = self.cells[id].key;
            for axis in 0..3 {
                for step in [-1i64, 1] {
                    let mut coord = key.coord.map(|c| c as i64);
                    coord[axis] += step;
                    let Some(neighbor) = self.locate(key.level, coord) else {
                        continue;
                    };

                    touching.clear();
                    self.leaves_facing(neighbor, axis, step, &mut touching);
                    for &leaf in &touching {
                        if self.cells[leaf].kind == CellKind::Interior {
                            self.cells[leaf].kind = CellKind::Exterior;
                            queue.push_back(leaf);
                        }
                    }
                }
            }
        }
    }

    /// Leaves under `id` on the side facing a neighbour that lies in
    /// direction `-step` along `axis`.
    fn leaves_facing(&self, id: usize, axis: usize, step: i64, out: &mut Vec<usize>) {
        match self.cells[id].kind {
            CellKind::Branch(children) => {
                let side = if step > 0 { 0 } else { 1 };
                for (i, &child) in children.iter().enumerate() {
                    if (i >> axis) & 1 == side {
                        self.leaves_facing(child, axis, step, out);
                    }
                }
            }
            _ => out.push(id),
        }
    }

    /// Deepest cell containing the cell `coord` at `level`.
    ///
    /// Returns a leaf at `level` or above, or a branch exactly at `level`.
    /// `None` if `coord` lies outside the root cube.
    pub fn locate(&self, level: u32, coord: [i64; 3]) -> Option<usize> {
        let extent = 1i64 << level;
        if coord.iter().any(|&c| c < 0 || c >= extent) {
            return None;
        }

        let mut id = 0;
        loop {
            let cell = &self.cells[id];
            match cell.kind {
                CellKind::Branch(children) if cell.key.level < level => {
                    let shift = level - cell.key.level - 1;
                    let bit = |c: i64| ((c >> shift) & 1) as usize;
                    id = children[bit(coord[0]) | bit(coord[1]) << 1 | bit(coord[2]) << 2];
                }
                _ => return Some(id),
            }
        }
    }

    /// Kind of the leaf containing the leaf-level cell `coord`, `None`
    /// outside the root cube.
    #[inline]
    pub fn leaf_kind(&self, coord: [i64; 3]) -> Option<CellKind> {
        self.locate(self.frame.depth(), coord)
            .map(|id| self.cells[id].kind)
    }

    /// Look up a cell by key.
    pub fn get(&self, key: &CellKey) -> Option<&Cell> {
        self.index.get(key).map(|&id| &self.cells[id])
    }

    /// The lattice frame.
    #[inline]
    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    /// All cells in creation order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells of a given kind (branches are counted as one kind).
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells
            .iter()
            .filter(|c| match (c.kind, kind) {
                (CellKind::Branch(_), CellKind::Branch(_)) => true,
                (a, b) => a == b,
            })
            .count()
    }

    /// Occupied leaves with their faces, in lexicographic coordinate order.
    pub fn occupied_leaves(&self) -> Vec<(CellCoord, &[u32])> {
        let mut leaves: Vec<(CellCoord, &[u32])> = self
            .cells
            .iter()
            .filter(|c| c.kind == CellKind::Occupied)
            .map(|c| {
                let [x, y, z] = c.key.coord;
                (CellCoord::new(x, y, z), c.faces.as_slice())
            })
            .collect();
        leaves.sort_unstable_by_key(|(coord, _)| *coord);
        leaves
    }
}
