//! Grid-cell resolution and stitching.
//!
//! Each solid leaf contributes one quad per face that borders a non-solid
//! cell. Quad corners are lattice points, so two cells sharing a corner name
//! it with the same [`GridIndex`] and the [`Surface`] hands out one output
//! vertex per key.
//!
//! Resolution is split in two halves:
//!
//! - [`resolve_cell`] is a pure function of the solid map and produces a
//!   [`CellPatch`] in lattice terms. Patches for different cells can be
//!   computed on any thread.
//! - [`Surface::insert_patch`] assigns vertex ids and appends triangles. It
//!   runs on a single writer, in lexicographic cell order.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::Point3;
use thiserror::Error;

use super::grid::{CellCoord, GridFrame, GridIndex, LatticePoint};
use super::regularize::SolidMap;
use crate::mesh::topology::is_single_fan;
use crate::mesh::TriangleMesh;

/// Why a leaf cell could not be resolved.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFailure {
    /// The solid or the non-solid cells around a patch corner are not
    /// face-connected, so the patch would pinch there.
    #[error("cells around lattice point ({}, {}, {}) do not form a single sheet", .corner.x, .corner.y, .corner.z)]
    NonManifoldCorner {
        /// The offending corner.
        corner: LatticePoint,
    },
}

/// The boundary patch of one leaf cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPatch {
    /// The resolved cell.
    pub cell: CellCoord,
    /// Triangles as lattice corners, outward-facing.
    pub triangles: Vec<[LatticePoint; 3]>,
}

impl CellPatch {
    /// Whether the cell lies fully inside the solid and contributes nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Corner offsets of the face of a cell with outward normal `+axis`
/// (`positive`) or `-axis`, counter-clockwise seen from outside.
fn face_corners(cell: CellCoord, axis: usize, positive: bool) -> [LatticePoint; 4] {
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    let uv: [(u32, u32); 4] = if positive {
        [(0, 0), (1, 0), (1, 1), (0, 1)]
    } else {
        [(0, 0), (0, 1), (1, 1), (1, 0)]
    };
    let base = [cell.x, cell.y, cell.z];
    uv.map(|(du, dv)| {
        let mut p = base;
        p[axis] += positive as u32;
        p[u] += du;
        p[v] += dv;
        LatticePoint::new(p[0], p[1], p[2])
    })
}

/// Compute the patch of one solid leaf cell.
///
/// A face is emitted when the face-adjacent leaf is not solid (cells outside
/// the root never are). Every corner of an emitted face must sit in a
/// well-composed block; otherwise the whole cell fails and nothing of it is
/// kept.
pub fn resolve_cell(map: &SolidMap<'_>, cell: CellCoord) -> Result<CellPatch, CellFailure> {
    let mut patch = CellPatch {
        cell,
        triangles: Vec::new(),
    };
    let mut checked: Vec<LatticePoint> = Vec::with_capacity(8);

    for axis in 0..3 {
        for positive in [false, true] {
            let mut neighbor = cell.signed();
            neighbor[axis] += if positive { 1 } else { -1 };
            if map.is_solid(neighbor) {
                continue;
            }

            let quad = face_corners(cell, axis, positive);
            for corner in quad {
                if checked.contains(&corner) {
                    continue;
                }
                let vertex = [corner.x as i64, corner.y as i64, corner.z as i64];
                if !map.block(vertex).is_well_composed() {
                    return Err(CellFailure::NonManifoldCorner { corner });
                }
                checked.push(corner);
            }

            patch.triangles.push([quad[0], quad[1], quad[2]]);
            patch.triangles.push([quad[0], quad[2], quad[3]]);
        }
    }

    Ok(patch)
}

/// The growing output surface.
///
/// `vcolor` maps each lattice key to its output vertex and only ever grows;
/// `v_faces` records the triangles around every vertex.
#[derive(Debug, Clone)]
pub struct Surface {
    frame: GridFrame,
    vcolor: BTreeMap<GridIndex, usize>,
    vertices: Vec<Point3<f64>>,
    v_faces: Vec<BTreeSet<usize>>,
    triangles: Vec<[usize; 3]>,
}

impl Surface {
    /// Empty surface on the lattice of `frame`.
    pub fn new(frame: GridFrame) -> Self {
        Self {
            frame,
            vcolor: BTreeMap::new(),
            vertices: Vec::new(),
            v_faces: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Output vertex of a lattice point, created on first use.
    pub fn vertex(&mut self, point: LatticePoint) -> usize {
        let key = self.frame.grid_index(point);
        if let Some(&id) = self.vcolor.get(&key) {
            return id;
        }
        let id = self.vertices.len();
        self.vertices.push(self.frame.lattice_position(point));
        self.v_faces.push(BTreeSet::new());
        self.vcolor.insert(key, id);
        id
    }

    /// Append a resolved patch.
    pub fn insert_patch(&mut self, patch: &CellPatch) {
        for tri in &patch.triangles {
            let ids = tri.map(|p| self.vertex(p));
            let face = self.triangles.len();
            for &v in &ids {
                self.v_faces[v].insert(face);
            }
            self.triangles.push(ids);
        }
    }

    /// Resolve one cell and append its patch; on failure the surface is left
    /// untouched.
    pub fn split_grid(&mut self, map: &SolidMap<'_>, cell: CellCoord) -> Result<(), CellFailure> {
        let patch = resolve_cell(map, cell)?;
        self.insert_patch(&patch);
        Ok(())
    }

    /// Number of output vertices so far.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of output triangles so far.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Triangles incident to a vertex.
    #[inline]
    pub fn faces_around(&self, vertex: usize) -> &BTreeSet<usize> {
        &self.v_faces[vertex]
    }

    /// Vertices whose incident triangles do not form a single fan.
    pub fn pinched_vertices(&self) -> Vec<usize> {
        (0..self.vertices.len())
            .filter(|&v| {
                let link: Vec<(usize, usize)> = self.v_faces[v]
                    .iter()
                    .map(|&f| {
                        let [a, b, c] = self.triangles[f];
                        if a == v {
                            (b, c)
                        } else if b == v {
                            (c, a)
                        } else {
                            (a, b)
                        }
                    })
                    .collect();
                !is_single_fan(&link)
            })
            .collect()
    }

    /// Finish into a mesh, keeping only referenced vertices in first-use
    /// order.
    pub fn into_mesh(self) -> TriangleMesh {
        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.vertices.len());
        let faces = self
            .triangles
            .iter()
            .map(|tri| {
                tri.map(|v| {
                    if remap[v] == usize::MAX {
                        remap[v] = vertices.len();
                        vertices.push(self.vertices[v]);
                    }
                    remap[v]
                })
            })
            .collect();
        TriangleMesh::new(vertices, faces)
    }
}
