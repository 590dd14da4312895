//! Lattice geometry of the subdivided root cube.
//!
//! All identities in the pipeline are integer: cells are addressed by their
//! leaf-level coordinates, lattice points by their corner coordinates, and a
//! lattice point's [`GridIndex`] is computed from those integers alone. Never
//! derive any of them from floating-point positions.

use nalgebra::Point3;

use super::bounds::Aabb;
use crate::error::{ManifoldError, Result};

/// Deepest supported subdivision. Lattice keys for `2^20 + 1` points per
/// axis still fit comfortably in a `u64`.
pub const MAX_DEPTH: u32 = 20;

/// Integer coordinates of a leaf cell.
///
/// The derived ordering is lexicographic in `(x, y, z)`, which is the
/// traversal order of the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// X index in leaf cells.
    pub x: u32,
    /// Y index in leaf cells.
    pub y: u32,
    /// Z index in leaf cells.
    pub z: u32,
}

impl CellCoord {
    /// Create a cell coordinate.
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Coordinates as a signed triple, for neighbour arithmetic.
    #[inline]
    pub fn signed(self) -> [i64; 3] {
        [self.x as i64, self.y as i64, self.z as i64]
    }

    /// The lattice point at corner `(dx, dy, dz)` of this cell, each 0 or 1.
    #[inline]
    pub fn corner(self, dx: u32, dy: u32, dz: u32) -> LatticePoint {
        LatticePoint::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// All eight corners, indexed by `dx | dy << 1 | dz << 2`.
    pub fn corners(self) -> [LatticePoint; 8] {
        std::array::from_fn(|i| {
            let i = i as u32;
            self.corner(i & 1, (i >> 1) & 1, (i >> 2) & 1)
        })
    }
}

/// Integer coordinates of a lattice point (a cell corner).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticePoint {
    /// X index.
    pub x: u32,
    /// Y index.
    pub y: u32,
    /// Z index.
    pub z: u32,
}

impl LatticePoint {
    /// Create a lattice point.
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Canonical key of a lattice point.
///
/// Two cells that share a corner compute the same key for it independently;
/// the key is the vertex identity of the output mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridIndex(u64);

impl GridIndex {
    /// Key of `point` in a grid with `resolution` cells per axis.
    #[inline]
    pub fn new(point: LatticePoint, resolution: u32) -> Self {
        let stride = resolution as u64 + 1;
        Self((point.x as u64 * stride + point.y as u64) * stride + point.z as u64)
    }

    /// The raw key.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Placement of the lattice in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridFrame {
    origin: Point3<f64>,
    side: f64,
    depth: u32,
}

impl GridFrame {
    /// Create a frame for a root cube at `origin` with edge length `side`.
    pub fn new(origin: Point3<f64>, side: f64, depth: u32) -> Result<Self> {
        if depth > MAX_DEPTH {
            return Err(ManifoldError::ResourceExhausted {
                what: "subdivision depth",
                requested: depth as usize,
                limit: MAX_DEPTH as usize,
            });
        }
        if !(side.is_finite() && side > 0.0) {
            return Err(ManifoldError::invalid_param("side", side, "must be positive"));
        }
        Ok(Self {
            origin,
            side,
            depth,
        })
    }

    /// Frame whose root cube is the cube of a bounding box.
    pub fn from_bounds(bounds: &Aabb, depth: u32) -> Result<Self> {
        let (origin, side) = bounds.cube();
        Self::new(origin, side, depth)
    }

    /// Subdivision depth.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Leaf cells per axis.
    #[inline]
    pub fn resolution(&self) -> u32 {
        1 << self.depth
    }

    /// Minimum corner of the root cube.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Edge length of the root cube.
    #[inline]
    pub fn side(&self) -> f64 {
        self.side
    }

    /// Edge length of a leaf cell.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size_at(self.depth)
    }

    /// Edge length of a cell at `level`.
    #[inline]
    pub fn cell_size_at(&self, level: u32) -> f64 {
        self.side / (1u64 << level) as f64
    }

    /// World-space bounds of the cell at `level` with coordinates `coord`.
    pub fn cell_bounds(&self, level: u32, coord: [u32; 3]) -> Aabb {
        let size = self.cell_size_at(level);
        let min = Point3::new(
            self.origin.x + coord[0] as f64 * size,
            self.origin.y + coord[1] as f64 * size,
            self.origin.z + coord[2] as f64 * size,
        );
        let max = Point3::new(min.x + size, min.y + size, min.z + size);
        Aabb { min, max }
    }

    /// World-space position of a lattice point.
    #[inline]
    pub fn lattice_position(&self, point: LatticePoint) -> Point3<f64> {
        let h = self.cell_size();
        Point3::new(
            self.origin.x + point.x as f64 * h,
            self.origin.y + point.y as f64 * h,
            self.origin.z + point.z as f64 * h,
        )
    }

    /// Key of a lattice point in this frame.
    #[inline]
    pub fn grid_index(&self, point: LatticePoint) -> GridIndex {
        GridIndex::new(point, self.resolution())
    }

    /// Leaf coordinates if `coord` lies inside the root cube.
    #[inline]
    pub fn leaf(&self, coord: [i64; 3]) -> Option<CellCoord> {
        let r = self.resolution() as i64;
        if coord.iter().all(|&c| (0..r).contains(&c)) {
            Some(CellCoord::new(coord[0] as u32, coord[1] as u32, coord[2] as u32))
        } else {
            None
        }
    }
}
