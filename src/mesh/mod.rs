//! Core mesh data structures.
//!
//! The repair pipeline works on plain face-vertex data: a list of positions
//! and a list of index triples. Unlike a half-edge structure this can hold
//! anything a file or a caller hands us, including non-manifold edges,
//! duplicate vertices, degenerate and self-intersecting faces.
//!
//! ```
//! use watertight::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let mesh = TriangleMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.5, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! );
//! assert!(mesh.validate().is_ok());
//! assert_eq!(mesh.num_faces(), 1);
//! ```

pub mod topology;

use nalgebra::Point3;

use crate::algo::manifold::Aabb;
use crate::error::{ManifoldError, Result};

pub use topology::TopologyReport;

/// A triangle mesh in face-vertex form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangles as indices into `vertices`, counter-clockwise seen from outside.
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a mesh from vertices and faces without validating it.
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from row-major coordinate and index buffers.
    ///
    /// `coords` holds `x, y, z` triples and `indices` holds `i, j, k` triples.
    /// Indices are signed so that negative values coming from foreign callers
    /// can be reported instead of wrapping around.
    ///
    /// ```
    /// use watertight::mesh::TriangleMesh;
    ///
    /// let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let mesh = TriangleMesh::from_flat(&coords, &[0, 1, 2]).unwrap();
    /// assert_eq!(mesh.num_vertices(), 3);
    ///
    /// assert!(TriangleMesh::from_flat(&coords[..4], &[0, 1, 2]).is_err());
    /// ```
    pub fn from_flat(coords: &[f64], indices: &[i64]) -> Result<Self> {
        if coords.len() % 3 != 0 {
            return Err(ManifoldError::InvalidDimension {
                name: "vertex",
                len: coords.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(ManifoldError::InvalidDimension {
                name: "face",
                len: indices.len(),
            });
        }

        let vertices = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect::<Vec<_>>();
        let rows = indices
            .chunks_exact(3)
            .map(|f| [f[0], f[1], f[2]])
            .collect::<Vec<_>>();
        let faces = checked_faces(&rows, vertices.len())?;

        Ok(Self { vertices, faces })
    }

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Get the positions of the three corners of a face.
    #[inline]
    pub fn face_positions(&self, f: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.faces[f];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Check that the mesh can be fed to the repair pipeline.
    ///
    /// Requires at least one vertex, finite coordinates and in-range face
    /// indices. Topology is not checked; see [`TopologyReport`] for that.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(ManifoldError::EmptyVertices);
        }

        for (vi, p) in self.vertices.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                return Err(ManifoldError::NonFiniteVertex { vertex: vi });
            }
        }

        for (fi, face) in self.faces.iter().enumerate() {
            for &vi in face {
                if vi >= self.vertices.len() {
                    return Err(ManifoldError::InvalidVertexIndex {
                        face: fi,
                        vertex: vi as i64,
                    });
                }
            }
        }

        Ok(())
    }

    /// Compute the axis-aligned bounding box of all vertices, `None` when
    /// there are none.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        Aabb::from_points(&self.vertices)
            .ok()
            .map(|aabb| (aabb.min, aabb.max))
    }

    /// Compute the area of a face.
    pub fn face_area(&self, f: usize) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.face_area(f)).sum()
    }

    /// Analyze edge and vertex topology.
    pub fn topology(&self) -> TopologyReport {
        TopologyReport::analyze(self)
    }
}

/// Convert signed index rows into checked `usize` faces.
pub(crate) fn checked_faces(rows: &[[i64; 3]], num_vertices: usize) -> Result<Vec<[usize; 3]>> {
    rows.iter()
        .enumerate()
        .map(|(fi, row)| {
            let mut face = [0usize; 3];
            for (slot, &vi) in face.iter_mut().zip(row) {
                if vi < 0 || vi as u64 >= num_vertices as u64 {
                    return Err(ManifoldError::InvalidVertexIndex {
                        face: fi,
                        vertex: vi,
                    });
                }
                *slot = vi as usize;
            }
            Ok(face)
        })
        .collect()
}
