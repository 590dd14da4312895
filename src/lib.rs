//! # Watertight
//!
//! Repair arbitrary triangle soups into closed, watertight 2-manifold meshes.
//!
//! Input meshes may be self-intersecting, non-manifold, open or full of
//! duplicated and degenerate faces. The output is always a closed,
//! consistently oriented manifold whose vertices lie on a regular lattice
//! over the input's bounding cube, within one cell of the input surface.
//!
//! ## Features
//!
//! - **Octree reconstruction**: faces binned into an arena octree, enclosed
//!   cavities detected by flood fill, per-cell patches stitched through
//!   lattice keys
//! - **Topology reports**: boundary and non-manifold edges, pinched vertices,
//!   orientation, components and genus
//! - **Multiple file formats**: OBJ, STL, PLY
//! - **Parallel**: per-cell resolution runs on rayon, with output identical to
//!   the sequential path
//!
//! ## Quick Start
//!
//! ```no_run
//! use watertight::prelude::*;
//!
//! let mesh = watertight::io::load("broken.obj").unwrap();
//! println!("{}", mesh.topology());
//!
//! let output = Manifold::new(ManifoldOptions::default().with_depth(7))
//!     .process(&mesh)
//!     .unwrap();
//! println!("{}", output.report);
//!
//! watertight::io::save(&output.mesh, "fixed.stl").unwrap();
//! ```
//!
//! ## Array Interface
//!
//! ```
//! use watertight::process_manifold;
//!
//! // A single triangle: the result at depth 1 encloses it
//! let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]];
//! let faces = [[0, 1, 2]];
//!
//! let (points, triangles) = process_manifold(&vertices, &faces, 1, 0).unwrap();
//! assert!(!points.is_empty());
//! assert_eq!(triangles.len() % 2, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

pub use algo::manifold::process_manifold;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use watertight::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::manifold::{
        process_manifold, Manifold, ManifoldOptions, ManifoldOutput, ProcessReport,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{ManifoldError, Result};
    pub use crate::mesh::{TopologyReport, TriangleMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
