//! Repair algorithms.
//!
//! - **Manifold reconstruction**: octree binning, cavity detection,
//!   well-composed regularization and per-cell stitching
//!   ([`manifold`])
//! - **Progress**: callbacks for long-running stages ([`progress`])

pub mod manifold;
pub mod progress;

pub use progress::Progress;
