//! Stage and cell progress for reconstruction.
//!
//! A reconstruction runs a fixed number of stages. Coarse stages report once
//! when they start; cell resolution also reports how many cells are done
//! within its stage.
//!
//! # Example
//!
//! ```
//! use watertight::algo::manifold::{Manifold, ManifoldOptions};
//! use watertight::algo::progress::Progress;
//! use watertight::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! let mesh = TriangleMesh::new(
//!     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
//!     vec![[0, 1, 2]],
//! );
//! Manifold::new(ManifoldOptions::default().with_depth(2))
//!     .process_with_progress(&mesh, &progress)
//!     .unwrap();
//! ```

/// Units per stage when reporting work inside a stage.
const STAGE_UNITS: usize = 1000;

type Callback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Receives `(current, total, message)` updates from a running
/// reconstruction. `current` never exceeds `total`.
pub struct Progress {
    sink: Callback,
}

impl Progress {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            sink: Box::new(callback),
        }
    }

    /// Forward an update unchanged.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.sink)(current, total, message);
    }

    /// Report `done` of `total` items inside stage `stage` of `stages`.
    ///
    /// Each stage spans 1000 units, so the callback sees
    /// `stage * 1000 + done * 1000 / total` out of `stages * 1000`. Nothing is
    /// reported when either count is zero.
    ///
    /// ```
    /// # use watertight::algo::Progress;
    /// # let progress = Progress::none();
    /// // Third of four stages, 10 of 40 cells resolved
    /// progress.report_stage(2, 4, 10, 40, "Resolving cells");
    /// ```
    #[inline]
    pub fn report_stage(&self, stage: usize, stages: usize, done: usize, total: usize, message: &str) {
        if total == 0 || stages == 0 {
            return;
        }
        let within = done.min(total) * STAGE_UNITS / total;
        (self.sink)(stage * STAGE_UNITS + within, stages * STAGE_UNITS, message);
    }

    /// A reporter that drops every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
