//! Watertight manifold reconstruction.
//!
//! Converts an arbitrary triangle soup (self-intersecting, non-manifold, with
//! holes or duplicated faces) into a closed, consistently oriented
//! 2-manifold that follows the input to within one grid cell.
//!
//! # Pipeline
//!
//! 1. [`bounds`]: the bounding box becomes the root cube of a [`GridFrame`].
//! 2. [`octree`]: faces are binned into every leaf they touch, empty space
//!    is split into exterior and enclosed interior.
//! 3. [`regularize`]: the solid leaf set (occupied plus interior) is made
//!    well-composed by filling a few exterior cells.
//! 4. [`resolve`]: every solid leaf emits the faces it shares with non-solid
//!    cells; corners are unified through their [`GridIndex`].
//! 5. Unreferenced vertices are dropped.
//!
//! # Example
//!
//! ```
//! use watertight::algo::manifold::{Manifold, ManifoldOptions};
//! use watertight::mesh::TriangleMesh;
//! use nalgebra::Point3;
//!
//! let mesh = TriangleMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!         Point3::new(0.0, 0.0, 1.0),
//!     ],
//!     vec![[0, 2, 1], [0, 1, 3]], // two faces of a tetrahedron, open
//! );
//!
//! let output = Manifold::new(ManifoldOptions::default().with_depth(3))
//!     .process(&mesh)
//!     .unwrap();
//! assert!(output.mesh.topology().is_watertight());
//! assert!(output.report.is_complete());
//! ```

pub mod bounds;
pub mod grid;
pub mod octree;
pub mod overlap;
pub mod regularize;
pub mod resolve;

#[cfg(test)]
pub(crate) mod fixtures;

use std::fmt;

use nalgebra::Point3;
use rayon::prelude::*;

pub use bounds::Aabb;
pub use grid::{CellCoord, GridFrame, GridIndex, LatticePoint, MAX_DEPTH};
pub use octree::{CellKind, Octree};
pub use regularize::SolidMap;
pub use resolve::{CellFailure, CellPatch, Surface};

use super::Progress;
use crate::error::{ManifoldError, Result};
use crate::mesh::{checked_faces, TriangleMesh};

/// Default subdivision depth.
pub const DEFAULT_DEPTH: u32 = 8;

/// Default budget on octree plus filled cells.
pub const DEFAULT_MAX_CELLS: usize = 1 << 26;

/// Options for [`Manifold`].
#[derive(Debug, Clone)]
pub struct ManifoldOptions {
    /// Subdivision depth; leaf cells have edge `side / 2^depth`.
    pub depth: u32,

    /// Emit progress text through `log::info!`.
    pub verbose: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,

    /// Fill exterior cells so that no cell is left unresolvable
    /// (default: true). When disabled, offending cells are skipped.
    pub regularize: bool,

    /// Upper bound on octree and filled cells.
    pub max_cells: usize,
}

impl Default for ManifoldOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            verbose: false,
            parallel: true,
            regularize: true,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl ManifoldOptions {
    /// Set the subdivision depth.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set whether progress is logged.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set whether the solid set is regularized.
    pub fn with_regularize(mut self, regularize: bool) -> Self {
        self.regularize = regularize;
        self
    }

    /// Set the cell budget.
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }
}

/// A leaf cell that could not be resolved and left a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedCell {
    /// The cell.
    pub cell: CellCoord,
    /// Why it was skipped.
    pub reason: CellFailure,
}

/// Statistics and diagnostics of one reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Subdivision depth used.
    pub depth: u32,
    /// Cells in the octree, branches included.
    pub octree_cells: usize,
    /// Leaves touching input faces.
    pub occupied_cells: usize,
    /// Empty cells enclosed by the input.
    pub interior_cells: usize,
    /// Exterior leaves filled by regularization.
    pub filled_cells: usize,
    /// Cells whose patch made it into the output.
    pub resolved_cells: usize,
    /// Cells skipped because their topology could not be resolved.
    pub skipped_cells: Vec<SkippedCell>,
    /// Output vertices whose triangles do not form a single fan.
    pub pinched_vertices: usize,
    /// Whether the output has no boundary edges.
    pub is_closed: bool,
}

impl ProcessReport {
    /// No cell was skipped and every vertex has a single fan.
    pub fn is_complete(&self) -> bool {
        self.skipped_cells.is_empty() && self.pinched_vertices == 0
    }
}

impl fmt::Display for ProcessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reconstruction (depth {}):", self.depth)?;
        writeln!(f, "  Octree cells: {}", self.octree_cells)?;
        writeln!(f, "  Occupied leaves: {}", self.occupied_cells)?;
        writeln!(f, "  Interior cells: {}", self.interior_cells)?;
        writeln!(f, "  Filled leaves: {}", self.filled_cells)?;
        writeln!(f, "  Resolved leaves: {}", self.resolved_cells)?;
        writeln!(f, "  Closed: {}", if self.is_closed { "Yes" } else { "No" })?;
        if !self.skipped_cells.is_empty() {
            writeln!(f, "  Skipped leaves: {}", self.skipped_cells.len())?;
        }
        if self.pinched_vertices > 0 {
            writeln!(f, "  Pinched vertices: {}", self.pinched_vertices)?;
        }
        Ok(())
    }
}

/// Result of [`Manifold::process`].
#[derive(Debug, Clone)]
pub struct ManifoldOutput {
    /// The reconstructed mesh.
    pub mesh: TriangleMesh,
    /// What happened on the way.
    pub report: ProcessReport,
}

/// Stitches per-cell patches into one surface.
///
/// Owns the vertex-color map and vertex-face adjacency (inside its
/// [`Surface`]) for the duration of one reconstruction.
#[derive(Debug)]
pub struct ManifoldBuilder {
    surface: Surface,
    resolved: usize,
    skipped: Vec<SkippedCell>,
}

impl ManifoldBuilder {
    /// Builder on the lattice of `frame`.
    pub fn new(frame: GridFrame) -> Self {
        Self {
            surface: Surface::new(frame),
            resolved: 0,
            skipped: Vec::new(),
        }
    }

    /// Resolve every boundary cell of `map` in lexicographic order.
    ///
    /// With `parallel`, patches are computed on the rayon pool and inserted
    /// afterwards in the same order, so the output does not depend on the
    /// number of threads.
    pub fn construct(
        &mut self,
        map: &SolidMap<'_>,
        parallel: bool,
        verbose: bool,
        progress: Option<&Progress>,
    ) {
        let cells = map.boundary_cells();
        let total = cells.len();

        if parallel {
            let patches: Vec<(CellCoord, std::result::Result<CellPatch, CellFailure>)> = cells
                .par_iter()
                .map(|&cell| (cell, resolve::resolve_cell(map, cell)))
                .collect();
            for (i, (cell, patch)) in patches.into_iter().enumerate() {
                match patch {
                    Ok(patch) => {
                        self.surface.insert_patch(&patch);
                        self.resolved += 1;
                    }
                    Err(reason) => self.skip(cell, reason, verbose),
                }
                report_cells(progress, i, total);
            }
        } else {
            for (i, &cell) in cells.iter().enumerate() {
                match self.surface.split_grid(map, cell) {
                    Ok(()) => self.resolved += 1,
                    Err(reason) => self.skip(cell, reason, verbose),
                }
                report_cells(progress, i, total);
            }
        }
    }

    fn skip(&mut self, cell: CellCoord, reason: CellFailure, verbose: bool) {
        if verbose {
            log::warn!(
                "Skipping cell ({}, {}, {}): {}",
                cell.x,
                cell.y,
                cell.z,
                reason
            );
        }
        self.skipped.push(SkippedCell { cell, reason });
    }

    /// The surface built so far.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Verify vertex fans, compact and hand out the mesh.
    pub fn finish(self, mut report: ProcessReport) -> ManifoldOutput {
        report.pinched_vertices = self.surface.pinched_vertices().len();
        report.resolved_cells = self.resolved;
        report.skipped_cells = self.skipped;
        let mesh = self.surface.into_mesh();
        report.is_closed = mesh.topology().is_closed();
        ManifoldOutput { mesh, report }
    }
}

const STAGES: usize = 4;

fn report_cells(progress: Option<&Progress>, done: usize, total: usize) {
    if let Some(p) = progress {
        if done % 1024 == 0 || done + 1 == total {
            p.report_stage(2, STAGES, done + 1, total, "Resolving cells");
        }
    }
}

/// Watertight manifold reconstruction with fixed options.
///
/// # Example
///
/// ```
/// use watertight::algo::manifold::{Manifold, ManifoldOptions};
/// use watertight::mesh::TriangleMesh;
/// use nalgebra::Point3;
///
/// let tet = TriangleMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///         Point3::new(0.0, 0.0, 1.0),
///     ],
///     vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
/// );
///
/// // At depth 0 the whole bounding cube is one cell
/// let output = Manifold::new(ManifoldOptions::default().with_depth(0))
///     .process(&tet)
///     .unwrap();
/// assert_eq!(output.mesh.num_vertices(), 8);
/// assert_eq!(output.mesh.num_faces(), 12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Manifold {
    options: ManifoldOptions,
}

impl Manifold {
    /// Create a reconstruction with the given options.
    pub fn new(options: ManifoldOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &ManifoldOptions {
        &self.options
    }

    /// Reconstruct a watertight manifold from `mesh`.
    ///
    /// Fails on invalid input (no vertices, non-finite coordinates, face
    /// indices out of range) and when the cell budget or
    /// [`MAX_DEPTH`] is exceeded. A cell whose local topology cannot be
    /// resolved does not fail the call; it is listed in
    /// [`ProcessReport::skipped_cells`].
    pub fn process(&self, mesh: &TriangleMesh) -> Result<ManifoldOutput> {
        self.run(mesh, None)
    }

    /// Reconstruct with progress reporting.
    pub fn process_with_progress(
        &self,
        mesh: &TriangleMesh,
        progress: &Progress,
    ) -> Result<ManifoldOutput> {
        self.run(mesh, Some(progress))
    }

    fn run(&self, mesh: &TriangleMesh, progress: Option<&Progress>) -> Result<ManifoldOutput> {
        let options = &self.options;
        mesh.validate()?;

        let bounds = Aabb::from_points(&mesh.vertices)?;
        let frame = GridFrame::from_bounds(&bounds, options.depth)?;

        let mut report = ProcessReport {
            depth: options.depth,
            is_closed: true,
            ..Default::default()
        };
        if mesh.faces.is_empty() {
            return Ok(ManifoldOutput {
                mesh: TriangleMesh::default(),
                report,
            });
        }

        if options.verbose {
            log::info!(
                "Building octree: {} faces, depth {}, cell size {:.6}",
                mesh.num_faces(),
                options.depth,
                frame.cell_size()
            );
        }
        if let Some(p) = progress {
            p.report(0, STAGES, "Building octree");
        }
        let tree = Octree::build(frame, mesh, options.max_cells, options.parallel)?;
        report.octree_cells = tree.cells().len();
        report.occupied_cells = tree.count(CellKind::Occupied);
        report.interior_cells = tree.count(CellKind::Interior);
        log::debug!(
            "Octree: {} cells, {} occupied, {} interior",
            report.octree_cells,
            report.occupied_cells,
            report.interior_cells
        );

        if let Some(p) = progress {
            p.report(1, STAGES, "Regularizing");
        }
        let mut map = SolidMap::new(&tree);
        if options.regularize {
            let budget = options.max_cells.saturating_sub(tree.cells().len());
            report.filled_cells = map.regularize(budget)?;
        }
        if options.verbose {
            log::info!(
                "Solid set: {} occupied, {} interior, {} filled",
                report.occupied_cells,
                report.interior_cells,
                report.filled_cells
            );
        }

        if let Some(p) = progress {
            p.report(2, STAGES, "Resolving cells");
        }
        let mut builder = ManifoldBuilder::new(frame);
        builder.construct(&map, options.parallel, options.verbose, progress);
        let output = builder.finish(report);

        if options.verbose {
            log::info!(
                "Output: {} vertices, {} faces, {} skipped cells",
                output.mesh.num_vertices(),
                output.mesh.num_faces(),
                output.report.skipped_cells.len()
            );
        }
        if let Some(p) = progress {
            p.report(STAGES, STAGES, "Done");
        }
        Ok(output)
    }
}

/// Array-shaped entry point.
///
/// `vertices` are point rows, `faces` index rows into them. `depth` must be
/// non-negative; any nonzero `verbose` logs progress. Returns the new point
/// and face rows.
///
/// # Example
///
/// ```
/// use watertight::algo::manifold::process_manifold;
///
/// let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let faces = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];
/// let (points, triangles) = process_manifold(&vertices, &faces, 2, 0).unwrap();
/// assert!(!points.is_empty());
/// assert!(triangles.iter().flatten().all(|&i| (i as usize) < points.len()));
///
/// assert!(process_manifold(&vertices, &faces, -1, 0).is_err());
/// ```
pub fn process_manifold(
    vertices: &[[f64; 3]],
    faces: &[[i64; 3]],
    depth: i64,
    verbose: i32,
) -> Result<(Vec<[f64; 3]>, Vec<[i64; 3]>)> {
    let options = array_options(depth, verbose)?;
    if vertices.is_empty() {
        return Err(ManifoldError::EmptyVertices);
    }
    let faces = checked_faces(faces, vertices.len())?;
    let mesh = TriangleMesh::new(vertices.iter().map(|&p| Point3::from(p)).collect(), faces);

    let output = Manifold::new(options).process(&mesh)?;

    let points = output.mesh.vertices.iter().map(|p| [p.x, p.y, p.z]).collect();
    let triangles = output
        .mesh
        .faces
        .iter()
        .map(|f| f.map(|i| i as i64))
        .collect();
    Ok((points, triangles))
}

/// Options for the array entry point.
fn array_options(depth: i64, verbose: i32) -> Result<ManifoldOptions> {
    if depth < 0 {
        return Err(ManifoldError::invalid_param("depth", depth, "must be non-negative"));
    }
    Ok(ManifoldOptions::default()
        .with_depth(u32::try_from(depth).unwrap_or(u32::MAX))
        .with_verbose(verbose != 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::fixtures::{box_mesh, cells_mesh};

    fn tetrahedron() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, 0.5, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
    }

    fn run(mesh: &TriangleMesh, options: ManifoldOptions) -> ManifoldOutput {
        Manifold::new(options).process(mesh).unwrap()
    }

    #[test]
    fn test_depth_zero_gives_bounding_cube() {
        let out = run(&tetrahedron(), ManifoldOptions::default().with_depth(0));
        assert_eq!(out.mesh.num_vertices(), 8);
        assert_eq!(out.mesh.num_faces(), 12);
        assert!(out.mesh.topology().is_watertight());
        assert_eq!(out.report.occupied_cells, 1);
        assert!(out.report.is_complete());
        // Cube over the bounding box, side = largest extent
        let (min, max) = out.mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_unit_cube_depth_two() {
        let cube = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let out = run(&cube, ManifoldOptions::default().with_depth(2));
        // 4x4x4 solid block: 16 quads per side
        assert_eq!(out.mesh.num_faces(), 6 * 16 * 2);
        assert_eq!(out.mesh.num_vertices(), 98);
        assert_eq!(out.report.interior_cells, 8);
        assert_eq!(out.report.filled_cells, 0);
        let topology = out.mesh.topology();
        assert!(topology.is_watertight());
        assert_eq!(topology.genus(), Some(0));
    }

    #[test]
    fn test_two_disjoint_cubes() {
        let mut mesh = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let other = box_mesh(Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 1.0, 1.0));
        let offset = mesh.vertices.len();
        mesh.vertices.extend(other.vertices);
        mesh.faces
            .extend(other.faces.iter().map(|f| f.map(|i| i + offset)));

        let out = run(&mesh, ManifoldOptions::default().with_depth(3));
        let topology = out.mesh.topology();
        assert!(topology.is_watertight());
        assert_eq!(topology.components, 2);
        assert_eq!(topology.genus(), Some(0));
        assert!(out.report.is_complete());
        assert!(out.report.is_closed);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mesh = tetrahedron();
        let a = run(&mesh, ManifoldOptions::default().with_depth(4));
        let b = run(&mesh, ManifoldOptions::default().with_depth(4).sequential());
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_cubes_touching_along_an_edge() {
        let mut mesh = box_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let other = box_mesh(Point3::new(1.0, 1.0, 0.0), Point3::new(2.0, 2.0, 1.0));
        let offset = mesh.vertices.len();
        mesh.vertices.extend(other.vertices);
        mesh.faces
            .extend(other.faces.iter().map(|f| f.map(|i| i + offset)));

        let out = run(&mesh, ManifoldOptions::default().with_depth(2));
        assert!(out.report.is_complete());
        let topology = out.mesh.topology();
        assert!(topology.is_watertight());
        assert_eq!(topology.components, 1);
    }

    #[test]
    fn test_no_regularization_skips_pinched_cells() {
        // Sliver triangles in two leaves that share only an edge
        let mesh = cells_mesh(&[[1, 1, 1], [2, 2, 1]], 3);
        let mut padded = mesh.clone();
        // Pin the bounding box to the unit cube
        padded.vertices.push(Point3::new(0.0, 0.0, 0.0));
        padded.vertices.push(Point3::new(1.0, 1.0, 1.0));

        let out = run(&padded, ManifoldOptions::default().with_depth(3).with_regularize(false));
        assert_eq!(out.report.skipped_cells.len(), 2);
        assert!(!out.report.is_complete());
        assert!(matches!(
            out.report.skipped_cells[0].reason,
            CellFailure::NonManifoldCorner { .. }
        ));
        assert_eq!(out.mesh.num_faces(), 0);

        let out = run(&padded, ManifoldOptions::default().with_depth(3));
        assert!(out.report.is_complete());
        assert!(out.report.filled_cells > 0);
        assert!(out.mesh.topology().is_watertight());
    }

    #[test]
    fn test_empty_faces() {
        let mesh = TriangleMesh::new(vec![Point3::origin()], Vec::new());
        let out = run(&mesh, ManifoldOptions::default());
        assert!(out.mesh.is_empty());
        assert_eq!(out.mesh.num_vertices(), 0);
    }

    #[test]
    fn test_degenerate_faces_accepted() {
        let mut mesh = tetrahedron();
        mesh.faces.push([0, 0, 1]);
        mesh.faces.push([3, 3, 3]);
        let out = run(&mesh, ManifoldOptions::default().with_depth(3));
        assert!(out.mesh.topology().is_watertight());
    }

    #[test]
    fn test_invalid_input() {
        let err = Manifold::default()
            .process(&TriangleMesh::default())
            .unwrap_err();
        assert!(matches!(err, ManifoldError::EmptyVertices));

        let mut mesh = tetrahedron();
        mesh.faces.push([0, 1, 9]);
        let err = Manifold::default().process(&mesh).unwrap_err();
        assert!(matches!(err, ManifoldError::InvalidVertexIndex { face: 4, vertex: 9 }));

        let mut mesh = tetrahedron();
        mesh.vertices[2].y = f64::NAN;
        let err = Manifold::default().process(&mesh).unwrap_err();
        assert!(matches!(err, ManifoldError::NonFiniteVertex { vertex: 2 }));
    }

    #[test]
    fn test_depth_limit() {
        let err = Manifold::new(ManifoldOptions::default().with_depth(MAX_DEPTH + 1))
            .process(&tetrahedron())
            .unwrap_err();
        assert!(matches!(err, ManifoldError::ResourceExhausted { .. }));
    }

    #[test]
    fn test_cell_budget() {
        let err = Manifold::new(ManifoldOptions::default().with_depth(6).with_max_cells(100))
            .process(&tetrahedron())
            .unwrap_err();
        assert!(matches!(err, ManifoldError::ResourceExhausted { limit: 100, .. }));
    }

    #[test]
    fn test_process_manifold_rows() {
        let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let (points, faces) = process_manifold(&vertices, &[[0, 1, 2]], 0, 0).unwrap();
        assert_eq!(points.len(), 8);
        assert_eq!(faces.len(), 12);

        let err = process_manifold(&vertices, &[[0, 1, -1]], 2, 0).unwrap_err();
        assert!(matches!(err, ManifoldError::InvalidVertexIndex { face: 0, vertex: -1 }));

        let err = process_manifold(&vertices, &[[0, 1, 2]], -3, 0).unwrap_err();
        assert!(err.is_invalid_input());

        let err = process_manifold(&[], &[], 2, 0).unwrap_err();
        assert!(matches!(err, ManifoldError::EmptyVertices));
    }

    #[test]
    fn test_array_options() {
        assert!(!array_options(3, 0).unwrap().verbose);
        assert!(array_options(3, 1).unwrap().verbose);
        assert!(array_options(3, -1).unwrap().verbose);
        assert_eq!(array_options(3, -1).unwrap().depth, 3);
        assert!(array_options(-1, 0).is_err());

        let vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let quiet = process_manifold(&vertices, &[[0, 1, 2]], 2, 0).unwrap();
        let loud = process_manifold(&vertices, &[[0, 1, 2]], 2, -1).unwrap();
        assert_eq!(quiet, loud);
    }

    #[test]
    fn test_progress_reaches_end() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let progress = Progress::new(move |current, total, _| {
            assert!(current <= total);
            seen.fetch_add(1, Ordering::Relaxed);
        });
        Manifold::new(ManifoldOptions::default().with_depth(2))
            .process_with_progress(&tetrahedron(), &progress)
            .unwrap();
        assert!(calls.load(Ordering::Relaxed) >= 4);
    }
}
