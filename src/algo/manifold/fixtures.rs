//! Shared test meshes.

use nalgebra::{Point3, Vector3};

use super::grid::GridFrame;
use super::octree::Octree;
use crate::mesh::TriangleMesh;

/// A sliver triangle strictly inside each listed leaf of a unit root cube.
pub fn cells_mesh(cells: &[[u32; 3]], depth: u32) -> TriangleMesh {
    let h = 1.0 / (1u32 << depth) as f64;
    let mut mesh = TriangleMesh::default();
    for &[x, y, z] in cells {
        let c = Point3::new(
            (x as f64 + 0.5) * h,
            (y as f64 + 0.5) * h,
            (z as f64 + 0.5) * h,
        );
        let base = mesh.vertices.len();
        mesh.vertices.push(c);
        mesh.vertices.push(c + Vector3::new(0.1 * h, 0.0, 0.0));
        mesh.vertices.push(c + Vector3::new(0.0, 0.1 * h, 0.0));
        mesh.faces.push([base, base + 1, base + 2]);
    }
    mesh
}

/// Octree over [`cells_mesh`] in the unit root cube.
pub fn tree_for(cells: &[[u32; 3]], depth: u32) -> Octree {
    let frame = GridFrame::new(Point3::origin(), 1.0, depth).unwrap();
    Octree::build(frame, &cells_mesh(cells, depth), usize::MAX, false).unwrap()
}

/// Axis-aligned box as 12 outward-facing triangles.
pub fn box_mesh(min: Point3<f64>, max: Point3<f64>) -> TriangleMesh {
    let vertices = vec![
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [2, 3, 7],
        [2, 7, 6],
        [1, 2, 6],
        [1, 6, 5],
        [0, 4, 7],
        [0, 7, 3],
    ];
    TriangleMesh::new(vertices, faces)
}
