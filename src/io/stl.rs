//! STL (stereolithography) format support.
//!
//! This module provides loading and saving of meshes in the STL format,
//! commonly used for 3D printing. Both binary and ASCII formats are supported.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{ManifoldError, Result};
use crate::mesh::TriangleMesh;

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Vertices shared between
/// facets are merged by exact position; degenerate facets are kept.
///
/// # Example
///
/// ```no_run
/// use watertight::io::stl;
///
/// let mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| ManifoldError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertices = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let faces = stl.faces.iter().map(|tri| tri.vertices).collect();

    Ok(TriangleMesh::new(vertices, faces))
}

/// Save a mesh to a binary STL file.
///
/// # Example
///
/// ```no_run
/// use watertight::io::stl;
/// use watertight::mesh::TriangleMesh;
///
/// let mesh = TriangleMesh::default();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let triangles: Vec<stl_io::Triangle> = (0..mesh.num_faces())
        .map(|f| {
            let [p0, p1, p2] = mesh.face_positions(f);
            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::zeros);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| ManifoldError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}
