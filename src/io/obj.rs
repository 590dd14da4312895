//! Wavefront OBJ format support.
//!
//! Loading goes through `tobj`; every object and group in the file is merged
//! into one mesh. Saving writes plain `v`/`f` records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{ManifoldError, Result};
use crate::mesh::TriangleMesh;

/// Load a mesh from an OBJ file.
///
/// Polygons are triangulated, texture and normal indices are ignored, and
/// missing material libraries are not an error. A file without faces loads
/// as an empty mesh.
///
/// # Example
///
/// ```no_run
/// use watertight::io::obj;
///
/// let mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path, &options).map_err(|e| ManifoldError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut mesh = TriangleMesh::default();
    for model in &models {
        let base = mesh.vertices.len();
        let positions = &model.mesh.positions;
        mesh.vertices.extend(
            positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
        );
        let count = positions.len() / 3;

        for tri in model.mesh.indices.chunks_exact(3) {
            let mut face = [0usize; 3];
            for (slot, &i) in face.iter_mut().zip(tri) {
                let i = i as usize;
                if i >= count {
                    return Err(ManifoldError::LoadError {
                        path: path.to_path_buf(),
                        message: format!("face index {} out of range in '{}'", i, model.name),
                    });
                }
                *slot = base + i;
            }
            mesh.faces.push(face);
        }
    }

    Ok(mesh)
}

/// Save a mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use watertight::io::obj;
/// use watertight::mesh::TriangleMesh;
///
/// let mesh = TriangleMesh::default();
/// obj::save(&mesh, "output.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Generated by watertight")?;
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    )?;

    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    // OBJ indices are 1-based
    for f in &mesh.faces {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }

    writer.flush()?;
    Ok(())
}
