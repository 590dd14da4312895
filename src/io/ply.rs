//! PLY (Stanford polygon) format support.
//!
//! This module provides loading and saving of meshes in the PLY format,
//! also known as the Polygon File Format or Stanford Triangle Format.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{ManifoldError, Result};
use crate::mesh::{checked_faces, TriangleMesh};

fn load_error(path: &Path, message: &str) -> ManifoldError {
    ManifoldError::LoadError {
        path: PathBuf::from(path),
        message: message.to_string(),
    }
}

/// Load a mesh from a PLY file.
///
/// Polygons are fan-triangulated. Face indices out of range are rejected.
/// Files without faces (point sets, empty meshes) load with no faces.
///
/// # Example
///
/// ```no_run
/// use watertight::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut reader).map_err(|e| ManifoldError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let vertex_element: &[DefaultElement] =
        ply.payload.get("vertex").map(Vec::as_slice).unwrap_or_default();

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let coord = |name: &str| {
            get_float_property(vertex, name)
                .ok_or_else(|| load_error(path, &format!("vertex missing {} coordinate", name)))
        };
        vertices.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));
    }

    let face_element: &[DefaultElement] =
        ply.payload.get("face").map(Vec::as_slice).unwrap_or_default();

    let mut rows: Vec<[i64; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error(path, "face missing vertex_indices property"))?;

        // Fan triangulation; faces with fewer than three corners are dropped
        for i in 1..indices.len().saturating_sub(1) {
            rows.push([indices[0], indices[i], indices[i + 1]]);
        }
    }

    let faces = checked_faces(&rows, vertices.len())?;
    Ok(TriangleMesh::new(vertices, faces))
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<i64>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as i64).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as i64).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
///
/// # Example
///
/// ```no_run
/// use watertight::io::ply;
/// use watertight::mesh::TriangleMesh;
///
/// let mesh = TriangleMesh::default();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by watertight")?;
    writeln!(writer, "element vertex {}", mesh.num_vertices())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", mesh.num_faces())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &mesh.vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    for f in &mesh.faces {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }

    writer.flush()?;
    Ok(())
}
