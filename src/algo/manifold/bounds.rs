//! Bounding box of the input points.

use nalgebra::{Point3, Vector3};

use crate::error::{ManifoldError, Result};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Component-wise minimum.
    pub min: Point3<f64>,
    /// Component-wise maximum.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Compute the minimal box enclosing all points.
    ///
    /// Fails with [`ManifoldError::EmptyVertices`] when there are no points.
    pub fn from_points(points: &[Point3<f64>]) -> Result<Self> {
        let first = points.first().ok_or(ManifoldError::EmptyVertices)?;
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Ok(Self { min, max })
    }

    /// Edge lengths of the box.
    #[inline]
    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// The root cube of the spatial index: same minimum corner, side equal to
    /// the largest extent. A box collapsed to a point gets side 1.
    pub fn cube(&self) -> (Point3<f64>, f64) {
        let side = self.extent().max();
        if side > 0.0 {
            (self.min, side)
        } else {
            (self.min, 1.0)
        }
    }
}
