//! Triangle/box overlap test used to bin faces into cells.

use nalgebra::{Point3, Vector3};

use super::bounds::Aabb;

/// Squared length below which a candidate separating axis is ignored.
const AXIS_EPSILON_SQ: f64 = 1e-24;

/// Test whether a triangle touches a box, boundary included.
///
/// Separating axis test over the 3 box axes, the triangle normal and the 9
/// edge/axis cross products. The box is inflated by `tolerance` on every
/// side so a triangle lying exactly on a face shared by two cells is
/// reported for both. Degenerate triangles (segments, points) fall back to
/// the axes that remain well defined.
pub fn triangle_overlaps_box(tri: &[Point3<f64>; 3], aabb: &Aabb, tolerance: f64) -> bool {
    let center = Point3::from((aabb.min.coords + aabb.max.coords) * 0.5);
    let half = (aabb.max - aabb.min) * 0.5 + Vector3::repeat(tolerance);

    // Work in box-local coordinates
    let v0 = tri[0] - center;
    let v1 = tri[1] - center;
    let v2 = tri[2] - center;

    // Box face normals
    for i in 0..3 {
        let lo = v0[i].min(v1[i]).min(v2[i]);
        let hi = v0[i].max(v1[i]).max(v2[i]);
        if lo > half[i] || hi < -half[i] {
            return false;
        }
    }

    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;

    // Triangle normal
    let normal = e0.cross(&e1);
    if normal.norm_squared() > AXIS_EPSILON_SQ && separates(&normal, &half, &v0, &v1, &v2) {
        return false;
    }

    // Edge x box axis
    for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
        for edge in [e0, e1, e2] {
            let cross = axis.cross(&edge);
            if cross.norm_squared() > AXIS_EPSILON_SQ && separates(&cross, &half, &v0, &v1, &v2) {
                return false;
            }
        }
    }

    true
}

/// Whether `axis` separates the triangle from a box centred at the origin.
fn separates(
    axis: &Vector3<f64>,
    half: &Vector3<f64>,
    v0: &Vector3<f64>,
    v1: &Vector3<f64>,
    v2: &Vector3<f64>,
) -> bool {
    let p0 = axis.dot(v0);
    let p1 = axis.dot(v1);
    let p2 = axis.dot(v2);

    let radius = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();

    p0.min(p1).min(p2) > radius || p0.max(p1).max(p2) < -radius
}

/// Whether a triangle touching `aabb` makes that box solid.
///
/// A triangle lying in one of the box's face planes belongs to the box behind
/// it only: its normal must point out of the box, and it must cover part of
/// that face with positive area. On the boundary of `root` there is no box
/// behind the plane, so the box inside takes the triangle whichever way it
/// faces. Triangles in no face plane, and degenerate ones, always count.
pub fn face_supports_box(
    tri: &[Point3<f64>; 3],
    aabb: &Aabb,
    root: &Aabb,
    tolerance: f64,
) -> bool {
    let normal = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    if normal.norm_squared() <= AXIS_EPSILON_SQ {
        return true;
    }

    for axis in 0..3 {
        for (plane, outward) in [(aabb.min[axis], -1.0), (aabb.max[axis], 1.0)] {
            if tri.iter().any(|p| (p[axis] - plane).abs() > tolerance) {
                continue;
            }
            let on_root = (plane - root.min[axis]).abs() <= tolerance
                || (plane - root.max[axis]).abs() <= tolerance;
            if !on_root && normal[axis] * outward < 0.0 {
                return false;
            }
            return triangle_covers_face(tri, aabb, axis, tolerance);
        }
    }

    true
}

/// Whether a triangle in a face plane of `aabb` (normal to `axis`) overlaps
/// that face beyond its edges.
fn triangle_covers_face(tri: &[Point3<f64>; 3], aabb: &Aabb, axis: usize, tolerance: f64) -> bool {
    let mut face = *aabb;
    for i in 0..3 {
        let grow = if i == axis { tolerance } else { -tolerance };
        face.min[i] -= grow;
        face.max[i] += grow;
    }
    triangle_overlaps_box(tri, &face, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_triangle_inside() {
        let tri = [
            Point3::new(0.2, 0.2, 0.5),
            Point3::new(0.8, 0.2, 0.5),
            Point3::new(0.5, 0.8, 0.5),
        ];
        assert!(triangle_overlaps_box(&tri, &unit_box(), 0.0));
    }

    #[test]
    fn test_triangle_crossing_without_vertices_inside() {
        // Large triangle slicing through the box
        let tri = [
            Point3::new(-5.0, -5.0, 0.5),
            Point3::new(5.0, -5.0, 0.5),
            Point3::new(0.0, 10.0, 0.5),
        ];
        assert!(triangle_overlaps_box(&tri, &unit_box(), 0.0));
    }

    #[test]
    fn test_triangle_near_corner_separated_by_normal() {
        // Plane x + y + z = 3.2 passes outside the corner (1, 1, 1)
        let tri = [
            Point3::new(3.2, 0.0, 0.0),
            Point3::new(0.0, 3.2, 0.0),
            Point3::new(0.0, 0.0, 3.2),
        ];
        assert!(!triangle_overlaps_box(&tri, &unit_box(), 0.0));
    }

    #[test]
    fn test_triangle_on_shared_face_touches_both_sides() {
        let tri = [
            Point3::new(1.0, 0.2, 0.2),
            Point3::new(1.0, 0.8, 0.2),
            Point3::new(1.0, 0.5, 0.8),
        ];
        let right = Aabb {
            min: Point3::new(1.0, 0.0, 0.0),
            max: Point3::new(2.0, 1.0, 1.0),
        };
        assert!(triangle_overlaps_box(&tri, &unit_box(), 1e-9));
        assert!(triangle_overlaps_box(&tri, &right, 1e-9));
    }

    #[test]
    fn test_degenerate_triangle() {
        let point = [Point3::new(0.5, 0.5, 0.5); 3];
        assert!(triangle_overlaps_box(&point, &unit_box(), 0.0));

        let far = [Point3::new(2.5, 0.5, 0.5); 3];
        assert!(!triangle_overlaps_box(&far, &unit_box(), 0.0));

        // Segment passing diagonally outside the box corner
        let segment = [
            Point3::new(2.4, 0.0, 0.5),
            Point3::new(0.0, 2.4, 0.5),
            Point3::new(2.4, 0.0, 0.5),
        ];
        assert!(!triangle_overlaps_box(&segment, &unit_box(), 0.0));
    }

    #[test]
    fn test_face_on_shared_plane_supports_box_behind_it() {
        let root = Aabb {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(2.0, 1.0, 1.0),
        };
        let right = Aabb {
            min: Point3::new(1.0, 0.0, 0.0),
            max: Point3::new(2.0, 1.0, 1.0),
        };
        // Normal +x: out of the unit box, into the right one
        let tri = [
            Point3::new(1.0, 0.2, 0.2),
            Point3::new(1.0, 0.8, 0.2),
            Point3::new(1.0, 0.5, 0.8),
        ];
        assert!(face_supports_box(&tri, &unit_box(), &root, 1e-9));
        assert!(!face_supports_box(&tri, &right, &root, 1e-9));

        let flipped = [tri[0], tri[2], tri[1]];
        assert!(!face_supports_box(&flipped, &unit_box(), &root, 1e-9));
        assert!(face_supports_box(&flipped, &right, &root, 1e-9));
    }

    #[test]
    fn test_face_touching_only_an_edge_does_not_support() {
        let root = Aabb {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(2.0, 2.0, 2.0),
        };
        // In the plane x = 1, spanning y in [0, 1]; the box above shares the edge y = 1
        let tri = [
            Point3::new(1.0, 0.0, 0.2),
            Point3::new(1.0, 1.0, 0.2),
            Point3::new(1.0, 0.5, 0.8),
        ];
        let above = Aabb {
            min: Point3::new(0.0, 1.0, 0.0),
            max: Point3::new(1.0, 2.0, 1.0),
        };
        assert!(triangle_overlaps_box(&tri, &above, 1e-9));
        assert!(!face_supports_box(&tri, &above, &root, 1e-9));
        assert!(face_supports_box(&tri, &unit_box(), &root, 1e-9));
    }

    #[test]
    fn test_face_on_root_boundary_supports_inner_box() {
        let root = unit_box();
        // Plane z = 0 with normal +z, pointing into the root
        let tri = [
            Point3::new(0.2, 0.2, 0.0),
            Point3::new(0.8, 0.2, 0.0),
            Point3::new(0.5, 0.8, 0.0),
        ];
        assert!(face_supports_box(&tri, &unit_box(), &root, 1e-9));
    }

    #[test]
    fn test_slanted_and_degenerate_faces_always_support() {
        let root = unit_box();
        let slanted = [
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(1.0, 0.0, 0.6),
            Point3::new(0.0, 1.0, 0.7),
        ];
        assert!(face_supports_box(&slanted, &unit_box(), &root, 1e-9));
        let point = [Point3::new(1.0, 0.5, 0.5); 3];
        assert!(face_supports_box(&point, &unit_box(), &root, 1e-9));
    }
}
