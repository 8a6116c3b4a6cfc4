//! Ground-plane helpers.
//!
//! Road offsets are taken perpendicular to the up axis, so every helper here
//! projects onto the XZ plane and leaves elevation alone.

use crate::error::{GeometryError, Result};

use super::{up, Point3, Vector3, TOLERANCE};

/// Projects a vector onto the ground plane.
#[must_use]
pub fn flatten(v: &Vector3) -> Vector3 {
    Vector3::new(v.x, 0.0, v.z)
}

/// Computes the normalized ground-plane direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if the two points coincide when
/// viewed from above.
pub fn ground_direction(a: &Point3, b: &Point3) -> Result<Vector3> {
    let d = flatten(&(b - a));
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "zero-length segment between ({}, {}) and ({}, {}) in the ground plane",
            a.x, a.z, b.x, b.z
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the normal pointing left of `dir` when looking down the up axis.
#[must_use]
pub fn left_normal(dir: &Vector3) -> Vector3 {
    up().cross(dir)
}

/// Parametric ground-plane line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `t` if not parallel.
#[must_use]
pub fn line_line_intersect(p1: &Point3, d1: &Vector3, p2: &Point3, d2: &Vector3) -> Option<f64> {
    let cross = d1.x * d2.z - d1.z * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dz = p2.z - p1.z;
    Some((dx * d2.z - dz * d2.x) / cross)
}
