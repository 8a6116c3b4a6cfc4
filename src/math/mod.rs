pub mod ground;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// The scene's up axis. Offsets happen in the plane perpendicular to it.
#[must_use]
pub fn up() -> Vector3 {
    Vector3::y()
}
