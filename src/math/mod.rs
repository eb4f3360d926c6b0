/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for object rotations.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Converts a point from glTF's Y-up frame into the Z-up modeling frame.
///
/// `(x, y, z) -> (x, -z, y)`
#[must_use]
pub fn y_up_to_z_up(p: [f64; 3]) -> [f64; 3] {
    [p[0], -p[2], p[1]]
}

/// Inverse of [`y_up_to_z_up`].
///
/// `(x, y, z) -> (x, z, -y)`
#[must_use]
pub fn z_up_to_y_up(p: [f64; 3]) -> [f64; 3] {
    [p[0], p[2], -p[1]]
}
