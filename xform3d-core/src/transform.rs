/// Homogeneous 4x4 transformation matrices
///
/// All angles are in degrees at this boundary and converted to radians
/// internally. Matrices act on column vectors `(x, y, z, 1)`, so `M[i][j]`
/// is row `i`, column `j`.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::vector;
use crate::Float;

/// Matrix builder and helpers for 3D affine transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<Float> {
        Matrix4::identity()
    }

    /// Create a non-uniform scale matrix
    pub fn scaling(sx: Float, sy: Float, sz: Float) -> Matrix4<Float> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a translation matrix
    pub fn translation(tx: Float, ty: Float, tz: Float) -> Matrix4<Float> {
        Matrix4::new_translation(&Vector3::new(tx, ty, tz))
    }

    /// Right-handed rotation about the X axis
    pub fn rotation_x(degrees: Float) -> Matrix4<Float> {
        let (s, c) = degrees.to_radians().sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   -s,  0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// Right-handed rotation about the Y axis
    pub fn rotation_y(degrees: Float) -> Matrix4<Float> {
        let (s, c) = degrees.to_radians().sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
            -s,  0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// Right-handed rotation about the Z axis
    pub fn rotation_z(degrees: Float) -> Matrix4<Float> {
        let (s, c) = degrees.to_radians().sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
            c,   -s,  0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// Rotation about an arbitrary axis through the origin (Rodrigues' formula).
    ///
    /// The axis is normalized first. A zero axis normalizes to zero, which
    /// leaves `diag(cos, cos, cos, 1)`: a degenerate matrix, not a rotation.
    /// Callers that let users type the axis must live with that.
    pub fn rotation_around_axis(axis: &Vector3<Float>, degrees: Float) -> Matrix4<Float> {
        let u = vector::normalize(axis);
        let (s, c) = degrees.to_radians().sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (u.x, u.y, u.z);

        #[rustfmt::skip]
        let m = Matrix4::new(
            c + x * x * t,     x * y * t - z * s, x * z * t + y * s, 0.0,
            y * x * t + z * s, c + y * y * t,     y * z * t - x * s, 0.0,
            z * x * t - y * s, z * y * t + x * s, c + z * z * t,     0.0,
            0.0,               0.0,               0.0,               1.0,
        );
        m
    }

    /// Standard matrix product `a * b`
    pub fn multiply(a: &Matrix4<Float>, b: &Matrix4<Float>) -> Matrix4<Float> {
        a * b
    }

    /// Apply `m` to `p` treated as `(x, y, z, 1)`.
    ///
    /// Returns the first three components; no perspective divide is done,
    /// so only affine matrices give meaningful results.
    pub fn multiply_vector(m: &Matrix4<Float>, p: &Point3<Float>) -> Point3<Float> {
        let h = m * p.to_homogeneous();
        Point3::new(h.x, h.y, h.z)
    }

    /// Render a matrix as four lines of fixed-width numbers
    pub fn to_ordered_string(m: &Matrix4<Float>) -> String {
        let mut out = String::with_capacity(4 * 4 * 9 + 4);
        for i in 0..4 {
            for j in 0..4 {
                // `+ 0.0` folds negative zero so it prints as "0.000"
                out.push_str(&format!("{:>8.3} ", m[(i, j)] + 0.0));
            }
            out.push('\n');
        }
        out
    }
}
