/// 3-component vector helpers
use nalgebra::Vector3;

use crate::Float;

pub fn add(a: &Vector3<Float>, b: &Vector3<Float>) -> Vector3<Float> {
    a + b
}

pub fn subtract(a: &Vector3<Float>, b: &Vector3<Float>) -> Vector3<Float> {
    a - b
}

/// Multiply every component by `factor`
pub fn scale(v: &Vector3<Float>, factor: Float) -> Vector3<Float> {
    v * factor
}

pub fn dot(a: &Vector3<Float>, b: &Vector3<Float>) -> Float {
    a.dot(b)
}

pub fn cross(a: &Vector3<Float>, b: &Vector3<Float>) -> Vector3<Float> {
    a.cross(b)
}

pub fn length(v: &Vector3<Float>) -> Float {
    v.norm()
}

/// Unit vector in the direction of `v`.
///
/// The zero vector normalizes to itself rather than to NaNs, so a zero
/// custom axis stays degenerate instead of poisoning every later result.
pub fn normalize(v: &Vector3<Float>) -> Vector3<Float> {
    let len = length(v);
    if len == 0.0 {
        return Vector3::zeros();
    }
    v / len
}
