//! Point arithmetic over 3D landmarks.
//!
//! Points are `nalgebra` vectors; these free functions name the operations the
//! embedding and classifier need, including the 2D norm that deliberately
//! ignores depth (z is the least reliable axis from monocular pose models).

use nalgebra::Vector3;

/// A 3D point or difference vector.
pub type Point3D = Vector3<f32>;

/// Construct a point from coordinates.
#[inline]
#[must_use]
pub fn point(x: f32, y: f32, z: f32) -> Point3D {
    Vector3::new(x, y, z)
}

/// Componentwise sum `a + b`.
#[inline]
#[must_use]
pub fn add(a: &Point3D, b: &Point3D) -> Point3D {
    a + b
}

/// Componentwise difference `a - b`.
#[inline]
#[must_use]
pub fn subtract(a: &Point3D, b: &Point3D) -> Point3D {
    a - b
}

/// Uniform scaling by a scalar.
#[inline]
#[must_use]
pub fn scale(a: &Point3D, factor: f32) -> Point3D {
    a * factor
}

/// Per-axis scaling, `(a.x * w.x, a.y * w.y, a.z * w.z)`.
#[inline]
#[must_use]
pub fn scale_per_axis(a: &Point3D, weights: &Point3D) -> Point3D {
    a.component_mul(weights)
}

/// Midpoint of two points.
#[inline]
#[must_use]
pub fn average(a: &Point3D, b: &Point3D) -> Point3D {
    (a + b) * 0.5
}

/// Euclidean norm of the x/y components only.
#[inline]
#[must_use]
pub fn l2_norm_2d(p: &Point3D) -> f32 {
    p.x.hypot(p.y)
}

/// Largest absolute component.
#[inline]
#[must_use]
pub fn max_abs(p: &Point3D) -> f32 {
    p.x.abs().max(p.y.abs()).max(p.z.abs())
}

/// Sum of absolute components.
#[inline]
#[must_use]
pub fn sum_abs(p: &Point3D) -> f32 {
    p.x.abs() + p.y.abs() + p.z.abs()
}

/// Add `offset` to every point in place.
pub fn add_all(points: &mut [Point3D], offset: &Point3D) {
    for p in points.iter_mut() {
        *p += offset;
    }
}

/// Subtract `offset` from every point in place.
pub fn subtract_all(points: &mut [Point3D], offset: &Point3D) {
    for p in points.iter_mut() {
        *p -= offset;
    }
}

/// Scale every point in place.
pub fn scale_all(points: &mut [Point3D], factor: f32) {
    for p in points.iter_mut() {
        *p *= factor;
    }
}

/// Per-axis scale every point in place.
pub fn scale_all_per_axis(points: &mut [Point3D], weights: &Point3D) {
    for p in points.iter_mut() {
        *p = p.component_mul(weights);
    }
}
