//! Interpolation helpers:
//! - lerp (scalar blend)
//! - hemisphere alignment (quaternion double-cover correction)
//! - slerp with a near-parallel NLERP fallback
//! - quaternion log/exp maps used by the angular-rate spline

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Dot above which slerp degrades to a normalized linear blend.
pub const SLERP_NLERP_THRESHOLD: f64 = 0.9995;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// 4D dot product of two quaternions.
#[inline]
pub fn quat_dot(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>) -> f64 {
    a.coords.dot(&b.coords)
}

/// Return `q` or `-q`, whichever lies in the same hemisphere as `reference`.
#[inline]
pub fn align_hemisphere(
    reference: &UnitQuaternion<f64>,
    q: &UnitQuaternion<f64>,
) -> UnitQuaternion<f64> {
    if quat_dot(reference, q) < 0.0 {
        UnitQuaternion::new_unchecked(-q.into_inner())
    } else {
        *q
    }
}

/// Spherical linear interpolation along the shortest arc.
/// Nearly parallel inputs blend linearly and renormalize.
pub fn slerp(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>, t: f64) -> UnitQuaternion<f64> {
    let qa: Quaternion<f64> = a.into_inner();
    let mut qb: Quaternion<f64> = b.into_inner();
    let mut dot = qa.coords.dot(&qb.coords);
    if dot < 0.0 {
        qb = -qb;
        dot = -dot;
    }

    if dot > SLERP_NLERP_THRESHOLD {
        return UnitQuaternion::new_normalize(qa.lerp(&qb, t));
    }

    let theta_0 = dot.acos();
    let theta = theta_0 * t;
    let sin_theta_0 = theta_0.sin();
    let s0 = theta.cos() - dot * theta.sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;
    UnitQuaternion::new_normalize(qa * s0 + qb * s1)
}

/// Log map of the rotation carrying `from` onto `to` (`to = from * Δq`).
/// Returns the rotation angle in `[0, π]` for hemisphere-aligned inputs and
/// the unit axis. A vanishing rotation reports angle 0 about +X.
pub fn relative_rotation(
    from: &UnitQuaternion<f64>,
    to: &UnitQuaternion<f64>,
) -> (f64, Vector3<f64>) {
    let delta = from.inverse() * to;
    let imag = delta.imag();
    let magnitude = imag.norm();
    if magnitude > 0.0 {
        (2.0 * magnitude.atan2(delta.scalar()), imag / magnitude)
    } else {
        (0.0, Vector3::x())
    }
}

/// Exp map: rotate `start` by the rotation vector `theta` in its own frame.
#[inline]
pub fn apply_rotation_vector(
    start: &UnitQuaternion<f64>,
    theta: &Vector3<f64>,
) -> UnitQuaternion<f64> {
    let mut q = start * UnitQuaternion::from_scaled_axis(*theta);
    q.renormalize();
    q
}
