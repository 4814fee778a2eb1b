//! Angular-rate solve for the cubic attitude spline.
//!
//! Each segment `i` carries a rotation vector `θ(t)` with `q(t) = q_i ∘ exp(θ(t))`,
//! `θ(0) = 0` and `θ(h_i) = Δθ_i e_i`. Body rates `w_i` at the knots are chosen so
//! angular acceleration is continuous across interior knots. The coupling maps
//! between body rate and `θ̇` depend on `(Δθ, e)` of the neighbouring segment, and
//! the acceleration matching carries a term quadratic in the unknown rate, so the
//! banded system is re-solved with the previous rates plugged into that term.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Below this angle the rate maps use their first-order expansion.
pub const SMALL_ANGLE_EPSILON: f64 = 1e-6;

/// Below this angle the acceleration correction uses its first-order expansion;
/// the closed form loses all precision to cancellation well above
/// [`SMALL_ANGLE_EPSILON`].
pub const CORRECTION_SERIES_ANGLE: f64 = 1e-3;

/// Fixed-point settings for [`solve_rates`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSolverSettings {
    /// Hard cap on elimination passes. The first pass solves the linear system
    /// with a zero correction term and always runs, so 0 behaves like 1.
    pub max_iterations: usize,
    /// Stop once the L2 change across all interior rates is at or below this.
    pub tolerance: f64,
    /// Body rate imposed at the first knot.
    pub initial_rate: Vector3<f64>,
    /// Body rate imposed at the last knot.
    pub final_rate: Vector3<f64>,
}

impl Default for RateSolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 2,
            tolerance: 1e-6,
            initial_rate: Vector3::zeros(),
            final_rate: Vector3::zeros(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateMap {
    /// `w -> θ̇`
    BodyToAngle,
    /// `θ̇ -> w`
    AngleToBody,
}

fn map_rate(axis: &Vector3<f64>, angle: f64, input: &Vector3<f64>, map: RateMap) -> Vector3<f64> {
    let along = axis.dot(input);
    let cross = axis.cross(input);
    let perpendicular = cross.cross(axis);

    let (k_perp, k_cross) = if angle > SMALL_ANGLE_EPSILON {
        let (sin, cos) = angle.sin_cos();
        match map {
            RateMap::BodyToAngle => (0.5 * angle * sin / (1.0 - cos), 0.5 * angle),
            RateMap::AngleToBody => (sin / angle, (cos - 1.0) / angle),
        }
    } else {
        match map {
            RateMap::BodyToAngle => (1.0, 0.5 * angle),
            RateMap::AngleToBody => (1.0, -0.5 * angle),
        }
    };

    axis * along + perpendicular * k_perp + cross * k_cross
}

/// Convert a body angular rate into the rotation-vector derivative at `angle * axis`.
#[inline]
pub fn body_rate_to_angle_rate(
    axis: &Vector3<f64>,
    angle: f64,
    rate: &Vector3<f64>,
) -> Vector3<f64> {
    map_rate(axis, angle, rate, RateMap::BodyToAngle)
}

/// Inverse of [`body_rate_to_angle_rate`].
#[inline]
pub fn angle_rate_to_body_rate(
    axis: &Vector3<f64>,
    angle: f64,
    angle_rate: &Vector3<f64>,
) -> Vector3<f64> {
    map_rate(axis, angle, angle_rate, RateMap::AngleToBody)
}

/// Nonlinear acceleration term at the end of a segment rotated by `angle * axis`
/// whose terminal body rate is `rate`.
pub fn rate_correction(axis: &Vector3<f64>, angle: f64, rate: &Vector3<f64>) -> Vector3<f64> {
    let along = rate.dot(axis);
    let magnitude_sq = rate.dot(rate);
    let perpendicular = axis.cross(rate).cross(axis);

    let (r0, r1) = if angle > CORRECTION_SERIES_ANGLE {
        let sin = angle.sin();
        let half_sin = (0.5 * angle).sin();
        let c1 = 2.0 * half_sin * half_sin;
        (
            0.5 * (magnitude_sq - along * along) * (angle - sin) / c1,
            along * (angle * sin - 2.0 * c1) / (angle * c1),
        )
    } else {
        (
            (magnitude_sq - along * along) * angle / 6.0,
            -along * angle / 6.0,
        )
    };

    axis * r0 + perpendicular * r1
}

/// Solve knot body rates for `durations.len() + 1` knots.
///
/// `angles[i]`/`axes[i]` describe the rotation across segment `i` and
/// `durations[i]` its length (all strictly positive). The first and last rates
/// are the boundary rates from `settings`.
pub fn solve_rates(
    durations: &[f64],
    angles: &[f64],
    axes: &[Vector3<f64>],
    settings: &RateSolverSettings,
) -> Vec<Vector3<f64>> {
    let n = durations.len() + 1;
    let mut w = vec![Vector3::zeros(); n];

    if n >= 3 {
        let h = durations;
        let mut a = vec![0.0; n];
        let mut b = vec![0.0; n];
        let mut c = vec![0.0; n];
        let mut previous = vec![Vector3::zeros(); n];

        for iteration in 0..settings.max_iterations.max(1) {
            previous[1..n - 1].copy_from_slice(&w[1..n - 1]);

            // w holds the right-hand side until it is overwritten by the solution.
            for i in 1..n - 1 {
                a[i] = 2.0 / h[i - 1];
                b[i] = 4.0 / h[i - 1] + 4.0 / h[i];
                c[i] = 2.0 / h[i];

                let correction = rate_correction(&axes[i - 1], angles[i - 1], &previous[i]);
                w[i] = (axes[i - 1] * (angles[i - 1] / (h[i - 1] * h[i - 1]))
                    + axes[i] * (angles[i] / (h[i] * h[i])))
                    * 6.0
                    - correction;
            }

            let start = angle_rate_to_body_rate(&axes[0], angles[0], &settings.initial_rate);
            let end = body_rate_to_angle_rate(&axes[n - 2], angles[n - 2], &settings.final_rate);
            w[1] -= start * a[1];
            w[n - 2] -= end * c[n - 2];

            // Forward sweep to upper triangular form.
            for i in 1..n - 2 {
                let ratio = a[i + 1] / b[i];
                b[i + 1] -= c[i] * ratio;
                let carried = angle_rate_to_body_rate(&axes[i], angles[i], &w[i]);
                w[i + 1] -= carried * ratio;
            }

            // Back substitution.
            w[n - 2] /= b[n - 2];
            for i in (1..n - 2).rev() {
                let next = body_rate_to_angle_rate(&axes[i], angles[i], &w[i + 1]);
                w[i] = (w[i] - next * c[i]) / b[i];
            }

            let change = (1..n - 1)
                .map(|i| (w[i] - previous[i]).norm_squared())
                .sum::<f64>()
                .sqrt();
            log::trace!("rate solve pass {iteration}: change {change:e}");
            if change <= settings.tolerance {
                break;
            }
        }
    }

    w[0] = settings.initial_rate;
    w[n - 1] = settings.final_rate;
    w
}
