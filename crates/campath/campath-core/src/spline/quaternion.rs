//! Orientation channel.
//!
//! Linear mode slerps between neighbouring knots. Cubic mode fits one cubic
//! rotation vector per segment, joined with continuous angular velocity and
//! acceleration through the knot rates from [`solve_rates`].

use nalgebra::{UnitQuaternion, Vector3};

use crate::error::CamPathError;
use crate::interp::functions::{align_hemisphere, apply_rotation_vector, relative_rotation, slerp};
use crate::interp::RotationInterp;
use crate::spline::locator::{fraction, locate};
use crate::spline::rates::{
    angle_rate_to_body_rate, body_rate_to_angle_rate, solve_rates, RateSolverSettings,
};

/// Cubic rotation vector over one segment, in normalized time `x = (t - t_i) / h`.
#[derive(Debug, Clone)]
struct AttitudeSegment {
    start: UnitQuaternion<f64>,
    duration: f64,
    /// `θ(x) = ((c2 x + c1) x + c0) x`
    coeffs: [Vector3<f64>; 3],
}

impl AttitudeSegment {
    fn new(
        start: UnitQuaternion<f64>,
        duration: f64,
        angle: f64,
        axis: Vector3<f64>,
        start_rate: &Vector3<f64>,
        end_rate: &Vector3<f64>,
    ) -> Self {
        let theta_end = axis * angle;
        let end_angle_rate = body_rate_to_angle_rate(&axis, angle, end_rate);
        let c0 = start_rate * duration;
        let c1 = theta_end * 3.0 - (start_rate * 2.0 + end_angle_rate) * duration;
        let c2 = theta_end * -2.0 + (start_rate + end_angle_rate) * duration;
        Self {
            start,
            duration,
            coeffs: [c0, c1, c2],
        }
    }

    fn theta(&self, x: f64) -> Vector3<f64> {
        let [c0, c1, c2] = &self.coeffs;
        ((c2 * x + c1) * x + c0) * x
    }

    fn theta_rate(&self, x: f64) -> Vector3<f64> {
        let [c0, c1, c2] = &self.coeffs;
        ((c2 * (3.0 * x) + c1 * 2.0) * x + c0) / self.duration
    }

    fn orientation(&self, x: f64) -> UnitQuaternion<f64> {
        apply_rotation_vector(&self.start, &self.theta(x))
    }

    fn body_rate(&self, x: f64) -> Vector3<f64> {
        let theta = self.theta(x);
        let angle = theta.norm();
        let axis = if angle > 0.0 { theta / angle } else { Vector3::x() };
        angle_rate_to_body_rate(&axis, angle, &self.theta_rate(x))
    }
}

/// Orientation sampled along the keyframe timeline.
#[derive(Debug, Clone, Default)]
pub struct QuaternionChannel {
    mode: RotationInterp,
    times: Vec<f64>,
    /// Knot orientations, each in the hemisphere of its predecessor.
    values: Vec<UnitQuaternion<f64>>,
    /// Body angular rate at each knot (cubic mode only).
    rates: Vec<Vector3<f64>>,
    segments: Vec<AttitudeSegment>,
}

impl QuaternionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the knots. Times must be strictly increasing. Orientations are
    /// renormalized, since deserialized unit quaternions are not checked.
    pub fn set_points<I>(&mut self, points: I, mode: RotationInterp, settings: &RateSolverSettings)
    where
        I: IntoIterator<Item = (f64, UnitQuaternion<f64>)>,
    {
        self.mode = mode;
        self.times.clear();
        self.values.clear();
        self.rates.clear();
        self.segments.clear();

        for (time, q) in points {
            let q = UnitQuaternion::new_normalize(q.into_inner());
            let aligned = match self.values.last() {
                Some(previous) => align_hemisphere(previous, &q),
                None => q,
            };
            self.times.push(time);
            self.values.push(aligned);
        }

        if mode == RotationInterp::SCubic && self.times.len() >= 2 {
            self.build_segments(settings);
        }
    }

    fn build_segments(&mut self, settings: &RateSolverSettings) {
        let count = self.times.len() - 1;
        let mut durations = Vec::with_capacity(count);
        let mut angles = Vec::with_capacity(count);
        let mut axes = Vec::with_capacity(count);
        for i in 0..count {
            durations.push(self.times[i + 1] - self.times[i]);
            let (angle, axis) = relative_rotation(&self.values[i], &self.values[i + 1]);
            angles.push(angle);
            axes.push(axis);
        }

        self.rates = solve_rates(&durations, &angles, &axes, settings);
        self.segments = (0..count)
            .map(|i| {
                AttitudeSegment::new(
                    self.values[i],
                    durations[i],
                    angles[i],
                    axes[i],
                    &self.rates[i],
                    &self.rates[i + 1],
                )
            })
            .collect();
    }

    #[inline]
    pub fn can_eval(count: usize, mode: RotationInterp) -> bool {
        count >= mode.min_points()
    }

    #[inline]
    pub fn mode(&self) -> RotationInterp {
        self.mode
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Knot orientations after double-cover alignment.
    pub fn knots(&self) -> &[UnitQuaternion<f64>] {
        &self.values
    }

    /// Solved body rates at the knots; empty in linear mode.
    pub fn knot_rates(&self) -> &[Vector3<f64>] {
        &self.rates
    }

    /// Orientation at `t`, clamped to the first/last knot outside the range.
    pub fn eval(&self, t: f64) -> Result<UnitQuaternion<f64>, CamPathError> {
        let bracket = locate(&self.times, t)?;
        if t <= self.times[bracket.lo] {
            return Ok(self.values[bracket.lo]);
        }
        if t >= self.times[bracket.hi] {
            return Ok(self.values[bracket.hi]);
        }

        match (self.mode, self.segments.get(bracket.lo)) {
            (RotationInterp::SCubic, Some(segment)) => {
                let x = fraction(&self.times, bracket, t);
                Ok(segment.orientation(x))
            }
            _ => {
                let u = fraction(&self.times, bracket, t);
                Ok(slerp(&self.values[bracket.lo], &self.values[bracket.hi], u))
            }
        }
    }

    /// Body-frame angular velocity (rad per time unit) at `t`.
    ///
    /// Outside the knot range this is the one-sided rate at the nearest end.
    /// Linear mode reports the constant rate of the enclosing segment.
    pub fn eval_angular_velocity(&self, t: f64) -> Result<Vector3<f64>, CamPathError> {
        let n = self.times.len();
        if n == 0 {
            return Err(CamPathError::NoPoints);
        }
        if n == 1 {
            return Ok(Vector3::zeros());
        }

        let clamped = t.clamp(self.times[0], self.times[n - 1]);
        let lo = self
            .times
            .partition_point(|&knot| knot <= clamped)
            .saturating_sub(1)
            .min(n - 2);
        let h = self.times[lo + 1] - self.times[lo];
        if h <= 0.0 {
            return Err(CamPathError::BadInterval {
                lo,
                hi: lo + 1,
                time: self.times[lo],
            });
        }

        match (self.mode, self.segments.get(lo)) {
            (RotationInterp::SCubic, Some(segment)) => {
                let x = ((clamped - self.times[lo]) / h).clamp(0.0, 1.0);
                Ok(segment.body_rate(x))
            }
            _ => {
                let (angle, axis) = relative_rotation(&self.values[lo], &self.values[lo + 1]);
                Ok(axis * (angle / h))
            }
        }
    }
}
