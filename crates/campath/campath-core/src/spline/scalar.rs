//! Scalar channel: piecewise linear or natural cubic spline over one value series.

use crate::error::CamPathError;
use crate::interp::functions::lerp;
use crate::interp::ScalarInterp;
use crate::spline::locator::{fraction, locate};

/// One scalar attribute sampled along the keyframe timeline.
#[derive(Debug, Clone, Default)]
pub struct ScalarChannel {
    mode: ScalarInterp,
    times: Vec<f64>,
    values: Vec<f64>,
    /// Second derivatives at each knot (cubic mode only).
    second_derivs: Vec<f64>,
}

impl ScalarChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the samples with `(time, value)` pairs in strictly increasing time order.
    pub fn set_points<I>(&mut self, points: I, mode: ScalarInterp)
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        self.mode = mode;
        self.times.clear();
        self.values.clear();
        self.second_derivs.clear();
        for (time, value) in points {
            self.times.push(time);
            self.values.push(value);
        }
        if mode == ScalarInterp::Cubic && self.times.len() >= 2 {
            self.second_derivs = natural_second_derivatives(&self.times, &self.values);
        }
    }

    /// Whether `count` samples are enough for `mode`.
    #[inline]
    pub fn can_eval(count: usize, mode: ScalarInterp) -> bool {
        count >= mode.min_points()
    }

    #[inline]
    pub fn mode(&self) -> ScalarInterp {
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

    pub fn eval(&self, t: f64) -> Result<f64, CamPathError> {
        match self.mode {
            ScalarInterp::Linear => self.eval_linear(t),
            ScalarInterp::Cubic => self.eval_cubic(t),
        }
    }

    fn eval_linear(&self, t: f64) -> Result<f64, CamPathError> {
        let bracket = locate(&self.times, t)?;
        if t <= self.times[bracket.lo] {
            return Ok(self.values[bracket.lo]);
        }
        if t >= self.times[bracket.hi] {
            return Ok(self.values[bracket.hi]);
        }
        let u = fraction(&self.times, bracket, t);
        Ok(lerp(self.values[bracket.lo], self.values[bracket.hi], u))
    }

    fn eval_cubic(&self, t: f64) -> Result<f64, CamPathError> {
        let n = self.times.len();
        if n == 0 {
            return Err(CamPathError::NoPoints);
        }
        if n == 1 || t <= self.times[0] {
            return Ok(self.values[0]);
        }
        if t >= self.times[n - 1] {
            return Ok(self.values[n - 1]);
        }

        let xs = &self.times;
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (hi + lo) / 2;
            if xs[mid] > t {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let h = xs[hi] - xs[lo];
        if h == 0.0 {
            return Err(CamPathError::BadInterval {
                lo,
                hi,
                time: xs[lo],
            });
        }
        let a = (xs[hi] - t) / h;
        let b = (t - xs[lo]) / h;
        let y = &self.values;
        let y2 = &self.second_derivs;
        Ok(a * y[lo]
            + b * y[hi]
            + ((a * a * a - a) * y2[lo] + (b * b * b - b) * y2[hi]) * (h * h) / 6.0)
    }
}

/// Solve the tridiagonal system for a natural cubic spline (zero curvature at
/// both ends). Forward sweep, then back substitution.
pub fn natural_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2 = vec![0.0; n];
    if n < 3 {
        return y2;
    }
    let mut u = vec![0.0; n - 1];

    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;
        u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
            - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    // Natural end: y2[n-1] stays 0.
    for k in (0..n - 1).rev() {
        y2[k] = y2[k] * y2[k + 1] + u[k];
    }
    y2
}
