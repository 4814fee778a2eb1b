//! Boolean channel. Not an interpolation: between two samples the value is the
//! AND of both, so a flag only holds inside a run flagged on both sides.

use crate::error::CamPathError;
use crate::spline::locator::locate;

#[derive(Debug, Clone, Default)]
pub struct BoolChannel {
    times: Vec<f64>,
    values: Vec<bool>,
}

impl BoolChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_points<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        self.times.clear();
        self.values.clear();
        for (time, value) in points {
            self.times.push(time);
            self.values.push(value);
        }
    }

    #[inline]
    pub fn can_eval(count: usize) -> bool {
        count >= 2
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn eval(&self, t: f64) -> Result<bool, CamPathError> {
        let bracket = locate(&self.times, t)?;
        let lower = self.values[bracket.lo];
        let upper = self.values[bracket.hi];
        if t <= self.times[bracket.lo] {
            return Ok(lower);
        }
        if t >= self.times[bracket.hi] {
            return Ok(upper);
        }
        Ok(lower && upper)
    }
}
