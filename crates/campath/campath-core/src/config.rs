//! Core configuration for campath-core.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::interp::{RotationInterp, ScalarInterp};
use crate::spline::RateSolverSettings;

/// Dedup tolerance, solver limits and default interpolation modes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyframes closer than this in time are coalesced (last writer wins).
    pub time_epsilon: f64,

    /// Fixed-point passes of the angular-rate solve.
    pub rate_max_iterations: usize,
    pub rate_tolerance: f64,

    /// Body rates at the first and last keyframe of a cubic rotation path.
    pub initial_angular_rate: [f64; 3],
    pub final_angular_rate: [f64; 3],

    pub position_interp: ScalarInterp,
    pub fov_interp: ScalarInterp,
    pub rotation_interp: RotationInterp,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_epsilon: 1e-6,
            rate_max_iterations: 2,
            rate_tolerance: 1e-6,
            initial_angular_rate: [0.0; 3],
            final_angular_rate: [0.0; 3],
            position_interp: ScalarInterp::Cubic,
            fov_interp: ScalarInterp::Cubic,
            rotation_interp: RotationInterp::SCubic,
        }
    }
}

impl Config {
    pub fn rate_settings(&self) -> RateSolverSettings {
        RateSolverSettings {
            max_iterations: self.rate_max_iterations,
            tolerance: self.rate_tolerance,
            initial_rate: Vector3::from(self.initial_angular_rate),
            final_rate: Vector3::from(self.final_angular_rate),
        }
    }
}
