//! Interpolation modes and helpers.
//!
//! Scalar channels (position components, fov) choose between `Linear` and
//! `Cubic`; the rotation channel between `SLinear` (slerp) and `SCubic`
//! (angular-rate cubic spline).

pub mod functions;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CamPathError;

/// Interpolation used by a scalar channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarInterp {
    Linear,
    /// Natural cubic spline.
    #[default]
    Cubic,
}

impl ScalarInterp {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Cubic => "cubic",
        }
    }

    /// Fewest samples a channel in this mode can evaluate.
    #[inline]
    pub fn min_points(&self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Cubic => 4,
        }
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear)
    }
}

/// Interpolation used by the rotation channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationInterp {
    /// Piecewise slerp.
    SLinear,
    /// Globally solved angular-rate cubic.
    #[default]
    SCubic,
}

impl RotationInterp {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SLinear => "slinear",
            Self::SCubic => "scubic",
        }
    }

    #[inline]
    pub fn min_points(&self) -> usize {
        match self {
            Self::SLinear => 2,
            Self::SCubic => 4,
        }
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::SLinear)
    }
}

impl FromStr for ScalarInterp {
    type Err = CamPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "cubic" => Ok(Self::Cubic),
            other => Err(CamPathError::UnknownInterpolation {
                name: other.to_string(),
            }),
        }
    }
}

impl FromStr for RotationInterp {
    type Err = CamPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slinear" | "linear" => Ok(Self::SLinear),
            "scubic" | "cubic" => Ok(Self::SCubic),
            other => Err(CamPathError::UnknownInterpolation {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScalarInterp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for RotationInterp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
