//! Error types for the camera-path engine

use serde::{Deserialize, Serialize};

/// Errors raised by channels, the keyframe store and the path aggregator
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CamPathError {
    /// A channel or locator was queried without any samples
    #[error("No points")]
    NoPoints,

    /// Two knots of a cubic interval share the same time
    #[error("Bad interval data: knots {lo} and {hi} share time {time}")]
    BadInterval { lo: usize, hi: usize, time: f64 },

    /// Too few keyframes for the configured interpolation mode
    #[error("Not enough keyframes for {channel}: need {required}, have {available}")]
    InsufficientKeyframes {
        channel: String,
        required: usize,
        available: usize,
    },

    /// Non-finite time, or a negative/non-finite duration
    #[error("Invalid time value: {time}")]
    InvalidTime { time: f64 },

    /// Keyframe index outside the store
    #[error("Keyframe index {index} out of range (len {len})")]
    KeyframeOutOfRange { index: usize, len: usize },

    /// Interpolation mode name that does not parse
    #[error("Unknown interpolation mode: {name}")]
    UnknownInterpolation { name: String },

    /// Stored document could not be read or written
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CamPathError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NoPoints | Self::BadInterval { .. } => "spline",
            Self::InsufficientKeyframes { .. } => "evaluation",
            Self::InvalidTime { .. }
            | Self::KeyframeOutOfRange { .. }
            | Self::UnknownInterpolation { .. } => "validation",
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for CamPathError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
