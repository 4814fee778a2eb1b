//! Per-channel splines sharing one keyframe time axis.

pub mod boolean;
pub mod locator;
pub mod quaternion;
pub mod rates;
pub mod scalar;

pub use boolean::BoolChannel;
pub use locator::{locate, Bracket};
pub use quaternion::QuaternionChannel;
pub use rates::RateSolverSettings;
pub use scalar::ScalarChannel;
