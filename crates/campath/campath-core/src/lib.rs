//! Campath Core (engine-agnostic)
//!
//! Keyframe camera paths sampled as one continuous pose. Position and field of
//! view run through natural cubic (or linear) splines, orientation through a
//! globally solved angular-rate cubic (or slerp), and the `selected` flag
//! through an AND combinator. Channels are rebuilt lazily from a coalesced
//! keyframe projection whenever the keyframe store changes.

pub mod config;
pub mod data;
pub mod error;
pub mod interp;
pub mod path;
pub mod spline;
pub mod store;
pub mod stored_path;

// Re-exports for consumers (editors, renderers)
pub use config::Config;
pub use data::{euler_to_quaternion, quaternion_to_euler, Keyframe, Sample};
pub use error::CamPathError;
pub use interp::{RotationInterp, ScalarInterp};
pub use path::CamPath;
pub use spline::{BoolChannel, QuaternionChannel, RateSolverSettings, ScalarChannel};
pub use store::{project, projected_len, KeyframeStore};
pub use stored_path::{parse_stored_campath_json, to_stored_campath_json};

pub use nalgebra::{UnitQuaternion, Vector3};

pub type Result<T> = core::result::Result<T, CamPathError>;
