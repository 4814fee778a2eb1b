//! Keyframe and sample types.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A timestamped camera pose. `time` is path-local.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    /// Field of view in degrees.
    pub fov: f64,
    #[serde(default)]
    pub selected: bool,
}

impl Keyframe {
    pub fn new(
        time: f64,
        position: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
        fov: f64,
    ) -> Self {
        Self {
            time,
            position,
            rotation,
            fov,
            selected: false,
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Camera pose sampled from a path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub fov: f64,
    pub selected: bool,
}

/// Orientation from Euler angles in degrees: yaw about Z, pitch about Y,
/// roll about X, composed `Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn euler_to_quaternion(pitch: f64, yaw: f64, roll: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(roll.to_radians(), pitch.to_radians(), yaw.to_radians())
}

/// Inverse of [`euler_to_quaternion`]; returns `(pitch, yaw, roll)` in degrees.
pub fn quaternion_to_euler(rotation: &UnitQuaternion<f64>) -> (f64, f64, f64) {
    let (roll, pitch, yaw) = rotation.euler_angles();
    (pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}
