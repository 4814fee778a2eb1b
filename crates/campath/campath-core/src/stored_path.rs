use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{euler_to_quaternion, Keyframe};
use crate::error::CamPathError;
use crate::interp::{RotationInterp, ScalarInterp};
use crate::path::CamPath;

/// Public API: parse a stored camera path document into a [`CamPath`].
///
/// Notes:
/// - Keyframe times are path-local; `offset` shifts the whole path.
/// - A keyframe carries `quaternion` and/or `euler` (degrees); the quaternion wins
///   when both are present, and one of them is required.
/// - `"linear"` (or `"slinear"`) on any `interp` field switches every channel to the
///   linear family. Otherwise listed fields are parsed and missing ones fall back to
///   `config`.
pub fn parse_stored_campath_json(s: &str, config: Config) -> Result<CamPath, CamPathError> {
    let doc: StoredCamPath = serde_json::from_str(s)?;

    let mut keyframes: Vec<Keyframe> = Vec::with_capacity(doc.keyframes.len());
    for (index, raw) in doc.keyframes.into_iter().enumerate() {
        let rotation = to_rotation(index, raw.quaternion, raw.euler)?;
        keyframes.push(
            Keyframe::new(
                raw.time,
                Vector3::new(raw.position.x, raw.position.y, raw.position.z),
                rotation,
                raw.fov,
            )
            .with_selected(raw.selected),
        );
    }

    let (position, rotation, fov) = resolve_modes(doc.interp.as_ref(), &config)?;
    let mut path = CamPath::with_config(config);
    path.set_offset(doc.offset)?;
    path.set_position_interpolation(position);
    path.set_rotation_interpolation(rotation);
    path.set_fov_interpolation(fov);
    path.set_keyframes(keyframes)?;
    Ok(path)
}

/// Public API: write a [`CamPath`] as a stored document (quaternions only).
pub fn to_stored_campath_json(path: &CamPath) -> Result<String, CamPathError> {
    let doc = StoredCamPath {
        offset: path.offset(),
        interp: Some(RawInterp {
            position: Some(path.position_interpolation().name().to_string()),
            rotation: Some(path.rotation_interpolation().name().to_string()),
            fov: Some(path.fov_interpolation().name().to_string()),
        }),
        keyframes: path
            .keyframes()
            .iter()
            .map(|kf| {
                let q = kf.rotation.quaternion();
                RawKeyframe {
                    time: kf.time,
                    position: RawVec3 {
                        x: kf.position.x,
                        y: kf.position.y,
                        z: kf.position.z,
                    },
                    quaternion: Some(RawQuat {
                        w: q.w,
                        x: q.i,
                        y: q.j,
                        z: q.k,
                    }),
                    euler: None,
                    fov: kf.fov,
                    selected: kf.selected,
                }
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn to_rotation(
    index: usize,
    quaternion: Option<RawQuat>,
    euler: Option<RawEuler>,
) -> Result<UnitQuaternion<f64>, CamPathError> {
    match (quaternion, euler) {
        (Some(q), _) => {
            let raw = Quaternion::new(q.w, q.x, q.y, q.z);
            let norm = raw.norm();
            if !norm.is_finite() || norm == 0.0 {
                return Err(CamPathError::SerializationError {
                    reason: format!("keyframe {index}: quaternion has no usable norm"),
                });
            }
            Ok(UnitQuaternion::new_normalize(raw))
        }
        (None, Some(e)) => Ok(euler_to_quaternion(e.pitch, e.yaw, e.roll)),
        (None, None) => Err(CamPathError::SerializationError {
            reason: format!("keyframe {index}: missing quaternion or euler rotation"),
        }),
    }
}

fn resolve_modes(
    interp: Option<&RawInterp>,
    config: &Config,
) -> Result<(ScalarInterp, RotationInterp, ScalarInterp), CamPathError> {
    let Some(interp) = interp else {
        return Ok((config.position_interp, config.rotation_interp, config.fov_interp));
    };

    let fields = [&interp.position, &interp.rotation, &interp.fov];
    let any_linear = fields.iter().any(|field| {
        field.as_deref().is_some_and(|name| {
            let name = name.trim().to_ascii_lowercase();
            name == "linear" || name == "slinear"
        })
    });
    if any_linear {
        return Ok((ScalarInterp::Linear, RotationInterp::SLinear, ScalarInterp::Linear));
    }

    let position = match &interp.position {
        Some(name) => name.parse()?,
        None => config.position_interp,
    };
    let rotation = match &interp.rotation {
        Some(name) => name.parse()?,
        None => config.rotation_interp,
    };
    let fov = match &interp.fov {
        Some(name) => name.parse()?,
        None => config.fov_interp,
    };
    Ok((position, rotation, fov))
}

// ----- JSON schema (serde) -----

#[derive(Debug, Serialize, Deserialize)]
struct StoredCamPath {
    #[serde(default)]
    offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interp: Option<RawInterp>,
    keyframes: Vec<RawKeyframe>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawInterp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fov: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawKeyframe {
    time: f64,
    position: RawVec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quaternion: Option<RawQuat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    euler: Option<RawEuler>,
    fov: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    selected: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Serialize, Deserialize)]
struct RawVec3 {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawQuat {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

/// Degrees.
#[derive(Debug, Serialize, Deserialize)]
struct RawEuler {
    pitch: f64,
    yaw: f64,
    roll: f64,
}
