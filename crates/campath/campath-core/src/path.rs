//! Camera path: keyframe store plus the channel splines derived from it.
//!
//! Channels are rebuilt lazily. Any store mutation or mode change leaves the
//! path dirty; the next [`CamPath::evaluate`] rebuilds every channel from the
//! coalesced keyframe projection before sampling.

use log::debug;
use nalgebra::{UnitQuaternion, Vector3};

use crate::config::Config;
use crate::data::{Keyframe, Sample};
use crate::error::CamPathError;
use crate::interp::{RotationInterp, ScalarInterp};
use crate::spline::{BoolChannel, QuaternionChannel, ScalarChannel};
use crate::store::{project, projected_len, KeyframeStore};

#[derive(Debug, Clone)]
pub struct CamPath {
    config: Config,
    store: KeyframeStore,
    /// Added to keyframe times to get path time.
    offset: f64,

    position_interp: ScalarInterp,
    fov_interp: ScalarInterp,
    rotation_interp: RotationInterp,

    x: ScalarChannel,
    y: ScalarChannel,
    z: ScalarChannel,
    fov: ScalarChannel,
    rotation: QuaternionChannel,
    selected: BoolChannel,
    /// Local time range of the last build.
    built_range: Option<(f64, f64)>,
    built_revision: Option<u64>,
    modes_changed: bool,
}

impl Default for CamPath {
    fn default() -> Self {
        Self::new()
    }
}

impl CamPath {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            store: KeyframeStore::new(config.time_epsilon),
            offset: 0.0,
            position_interp: config.position_interp,
            fov_interp: config.fov_interp,
            rotation_interp: config.rotation_interp,
            x: ScalarChannel::new(),
            y: ScalarChannel::new(),
            z: ScalarChannel::new(),
            fov: ScalarChannel::new(),
            rotation: QuaternionChannel::new(),
            selected: BoolChannel::new(),
            built_range: None,
            built_revision: None,
            modes_changed: false,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &KeyframeStore {
        &self.store
    }

    /// Keyframes in time order; times are path-local (without offset).
    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        self.store.keyframes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Shift the whole path in time. Channel data is local, so no rebuild.
    pub fn set_offset(&mut self, offset: f64) -> Result<(), CamPathError> {
        if !offset.is_finite() {
            return Err(CamPathError::InvalidTime { time: offset });
        }
        self.offset = offset;
        Ok(())
    }

    // Keyframe mutation

    /// Add a keyframe at path time `time`. Returns its index.
    pub fn add_keyframe(
        &mut self,
        time: f64,
        position: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
        fov: f64,
    ) -> Result<usize, CamPathError> {
        self.store
            .insert(Keyframe::new(time - self.offset, position, rotation, fov))
    }

    /// Insert a keyframe whose time is already path-local.
    pub fn insert(&mut self, keyframe: Keyframe) -> Result<usize, CamPathError> {
        self.store.insert(keyframe)
    }

    pub fn remove_keyframe(&mut self, index: usize) -> Result<Keyframe, CamPathError> {
        self.store.remove(index)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Replace every keyframe (path-local times).
    pub fn set_keyframes<I>(&mut self, keyframes: I) -> Result<(), CamPathError>
    where
        I: IntoIterator<Item = Keyframe>,
    {
        self.store.replace_all(keyframes)
    }

    // Interpolation modes

    #[inline]
    pub fn position_interpolation(&self) -> ScalarInterp {
        self.position_interp
    }

    #[inline]
    pub fn fov_interpolation(&self) -> ScalarInterp {
        self.fov_interp
    }

    #[inline]
    pub fn rotation_interpolation(&self) -> RotationInterp {
        self.rotation_interp
    }

    pub fn set_position_interpolation(&mut self, mode: ScalarInterp) {
        if self.position_interp != mode {
            self.position_interp = mode;
            self.modes_changed = true;
        }
    }

    pub fn set_fov_interpolation(&mut self, mode: ScalarInterp) {
        if self.fov_interp != mode {
            self.fov_interp = mode;
            self.modes_changed = true;
        }
    }

    pub fn set_rotation_interpolation(&mut self, mode: RotationInterp) {
        if self.rotation_interp != mode {
            self.rotation_interp = mode;
            self.modes_changed = true;
        }
    }

    // Evaluation

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.modes_changed || self.built_revision != Some(self.store.revision())
    }

    /// Whether the coalesced keyframe count satisfies every channel's minimum.
    /// Does not rebuild.
    pub fn can_evaluate(&self) -> bool {
        self.first_shortfall().is_none()
    }

    fn first_shortfall(&self) -> Option<CamPathError> {
        let available = projected_len(self.store.keyframes(), self.store.epsilon());
        let checks = [
            (
                "position",
                self.position_interp.min_points(),
                ScalarChannel::can_eval(available, self.position_interp),
            ),
            (
                "rotation",
                self.rotation_interp.min_points(),
                QuaternionChannel::can_eval(available, self.rotation_interp),
            ),
            (
                "fov",
                self.fov_interp.min_points(),
                ScalarChannel::can_eval(available, self.fov_interp),
            ),
            ("selected", 2, BoolChannel::can_eval(available)),
        ];
        checks
            .into_iter()
            .find(|(_, _, ok)| !ok)
            .map(|(channel, required, _)| CamPathError::InsufficientKeyframes {
                channel: channel.to_string(),
                required,
                available,
            })
    }

    /// Rebuild every channel from the coalesced projection if anything changed.
    pub fn rebuild(&mut self) {
        if !self.is_dirty() {
            return;
        }
        let projection = project(self.store.keyframes(), self.store.epsilon());
        debug!(
            "rebuilding camera path: {} keyframes ({} stored), position {}, rotation {}, fov {}",
            projection.len(),
            self.store.len(),
            self.position_interp,
            self.rotation_interp,
            self.fov_interp
        );

        let pos = self.position_interp;
        self.x
            .set_points(projection.iter().map(|k| (k.time, k.position.x)), pos);
        self.y
            .set_points(projection.iter().map(|k| (k.time, k.position.y)), pos);
        self.z
            .set_points(projection.iter().map(|k| (k.time, k.position.z)), pos);
        self.fov
            .set_points(projection.iter().map(|k| (k.time, k.fov)), self.fov_interp);
        self.rotation.set_points(
            projection.iter().map(|k| (k.time, k.rotation)),
            self.rotation_interp,
            &self.config.rate_settings(),
        );
        self.selected
            .set_points(projection.iter().map(|k| (k.time, k.selected)));

        self.built_range = match (projection.first(), projection.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        };
        self.built_revision = Some(self.store.revision());
        self.modes_changed = false;
    }

    /// Rebuild if needed and map path time to a clamped local time.
    fn prepare(&mut self, time: f64) -> Result<f64, CamPathError> {
        if time.is_nan() {
            return Err(CamPathError::InvalidTime { time });
        }
        if let Some(err) = self.first_shortfall() {
            return Err(err);
        }
        self.rebuild();
        let (lo, hi) = self.built_range.ok_or(CamPathError::NoPoints)?;
        Ok((time - self.offset).clamp(lo, hi))
    }

    /// Sample the path at path time `time`, clamped to the keyframe range.
    pub fn evaluate(&mut self, time: f64) -> Result<Sample, CamPathError> {
        let t = self.prepare(time)?;
        Ok(Sample {
            position: Vector3::new(self.x.eval(t)?, self.y.eval(t)?, self.z.eval(t)?),
            rotation: self.rotation.eval(t)?,
            fov: self.fov.eval(t)?,
            selected: self.selected.eval(t)?,
        })
    }

    /// Body-frame angular velocity at path time `time`, per unit of time.
    pub fn angular_velocity(&mut self, time: f64) -> Result<Vector3<f64>, CamPathError> {
        let t = self.prepare(time)?;
        self.rotation.eval_angular_velocity(t)
    }

    // Bounds (path time)

    pub fn lower_bound(&self) -> Option<f64> {
        self.store.time_range().map(|(lo, _)| lo + self.offset)
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.store.time_range().map(|(_, hi)| hi + self.offset)
    }

    pub fn duration(&self) -> Option<f64> {
        self.store.time_range().map(|(lo, hi)| hi - lo)
    }

    // Selection

    pub fn selected_count(&self) -> usize {
        self.store.selected_count()
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<(), CamPathError> {
        self.store.set_selected(index, selected)
    }

    pub fn select_all(&mut self) {
        self.store.select_all();
    }

    pub fn select_none(&mut self) {
        self.store.select_none();
    }

    pub fn select_invert(&mut self) {
        self.store.select_invert();
    }

    /// Select keyframes between two path times; returns the number newly selected.
    pub fn select_range(&mut self, min: f64, max: f64) -> usize {
        self.store
            .select_range(min - self.offset, max - self.offset)
    }

    pub fn remove_selected(&mut self) -> usize {
        self.store.remove_selected()
    }

    // Bulk edits: selected keyframes, or all of them when none is selected.

    /// Move the edit set so it starts at path time `start`.
    pub fn set_start(&mut self, start: f64) -> Result<(), CamPathError> {
        self.store.set_start(start - self.offset)
    }

    pub fn set_duration(&mut self, duration: f64) -> Result<(), CamPathError> {
        self.store.set_duration(duration)
    }

    pub fn set_position(&mut self, position: Vector3<f64>) {
        self.store.set_position(position);
    }

    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.store.set_rotation(rotation);
    }

    pub fn set_fov(&mut self, fov: f64) {
        self.store.set_fov(fov);
    }
}
