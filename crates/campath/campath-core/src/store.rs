//! Keyframe store: time-ordered keyframes with near-duplicate times coalesced.
//!
//! Every mutation bumps `revision`; the path aggregator compares it against the
//! revision its channels were built from.

use log::{debug, warn};
use nalgebra::{UnitQuaternion, Vector3};

use crate::data::Keyframe;
use crate::error::CamPathError;

/// Default coalescing tolerance for keyframe times.
pub const DEFAULT_TIME_EPSILON: f64 = 1e-6;

#[inline]
fn same_time(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn check_time(time: f64) -> Result<(), CamPathError> {
    if time.is_finite() {
        Ok(())
    } else {
        Err(CamPathError::InvalidTime { time })
    }
}

/// Collapse a time-sorted keyframe run so no two entries lie within `epsilon`.
///
/// Walking in order, a keyframe within `epsilon` of the last kept one replaces
/// it; anything later is appended.
pub fn project(keyframes: &[Keyframe], epsilon: f64) -> Vec<Keyframe> {
    let mut out: Vec<Keyframe> = Vec::with_capacity(keyframes.len());
    for kf in keyframes {
        match out.last_mut() {
            Some(last) if same_time(last.time, kf.time, epsilon) => {
                warn!(
                    "coalescing keyframe at t={} into t={} (epsilon {})",
                    kf.time, last.time, epsilon
                );
                *last = kf.clone();
            }
            _ => out.push(kf.clone()),
        }
    }
    out
}

/// Length [`project`] would return, without allocating.
pub fn projected_len(keyframes: &[Keyframe], epsilon: f64) -> usize {
    let mut count = 0;
    let mut last: Option<f64> = None;
    for kf in keyframes {
        match last {
            Some(t) if same_time(t, kf.time, epsilon) => {}
            _ => count += 1,
        }
        last = Some(kf.time);
    }
    count
}

#[derive(Debug, Clone)]
pub struct KeyframeStore {
    keyframes: Vec<Keyframe>,
    epsilon: f64,
    revision: u64,
}

impl Default for KeyframeStore {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_EPSILON)
    }
}

impl KeyframeStore {
    pub fn new(epsilon: f64) -> Self {
        Self {
            keyframes: Vec::new(),
            epsilon,
            revision: 0,
        }
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Keyframes in time order.
    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Keyframe> {
        self.keyframes.get(index)
    }

    /// Earliest and latest keyframe time.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Insert in time order. Every existing keyframe within epsilon of the new
    /// one is replaced by it. Returns the index it landed at.
    pub fn insert(&mut self, keyframe: Keyframe) -> Result<usize, CamPathError> {
        check_time(keyframe.time)?;
        let (time, epsilon) = (keyframe.time, self.epsilon);
        let lo = self
            .keyframes
            .partition_point(|k| k.time < time && !same_time(k.time, time, epsilon));
        let hi = self
            .keyframes
            .partition_point(|k| k.time < time || same_time(k.time, time, epsilon));

        if hi > lo {
            debug!(
                "keyframe at t={} replaces {} keyframe(s) in [{}, {}]",
                time,
                hi - lo,
                self.keyframes[lo].time,
                self.keyframes[hi - 1].time
            );
        }
        self.keyframes.splice(lo..hi, std::iter::once(keyframe));
        self.touch();
        Ok(lo)
    }

    pub fn remove(&mut self, index: usize) -> Result<Keyframe, CamPathError> {
        if index >= self.keyframes.len() {
            return Err(CamPathError::KeyframeOutOfRange {
                index,
                len: self.keyframes.len(),
            });
        }
        let removed = self.keyframes.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
        self.touch();
    }

    /// Replace the whole list. Input order is insertion order: later entries win
    /// near-duplicate times.
    pub fn replace_all<I>(&mut self, keyframes: I) -> Result<(), CamPathError>
    where
        I: IntoIterator<Item = Keyframe>,
    {
        let incoming: Vec<Keyframe> = keyframes.into_iter().collect();
        for kf in &incoming {
            check_time(kf.time)?;
        }
        self.keyframes = incoming;
        self.normalize();
        self.touch();
        Ok(())
    }

    /// Change the coalescing tolerance; the current keyframes are re-coalesced.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
        self.normalize();
        self.touch();
    }

    /// Stable sort, then coalesce.
    fn normalize(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        if projected_len(&self.keyframes, self.epsilon) != self.keyframes.len() {
            self.keyframes = project(&self.keyframes, self.epsilon);
        }
    }

    // Selection

    pub fn selected_count(&self) -> usize {
        self.keyframes.iter().filter(|k| k.selected).count()
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<(), CamPathError> {
        let len = self.keyframes.len();
        let kf = self
            .keyframes
            .get_mut(index)
            .ok_or(CamPathError::KeyframeOutOfRange { index, len })?;
        if kf.selected != selected {
            kf.selected = selected;
            self.touch();
        }
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.keyframes.iter_mut().for_each(|k| k.selected = true);
        self.touch();
    }

    pub fn select_none(&mut self) {
        self.keyframes.iter_mut().for_each(|k| k.selected = false);
        self.touch();
    }

    pub fn select_invert(&mut self) {
        self.keyframes.iter_mut().for_each(|k| k.selected = !k.selected);
        self.touch();
    }

    /// Add keyframes with `min <= time <= max` to the selection.
    /// Returns how many were not selected before.
    pub fn select_range(&mut self, min: f64, max: f64) -> usize {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let mut added = 0;
        for kf in self
            .keyframes
            .iter_mut()
            .filter(|k| !k.selected && k.time >= lo && k.time <= hi)
        {
            kf.selected = true;
            added += 1;
        }
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Remove every selected keyframe; returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let before = self.keyframes.len();
        self.keyframes.retain(|k| !k.selected);
        let removed = before - self.keyframes.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    // Bulk edits on the selection, or on everything when nothing is selected.

    fn edit_set(&mut self) -> impl Iterator<Item = &mut Keyframe> {
        let any_selected = self.keyframes.iter().any(|k| k.selected);
        self.keyframes
            .iter_mut()
            .filter(move |k| !any_selected || k.selected)
    }

    fn edit_time_range(&self) -> Option<(f64, f64)> {
        let any_selected = self.keyframes.iter().any(|k| k.selected);
        self.keyframes
            .iter()
            .filter(|k| !any_selected || k.selected)
            .fold(None, |range, k| match range {
                None => Some((k.time, k.time)),
                Some((lo, hi)) => Some((f64::min(lo, k.time), f64::max(hi, k.time))),
            })
    }

    fn finish_edit(&mut self) {
        self.normalize();
        self.touch();
    }

    /// Shift the edit set so its earliest keyframe lands on `start`.
    pub fn set_start(&mut self, start: f64) -> Result<(), CamPathError> {
        check_time(start)?;
        let Some((lo, _)) = self.edit_time_range() else {
            return Ok(());
        };
        let shift = start - lo;
        self.edit_set().for_each(|k| k.time += shift);
        self.finish_edit();
        Ok(())
    }

    /// Rescale edit-set times about the earliest one so they span `duration`.
    /// A set with zero span is left as is.
    pub fn set_duration(&mut self, duration: f64) -> Result<(), CamPathError> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(CamPathError::InvalidTime { time: duration });
        }
        let Some((lo, hi)) = self.edit_time_range() else {
            return Ok(());
        };
        let span = hi - lo;
        if span <= 0.0 {
            return Ok(());
        }
        let scale = duration / span;
        self.edit_set()
            .for_each(|k| k.time = lo + (k.time - lo) * scale);
        self.finish_edit();
        Ok(())
    }

    pub fn set_position(&mut self, position: Vector3<f64>) {
        self.edit_set().for_each(|k| k.position = position);
        self.finish_edit();
    }

    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.edit_set().for_each(|k| k.rotation = rotation);
        self.finish_edit();
    }

    pub fn set_fov(&mut self, fov: f64) {
        self.edit_set().for_each(|k| k.fov = fov);
        self.finish_edit();
    }
}
