//! Clip construction from raw per-channel curves.
//!
//! Authoring tools export one scalar curve per transform channel
//! (`position.x`, `rotation.w`, ...) grouped by bone path. [`ClipBuilder`]
//! regroups those curves into vector / quaternion keyframe tracks, assigns
//! each bone path a dense slot index in first-seen order, and returns the
//! immutable [`ClipStore`] together with the [`BoneSlotMap`] used later to
//! bind scene bones to slots.
//!
//! Sibling channels of one value must have the same number of keys; a
//! mismatch rejects the whole clip.

use glam::{Quat, Vec3};
use ossa_core::interner::{self, Symbol};
use ossa_core::{OssaError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::clip::{BoneTracks, ClipStore};
use crate::track::KeyframeTrack;

/// Tolerance used when checking that sibling channels share key times.
const TIME_DRIFT_EPSILON: f32 = 1e-5;

/// Rotation keys with a squared length below this cannot be normalized.
const MIN_ROTATION_LENGTH_SQUARED: f32 = 1e-12;

/// One scalar transform channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "position.x")]
    PositionX,
    #[serde(rename = "position.y")]
    PositionY,
    #[serde(rename = "position.z")]
    PositionZ,
    #[serde(rename = "rotation.x")]
    RotationX,
    #[serde(rename = "rotation.y")]
    RotationY,
    #[serde(rename = "rotation.z")]
    RotationZ,
    #[serde(rename = "rotation.w")]
    RotationW,
    #[serde(rename = "scale.x")]
    ScaleX,
    #[serde(rename = "scale.y")]
    ScaleY,
    #[serde(rename = "scale.z")]
    ScaleZ,
}

const CHANNEL_COUNT: usize = 10;

impl Channel {
    pub const POSITION: [Channel; 3] = [Self::PositionX, Self::PositionY, Self::PositionZ];
    pub const ROTATION: [Channel; 4] = [
        Self::RotationX,
        Self::RotationY,
        Self::RotationZ,
        Self::RotationW,
    ];
    pub const SCALE: [Channel; 3] = [Self::ScaleX, Self::ScaleY, Self::ScaleZ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PositionX => "position.x",
            Self::PositionY => "position.y",
            Self::PositionZ => "position.z",
            Self::RotationX => "rotation.x",
            Self::RotationY => "rotation.y",
            Self::RotationZ => "rotation.z",
            Self::RotationW => "rotation.w",
            Self::ScaleX => "scale.x",
            Self::ScaleY => "scale.y",
            Self::ScaleZ => "scale.z",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// A single `(time, value)` sample of a scalar curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    #[must_use]
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Default)]
struct BoneCurves {
    channels: [Option<Vec<CurveKey>>; CHANNEL_COUNT],
}

/// Maps bone paths to the dense slot indices of one clip.
#[derive(Debug, Clone, Default)]
pub struct BoneSlotMap {
    paths: Vec<Symbol>,
    slots: FxHashMap<Symbol, usize>,
}

impl BoneSlotMap {
    /// Slot of `bone_path`, or `None` if the clip does not animate it.
    #[must_use]
    pub fn slot(&self, bone_path: &str) -> Option<usize> {
        let symbol = interner::get(bone_path)?;
        self.slots.get(&symbol).copied()
    }

    #[must_use]
    pub fn slot_of_symbol(&self, symbol: Symbol) -> Option<usize> {
        self.slots.get(&symbol).copied()
    }

    #[must_use]
    pub fn path(&self, slot: usize) -> Option<&'static str> {
        self.paths.get(slot).map(|&s| interner::resolve(s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// `(slot, path symbol)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Symbol)> + '_ {
        self.paths.iter().copied().enumerate()
    }
}

/// Collects raw curves for one clip and bakes them into a [`ClipStore`].
#[derive(Debug)]
pub struct ClipBuilder {
    name: String,
    duration: f32,
    speed: f32,
    bones: Vec<(Symbol, BoneCurves)>,
    index: FxHashMap<Symbol, usize>,
}

impl ClipBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            speed: 1.0,
            bones: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Default playback speed stored with the clip.
    #[must_use]
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Adds one scalar curve. Bones receive slots in the order they are first seen.
    pub fn add_curve(
        &mut self,
        bone_path: &str,
        channel: Channel,
        keys: Vec<CurveKey>,
    ) -> Result<&mut Self> {
        let symbol = interner::intern(bone_path);
        let slot = *self.index.entry(symbol).or_insert_with(|| {
            self.bones.push((symbol, BoneCurves::default()));
            self.bones.len() - 1
        });

        let entry = &mut self.bones[slot].1.channels[channel.index()];
        if entry.is_some() {
            return Err(OssaError::DuplicateCurve {
                bone_path: bone_path.to_string(),
                channel: channel.name(),
            });
        }
        *entry = Some(keys);
        Ok(self)
    }

    /// Splits `(time, position)` keys into the three position channels.
    pub fn add_position_keys(
        &mut self,
        bone_path: &str,
        keys: &[(f32, Vec3)],
    ) -> Result<&mut Self> {
        for (axis, channel) in Channel::POSITION.into_iter().enumerate() {
            let curve = keys.iter().map(|(t, v)| CurveKey::new(*t, v[axis])).collect();
            self.add_curve(bone_path, channel, curve)?;
        }
        Ok(self)
    }

    /// Splits `(time, rotation)` keys into the four rotation channels.
    pub fn add_rotation_keys(
        &mut self,
        bone_path: &str,
        keys: &[(f32, Quat)],
    ) -> Result<&mut Self> {
        for (axis, channel) in Channel::ROTATION.into_iter().enumerate() {
            let curve = keys
                .iter()
                .map(|(t, q)| CurveKey::new(*t, q.to_array()[axis]))
                .collect();
            self.add_curve(bone_path, channel, curve)?;
        }
        Ok(self)
    }

    /// Splits `(time, scale)` keys into the three scale channels.
    pub fn add_scale_keys(
        &mut self,
        bone_path: &str,
        keys: &[(f32, Vec3)],
    ) -> Result<&mut Self> {
        for (axis, channel) in Channel::SCALE.into_iter().enumerate() {
            let curve = keys.iter().map(|(t, v)| CurveKey::new(*t, v[axis])).collect();
            self.add_curve(bone_path, channel, curve)?;
        }
        Ok(self)
    }

    /// Bakes the collected curves.
    pub fn build(self) -> Result<(ClipStore, BoneSlotMap)> {
        let mut tracks = Vec::with_capacity(self.bones.len());
        let mut slots = BoneSlotMap {
            paths: Vec::with_capacity(self.bones.len()),
            slots: FxHashMap::default(),
        };

        for (slot, (symbol, curves)) in self.bones.iter().enumerate() {
            let bone_path = interner::resolve(*symbol);

            let position = group_track(bone_path, "Position", &Channel::POSITION, curves)?
                .map(|(times, values)| {
                    KeyframeTrack::new(times, values.into_iter().map(Vec3::from_array).collect())
                })
                .transpose()?
                .unwrap_or_default();

            let rotation = group_track(bone_path, "Rotation", &Channel::ROTATION, curves)?
                .map(|(times, values)| {
                    let values = normalized_rotations(bone_path, values)?;
                    KeyframeTrack::new(times, values)
                })
                .transpose()?
                .unwrap_or_default();

            let scale = group_track(bone_path, "Scale", &Channel::SCALE, curves)?
                .map(|(times, values)| {
                    KeyframeTrack::new(times, values.into_iter().map(Vec3::from_array).collect())
                })
                .transpose()?
                .unwrap_or_default();

            tracks.push(BoneTracks {
                position,
                rotation,
                scale,
            });
            slots.paths.push(*symbol);
            slots.slots.insert(*symbol, slot);
        }

        let store = ClipStore::new(self.name, self.duration, self.speed, tracks)?;
        log::info!(
            "Built clip '{}': {} bone slots, {:.3}s",
            store.name(),
            store.slot_count(),
            store.duration()
        );
        Ok((store, slots))
    }
}

/// Zips the sibling channels of one group into `N`-component keys.
///
/// Returns `Ok(None)` when the bone has no curve in this group at all.
fn group_track<const N: usize>(
    bone_path: &str,
    group: &'static str,
    channels: &[Channel; N],
    curves: &BoneCurves,
) -> Result<Option<(Vec<f32>, Vec<[f32; N]>)>> {
    let parts: [Option<&Vec<CurveKey>>; N] =
        std::array::from_fn(|i| curves.channels[channels[i].index()].as_ref());

    if parts.iter().all(Option::is_none) {
        return Ok(None);
    }

    let mut present: [&[CurveKey]; N] = [&[]; N];
    for (i, part) in parts.iter().enumerate() {
        match part {
            Some(keys) => present[i] = keys.as_slice(),
            None => {
                return Err(OssaError::MissingChannel {
                    bone_path: bone_path.to_string(),
                    group,
                    channel: channels[i].name(),
                });
            }
        }
    }

    let expected = present[0].len();
    for (i, keys) in present.iter().enumerate().skip(1) {
        if keys.len() != expected {
            return Err(OssaError::ChannelLengthMismatch {
                bone_path: bone_path.to_string(),
                group,
                channel: channels[i].name(),
                expected,
                found: keys.len(),
            });
        }
    }

    // Key times come from the first channel of the group.
    let times: Vec<f32> = present[0].iter().map(|k| k.time).collect();
    let drifted = present[1..].iter().any(|keys| {
        keys.iter()
            .zip(&times)
            .any(|(k, t)| (k.time - t).abs() > TIME_DRIFT_EPSILON)
    });
    if drifted {
        log::warn!(
            "{group} curves of '{bone_path}' have differing key times; using {} times",
            channels[0].name()
        );
    }

    for (c, keys) in present.iter().enumerate() {
        if let Some(index) = keys.iter().position(|k| !k.value.is_finite()) {
            return Err(OssaError::InvalidKeyValue {
                bone_path: bone_path.to_string(),
                channel: channels[c].name(),
                index,
            });
        }
    }

    let values = (0..expected)
        .map(|k| std::array::from_fn(|c| present[c][k].value))
        .collect();

    Ok(Some((times, values)))
}

fn normalized_rotations(bone_path: &str, values: Vec<[f32; 4]>) -> Result<Vec<Quat>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, v)| {
            let q = Quat::from_array(v);
            if q.length_squared() < MIN_ROTATION_LENGTH_SQUARED {
                return Err(OssaError::DegenerateRotation {
                    bone_path: bone_path.to_string(),
                    index,
                });
            }
            Ok(q.normalize())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(f32, f32)]) -> Vec<CurveKey> {
        pairs.iter().map(|&(t, v)| CurveKey::new(t, v)).collect()
    }

    #[test]
    fn slots_follow_first_seen_order() {
        let mut builder = ClipBuilder::new("walk", 1.0);
        builder
            .add_position_keys("root/hips", &[(0.0, Vec3::ZERO)])
            .unwrap();
        builder
            .add_rotation_keys("root/hips/spine", &[(0.0, Quat::IDENTITY)])
            .unwrap();
        builder
            .add_scale_keys("root/hips", &[(0.0, Vec3::ONE)])
            .unwrap();

        let (store, slots) = builder.build().unwrap();
        assert_eq!(store.slot_count(), 2);
        assert_eq!(slots.slot("root/hips"), Some(0));
        assert_eq!(slots.slot("root/hips/spine"), Some(1));
        assert_eq!(slots.path(1), Some("root/hips/spine"));

        let hips = store.bone(0).unwrap();
        assert_eq!(hips.position.len(), 1);
        assert!(hips.rotation.is_empty());
        assert_eq!(hips.scale.len(), 1);
    }

    #[test]
    fn mismatched_position_lengths_fail() {
        let mut builder = ClipBuilder::new("bad", 1.0);
        builder
            .add_curve("bone", Channel::PositionX, keys(&[(0.0, 0.0), (1.0, 1.0)]))
            .unwrap();
        builder
            .add_curve("bone", Channel::PositionY, keys(&[(0.0, 0.0)]))
            .unwrap();
        builder
            .add_curve("bone", Channel::PositionZ, keys(&[(0.0, 0.0), (1.0, 1.0)]))
            .unwrap();

        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            OssaError::ChannelLengthMismatch {
                channel: "position.y",
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn mismatched_rotation_w_fails() {
        let mut builder = ClipBuilder::new("bad", 1.0);
        for channel in [Channel::RotationX, Channel::RotationY, Channel::RotationZ] {
            builder
                .add_curve("bone", channel, keys(&[(0.0, 0.0), (0.5, 0.0)]))
                .unwrap();
        }
        builder
            .add_curve("bone", Channel::RotationW, keys(&[(0.0, 1.0)]))
            .unwrap();

        assert!(matches!(
            builder.build().unwrap_err(),
            OssaError::ChannelLengthMismatch {
                channel: "rotation.w",
                ..
            }
        ));
    }

    #[test]
    fn partial_group_is_missing_channel() {
        let mut builder = ClipBuilder::new("bad", 1.0);
        builder
            .add_curve("bone", Channel::ScaleX, keys(&[(0.0, 1.0)]))
            .unwrap();
        assert!(matches!(
            builder.build().unwrap_err(),
            OssaError::MissingChannel {
                channel: "scale.y",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_curve_is_rejected() {
        let mut builder = ClipBuilder::new("dup", 1.0);
        builder
            .add_curve("bone", Channel::PositionX, keys(&[(0.0, 0.0)]))
            .unwrap();
        let err = builder
            .add_curve("bone", Channel::PositionX, keys(&[(0.0, 1.0)]))
            .unwrap_err();
        assert!(matches!(err, OssaError::DuplicateCurve { .. }));
    }

    #[test]
    fn rotation_keys_are_normalized() {
        let mut builder = ClipBuilder::new("spin", 1.0);
        builder
            .add_rotation_keys("bone", &[(0.0, Quat::from_xyzw(0.0, 0.0, 0.0, 2.0))])
            .unwrap();
        let (store, _) = builder.build().unwrap();
        let q = store.bone(0).unwrap().rotation.values()[0];
        assert!((q.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_length_rotation_is_rejected() {
        let mut builder = ClipBuilder::new("spin", 1.0);
        builder
            .add_rotation_keys(
                "bone",
                &[
                    (0.0, Quat::IDENTITY),
                    (0.5, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)),
                ],
            )
            .unwrap();
        assert!(matches!(
            builder.build().unwrap_err(),
            OssaError::DegenerateRotation { index: 1, .. }
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut builder = ClipBuilder::new("bad", 1.0);
        builder
            .add_position_keys("bone", &[(0.0, Vec3::ZERO), (1.0, Vec3::new(0.0, f32::NAN, 0.0))])
            .unwrap();
        assert!(matches!(
            builder.build().unwrap_err(),
            OssaError::InvalidKeyValue {
                channel: "position.y",
                index: 1,
                ..
            }
        ));

        let mut builder = ClipBuilder::new("bad", 1.0);
        builder
            .add_curve("bone", Channel::RotationX, keys(&[(0.0, f32::INFINITY)]))
            .unwrap();
        for channel in [Channel::RotationY, Channel::RotationZ, Channel::RotationW] {
            builder
                .add_curve("bone", channel, keys(&[(0.0, 1.0)]))
                .unwrap();
        }
        assert!(matches!(
            builder.build().unwrap_err(),
            OssaError::InvalidKeyValue {
                channel: "rotation.x",
                ..
            }
        ));
    }
}
