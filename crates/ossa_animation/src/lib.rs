//! Ossa Animation
//!
//! Baked keyframe clips, per-instance playback with cross-fades, and pose
//! blending.
//!
//! Clips are built once ([`ClipBuilder`], [`ClipSource`]) into immutable
//! [`ClipStore`]s collected in a [`ClipLibrary`]. Every animated instance owns
//! a small [`PlaybackState`]; each tick [`AnimationSystem`] samples and blends
//! the active clips into bone poses, then advances the playback clocks.

pub mod binding;
pub mod blend;
pub mod builder;
pub mod clip;
pub mod library;
pub mod playback;
pub mod sampler;
pub mod settings;
pub mod source;
pub mod system;
pub mod track;

pub use binding::{Binder, BoneBinding, BoneResolver};
pub use blend::BonePose;
pub use builder::{BoneSlotMap, Channel, ClipBuilder, CurveKey};
pub use clip::{BoneTracks, ClipStore};
pub use library::ClipLibrary;
pub use playback::{ClipPlayback, PlaybackPhase, PlaybackState};
pub use sampler::WrapMode;
pub use settings::AnimationSettings;
pub use source::{ClipSource, CurveSource};
pub use system::{AnimatedBone, AnimationSystem, Animator};
pub use track::KeyframeTrack;
