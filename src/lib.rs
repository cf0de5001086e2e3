#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Ossa
//!
//! Crowd-scale skeletal animation. This crate re-exports the member crates
//! and provides [`AnimationWorld`], a reference host that sequences the
//! pose, drive and skin stages.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ossa::prelude::*;
//!
//! let mut clips = ClipLibrary::new();
//! clips.push_source(ClipSource::from_json(WALK_JSON)?)?;
//!
//! let mut world = AnimationWorld::default();
//! let walker = world.spawn_animator(Arc::new(clips));
//! world.attach(walker, &bone_names);
//! world.tick(1.0 / 60.0);
//! ```

pub mod world;

pub use ossa_animation as animation;
pub use ossa_core as foundation;
pub use ossa_skinning as skinning;

pub use glam;

pub use ossa_core::{AnimatorKey, BoneHandle, LocalTransform, OssaError, Result, SkinKey, Timer};
pub use ossa_core::interner;
pub use world::AnimationWorld;

pub mod prelude {
    pub use crate::world::AnimationWorld;
    pub use ossa_animation::{
        AnimationSettings, Animator, Binder, BoneBinding, BoneResolver, Channel, ClipBuilder,
        ClipLibrary, ClipSource, PlaybackPhase, PlaybackState, WrapMode,
    };
    pub use ossa_core::{AnimatorKey, BoneHandle, LocalTransform, OssaError, SkinKey};
    pub use ossa_skinning::{Skeleton, SkinMatrix, WorldTransformSource};
}
