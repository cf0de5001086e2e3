//! Serialized clip sources.
//!
//! A [`ClipSource`] is the plain-data form of a clip as exported by an
//! authoring tool: raw scalar curves keyed by bone path and channel. It is
//! only used at build time and is converted through [`ClipBuilder`].
//!
//! ```json
//! {
//!   "name": "walk",
//!   "duration": 1.0,
//!   "speed": 1.0,
//!   "curves": [
//!     { "path": "Armature/Hips", "channel": "position.x",
//!       "keys": [ { "time": 0.0, "value": 0.0 }, { "time": 0.5, "value": 1.0 } ] }
//!   ]
//! }
//! ```

use ossa_core::Result;
use serde::{Deserialize, Serialize};

use crate::builder::{BoneSlotMap, Channel, ClipBuilder, CurveKey};
use crate::clip::ClipStore;

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSource {
    pub path: String,
    pub channel: Channel,
    pub keys: Vec<CurveKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSource {
    pub name: String,
    pub duration: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub curves: Vec<CurveSource>,
}

impl ClipSource {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_builder(self) -> Result<ClipBuilder> {
        let mut builder = ClipBuilder::new(self.name, self.duration).speed(self.speed);
        for curve in self.curves {
            builder.add_curve(&curve.path, curve.channel, curve.keys)?;
        }
        Ok(builder)
    }

    pub fn build(self) -> Result<(ClipStore, BoneSlotMap)> {
        self.into_builder()?.build()
    }
}
