//! Converts keyframed armature animation into Slashblade's table-literal
//! animation text.

pub mod bvh;
pub mod document;
mod error;
pub mod euler;
pub mod export;
pub mod keyframes;
pub mod pose;
pub mod read;
pub mod rig;
mod write;

pub use document::{serialize, Angle, AnimDocument, KeyframeBlock, RenderOptions};
pub use error::{Error, Result};
pub use export::{export, output_path};
pub use keyframes::extract_keyframes;
pub use pose::{PoseBone, PoseSource};

/// Bone slots of a Slashblade keyframe, in output order.
pub const BONE_ORDER: [&str; 9] = [
    "Torso",
    "UpperArm_Left",
    "ForeArm_Left",
    "Hand_Left",
    "Hand_Flipped_Left",
    "UpperArm_Right",
    "ForeArm_Right",
    "Hand_Right",
    "Sword",
];

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Property {
    Location(Axis),
    Rotation(Axis),
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct ChannelTarget {
    pub bone: String,
    pub property: Property,
}

#[derive(Debug, Default, PartialEq, PartialOrd, Clone, Copy)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
}

/// One animated property of one bone.
#[derive(Debug, PartialEq, Clone)]
pub struct Channel {
    pub target: ChannelTarget,
    pub keyframes: Vec<Keyframe>,
}

impl Channel {
    pub fn new(bone: &str, property: Property, keyframes: Vec<Keyframe>) -> Self {
        let target = ChannelTarget {
            bone: bone.to_owned(),
            property,
        };
        Self { target, keyframes }
    }

    /// Linear interpolation between keyframe points, held flat outside them.
    pub fn evaluate(&self, frame: f32) -> Option<f32> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        if frame <= first.frame {
            return Some(first.value);
        }
        if frame >= last.frame {
            return Some(last.value);
        }
        let next = self.keyframes.iter().position(|k| k.frame > frame)?;
        let (k0, k1) = (self.keyframes[next - 1], self.keyframes[next]);
        let span = k1.frame - k0.frame;
        let factor = if span > 0. { (frame - k0.frame) / span } else { 0. };
        Some(k0.value + (k1.value - k0.value) * factor)
    }
}

/// An animation clip: every keyed channel of one armature.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Action {
    pub name: String,
    pub channels: Vec<Channel>,
}

impl Action {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            channels: vec![],
        }
    }
}
