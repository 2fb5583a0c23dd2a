use std::fmt;

use log::*;

use crate::error::{Error, Result};
use crate::pose::{orientation_of, FrameCursor, PoseSource};

/// Directory, relative to the project root, that Slashblade loads animations from.
pub const ANIM_DIR: &str = "slashblade_project/anim";

/// Hold length of the last keyframe, which has no successor to measure against.
pub const FINAL_HOLD: i32 = 1;

/// A bone orientation in degrees.
#[derive(Debug, Default, PartialEq, PartialOrd, Clone, Copy)]
pub struct Angle {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Angle {
    pub const ZERO: Self = Angle {
        x: 0.,
        y: 0.,
        z: 0.,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct KeyframeBlock {
    /// One per bone slot, in bone order.
    pub angles: Vec<Angle>,
    /// Frames until the next block.
    pub hold: i32,
    pub sword_out: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub struct AnimDocument {
    pub module_path: String,
    pub table_name: String,
    pub blocks: Vec<KeyframeBlock>,
}

/// The default renders the plain layout the exporter has always written, one
/// bare `Angle(...)` per line.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct RenderOptions {
    /// Bone names, one per angle line, trailing each as a `--` comment.
    pub annotate_bones: Option<Vec<String>>,
}

impl RenderOptions {
    pub fn annotated(bone_order: &[&str]) -> Self {
        Self {
            annotate_bones: Some(bone_order.iter().map(|&b| b.to_owned()).collect()),
        }
    }
}

/// `Slash Combo 1` -> `slash_combo_1`
pub fn module_name(clip: &str) -> String {
    clip.to_lowercase().replace(' ', "_")
}

/// `Slash Combo 1` -> `SLASH_COMBO_1`
pub fn table_name(clip: &str) -> String {
    clip.to_uppercase().replace(' ', "_")
}

pub fn module_path(clip: &str) -> String {
    format!("{}/{}", ANIM_DIR, module_name(clip))
}

impl AnimDocument {
    pub fn new(clip: &str, blocks: Vec<KeyframeBlock>) -> Self {
        Self {
            module_path: module_path(clip),
            table_name: table_name(clip),
            blocks,
        }
    }
}

impl fmt::Display for AnimDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .render(&RenderOptions::default())
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Samples `source` at every frame of `frames` and builds the document.
///
/// `frames` must be ascending. Bones of `bone_order` the skeleton lacks are
/// written as zero angles. The source is left on the frame it started on,
/// whether or not this succeeds.
pub fn serialize<S: PoseSource + ?Sized>(
    frames: &[i32],
    source: &mut S,
    bone_order: &[&str],
    clip_name: &str,
) -> Result<AnimDocument> {
    if frames.is_empty() {
        return Err(Error::NoKeyframes {
            clip: clip_name.to_owned(),
        });
    }

    let mut cursor = FrameCursor::new(source);
    debug!(
        "serializing `{}`: {} keyframe(s), cursor at {}",
        clip_name,
        frames.len(),
        cursor.original()
    );

    let mut blocks = Vec::with_capacity(frames.len());
    for (i, &frame) in frames.iter().enumerate() {
        cursor.seek(frame)?;

        let mut angles = Vec::with_capacity(bone_order.len());
        for &bone in bone_order {
            let angle = match orientation_of(cursor.source(), bone)? {
                Some(a) => a,
                None => {
                    debug!("bone `{}` not in skeleton, writing zero", bone);
                    Angle::ZERO
                }
            };
            angles.push(angle);
        }

        let hold = match frames.get(i + 1) {
            Some(&next) => next
                .checked_sub(frame)
                .ok_or(Error::HoldOverflow { frame, next })?,
            None => FINAL_HOLD,
        };
        blocks.push(KeyframeBlock {
            angles,
            hold,
            sword_out: true,
        });
    }

    cursor.restore()?;
    Ok(AnimDocument::new(clip_name, blocks))
}
