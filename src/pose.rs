use cgmath::{Matrix4, SquareMatrix};
use log::*;

use crate::document::Angle;
use crate::error::{Error, Result};
use crate::euler::{matrix_to_euler_xyz, rotation_part};

/// Correction between the armature's rest pitch and the one Slashblade expects.
pub const ROOT_PITCH_OFFSET: f64 = 90.0;

/// Armature-space transforms of one posed bone.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PoseBone {
    pub matrix: Matrix4<f32>,
    pub parent_matrix: Option<Matrix4<f32>>,
}

/// A scene that can be stepped to a frame and queried for bone transforms.
///
/// The scene has a single frame cursor; `seek` must not return before every
/// transform reflects the new frame.
pub trait PoseSource {
    fn current_frame(&self) -> i32;

    fn seek(&mut self, frame: i32) -> Result<()>;

    /// World transform of the armature object.
    fn world_matrix(&self) -> Matrix4<f32>;

    fn pose_bone(&self, name: &str) -> Option<PoseBone>;
}

/// Orientation of `name` at the source's current frame, `None` if the
/// skeleton has no such bone.
///
/// Child bones read relative to their parent. The root reads in world space
/// with [`ROOT_PITCH_OFFSET`] taken off its X angle.
pub fn orientation_of<S: PoseSource + ?Sized>(source: &S, name: &str) -> Result<Option<Angle>> {
    let bone = match source.pose_bone(name) {
        Some(b) => b,
        None => return Ok(None),
    };
    let angle = match bone.parent_matrix {
        Some(parent) => {
            let inverse = parent.invert().ok_or_else(|| Error::SingularMatrix {
                bone: name.to_owned(),
                frame: source.current_frame(),
            })?;
            to_degrees(&(inverse * bone.matrix))
        }
        None => {
            let mut angle = to_degrees(&(source.world_matrix() * bone.matrix));
            angle.x -= ROOT_PITCH_OFFSET;
            angle
        }
    };
    trace!("{}: {:?}", name, angle);
    Ok(Some(angle))
}

/// Widens to `f64` before converting, so the printed sixth decimal is exact.
fn to_degrees(m: &Matrix4<f32>) -> Angle {
    let e = matrix_to_euler_xyz(&rotation_part(m));
    Angle::new(
        f64::from(e.x.0).to_degrees(),
        f64::from(e.y.0).to_degrees(),
        f64::from(e.z.0).to_degrees(),
    )
}

/// Remembers the frame a source was on and puts it back.
///
/// `restore` reports a failed seek; dropping the cursor without restoring
/// (an early return on error) still seeks back and only logs a failure.
pub struct FrameCursor<'a, S: PoseSource + ?Sized> {
    source: &'a mut S,
    original: i32,
    restored: bool,
}

impl<'a, S: PoseSource + ?Sized> FrameCursor<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        let original = source.current_frame();
        Self {
            source,
            original,
            restored: false,
        }
    }

    pub fn original(&self) -> i32 {
        self.original
    }

    pub fn seek(&mut self, frame: i32) -> Result<()> {
        debug!("seeking to frame {}", frame);
        self.source.seek(frame)
    }

    pub fn source(&self) -> &S {
        &*self.source
    }

    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        self.source.seek(self.original)
    }
}

impl<'a, S: PoseSource + ?Sized> Drop for FrameCursor<'a, S> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.source.seek(self.original) {
            error!("failed to restore frame {}: {}", self.original, e);
        }
    }
}
