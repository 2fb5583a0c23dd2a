//! An in-memory armature that evaluates an [`Action`] frame by frame.

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use log::*;

use crate::error::Result;
use crate::euler::RotationOrder;
use crate::pose::{PoseBone, PoseSource};
use crate::{Action, Property};

#[derive(Debug, PartialEq, Clone)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    /// Rest position relative to the parent's head.
    pub offset: Vector3<f32>,
    pub rotation_order: RotationOrder,
}

impl Bone {
    pub fn new(name: &str, parent: Option<usize>) -> Self {
        Self {
            name: name.to_owned(),
            parent,
            offset: Vector3::new(0., 0., 0.),
            rotation_order: RotationOrder::XYZ,
        }
    }
}

/// Bones are stored parents first.
#[derive(Debug, PartialEq, Clone)]
pub struct Armature {
    pub world: Matrix4<f32>,
    pub bones: Vec<Bone>,
}

impl Default for Armature {
    fn default() -> Self {
        Self {
            world: Matrix4::identity(),
            bones: vec![],
        }
    }
}

impl Armature {
    pub fn find(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Appends a bone under `parent` and returns its index, or `None` without
    /// adding anything if `parent` is not already in the armature.
    pub fn push(&mut self, name: &str, parent: Option<&str>) -> Option<usize> {
        let parent = match parent {
            Some(p) => Some(self.find(p)?),
            None => None,
        };
        self.bones.push(Bone::new(name, parent));
        Some(self.bones.len() - 1)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Channels {
    location: [f32; 3],
    rotation: [f32; 3],
}

/// An armature posed by an action at a current frame.
///
/// Rotation channel values are radians.
#[derive(Debug, Clone)]
pub struct Scene {
    armature: Armature,
    action: Action,
    current_frame: i32,
    poses: Vec<Matrix4<f32>>,
}

impl Scene {
    pub fn new(armature: Armature, action: Action, frame: i32) -> Self {
        let mut scene = Self {
            poses: vec![Matrix4::identity(); armature.bones.len()],
            armature,
            action,
            current_frame: frame,
        };
        scene.evaluate();
        scene
    }

    pub fn armature(&self) -> &Armature {
        &self.armature
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Recomputes every bone's armature-space pose at the current frame.
    fn evaluate(&mut self) {
        let frame = self.current_frame as f32;
        let mut values = vec![Channels::default(); self.armature.bones.len()];
        for chan in &self.action.channels {
            let bone = match self.armature.find(&chan.target.bone) {
                Some(b) => b,
                None => {
                    trace!("channel for unknown bone `{}`", chan.target.bone);
                    continue;
                }
            };
            let value = match chan.evaluate(frame) {
                Some(v) => v,
                None => continue,
            };
            match chan.target.property {
                Property::Location(axis) => values[bone].location[axis.index()] = value,
                Property::Rotation(axis) => values[bone].rotation[axis.index()] = value,
            }
        }

        for (i, bone) in self.armature.bones.iter().enumerate() {
            let [x, y, z] = values[i].rotation;
            let rotation = bone.rotation_order.to_matrix([Rad(x), Rad(y), Rad(z)]);
            let local = Matrix4::from_translation(bone.offset + Vector3::from(values[i].location))
                * Matrix4::from(rotation);
            self.poses[i] = match bone.parent {
                Some(p) => self.poses[p] * local,
                None => local,
            };
        }
    }
}

impl PoseSource for Scene {
    fn current_frame(&self) -> i32 {
        self.current_frame
    }

    fn seek(&mut self, frame: i32) -> Result<()> {
        self.current_frame = frame;
        self.evaluate();
        Ok(())
    }

    fn world_matrix(&self) -> Matrix4<f32> {
        self.armature.world
    }

    fn pose_bone(&self, name: &str) -> Option<PoseBone> {
        let i = self.armature.find(name)?;
        let parent_matrix = self.armature.bones[i].parent.map(|p| self.poses[p]);
        Some(PoseBone {
            matrix: self.poses[i],
            parent_matrix,
        })
    }
}
