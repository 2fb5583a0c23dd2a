//! Builds an [`Armature`] and [`Action`] out of a BVH motion capture file.

use std::collections::HashMap;

use bvh_anim::{from_bytes, Bvh, ChannelType};
use cgmath::{Deg, Matrix4, Vector3};
use log::*;

use crate::error::{Error, Result};
use crate::euler::RotationOrder;
use crate::rig::{Armature, Bone};
use crate::{Action, Axis, Channel, Keyframe, Property};

#[derive(Debug, PartialEq, Clone)]
pub struct BvhOptions {
    /// Frame number given to the first BVH frame.
    pub start_frame: i32,
    /// XYZ euler rotation of the armature object, in degrees.
    pub world_rotation: [f32; 3],
    /// BVH joint name to bone name.
    pub rename: HashMap<String, String>,
}

impl Default for BvhOptions {
    fn default() -> Self {
        Self {
            start_frame: 1,
            // stands the Y-up capture upright in Z-up armature space
            world_rotation: [90., 0., 0.],
            rename: HashMap::new(),
        }
    }
}

impl BvhOptions {
    fn bone_name(&self, joint: String) -> String {
        self.rename.get(&joint).cloned().unwrap_or(joint)
    }
}

pub fn load_bvh(data: &[u8], clip_name: &str, options: &BvhOptions) -> Result<(Armature, Action)> {
    let bvh = from_bytes(data).map_err(|e| Error::Bvh(e.to_string()))?;
    Ok(convert(&bvh, clip_name, options))
}

fn convert(bvh: &Bvh, clip_name: &str, options: &BvhOptions) -> (Armature, Action) {
    let [rx, ry, rz] = options.world_rotation;
    let world = RotationOrder::XYZ.to_matrix([Deg(rx).into(), Deg(ry).into(), Deg(rz).into()]);
    let mut armature = Armature {
        world: Matrix4::from(world),
        bones: vec![],
    };
    let mut action = Action::new(clip_name);

    for joint in bvh.joints() {
        let data = joint.data();
        let name = options.bone_name(data.name().to_string());
        let parent = joint.parent().and_then(|p| {
            let parent = options.bone_name(p.data().name().to_string());
            armature.find(&parent)
        });
        if parent.is_none() && !armature.bones.is_empty() {
            warn!("joint `{}` has no parent in the armature, treating it as a root", name);
        }

        let mut rotations = vec![];
        for chan in data.channels() {
            let property = match chan.channel_type() {
                ChannelType::PositionX => Property::Location(Axis::X),
                ChannelType::PositionY => Property::Location(Axis::Y),
                ChannelType::PositionZ => Property::Location(Axis::Z),
                ChannelType::RotationX => Property::Rotation(Axis::X),
                ChannelType::RotationY => Property::Rotation(Axis::Y),
                ChannelType::RotationZ => Property::Rotation(Axis::Z),
            };
            if let Property::Rotation(axis) = property {
                rotations.push(axis);
            }
            let keyframes = bvh
                .frames()
                .map(|frame| frame[chan])
                .enumerate()
                .map(|(i, value)| Keyframe {
                    frame: (options.start_frame + i as i32) as f32,
                    value: match property {
                        Property::Rotation(_) => value.to_radians(),
                        Property::Location(_) => value,
                    },
                })
                .collect();
            action.channels.push(Channel::new(&name, property, keyframes));
        }

        let offset = data.offset();
        trace!("adding `{}` under {:?}", name, parent);
        armature.bones.push(Bone {
            name,
            parent,
            offset: Vector3::new(offset.x, offset.y, offset.z),
            rotation_order: rotation_order(&rotations),
        });
    }

    (armature, action)
}

/// BVH lists rotation channels outermost first; the last listed applies first.
fn rotation_order(listed: &[Axis]) -> RotationOrder {
    let mut order: Vec<Axis> = listed.iter().rev().cloned().collect();
    for axis in Axis::ALL.iter() {
        if !order.contains(axis) {
            order.push(*axis);
        }
    }
    RotationOrder([order[0], order[1], order[2]])
}
