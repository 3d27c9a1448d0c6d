//! Per-frame, per-joint local transform reconstruction.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::data::ChannelType;
use crate::file::BvhFile;
use crate::ids::JointId;

/// A joint's rotation and translation relative to its parent's frame for one
/// motion frame. Scale is always identity and is therefore not carried.
/// Composing ancestor chains into world space is the caller's job.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointTransform {
    pub rotation: DQuat,
    pub translation: DVec3,
}

impl JointTransform {
    pub const IDENTITY: Self = Self {
        rotation: DQuat::IDENTITY,
        translation: DVec3::ZERO,
    };
}

pub(crate) fn local_transform(file: &BvhFile, frame: usize, joint: JointId) -> JointTransform {
    let width = file.num_channel;
    let row = &file.motion[frame * width..frame * width + width];
    let joint = &file.joints[joint.idx()];

    // The format's Y axis is mirrored relative to the target convention; the
    // sign flips on Y translation and on X/Z rotation are load-bearing.
    let mut translation = DVec3::new(joint.offset[0], -joint.offset[1], joint.offset[2]);
    let mut euler = DVec3::ZERO; // degrees

    for &cid in &joint.channels {
        let channel = &file.channels[cid.idx()];
        let value = row[channel.index];
        match channel.ty {
            ChannelType::XPosition => translation.x = value,
            ChannelType::YPosition => translation.y = -value,
            ChannelType::ZPosition => translation.z = value,
            ChannelType::ZRotation => euler.z = -value,
            ChannelType::YRotation => euler.y = value,
            ChannelType::XRotation => euler.x = -value,
        }
    }

    let rx = DQuat::from_rotation_x(euler.x.to_radians());
    let ry = DQuat::from_rotation_y(euler.y.to_radians());
    let rz = DQuat::from_rotation_z(euler.z.to_radians());

    JointTransform {
        // Z then Y then X is a convention of the format, not a choice.
        rotation: rz * ry * rx,
        translation,
    }
}
