//! Skeleton data model: joints, channels and channel types.

use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, JointId};

/// The six animated degrees of freedom a BVH channel can carry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    XRotation,
    YRotation,
    ZRotation,
    XPosition,
    YPosition,
    ZPosition,
}

impl ChannelType {
    /// Map a CHANNELS token to its type. The keywords are case-sensitive;
    /// an unrecognized token is a parse error upstream, never a default.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Xrotation" => Some(Self::XRotation),
            "Yrotation" => Some(Self::YRotation),
            "Zrotation" => Some(Self::ZRotation),
            "Xposition" => Some(Self::XPosition),
            "Yposition" => Some(Self::YPosition),
            "Zposition" => Some(Self::ZPosition),
            _ => None,
        }
    }

    /// The token the writer emits for this type.
    pub fn token(self) -> &'static str {
        match self {
            Self::XRotation => "Xrotation",
            Self::YRotation => "Yrotation",
            Self::ZRotation => "Zrotation",
            Self::XPosition => "Xposition",
            Self::YPosition => "Yposition",
            Self::ZPosition => "Zposition",
        }
    }
}

/// One scalar degree of freedom belonging to a joint.
///
/// `index` is the channel's position among all channels of the skeleton in
/// definition order, which doubles as its column in the frame matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub joint: JointId,
    pub ty: ChannelType,
    pub index: usize,
}

/// Node of the skeleton tree.
///
/// `index` is the joint's stable position in the arena (tree-definition
/// order). `site` is only meaningful while `has_site` is set: an End Site
/// block annotates its enclosing joint rather than creating a node of its
/// own. Channel order is significant and drives per-frame column order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub name: String,
    pub index: usize,
    pub parent: Option<JointId>,
    pub children: Vec<JointId>,
    pub offset: [f64; 3],
    pub has_site: bool,
    pub site: [f64; 3],
    pub channels: Vec<ChannelId>,
}

impl Joint {
    pub(crate) fn new(index: usize, parent: Option<JointId>) -> Self {
        Self {
            name: String::new(),
            index,
            parent,
            children: Vec::new(),
            offset: [0.0; 3],
            has_site: false,
            site: [0.0; 3],
            channels: Vec::new(),
        }
    }
}
