//! The skeleton+motion aggregate: exclusive owner of all joints, channels
//! and the frame matrix, and the single entry point for loading, building,
//! querying and saving.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::WriteConfig;
use crate::data::{Channel, Joint};
use crate::error::BvhError;
use crate::ids::{ChannelId, JointId};
use crate::parse;
use crate::transform::{self, JointTransform};
use crate::write;

/// One BVH file in memory.
///
/// The aggregate starts empty and is populated either by [`BvhFile::open`]
/// (two-pass parse: hierarchy, then motion) or programmatically via
/// [`BvhFile::set_skeleton`]/[`BvhFile::set_motion`]; both origins behave
/// identically once built. Loading is atomic: a failed load leaves the
/// aggregate cleared, never half-filled.
///
/// All mutation requires `&mut self`; transform and accessor queries take
/// `&self` and are therefore freely parallel once loading has finished.
#[derive(Debug, Default)]
pub struct BvhFile {
    pub(crate) path: PathBuf,
    pub(crate) motion_name: String,
    pub(crate) load_success: bool,
    pub(crate) joints: Vec<Joint>,
    pub(crate) channels: Vec<Channel>,
    pub(crate) joint_index: HashMap<String, JointId>,
    pub(crate) num_channel: usize,
    pub(crate) num_frame: usize,
    pub(crate) interval: f64,
    pub(crate) motion: Vec<f64>,
}

impl BvhFile {
    /// Bind an empty aggregate to a file path. Nothing is read until `open`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Convenience over [`BvhFile::new`] + [`BvhFile::open`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, BvhError> {
        let mut file = Self::new(path);
        file.open()?;
        Ok(file)
    }

    /// Read and parse the bound file.
    ///
    /// On success the motion name is the file stem (directory and extension
    /// stripped). On any failure the aggregate is left cleared and
    /// `is_load_success` stays false.
    pub fn open(&mut self) -> Result<(), BvhError> {
        self.clear();
        let src = fs::read_to_string(&self.path).map_err(|source| BvhError::FileNotOpenable {
            path: self.path.clone(),
            source,
        })?;
        self.read_str(&src)?;
        self.motion_name = motion_name_of(&self.path);
        Ok(())
    }

    /// Parse BVH text from memory. Same atomicity as [`BvhFile::open`]; the
    /// motion name is left empty.
    pub fn read_str(&mut self, src: &str) -> Result<(), BvhError> {
        self.clear();
        match parse::read_into(self, src) {
            Ok(()) => {
                self.load_success = true;
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    /// Drop every joint, channel and motion sample and reset the scalars.
    /// The bound path is kept so the aggregate can be re-opened.
    pub fn clear(&mut self) {
        self.motion_name.clear();
        self.load_success = false;
        self.joints.clear();
        self.channels.clear();
        self.joint_index.clear();
        self.num_channel = 0;
        self.num_frame = 0;
        self.interval = 0.0;
        self.motion.clear();
    }

    /// Populate the aggregate in one call: skeleton clone plus motion matrix.
    pub fn init(
        &mut self,
        name: Option<&str>,
        joints: &[Joint],
        channels: &[Channel],
        num_frame: usize,
        interval: f64,
        motion: Option<&[f64]>,
    ) -> Result<(), BvhError> {
        self.set_skeleton(name, joints, channels)?;
        self.set_motion(num_frame, interval, motion);
        self.load_success = true;
        Ok(())
    }

    /// Deep-clone an externally built skeleton into this aggregate.
    ///
    /// Two passes: first every cross reference is resolved through the
    /// `index` fields of the supplied records and validated (records stored
    /// at their own index, ids in range, exactly one root), then the arenas
    /// are adopted and the name lookup rebuilt. Supplied slices are copied,
    /// never aliased.
    pub fn set_skeleton(
        &mut self,
        name: Option<&str>,
        joints: &[Joint],
        channels: &[Channel],
    ) -> Result<(), BvhError> {
        self.clear();

        for (i, channel) in channels.iter().enumerate() {
            if channel.index != i {
                return Err(BvhError::InvalidSkeleton(format!(
                    "channel at position {i} carries index {}",
                    channel.index
                )));
            }
            if channel.joint.idx() >= joints.len() {
                return Err(BvhError::InvalidSkeleton(format!(
                    "channel {i} references joint {} of {}",
                    channel.joint.0,
                    joints.len()
                )));
            }
        }

        let mut roots = 0usize;
        for (i, joint) in joints.iter().enumerate() {
            if joint.index != i {
                return Err(BvhError::InvalidSkeleton(format!(
                    "joint at position {i} carries index {}",
                    joint.index
                )));
            }
            match joint.parent {
                None => roots += 1,
                Some(parent) if parent.idx() >= joints.len() => {
                    return Err(BvhError::InvalidSkeleton(format!(
                        "joint {i} references parent {} of {}",
                        parent.0,
                        joints.len()
                    )));
                }
                Some(_) => {}
            }
            for &child in &joint.children {
                if child.idx() >= joints.len() {
                    return Err(BvhError::InvalidSkeleton(format!(
                        "joint {i} references child {} of {}",
                        child.0,
                        joints.len()
                    )));
                }
            }
            for &cid in &joint.channels {
                if cid.idx() >= channels.len() {
                    return Err(BvhError::InvalidSkeleton(format!(
                        "joint {i} references channel {} of {}",
                        cid.0,
                        channels.len()
                    )));
                }
            }
        }
        if roots != 1 {
            return Err(BvhError::InvalidSkeleton(format!(
                "expected exactly one root joint, found {roots}"
            )));
        }

        if let Some(name) = name {
            self.motion_name = name.to_owned();
        }
        self.joints = joints.to_vec();
        self.channels = channels.to_vec();
        self.num_channel = channels.len();
        for joint in &self.joints {
            if !joint.name.is_empty() {
                self.joint_index
                    .insert(joint.name.clone(), JointId(joint.index as u32));
            }
        }
        Ok(())
    }

    /// Attach a motion matrix of `num_frame` rows by `num_channels` columns.
    /// With `None` the matrix is zero-filled.
    ///
    /// # Panics
    ///
    /// Panics if a supplied buffer length differs from
    /// `num_frame * num_channels`.
    pub fn set_motion(&mut self, num_frame: usize, interval: f64, motion: Option<&[f64]>) {
        self.num_frame = num_frame;
        self.interval = interval;
        let len = num_frame * self.num_channel;
        match motion {
            Some(data) => {
                assert_eq!(
                    data.len(),
                    len,
                    "motion buffer length does not match {num_frame} frames x {} channels",
                    self.num_channel
                );
                self.motion = data.to_vec();
            }
            None => self.motion = vec![0.0; len],
        }
    }

    /// Reconstruct the local transform of `joint` at `frame`.
    ///
    /// Pure: identical arguments on an unmutated aggregate return
    /// bit-identical results. The result never composes parents.
    ///
    /// # Panics
    ///
    /// Panics if `frame` or `joint` is out of range; range violations are a
    /// caller error, not a recoverable condition.
    pub fn get_transform(&self, frame: usize, joint: JointId) -> JointTransform {
        assert!(
            frame < self.num_frame,
            "frame {frame} out of range ({} frames)",
            self.num_frame
        );
        assert!(
            joint.idx() < self.joints.len(),
            "joint {} out of range ({} joints)",
            joint.0,
            self.joints.len()
        );
        transform::local_transform(self, frame, joint)
    }

    /// Serialize back to the bound path with the default layout.
    pub fn save(&self) -> Result<(), BvhError> {
        self.save_to(&self.path)
    }

    /// Serialize to an explicit path with the default layout.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), BvhError> {
        self.save_with(path, &WriteConfig::default())
    }

    pub fn save_with(&self, path: impl AsRef<Path>, cfg: &WriteConfig) -> Result<(), BvhError> {
        let text = self.write_string_with(cfg)?;
        debug!("saving {} bytes to {:?}", text.len(), path.as_ref());
        fs::write(path.as_ref(), text).map_err(|source| BvhError::FileNotOpenable {
            path: path.as_ref().to_owned(),
            source,
        })
    }

    /// Render the canonical text form without touching the filesystem.
    pub fn write_string(&self) -> Result<String, BvhError> {
        self.write_string_with(&WriteConfig::default())
    }

    pub fn write_string_with(&self, cfg: &WriteConfig) -> Result<String, BvhError> {
        write::write_string(self, cfg)
    }

    pub fn is_load_success(&self) -> bool {
        self.load_success
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn motion_name(&self) -> &str {
        &self.motion_name
    }

    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// # Panics
    /// Panics if `id` is out of range.
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.idx()]
    }

    /// Name lookup; duplicate names resolve to the last definition.
    pub fn joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.joint_index.get(name).map(|&id| &self.joints[id.idx()])
    }

    /// The root joint, if a skeleton is present.
    pub fn root(&self) -> Option<&Joint> {
        self.joints.iter().find(|j| j.parent.is_none())
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// # Panics
    /// Panics if `id` is out of range.
    pub fn channel(&self, id: ChannelId) -> &Channel {
        &self.channels[id.idx()]
    }

    pub fn num_frames(&self) -> usize {
        self.num_frame
    }

    /// Seconds per frame.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Raw frame-matrix cell.
    ///
    /// # Panics
    /// Panics if `frame` or `channel` is out of range.
    pub fn motion(&self, frame: usize, channel: usize) -> f64 {
        assert!(frame < self.num_frame, "frame {frame} out of range");
        assert!(channel < self.num_channel, "channel {channel} out of range");
        self.motion[frame * self.num_channel + channel]
    }

    /// Overwrite one frame-matrix cell.
    ///
    /// # Panics
    /// Panics if `frame` or `channel` is out of range.
    pub fn set_motion_value(&mut self, frame: usize, channel: usize, value: f64) {
        assert!(frame < self.num_frame, "frame {frame} out of range");
        assert!(channel < self.num_channel, "channel {channel} out of range");
        self.motion[frame * self.num_channel + channel] = value;
    }
}

/// The motion name is the file stem: text between the last path separator
/// and the last dot.
fn motion_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
