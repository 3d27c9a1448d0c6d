//! Canonical BVH writer.
//!
//! Pre-order traversal mirrors the parser: while emitting each joint's
//! CHANNELS line the writer records the channel's global index, and the
//! motion rows are pulled in that recorded order so the columns line up with
//! the channel order actually written.

use std::fmt::Write as _;

use crate::config::WriteConfig;
use crate::error::BvhError;
use crate::file::BvhFile;
use crate::ids::JointId;

pub(crate) fn write_string(file: &BvhFile, cfg: &WriteConfig) -> Result<String, BvhError> {
    let root = file
        .joints
        .iter()
        .position(|j| j.parent.is_none())
        .ok_or_else(|| BvhError::InvalidSkeleton("no root joint to save".to_owned()))?;

    let mut out = String::new();
    let mut order: Vec<usize> = Vec::with_capacity(file.num_channel);

    out.push_str("HIERARCHY\n");
    write_joint(file, cfg, JointId(root as u32), 0, &mut order, &mut out);

    let p = cfg.precision;
    out.push_str("MOTION\n");
    let _ = writeln!(out, "Frames: {}", file.num_frame);
    let _ = writeln!(out, "Frame Time: {:.p$}", file.interval);
    for frame in 0..file.num_frame {
        for (k, &column) in order.iter().enumerate() {
            if k > 0 {
                out.push_str("  ");
            }
            let _ = write!(out, "{:.p$}", file.motion[frame * file.num_channel + column]);
        }
        out.push('\n');
    }
    Ok(out)
}

fn write_joint(
    file: &BvhFile,
    cfg: &WriteConfig,
    id: JointId,
    depth: usize,
    order: &mut Vec<usize>,
    out: &mut String,
) {
    let joint = &file.joints[id.idx()];
    let pad = " ".repeat(cfg.indent * depth);
    let inner = " ".repeat(cfg.indent * (depth + 1));
    let p = cfg.precision;

    let keyword = if joint.parent.is_some() { "JOINT" } else { "ROOT" };
    let _ = writeln!(out, "{pad}{keyword}  {}", joint.name);
    let _ = writeln!(out, "{pad}{{");

    let _ = writeln!(
        out,
        "{inner}OFFSET  {:.p$}  {:.p$}  {:.p$}",
        joint.offset[0], joint.offset[1], joint.offset[2]
    );

    let _ = write!(out, "{inner}CHANNELS  {}", joint.channels.len());
    for &cid in &joint.channels {
        let channel = &file.channels[cid.idx()];
        let _ = write!(out, "  {}", channel.ty.token());
        order.push(channel.index);
    }
    out.push('\n');

    if joint.has_site {
        let site_pad = " ".repeat(cfg.indent * (depth + 2));
        let _ = writeln!(out, "{inner}End Site");
        let _ = writeln!(out, "{inner}{{");
        let _ = writeln!(
            out,
            "{site_pad}OFFSET  {:.p$}  {:.p$}  {:.p$}",
            joint.site[0], joint.site[1], joint.site[2]
        );
        let _ = writeln!(out, "{inner}}}");
    }

    for &child in &joint.children {
        write_joint(file, cfg, child, depth + 1, order, out);
    }

    let _ = writeln!(out, "{pad}}}");
}
