//! Recursive-descent parser for the BVH text grammar.
//!
//! The format mixes line-oriented and token-oriented parsing: the hierarchy
//! section is a brace-scoped tree walked with an explicit stack of joint
//! scopes, and the motion section is a pair of header lines followed by a
//! dense numeric matrix. Both passes fill the same aggregate; the caller
//! (`BvhFile::read_str`) is responsible for clearing it on failure.

use std::str::Lines;

use log::debug;

use crate::data::{Channel, ChannelType, Joint};
use crate::error::BvhError;
use crate::file::BvhFile;
use crate::ids::{ChannelId, JointId};

/// Token separators of the format: space, colon, comma, tab.
const SEPARATORS: &[char] = &[' ', ':', ',', '\t'];

pub(crate) fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split(SEPARATORS).filter(|t| !t.is_empty())
}

pub(crate) fn read_into(file: &mut BvhFile, src: &str) -> Result<(), BvhError> {
    let mut lines = src.lines();
    parse_hierarchy(file, &mut lines)?;
    parse_motion(file, &mut lines)?;
    debug!(
        "parsed {} joints, {} channels, {} frames",
        file.joints.len(),
        file.channels.len(),
        file.num_frame
    );
    Ok(())
}

fn parse_hierarchy(file: &mut BvhFile, lines: &mut Lines<'_>) -> Result<(), BvhError> {
    // Scope stack of "current joint"; `{` pushes and promotes the joint the
    // preceding name line introduced, `}` pops. An End Site block re-targets
    // the enclosing joint instead of creating a node.
    let mut stack: Vec<Option<JointId>> = Vec::new();
    let mut current: Option<JointId> = None;
    let mut newest: Option<JointId> = None;
    let mut in_site = false;

    for line in lines {
        let mut tokens = tokenize(line);
        let Some(first) = tokens.next() else {
            continue;
        };

        match first {
            "{" => {
                stack.push(current);
                current = newest;
            }
            "}" => {
                current = stack.pop().ok_or_else(|| {
                    BvhError::MalformedHierarchy("unmatched closing brace".to_owned())
                })?;
                in_site = false;
            }
            "ROOT" | "JOINT" => {
                if current.is_none() && !file.joints.is_empty() {
                    return Err(BvhError::MalformedHierarchy(
                        "more than one top-level joint".to_owned(),
                    ));
                }
                let id = JointId(file.joints.len() as u32);
                let mut joint = Joint::new(file.joints.len(), current);
                // The name runs to the end of the line and may embed
                // separators, so plain token splitting would cut it short.
                joint.name = joint_name(line, first)
                    .ok_or_else(|| {
                        BvhError::MalformedHierarchy(format!("{first} line has no joint name"))
                    })?
                    .to_owned();
                if let Some(parent) = current {
                    file.joints[parent.idx()].children.push(id);
                }
                // Duplicate names keep the last definition.
                file.joint_index.insert(joint.name.clone(), id);
                file.joints.push(joint);
                newest = Some(id);
            }
            "End" => {
                newest = current;
                in_site = true;
            }
            "OFFSET" => {
                let id = scope_joint(current, "OFFSET")?;
                let x = next_f64(&mut tokens, "OFFSET")?;
                let y = next_f64(&mut tokens, "OFFSET")?;
                let z = next_f64(&mut tokens, "OFFSET")?;
                let joint = &mut file.joints[id.idx()];
                if in_site {
                    joint.has_site = true;
                    joint.site = [x, y, z];
                } else {
                    joint.offset = [x, y, z];
                }
            }
            "CHANNELS" => {
                let id = scope_joint(current, "CHANNELS")?;
                let count = tokens
                    .next()
                    .ok_or_else(|| {
                        BvhError::MalformedHierarchy("CHANNELS line has no count".to_owned())
                    })?
                    .parse::<usize>()
                    .map_err(|_| {
                        BvhError::MalformedHierarchy("CHANNELS count is not a number".to_owned())
                    })?;
                for _ in 0..count {
                    let token = tokens.next().ok_or_else(|| {
                        BvhError::MalformedHierarchy(format!(
                            "CHANNELS declares {count} types but lists fewer"
                        ))
                    })?;
                    let ty = ChannelType::from_token(token).ok_or_else(|| {
                        BvhError::MalformedHierarchy(format!(
                            "unrecognized channel type {token:?}"
                        ))
                    })?;
                    let cid = ChannelId(file.channels.len() as u32);
                    file.channels.push(Channel {
                        joint: id,
                        ty,
                        index: cid.idx(),
                    });
                    file.joints[id.idx()].channels.push(cid);
                }
            }
            "MOTION" => {
                if !stack.is_empty() {
                    return Err(BvhError::MalformedHierarchy(
                        "unclosed joint scope at MOTION marker".to_owned(),
                    ));
                }
                if file.joints.is_empty() {
                    return Err(BvhError::MalformedHierarchy(
                        "no joints defined before MOTION marker".to_owned(),
                    ));
                }
                file.num_channel = file.channels.len();
                return Ok(());
            }
            // HIERARCHY header and anything else outside the keyword set.
            _ => {}
        }
    }

    Err(BvhError::MalformedHierarchy(
        "end of input before MOTION marker".to_owned(),
    ))
}

fn parse_motion(file: &mut BvhFile, lines: &mut Lines<'_>) -> Result<(), BvhError> {
    // The two header lines are matched independently, not positionally.
    let num_frame = loop {
        let Some(line) = lines.next() else {
            return Err(BvhError::MalformedMotionHeader(
                "missing Frames line".to_owned(),
            ));
        };
        let mut tokens = tokenize(line);
        if tokens.next() != Some("Frames") {
            continue;
        }
        let token = tokens.next().ok_or_else(|| {
            BvhError::MalformedMotionHeader("Frames line has no count".to_owned())
        })?;
        break token.parse::<usize>().map_err(|_| {
            BvhError::MalformedMotionHeader(format!("bad frame count {token:?}"))
        })?;
    };

    // "Frame Time" embeds a space, so it is matched on the text before the
    // first colon rather than on a single token.
    let interval = loop {
        let Some(line) = lines.next() else {
            return Err(BvhError::MalformedMotionHeader(
                "missing Frame Time line".to_owned(),
            ));
        };
        let Some((head, rest)) = line.split_once(':') else {
            continue;
        };
        if head.trim() != "Frame Time" {
            continue;
        }
        let token = tokenize(rest).next().ok_or_else(|| {
            BvhError::MalformedMotionHeader("Frame Time line has no value".to_owned())
        })?;
        break token.parse::<f64>().map_err(|_| {
            BvhError::MalformedMotionHeader(format!("bad frame time {token:?}"))
        })?;
    };

    file.num_frame = num_frame;
    file.interval = interval;
    file.motion = vec![0.0; num_frame * file.num_channel];

    for frame in 0..num_frame {
        let Some(line) = lines.next() else {
            return Err(BvhError::TruncatedMotionData(format!(
                "expected {num_frame} frame lines, found {frame}"
            )));
        };
        let mut tokens = tokenize(line);
        for column in 0..file.num_channel {
            let token = tokens.next().ok_or_else(|| {
                BvhError::TruncatedMotionData(format!(
                    "frame {frame} has {column} of {} values",
                    file.num_channel
                ))
            })?;
            let value = token.parse::<f64>().map_err(|_| {
                BvhError::TruncatedMotionData(format!(
                    "frame {frame} value {token:?} is not a number"
                ))
            })?;
            file.motion[frame * file.num_channel + column] = value;
        }
    }

    Ok(())
}

/// The joint name is the remainder of the line after the keyword, with
/// leading separators stripped; embedded spaces are part of the name.
fn joint_name<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.trim_start_matches(SEPARATORS)[keyword.len()..]
        .trim_start_matches(SEPARATORS)
        .trim_end();
    (!rest.is_empty()).then_some(rest)
}

fn scope_joint(current: Option<JointId>, keyword: &str) -> Result<JointId, BvhError> {
    current.ok_or_else(|| {
        BvhError::MalformedHierarchy(format!("{keyword} outside of a joint scope"))
    })
}

fn next_f64<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<f64, BvhError> {
    let token = tokens
        .next()
        .ok_or_else(|| BvhError::MalformedHierarchy(format!("{what} line is missing a value")))?;
    token
        .parse::<f64>()
        .map_err(|_| BvhError::MalformedHierarchy(format!("bad {what} value {token:?}")))
}
