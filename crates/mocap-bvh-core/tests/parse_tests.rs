use mocap_bvh_core::{BvhError, BvhFile, ChannelType, JointId};

const TWO_JOINT: &str = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0.0 0.0 0.0
    CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
    JOINT Spine
    {
        OFFSET 0.0 10.0 0.0
        CHANNELS 3 Zrotation Xrotation Yrotation
        End Site
        {
            OFFSET 0.0 5.0 0.0
        }
    }
}
MOTION
Frames: 1
Frame Time: 0.033333
0 0 0 0 0 0 0 0 0
";

fn parsed(src: &str) -> BvhFile {
    let mut file = BvhFile::new("fixture.bvh");
    file.read_str(src).expect("fixture parses");
    file
}

/// it should build the joint/channel tree of the two-joint scenario
#[test]
fn two_joint_scenario_shape() {
    let file = parsed(TWO_JOINT);
    assert!(file.is_load_success());
    assert_eq!(file.num_joints(), 2);
    assert_eq!(file.num_channels(), 9);
    assert_eq!(file.num_frames(), 1);
    assert!((file.interval() - 0.033333).abs() < 1e-9);

    let hips = file.joint(JointId(0));
    assert_eq!(hips.name, "Hips");
    assert_eq!(hips.parent, None);
    assert_eq!(hips.children, vec![JointId(1)]);
    assert_eq!(hips.offset, [0.0, 0.0, 0.0]);
    assert!(!hips.has_site);
    assert_eq!(hips.channels.len(), 6);

    let spine = file.joint(JointId(1));
    assert_eq!(spine.name, "Spine");
    assert_eq!(spine.parent, Some(JointId(0)));
    assert!(spine.children.is_empty());
    assert_eq!(spine.offset, [0.0, 10.0, 0.0]);
    assert!(spine.has_site);
    assert_eq!(spine.site, [0.0, 5.0, 0.0]);
    assert_eq!(spine.channels.len(), 3);

    let types: Vec<_> = file.channels().iter().map(|c| c.ty).collect();
    assert_eq!(
        types,
        vec![
            ChannelType::XPosition,
            ChannelType::YPosition,
            ChannelType::ZPosition,
            ChannelType::ZRotation,
            ChannelType::XRotation,
            ChannelType::YRotation,
            ChannelType::ZRotation,
            ChannelType::XRotation,
            ChannelType::YRotation,
        ]
    );
}

/// it should assign channel indices as a permutation, strictly increasing in tree order
#[test]
fn channel_index_permutation_invariant() {
    let file = parsed(TWO_JOINT);
    let mut seen = vec![false; file.num_channels()];
    for channel in file.channels() {
        assert!(!seen[channel.index], "duplicate channel index");
        seen[channel.index] = true;
    }
    assert!(seen.into_iter().all(|s| s));

    // Depth-first walk; concatenated per-joint indices must increase.
    let mut order = Vec::new();
    let mut stack = vec![JointId(0)];
    while let Some(id) = stack.pop() {
        let joint = file.joint(id);
        for &cid in &joint.channels {
            order.push(file.channel(cid).index);
        }
        for &child in joint.children.iter().rev() {
            stack.push(child);
        }
    }
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

/// it should keep exactly one parentless joint, with all others reachable from it
#[test]
fn single_root_invariant() {
    let file = parsed(TWO_JOINT);
    let roots: Vec<_> = file.joints().iter().filter(|j| j.parent.is_none()).collect();
    assert_eq!(roots.len(), 1);

    for joint in file.joints() {
        let mut id = JointId(joint.index as u32);
        let mut hops = 0;
        while let Some(parent) = file.joint(id).parent {
            id = parent;
            hops += 1;
            assert!(hops <= file.num_joints(), "cycle in parent links");
        }
        assert_eq!(file.joint(id).index, roots[0].index);
    }
}

/// it should keep embedded whitespace in joint names
#[test]
fn joint_names_keep_embedded_spaces() {
    let src = "\
HIERARCHY
ROOT Left Shoulder Blade
{
    OFFSET 1.0 2.0 3.0
    CHANNELS 3 Zrotation Xrotation Yrotation
}
MOTION
Frames: 1
Frame Time: 0.1
0 0 0
";
    let file = parsed(src);
    assert_eq!(file.joint(JointId(0)).name, "Left Shoulder Blade");
    assert!(file.joint_by_name("Left Shoulder Blade").is_some());
}

/// it should accept colon, comma and tab as token separators
#[test]
fn mixed_separators_tokenize() {
    let src = "\
HIERARCHY
ROOT Hips
{
\tOFFSET\t1.0,2.0,3.0
\tCHANNELS 3 Zrotation,Xrotation,Yrotation
}
MOTION
Frames: 2
Frame Time: 0.5
1.0,2.0,3.0
4.0\t5.0\t6.0
";
    let file = parsed(src);
    assert_eq!(file.joint(JointId(0)).offset, [1.0, 2.0, 3.0]);
    assert_eq!(file.motion(0, 1), 2.0);
    assert_eq!(file.motion(1, 2), 6.0);
}

/// it should resolve duplicate joint names to the last definition
#[test]
fn duplicate_names_last_definition_wins() {
    let src = "\
HIERARCHY
ROOT Twin
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Xrotation Yrotation
    JOINT Twin
    {
        OFFSET 0 1 0
        CHANNELS 3 Zrotation Xrotation Yrotation
    }
}
MOTION
Frames: 1
Frame Time: 0.1
0 0 0 0 0 0
";
    let file = parsed(src);
    assert_eq!(file.joint_by_name("Twin").unwrap().index, 1);
}

/// it should match Frames and Frame Time independently of intervening lines
#[test]
fn motion_headers_matched_independently() {
    let src = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Xrotation Yrotation
}
MOTION

Frames: 2
some stray line
Frame Time: 0.25
1 2 3
4 5 6
";
    let file = parsed(src);
    assert_eq!(file.num_frames(), 2);
    assert_eq!(file.interval(), 0.25);
    assert_eq!(file.motion(1, 0), 4.0);
}

/// it should fail without the MOTION marker and leave the aggregate cleared
#[test]
fn missing_motion_marker_fails_and_clears() {
    let src = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Xrotation Yrotation
}
";
    let mut file = BvhFile::new("broken.bvh");
    let err = file.read_str(src).unwrap_err();
    assert!(matches!(err, BvhError::MalformedHierarchy(_)));
    assert!(!file.is_load_success());
    assert_eq!(file.num_joints(), 0);
    assert_eq!(file.num_channels(), 0);
    assert_eq!(file.num_frames(), 0);
}

/// it should reject an unrecognized channel-type token instead of ignoring it
#[test]
fn unrecognized_channel_type_is_an_error() {
    let src = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Wrotation Yrotation
}
MOTION
Frames: 1
Frame Time: 0.1
0 0 0
";
    let mut file = BvhFile::new("broken.bvh");
    let err = file.read_str(src).unwrap_err();
    assert!(matches!(err, BvhError::MalformedHierarchy(_)));
    assert_eq!(file.num_joints(), 0);
}

/// it should reject a closing brace with an empty scope stack
#[test]
fn unmatched_closing_brace_is_an_error() {
    let src = "\
HIERARCHY
}
MOTION
";
    let mut file = BvhFile::new("broken.bvh");
    let err = file.read_str(src).unwrap_err();
    assert!(matches!(err, BvhError::MalformedHierarchy(_)));
}

/// it should reject a MOTION marker inside an unclosed joint scope
#[test]
fn unclosed_scope_at_motion_is_an_error() {
    let src = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Xrotation Yrotation
MOTION
Frames: 1
Frame Time: 0.1
0 0 0
";
    let mut file = BvhFile::new("broken.bvh");
    let err = file.read_str(src).unwrap_err();
    assert!(matches!(err, BvhError::MalformedHierarchy(_)));
}

/// it should report a missing Frames header as a motion-header error
#[test]
fn missing_frames_header_is_an_error() {
    let src = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Xrotation Yrotation
}
MOTION
Frame Time: 0.1
0 0 0
";
    let mut file = BvhFile::new("broken.bvh");
    let err = file.read_str(src).unwrap_err();
    assert!(matches!(err, BvhError::MalformedMotionHeader(_)));
}

/// it should report a missing Frame Time header as a motion-header error
#[test]
fn missing_frame_time_header_is_an_error() {
    let src = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Xrotation Yrotation
}
MOTION
Frames: 1
0 0 0
";
    let mut file = BvhFile::new("broken.bvh");
    let err = file.read_str(src).unwrap_err();
    assert!(matches!(err, BvhError::MalformedMotionHeader(_)));
}

/// it should report a short frame line as truncated motion data
#[test]
fn short_frame_line_is_truncated() {
    let src = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Xrotation Yrotation
}
MOTION
Frames: 1
Frame Time: 0.1
0 0
";
    let mut file = BvhFile::new("broken.bvh");
    let err = file.read_str(src).unwrap_err();
    assert!(matches!(err, BvhError::TruncatedMotionData(_)));
    assert_eq!(file.num_frames(), 0);
}

/// it should report fewer frame lines than declared as truncated motion data
#[test]
fn missing_frame_lines_are_truncated() {
    let src = "\
HIERARCHY
ROOT Hips
{
    OFFSET 0 0 0
    CHANNELS 3 Zrotation Xrotation Yrotation
}
MOTION
Frames: 3
Frame Time: 0.1
0 0 0
0 0 0
";
    let mut file = BvhFile::new("broken.bvh");
    let err = file.read_str(src).unwrap_err();
    assert!(matches!(err, BvhError::TruncatedMotionData(_)));
}

/// it should report opening a nonexistent path as FileNotOpenable
#[test]
fn nonexistent_path_is_file_not_openable() {
    let err = BvhFile::load("definitely/not/here.bvh").unwrap_err();
    assert!(matches!(err, BvhError::FileNotOpenable { .. }));
}
