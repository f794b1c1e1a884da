/// Landmark models delivered by the external pose estimator
///
/// One `PoseFrame` is produced per video frame or still image. Positions are
/// either normalized (0-1) or already pixel scaled; the caller chooses how
/// they become vectors through `CoordinateScaling`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AssessmentError, AssessmentResult};

/// Named body landmarks, in MediaPipe Pose index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl Joint {
    pub const ALL: [Joint; 33] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    /// Get joint name as it appears in landmark records
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }

    /// Look up a joint by its record name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|joint| joint.name() == name)
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Side of the body an arm assessment refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BodySide {
    Left,
    Right,
}

impl BodySide {
    pub fn both() -> [Self; 2] {
        [Self::Left, Self::Right]
    }

    /// The four joints needed to measure this arm
    pub fn arm_joints(&self) -> ArmJoints {
        match self {
            Self::Left => ArmJoints {
                shoulder: Joint::LeftShoulder,
                elbow: Joint::LeftElbow,
                wrist: Joint::LeftWrist,
                hip: Joint::LeftHip,
            },
            Self::Right => ArmJoints {
                shoulder: Joint::RightShoulder,
                elbow: Joint::RightElbow,
                wrist: Joint::RightWrist,
                hip: Joint::RightHip,
            },
        }
    }
}

impl fmt::Display for BodySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodySide::Left => write!(f, "LEFT"),
            BodySide::Right => write!(f, "RIGHT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmJoints {
    pub shoulder: Joint,
    pub elbow: Joint,
    pub wrist: Joint,
    pub hip: Joint,
}

/// Position of one joint in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPosition {
    pub x: f64,
    pub y: f64,
    /// Depth; 2D estimators leave it out
    #[serde(default)]
    pub z: f64,
}

impl LandmarkPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One frame of estimator output
///
/// A missing `pose_detected` field reads as `false`, the same as a failed
/// estimation. Landmark names outside `Joint` are dropped while decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    #[serde(default)]
    pub pose_detected: bool,
    #[serde(default, deserialize_with = "known_joints")]
    pub joints: BTreeMap<Joint, LandmarkPosition>,
}

fn known_joints<'de, D>(deserializer: D) -> Result<BTreeMap<Joint, LandmarkPosition>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, LandmarkPosition>::deserialize(deserializer)?;

    Ok(raw
        .into_iter()
        .filter_map(|(name, position)| match Joint::from_name(&name) {
            Some(joint) => Some((joint, position)),
            None => {
                tracing::trace!(landmark = %name, "Ignoring unknown landmark");
                None
            }
        })
        .collect())
}

impl PoseFrame {
    /// Create a frame with a detected pose
    pub fn new(joints: BTreeMap<Joint, LandmarkPosition>) -> Self {
        Self {
            pose_detected: true,
            joints,
        }
    }

    /// Frame where the estimator found nobody
    pub fn no_pose() -> Self {
        Self::default()
    }

    /// Get joint position by name
    pub fn joint(&self, joint: Joint) -> Option<LandmarkPosition> {
        self.joints.get(&joint).copied()
    }

    /// Look up a joint needed for `side`, rejecting absent or non-finite positions
    pub fn require(&self, side: BodySide, joint: Joint) -> AssessmentResult<LandmarkPosition> {
        let position = self
            .joint(joint)
            .ok_or(AssessmentError::MissingJoint { side, joint })?;

        if !position.is_finite() {
            return Err(AssessmentError::InvalidInput(format!(
                "{} has non-finite coordinates",
                joint
            )));
        }

        Ok(position)
    }
}
