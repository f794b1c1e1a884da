/// Posture Classifier
///
/// Two rule sets over the same arm angles:
/// - Temporal mode: ordered rule table mapping angles to a `PostureCategory`,
///   used frame by frame during video sessions
/// - Continuous mode: score bands (0-10) for single images, evaluated for
///   both arms with the heavier-loaded arm reported as best side

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AssessmentError, AssessmentResult};
use crate::models::landmark::{BodySide, PoseFrame};
use crate::models::posture::{
    AngleSample, ArmAssessment, FrameAssessment, PostureCategory, ScoreBand,
};
use crate::services::geometry::{arm_angles, CoordinateScaling};

/// Tolerance around 90° that counts as "level with the shoulder"
const SHOULDER_LEVEL_TOLERANCE: f64 = 10.0;

type Rule = (fn(&AngleSample) -> bool, PostureCategory);

/// Evaluated top to bottom; the first match wins. Rules 1 and 2 overlap for
/// raise angles in (90, 100], and rule 1 takes those frames.
const TEMPORAL_RULES: [Rule; 5] = [
    (is_above_shoulder, PostureCategory::ElbowAboveShoulder),
    (is_level_and_extended, PostureCategory::ShoulderLevelArmExtended),
    (is_level_and_bent, PostureCategory::ShoulderLevelArmBent),
    (is_away_from_body, PostureCategory::ArmAwayFromBody),
    (is_against_body, PostureCategory::ArmAgainstBody),
];

fn is_shoulder_level(sample: &AngleSample) -> bool {
    (sample.raise_angle - 90.0).abs() <= SHOULDER_LEVEL_TOLERANCE
}

fn is_above_shoulder(sample: &AngleSample) -> bool {
    sample.raise_angle > 90.0
}

fn is_level_and_extended(sample: &AngleSample) -> bool {
    is_shoulder_level(sample) && sample.elbow_angle > 160.0
}

fn is_level_and_bent(sample: &AngleSample) -> bool {
    is_shoulder_level(sample) && (sample.elbow_angle - 90.0).abs() <= SHOULDER_LEVEL_TOLERANCE
}

fn is_away_from_body(sample: &AngleSample) -> bool {
    (10.0..90.0).contains(&sample.raise_angle)
}

fn is_against_body(sample: &AngleSample) -> bool {
    sample.raise_angle < 10.0
}

/// Temporal-mode classification of an angle pair
pub fn classify(raise_angle: f64, elbow_angle: f64) -> PostureCategory {
    classify_sample(&AngleSample {
        raise_angle,
        elbow_angle,
    })
}

pub fn classify_sample(sample: &AngleSample) -> PostureCategory {
    TEMPORAL_RULES
        .iter()
        .find(|(matches, _)| matches(sample))
        .map(|(_, category)| *category)
        .unwrap_or(PostureCategory::Other)
}

/// Continuous-mode score band of an angle pair
pub fn score(theta_raise: f64, theta_elbow: f64) -> ScoreBand {
    if theta_raise >= 170.0 {
        ScoreBand::Overhead
    } else if theta_raise > 100.0 && theta_raise < 170.0 {
        ScoreBand::Raised
    } else if (80.0..=100.0).contains(&theta_raise) {
        if theta_elbow >= 150.0 {
            ScoreBand::ShoulderLevelStraight
        } else {
            ScoreBand::ShoulderLevelBent
        }
    } else if (10.0..80.0).contains(&theta_raise) {
        ScoreBand::Abducted
    } else if theta_raise < 10.0 {
        ScoreBand::Neutral
    } else {
        ScoreBand::Undefined
    }
}

/// Which arm drives the temporal classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmSelection {
    Left,
    Right,
    /// Classify both arms and keep the heavier category
    Dominant,
}

impl Default for ArmSelection {
    fn default() -> Self {
        Self::Left
    }
}

impl fmt::Display for ArmSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Dominant => write!(f, "dominant"),
        }
    }
}

impl FromStr for ArmSelection {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "dominant" | "both" => Ok(Self::Dominant),
            other => Err(AssessmentError::InvalidConfig(format!(
                "unknown arm selection: {}",
                other
            ))),
        }
    }
}

/// Frame-level classifier bound to a coordinate policy
#[derive(Debug, Clone, Copy)]
pub struct PostureClassifier {
    scaling: CoordinateScaling,
    arm_selection: ArmSelection,
}

impl PostureClassifier {
    pub fn new(scaling: CoordinateScaling) -> Self {
        Self {
            scaling,
            arm_selection: ArmSelection::default(),
        }
    }

    pub fn with_arm_selection(mut self, arm_selection: ArmSelection) -> Self {
        self.arm_selection = arm_selection;
        self
    }

    /// Temporal-mode category for a frame
    pub fn classify_frame(&self, frame: &PoseFrame) -> AssessmentResult<PostureCategory> {
        let category = match self.arm_selection {
            ArmSelection::Left => self.classify_side(frame, BodySide::Left)?,
            ArmSelection::Right => self.classify_side(frame, BodySide::Right)?,
            ArmSelection::Dominant => {
                let left = self.classify_side(frame, BodySide::Left)?;
                let right = self.classify_side(frame, BodySide::Right)?;
                if right.weight() > left.weight() {
                    right
                } else {
                    left
                }
            }
        };

        tracing::debug!(category = %category, "Classified frame");
        Ok(category)
    }

    fn classify_side(&self, frame: &PoseFrame, side: BodySide) -> AssessmentResult<PostureCategory> {
        let sample = arm_angles(frame, side, self.scaling)?;
        Ok(classify_sample(&sample))
    }

    /// Continuous-mode score for one arm
    pub fn assess_arm(&self, frame: &PoseFrame, side: BodySide) -> AssessmentResult<ArmAssessment> {
        let sample = arm_angles(frame, side, self.scaling)?;
        let band = score(sample.raise_angle, sample.elbow_angle);
        Ok(ArmAssessment::new(sample, band))
    }

    /// Continuous-mode assessment of both arms
    ///
    /// An absent pose is an error here: a single image has no other frames
    /// to fall back on.
    pub fn assess_frame(&self, frame: &PoseFrame) -> AssessmentResult<FrameAssessment> {
        if !frame.pose_detected {
            tracing::warn!("No pose detected in single-frame assessment");
            return Err(AssessmentError::NoPoseDetected);
        }

        let left_arm = self.assess_arm(frame, BodySide::Left)?;
        let right_arm = self.assess_arm(frame, BodySide::Right)?;
        let assessment = FrameAssessment::from_arms(left_arm, right_arm);

        tracing::info!(
            best_side = %assessment.best_side,
            score = assessment.best_info.score,
            "Assessed frame"
        );

        Ok(assessment)
    }
}

impl Default for PostureClassifier {
    fn default() -> Self {
        Self::new(CoordinateScaling::default())
    }
}
