use serde::{Deserialize, Serialize};
use std::fmt;

use super::landmark::BodySide;

/// Raise and elbow angles for one arm in one frame, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSample {
    /// Angle at the shoulder between upper arm and torso
    pub raise_angle: f64,
    /// Angle at the elbow between forearm and upper arm
    pub elbow_angle: f64,
}

impl AngleSample {
    /// Both components are clamped into [0, 180]; NaN becomes 0
    pub fn new(raise_angle: f64, elbow_angle: f64) -> Self {
        Self {
            raise_angle: clamp_degrees(raise_angle),
            elbow_angle: clamp_degrees(elbow_angle),
        }
    }
}

pub(crate) fn clamp_degrees(angle: f64) -> f64 {
    if angle.is_nan() {
        0.0
    } else {
        angle.clamp(0.0, 180.0)
    }
}

/// Discrete posture categories used for session aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureCategory {
    ElbowAboveShoulder,
    ShoulderLevelArmExtended,
    ShoulderLevelArmBent,
    ArmAwayFromBody,
    ArmAgainstBody,
    Other,
}

impl PostureCategory {
    /// Ergonomic load weight
    pub fn weight(&self) -> u8 {
        match self {
            Self::ElbowAboveShoulder => 7,
            Self::ShoulderLevelArmExtended => 5,
            Self::ShoulderLevelArmBent => 4,
            Self::ArmAwayFromBody => 2,
            Self::ArmAgainstBody => 1,
            Self::Other => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ElbowAboveShoulder => "elbow above shoulder",
            Self::ShoulderLevelArmExtended => "elbow level with shoulder, arm extended",
            Self::ShoulderLevelArmBent => "elbow level with shoulder, arm bent 90°",
            Self::ArmAwayFromBody => "arm 10–90° from body",
            Self::ArmAgainstBody => "arm against body",
            Self::Other => "other",
        }
    }

    /// The five weighted categories in report order, heaviest first
    pub fn named() -> [Self; 5] {
        [
            Self::ElbowAboveShoulder,
            Self::ShoulderLevelArmExtended,
            Self::ShoulderLevelArmBent,
            Self::ArmAwayFromBody,
            Self::ArmAgainstBody,
        ]
    }
}

impl fmt::Display for PostureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Single-frame score bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Overhead,
    Raised,
    ShoulderLevelStraight,
    ShoulderLevelBent,
    Abducted,
    Neutral,
    Undefined,
}

impl ScoreBand {
    pub fn score(&self) -> u8 {
        match self {
            Self::Overhead => 10,
            Self::Raised => 7,
            Self::ShoulderLevelStraight => 5,
            Self::ShoulderLevelBent => 4,
            Self::Abducted => 2,
            Self::Neutral => 1,
            Self::Undefined => 0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Overhead => "θ_raise ≥ 170°",
            Self::Raised => "100° < θ_raise < 170°",
            Self::ShoulderLevelStraight => "θ_raise ≈ 90°, elbow straight",
            Self::ShoulderLevelBent => "θ_raise ≈ 90°, elbow bent",
            Self::Abducted => "10° ≤ θ_raise < 80°",
            Self::Neutral => "θ_raise < 10°",
            Self::Undefined => "undefined posture",
        }
    }
}

/// Continuous-mode result for one arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmAssessment {
    pub theta_raise: f64,
    pub theta_elbow: f64,
    pub description: String,
    pub score: u8,
}

impl ArmAssessment {
    pub fn new(sample: AngleSample, band: ScoreBand) -> Self {
        Self {
            theta_raise: sample.raise_angle,
            theta_elbow: sample.elbow_angle,
            description: band.description().to_string(),
            score: band.score(),
        }
    }
}

/// Continuous-mode result for a whole frame
///
/// `best_side` is the arm under the greater load; ties go to the left arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAssessment {
    pub left_arm: ArmAssessment,
    pub right_arm: ArmAssessment,
    pub best_side: BodySide,
    pub best_info: ArmAssessment,
}

impl FrameAssessment {
    pub fn from_arms(left_arm: ArmAssessment, right_arm: ArmAssessment) -> Self {
        let (best_side, best_info) = if left_arm.score >= right_arm.score {
            (BodySide::Left, left_arm.clone())
        } else {
            (BodySide::Right, right_arm.clone())
        };

        Self {
            left_arm,
            right_arm,
            best_side,
            best_info,
        }
    }

    pub fn arm(&self, side: BodySide) -> &ArmAssessment {
        match side {
            BodySide::Left => &self.left_arm,
            BodySide::Right => &self.right_arm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_sample_clamps() {
        let sample = AngleSample::new(-3.0, 200.0);
        assert_eq!(sample.raise_angle, 0.0);
        assert_eq!(sample.elbow_angle, 180.0);

        let sample = AngleSample::new(f64::NAN, 45.0);
        assert_eq!(sample.raise_angle, 0.0);
        assert_eq!(sample.elbow_angle, 45.0);
    }

    #[test]
    fn test_category_weights() {
        let weights: Vec<u8> = PostureCategory::named().iter().map(|c| c.weight()).collect();
        assert_eq!(weights, vec![7, 5, 4, 2, 1]);
        assert_eq!(PostureCategory::Other.weight(), 0);
    }

    #[test]
    fn test_raised_band_label_matches_its_bounds() {
        assert_eq!(ScoreBand::Raised.score(), 7);
        assert_eq!(ScoreBand::Raised.description(), "100° < θ_raise < 170°");
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&PostureCategory::ArmAgainstBody).unwrap();
        assert_eq!(json, "\"arm_against_body\"");
    }

    #[test]
    fn test_best_side_prefers_higher_score() {
        let low = ArmAssessment::new(AngleSample::new(5.0, 170.0), ScoreBand::Neutral);
        let high = ArmAssessment::new(AngleSample::new(120.0, 170.0), ScoreBand::Raised);

        let frame = FrameAssessment::from_arms(low.clone(), high.clone());
        assert_eq!(frame.best_side, BodySide::Right);
        assert_eq!(frame.best_info, high);

        let frame = FrameAssessment::from_arms(low.clone(), low);
        assert_eq!(frame.best_side, BodySide::Left);
    }

    #[test]
    fn test_frame_assessment_json_shape() {
        let arm = ArmAssessment::new(AngleSample::new(90.0, 160.0), ScoreBand::ShoulderLevelStraight);
        let frame = FrameAssessment::from_arms(arm.clone(), arm);
        let value = serde_json::to_value(&frame).unwrap();

        assert_eq!(value["best_side"], "LEFT");
        assert_eq!(value["best_info"]["score"], 5);
        assert_eq!(value["left_arm"]["description"], "θ_raise ≈ 90°, elbow straight");
    }
}
