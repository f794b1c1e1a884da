/// Landmark Geometry
///
/// Pure vector math shared by both classifier modes:
/// - Angle between two vectors, with zero-length vectors resolving to 0°
/// - Angle at a joint anchored on three landmarks
/// - Coordinate scaling policy (normalized, planar, pixel scaled)
/// - Raise/elbow angles for one arm of a frame

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use crate::error::{AssessmentError, AssessmentResult};
use crate::models::landmark::{BodySide, LandmarkPosition, PoseFrame};
use crate::models::posture::AngleSample;

/// Plain 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Angle between two vectors in degrees, always within [0, 180]
///
/// A zero-length (or non-finite) vector yields exactly 0.
pub fn angle_between(v1: Vec3, v2: Vec3) -> f64 {
    let norm1 = v1.norm();
    let norm2 = v2.norm();

    if norm1 == 0.0 || norm2 == 0.0 || !norm1.is_finite() || !norm2.is_finite() {
        return 0.0;
    }

    let cos_angle = (v1.dot(&v2) / (norm1 * norm2)).clamp(-1.0, 1.0);
    let angle_degrees = cos_angle.acos().to_degrees();

    if angle_degrees.is_nan() {
        return 0.0;
    }

    angle_degrees
}

/// Angle at `b` between `a - b` and `c - b`
pub fn joint_angle(a: Vec3, b: Vec3, c: Vec3) -> f64 {
    angle_between(a - b, c - b)
}

/// How landmark positions become vectors before angles are taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CoordinateScaling {
    /// Use (x, y, z) as delivered
    Normalized,
    /// Use (x, y) and drop depth
    Planar,
    /// Scale by image size; depth is scaled by width
    Pixel { width: f64, height: f64 },
}

impl Default for CoordinateScaling {
    fn default() -> Self {
        Self::Normalized
    }
}

impl CoordinateScaling {
    pub fn apply(&self, position: LandmarkPosition) -> Vec3 {
        match *self {
            Self::Normalized => Vec3::new(position.x, position.y, position.z),
            Self::Planar => Vec3::new(position.x, position.y, 0.0),
            Self::Pixel { width, height } => {
                Vec3::new(position.x * width, position.y * height, position.z * width)
            }
        }
    }

    pub fn validate(&self) -> AssessmentResult<()> {
        if let Self::Pixel { width, height } = *self {
            if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
                return Err(AssessmentError::InvalidConfig(format!(
                    "pixel scaling needs positive dimensions, got {}x{}",
                    width, height
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for CoordinateScaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalized => write!(f, "normalized"),
            Self::Planar => write!(f, "planar"),
            Self::Pixel { width, height } => write!(f, "pixel:{}x{}", width, height),
        }
    }
}

/// Parses `normalized`, `planar` or `pixel:<width>x<height>`
impl FromStr for CoordinateScaling {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "normalized" => return Ok(Self::Normalized),
            "planar" => return Ok(Self::Planar),
            _ => {}
        }

        let dims = value.strip_prefix("pixel:").ok_or_else(|| {
            AssessmentError::InvalidConfig(format!("unknown coordinate scaling: {}", s))
        })?;
        let (width, height) = dims.split_once('x').ok_or_else(|| {
            AssessmentError::InvalidConfig(format!("expected pixel:<width>x<height>, got {}", s))
        })?;

        let parse = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| AssessmentError::InvalidConfig(format!("bad pixel dimension: {}", v)))
        };
        let scaling = Self::Pixel {
            width: parse(width)?,
            height: parse(height)?,
        };
        scaling.validate()?;

        Ok(scaling)
    }
}

/// Compute raise and elbow angles for one arm
///
/// raise = angle(elbow - shoulder, hip - shoulder)
/// elbow = angle(wrist - elbow, shoulder - elbow)
pub fn arm_angles(
    frame: &PoseFrame,
    side: BodySide,
    scaling: CoordinateScaling,
) -> AssessmentResult<AngleSample> {
    if !frame.pose_detected {
        return Err(AssessmentError::NoPoseDetected);
    }

    let joints = side.arm_joints();
    let shoulder = scaling.apply(frame.require(side, joints.shoulder)?);
    let elbow = scaling.apply(frame.require(side, joints.elbow)?);
    let wrist = scaling.apply(frame.require(side, joints.wrist)?);
    let hip = scaling.apply(frame.require(side, joints.hip)?);

    let raise_angle = joint_angle(elbow, shoulder, hip);
    let elbow_angle = joint_angle(wrist, elbow, shoulder);

    tracing::trace!(
        side = %side,
        raise_angle,
        elbow_angle,
        "Computed arm angles"
    );

    Ok(AngleSample::new(raise_angle, elbow_angle))
}
