use thiserror::Error;

use crate::models::landmark::{BodySide, Joint};

/// Errors surfaced by the assessment core.
///
/// Zero-length vectors are not represented here: geometry resolves them to a
/// 0° angle and never reports them upwards.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessmentError {
    #[error("No pose detected in frame")]
    NoPoseDetected,

    #[error("Missing {joint} for {side} arm")]
    MissingJoint { side: BodySide, joint: Joint },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type AssessmentResult<T> = std::result::Result<T, AssessmentError>;
