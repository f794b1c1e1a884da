// Ergonomic posture risk assessment from body landmarks

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::AssessmentConfig;
pub use error::{AssessmentError, AssessmentResult};

use models::{FrameAssessment, PoseFrame, RiskReport};
use services::{
    CoordinateScaling, PostureClassifier, RiskReportBuilder, SessionAccumulator,
};

/// Fold a recorded session into its risk report
pub fn assess_session<I>(config: &AssessmentConfig, frames: I) -> AssessmentResult<RiskReport>
where
    I: IntoIterator<Item = PoseFrame>,
{
    let builder = RiskReportBuilder::from_config(config)?;
    let tally = SessionAccumulator::from_config(config)?.accumulate(frames)?;
    Ok(builder.build(&tally))
}

/// Score both arms of a single image
pub fn assess_image(frame: &PoseFrame, scaling: CoordinateScaling) -> AssessmentResult<FrameAssessment> {
    scaling.validate()?;
    PostureClassifier::new(scaling).assess_frame(frame)
}
