// Assessment pipeline: geometry -> classifier -> accumulator -> report

pub mod frame_source;
pub mod geometry;
pub mod posture_classifier;
pub mod risk_report_builder;
pub mod session_accumulator;

pub use frame_source::{parse_frame, JsonLinesSource};
pub use geometry::{angle_between, arm_angles, joint_angle, CoordinateScaling, Vec3};
pub use posture_classifier::{classify, score, ArmSelection, PostureClassifier};
pub use risk_report_builder::{weighted_score, RiskReportBuilder};
pub use session_accumulator::{SessionAccumulator, SessionTally};
