pub mod assessment;

pub use assessment::AssessmentConfig;
