// Landmark input, posture classification and report models

pub mod landmark;
pub mod posture;
pub mod risk_report;

pub use landmark::*;
pub use posture::*;
pub use risk_report::*;
