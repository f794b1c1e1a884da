// Library exports for the posture-risk CLI
// This allows testing of internal modules

pub mod commands;
pub mod config;
