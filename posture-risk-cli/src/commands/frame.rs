use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use posture_risk::assess_image;
use posture_risk::models::{ArmAssessment, BodySide, FrameAssessment};
use posture_risk::services::{parse_frame, CoordinateScaling};

use crate::config::ConfigLocation;

#[derive(Args)]
pub struct FrameCommand {
    /// Pose frame as a single JSON object
    frame: PathBuf,

    /// Image width in pixels, for pixel-space landmarks
    #[arg(long, requires = "height")]
    width: Option<f64>,

    /// Image height in pixels, for pixel-space landmarks
    #[arg(long, requires = "width")]
    height: Option<f64>,

    /// Print the assessment as JSON
    #[arg(long)]
    json: bool,
}

impl FrameCommand {
    pub async fn execute(self, location: &ConfigLocation) -> Result<()> {
        let config = location.load()?;

        let scaling = match (self.width, self.height) {
            (Some(width), Some(height)) => CoordinateScaling::Pixel { width, height },
            _ => config.coordinate_scaling,
        };

        let contents = fs::read_to_string(&self.frame)
            .with_context(|| format!("Failed to read {}", self.frame.display()))?;
        let frame = parse_frame(&contents)?;

        let assessment = assess_image(&frame, scaling)
            .with_context(|| format!("Failed to assess {}", self.frame.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        } else {
            print_assessment(&assessment);
        }

        Ok(())
    }
}

fn print_assessment(assessment: &FrameAssessment) {
    for side in BodySide::both() {
        print_arm(side, assessment.arm(side));
    }

    println!();
    println!(
        "{} {} arm, score {}",
        "Highest load:".bold(),
        assessment.best_side,
        assessment.best_info.score
    );
}

fn print_arm(side: BodySide, arm: &ArmAssessment) {
    println!(
        "{:<5}  raise {:>6.1}°  elbow {:>6.1}°  score {:>2}  {}",
        side.to_string(),
        arm.theta_raise,
        arm.theta_elbow,
        arm.score,
        arm.description.dimmed()
    );
}
