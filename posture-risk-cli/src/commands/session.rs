use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tokio::sync::mpsc;

use posture_risk::models::{RiskRating, RiskReport};
use posture_risk::services::{
    ArmSelection, JsonLinesSource, RiskReportBuilder, SessionAccumulator, SessionTally,
};

use crate::config::ConfigLocation;

// Frames buffered between the reader task and the accumulator
const FRAME_BUFFER: usize = 256;

#[derive(Args)]
pub struct SessionCommand {
    /// Pose frames, one JSON object per line
    frames: PathBuf,

    /// Frame rate of the recording
    #[arg(long)]
    fps: Option<f64>,

    /// Arm that drives the classification (left, right, dominant)
    #[arg(long)]
    arm: Option<ArmSelection>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl SessionCommand {
    pub async fn execute(self, location: &ConfigLocation) -> Result<()> {
        let mut config = location.load()?;
        if let Some(fps) = self.fps {
            config.frames_per_second = fps;
        }
        if let Some(arm) = self.arm {
            config.arm_selection = arm;
        }

        let builder = RiskReportBuilder::from_config(&config)?;
        let accumulator = SessionAccumulator::from_config(&config)?;

        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let path = self.frames.clone();
        let reader = tokio::task::spawn_blocking(move || -> Result<u64> {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;

            let mut sent = 0;
            for frame in JsonLinesSource::new(BufReader::new(file)) {
                let frame = frame.with_context(|| format!("Failed to read {}", path.display()))?;
                if tx.blocking_send(frame).is_err() {
                    // Accumulator stopped early; its error is reported instead
                    break;
                }
                sent += 1;
            }
            Ok(sent)
        });

        let tally = accumulator.drain(rx).await;
        let frames_read = reader.await.context("Frame reader task failed")??;
        let tally = tally.context("Failed to accumulate session")?;

        tracing::debug!(frames_read, "Session input consumed");

        let report = builder.build(&tally);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report, &tally);
        }

        Ok(())
    }
}

fn print_report(report: &RiskReport, tally: &SessionTally) {
    println!("{}", "Posture Risk Report".bold());
    println!("────────────────────────────────────────────");

    let rows = report.rows();
    let width = rows.iter().map(|row| row.item.len()).max().unwrap_or(0);

    for row in rows {
        let value = if row.item == "rating" {
            colorize_rating(report.rating, &row.value)
        } else {
            row.value.normal()
        };
        println!("{:<width$}  {}", row.item, value, width = width);
    }

    println!();
    println!(
        "{} frames classified, {} without a pose",
        tally.classified_frames, tally.skipped_frames
    );
}

fn colorize_rating(rating: RiskRating, text: &str) -> colored::ColoredString {
    match rating {
        RiskRating::VeryHigh => text.red().bold(),
        RiskRating::Elevated => text.yellow().bold(),
        RiskRating::Normal => text.normal(),
        RiskRating::Low => text.green(),
    }
}
