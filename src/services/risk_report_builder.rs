/// Risk Report Builder
///
/// Turns a finished `SessionTally` into per-category durations, a
/// time-weighted score and a rating band.

use chrono::Utc;

use crate::config::AssessmentConfig;
use crate::error::{AssessmentError, AssessmentResult};
use crate::models::posture::PostureCategory;
use crate::models::risk_report::{CategoryDuration, RiskRating, RiskReport};
use crate::services::session_accumulator::SessionTally;

#[derive(Debug, Clone, Copy)]
pub struct RiskReportBuilder {
    frame_duration: f64,
}

impl RiskReportBuilder {
    /// Create a builder for a stream recorded at `frames_per_second`
    pub fn new(frames_per_second: f64) -> AssessmentResult<Self> {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(AssessmentError::InvalidConfig(format!(
                "frames per second must be positive, got {}",
                frames_per_second
            )));
        }

        Ok(Self {
            frame_duration: 1.0 / frames_per_second,
        })
    }

    pub fn from_config(config: &AssessmentConfig) -> AssessmentResult<Self> {
        Self::new(config.frames_per_second)
    }

    /// Build the report
    ///
    /// The five weighted categories always get a row; "other" only appears
    /// when it was observed. Its time counts towards the denominator with
    /// weight 0.
    pub fn build(&self, tally: &SessionTally) -> RiskReport {
        let mut durations: Vec<CategoryDuration> = PostureCategory::named()
            .iter()
            .map(|category| self.duration_of(tally, *category))
            .collect();

        if tally.count(PostureCategory::Other) > 0 {
            durations.push(self.duration_of(tally, PostureCategory::Other));
        }

        let total_seconds: f64 = durations.iter().map(|d| d.seconds).sum();
        let weighted_score = weighted_score(&durations);
        let rating = RiskRating::from_score(weighted_score);

        tracing::info!(
            total_seconds,
            weighted_score,
            rating = %rating,
            "Built risk report"
        );

        RiskReport {
            durations,
            total_seconds,
            weighted_score,
            rating,
            frame_duration: self.frame_duration,
            generated_at: Utc::now(),
        }
    }

    fn duration_of(&self, tally: &SessionTally, category: PostureCategory) -> CategoryDuration {
        let frames = tally.count(category);
        CategoryDuration {
            category,
            frames,
            seconds: frames as f64 * self.frame_duration,
        }
    }
}

/// Σ(weight × seconds) / Σ(seconds), or 0 when no time was recorded
pub fn weighted_score(durations: &[CategoryDuration]) -> f64 {
    let total: f64 = durations.iter().map(|d| d.seconds).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = durations
        .iter()
        .map(|d| f64::from(d.category.weight()) * d.seconds)
        .sum();

    weighted / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_rejects_bad_frame_rate() {
        assert_matches!(RiskReportBuilder::new(0.0), Err(AssessmentError::InvalidConfig(_)));
        assert_matches!(RiskReportBuilder::new(-30.0), Err(AssessmentError::InvalidConfig(_)));
        assert_matches!(RiskReportBuilder::new(f64::NAN), Err(AssessmentError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_tally_scores_zero() {
        let report = RiskReportBuilder::new(30.0).unwrap().build(&SessionTally::new());
        assert_eq!(report.weighted_score, 0.0);
        assert_eq!(report.total_seconds, 0.0);
        assert_eq!(report.rating, RiskRating::Low);
        assert_eq!(report.durations.len(), 5);
    }

    #[test]
    fn test_weighted_score_mixed_session() {
        let tally = SessionTally::from_counts([
            (PostureCategory::ElbowAboveShoulder, 6),
            (PostureCategory::ArmAgainstBody, 4),
        ]);
        let report = RiskReportBuilder::new(2.0).unwrap().build(&tally);

        assert_eq!(report.seconds_in(PostureCategory::ElbowAboveShoulder), 3.0);
        assert_eq!(report.seconds_in(PostureCategory::ArmAgainstBody), 2.0);
        assert!((report.weighted_score - 4.6).abs() < 1e-9);
        assert_eq!(report.rating, RiskRating::Elevated);
    }

    #[test]
    fn test_other_dilutes_score() {
        let tally = SessionTally::from_counts([
            (PostureCategory::ElbowAboveShoulder, 1),
            (PostureCategory::Other, 1),
        ]);
        let report = RiskReportBuilder::new(1.0).unwrap().build(&tally);

        assert_eq!(report.durations.len(), 6);
        assert_eq!(report.total_seconds, 2.0);
        assert!((report.weighted_score - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_rows_follow_category_order() {
        let tally = SessionTally::from_counts([(PostureCategory::ArmAwayFromBody, 30)]);
        let report = RiskReportBuilder::new(30.0).unwrap().build(&tally);
        let items: Vec<String> = report.rows().into_iter().map(|r| r.item).collect();

        assert_eq!(
            items,
            vec![
                "elbow above shoulder",
                "elbow level with shoulder, arm extended",
                "elbow level with shoulder, arm bent 90°",
                "arm 10–90° from body",
                "arm against body",
                "weighted score",
                "rating",
            ]
        );
    }
}
