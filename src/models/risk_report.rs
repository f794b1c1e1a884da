use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::posture::PostureCategory;

/// Qualitative rating band for a weighted session score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRating {
    VeryHigh,
    Elevated,
    Normal,
    Low,
}

impl RiskRating {
    /// Map a weighted score to its band, highest band first
    pub fn from_score(score: f64) -> Self {
        if score >= 6.0 {
            Self::VeryHigh
        } else if score >= 4.5 {
            Self::Elevated
        } else if score >= 3.0 {
            Self::Normal
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "very high load, immediate correction advised",
            Self::Elevated => "elevated load, posture improvement recommended",
            Self::Normal => "normal load, acceptable",
            Self::Low => "low load, good condition",
        }
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Time spent in one posture category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDuration {
    pub category: PostureCategory,
    pub frames: u64,
    pub seconds: f64,
}

/// One row of the tabular report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub item: String,
    pub value: String,
}

/// End-of-session ergonomic risk report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub durations: Vec<CategoryDuration>,
    pub total_seconds: f64,
    pub weighted_score: f64,
    pub rating: RiskRating,
    pub frame_duration: f64,
    pub generated_at: DateTime<Utc>,
}

impl RiskReport {
    /// Seconds recorded for a category, 0 when it has no row
    pub fn seconds_in(&self, category: PostureCategory) -> f64 {
        self.durations
            .iter()
            .find(|d| d.category == category)
            .map(|d| d.seconds)
            .unwrap_or(0.0)
    }

    /// Flatten into (item, value) rows: one per category, then score and rating
    pub fn rows(&self) -> Vec<ReportRow> {
        let mut rows: Vec<ReportRow> = self
            .durations
            .iter()
            .map(|d| ReportRow {
                item: d.category.label().to_string(),
                value: format!("{:.2}", d.seconds),
            })
            .collect();

        rows.push(ReportRow {
            item: "weighted score".to_string(),
            value: format!("{:.2}", self.weighted_score),
        });
        rows.push(ReportRow {
            item: "rating".to_string(),
            value: self.rating.label().to_string(),
        });

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bands() {
        assert_eq!(RiskRating::from_score(7.0), RiskRating::VeryHigh);
        assert_eq!(RiskRating::from_score(6.0), RiskRating::VeryHigh);
        assert_eq!(RiskRating::from_score(5.99), RiskRating::Elevated);
        assert_eq!(RiskRating::from_score(4.5), RiskRating::Elevated);
        assert_eq!(RiskRating::from_score(4.49), RiskRating::Normal);
        assert_eq!(RiskRating::from_score(3.0), RiskRating::Normal);
        assert_eq!(RiskRating::from_score(2.99), RiskRating::Low);
        assert_eq!(RiskRating::from_score(0.0), RiskRating::Low);
    }

    #[test]
    fn test_rows_end_with_score_and_rating() {
        let report = RiskReport {
            durations: vec![CategoryDuration {
                category: PostureCategory::ArmAgainstBody,
                frames: 4,
                seconds: 2.0,
            }],
            total_seconds: 2.0,
            weighted_score: 1.0,
            rating: RiskRating::Low,
            frame_duration: 0.5,
            generated_at: Utc::now(),
        };

        let rows = report.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].item, "arm against body");
        assert_eq!(rows[0].value, "2.00");
        assert_eq!(rows[1].value, "1.00");
        assert_eq!(rows[2].value, "low load, good condition");
        assert_eq!(report.seconds_in(PostureCategory::Other), 0.0);
    }
}
