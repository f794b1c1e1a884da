/// Session Accumulator
///
/// Folds a stream of pose frames into a `SessionTally`. Frames without a pose
/// are counted as skipped and never touch the category counts, so the tally
/// under-counts wall-clock time when the estimator misses frames.
///
/// Each classified frame is credited to its category once the pose it shows
/// is known to have been held for that frame: when the next frame arrives, or
/// at session end for a pose still held when the stream stops. N classified
/// frames therefore cover exactly N frame durations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::mpsc;

use crate::config::AssessmentConfig;
use crate::error::{AssessmentError, AssessmentResult};
use crate::models::landmark::PoseFrame;
use crate::models::posture::PostureCategory;
use crate::services::posture_classifier::PostureClassifier;

/// Frame counts per posture category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTally {
    counts: BTreeMap<PostureCategory, u64>,
    /// Frames that produced a classification
    pub classified_frames: u64,
    /// Frames with no detected pose
    pub skipped_frames: u64,
    /// Whether a pose was still held at stream end and closed by `finish`
    pub end_adjusted: bool,
}

impl SessionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tally directly from counts
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (PostureCategory, u64)>,
    {
        let mut tally = Self::new();
        for (category, frames) in counts {
            *tally.counts.entry(category).or_insert(0) += frames;
            tally.classified_frames += frames;
        }
        tally
    }

    /// Credit one frame to `category`
    pub fn record(&mut self, category: PostureCategory) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn count(&self, category: PostureCategory) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Frames credited across all categories
    pub fn total_frames(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_frames() == 0
    }
}

/// Single-writer accumulator for one video session
#[derive(Debug, Clone)]
pub struct SessionAccumulator {
    classifier: PostureClassifier,
    end_adjustment: bool,
    tally: SessionTally,
    /// Category of the latest classified frame, not yet credited
    held: Option<PostureCategory>,
}

impl SessionAccumulator {
    pub fn new(classifier: PostureClassifier) -> Self {
        Self {
            classifier,
            end_adjustment: true,
            tally: SessionTally::new(),
            held: None,
        }
    }

    /// Create an accumulator from validated configuration
    pub fn from_config(config: &AssessmentConfig) -> AssessmentResult<Self> {
        config.validate()?;

        let classifier = PostureClassifier::new(config.coordinate_scaling)
            .with_arm_selection(config.arm_selection);

        Ok(Self::new(classifier).with_end_adjustment(config.session_end_adjustment))
    }

    /// Credit (or drop) the pose still held when the stream ends
    pub fn with_end_adjustment(mut self, enabled: bool) -> Self {
        self.end_adjustment = enabled;
        self
    }

    /// Counts so far; the latest classified frame is credited on the next call
    pub fn tally(&self) -> &SessionTally {
        &self.tally
    }

    /// Process one frame
    ///
    /// Returns the frame's category, or `None` when the frame had no pose.
    /// A detected pose with missing joints is rejected without touching the
    /// tally.
    pub fn observe(&mut self, frame: &PoseFrame) -> AssessmentResult<Option<PostureCategory>> {
        if !frame.pose_detected {
            self.release_held();
            self.tally.skipped_frames += 1;
            tracing::debug!(skipped = self.tally.skipped_frames, "Skipping frame without pose");
            return Ok(None);
        }

        let category = self.classifier.classify_frame(frame)?;
        self.release_held();
        self.held = Some(category);
        self.tally.classified_frames += 1;

        Ok(Some(category))
    }

    fn release_held(&mut self) {
        if let Some(category) = self.held.take() {
            self.tally.record(category);
        }
    }

    /// Close the session
    ///
    /// A pose still held when the stream ended gets its final frame here,
    /// unless end adjustment is disabled.
    pub fn finish(mut self) -> SessionTally {
        if let Some(category) = self.held.take() {
            if self.end_adjustment {
                self.tally.record(category);
                self.tally.end_adjusted = true;
            }
        }

        tracing::info!(
            classified = self.tally.classified_frames,
            skipped = self.tally.skipped_frames,
            end_adjusted = self.tally.end_adjusted,
            "Session finished"
        );

        self.tally
    }

    /// Fold a whole frame sequence into a finished tally
    pub fn accumulate<I>(self, frames: I) -> AssessmentResult<SessionTally>
    where
        I: IntoIterator<Item = PoseFrame>,
    {
        let accumulator = frames.into_iter().try_fold(self, |mut acc, frame| {
            acc.observe(&frame)?;
            Ok::<_, AssessmentError>(acc)
        })?;

        Ok(accumulator.finish())
    }

    /// Consume frames from a channel until every sender is dropped
    ///
    /// Producers may run on any task; this accumulator stays the only writer.
    pub async fn drain(mut self, mut frames: mpsc::Receiver<PoseFrame>) -> AssessmentResult<SessionTally> {
        while let Some(frame) = frames.recv().await {
            self.observe(&frame)?;
        }

        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::landmark::{BodySide, Joint, LandmarkPosition};
    use crate::services::geometry::CoordinateScaling;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn left_arm_frame(elbow: (f64, f64), wrist: (f64, f64)) -> PoseFrame {
        let arm = BodySide::Left.arm_joints();
        let mut joints = BTreeMap::new();
        joints.insert(arm.shoulder, LandmarkPosition::new(0.5, 0.3, 0.0));
        joints.insert(arm.elbow, LandmarkPosition::new(elbow.0, elbow.1, 0.0));
        joints.insert(arm.wrist, LandmarkPosition::new(wrist.0, wrist.1, 0.0));
        joints.insert(arm.hip, LandmarkPosition::new(0.5, 0.8, 0.0));
        PoseFrame::new(joints)
    }

    fn arm_down() -> PoseFrame {
        left_arm_frame((0.5, 0.5), (0.5, 0.7))
    }

    fn arm_up() -> PoseFrame {
        left_arm_frame((0.5, 0.1), (0.5, 0.0))
    }

    fn accumulator() -> SessionAccumulator {
        SessionAccumulator::new(PostureClassifier::new(CoordinateScaling::Planar))
    }

    #[test]
    fn test_observe_credits_previous_frame() {
        let mut acc = accumulator();
        assert_eq!(acc.observe(&arm_up()).unwrap(), Some(PostureCategory::ElbowAboveShoulder));
        assert_eq!(acc.tally().count(PostureCategory::ElbowAboveShoulder), 0);
        assert_eq!(acc.tally().classified_frames, 1);

        acc.observe(&arm_down()).unwrap();
        assert_eq!(acc.tally().count(PostureCategory::ElbowAboveShoulder), 1);
        assert_eq!(acc.tally().count(PostureCategory::ArmAgainstBody), 0);
    }

    #[test]
    fn test_no_pose_is_skipped() {
        let mut acc = accumulator();
        assert_eq!(acc.observe(&PoseFrame::no_pose()).unwrap(), None);
        assert_eq!(acc.tally().skipped_frames, 1);
        assert!(acc.tally().is_empty());
    }

    #[test]
    fn test_finish_closes_held_pose() {
        let tally = accumulator()
            .accumulate(vec![arm_down(), arm_up(), arm_up()])
            .unwrap();

        assert_eq!(tally.count(PostureCategory::ArmAgainstBody), 1);
        assert_eq!(tally.count(PostureCategory::ElbowAboveShoulder), 2);
        assert_eq!(tally.classified_frames, 3);
        assert_eq!(tally.total_frames(), tally.classified_frames);
        assert!(tally.end_adjusted);
    }

    #[test]
    fn test_lost_pose_closes_held_pose() {
        let tally = accumulator()
            .accumulate(vec![arm_up(), PoseFrame::no_pose()])
            .unwrap();

        assert_eq!(tally.count(PostureCategory::ElbowAboveShoulder), 1);
        assert_eq!(tally.skipped_frames, 1);
        assert!(!tally.end_adjusted);
    }

    #[test]
    fn test_adjustment_can_be_disabled() {
        let tally = accumulator()
            .with_end_adjustment(false)
            .accumulate(vec![arm_up(), arm_up()])
            .unwrap();

        // The pose still held at stream end is dropped
        assert_eq!(tally.total_frames(), 1);
        assert_eq!(tally.classified_frames, 2);
        assert!(!tally.end_adjusted);
    }

    #[test]
    fn test_empty_stream() {
        let tally = accumulator().accumulate(Vec::new()).unwrap();
        assert_eq!(tally, SessionTally::new());
    }

    #[test]
    fn test_replay_gives_identical_tally() {
        let frames = vec![arm_down(), PoseFrame::no_pose(), arm_up(), arm_down()];
        let first = accumulator().accumulate(frames.clone()).unwrap();
        let second = accumulator().accumulate(frames).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_joint_stops_fold() {
        let mut broken = arm_up();
        broken.joints.remove(&Joint::LeftWrist);

        let result = accumulator().accumulate(vec![arm_up(), broken]);
        assert_matches!(result, Err(AssessmentError::MissingJoint { .. }));
    }

    #[test]
    fn test_from_counts() {
        let tally = SessionTally::from_counts([
            (PostureCategory::ElbowAboveShoulder, 6),
            (PostureCategory::ArmAgainstBody, 4),
        ]);
        assert_eq!(tally.total_frames(), 10);
        assert_eq!(tally.count(PostureCategory::ArmAwayFromBody), 0);
    }

    #[tokio::test]
    async fn test_drain_channel() {
        let (tx, rx) = mpsc::channel(4);

        let producer = tokio::spawn(async move {
            for frame in [arm_down(), arm_down(), PoseFrame::no_pose(), arm_up()] {
                tx.send(frame).await.unwrap();
            }
        });

        let tally = accumulator().drain(rx).await.unwrap();
        producer.await.unwrap();

        assert_eq!(tally.count(PostureCategory::ArmAgainstBody), 2);
        assert_eq!(tally.count(PostureCategory::ElbowAboveShoulder), 1);
        assert_eq!(tally.skipped_frames, 1);
        assert!(tally.end_adjusted);
    }
}
