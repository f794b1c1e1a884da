/// Pose frame input
///
/// Landmark records come from an external estimator as JSON objects, one per
/// line. This reader only decodes them; it never looks at images.

use std::io::BufRead;

use crate::error::{AssessmentError, AssessmentResult};
use crate::models::landmark::PoseFrame;

/// Decode a single landmark record
pub fn parse_frame(json: &str) -> AssessmentResult<PoseFrame> {
    serde_json::from_str(json)
        .map_err(|e| AssessmentError::InvalidInput(format!("malformed pose frame: {}", e)))
}

/// Iterator over JSON Lines pose frames
///
/// Blank lines are ignored. Errors carry the 1-based line number.
pub struct JsonLinesSource<R> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = AssessmentResult<PoseFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            self.line_number += 1;

            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    return Some(Err(AssessmentError::InvalidInput(format!(
                        "failed to read line {}: {}",
                        self.line_number, e
                    ))))
                }
            }

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            return Some(parse_frame(line).map_err(|e| match e {
                AssessmentError::InvalidInput(msg) => {
                    AssessmentError::InvalidInput(format!("line {}: {}", self.line_number, msg))
                }
                other => other,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::landmark::Joint;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    #[test]
    fn test_reads_frames_and_skips_blank_lines() {
        let input = concat!(
            r#"{"pose_detected": true, "joints": {"left_hip": {"x": 0.5, "y": 0.8, "z": 0.0}}}"#,
            "\n\n",
            r#"{"pose_detected": false}"#,
            "\n",
        );

        let frames: Vec<PoseFrame> = JsonLinesSource::new(Cursor::new(input))
            .collect::<AssessmentResult<_>>()
            .unwrap();

        assert_eq!(frames.len(), 2);
        assert!(frames[0].joint(Joint::LeftHip).is_some());
        assert!(!frames[1].pose_detected);
    }

    #[test]
    fn test_error_reports_line_number() {
        let input = "{\"pose_detected\": false}\nnot json\n";
        let mut source = JsonLinesSource::new(Cursor::new(input));

        assert!(source.next().unwrap().is_ok());
        let err = source.next().unwrap().unwrap_err();
        assert_matches!(err, AssessmentError::InvalidInput(ref msg) if msg.starts_with("line 2:"));
        assert!(source.next().is_none());
    }

    #[test]
    fn test_mediapipe_record_keeps_arm_joints() {
        let record = r#"{"pose_detected": true, "joints": {
            "left_shoulder": {"x": 0.5, "y": 0.3}, "left_elbow": {"x": 0.5, "y": 0.5},
            "left_wrist": {"x": 0.5, "y": 0.7}, "left_hip": {"x": 0.5, "y": 0.8},
            "left_pinky": {"x": 0.5, "y": 0.72}, "mouth_left": {"x": 0.48, "y": 0.12},
            "head_top": {"x": 0.5, "y": 0.02}
        }}"#;

        let frame = parse_frame(record).unwrap();
        assert_eq!(frame.joints.len(), 6);
        assert!(frame.joint(Joint::LeftWrist).is_some());
    }

    #[test]
    fn test_parse_frame_rejects_garbage() {
        assert_matches!(parse_frame("[1, 2, 3]"), Err(AssessmentError::InvalidInput(_)));
    }
}
