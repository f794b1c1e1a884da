use posture_risk::models::{AngleSample, PostureCategory};
use posture_risk::services::{angle_between, classify, score, Vec3};
use proptest::prelude::*;

fn finite_vec() -> impl Strategy<Value = Vec3> {
    (-1e3..1e3f64, -1e3..1e3f64, -1e3..1e3f64).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn non_degenerate_vec() -> impl Strategy<Value = Vec3> {
    finite_vec().prop_filter("vector too short", |v| v.norm() > 1e-3)
}

proptest! {
    #[test]
    fn angle_with_itself_is_zero(v in non_degenerate_vec()) {
        prop_assert!(angle_between(v, v).abs() < 1e-4);
    }

    #[test]
    fn angle_with_opposite_is_straight(v in non_degenerate_vec()) {
        prop_assert!((angle_between(v, -v) - 180.0).abs() < 1e-4);
    }

    #[test]
    fn angle_is_symmetric(a in finite_vec(), b in finite_vec()) {
        prop_assert!((angle_between(a, b) - angle_between(b, a)).abs() < 1e-9);
    }

    #[test]
    fn angle_stays_in_range(a in finite_vec(), b in finite_vec()) {
        let angle = angle_between(a, b);
        prop_assert!(!angle.is_nan());
        prop_assert!((0.0..=180.0).contains(&angle));
    }

    #[test]
    fn low_raise_is_against_body(raise in 0.0..10.0f64, elbow in 0.0..=180.0f64) {
        prop_assert_eq!(classify(raise, elbow), PostureCategory::ArmAgainstBody);
    }

    #[test]
    fn raised_above_shoulder_wins_regardless_of_elbow(raise in 90.01..=180.0f64, elbow in 0.0..=180.0f64) {
        prop_assert_eq!(classify(raise, elbow), PostureCategory::ElbowAboveShoulder);
    }

    #[test]
    fn overhead_scores_ten(raise in 170.0..=180.0f64, elbow in 0.0..=180.0f64) {
        prop_assert_eq!(score(raise, elbow).score(), 10);
    }

    #[test]
    fn sample_is_clamped(raise in any::<f64>(), elbow in any::<f64>()) {
        let sample = AngleSample::new(raise, elbow);
        prop_assert!((0.0..=180.0).contains(&sample.raise_angle));
        prop_assert!((0.0..=180.0).contains(&sample.elbow_angle));
    }
}
