//! Integration tests for evaluation metrics and configuration types.

use playerlab_classifiers::config::{FeatureColumn, PipelineConfig};
use playerlab_classifiers::error::PipelineError;
use playerlab_classifiers::models::knn::Weighting;
use playerlab_classifiers::stats::evaluate;

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[test]
fn accuracy_and_confusion_counts() {
    let predictions = vec![true, true, false, false, true];
    let truth = vec![true, false, false, false, false];

    let report = evaluate(&predictions, &truth).unwrap();
    assert!((report.accuracy - 0.6).abs() < 1e-12);
    assert_eq!(report.confusion.true_positive, 1);
    assert_eq!(report.confusion.true_negative, 2);
    assert_eq!(report.confusion.false_positive, 2);
    assert_eq!(report.confusion.false_negative, 0);
}

#[test]
fn confusion_counts_sum_to_total() {
    let predictions = vec![true, false, true, true, false, false, true];
    let truth = vec![false, false, true, false, true, false, true];

    let report = evaluate(&predictions, &truth).unwrap();
    assert_eq!(report.confusion.total(), predictions.len());
    assert_eq!(
        report.confusion.correct() + report.confusion.false_positive
            + report.confusion.false_negative,
        predictions.len()
    );
}

#[test]
fn perfect_predictions_give_accuracy_one() {
    let truth = vec![true, false, true];
    let report = evaluate(&truth, &truth).unwrap();
    assert_eq!(report.accuracy, 1.0);
    assert_eq!(report.confusion.false_positive, 0);
    assert_eq!(report.confusion.false_negative, 0);
}

#[test]
fn evaluate_rejects_empty_input() {
    assert!(matches!(
        evaluate(&[], &[]).unwrap_err(),
        PipelineError::EmptyInput(_)
    ));
}

#[test]
fn evaluate_rejects_length_mismatch() {
    assert!(matches!(
        evaluate(&[true, false], &[true]).unwrap_err(),
        PipelineError::LengthMismatch { .. }
    ));
}

#[test]
fn accuracy_interval_stays_in_unit_range() {
    let predictions = vec![true, true, true, false, false, true, true, false];
    let truth = vec![true, true, false, false, true, true, true, false];

    let report = evaluate(&predictions, &truth).unwrap();
    let (lo, hi) = report.accuracy_interval(0.95).unwrap();
    assert!(lo >= 0.0 && hi <= 1.0);
    assert!(lo <= report.accuracy && report.accuracy <= hi);
}

#[test]
fn accuracy_interval_rejects_bad_confidence() {
    let report = evaluate(&[true], &[true]).unwrap();
    assert!(matches!(
        report.accuracy_interval(1.0).unwrap_err(),
        PipelineError::Config(_)
    ));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn default_config_is_valid() {
    let config = PipelineConfig::default();
    config.validate().unwrap();
    assert_eq!(config.train_fraction, 0.75);
    assert_eq!(config.folds, 5);
    assert!(config.candidate_ks.iter().all(|k| k % 2 == 1));
    assert_eq!(
        config.features,
        vec![FeatureColumn::Age, FeatureColumn::PlayedHours]
    );
    assert_eq!(config.weighting, Weighting::Uniform);
}

#[test]
fn config_rejects_out_of_range_values() {
    let mut config = PipelineConfig::default();
    config.train_fraction = 0.0;
    assert!(matches!(
        config.validate().unwrap_err(),
        PipelineError::Config(_)
    ));

    let mut config = PipelineConfig::default();
    config.folds = 1;
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.candidate_ks = vec![1, 4];
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.candidate_ks.clear();
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.features.clear();
    assert!(config.validate().is_err());

    let mut config = PipelineConfig::default();
    config.features = vec![FeatureColumn::Age, FeatureColumn::Age];
    assert!(config.validate().is_err());
}

#[test]
fn feature_column_from_str() {
    assert_eq!("age".parse::<FeatureColumn>().unwrap(), FeatureColumn::Age);
    assert_eq!(
        "Played_Hours".parse::<FeatureColumn>().unwrap(),
        FeatureColumn::PlayedHours
    );
    assert!("height".parse::<FeatureColumn>().is_err());
}

#[test]
fn config_round_trips_json() {
    let config = PipelineConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("train_fraction"));
    assert!(json.contains("played_hours"));

    let back: PipelineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.candidate_ks, config.candidate_ks);
    assert_eq!(back.features, config.features);
    assert!((back.train_fraction - config.train_fraction).abs() < 1e-12);
}

#[test]
fn config_weighting_defaults_when_absent() {
    let json = r#"{
        "train_fraction": 0.8,
        "seed": 7,
        "candidate_ks": [1, 3],
        "folds": 3,
        "features": ["age", "experience"]
    }"#;
    let config: PipelineConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.weighting, Weighting::Uniform);
    assert_eq!(
        config.features,
        vec![FeatureColumn::Age, FeatureColumn::Experience]
    );
}
