//! End-to-end scenario: clean, split, tune, fit, and evaluate a small
//! synthetic roster, checking reproducibility across repeated runs.

use playerlab_classifiers::config::{FeatureColumn, PipelineConfig};
use playerlab_classifiers::data_handling::{Dataset, RawPlayerRow};
use playerlab_classifiers::io::{read_players_from_reader, PlayersReaderConfig};
use playerlab_classifiers::models::knn::Weighting;
use playerlab_classifiers::pipeline::run_pipeline;
use playerlab_classifiers::report::{render_accuracy_table, render_metrics};

/// Twelve records, six per class, in two well-separated clusters.
fn synthetic_roster() -> Dataset {
    let mut rows = Vec::new();
    for i in 0..6 {
        rows.push(RawPlayerRow {
            age: Some(12.0 + i as f64),
            gender: "Male".to_string(),
            experience: "Amateur".to_string(),
            played_hours: 90.0 + i as f64,
            subscribe: true,
        });
        rows.push(RawPlayerRow {
            age: Some(45.0 + i as f64),
            gender: "Female".to_string(),
            experience: "Veteran".to_string(),
            played_hours: 1.0 + i as f64,
            subscribe: false,
        });
    }
    Dataset::from_rows(rows).0
}

fn scenario_config() -> PipelineConfig {
    PipelineConfig {
        train_fraction: 0.75,
        seed: 1234,
        candidate_ks: vec![1, 3],
        folds: 3,
        features: vec![FeatureColumn::Age, FeatureColumn::PlayedHours],
        weighting: Weighting::Uniform,
    }
}

#[test]
fn twelve_record_scenario_splits_nine_three() {
    let dataset = synthetic_roster();
    let outcome = run_pipeline(&dataset, &scenario_config()).unwrap();

    assert_eq!(outcome.train_size, 9);
    assert_eq!(outcome.test_size, 3);
    assert_eq!(outcome.report.confusion.total(), 3);

    // The clusters are separable, so the held-out rows (two subscribed,
    // one not, per the per-class quotas) all classify correctly.
    assert_eq!(outcome.report.accuracy, 1.0);
    assert_eq!(outcome.report.confusion.true_positive, 2);
    assert_eq!(outcome.report.confusion.true_negative, 1);
}

#[test]
fn repeated_runs_with_the_same_seed_are_identical() {
    let dataset = synthetic_roster();
    let config = scenario_config();

    let first = run_pipeline(&dataset, &config).unwrap();
    let second = run_pipeline(&dataset, &config).unwrap();

    assert_eq!(first.tuning, second.tuning);
    assert_eq!(first.report, second.report);
    assert_eq!(first.train_size, second.train_size);
}

#[test]
fn pipeline_runs_from_a_parsed_table() {
    let mut table = String::from("experience,subscribe,played_hours,gender,Age\n");
    for i in 0..6 {
        table.push_str(&format!("Amateur,TRUE,{},Male,{}\n", 90 + i, 12 + i));
        table.push_str(&format!("Veteran,FALSE,{},Female,{}\n", 1 + i, 45 + i));
    }
    // One row with a missing age: cleaned away, not imputed.
    table.push_str("Pro,TRUE,55.5,Male,NA\n");

    let data = read_players_from_reader(table.as_bytes(), &PlayersReaderConfig::default()).unwrap();
    assert_eq!(data.rows_read, 13);
    assert_eq!(data.rows_dropped_missing_age, 1);
    assert_eq!(data.dataset.len(), 12);

    let outcome = run_pipeline(&data.dataset, &scenario_config()).unwrap();
    assert_eq!(outcome.train_size, 9);
    assert_eq!(outcome.report.accuracy, 1.0);
}

#[test]
fn renderers_cover_the_outcome() {
    let dataset = synthetic_roster();
    let outcome = run_pipeline(&dataset, &scenario_config()).unwrap();

    let table = render_accuracy_table(&outcome.tuning);
    for entry in &outcome.tuning.accuracy_by_k {
        assert!(table.contains(&format!(" {}", entry.k)), "table: {}", table);
    }

    let metrics = render_metrics(&outcome.report);
    assert!(metrics.contains("Accuracy"));
    assert!(metrics.contains("Confusion matrix"));
}
