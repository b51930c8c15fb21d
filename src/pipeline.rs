//! End-to-end orchestration of the analysis stages.
//!
//! Every stage consumes values and produces values; the only shared state
//! across the run is the seed in the configuration. The flow is strictly
//! forward: clean dataset -> stratified split -> tune on the training
//! split -> final fit -> held-out evaluation.

use std::path::Path;

use crate::config::PipelineConfig;
use crate::data_handling::Dataset;
use crate::error::PipelineError;
use crate::io::read_players_csv;
use crate::models::knn::{KnnClassifier, KnnParams};
use crate::split::stratified_split;
use crate::stats::{evaluate, MetricsReport};
use crate::tune::{tune, TuneOutcome};

/// Everything a run produces, as plain values. Rendering is the report
/// module's (and ultimately the caller's) concern.
pub struct PipelineOutcome {
    pub train_size: usize,
    pub test_size: usize,
    pub tuning: TuneOutcome,
    pub model: KnnClassifier,
    pub report: MetricsReport,
}

/// Run the full analysis on an already-cleaned dataset.
pub fn run_pipeline(
    dataset: &Dataset,
    config: &PipelineConfig,
) -> Result<PipelineOutcome, PipelineError> {
    config.validate()?;
    dataset.log_summary();

    let (train, test) = stratified_split(dataset, config.train_fraction, config.seed)?;

    let tuning = tune(
        &train,
        &config.features,
        &config.candidate_ks,
        config.folds,
        config.seed,
        config.weighting,
    )?;

    let mut model = KnnClassifier::new(KnnParams {
        k: tuning.best_k,
        weighting: config.weighting,
    });
    let train_features = train.feature_matrix(&config.features)?;
    model.fit(&train_features, &train.labels())?;

    let test_features = test.feature_matrix(&config.features)?;
    let predictions = model.predict(&test_features)?;
    let report = evaluate(&predictions, &test.labels())?;

    log::info!(
        "Held-out accuracy {:.4} over {} test row(s)",
        report.accuracy,
        test.len()
    );

    Ok(PipelineOutcome {
        train_size: train.len(),
        test_size: test.len(),
        tuning,
        model,
        report,
    })
}

/// Convenience: load, clean, and run in one call.
pub fn run_from_csv<P: AsRef<Path>>(
    path: P,
    config: &PipelineConfig,
) -> Result<PipelineOutcome, PipelineError> {
    let data = read_players_csv(path)?;
    run_pipeline(&data.dataset, config)
}
