//! Cross-validated grid search over the neighbor count.
//!
//! Every (candidate k, fold) pair fits a fresh scaler and model on the
//! fold's training complement and scores the held-out fold, so no
//! statistics leak between folds. Candidates are independent and run on
//! the rayon pool; each task owns its fitted state.

use rayon::prelude::*;

use crate::config::FeatureColumn;
use crate::data_handling::{Dataset, FeatureMatrix};
use crate::error::PipelineError;
use crate::models::knn::{KnnClassifier, KnnParams, Weighting};
use crate::split::stratified_folds;
use crate::stats::evaluate;

/// Cross-validation accuracies for one candidate k.
#[derive(Debug, Clone, PartialEq)]
pub struct KAccuracy {
    pub k: usize,
    pub fold_accuracies: Vec<f64>,
    pub mean_accuracy: f64,
}

/// Result of the grid search: the chosen k and the full accuracy curve,
/// ascending in k, for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct TuneOutcome {
    pub best_k: usize,
    pub accuracy_by_k: Vec<KAccuracy>,
}

struct FoldData {
    train: FeatureMatrix,
    train_labels: Vec<bool>,
    validation: FeatureMatrix,
    validation_labels: Vec<bool>,
}

/// Grid-search the neighbor count by v-fold stratified cross-validation.
///
/// Candidates are deduplicated and evaluated in ascending order; the best
/// k is the one with the maximum mean fold accuracy, ties going to the
/// smallest k.
pub fn tune(
    train: &Dataset,
    features: &[FeatureColumn],
    candidate_ks: &[usize],
    folds: usize,
    seed: u64,
    weighting: Weighting,
) -> Result<TuneOutcome, PipelineError> {
    if candidate_ks.is_empty() {
        return Err(PipelineError::Config(
            "candidate_ks must not be empty".to_string(),
        ));
    }
    for &k in candidate_ks {
        if k == 0 || k % 2 == 0 {
            return Err(PipelineError::Config(format!(
                "candidate k values must be odd and >= 1, got {}",
                k
            )));
        }
    }
    let mut ks: Vec<usize> = candidate_ks.to_vec();
    ks.sort_unstable();
    ks.dedup();

    let labels = train.labels();
    let assignments = stratified_folds(&labels, folds, seed)?;

    let fold_data = assignments
        .iter()
        .map(|validation_idx| {
            let train_idx: Vec<usize> = (0..train.len())
                .filter(|i| !validation_idx.contains(i))
                .collect();
            let train_ds = train.select(&train_idx);
            let validation_ds = train.select(validation_idx);
            Ok(FoldData {
                train: train_ds.feature_matrix(features)?,
                train_labels: train_ds.labels(),
                validation: validation_ds.feature_matrix(features)?,
                validation_labels: validation_ds.labels(),
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    let min_fold_train = fold_data
        .iter()
        .map(|fold| fold.train.nrows())
        .min()
        .unwrap_or(0);
    if let Some(&max_k) = ks.last() {
        if max_k > min_fold_train {
            return Err(PipelineError::Config(format!(
                "candidate k={} exceeds the smallest fold training size ({})",
                max_k, min_fold_train
            )));
        }
    }

    let accuracy_by_k = ks
        .par_iter()
        .map(|&k| {
            let fold_accuracies = fold_data
                .iter()
                .map(|fold| score_fold(k, weighting, fold))
                .collect::<Result<Vec<_>, PipelineError>>()?;
            let mean_accuracy =
                fold_accuracies.iter().sum::<f64>() / fold_accuracies.len() as f64;
            log::debug!(
                "k={}: mean cross-validation accuracy {:.4}",
                k,
                mean_accuracy
            );
            Ok(KAccuracy {
                k,
                fold_accuracies,
                mean_accuracy,
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    let mut best = &accuracy_by_k[0];
    for candidate in &accuracy_by_k[1..] {
        if candidate.mean_accuracy > best.mean_accuracy {
            best = candidate;
        }
    }
    log::info!(
        "Selected k={} (mean cross-validation accuracy {:.4})",
        best.k,
        best.mean_accuracy
    );

    Ok(TuneOutcome {
        best_k: best.k,
        accuracy_by_k,
    })
}

fn score_fold(k: usize, weighting: Weighting, fold: &FoldData) -> Result<f64, PipelineError> {
    let mut model = KnnClassifier::new(KnnParams { k, weighting });
    model.fit(&fold.train, &fold.train_labels)?;
    let predictions = model.predict(&fold.validation)?;
    Ok(evaluate(&predictions, &fold.validation_labels)?.accuracy)
}
