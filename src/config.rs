use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PipelineError;
use crate::models::knn::Weighting;

/// Central configuration for one reproducible analysis run.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PipelineConfig {
    /// Fraction of the dataset assigned to the training split, in (0, 1].
    pub train_fraction: f64,
    /// Seed for every stratified shuffle in the run.
    pub seed: u64,
    /// Neighbor counts to evaluate during tuning. Each must be odd and >= 1.
    pub candidate_ks: Vec<usize>,
    /// Number of cross-validation folds, >= 2.
    pub folds: usize,
    /// Predictor columns used to build the feature matrix.
    pub features: Vec<FeatureColumn>,
    /// Neighbor vote weighting for the fitted models.
    #[serde(default)]
    pub weighting: Weighting,
}

/// Predictor columns available in the player table.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    Age,
    PlayedHours,
    Experience,
    Gender,
}

impl FeatureColumn {
    /// Canonical column name as it appears in the data model.
    pub fn column_name(&self) -> &'static str {
        match self {
            FeatureColumn::Age => "age",
            FeatureColumn::PlayedHours => "played_hours",
            FeatureColumn::Experience => "experience",
            FeatureColumn::Gender => "gender",
        }
    }

    /// Whether the column holds a categorical value that needs encoding
    /// before it can enter a distance computation.
    pub fn is_categorical(&self) -> bool {
        matches!(self, FeatureColumn::Experience | FeatureColumn::Gender)
    }
}

impl FromStr for FeatureColumn {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "age" => Ok(FeatureColumn::Age),
            "played_hours" => Ok(FeatureColumn::PlayedHours),
            "experience" => Ok(FeatureColumn::Experience),
            "gender" => Ok(FeatureColumn::Gender),
            _ => Err(PipelineError::Config(format!(
                "unknown feature column: {}. Expected one of age, played_hours, experience, gender",
                s
            ))),
        }
    }
}

impl PipelineConfig {
    /// Check every field against its allowed range. Called once at the top
    /// of the pipeline so later stages can assume a valid configuration.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.train_fraction.is_finite()
            || self.train_fraction <= 0.0
            || self.train_fraction > 1.0
        {
            return Err(PipelineError::Config(format!(
                "train_fraction must be in (0, 1], got {}",
                self.train_fraction
            )));
        }
        if self.folds < 2 {
            return Err(PipelineError::Config(format!(
                "folds must be >= 2, got {}",
                self.folds
            )));
        }
        if self.candidate_ks.is_empty() {
            return Err(PipelineError::Config(
                "candidate_ks must not be empty".to_string(),
            ));
        }
        for &k in &self.candidate_ks {
            if k == 0 || k % 2 == 0 {
                return Err(PipelineError::Config(format!(
                    "candidate k values must be odd and >= 1, got {}",
                    k
                )));
            }
        }
        if self.features.is_empty() {
            return Err(PipelineError::Config(
                "features must not be empty".to_string(),
            ));
        }
        for (i, feature) in self.features.iter().enumerate() {
            if self.features[..i].contains(feature) {
                return Err(PipelineError::Config(format!(
                    "duplicate feature column: {}",
                    feature.column_name()
                )));
            }
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.75,
            seed: 1234,
            candidate_ks: (1..=21).step_by(2).collect(),
            folds: 5,
            features: vec![FeatureColumn::Age, FeatureColumn::PlayedHours],
            weighting: Weighting::Uniform,
        }
    }
}
