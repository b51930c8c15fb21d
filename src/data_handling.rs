//! Data structures and helpers for the player table.
//!
//! This module defines `PlayerRecord` and `Dataset` and contains the
//! cleaning step that turns raw parsed rows into a dataset with a closed
//! categorical vocabulary, plus feature-matrix assembly for modeling.

use std::collections::HashMap;

use ndarray::Array2;

use crate::config::FeatureColumn;
use crate::error::PipelineError;

/// One parsed input row, before cleaning. `age` is `None` when the cell
/// was absent or not a finite number.
#[derive(Debug, Clone)]
pub struct RawPlayerRow {
    pub age: Option<f64>,
    pub gender: String,
    pub experience: String,
    pub played_hours: f64,
    pub subscribe: bool,
}

/// Ordered set of observed categorical levels. Levels are registered in
/// first-observation order and the set is closed once cleaning finishes.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    levels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Return the code for `label`, registering it if unseen.
    fn intern(&mut self, label: &str) -> usize {
        if let Some(&code) = self.index.get(label) {
            return code;
        }
        let code = self.levels.len();
        self.levels.push(label.to_string());
        self.index.insert(label.to_string(), code);
        code
    }

    pub fn code(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn label(&self, code: usize) -> &str {
        &self.levels[code]
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// One cleaned row. `age` is never missing; `gender` and `experience` are
/// codes into the owning dataset's vocabularies.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub age: f64,
    pub gender: usize,
    pub experience: usize,
    pub played_hours: f64,
    pub subscribe: bool,
}

/// An ordered, immutable collection of cleaned player records together
/// with the categorical vocabularies observed while cleaning.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<PlayerRecord>,
    gender_levels: Vocabulary,
    experience_levels: Vocabulary,
}

impl Dataset {
    /// Clean raw rows into a dataset. Rows with a missing age are dropped,
    /// not imputed; the second return value is the number removed.
    /// Categorical cells are coerced to codes drawn from the values
    /// actually observed, in first-observation order.
    pub fn from_rows(rows: Vec<RawPlayerRow>) -> (Dataset, usize) {
        let mut gender_levels = Vocabulary::default();
        let mut experience_levels = Vocabulary::default();
        let mut records = Vec::with_capacity(rows.len());
        let mut dropped = 0usize;

        for row in rows {
            let Some(age) = row.age else {
                dropped += 1;
                continue;
            };
            records.push(PlayerRecord {
                age,
                gender: gender_levels.intern(&row.gender),
                experience: experience_levels.intern(&row.experience),
                played_hours: row.played_hours,
                subscribe: row.subscribe,
            });
        }

        if dropped > 0 {
            log::info!("Dropped {} row(s) with missing age", dropped);
        }

        (
            Dataset {
                records,
                gender_levels,
                experience_levels,
            },
            dropped,
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn gender_levels(&self) -> &Vocabulary {
        &self.gender_levels
    }

    pub fn experience_levels(&self) -> &Vocabulary {
        &self.experience_levels
    }

    /// Subscription labels, row-aligned with `records`.
    pub fn labels(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.subscribe).collect()
    }

    pub fn n_subscribed(&self) -> usize {
        self.records.iter().filter(|r| r.subscribe).count()
    }

    /// Build a new dataset from the rows at `indices`, in the given order.
    /// Vocabularies are carried over unchanged so codes stay valid.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            gender_levels: self.gender_levels.clone(),
            experience_levels: self.experience_levels.clone(),
        }
    }

    pub fn log_summary(&self) {
        let subscribed = self.n_subscribed();
        log::info!(
            "Dataset: {} players ({} subscribed, {} not), {} gender level(s), {} experience level(s)",
            self.len(),
            subscribed,
            self.len() - subscribed,
            self.gender_levels.len(),
            self.experience_levels.len()
        );
    }

    /// Assemble the feature matrix for the given predictor columns.
    ///
    /// Numeric columns map to one matrix column each. Categorical columns
    /// are one-hot encoded over the full vocabulary (`experience=Pro`
    /// style names) so they can enter a Euclidean distance computation.
    pub fn feature_matrix(
        &self,
        features: &[FeatureColumn],
    ) -> Result<FeatureMatrix, PipelineError> {
        if features.is_empty() {
            return Err(PipelineError::Config(
                "features must not be empty".to_string(),
            ));
        }
        if self.records.is_empty() {
            return Err(PipelineError::EmptyInput("dataset has no rows"));
        }

        let mut columns = Vec::new();
        for feature in features {
            match feature {
                FeatureColumn::Age | FeatureColumn::PlayedHours => {
                    columns.push(FeatureSpec {
                        name: feature.column_name().to_string(),
                        categorical: false,
                    });
                }
                FeatureColumn::Experience => {
                    for level in self.experience_levels.levels() {
                        columns.push(FeatureSpec {
                            name: format!("experience={}", level),
                            categorical: true,
                        });
                    }
                }
                FeatureColumn::Gender => {
                    for level in self.gender_levels.levels() {
                        columns.push(FeatureSpec {
                            name: format!("gender={}", level),
                            categorical: true,
                        });
                    }
                }
            }
        }

        let ncols = columns.len();
        let mut data = Vec::with_capacity(self.records.len() * ncols);
        for record in &self.records {
            for feature in features {
                match feature {
                    FeatureColumn::Age => data.push(record.age),
                    FeatureColumn::PlayedHours => data.push(record.played_hours),
                    FeatureColumn::Experience => {
                        for code in 0..self.experience_levels.len() {
                            data.push(if record.experience == code { 1.0 } else { 0.0 });
                        }
                    }
                    FeatureColumn::Gender => {
                        for code in 0..self.gender_levels.len() {
                            data.push(if record.gender == code { 1.0 } else { 0.0 });
                        }
                    }
                }
            }
        }

        let x = Array2::from_shape_vec((self.records.len(), ncols), data)
            .map_err(|e| PipelineError::Data(format!("failed to build feature matrix: {}", e)))?;

        Ok(FeatureMatrix { x, columns })
    }
}

/// One column of a feature matrix. `name` is the schema identity used for
/// mismatch checks; `categorical` marks one-hot columns that must not be
/// standardized.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpec {
    pub name: String,
    pub categorical: bool,
}

/// A numeric feature matrix with its column schema. Rows are players,
/// columns are (possibly encoded) predictors.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub x: Array2<f64>,
    pub columns: Vec<FeatureSpec>,
}

impl FeatureMatrix {
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
