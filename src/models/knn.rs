//! K-nearest-neighbors classifier over standardized feature space.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::data_handling::FeatureMatrix;
use crate::error::PipelineError;
use crate::preprocessing::{fit_transform, transform, DegeneratePolicy, Scaler};

/// How the k nearest neighbors are weighted in the vote.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// All k neighbors count equally (rectangular kernel).
    #[default]
    Uniform,
    /// Neighbors vote with weight 1/distance. When any of the k nearest
    /// sits at distance exactly zero, the vote is restricted to those
    /// exact matches.
    Distance,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnnParams {
    /// Neighbor count. Must be odd and >= 1.
    pub k: usize,
    pub weighting: Weighting,
}

impl KnnParams {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            weighting: Weighting::Uniform,
        }
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.k == 0 || self.k % 2 == 0 {
            return Err(PipelineError::Config(format!(
                "k must be odd and >= 1, got {}",
                self.k
            )));
        }
        Ok(())
    }
}

impl Default for KnnParams {
    fn default() -> Self {
        KnnParams::new(3)
    }
}

struct FittedKnn {
    scaler: Scaler,
    train_x: Array2<f64>,
    train_y: Vec<bool>,
}

/// KNN classifier. Fitting standardizes the training matrix (statistics
/// from that matrix only) and stores the scaled vectors with their labels;
/// the fitted state is read-only afterwards.
pub struct KnnClassifier {
    params: KnnParams,
    fitted: Option<FittedKnn>,
}

impl KnnClassifier {
    pub fn new(params: KnnParams) -> Self {
        KnnClassifier {
            params,
            fitted: None,
        }
    }

    pub fn params(&self) -> &KnnParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn fit(&mut self, features: &FeatureMatrix, labels: &[bool]) -> Result<(), PipelineError> {
        self.params.validate()?;
        if features.nrows() == 0 {
            return Err(PipelineError::EmptyInput("cannot fit on no rows"));
        }
        if labels.len() != features.nrows() {
            return Err(PipelineError::LengthMismatch {
                expected: features.nrows(),
                actual: labels.len(),
            });
        }
        if self.params.k > features.nrows() {
            return Err(PipelineError::Config(format!(
                "k ({}) exceeds the number of training rows ({})",
                self.params.k,
                features.nrows()
            )));
        }

        let (scaler, train_x) = fit_transform(features, DegeneratePolicy::Reject)?;
        self.fitted = Some(FittedKnn {
            scaler,
            train_x,
            train_y: labels.to_vec(),
        });
        Ok(())
    }

    /// Predict one label per query row.
    ///
    /// Neighbors are ranked by `(Euclidean distance, training row index)`,
    /// so equal distances resolve to the earliest-stored training row.
    /// Vote ties resolve to the label seen first among the k neighbors in
    /// distance order.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<bool>, PipelineError> {
        let fitted = self.fitted.as_ref().ok_or(PipelineError::UnfittedModel)?;
        if features.nrows() == 0 {
            return Err(PipelineError::EmptyInput("no query rows"));
        }

        let scaled = transform(&fitted.scaler, features)?;
        let predictions = scaled
            .rows()
            .into_iter()
            .map(|query| self.classify(fitted, query))
            .collect();
        Ok(predictions)
    }

    fn classify(&self, fitted: &FittedKnn, query: ArrayView1<f64>) -> bool {
        let mut distances: Vec<(f64, usize)> = fitted
            .train_x
            .rows()
            .into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let sq: f64 = row
                    .iter()
                    .zip(query.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                (sq.sqrt(), idx)
            })
            .collect();

        distances.sort_unstable_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });

        let neighbors = &distances[..self.params.k];

        // (label, weight) per neighbor, in distance order.
        let weighted: Vec<(bool, f64)> = match self.params.weighting {
            Weighting::Uniform => neighbors
                .iter()
                .map(|&(_, idx)| (fitted.train_y[idx], 1.0))
                .collect(),
            Weighting::Distance => {
                if neighbors.iter().any(|&(d, _)| d == 0.0) {
                    neighbors
                        .iter()
                        .filter(|&&(d, _)| d == 0.0)
                        .map(|&(_, idx)| (fitted.train_y[idx], 1.0))
                        .collect()
                } else {
                    neighbors
                        .iter()
                        .map(|&(d, idx)| (fitted.train_y[idx], 1.0 / d))
                        .collect()
                }
            }
        };

        let mut weight_true = 0.0;
        let mut weight_false = 0.0;
        for &(label, weight) in &weighted {
            if label {
                weight_true += weight;
            } else {
                weight_false += weight;
            }
        }

        if weight_true > weight_false {
            true
        } else if weight_false > weight_true {
            false
        } else {
            // Tied vote: the nearest neighbor decides.
            weighted[0].0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::{FeatureMatrix, FeatureSpec};
    use ndarray::Array2;

    fn matrix(rows: usize, cols: usize, data: Vec<f64>) -> FeatureMatrix {
        let columns = (0..cols)
            .map(|c| FeatureSpec {
                name: format!("f{}", c),
                categorical: false,
            })
            .collect();
        FeatureMatrix {
            x: Array2::from_shape_vec((rows, cols), data).unwrap(),
            columns,
        }
    }

    #[test]
    fn predict_before_fit_errors() {
        let clf = KnnClassifier::new(KnnParams::new(1));
        let query = matrix(1, 2, vec![0.0, 0.0]);
        let err = clf.predict(&query).unwrap_err();
        assert!(matches!(err, PipelineError::UnfittedModel));
    }

    #[test]
    fn k1_returns_label_of_identical_training_vector() {
        let train = matrix(4, 2, vec![0.0, 0.0, 10.0, 0.0, 0.0, 10.0, 10.0, 10.0]);
        let labels = vec![true, false, false, true];

        let mut clf = KnnClassifier::new(KnnParams::new(1));
        clf.fit(&train, &labels).unwrap();

        let preds = clf.predict(&train).unwrap();
        assert_eq!(preds, labels);
    }

    #[test]
    fn even_k_is_rejected() {
        let train = matrix(4, 1, vec![0.0, 1.0, 2.0, 3.0]);
        let mut clf = KnnClassifier::new(KnnParams::new(2));
        let err = clf.fit(&train, &[true, false, true, false]).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
