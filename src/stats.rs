//! Evaluation metrics for binary subscription predictions.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::PipelineError;

/// 2x2 breakdown of predicted vs. true labels, relative to the positive
/// class `subscribe = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    pub fn correct(&self) -> usize {
        self.true_positive + self.true_negative
    }
}

/// Accuracy and confusion counts over one prediction set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsReport {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

impl MetricsReport {
    /// Normal-approximation confidence interval for the accuracy, clamped
    /// to [0, 1]. `confidence` is the coverage level, e.g. 0.95.
    pub fn accuracy_interval(&self, confidence: f64) -> Result<(f64, f64), PipelineError> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(PipelineError::Config(format!(
                "confidence must be in (0, 1), got {}",
                confidence
            )));
        }
        let normal = Normal::new(0.0, 1.0).unwrap();
        let z = normal.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
        let n = self.confusion.total() as f64;
        let p = self.accuracy;
        let half_width = z * (p * (1.0 - p) / n).sqrt();
        Ok(((p - half_width).max(0.0), (p + half_width).min(1.0)))
    }
}

/// Score a prediction set against the truth.
pub fn evaluate(predictions: &[bool], truth: &[bool]) -> Result<MetricsReport, PipelineError> {
    if predictions.is_empty() {
        return Err(PipelineError::EmptyInput("no predictions to evaluate"));
    }
    if predictions.len() != truth.len() {
        return Err(PipelineError::LengthMismatch {
            expected: truth.len(),
            actual: predictions.len(),
        });
    }

    let mut confusion = ConfusionMatrix {
        true_positive: 0,
        true_negative: 0,
        false_positive: 0,
        false_negative: 0,
    };
    for (&predicted, &actual) in predictions.iter().zip(truth) {
        match (predicted, actual) {
            (true, true) => confusion.true_positive += 1,
            (false, false) => confusion.true_negative += 1,
            (true, false) => confusion.false_positive += 1,
            (false, true) => confusion.false_negative += 1,
        }
    }

    Ok(MetricsReport {
        accuracy: confusion.correct() as f64 / confusion.total() as f64,
        confusion,
    })
}
