//! Feature standardization fitted on training data only.
//!
//! A `Scaler` records one decision per feature column: standardize with a
//! frozen mean/std pair, or pass through untouched. Parameters come from
//! the training matrix alone and are applied identically to any matrix
//! with the same column schema, so nothing leaks from held-out data.

use ndarray::{Array2, Axis};

use crate::data_handling::FeatureMatrix;
use crate::error::PipelineError;

/// What `fit_scaler` does with a numeric column whose standard deviation
/// is zero (or undefined, as with a single training row): refuse, or keep
/// the column unscaled as a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegeneratePolicy {
    Reject,
    Passthrough,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnScaling {
    Standard { mean: f64, std: f64 },
    Passthrough,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalerColumn {
    pub name: String,
    pub scaling: ColumnScaling,
}

/// Per-column standardization parameters, frozen after fitting.
#[derive(Debug, Clone)]
pub struct Scaler {
    columns: Vec<ScalerColumn>,
}

impl Scaler {
    pub fn columns(&self) -> &[ScalerColumn] {
        &self.columns
    }
}

/// Fit a scaler on a training matrix.
///
/// Numeric columns get the sample (ddof = 1) standard deviation; one-hot
/// categorical columns always pass through unscaled.
pub fn fit_scaler(
    features: &FeatureMatrix,
    policy: DegeneratePolicy,
) -> Result<Scaler, PipelineError> {
    if features.nrows() == 0 {
        return Err(PipelineError::EmptyInput("cannot fit a scaler on no rows"));
    }

    let n = features.nrows() as f64;
    let mut columns = Vec::with_capacity(features.ncols());

    for (spec, col) in features.columns.iter().zip(features.x.axis_iter(Axis(1))) {
        if spec.categorical {
            columns.push(ScalerColumn {
                name: spec.name.clone(),
                scaling: ColumnScaling::Passthrough,
            });
            continue;
        }

        let mean = col.sum() / n;
        let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std = var.sqrt();

        if !(std > 0.0) {
            match policy {
                DegeneratePolicy::Reject => {
                    return Err(PipelineError::DegenerateFeature {
                        feature: spec.name.clone(),
                    });
                }
                DegeneratePolicy::Passthrough => {
                    log::warn!("Feature '{}' is constant; leaving it unscaled", spec.name);
                    columns.push(ScalerColumn {
                        name: spec.name.clone(),
                        scaling: ColumnScaling::Passthrough,
                    });
                    continue;
                }
            }
        }

        columns.push(ScalerColumn {
            name: spec.name.clone(),
            scaling: ColumnScaling::Standard { mean, std },
        });
    }

    Ok(Scaler { columns })
}

/// Apply a fitted scaler to a matrix with the same column schema.
pub fn transform(scaler: &Scaler, features: &FeatureMatrix) -> Result<Array2<f64>, PipelineError> {
    if scaler.columns.len() != features.ncols() {
        return Err(PipelineError::SchemaMismatch(format!(
            "scaler was fit on {} column(s), input has {}",
            scaler.columns.len(),
            features.ncols()
        )));
    }
    for (fitted, spec) in scaler.columns.iter().zip(&features.columns) {
        if fitted.name != spec.name {
            return Err(PipelineError::SchemaMismatch(format!(
                "expected column '{}', found '{}'",
                fitted.name, spec.name
            )));
        }
    }

    let mut out = features.x.clone();
    for (col_idx, fitted) in scaler.columns.iter().enumerate() {
        if let ColumnScaling::Standard { mean, std } = fitted.scaling {
            for value in out.column_mut(col_idx).iter_mut() {
                *value = (*value - mean) / std;
            }
        }
    }

    Ok(out)
}

/// Fit on a matrix and transform it in one call.
pub fn fit_transform(
    features: &FeatureMatrix,
    policy: DegeneratePolicy,
) -> Result<(Scaler, Array2<f64>), PipelineError> {
    let scaler = fit_scaler(features, policy)?;
    let scaled = transform(&scaler, features)?;
    Ok((scaler, scaled))
}
