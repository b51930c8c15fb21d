//! Seeded stratified partitioning: train/test splits and v-way folds.
//!
//! Both operations partition by label first so class proportions carry
//! over to every subset within one record of rounding. Identical seed and
//! input ordering always reproduce the identical partition.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data_handling::Dataset;
use crate::error::PipelineError;

/// Split a dataset into disjoint train/test subsets, preserving the class
/// proportions of the parent.
///
/// The training side receives exactly `floor(train_fraction * n)` records.
/// Per-class quotas are floors of the proportional share, with leftover
/// seats handed out by largest fractional remainder (ties go to the
/// unsubscribed class first). Subsets preserve the input row order.
pub fn stratified_split(
    dataset: &Dataset,
    train_fraction: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), PipelineError> {
    if !train_fraction.is_finite() || train_fraction <= 0.0 || train_fraction > 1.0 {
        return Err(PipelineError::Config(format!(
            "train_fraction must be in (0, 1], got {}",
            train_fraction
        )));
    }
    if dataset.is_empty() {
        return Err(PipelineError::EmptyInput("cannot split an empty dataset"));
    }

    let labels = dataset.labels();
    let mut groups = group_by_label(&labels);

    let mut rng = StdRng::seed_from_u64(seed);
    for group in groups.iter_mut() {
        group.shuffle(&mut rng);
    }

    let n = labels.len();
    let total_target = (train_fraction * n as f64).floor() as usize;

    // Largest-remainder apportionment of the train quota across classes.
    let mut quotas = Vec::with_capacity(groups.len());
    let mut remainders = Vec::with_capacity(groups.len());
    for group in &groups {
        let exact = train_fraction * group.len() as f64;
        let base = exact.floor() as usize;
        quotas.push(base);
        remainders.push(exact - base as f64);
    }
    let mut seats = total_target.saturating_sub(quotas.iter().sum::<usize>());
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|&a, &b| {
        remainders[b]
            .partial_cmp(&remainders[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    for &class in &order {
        if seats == 0 {
            break;
        }
        if remainders[class] > 0.0 {
            quotas[class] += 1;
            seats -= 1;
        }
    }
    // Floating-point wobble in the remainders can leave a seat unassigned;
    // any class with spare capacity absorbs it.
    for &class in &order {
        if seats == 0 {
            break;
        }
        if quotas[class] < groups[class].len() {
            quotas[class] += 1;
            seats -= 1;
        }
    }

    let mut train_idx = Vec::with_capacity(total_target);
    let mut test_idx = Vec::with_capacity(n - total_target);
    for (group, &quota) in groups.iter().zip(&quotas) {
        train_idx.extend_from_slice(&group[..quota]);
        test_idx.extend_from_slice(&group[quota..]);
    }
    train_idx.sort_unstable();
    test_idx.sort_unstable();

    log::info!(
        "Stratified split: {} train / {} test (fraction {}, seed {})",
        train_idx.len(),
        test_idx.len(),
        train_fraction,
        seed
    );

    Ok((dataset.select(&train_idx), dataset.select(&test_idx)))
}

/// Partition row indices into `folds` disjoint stratified folds.
///
/// Every index lands in exactly one fold; within each class the fold sizes
/// differ by at most one. A class smaller than the fold count cannot be
/// represented in every fold, which degrades stratification but is not an
/// error.
pub fn stratified_folds(
    labels: &[bool],
    folds: usize,
    seed: u64,
) -> Result<Vec<Vec<usize>>, PipelineError> {
    if labels.is_empty() {
        return Err(PipelineError::EmptyInput("cannot fold an empty dataset"));
    }
    if folds < 2 {
        return Err(PipelineError::Config(format!(
            "folds must be >= 2, got {}",
            folds
        )));
    }
    if folds > labels.len() {
        return Err(PipelineError::Config(format!(
            "folds ({}) exceeds the number of rows ({})",
            folds,
            labels.len()
        )));
    }

    let mut groups = group_by_label(labels);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut assignments: Vec<Vec<usize>> = vec![Vec::new(); folds];
    // The deal cursor carries across classes so no fold is left empty
    // whenever folds <= n.
    let mut next_fold = 0usize;
    for group in groups.iter_mut() {
        if !group.is_empty() && group.len() < folds {
            log::warn!(
                "Class with {} record(s) cannot appear in all {} folds",
                group.len(),
                folds
            );
        }
        group.shuffle(&mut rng);
        for &idx in group.iter() {
            assignments[next_fold].push(idx);
            next_fold = (next_fold + 1) % folds;
        }
    }

    for fold in assignments.iter_mut() {
        fold.sort_unstable();
    }

    Ok(assignments)
}

/// Indices grouped by label, unsubscribed class first.
fn group_by_label(labels: &[bool]) -> Vec<Vec<usize>> {
    let mut negative = Vec::new();
    let mut positive = Vec::new();
    for (i, &label) in labels.iter().enumerate() {
        if label {
            positive.push(i);
        } else {
            negative.push(i);
        }
    }
    vec![negative, positive]
}
