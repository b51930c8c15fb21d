//! Plain-text and CSV rendering of pipeline results.
//!
//! The pipeline itself only produces values; this module turns them into
//! something a person can read or a spreadsheet can ingest. There is no
//! plotting here on purpose.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chrono::Local;

use crate::stats::MetricsReport;
use crate::tune::TuneOutcome;

/// Render the per-k cross-validation accuracy curve as an aligned text
/// table, marking the selected k.
pub fn render_accuracy_table(outcome: &TuneOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Cross-validation accuracy by k (generated {})",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "{:>4} {:>6} {:>10}  folds", "", "k", "mean");
    for entry in &outcome.accuracy_by_k {
        let marker = if entry.k == outcome.best_k { "*" } else { "" };
        let folds = entry
            .fold_accuracies
            .iter()
            .map(|a| format!("{:.3}", a))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            out,
            "{:>4} {:>6} {:>10.4}  {}",
            marker, entry.k, entry.mean_accuracy, folds
        );
    }
    out
}

/// Render a metrics report: accuracy, a 95% interval, and the confusion
/// matrix relative to the positive class.
pub fn render_metrics(report: &MetricsReport) -> String {
    let mut out = String::new();
    let c = &report.confusion;
    let _ = writeln!(
        out,
        "Accuracy: {:.4} ({} of {} correct)",
        report.accuracy,
        c.correct(),
        c.total()
    );
    if let Ok((lo, hi)) = report.accuracy_interval(0.95) {
        let _ = writeln!(out, "95% interval: [{:.4}, {:.4}]", lo, hi);
    }
    let _ = writeln!(out, "Confusion matrix (rows = truth, cols = prediction):");
    let _ = writeln!(out, "{:>12} {:>10} {:>10}", "", "subscribed", "not");
    let _ = writeln!(
        out,
        "{:>12} {:>10} {:>10}",
        "subscribed", c.true_positive, c.false_negative
    );
    let _ = writeln!(
        out,
        "{:>12} {:>10} {:>10}",
        "not", c.false_positive, c.true_negative
    );
    out
}

/// Export the accuracy curve as a CSV table: one row per candidate k, one
/// column per fold plus the mean.
pub fn write_accuracy_csv<P: AsRef<Path>>(path: P, outcome: &TuneOutcome) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(&path).with_context(|| {
        format!(
            "failed to create accuracy table {}",
            path.as_ref().display()
        )
    })?;

    let n_folds = outcome
        .accuracy_by_k
        .first()
        .map(|entry| entry.fold_accuracies.len())
        .unwrap_or(0);
    let mut header = vec!["k".to_string(), "mean_accuracy".to_string()];
    header.extend((1..=n_folds).map(|i| format!("fold_{}", i)));
    writer.write_record(&header).context("failed to write header")?;

    for entry in &outcome.accuracy_by_k {
        let mut record = vec![entry.k.to_string(), format!("{}", entry.mean_accuracy)];
        record.extend(entry.fold_accuracies.iter().map(|a| format!("{}", a)));
        writer
            .write_record(&record)
            .with_context(|| format!("failed to write row for k={}", entry.k))?;
    }

    writer.flush().context("failed to flush accuracy table")?;
    Ok(())
}
