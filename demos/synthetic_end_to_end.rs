use playerlab_classifiers::config::PipelineConfig;
use playerlab_classifiers::data_handling::{Dataset, RawPlayerRow};
use playerlab_classifiers::pipeline::run_pipeline;
use playerlab_classifiers::report::{render_accuracy_table, render_metrics};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Tiny synthetic roster: subscribed players skew young with many
    // played hours, non-subscribers older with few.
    let mut rows = Vec::new();
    for i in 0..12 {
        rows.push(RawPlayerRow {
            age: Some(16.0 + i as f64),
            gender: if i % 2 == 0 { "Male" } else { "Female" }.to_string(),
            experience: "Amateur".to_string(),
            played_hours: 30.0 - i as f64,
            subscribe: true,
        });
        rows.push(RawPlayerRow {
            age: Some(40.0 + i as f64),
            gender: if i % 2 == 0 { "Female" } else { "Male" }.to_string(),
            experience: "Veteran".to_string(),
            played_hours: 2.0 + (i % 3) as f64,
            subscribe: false,
        });
    }

    let (dataset, dropped) = Dataset::from_rows(rows);
    println!("Cleaned dataset: {} rows ({} dropped)", dataset.len(), dropped);

    let config = PipelineConfig {
        candidate_ks: vec![1, 3, 5, 7],
        folds: 4,
        ..PipelineConfig::default()
    };

    let outcome = run_pipeline(&dataset, &config)?;

    println!(
        "Train {} / test {}, selected k={}",
        outcome.train_size, outcome.test_size, outcome.tuning.best_k
    );
    print!("{}", render_accuracy_table(&outcome.tuning));
    print!("{}", render_metrics(&outcome.report));

    Ok(())
}
