use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use playerlab_analysis::pipeline::Pipeline;
use tracing::info;

use crate::{command::dataset_arg::DatasetArg, report, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct ClassifyArg {
    #[clap(flatten)]
    dataset: DatasetArg,

    /// Seed of the train/test split
    #[arg(long)]
    seed: Option<u64>,

    /// Share of the cleaned rows used for training
    #[arg(long)]
    train_fraction: Option<f64>,

    /// Number of neighbors consulted per prediction
    #[arg(long)]
    k: Option<usize>,

    /// Also write the full report as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

pub(crate) fn run(arg: &ClassifyArg) -> anyhow::Result<()> {
    let mut config = arg.dataset.load_config()?;
    if let Some(seed) = arg.seed {
        config.seed = seed;
    }
    if let Some(train_fraction) = arg.train_fraction {
        config.train_fraction = train_fraction;
    }
    if let Some(k) = arg.k {
        config.k = k;
    }

    let pipeline = Pipeline::new(config)?;
    let (dataset, cleaning) = pipeline
        .load_path(&arg.dataset.csv)
        .with_context(|| format!("Failed to load players from {}", arg.dataset.csv.display()))?;
    let report = pipeline.run(&dataset, cleaning)?;

    if arg.json {
        Output::save_json(&report, None)?;
    } else {
        report::print_cleaning_summary(&report.cleaning);
        report::print_label_balance(&[
            ("Dataset", &report.description.labels),
            ("Training", &report.classification.training_labels),
            ("Test", &report.classification.test_labels),
        ]);
        report::print_feature_summaries(&report.description.summaries);
        report::print_classification(&report.classification);
        for histogram in &report.description.histograms {
            report::print_label_histogram(histogram);
        }
    }

    if let Some(path) = &arg.output {
        Output::save_json(&report, Some(path.as_path()))?;
        info!("report written to {}", path.display());
    }
    Ok(())
}
