use anyhow::Context;
use clap::Args;
use playerlab_analysis::{
    dataset::CleaningSummary,
    pipeline::{DatasetDescription, Pipeline},
};
use serde::Serialize;

use crate::{command::dataset_arg::DatasetArg, report, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    #[clap(flatten)]
    dataset: DatasetArg,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    cleaning: CleaningSummary,
    description: DatasetDescription,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(arg.dataset.load_config()?)?;
    let (dataset, cleaning) = pipeline
        .load_path(&arg.dataset.csv)
        .with_context(|| format!("Failed to load players from {}", arg.dataset.csv.display()))?;
    let description = pipeline.describe(&dataset);

    if arg.json {
        return Output::save_json(
            &Summary {
                cleaning,
                description,
            },
            None,
        );
    }

    report::print_cleaning_summary(&cleaning);
    report::print_label_balance(&[("Dataset", &description.labels)]);
    report::print_feature_summaries(&description.summaries);
    for histogram in &description.histograms {
        report::print_label_histogram(histogram);
    }
    Ok(())
}
