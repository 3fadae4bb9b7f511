//! Text rendering of analysis results
//!
//! Everything here prints to stdout; logs go to stderr through `tracing`.

use std::fmt;

use playerlab_analysis::{
    dataset::CleaningSummary,
    distribution::{FeatureSummary, LabelHistogram},
    pipeline::Classification,
    record::{Feature, LabelCounts, Subscription},
};
use playerlab_stats::{descriptive::DescriptiveStats, histogram::Histogram};

const MAX_BAR_WIDTH: u64 = 50;

pub(crate) fn print_cleaning_summary(summary: &CleaningSummary) {
    println!("Cleaning");
    println!("  Rows read:          {:>6}", summary.rows_read);
    println!("  Dropped incomplete: {:>6}", summary.dropped_incomplete);
    println!("  Dropped outliers:   {:>6}", summary.dropped_outliers);
    println!("  Retained:           {:>6}", summary.retained);
    println!();
}

pub(crate) fn print_label_balance(rows: &[(&str, &LabelCounts)]) {
    println!("Label balance");
    println!(
        "  {:<12} {:>12} {:>16} {:>8} {:>12}",
        "Set", "Subscribed", "Not subscribed", "Total", "Subscribed%"
    );
    println!("  {}", "-".repeat(64));
    for (name, counts) in rows {
        println!(
            "  {:<12} {:>12} {:>16} {:>8} {:>11.1}%",
            name,
            counts.subscribed,
            counts.not_subscribed,
            counts.total(),
            counts.ratio(Subscription::Subscribed) * 100.0,
        );
    }
    println!();
}

pub(crate) fn print_feature_summaries(summaries: &[FeatureSummary]) {
    for summary in summaries {
        println!("{} by label", summary.feature);
        println!(
            "  {:<16} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "Label", "Count", "Min", "Max", "Mean", "Median", "SD"
        );
        println!("  {}", "-".repeat(70));
        print_stats_row("all", summary.overall.as_ref());
        for label in Subscription::ALL {
            print_stats_row(label, summary.get(label));
        }
        println!();
    }
}

fn print_stats_row<L>(label: L, stats: Option<&DescriptiveStats>)
where
    L: fmt::Display,
{
    match stats {
        Some(stats) => println!(
            "  {:<16} {:>6} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2}",
            label,
            stats.count,
            stats.min,
            stats.max,
            stats.mean,
            stats.median,
            stats.sample_std_dev,
        ),
        None => println!("  {label:<16} {:>6}", 0),
    }
}

pub(crate) fn print_classification(classification: &Classification) {
    let evaluation = &classification.evaluation;
    let confusion = &evaluation.confusion;

    println!("Classification (k = {})", classification.k);
    println!("  Scaling (training set):");
    for feature in Feature::ALL {
        let scale = classification.scaler.get(feature);
        println!(
            "    {:<12} mean {:>8.3}  sd {:>8.3}",
            feature, scale.mean, scale.std_dev
        );
    }
    println!("  Accuracy:             {}", evaluation.accuracy);
    println!(
        "  Baseline (always {}): {}",
        evaluation.baseline_label, evaluation.baseline_accuracy
    );
    println!("  Precision:            {:.4}", confusion.precision());
    println!("  Recall:               {:.4}", confusion.recall());
    println!();
    println!(
        "  {:<24} {:>16} {:>16}",
        "actual \\ predicted", Subscription::Subscribed, Subscription::NotSubscribed
    );
    for actual in Subscription::ALL {
        println!(
            "  {:<24} {:>16} {:>16}",
            actual,
            confusion.get(actual, Subscription::Subscribed),
            confusion.get(actual, Subscription::NotSubscribed),
        );
    }
    println!();
}

/// Prints one bar chart per label, all on the same horizontal scale.
pub(crate) fn print_label_histogram(histogram: &LabelHistogram) {
    let max_count = histogram.max_count();
    println!(
        "{} histogram ({} bins)",
        histogram.feature,
        histogram.subscribed.bins.len()
    );
    for label in Subscription::ALL {
        println!("  {label}");
        print_histogram(histogram.get(label), max_count);
    }
    println!();
}

fn print_histogram(histogram: &Histogram, max_count: u64) {
    let last = histogram.bins.len().saturating_sub(1);
    for (i, bin) in histogram.bins.iter().enumerate() {
        let close = if i == last { ']' } else { ')' };
        let label = format!("[{:.2}, {:.2}{close}", bin.range.start, bin.range.end);
        println!(
            "{:>22} | {:<5} {}",
            label,
            bin.count,
            "#".repeat(bar_width(bin.count, max_count))
        );
    }
}

#[expect(clippy::cast_possible_truncation)]
fn bar_width(count: u64, max_count: u64) -> usize {
    if max_count == 0 {
        return 0;
    }
    ((count * MAX_BAR_WIDTH) / max_count) as usize
}
