use std::io;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{classify::ClassifyArg, summarize::SummarizeArg};

mod classify;
mod dataset_arg;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug messages, including every dropped row
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train and evaluate the nearest-neighbor classifier
    Classify(#[clap(flatten)] ClassifyArg),
    /// Describe the cleaned dataset without fitting a model
    Summarize(#[clap(flatten)] SummarizeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match &args.mode {
        Mode::Classify(arg) => classify::run(arg)?,
        Mode::Summarize(arg) => summarize::run(arg)?,
    }
    Ok(())
}

/// Logs go to stderr so the report on stdout stays clean.
///
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
