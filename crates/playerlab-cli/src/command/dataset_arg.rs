use std::path::PathBuf;

use clap::Args;
use playerlab_analysis::pipeline::PipelineConfig;

use crate::util;

/// Input file and cleaning options shared by every subcommand
#[derive(Debug, Clone, Args)]
pub(crate) struct DatasetArg {
    /// Path to the player CSV file
    pub csv: PathBuf,

    /// JSON file with pipeline settings; flags given on the command line win
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drop rows with more played hours than this
    #[arg(long)]
    pub max_played_hours: Option<f64>,

    /// Drop rows with a higher age than this
    #[arg(long)]
    pub max_age: Option<f64>,
}

impl DatasetArg {
    /// Defaults, overridden by the config file, overridden by flags.
    pub fn load_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(max_played_hours) = self.max_played_hours {
            config.max_played_hours = max_played_hours;
        }
        if let Some(max_age) = self.max_age {
            config.max_age = max_age;
        }
        Ok(config)
    }
}
