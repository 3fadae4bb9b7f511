//! End-to-end analysis pipeline
//!
//! [`Pipeline`] runs the stages in a single forward pass:
//!
//! ```text
//! CSV ─→ load/clean ─→ Dataset ─┬─→ describe ─→ DatasetDescription
//!                               └─→ split ─→ fit ─→ evaluate ─→ Classification
//! ```
//!
//! Every constant the stages use lives in [`PipelineConfig`], which can be
//! deserialized from JSON. Re-running with the same config and source gives
//! the same report.
//!
//! # Example
//!
//! ```
//! use playerlab_analysis::pipeline::{Pipeline, PipelineConfig};
//!
//! let csv = "\
//! age,playedHours,subscribed
//! 17,12.0,TRUE
//! 18,14.5,TRUE
//! 19,13.0,TRUE
//! 30,0.0,FALSE
//! 31,0.1,FALSE
//! 32,0.2,FALSE
//! ";
//! let pipeline = Pipeline::new(PipelineConfig { k: 1, ..PipelineConfig::default() })?;
//! let (dataset, cleaning) = pipeline.load_reader(csv.as_bytes())?;
//! let report = pipeline.run(&dataset, cleaning)?;
//! assert_eq!(report.cleaning.retained, 6);
//! assert_eq!(report.classification.training_labels.total(), 5);
//! # Ok::<(), playerlab_analysis::pipeline::PipelineError>(())
//! ```

use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    dataset::{CleaningConfig, CleaningSummary, Dataset, DatasetError},
    distribution::{DEFAULT_AGE_BINS, DEFAULT_PLAYED_HOURS_BINS, FeatureSummary, LabelHistogram},
    evaluation::Evaluation,
    knn::{DEFAULT_K, FitError, KnnClassifier},
    record::{Feature, LabelCounts},
    scaling::FeatureScaler,
    split::{DEFAULT_SEED, DEFAULT_TRAIN_FRACTION, SplitError},
};

/// Every tunable constant of the analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Share of cleaned records assigned to the training set
    pub train_fraction: f64,
    /// Seed of the train/test partition
    pub seed: u64,
    /// Number of neighbors consulted per prediction
    pub k: usize,
    /// Outlier cutoff for played hours
    pub max_played_hours: f64,
    /// Outlier cutoff for age
    pub max_age: f64,
    /// Bin count of the played-hours histogram
    pub played_hours_bins: usize,
    /// Bin count of the age histogram
    pub age_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed: DEFAULT_SEED,
            k: DEFAULT_K,
            max_played_hours: CleaningConfig::DEFAULT_MAX_PLAYED_HOURS,
            max_age: CleaningConfig::DEFAULT_MAX_AGE,
            played_hours_bins: DEFAULT_PLAYED_HOURS_BINS,
            age_bins: DEFAULT_AGE_BINS,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("train_fraction must be within [0, 1], got {value}")]
    InvalidTrainFraction { value: f64 },
    #[display("k must be at least 1")]
    ZeroNeighbors,
    #[display("{name} must be at least 1")]
    ZeroBins { name: &'static str },
    #[display("{name} must be a finite number, got {value}")]
    NonFiniteCutoff { name: &'static str, value: f64 },
}

impl PipelineConfig {
    /// Checks every value before any work is done.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.train_fraction) {
            return Err(ConfigError::InvalidTrainFraction {
                value: self.train_fraction,
            });
        }
        if self.k == 0 {
            return Err(ConfigError::ZeroNeighbors);
        }
        for (name, bins) in [
            ("played_hours_bins", self.played_hours_bins),
            ("age_bins", self.age_bins),
        ] {
            if bins == 0 {
                return Err(ConfigError::ZeroBins { name });
            }
        }
        for (name, value) in [
            ("max_played_hours", self.max_played_hours),
            ("max_age", self.max_age),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteCutoff { name, value });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn cleaning(&self) -> CleaningConfig {
        CleaningConfig {
            max_played_hours: self.max_played_hours,
            max_age: self.max_age,
        }
    }

    /// Histogram bin count used for `feature`
    #[must_use]
    pub fn bins(&self, feature: Feature) -> usize {
        match feature {
            Feature::Age => self.age_bins,
            Feature::PlayedHours => self.played_hours_bins,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PipelineError {
    #[display("invalid pipeline configuration")]
    Config(ConfigError),
    #[display("failed to load dataset")]
    Dataset(DatasetError),
    #[display("failed to split dataset")]
    Split(SplitError),
    #[display("failed to fit classifier")]
    Fit(FitError),
}

/// Descriptive part of the report
#[derive(Debug, Clone, Serialize)]
pub struct DatasetDescription {
    pub labels: LabelCounts,
    pub summaries: Vec<FeatureSummary>,
    pub histograms: Vec<LabelHistogram>,
}

/// Classification part of the report
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub training_labels: LabelCounts,
    pub test_labels: LabelCounts,
    pub k: usize,
    pub scaler: FeatureScaler,
    pub evaluation: Evaluation,
}

/// Everything one run produces
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub config: PipelineConfig,
    pub cleaning: CleaningSummary,
    pub description: DatasetDescription,
    pub classification: Classification,
}

/// A validated pipeline configuration with the stage entry points
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn load_path<P>(&self, path: P) -> Result<(Dataset, CleaningSummary), PipelineError>
    where
        P: AsRef<Path>,
    {
        Ok(Dataset::from_path(path, &self.config.cleaning())?)
    }

    pub fn load_reader<R>(&self, reader: R) -> Result<(Dataset, CleaningSummary), PipelineError>
    where
        R: io::Read,
    {
        Ok(Dataset::from_reader(reader, &self.config.cleaning())?)
    }

    /// Label balance, per-label summaries and histograms of the whole dataset.
    #[must_use]
    pub fn describe(&self, dataset: &Dataset) -> DatasetDescription {
        let records = dataset.records();
        // played hours first, matching the report order
        let features = [Feature::PlayedHours, Feature::Age];
        DatasetDescription {
            labels: LabelCounts::from_records(records),
            summaries: features
                .iter()
                .map(|&feature| FeatureSummary::new(feature, records))
                .collect(),
            histograms: features
                .iter()
                .map(|&feature| LabelHistogram::new(feature, records, self.config.bins(feature)))
                .collect(),
        }
    }

    /// Splits the dataset, fits the classifier and scores it on the test set.
    pub fn classify(&self, dataset: &Dataset) -> Result<Classification, PipelineError> {
        let split = dataset.split(self.config.train_fraction, self.config.seed)?;
        let model = KnnClassifier::fit(&split.training, self.config.k)?;
        let evaluation = Evaluation::evaluate(&model, &split.training, &split.test);
        Ok(Classification {
            training_labels: LabelCounts::from_records(&split.training),
            test_labels: LabelCounts::from_records(&split.test),
            k: model.k(),
            scaler: *model.scaler(),
            evaluation,
        })
    }

    pub fn run(
        &self,
        dataset: &Dataset,
        cleaning: CleaningSummary,
    ) -> Result<PipelineReport, PipelineError> {
        let description = self.describe(dataset);
        let classification = self.classify(dataset)?;
        Ok(PipelineReport {
            config: self.config.clone(),
            cleaning,
            description,
            classification,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use super::*;
    use crate::{
        evaluation::Accuracy,
        record::{PlayerRecord, Subscription},
    };

    /// Two well-separated clusters: young heavy players who subscribed and
    /// older light players who did not.
    fn cluster_records() -> Vec<PlayerRecord> {
        (0..20_u8)
            .map(|i| {
                let offset = f64::from(i % 10) * 0.1;
                let (age, played_hours, subscription) = if i % 2 == 0 {
                    (17.0 + offset, 15.0 + offset, Subscription::Subscribed)
                } else {
                    (33.0 + offset, 0.5 + offset, Subscription::NotSubscribed)
                };
                PlayerRecord {
                    row: usize::from(i),
                    age,
                    played_hours,
                    subscription,
                }
            })
            .collect()
    }

    fn cluster_csv() -> String {
        let mut csv = String::from("hashedEmail,Age,gender,subscribe,experience,played_hours,name\n");
        for record in cluster_records() {
            let label = match record.subscription {
                Subscription::Subscribed => "TRUE",
                Subscription::NotSubscribed => "FALSE",
            };
            writeln!(
                csv,
                "id{},{},Male,{label},Regular,{},Player{}",
                record.row, record.age, record.played_hours, record.row
            )
            .unwrap();
        }
        csv
    }

    #[test]
    fn test_default_config_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.train_fraction, 0.75);
        assert_eq!(config.seed, 123);
        assert_eq!(config.k, 5);
        assert_eq!(config.max_played_hours, 20.0);
        assert_eq!(config.max_age, 35.0);
        assert_eq!(config.played_hours_bins, 20);
        assert_eq!(config.age_bins, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: PipelineConfig = serde_json::from_str(r#"{ "seed": 7, "k": 3 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.k, 3);
        assert_eq!(config.train_fraction, 0.75);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let result = serde_json::from_str::<PipelineConfig>(r#"{ "neighbours": 3 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation() {
        let invalid = [
            PipelineConfig {
                train_fraction: 1.2,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                k: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                age_bins: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                max_age: f64::NAN,
                ..PipelineConfig::default()
            },
        ];
        for config in invalid {
            assert!(matches!(
                Pipeline::new(config),
                Err(PipelineError::Config(_))
            ));
        }
    }

    #[test]
    fn test_golden_clusters_from_csv() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let (dataset, cleaning) = pipeline.load_reader(cluster_csv().as_bytes()).unwrap();
        assert_eq!(cleaning.retained, 20);

        let report = pipeline.run(&dataset, cleaning).unwrap();
        let classification = &report.classification;
        assert_eq!(classification.training_labels.total(), 15);
        assert_eq!(classification.test_labels.total(), 5);
        assert_eq!(
            classification.evaluation.accuracy,
            Accuracy {
                correct: 5,
                total: 5
            }
        );
        assert_eq!(classification.evaluation.accuracy.value(), 1.0);
    }

    #[test]
    fn test_golden_clusters_with_fixed_halves() {
        let records = cluster_records();
        let (training, test): (Vec<_>, Vec<_>) = records.iter().partition(|r| r.row < 10);
        let training = training.into_iter().copied().collect::<Vec<_>>();
        let test = test.into_iter().copied().collect::<Vec<_>>();

        let model = KnnClassifier::fit(&training, DEFAULT_K).unwrap();
        let evaluation = Evaluation::evaluate(&model, &training, &test);
        assert_eq!(evaluation.accuracy.total, 10);
        assert_eq!(evaluation.accuracy.value(), 1.0);
    }

    #[test]
    fn test_report_json_carries_accuracy() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let (dataset, cleaning) = pipeline.load_reader(cluster_csv().as_bytes()).unwrap();
        let report = pipeline.run(&dataset, cleaning).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        let evaluation = &json["classification"]["evaluation"];
        assert_eq!(evaluation["accuracy"]["value"], 1.0);
        assert_eq!(evaluation["accuracy"]["correct"], 5);
        assert!(evaluation["baseline_accuracy"]["value"].is_number());
        assert!(evaluation["confusion"].get("precision").is_some());
        assert_eq!(json["config"]["seed"], 123);
        assert_eq!(json["description"]["histograms"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_report_json_marks_empty_test_set() {
        let config = PipelineConfig {
            train_fraction: 1.0,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let dataset = Dataset::from_records(cluster_records()).unwrap();
        let report = pipeline.run(&dataset, CleaningSummary::default()).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        let accuracy = &json["classification"]["evaluation"]["accuracy"];
        assert_eq!(accuracy["total"], 0);
        assert!(accuracy["value"].is_null());
        assert_eq!(accuracy["undefined"], "empty test set");
    }

    #[test]
    fn test_run_is_reproducible() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let dataset = Dataset::from_records(cluster_records()).unwrap();
        let a = pipeline.classify(&dataset).unwrap();
        let b = pipeline.classify(&dataset).unwrap();
        assert_eq!(a.evaluation.predictions, b.evaluation.predictions);
        assert_eq!(a.scaler, b.scaler);
    }

    #[test]
    fn test_full_training_fraction_reports_nan_accuracy() {
        let config = PipelineConfig {
            train_fraction: 1.0,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let dataset = Dataset::from_records(cluster_records()).unwrap();
        let classification = pipeline.classify(&dataset).unwrap();
        assert!(classification.evaluation.accuracy.value().is_nan());
    }

    #[test]
    fn test_zero_training_fraction_fails_to_fit() {
        let config = PipelineConfig {
            train_fraction: 0.0,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(config).unwrap();
        let dataset = Dataset::from_records(cluster_records()).unwrap();
        assert!(matches!(
            pipeline.classify(&dataset),
            Err(PipelineError::Fit(FitError::EmptyTrainingSet))
        ));
    }

    #[test]
    fn test_describe_uses_configured_bins() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let dataset = Dataset::from_records(cluster_records()).unwrap();
        let description = pipeline.describe(&dataset);
        assert_eq!(description.labels.total(), 20);
        assert_eq!(description.histograms[0].feature, Feature::PlayedHours);
        assert_eq!(description.histograms[0].subscribed.bins.len(), 20);
        assert_eq!(description.histograms[1].feature, Feature::Age);
        assert_eq!(description.histograms[1].subscribed.bins.len(), 15);
    }

    #[test]
    fn test_schema_error_surfaces() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let result = pipeline.load_reader("age,subscribed\n20,TRUE\n".as_bytes());
        assert!(matches!(
            result,
            Err(PipelineError::Dataset(DatasetError::Schema { .. }))
        ));
    }
}
