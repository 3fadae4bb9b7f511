//! Dataset loading and cleaning
//!
//! This module reads the player CSV, projects it onto the three columns the
//! analysis uses and applies the cleaning rules:
//!
//! 1. **Project** to `age`, `playedHours`, `subscribed`
//! 2. **Drop incomplete rows**: empty, `NA` or malformed values
//! 3. **Drop outliers**: `playedHours > max_played_hours` or `age > max_age`
//! 4. **Recode** the label into [`Subscription`]
//!
//! # Header Matching
//!
//! Column names are compared case-insensitively with `_`, `-` and spaces
//! removed, so `playedHours`, `played_hours` and `PLAYED HOURS` all name the
//! same column. `subscribe` is accepted for `subscribed`.
//!
//! # Errors
//!
//! Only two conditions abort a load: a required column is missing
//! ([`DatasetError::Schema`]) and no row survives cleaning
//! ([`DatasetError::Empty`]). A malformed value never fails the load; the row
//! is dropped and counted in [`CleaningSummary::dropped_incomplete`].
//!
//! # Examples
//!
//! ```
//! use playerlab_analysis::dataset::{CleaningConfig, Dataset};
//!
//! let csv = "\
//! experience,subscribe,hashedEmail,played_hours,name,gender,Age
//! Pro,TRUE,a1,30.3,Morgan,Male,9
//! Veteran,TRUE,b2,3.8,Christian,Male,17
//! Amateur,FALSE,c3,0,Blake,Male,
//! Regular,TRUE,d4,0.7,Flora,Female,21
//! ";
//! let (dataset, summary) = Dataset::from_reader(csv.as_bytes(), &CleaningConfig::default())?;
//! assert_eq!(dataset.len(), 2);
//! assert_eq!(summary.dropped_incomplete, 1);
//! assert_eq!(summary.dropped_outliers, 1);
//! # Ok::<(), playerlab_analysis::dataset::DatasetError>(())
//! ```

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::record::{PlayerRecord, Subscription};

/// Errors that abort dataset loading
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[display("no records left after cleaning")]
    Empty,
    #[display("failed to read CSV header")]
    Csv { source: csv::Error },
    #[display("failed to open dataset file: {}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Outlier cutoffs applied while cleaning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleaningConfig {
    /// Rows with more played hours than this are discarded
    pub max_played_hours: f64,
    /// Rows with a higher age than this are discarded
    pub max_age: f64,
}

impl CleaningConfig {
    pub const DEFAULT_MAX_PLAYED_HOURS: f64 = 20.0;
    pub const DEFAULT_MAX_AGE: f64 = 35.0;
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            max_played_hours: Self::DEFAULT_MAX_PLAYED_HOURS,
            max_age: Self::DEFAULT_MAX_AGE,
        }
    }
}

/// Row accounting for one cleaning pass
///
/// Every data row of the source lands in exactly one bucket, so
/// `rows_read == dropped_incomplete + dropped_outliers + retained`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    pub rows_read: usize,
    pub dropped_incomplete: usize,
    pub dropped_outliers: usize,
    pub retained: usize,
}

/// The cleaned, immutable player dataset in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<PlayerRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Age,
    PlayedHours,
    Subscribed,
}

impl Column {
    const ALL: [Self; 3] = [Self::Age, Self::PlayedHours, Self::Subscribed];

    fn name(self) -> &'static str {
        match self {
            Column::Age => "age",
            Column::PlayedHours => "playedHours",
            Column::Subscribed => "subscribed",
        }
    }

    fn matches(self, normalized_header: &str) -> bool {
        match self {
            Column::Age => normalized_header == "age",
            Column::PlayedHours => normalized_header == "playedhours",
            Column::Subscribed => matches!(normalized_header, "subscribed" | "subscribe"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    age: usize,
    played_hours: usize,
    subscribed: usize,
}

impl ColumnIndices {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let normalized = headers.iter().map(normalize_header).collect::<Vec<_>>();
        let find = |column: Column| normalized.iter().position(|h| column.matches(h));

        let found = Column::ALL.map(find);
        let missing = Column::ALL
            .iter()
            .zip(&found)
            .filter(|(_, idx)| idx.is_none())
            .map(|(column, _)| column.name().to_owned())
            .collect::<Vec<_>>();
        match found {
            [Some(age), Some(played_hours), Some(subscribed)] => Ok(Self {
                age,
                played_hours,
                subscribed,
            }),
            _ => Err(DatasetError::Schema { missing }),
        }
    }
}

enum RowOutcome {
    Retained(PlayerRecord),
    Incomplete(&'static str),
    Outlier,
}

impl Dataset {
    /// Wraps already-clean records.
    ///
    /// The records are taken as-is; no cutoff is applied.
    pub fn from_records(records: Vec<PlayerRecord>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { records })
    }

    /// Loads and cleans a dataset from a CSV file.
    pub fn from_path<P>(
        path: P,
        config: &CleaningConfig,
    ) -> Result<(Self, CleaningSummary), DatasetError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// Loads and cleans a dataset from CSV text with a header row.
    pub fn from_reader<R>(
        reader: R,
        config: &CleaningConfig,
    ) -> Result<(Self, CleaningSummary), DatasetError>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|source| DatasetError::Csv { source })?;
        let indices = ColumnIndices::from_headers(headers)?;

        let mut summary = CleaningSummary::default();
        let mut records = vec![];
        for (row, result) in reader.records().enumerate() {
            summary.rows_read += 1;
            let outcome = match result {
                Ok(fields) => clean_row(row, &fields, indices, config),
                Err(e) => {
                    warn!("skipping undecodable row {row}: {e}");
                    RowOutcome::Incomplete("undecodable record")
                }
            };
            match outcome {
                RowOutcome::Retained(record) => {
                    summary.retained += 1;
                    records.push(record);
                }
                RowOutcome::Incomplete(reason) => {
                    debug!("dropping row {row}: {reason}");
                    summary.dropped_incomplete += 1;
                }
                RowOutcome::Outlier => {
                    debug!("dropping row {row}: outside cutoffs");
                    summary.dropped_outliers += 1;
                }
            }
        }

        info!(
            "cleaned dataset: {} rows read, {} incomplete, {} outliers, {} retained",
            summary.rows_read, summary.dropped_incomplete, summary.dropped_outliers, summary.retained
        );

        let dataset = Self::from_records(records)?;
        Ok((dataset, summary))
    }

    #[must_use]
    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize_header(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_number(field: Option<&str>) -> Option<f64> {
    let field = field?.trim();
    if field.is_empty() || field.eq_ignore_ascii_case("na") {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn clean_row(
    row: usize,
    fields: &csv::StringRecord,
    indices: ColumnIndices,
    config: &CleaningConfig,
) -> RowOutcome {
    let Some(age) = parse_number(fields.get(indices.age)) else {
        return RowOutcome::Incomplete("missing or malformed age");
    };
    let Some(played_hours) = parse_number(fields.get(indices.played_hours)) else {
        return RowOutcome::Incomplete("missing or malformed playedHours");
    };
    if played_hours < 0.0 {
        return RowOutcome::Incomplete("negative playedHours");
    }
    let Some(subscription) = fields.get(indices.subscribed).and_then(Subscription::parse) else {
        return RowOutcome::Incomplete("missing or unrecognized subscribed label");
    };

    if played_hours > config.max_played_hours || age > config.max_age {
        return RowOutcome::Outlier;
    }

    RowOutcome::Retained(PlayerRecord {
        row,
        age,
        played_hours,
        subscription,
    })
}
