//! Player dataset cleaning, exploration and nearest-neighbor classification
//!
//! This crate predicts whether a game player subscribed to a newsletter from
//! two numeric features, age and total played hours, and describes how those
//! features are distributed for each label.
//!
//! # Overview
//!
//! The analysis runs in one forward pass:
//!
//! 1. **Load and Clean** ([`dataset::Dataset`]): read the CSV, project it to
//!    the three used columns, drop incomplete rows and outliers
//! 2. **Partition** ([`split::Split`]): seeded train/test split
//! 3. **Standardize** ([`scaling::FeatureScaler`]): center/scale parameters
//!    from the training set only
//! 4. **Fit** ([`knn::KnnClassifier`]): k-nearest-neighbors on the scaled
//!    features
//! 5. **Evaluate** ([`evaluation::Evaluation`]): accuracy, confusion matrix
//!    and a majority-class baseline on the test set
//! 6. **Describe** ([`distribution::LabelHistogram`],
//!    [`distribution::FeatureSummary`]): per-label distributions of both
//!    features over the cleaned dataset
//!
//! [`pipeline::Pipeline`] wires these stages together from a single
//! [`pipeline::PipelineConfig`].
//!
//! # Reproducibility
//!
//! Given the same source file and configuration, every stage produces the
//! same output: the split uses a seeded PCG generator, and neighbor ordering
//! and vote ties are broken deterministically.
//!
//! # Example
//!
//! ```
//! use playerlab_analysis::{
//!     dataset::{CleaningConfig, Dataset},
//!     evaluation::Evaluation,
//!     knn::KnnClassifier,
//! };
//!
//! let csv = "\
//! age,playedHours,subscribed
//! 17,12.0,TRUE
//! 18,14.5,TRUE
//! 19,13.0,TRUE
//! 20,15.0,TRUE
//! 30,0.0,FALSE
//! 31,0.1,FALSE
//! 32,0.2,FALSE
//! 33,0.0,FALSE
//! ";
//! let (dataset, _summary) = Dataset::from_reader(csv.as_bytes(), &CleaningConfig::default())?;
//! let split = dataset.split(0.75, 123)?;
//! let model = KnnClassifier::fit(&split.training, 1)?;
//! let evaluation = Evaluation::evaluate(&model, &split.training, &split.test);
//! assert_eq!(evaluation.accuracy.total, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dataset;
pub mod distribution;
pub mod evaluation;
pub mod knn;
pub mod pipeline;
pub mod record;
pub mod scaling;
pub mod split;
