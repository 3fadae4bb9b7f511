//! Statistical utilities for the playerlab project.
//!
//! This crate provides the small numeric building blocks the analysis
//! pipeline needs:
//!
//! - **Descriptive statistics**: count, min, max, mean, median, variance and
//!   standard deviation (population and sample)
//! - **Histogram generation**: fixed-width frequency distributions over an
//!   explicit or data-derived range
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`histogram`]: Histogram construction for visualizing data distributions
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use playerlab_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Creating comparable histograms
//!
//! ```
//! use playerlab_stats::histogram::Histogram;
//!
//! let hours_a = [0.0, 0.5, 1.0, 7.5];
//! let hours_b = [0.2, 15.0, 20.0];
//! let a = Histogram::with_range(hours_a, 20, 0.0, 20.0);
//! let b = Histogram::with_range(hours_b, 20, 0.0, 20.0);
//! assert_eq!(a.bins[0].range, b.bins[0].range);
//! ```

pub mod descriptive;
pub mod histogram;
