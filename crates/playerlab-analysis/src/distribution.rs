//! Feature distributions grouped by label
//!
//! This module backs the descriptive part of the report: for each feature it
//! builds one histogram per label over a shared range, and a descriptive
//! summary per label, so the two label groups can be compared side by side.
//!
//! # Shared Bins
//!
//! Both histograms of a [`LabelHistogram`] use the minimum and maximum of the
//! feature over all given records as their range, so bin `i` covers the same
//! interval for both labels.
//!
//! ```
//! use playerlab_analysis::{
//!     distribution::LabelHistogram,
//!     record::{Feature, PlayerRecord, Subscription},
//! };
//!
//! let records = [
//!     (0.0, Subscription::NotSubscribed),
//!     (1.0, Subscription::Subscribed),
//!     (20.0, Subscription::Subscribed),
//! ]
//! .map(|(played_hours, subscription)| PlayerRecord {
//!     row: 0,
//!     age: 20.0,
//!     played_hours,
//!     subscription,
//! });
//! let histogram = LabelHistogram::new(Feature::PlayedHours, &records, 20);
//! assert_eq!(histogram.subscribed.total(), 2);
//! assert_eq!(histogram.not_subscribed.total(), 1);
//! assert_eq!(histogram.subscribed.bins[19].range.end, 20.0);
//! ```

use playerlab_stats::{descriptive::DescriptiveStats, histogram::Histogram};
use serde::Serialize;

use crate::record::{Feature, PlayerRecord, Subscription};

/// Default bin count of the played-hours histogram
pub const DEFAULT_PLAYED_HOURS_BINS: usize = 20;
/// Default bin count of the age histogram
pub const DEFAULT_AGE_BINS: usize = 15;

/// Histograms of one feature, one per label, with shared bin boundaries
#[derive(Debug, Clone, Serialize)]
pub struct LabelHistogram {
    pub feature: Feature,
    pub subscribed: Histogram,
    pub not_subscribed: Histogram,
}

impl LabelHistogram {
    #[must_use]
    pub fn new(feature: Feature, records: &[PlayerRecord], num_bins: usize) -> Self {
        let values = || records.iter().map(move |r| feature.value_of(r));
        let min = values().fold(f64::INFINITY, f64::min);
        let max = values().fold(f64::NEG_INFINITY, f64::max);

        let histogram_of = |label: Subscription| {
            let values = records
                .iter()
                .filter(|r| r.subscription == label)
                .map(|r| feature.value_of(r));
            if records.is_empty() {
                Histogram::new(values, num_bins)
            } else {
                Histogram::with_range(values, num_bins, min, max)
            }
        };

        Self {
            feature,
            subscribed: histogram_of(Subscription::Subscribed),
            not_subscribed: histogram_of(Subscription::NotSubscribed),
        }
    }

    #[must_use]
    pub fn get(&self, label: Subscription) -> &Histogram {
        match label {
            Subscription::Subscribed => &self.subscribed,
            Subscription::NotSubscribed => &self.not_subscribed,
        }
    }

    /// Largest bin count across both labels
    #[must_use]
    pub fn max_count(&self) -> u64 {
        u64::max(self.subscribed.max_count(), self.not_subscribed.max_count())
    }
}

/// Descriptive statistics of one feature, overall and per label
///
/// A label without records has no statistics (`None`).
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub feature: Feature,
    pub overall: Option<DescriptiveStats>,
    pub subscribed: Option<DescriptiveStats>,
    pub not_subscribed: Option<DescriptiveStats>,
}

impl FeatureSummary {
    #[must_use]
    pub fn new(feature: Feature, records: &[PlayerRecord]) -> Self {
        let stats_of = |label: Option<Subscription>| {
            DescriptiveStats::new(
                records
                    .iter()
                    .filter(|r| label.is_none_or(|label| r.subscription == label))
                    .map(|r| feature.value_of(r)),
            )
        };
        Self {
            feature,
            overall: stats_of(None),
            subscribed: stats_of(Some(Subscription::Subscribed)),
            not_subscribed: stats_of(Some(Subscription::NotSubscribed)),
        }
    }

    #[must_use]
    pub fn get(&self, label: Subscription) -> Option<&DescriptiveStats> {
        match label {
            Subscription::Subscribed => self.subscribed.as_ref(),
            Subscription::NotSubscribed => self.not_subscribed.as_ref(),
        }
    }
}
