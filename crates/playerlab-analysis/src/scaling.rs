//! Feature standardization parameters
//!
//! A [`FeatureScaler`] holds the center/scale parameters of each feature,
//! computed from the training set only. Test records and any later queries
//! are transformed with the same parameters, so no information from the test
//! set leaks into the model.
//!
//! # Transformation
//!
//! ```text
//! scaled = (x - mean) / std_dev
//! ```
//!
//! `std_dev` is the sample standard deviation (`n - 1` denominator). If it is
//! zero or undefined (a constant feature or a single training record), the
//! feature is only centered: the scale falls back to `1.0`.
//!
//! # Example
//!
//! ```
//! use playerlab_analysis::{
//!     record::{PlayerRecord, Subscription},
//!     scaling::FeatureScaler,
//! };
//!
//! let training = [(17.0, 1.0), (19.0, 3.0), (21.0, 5.0)]
//!     .map(|(age, played_hours)| PlayerRecord {
//!         row: 0,
//!         age,
//!         played_hours,
//!         subscription: Subscription::Subscribed,
//!     });
//! let scaler = FeatureScaler::fit(&training).unwrap();
//! assert_eq!(scaler.age.mean, 19.0);
//! assert_eq!(scaler.age.std_dev, 2.0);
//! assert_eq!(scaler.transform(&training[2]), [1.0, 1.0]);
//! ```

use playerlab_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::record::{Feature, PlayerRecord};

/// Center/scale parameters for every classifier feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureScaler {
    pub age: FeatureScale,
    pub played_hours: FeatureScale,
}

/// Center/scale parameters for a single feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureScale {
    /// Training-set mean
    pub mean: f64,
    /// Training-set sample standard deviation, or `1.0` when it is zero or undefined
    pub std_dev: f64,
}

impl FeatureScale {
    /// Computes the parameters of one feature from its training values.
    ///
    /// Returns `None` if `values` is empty.
    #[must_use]
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let stats = DescriptiveStats::new(values)?;
        let std_dev = if stats.sample_std_dev.is_finite() && stats.sample_std_dev > 0.0 {
            stats.sample_std_dev
        } else {
            1.0
        };
        Some(Self {
            mean: stats.mean,
            std_dev,
        })
    }

    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

impl FeatureScaler {
    /// Computes scaling parameters from the training records.
    ///
    /// Returns `None` if `training` is empty.
    #[must_use]
    pub fn fit(training: &[PlayerRecord]) -> Option<Self> {
        let scale_of =
            |feature: Feature| FeatureScale::from_values(training.iter().map(|r| feature.value_of(r)));
        Some(Self {
            age: scale_of(Feature::Age)?,
            played_hours: scale_of(Feature::PlayedHours)?,
        })
    }

    #[must_use]
    pub fn get(&self, feature: Feature) -> &FeatureScale {
        match feature {
            Feature::Age => &self.age,
            Feature::PlayedHours => &self.played_hours,
        }
    }

    /// Scaled feature vector of `record`, in [`Feature::ALL`] order.
    #[must_use]
    pub fn transform(&self, record: &PlayerRecord) -> [f64; 2] {
        Feature::ALL.map(|feature| self.get(feature).apply(feature.value_of(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dataset::Dataset, record::Subscription};

    fn record(row: usize, age: f64, played_hours: f64) -> PlayerRecord {
        PlayerRecord {
            row,
            age,
            played_hours,
            subscription: Subscription::Subscribed,
        }
    }

    #[test]
    fn test_scaled_training_has_zero_mean_unit_std() {
        let training = (0..10_u8)
            .map(|i| {
                let x = f64::from(i);
                record(usize::from(i), 15.0 + x * 2.0, 0.3 * x * x)
            })
            .collect::<Vec<_>>();
        let scaler = FeatureScaler::fit(&training).unwrap();
        let scaled = training.iter().map(|r| scaler.transform(r)).collect::<Vec<_>>();
        for dim in 0..2 {
            let stats = DescriptiveStats::new(scaled.iter().map(|v| v[dim])).unwrap();
            assert!(stats.mean.abs() < 1e-12);
            assert!((stats.sample_std_dev - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_feature_is_only_centered() {
        let training = [record(0, 20.0, 1.0), record(1, 20.0, 3.0)];
        let scaler = FeatureScaler::fit(&training).unwrap();
        assert_eq!(scaler.age.std_dev, 1.0);
        assert_eq!(scaler.transform(&record(2, 22.0, 2.0))[0], 2.0);
    }

    #[test]
    fn test_single_record() {
        let scaler = FeatureScaler::fit(&[record(0, 20.0, 1.0)]).unwrap();
        assert_eq!(scaler.age, FeatureScale { mean: 20.0, std_dev: 1.0 });
        assert_eq!(scaler.transform(&record(0, 20.0, 1.0)), [0.0, 0.0]);
    }

    #[test]
    fn test_empty_training() {
        assert!(FeatureScaler::fit(&[]).is_none());
    }

    #[test]
    fn test_test_set_does_not_affect_scaling() {
        let records = (0..20_u8)
            .map(|i| record(usize::from(i), 16.0 + f64::from(i), 0.5))
            .collect::<Vec<_>>();
        let original = Dataset::from_records(records.clone()).unwrap();
        let split = original.split(0.75, 123).unwrap();
        let test_row = split.test[0].row;

        // Same record count and seed give the same partition, so only a
        // test-only value changes.
        let mut perturbed = records;
        perturbed[test_row].age = 1000.0;
        perturbed[test_row].played_hours = 19.9;
        let perturbed = Dataset::from_records(perturbed).unwrap();
        let perturbed_split = perturbed.split(0.75, 123).unwrap();
        assert_ne!(split.test, perturbed_split.test);
        assert_eq!(split.training, perturbed_split.training);

        let scaler = FeatureScaler::fit(&split.training).unwrap();
        let perturbed_scaler = FeatureScaler::fit(&perturbed_split.training).unwrap();
        assert_eq!(scaler, perturbed_scaler);
    }
}
