//! K-nearest-neighbors classifier
//!
//! The classifier standardizes both features with a [`FeatureScaler`] fitted
//! on the training set, stores the scaled training points and labels a query
//! by majority vote among its `k` nearest training points under Euclidean
//! distance.
//!
//! # Determinism
//!
//! - **Neighbor order**: training points are ordered by `(distance, training
//!   position)`. When several points are equidistant at the k-th position,
//!   the ones earlier in the training set (source order) are included.
//! - **Vote ties**: among the labels with the highest count, the label of the
//!   nearest neighbor wins.
//!
//! # Example
//!
//! ```
//! use playerlab_analysis::{
//!     knn::KnnClassifier,
//!     record::{PlayerRecord, Subscription},
//! };
//!
//! let record = |row, age, played_hours, subscription| PlayerRecord {
//!     row,
//!     age,
//!     played_hours,
//!     subscription,
//! };
//! let training = [
//!     record(0, 17.0, 12.0, Subscription::Subscribed),
//!     record(1, 18.0, 14.0, Subscription::Subscribed),
//!     record(2, 30.0, 0.1, Subscription::NotSubscribed),
//!     record(3, 31.0, 0.2, Subscription::NotSubscribed),
//! ];
//! let model = KnnClassifier::fit(&training, 1)?;
//! let query = record(4, 17.5, 13.0, Subscription::NotSubscribed);
//! assert_eq!(model.predict(&query), Subscription::Subscribed);
//! # Ok::<(), playerlab_analysis::knn::FitError>(())
//! ```

use std::{cmp::Ordering, num::NonZeroUsize};

use serde::Serialize;

use crate::{
    record::{PlayerRecord, Subscription},
    scaling::FeatureScaler,
};

/// Default number of neighbors consulted per prediction
pub const DEFAULT_K: usize = 5;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FitError {
    #[display("cannot fit a classifier on an empty training set")]
    EmptyTrainingSet,
    #[display("number of neighbors must be at least 1")]
    ZeroNeighbors,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TrainingPoint {
    row: usize,
    features: [f64; 2],
    subscription: Subscription,
}

/// A training record found near a query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Source row of the training record
    pub row: usize,
    /// Label of the training record
    pub subscription: Subscription,
    /// Euclidean distance in the scaled feature space
    pub distance: f64,
}

/// A fitted k-nearest-neighbors model
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: NonZeroUsize,
    scaler: FeatureScaler,
    points: Vec<TrainingPoint>,
}

impl KnnClassifier {
    /// Fits the scaler on `training` and stores the scaled training points.
    pub fn fit(training: &[PlayerRecord], k: usize) -> Result<Self, FitError> {
        let k = NonZeroUsize::new(k).ok_or(FitError::ZeroNeighbors)?;
        let scaler = FeatureScaler::fit(training).ok_or(FitError::EmptyTrainingSet)?;
        let points = training
            .iter()
            .map(|record| TrainingPoint {
                row: record.row,
                features: scaler.transform(record),
                subscription: record.subscription,
            })
            .collect();
        Ok(Self { k, scaler, points })
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k.get()
    }

    /// Scaling parameters computed from the training set
    #[must_use]
    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    /// Returns the `min(k, |training|)` nearest training records, nearest first.
    ///
    /// Never empty: fitting rejects an empty training set and `k == 0`.
    #[must_use]
    pub fn neighbors(&self, record: &PlayerRecord) -> Vec<Neighbor> {
        let query = self.scaler.transform(record);
        let mut candidates = self
            .points
            .iter()
            .enumerate()
            .map(|(position, point)| (squared_distance(&query, &point.features), position))
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        candidates
            .into_iter()
            .take(self.k.get())
            .map(|(squared, position)| {
                let point = &self.points[position];
                Neighbor {
                    row: point.row,
                    subscription: point.subscription,
                    distance: squared.sqrt(),
                }
            })
            .collect()
    }

    /// Predicts the label of `record` by majority vote among its neighbors.
    #[must_use]
    pub fn predict(&self, record: &PlayerRecord) -> Subscription {
        vote(&self.neighbors(record))
    }

    /// Predicts the label of every record, in order.
    #[must_use]
    pub fn predict_all(&self, records: &[PlayerRecord]) -> Vec<Subscription> {
        records.iter().map(|record| self.predict(record)).collect()
    }
}

fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Majority label of `neighbors` (ordered nearest first).
///
/// A tie goes to the label of the nearest neighbor. An empty list has no
/// nearest neighbor and yields the positive label.
fn vote(neighbors: &[Neighbor]) -> Subscription {
    let subscribed = neighbors
        .iter()
        .filter(|neighbor| neighbor.subscription == Subscription::Subscribed)
        .count();
    let not_subscribed = neighbors.len() - subscribed;
    match subscribed.cmp(&not_subscribed) {
        Ordering::Greater => Subscription::Subscribed,
        Ordering::Less => Subscription::NotSubscribed,
        Ordering::Equal => neighbors
            .first()
            .map_or(Subscription::Subscribed, |nearest| nearest.subscription),
    }
}
