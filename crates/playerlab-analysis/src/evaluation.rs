//! Classifier evaluation on the test set
//!
//! Scoring never mutates the model or the test records. All ratios are
//! `NaN` when their denominator is zero, so an empty test set yields an
//! undefined accuracy rather than a division-by-zero panic.
//!
//! # Metrics
//!
//! - [`Accuracy`]: fraction of test records predicted correctly
//! - [`ConfusionMatrix`]: 2x2 counts with [`Subscription::Subscribed`] as the
//!   positive label, plus precision and recall
//! - **Baseline**: accuracy of always predicting the majority training label

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::info;

use crate::{
    knn::KnnClassifier,
    record::{LabelCounts, PlayerRecord, Subscription},
};

/// Correct predictions out of a total
///
/// Serialized with its `value`, which is `null` together with
/// `"undefined": "empty test set"` when nothing was scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub total: usize,
}

impl Accuracy {
    /// Scores `predicted` against the true labels of `records`.
    ///
    /// # Panics
    ///
    /// Panics if the two slices have different lengths.
    #[must_use]
    pub fn score(records: &[PlayerRecord], predicted: &[Subscription]) -> Self {
        assert_eq!(
            records.len(),
            predicted.len(),
            "one prediction per record is required"
        );
        let correct = records
            .iter()
            .zip(predicted)
            .filter(|(record, predicted)| record.subscription == **predicted)
            .count();
        Self {
            correct,
            total: records.len(),
        }
    }

    /// Accuracy in `[0, 1]`, or `NaN` when nothing was scored.
    ///
    /// # Examples
    ///
    /// ```
    /// use playerlab_analysis::evaluation::Accuracy;
    ///
    /// assert_eq!(Accuracy { correct: 3, total: 4 }.value(), 0.75);
    /// assert!(Accuracy { correct: 0, total: 0 }.value().is_nan());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn value(&self) -> f64 {
        if self.total == 0 {
            return f64::NAN;
        }
        self.correct as f64 / self.total as f64
    }
}

#[derive(Serialize)]
struct AccuracyJson {
    correct: usize,
    total: usize,
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    undefined: Option<&'static str>,
}

impl Serialize for Accuracy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = defined(self.value());
        AccuracyJson {
            correct: self.correct,
            total: self.total,
            value,
            undefined: value.is_none().then_some("empty test set"),
        }
        .serialize(serializer)
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "NaN (empty test set)")
        } else {
            write!(f, "{:.4} ({}/{})", self.value(), self.correct, self.total)
        }
    }
}

/// 2x2 confusion matrix with `Subscribed` as the positive label
///
/// Serialized with `precision` and `recall`, `null` when undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    /// # Panics
    ///
    /// Panics if the two slices have different lengths.
    #[must_use]
    pub fn from_predictions(records: &[PlayerRecord], predicted: &[Subscription]) -> Self {
        assert_eq!(
            records.len(),
            predicted.len(),
            "one prediction per record is required"
        );
        let mut matrix = Self::default();
        for (record, &predicted) in records.iter().zip(predicted) {
            match (record.subscription, predicted) {
                (Subscription::Subscribed, Subscription::Subscribed) => matrix.true_positive += 1,
                (Subscription::NotSubscribed, Subscription::Subscribed) => {
                    matrix.false_positive += 1;
                }
                (Subscription::NotSubscribed, Subscription::NotSubscribed) => {
                    matrix.true_negative += 1;
                }
                (Subscription::Subscribed, Subscription::NotSubscribed) => {
                    matrix.false_negative += 1;
                }
            }
        }
        matrix
    }

    /// Count of records with true label `actual` predicted as `predicted`.
    #[must_use]
    pub fn get(&self, actual: Subscription, predicted: Subscription) -> usize {
        match (actual, predicted) {
            (Subscription::Subscribed, Subscription::Subscribed) => self.true_positive,
            (Subscription::NotSubscribed, Subscription::Subscribed) => self.false_positive,
            (Subscription::NotSubscribed, Subscription::NotSubscribed) => self.true_negative,
            (Subscription::Subscribed, Subscription::NotSubscribed) => self.false_negative,
        }
    }

    #[must_use]
    pub fn accuracy(&self) -> Accuracy {
        Accuracy {
            correct: self.true_positive + self.true_negative,
            total: self.true_positive
                + self.false_positive
                + self.true_negative
                + self.false_negative,
        }
    }

    /// `TP / (TP + FP)`, `NaN` if nothing was predicted positive
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `TP / (TP + FN)`, `NaN` if there are no positive records
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }
}

#[derive(Serialize)]
struct ConfusionMatrixJson {
    true_positive: usize,
    false_positive: usize,
    true_negative: usize,
    false_negative: usize,
    precision: Option<f64>,
    recall: Option<f64>,
}

impl Serialize for ConfusionMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ConfusionMatrixJson {
            true_positive: self.true_positive,
            false_positive: self.false_positive,
            true_negative: self.true_negative,
            false_negative: self.false_negative,
            precision: defined(self.precision()),
            recall: defined(self.recall()),
        }
        .serialize(serializer)
    }
}

fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

#[expect(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return f64::NAN;
    }
    numerator as f64 / denominator as f64
}

/// Scores of the classifier and the majority-class baseline on a test set
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Classifier accuracy
    pub accuracy: Accuracy,
    /// Classifier confusion matrix
    pub confusion: ConfusionMatrix,
    /// Label the baseline always predicts (majority of the training set)
    pub baseline_label: Subscription,
    /// Accuracy of always predicting `baseline_label`
    pub baseline_accuracy: Accuracy,
    /// Per-record predictions, in test-set order
    pub predictions: Vec<Prediction>,
}

/// A single test-set prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub row: usize,
    pub actual: Subscription,
    pub predicted: Subscription,
}

impl Evaluation {
    /// Applies `model` to every test record and scores the predictions.
    ///
    /// `training` is only used to pick the baseline label.
    #[must_use]
    pub fn evaluate(
        model: &KnnClassifier,
        training: &[PlayerRecord],
        test: &[PlayerRecord],
    ) -> Self {
        let predicted = model.predict_all(test);
        let accuracy = Accuracy::score(test, &predicted);
        let confusion = ConfusionMatrix::from_predictions(test, &predicted);

        let baseline_label = LabelCounts::from_records(training).majority();
        let baseline_accuracy = Accuracy::score(test, &vec![baseline_label; test.len()]);

        let predictions = test
            .iter()
            .zip(&predicted)
            .map(|(record, &predicted)| Prediction {
                row: record.row,
                actual: record.subscription,
                predicted,
            })
            .collect();

        info!(
            "test accuracy: {accuracy} (baseline {baseline_accuracy}, always {baseline_label})"
        );

        Self {
            accuracy,
            confusion,
            baseline_label,
            baseline_accuracy,
            predictions,
        }
    }
}
