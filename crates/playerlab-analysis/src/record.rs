//! Player record data model
//!
//! A [`PlayerRecord`] is one cleaned row of the player dataset: the two
//! numeric features the classifier uses and the subscription label it
//! predicts. Other columns of the source file are never read.
//!
//! # Data Structure
//!
//! ```text
//! Dataset
//! └─ records: Vec<PlayerRecord>   (source order)
//!     ├─ row           (data-row position in the source file)
//!     ├─ age           (feature)
//!     ├─ played_hours  (feature)
//!     └─ subscription  (label)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary prediction target, recoded from the `TRUE`/`FALSE` literal of the
/// `subscribed` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Subscription {
    Subscribed,
    NotSubscribed,
}

impl Subscription {
    /// Both labels, positive label first.
    pub const ALL: [Self; 2] = [Self::Subscribed, Self::NotSubscribed];

    /// Parses the source literal (`TRUE`/`FALSE`, case-insensitive).
    ///
    /// Returns `None` for anything else; the caller treats that as a missing value.
    ///
    /// # Examples
    ///
    /// ```
    /// use playerlab_analysis::record::Subscription;
    ///
    /// assert_eq!(Subscription::parse("TRUE"), Some(Subscription::Subscribed));
    /// assert_eq!(Subscription::parse(" false "), Some(Subscription::NotSubscribed));
    /// assert_eq!(Subscription::parse("yes"), None);
    /// ```
    #[must_use]
    pub fn parse(literal: &str) -> Option<Self> {
        let literal = literal.trim();
        if literal.eq_ignore_ascii_case("true") {
            Some(Self::Subscribed)
        } else if literal.eq_ignore_ascii_case("false") {
            Some(Self::NotSubscribed)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subscribed => "subscribed",
            Self::NotSubscribed => "not subscribed",
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The numeric features used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Age,
    PlayedHours,
}

impl Feature {
    pub const ALL: [Self; 2] = [Self::Age, Self::PlayedHours];

    /// Column name as it appears in the source header.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::PlayedHours => "playedHours",
        }
    }

    #[must_use]
    pub fn value_of(self, record: &PlayerRecord) -> f64 {
        match self {
            Self::Age => record.age,
            Self::PlayedHours => record.played_hours,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.column_name())
    }
}

/// One cleaned row of the player dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Zero-based data-row position in the source file (header excluded)
    pub row: usize,
    /// Reported age
    pub age: f64,
    /// Cumulative play time in hours, nonnegative
    pub played_hours: f64,
    /// Prediction target
    pub subscription: Subscription,
}

impl PlayerRecord {
    /// Feature vector in [`Feature::ALL`] order.
    #[must_use]
    pub fn features(&self) -> [f64; 2] {
        Feature::ALL.map(|feature| feature.value_of(self))
    }
}

/// Number of records per label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub subscribed: usize,
    pub not_subscribed: usize,
}

impl LabelCounts {
    #[must_use]
    pub fn from_records(records: &[PlayerRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.subscription {
                Subscription::Subscribed => counts.subscribed += 1,
                Subscription::NotSubscribed => counts.not_subscribed += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn get(&self, label: Subscription) -> usize {
        match label {
            Subscription::Subscribed => self.subscribed,
            Subscription::NotSubscribed => self.not_subscribed,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.subscribed + self.not_subscribed
    }

    /// Fraction of records carrying `label`, `NaN` when there are no records.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ratio(&self, label: Subscription) -> f64 {
        let total = self.total();
        if total == 0 {
            return f64::NAN;
        }
        self.get(label) as f64 / total as f64
    }

    /// Most frequent label; ties go to [`Subscription::Subscribed`].
    #[must_use]
    pub fn majority(&self) -> Subscription {
        if self.subscribed >= self.not_subscribed {
            Subscription::Subscribed
        } else {
            Subscription::NotSubscribed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, subscription: Subscription) -> PlayerRecord {
        PlayerRecord {
            row,
            age: 20.0,
            played_hours: 1.0,
            subscription,
        }
    }

    #[test]
    fn test_label_counts() {
        let records = [
            record(0, Subscription::Subscribed),
            record(1, Subscription::NotSubscribed),
            record(2, Subscription::Subscribed),
        ];
        let counts = LabelCounts::from_records(&records);
        assert_eq!(counts.subscribed, 2);
        assert_eq!(counts.not_subscribed, 1);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.majority(), Subscription::Subscribed);
        assert!((counts.ratio(Subscription::Subscribed) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_majority_tie_prefers_subscribed() {
        let records = [
            record(0, Subscription::NotSubscribed),
            record(1, Subscription::Subscribed),
        ];
        let counts = LabelCounts::from_records(&records);
        assert_eq!(counts.majority(), Subscription::Subscribed);
    }

    #[test]
    fn test_ratio_of_empty_is_nan() {
        assert!(LabelCounts::default().ratio(Subscription::Subscribed).is_nan());
    }

    #[test]
    fn test_features_order() {
        let record = PlayerRecord {
            row: 0,
            age: 21.0,
            played_hours: 3.5,
            subscription: Subscription::Subscribed,
        };
        assert_eq!(record.features(), [21.0, 3.5]);
    }
}
