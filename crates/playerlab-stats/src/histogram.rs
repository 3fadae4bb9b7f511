use std::ops::Range;

/// A fixed-width histogram of a dataset's distribution.
///
/// The histogram divides a closed interval `[min, max]` into `num_bins` bins
/// of equal width and counts the values falling into each bin. Bins are
/// half-open (`start..end`) except the last one, which also includes `max`.
/// Values outside the interval are tallied in `underflow`/`overflow`, and
/// non-finite values are ignored.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
    /// The number of values below the first bin.
    pub underflow: u64,
    /// The number of values above the last bin.
    pub overflow: u64,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram whose range spans the minimum and maximum of `values`.
    ///
    /// Returns a histogram without bins if `values` has no finite value or
    /// `num_bins` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use playerlab_stats::histogram::Histogram;
    /// let values = [1.0, 2.0, 2.5, 4.0, 5.0];
    /// let histogram = Histogram::new(values, 4);
    /// assert_eq!(histogram.bins.len(), 4);
    /// assert_eq!(histogram.total(), 5);
    /// assert_eq!(histogram.bins[3].count, 2); // 4.0 and 5.0 (max is inclusive)
    /// ```
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if values.is_empty() {
            return Self::empty();
        }
        Self::with_range(values, num_bins, min, max)
    }

    /// Creates a histogram over the explicit interval `[min, max]`.
    ///
    /// Several histograms built with the same interval and bin count share
    /// bin boundaries, which makes them directly comparable.
    ///
    /// If the interval is degenerate (`max - min` is below `f64::EPSILON`) the
    /// bins cover a unit-wide interval centered on `min`.
    ///
    /// # Panics
    ///
    /// Panics if `min` or `max` is not finite, or `min > max`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use playerlab_stats::histogram::Histogram;
    /// let histogram = Histogram::with_range([0.5, 1.5, 12.0], 2, 0.0, 10.0);
    /// assert_eq!(histogram.bins[0].range, 0.0..5.0);
    /// assert_eq!(histogram.bins[0].count, 2);
    /// assert_eq!(histogram.bins[1].count, 0);
    /// assert_eq!(histogram.overflow, 1);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn with_range<I>(values: I, num_bins: usize, min: f64, max: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        assert!(
            min.is_finite() && max.is_finite() && min <= max,
            "histogram range must be finite and ordered"
        );
        if num_bins == 0 {
            return Self::empty();
        }

        let (start, end) = if max - min < f64::EPSILON {
            (min - 0.5, min + 0.5)
        } else {
            (min, max)
        };
        let bin_width = (end - start) / num_bins as f64;

        // Recompute each boundary from its index to avoid accumulating rounding error
        let boundary = |idx: usize| {
            if idx == num_bins {
                end
            } else {
                start + idx as f64 * bin_width
            }
        };
        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                range: boundary(idx)..boundary(idx + 1),
                count: 0,
            })
            .collect::<Vec<_>>();

        let mut underflow = 0;
        let mut overflow = 0;
        for val in values {
            if !val.is_finite() {
                continue;
            }
            if val < start {
                underflow += 1;
            } else if val > end {
                overflow += 1;
            } else {
                let idx = ((val - start) / bin_width).floor() as usize;
                bins[idx.min(num_bins - 1)].count += 1;
            }
        }

        Self {
            bins,
            underflow,
            overflow,
        }
    }

    fn empty() -> Self {
        Self {
            bins: vec![],
            underflow: 0,
            overflow: 0,
        }
    }

    /// Returns the number of values counted in the bins (excluding underflow/overflow).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Returns the largest bin count, or 0 for a histogram without bins.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}
