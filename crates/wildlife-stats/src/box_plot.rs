//! Five-number summaries for box-and-whisker charts.

use serde::Serialize;

use crate::percentiles::compute_percentile;

/// Whisker reach as a multiple of the interquartile range.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Box-plot summary of one group of values.
///
/// Whiskers extend to the most extreme data points that lie within
/// `1.5 * IQR` of the box; anything beyond is listed in `outliers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    /// Values outside the whiskers, ascending.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Summarizes unsorted values. Returns `None` for an empty group.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wildlife_stats::box_plot::BoxSummary;
    /// let summary = BoxSummary::new([1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
    /// assert_eq!(summary.whisker_high, 5.0);
    /// assert_eq!(summary.outliers, vec![100.0]);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Summarizes values sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        let (&first, &last) = (sorted_values.first()?, sorted_values.last()?);
        let q1 = compute_percentile(sorted_values, 25.0);
        let median = compute_percentile(sorted_values, 50.0);
        let q3 = compute_percentile(sorted_values, 75.0);
        let reach = WHISKER_IQR_FACTOR * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let inside = |v: &&f64| (low_fence..=high_fence).contains(*v);
        let whisker_low = sorted_values.iter().find(inside).copied().unwrap_or(first);
        let whisker_high = sorted_values
            .iter()
            .rev()
            .find(inside)
            .copied()
            .unwrap_or(last);
        let outliers = sorted_values
            .iter()
            .copied()
            .filter(|v| *v < whisker_low || *v > whisker_high)
            .collect();

        Some(Self {
            count: sorted_values.len(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(BoxSummary::new(std::iter::empty()).is_none());
    }

    #[test]
    fn test_no_outliers() {
        let summary = BoxSummary::new([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.whisker_low, 1.0);
        assert_eq!(summary.whisker_high, 5.0);
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn test_low_outlier() {
        let summary = BoxSummary::new([-50.0, 10.0, 11.0, 12.0, 13.0]).unwrap();
        assert_eq!(summary.whisker_low, 10.0);
        assert_eq!(summary.outliers, vec![-50.0]);
    }
}
