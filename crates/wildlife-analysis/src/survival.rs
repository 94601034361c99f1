//! Per-habitat survival statistics for right-censored field data
//!
//! # Overview
//!
//! Tracked animals leave the study in two ways:
//!
//! - **Observed death** (`Censoring_Status = 1`): the survival time is known
//! - **Censored** (`Censoring_Status = 0`): the animal was still alive when
//!   tracking stopped (collar failure, end of season, emigration)
//!
//! ```text
//! Death:     |----x     (died on day 50)
//! Censored:  |------->  (alive on day 80, true survival unknown)
//! ```
//!
//! The naive mean survival time treats censored durations as deaths and is
//! biased low. It is still reported because field teams compare against it,
//! next to the Kaplan-Meier median, which accounts for censoring.
//!
//! # Examples
//!
//! ```
//! use wildlife_analysis::{
//!     config::FailurePolicy, dataset::DurationDataset, record::SurvivalRow,
//!     survival::SurvivalStatsMap,
//! };
//!
//! let rows = [
//!     SurvivalRow::new("Forest", 45.0, true),
//!     SurvivalRow::new("Forest", 120.0, false),
//!     SurvivalRow::new("Forest", 80.0, true),
//!     SurvivalRow::new("Wetland", 30.0, true),
//! ];
//! let dataset = DurationDataset::group_by_stratum(&rows);
//! let stats = SurvivalStatsMap::collect(&dataset, FailurePolicy::Abort).unwrap();
//!
//! let forest = &stats.map["Forest"];
//! assert_eq!(forest.record_count, 3);
//! assert_eq!(forest.censored_count, 1);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use wildlife_stats::survival::{DurationRecord, KaplanMeierCurve, SurvivalError};

use crate::{
    AnalysisError,
    config::FailurePolicy,
    dataset::{DurationDataset, Stratum},
};

/// Survival statistics for one habitat
#[derive(Debug, Clone, Serialize)]
pub struct SurvivalStats {
    /// Total number of observations
    pub record_count: usize,
    /// Number of censored observations
    pub censored_count: usize,
    /// Naive mean survival time over all observations
    pub mean_survival_time: f64,
    /// Mean of the 0/1 `Censoring_Status` column (share of observed deaths)
    pub event_rate: f64,
    /// Share of censored observations (`1 - event_rate`)
    pub censored_fraction: f64,
    /// Kaplan-Meier median survival time
    pub median_km: Option<f64>,
    /// Kaplan-Meier survival curve
    pub km_curve: KaplanMeierCurve,
}

/// A habitat left out of the report under [`FailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedStratum {
    pub stratum: Stratum,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurvivalStatsMap {
    pub map: BTreeMap<Stratum, SurvivalStats>,
    pub skipped: Vec<SkippedStratum>,
}

impl SurvivalStats {
    /// Estimates the curve and summary values of one habitat.
    ///
    /// # Errors
    ///
    /// Fails when `data` is empty or holds a negative or non-finite duration.
    #[expect(clippy::cast_precision_loss)]
    pub fn from_data(data: &[DurationRecord]) -> Result<Self, SurvivalError> {
        let km_curve = KaplanMeierCurve::estimate(data)?;

        let record_count = data.len();
        let censored_count = km_curve.censored_count;
        let n = record_count as f64;
        let mean_survival_time = data.iter().map(|r| r.duration).sum::<f64>() / n;
        let event_rate = (record_count - censored_count) as f64 / n;
        let median_km = km_curve.median_survival();

        Ok(Self {
            record_count,
            censored_count,
            mean_survival_time,
            event_rate,
            censored_fraction: 1.0 - event_rate,
            median_km,
            km_curve,
        })
    }
}

impl SurvivalStatsMap {
    /// Estimates every habitat of the dataset independently.
    ///
    /// Under [`FailurePolicy::Abort`] the first invalid habitat fails the whole
    /// call; under [`FailurePolicy::Skip`] it is recorded in `skipped` instead.
    pub fn collect(
        dataset: &DurationDataset,
        policy: FailurePolicy,
    ) -> Result<Self, AnalysisError> {
        let mut map = BTreeMap::new();
        let mut skipped = vec![];

        for (stratum, data) in &dataset.strata {
            match SurvivalStats::from_data(data) {
                Ok(stats) => {
                    tracing::debug!(
                        stratum = %stratum,
                        records = stats.record_count,
                        events = stats.km_curve.event_count(),
                        terminated = stats.km_curve.terminated,
                        "estimated survival curve"
                    );
                    map.insert(stratum.clone(), stats);
                }
                Err(source) => match policy {
                    FailurePolicy::Abort => {
                        return Err(AnalysisError::InvalidStratum {
                            stratum: stratum.clone(),
                            source,
                        });
                    }
                    FailurePolicy::Skip => {
                        tracing::warn!(stratum = %stratum, error = %source, "skipping stratum");
                        skipped.push(SkippedStratum {
                            stratum: stratum.clone(),
                            reason: source.to_string(),
                        });
                    }
                },
            }
        }

        Ok(Self { map, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SurvivalRow;

    fn dataset_with_bad_stratum() -> DurationDataset {
        DurationDataset::group_by_stratum(&[
            SurvivalRow::new("Coast", 3.0, true),
            SurvivalRow::new("Coast", 5.0, false),
            SurvivalRow::new("Mountain", -1.0, true),
            SurvivalRow::new("Mountain", 4.0, true),
        ])
    }

    #[test]
    fn test_summary_values() {
        let stats = SurvivalStats::from_data(&[
            DurationRecord::event(1.0),
            DurationRecord::event(2.0),
            DurationRecord::censored(3.0),
        ])
        .unwrap();
        assert_eq!(stats.record_count, 3);
        assert_eq!(stats.censored_count, 1);
        assert!((stats.mean_survival_time - 2.0).abs() < 1e-12);
        assert!((stats.event_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats.censored_fraction - 1.0 / 3.0).abs() < 1e-12);
        assert!(stats.median_km.is_some());
    }

    #[test]
    fn test_abort_names_the_stratum() {
        let err = SurvivalStatsMap::collect(&dataset_with_bad_stratum(), FailurePolicy::Abort)
            .unwrap_err();
        match &err {
            AnalysisError::InvalidStratum { stratum, .. } => assert_eq!(stratum, "Mountain"),
            other => panic!("unexpected error {other}"),
        }
        assert!(err.to_string().contains("Mountain"));
    }

    #[test]
    fn test_skip_keeps_valid_strata() {
        let stats =
            SurvivalStatsMap::collect(&dataset_with_bad_stratum(), FailurePolicy::Skip).unwrap();
        assert_eq!(stats.map.keys().collect::<Vec<_>>(), ["Coast"]);
        assert_eq!(stats.skipped.len(), 1);
        assert_eq!(stats.skipped[0].stratum, "Mountain");
    }

    #[test]
    fn test_all_censored_stratum_is_valid() {
        let dataset = DurationDataset::group_by_stratum(&[
            SurvivalRow::new("Tundra", 10.0, false),
            SurvivalRow::new("Tundra", 12.0, false),
        ]);
        let stats = SurvivalStatsMap::collect(&dataset, FailurePolicy::Abort).unwrap();
        let tundra = &stats.map["Tundra"];
        assert_eq!(tundra.event_rate, 0.0);
        assert_eq!(tundra.median_km, None);
        assert!(tundra.km_curve.points.is_empty());
    }
}
