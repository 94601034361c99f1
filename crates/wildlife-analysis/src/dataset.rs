//! Duration records grouped by habitat.

use std::collections::BTreeMap;

use wildlife_stats::survival::DurationRecord;

use crate::record::SurvivalRow;

/// Habitat label partitioning the survival table.
pub type Stratum = String;

/// Duration records of every habitat, keyed by habitat label.
///
/// Every record belongs to exactly one stratum and no stratum is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DurationDataset {
    pub strata: BTreeMap<Stratum, Vec<DurationRecord>>,
}

impl DurationDataset {
    /// Groups survival rows by habitat, keeping input order within a habitat.
    ///
    /// ```
    /// use wildlife_analysis::{dataset::DurationDataset, record::SurvivalRow};
    ///
    /// let rows = [
    ///     SurvivalRow::new("Wetland", 4.0, true),
    ///     SurvivalRow::new("Forest", 2.0, false),
    ///     SurvivalRow::new("Wetland", 1.0, false),
    /// ];
    /// let dataset = DurationDataset::group_by_stratum(&rows);
    /// assert_eq!(dataset.strata.len(), 2);
    /// assert_eq!(dataset.strata["Wetland"].len(), 2);
    /// ```
    #[must_use]
    pub fn group_by_stratum<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a SurvivalRow>,
    {
        let mut strata: BTreeMap<Stratum, Vec<DurationRecord>> = BTreeMap::new();
        for row in rows {
            strata
                .entry(row.habitat.clone())
                .or_default()
                .push(row.duration_record());
        }
        Self { strata }
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.strata.values().map(Vec::len).sum()
    }

    /// Mean of the 0/1 event indicator over every record of every stratum.
    ///
    /// `None` when the dataset is empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn overall_event_rate(&self) -> Option<f64> {
        let total = self.record_count();
        if total == 0 {
            return None;
        }
        let events = self
            .strata
            .values()
            .flatten()
            .filter(|r| r.event_occurred)
            .count();
        Some(events as f64 / total as f64)
    }

    /// Distinct observed death times of a habitat, ascending.
    #[must_use]
    pub fn event_times(&self, stratum: &str) -> Vec<f64> {
        self.distinct_times(stratum, true)
    }

    /// Distinct censoring times of a habitat, ascending.
    #[must_use]
    pub fn censoring_times(&self, stratum: &str) -> Vec<f64> {
        self.distinct_times(stratum, false)
    }

    fn distinct_times(&self, stratum: &str, event_occurred: bool) -> Vec<f64> {
        let mut times = self
            .strata
            .get(stratum)
            .into_iter()
            .flatten()
            .filter(|r| r.event_occurred == event_occurred)
            .map(|r| r.duration)
            .collect::<Vec<_>>();
        times.sort_by(f64::total_cmp);
        times.dedup();
        times
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_produce_no_strata() {
        let rows: [SurvivalRow; 0] = [];
        let dataset = DurationDataset::group_by_stratum(&rows);
        assert!(dataset.strata.is_empty());
        assert_eq!(dataset.overall_event_rate(), None);
    }

    #[test]
    fn test_records_keep_input_order() {
        let rows = [
            SurvivalRow::new("Grassland", 9.0, true),
            SurvivalRow::new("Grassland", 3.0, false),
            SurvivalRow::new("Desert", 5.0, true),
            SurvivalRow::new("Grassland", 6.0, true),
        ];
        let dataset = DurationDataset::group_by_stratum(&rows);
        let durations = dataset.strata["Grassland"]
            .iter()
            .map(|r| r.duration)
            .collect::<Vec<_>>();
        assert_eq!(durations, vec![9.0, 3.0, 6.0]);
        assert_eq!(dataset.strata.keys().collect::<Vec<_>>(), ["Desert", "Grassland"]);
        assert_eq!(dataset.record_count(), rows.len());
        assert_eq!(dataset.overall_event_rate(), Some(0.75));
    }

    #[test]
    fn test_distinct_times() {
        let rows = [
            SurvivalRow::new("Wetland", 7.0, true),
            SurvivalRow::new("Wetland", 2.0, true),
            SurvivalRow::new("Wetland", 7.0, true),
            SurvivalRow::new("Wetland", 7.0, false),
            SurvivalRow::new("Wetland", 4.0, false),
        ];
        let dataset = DurationDataset::group_by_stratum(&rows);
        assert_eq!(dataset.event_times("Wetland"), vec![2.0, 7.0]);
        assert_eq!(dataset.censoring_times("Wetland"), vec![4.0, 7.0]);
        assert!(dataset.event_times("Forest").is_empty());
    }
}
