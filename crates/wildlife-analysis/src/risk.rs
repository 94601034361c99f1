//! Composite environmental risk score.
//!
//! ```text
//! risk_score = -air_quality + deforestation_rate - species_diversity - reproductive_rate
//! ```
//!
//! The weights are fixed: better air, more species and faster reproduction
//! lower the risk, deforestation raises it. The score is unbounded and may be
//! negative. Temperature does not enter the score; it feeds the
//! temperature-extreme statistic instead.

use serde::Serialize;
use wildlife_stats::{comprehensive::ComprehensiveStats, descriptive::DescriptiveStats};

use crate::{AnalysisError, record::FactorRow};

/// A complete, validated row of the factor table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentalFactorRecord {
    pub air_quality: f64,
    pub temperature: f64,
    pub deforestation_rate: f64,
    pub species_diversity: f64,
    pub reproductive_rate: f64,
}

impl EnvironmentalFactorRecord {
    /// Validates a raw row. `row` is the 1-based data row number used in errors.
    ///
    /// Every field must be present and finite.
    pub fn from_row(row: usize, raw: &FactorRow) -> Result<Self, AnalysisError> {
        let require = |value: Option<f64>, field: &'static str| match value {
            None => Err(AnalysisError::MissingFactor { row, field }),
            Some(value) if !value.is_finite() => {
                Err(AnalysisError::InvalidFactor { row, field, value })
            }
            Some(value) => Ok(value),
        };
        Ok(Self {
            air_quality: require(raw.air_quality, "AirQuality")?,
            temperature: require(raw.temperature, "Temperature")?,
            deforestation_rate: require(raw.deforestation_rate, "DeforestationRate")?,
            species_diversity: require(raw.species_diversity, "SpeciesDiversity")?,
            reproductive_rate: require(raw.reproductive_rate, "ReproductiveRates")?,
        })
    }

    #[must_use]
    pub fn risk_score(&self) -> f64 {
        -self.air_quality + self.deforestation_rate
            - self.species_diversity
            - self.reproductive_rate
    }
}

/// Validates every row of the factor table.
///
/// Partial rows are rejected; missing values are never filled in.
pub fn validate_rows(
    rows: &[FactorRow],
) -> Result<Vec<EnvironmentalFactorRecord>, AnalysisError> {
    if rows.is_empty() {
        return Err(AnalysisError::NoFactorRecords);
    }
    rows.iter()
        .enumerate()
        .map(|(idx, raw)| EnvironmentalFactorRecord::from_row(idx + 1, raw))
        .collect()
}

/// Risk score of every record, in input order.
#[must_use]
pub fn score_records(records: &[EnvironmentalFactorRecord]) -> Vec<f64> {
    records
        .iter()
        .map(EnvironmentalFactorRecord::risk_score)
        .collect()
}

/// Fraction of records whose `|temperature|` exceeds two sample standard
/// deviations of the temperature column.
///
/// The spread is computed from sorted values, so the result does not depend
/// on row order. Returns `None` for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn temperature_outlier_fraction(records: &[EnvironmentalFactorRecord]) -> Option<f64> {
    let stats = DescriptiveStats::new(records.iter().map(|r| r.temperature))?;
    let threshold = 2.0 * stats.std_dev;
    let extremes = records
        .iter()
        .filter(|r| r.temperature.abs() > threshold)
        .count();
    Some(extremes as f64 / records.len() as f64)
}

/// Description of the risk-score column: count, mean, standard deviation,
/// min, quartiles, max, and a histogram for the distribution chart.
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    #[serde(flatten)]
    pub description: ComprehensiveStats,
}

impl RiskSummary {
    #[must_use]
    pub fn from_scores(scores: &[f64], histogram_bins: usize) -> Option<Self> {
        let description = ComprehensiveStats::describe(scores.iter().copied(), histogram_bins)?;
        Some(Self { description })
    }

    #[must_use]
    pub fn quartile(&self, percentile: f64) -> Option<f64> {
        self.description.percentiles.get(percentile)
    }
}
