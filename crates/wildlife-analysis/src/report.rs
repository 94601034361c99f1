//! Report assembly and chart series.
//!
//! [`ReportBuilder`] runs the whole analysis over the two input tables and
//! returns an [`Analysis`]: the textual [`AnalysisReport`] plus the numeric
//! [`ChartSeries`] handed to a renderer. Both are plain data; nothing here
//! draws or writes files.

use serde::Serialize;
use wildlife_stats::{
    box_plot::BoxSummary,
    correlation::CorrelationMatrix,
    histogram::Histogram,
    survival::StepVertex,
};

use crate::{
    AnalysisError,
    config::AnalysisConfig,
    dataset::{DurationDataset, Stratum},
    record::{FactorRow, SurvivalRow},
    risk::{self, EnvironmentalFactorRecord, RiskSummary},
    survival::SurvivalStatsMap,
};

/// Column labels of the factor correlation matrix, in matrix order.
pub const FACTOR_LABELS: [&str; 5] = [
    "AirQuality",
    "Temperature",
    "DeforestationRate",
    "SpeciesDiversity",
    "ReproductiveRates",
];

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Per-habitat survival statistics and curves.
    pub survival: SurvivalStatsMap,
    /// Mean of `Censoring_Status` over all analyzed records.
    pub overall_event_rate: f64,
    pub risk: RiskSummary,
    pub temperature_outlier_fraction: f64,
}

/// Survival curve of one habitat as a stair-step polyline with its band.
#[derive(Debug, Clone, Serialize)]
pub struct CurveSeries {
    pub stratum: Stratum,
    pub vertices: Vec<StepVertex>,
}

/// Survival-time distribution of one habitat.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionSeries {
    pub stratum: Stratum,
    pub summary: BoxSummary,
}

/// Numeric series for the four charts.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub survival_curves: Vec<CurveSeries>,
    /// Risk score per factor record, in input order.
    pub risk_scores: Vec<f64>,
    pub risk_histogram: Histogram,
    pub factor_correlation: CorrelationMatrix,
    pub survival_distribution: Vec<DistributionSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub report: AnalysisReport,
    pub series: ChartSeries,
}

#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    config: AnalysisConfig,
}

impl ReportBuilder {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs the full analysis.
    ///
    /// Both tables are validated before any estimation starts. Running twice
    /// on the same rows produces identical results.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config, an empty table, an incomplete factor row, or (under
    /// [`FailurePolicy::Abort`](crate::config::FailurePolicy::Abort)) an
    /// invalid habitat.
    pub fn build(
        &self,
        survival_rows: &[SurvivalRow],
        factor_rows: &[FactorRow],
    ) -> Result<Analysis, AnalysisError> {
        self.config.validate()?;
        let factors = risk::validate_rows(factor_rows)?;
        if survival_rows.is_empty() {
            return Err(AnalysisError::NoSurvivalRecords);
        }

        let dataset = DurationDataset::group_by_stratum(survival_rows);
        tracing::info!(
            strata = dataset.strata.len(),
            records = dataset.record_count(),
            "grouped survival records by habitat"
        );
        let survival = SurvivalStatsMap::collect(&dataset, self.config.failure_policy)?;
        if survival.map.is_empty() {
            return Err(AnalysisError::NoSurvivalRecords);
        }

        let analyzed = DurationDataset {
            strata: dataset
                .strata
                .into_iter()
                .filter(|(stratum, _)| survival.map.contains_key(stratum))
                .collect(),
        };
        let overall_event_rate = analyzed
            .overall_event_rate()
            .ok_or(AnalysisError::NoSurvivalRecords)?;

        let risk_scores = risk::score_records(&factors);
        let risk = RiskSummary::from_scores(&risk_scores, self.config.risk_histogram_bins)
            .ok_or(AnalysisError::NoFactorRecords)?;
        let temperature_outlier_fraction = risk::temperature_outlier_fraction(&factors)
            .ok_or(AnalysisError::NoFactorRecords)?;
        tracing::info!(
            records = factors.len(),
            mean_risk = risk.description.stats.mean,
            temperature_outlier_fraction,
            "scored environmental factors"
        );

        let series = ChartSeries {
            survival_curves: survival
                .map
                .iter()
                .map(|(stratum, stats)| CurveSeries {
                    stratum: stratum.clone(),
                    vertices: stats.km_curve.step_series(self.config.confidence_z),
                })
                .collect(),
            risk_histogram: risk.description.histogram.clone(),
            risk_scores,
            factor_correlation: factor_correlation(&factors),
            survival_distribution: analyzed
                .strata
                .iter()
                .filter_map(|(stratum, records)| {
                    BoxSummary::new(records.iter().map(|r| r.duration)).map(|summary| {
                        DistributionSeries {
                            stratum: stratum.clone(),
                            summary,
                        }
                    })
                })
                .collect(),
        };

        let report = AnalysisReport {
            survival,
            overall_event_rate,
            risk,
            temperature_outlier_fraction,
        };
        Ok(Analysis { report, series })
    }
}

fn factor_correlation(factors: &[EnvironmentalFactorRecord]) -> CorrelationMatrix {
    let column = |extract: fn(&EnvironmentalFactorRecord) -> f64| {
        factors.iter().map(extract).collect::<Vec<_>>()
    };
    let columns = [
        column(|r| r.air_quality),
        column(|r| r.temperature),
        column(|r| r.deforestation_rate),
        column(|r| r.species_diversity),
        column(|r| r.reproductive_rate),
    ];
    let labeled = FACTOR_LABELS
        .iter()
        .zip(columns)
        .map(|(label, values)| (*label, values))
        .collect::<Vec<_>>();
    CorrelationMatrix::from_columns(&labeled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;

    fn factor(
        air: f64,
        temperature: f64,
        deforestation: f64,
        diversity: f64,
        reproduction: f64,
    ) -> FactorRow {
        FactorRow {
            air_quality: Some(air),
            temperature: Some(temperature),
            deforestation_rate: Some(deforestation),
            species_diversity: Some(diversity),
            reproductive_rate: Some(reproduction),
        }
    }

    fn factor_rows() -> Vec<FactorRow> {
        vec![
            factor(0.8, 12.0, 0.1, 0.9, 0.4),
            factor(0.4, -3.0, 0.6, 0.5, 0.2),
            factor(0.6, 25.0, 0.3, 0.7, 0.3),
            factor(0.2, 40.0, 0.9, 0.2, 0.1),
            factor(0.7, 8.0, 0.2, 0.8, 0.5),
        ]
    }

    fn survival_rows() -> Vec<SurvivalRow> {
        vec![
            SurvivalRow::new("Forest", 1.0, true),
            SurvivalRow::new("Forest", 2.0, true),
            SurvivalRow::new("Forest", 3.0, false),
            SurvivalRow::new("Wetland", 4.0, false),
            SurvivalRow::new("Wetland", 6.0, false),
            SurvivalRow::new("Grassland", 2.5, true),
            SurvivalRow::new("Grassland", 2.5, true),
            SurvivalRow::new("Grassland", 9.0, true),
        ]
    }

    #[test]
    fn test_report_contents() {
        let analysis = ReportBuilder::default()
            .build(&survival_rows(), &factor_rows())
            .unwrap();
        let report = &analysis.report;

        assert_eq!(
            report.survival.map.keys().collect::<Vec<_>>(),
            ["Forest", "Grassland", "Wetland"]
        );
        let forest = &report.survival.map["Forest"];
        assert!((forest.mean_survival_time - 2.0).abs() < 1e-12);
        assert!((forest.km_curve.points[1].survival_probability - 1.0 / 3.0).abs() < 1e-12);
        assert!((report.overall_event_rate - 5.0 / 8.0).abs() < 1e-12);

        let wetland = &report.survival.map["Wetland"];
        assert_eq!(wetland.event_rate, 0.0);
        assert!(wetland.km_curve.points.is_empty());

        assert_eq!(report.risk.description.stats.count, 5);
        assert_eq!(report.risk.description.histogram.total(), 5);
        assert!((0.0..=1.0).contains(&report.temperature_outlier_fraction));
    }

    #[test]
    fn test_series_are_well_formed() {
        let analysis = ReportBuilder::default()
            .build(&survival_rows(), &factor_rows())
            .unwrap();
        let series = &analysis.series;

        assert_eq!(series.survival_curves.len(), 3);
        for curve in &series.survival_curves {
            let first = curve.vertices[0];
            assert_eq!((first.time, first.survival_probability), (0.0, 1.0));
            for pair in curve.vertices.windows(2) {
                assert!(pair[0].time <= pair[1].time);
                assert!(pair[1].survival_probability <= pair[0].survival_probability);
            }
            for vertex in &curve.vertices {
                assert!((0.0..=1.0).contains(&vertex.survival_probability));
                assert!(vertex.lower <= vertex.survival_probability);
                assert!(vertex.survival_probability <= vertex.upper);
            }
        }
        let wetland = &series.survival_curves[2];
        assert_eq!(wetland.stratum, "Wetland");
        assert!(wetland.vertices.iter().all(|v| v.survival_probability == 1.0));

        assert_eq!(series.risk_scores.len(), 5);
        assert_eq!(series.factor_correlation.labels, FACTOR_LABELS);
        assert_eq!(series.factor_correlation.coefficients.len(), 5);
        assert_eq!(series.survival_distribution.len(), 3);
        assert_eq!(series.survival_distribution[1].summary.median, 2.5);
    }

    #[test]
    fn test_rerun_is_identical() {
        let builder = ReportBuilder::default();
        let (survival, factors) = (survival_rows(), factor_rows());
        let first = builder.build(&survival, &factors).unwrap();
        let second = builder.build(&survival, &factors).unwrap();

        for (stratum, stats) in &first.report.survival.map {
            let other = &second.report.survival.map[stratum];
            let bits = |curve: &wildlife_stats::survival::KaplanMeierCurve| {
                curve
                    .points
                    .iter()
                    .map(|p| {
                        (
                            p.time.to_bits(),
                            p.survival_probability.to_bits(),
                            p.variance_estimate.to_bits(),
                        )
                    })
                    .collect::<Vec<_>>()
            };
            assert_eq!(bits(&stats.km_curve), bits(&other.km_curve));
        }
        let score_bits = |scores: &[f64]| scores.iter().map(|s| s.to_bits()).collect::<Vec<_>>();
        assert_eq!(
            score_bits(&first.series.risk_scores),
            score_bits(&second.series.risk_scores)
        );
    }

    #[test]
    fn test_invalid_stratum_policy() {
        let mut rows = survival_rows();
        rows.push(SurvivalRow::new("Desert", -4.0, true));

        let err = ReportBuilder::default()
            .build(&rows, &factor_rows())
            .unwrap_err();
        assert!(
            matches!(err, AnalysisError::InvalidStratum { ref stratum, .. } if stratum == "Desert")
        );

        let config = AnalysisConfig {
            failure_policy: FailurePolicy::Skip,
            ..AnalysisConfig::default()
        };
        let analysis = ReportBuilder::new(config)
            .build(&rows, &factor_rows())
            .unwrap();
        assert!(!analysis.report.survival.map.contains_key("Desert"));
        assert_eq!(analysis.report.survival.skipped[0].stratum, "Desert");
        // Skipped records do not count towards the event rate or the box plots
        assert!((analysis.report.overall_event_rate - 5.0 / 8.0).abs() < 1e-12);
        assert_eq!(analysis.series.survival_distribution.len(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_estimation() {
        let config = AnalysisConfig {
            confidence_z: -1.96,
            ..AnalysisConfig::default()
        };
        let err = ReportBuilder::new(config)
            .build(&survival_rows(), &factor_rows())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid analysis config: confidence_z must be a finite, non-negative number"
        );

        let config = AnalysisConfig {
            risk_histogram_bins: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            ReportBuilder::new(config).build(&survival_rows(), &factor_rows()),
            Err(AnalysisError::InvalidConfig {
                field: "risk_histogram_bins",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_tables_are_rejected() {
        let builder = ReportBuilder::default();
        assert!(matches!(
            builder.build(&[], &factor_rows()),
            Err(AnalysisError::NoSurvivalRecords)
        ));
        assert!(matches!(
            builder.build(&survival_rows(), &[]),
            Err(AnalysisError::NoFactorRecords)
        ));
    }

    #[test]
    fn test_incomplete_factor_row_is_rejected() {
        let mut factors = factor_rows();
        factors[3].air_quality = None;
        let err = ReportBuilder::default()
            .build(&survival_rows(), &factors)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "factor table row 4: missing required field 'AirQuality'"
        );
    }
}
