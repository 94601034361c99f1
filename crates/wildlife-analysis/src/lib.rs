//! Survival and environmental-risk analysis of wildlife field data
//!
//! This crate turns the two field tables (per-animal survival observations and
//! per-site environmental factor measurements) into a report and a set of
//! chart-ready numeric series.
//!
//! # Overview
//!
//! ## Survival Workflow
//!
//! 1. **Parse Rows** ([`record::SurvivalRow`]): One observation per tracked animal
//! 2. **Group by Habitat** ([`dataset::DurationDataset`]): Partition records into strata
//! 3. **Estimate** ([`survival::SurvivalStatsMap`]): Kaplan-Meier curve, Greenwood
//!    variance and summary values per habitat
//!
//! ## Risk Workflow
//!
//! 1. **Validate Rows** ([`risk::validate_rows`]): Reject incomplete factor rows
//! 2. **Score** ([`risk::score_records`]): Composite risk score per record
//! 3. **Describe** ([`risk::RiskSummary`]): Count, mean, spread and quartiles
//!
//! Both workflows are driven by [`report::ReportBuilder`], which also derives
//! the factor correlation matrix and per-habitat box summaries.
//!
//! # Examples
//!
//! ```
//! use wildlife_analysis::{
//!     record::{FactorRow, SurvivalRow},
//!     report::ReportBuilder,
//! };
//!
//! let survival = [
//!     SurvivalRow::new("Forest", 1.0, true),
//!     SurvivalRow::new("Forest", 2.0, true),
//!     SurvivalRow::new("Forest", 3.0, false),
//! ];
//! let factors = [FactorRow {
//!     air_quality: Some(0.8),
//!     temperature: Some(14.0),
//!     deforestation_rate: Some(0.2),
//!     species_diversity: Some(0.6),
//!     reproductive_rate: Some(0.3),
//! }];
//!
//! let analysis = ReportBuilder::default().build(&survival, &factors).unwrap();
//! let forest = &analysis.report.survival.map["Forest"];
//! assert_eq!(forest.km_curve.points.len(), 2);
//! assert_eq!(analysis.series.risk_scores.len(), 1);
//! ```

use wildlife_stats::survival::SurvivalError;

pub mod config;
pub mod dataset;
pub mod record;
pub mod report;
pub mod risk;
pub mod survival;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("invalid survival data in stratum '{stratum}': {source}")]
    InvalidStratum {
        stratum: String,
        source: SurvivalError,
    },
    #[display("factor table row {row}: missing required field '{field}'")]
    MissingFactor { row: usize, field: &'static str },
    #[display("factor table row {row}: field '{field}' has non-finite value {value}")]
    InvalidFactor {
        row: usize,
        field: &'static str,
        value: f64,
    },
    #[display("invalid analysis config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    #[display("no survival records to analyze")]
    NoSurvivalRecords,
    #[display("no environmental factor records to analyze")]
    NoFactorRecords,
}
