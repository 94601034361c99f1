use serde::{Deserialize, Serialize};
use wildlife_stats::survival::Z_95;

use crate::AnalysisError;

/// What to do when one habitat's records cannot be estimated.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole run on the first invalid stratum.
    #[default]
    Abort,
    /// Leave the stratum out of the report and keep going.
    Skip,
}

/// Tunables of the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Standard normal quantile used for survival confidence bands.
    pub confidence_z: f64,
    pub failure_policy: FailurePolicy,
    /// Number of equal-width bins in the risk-score histogram.
    pub risk_histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            confidence_z: Z_95,
            failure_policy: FailurePolicy::default(),
            risk_histogram_bins: 30,
        }
    }
}

impl AnalysisConfig {
    /// Checks the values a config file may get wrong.
    ///
    /// `confidence_z` must be finite and non-negative so that every band
    /// satisfies `lower <= S <= upper`; the risk histogram needs a bin.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.confidence_z.is_finite() || self.confidence_z < 0.0 {
            return Err(AnalysisError::InvalidConfig {
                field: "confidence_z",
                reason: "must be a finite, non-negative number",
            });
        }
        if self.risk_histogram_bins == 0 {
            return Err(AnalysisError::InvalidConfig {
                field: "risk_histogram_bins",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
