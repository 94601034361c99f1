//! Rendering collaborators
//!
//! The analysis core only produces numeric [`ChartSeries`]; how they are drawn
//! is decided here. Every renderer receives the same explicit
//! [`RenderConfig`] instead of relying on global plotting state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use wildlife_analysis::report::ChartSeries;

pub use self::csv_series::CsvSeriesRenderer;

mod csv_series;

pub trait Renderer {
    /// Renders every chart and returns the paths of the files written.
    fn render(&self, series: &ChartSeries) -> anyhow::Result<Vec<PathBuf>>;
}

/// Title and axis labels of one chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartLabels {
    fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_owned(),
            x_label: x_label.to_owned(),
            y_label: y_label.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory receiving the chart files
    pub output_dir: PathBuf,
    /// Habitat colors as `#rrggbb`, assigned in habitat order and reused
    /// cyclically when there are more habitats than colors
    pub palette: Vec<String>,
    pub survival_chart: ChartLabels,
    pub risk_chart: ChartLabels,
    pub correlation_chart: ChartLabels,
    pub distribution_chart: ChartLabels,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            palette: ["#2ecc71", "#e74c3c", "#3498db", "#f1c40f", "#9b59b6"]
                .map(String::from)
                .to_vec(),
            survival_chart: ChartLabels::new(
                "Survival Patterns Across Different Habitats",
                "Time (days)",
                "Survival Probability",
            ),
            risk_chart: ChartLabels::new(
                "Distribution of Environmental Risk Scores",
                "Risk Score",
                "Frequency",
            ),
            correlation_chart: ChartLabels::new(
                "Correlation Between Environmental Factors",
                "",
                "",
            ),
            distribution_chart: ChartLabels::new(
                "Distribution of Survival Times Across Habitats",
                "Habitat Type",
                "Survival Time (days)",
            ),
        }
    }
}

impl RenderConfig {
    /// Color of the `index`-th habitat, `None` only for an empty palette.
    #[must_use]
    pub fn color_for(&self, index: usize) -> Option<&str> {
        if self.palette.is_empty() {
            return None;
        }
        Some(&self.palette[index % self.palette.len()])
    }
}
