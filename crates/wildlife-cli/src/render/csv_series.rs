//! Chart series as CSV files
//!
//! Writes one file per chart into the output directory, plus
//! `chart_config.json` describing how the series are meant to be drawn:
//!
//! | File                        | Contents                                      |
//! |-----------------------------|-----------------------------------------------|
//! | `survival_patterns.csv`     | stair-step KM curve and band per habitat      |
//! | `risk_distribution.csv`     | risk-score histogram bins                     |
//! | `risk_scores.csv`           | raw risk scores (for density overlays)        |
//! | `correlation_matrix.csv`    | Pearson matrix of the five factors            |
//! | `survival_distribution.csv` | box-plot summary of survival time per habitat |

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use serde::Serialize;
use wildlife_analysis::{config::AnalysisConfig, report::ChartSeries};

use crate::{
    render::{RenderConfig, Renderer},
    util,
};

#[derive(Debug, Clone)]
pub struct CsvSeriesRenderer {
    config: RenderConfig,
    confidence_z: f64,
    risk_histogram_bins: usize,
}

#[derive(Serialize)]
struct ChartConfigFile<'a> {
    #[serde(flatten)]
    render: &'a RenderConfig,
    confidence_z: f64,
    risk_histogram_bins: usize,
    stratum_colors: BTreeMap<&'a str, &'a str>,
}

#[derive(Serialize)]
struct CurveRow<'a> {
    habitat: &'a str,
    time: f64,
    survival_probability: f64,
    lower: f64,
    upper: f64,
}

#[derive(Serialize)]
struct HistogramRow {
    bin_start: f64,
    bin_end: f64,
    count: u64,
}

#[derive(Serialize)]
struct ScoreRow {
    record: usize,
    risk_score: f64,
}

#[derive(Serialize)]
struct DistributionRow<'a> {
    habitat: &'a str,
    count: usize,
    whisker_low: f64,
    q1: f64,
    median: f64,
    q3: f64,
    whisker_high: f64,
    /// Semicolon-separated
    outliers: String,
}

impl CsvSeriesRenderer {
    #[must_use]
    pub fn new(config: RenderConfig, analysis: &AnalysisConfig) -> Self {
        Self {
            config,
            confidence_z: analysis.confidence_z,
            risk_histogram_bins: analysis.risk_histogram_bins,
        }
    }

    fn write_chart_config(&self, path: &Path, series: &ChartSeries) -> anyhow::Result<()> {
        let stratum_colors = series
            .survival_curves
            .iter()
            .enumerate()
            .filter_map(|(i, curve)| {
                self.config
                    .color_for(i)
                    .map(|color| (curve.stratum.as_str(), color))
            })
            .collect();
        let file = ChartConfigFile {
            render: &self.config,
            confidence_z: self.confidence_z,
            risk_histogram_bins: self.risk_histogram_bins,
            stratum_colors,
        };
        util::write_json_file("chart config", path, &file)
    }
}

impl Renderer for CsvSeriesRenderer {
    fn render(&self, series: &ChartSeries) -> anyhow::Result<Vec<PathBuf>> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let path = |name: &str| dir.join(name);
        let written = vec![
            path("survival_patterns.csv"),
            path("risk_distribution.csv"),
            path("risk_scores.csv"),
            path("correlation_matrix.csv"),
            path("survival_distribution.csv"),
            path("chart_config.json"),
        ];

        write_survival_patterns(&written[0], series)?;
        write_rows(
            &written[1],
            series.risk_histogram.bins.iter().map(|bin| HistogramRow {
                bin_start: bin.range.start,
                bin_end: bin.range.end,
                count: bin.count,
            }),
        )?;
        write_rows(
            &written[2],
            series
                .risk_scores
                .iter()
                .enumerate()
                .map(|(i, &risk_score)| ScoreRow {
                    record: i + 1,
                    risk_score,
                }),
        )?;
        write_correlation(&written[3], series)?;
        write_rows(
            &written[4],
            series.survival_distribution.iter().map(|dist| {
                let summary = &dist.summary;
                DistributionRow {
                    habitat: &dist.stratum,
                    count: summary.count,
                    whisker_low: summary.whisker_low,
                    q1: summary.q1,
                    median: summary.median,
                    q3: summary.q3,
                    whisker_high: summary.whisker_high,
                    outliers: summary
                        .outliers
                        .iter()
                        .map(f64::to_string)
                        .collect::<Vec<_>>()
                        .join(";"),
                }
            }),
        )?;
        self.write_chart_config(&written[5], series)?;

        Ok(written)
    }
}

fn write_rows<T, I>(path: &Path, rows: I) -> anyhow::Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;
    Ok(())
}

fn write_survival_patterns(path: &Path, series: &ChartSeries) -> anyhow::Result<()> {
    let rows = series.survival_curves.iter().flat_map(|curve| {
        curve.vertices.iter().map(|vertex| CurveRow {
            habitat: &curve.stratum,
            time: vertex.time,
            survival_probability: vertex.survival_probability,
            lower: vertex.lower,
            upper: vertex.upper,
        })
    });
    write_rows(path, rows)
}

fn write_correlation(path: &Path, series: &ChartSeries) -> anyhow::Result<()> {
    let matrix = &series.factor_correlation;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    let header = std::iter::once("factor").chain(matrix.labels.iter().map(String::as_str));
    writer
        .write_record(header)
        .with_context(|| format!("Failed to write CSV header to {}", path.display()))?;
    for (label, row) in matrix.labels.iter().zip(&matrix.coefficients) {
        let record = std::iter::once(label.clone()).chain(row.iter().map(f64::to_string));
        writer
            .write_record(record)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;
    Ok(())
}
