//! Batch analysis command
//!
//! Reads the factor and survival tables, prints the summary to stdout, writes
//! the chart series into the output directory and optionally saves the full
//! report as JSON.

mod table;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use wildlife_analysis::{config::AnalysisConfig, report::AnalysisReport};

use crate::{
    command::InputArg,
    config::CliConfig,
    logging,
    render::{CsvSeriesRenderer, Renderer as _},
    util,
};

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct AnalyzeArg {
    #[clap(flatten)]
    pub input: InputArg,

    /// Directory for chart series files [default: plots]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Save the full report as JSON to this path
    #[arg(long)]
    pub json_report: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    factors: &'a Path,
    survival: &'a Path,
    config: &'a AnalysisConfig,
    report: &'a AnalysisReport,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = arg.input.load_config()?;
    logging::init(&config.log)?;
    execute(arg, config)
}

fn execute(arg: &AnalyzeArg, mut config: CliConfig) -> anyhow::Result<()> {
    let analysis = arg.input.analyze(&config.analysis)?;

    table::print_report(&analysis.report);

    if let Some(dir) = &arg.output_dir {
        config.render.output_dir.clone_from(dir);
    }
    let renderer = CsvSeriesRenderer::new(config.render, &config.analysis);
    for path in renderer.render(&analysis.series)? {
        tracing::info!(path = %path.display(), "wrote chart file");
    }

    if let Some(path) = &arg.json_report {
        let envelope = ReportEnvelope {
            generated_at: Utc::now(),
            factors: &arg.input.factors,
            survival: &arg.input.survival,
            config: &config.analysis,
            report: &analysis.report,
        };
        util::write_json_file("report", path, &envelope)?;
        tracing::info!(path = %path.display(), "saved JSON report");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::input::{InputError, TableKind};

    use super::*;

    fn arg_in(dir: &Path) -> AnalyzeArg {
        AnalyzeArg {
            input: InputArg {
                factors: dir.join("factor_data.csv"),
                survival: dir.join("survival_data.csv"),
                config: None,
            },
            output_dir: Some(dir.join("plots")),
            json_report: Some(dir.join("report.json")),
        }
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let arg = arg_in(dir.path());
        fs::write(
            &arg.input.survival,
            "Habitat,Survival_Time,Censoring_Status\nForest,10,1\n",
        )
        .unwrap();

        let err = execute(&arg, CliConfig::default()).unwrap_err();
        let input_err = err.downcast_ref::<InputError>().unwrap();
        assert!(matches!(input_err, InputError::MissingInput { .. }));
        assert_eq!(input_err.kind(), TableKind::Factor);
        assert!(!dir.path().join("plots").exists());
        assert!(!dir.path().join("report.json").exists());
    }

    #[test]
    fn test_invalid_stratum_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let arg = arg_in(dir.path());
        fs::write(
            &arg.input.factors,
            "AirQuality,Temperature,DeforestationRate,SpeciesDiversity,ReproductiveRates\n\
             70,12,0.1,0.6,2.5\n",
        )
        .unwrap();
        fs::write(
            &arg.input.survival,
            "Habitat,Survival_Time,Censoring_Status\nForest,10,1\nMarsh,-2,1\n",
        )
        .unwrap();

        let err = execute(&arg, CliConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Marsh"));
        assert!(!dir.path().join("plots").exists());
    }

    #[test]
    fn test_full_run() {
        let dir = tempfile::tempdir().unwrap();
        let arg = arg_in(dir.path());
        fs::write(
            &arg.input.factors,
            "AirQuality,Temperature,DeforestationRate,SpeciesDiversity,ReproductiveRates\n\
             70,12,0.1,0.6,2.5\n\
             55,31,0.4,0.3,1.9\n\
             82,-4,0.05,0.8,2.8\n",
        )
        .unwrap();
        fs::write(
            &arg.input.survival,
            "Habitat,Survival_Time,Censoring_Status\n\
             Forest,10,1\nForest,25,0\nForest,40,1\nWetland,15,1\nWetland,60,0\n",
        )
        .unwrap();

        execute(&arg, CliConfig::default()).unwrap();

        let plots = dir.path().join("plots");
        for name in [
            "survival_patterns.csv",
            "risk_distribution.csv",
            "risk_scores.csv",
            "correlation_matrix.csv",
            "survival_distribution.csv",
            "chart_config.json",
        ] {
            assert!(plots.join(name).is_file(), "{name} not written");
        }

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap())
                .unwrap();
        assert!(report["generated_at"].is_string());
        assert_eq!(report["report"]["survival"]["map"]["Forest"]["record_count"], 3);
        assert_eq!(report["config"]["failure_policy"], "abort");
    }
}
