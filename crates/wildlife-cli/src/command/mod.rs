use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use wildlife_analysis::{
    config::AnalysisConfig,
    report::{Analysis, ReportBuilder},
};

use crate::{config::CliConfig, input};

use self::{analyze::AnalyzeArg, generate_sample_data::GenerateSampleDataArg, view::ViewArg};

mod analyze;
mod generate_sample_data;
mod view;

const DEFAULT_FACTORS_FILE: &str = "factor_data.csv";
const DEFAULT_SURVIVAL_FILE: &str = "survival_data.csv";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Analyze the field tables and write chart series files
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Browse the analysis charts in the terminal
    View(#[clap(flatten)] ViewArg),
    /// Generate seeded synthetic factor and survival tables
    GenerateSampleData(#[clap(flatten)] GenerateSampleDataArg),
}

/// Input tables and configuration file shared by the analysis commands
#[derive(Debug, Clone, Args)]
pub(crate) struct InputArg {
    /// Path to the environmental factor table (CSV)
    #[arg(long, default_value = DEFAULT_FACTORS_FILE)]
    pub factors: PathBuf,

    /// Path to the survival table (CSV)
    #[arg(long, default_value = DEFAULT_SURVIVAL_FILE)]
    pub survival: PathBuf,

    /// Optional JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Default for InputArg {
    fn default() -> Self {
        Self {
            factors: PathBuf::from(DEFAULT_FACTORS_FILE),
            survival: PathBuf::from(DEFAULT_SURVIVAL_FILE),
            config: None,
        }
    }
}

impl InputArg {
    pub(crate) fn load_config(&self) -> anyhow::Result<CliConfig> {
        CliConfig::load(self.config.as_deref())
    }

    /// Loads both tables, then runs the analysis.
    ///
    /// Nothing is computed unless both tables were read successfully.
    pub(crate) fn analyze(&self, config: &AnalysisConfig) -> anyhow::Result<Analysis> {
        let tables = input::load_tables(&self.factors, &self.survival)?;
        tracing::info!(
            factor_rows = tables.factors.len(),
            survival_rows = tables.survival.len(),
            "loaded input tables"
        );

        ReportBuilder::new(config.clone())
            .build(&tables.survival, &tables.factors)
            .with_context(|| {
                format!(
                    "Failed to analyze {} and {}",
                    self.survival.display(),
                    self.factors.display()
                )
            })
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Analyze(AnalyzeArg::default())) {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::View(arg) => view::run(&arg)?,
        Mode::GenerateSampleData(arg) => generate_sample_data::run(&arg)?,
    }
    Ok(())
}
