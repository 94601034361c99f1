//! Interactive terminal chart viewer

use std::path::PathBuf;

use clap::Args;
use wildlife_analysis::report::ChartSeries;
use wildlife_stats::comprehensive::ComprehensiveStats;

use crate::{
    command::InputArg,
    logging,
    render::{RenderConfig, Renderer},
};

use self::app::App;

mod app;
mod charts;

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ViewArg {
    #[clap(flatten)]
    pub input: InputArg,
}

pub(crate) fn run(arg: &ViewArg) -> anyhow::Result<()> {
    let config = arg.input.load_config()?;
    logging::init(&config.log)?;

    let analysis = arg.input.analyze(&config.analysis)?;
    TerminalRenderer::new(config.render, &analysis.report.risk.description)
        .render(&analysis.series)?;
    Ok(())
}

/// Draws the chart series in the terminal until the user quits.
///
/// The risk tab shows the description already held by the report instead of
/// recomputing it from the raw scores.
#[derive(Debug, Clone)]
pub(crate) struct TerminalRenderer<'a> {
    config: RenderConfig,
    risk_stats: &'a ComprehensiveStats,
}

impl<'a> TerminalRenderer<'a> {
    pub(crate) fn new(config: RenderConfig, risk_stats: &'a ComprehensiveStats) -> Self {
        Self { config, risk_stats }
    }
}

impl Renderer for TerminalRenderer<'_> {
    fn render(&self, series: &ChartSeries) -> anyhow::Result<Vec<PathBuf>> {
        let mut terminal = ratatui::init();
        let app_result = App::new(series, self.risk_stats, &self.config).run(&mut terminal);
        ratatui::restore();
        app_result?;
        Ok(vec![])
    }
}
