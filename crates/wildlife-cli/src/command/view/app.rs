use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::Text,
    widgets::{Block, Tabs},
};
use wildlife_analysis::report::ChartSeries;
use wildlife_stats::comprehensive::ComprehensiveStats;

use crate::render::RenderConfig;

use super::charts::{CorrelationHeatmap, RiskDistribution, SurvivalCurves, SurvivalDistribution};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    #[default]
    Survival,
    Risk,
    Correlation,
    Distribution,
}

impl Tab {
    const ALL: [Self; 4] = [
        Self::Survival,
        Self::Risk,
        Self::Correlation,
        Self::Distribution,
    ];

    fn index(self) -> usize {
        match self {
            Self::Survival => 0,
            Self::Risk => 1,
            Self::Correlation => 2,
            Self::Distribution => 3,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug)]
pub(super) struct App<'a> {
    series: &'a ChartSeries,
    config: &'a RenderConfig,
    risk_stats: &'a ComprehensiveStats,
    tab: Tab,
    show_band: bool,
    should_exit: bool,
}

impl<'a> App<'a> {
    pub(super) fn new(
        series: &'a ChartSeries,
        risk_stats: &'a ComprehensiveStats,
        config: &'a RenderConfig,
    ) -> Self {
        Self {
            series,
            config,
            risk_stats,
            tab: Tab::default(),
            show_band: true,
            should_exit: false,
        }
    }

    pub(super) fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.should_exit {
            terminal.draw(|f| self.draw(f))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [tabs_area, main_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let config = self.config;
        let titles = [
            &config.survival_chart.title,
            &config.risk_chart.title,
            &config.correlation_chart.title,
            &config.distribution_chart.title,
        ]
        .map(String::as_str);
        let tabs = Tabs::new(titles)
            .block(Block::bordered().title("Wildlife Analysis"))
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, tabs_area);

        match self.tab {
            Tab::Survival => frame.render_widget(
                SurvivalCurves {
                    curves: &self.series.survival_curves,
                    config,
                    show_band: self.show_band,
                },
                main_area,
            ),
            Tab::Risk => frame.render_widget(
                RiskDistribution {
                    config,
                    stats: self.risk_stats,
                },
                main_area,
            ),
            Tab::Correlation => frame.render_widget(
                CorrelationHeatmap {
                    config,
                    matrix: &self.series.factor_correlation,
                },
                main_area,
            ),
            Tab::Distribution => frame.render_widget(
                SurvivalDistribution {
                    config,
                    distributions: &self.series.survival_distribution,
                },
                main_area,
            ),
        }

        let band_status = if self.show_band { "on" } else { "off" };
        let help_text = Text::from(format!(
            "←/→: Switch chart | b: Toggle band ({band_status}) | q/Esc: Quit"
        ))
        .style(Style::default().fg(Color::DarkGray))
        .centered();
        frame.render_widget(help_text, help_area);
    }

    fn handle_events(&mut self) -> anyhow::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key_event(key_event);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.tab = self.tab.next(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.tab = self.tab.prev(),
            KeyCode::Char('b') => self.show_band = !self.show_band,
            KeyCode::Char('1') => self.tab = Tab::Survival,
            KeyCode::Char('2') => self.tab = Tab::Risk,
            KeyCode::Char('3') => self.tab = Tab::Correlation,
            KeyCode::Char('4') => self.tab = Tab::Distribution,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Survival.next(), Tab::Risk);
        assert_eq!(Tab::Distribution.next(), Tab::Survival);
        assert_eq!(Tab::Survival.prev(), Tab::Distribution);
        for tab in Tab::ALL {
            assert_eq!(tab.next().prev(), tab);
        }
    }
}
