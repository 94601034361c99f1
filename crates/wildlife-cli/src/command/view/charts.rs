use std::str::FromStr as _;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        Axis, Bar, BarChart, Block, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
        Widget,
    },
};
use wildlife_analysis::report::{CurveSeries, DistributionSeries};
use wildlife_stats::{
    box_plot::BoxSummary, comprehensive::ComprehensiveStats, correlation::CorrelationMatrix,
};

use crate::render::RenderConfig;

fn habitat_color(config: &RenderConfig, index: usize) -> Color {
    config
        .color_for(index)
        .and_then(|color| Color::from_str(color).ok())
        .unwrap_or(Color::Cyan)
}

fn axis_labels(bounds: [f64; 2]) -> [String; 3] {
    [
        format!("{:.2}", bounds[0]),
        format!("{:.2}", f64::midpoint(bounds[0], bounds[1])),
        format!("{:.2}", bounds[1]),
    ]
}

pub(super) struct SurvivalCurves<'a> {
    pub curves: &'a [CurveSeries],
    pub config: &'a RenderConfig,
    pub show_band: bool,
}

impl Widget for SurvivalCurves<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut traces = vec![];
        for (i, curve) in self.curves.iter().enumerate() {
            let style = Style::default().fg(habitat_color(self.config, i));
            if self.show_band {
                let band_style = style.add_modifier(Modifier::DIM);
                let lower: Vec<_> = curve.vertices.iter().map(|v| (v.time, v.lower)).collect();
                let upper: Vec<_> = curve.vertices.iter().map(|v| (v.time, v.upper)).collect();
                traces.push((None, lower, band_style));
                traces.push((None, upper, band_style));
            }
            let line = curve
                .vertices
                .iter()
                .map(|v| (v.time, v.survival_probability))
                .collect::<Vec<_>>();
            traces.push((Some(curve.stratum.as_str()), line, style));
        }

        let x_max = self
            .curves
            .iter()
            .filter_map(|curve| curve.vertices.last())
            .map(|v| v.time)
            .fold(1.0, f64::max);
        let x_bounds = [0.0, x_max];
        let y_bounds = [0.0, 1.0];

        let datasets = traces
            .iter()
            .map(|(name, points, style)| {
                let dataset = Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(*style)
                    .data(points);
                match name {
                    Some(name) => dataset.name(*name),
                    None => dataset,
                }
            })
            .collect::<Vec<_>>();

        let labels = &self.config.survival_chart;
        let chart = Chart::new(datasets)
            .block(Block::bordered().title(labels.title.as_str()))
            .x_axis(
                Axis::default()
                    .title(labels.x_label.as_str())
                    .bounds(x_bounds)
                    .labels(axis_labels(x_bounds)),
            )
            .y_axis(
                Axis::default()
                    .title(labels.y_label.as_str())
                    .bounds(y_bounds)
                    .labels(axis_labels(y_bounds)),
            );

        Widget::render(chart, area, buf);
    }
}

pub(super) struct RiskDistribution<'a> {
    pub config: &'a RenderConfig,
    pub stats: &'a ComprehensiveStats,
}

impl Widget for RiskDistribution<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let labels = &self.config.risk_chart;
        let block = Block::bordered().title(format!(
            "{} ({} by {})",
            labels.title, labels.y_label, labels.x_label
        ));
        let inner = block.inner(area);
        Widget::render(block, area, buf);

        let [stats_area, chart_area] =
            Layout::horizontal([Constraint::Length(30), Constraint::Fill(1)]).areas(inner);

        let comprehensive = self.stats;
        let stats = &comprehensive.stats;
        let mut text = vec![
            Line::raw(format!("  Count:  {:10}", stats.count)),
            Line::raw(format!("  Mean:   {:10.2}", stats.mean)),
            Line::raw(format!("  StdDev: {:10.2}", stats.std_dev)),
            Line::raw(format!("  Min:    {:10.2}", stats.min)),
        ];
        for (p, value) in comprehensive.percentiles.iter() {
            text.push(Line::raw(format!("  P{p:02}:    {value:10.2}")));
        }
        text.push(Line::raw(format!("  Max:    {:10.2}", stats.max)));

        let chart = BarChart::new(
            comprehensive
                .histogram
                .bins
                .iter()
                .map(|bin| {
                    Bar::with_label(
                        format!("{:8.2}-{:8.2}", bin.range.start, bin.range.end),
                        bin.count,
                    )
                    .text_value(format!("{}", bin.count))
                })
                .collect::<Vec<_>>(),
        )
        .direction(Direction::Horizontal)
        .bar_gap(0);

        Widget::render(Paragraph::new(text), stats_area, buf);
        Widget::render(chart, chart_area, buf);
    }
}

/// Cell color for a coefficient: blue for negative, red for positive.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coolwarm(coefficient: f64) -> Color {
    if coefficient.is_nan() {
        return Color::DarkGray;
    }
    let t = coefficient.clamp(-1.0, 1.0);
    let fade = (255.0 * (1.0 - t.abs())).round() as u8;
    if t >= 0.0 {
        Color::Rgb(255, fade, fade)
    } else {
        Color::Rgb(fade, fade, 255)
    }
}

pub(super) struct CorrelationHeatmap<'a> {
    pub config: &'a RenderConfig,
    pub matrix: &'a CorrelationMatrix,
}

impl Widget for CorrelationHeatmap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(self.matrix.labels.iter().map(|l| Cell::from(l.as_str()))),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self
            .matrix
            .labels
            .iter()
            .zip(&self.matrix.coefficients)
            .map(|(label, coefficients)| {
                let cells = coefficients.iter().map(|&r| {
                    Cell::from(format!("{r:>8.2}"))
                        .style(Style::default().fg(Color::Black).bg(coolwarm(r)))
                });
                Row::new(std::iter::once(Cell::from(label.as_str())).chain(cells))
            });

        let widths = std::iter::once(Constraint::Length(18))
            .chain(self.matrix.labels.iter().map(|_| Constraint::Length(18)));
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(Block::bordered().title(self.config.correlation_chart.title.as_str()));

        Widget::render(table, area, buf);
    }
}

/// Draws `summary` as a one-line box plot, scaling `bounds` onto `width` cells.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn box_line(summary: &BoxSummary, bounds: [f64; 2], width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let last = (width - 1) as f64;
    let span = (bounds[1] - bounds[0]).max(f64::EPSILON);
    let column =
        |value: f64| (((value - bounds[0]) / span) * last).round().clamp(0.0, last) as usize;

    let mut cells = vec![' '; width];
    let (low, high) = (column(summary.whisker_low), column(summary.whisker_high));
    let (q1, q3) = (column(summary.q1), column(summary.q3));
    cells[low..=high].fill('─');
    cells[q1..=q3].fill('▒');
    cells[low] = '├';
    cells[high] = '┤';
    cells[column(summary.median)] = '┃';
    for &outlier in &summary.outliers {
        cells[column(outlier)] = '•';
    }
    cells.into_iter().collect()
}

pub(super) struct SurvivalDistribution<'a> {
    pub config: &'a RenderConfig,
    pub distributions: &'a [DistributionSeries],
}

const LABEL_WIDTH: usize = 16;
const COUNT_WIDTH: usize = 6;
const MEDIAN_WIDTH: usize = 10;

impl Widget for SurvivalDistribution<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let labels = &self.config.distribution_chart;
        let block = Block::bordered().title(labels.title.as_str());
        let inner = block.inner(area);

        let bounds = self
            .distributions
            .iter()
            .flat_map(|d| {
                let s = &d.summary;
                [s.whisker_low, s.whisker_high]
                    .into_iter()
                    .chain(s.outliers.iter().copied())
            })
            .fold([f64::INFINITY, f64::NEG_INFINITY], |[lo, hi], v| {
                [lo.min(v), hi.max(v)]
            });
        let plot_width = usize::from(inner.width)
            .saturating_sub(LABEL_WIDTH + COUNT_WIDTH + MEDIAN_WIDTH + 3);

        let mut lines = vec![Line::styled(
            format!(
                "{:<LABEL_WIDTH$} {:>COUNT_WIDTH$} {:^plot_width$} {:>MEDIAN_WIDTH$}",
                labels.x_label, "n", labels.y_label, "median"
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for (i, dist) in self.distributions.iter().enumerate() {
            let summary = &dist.summary;
            lines.push(Line::styled(
                format!(
                    "{:<LABEL_WIDTH$} {:>COUNT_WIDTH$} {} {:>MEDIAN_WIDTH$.1}",
                    dist.stratum,
                    summary.count,
                    box_line(summary, bounds, plot_width),
                    summary.median,
                ),
                Style::default().fg(habitat_color(self.config, i)),
            ));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("range {:.1} .. {:.1}", bounds[0], bounds[1]),
            Style::default().fg(Color::DarkGray),
        ));

        Widget::render(block, area, buf);
        Widget::render(Paragraph::new(lines), inner, buf);
    }
}
