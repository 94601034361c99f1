//! Console summary of an analysis run
//!
//! The layout follows the field team's spreadsheet: one row per habitat, then
//! the risk-score description and the headline metrics.

use wildlife_analysis::{
    report::AnalysisReport,
    risk::RiskSummary,
    survival::{SurvivalStats, SurvivalStatsMap},
};
use wildlife_stats::comprehensive::QUARTILES;

/// A row in the habitat survival table
struct SurvivalTableRow<'a> {
    label: &'a str,
    stats: &'a SurvivalStats,
}

impl<'a> SurvivalTableRow<'a> {
    fn from_map(map: &'a SurvivalStatsMap) -> Vec<Self> {
        map.map
            .iter()
            .map(|(label, stats)| Self { label, stats })
            .collect()
    }
}

fn print_survival_table_header() {
    println!(
        "  {:<20} {:>8} {:>10} {:>12} {:>10} {:>12}",
        "Habitat", "Records", "Censored%", "Mean(All)", "EventRate", "Median(KM)",
    );
}

fn print_survival_table_separator() {
    // label(20) + records(8) + censored%(10) + mean(12) + event rate(10) + median(12) + spaces(5)
    println!("  {}", "-".repeat(77));
}

fn print_survival_table_row(row: &SurvivalTableRow) {
    let stats = row.stats;
    let median_str = stats
        .median_km
        .map_or("N/A".to_string(), |m| format!("{m:.2}"));

    println!(
        "  {:<20} {:>8} {:>9.1}% {:>12.2} {:>10.2} {:>12}",
        row.label,
        stats.record_count,
        100.0 * stats.censored_fraction,
        stats.mean_survival_time,
        stats.event_rate,
        median_str,
    );
}

fn print_legend() {
    println!("Legend:");
    println!("  Mean(All)   : Naive mean of all survival times (censored included, biased low)");
    println!("  EventRate   : Mean of Censoring_Status (share of observed deaths)");
    println!("  Median(KM)  : Kaplan-Meier median survival (N/A when S(t) never reaches 0.5)");
}

fn print_survival_table(stats: &SurvivalStatsMap) {
    print_survival_table_header();
    print_survival_table_separator();
    for row in SurvivalTableRow::from_map(stats) {
        print_survival_table_row(&row);
    }
    for skipped in &stats.skipped {
        println!("  {:<20} skipped: {}", skipped.stratum, skipped.reason);
    }
}

fn print_risk_summary(risk: &RiskSummary) {
    let stats = &risk.description.stats;
    println!("  {:<8} {:>12}", "count", stats.count);
    println!("  {:<8} {:>12.4}", "mean", stats.mean);
    println!("  {:<8} {:>12.4}", "std", stats.std_dev);
    println!("  {:<8} {:>12.4}", "min", stats.min);
    for p in QUARTILES {
        let value = risk.quartile(p).unwrap_or(f64::NAN);
        println!("  {:<8} {value:>12.4}", format!("{p}%"));
    }
    println!("  {:<8} {:>12.4}", "max", stats.max);
}

pub(super) fn print_report(report: &AnalysisReport) {
    println!("=== Wildlife Population Analysis Results ===");
    println!();

    print_legend();
    println!();

    println!("Survival Statistics by Habitat:");
    print_survival_table(&report.survival);
    println!();

    println!("Environmental Risk Summary:");
    print_risk_summary(&report.risk);
    println!();

    println!("Key Metrics:");
    println!("  censoring_rates      : {:.4}", report.overall_event_rate);
    println!(
        "  temperature_extremes : {:.4}",
        report.temperature_outlier_fraction
    );
}
