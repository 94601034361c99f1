//! Seeded synthetic input tables
//!
//! Produces a factor table and a survival table with the same column layout
//! as the field survey exports, so the analysis commands can be tried without
//! real data. The same seed always yields byte-identical files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Args;
use rand::{Rng as _, SeedableRng as _};
use rand_distr::{Distribution as _, Exp, Normal};
use rand_pcg::Pcg64Mcg;
use serde::Serialize;
use wildlife_analysis::record::{FactorRow, SurvivalRow};

/// Habitats with their mean survival time in days.
const HABITATS: [(&str, f64); 5] = [
    ("Forest", 240.0),
    ("Grassland", 180.0),
    ("Wetland", 210.0),
    ("Mountain", 150.0),
    ("Coastal", 120.0),
];

/// Length of the tracking season in days; animals alive at the end are censored.
const STUDY_DAYS: f64 = 365.0;

/// Share of sites with an extreme temperature reading.
const EXTREME_TEMPERATURE_RATE: f64 = 0.05;

#[derive(Debug, Clone, Args)]
pub(crate) struct GenerateSampleDataArg {
    /// Random seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of tracked animals in the survival table
    #[arg(long, default_value_t = 500)]
    pub subjects: usize,

    /// Number of monitoring sites in the factor table
    #[arg(long, default_value_t = 200)]
    pub sites: usize,

    /// Directory receiving `factor_data.csv` and `survival_data.csv`
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub(crate) fn run(arg: &GenerateSampleDataArg) -> anyhow::Result<()> {
    let GenerateSampleDataArg {
        seed,
        subjects,
        sites,
        out_dir,
    } = arg;

    let mut generator = SampleGenerator::new(*seed);
    let survival = generator.survival_rows(*subjects)?;
    let factors = generator.factor_rows(*sites)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
    let survival_path = out_dir.join("survival_data.csv");
    let factors_path = out_dir.join("factor_data.csv");
    write_csv(&survival_path, &survival)?;
    write_csv(&factors_path, &factors)?;

    println!(
        "Wrote {} survival rows to {}",
        survival.len(),
        survival_path.display()
    );
    println!(
        "Wrote {} factor rows to {}",
        factors.len(),
        factors_path.display()
    );
    Ok(())
}

fn write_csv<T>(path: &Path, rows: &[T]) -> anyhow::Result<()>
where
    T: Serialize,
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

/// Rounds to two decimals, like the survey spreadsheets.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub(crate) struct SampleGenerator {
    rng: Pcg64Mcg,
}

impl SampleGenerator {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Exponential lifetimes per habitat, right-censored by a random
    /// enrollment day within the study season.
    pub(crate) fn survival_rows(&mut self, subjects: usize) -> anyhow::Result<Vec<SurvivalRow>> {
        let lifetimes = HABITATS
            .iter()
            .map(|&(habitat, mean)| -> anyhow::Result<_> {
                Ok((habitat, Exp::new(1.0 / mean)?))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let rows = (0..subjects)
            .map(|_| {
                let (habitat, lifetime) = &lifetimes[self.rng.random_range(0..lifetimes.len())];
                let death = lifetime.sample(&mut self.rng).max(1.0);
                let follow_up = STUDY_DAYS - self.rng.random_range(0.0..STUDY_DAYS * 0.75);
                let event_occurred = death <= follow_up;
                let survival_time = round2(if event_occurred { death } else { follow_up });
                SurvivalRow::new(*habitat, survival_time, event_occurred)
            })
            .collect();
        Ok(rows)
    }

    /// Site measurements; a few sites get an extreme temperature reading.
    pub(crate) fn factor_rows(&mut self, sites: usize) -> anyhow::Result<Vec<FactorRow>> {
        let air = Normal::<f64>::new(70.0, 12.0)?;
        let mild_temperature = Normal::<f64>::new(15.0, 6.0)?;
        let extreme_temperature = Normal::<f64>::new(42.0, 4.0)?;
        let deforestation = Exp::<f64>::new(8.0)?;
        let diversity = Normal::<f64>::new(0.6, 0.15)?;
        let reproduction = Normal::<f64>::new(2.5, 0.6)?;

        let rows = (0..sites)
            .map(|_| {
                let temperature = if self.rng.random_bool(EXTREME_TEMPERATURE_RATE) {
                    let magnitude = extreme_temperature.sample(&mut self.rng);
                    if self.rng.random_bool(0.5) {
                        magnitude
                    } else {
                        -magnitude
                    }
                } else {
                    mild_temperature.sample(&mut self.rng)
                };
                let air_quality = air.sample(&mut self.rng).clamp(0.0, 100.0);
                let deforestation_rate = deforestation.sample(&mut self.rng);
                let species_diversity = diversity.sample(&mut self.rng).clamp(0.0, 1.0);
                let reproductive_rate = reproduction.sample(&mut self.rng).max(0.0);
                FactorRow {
                    air_quality: Some(round2(air_quality)),
                    temperature: Some(round2(temperature)),
                    deforestation_rate: Some(round2(deforestation_rate)),
                    species_diversity: Some(round2(species_diversity)),
                    reproductive_rate: Some(round2(reproductive_rate)),
                }
            })
            .collect();
        Ok(rows)
    }
}
