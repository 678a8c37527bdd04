//! Average resolution time over a grid of random instances.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use serde::Serialize;
use solver_mip::MipSettings;
use solver_robust::{solve_selection, SelectionCriterion};

use crate::generator::InstanceGenerator;

/// Criterion being timed.
#[derive(ValueEnum, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TimedCriterion {
    Maximin,
    Regret,
    MaxOwa,
    MinOwaRegret,
}

impl TimedCriterion {
    fn uses_weights(self) -> bool {
        matches!(self, Self::MaxOwa | Self::MinOwaRegret)
    }

    fn criterion(self, weights: Vec<f64>) -> SelectionCriterion {
        match self {
            Self::Maximin => SelectionCriterion::Maximin,
            Self::Regret => SelectionCriterion::MinimaxRegret,
            Self::MaxOwa => SelectionCriterion::MaxOwa(weights),
            Self::MinOwaRegret => SelectionCriterion::MinOwaRegret(weights),
        }
    }
}

/// Grid and repetition count.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    pub scenario_counts: Vec<usize>,
    pub project_counts: Vec<usize>,
    pub instances: usize,
    pub seed: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scenario_counts: vec![5, 10, 15],
            project_counts: vec![10, 15, 20],
            instances: 10,
            seed: 42,
        }
    }
}

/// One `(n, p)` cell. `n` counts scenarios and `p` projects.
#[derive(Debug, Clone, Serialize)]
pub struct TimingCell {
    pub n: usize,
    pub p: usize,
    /// Seconds.
    pub average_resolution_time: f64,
    pub suboptimal: usize,
}

/// CSV row of a cell.
#[derive(Debug, Serialize)]
struct CsvRow {
    n: usize,
    p: usize,
    average_resolution_time: f64,
}

impl From<&TimingCell> for CsvRow {
    fn from(cell: &TimingCell) -> Self {
        Self {
            n: cell.n,
            p: cell.p,
            average_resolution_time: cell.average_resolution_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimingSummary {
    pub criterion: TimedCriterion,
    pub seed: u64,
    pub instances: usize,
    pub cells: Vec<TimingCell>,
}

pub fn run_timing(criterion: TimedCriterion, config: &TimingConfig, settings: &MipSettings) -> Result<TimingSummary> {
    let settings = settings.clone().with_verbose(false);
    let mut gen = InstanceGenerator::new(config.seed);
    let mut cells = Vec::new();

    for &n in &config.scenario_counts {
        for &p in &config.project_counts {
            let mut total = 0.0;
            let mut suboptimal = 0;
            for k in 0..config.instances {
                let inst = gen.project_instance(n, p)?;
                let weights = if criterion.uses_weights() {
                    gen.owa_weights(n)
                } else {
                    Vec::new()
                };

                let start = Instant::now();
                let res = solve_selection(&inst, &criterion.criterion(weights), &settings)
                    .with_context(|| format!("instance {k} of cell n={n}, p={p}"))?;
                total += start.elapsed().as_secs_f64();

                if !res.status.is_optimal() {
                    suboptimal += 1;
                }
                debug!("n={n} p={p} #{k}: objective {}", res.objective);
            }

            let average = if config.instances > 0 {
                total / config.instances as f64
            } else {
                0.0
            };
            info!("n={n} p={p}: {average:.4}s average");
            cells.push(TimingCell {
                n,
                p,
                average_resolution_time: average,
                suboptimal,
            });
        }
    }

    Ok(TimingSummary {
        criterion,
        seed: config.seed,
        instances: config.instances,
        cells,
    })
}

pub fn print_table(summary: &TimingSummary) {
    println!("\n{:?} over {} instances per cell", summary.criterion, summary.instances);
    println!("{}", "-".repeat(40));
    println!("{:>4} {:>4} {:>28}", "n", "p", "average_resolution_time");
    for cell in &summary.cells {
        let flag = if cell.suboptimal > 0 { " *" } else { "" };
        println!(
            "{:>4} {:>4} {:>28.6}{flag}",
            cell.n, cell.p, cell.average_resolution_time
        );
    }
    if summary.cells.iter().any(|c| c.suboptimal > 0) {
        println!("* some solves stopped at a limit");
    }
}

/// Write `n,p,average_resolution_time` rows with a header line.
pub fn write_csv<W: Write>(summary: &TimingSummary, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    write_rows(summary, &mut writer)
}

fn write_rows<W: Write>(summary: &TimingSummary, writer: &mut csv::Writer<W>) -> Result<()> {
    for cell in &summary.cells {
        writer.serialize(CsvRow::from(cell))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_csv<P: AsRef<Path>>(summary: &TimingSummary, path: P) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())
        .with_context(|| format!("Failed to create file {}", path.as_ref().display()))?;
    write_rows(summary, &mut writer)
        .with_context(|| format!("Failed to write CSV to {}", path.as_ref().display()))
}

pub fn save_json<P: AsRef<Path>>(summary: &TimingSummary, path: P) -> Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("Failed to create file {}", path.as_ref().display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, summary)
        .with_context(|| format!("Failed to write JSON to {}", path.as_ref().display()))?;
    Ok(())
}
