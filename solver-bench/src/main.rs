//! Command-line front end for the robust formulations.

mod generator;
mod menu;
mod timing;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use env_logger::Builder;
use log::LevelFilter;
use solver_mip::{MipSettings, NodeSelection};

use crate::menu::RunContext;
use crate::timing::{TimedCriterion, TimingConfig};

#[derive(Parser, Debug)]
#[command(name = "solver-bench", version, about = "Robust selection and shortest-path problems")]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Time limit per MILP solve, in seconds.
    #[arg(long, global = true)]
    time_limit: Option<f64>,

    /// Node budget per MILP solve.
    #[arg(long, global = true)]
    max_nodes: Option<u64>,

    /// Explore the open node with the best bound instead of depth-first.
    #[arg(long, global = true)]
    best_bound: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the numbered menu and read one choice.
    Menu(GridArgs),
    /// Run one menu variant without prompting.
    Solve {
        /// Menu number (1-14).
        variant: usize,
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Time one criterion over the random instance grid.
    Timing {
        #[arg(value_enum, default_value_t = TimedCriterion::Maximin)]
        criterion: TimedCriterion,
        #[command(flatten)]
        grid: GridArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct GridArgs {
    /// Random instances per (n, p) cell.
    #[arg(long, default_value_t = 10)]
    instances: usize,

    /// Seed of the instance generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the timing table as CSV.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the timing summary as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Default for GridArgs {
    fn default() -> Self {
        let timing = TimingConfig::default();
        Self {
            instances: timing.instances,
            seed: timing.seed,
            output: None,
            json: None,
        }
    }
}

fn init_logging(verbose: &Verbosity<WarnLevel>) {
    Builder::new()
        .filter_level(verbose.log_level_filter())
        .parse_default_env()
        .init();
}

fn settings(cli: &Cli) -> MipSettings {
    let verbose = cli.verbose.log_level_filter() >= LevelFilter::Info;
    let mut settings = MipSettings::default().with_verbose(verbose);
    if let Some(secs) = cli.time_limit {
        settings = settings.with_time_limit(secs);
    }
    if let Some(nodes) = cli.max_nodes {
        settings = settings.with_max_nodes(nodes);
    }
    if cli.best_bound {
        settings = settings.with_node_selection(NodeSelection::BestBound);
    }
    settings
}

fn context(settings: MipSettings, grid: GridArgs) -> RunContext {
    RunContext {
        settings,
        timing: TimingConfig {
            instances: grid.instances,
            seed: grid.seed,
            ..TimingConfig::default()
        },
        output: grid.output,
        json: grid.json,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.verbose);
    let settings = settings(&cli);
    log::info!("solver-bench starting");

    match cli.command {
        None => menu::run_interactive(&context(settings, GridArgs::default())),
        Some(Command::Menu(grid)) => menu::run_interactive(&context(settings, grid)),
        Some(Command::Solve { variant, grid }) => menu::run_variant(variant, &context(settings, grid)),
        Some(Command::Timing { criterion, grid }) => menu::timed(criterion, &context(settings, grid)),
    }
}
