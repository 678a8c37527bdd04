//! The numbered problem variants and the interactive prompt.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use solver_mip::MipSettings;
use solver_robust::{
    data, shortest_paths, solve_path, solve_selection, PathCriterion, PathInstance, SelectionCriterion,
};

use crate::timing::{self, TimedCriterion, TimingConfig};

pub const MENU: [&str; 14] = [
    "Maximin project selection",
    "Minimax regret project selection",
    "Maximin: resolution time",
    "Minimax regret: resolution time",
    "Max-OWA project selection",
    "Min-OWA of regrets project selection",
    "Max-OWA: resolution time",
    "Min-OWA of regrets: resolution time",
    "Shortest path: instance 1",
    "Shortest path: instance 2",
    "Robust path (min-max cost)",
    "Robust path (minimax regret)",
    "Robust path (OWA sweep)",
    "Robust path (min-OWA of regrets sweep)",
];

/// Everything a variant needs besides its number.
pub struct RunContext {
    pub settings: MipSettings,
    pub timing: TimingConfig,
    pub output: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

pub fn print_menu() {
    println!("Choose a problem:");
    for (k, entry) in MENU.iter().enumerate() {
        println!("{:>2}. {entry}", k + 1);
    }
}

pub fn run_interactive(ctx: &RunContext) -> Result<()> {
    print_menu();
    print!("Enter your choice (1-{}): ", MENU.len());
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read choice")?;
    let choice: usize = line
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a menu number", line.trim()))?;
    run_variant(choice, ctx)
}

pub fn run_variant(choice: usize, ctx: &RunContext) -> Result<()> {
    let settings = &ctx.settings;
    match choice {
        1 => selection(SelectionCriterion::Maximin, settings),
        2 => selection(SelectionCriterion::MinimaxRegret, settings),
        3 => timed(TimedCriterion::Maximin, ctx),
        4 => timed(TimedCriterion::Regret, ctx),
        5 => selection(SelectionCriterion::MaxOwa(data::DEFAULT_OWA_WEIGHTS.to_vec()), settings),
        6 => selection(
            SelectionCriterion::MinOwaRegret(data::DEFAULT_OWA_WEIGHTS.to_vec()),
            settings,
        ),
        7 => timed(TimedCriterion::MaxOwa, ctx),
        8 => timed(TimedCriterion::MinOwaRegret, ctx),
        9 => scenario_paths("Instance 1", &data::path_instance_1()?, settings),
        10 => scenario_paths("Instance 2", &data::path_instance_2()?, settings),
        11 => robust_paths(&[PathCriterion::Maximin], settings),
        12 => robust_paths(&[PathCriterion::MinimaxRegret], settings),
        13 => robust_paths(
            &data::owa_sweep().into_iter().map(PathCriterion::Owa).collect::<Vec<_>>(),
            settings,
        ),
        14 => robust_paths(
            &data::owa_sweep()
                .into_iter()
                .map(PathCriterion::MinOwaRegret)
                .collect::<Vec<_>>(),
            settings,
        ),
        _ => bail!("invalid choice {choice}: expected a number between 1 and {}", MENU.len()),
    }
}

fn selection(criterion: SelectionCriterion, settings: &MipSettings) -> Result<()> {
    let inst = data::portfolio_example()?;
    let res = solve_selection(&inst, &criterion, settings)
        .with_context(|| format!("Solving {criterion}"))?;
    println!("{criterion}");
    println!("{res}");
    Ok(())
}

pub fn timed(criterion: TimedCriterion, ctx: &RunContext) -> Result<()> {
    let summary = timing::run_timing(criterion, &ctx.timing, &ctx.settings)?;
    timing::print_table(&summary);
    if let Some(path) = &ctx.output {
        timing::save_csv(&summary, path)?;
        println!("wrote {}", path.display());
    }
    if let Some(path) = &ctx.json {
        timing::save_json(&summary, path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn scenario_paths(label: &str, inst: &PathInstance, settings: &MipSettings) -> Result<()> {
    let results = shortest_paths(inst, settings).with_context(|| format!("Solving {label}"))?;
    for (s, res) in results.iter().enumerate() {
        println!("{label}, scenario {s}:");
        println!("{res}");
        println!();
    }
    Ok(())
}

fn robust_paths(criteria: &[PathCriterion], settings: &MipSettings) -> Result<()> {
    let instances = [
        ("Instance 1", data::path_instance_1()?),
        ("Instance 2", data::path_instance_2()?),
    ];
    for (label, inst) in &instances {
        for criterion in criteria {
            let res = solve_path(inst, criterion, settings)
                .with_context(|| format!("Solving {label} with {criterion}"))?;
            println!("{label}, {criterion}:");
            println!("{res}");
            println!();
        }
    }
    Ok(())
}
