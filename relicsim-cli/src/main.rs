mod composite;
mod config;
mod logging;
mod relic;
mod reports;
mod simc;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use composite::{CompositeModel, CompositeRequest, run_composite};
use config::SimcConfig;
use relic::{AnalyzePaths, BatchOutcome, analyze_output, load_relic_list, run_relic};
use relicsim_core::BatchTarget;

#[derive(Debug, Parser)]
#[command(name = "relicsim", version = "0.1.0")]
#[command(about = "Relic simulation batches for SimulationCraft: profilesets, curves and weights")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate profilesets, run the engine and write report + metadata
    Relic(RelicArgs),
    /// Analyze an existing engine json2 output
    Analyze(AnalyzeArgs),
    /// Combine per-fight-style combinator reports by model weight
    Composite(CompositeArgs),
}

#[derive(Debug, ClapArgs)]
struct RelicArgs {
    /// Class folder under profiles/RelicSimulation
    #[arg(long)]
    class_folder: String,

    /// Profile template name (RelicSimulation_<template>.simc)
    #[arg(long)]
    template: String,

    /// Specialization as named in the relic list
    #[arg(long)]
    spec: String,

    /// Fight style (Fightstyle_<fightstyle>.simc)
    #[arg(long)]
    fightstyle: String,

    /// Settings file with engine path and folders
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, ClapArgs)]
struct AnalyzeArgs {
    /// Engine json2 output to read
    #[arg(long)]
    input: PathBuf,

    /// Relic list document
    #[arg(long)]
    relic_list: PathBuf,

    /// Specialization as named in the relic list
    #[arg(long)]
    spec: String,

    /// Report file to write
    #[arg(long)]
    report: PathBuf,

    /// Optional metadata file to write
    #[arg(long)]
    meta: Option<PathBuf>,
}

#[derive(Debug, ClapArgs)]
struct CompositeArgs {
    /// Composite model with the Fightstyle_model weights
    #[arg(long)]
    model: PathBuf,

    /// Combinator profile name
    #[arg(long)]
    profile: String,

    /// Folder holding Combinator_<fight>_<profile>.csv and meta/
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Output CSV (defaults to Combinator_Composite_<profile>.csv in the reports folder)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Settings file with engine path and folders
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let start_time = Instant::now();

    announce_banner();

    match args.command {
        Command::Relic(relic_args) => {
            let settings = SimcConfig::load(relic_args.config.as_deref())?;
            let target = BatchTarget {
                spec: &relic_args.spec,
                fightstyle: &relic_args.fightstyle,
                template: &relic_args.template,
            };
            let outcome = run_relic(&settings, &relic_args.class_folder, &target)?;
            print_summary(&target.batch_name(), &outcome)?;
        }
        Command::Analyze(analyze_args) => {
            let list = load_relic_list(&analyze_args.relic_list)?;
            let paths = AnalyzePaths {
                input: analyze_args.input,
                report: analyze_args.report,
                meta: analyze_args.meta,
            };
            let outcome = analyze_output(&list, &analyze_args.spec, &paths)
                .with_context(|| format!("analysis of {} failed", paths.input.display()))?;
            let name = paths
                .input
                .file_stem()
                .map_or_else(|| "batch".to_string(), |s| s.to_string_lossy().into_owned());
            print_summary(&name, &outcome)?;
        }
        Command::Composite(composite_args) => {
            let settings = SimcConfig::load(composite_args.config.as_deref())?;
            let model = CompositeModel::read(&composite_args.model)?;
            let request = CompositeRequest {
                reports_dir: composite_args
                    .reports_dir
                    .unwrap_or_else(|| settings.reports_folder.clone()),
                profile: composite_args.profile,
            };
            let output = composite_args
                .output
                .unwrap_or_else(|| request.default_output());
            let combined = run_composite(&model, &request, &output)?;
            println!(
                "✅ {} rows written to {}",
                combined.len(),
                output.display().to_string().green()
            );
        }
    }

    println!("🏁 Total time: {:?}", start_time.elapsed());
    Ok(())
}

fn announce_banner() {
    println!("{}", "🔬 Relic Simulation".bright_cyan().bold());
    println!("{}", "===================".cyan());
}

fn print_summary(batch_name: &str, outcome: &BatchOutcome) -> Result<()> {
    let mut out = BufWriter::new(stdout());
    reports::write_summary(
        &mut out,
        batch_name,
        &outcome.analysis,
        &outcome.config,
        outcome.weights.as_ref(),
    )?;
    out.flush()?;
    Ok(())
}
