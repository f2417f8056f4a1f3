mod calendar;
mod cli;
mod config;
mod model;
mod output;
mod slots;

use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        process::exit(2);
    }
}

fn run() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();

    let config = if let Some(ref config_path) = cli.config {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?
    } else {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        Config::load(&cwd)?
    };
    let run = config.resolve(&cli)?;

    let transitions = calendar::transition_days(run.start, run.end, run.tz);
    let days = calendar::classify_days(run.start, run.end, run.tz, &transitions);

    let slots = slots::timestamp(slots::expand(&days), run.start, run.tz, &transitions);
    let mut frame = output::build_frame(slots)?;

    output::csv::write(&mut frame, &run.csv)?;
    output::parquet::write(&mut frame, &run.parquet)?;

    output::print_summary(&days, frame.height(), &run, started.elapsed());
    Ok(())
}
