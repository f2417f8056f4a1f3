use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::calendar;
use crate::cli::Cli;

/// Configuration for one mapping-table run
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First settlement date (YYYY-MM-DD)
    pub start_date: String,
    /// Last settlement date (YYYY-MM-DD, inclusive)
    pub end_date: String,
    /// IANA identifier of the civil timezone
    pub timezone: String,
    /// Output file locations
    pub output: OutputConfig,
}

/// Output file locations
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv: PathBuf,
    pub parquet: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_date: "2001-01-01".into(),
            end_date: "2030-12-31".into(),
            timezone: "Europe/London".into(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: "masterlocaltime_iso8601.csv".into(),
            parquet: "masterlocaltime_iso8601.parquet".into(),
        }
    }
}

/// Fully parsed and validated inputs for one run. Built once at startup;
/// immutable thereafter.
#[derive(Debug)]
pub struct RunConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub tz: Tz,
    pub csv: PathBuf,
    pub parquet: PathBuf,
}

impl Config {
    /// Load config from .spmap.toml, searching up from the given directory
    pub fn load(start_dir: &Path) -> Result<Self> {
        if let Some(path) = find_config_file(start_dir) {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Merge CLI overrides onto the file/default values and validate
    /// everything before any computation starts.
    pub fn resolve(self, cli: &Cli) -> Result<RunConfig> {
        let start_str = cli.start_date.as_deref().unwrap_or(&self.start_date);
        let end_str = cli.end_date.as_deref().unwrap_or(&self.end_date);
        let tz_str = cli.timezone.as_deref().unwrap_or(&self.timezone);

        let start = parse_date(start_str).context("invalid start date")?;
        let end = parse_date(end_str).context("invalid end date")?;
        let tz: Tz = tz_str
            .parse()
            .ok()
            .with_context(|| format!("unrecognized timezone: {tz_str}"))?;

        if end < start {
            bail!("end date {end} is before start date {start}");
        }
        if calendar::is_dst_at_utc_midnight(start, tz) {
            bail!(
                "start date {start} falls in daylight saving time; \
                 pick a date in standard local time (the first of a year works)"
            );
        }

        Ok(RunConfig {
            start,
            end,
            tz,
            csv: cli.csv.clone().unwrap_or(self.output.csv),
            parquet: cli.parquet.clone().unwrap_or(self.output.parquet),
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    s.parse::<NaiveDate>()
        .with_context(|| format!("{s} is not a YYYY-MM-DD date"))
}

/// Search for .spmap.toml from start_dir upward
fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(".spmap.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}
