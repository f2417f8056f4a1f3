//! Serialization of the slot table to its two on-disk formats.
//!
//! Both writers consume the same `DataFrame`, so CSV and parquet cannot
//! drift apart. Values are fully formatted before they reach this module;
//! nothing here transforms beyond serialization.

pub mod csv;
pub mod parquet;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use colored::*;
use polars::prelude::*;

use crate::config::RunConfig;
use crate::model::{CalendarDay, DstTransition, SettlementSlot};

/// Assemble the output table in its published column layout: timestamps as
/// RFC 3339 strings with offset, periods as zero-padded two-digit strings,
/// flags as booleans.
pub fn build_frame(slots: impl Iterator<Item = SettlementSlot>) -> Result<DataFrame> {
    let mut datesp = Vec::new();
    let mut settlementdate = Vec::new();
    let mut settlementperiod = Vec::new();
    let mut utc = Vec::new();
    let mut localtime = Vec::new();
    let mut localtimeisdst = Vec::new();
    let mut short_day_flag = Vec::new();
    let mut long_day_flag = Vec::new();
    let mut normal_day_flag = Vec::new();

    for slot in slots {
        datesp.push(slot.datesp());
        settlementdate.push(slot.settlement_date.format("%Y-%m-%d").to_string());
        settlementperiod.push(slot.period_label());
        utc.push(slot.utc.to_rfc3339());
        localtime.push(slot.local.to_rfc3339());
        localtimeisdst.push(slot.local_is_dst);
        short_day_flag.push(slot.day_category.is_short());
        long_day_flag.push(slot.day_category.is_long());
        normal_day_flag.push(slot.day_category.is_normal());
    }

    let frame = df!(
        "datesp" => datesp,
        "settlementdate" => settlementdate,
        "settlementperiod" => settlementperiod,
        "utc" => utc,
        "localtime" => localtime,
        "localtimeisdst" => localtimeisdst,
        "short_day_flag" => short_day_flag,
        "long_day_flag" => long_day_flag,
        "normal_day_flag" => normal_day_flag,
    )?;
    Ok(frame)
}

/// Write through a `.tmp` sibling and rename into place, so a failed run
/// never leaves a truncated file at the destination path.
pub(crate) fn replace_file(
    path: &Path,
    write: impl FnOnce(&Path) -> Result<()>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let staged = staging_path(path);
    write(&staged)?;
    fs::rename(&staged, path)
        .with_context(|| format!("failed to move {} into place", path.display()))?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn print_summary(days: &[CalendarDay], rows: usize, run: &RunConfig, elapsed: Duration) {
    let short = days
        .iter()
        .filter(|d| d.transition == DstTransition::SpringForward)
        .count();
    let long = days
        .iter()
        .filter(|d| d.transition == DstTransition::FallBack)
        .count();
    let normal = days.len() - short - long;

    let total = rows.to_string();
    println!(
        "{} rows across {} days ({} normal, {} short, {} long)",
        total.as_str().bold(),
        days.len(),
        normal,
        short,
        long
    );
    println!("wrote {}", run.csv.display());
    println!("wrote {}", run.parquet.display());
    println!("time elapsed: {:.2}s", elapsed.as_secs_f64());
}
