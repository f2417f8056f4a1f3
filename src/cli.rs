use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Default)]
#[command(
    name = "spmap",
    version,
    about = "Generate the GB settlement-period to UTC/local-time mapping table"
)]
pub struct Cli {
    /// First settlement date (YYYY-MM-DD); must fall in standard local time
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last settlement date (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub end_date: Option<String>,

    /// IANA identifier of the civil timezone
    #[arg(long)]
    pub timezone: Option<String>,

    /// Where to write the CSV output
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Where to write the parquet output
    #[arg(long)]
    pub parquet: Option<PathBuf>,

    /// Config file to use instead of searching for .spmap.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}
