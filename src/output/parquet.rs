use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::replace_file;

/// Write the table as parquet with the same schema and content as the CSV.
pub fn write(frame: &mut DataFrame, path: &Path) -> Result<()> {
    replace_file(path, |staged| {
        let file = File::create(staged)
            .with_context(|| format!("failed to create {}", staged.display()))?;
        ParquetWriter::new(file)
            .finish(frame)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    })
}
