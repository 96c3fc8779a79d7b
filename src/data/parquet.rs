//! Parquet file handling for pair and source cluster tables

use anyhow::Result;
use polars::prelude::*;
use log;

/// Load a Parquet table into memory
pub fn read_parquet(path: &str) -> Result<DataFrame> {
    log::info!("Reading parquet file: {}", path);

    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;

    log::debug!("File schema: {:?}", df.schema());
    log::info!("Loaded {} rows", df.height());

    Ok(df)
}
