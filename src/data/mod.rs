//! Input loading: pair tables and source cluster tables

pub mod delimited;
pub mod parquet;
pub mod preprocessing;

use anyhow::Result;
use polars::prelude::DataFrame;
use std::path::Path;

/// Read a table, choosing the reader from the file extension.
///
/// `.parquet` files go through the Parquet scanner; anything else is read as
/// tab-delimited text with a header line.
pub fn read_table(path: &str) -> Result<DataFrame> {
    if !Path::new(path).exists() {
        return Err(anyhow::anyhow!("File not found: {}", path));
    }

    let is_parquet = Path::new(path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        parquet::read_parquet(path)
    } else {
        delimited::read_delimited(path)
    }
}
