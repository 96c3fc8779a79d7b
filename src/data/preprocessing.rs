//! Conversion of loaded tables into pairs and source rows

use anyhow::Result;
use polars::prelude::*;
use crate::cluster::Pair;
use crate::error::HomologyError;
use crate::hybrid::loader::SourceRow;

/// Why an input row was left out of clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither column has a value
    BothBlank,
    /// A partner is given but the first identifier is blank
    MissingFirstId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row (header excluded)
    pub row: usize,
    pub reason: SkipReason,
    pub id_two: Option<String>,
}

/// Pairs extracted from a pair table, with the rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct PairLoad {
    pub pairs: Vec<Pair>,
    pub skipped: Vec<SkippedRow>,
}

/// Fetch a column as text, mapping absence to a shape error
fn text_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let column = df.column(name).map_err(|_| HomologyError::MissingColumn {
        column: name.to_string(),
    })?;
    let column = column.cast(&DataType::String)?;
    Ok(column.str()?.clone())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Turn an `id_one`/`id_two` table into pairs.
///
/// `id_two` may hold several comma-separated partners; blank or `sentinel`
/// partners leave `id_one` unpartnered.
pub fn pairs_from_frame(df: &DataFrame, sentinel: &str) -> Result<PairLoad> {
    let id_one_col = text_column(df, "id_one")?;
    let id_two_col = text_column(df, "id_two")?;

    let mut load = PairLoad::default();
    for i in 0..df.height() {
        let id_one = non_blank(id_one_col.get(i));
        let id_two = non_blank(id_two_col.get(i));

        let id_one = match (id_one, id_two) {
            (Some(id_one), _) => id_one,
            (None, None) => {
                load.skipped.push(SkippedRow { row: i + 1, reason: SkipReason::BothBlank, id_two: None });
                continue;
            }
            (None, Some(two)) => {
                load.skipped.push(SkippedRow {
                    row: i + 1,
                    reason: SkipReason::MissingFirstId,
                    id_two: Some(two.to_string()),
                });
                continue;
            }
        };

        let partners: Vec<&str> = id_two
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty() && *p != sentinel)
                    .collect()
            })
            .unwrap_or_default();

        if partners.is_empty() {
            load.pairs.push(Pair::unpartnered(id_one));
        } else {
            load.pairs.extend(partners.into_iter().map(|p| Pair::new(id_one, p)));
        }
    }

    log::info!(
        "Extracted {} pairs, skipped {} rows",
        load.pairs.len(),
        load.skipped.len()
    );

    Ok(load)
}

/// Turn a `cluster_key`/`identifier`/`organism` table into source rows
pub fn source_rows_from_frame(df: &DataFrame) -> Result<Vec<SourceRow>> {
    let key_col = text_column(df, "cluster_key")?;
    let id_col = text_column(df, "identifier")?;
    let organism_col = text_column(df, "organism")?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let field = |value: Option<&str>, name: &str| -> Result<String, HomologyError> {
            non_blank(value)
                .map(str::to_string)
                .ok_or_else(|| HomologyError::input_shape(i + 1, format!("blank {}", name)))
        };

        rows.push(SourceRow {
            cluster_key: field(key_col.get(i), "cluster_key")?,
            identifier: field(id_col.get(i), "identifier")?,
            organism: field(organism_col.get(i), "organism")?,
        });
    }

    Ok(rows)
}
