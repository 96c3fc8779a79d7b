//! Tab-delimited text tables

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use log;

/// Load a tab-delimited file with a header line; every column is read as text.
///
/// Lines starting with `#` are skipped, as in [`check_columns`].
pub fn read_delimited(path: &str) -> Result<DataFrame> {
    log::info!("Reading delimited file: {}", path);

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(b'\t')
        .with_comment_prefix(Some("#".into()))
        .with_infer_schema_length(Some(0))
        .finish()
        .with_context(|| format!("could not scan {}", path))?
        .collect()?;

    log::info!("Loaded {} rows", df.height());

    Ok(df)
}

/// A line with fewer columns than required
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIssue {
    /// 1-based count of non-comment lines
    pub line: usize,
    pub found: usize,
    pub content: String,
}

/// Find lines with fewer than `min_columns` tab-separated fields.
///
/// Lines starting with `#` are skipped and not counted.
pub fn check_columns(path: &str, min_columns: usize) -> Result<Vec<ColumnIssue>> {
    let file = File::open(path).with_context(|| format!("could not open {}", path))?;
    let reader = BufReader::new(file);

    let mut issues = Vec::new();
    let mut line_num = 0;
    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }
        line_num += 1;

        let found = line.trim_end_matches(['\r', '\n']).split('\t').count();
        if found < min_columns {
            log::warn!("Missing column(s) in {} on line {}: {}", path, line_num, line);
            issues.push(ColumnIssue {
                line: line_num,
                found,
                content: line,
            });
        }
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_check_columns_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# header comment\na\tb\tc\nonly\n\nx\ty\tz\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let issues = check_columns(&path, 3).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].found, 1);
        assert_eq!(issues[0].content, "only");
        assert_eq!(issues[1].line, 3);
    }

    #[test]
    fn test_read_delimited_keeps_text_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id_one\tid_two\n00123\tMGI:1\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let df = read_delimited(&path).unwrap();
        assert_eq!(df.height(), 1);
        let first = df.column("id_one").unwrap().str().unwrap().get(0);
        assert_eq!(first, Some("00123"));
    }

    #[test]
    fn test_check_columns_counts_empty_last_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a\tb\t\nHGNC:2\t\r\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let issues = check_columns(&path, 2).unwrap();
        assert!(issues.is_empty());

        let issues = check_columns(&path, 3).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].found, 2);
    }

    #[test]
    fn test_read_delimited_skips_comment_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# generated by feed\nid_one\tid_two\nA\tB\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert!(check_columns(&path, 2).unwrap().is_empty());

        let df = read_delimited(&path).unwrap();
        assert_eq!(df.height(), 1);
        let second = df.column("id_two").unwrap().str().unwrap().get(0);
        assert_eq!(second, Some("B"));
    }
}
