//! Bulk-load record emission from a load-ready file

use anyhow::{Context, Result};
use crate::error::HomologyError;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const CLUSTER_BCP: &str = "cluster.bcp";
pub const MEMBER_BCP: &str = "member.bcp";

/// One line of a load-ready file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRecord {
    pub cluster_id: String,
    pub members: Vec<String>,
    pub properties: Option<String>,
}

/// Next free keys; returned updated after a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkKeys {
    pub next_cluster_key: u64,
    pub next_member_key: u64,
}

/// Parse one load-ready line: `clusterId<TAB>members[<TAB>properties]`
pub fn parse_load_line(line: &str, row: usize) -> Result<LoadRecord, HomologyError> {
    let mut fields = line.split('\t');
    let cluster_id = fields.next().unwrap_or("").trim();
    let members = fields
        .next()
        .ok_or_else(|| HomologyError::input_shape(row, "expected at least 2 columns"))?;

    if cluster_id.is_empty() {
        return Err(HomologyError::input_shape(row, "blank cluster id"));
    }

    let members: Vec<String> = members
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if members.is_empty() {
        return Err(HomologyError::input_shape(row, "cluster has no members"));
    }

    let properties = fields
        .next()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    Ok(LoadRecord {
        cluster_id: cluster_id.to_string(),
        members,
        properties,
    })
}

/// Read every non-blank line of a load-ready file
pub fn read_load_file(path: &str) -> Result<Vec<LoadRecord>> {
    let file = File::open(path).with_context(|| format!("could not open {}", path))?;
    let mut records = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_load_line(&line, i + 1)?);
    }
    log::info!("Read {} load-ready records from {}", records.len(), path);
    Ok(records)
}

/// Write cluster and member bulk-load files.
///
/// Cluster rows: `clusterKey<TAB>clusterId<TAB>properties`.
/// Member rows: `memberKey<TAB>clusterKey<TAB>member<TAB>sequenceNum`, with
/// sequence numbers restarting at 1 for each cluster in listed member order.
pub fn write_bulk_files(records: &[LoadRecord], start: BulkKeys, output_dir: &str) -> Result<BulkKeys> {
    fs::create_dir_all(output_dir)?;

    let mut cluster_out = BufWriter::new(File::create(Path::new(output_dir).join(CLUSTER_BCP))?);
    let mut member_out = BufWriter::new(File::create(Path::new(output_dir).join(MEMBER_BCP))?);

    let mut keys = start;
    for record in records {
        writeln!(
            cluster_out,
            "{}\t{}\t{}",
            keys.next_cluster_key,
            record.cluster_id,
            record.properties.as_deref().unwrap_or("")
        )?;

        for (seq, member) in record.members.iter().enumerate() {
            writeln!(
                member_out,
                "{}\t{}\t{}\t{}",
                keys.next_member_key,
                keys.next_cluster_key,
                member,
                seq + 1
            )?;
            keys.next_member_key += 1;
        }
        keys.next_cluster_key += 1;
    }

    cluster_out.flush()?;
    member_out.flush()?;

    log::info!(
        "Wrote {} cluster rows and {} member rows",
        keys.next_cluster_key - start.next_cluster_key,
        keys.next_member_key - start.next_member_key
    );

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_properties() {
        let record = parse_load_line("20\tHGNC:2, MGI:1\tsecondary source:HGNC", 1).unwrap();
        assert_eq!(record.cluster_id, "20");
        assert_eq!(record.members, vec!["HGNC:2", "MGI:1"]);
        assert_eq!(record.properties.as_deref(), Some("secondary source:HGNC"));
    }

    #[test]
    fn test_parse_line_wrong_arity() {
        let err = parse_load_line("T:1", 3).unwrap_err();
        assert_eq!(err, HomologyError::input_shape(3, "expected at least 2 columns"));
    }

    #[test]
    fn test_bulk_keys_and_sequence_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let records = vec![
            parse_load_line("T:1\tA, B, C", 1).unwrap(),
            parse_load_line("T:2\tD", 2).unwrap(),
        ];
        let start = BulkKeys { next_cluster_key: 1000, next_member_key: 5000 };

        let next = write_bulk_files(&records, start, out).unwrap();
        assert_eq!(next, BulkKeys { next_cluster_key: 1002, next_member_key: 5004 });

        let clusters = fs::read_to_string(dir.path().join(CLUSTER_BCP)).unwrap();
        assert_eq!(clusters, "1000\tT:1\t\n1001\tT:2\t\n");

        let members = fs::read_to_string(dir.path().join(MEMBER_BCP)).unwrap();
        let lines: Vec<&str> = members.lines().collect();
        assert_eq!(lines[0], "5000\t1000\tA\t1");
        assert_eq!(lines[2], "5002\t1000\tC\t3");
        assert_eq!(lines[3], "5003\t1001\tD\t1");
    }
}
