//! Results persistence module

pub mod bulk;

use anyhow::Result;
use crate::cluster::metrics::calculate_registry_stats;
use crate::cluster::ClusterRegistry;
use crate::config::Config;
use crate::data::preprocessing::{SkipReason, SkippedRow};
use crate::error::AmbiguousResolutionWarning;
use crate::hybrid::{Conflict, HybridDecision, SourceCluster, SourceRole};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use serde_json::{json, to_string_pretty};
use itertools::Itertools;

pub const LOAD_FILE: &str = "load_ready.txt";
pub const QC_REPORT: &str = "qc.rpt";
pub const SUMMARY_FILE: &str = "summary.json";
pub const COMPONENT_REPORT: &str = "conn_comp.rpt";
pub const HYBRID_REPORT: &str = "hybrid.rpt";

/// Save single-source clustering results to the specified directory
pub fn save_cluster_results(
    registry: &ClusterRegistry,
    skipped: &[SkippedRow],
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} clusters to {}", registry.len(), output_dir);

    fs::create_dir_all(output_dir)?;

    write_file(output_dir, LOAD_FILE, &format_cluster_load(registry))?;
    write_file(output_dir, QC_REPORT, &format_skipped_report(skipped))?;

    let summary = json!({
        "cluster_stats": calculate_registry_stats(registry),
        "skipped_rows": skipped.len(),
    });
    write_file(output_dir, SUMMARY_FILE, &to_string_pretty(&summary)?)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save hybrid reconciliation results to the specified directory
pub fn save_hybrid_results(
    decisions: &[HybridDecision],
    warnings: &[AmbiguousResolutionWarning],
    config: &Config,
    output_dir: &str,
) -> Result<()> {
    log::info!("Saving {} component decisions to {}", decisions.len(), output_dir);

    fs::create_dir_all(output_dir)?;

    write_file(output_dir, LOAD_FILE, &format_hybrid_load(decisions, config))?;
    write_file(output_dir, COMPONENT_REPORT, &format_component_report(decisions, config))?;
    write_file(output_dir, HYBRID_REPORT, &format_hybrid_report(decisions, config))?;
    write_file(output_dir, QC_REPORT, &format_warning_report(warnings))?;

    let mut rule_counts: BTreeMap<String, usize> = BTreeMap::new();
    for decision in decisions {
        *rule_counts.entry(decision.rule.id().to_string()).or_insert(0) += 1;
    }

    let summary = json!({
        "component_count": decisions.len(),
        "source_cluster_count": decisions.iter().map(|d| d.clusters.len()).sum::<usize>(),
        "retained_cluster_count": decisions.iter().map(|d| d.retained.len()).sum::<usize>(),
        "conflict_components": decisions.iter().filter(|d| d.conflict == Conflict::Conflict).count(),
        "rule_counts": rule_counts,
        "ambiguous_identifiers": warnings.len(),
    });
    write_file(output_dir, SUMMARY_FILE, &to_string_pretty(&summary)?)?;

    log::info!("Results saved successfully");

    Ok(())
}

fn write_file(output_dir: &str, name: &str, contents: &str) -> Result<()> {
    let path = Path::new(output_dir).join(name);
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

/// `clusterId<TAB>member, member, ...` per generated cluster
pub fn format_cluster_load(registry: &ClusterRegistry) -> String {
    registry
        .iter()
        .map(|c| format!("{}\t{}\n", c.id, c.members.join(", ")))
        .collect()
}

/// `clusterKey<TAB>member, ...<TAB>secondary source:<name>` per retained cluster
pub fn format_hybrid_load(decisions: &[HybridDecision], config: &Config) -> String {
    decisions
        .iter()
        .flat_map(|d| {
            let source = d.hybrid_source.display(config);
            d.retained.iter().map(move |c| {
                format!(
                    "{}\t{}\tsecondary source:{}\n",
                    c.cluster_key,
                    c.members.iter().map(|m| m.identifier.as_str()).join(", "),
                    source
                )
            })
        })
        .collect()
}

fn describe_cluster(cluster: &SourceCluster, config: &Config) -> String {
    let members: String = cluster
        .members
        .iter()
        .map(|m| format!("{}|{}\n", m.identifier, m.organism))
        .collect();
    format!(
        "cKey: {}\nsource: {}\nmembers:\n{}",
        cluster.cluster_key,
        cluster.source.name(config),
        members
    )
}

/// Every component with all of its source clusters
pub fn format_component_report(decisions: &[HybridDecision], config: &Config) -> String {
    let mut out = String::new();
    for decision in decisions {
        out.push_str(&format!("comp{}:\n", decision.component));
        for cluster in &decision.clusters {
            out.push_str(&describe_cluster(cluster, config));
            out.push('\n');
        }
    }
    out
}

fn member_list(cluster: &SourceCluster) -> String {
    format!("({})", cluster.members.iter().map(|m| m.identifier.as_str()).join(", "))
}

fn member_lists<'a>(clusters: impl Iterator<Item = &'a SourceCluster>) -> String {
    clusters.map(member_list).join(", ")
}

/// One `##`-delimited line per component:
/// `compN##all##secondary##primary##hybrid##hybridSource##conflict##rule`
pub fn format_hybrid_report(decisions: &[HybridDecision], config: &Config) -> String {
    decisions
        .iter()
        .map(|d| {
            let by_source = |role: SourceRole| member_lists(d.clusters.iter().filter(move |c| c.source == role));
            format!(
                "comp{}##{}##{}##{}##{}##{}##{}##{}\n",
                d.component,
                member_lists(d.clusters.iter()),
                by_source(SourceRole::Secondary),
                by_source(SourceRole::Primary),
                member_lists(d.retained.iter()),
                d.hybrid_source.display(config),
                d.conflict,
                d.rule
            )
        })
        .collect()
}

/// QC listing of input rows that were not clustered
pub fn format_skipped_report(skipped: &[SkippedRow]) -> String {
    let mut out = String::from("Rows skipped from clustering\n");
    out.push_str("Row\tReason\tPartner\n");
    out.push_str("--------------------------------------------------\n");
    for row in skipped {
        let reason = match row.reason {
            SkipReason::BothBlank => "both identifiers blank",
            SkipReason::MissingFirstId => "first identifier blank",
        };
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            row.row,
            reason,
            row.id_two.as_deref().unwrap_or("")
        ));
    }
    out
}

/// QC listing of identifiers claimed by several clusters of one source
pub fn format_warning_report(warnings: &[AmbiguousResolutionWarning]) -> String {
    let mut out = String::from("Identifiers in more than one cluster of a source\n");
    out.push_str("Source\tIdentifier\tClusters\n");
    out.push_str("--------------------------------------------------\n");
    for warning in warnings {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            warning.source,
            warning.identifier,
            warning.cluster_keys.join(", ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{detection::cluster, Pair};
    use crate::hybrid::reconcile_hybrid;

    fn decisions() -> Vec<HybridDecision> {
        let primary = vec![SourceCluster::new("10", SourceRole::Primary)
            .with_member("MGI:1", "mouse")
            .with_member("HGNC:1", "human")];
        let secondary = vec![
            SourceCluster::new("20", SourceRole::Secondary)
                .with_member("MGI:1", "mouse")
                .with_member("HGNC:2", "human"),
            SourceCluster::new("21", SourceRole::Secondary).with_member("HGNC:9", "human"),
        ];
        reconcile_hybrid(&primary, &secondary).unwrap()
    }

    #[test]
    fn test_cluster_load_lines() {
        let pairs = vec![Pair::new("A", "B"), Pair::new("B", "C"), Pair::unpartnered("D")];
        let registry = cluster(&pairs, "T").unwrap();
        assert_eq!(format_cluster_load(&registry), "T:1\tA, B, C\nT:2\tD\n");
    }

    #[test]
    fn test_hybrid_load_lines() {
        let text = format_hybrid_load(&decisions(), &Config::default());
        assert_eq!(
            text,
            "20\tHGNC:2, MGI:1\tsecondary source:HGNC\n21\tHGNC:9\tsecondary source:HGNC\n"
        );
    }

    #[test]
    fn test_hybrid_report_line() {
        let text = format_hybrid_report(&decisions(), &Config::default());
        let first = text.lines().next().unwrap();
        assert_eq!(
            first,
            "comp1##(MGI:1, HGNC:1), (MGI:1, HGNC:2)##(MGI:1, HGNC:2)##(MGI:1, HGNC:1)##(HGNC:2, MGI:1)##HGNC##conflict##4"
        );
    }

    #[test]
    fn test_component_report_lists_every_cluster() {
        let text = format_component_report(&decisions(), &Config::default());
        assert!(text.starts_with("comp1:\ncKey: 10\nsource: HomoloGene\nmembers:\nMGI:1|mouse\n"));
        assert!(text.contains("comp2:\ncKey: 21\nsource: HGNC\n"));
    }

    #[test]
    fn test_save_hybrid_results_writes_summary() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        save_hybrid_results(&decisions(), &[], &Config::default(), out).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(summary["component_count"], 2);
        assert_eq!(summary["rule_counts"]["4"], 1);
        assert_eq!(summary["rule_counts"]["2"], 1);
        assert_eq!(summary["conflict_components"], 1);
        assert!(dir.path().join(HYBRID_REPORT).exists());
    }
}
