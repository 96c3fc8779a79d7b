//! Rule engine choosing the representative clusters of one component

use crate::config::Config;
use crate::hybrid::{Conflict, HybridDecision, HybridSource, Rule, SourceCluster, SourceRole};

/// Apply the rules, first match wins:
///
/// * rule 2: a lone cluster is kept as is
/// * rule 3b: no multi-organism cluster, keep the primary clusters
/// * rule 3: only one source has multi-organism clusters, keep that source (conflict)
/// * rule 1: one multi-organism cluster per source with identical members, keep primary as "both"
/// * rule 4: otherwise keep the secondary clusters (conflict)
pub fn decide(component: usize, clusters: Vec<SourceCluster>, config: &Config) -> HybridDecision {
    let (retained, hybrid_source, conflict, rule) = choose(&clusters);

    log::debug!(
        "Component {}: {} clusters, rule {}, keeping {}",
        component,
        clusters.len(),
        rule,
        retained.len()
    );

    let retained = retained
        .into_iter()
        .map(|c| c.ordered_by_organism(config))
        .collect();

    HybridDecision {
        component,
        clusters,
        retained,
        hybrid_source,
        conflict,
        rule,
    }
}

fn choose(clusters: &[SourceCluster]) -> (Vec<&SourceCluster>, HybridSource, Conflict, Rule) {
    if let [only] = clusters {
        return (
            vec![only],
            HybridSource::Source(only.source),
            Conflict::None,
            Rule::Singleton,
        );
    }

    let from = |role| of_source(clusters, role, false);
    let primary_multi = of_source(clusters, SourceRole::Primary, true);
    let secondary_multi = of_source(clusters, SourceRole::Secondary, true);

    match (primary_multi.is_empty(), secondary_multi.is_empty()) {
        (true, true) => (
            from(SourceRole::Primary),
            HybridSource::Source(SourceRole::Primary),
            Conflict::None,
            Rule::SingleOrganism,
        ),
        (false, true) => (
            from(SourceRole::Primary),
            HybridSource::Source(SourceRole::Primary),
            Conflict::Conflict,
            Rule::Asymmetric,
        ),
        (true, false) => (
            from(SourceRole::Secondary),
            HybridSource::Source(SourceRole::Secondary),
            Conflict::Conflict,
            Rule::Asymmetric,
        ),
        (false, false) => match (primary_multi.as_slice(), secondary_multi.as_slice()) {
            ([p], [s]) if p.identifier_set() == s.identifier_set() => (
                vec![*p],
                HybridSource::Both,
                Conflict::None,
                Rule::IdenticalPair,
            ),
            _ => (
                from(SourceRole::Secondary),
                HybridSource::Source(SourceRole::Secondary),
                Conflict::Conflict,
                Rule::Disagreement,
            ),
        },
    }
}

fn of_source(clusters: &[SourceCluster], role: SourceRole, multi_only: bool) -> Vec<&SourceCluster> {
    clusters
        .iter()
        .filter(|c| c.source == role && (!multi_only || c.is_multi_organism()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(key: &str, role: SourceRole, members: &[(&str, &str)]) -> SourceCluster {
        members
            .iter()
            .fold(SourceCluster::new(key, role), |c, (id, org)| c.with_member(*id, *org))
    }

    fn run(clusters: Vec<SourceCluster>) -> HybridDecision {
        decide(1, clusters, &Config::default())
    }

    fn kept(decision: &HybridDecision) -> Vec<&str> {
        decision.retained.iter().map(|c| c.cluster_key.as_str()).collect()
    }

    #[test]
    fn test_singleton_wins_even_when_multi_organism() {
        let d = run(vec![cluster(
            "s1",
            SourceRole::Secondary,
            &[("MGI:1", "mouse"), ("HGNC:1", "human")],
        )]);
        assert_eq!(d.rule, Rule::Singleton);
        assert_eq!(d.hybrid_source, HybridSource::Source(SourceRole::Secondary));
        assert_eq!(d.conflict, Conflict::None);
        assert_eq!(kept(&d), vec!["s1"]);
    }

    #[test]
    fn test_all_single_organism_keeps_primary() {
        let d = run(vec![
            cluster("p1", SourceRole::Primary, &[("g1", "mouse"), ("g2", "mouse")]),
            cluster("p2", SourceRole::Primary, &[("g3", "mouse")]),
            cluster("s1", SourceRole::Secondary, &[("g1", "mouse"), ("g3", "mouse")]),
        ]);
        assert_eq!(d.rule, Rule::SingleOrganism);
        assert_eq!(d.conflict, Conflict::None);
        assert_eq!(d.hybrid_source, HybridSource::Source(SourceRole::Primary));
        assert_eq!(kept(&d), vec!["p1", "p2"]);
    }

    #[test]
    fn test_only_secondary_multi_keeps_secondary_in_conflict() {
        let d = run(vec![
            cluster("p1", SourceRole::Primary, &[("g1", "mouse")]),
            cluster("s1", SourceRole::Secondary, &[("g1", "mouse"), ("h1", "human")]),
            cluster("s2", SourceRole::Secondary, &[("g5", "mouse")]),
        ]);
        assert_eq!(d.rule, Rule::Asymmetric);
        assert_eq!(d.conflict, Conflict::Conflict);
        assert_eq!(d.hybrid_source, HybridSource::Source(SourceRole::Secondary));
        assert_eq!(kept(&d), vec!["s1", "s2"]);
    }

    #[test]
    fn test_only_primary_multi_keeps_primary_in_conflict() {
        let d = run(vec![
            cluster("p1", SourceRole::Primary, &[("g1", "mouse"), ("h1", "human")]),
            cluster("s1", SourceRole::Secondary, &[("g1", "mouse")]),
        ]);
        assert_eq!(d.rule, Rule::Asymmetric);
        assert_eq!(d.hybrid_source, HybridSource::Source(SourceRole::Primary));
        assert_eq!(kept(&d), vec!["p1"]);
    }

    #[test]
    fn test_identical_pair_then_one_member_changed() {
        let same = run(vec![
            cluster("p1", SourceRole::Primary, &[("g1", "mouse"), ("h1", "human")]),
            cluster("s1", SourceRole::Secondary, &[("h1", "human"), ("g1", "mouse")]),
        ]);
        assert_eq!(same.rule, Rule::IdenticalPair);
        assert_eq!(same.hybrid_source, HybridSource::Both);
        assert_eq!(same.conflict, Conflict::None);
        assert_eq!(kept(&same), vec!["p1"]);

        let changed = run(vec![
            cluster("p1", SourceRole::Primary, &[("g1", "mouse"), ("h1", "human")]),
            cluster("s1", SourceRole::Secondary, &[("g1", "mouse"), ("h2", "human")]),
        ]);
        assert_eq!(changed.rule, Rule::Disagreement);
        assert_eq!(changed.conflict, Conflict::Conflict);
        assert_eq!(changed.hybrid_source, HybridSource::Source(SourceRole::Secondary));
        assert_eq!(kept(&changed), vec!["s1"]);
    }

    #[test]
    fn test_subset_is_not_identical() {
        let d = run(vec![
            cluster("p1", SourceRole::Primary, &[("g1", "mouse"), ("h1", "human")]),
            cluster("s1", SourceRole::Secondary, &[("g1", "mouse"), ("h1", "human"), ("h2", "human")]),
        ]);
        assert_eq!(d.rule, Rule::Disagreement);
    }

    #[test]
    fn test_several_multi_clusters_per_source_keep_all_secondary() {
        let d = run(vec![
            cluster("p1", SourceRole::Primary, &[("g1", "mouse"), ("h1", "human")]),
            cluster("p2", SourceRole::Primary, &[("g2", "mouse"), ("h2", "human")]),
            cluster("s1", SourceRole::Secondary, &[("g1", "mouse"), ("h2", "human")]),
            cluster("s2", SourceRole::Secondary, &[("g2", "mouse"), ("h1", "human")]),
            cluster("s3", SourceRole::Secondary, &[("g9", "mouse")]),
        ]);
        assert_eq!(d.rule, Rule::Disagreement);
        assert_eq!(kept(&d), vec!["s1", "s2", "s3"]);
        assert!(d.retained.iter().all(|c| c.source == SourceRole::Secondary));
    }

    #[test]
    fn test_retained_members_put_human_first() {
        let d = run(vec![
            cluster("p1", SourceRole::Primary, &[("g1", "mouse"), ("g2", "mouse"), ("h1", "human")]),
            cluster("s1", SourceRole::Secondary, &[("g1", "mouse"), ("h1", "human")]),
        ]);
        let ids: Vec<&str> = d.retained[0].members.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(ids, vec!["h1", "g1"]);
        // component listing keeps source order
        assert_eq!(d.clusters[0].members[0].identifier, "g1");
    }
}
