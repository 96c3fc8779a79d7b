//! Configuration management for the homology cluster loader

/// Run configuration shared by the clustering, reconciliation and output stages
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix for generated cluster IDs (`{prefix}:{n}`)
    pub id_prefix: String,

    /// Display name of the primary source (kept on rule 3b and rule 1)
    pub primary_source: String,

    /// Display name of the secondary source (kept on rule 4)
    pub secondary_source: String,

    /// Organism tags in output order; unlisted organisms sort after these
    pub organism_priority: Vec<String>,

    /// Literal that marks a pair with no partner
    pub no_partner_sentinel: String,

    /// First key handed out to bulk-load cluster rows
    pub next_cluster_key: u64,

    /// First key handed out to bulk-load member rows
    pub next_member_key: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            id_prefix: "HGNC".to_string(),
            primary_source: "HomoloGene".to_string(),
            secondary_source: "HGNC".to_string(),
            organism_priority: vec!["human".to_string(), "mouse".to_string()],
            no_partner_sentinel: "None".to_string(),
            next_cluster_key: 1000,
            next_member_key: 1000,
        }
    }
}

impl Config {
    /// Rank of an organism tag in output order
    pub fn organism_rank(&self, organism: &str) -> usize {
        self.organism_priority
            .iter()
            .position(|o| o.eq_ignore_ascii_case(organism))
            .unwrap_or(self.organism_priority.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organism_rank_orders_unknown_last() {
        let config = Config::default();
        assert_eq!(config.organism_rank("human"), 0);
        assert_eq!(config.organism_rank("Mouse"), 1);
        assert_eq!(config.organism_rank("zebrafish"), 2);
        assert_eq!(config.organism_rank("frog"), 2);
    }

    #[test]
    fn test_custom_priority_ranks_listed_organisms_first() {
        let config = Config {
            organism_priority: vec!["zebrafish".to_string(), "human".to_string()],
            ..Config::default()
        };
        assert_eq!(config.organism_rank("zebrafish"), 0);
        assert_eq!(config.organism_rank("human"), 1);
        assert_eq!(config.organism_rank("mouse"), 2);
    }
}
