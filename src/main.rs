use anyhow::Result;
use clap::{Parser, Subcommand};

use homology_cluster::config::Config;
use homology_cluster::hybrid::loader::{find_ambiguous_members, load_source_clusters};
use homology_cluster::hybrid::SourceRole;
use homology_cluster::storage::bulk::{self, BulkKeys};
use homology_cluster::{cluster, data, reconcile_hybrid_with, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "homology-cluster",
    about = "Build homology clusters from identifier pairs and reconcile two sources' clusters"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0", global = true)]
    threads: usize,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster a table of identifier pairs
    Cluster {
        /// Pair table (`id_one`, `id_two`), tab-delimited or Parquet
        #[clap(long, env = "INPUT_FILE")]
        input: String,

        /// Output directory for results
        #[clap(long, env = "HOMOLOGY_OUTPUT_DIR", default_value = "cluster_results")]
        output_dir: String,

        /// Prefix for generated cluster IDs
        #[clap(long, env = "CLUSTER_ID_PREFIX", default_value = "HGNC")]
        id_prefix: String,

        /// Literal meaning "no partner" in the `id_two` column
        #[clap(long, default_value = "None")]
        no_partner: String,
    },

    /// Reconcile the clusters of a primary and a secondary source
    Hybrid {
        /// Primary source rows (`cluster_key`, `identifier`, `organism`)
        #[clap(long, env = "PRIMARY_INPUT_FILE")]
        primary: String,

        /// Secondary source rows (`cluster_key`, `identifier`, `organism`)
        #[clap(long, env = "SECONDARY_INPUT_FILE")]
        secondary: String,

        /// Output directory for results
        #[clap(long, env = "HOMOLOGY_OUTPUT_DIR", default_value = "hybrid_results")]
        output_dir: String,

        /// Display name of the primary source
        #[clap(long, default_value = "HomoloGene")]
        primary_name: String,

        /// Display name of the secondary source
        #[clap(long, default_value = "HGNC")]
        secondary_name: String,

        /// Organism order for cluster members in output
        #[clap(long, value_delimiter = ',', default_value = "human,mouse")]
        organism_priority: Vec<String>,
    },

    /// Turn a load-ready file into cluster and member bulk-load files
    Bulk {
        /// Load-ready file (`clusterId<TAB>members[<TAB>properties]`)
        #[clap(long, env = "INPUT_FILE_LOAD")]
        input: String,

        /// Output directory for the bulk-load files
        #[clap(long, env = "HOMOLOGY_OUTPUT_DIR", default_value = "bulk_results")]
        output_dir: String,

        /// First cluster key to assign
        #[clap(long, default_value = "1000")]
        next_cluster_key: u64,

        /// First member key to assign
        #[clap(long, default_value = "1000")]
        next_member_key: u64,
    },

    /// Check that every line of a delimited file has enough columns
    CheckColumns {
        input: String,

        columns: usize,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    match args.command {
        Command::Cluster { input, output_dir, id_prefix, no_partner } => {
            let config = Config {
                id_prefix,
                no_partner_sentinel: no_partner,
                ..Config::default()
            };
            run_cluster(&config, &input, &output_dir)
        }
        Command::Hybrid {
            primary,
            secondary,
            output_dir,
            primary_name,
            secondary_name,
            organism_priority,
        } => {
            let config = Config {
                primary_source: primary_name,
                secondary_source: secondary_name,
                organism_priority,
                ..Config::default()
            };
            run_hybrid(&config, &primary, &secondary, &output_dir)
        }
        Command::Bulk { input, output_dir, next_cluster_key, next_member_key } => {
            let config = Config {
                next_cluster_key,
                next_member_key,
                ..Config::default()
            };
            run_bulk(&config, &input, &output_dir)
        }
        Command::CheckColumns { input, columns } => {
            let issues = data::delimited::check_columns(&input, columns)?;
            if !issues.is_empty() {
                anyhow::bail!("{} line(s) in {} have fewer than {} columns", issues.len(), input, columns);
            }
            log::info!("All lines in {} have at least {} columns", input, columns);
            Ok(())
        }
    }
}

fn run_cluster(config: &Config, input: &str, output_dir: &str) -> Result<()> {
    log::info!("Starting pair clustering");
    log::info!("Input: {}", input);
    log::info!("Output: {}", output_dir);

    // 1. Load pairs
    let table = data::read_table(input)?;
    let load = data::preprocessing::pairs_from_frame(&table, &config.no_partner_sentinel)?;

    // 2. Find clusters
    let registry = cluster(&load.pairs, &config.id_prefix)?;

    // 3. Save results
    storage::save_cluster_results(&registry, &load.skipped, output_dir)?;

    log::info!("Clustering complete. Results saved to {}", output_dir);

    Ok(())
}

fn run_hybrid(config: &Config, primary: &str, secondary: &str, output_dir: &str) -> Result<()> {
    log::info!("Starting hybrid reconciliation");
    log::info!("Primary ({}): {}", config.primary_source, primary);
    log::info!("Secondary ({}): {}", config.secondary_source, secondary);

    // 1. Load both sources
    let primary_rows = data::preprocessing::source_rows_from_frame(&data::read_table(primary)?)?;
    let secondary_rows = data::preprocessing::source_rows_from_frame(&data::read_table(secondary)?)?;

    let primary_clusters = load_source_clusters(&primary_rows, SourceRole::Primary)?;
    let secondary_clusters = load_source_clusters(&secondary_rows, SourceRole::Secondary)?;

    let mut warnings = find_ambiguous_members(&primary_clusters, &config.primary_source);
    warnings.extend(find_ambiguous_members(&secondary_clusters, &config.secondary_source));

    // 2. Find components and apply the rules
    let decisions = reconcile_hybrid_with(&primary_clusters, &secondary_clusters, config)?;

    // 3. Save results
    storage::save_hybrid_results(&decisions, &warnings, config, output_dir)?;

    log::info!("Reconciliation complete. Results saved to {}", output_dir);

    Ok(())
}

fn run_bulk(config: &Config, input: &str, output_dir: &str) -> Result<()> {
    let records = bulk::read_load_file(input)?;
    let start = BulkKeys {
        next_cluster_key: config.next_cluster_key,
        next_member_key: config.next_member_key,
    };
    let next = bulk::write_bulk_files(&records, start, output_dir)?;

    log::info!(
        "Bulk files written to {}; next cluster key {}, next member key {}",
        output_dir,
        next.next_cluster_key,
        next.next_member_key
    );

    Ok(())
}
