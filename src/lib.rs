//! Core library functions for the homology cluster loader

pub mod config;
pub mod error;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod hybrid;
pub mod storage;

pub use anyhow::{Result, anyhow};
pub use cluster::detection::cluster;
pub use cluster::{Cluster, ClusterRegistry, Pair};
pub use config::Config;
pub use error::{AmbiguousResolutionWarning, HomologyError};
pub use hybrid::{reconcile_hybrid, reconcile_hybrid_with, HybridDecision, SourceCluster, SourceRole};
