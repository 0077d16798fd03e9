//! Configuration errors
//!
//! Everything here is detected at load time, before a state becomes active.
//! The simulation itself has no recoverable failure modes.

use crate::sim::GroupId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("level record {index}: unknown entity type '{kind}'")]
    UnknownEntityType { index: usize, kind: String },
    #[error("level record {index}: entity type '{kind}' has malformed hit-region '{region}'")]
    MalformedHitRegion {
        index: usize,
        kind: String,
        region: &'static str,
    },
    #[error("level record {index}: entity type '{kind}' cannot be queued into group {group:?}")]
    UnspawnableGroup {
        index: usize,
        kind: String,
        group: GroupId,
    },
    #[error("group order must name every group exactly once: {0:?}")]
    InvalidGroupOrder(Vec<GroupId>),
    #[error("invalid level data: {0}")]
    InvalidLevel(#[source] serde_json::Error),
    #[error("invalid settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),
    #[error("campaign has no levels")]
    NoLevels,
}
