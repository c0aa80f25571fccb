//! Error types for graph construction, comparison and reporting.

use thiserror::Error;

use crate::node::NodeId;

/// Errors surfaced by the crate. Duplicate edges aren't errors, see
/// [`Net::add_edge`](crate::graph::Net::add_edge).
#[derive(Error, Debug)]
pub enum Error {
    /// A node with this id already exists in the graph.
    #[error("node id {0} is already in use")]
    DuplicateNodeId(NodeId),

    /// Two histograms with different resolutions were compared bin by bin.
    #[error("histogram bin mismatch: {left} vs {right}")]
    BinMismatch { left: usize, right: usize },

    /// Two histograms covering different value ranges were compared bin by bin.
    #[error("histogram range mismatch")]
    RangeMismatch,

    /// A histogram needs at least one bin per axis.
    #[error("bin number must be greater than zero")]
    InvalidBinCount,

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operation needs the output of a centrality run on the current graph.
    #[error("ranks haven't been computed for the current state of the graph")]
    RanksNotComputed,

    /// The transport solver ran out of augmenting paths before moving all the mass.
    #[error("transport stopped after moving {moved} of {target}")]
    TransportIncomplete { moved: f64, target: f64 },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;
