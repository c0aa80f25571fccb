//! Synthetic is a small toolkit for computing structural fingerprints of directed, optionally
//! timestamped, networks and comparing them.
//!
//! # Basic usage
//!
//! The library is centered around the [`Net`](graph::Net) structure, a directed graph built node
//! by node and edge by edge. Once constructed, the inbound and outbound ranks of its nodes and its
//! triad census can be computed, and summarised into a [`Fingerprint`](fingerprint::Fingerprint)
//! which can be compared against other graphs.
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use synthetic::{
//!     emd::MinCostFlow,
//!     fingerprint::{compare_to_null_model, Fingerprint, FingerprintConfig},
//!     graph::Net,
//!     triad::TriadType,
//! };
//!
//! // Construct the graph instance.
//! let mut net = Net::new();
//! let (a, b, c) = (net.add_node(0), net.add_node(0), net.add_node(0));
//!
//! // Insert some edges, a timestamp of 0 means the edge has none.
//! net.add_edge(a, b, 0);
//! net.add_edge(b, c, 0);
//! net.add_edge(c, a, 0);
//!
//! // Compute some metrics on that state of the graph.
//! let config = FingerprintConfig::default();
//! let fingerprint = Fingerprint::compute(&mut net, &config).unwrap();
//! assert!(fingerprint.triads[TriadType::T030C] > 0);
//!
//! // Average distance to a few random graphs with the same degrees.
//! let config = FingerprintConfig {
//!     null_samples: 3,
//!     ..config
//! };
//! let mut rng = StdRng::seed_from_u64(0);
//! let distances =
//!     compare_to_null_model(&mut net, &config, &MinCostFlow::default(), &mut rng).unwrap();
//! println!("{distances:?}");
//! ```

/// Builds a graph of `$nodes` type-0 nodes and the listed `origin => target` edges, given as
/// creation positions. Returns the graph and its node handles in creation order.
#[cfg(test)]
macro_rules! net {
    ($nodes:expr; $($origin:expr => $target:expr),* $(,)?) => {{
        let mut net = $crate::graph::Net::new();
        let nodes: Vec<$crate::node::NodeIndex> = (0..$nodes).map(|_| net.add_node(0)).collect();
        $( net.add_edge(nodes[$origin], nodes[$target], 0); )*
        (net, nodes)
    }};
}

pub mod centrality;
pub mod edge;
pub mod emd;
pub mod error;
pub mod fingerprint;
mod generator;
pub mod graph;
pub mod histogram;
pub mod node;
pub mod triad;

pub use error::{Error, Result};
