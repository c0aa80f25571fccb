//! A module for working with nodes.

use std::fmt;

use crate::edge::EdgeIndex;

/// The identity of a node, unique within a [`Net`](crate::graph::Net).
pub type NodeId = u64;

/// A handle to a node stored in a [`Net`](crate::graph::Net).
///
/// Handles are only meaningful for the graph that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position of the node in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A graph node: its identity, its adjacency and the ranks written by the last centrality run.
#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    node_type: u32,
    /// Incoming edges.
    origins: Vec<EdgeIndex>,
    /// Outgoing edges.
    targets: Vec<EdgeIndex>,
    pub(crate) pr_in: f64,
    pub(crate) pr_out: f64,
    pub(crate) pr_in_last: f64,
    pub(crate) pr_out_last: f64,
}

impl Node {
    pub(crate) fn new(id: NodeId, node_type: u32) -> Self {
        Self {
            id,
            node_type,
            origins: Vec::new(),
            targets: Vec::new(),
            pr_in: 0.0,
            pr_out: 0.0,
            pr_in_last: 0.0,
            pr_out_last: 0.0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the type tag the node was created with. The tag isn't interpreted by the crate.
    pub fn node_type(&self) -> u32 {
        self.node_type
    }

    /// Returns the incoming edges of the node.
    pub fn origins(&self) -> &[EdgeIndex] {
        &self.origins
    }

    /// Returns the outgoing edges of the node.
    pub fn targets(&self) -> &[EdgeIndex] {
        &self.targets
    }

    pub fn in_degree(&self) -> usize {
        self.origins.len()
    }

    pub fn out_degree(&self) -> usize {
        self.targets.len()
    }

    /// Returns the total degree, incoming plus outgoing.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let mut net = Net::new();
    /// let (a, b) = (net.add_node(0), net.add_node(0));
    /// net.add_edge(a, b, 0);
    /// net.add_edge(b, a, 0);
    ///
    /// assert_eq!(net.node(a).degree(), 2);
    /// ```
    pub fn degree(&self) -> usize {
        self.in_degree() + self.out_degree()
    }

    /// Returns the log-scaled, baseline-relative inbound rank from the last centrality run.
    pub fn pr_in(&self) -> f64 {
        self.pr_in
    }

    /// Returns the log-scaled, baseline-relative outbound rank from the last centrality run.
    pub fn pr_out(&self) -> f64 {
        self.pr_out
    }

    //
    // Private
    //

    pub(crate) fn push_origin(&mut self, edge: EdgeIndex) {
        self.origins.push(edge);
    }

    pub(crate) fn push_target(&mut self, edge: EdgeIndex) {
        self.targets.push(edge);
    }
}
