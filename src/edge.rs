//! A module for working with edges.

use crate::node::NodeIndex;

/// A handle to an edge stored in a [`Net`](crate::graph::Net).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position of the edge in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge from an `origin` node to a `target` node. Unlike an undirected pair, `a -> b`
/// and `b -> a` are distinct edges.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    origin: NodeIndex,
    target: NodeIndex,
    /// Zero means the edge carries no timestamp.
    timestamp: u64,
}

impl Edge {
    pub(crate) fn new(origin: NodeIndex, target: NodeIndex, timestamp: u64) -> Self {
        Self {
            origin,
            target,
            timestamp,
        }
    }

    /// Returns the node the edge leaves from.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let mut net = Net::new();
    /// let (a, b) = (net.add_node(0), net.add_node(0));
    /// net.add_edge(a, b, 0);
    ///
    /// assert_eq!(net.edges()[0].origin(), a);
    /// ```
    pub fn origin(&self) -> NodeIndex {
        self.origin
    }

    /// Returns the node the edge points to.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let mut net = Net::new();
    /// let (a, b) = (net.add_node(0), net.add_node(0));
    /// net.add_edge(a, b, 0);
    ///
    /// assert_eq!(net.edges()[0].target(), b);
    /// ```
    pub fn target(&self) -> NodeIndex {
        self.target
    }

    /// Returns the timestamp of the edge, if it has one.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let mut net = Net::new();
    /// let (a, b) = (net.add_node(0), net.add_node(0));
    /// net.add_edge(a, b, 0);
    /// net.add_edge(b, a, 1_300_000_000);
    ///
    /// assert_eq!(net.edges()[0].timestamp(), None);
    /// assert_eq!(net.edges()[1].timestamp(), Some(1_300_000_000));
    /// ```
    pub fn timestamp(&self) -> Option<u64> {
        (self.timestamp > 0).then_some(self.timestamp)
    }

    /// Returns whether the edge goes from `origin` to `target`.
    pub fn connects(&self, origin: NodeIndex, target: NodeIndex) -> bool {
        self.origin == origin && self.target == target
    }

    /// Returns whether the edge has the given node at either end.
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.origin == node || self.target == node
    }
}
