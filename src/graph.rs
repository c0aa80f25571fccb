//! A module for working with directed graphs.

use std::{collections::HashMap, fmt, fs::File, io, path::Path};

use rand::Rng;

use crate::{
    centrality::RankBounds,
    edge::{Edge, EdgeIndex},
    error::{Error, Result},
    node::{Node, NodeId, NodeIndex},
};

/// A directed graph, optionally timestamped.
///
/// Nodes and edges live in dense arenas and are addressed with [`NodeIndex`] and [`EdgeIndex`]
/// handles. Nodes are traversed in reverse creation order, which is the order used by the degree
/// sequences and the reports.
#[derive(Clone, Debug, Default)]
pub struct Net {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    /// Maps node ids to their position in the arena.
    ids: HashMap<NodeId, NodeIndex>,
    /// The next id handed out by [`Net::add_node`].
    next_id: NodeId,
    /// The observed timestamp range, `None` until a timestamped edge is inserted.
    timestamps: Option<(u64, u64)>,
    /// Rank bounds from the last centrality run, cleared on every mutation.
    pub(crate) rank_bounds: Option<RankBounds>,
}

impl Net {
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let net = Net::new();
    /// assert_eq!(net.node_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with the next free id.
    pub fn add_node(&mut self, node_type: u32) -> NodeIndex {
        // Ids supplied explicitly may have claimed the counter's value already.
        while self.ids.contains_key(&self.next_id) {
            self.next_id += 1;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.insert_node(id, node_type)
    }

    /// Adds a node with an explicit id. Ids at or above the internal counter advance it, so later
    /// calls to [`Net::add_node`] never collide with them.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let mut net = Net::new();
    /// let a = net.add_node_with_id(10, 0).unwrap();
    /// let b = net.add_node(0);
    ///
    /// assert_eq!(net.node(a).id(), 10);
    /// assert_eq!(net.node(b).id(), 11);
    /// assert!(net.add_node_with_id(10, 0).is_err());
    /// ```
    pub fn add_node_with_id(&mut self, id: NodeId, node_type: u32) -> Result<NodeIndex> {
        if self.ids.contains_key(&id) {
            return Err(Error::DuplicateNodeId(id));
        }

        if id >= self.next_id {
            self.next_id = id + 1;
        }

        Ok(self.insert_node(id, node_type))
    }

    /// Inserts a directed edge, returns `false` if the same `origin -> target` edge already
    /// exists. A timestamp of `0` means the edge has none.
    ///
    /// # Panics
    ///
    /// Panics if either handle wasn't issued by this graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let mut net = Net::new();
    /// let (a, b) = (net.add_node(0), net.add_node(0));
    ///
    /// assert!(net.add_edge(a, b, 0));
    /// assert!(!net.add_edge(a, b, 0));
    /// assert!(net.add_edge(b, a, 0));
    /// assert_eq!(net.edge_count(), 2);
    /// ```
    pub fn add_edge(&mut self, origin: NodeIndex, target: NodeIndex, timestamp: u64) -> bool {
        if self.edge_exists(origin, target) {
            return false;
        }

        let index = EdgeIndex::new(self.edges.len());
        self.edges.push(Edge::new(origin, target, timestamp));
        self.nodes[origin.index()].push_target(index);
        self.nodes[target.index()].push_origin(index);

        if timestamp > 0 {
            self.timestamps = Some(match self.timestamps {
                Some((min, max)) => (min.min(timestamp), max.max(timestamp)),
                None => (timestamp, timestamp),
            });
        }

        self.clear_cache();

        true
    }

    /// Checks if the graph contains the `origin -> target` edge. Scans the origin's outgoing
    /// edges.
    pub fn edge_exists(&self, origin: NodeIndex, target: NodeIndex) -> bool {
        self.nodes[origin.index()]
            .targets()
            .iter()
            .any(|edge| self.edges[edge.index()].connects(origin, target))
    }

    /// Returns the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle wasn't issued by this graph.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// Looks up a node by its id.
    pub fn node_by_id(&self, id: NodeId) -> Option<NodeIndex> {
        self.ids.get(&id).copied()
    }

    /// Returns the nodes in traversal order (reverse creation order).
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = (NodeIndex, &Node)> + ExactSizeIterator {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (NodeIndex::new(i), node))
    }

    /// Returns the edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: EdgeIndex) -> &Edge {
        &self.edges[index.index()]
    }

    /// Returns the node count of the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edge count of the graph, duplicate insertions excluded.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether any edge carries a timestamp.
    pub fn is_temporal(&self) -> bool {
        self.timestamps.is_some()
    }

    /// Returns the smallest and largest edge timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let mut net = Net::new();
    /// let (a, b, c) = (net.add_node(0), net.add_node(0), net.add_node(0));
    /// assert_eq!(net.timestamp_range(), None);
    ///
    /// net.add_edge(a, b, 20);
    /// net.add_edge(b, c, 0);
    /// net.add_edge(c, a, 10);
    /// assert_eq!(net.timestamp_range(), Some((10, 20)));
    /// ```
    pub fn timestamp_range(&self) -> Option<(u64, u64)> {
        self.timestamps
    }

    /// Returns the rank bounds of the last centrality run, `None` if the graph changed since.
    pub fn rank_bounds(&self) -> Option<RankBounds> {
        self.rank_bounds
    }

    /// Picks a node uniformly at random, `None` for an empty graph.
    pub fn random_node<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<NodeIndex> {
        if self.nodes.is_empty() {
            return None;
        }

        let pos = rng.gen_range(0..self.nodes.len());
        self.nodes().nth(pos).map(|(index, _)| index)
    }

    /// Returns the in-degree of every node, in traversal order.
    pub fn in_deg_seq(&self) -> Vec<usize> {
        self.nodes().map(|(_, node)| node.in_degree()).collect()
    }

    /// Returns the out-degree of every node, in traversal order.
    pub fn out_deg_seq(&self) -> Vec<usize> {
        self.nodes().map(|(_, node)| node.out_degree()).collect()
    }

    /// Writes the rank report as CSV, one row per node in traversal order.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::graph::Net;
    ///
    /// let mut net = Net::new();
    /// net.add_node(0);
    ///
    /// let mut out = Vec::new();
    /// net.write_pageranks(&mut out).unwrap();
    ///
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     "id, pr_in, pr_out, in_degree, out_degree\n0,0.0000000000,0.0000000000,0,0\n"
    /// );
    /// ```
    pub fn write_pageranks<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().from_writer(writer);

        writer.write_record(["id", " pr_in", " pr_out", " in_degree", " out_degree"])?;
        for (_, node) in self.nodes() {
            writer.write_record([
                node.id().to_string(),
                format!("{:.10}", node.pr_in()),
                format!("{:.10}", node.pr_out()),
                node.in_degree().to_string(),
                node.out_degree().to_string(),
            ])?;
        }

        writer.flush()?;

        Ok(())
    }

    /// Writes the rank report to a file, see [`Net::write_pageranks`].
    pub fn write_pageranks_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_pageranks(file)
    }

    /// Prints the diagnostic summary of the graph to stdout.
    pub fn print_net_info(&self) {
        println!("{self}");
    }

    //
    // Private
    //

    /// Clears the computed state.
    ///
    /// This should be called every time the graph is mutated since the cached bounds won't
    /// correspond to the new graph.
    fn clear_cache(&mut self) {
        self.rank_bounds = None;
    }

    fn insert_node(&mut self, id: NodeId, node_type: u32) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node::new(id, node_type));
        self.ids.insert(id, index);
        self.clear_cache();

        index
    }

    /// Returns every node adjacent to `node`, origins first then targets. A node linked in both
    /// directions is yielded twice.
    pub(crate) fn neighbours(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        let node = self.node(node);
        let origins = node
            .origins()
            .iter()
            .map(|edge| self.edges[edge.index()].origin());
        let targets = node
            .targets()
            .iter()
            .map(|edge| self.edges[edge.index()].target());

        origins.chain(targets)
    }
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bounds = self.rank_bounds.unwrap_or_default();

        writeln!(f, "node number: {}", self.node_count())?;
        writeln!(f, "edge number: {}", self.edge_count())?;
        writeln!(
            f,
            "log(pr_in): [{:.6}, {:.6}]",
            bounds.min_pr_in, bounds.max_pr_in
        )?;
        write!(
            f,
            "log(pr_out): [{:.6}, {:.6}]",
            bounds.min_pr_out, bounds.max_pr_out
        )
    }
}
