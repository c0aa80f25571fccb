//! Triad census: counts of connected 3-node subgraphs by directed isomorphism class.

use std::{fmt, ops::Index};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{graph::Net, node::NodeIndex};

/// The 13 isomorphism classes of connected directed triads, named with the MAN (mutual,
/// asymmetric, null dyad counts) convention. Variants are in census order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TriadType {
    /// `A <- B -> C`
    T021D,
    /// `A -> B <- C`
    T021U,
    /// `A -> B -> C`
    T021C,
    /// `A <-> B <- C`
    T111D,
    /// `A <-> B -> C`
    T111U,
    /// `A -> B <- C, A -> C`
    T030T,
    /// `A <- B <- C, A -> C`
    T030C,
    /// `A <-> B <-> C`
    T201,
    /// `A <- B -> C, A <-> C`
    T120D,
    /// `A -> B <- C, A <-> C`
    T120U,
    /// `A -> B -> C, A <-> C`
    T120C,
    /// `A -> B <-> C, A <-> C`
    T210,
    /// `A <-> B <-> C, A <-> C`
    T300,
}

impl TriadType {
    /// Every class, in census order.
    pub const ALL: [TriadType; 13] = [
        TriadType::T021D,
        TriadType::T021U,
        TriadType::T021C,
        TriadType::T111D,
        TriadType::T111U,
        TriadType::T030T,
        TriadType::T030C,
        TriadType::T201,
        TriadType::T120D,
        TriadType::T120U,
        TriadType::T120C,
        TriadType::T210,
        TriadType::T300,
    ];

    /// Returns the position of the class in a [`TriadProfile`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the class number in the standard 16-class census, where the three disconnected
    /// classes (`003`, `012`, `102`) take numbers 1 to 3.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::triad::TriadType;
    ///
    /// assert_eq!(TriadType::T021D.census_number(), 4);
    /// assert_eq!(TriadType::T030C.census_number(), 10);
    /// assert_eq!(TriadType::T300.census_number(), 16);
    /// ```
    pub fn census_number(self) -> usize {
        self.index() + 4
    }

    /// Returns the MAN code of the class.
    pub fn code(self) -> &'static str {
        match self {
            TriadType::T021D => "021D",
            TriadType::T021U => "021U",
            TriadType::T021C => "021C",
            TriadType::T111D => "111D",
            TriadType::T111U => "111U",
            TriadType::T030T => "030T",
            TriadType::T030C => "030C",
            TriadType::T201 => "201",
            TriadType::T120D => "120D",
            TriadType::T120U => "120U",
            TriadType::T120C => "120C",
            TriadType::T210 => "210",
            TriadType::T300 => "300",
        }
    }

    /// Matches the edge pattern of an ordered triad `(a, b, c)` against the canonical
    /// orientation of each class. The flags are `a->b, a->c, b->a, b->c, c->a, c->b`.
    ///
    /// A pattern only matches in one orientation, other orderings of the same nodes return
    /// `None`.
    pub fn from_pattern(flags: [bool; 6]) -> Option<TriadType> {
        let [ab, ac, ba, bc, ca, cb] = flags;

        let triad_type = match (ab, ac, ba, bc, ca, cb) {
            (true, true, false, false, false, false) => TriadType::T021D,
            (false, false, true, false, true, false) => TriadType::T021U,
            (false, false, false, true, true, false) => TriadType::T021C,
            (false, true, true, false, true, false) => TriadType::T111D,
            (true, true, true, false, false, false) => TriadType::T111U,
            (true, true, false, true, false, false) => TriadType::T030T,
            (false, true, true, false, false, true) => TriadType::T030C,
            (true, true, true, false, true, false) => TriadType::T201,
            (true, true, false, true, false, true) => TriadType::T120D,
            (false, false, true, true, true, true) => TriadType::T120U,
            (true, true, false, true, true, false) => TriadType::T120C,
            (false, true, true, true, true, true) => TriadType::T210,
            (true, true, true, true, true, true) => TriadType::T300,
            _ => return None,
        };

        Some(triad_type)
    }
}

impl fmt::Display for TriadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Triad counts, indexed by [`TriadType`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriadProfile {
    counts: [u64; 13],
}

impl TriadProfile {
    pub fn counts(&self) -> &[u64; 13] {
        &self.counts
    }

    pub fn get(&self, triad_type: TriadType) -> u64 {
        self.counts[triad_type.index()]
    }

    /// Returns the number of triads discovered.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns the counts alongside their class, in census order.
    pub fn iter(&self) -> impl Iterator<Item = (TriadType, u64)> + '_ {
        TriadType::ALL.into_iter().zip(self.counts.iter().copied())
    }

    /// Returns the sum of the absolute count differences.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::triad::TriadProfile;
    ///
    /// let profile = TriadProfile::default();
    /// assert_eq!(profile.distance(&profile), 0.0);
    /// ```
    pub fn distance(&self, other: &Self) -> f64 {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .map(|(a, b)| a.abs_diff(*b) as f64)
            .sum()
    }

    fn increment(&mut self, triad_type: TriadType) {
        self.counts[triad_type.index()] += 1;
    }
}

impl Index<TriadType> for TriadProfile {
    type Output = u64;

    fn index(&self, triad_type: TriadType) -> &Self::Output {
        &self.counts[triad_type.index()]
    }
}

impl fmt::Display for TriadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self
            .iter()
            .map(|(triad_type, count)| format!("{triad_type}: {count}"))
            .join(", ");

        f.write_str(&line)
    }
}

impl Net {
    /// Counts the connected triads of the graph by class.
    ///
    /// Nodes seed searches in traversal order (reverse creation order). A search only finds
    /// triads along a path `seed - x - y`, following edges in both directions, and once a node
    /// has seeded a search it's no longer eligible as a partner in later searches. A triad is
    /// therefore missed when its middle node seeds first: the counts depend on creation order,
    /// and isomorphic graphs built in different orders can get different profiles.
    ///
    /// Triads are counted once per ordered discovery, so a triad reachable along several paths
    /// from its seed, or through edges in both directions, counts several times.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::{graph::Net, triad::TriadType};
    ///
    /// let mut net = Net::new();
    /// let (a, b, c) = (net.add_node(0), net.add_node(0), net.add_node(0));
    /// net.add_edge(a, b, 0);
    /// net.add_edge(b, c, 0);
    ///
    /// let profile = net.triad_profile();
    /// assert_eq!(profile[TriadType::T021C], 1);
    /// assert_eq!(profile.total(), 1);
    /// ```
    pub fn triad_profile(&self) -> TriadProfile {
        let mut profile = TriadProfile::default();
        let mut eligible = vec![true; self.node_count()];

        for (seed, _) in self.nodes() {
            self.triads_from(seed, &eligible, &mut profile);
            eligible[seed.index()] = false;
        }

        profile
    }

    /// Classifies three nodes, trying every ordering of them against the class patterns.
    /// Returns `None` if the nodes aren't connected.
    pub fn triad_type(&self, a: NodeIndex, b: NodeIndex, c: NodeIndex) -> Option<TriadType> {
        [a, b, c].into_iter().permutations(3).find_map(|triad| {
            let (a, b, c) = (triad[0], triad[1], triad[2]);

            TriadType::from_pattern([
                self.edge_exists(a, b),
                self.edge_exists(a, c),
                self.edge_exists(b, a),
                self.edge_exists(b, c),
                self.edge_exists(c, a),
                self.edge_exists(c, b),
            ])
        })
    }

    //
    // Private
    //

    /// Extends partial triads from `seed` one hop at a time, classifying those that reach three
    /// nodes.
    fn triads_from(&self, seed: NodeIndex, eligible: &[bool], profile: &mut TriadProfile) {
        let mut stack = vec![([seed; 3], 0)];

        while let Some((triad, depth)) = stack.pop() {
            if depth == 2 {
                self.update_profile(triad, profile);
                continue;
            }

            for next in self.neighbours(triad[depth]) {
                if eligible[next.index()] && !triad[..=depth].contains(&next) {
                    let mut extended = triad;
                    extended[depth + 1] = next;
                    stack.push((extended, depth + 1));
                }
            }
        }
    }

    fn update_profile(&self, [a, b, c]: [NodeIndex; 3], profile: &mut TriadProfile) {
        let triad_type = self.triad_type(a, b, c);
        // Every triad reached by the search is connected and so has a class.
        debug_assert!(triad_type.is_some(), "unclassified triad ({a}, {b}, {c})");

        match triad_type {
            Some(triad_type) => profile.increment(triad_type),
            None => error!(%a, %b, %c, "triad matches no class, skipping"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a 3-node graph from `(origin, target)` pairs.
    fn triad(edges: &[(usize, usize)]) -> (Net, Vec<NodeIndex>) {
        let (mut net, n) = net!(3;);
        for &(origin, target) in edges {
            net.add_edge(n[origin], n[target], 0);
        }

        (net, n)
    }

    /// The canonical orientation of each class, `0, 1, 2` standing for `a, b, c`.
    fn canonical_edges(triad_type: TriadType) -> Vec<(usize, usize)> {
        match triad_type {
            TriadType::T021D => vec![(0, 1), (0, 2)],
            TriadType::T021U => vec![(1, 0), (2, 0)],
            TriadType::T021C => vec![(1, 2), (2, 0)],
            TriadType::T111D => vec![(0, 2), (1, 0), (2, 0)],
            TriadType::T111U => vec![(0, 1), (0, 2), (1, 0)],
            TriadType::T030T => vec![(0, 1), (0, 2), (1, 2)],
            TriadType::T030C => vec![(0, 2), (1, 0), (2, 1)],
            TriadType::T201 => vec![(0, 1), (0, 2), (1, 0), (2, 0)],
            TriadType::T120D => vec![(0, 1), (0, 2), (1, 2), (2, 1)],
            TriadType::T120U => vec![(1, 0), (1, 2), (2, 0), (2, 1)],
            TriadType::T120C => vec![(0, 1), (0, 2), (1, 2), (2, 0)],
            TriadType::T210 => vec![(0, 2), (1, 0), (1, 2), (2, 0), (2, 1)],
            TriadType::T300 => vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)],
        }
    }

    #[test]
    fn census_numbers() {
        let numbers: Vec<usize> = TriadType::ALL.iter().map(|t| t.census_number()).collect();

        assert_eq!(numbers, (4..=16).collect::<Vec<_>>());
    }

    #[test]
    fn codes() {
        let codes: Vec<&str> = TriadType::ALL.iter().map(|t| t.code()).collect();

        assert_eq!(
            codes,
            vec![
                "021D", "021U", "021C", "111D", "111U", "030T", "030C", "201", "120D", "120U",
                "120C", "210", "300"
            ]
        );
    }

    #[test]
    fn from_pattern_is_unambiguous() {
        // Every one of the 64 patterns matches at most one class, and exactly 13 match.
        let matched = (0u8..64)
            .filter_map(|bits| {
                let flags = std::array::from_fn(|i| bits & (1 << i) != 0);
                TriadType::from_pattern(flags)
            })
            .count();

        assert_eq!(matched, 13);
    }

    #[test]
    fn triad_type_canonical() {
        for triad_type in TriadType::ALL {
            let (net, n) = triad(&canonical_edges(triad_type));

            assert_eq!(net.triad_type(n[0], n[1], n[2]), Some(triad_type));
        }
    }

    #[test]
    fn triad_type_is_relabelling_invariant() {
        for triad_type in TriadType::ALL {
            for perm in (0..3).permutations(3) {
                let edges: Vec<(usize, usize)> = canonical_edges(triad_type)
                    .into_iter()
                    .map(|(origin, target)| (perm[origin], perm[target]))
                    .collect();
                let (net, n) = triad(&edges);

                assert_eq!(
                    net.triad_type(n[0], n[1], n[2]),
                    Some(triad_type),
                    "{triad_type} relabelled by {perm:?}"
                );
            }
        }
    }

    #[test]
    fn triad_type_cycle() {
        let (net, n) = triad(&[(0, 1), (1, 2), (2, 0)]);
        let triad_type = net.triad_type(n[0], n[1], n[2]).unwrap();

        assert_eq!(triad_type, TriadType::T030C);
        assert_eq!(triad_type.census_number(), 10);
    }

    #[test]
    fn triad_type_disconnected() {
        let (net, n) = triad(&[(0, 1)]);

        assert_eq!(net.triad_type(n[0], n[1], n[2]), None);
    }

    #[test]
    fn triad_profile_small_graphs() {
        assert_eq!(Net::new().triad_profile(), TriadProfile::default());

        let (net, _) = net!(1;);
        assert_eq!(net.triad_profile().total(), 0);

        let (net, _) = net!(2; 0 => 1, 1 => 0);
        assert_eq!(net.triad_profile().total(), 0);
    }

    #[test]
    fn triad_profile_cycle() {
        let (net, _) = triad(&[(0, 1), (1, 2), (2, 0)]);
        let profile = net.triad_profile();

        // The first seed reaches the cycle in both directions.
        assert_eq!(profile[TriadType::T030C], 2);
        assert_eq!(profile.total(), 2);
    }

    #[test]
    fn triad_profile_out_star() {
        let (net, _) = triad(&[(0, 1), (0, 2)]);
        let profile = net.triad_profile();

        assert_eq!(profile.get(TriadType::T021D), 1);
        assert_eq!(profile.total(), 1);
    }

    #[test]
    fn triad_profile_depends_on_creation_order() {
        // The hub seeds first when created last, and its leaves are only reachable through it.
        let (hub_last, _) = triad(&[(2, 0), (2, 1)]);
        let (hub_first, _) = triad(&[(0, 1), (0, 2)]);

        assert_eq!(hub_last.triad_profile().total(), 0);
        assert_eq!(hub_first.triad_profile()[TriadType::T021D], 1);
        assert_eq!(hub_first.triad_profile().total(), 1);
    }

    #[test]
    fn triad_profile_follows_mutual_edges_twice() {
        let (net, _) = triad(&[(0, 1), (1, 0), (1, 2)]);
        let profile = net.triad_profile();

        assert_eq!(profile[TriadType::T111U], 2);
        assert_eq!(profile.total(), 2);
    }

    #[test]
    fn triad_profile_disconnected_edges() {
        let (net, _) = net!(4; 0 => 1, 2 => 3);

        assert_eq!(net.triad_profile().total(), 0);
    }

    #[test]
    fn triad_profile_ignores_self_loops() {
        let (net, _) = net!(3; 0 => 0, 0 => 1, 1 => 2);
        let profile = net.triad_profile();

        assert_eq!(profile[TriadType::T021C], 1);
        assert_eq!(profile.total(), 1);
    }

    #[test]
    fn triad_profile_larger_graph() {
        let (net, _) = net!(5; 0 => 1, 1 => 2, 2 => 0, 2 => 3, 3 => 4, 4 => 2, 1 => 3);
        let profile = net.triad_profile();

        assert_eq!(profile.total(), profile.counts().iter().sum::<u64>());
        assert!(profile[TriadType::T030C] > 0);
    }

    #[test]
    fn distance() {
        let (cycle, _) = triad(&[(0, 1), (1, 2), (2, 0)]);
        let (star, _) = triad(&[(0, 1), (0, 2)]);

        let cycle = cycle.triad_profile();
        let star = star.triad_profile();

        assert_eq!(cycle.distance(&cycle), 0.0);
        assert_eq!(cycle.distance(&star), 3.0);
        assert_eq!(star.distance(&cycle), 3.0);
    }

    #[test]
    fn display() {
        let (net, _) = triad(&[(0, 1), (0, 2)]);
        let display = net.triad_profile().to_string();

        assert!(display.starts_with("021D: 1, 021U: 0"));
        assert!(display.ends_with("300: 0"));
    }

    #[test]
    fn profile_to_json() {
        let (net, _) = triad(&[(0, 1), (0, 2)]);
        let json = serde_json::to_value(net.triad_profile()).unwrap();

        assert_eq!(json["counts"][0], 1);
        assert_eq!(json["counts"].as_array().map(Vec::len), Some(13));
    }
}
