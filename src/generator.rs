//! Degree-preserving random graphs, used as null models.

use rand::Rng;
use tracing::debug;

use crate::{graph::Net, node::NodeIndex};

impl Net {
    /// Builds a random graph with the degree sequences of `reference` by stub matching.
    ///
    /// Every node of the reference gets a fresh counterpart of type `0`, created in the same
    /// order. Each edge draws an origin among the remaining out-stubs and a target among the
    /// remaining in-stubs. Draws that repeat an existing edge are dropped, so the result can hold
    /// slightly fewer edges than the reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use synthetic::graph::Net;
    ///
    /// let mut reference = Net::new();
    /// let (a, b, c) = (reference.add_node(0), reference.add_node(0), reference.add_node(0));
    /// reference.add_edge(a, b, 0);
    /// reference.add_edge(b, c, 0);
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let random = Net::random_with_degree_sequence(&reference, &mut rng);
    ///
    /// assert_eq!(random.node_count(), 3);
    /// assert!(random.edge_count() <= 2);
    /// ```
    pub fn random_with_degree_sequence<R: Rng + ?Sized>(reference: &Net, rng: &mut R) -> Net {
        let mut in_stubs: Vec<usize> = reference.nodes.iter().map(|n| n.in_degree()).collect();
        let mut out_stubs: Vec<usize> = reference.nodes.iter().map(|n| n.out_degree()).collect();

        let mut net = Net::new();
        let nodes: Vec<NodeIndex> = (0..reference.node_count())
            .map(|_| net.add_node(0))
            .collect();

        let edge_count = reference.edge_count();
        let mut dropped = 0;

        // Both stub sequences sum to the remaining total at the start of every iteration.
        for remaining in (1..=edge_count).rev() {
            let origin = take_stub(&mut out_stubs, rng.gen_range(0..remaining));
            let target = take_stub(&mut in_stubs, rng.gen_range(0..remaining));

            if !net.add_edge(nodes[origin], nodes[target], 0) {
                dropped += 1;
            }
        }

        debug!(
            edges = edge_count,
            dropped, "generated degree-preserving random graph"
        );

        net
    }
}

/// Finds the node whose stub range holds `pos` and removes one of its stubs.
fn take_stub(stubs: &mut [usize], pos: usize) -> usize {
    let mut idx = 0;
    let mut end = stubs[0];
    while end <= pos {
        idx += 1;
        end += stubs[idx];
    }

    stubs[idx] -= 1;
    idx
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn sorted(mut seq: Vec<usize>) -> Vec<usize> {
        seq.sort_unstable();
        seq
    }

    #[test]
    fn random_with_degree_sequence_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let random = Net::random_with_degree_sequence(&Net::new(), &mut rng);

        assert_eq!(random.node_count(), 0);
        assert_eq!(random.edge_count(), 0);
    }

    #[test]
    fn random_with_degree_sequence_isolated_nodes() {
        let (reference, _) = net!(4;);
        let mut rng = StdRng::seed_from_u64(0);
        let random = Net::random_with_degree_sequence(&reference, &mut rng);

        assert_eq!(random.node_count(), 4);
        assert_eq!(random.edge_count(), 0);
    }

    #[test]
    fn random_with_degree_sequence_forced() {
        // A single out-stub and a single in-stub leave only one possible edge.
        let (reference, _) = net!(3; 2 => 0);
        let mut rng = StdRng::seed_from_u64(3);
        let random = Net::random_with_degree_sequence(&reference, &mut rng);

        let nodes: Vec<NodeIndex> = random.nodes().map(|(index, _)| index).rev().collect();
        assert_eq!(random.edge_count(), 1);
        assert!(random.edge_exists(nodes[2], nodes[0]));
    }

    #[test]
    fn random_with_degree_sequence_fresh_nodes() {
        let mut reference = Net::new();
        let a = reference.add_node_with_id(100, 7).unwrap();
        let b = reference.add_node_with_id(200, 7).unwrap();
        reference.add_edge(a, b, 42);

        let mut rng = StdRng::seed_from_u64(0);
        let random = Net::random_with_degree_sequence(&reference, &mut rng);

        assert!(random.nodes().all(|(_, node)| node.node_type() == 0));
        assert_eq!(random.node_by_id(100), None);
        assert!(!random.is_temporal());
    }

    #[test]
    fn random_with_degree_sequence_preserves_degrees() {
        let (reference, _) = net!(6;
            0 => 1, 0 => 2, 0 => 3, 1 => 2, 2 => 3, 3 => 4, 4 => 5, 5 => 0, 5 => 1, 1 => 4
        );

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let random = Net::random_with_degree_sequence(&reference, &mut rng);
            let dropped = reference.edge_count() - random.edge_count();

            if dropped == 0 {
                assert_eq!(sorted(random.in_deg_seq()), sorted(reference.in_deg_seq()));
                assert_eq!(sorted(random.out_deg_seq()), sorted(reference.out_deg_seq()));
            }

            // Per node, degrees never exceed the reference's and the shortfall is the drop count.
            for (reference_node, random_node) in reference.nodes.iter().zip(random.nodes.iter()) {
                assert!(random_node.in_degree() <= reference_node.in_degree());
                assert!(random_node.out_degree() <= reference_node.out_degree());
            }

            let shortfall: usize = reference
                .nodes
                .iter()
                .zip(random.nodes.iter())
                .map(|(r, n)| r.out_degree() - n.out_degree())
                .sum();
            assert_eq!(shortfall, dropped);
        }
    }

    #[test]
    fn random_with_degree_sequence_is_seeded() {
        let (reference, _) = net!(5; 0 => 1, 1 => 2, 2 => 3, 3 => 4, 4 => 0, 0 => 2);

        let first = Net::random_with_degree_sequence(&reference, &mut StdRng::seed_from_u64(9));
        let second = Net::random_with_degree_sequence(&reference, &mut StdRng::seed_from_u64(9));

        let edges = |net: &Net| -> Vec<(usize, usize)> {
            net.edges()
                .iter()
                .map(|e| (e.origin().index(), e.target().index()))
                .collect()
        };
        assert_eq!(edges(&first), edges(&second));
    }

    //
    // Private
    //

    #[test]
    fn take_stub() {
        let mut stubs = vec![0, 2, 0, 1];

        assert_eq!(super::take_stub(&mut stubs, 0), 1);
        assert_eq!(stubs, vec![0, 1, 0, 1]);

        assert_eq!(super::take_stub(&mut stubs, 1), 3);
        assert_eq!(stubs, vec![0, 1, 0, 0]);

        assert_eq!(super::take_stub(&mut stubs, 0), 1);
        assert_eq!(stubs, vec![0, 0, 0, 0]);
    }
}
