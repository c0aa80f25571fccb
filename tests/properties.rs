//! Property-based tests for graph construction, ranks, triads, histograms and random graphs.
//!
//! These tests verify invariants that should hold for any directed graph:
//! - Degree bookkeeping and edge dedup
//! - Rank bounds and histogram membership
//! - Triad census on tiny graphs
//! - Histogram distance symmetry
//! - Degree preservation of the random graph generator

use std::collections::HashSet;

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use synthetic::{
    centrality::CentralityConfig,
    emd::MinCostFlow,
    graph::Net,
    histogram::Histogram2D,
    node::NodeIndex,
};

/// Generate a node count and edges between those nodes, duplicates and self-loops included.
fn arb_graph(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..=max_nodes).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..4 * n)))
}

/// Generate a square histogram with small integer counts.
fn arb_histogram() -> impl Strategy<Value = Histogram2D> {
    (1usize..6).prop_flat_map(|bins| {
        prop::collection::vec(0u8..4, bins * bins).prop_map(move |values| {
            let mut hist = Histogram2D::new(bins, 0.0, 1.0, -1.0, 1.0).unwrap();
            for (i, value) in values.into_iter().enumerate() {
                hist.set_value(i % bins, i / bins, value as f64);
            }
            hist
        })
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> (Net, Vec<NodeIndex>) {
    let mut net = Net::new();
    let nodes: Vec<NodeIndex> = (0..n).map(|_| net.add_node(0)).collect();
    for &(origin, target) in edges {
        net.add_edge(nodes[origin], nodes[target], 0);
    }

    (net, nodes)
}

fn sorted(mut seq: Vec<usize>) -> Vec<usize> {
    seq.sort_unstable();
    seq
}

mod graph_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn degree_sums_match_edge_count((n, edges) in arb_graph(12)) {
            let (net, _) = build(n, &edges);

            let in_sum: usize = net.in_deg_seq().iter().sum();
            let out_sum: usize = net.out_deg_seq().iter().sum();

            prop_assert_eq!(in_sum, net.edge_count());
            prop_assert_eq!(out_sum, net.edge_count());
        }

        #[test]
        fn duplicate_edges_are_dropped((n, edges) in arb_graph(12)) {
            let (net, nodes) = build(n, &edges);
            let distinct: HashSet<(usize, usize)> = edges.iter().copied().collect();

            prop_assert_eq!(net.edge_count(), distinct.len());
            for (origin, target) in distinct {
                prop_assert!(net.edge_exists(nodes[origin], nodes[target]));
            }
        }
    }
}

mod centrality_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn bounds_are_ordered((n, edges) in arb_graph(12)) {
            let (mut net, _) = build(n, &edges);
            let bounds = net.compute_pageranks(&CentralityConfig::default()).unwrap();

            prop_assert!(bounds.min_pr_in <= bounds.max_pr_in);
            prop_assert!(bounds.min_pr_out <= bounds.max_pr_out);
            prop_assert_eq!(net.rank_bounds(), Some(bounds));
        }

        #[test]
        fn drmap_counts_connected_nodes((n, edges) in arb_graph(12), bins in 1usize..8) {
            let (mut net, _) = build(n, &edges);
            net.compute_pageranks(&CentralityConfig::default()).unwrap();

            let map = net.drmap(bins).unwrap();
            let connected = net.nodes().filter(|(_, node)| node.degree() > 0).count();

            prop_assert_eq!(map.total(), connected as f64);
        }
    }
}

mod triad_props {
    use super::*;

    proptest! {
        #[test]
        fn no_triads_below_three_nodes((n, edges) in arb_graph(2)) {
            let (net, _) = build(n, &edges);

            prop_assert_eq!(net.triad_profile().total(), 0);
        }

        #[test]
        fn connected_triples_classify((n, edges) in arb_graph(8)) {
            let (net, nodes) = build(n, &edges);

            // A triad with an edge on two of its pairs is connected, so it always has a class.
            for triple in nodes.windows(3) {
                let (a, b, c) = (triple[0], triple[1], triple[2]);
                let linked = |x, y| net.edge_exists(x, y) || net.edge_exists(y, x);
                let pairs = [linked(a, b), linked(a, c), linked(b, c)];

                if pairs.iter().filter(|&&p| p).count() >= 2 {
                    prop_assert!(net.triad_type(a, b, c).is_some());
                }
            }
        }
    }
}

mod histogram_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn simple_dist_is_zero_on_self(hist in arb_histogram()) {
            prop_assert_eq!(hist.simple_dist(&hist).unwrap(), 0.0);
        }

        #[test]
        fn emd_is_symmetric(a in arb_histogram(), b in arb_histogram()) {
            let solver = MinCostFlow::default();
            let ab = a.emd_dist(&b, &solver).unwrap();
            let ba = b.emd_dist(&a, &solver).unwrap();

            if ab.is_finite() {
                prop_assert!((ab - ba).abs() < 1e-6, "{} != {}", ab, ba);
            } else {
                prop_assert_eq!(ab, ba);
            }
        }

        #[test]
        fn emd_is_zero_on_self(hist in arb_histogram()) {
            let dist = hist.emd_dist(&hist, &MinCostFlow::default()).unwrap();

            prop_assert!(dist.abs() < 1e-9, "{}", dist);
        }
    }
}

mod generator_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn degrees_are_preserved((n, edges) in arb_graph(12), seed in any::<u64>()) {
            let (reference, _) = build(n, &edges);
            let mut rng = StdRng::seed_from_u64(seed);
            let random = Net::random_with_degree_sequence(&reference, &mut rng);

            prop_assert_eq!(random.node_count(), reference.node_count());
            prop_assert!(random.edge_count() <= reference.edge_count());

            if random.edge_count() == reference.edge_count() {
                prop_assert_eq!(sorted(random.in_deg_seq()), sorted(reference.in_deg_seq()));
                prop_assert_eq!(sorted(random.out_deg_seq()), sorted(reference.out_deg_seq()));
            }
        }
    }
}
