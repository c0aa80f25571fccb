use std::io;

use rand::{rngs::StdRng, Rng, SeedableRng};
use synthetic::{
    emd::MinCostFlow,
    fingerprint::{relative_distances, Fingerprint, FingerprintConfig},
    graph::Net,
    node::NodeIndex,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// Grows a graph where new nodes link to existing nodes with probability proportional to their
// in-degree, plus one.
fn preferential_attachment<R: Rng>(nodes: usize, links: usize, rng: &mut R) -> Net {
    let mut net = Net::new();
    let mut handles: Vec<NodeIndex> = Vec::with_capacity(nodes);
    // One entry per node, plus one per received edge.
    let mut pool: Vec<NodeIndex> = Vec::new();

    for _ in 0..nodes {
        let node = net.add_node(0);

        if !pool.is_empty() {
            for _ in 0..links {
                let target = pool[rng.gen_range(0..pool.len())];
                if net.add_edge(node, target, 0) {
                    pool.push(target);
                }
            }
        }

        handles.push(node);
        pool.push(node);
    }

    // A few back links so the graph isn't a DAG.
    for _ in 0..nodes / 4 {
        let origin = handles[rng.gen_range(0..handles.len())];
        let target = handles[rng.gen_range(0..handles.len())];
        net.add_edge(origin, target, 0);
    }

    net
}

fn main() -> synthetic::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let mut rng = StdRng::seed_from_u64(42);
    let mut net = preferential_attachment(200, 3, &mut rng);

    let config = FingerprintConfig::default();
    let fingerprint = Fingerprint::compute(&mut net, &config)?;

    net.print_net_info();
    info!(triads = %fingerprint.triads, "triad profile");
    println!("{}", fingerprint.drmap);

    net.write_pageranks(io::stdout())?;

    let solver = MinCostFlow::default();
    for links in 1..=3 {
        let mut candidate = preferential_attachment(200, links, &mut rng);
        let distances = relative_distances(&mut net, &mut candidate, &config, &solver, &mut rng)?;
        info!(
            links,
            triads = distances.relative.triads,
            drmap_simple = distances.relative.drmap_simple,
            drmap_emd = distances.relative.drmap_emd,
            "distances relative to the null model"
        );
    }

    Ok(())
}
