//! Earth mover's distance between weighted point sets.
//!
//! The distance is the cost of the cheapest transport of mass from one signature onto the other,
//! divided by the mass moved. When the totals differ only the smaller total is moved.

use nalgebra::{DMatrix, Point2};
use tracing::debug;

use crate::{
    error::{Error, Result},
    histogram::Signature,
};

/// The distance between two points of a signature.
pub type GroundDistance<'a> = dyn Fn(&Point2<f64>, &Point2<f64>) -> f64 + 'a;

/// A solver for the transportation problem between two signatures.
pub trait TransportSolver {
    /// Returns the minimal transport cost per unit of moved mass.
    fn solve(&self, a: &Signature, b: &Signature, ground: &GroundDistance<'_>) -> Result<f64>;
}

/// Solves the transportation problem as a min-cost flow, augmenting along shortest paths of the
/// residual network. Paths are found with Dijkstra's algorithm over reduced costs, so ground
/// distances may be negative.
///
/// Two empty signatures are at distance `0.0`, an empty and a non-empty one at infinity.
#[derive(Clone, Copy, Debug)]
pub struct MinCostFlow {
    /// Mass below this fraction of the moved total is considered exhausted.
    pub epsilon: f64,
}

impl Default for MinCostFlow {
    fn default() -> Self {
        Self { epsilon: 1e-9 }
    }
}

impl TransportSolver for MinCostFlow {
    fn solve(&self, a: &Signature, b: &Signature, ground: &GroundDistance<'_>) -> Result<f64> {
        let supply: Vec<f64> = a.weights.iter().map(|w| w.max(0.0)).collect();
        let demand: Vec<f64> = b.weights.iter().map(|w| w.max(0.0)).collect();

        let total_a: f64 = supply.iter().sum();
        let total_b: f64 = demand.iter().sum();

        match (total_a > 0.0, total_b > 0.0) {
            (false, false) => return Ok(0.0),
            (true, false) | (false, true) => return Ok(f64::INFINITY),
            (true, true) => (),
        }

        let cost = DMatrix::from_fn(a.len(), b.len(), |i, j| ground(&a.points[i], &b.points[j]));
        let mut network = FlowNetwork::transport(&supply, &demand, &cost);

        let target = total_a.min(total_b);
        let threshold = self.epsilon * target;
        let mut moved = 0.0;
        let mut augmentations = 0;

        while target - moved > threshold {
            let Some(path) = network.shortest_path(threshold) else {
                break;
            };

            let delta = path
                .iter()
                .map(|&arc| network.arcs[arc].residual)
                .fold(target - moved, f64::min);

            for &arc in &path {
                network.push(arc, delta);
            }

            moved += delta;
            augmentations += 1;
        }

        debug!(augmentations, moved, target, "transport solved");

        if target - moved > threshold {
            return Err(Error::TransportIncomplete { moved, target });
        }

        Ok(network.transport_cost() / moved)
    }
}

/// An arc of the residual network. Arcs are stored in pairs, arc `k ^ 1` is the reverse of arc
/// `k` and its residual capacity is the flow on `k`.
#[derive(Clone, Copy, Debug)]
struct ResidualArc {
    head: usize,
    residual: f64,
    cost: f64,
}

/// A source feeding the supply points, complete supply to demand arcs, and the demand points
/// draining into a sink.
struct FlowNetwork {
    arcs: Vec<ResidualArc>,
    outgoing: Vec<Vec<usize>>,
    /// Forward supply to demand arcs.
    transport: Vec<usize>,
    potentials: Vec<f64>,
    source: usize,
    sink: usize,
}

impl FlowNetwork {
    /// Builds the network with vertices `source, supplies.., demands.., sink`.
    fn transport(supply: &[f64], demand: &[f64], cost: &DMatrix<f64>) -> Self {
        let (n, m) = (supply.len(), demand.len());
        let source = 0;
        let sink = n + m + 1;

        let mut network = Self {
            arcs: Vec::with_capacity(2 * (n * m + n + m)),
            outgoing: vec![Vec::new(); n + m + 2],
            transport: Vec::with_capacity(n * m),
            potentials: vec![0.0; n + m + 2],
            source,
            sink,
        };

        for (i, &mass) in supply.iter().enumerate() {
            network.add_arc(source, 1 + i, mass, 0.0);
        }

        for i in 0..n {
            for j in 0..m {
                let arc = network.add_arc(1 + i, 1 + n + j, f64::INFINITY, cost[(i, j)]);
                network.transport.push(arc);
            }
        }

        for (j, &mass) in demand.iter().enumerate() {
            network.add_arc(1 + n + j, sink, mass, 0.0);
        }

        // Shortest distances on the empty network, which is layered and so needs no search. They
        // make every reduced cost non-negative.
        for j in 0..m {
            network.potentials[1 + n + j] = cost.column(j).min();
        }
        network.potentials[sink] = network.potentials[1 + n..sink]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);

        network
    }

    fn add_arc(&mut self, tail: usize, head: usize, capacity: f64, cost: f64) -> usize {
        let arc = self.arcs.len();

        self.arcs.push(ResidualArc {
            head,
            residual: capacity,
            cost,
        });
        self.arcs.push(ResidualArc {
            head: tail,
            residual: 0.0,
            cost: -cost,
        });
        self.outgoing[tail].push(arc);
        self.outgoing[head].push(arc + 1);

        arc
    }

    fn push(&mut self, arc: usize, delta: f64) {
        self.arcs[arc].residual -= delta;
        self.arcs[arc ^ 1].residual += delta;
    }

    fn tail(&self, arc: usize) -> usize {
        self.arcs[arc ^ 1].head
    }

    /// Returns the total cost of the flow on the transport arcs.
    fn transport_cost(&self) -> f64 {
        self.transport
            .iter()
            .map(|&arc| self.arcs[arc ^ 1].residual * self.arcs[arc].cost)
            .sum()
    }

    /// Finds the cheapest source to sink path through arcs with residual capacity above
    /// `threshold`, returned as arcs from the sink backwards. Updates the potentials so reduced
    /// costs stay non-negative after augmenting along the path.
    fn shortest_path(&mut self, threshold: f64) -> Option<Vec<usize>> {
        let vertices = self.outgoing.len();

        let mut dist = vec![f64::INFINITY; vertices];
        let mut pred: Vec<Option<usize>> = vec![None; vertices];
        let mut done = vec![false; vertices];
        dist[self.source] = 0.0;

        // The network is dense, a linear scan for the closest vertex beats a heap.
        while let Some(u) = (0..vertices)
            .filter(|&v| !done[v] && dist[v].is_finite())
            .min_by(|&x, &y| dist[x].total_cmp(&dist[y]))
        {
            done[u] = true;

            for &arc in &self.outgoing[u] {
                let ResidualArc { head, residual, cost } = self.arcs[arc];
                if residual <= threshold || done[head] {
                    continue;
                }

                // Rounding can leave reduced costs slightly negative.
                let reduced = (cost + self.potentials[u] - self.potentials[head]).max(0.0);
                if dist[u] + reduced < dist[head] {
                    dist[head] = dist[u] + reduced;
                    pred[head] = Some(arc);
                }
            }
        }

        let reach = dist[self.sink];
        if !reach.is_finite() {
            return None;
        }

        for (potential, dist) in self.potentials.iter_mut().zip(&dist) {
            *potential += dist.min(reach);
        }

        // Predecessors always point to vertices settled earlier, so the walk ends at the source.
        let mut path = Vec::new();
        let mut vertex = self.sink;
        while let Some(arc) = pred[vertex] {
            path.push(arc);
            vertex = self.tail(arc);
        }

        Some(path)
    }
}
