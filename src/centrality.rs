//! Inbound and outbound rank computation, and the rank histograms built from it.
//!
//! Both ranks are damped, degree-normalised power iterations run side by side: the inbound rank
//! propagates along edge direction (classic PageRank), the outbound rank against it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    graph::Net,
    histogram::Histogram2D,
};

/// Centrality configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    /// Iteration count, or the iteration cap when `tolerance` is set.
    pub max_iterations: usize,
    /// Damping factor, the weight of propagated rank against the uniform baseline.
    pub drag: f64,
    /// Stop early once the L1 change of both rank vectors drops to or below this value. `None`
    /// always runs `max_iterations`.
    pub tolerance: Option<f64>,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            drag: 0.999,
            tolerance: None,
        }
    }
}

impl CentralityConfig {
    /// Checks the configuration can drive a run.
    ///
    /// A drag of `1` removes the baseline term, and with it the guarantee that every iteration
    /// has a nonzero total to normalise by.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_iterations must be greater than zero".into(),
            ));
        }

        if !(0.0..1.0).contains(&self.drag) {
            return Err(Error::InvalidConfig(format!(
                "drag must be in [0, 1), got {}",
                self.drag
            )));
        }

        if let Some(tolerance) = self.tolerance {
            if tolerance.is_nan() || tolerance < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "tolerance must be non-negative, got {tolerance}"
                )));
            }
        }

        Ok(())
    }
}

/// The range of the finite log-scaled ranks across all nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RankBounds {
    pub min_pr_in: f64,
    pub max_pr_in: f64,
    pub min_pr_out: f64,
    pub max_pr_out: f64,
}

impl Net {
    /// Computes the inbound and outbound ranks of every node and stores them on the nodes.
    ///
    /// Each iteration normalises the ranks to sum to 1. Afterwards the ranks are divided by the
    /// uniform baseline `1 / node_count` and log-scaled, so a node of average importance reads
    /// `0.0`. Non-finite values are kept on the nodes but excluded from the returned bounds,
    /// which stay at `0.0` when no value is finite. An empty graph yields zero bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::{centrality::CentralityConfig, graph::Net};
    ///
    /// let mut net = Net::new();
    /// let (a, b, c) = (net.add_node(0), net.add_node(0), net.add_node(0));
    /// net.add_edge(a, b, 0);
    /// net.add_edge(b, c, 0);
    /// net.add_edge(c, a, 0);
    ///
    /// let bounds = net.compute_pageranks(&CentralityConfig::default()).unwrap();
    ///
    /// // Every node of a cycle is exactly average.
    /// assert!(bounds.max_pr_in.abs() < 1e-9);
    /// assert!(net.node(a).pr_out().abs() < 1e-9);
    /// ```
    pub fn compute_pageranks(&mut self, config: &CentralityConfig) -> Result<RankBounds> {
        config.validate()?;

        let n = self.node_count();
        if n == 0 {
            let bounds = RankBounds::default();
            self.rank_bounds = Some(bounds);

            return Ok(bounds);
        }

        let drag = config.drag;
        let baseline = (1.0 - drag) / n as f64;

        for node in &mut self.nodes {
            node.pr_in_last = 1.0;
            node.pr_out_last = 1.0;
        }

        let mut iteration = 0;
        while iteration < config.max_iterations {
            // Raw ranks are computed from the previous iteration's values for every node before
            // any of them is overwritten.
            let (pr_in, pr_out): (Vec<f64>, Vec<f64>) = self
                .nodes
                .iter()
                .map(|node| {
                    let inbound: f64 = node
                        .origins()
                        .iter()
                        .map(|edge| {
                            let origin = &self.nodes[self.edges[edge.index()].origin().index()];
                            origin.pr_in_last / origin.out_degree() as f64
                        })
                        .sum();

                    let outbound: f64 = node
                        .targets()
                        .iter()
                        .map(|edge| {
                            let target = &self.nodes[self.edges[edge.index()].target().index()];
                            target.pr_out_last / target.in_degree() as f64
                        })
                        .sum();

                    (drag * inbound + baseline, drag * outbound + baseline)
                })
                .unzip();

            let acc_pr_in: f64 = pr_in.iter().sum();
            let acc_pr_out: f64 = pr_out.iter().sum();

            let mut delta_pr_in = 0.0;
            let mut delta_pr_out = 0.0;

            let raw = pr_in.into_iter().zip(pr_out);
            for (node, (raw_in, raw_out)) in self.nodes.iter_mut().zip(raw) {
                node.pr_in = raw_in / acc_pr_in;
                node.pr_out = raw_out / acc_pr_out;

                delta_pr_in += (node.pr_in - node.pr_in_last).abs();
                delta_pr_out += (node.pr_out - node.pr_out_last).abs();

                node.pr_in_last = node.pr_in;
                node.pr_out_last = node.pr_out;
            }

            iteration += 1;
            debug!(iteration, delta_pr_in, delta_pr_out, "rank iteration");

            if let Some(tolerance) = config.tolerance {
                if delta_pr_in <= tolerance && delta_pr_out <= tolerance {
                    break;
                }
            }
        }

        // Relative to the uniform baseline, then log scale.
        let base_pr = 1.0 / n as f64;
        for node in &mut self.nodes {
            node.pr_in = (node.pr_in / base_pr).ln();
            node.pr_out = (node.pr_out / base_pr).ln();
        }

        let (min_pr_in, max_pr_in) = finite_range(self.nodes.iter().map(|node| node.pr_in));
        let (min_pr_out, max_pr_out) = finite_range(self.nodes.iter().map(|node| node.pr_out));

        let bounds = RankBounds {
            min_pr_in,
            max_pr_in,
            min_pr_out,
            max_pr_out,
        };
        self.rank_bounds = Some(bounds);

        Ok(bounds)
    }

    /// Bins the nodes by `(pr_in, pr_out)` over the ranges of the last centrality run.
    ///
    /// See [`Net::drmap_with_limits`].
    pub fn drmap(&self, bins: usize) -> Result<Histogram2D> {
        let bounds = self.rank_bounds.ok_or(Error::RanksNotComputed)?;

        self.drmap_with_limits(
            bins,
            bounds.min_pr_in,
            bounds.max_pr_in,
            bounds.min_pr_out,
            bounds.max_pr_out,
        )
    }

    /// Bins the nodes by `(pr_in, pr_out)` over explicit ranges, `pr_in` on the horizontal axis.
    ///
    /// Values at or below a minimum land in the first bin, values at or above a maximum in the
    /// last one, non-finite values in the first one. Nodes without any edge are left out. The
    /// returned histogram's ranges start one bin interval below the given minimums.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::{centrality::CentralityConfig, graph::Net};
    ///
    /// let mut net = Net::new();
    /// let (hub, a, b) = (net.add_node(0), net.add_node(0), net.add_node(0));
    /// net.add_node(0);
    /// net.add_edge(hub, a, 0);
    /// net.add_edge(hub, b, 0);
    ///
    /// net.compute_pageranks(&CentralityConfig::default()).unwrap();
    /// let map = net.drmap(4).unwrap();
    ///
    /// // The isolated node isn't counted.
    /// assert_eq!(map.total(), 3.0);
    /// ```
    pub fn drmap_with_limits(
        &self,
        bins: usize,
        min_val_hor: f64,
        max_val_hor: f64,
        min_val_ver: f64,
        max_val_ver: f64,
    ) -> Result<Histogram2D> {
        if self.rank_bounds.is_none() {
            return Err(Error::RanksNotComputed);
        }

        if bins == 0 {
            return Err(Error::InvalidBinCount);
        }

        let interval_hor = (max_val_hor - min_val_hor) / bins as f64;
        let interval_ver = (max_val_ver - min_val_ver) / bins as f64;

        let mut map = Histogram2D::new(
            bins,
            min_val_hor - interval_hor,
            max_val_hor,
            min_val_ver - interval_ver,
            max_val_ver,
        )?;

        for (_, node) in self.nodes() {
            if node.degree() == 0 {
                continue;
            }

            let x = bin_index(node.pr_in(), min_val_hor, max_val_hor, interval_hor, bins);
            let y = bin_index(node.pr_out(), min_val_ver, max_val_ver, interval_ver, bins);

            map.inc_value(x, y);
        }

        Ok(map)
    }
}

//
// Helpers
//

/// Returns the smallest and largest finite values, `(0.0, 0.0)` if there are none.
fn finite_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|value| value.is_finite())
        .fold(None, |range, value| match range {
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
            None => Some((value, value)),
        })
        .unwrap_or((0.0, 0.0))
}

/// Maps a value to its bin, clamping to the first and last bins.
fn bin_index(value: f64, min: f64, max: f64, interval: f64, bins: usize) -> usize {
    if !value.is_finite() || value <= min {
        0
    } else if value >= max {
        bins - 1
    } else {
        // Rounding can push a value just under the maximum onto the last boundary.
        (((value - min) / interval).floor() as usize).min(bins - 1)
    }
}
