//! Structural fingerprints of graphs and the distances between them.
//!
//! A fingerprint pairs the triad census of a graph with its rank histogram. Fingerprints are
//! compared against a reference: the candidate's histogram is binned over the reference's rank
//! ranges so both grids line up. Distances are made comparable across graphs by expressing them
//! relative to the average distance between the reference and degree-preserving random graphs.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    centrality::{CentralityConfig, RankBounds},
    emd::TransportSolver,
    error::{Error, Result},
    graph::Net,
    histogram::Histogram2D,
    triad::TriadProfile,
};

/// Fingerprint configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Rank histogram resolution, per axis.
    pub bins: usize,
    pub centrality: CentralityConfig,
    /// Log-scale the histogram bins before comparing.
    pub log_scale: bool,
    /// Divide the histogram bins by the largest one, after log-scaling.
    pub normalize_max: bool,
    /// Random graphs generated to average the null model distances over.
    pub null_samples: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            bins: 10,
            centrality: CentralityConfig::default(),
            log_scale: true,
            normalize_max: true,
            null_samples: 30,
        }
    }
}

impl FingerprintConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(Error::InvalidConfig("bins must be positive".to_owned()));
        }

        if self.null_samples == 0 {
            return Err(Error::InvalidConfig(
                "null_samples must be positive".to_owned(),
            ));
        }

        self.centrality.validate()
    }
}

/// The triad census and rank histogram of a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Fingerprint {
    pub triads: TriadProfile,
    pub drmap: Histogram2D,
    /// The rank ranges of the fingerprinted graph.
    pub bounds: RankBounds,
}

/// Stands in for a zero distance so ratios against it stay finite.
const ZERO_DISTANCE_FLOOR: f64 = 0.999;

/// Distances between two fingerprints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distances {
    /// L1 distance between the triad profiles.
    pub triads: f64,
    /// Bin-wise L1 distance between the rank histograms.
    pub drmap_simple: f64,
    /// Earth mover's distance between the rank histograms.
    pub drmap_emd: f64,
}

impl Distances {
    /// Replaces every zero distance with `0.999`.
    pub fn floored(self) -> Self {
        self.map(|dist| if dist == 0.0 { ZERO_DISTANCE_FLOOR } else { dist })
    }

    /// Divides the floored distances by a baseline, usually the null model average.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::fingerprint::Distances;
    ///
    /// let dist = Distances { triads: 4.0, drmap_simple: 0.0, drmap_emd: 1.0 };
    /// let baseline = Distances { triads: 2.0, drmap_simple: 0.999, drmap_emd: 4.0 };
    ///
    /// let relative = dist.relative_to(&baseline);
    /// assert_eq!(relative.triads, 2.0);
    /// assert_eq!(relative.drmap_simple, 1.0);
    /// assert_eq!(relative.drmap_emd, 0.25);
    /// ```
    pub fn relative_to(&self, baseline: &Self) -> Self {
        let floored = self.floored();

        Self {
            triads: floored.triads / baseline.triads,
            drmap_simple: floored.drmap_simple / baseline.drmap_simple,
            drmap_emd: floored.drmap_emd / baseline.drmap_emd,
        }
    }

    //
    // Private
    //

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            triads: f(self.triads),
            drmap_simple: f(self.drmap_simple),
            drmap_emd: f(self.drmap_emd),
        }
    }

    /// Returns the component-wise mean, `None` for no samples.
    fn mean(samples: &[Self]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let sum = samples.iter().fold(
            Self {
                triads: 0.0,
                drmap_simple: 0.0,
                drmap_emd: 0.0,
            },
            |acc, dist| Self {
                triads: acc.triads + dist.triads,
                drmap_simple: acc.drmap_simple + dist.drmap_simple,
                drmap_emd: acc.drmap_emd + dist.drmap_emd,
            },
        );

        Some(sum.map(|total| total / n))
    }
}

/// Distances from a reference to a candidate, alone and relative to the null model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelativeDistances {
    pub absolute: Distances,
    /// Average floored distances from the reference to its random graphs.
    pub null_model: Distances,
    pub relative: Distances,
}

impl Fingerprint {
    /// Fingerprints a graph over its own rank ranges. Runs the centrality computation, which
    /// overwrites the graph's ranks.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::{
    ///     fingerprint::{Fingerprint, FingerprintConfig},
    ///     graph::Net,
    /// };
    ///
    /// let mut net = Net::new();
    /// let (a, b, c) = (net.add_node(0), net.add_node(0), net.add_node(0));
    /// net.add_edge(a, b, 0);
    /// net.add_edge(b, c, 0);
    /// net.add_edge(c, a, 0);
    ///
    /// let fingerprint = Fingerprint::compute(&mut net, &FingerprintConfig::default()).unwrap();
    /// assert_eq!(fingerprint.triads.total(), 2);
    /// ```
    pub fn compute(net: &mut Net, config: &FingerprintConfig) -> Result<Self> {
        config.validate()?;

        let bounds = net.compute_pageranks(&config.centrality)?;
        Self::build(net, config, bounds)
    }

    /// Fingerprints a candidate graph over the rank ranges of `self`, making the histograms of
    /// both fingerprints comparable bin by bin.
    pub fn compute_candidate(
        &self,
        candidate: &mut Net,
        config: &FingerprintConfig,
    ) -> Result<Self> {
        config.validate()?;

        candidate.compute_pageranks(&config.centrality)?;
        Self::build(candidate, config, self.bounds)
    }

    /// Returns the distances from `self` to `other`.
    ///
    /// Fails if the histograms don't share their geometry, see [`Histogram2D::simple_dist`], or if
    /// the transport solver fails.
    pub fn compare<S>(&self, other: &Self, solver: &S) -> Result<Distances>
    where
        S: TransportSolver + ?Sized,
    {
        Ok(Distances {
            triads: self.triads.distance(&other.triads),
            drmap_simple: self.drmap.simple_dist(&other.drmap)?,
            drmap_emd: self.drmap.emd_dist(&other.drmap, solver)?,
        })
    }

    /// Fingerprints `candidate` against `self` and returns the distances between the two.
    pub fn compare_net<S: TransportSolver + ?Sized>(
        &self,
        candidate: &mut Net,
        config: &FingerprintConfig,
        solver: &S,
    ) -> Result<Distances> {
        let fingerprint = self.compute_candidate(candidate, config)?;
        self.compare(&fingerprint, solver)
    }

    /// Averages the floored distances from `self` to `config.null_samples` degree-preserving
    /// random graphs built from `reference`, the graph `self` was computed from.
    pub fn null_model_distances<S, R>(
        &self,
        reference: &Net,
        config: &FingerprintConfig,
        solver: &S,
        rng: &mut R,
    ) -> Result<Distances>
    where
        S: TransportSolver + ?Sized,
        R: Rng + ?Sized,
    {
        config.validate()?;

        let mut samples = Vec::with_capacity(config.null_samples);
        for _ in 0..config.null_samples {
            let mut null_model = Net::random_with_degree_sequence(reference, rng);
            samples.push(self.compare_net(&mut null_model, config, solver)?.floored());
        }

        Distances::mean(&samples)
            .ok_or_else(|| Error::InvalidConfig("null_samples must be positive".to_owned()))
    }

    //
    // Private
    //

    fn build(net: &Net, config: &FingerprintConfig, bounds: RankBounds) -> Result<Self> {
        let mut drmap = net.drmap_with_limits(
            config.bins,
            bounds.min_pr_in,
            bounds.max_pr_in,
            bounds.min_pr_out,
            bounds.max_pr_out,
        )?;

        if config.log_scale {
            drmap.log_scale();
        }

        if config.normalize_max {
            drmap.normalize_max();
        }

        Ok(Self {
            triads: net.triad_profile(),
            drmap,
            bounds,
        })
    }
}

/// Returns the average distances between a graph and degree-preserving random graphs built from
/// it.
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use synthetic::{
///     emd::MinCostFlow,
///     fingerprint::{compare_to_null_model, FingerprintConfig},
///     graph::Net,
/// };
///
/// let mut net = Net::new();
/// let nodes: Vec<_> = (0..4).map(|_| net.add_node(0)).collect();
/// net.add_edge(nodes[0], nodes[1], 0);
/// net.add_edge(nodes[1], nodes[2], 0);
/// net.add_edge(nodes[2], nodes[3], 0);
///
/// let config = FingerprintConfig {
///     null_samples: 5,
///     ..Default::default()
/// };
/// let mut rng = StdRng::seed_from_u64(0);
/// let distances =
///     compare_to_null_model(&mut net, &config, &MinCostFlow::default(), &mut rng).unwrap();
///
/// // Averages of floored distances are never zero.
/// assert!(distances.triads > 0.0);
/// ```
pub fn compare_to_null_model<S, R>(
    reference: &mut Net,
    config: &FingerprintConfig,
    solver: &S,
    rng: &mut R,
) -> Result<Distances>
where
    S: TransportSolver + ?Sized,
    R: Rng + ?Sized,
{
    let fingerprint = Fingerprint::compute(reference, config)?;
    let distances = fingerprint.null_model_distances(reference, config, solver, rng)?;

    debug!(
        samples = config.null_samples,
        triads = distances.triads,
        drmap_simple = distances.drmap_simple,
        drmap_emd = distances.drmap_emd,
        "compared against null model"
    );

    Ok(distances)
}

/// Compares a candidate graph against a reference, alone and relative to the reference's null
/// model.
pub fn relative_distances<S, R>(
    reference: &mut Net,
    candidate: &mut Net,
    config: &FingerprintConfig,
    solver: &S,
    rng: &mut R,
) -> Result<RelativeDistances>
where
    S: TransportSolver + ?Sized,
    R: Rng + ?Sized,
{
    let fingerprint = Fingerprint::compute(reference, config)?;
    let null_model = fingerprint.null_model_distances(reference, config, solver, rng)?;
    let absolute = fingerprint.compare_net(candidate, config, solver)?;

    Ok(RelativeDistances {
        relative: absolute.relative_to(&null_model),
        absolute,
        null_model,
    })
}
