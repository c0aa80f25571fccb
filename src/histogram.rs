//! A module for working with 2D histograms and their distances.

use std::fmt;

use nalgebra::{DMatrix, Point2};

use crate::{
    emd::TransportSolver,
    error::{Error, Result},
};

/// A square grid of bins over a horizontal and a vertical value range.
///
/// Bins are addressed `(x, y)`, `x` along the horizontal axis. Accessors don't clamp, callers map
/// values to valid bins first.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram2D {
    /// Row `y`, column `x`.
    data: DMatrix<f64>,
    bin_number: usize,
    min_val_hor: f64,
    max_val_hor: f64,
    min_val_ver: f64,
    max_val_ver: f64,
}

/// A sparse distribution of weighted points, the input of a transport distance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signature {
    pub points: Vec<Point2<f64>>,
    pub weights: Vec<f64>,
}

impl Signature {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the total weight of the signature.
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }
}

impl Histogram2D {
    /// Creates a zeroed `bin_number × bin_number` histogram.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::histogram::Histogram2D;
    ///
    /// let hist = Histogram2D::new(10, -1.0, 1.0, -1.0, 1.0).unwrap();
    /// assert_eq!(hist.total(), 0.0);
    /// assert!(Histogram2D::new(0, -1.0, 1.0, -1.0, 1.0).is_err());
    /// ```
    pub fn new(
        bin_number: usize,
        min_val_hor: f64,
        max_val_hor: f64,
        min_val_ver: f64,
        max_val_ver: f64,
    ) -> Result<Self> {
        if bin_number == 0 {
            return Err(Error::InvalidBinCount);
        }

        Ok(Self {
            data: DMatrix::zeros(bin_number, bin_number),
            bin_number,
            min_val_hor,
            max_val_hor,
            min_val_ver,
            max_val_ver,
        })
    }

    pub fn bin_number(&self) -> usize {
        self.bin_number
    }

    pub fn min_val_hor(&self) -> f64 {
        self.min_val_hor
    }

    pub fn max_val_hor(&self) -> f64 {
        self.max_val_hor
    }

    pub fn min_val_ver(&self) -> f64 {
        self.min_val_ver
    }

    pub fn max_val_ver(&self) -> f64 {
        self.max_val_ver
    }

    /// Sets every bin to zero.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// # Panics
    ///
    /// Panics if `x` or `y` is out of range.
    pub fn set_value(&mut self, x: usize, y: usize, value: f64) {
        self.data[(y, x)] = value;
    }

    /// Adds one to a bin.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is out of range.
    pub fn inc_value(&mut self, x: usize, y: usize) {
        self.data[(y, x)] += 1.0;
    }

    /// # Panics
    ///
    /// Panics if `x` or `y` is out of range.
    pub fn get_value(&self, x: usize, y: usize) -> f64 {
        self.data[(y, x)]
    }

    /// Replaces every positive bin with its natural log.
    pub fn log_scale(&mut self) {
        self.data.apply(|value| {
            if *value > 0.0 {
                *value = value.ln();
            }
        });
    }

    /// Returns the sum of all bins.
    pub fn total(&self) -> f64 {
        self.data.sum()
    }

    /// Returns the largest bin value, or `0.0` if no bin is positive.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Divides every bin by the largest one. Does nothing if no bin is positive.
    pub fn normalize_max(&mut self) {
        let max = self.max();
        if max <= 0.0 {
            return;
        }

        self.data.unscale_mut(max);
    }

    /// Divides every bin by the total. Does nothing if the total isn't positive.
    pub fn normalize_total(&mut self) {
        let total = self.total();
        if total <= 0.0 {
            return;
        }

        self.data.unscale_mut(total);
    }

    /// Sets every positive bin to one.
    pub fn binary(&mut self) {
        self.data.apply(|value| {
            if *value > 0.0 {
                *value = 1.0;
            }
        });
    }

    /// Returns the sum of the absolute bin-wise differences.
    ///
    /// Both histograms must have the same resolution and ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::histogram::Histogram2D;
    ///
    /// let mut a = Histogram2D::new(2, 0.0, 1.0, 0.0, 1.0).unwrap();
    /// a.set_value(0, 0, 1.0);
    /// a.set_value(1, 1, 3.0);
    /// let b = Histogram2D::new(2, 0.0, 1.0, 0.0, 1.0).unwrap();
    ///
    /// assert_eq!(a.simple_dist(&a).unwrap(), 0.0);
    /// assert_eq!(a.simple_dist(&b).unwrap(), 4.0);
    /// ```
    pub fn simple_dist(&self, other: &Self) -> Result<f64> {
        if self.bin_number != other.bin_number {
            return Err(Error::BinMismatch {
                left: self.bin_number,
                right: other.bin_number,
            });
        }

        if self.ranges() != other.ranges() {
            return Err(Error::RangeMismatch);
        }

        Ok((&self.data - &other.data).abs().sum())
    }

    /// Converts the positive bins into weighted points in value space.
    ///
    /// A bin `(x, y)` becomes the point `(x * interval_hor + min_val_hor, y * interval_ver +
    /// min_val_ver)` weighted by its value, empty and negative bins are skipped. Points are
    /// ordered by `x`, then `y`.
    pub fn emd_signature(&self) -> Signature {
        let interval_hor = (self.max_val_hor - self.min_val_hor) / self.bin_number as f64;
        let interval_ver = (self.max_val_ver - self.min_val_ver) / self.bin_number as f64;

        let mut signature = Signature::default();
        for x in 0..self.bin_number {
            for y in 0..self.bin_number {
                let value = self.get_value(x, y);
                if value > 0.0 {
                    signature.points.push(Point2::new(
                        x as f64 * interval_hor + self.min_val_hor,
                        y as f64 * interval_ver + self.min_val_ver,
                    ));
                    signature.weights.push(value);
                }
            }
        }

        signature
    }

    /// Returns the earth mover's distance between the two histograms, with the Euclidean distance
    /// between bin points as ground distance.
    ///
    /// Histograms of different shapes can be compared since their signatures are expressed in
    /// value space. Fails if the solver can't move all the mass.
    ///
    /// # Examples
    ///
    /// ```
    /// use synthetic::{emd::MinCostFlow, histogram::Histogram2D};
    ///
    /// let mut a = Histogram2D::new(4, 0.0, 4.0, 0.0, 4.0).unwrap();
    /// let mut b = a.clone();
    /// a.set_value(0, 0, 1.0);
    /// b.set_value(3, 0, 1.0);
    ///
    /// let dist = a.emd_dist(&b, &MinCostFlow::default()).unwrap();
    /// assert!((dist - 3.0).abs() < 1e-9);
    /// ```
    pub fn emd_dist<S>(&self, other: &Self, solver: &S) -> Result<f64>
    where
        S: TransportSolver + ?Sized,
    {
        let a = self.emd_signature();
        let b = other.emd_signature();

        solver.solve(&a, &b, &|p: &Point2<f64>, q: &Point2<f64>| {
            nalgebra::distance(p, q)
        })
    }

    //
    // Private
    //

    fn ranges(&self) -> [f64; 4] {
        [
            self.min_val_hor,
            self.max_val_hor,
            self.min_val_ver,
            self.max_val_ver,
        ]
    }
}

impl fmt::Display for Histogram2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.bin_number {
            for x in 0..self.bin_number {
                write!(f, "{:.6}\t", self.get_value(x, y))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
