//! Decoded shares
//!
//! A [`Point`] is one `(x, y)` share on the secret polynomial; a [`ShareSet`]
//! bundles the threshold with every available point.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::combinations::Combinations;
use crate::error::{Result, ThresholdError};
use crate::serde_utils::{deserialize_decimal, serialize_decimal};

/// Smallest threshold a share set may carry
pub const MIN_THRESHOLD: usize = 2;

/// A decoded share
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    #[serde(
        serialize_with = "serialize_decimal",
        deserialize_with = "deserialize_decimal"
    )]
    pub x: BigInt,
    #[serde(
        serialize_with = "serialize_decimal",
        deserialize_with = "deserialize_decimal"
    )]
    pub y: BigInt,
}

impl Point {
    pub fn new(x: impl Into<BigInt>, y: impl Into<BigInt>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Threshold `k` plus the ordered points available for reconstruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareSet {
    threshold: usize,
    points: Vec<Point>,
}

impl ShareSet {
    /// Create a share set, checking `k >= 2` and `n >= k`.
    ///
    /// Duplicate x-coordinates are accepted here; they are reported per
    /// subset by the interpolator.
    pub fn new(threshold: usize, points: Vec<Point>) -> Result<Self> {
        if threshold < MIN_THRESHOLD {
            return Err(ThresholdError::InvalidThreshold { k: threshold });
        }
        if points.len() < threshold {
            return Err(ThresholdError::InsufficientShares {
                got: points.len(),
                need: threshold,
            });
        }
        Ok(Self { threshold, points })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lazily enumerate every k-subset, lexicographic by point index
    pub fn subsets(&self) -> Subsets<'_> {
        Subsets {
            points: &self.points,
            indices: Combinations::new(self.points.len(), self.threshold),
        }
    }
}

/// Iterator over the k-subsets of a [`ShareSet`], borrowing its points
#[derive(Debug, Clone)]
pub struct Subsets<'a> {
    points: &'a [Point],
    indices: Combinations,
}

impl<'a> Subsets<'a> {
    /// Total number of subsets, C(n, k)
    pub fn total(&self) -> BigInt {
        self.indices.total()
    }
}

impl<'a> Iterator for Subsets<'a> {
    type Item = Vec<&'a Point>;

    fn next(&mut self) -> Option<Self::Item> {
        let points = self.points;
        self.indices
            .next()
            .map(|combo| combo.iter().map(|&i| &points[i]).collect())
    }
}
