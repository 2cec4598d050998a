//! Secret aggregation by majority vote
//!
//! Every k-subset of a [`ShareSet`] is interpolated at zero. Whole-number
//! results are tallied and the most frequent one is the secret. Subsets with
//! duplicate x-coordinates contribute nothing; only an empty tally is fatal.

use log::{debug, info, warn};
use num_bigint::BigInt;
use serde::Serialize;

use crate::error::{Result, ThresholdError};
use crate::lagrange::interpolate_at_zero;
use crate::serde_utils::{serialize_decimal, serialize_votes};
use crate::shares::ShareSet;
use crate::tally::Tally;

/// Outcome of one reconstruction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconstruction {
    #[serde(serialize_with = "serialize_decimal")]
    pub secret: BigInt,
    /// Subsets that voted for `secret`
    pub votes: u64,
    /// Subsets enumerated
    pub combinations: u64,
    /// Subsets dropped for duplicate x-coordinates
    pub skipped: u64,
    /// Subsets whose interpolation was not a whole number
    pub non_integral: u64,
    /// Another candidate reached `votes` as well
    pub tied: bool,
    /// Every candidate with its count, in first-occurrence order
    #[serde(serialize_with = "serialize_votes")]
    pub tally: Vec<(BigInt, u64)>,
}

/// Configurable driver for [`reconstruct_secret`]
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    max_combinations: Option<u64>,
}

impl Reconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse share sets with more than `limit` subsets
    pub fn with_max_combinations(mut self, limit: Option<u64>) -> Self {
        self.max_combinations = limit;
        self
    }

    /// Interpolate every subset and pick the majority secret
    pub fn run(&self, shares: &ShareSet) -> Result<Reconstruction> {
        let subsets = shares.subsets();
        let total = subsets.total();

        if let Some(limit) = self.max_combinations {
            if total > BigInt::from(limit) {
                return Err(ThresholdError::TooManyCombinations {
                    count: total.to_string(),
                    limit,
                });
            }
        }

        debug!(
            "reconstructing from n={} k={} ({} combinations)",
            shares.len(),
            shares.threshold(),
            total
        );

        let mut tally = Tally::new();
        let mut combinations = 0u64;
        let mut skipped = 0u64;
        let mut non_integral = 0u64;

        for subset in subsets {
            combinations += 1;
            match interpolate_at_zero(&subset) {
                Ok(candidate) => match candidate.into_integer() {
                    Ok(secret) => {
                        debug!("subset #{} votes for {}", combinations, secret);
                        tally.record(secret);
                    }
                    Err(e) => {
                        debug!("subset #{} discarded: {}", combinations, e);
                        non_integral += 1;
                    }
                },
                Err(e) if !e.is_fatal() => {
                    debug!("subset #{} skipped: {}", combinations, e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let leader = tally
            .leader()
            .ok_or(ThresholdError::NoIntegerSecret { combinations })?;

        if leader.tied {
            warn!(
                "secret {} tied at {} votes, keeping first candidate seen",
                leader.secret, leader.votes
            );
        }
        info!(
            "secret reconstructed with {}/{} votes ({} candidates, {} skipped, {} non-integral)",
            leader.votes,
            combinations,
            tally.len(),
            skipped,
            non_integral
        );

        Ok(Reconstruction {
            secret: leader.secret.clone(),
            votes: leader.votes,
            combinations,
            skipped,
            non_integral,
            tied: leader.tied,
            tally: tally.entries().to_vec(),
        })
    }
}

/// Reconstruct the secret shared in `shares`.
///
/// Fails with [`ThresholdError::NoIntegerSecret`] when no subset
/// interpolates to a whole number.
pub fn reconstruct_secret(shares: &ShareSet) -> Result<BigInt> {
    Reconstructor::new().run(shares).map(|r| r.secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shares::Point;

    #[test]
    fn test_exact_threshold() {
        let shares = ShareSet::new(
            3,
            vec![Point::new(1, 6), Point::new(2, 7), Point::new(3, 10)],
        )
        .unwrap();
        let result = Reconstructor::new().run(&shares).unwrap();
        assert_eq!(result.secret, BigInt::from(7));
        assert_eq!(result.votes, 1);
        assert_eq!(result.combinations, 1);
        assert!(!result.tied);
    }

    #[test]
    fn test_no_integer_secret() {
        // Both lines cross zero at a half.
        let shares = ShareSet::new(2, vec![Point::new(1, 1), Point::new(3, 2)]).unwrap();
        let err = reconstruct_secret(&shares).unwrap_err();
        assert_eq!(err, ThresholdError::NoIntegerSecret { combinations: 1 });
    }

    #[test]
    fn test_all_subsets_duplicate() {
        let shares = ShareSet::new(2, vec![Point::new(4, 1), Point::new(4, 2)]).unwrap();
        let err = Reconstructor::new().run(&shares).unwrap_err();
        assert_eq!(err, ThresholdError::NoIntegerSecret { combinations: 1 });
    }

    #[test]
    fn test_combination_limit() {
        let points = (1..=6).map(|x| Point::new(x, 2 * x + 1)).collect();
        let shares = ShareSet::new(3, points).unwrap();

        let err = Reconstructor::new()
            .with_max_combinations(Some(19))
            .run(&shares)
            .unwrap_err();
        assert_eq!(
            err,
            ThresholdError::TooManyCombinations {
                count: "20".into(),
                limit: 19
            }
        );

        let ok = Reconstructor::new()
            .with_max_combinations(Some(20))
            .run(&shares)
            .unwrap();
        assert_eq!(ok.secret, BigInt::from(1));
        assert_eq!(ok.votes, 20);
    }

    #[test]
    fn test_combination_limit_beyond_u64() {
        let points = (1..=100).map(|x| Point::new(x, x)).collect();
        let shares = ShareSet::new(50, points).unwrap();
        let err = Reconstructor::new()
            .with_max_combinations(Some(u64::MAX))
            .run(&shares)
            .unwrap_err();
        assert_eq!(
            err,
            ThresholdError::TooManyCombinations {
                count: "100891344545564193334812497256".into(),
                limit: u64::MAX
            }
        );
    }

    #[test]
    fn test_tie_resolves_to_first_subset() {
        // k=2 over three points, each pair gives a different integer secret.
        // (1,1),(2,3) -> -1 ; (1,1),(3,4) -> -1/2 ; (2,3),(3,4) -> 1
        let shares = ShareSet::new(
            2,
            vec![Point::new(1, 1), Point::new(2, 3), Point::new(3, 4)],
        )
        .unwrap();
        let result = Reconstructor::new().run(&shares).unwrap();
        assert_eq!(result.secret, BigInt::from(-1));
        assert!(result.tied);
        assert_eq!(result.non_integral, 1);
        assert_eq!(result.tally.len(), 2);
    }
}
