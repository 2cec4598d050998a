//! Lagrange interpolation at zero over exact fractions
//!
//! ```text
//! f(0) = Σ_j  y_j * Π_{m≠j} ( -x_m / (x_j - x_m) )
//! ```
//!
//! Terms are accumulated left to right in subset order.

use num_traits::Zero;
use quorum_rational::BigRational;

use crate::error::{Result, ThresholdError};
use crate::shares::Point;

/// Basis polynomial `L_j` evaluated at zero for point `j` of `points`
///
/// # Panics
///
/// Panics if `j >= points.len()`.
pub fn basis_at_zero(points: &[&Point], j: usize) -> Result<BigRational> {
    let current = points[j];
    let mut basis = BigRational::one();

    for (m, other) in points.iter().enumerate() {
        if m == j {
            continue;
        }
        let denominator = &current.x - &other.x;
        if denominator.is_zero() {
            return Err(ThresholdError::DuplicateCoordinate {
                x: current.x.to_string(),
            });
        }
        let factor = BigRational::from_fraction(-&other.x, denominator)?;
        basis = basis.multiply(&factor);
    }

    Ok(basis)
}

/// Evaluate the unique polynomial of degree `points.len() - 1` through
/// `points` at `x = 0`.
///
/// Fails with [`ThresholdError::DuplicateCoordinate`] when two points share
/// an x-coordinate.
pub fn interpolate_at_zero(points: &[&Point]) -> Result<BigRational> {
    let mut secret = BigRational::zero();

    for (j, point) in points.iter().enumerate() {
        let basis = basis_at_zero(points, j)?;
        let term = BigRational::from_integer(point.y.clone()).multiply(&basis);
        secret = secret.add(&term);
    }

    Ok(secret)
}
