//! Quorum Exact Fractions
//!
//! Arbitrary-precision rational numbers used by Lagrange interpolation.
//!
//! Every value is kept in lowest terms with the sign carried by the
//! numerator, so two fractions are equal exactly when their fields are.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use thiserror::Error;

/// Fraction arithmetic errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RationalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("{0} is not a whole number")]
    NotIntegral(BigRational),
}

/// Result type for fraction operations
pub type Result<T> = std::result::Result<T, RationalError>;

/// An exact fraction `numer / denom` in lowest terms, `denom > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigRational {
    numer: BigInt,
    denom: BigInt,
}

impl BigRational {
    /// The fraction `v / 1`
    pub fn from_integer(v: BigInt) -> Self {
        Self {
            numer: v,
            denom: BigInt::one(),
        }
    }

    /// Build `num / den`, reduced and sign-normalised.
    ///
    /// Fails with [`RationalError::DivisionByZero`] when `den` is zero.
    pub fn from_fraction(num: BigInt, den: BigInt) -> Result<Self> {
        if den.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        Ok(Self::reduced(num, den))
    }

    pub fn zero() -> Self {
        Self::from_integer(BigInt::zero())
    }

    pub fn one() -> Self {
        Self::from_integer(BigInt::one())
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    /// True iff the reduced denominator is 1
    pub fn is_whole(&self) -> bool {
        self.denom.is_one()
    }

    /// The integer value, or [`RationalError::NotIntegral`] for a proper fraction
    pub fn to_integer(&self) -> Result<BigInt> {
        if self.is_whole() {
            Ok(self.numer.clone())
        } else {
            Err(RationalError::NotIntegral(self.clone()))
        }
    }

    /// Consuming variant of [`BigRational::to_integer`]
    pub fn into_integer(self) -> Result<BigInt> {
        if self.is_whole() {
            Ok(self.numer)
        } else {
            Err(RationalError::NotIntegral(self))
        }
    }

    /// `(a.n * b.d + b.n * a.d) / (a.d * b.d)`, reduced
    pub fn add(&self, other: &Self) -> Self {
        let numer = &self.numer * &other.denom + &other.numer * &self.denom;
        let denom = &self.denom * &other.denom;
        Self::reduced(numer, denom)
    }

    /// `(a.n * b.n) / (a.d * b.d)`, reduced
    pub fn multiply(&self, other: &Self) -> Self {
        let numer = &self.numer * &other.numer;
        let denom = &self.denom * &other.denom;
        Self::reduced(numer, denom)
    }

    // Callers guarantee `den != 0`.
    fn reduced(num: BigInt, den: BigInt) -> Self {
        debug_assert!(!den.is_zero());

        let common = num.gcd(&den);
        let (mut numer, mut denom) = if common.is_one() {
            (num, den)
        } else {
            (num / &common, den / &common)
        };

        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }

        Self { numer, denom }
    }
}

impl Default for BigRational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for BigRational {
    fn from(v: BigInt) -> Self {
        Self::from_integer(v)
    }
}

impl From<i64> for BigRational {
    fn from(v: i64) -> Self {
        Self::from_integer(BigInt::from(v))
    }
}

impl TryFrom<BigRational> for BigInt {
    type Error = RationalError;

    fn try_from(value: BigRational) -> Result<Self> {
        value.into_integer()
    }
}

impl<'a> Add<&'a BigRational> for &'a BigRational {
    type Output = BigRational;

    fn add(self, rhs: &BigRational) -> BigRational {
        BigRational::add(self, rhs)
    }
}

impl Mul for BigRational {
    type Output = BigRational;

    fn mul(self, rhs: BigRational) -> BigRational {
        self.multiply(&rhs)
    }
}

impl<'a> Mul<&'a BigRational> for &'a BigRational {
    type Output = BigRational;

    fn mul(self, rhs: &BigRational) -> BigRational {
        self.multiply(rhs)
    }
}

impl PartialOrd for BigRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigRational {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplying preserves order.
        (&self.numer * &other.denom).cmp(&(&other.numer * &self.denom))
    }
}

impl fmt::Display for BigRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}
