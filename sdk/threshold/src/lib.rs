//! Quorum Threshold Reconstruction
//!
//! Recovers a secret shared with a k-of-n polynomial scheme from shares whose
//! y-coordinates are written in arbitrary bases.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   decode     │──▶│ combinations │──▶│   lagrange   │──▶│    tally     │
//! │ JSON → Point │   │  k-subsets   │   │ f(0) exactly │   │ majority vote│
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! Every subset of genuine shares interpolates to the same secret, so as
//! long as genuine subsets outnumber colliding corrupted ones the most
//! frequent whole-number result is the secret.

pub mod combinations;
pub mod decode;
pub mod error;
pub mod lagrange;
pub mod reconstruct;
pub mod serde_utils;
pub mod shares;
pub mod tally;

pub use combinations::{Combinations, binomial};
pub use decode::{decode_document, decode_share, decode_value};
pub use error::{Result, ThresholdError};
pub use lagrange::{basis_at_zero, interpolate_at_zero};
pub use reconstruct::{Reconstruction, Reconstructor, reconstruct_secret};
pub use shares::{Point, ShareSet, Subsets};
pub use tally::{Leader, Tally};

pub use quorum_rational::{BigRational, RationalError};
