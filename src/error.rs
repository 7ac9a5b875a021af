//! Validation errors. Surfaced synchronously at construction time,
//! before any worker task is spawned.

use thiserror::Error;

/// Errors that can occur while constructing a rate specification.
///
/// There are no operational errors: once construction succeeds, closing the
/// input conduit is normal termination and a dropped token on overflow is
/// silent by design.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ThrottleError {
    /// `rate` must be a positive, finite number.
    #[error("rate must be a positive, finite number, got {0}")]
    InvalidRate(f64),

    /// `burst` must be a non-negative integer.
    #[error("burst must be a non-negative integer, got {0}")]
    InvalidBurst(i64),

    /// `granularity` (as an integer) must be at least 1.
    #[error("granularity must be >= 1, got {0}")]
    InvalidGranularity(i64),
}
