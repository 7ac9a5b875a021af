//! Rate model: turns a user-facing `(rate, unit)` pair plus optional
//! `burst`/`granularity` into the three scalars the rest of the crate runs
//! on: `sleep_interval_ms`, `token_value`, `bucket_capacity`.

use crate::error::ThrottleError;
use crate::units::TimeUnit;

/// The quantum of emission shaping.
///
/// A granularity of `Messages(1)` shapes emission per message. A
/// granularity equal to the full rate unit (e.g. `Unit(TimeUnit::Second)`
/// for a `rate` expressed per second) disables intra-unit shaping: all of
/// one unit's worth of messages become available at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Granularity {
    /// An explicit count of messages, must be >= 1.
    Messages(u64),
    /// The number of messages expected within one unit of this time, at
    /// the target rate.
    Unit(TimeUnit),
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Messages(1)
    }
}

/// Validated constructor arguments for a throttled conduit or function
/// throttler (constructing a [`RateSpec`] is the only place
/// input is checked).
#[derive(Debug, Clone, Copy)]
pub struct RateSpec {
    pub rate: f64,
    pub unit: TimeUnit,
    pub burst: u64,
    pub granularity: Granularity,
}

impl RateSpec {
    /// Validate and build a rate specification.
    ///
    /// # Errors
    /// Returns [`ThrottleError`] for a non-positive/non-finite `rate`, or an
    /// out-of-range `granularity`. `burst` is a `u64` at the type level so a
    /// negative burst is a compile error rather than a runtime one; this
    /// tightens the "negative or non-integer burst" case to a type
    /// constraint (see DESIGN.md).
    pub fn new(
        rate: f64,
        unit: TimeUnit,
        burst: Option<u64>,
        granularity: Option<Granularity>,
    ) -> Result<Self, ThrottleError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ThrottleError::InvalidRate(rate));
        }

        let granularity = granularity.unwrap_or_default();
        if let Granularity::Messages(g) = granularity {
            if g < 1 {
                return Err(ThrottleError::InvalidGranularity(g as i64));
            }
        }

        Ok(Self {
            rate,
            unit,
            burst: burst.unwrap_or(0),
            granularity,
        })
    }
}

/// Derived scalars, immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateScalars {
    /// Period between filler insertions, floored at 10ms.
    pub sleep_interval_ms: u64,
    /// Number of tokens a single filler tick deposits.
    pub token_value: u64,
    /// Maximum outstanding tokens the bucket may hold.
    pub bucket_capacity: u64,
}

/// Run the rate-derivation algorithm in the exact order it is specified:
/// provisional sleep, then token_value, then final sleep. This order is
/// load-bearing: it lets `token_value` grow to compensate when
/// the 10ms floor pushes `sleep` above its ideal value.
pub fn derive_scalars(spec: &RateSpec) -> RateScalars {
    let rate_per_ms = spec.rate / spec.unit.to_ms();

    let g = match spec.granularity {
        Granularity::Messages(g) => g.max(1),
        Granularity::Unit(unit) => ((unit.to_ms() * rate_per_ms).round() as u64).max(1),
    };

    let provisional_sleep = (g as f64 / rate_per_ms).max(10.0);
    let token_value = ((provisional_sleep * rate_per_ms).round() as u64).max(g);
    let sleep_interval_ms = (provisional_sleep.round() as u64).max(1);
    let bucket_capacity = spec.burst.max(token_value);

    RateScalars {
        sleep_interval_ms,
        token_value,
        bucket_capacity,
    }
}
