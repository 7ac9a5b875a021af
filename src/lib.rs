//! # Throttler
//!
//! Throttler is a token-bucket throughput throttler for async conduits and
//! function calls. It regulates the rate at which values flow through a
//! channel-like conduit and, by extension, the rate at which arbitrary
//! function invocations occur.
//!
//! ## Building blocks
//!
//! * [`ThrottledConduitFactory`] - shares one rate budget across any number
//!   of throttled conduits.
//! * [`throttle_conduit`] - convenience: build a factory and apply it once.
//! * [`FunctionThrottler`] - wraps arbitrary callables so each invocation
//!   consumes one token from a shared budget.
//!
//! ## Rate specification
//!
//! A rate is expressed as `(rate, unit)` plus optional `burst` (burstiness,
//! i.e. how many tokens the bucket may hold beyond one filler tick) and
//! `granularity` (how finely the rate is shaped within one unit of time —
//! see [`Granularity`]). [`TimeUnit::Month`] is defined as exactly 31 days,
//! not a calendar month.
//!
//! ## What this crate does not do
//!
//! It does not guarantee sub-10ms rate precision, does not provide
//! scheduling fairness beyond FIFO token consumption on a single conduit,
//! does not persist state, does not back-pressure the upstream beyond the
//! natural blocking of the conduit transport, and is not a distributed rate
//! limiter.

mod bucket;
mod error;
mod factory;
mod filler;
mod function_adapter;
mod piper;
mod rate;
mod units;

pub use error::ThrottleError;
pub use factory::{
    make_throttled_conduit_factory, throttle_conduit, ThrottleOpts, ThrottledConduitFactory,
};
pub use function_adapter::{make_function_throttler, FunctionThrottler, Throttled};
pub use rate::{Granularity, RateScalars, RateSpec};
pub use units::TimeUnit;
