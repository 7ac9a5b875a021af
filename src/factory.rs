//! Throttled-conduit factory: owns one bucket and one filler, and
//! spawns a fresh Piper per call to [`ThrottledConduitFactory::throttle`].
//!
//! Multiple input conduits passed to the same factory share the bucket and
//! therefore share the rate budget: the union of their emissions obeys the
//! single rate budget (statistical multiplexing).

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::bucket::Bucket;
use crate::error::ThrottleError;
use crate::filler::spawn_filler;
use crate::piper::spawn_piper;
use crate::rate::{derive_scalars, Granularity, RateScalars, RateSpec};
use crate::units::TimeUnit;

/// Default channel capacity used for output conduits when the caller does
/// not request a specific one.
const DEFAULT_CONDUIT_CAPACITY: usize = 1024;

/// Optional construction arguments shared by all of the crate's entry
/// points.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrottleOpts {
    pub burst: Option<u64>,
    pub granularity: Option<Granularity>,
    /// Capacity of output conduits spawned by this factory. Defaults to
    /// [`DEFAULT_CONDUIT_CAPACITY`] when unset.
    pub conduit_capacity: Option<usize>,
}

impl ThrottleOpts {
    pub fn with_burst(mut self, burst: u64) -> Self {
        self.burst = Some(burst);
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    pub fn with_conduit_capacity(mut self, capacity: usize) -> Self {
        self.conduit_capacity = Some(capacity);
        self
    }
}

/// A factory parameterized by one derived rate, owning exactly one bucket
/// and one filler.
pub struct ThrottledConduitFactory<T> {
    bucket: Arc<Bucket>,
    scalars: RateScalars,
    conduit_capacity: usize,
    _filler: JoinHandle<()>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Send + 'static> ThrottledConduitFactory<T> {
    /// Validate `rate`/`unit`/`opts` and start a bucket + filler pair.
    pub fn new(rate: f64, unit: TimeUnit, opts: ThrottleOpts) -> Result<Self, ThrottleError> {
        let spec = RateSpec::new(rate, unit, opts.burst, opts.granularity)?;
        let scalars = derive_scalars(&spec);
        let bucket = Arc::new(Bucket::new(scalars.bucket_capacity));
        let filler = spawn_filler(bucket.clone(), scalars);

        debug!(
            rate,
            ?unit,
            sleep_interval_ms = scalars.sleep_interval_ms,
            token_value = scalars.token_value,
            bucket_capacity = scalars.bucket_capacity,
            "throttled conduit factory constructed"
        );

        Ok(Self {
            bucket,
            scalars,
            conduit_capacity: opts.conduit_capacity.unwrap_or(DEFAULT_CONDUIT_CAPACITY),
            _filler: filler,
            _marker: std::marker::PhantomData,
        })
    }

    /// Spawn a Piper forwarding `input` through this factory's shared
    /// bucket, and return the rate-limited output conduit.
    pub fn throttle(&self, input: mpsc::Receiver<T>) -> mpsc::Receiver<T> {
        let (output, _piper) = spawn_piper(self.bucket.clone(), input, self.conduit_capacity);
        output
    }

    /// The derived scalars this factory is running with.
    pub fn scalars(&self) -> RateScalars {
        self.scalars
    }
}

/// Convenience constructor for `make_throttled_conduit_factory`.
pub fn make_throttled_conduit_factory<T: Send + 'static>(
    rate: f64,
    unit: TimeUnit,
    opts: ThrottleOpts,
) -> Result<ThrottledConduitFactory<T>, ThrottleError> {
    ThrottledConduitFactory::new(rate, unit, opts)
}

/// `throttle_conduit` = factory construction + single application
pub fn throttle_conduit<T: Send + 'static>(
    input: mpsc::Receiver<T>,
    rate: f64,
    unit: TimeUnit,
    opts: ThrottleOpts,
) -> Result<mpsc::Receiver<T>, ThrottleError> {
    let factory = ThrottledConduitFactory::new(rate, unit, opts)?;
    Ok(factory.throttle(input))
}
