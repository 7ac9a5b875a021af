//! Function adapter: wraps arbitrary callables so each invocation is
//! gated by one token-passage through a shared throttled conduit.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::error::ThrottleError;
use crate::factory::{ThrottleOpts, ThrottledConduitFactory};
use crate::units::TimeUnit;

struct FunctionThrottlerInner {
    pacing_tx: mpsc::Sender<()>,
    paced_rx: Mutex<mpsc::Receiver<()>>,
    // Keeps the bucket/filler alive for as long as any `Throttled` wrapper
    // built from this throttler is still around.
    _factory: ThrottledConduitFactory<()>,
}

/// Shared pacing budget for any number of wrapped callables.
///
/// All callables wrapped via [`FunctionThrottler::wrap`] on the same
/// instance share one pacing conduit and therefore one combined invocation
/// rate budget.
#[derive(Clone)]
pub struct FunctionThrottler {
    inner: Arc<FunctionThrottlerInner>,
}

impl FunctionThrottler {
    /// Build a function throttler pacing invocations at `rate` per `unit`.
    pub fn new(rate: f64, unit: TimeUnit, opts: ThrottleOpts) -> Result<Self, ThrottleError> {
        let factory: ThrottledConduitFactory<()> =
            ThrottledConduitFactory::new(rate, unit, opts)?;
        let (pacing_tx, pacing_rx) = mpsc::channel(1);
        let paced_rx = factory.throttle(pacing_rx);

        Ok(Self {
            inner: Arc::new(FunctionThrottlerInner {
                pacing_tx,
                paced_rx: Mutex::new(paced_rx),
                _factory: factory,
            }),
        })
    }

    /// Wrap a callable `f` so each call to [`Throttled::call`] performs one
    /// rate-limited pacing step before invoking `f`.
    pub fn wrap<F>(&self, f: F) -> Throttled<F> {
        Throttled {
            inner: self.inner.clone(),
            f,
        }
    }

    /// Block until one pacing slot is available, without invoking a
    /// callable. Exposed so callers can pace arbitrary code blocks, not
    /// just bare functions.
    pub async fn pace(&self) {
        // Send may itself block on the capacity-1 pacing conduit if another
        // caller's invocation is already in flight.
        let _ = self.inner.pacing_tx.send(()).await;
        let _ = self.inner.paced_rx.lock().await.recv().await;
    }
}

/// A callable paced by a shared [`FunctionThrottler`].
pub struct Throttled<F> {
    inner: Arc<FunctionThrottlerInner>,
    f: F,
}

impl<F, Args, R> Throttled<F>
where
    F: Fn(Args) -> R,
{
    /// Pace, then invoke the wrapped callable and return its result.
    pub async fn call(&self, args: Args) -> R {
        let _ = self.inner.pacing_tx.send(()).await;
        let _ = self.inner.paced_rx.lock().await.recv().await;
        (self.f)(args)
    }
}

/// Convenience constructor for `make_function_throttler`.
pub fn make_function_throttler(
    rate: f64,
    unit: TimeUnit,
    opts: ThrottleOpts,
) -> Result<FunctionThrottler, ThrottleError> {
    FunctionThrottler::new(rate, unit, opts)
}
