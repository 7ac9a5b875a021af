//! Piper: consumes one token, then forwards exactly one value from the
//! input conduit to the output conduit. Repeats until the input closes.
//!
//! Exactly-one-forward-per-token is the core invariant here. The earlier
//! design variant that consumes one token and then forwards `token_value`
//! messages is deliberately not implemented here: batching
//! belongs to the Filler, not the Piper.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::bucket::{Bucket, Taken};

/// Spawn a piper task joining `input` to a freshly created output channel
/// of the given capacity, gated by `bucket`.
///
/// Termination ordering: on input close, the output is closed
/// first (so the caller reading it sees end-of-stream), then the bucket is
/// closed (so the Filler stops). On bucket close with the input still
/// open, only the output is closed — the input is caller-owned and is left
/// alone.
pub fn spawn_piper<T: Send + 'static>(
    bucket: Arc<Bucket>,
    mut input: mpsc::Receiver<T>,
    output_capacity: usize,
) -> (mpsc::Receiver<T>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(output_capacity);

    let handle = tokio::spawn(async move {
        debug!("piper started");
        loop {
            if bucket.take().await == Taken::Closed {
                debug!("piper observed closed bucket, stopping");
                return;
            }

            let value = match input.recv().await {
                Some(value) => value,
                None => {
                    debug!("piper observed closed input, closing output and bucket");
                    drop(tx);
                    bucket.close();
                    return;
                }
            };

            if tx.send(value).await.is_err() {
                debug!("piper observed closed output, closing bucket");
                bucket.close();
                return;
            }
        }
    });

    (rx, handle)
}
