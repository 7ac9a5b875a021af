//! Filler: the periodic task that deposits `token_value` tokens into
//! the bucket every `sleep_interval_ms`, one at a time, until the bucket
//! closes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::bucket::Bucket;
use crate::rate::RateScalars;

/// Spawn the filler task for a bucket.
///
/// Inserting tokens one at a time (rather than all at once) matters only in
/// combination with drop-on-overflow: when the bucket is already full the
/// loop simply keeps dropping and moves straight to the next sleep, it
/// never blocks waiting for room to open up.
pub fn spawn_filler(bucket: Arc<Bucket>, scalars: RateScalars) -> JoinHandle<()> {
    let sleep_interval = Duration::from_millis(scalars.sleep_interval_ms);
    let token_value = scalars.token_value;

    tokio::spawn(async move {
        debug!(
            sleep_interval_ms = scalars.sleep_interval_ms,
            token_value, "filler started"
        );

        loop {
            for _ in 0..token_value {
                if !bucket.offer() {
                    debug!("filler observed closed bucket, stopping");
                    return;
                }
            }
            tokio::time::sleep(sleep_interval).await;
        }
    })
}
