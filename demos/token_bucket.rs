use std::time::Instant;

use throttler::{throttle_conduit, ThrottleOpts, TimeUnit};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Throttle a conduit to 100 messages/second, with minor burstiness.
    let (tx, rx) = mpsc::channel(10_000);
    let mut out = throttle_conduit(
        rx,
        100.0,
        TimeUnit::Second,
        ThrottleOpts::default().with_burst(10),
    )
    .expect("valid rate spec");

    tokio::spawn(async move {
        for v in 0..1_000u32 {
            if tx.send(v).await.is_err() {
                break;
            }
        }
    });

    let start = Instant::now();
    let mut received = 0;
    while out.recv().await.is_some() {
        received += 1;
    }
    let elapsed = start.elapsed().as_secs_f64();

    println!("Received {received} messages in {elapsed:.2}s");
    println!("Average pass rate {:.1}/s", received as f64 / elapsed);
}
