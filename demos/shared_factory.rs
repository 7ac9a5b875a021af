use std::time::Instant;

use throttler::{ThrottleOpts, ThrottledConduitFactory, TimeUnit};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // A single factory at 100/s shared by two independent producers. Their
    // combined emission rate, not each one individually, converges to
    // 100/s (statistical multiplexing).
    let factory: ThrottledConduitFactory<u32> =
        ThrottledConduitFactory::new(100.0, TimeUnit::Second, ThrottleOpts::default())
            .expect("valid rate spec");

    let (tx_a, rx_a) = mpsc::channel(10_000);
    let (tx_b, rx_b) = mpsc::channel(10_000);

    tokio::spawn(async move {
        for v in 0..500u32 {
            if tx_a.send(v).await.is_err() {
                break;
            }
        }
    });
    tokio::spawn(async move {
        for v in 0..500u32 {
            if tx_b.send(v).await.is_err() {
                break;
            }
        }
    });

    let mut out_a = factory.throttle(rx_a);
    let mut out_b = factory.throttle(rx_b);

    let start = Instant::now();
    let mut total = 0;
    let mut a_done = false;
    let mut b_done = false;
    while !a_done || !b_done {
        tokio::select! {
            v = out_a.recv(), if !a_done => match v {
                Some(_) => total += 1,
                None => a_done = true,
            },
            v = out_b.recv(), if !b_done => match v {
                Some(_) => total += 1,
                None => b_done = true,
            },
        }
    }
    let elapsed = start.elapsed().as_secs_f64();

    println!("Received {total} messages across two conduits in {elapsed:.2}s");
    println!("Combined rate {:.1}/s (target 100/s)", total as f64 / elapsed);
}
