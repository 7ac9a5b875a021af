use std::time::Instant;

use throttler::{make_function_throttler, ThrottleOpts, TimeUnit};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Pace calls to `+` at 10 calls/second.
    let throttler = make_function_throttler(10.0, TimeUnit::Second, ThrottleOpts::default())
        .expect("valid rate spec");
    let add = throttler.wrap(|(a, b): (i32, i32)| a + b);

    println!("Calling the paced function 20 times back-to-back");
    let start = Instant::now();
    for _ in 0..20 {
        let sum = add.call((1, 1)).await;
        assert_eq!(sum, 2);
    }
    let elapsed = start.elapsed().as_secs_f64();

    // Elapsed time should be roughly 2 seconds.
    println!("Elapsed {elapsed:.2}s");
}
