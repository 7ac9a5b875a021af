//! End-to-end scenarios from the throttler specification's testable
//! properties section: burst consumption, close propagation, and
//! construction-time validation.

use std::time::{Duration, Instant};

use throttler::{
    make_function_throttler, make_throttled_conduit_factory, throttle_conduit, Granularity,
    ThrottleError, ThrottleOpts, ThrottledConduitFactory, TimeUnit,
};
use tokio::sync::mpsc;

#[tokio::test]
async fn close_propagation_delivers_enqueued_values_then_eof() {
    let (tx, rx) = mpsc::channel(10);
    let mut out = throttle_conduit(rx, 10.0, TimeUnit::Second, ThrottleOpts::default()).unwrap();

    tx.send("hello").await.unwrap();
    drop(tx);

    assert_eq!(out.recv().await, Some("hello"));
    assert_eq!(out.recv().await, None);
}

#[tokio::test]
async fn burst_consumption_completes_well_under_rate_interval() {
    // rate=1000/s, burst=50 -> sleep_interval=10ms (floor), token_value=10,
    // bucket_capacity=50. Idling ~5 filler ticks (per the burst-bound
    // property) fills the bucket to capacity; the next 50 sends
    // then complete without waiting on the bucket, and the 51st blocks for
    // roughly one more tick.
    let factory: ThrottledConduitFactory<u32> = ThrottledConduitFactory::new(
        1000.0,
        TimeUnit::Second,
        ThrottleOpts::default().with_burst(50),
    )
    .unwrap();
    let scalars = factory.scalars();
    assert_eq!(scalars.bucket_capacity, 50);

    let idle = Duration::from_millis(
        scalars.bucket_capacity * scalars.sleep_interval_ms / scalars.token_value + 20,
    );
    tokio::time::sleep(idle).await;

    let (tx, rx) = mpsc::channel(200);
    for v in 0..51u32 {
        tx.send(v).await.unwrap();
    }
    drop(tx);
    let mut out = factory.throttle(rx);

    let start = Instant::now();
    for _ in 0..50 {
        out.recv().await.unwrap();
    }
    let burst_elapsed = start.elapsed();
    assert!(
        burst_elapsed < Duration::from_millis(50),
        "burst of 50 took {burst_elapsed:?}, expected near-instant delivery"
    );

    let restart = Instant::now();
    out.recv().await.unwrap();
    let wait_for_last = restart.elapsed();
    assert!(
        wait_for_last >= Duration::from_millis(5),
        "51st message should wait roughly a filler tick, took {wait_for_last:?}"
    );
}

#[tokio::test]
async fn granularity_widening_releases_a_full_window_at_once() {
    let (tx, rx) = mpsc::channel(20);
    for v in 0..11u32 {
        tx.send(v).await.unwrap();
    }
    drop(tx);

    let opts = ThrottleOpts::default()
        .with_burst(10)
        .with_granularity(Granularity::Messages(10));
    let mut out = throttle_conduit(rx, 10.0, TimeUnit::Second, opts).unwrap();

    let start = Instant::now();
    for _ in 0..10 {
        out.recv().await.unwrap();
    }
    assert!(start.elapsed() < Duration::from_millis(50));

    let eleventh = Instant::now();
    out.recv().await.unwrap();
    assert!(eleventh.elapsed() >= Duration::from_millis(5));
}

#[tokio::test]
async fn invalid_rate_is_rejected_before_any_worker_spawns() {
    let err = make_throttled_conduit_factory::<u32>(0.0, TimeUnit::Second, ThrottleOpts::default())
        .unwrap_err();
    assert!(matches!(err, ThrottleError::InvalidRate(_)));

    let err = make_throttled_conduit_factory::<u32>(-5.0, TimeUnit::Second, ThrottleOpts::default())
        .unwrap_err();
    assert!(matches!(err, ThrottleError::InvalidRate(_)));
}

#[tokio::test]
async fn invalid_granularity_is_rejected() {
    let err = throttler::RateSpec::new(10.0, TimeUnit::Second, None, Some(Granularity::Messages(0)))
        .unwrap_err();
    assert!(matches!(err, ThrottleError::InvalidGranularity(0)));
}

#[tokio::test]
async fn shared_throttling_across_two_callables_converges_on_combined_rate() {
    let throttler = make_function_throttler(
        400.0,
        TimeUnit::Second,
        ThrottleOpts::default().with_burst(10),
    )
    .unwrap();

    let f = throttler.wrap(|x: u32| x + 1);
    let g = throttler.wrap(|x: u32| x + 2);

    let start = Instant::now();
    let mut total = 0;
    for _ in 0..100 {
        let _ = f.call(1).await;
        total += 1;
        let _ = g.call(1).await;
        total += 1;
    }
    let elapsed = start.elapsed().as_secs_f64();
    let observed_rate = total as f64 / elapsed;

    assert!(
        (observed_rate - 400.0).abs() / 400.0 <= 0.3,
        "combined call rate {observed_rate} should track the shared 400/s budget"
    );
}

#[tokio::test]
async fn factory_allows_multiple_inputs_sharing_one_bucket() {
    let factory: ThrottledConduitFactory<u32> =
        ThrottledConduitFactory::new(50.0, TimeUnit::Second, ThrottleOpts::default()).unwrap();

    let (tx1, rx1) = mpsc::channel(100);
    let (tx2, rx2) = mpsc::channel(100);
    for v in 0..20u32 {
        tx1.send(v).await.unwrap();
        tx2.send(v).await.unwrap();
    }
    drop(tx1);
    drop(tx2);

    let mut out1 = factory.throttle(rx1);
    let mut out2 = factory.throttle(rx2);

    let mut received = 0;
    let mut done1 = false;
    let mut done2 = false;
    while !done1 || !done2 {
        tokio::select! {
            v = out1.recv(), if !done1 => match v { Some(_) => received += 1, None => done1 = true },
            v = out2.recv(), if !done2 => match v { Some(_) => received += 1, None => done2 = true },
        }
    }
    assert_eq!(received, 40);
}

#[tokio::test]
async fn closing_one_input_propagates_bucket_closure_to_other_outputs() {
    // A slow rate and a single-token bucket keep both pipers contending for
    // the same scarce token, so the race between "input 1 closes" and
    // "input 2 keeps sending" is realistic rather than resolved instantly.
    let factory: ThrottledConduitFactory<u32> =
        ThrottledConduitFactory::new(20.0, TimeUnit::Second, ThrottleOpts::default()).unwrap();
    assert_eq!(factory.scalars().bucket_capacity, 1);

    let (tx1, rx1) = mpsc::channel(10);
    let (tx2, rx2) = mpsc::channel(1000);

    tx1.send(1u32).await.unwrap();
    drop(tx1);

    // tx2's own input is never closed independently; it keeps sending on
    // its own schedule for as long as anything is still receiving.
    tokio::spawn(async move {
        for v in 0..1000u32 {
            if tx2.send(v).await.is_err() {
                break;
            }
        }
    });

    let mut out1 = factory.throttle(rx1);
    let mut out2 = factory.throttle(rx2);

    // out1's own input closed, so it must report end-of-stream.
    assert_eq!(out1.recv().await, Some(1));
    assert_eq!(out1.recv().await, None);

    // Closing input 1 closes the shared bucket, which must eventually close
    // every other output conduit from the same factory too, even though
    // input 2 was never closed itself.
    let drained = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if out2.recv().await.is_none() {
                return;
            }
        }
    })
    .await;
    assert!(
        drained.is_ok(),
        "out2 should eventually report end-of-stream once the shared bucket closes"
    );
}
