//! Bucket: a bounded, closable FIFO-like container of opaque token
//! markers, shared between one Filler and one-or-more Pipers.
//!
//! Only the *presence* of tokens matters, so the bucket is represented as a
//! count rather than a queue of real values — this is an implementation
//! detail, not a semantic change: `offer`/`take`/`close` behave exactly as
//! described below.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Notify;
use tracing::trace;

/// Result of a [`Bucket::take`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taken {
    /// A token was consumed.
    Token,
    /// The bucket is closed and will never yield a token again.
    Closed,
}

/// A bounded, closable token container.
///
/// Drop-on-overflow is the critical semantic: [`Bucket::offer`] never blocks
/// and never evicts an existing token to make room for a new one. It simply
/// discards the incoming token when the bucket is full.
#[derive(Debug)]
pub struct Bucket {
    capacity: u64,
    count: AtomicU64,
    closed: AtomicBool,
    notify: Notify,
}

impl Bucket {
    /// Create an empty bucket with the given capacity.
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            count: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Offer a single token.
    ///
    /// Returns `true` if the bucket is open (whether or not the token was
    /// actually admitted — a full bucket silently drops it), `false` if the
    /// bucket is closed.
    pub fn offer(&self) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }

        let mut current = self.count.load(Ordering::Acquire);
        loop {
            if current >= self.capacity {
                trace!(capacity = self.capacity, "bucket full, dropping token");
                return true;
            }
            match self.count.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.notify.notify_one();
                    return true;
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Take a single token, blocking until one is available or the bucket
    /// closes.
    pub async fn take(&self) -> Taken {
        loop {
            let mut current = self.count.load(Ordering::Acquire);
            while current > 0 {
                match self.count.compare_exchange_weak(
                    current,
                    current - 1,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(_) => return Taken::Token,
                    Err(observed) => current = observed,
                }
            }

            if self.closed.load(Ordering::Acquire) {
                return Taken::Closed;
            }

            // Register for a wakeup before re-checking, to avoid missing a
            // notification raised between our last load and this wait.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.count.load(Ordering::Acquire) > 0 || self.closed.load(Ordering::Acquire) {
                continue;
            }
            notified.await;
        }
    }

    /// Close the bucket. Pending and future `take` calls observe end of
    /// stream; future `offer` calls return `false`.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            trace!("bucket closed");
            self.notify.notify_waiters();
        }
    }

    /// Whether the bucket has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Current outstanding token count. Exposed for tests and diagnostics;
    /// not part of the bucket's external contract.
    pub fn len(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}
