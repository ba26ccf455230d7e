use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of single-use, strictly increasing request nonces
///
/// Any `Fn() -> u64` closure is a generator, which lets callers plug in a
/// counter shared with other processes using the same API key.
pub trait NonceGenerator: Send + Sync {
    fn next_nonce(&self) -> u64;
}

impl<F> NonceGenerator for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn next_nonce(&self) -> u64 {
        self()
    }
}

/// Wall-clock nonce in microseconds that never repeats or goes backwards
///
/// Calls landing in the same microsecond, or a clock stepping back, advance
/// the last issued value by one instead.
#[derive(Debug, Default)]
pub struct MonotonicNonce {
    last: AtomicU64,
}

impl MonotonicNonce {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    fn now_micros() -> u64 {
        u64::try_from(Utc::now().timestamp_micros()).unwrap_or_default()
    }
}

impl NonceGenerator for MonotonicNonce {
    fn next_nonce(&self) -> u64 {
        let now = Self::now_micros();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}
