//! Concurrent consumers against one counter must never overshoot the cap.

use std::sync::Arc;

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use game_core::CharacterId;
use runtime::quota::{
    Clock, CounterStore, InMemoryCounterStore, ManualClock, QuotaKind, QuotaLimiter,
};

fn limiter(cap: u64) -> QuotaLimiter {
    let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(now));
    let store: Arc<dyn CounterStore> = Arc::new(InMemoryCounterStore::new(clock.clone()));
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();
    QuotaLimiter::new(QuotaKind::Lifespan, cap, offset, Duration::hours(48), store, clock)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_large_requests_cannot_both_pass() {
    let limiter = limiter(200);
    let character = CharacterId(1);

    let (a, b) = tokio::join!(
        {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.consume(character, 150).await })
        },
        {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.consume(character, 150).await })
        },
    );
    let results = [a.unwrap().unwrap(), b.unwrap().unwrap()];

    assert_eq!(results.iter().filter(|result| result.accepted).count(), 1);
    let rejected = results.iter().find(|result| !result.accepted).unwrap();
    assert_eq!(rejected.remaining, 50);

    let status = limiter.peek(character).await.unwrap();
    assert_eq!(status.consumed, 150);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_unit_requests_accept_exactly_the_cap() {
    const CAP: u64 = 37;
    const REQUESTS: usize = 120;

    let limiter = limiter(CAP);
    let character = CharacterId(2);

    let handles: Vec<_> = (0..REQUESTS)
        .map(|_| {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.consume(character, 1).await })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().accepted {
            accepted += 1;
        }
    }

    assert_eq!(accepted, CAP);
    let status = limiter.peek(character).await.unwrap();
    assert_eq!(status.consumed, CAP);
    assert!(status.retreat_locked);
}

#[tokio::test]
async fn characters_do_not_share_counters() {
    let limiter = limiter(10);

    assert!(limiter.consume(CharacterId(1), 10).await.unwrap().accepted);
    let other = limiter.consume(CharacterId(2), 10).await.unwrap();
    assert!(other.accepted);
    assert_eq!(other.remaining, 0);
}
