//! Token bucket request pacer.
//!
//! Every upstream call made by a [`ProviderFetcher`](super::ProviderFetcher)
//! first waits on the pacer, so concurrent fan-out cannot exceed the
//! provider's declared [`RateLimit`].

use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::capabilities::RateLimit;

#[derive(Debug)]
struct TokenBucket {
    /// Current number of available tokens.
    tokens: f64,
    /// Last time tokens were refilled.
    last_refill: Instant,
    /// Last time a token was handed out.
    last_grant: Option<Instant>,
    /// Token refill rate (tokens per second).
    rate: f64,
    /// Maximum bucket capacity.
    capacity: f64,
    min_delay: Duration,
}

impl TokenBucket {
    fn new(limit: &RateLimit) -> Self {
        let capacity = f64::from(limit.burst_capacity.max(1));
        Self {
            tokens: capacity,
            last_refill: Instant::now(),
            last_grant: None,
            rate: f64::from(limit.requests_per_minute.max(1)) / 60.0,
            capacity,
            min_delay: limit.min_delay,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Take a token if one is available and the minimum spacing has passed.
    /// Otherwise return how long to wait before trying again.
    fn try_take(&mut self, now: Instant) -> Result<(), Duration> {
        self.refill(now);

        let spacing_wait = self
            .last_grant
            .map(|granted| (granted + self.min_delay).saturating_duration_since(now))
            .unwrap_or(Duration::ZERO);

        let token_wait = if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.rate)
        };

        let wait = spacing_wait.max(token_wait);
        if wait > Duration::ZERO {
            return Err(wait);
        }

        self.tokens -= 1.0;
        self.last_grant = Some(now);
        Ok(())
    }
}

/// Paces requests to a single provider.
#[derive(Debug)]
pub struct RequestPacer {
    bucket: Mutex<TokenBucket>,
}

impl RequestPacer {
    pub fn new(limit: &RateLimit) -> Self {
        Self {
            bucket: Mutex::new(TokenBucket::new(limit)),
        }
    }

    /// Wait until a request may be issued.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                match bucket.try_take(Instant::now()) {
                    Ok(()) => return,
                    Err(wait) => wait,
                }
            };

            debug!("Request pacer: waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}
