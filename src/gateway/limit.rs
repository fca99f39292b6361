use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::{AppError, AppResult};

/// Requests admitted for one client since `started`.
struct Window {
    started: Instant,
    count: u64,
}

impl Window {
    fn expired(&self, now: Instant, length: Duration) -> bool {
        now.saturating_duration_since(self.started) >= length
    }

    /// Starts a fresh window once the current one has run out, then counts the request if there is room.
    fn try_admit(&mut self, now: Instant, max: u64, length: Duration) -> bool {
        if self.expired(now, length) {
            self.started = now;
            self.count = 0;
        }

        if self.count >= max {
            return false;
        }
        self.count += 1;
        true
    }
}

/// Expired windows are swept after this many acquisitions.
const SWEEP_EVERY: u64 = 256;

/// Allows `max` requests per fixed `window` for each client IP.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<IpAddr, Window>>,
    acquisitions: Arc<AtomicU64>,
    max: u64,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max: u64, window: Duration) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            acquisitions: Arc::new(AtomicU64::new(0)),
            max,
            window,
        }
    }

    pub fn try_acquire(&self, client: IpAddr) -> bool {
        self.try_acquire_at(client, Instant::now())
    }

    fn try_acquire_at(&self, client: IpAddr, now: Instant) -> bool {
        // No shard lock may be held here: `retain` locks every shard.
        if self.acquisitions.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == SWEEP_EVERY - 1 {
            self.sweep(now);
        }

        let mut window = self.windows.entry(client).or_insert_with(|| Window {
            started: now,
            count: 0,
        });

        window.try_admit(now, self.max, self.window)
    }

    /// Drops clients whose window has run out.
    fn sweep(&self, now: Instant) {
        self.windows.retain(|_, window| !window.expired(now, self.window));
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.windows.len()
    }
}

pub(crate) async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    // Without connect info (in-process callers) everyone shares one bucket.
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !limiter.try_acquire(client) {
        tracing::warn!(%client, "rate limited");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}
