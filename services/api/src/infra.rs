use health_risk::config::RateLimitConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Client records untouched for this long are dropped by the pruning task.
pub(crate) const CLIENT_IDLE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) limiter: Arc<InMemoryRateLimiter>,
}

/// Outcome of charging one request against a client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RateDecision {
    Allowed { limit: u32, remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug)]
struct ClientWindow {
    requests: VecDeque<Instant>,
    last_seen: Instant,
}

/// Sliding-window request counter keyed by client.
#[derive(Debug)]
pub(crate) struct InMemoryRateLimiter {
    config: RateLimitConfig,
    clients: Mutex<HashMap<String, ClientWindow>>,
}

impl InMemoryRateLimiter {
    pub(crate) fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn config(&self) -> RateLimitConfig {
        self.config
    }

    pub(crate) fn check(&self, client: &str, now: Instant) -> RateDecision {
        let mut guard = self.clients.lock().expect("rate limiter mutex poisoned");
        let window = guard
            .entry(client.to_string())
            .or_insert_with(|| ClientWindow {
                requests: VecDeque::new(),
                last_seen: now,
            });

        while let Some(oldest) = window.requests.front() {
            if now.saturating_duration_since(*oldest) >= self.config.window {
                window.requests.pop_front();
            } else {
                break;
            }
        }
        window.last_seen = now;

        let used = window.requests.len() as u32;
        if used >= self.config.max_requests {
            return RateDecision::Limited {
                retry_after: self.config.window,
            };
        }

        window.requests.push_back(now);
        RateDecision::Allowed {
            limit: self.config.max_requests,
            remaining: self.config.max_requests - used - 1,
        }
    }

    /// Drop clients idle for at least `idle`; returns how many were removed.
    pub(crate) fn prune(&self, now: Instant, idle: Duration) -> usize {
        let mut guard = self.clients.lock().expect("rate limiter mutex poisoned");
        let before = guard.len();
        guard.retain(|_, window| now.saturating_duration_since(window.last_seen) < idle);
        before - guard.len()
    }

    pub(crate) fn tracked_clients(&self) -> usize {
        self.clients
            .lock()
            .expect("rate limiter mutex poisoned")
            .len()
    }
}
