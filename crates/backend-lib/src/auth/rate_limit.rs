// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Failed-login lockout, keyed by username.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of failed attempts before lockout
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (5 minutes)
pub const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

/// How often the server sweeps stale entries
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct AttemptEntry {
    failed_attempts: u32,
    last_failure: Instant,
    lockout_expiry: Option<Instant>,
}

/// Rate limiter for login attempts
#[derive(Debug, Clone)]
pub struct AuthRateLimiter {
    attempts: Arc<DashMap<String, AttemptEntry>>,
    /// Zero disables the limiter
    max_attempts: u32,
    lockout_duration: Duration,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT_DURATION)
    }
}

impl AuthRateLimiter {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration,
        }
    }

    /// Record a failed login for `username`
    pub fn record_failed_attempt(&self, username: &str) {
        if self.max_attempts == 0 {
            return;
        }
        let now = Instant::now();
        let mut entry = self
            .attempts
            .entry(username.to_string())
            .or_insert_with(|| AttemptEntry {
                failed_attempts: 0,
                last_failure: now,
                lockout_expiry: None,
            });

        // An expired lockout starts a fresh count.
        if entry.lockout_expiry.is_some_and(|expiry| now >= expiry) {
            entry.failed_attempts = 0;
            entry.lockout_expiry = None;
        }

        entry.failed_attempts += 1;
        entry.last_failure = now;

        if entry.failed_attempts >= self.max_attempts && entry.lockout_expiry.is_none() {
            entry.lockout_expiry = Some(now + self.lockout_duration);
            tracing::warn!(
                username,
                attempts = entry.failed_attempts,
                lockout_secs = self.lockout_duration.as_secs(),
                "username locked out after repeated login failures"
            );
            metrics::counter!(crate::metrics::LOGIN_LOCKOUT).increment(1);
        }
    }

    /// Forget past failures after a successful login
    pub fn record_success(&self, username: &str) {
        self.attempts.remove(username);
    }

    /// True while `username` may attempt a login
    pub fn check_rate_limit(&self, username: &str) -> bool {
        match self.attempts.get(username) {
            Some(entry) => entry.lockout_expiry.map_or(true, |expiry| Instant::now() >= expiry),
            None => true,
        }
    }

    /// Drop expired lockouts and entries idle for a day
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.attempts.retain(|_, entry| match entry.lockout_expiry {
            Some(expiry) => now < expiry,
            None => now.duration_since(entry.last_failure) < Duration::from_secs(24 * 60 * 60),
        });
    }

    /// Run [`cleanup`](Self::cleanup) every `every` on a background task
    pub fn spawn_cleanup(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                limiter.cleanup();
                tracing::debug!(tracked = limiter.attempts.len(), "auth rate limiter cleanup");
            }
        })
    }
}
