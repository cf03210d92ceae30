//! Time-bounded memoization of text responses.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::model::ModelResponse;

/// Default lifetime of a cached response.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    response: ModelResponse,
    created_at: Instant,
}

/// Response cache keyed by the exact prompt string.
///
/// Entries are never updated in place and never evicted except by age.
/// Stale entries are ignored on lookup and swept on the next insert.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh response for `prompt`.
    pub fn get(&self, prompt: &str) -> Option<ModelResponse> {
        self.get_at(prompt, Instant::now())
    }

    /// Store `response` for `prompt`.
    pub fn insert(&self, prompt: impl Into<String>, response: ModelResponse) {
        self.insert_at(prompt.into(), response, Instant::now());
    }

    /// Number of entries currently held, stale or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, prompt: &str, now: Instant) -> Option<ModelResponse> {
        let entries = self.lock();
        entries
            .get(prompt)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.response.clone())
    }

    fn insert_at(&self, prompt: String, response: ModelResponse, now: Instant) {
        let mut entries = self.lock();
        entries.retain(|_, entry| !self.is_expired(entry, now));
        entries.insert(
            prompt,
            CacheEntry {
                response,
                created_at: now,
            },
        );
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.created_at) >= self.ttl
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are plain values; a panic mid-insert cannot leave one half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
