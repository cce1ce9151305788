//! Explicit session storage for bridging pipeline runs.
//!
//! Callers that hand results across requests inject a store rather than
//! relying on process-wide globals. Entries expire; reading an expired
//! key behaves as a miss.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Key→value storage with per-entry expiry, injected as a collaborator.
pub trait SessionStore: Send + Sync {
    fn put(&self, key: &str, value: serde_json::Value, ttl: Duration);
    fn get(&self, key: &str) -> Option<serde_json::Value>;
    fn remove(&self, key: &str);
}

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// In-memory store with lazy expiry. Suitable for a single process;
/// servers bring their own implementation.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn put(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        let mut entries = self.entries.lock().expect("store lock");
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().expect("store lock");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("store lock");
        entries.remove(key);
    }
}
