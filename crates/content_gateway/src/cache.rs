//! 带过期的内容缓存
//!
//! 条目在 `now - stored_at < ttl` 时有效。过期条目读取时视为不存在，
//! 仅在需要容量时才被移除。容量满时优先淘汰过期条目，其次是最久未使用的条目。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use contracts::Clock;
use tracing::trace;

struct CacheEntry<V> {
    value: V,
    stored_at: i64,
    last_access: u64,
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    access_seq: u64,
}

/// 容量受限、按条目过期的键值存储
pub struct TtlCache<V> {
    state: Mutex<CacheState<V>>,
    ttl_millis: i64,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// `max_entries` is raised to 1 if zero.
    pub fn new(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                access_seq: 0,
            }),
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            max_entries: max_entries.max(1),
            clock,
        }
    }

    /// Value stored under `key`, if present and not expired
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_millis();
        let mut state = self.lock();
        state.access_seq += 1;
        let seq = state.access_seq;

        let entry = state.entries.get_mut(key)?;
        if now - entry.stored_at >= self.ttl_millis {
            trace!(key, "cache entry expired");
            return None;
        }
        entry.last_access = seq;
        Some(entry.value.clone())
    }

    /// Store `value` under `key`, overwriting any previous entry
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = self.clock.now_millis();
        let mut state = self.lock();
        state.access_seq += 1;
        let seq = state.access_seq;

        if !state.entries.contains_key(&key) && state.entries.len() >= self.max_entries {
            self.make_room(&mut state, now);
        }

        state.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                last_access: seq,
            },
        );
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis as u64)
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    fn make_room(&self, state: &mut CacheState<V>, now: i64) {
        let ttl = self.ttl_millis;
        let before = state.entries.len();
        state.entries.retain(|_, e| now - e.stored_at < ttl);
        if state.entries.len() < before {
            trace!(evicted = before - state.entries.len(), "evicted expired entries");
            return;
        }

        let oldest = state
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            trace!(key = %key, "evicted least recently used entry");
            state.entries.remove(&key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
