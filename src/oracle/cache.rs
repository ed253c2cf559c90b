//! Explicit TTL cache for upstream market data.
//!
//! Entries are never evicted on expiry: a stale value stays readable so the
//! caller can fall back to it when the upstream is down. Time comes from an
//! injected [`Clock`], which tests replace with a manually advanced one.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, PartialEq)]
pub enum CacheLookup<V> {
    Fresh(V),
    Stale(V),
    Miss,
}

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

pub struct TtlCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> CacheLookup<V> {
        let entries = self.entries.lock().unwrap();
        match entries.get(key) {
            None => CacheLookup::Miss,
            Some(entry) if self.clock.now().duration_since(entry.stored_at) <= self.ttl => {
                CacheLookup::Fresh(entry.value.clone())
            }
            Some(entry) => CacheLookup::Stale(entry.value.clone()),
        }
    }

    pub fn put(&self, key: K, value: V) {
        let stored_at = self.clock.now();
        self.entries
            .lock()
            .unwrap()
            .insert(key, Entry { stored_at, value });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Clock that only moves when told to.
    pub(crate) struct ManualClock {
        base: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().unwrap()
        }
    }

    #[test]
    fn entries_age_from_fresh_to_stale() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(10), clock.clone());

        assert_eq!(cache.get(&"k"), CacheLookup::Miss);

        cache.put("k", 7);
        assert_eq!(cache.get(&"k"), CacheLookup::Fresh(7));

        clock.advance(Duration::from_secs(10));
        assert_eq!(cache.get(&"k"), CacheLookup::Fresh(7));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&"k"), CacheLookup::Stale(7));
    }

    #[test]
    fn put_resets_the_age() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(10), clock.clone());

        cache.put("k", 1);
        clock.advance(Duration::from_secs(11));
        assert_eq!(cache.get(&"k"), CacheLookup::Stale(1));

        cache.put("k", 2);
        assert_eq!(cache.get(&"k"), CacheLookup::Fresh(2));
    }
}
