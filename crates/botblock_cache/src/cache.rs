//! Single-flight TTL cache implementation.

use botblock_error::{BotBlockError, BotBlockResult};
use derive_getters::Getters;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// How long an answer (or a failure) stays cached.
///
/// Chosen together with the API's own rate-limit window, so it is not configurable.
pub const CACHE_TTL: Duration = Duration::from_secs(120);

/// Independent key spaces; the same key in two namespaces never collides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CacheNamespace {
    /// `GET /bots/{id}` lookups
    Bot,
    /// `GET /lists[/{site}]` lookups
    List,
}

/// What a cache lookup produced.
#[derive(Debug)]
pub enum CachedValue<V> {
    /// The fetch succeeded
    Available(V),
    /// The fetch failed; no data until the entry expires
    Unavailable(Arc<BotBlockError>),
}

impl<V> CachedValue<V> {
    /// The value, if the fetch succeeded.
    pub fn value(&self) -> Option<&V> {
        match self {
            CachedValue::Available(value) => Some(value),
            CachedValue::Unavailable(_) => None,
        }
    }

    /// The failure that made this entry unavailable.
    pub fn error(&self) -> Option<&BotBlockError> {
        match self {
            CachedValue::Available(_) => None,
            CachedValue::Unavailable(err) => Some(err),
        }
    }

    /// True when the fetch succeeded.
    pub fn is_available(&self) -> bool {
        matches!(self, CachedValue::Available(_))
    }

    /// Discard the failure and keep only the value.
    pub fn into_option(self) -> Option<V> {
        match self {
            CachedValue::Available(value) => Some(value),
            CachedValue::Unavailable(_) => None,
        }
    }

    /// Convert into a result, sharing the failure.
    pub fn into_result(self) -> Result<V, Arc<BotBlockError>> {
        match self {
            CachedValue::Available(value) => Ok(value),
            CachedValue::Unavailable(err) => Err(err),
        }
    }

    /// Map the available value, keeping the failure as is.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> CachedValue<U> {
        match self {
            CachedValue::Available(value) => CachedValue::Available(f(value)),
            CachedValue::Unavailable(err) => CachedValue::Unavailable(err),
        }
    }
}

impl<V: Clone> Clone for CachedValue<V> {
    fn clone(&self) -> Self {
        match self {
            CachedValue::Available(value) => CachedValue::Available(value.clone()),
            CachedValue::Unavailable(err) => CachedValue::Unavailable(Arc::clone(err)),
        }
    }
}

impl<V> From<BotBlockResult<V>> for CachedValue<V> {
    fn from(result: BotBlockResult<V>) -> Self {
        match result {
            Ok(value) => CachedValue::Available(value),
            Err(err) => CachedValue::Unavailable(Arc::new(err)),
        }
    }
}

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry<V> {
    value: CachedValue<V>,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn new(value: CachedValue<V>) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl: CACHE_TTL,
        }
    }

    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.created_at.elapsed())
    }
}

/// Cache key: namespace plus caller key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    namespace: CacheNamespace,
    key: String,
}

/// A slot is empty while its first fetch is in flight.
type Slot<V> = Arc<OnceCell<CacheEntry<V>>>;

/// TTL cache in front of the API's read routes.
///
/// Cloning is cheap and clones share the same entries.
///
/// # Example
///
/// ```
/// use botblock_cache::{CacheNamespace, ReadCache};
/// use botblock_error::BotBlockResult;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache: ReadCache<String> = ReadCache::new();
///
/// let first = cache
///     .get_or_fetch(CacheNamespace::Bot, "1234", false, || async {
///         BotBlockResult::Ok("fetched".to_string())
///     })
///     .await;
/// assert_eq!(first.value().map(String::as_str), Some("fetched"));
///
/// // Served from the cache; the closure is not called again
/// let second = cache
///     .get_or_fetch(CacheNamespace::Bot, "1234", false, || async {
///         BotBlockResult::Ok("refetched".to_string())
///     })
///     .await;
/// assert_eq!(second.value().map(String::as_str), Some("fetched"));
/// # }
/// ```
#[derive(Debug)]
pub struct ReadCache<V> {
    entries: Arc<Mutex<HashMap<CacheKey, Slot<V>>>>,
}

impl<V> Clone for ReadCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for ReadCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ReadCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        debug!(ttl_secs = CACHE_TTL.as_secs(), "Creating new ReadCache");
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of slots, including in-flight and expired ones.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove expired entries. In-flight fetches are kept.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, slot| slot.get().is_none_or(|entry| !entry.is_expired()));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Purged expired cache entries");
        }
        removed
    }
}

impl<V> ReadCache<V>
where
    V: Clone + Send + Sync,
{
    /// Return the cached value for `key`, fetching it on a miss.
    ///
    /// Concurrent callers missing on the same key share one `fetch`. A failed
    /// fetch is cached as [`CachedValue::Unavailable`]. With `bypass` set the
    /// cache is neither read nor written and every call runs `fetch`; a failure
    /// still comes back as [`CachedValue::Unavailable`], for that call only.
    #[instrument(skip(self, fetch))]
    pub async fn get_or_fetch<F, Fut>(
        &self,
        namespace: CacheNamespace,
        key: &str,
        bypass: bool,
        fetch: F,
    ) -> CachedValue<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = BotBlockResult<V>>,
    {
        if bypass {
            debug!("Cache bypassed, fetching directly");
            return fetch().await.into();
        }

        let slot = self.slot(namespace, key);
        let entry = slot
            .get_or_init(|| async move {
                let value = match fetch().await {
                    Ok(value) => CachedValue::Available(value),
                    Err(e) => {
                        warn!(error = %e, "Fetch failed, caching as unavailable");
                        CachedValue::Unavailable(Arc::new(e))
                    }
                };
                CacheEntry::new(value)
            })
            .await;

        debug!(time_remaining = ?entry.time_remaining(), "Cache lookup resolved");
        entry.value().clone()
    }

    /// Find the live slot for a key, or install a fresh one.
    fn slot(&self, namespace: CacheNamespace, key: &str) -> Slot<V> {
        let key = CacheKey {
            namespace,
            key: key.to_string(),
        };
        let mut entries = self.entries.lock();

        if let Some(slot) = entries.get(&key) {
            match slot.get() {
                None => {
                    debug!("Joining in-flight fetch");
                    return Arc::clone(slot);
                }
                Some(entry) if !entry.is_expired() => {
                    debug!("Cache hit");
                    return Arc::clone(slot);
                }
                Some(_) => debug!("Cache entry expired, replacing"),
            }
        } else {
            debug!("Cache miss");
        }

        let slot: Slot<V> = Arc::new(OnceCell::new());
        entries.insert(key, Arc::clone(&slot));
        slot
    }
}
