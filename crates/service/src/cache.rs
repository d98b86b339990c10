//! Short-lived cache for public listings.
//!
//! Public pages (service list, testimonials, blog index) are read far more
//! often than the admin edits them. Each cache holds one value type keyed by
//! the query that produced it and is cleared on every admin write.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use configs::CacheConfig;
use moka::future::Cache;

#[derive(Clone)]
pub struct ListingCache<V> {
    inner: Cache<String, Arc<V>>,
}

impl<V> ListingCache<V>
where
    V: Send + Sync + 'static,
{
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self { inner: Cache::builder().max_capacity(max_entries).time_to_live(ttl).build() }
    }

    pub fn from_config(cfg: &CacheConfig) -> Self {
        Self::new(cfg.max_entries, Duration::from_secs(cfg.ttl_secs))
    }

    /// Cached value for `key`, or the result of `load` (stored only on success).
    pub async fn get_or_try_load<E, F, Fut>(&self, key: &str, load: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.inner.get(key).await {
            return Ok(hit);
        }
        let value = Arc::new(load().await?);
        self.inner.insert(key.to_string(), value.clone()).await;
        Ok(value)
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl<V> Default for ListingCache<V>
where
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}
