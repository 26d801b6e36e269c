//! Optional read-through cache of company responses keyed by id.
//!
//! Every id carries a generation that `invalidate` bumps. Readers take the
//! generation before opening their store scope and fill the cache only if it
//! is still the same afterwards, so a write that lands in between is never
//! overwritten by what the reader saw.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use configs::CacheConfig;
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::debug;

use crate::company::domain::CompanyResponse;

/// Generation of an id that has never been invalidated.
pub const FRESH: u64 = 0;

struct Inner {
    entries: Cache<i32, CompanyResponse>,
    generations: Mutex<HashMap<i32, u64>>,
}

#[derive(Clone)]
pub struct CompanyCache {
    inner: Option<Arc<Inner>>,
}

impl CompanyCache {
    pub fn new(cfg: &CacheConfig) -> Self {
        if !cfg.enabled {
            return Self::disabled();
        }
        let entries = Cache::builder()
            .max_capacity(cfg.max_capacity)
            .time_to_live(Duration::from_secs(cfg.ttl_secs))
            .build();
        Self { inner: Some(Arc::new(Inner { entries, generations: Mutex::new(HashMap::new()) })) }
    }

    pub fn disabled() -> Self { Self { inner: None } }

    pub fn is_enabled(&self) -> bool { self.inner.is_some() }

    pub async fn get(&self, id: i32) -> Option<CompanyResponse> {
        let hit = self.inner.as_ref()?.entries.get(&id).await;
        if hit.is_some() {
            debug!(company_id = id, "company_cache_hit");
        }
        hit
    }

    /// Current generation of `id`; take it before reading the store.
    pub async fn generation(&self, id: i32) -> u64 {
        match &self.inner {
            Some(inner) => inner.generations.lock().await.get(&id).copied().unwrap_or(FRESH),
            None => FRESH,
        }
    }

    /// Store `company` unless its id was invalidated since generation `seen`.
    /// Returns whether the entry was written.
    pub async fn put_if_current(&self, company: &CompanyResponse, seen: u64) -> bool {
        let Some(inner) = &self.inner else { return false };
        let generations = inner.generations.lock().await;
        let current = generations.get(&company.id_company).copied().unwrap_or(FRESH);
        if current != seen {
            debug!(company_id = company.id_company, seen, current, "company_cache_fill_skipped");
            return false;
        }
        inner.entries.insert(company.id_company, company.clone()).await;
        true
    }

    pub async fn invalidate(&self, id: i32) {
        if let Some(inner) = &self.inner {
            let mut generations = inner.generations.lock().await;
            *generations.entry(id).or_insert(FRESH) += 1;
            inner.entries.invalidate(&id).await;
        }
    }
}

impl Default for CompanyCache {
    fn default() -> Self { Self::new(&CacheConfig::default()) }
}
