use std::sync::Arc;

use configs::CacheConfig;
use sea_orm::DatabaseConnection;
use service::cache::CompanyCache;
use service::company::CompanyService;
use service::store::SeaOrmStore;
use service::user::UserService;

/// Shared handler state; both record managers see the same store and cache.
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<CompanyService<SeaOrmStore>>,
    pub users: Arc<UserService<SeaOrmStore>>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, cache_cfg: &CacheConfig) -> Self {
        let store = Arc::new(SeaOrmStore::new(db));
        let cache = CompanyCache::new(cache_cfg);
        Self {
            companies: Arc::new(CompanyService::new(Arc::clone(&store), cache.clone())),
            users: Arc::new(UserService::new(store, cache)),
        }
    }
}
