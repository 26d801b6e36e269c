#![cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::Notify;

use crate::company::domain::{Company, CompanyFields};
use crate::company::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::store::memory::MemoryScope;
use crate::store::seaorm::SeaOrmScope;
use crate::store::{MemoryStore, RepositoryProvider, RepositoryScope, SeaOrmStore};
use crate::user::domain::{User, UserFields};
use crate::user::repository::UserRepository;

/// Fresh migrated in-memory database per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn get_store() -> Result<SeaOrmStore, anyhow::Error> {
    Ok(SeaOrmStore::new(get_db().await?))
}

/// Memory store that can hold the next scope right after it commits.
#[derive(Default)]
pub struct GatedStore {
    inner: MemoryStore,
    armed: AtomicBool,
    gate: Arc<Gate>,
}

#[derive(Default)]
pub struct Gate {
    reached: Notify,
    release: Notify,
}

impl GatedStore {
    pub fn new() -> Self { Self::default() }

    /// The next scope opened pauses after its commit until [`GatedStore::release`].
    pub fn hold_next_commit(&self) { self.armed.store(true, Ordering::SeqCst); }

    /// Wait until the held scope has committed.
    pub async fn committed(&self) { self.gate.reached.notified().await; }

    pub fn release(&self) { self.gate.release.notify_one(); }
}

#[async_trait]
impl RepositoryProvider for GatedStore {
    type Scope = GatedScope;

    async fn begin(&self) -> Result<GatedScope, ServiceError> {
        let inner = self.inner.begin().await?;
        let gate = self.armed.swap(false, Ordering::SeqCst).then(|| Arc::clone(&self.gate));
        Ok(GatedScope { inner, gate })
    }
}

pub struct GatedScope {
    inner: MemoryScope,
    gate: Option<Arc<Gate>>,
}

#[async_trait]
impl RepositoryScope for GatedScope {
    fn companies(&self) -> &dyn CompanyRepository { self.inner.companies() }
    fn users(&self) -> &dyn UserRepository { self.inner.users() }

    async fn commit(self) -> Result<(), ServiceError> {
        self.inner.commit().await?;
        if let Some(gate) = self.gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
        Ok(())
    }
}

/// SeaORM store whose existence checks never find a row, leaving uniqueness
/// to the schema constraints as when two writers pass their checks together.
pub struct UncheckedStore(pub SeaOrmStore);

#[async_trait]
impl RepositoryProvider for UncheckedStore {
    type Scope = UncheckedScope;

    async fn begin(&self) -> Result<UncheckedScope, ServiceError> {
        Ok(UncheckedScope(self.0.begin().await?))
    }
}

pub struct UncheckedScope(SeaOrmScope);

#[async_trait]
impl RepositoryScope for UncheckedScope {
    fn companies(&self) -> &dyn CompanyRepository { self }
    fn users(&self) -> &dyn UserRepository { self }

    async fn commit(self) -> Result<(), ServiceError> { self.0.commit().await }
}

#[async_trait]
impl CompanyRepository for UncheckedScope {
    async fn save(&self, id: Option<i32>, fields: CompanyFields) -> Result<Company, ServiceError> {
        self.0.companies().save(id, fields).await
    }
    async fn find_by_id(&self, id: i32) -> Result<Option<Company>, ServiceError> {
        self.0.companies().find_by_id(id).await
    }
    async fn find_all(&self) -> Result<Vec<Company>, ServiceError> { self.0.companies().find_all().await }
    async fn delete(&self, id: i32) -> Result<bool, ServiceError> { self.0.companies().delete(id).await }
    async fn exists_by_name(&self, _: &str) -> Result<bool, ServiceError> { Ok(false) }
    async fn exists_by_email(&self, _: &str) -> Result<bool, ServiceError> { Ok(false) }
    async fn exists_by_name_excluding_id(&self, _: &str, _: i32) -> Result<bool, ServiceError> { Ok(false) }
    async fn exists_by_email_excluding_id(&self, _: &str, _: i32) -> Result<bool, ServiceError> { Ok(false) }
    async fn count_users(&self, id: i32) -> Result<u64, ServiceError> { self.0.companies().count_users(id).await }
}

#[async_trait]
impl UserRepository for UncheckedScope {
    async fn save(&self, id: Option<i32>, fields: UserFields) -> Result<User, ServiceError> {
        self.0.users().save(id, fields).await
    }
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> { self.0.users().find_by_id(id).await }
    async fn find_all(&self) -> Result<Vec<User>, ServiceError> { self.0.users().find_all().await }
    async fn find_by_company(&self, company_id: i32) -> Result<Vec<User>, ServiceError> {
        self.0.users().find_by_company(company_id).await
    }
    async fn delete(&self, id: i32) -> Result<bool, ServiceError> { self.0.users().delete(id).await }
    async fn exists_by_email(&self, _: &str) -> Result<bool, ServiceError> { Ok(false) }
}
