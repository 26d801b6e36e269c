//! Transactional access to the repositories.
//!
//! Every record-manager operation opens one [`RepositoryScope`], runs its
//! checks and writes through it, and commits. Dropping a scope without
//! committing discards its writes.

use async_trait::async_trait;

use crate::company::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::user::repository::UserRepository;

pub mod memory;
pub mod seaorm;

pub use memory::MemoryStore;
pub use seaorm::SeaOrmStore;

/// Opens transactional scopes over a backing store.
#[async_trait]
pub trait RepositoryProvider: Send + Sync + 'static {
    type Scope: RepositoryScope;

    async fn begin(&self) -> Result<Self::Scope, ServiceError>;
}

/// One unit of work: repository accessors plus commit.
#[async_trait]
pub trait RepositoryScope: Send + Sync {
    fn companies(&self) -> &dyn CompanyRepository;
    fn users(&self) -> &dyn UserRepository;

    async fn commit(self) -> Result<(), ServiceError>;
}
