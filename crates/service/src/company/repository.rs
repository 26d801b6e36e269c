use async_trait::async_trait;

use super::domain::{Company, CompanyFields};
use crate::errors::ServiceError;

/// Persistence operations the company record manager relies on.
///
/// Implementations run inside the transactional scope handed out by a
/// [`RepositoryProvider`](crate::store::RepositoryProvider).
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert when `id` is `None`, otherwise overwrite the record with that id.
    async fn save(&self, id: Option<i32>, fields: CompanyFields) -> Result<Company, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Company>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Company>, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;

    async fn exists_by_name(&self, name: &str) -> Result<bool, ServiceError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError>;
    async fn exists_by_name_excluding_id(&self, name: &str, id: i32) -> Result<bool, ServiceError>;
    async fn exists_by_email_excluding_id(&self, email: &str, id: i32) -> Result<bool, ServiceError>;

    /// Number of users currently attached to the company.
    async fn count_users(&self, id: i32) -> Result<u64, ServiceError>;
}
