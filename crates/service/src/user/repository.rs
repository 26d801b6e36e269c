use async_trait::async_trait;

use super::domain::{User, UserFields};
use crate::errors::ServiceError;

/// Persistence operations the user record manager relies on.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert when `id` is `None`, otherwise overwrite the record with that id.
    async fn save(&self, id: Option<i32>, fields: UserFields) -> Result<User, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn find_by_company(&self, company_id: i32) -> Result<Vec<User>, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError>;
}
