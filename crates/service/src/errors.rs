use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn not_found_id(entity: &str, id: i32) -> Self {
        Self::NotFound(format!("{} not found with id: {}", entity, id))
    }

    /// Caller supplied input that cannot be processed as-is.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Model(models::errors::ModelError::Validation(_)))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Model(models::errors::ModelError::Validation(_)) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Hash(_) => 1101,
            ServiceError::Db(_) => 1200,
            ServiceError::Model(models::errors::ModelError::Db(_)) => 1200,
        }
    }
}

/// Constraint violations reported by the store mean a concurrent writer won
/// the uniqueness/reference race; they surface as conflicts.
impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                ServiceError::Conflict(format!("unique constraint violated: {}", msg))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                ServiceError::Conflict(format!("foreign key constraint violated: {}", msg))
            }
            _ => ServiceError::Db(e.to_string()),
        }
    }
}
