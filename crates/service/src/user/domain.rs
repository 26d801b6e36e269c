use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use models::user as user_model;
pub use models::user::Role;
use crate::errors::ServiceError;

/// Attributes of a user as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub role: Option<Role>,
    pub company_id: i32,
}

/// Stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub fields: UserFields,
}

impl From<user_model::Model> for User {
    fn from(m: user_model::Model) -> Self {
        Self {
            id: m.id,
            fields: UserFields {
                name: m.name,
                email: m.email,
                password_hash: m.password,
                phone_number: m.phone_number,
                address: m.address,
                date_of_birth: m.date_of_birth,
                role: m.role,
                company_id: m.company_id,
            },
        }
    }
}

/// Create/update input. `password` is plaintext and only ever hashed.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "dateOfBirth")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, alias = "companyId")]
    pub company_id: Option<i32>,
}

impl std::fmt::Debug for UserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .field("company_id", &self.company_id)
            .finish_non_exhaustive()
    }
}

impl UserRequest {
    /// Checks shared by create and update.
    pub fn validate(&self) -> Result<(), ServiceError> {
        user_model::validate_name(&self.name)?;
        user_model::validate_email(&self.email)?;
        Ok(())
    }

    /// Create additionally needs a password and an owning company.
    pub fn validate_for_create(&self) -> Result<i32, ServiceError> {
        self.validate()?;
        user_model::validate_password(self.password.as_deref().unwrap_or_default())?;
        self.company_id
            .ok_or_else(|| ServiceError::Validation("company_id required".into()))
    }

    /// The new password, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// User as returned to callers; there is no password field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub role: Option<Role>,
    pub company_id: i32,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        let f = u.fields;
        Self {
            id: u.id,
            name: f.name,
            email: f.email,
            phone_number: f.phone_number,
            address: f.address,
            date_of_birth: f.date_of_birth,
            role: f.role,
            company_id: f.company_id,
        }
    }
}
