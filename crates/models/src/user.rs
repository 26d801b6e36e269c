use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{company, errors, validation};

/// Position a user holds inside their company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "CEO")]
    Ceo,
    #[sea_orm(string_value = "CTO")]
    Cto,
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    #[sea_orm(string_value = "HR")]
    Hr,
    #[sea_orm(string_value = "EMPLOYEE")]
    Employee,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<Date>,
    pub role: Option<Role>,
    pub company_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Company,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::belongs_to(company::Entity)
                .from(Column::CompanyId)
                .to(company::Column::Id)
                .into(),
        }
    }
}

impl Related<company::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    validation::require_name(name)
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    validation::require_email(email)
}

pub fn validate_password(password: &str) -> Result<(), errors::ModelError> {
    if password.is_empty() {
        return Err(errors::ModelError::Validation("password required".into()));
    }
    Ok(())
}
