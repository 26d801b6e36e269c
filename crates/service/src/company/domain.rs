use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use models::company as company_model;
use crate::errors::ServiceError;
use crate::user::domain::UserResponse;

/// Mutable attributes of a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFields {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub founded_date: Option<NaiveDate>,
}

/// Stored company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: i32,
    pub fields: CompanyFields,
}

impl From<company_model::Model> for Company {
    fn from(m: company_model::Model) -> Self {
        Self {
            id: m.id,
            fields: CompanyFields {
                name: m.name,
                email: m.email,
                phone_number: m.phone_number,
                address: m.address,
                website: m.website,
                founded_date: m.founded_date,
            },
        }
    }
}

/// Create/update input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, alias = "foundedDate", with = "slash_date")]
    pub founded_date: Option<NaiveDate>,
}

impl CompanyRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        company_model::validate_name(&self.name)?;
        company_model::validate_email(&self.email)?;
        Ok(())
    }

    pub fn into_fields(self) -> CompanyFields {
        CompanyFields {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number,
            address: self.address,
            website: self.website,
            founded_date: self.founded_date,
        }
    }
}

/// Company as returned to callers, with its users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub id_company: i32,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    #[serde(default, with = "slash_date")]
    pub founded_date: Option<NaiveDate>,
    #[serde(default)]
    pub users: Vec<UserResponse>,
}

impl CompanyResponse {
    pub fn from_parts(company: Company, users: Vec<UserResponse>) -> Self {
        let f = company.fields;
        Self {
            id_company: company.id,
            name: f.name,
            email: f.email,
            phone_number: f.phone_number,
            address: f.address,
            website: f.website,
            founded_date: f.founded_date,
            users,
        }
    }
}

/// Founding dates travel as `yyyy/MM/dd`; ISO `yyyy-MM-dd` is accepted on input.
pub mod slash_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y/%m/%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => NaiveDate::parse_from_str(&s, FORMAT)
                .or_else(|_| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid date {s:?}: {e}"))),
        }
    }
}
