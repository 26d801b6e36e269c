//! Demo records inserted at startup when seeding is enabled.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::company::{domain::CompanyRequest, CompanyService};
use crate::errors::ServiceError;
use crate::store::RepositoryProvider;
use crate::user::{domain::{Role, UserRequest}, UserService};

const COMPANIES: [&str; 2] = ["META", "BCG"];
const USERS: [&str; 2] = ["oussama", "yassine"];

/// Counts of records actually inserted by [`seed_demo_data`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub companies: usize,
    pub users: usize,
}

/// Insert two companies and two CEO users attached to the first one.
///
/// Records that already exist are skipped, so running this on every start is safe.
pub async fn seed_demo_data<P: RepositoryProvider>(
    companies: &CompanyService<P>,
    users: &UserService<P>,
) -> Result<SeedReport, ServiceError> {
    let mut report = SeedReport::default();
    let founded = NaiveDate::from_ymd_opt(2001, 11, 12);

    for name in COMPANIES {
        let req = CompanyRequest {
            name: name.to_string(),
            email: format!("{}@gmail.com", name),
            phone_number: Some("0606060606".into()),
            address: Some("casablanca".into()),
            website: Some(format!("www.{}.com", name)),
            founded_date: founded,
        };
        match companies.create(req).await {
            Ok(_) => report.companies += 1,
            Err(ServiceError::Conflict(msg)) => warn!(company = name, %msg, "seed_company_skipped"),
            Err(e) => return Err(e),
        }
    }

    // 用户总是挂在第一个公司下，无论它是本次插入还是已存在
    let Some(owner) = companies.find_all().await?.into_iter().find(|c| c.name == COMPANIES[0]) else {
        warn!(company = COMPANIES[0], "seed_owner_missing");
        return Ok(report);
    };
    let company_id = owner.id_company;

    for name in USERS {
        let req = UserRequest {
            name: name.to_string(),
            email: format!("{}@gmail.com", name),
            phone_number: Some("0606060606".into()),
            password: Some(name.to_string()),
            address: Some("casablanca".into()),
            date_of_birth: founded,
            role: Some(Role::Ceo),
            company_id: Some(company_id),
        };
        match users.create(req).await {
            Ok(_) => report.users += 1,
            Err(ServiceError::Conflict(msg)) => warn!(user = name, %msg, "seed_user_skipped"),
            Err(e) => return Err(e),
        }
    }

    info!(companies = report.companies, users = report.users, "demo_data_seeded");
    Ok(report)
}
