use std::sync::Arc;

use chrono::NaiveDate;

use crate::cache::CompanyCache;
use crate::company::{domain::CompanyRequest, CompanyService};
use crate::errors::ServiceError;
use crate::store::{MemoryStore, RepositoryProvider, SeaOrmStore};
use crate::test_support::{get_store, UncheckedStore};
use crate::user::{domain::{Role, UserRequest}, UserService};

async fn services() -> Result<(CompanyService<SeaOrmStore>, UserService<SeaOrmStore>), anyhow::Error> {
    let store = Arc::new(get_store().await?);
    let cache = CompanyCache::default();
    Ok((
        CompanyService::new(store.clone(), cache.clone()),
        UserService::new(store, cache),
    ))
}

fn company_req(name: &str, email: &str) -> CompanyRequest {
    CompanyRequest {
        name: name.into(),
        email: email.into(),
        phone_number: Some("0606060606".into()),
        address: Some("casablanca".into()),
        website: Some(format!("www.{}.com", name)),
        founded_date: NaiveDate::from_ymd_opt(2001, 11, 12),
    }
}

fn user_req(email: &str, password: Option<&str>, company_id: Option<i32>) -> UserRequest {
    UserRequest {
        name: "oussama".into(),
        email: email.into(),
        phone_number: None,
        password: password.map(str::to_string),
        address: None,
        date_of_birth: NaiveDate::from_ymd_opt(1999, 1, 2),
        role: Some(Role::Cto),
        company_id,
    }
}

#[tokio::test]
async fn company_lifecycle_on_sqlite() -> Result<(), anyhow::Error> {
    let (companies, _) = services().await?;
    let meta = companies.create(company_req("META", "meta@gmail.com")).await?;
    assert_eq!(meta.founded_date, NaiveDate::from_ymd_opt(2001, 11, 12));

    let dup = companies.create(company_req("META", "other@gmail.com")).await.unwrap_err();
    assert!(matches!(dup, ServiceError::Conflict(ref m) if m == "Name already exists"));

    let updated = companies.update(meta.id_company, company_req("META2", "meta@gmail.com")).await?;
    assert_eq!(updated.name, "META2");
    assert_eq!(companies.find_by_id(meta.id_company).await?.name, "META2");

    let removed = companies.delete(meta.id_company).await?;
    assert_eq!(removed.id_company, meta.id_company);
    assert!(companies.find_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn user_rules_on_sqlite() -> Result<(), anyhow::Error> {
    let (companies, users) = services().await?;
    let meta = companies.create(company_req("META", "meta@gmail.com")).await?;
    let bcg = companies.create(company_req("BCG", "bcg@gmail.com")).await?;

    let missing = users.create(user_req("o@gmail.com", Some("pw"), Some(42))).await.unwrap_err();
    assert!(matches!(missing, ServiceError::NotFound(ref m) if m == "Company not found with id: 42"));

    let u = users.create(user_req("o@gmail.com", Some("pw"), Some(meta.id_company))).await?;
    assert_eq!(u.role, Some(Role::Cto));
    assert_eq!(companies.find_by_id(meta.id_company).await?.users.len(), 1);

    let blocked = companies.delete(meta.id_company).await.unwrap_err();
    assert!(matches!(blocked, ServiceError::Conflict(ref m) if m == "Cannot delete company with associated users"));

    let moved = users.update(u.id, user_req("o@gmail.com", Some(""), Some(bcg.id_company))).await?;
    assert_eq!(moved.company_id, bcg.id_company);
    assert!(users.verify_password(u.id, "pw").await?);
    assert!(companies.find_by_id(meta.id_company).await?.users.is_empty());

    companies.delete(meta.id_company).await?;
    users.delete(u.id).await?;
    companies.delete(bcg.id_company).await?;
    assert!(users.find_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn user_serialization_hides_password() -> Result<(), anyhow::Error> {
    let (companies, users) = services().await?;
    let meta = companies.create(company_req("META", "meta@gmail.com")).await?;
    let u = users.create(user_req("o@gmail.com", Some("secret"), Some(meta.id_company))).await?;
    let json = serde_json::to_string(&users.find_by_id(u.id).await?)?;
    assert!(!json.contains("secret"));
    assert!(!json.contains("password"));
    Ok(())
}

fn exactly_one_conflict<T: std::fmt::Debug>(a: Result<T, ServiceError>, b: Result<T, ServiceError>) {
    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1, "{results:?}");
    assert_eq!(
        results.iter().filter(|r| matches!(r, Err(ServiceError::Conflict(_)))).count(),
        1,
        "{results:?}"
    );
}

async fn race_duplicate_creates<P: RepositoryProvider>(store: P) -> Result<(), anyhow::Error> {
    let store = Arc::new(store);
    let companies = CompanyService::new(store.clone(), CompanyCache::default());
    let users = UserService::new(store, CompanyCache::default());

    let (a, b) = tokio::join!(
        companies.create(company_req("META", "meta@gmail.com")),
        companies.create(company_req("META", "other@gmail.com")),
    );
    let meta = a.as_ref().or(b.as_ref()).map(|c| c.id_company).map_err(|e| anyhow::anyhow!("{e}"))?;
    exactly_one_conflict(a, b);

    let (a, b) = tokio::join!(
        companies.create(company_req("BCG", "shared@gmail.com")),
        companies.create(company_req("AMAZON", "shared@gmail.com")),
    );
    exactly_one_conflict(a, b);

    let (a, b) = tokio::join!(
        users.create(user_req("o@gmail.com", Some("pw"), Some(meta))),
        users.create(user_req("o@gmail.com", Some("pw2"), Some(meta))),
    );
    exactly_one_conflict(a, b);

    assert_eq!(users.find_all().await?.len(), 1);
    assert_eq!(companies.find_all().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn concurrent_duplicate_creates_on_memory_store() -> Result<(), anyhow::Error> {
    race_duplicate_creates(MemoryStore::new()).await
}

#[tokio::test]
async fn concurrent_duplicate_creates_on_sqlite() -> Result<(), anyhow::Error> {
    race_duplicate_creates(get_store().await?).await
}

#[tokio::test]
async fn schema_constraints_reject_writers_that_passed_the_checks() -> Result<(), anyhow::Error> {
    race_duplicate_creates(UncheckedStore(get_store().await?)).await
}
