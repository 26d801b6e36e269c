use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{CompanyRequest, CompanyResponse};
use crate::cache::{self, CompanyCache};
use crate::errors::ServiceError;
use crate::store::{RepositoryProvider, RepositoryScope};
use crate::user::domain::UserResponse;

/// Company business service independent of web framework
pub struct CompanyService<P: RepositoryProvider> {
    store: Arc<P>,
    cache: CompanyCache,
}

impl<P: RepositoryProvider> CompanyService<P> {
    pub fn new(store: Arc<P>, cache: CompanyCache) -> Self { Self { store, cache } }

    /// Create a company with a unique name and email.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{cache::CompanyCache, company::{CompanyService, domain::CompanyRequest}, store::MemoryStore};
    /// let svc = CompanyService::new(Arc::new(MemoryStore::new()), CompanyCache::disabled());
    /// let req = CompanyRequest { name: "META".into(), email: "meta@x.com".into(), phone_number: None, address: None, website: None, founded_date: None };
    /// let created = tokio_test::block_on(svc.create(req)).unwrap();
    /// assert_eq!(created.id_company, 1);
    /// assert!(created.users.is_empty());
    /// ```
    #[instrument(skip(self, req), fields(name = %req.name, email = %req.email))]
    pub async fn create(&self, req: CompanyRequest) -> Result<CompanyResponse, ServiceError> {
        req.validate()?;
        let fields = req.into_fields();

        let scope = self.store.begin().await?;
        let companies = scope.companies();
        if companies.exists_by_name(&fields.name).await? {
            debug!("company name taken");
            return Err(ServiceError::Conflict("Name already exists".into()));
        }
        if companies.exists_by_email(&fields.email).await? {
            debug!("company email taken");
            return Err(ServiceError::Conflict("Mail already exists".into()));
        }
        let saved = companies.save(None, fields).await?;
        scope.commit().await?;

        let out = CompanyResponse::from_parts(saved, Vec::new());
        // 新 id 尚未被任何写操作作废
        self.cache.put_if_current(&out, cache::FRESH).await;
        info!(company_id = out.id_company, "company_created");
        Ok(out)
    }

    /// Overwrite every mutable field of an existing company.
    #[instrument(skip(self, req), fields(name = %req.name, email = %req.email))]
    pub async fn update(&self, id: i32, req: CompanyRequest) -> Result<CompanyResponse, ServiceError> {
        req.validate()?;
        let fields = req.into_fields();

        let seen = self.cache.generation(id).await;
        let scope = self.store.begin().await?;
        let companies = scope.companies();
        if companies.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found_id("Company", id));
        }
        if companies.exists_by_name_excluding_id(&fields.name, id).await? {
            debug!("company name taken by another company");
            return Err(ServiceError::Conflict("Company name already exists".into()));
        }
        if companies.exists_by_email_excluding_id(&fields.email, id).await? {
            debug!("company email taken by another company");
            return Err(ServiceError::Conflict("Company email already exists".into()));
        }
        let saved = companies.save(Some(id), fields).await?;
        let users = scope.users().find_by_company(id).await?;
        scope.commit().await?;

        let out = CompanyResponse::from_parts(saved, users.into_iter().map(UserResponse::from).collect());
        self.cache.put_if_current(&out, seen).await;
        info!(company_id = id, "company_updated");
        Ok(out)
    }

    /// Remove a company that no longer has users; returns what was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<CompanyResponse, ServiceError> {
        let scope = self.store.begin().await?;
        let companies = scope.companies();
        let Some(existing) = companies.find_by_id(id).await? else {
            return Err(ServiceError::not_found_id("Company", id));
        };
        let attached = companies.count_users(id).await?;
        if attached > 0 {
            debug!(attached, "company still has users");
            return Err(ServiceError::Conflict("Cannot delete company with associated users".into()));
        }
        companies.delete(id).await?;
        scope.commit().await?;

        self.cache.invalidate(id).await;
        info!(company_id = id, "company_deleted");
        Ok(CompanyResponse::from_parts(existing, Vec::new()))
    }

    /// Get a company with its users; served from the cache when possible.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<CompanyResponse, ServiceError> {
        if let Some(hit) = self.cache.get(id).await {
            return Ok(hit);
        }
        let seen = self.cache.generation(id).await;
        let scope = self.store.begin().await?;
        let company = scope.companies()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_id("Company", id))?;
        let users = scope.users().find_by_company(id).await?;
        scope.commit().await?;

        let out = CompanyResponse::from_parts(company, users.into_iter().map(UserResponse::from).collect());
        self.cache.put_if_current(&out, seen).await;
        Ok(out)
    }

    /// Every company with its users, in store order.
    pub async fn find_all(&self) -> Result<Vec<CompanyResponse>, ServiceError> {
        let scope = self.store.begin().await?;
        let companies = scope.companies().find_all().await?;
        let users = scope.users().find_all().await?;
        scope.commit().await?;

        let mut by_company: HashMap<i32, Vec<UserResponse>> = HashMap::new();
        for u in users {
            by_company.entry(u.fields.company_id).or_default().push(u.into());
        }
        Ok(companies
            .into_iter()
            .map(|c| {
                let users = by_company.remove(&c.id).unwrap_or_default();
                CompanyResponse::from_parts(c, users)
            })
            .collect())
    }
}
