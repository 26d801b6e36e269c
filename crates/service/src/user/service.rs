use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{UserFields, UserRequest, UserResponse};
use crate::cache::CompanyCache;
use crate::errors::ServiceError;
use crate::password;
use crate::store::{RepositoryProvider, RepositoryScope};

/// User business service independent of web framework
pub struct UserService<P: RepositoryProvider> {
    store: Arc<P>,
    cache: CompanyCache,
}

impl<P: RepositoryProvider> UserService<P> {
    /// `cache` must be the instance shared with the company service so that
    /// cached company responses drop users that moved or were removed.
    pub fn new(store: Arc<P>, cache: CompanyCache) -> Self { Self { store, cache } }

    /// Register a user under an existing company with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::{cache::CompanyCache, store::MemoryStore};
    /// use service::company::{CompanyService, domain::CompanyRequest};
    /// use service::user::{UserService, domain::{Role, UserRequest}};
    /// let store = Arc::new(MemoryStore::new());
    /// let companies = CompanyService::new(store.clone(), CompanyCache::disabled());
    /// let users = UserService::new(store, CompanyCache::disabled());
    /// let meta = tokio_test::block_on(companies.create(CompanyRequest { name: "META".into(), email: "meta@x.com".into(), phone_number: None, address: None, website: None, founded_date: None })).unwrap();
    /// let req = UserRequest { name: "oussama".into(), email: "o@x.com".into(), phone_number: None, password: Some("pw".into()), address: None, date_of_birth: None, role: Some(Role::Ceo), company_id: Some(meta.id_company) };
    /// let user = tokio_test::block_on(users.create(req)).unwrap();
    /// assert_eq!(user.company_id, meta.id_company);
    /// ```
    #[instrument(skip(self, req), fields(email = %req.email, company_id = ?req.company_id))]
    pub async fn create(&self, req: UserRequest) -> Result<UserResponse, ServiceError> {
        let company_id = req.validate_for_create()?;
        let plain = req.password.clone().unwrap_or_default();

        let scope = self.store.begin().await?;
        if scope.users().exists_by_email(req.email.trim()).await? {
            debug!("user email taken");
            return Err(ServiceError::Conflict("Email already exists".into()));
        }
        if scope.companies().find_by_id(company_id).await?.is_none() {
            return Err(ServiceError::not_found_id("Company", company_id));
        }
        let fields = UserFields {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash: password::hash_password(&plain)?,
            phone_number: req.phone_number,
            address: req.address,
            date_of_birth: req.date_of_birth,
            role: req.role,
            company_id,
        };
        let saved = scope.users().save(None, fields).await?;
        scope.commit().await?;

        self.cache.invalidate(company_id).await;
        info!(user_id = saved.id, company_id, "user_created");
        Ok(saved.into())
    }

    /// Overwrite a user's profile; the password changes only when a non-empty
    /// one is supplied, the company only when a different id is supplied.
    #[instrument(skip(self, req), fields(email = %req.email, company_id = ?req.company_id))]
    pub async fn update(&self, id: i32, req: UserRequest) -> Result<UserResponse, ServiceError> {
        req.validate()?;
        let email = req.email.trim().to_string();

        let scope = self.store.begin().await?;
        let users = scope.users();
        let Some(existing) = users.find_by_id(id).await? else {
            return Err(ServiceError::not_found_id("User", id));
        };
        if existing.fields.email != email && users.exists_by_email(&email).await? {
            debug!("user email taken");
            return Err(ServiceError::Conflict("Email already exists".into()));
        }

        let previous_company = existing.fields.company_id;
        let mut company_id = previous_company;
        if let Some(requested) = req.company_id.filter(|c| *c != previous_company) {
            if scope.companies().find_by_id(requested).await?.is_none() {
                return Err(ServiceError::not_found_id("Company", requested));
            }
            company_id = requested;
        }

        let password_hash = match req.new_password() {
            Some(plain) => password::hash_password(plain)?,
            None => existing.fields.password_hash,
        };
        let fields = UserFields {
            name: req.name.trim().to_string(),
            email,
            password_hash,
            phone_number: req.phone_number,
            address: req.address,
            date_of_birth: req.date_of_birth,
            role: req.role,
            company_id,
        };
        let saved = users.save(Some(id), fields).await?;
        scope.commit().await?;

        self.cache.invalidate(previous_company).await;
        if company_id != previous_company {
            self.cache.invalidate(company_id).await;
        }
        info!(user_id = id, company_id, "user_updated");
        Ok(saved.into())
    }

    /// Remove a user; returns what was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<UserResponse, ServiceError> {
        let scope = self.store.begin().await?;
        let users = scope.users();
        let Some(existing) = users.find_by_id(id).await? else {
            return Err(ServiceError::not_found_id("User", id));
        };
        users.delete(id).await?;
        scope.commit().await?;

        self.cache.invalidate(existing.fields.company_id).await;
        info!(user_id = id, company_id = existing.fields.company_id, "user_deleted");
        Ok(existing.into())
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<UserResponse, ServiceError> {
        let scope = self.store.begin().await?;
        let user = scope.users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_id("User", id))?;
        scope.commit().await?;
        Ok(user.into())
    }

    pub async fn find_all(&self) -> Result<Vec<UserResponse>, ServiceError> {
        let scope = self.store.begin().await?;
        let users = scope.users().find_all().await?;
        scope.commit().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Whether `plain` matches the stored password of user `id`.
    #[instrument(skip(self, plain))]
    pub async fn verify_password(&self, id: i32, plain: &str) -> Result<bool, ServiceError> {
        let scope = self.store.begin().await?;
        let user = scope.users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_id("User", id))?;
        scope.commit().await?;
        password::verify_password(plain, &user.fields.password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::{domain::CompanyRequest, CompanyService};
    use crate::store::MemoryStore;
    use crate::test_support::GatedStore;
    use crate::user::domain::Role;

    struct Fixture {
        companies: CompanyService<MemoryStore>,
        users: UserService<MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let cache = CompanyCache::default();
        Fixture {
            companies: CompanyService::new(store.clone(), cache.clone()),
            users: UserService::new(store, cache),
        }
    }

    async fn company(f: &Fixture, name: &str) -> i32 {
        let req = CompanyRequest {
            name: name.into(),
            email: format!("{}@gmail.com", name.to_lowercase()),
            phone_number: None,
            address: None,
            website: None,
            founded_date: None,
        };
        f.companies.create(req).await.unwrap().id_company
    }

    fn user_req(email: &str, password: Option<&str>, company_id: Option<i32>) -> UserRequest {
        UserRequest {
            name: "oussama".into(),
            email: email.into(),
            phone_number: Some("0606060606".into()),
            password: password.map(str::to_string),
            address: Some("casablanca".into()),
            date_of_birth: None,
            role: Some(Role::Ceo),
            company_id,
        }
    }

    #[tokio::test]
    async fn create_requires_existing_company() {
        let f = fixture();
        let err = f.users.create(user_req("o@x.com", Some("pw"), Some(99))).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m.contains("99")));
    }

    #[tokio::test]
    async fn create_hashes_password_and_links_company() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        let u = f.users.create(user_req("o@x.com", Some("pw"), Some(meta))).await?;
        assert_eq!(u.company_id, meta);
        assert!(f.users.verify_password(u.id, "pw").await?);
        assert!(!f.users.verify_password(u.id, "nope").await?);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_before_company_check() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        f.users.create(user_req("o@x.com", Some("pw"), Some(meta))).await?;
        let err = f.users.create(user_req("o@x.com", Some("pw"), Some(404))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn empty_password_on_update_keeps_hash() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        let u = f.users.create(user_req("o@x.com", Some("old"), Some(meta))).await?;

        f.users.update(u.id, user_req("o@x.com", Some(""), None)).await?;
        assert!(f.users.verify_password(u.id, "old").await?);

        f.users.update(u.id, user_req("o@x.com", None, None)).await?;
        assert!(f.users.verify_password(u.id, "old").await?);
        Ok(())
    }

    #[tokio::test]
    async fn new_password_on_update_rehashes() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        let u = f.users.create(user_req("o@x.com", Some("old"), Some(meta))).await?;

        f.users.update(u.id, user_req("o@x.com", Some("new"), None)).await?;
        assert!(!f.users.verify_password(u.id, "old").await?);
        assert!(f.users.verify_password(u.id, "new").await?);
        Ok(())
    }

    #[tokio::test]
    async fn update_email_collision_and_self_email() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        let a = f.users.create(user_req("a@x.com", Some("pw"), Some(meta))).await?;
        f.users.create(user_req("b@x.com", Some("pw"), Some(meta))).await?;

        let err = f.users.update(a.id, user_req("b@x.com", None, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let same = f.users.update(a.id, user_req("a@x.com", None, None)).await?;
        assert_eq!(same.email, "a@x.com");
        Ok(())
    }

    #[tokio::test]
    async fn update_moves_user_between_companies() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        let bcg = company(&f, "BCG").await;
        let u = f.users.create(user_req("o@x.com", Some("pw"), Some(meta))).await?;

        // warm the cache, then make sure the move is visible through it
        assert_eq!(f.companies.find_by_id(meta).await?.users.len(), 1);

        let missing = f.users.update(u.id, user_req("o@x.com", None, Some(777))).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));

        let moved = f.users.update(u.id, user_req("o@x.com", None, Some(bcg))).await?;
        assert_eq!(moved.company_id, bcg);
        assert!(f.companies.find_by_id(meta).await?.users.is_empty());
        assert_eq!(f.companies.find_by_id(bcg).await?.users.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_role_and_profile() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        let u = f.users.create(user_req("o@x.com", Some("pw"), Some(meta))).await?;
        let mut r = user_req("o@x.com", None, None);
        r.name = "mustapha".into();
        r.role = None;
        r.address = None;
        let updated = f.users.update(u.id, r).await?;
        assert_eq!(updated.name, "mustapha");
        assert_eq!(updated.role, None);
        assert_eq!(updated.address, None);
        assert_eq!(updated.company_id, meta);
        Ok(())
    }

    #[tokio::test]
    async fn company_with_users_cannot_be_deleted_until_empty() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        let u = f.users.create(user_req("o@x.com", Some("pw"), Some(meta))).await?;

        let err = f.companies.delete(meta).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let removed = f.users.delete(u.id).await?;
        assert_eq!(removed.id, u.id);
        assert!(matches!(f.users.find_by_id(u.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.users.delete(u.id).await, Err(ServiceError::NotFound(_))));

        f.companies.delete(meta).await?;
        assert!(matches!(f.companies.find_by_id(meta).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn find_all_lists_users_and_company_lists_group_them() -> Result<(), anyhow::Error> {
        let f = fixture();
        let meta = company(&f, "META").await;
        let bcg = company(&f, "BCG").await;
        f.users.create(user_req("a@x.com", Some("pw"), Some(meta))).await?;
        f.users.create(user_req("b@x.com", Some("pw"), Some(meta))).await?;
        f.users.create(user_req("c@x.com", Some("pw"), Some(bcg))).await?;

        assert_eq!(f.users.find_all().await?.len(), 3);
        let all = f.companies.find_all().await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].users.len(), 2);
        assert_eq!(all[1].users.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn lookup_racing_user_write_does_not_cache_stale_users() -> Result<(), anyhow::Error> {
        let store = Arc::new(GatedStore::new());
        let cache = CompanyCache::default();
        let companies = Arc::new(CompanyService::new(store.clone(), cache.clone()));
        let users = UserService::new(store.clone(), cache);
        let meta = CompanyService::new(store.clone(), CompanyCache::disabled())
            .create(CompanyRequest {
                name: "META".into(),
                email: "meta@gmail.com".into(),
                phone_number: None,
                address: None,
                website: None,
                founded_date: None,
            })
            .await?
            .id_company;

        store.hold_next_commit();
        let reader = tokio::spawn({
            let companies = Arc::clone(&companies);
            async move { companies.find_by_id(meta).await }
        });
        store.committed().await;
        let u = users.create(user_req("o@x.com", Some("pw"), Some(meta))).await?;
        store.release();
        assert!(reader.await??.users.is_empty());

        let fresh = companies.find_by_id(meta).await?;
        assert_eq!(fresh.users.iter().map(|x| x.id).collect::<Vec<_>>(), vec![u.id]);
        Ok(())
    }
}
