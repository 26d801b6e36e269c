//! In-memory store for tests and doc examples.
//!
//! A scope holds the store lock for its whole lifetime and works on a copy of
//! the state; `commit` publishes the copy. Unique and reference rules mirror the
//! SQL schema so store-level conflicts behave the same as in the database.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::company::domain::{Company, CompanyFields};
use crate::company::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::user::domain::{User, UserFields};
use crate::user::repository::UserRepository;

use super::{RepositoryProvider, RepositoryScope};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    companies: BTreeMap<i32, Company>,
    users: BTreeMap<i32, User>,
    last_company_id: i32,
    last_user_id: i32,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<AsyncMutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl RepositoryProvider for MemoryStore {
    type Scope = MemoryScope;

    async fn begin(&self) -> Result<MemoryScope, ServiceError> {
        let committed = Arc::clone(&self.state).lock_owned().await;
        let working = Mutex::new(committed.clone());
        Ok(MemoryScope { committed, working })
    }
}

pub struct MemoryScope {
    committed: OwnedMutexGuard<MemoryState>,
    working: Mutex<MemoryState>,
}

impl MemoryScope {
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.working.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RepositoryScope for MemoryScope {
    fn companies(&self) -> &dyn CompanyRepository { self }
    fn users(&self) -> &dyn UserRepository { self }

    async fn commit(self) -> Result<(), ServiceError> {
        let MemoryScope { mut committed, working } = self;
        *committed = working.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(())
    }
}

#[async_trait]
impl CompanyRepository for MemoryScope {
    async fn save(&self, id: Option<i32>, fields: CompanyFields) -> Result<Company, ServiceError> {
        let mut st = self.state();
        let clash = st.companies.values().any(|c| {
            Some(c.id) != id && (c.fields.name == fields.name || c.fields.email == fields.email)
        });
        if clash {
            return Err(ServiceError::Conflict("unique constraint violated: company name/email".into()));
        }
        let id = match id {
            Some(id) if st.companies.contains_key(&id) => id,
            Some(id) => return Err(ServiceError::Db(format!("company {id} not updated: no such row"))),
            None => {
                st.last_company_id += 1;
                st.last_company_id
            }
        };
        let company = Company { id, fields };
        st.companies.insert(id, company.clone());
        Ok(company)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Company>, ServiceError> {
        Ok(self.state().companies.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Company>, ServiceError> {
        Ok(self.state().companies.values().cloned().collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut st = self.state();
        if st.users.values().any(|u| u.fields.company_id == id) {
            return Err(ServiceError::Conflict("foreign key constraint violated: user.company_id".into()));
        }
        Ok(st.companies.remove(&id).is_some())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, ServiceError> {
        Ok(self.state().companies.values().any(|c| c.fields.name == name))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        Ok(self.state().companies.values().any(|c| c.fields.email == email))
    }

    async fn exists_by_name_excluding_id(&self, name: &str, id: i32) -> Result<bool, ServiceError> {
        Ok(self.state().companies.values().any(|c| c.id != id && c.fields.name == name))
    }

    async fn exists_by_email_excluding_id(&self, email: &str, id: i32) -> Result<bool, ServiceError> {
        Ok(self.state().companies.values().any(|c| c.id != id && c.fields.email == email))
    }

    async fn count_users(&self, id: i32) -> Result<u64, ServiceError> {
        Ok(self.state().users.values().filter(|u| u.fields.company_id == id).count() as u64)
    }
}

#[async_trait]
impl UserRepository for MemoryScope {
    async fn save(&self, id: Option<i32>, fields: UserFields) -> Result<User, ServiceError> {
        let mut st = self.state();
        if st.users.values().any(|u| Some(u.id) != id && u.fields.email == fields.email) {
            return Err(ServiceError::Conflict("unique constraint violated: user.email".into()));
        }
        if !st.companies.contains_key(&fields.company_id) {
            return Err(ServiceError::Conflict("foreign key constraint violated: user.company_id".into()));
        }
        let id = match id {
            Some(id) if st.users.contains_key(&id) => id,
            Some(id) => return Err(ServiceError::Db(format!("user {id} not updated: no such row"))),
            None => {
                st.last_user_id += 1;
                st.last_user_id
            }
        };
        let user = User { id, fields };
        st.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.state().users.values().cloned().collect())
    }

    async fn find_by_company(&self, company_id: i32) -> Result<Vec<User>, ServiceError> {
        Ok(self.state().users.values().filter(|u| u.fields.company_id == company_id).cloned().collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(self.state().users.remove(&id).is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        Ok(self.state().users.values().any(|u| u.fields.email == email))
    }
}
