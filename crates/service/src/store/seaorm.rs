use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use models::{company, user};
use crate::company::domain::{Company, CompanyFields};
use crate::company::repository::CompanyRepository;
use crate::errors::ServiceError;
use crate::user::domain::{User, UserFields};
use crate::user::repository::UserRepository;

use super::{RepositoryProvider, RepositoryScope};

/// SeaORM-backed store; each scope is one database transaction.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl RepositoryProvider for SeaOrmStore {
    type Scope = SeaOrmScope;

    async fn begin(&self) -> Result<SeaOrmScope, ServiceError> {
        let txn = self.db.begin().await?;
        Ok(SeaOrmScope { txn })
    }
}

pub struct SeaOrmScope {
    txn: DatabaseTransaction,
}

#[async_trait]
impl RepositoryScope for SeaOrmScope {
    fn companies(&self) -> &dyn CompanyRepository { self }
    fn users(&self) -> &dyn UserRepository { self }

    async fn commit(self) -> Result<(), ServiceError> {
        self.txn.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl CompanyRepository for SeaOrmScope {
    async fn save(&self, id: Option<i32>, fields: CompanyFields) -> Result<Company, ServiceError> {
        let am = company::ActiveModel {
            id: id.map(Set).unwrap_or(NotSet),
            name: Set(fields.name),
            email: Set(fields.email),
            phone_number: Set(fields.phone_number),
            address: Set(fields.address),
            website: Set(fields.website),
            founded_date: Set(fields.founded_date),
        };
        let saved = match id {
            Some(_) => am.update(&self.txn).await?,
            None => am.insert(&self.txn).await?,
        };
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Company>, ServiceError> {
        let found = company::Entity::find_by_id(id).one(&self.txn).await?;
        Ok(found.map(Company::from))
    }

    async fn find_all(&self) -> Result<Vec<Company>, ServiceError> {
        let rows = company::Entity::find()
            .order_by_asc(company::Column::Id)
            .all(&self.txn)
            .await?;
        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = company::Entity::delete_by_id(id).exec(&self.txn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, ServiceError> {
        let n = company::Entity::find()
            .filter(company::Column::Name.eq(name))
            .count(&self.txn)
            .await?;
        Ok(n > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        let n = company::Entity::find()
            .filter(company::Column::Email.eq(email))
            .count(&self.txn)
            .await?;
        Ok(n > 0)
    }

    async fn exists_by_name_excluding_id(&self, name: &str, id: i32) -> Result<bool, ServiceError> {
        let n = company::Entity::find()
            .filter(company::Column::Name.eq(name))
            .filter(company::Column::Id.ne(id))
            .count(&self.txn)
            .await?;
        Ok(n > 0)
    }

    async fn exists_by_email_excluding_id(&self, email: &str, id: i32) -> Result<bool, ServiceError> {
        let n = company::Entity::find()
            .filter(company::Column::Email.eq(email))
            .filter(company::Column::Id.ne(id))
            .count(&self.txn)
            .await?;
        Ok(n > 0)
    }

    async fn count_users(&self, id: i32) -> Result<u64, ServiceError> {
        let n = user::Entity::find()
            .filter(user::Column::CompanyId.eq(id))
            .count(&self.txn)
            .await?;
        Ok(n)
    }
}

#[async_trait]
impl UserRepository for SeaOrmScope {
    async fn save(&self, id: Option<i32>, fields: UserFields) -> Result<User, ServiceError> {
        let am = user::ActiveModel {
            id: id.map(Set).unwrap_or(NotSet),
            name: Set(fields.name),
            email: Set(fields.email),
            password: Set(fields.password_hash),
            phone_number: Set(fields.phone_number),
            address: Set(fields.address),
            date_of_birth: Set(fields.date_of_birth),
            role: Set(fields.role),
            company_id: Set(fields.company_id),
        };
        let saved = match id {
            Some(_) => am.update(&self.txn).await?,
            None => am.insert(&self.txn).await?,
        };
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ServiceError> {
        let found = user::Entity::find_by_id(id).one(&self.txn).await?;
        Ok(found.map(User::from))
    }

    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.txn)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_company(&self, company_id: i32) -> Result<Vec<User>, ServiceError> {
        let rows = user::Entity::find()
            .filter(user::Column::CompanyId.eq(company_id))
            .order_by_asc(user::Column::Id)
            .all(&self.txn)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = user::Entity::delete_by_id(id).exec(&self.txn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        let n = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.txn)
            .await?;
        Ok(n > 0)
    }
}
