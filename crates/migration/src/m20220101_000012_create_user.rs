//! Create `user` table with FK to `company`.
//!
//! Deleting a company that still owns users is rejected by the store
//! (`ON DELETE RESTRICT`); users are never removed by cascade.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Name, 128).not_null())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    .col(string_len(User::Password, 255).not_null())
                    .col(string_len_null(User::PhoneNumber, 32))
                    .col(string_len_null(User::Address, 255))
                    .col(date_null(User::DateOfBirth))
                    .col(string_len_null(User::Role, 16))
                    .col(integer(User::CompanyId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_company")
                            .from(User::Table, User::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Name, Email, Password, PhoneNumber, Address, DateOfBirth, Role, CompanyId }

#[derive(DeriveIden)]
enum Company { Table, Id }
