//! Create `company` table.
//!
//! Root entity; users reference it. Name and email are unique store-wide.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(pk_auto(Company::Id))
                    .col(string_len(Company::Name, 128).unique_key().not_null())
                    .col(string_len(Company::Email, 255).unique_key().not_null())
                    .col(string_len_null(Company::PhoneNumber, 32))
                    .col(string_len_null(Company::Address, 255))
                    .col(string_len_null(Company::Website, 255))
                    .col(date_null(Company::FoundedDate))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Company::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Company { Table, Id, Name, Email, PhoneNumber, Address, Website, FoundedDate }
