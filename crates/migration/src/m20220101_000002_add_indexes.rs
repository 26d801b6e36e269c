use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: index on company_id (user listing per company, delete guard)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_company")
                    .table(User::Table)
                    .col(User::CompanyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_company").table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User { Table, CompanyId }
