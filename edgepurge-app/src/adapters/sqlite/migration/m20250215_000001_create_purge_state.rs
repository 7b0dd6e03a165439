use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PurgeState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurgeState::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurgeState::Value).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurgeState::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PurgeState {
    #[sea_orm(iden = "purge_state")]
    Table,
    Key,
    Value,
}
