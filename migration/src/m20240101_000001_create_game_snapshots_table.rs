use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameSnapshots::Table)
                    .if_not_exists()
                    // One row per session key
                    .col(
                        ColumnDef::new(GameSnapshots::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameSnapshots::Payload).text().not_null())
                    .col(
                        ColumnDef::new(GameSnapshots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameSnapshots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameSnapshots {
    Table,
    Id,
    Payload,
    UpdatedAt,
}
