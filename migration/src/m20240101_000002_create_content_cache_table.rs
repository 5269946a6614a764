use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentCache::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentCache::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContentCache::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ContentCache::Cards).text().not_null())
                    .col(ColumnDef::new(ContentCache::Prendas).text().not_null())
                    .col(
                        ColumnDef::new(ContentCache::FetchedAt)
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
            .drop_table(Table::drop().table(ContentCache::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ContentCache {
    Table,
    Id,
    Version,
    Cards,
    Prendas,
    FetchedAt,
}
