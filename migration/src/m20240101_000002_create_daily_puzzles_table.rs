use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyPuzzles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyPuzzles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyPuzzles::AvailableOn)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DailyPuzzles::AnswerName).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyPuzzles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum DailyPuzzles {
    Table,
    Id,
    AvailableOn,
    AnswerName,
}
