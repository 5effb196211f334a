use sea_orm_migration::prelude::*;

use crate::m20240101_000002_create_daily_puzzles_table::DailyPuzzles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::UserId).uuid().not_null())
                    .col(ColumnDef::new(Games::PuzzleId).integer().not_null())
                    .col(ColumnDef::new(Games::Won).boolean().null())
                    .col(
                        ColumnDef::new(Games::IsFinished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_puzzle_id")
                            .from(Games::Table, Games::PuzzleId)
                            .to(DailyPuzzles::Table, DailyPuzzles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One game per player per puzzle; get-or-create relies on this
        manager
            .create_index(
                Index::create()
                    .name("idx_games_user_puzzle")
                    .table(Games::Table)
                    .col(Games::UserId)
                    .col(Games::PuzzleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Games {
    Table,
    Id,
    UserId,
    PuzzleId,
    Won,
    IsFinished,
    CreatedAt,
    UpdatedAt,
}
