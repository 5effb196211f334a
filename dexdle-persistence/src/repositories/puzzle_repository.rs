use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, sea_query::OnConflict,
};

use crate::entities::{daily_puzzles, prelude::*};
use dexdle_core::format_day;
use dexdle_types::DailyPuzzle;

pub struct PuzzleRepository {
    db: DatabaseConnection,
}

impl PuzzleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_puzzle(model: daily_puzzles::Model) -> DailyPuzzle {
        DailyPuzzle {
            id: model.id,
            available_on: format_day(model.available_on),
            answer_name: model.answer_name,
        }
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyPuzzle>> {
        let puzzle = DailyPuzzles::find()
            .filter(daily_puzzles::Column::AvailableOn.eq(date))
            .one(&self.db)
            .await?;

        Ok(puzzle.map(Self::model_to_puzzle))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<DailyPuzzle>> {
        let puzzle = DailyPuzzles::find_by_id(id).one(&self.db).await?;
        Ok(puzzle.map(Self::model_to_puzzle))
    }

    pub async fn create_puzzle(&self, date: NaiveDate, answer_name: &str) -> Result<DailyPuzzle> {
        let puzzle = daily_puzzles::ActiveModel {
            available_on: sea_orm::ActiveValue::Set(date),
            answer_name: sea_orm::ActiveValue::Set(answer_name.to_lowercase()),
            ..Default::default()
        };

        let inserted = DailyPuzzles::insert(puzzle).exec(&self.db).await?;

        let created = DailyPuzzles::find_by_id(inserted.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created puzzle"))?;

        Ok(Self::model_to_puzzle(created))
    }

    /// Assign one answer per day starting at `first_day`, leaving days that
    /// already have a puzzle alone. Returns how many puzzles were inserted.
    pub async fn seed_puzzles(&self, first_day: NaiveDate, answers: &[&str]) -> Result<u64> {
        let mut inserted = 0;
        for (date, answer) in first_day.iter_days().zip(answers) {
            let puzzle = daily_puzzles::ActiveModel {
                available_on: sea_orm::ActiveValue::Set(date),
                answer_name: sea_orm::ActiveValue::Set(answer.to_lowercase()),
                ..Default::default()
            };

            inserted += DailyPuzzles::insert(puzzle)
                .on_conflict(
                    OnConflict::column(daily_puzzles::Column::AvailableOn)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
        }

        tracing::info!("Seeded {} daily puzzles from {}", inserted, first_day);
        Ok(inserted)
    }

    pub async fn list_puzzles(&self) -> Result<Vec<DailyPuzzle>> {
        let puzzles = DailyPuzzles::find()
            .order_by_asc(daily_puzzles::Column::AvailableOn)
            .all(&self.db)
            .await?;

        Ok(puzzles.into_iter().map(Self::model_to_puzzle).collect())
    }
}
