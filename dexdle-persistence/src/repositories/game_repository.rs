use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use crate::entities::{games, guesses, prelude::*};
use dexdle_core::{StoreError, format_day};
use dexdle_types::{DayResult, GameRecord, Guess, MAX_ATTEMPTS};

pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_guess(model: guesses::Model) -> Guess {
        Guess {
            attempt_number: model.attempt_number as u32,
            guess_name: model.guess_name,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    async fn load_guesses<C: ConnectionTrait>(db: &C, game_id: Uuid) -> Result<Vec<Guess>> {
        let guesses = Guesses::find()
            .filter(guesses::Column::GameId.eq(game_id))
            .order_by_asc(guesses::Column::AttemptNumber)
            .all(db)
            .await?;

        Ok(guesses.into_iter().map(Self::model_to_guess).collect())
    }

    async fn model_to_record(&self, model: games::Model) -> Result<GameRecord> {
        let guesses = Self::load_guesses(&self.db, model.id).await?;
        Ok(GameRecord {
            id: model.id,
            user_id: Some(model.user_id),
            puzzle_id: model.puzzle_id,
            guesses,
            won: model.won,
            is_finished: model.is_finished,
        })
    }

    pub async fn find_by_id(&self, game_id: Uuid) -> Result<Option<GameRecord>> {
        match Games::find_by_id(game_id).one(&self.db).await? {
            Some(model) => Ok(Some(self.model_to_record(model).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_game(&self, user_id: Uuid, puzzle_id: i32) -> Result<Option<GameRecord>> {
        let game = Games::find()
            .filter(games::Column::UserId.eq(user_id))
            .filter(games::Column::PuzzleId.eq(puzzle_id))
            .one(&self.db)
            .await?;

        match game {
            Some(model) => Ok(Some(self.model_to_record(model).await?)),
            None => Ok(None),
        }
    }

    /// Insert-if-absent keyed on (user, puzzle), then read back whichever row
    /// won. Concurrent callers all end up with the same game.
    pub async fn get_or_create_game(&self, user_id: Uuid, puzzle_id: i32) -> Result<GameRecord> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let game = games::ActiveModel {
            id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            user_id: sea_orm::ActiveValue::Set(user_id),
            puzzle_id: sea_orm::ActiveValue::Set(puzzle_id),
            won: sea_orm::ActiveValue::Set(None),
            is_finished: sea_orm::ActiveValue::Set(false),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        let inserted = Games::insert(game)
            .on_conflict(
                OnConflict::columns([games::Column::UserId, games::Column::PuzzleId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        if inserted > 0 {
            tracing::info!("Created game for user {} on puzzle {}", user_id, puzzle_id);
        }

        self.find_game(user_id, puzzle_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve game after upsert"))
    }

    /// Store the next guess for a game. The attempt number is derived from
    /// the guesses already stored, inside the same transaction.
    pub async fn append_guess(&self, game_id: Uuid, user_id: Uuid, guess_name: &str) -> Result<Guess> {
        let txn = self.db.begin().await?;

        let game = Games::find_by_id(game_id)
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("game {}", game_id)))?;

        if game.user_id != user_id {
            return Err(StoreError::NotFound(format!("game {} for user {}", game_id, user_id)).into());
        }
        if game.is_finished {
            return Err(StoreError::Conflict(format!("game {} is already finished", game_id)).into());
        }

        let existing = Guesses::find()
            .filter(guesses::Column::GameId.eq(game_id))
            .count(&txn)
            .await?;
        if existing as usize >= MAX_ATTEMPTS {
            return Err(StoreError::Conflict(format!("game {} has no attempts left", game_id)).into());
        }

        let guess = guesses::ActiveModel {
            game_id: sea_orm::ActiveValue::Set(game_id),
            user_id: sea_orm::ActiveValue::Set(user_id),
            attempt_number: sea_orm::ActiveValue::Set(existing as i32 + 1),
            guess_name: sea_orm::ActiveValue::Set(guess_name.to_string()),
            created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        let stored = guess.insert(&txn).await?;

        txn.commit().await?;
        Ok(Self::model_to_guess(stored))
    }

    /// Close out a game. A game that is already finished keeps its result.
    pub async fn finish_game(&self, game_id: Uuid, won: bool) -> Result<()> {
        let game = Games::find_by_id(game_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("game {}", game_id)))?;

        if game.is_finished {
            tracing::debug!("Game {} already finished, keeping won={:?}", game_id, game.won);
            return Ok(());
        }

        let mut active: games::ActiveModel = game.into();
        active.won = sea_orm::ActiveValue::Set(Some(won));
        active.is_finished = sea_orm::ActiveValue::Set(true);
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }

    pub async fn finished_games_with_dates(&self, user_id: Uuid) -> Result<Vec<DayResult>> {
        let rows = Games::find()
            .filter(games::Column::UserId.eq(user_id))
            .filter(games::Column::IsFinished.eq(true))
            .find_also_related(DailyPuzzles)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(game, puzzle)| {
                puzzle.map(|puzzle| {
                    DayResult::new(format_day(puzzle.available_on), game.won == Some(true))
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::repositories::PuzzleRepository;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> (GameRepository, PuzzleRepository) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        (GameRepository::new(db.clone()), PuzzleRepository::new(db))
    }

    async fn create_puzzle(puzzles: &PuzzleRepository, date: &str, answer: &str) -> i32 {
        puzzles
            .create_puzzle(dexdle_core::parse_day(date).unwrap(), answer)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (games, puzzles) = setup_test_db().await;
        let puzzle_id = create_puzzle(&puzzles, "2024-01-01", "pikachu").await;
        let user_id = Uuid::new_v4();

        assert!(games.find_game(user_id, puzzle_id).await.unwrap().is_none());

        let first = games.get_or_create_game(user_id, puzzle_id).await.unwrap();
        let second = games.get_or_create_game(user_id, puzzle_id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.user_id, Some(user_id));
        assert!(first.guesses.is_empty());
        assert_eq!(first.won, None);
        assert!(!first.is_finished);

        let other_user = games.get_or_create_game(Uuid::new_v4(), puzzle_id).await.unwrap();
        assert_ne!(other_user.id, first.id);
    }

    #[tokio::test]
    async fn test_append_guess_numbers_attempts() {
        let (games, puzzles) = setup_test_db().await;
        let puzzle_id = create_puzzle(&puzzles, "2024-01-01", "pikachu").await;
        let user_id = Uuid::new_v4();
        let game = games.get_or_create_game(user_id, puzzle_id).await.unwrap();

        for (index, name) in ["eevee", "mew", "ditto"].iter().enumerate() {
            let guess = games.append_guess(game.id, user_id, name).await.unwrap();
            assert_eq!(guess.attempt_number, index as u32 + 1);
        }

        let stored = games.find_by_id(game.id).await.unwrap().unwrap();
        let attempts: Vec<u32> = stored.guesses.iter().map(|g| g.attempt_number).collect();
        assert_eq!(attempts, vec![1, 2, 3]);
        assert_eq!(stored.guesses[2].guess_name, "ditto");
    }

    #[tokio::test]
    async fn test_append_guess_rejects_exhausted_and_finished_games() {
        let (games, puzzles) = setup_test_db().await;
        let puzzle_id = create_puzzle(&puzzles, "2024-01-01", "pikachu").await;
        let user_id = Uuid::new_v4();
        let game = games.get_or_create_game(user_id, puzzle_id).await.unwrap();

        for name in ["a", "b", "c", "d", "e", "f"] {
            games.append_guess(game.id, user_id, name).await.unwrap();
        }
        let result = games.append_guess(game.id, user_id, "g").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no attempts left"));

        games.finish_game(game.id, false).await.unwrap();
        let result = games.append_guess(game.id, user_id, "g").await;
        assert!(result.unwrap_err().to_string().contains("already finished"));
    }

    #[tokio::test]
    async fn test_append_guess_for_wrong_user() {
        let (games, puzzles) = setup_test_db().await;
        let puzzle_id = create_puzzle(&puzzles, "2024-01-01", "pikachu").await;
        let game = games.get_or_create_game(Uuid::new_v4(), puzzle_id).await.unwrap();

        let result = games.append_guess(game.id, Uuid::new_v4(), "eevee").await;
        let error = result.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_finish_game_keeps_first_result() {
        let (games, puzzles) = setup_test_db().await;
        let puzzle_id = create_puzzle(&puzzles, "2024-01-01", "pikachu").await;
        let user_id = Uuid::new_v4();
        let game = games.get_or_create_game(user_id, puzzle_id).await.unwrap();

        games.finish_game(game.id, true).await.unwrap();
        games.finish_game(game.id, false).await.unwrap();

        let stored = games.find_by_id(game.id).await.unwrap().unwrap();
        assert_eq!(stored.won, Some(true));
        assert!(stored.is_finished);

        assert!(games.finish_game(Uuid::new_v4(), true).await.is_err());
    }

    #[tokio::test]
    async fn test_finished_games_with_dates() {
        let (games, puzzles) = setup_test_db().await;
        let user_id = Uuid::new_v4();

        let day_one = create_puzzle(&puzzles, "2024-01-01", "pikachu").await;
        let day_two = create_puzzle(&puzzles, "2024-01-02", "eevee").await;
        let day_three = create_puzzle(&puzzles, "2024-01-03", "mew").await;

        let won = games.get_or_create_game(user_id, day_one).await.unwrap();
        games.finish_game(won.id, true).await.unwrap();
        let lost = games.get_or_create_game(user_id, day_two).await.unwrap();
        games.finish_game(lost.id, false).await.unwrap();
        // Unfinished games are not part of the history
        games.get_or_create_game(user_id, day_three).await.unwrap();
        // Neither are other players' games
        let other = games.get_or_create_game(Uuid::new_v4(), day_three).await.unwrap();
        games.finish_game(other.id, true).await.unwrap();

        let mut history = games.finished_games_with_dates(user_id).await.unwrap();
        history.sort_by(|a, b| a.date.cmp(&b.date));
        assert_eq!(
            history,
            vec![
                DayResult::new("2024-01-01", true),
                DayResult::new("2024-01-02", false),
            ]
        );
    }
}
