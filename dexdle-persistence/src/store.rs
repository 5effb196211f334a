use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::repositories::{GameRepository, ProfileRepository, PuzzleRepository};
use dexdle_core::{RecordStore, StoreError, parse_day};
use dexdle_types::{DailyPuzzle, DayResult, GameRecord, Guess, Profile, User};

/// [`RecordStore`] backed by the SQL repositories.
pub struct DatabaseStore {
    puzzles: PuzzleRepository,
    games: GameRepository,
    profiles: ProfileRepository,
}

impl DatabaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            puzzles: PuzzleRepository::new(db.clone()),
            games: GameRepository::new(db.clone()),
            profiles: ProfileRepository::new(db),
        }
    }

    pub fn puzzles(&self) -> &PuzzleRepository {
        &self.puzzles
    }

    pub async fn upsert_profile(&self, user: &User) -> Result<Profile, StoreError> {
        self.profiles.upsert_profile(user).await.map_err(to_store_error)
    }

    pub async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        self.profiles.find_by_id(id).await.map_err(to_store_error)
    }
}

/// Keep typed store errors raised inside repositories, wrap everything else.
fn to_store_error(error: anyhow::Error) -> StoreError {
    error
        .downcast::<StoreError>()
        .unwrap_or_else(|error| StoreError::Database(error.to_string()))
}

#[async_trait]
impl RecordStore for DatabaseStore {
    async fn get_puzzle_for_date(&self, date: &str) -> Result<Option<DailyPuzzle>, StoreError> {
        let Some(day) = parse_day(date) else {
            tracing::debug!("No puzzle lookup for malformed date '{}'", date);
            return Ok(None);
        };
        self.puzzles.find_by_date(day).await.map_err(to_store_error)
    }

    async fn get_game(&self, user_id: Uuid, puzzle_id: i32) -> Result<Option<GameRecord>, StoreError> {
        self.games
            .find_game(user_id, puzzle_id)
            .await
            .map_err(to_store_error)
    }

    async fn get_or_create_game(&self, user_id: Uuid, puzzle_id: i32) -> Result<GameRecord, StoreError> {
        self.games
            .get_or_create_game(user_id, puzzle_id)
            .await
            .map_err(to_store_error)
    }

    async fn append_guess(
        &self,
        game_id: Uuid,
        user_id: Uuid,
        guess_name: &str,
    ) -> Result<Guess, StoreError> {
        self.games
            .append_guess(game_id, user_id, guess_name)
            .await
            .map_err(to_store_error)
    }

    async fn finish_game(&self, game_id: Uuid, won: bool) -> Result<(), StoreError> {
        self.games
            .finish_game(game_id, won)
            .await
            .map_err(to_store_error)
    }

    async fn finished_games_with_dates(&self, user_id: Uuid) -> Result<Vec<DayResult>, StoreError> {
        self.games
            .finished_games_with_dates(user_id)
            .await
            .map_err(to_store_error)
    }
}
