use async_trait::async_trait;
use dexdle_types::{DailyPuzzle, DayResult, GameId, GameRecord, Guess, PuzzleId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Conflicting write: {0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(String),
}

/// Durable storage for signed-in players.
///
/// Implementations own every identifier and counter: attempt numbers are
/// assigned here, and `get_or_create_game` must be safe to call from two
/// requests at once without producing two games.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_puzzle_for_date(&self, date: &str) -> Result<Option<DailyPuzzle>, StoreError>;

    async fn get_game(
        &self,
        user_id: UserId,
        puzzle_id: PuzzleId,
    ) -> Result<Option<GameRecord>, StoreError>;

    async fn get_or_create_game(
        &self,
        user_id: UserId,
        puzzle_id: PuzzleId,
    ) -> Result<GameRecord, StoreError>;

    async fn create_game(
        &self,
        user_id: UserId,
        puzzle_id: PuzzleId,
    ) -> Result<GameRecord, StoreError> {
        self.get_or_create_game(user_id, puzzle_id).await
    }

    /// Append a guess, numbering it one past the guesses already stored.
    async fn append_guess(
        &self,
        game_id: GameId,
        user_id: UserId,
        guess_name: &str,
    ) -> Result<Guess, StoreError>;

    async fn finish_game(&self, game_id: GameId, won: bool) -> Result<(), StoreError>;

    async fn finished_games_with_dates(&self, user_id: UserId)
    -> Result<Vec<DayResult>, StoreError>;
}
