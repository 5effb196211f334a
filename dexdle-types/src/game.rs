use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Number of guesses a player gets for each daily puzzle.
pub const MAX_ATTEMPTS: usize = 6;

pub type PuzzleId = i32;
pub type GameId = Uuid;
pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyPuzzle {
    pub id: PuzzleId,
    pub available_on: String, // YYYY-MM-DD, UTC
    pub answer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guess {
    pub attempt_number: u32,
    pub guess_name: String,
    pub created_at: String, // ISO 8601 string
}

/// A stored game as the record store hands it out.
/// `user_id` is `None` for games that only ever lived in an anonymous history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameRecord {
    pub id: GameId,
    pub user_id: Option<UserId>,
    pub puzzle_id: PuzzleId,
    pub guesses: Vec<Guess>,
    pub won: Option<bool>,
    pub is_finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum HintKind {
    PrimaryType,
    SecondaryType,
    EvolutionStage,
    Generation,
}

/// One row of the hint panel. Locked rows carry a placeholder value so the
/// layout stays the same as tiers unlock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HintRow {
    pub kind: HintKind,
    pub value: String,
    pub revealed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameView {
    pub date: String,
    pub status: GameStatus,
    pub attempts_used: u32,
    pub max_attempts: u32,
    pub guesses: Vec<Guess>,
    pub hint_level: u32,
    pub hints: Vec<HintRow>,
    pub image_url: Option<String>,
    pub answer: Option<String>, // Only populated once the game is over
    pub metadata_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessResponse {
    pub view: GameView,
    pub is_correct: bool,
    pub persisted: bool,
}

/// A finished game reduced to what the statistics engine needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DayResult {
    pub date: String,
    pub won: bool,
}

impl DayResult {
    pub fn new(date: impl Into<String>, won: bool) -> Self {
        Self {
            date: date.into(),
            won,
        }
    }
}
