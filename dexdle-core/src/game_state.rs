use dexdle_types::{GameRecord, GameStatus, Guess, LocalGameRecord, MAX_ATTEMPTS};
use tracing::{debug, warn};

/// Result of handing one guess to a [`DailyGame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessOutcome {
    /// False when the game was already over and the guess was ignored.
    pub accepted: bool,
    pub is_correct: bool,
    pub attempt_number: Option<u32>,
    pub status: GameStatus,
}

/// State of one player's attempt at one daily puzzle.
///
/// Both storage backends load into and drain out of this type, so the rules
/// below are the only place attempt limits and terminal states are enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyGame {
    guesses: Vec<Guess>,
    status: GameStatus,
}

impl Default for DailyGame {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyGame {
    pub fn new() -> Self {
        Self {
            guesses: Vec::new(),
            status: GameStatus::NotStarted,
        }
    }

    /// Rebuild a game from persisted pieces by replaying the stored guesses
    /// against `answer_name`. The stored result only decides games the replay
    /// leaves open, such as history entries that kept a count but no names.
    pub fn restore(
        mut guesses: Vec<Guess>,
        won: Option<bool>,
        is_finished: bool,
        answer_name: &str,
    ) -> Self {
        guesses.sort_by_key(|guess| guess.attempt_number);

        let mut game = Self::new();
        let total = guesses.len();
        for guess in guesses {
            if game.status.is_terminal() {
                warn!(
                    "Restoring game with {} guesses, dropping those after attempt {}",
                    total,
                    game.attempts_used()
                );
                break;
            }
            game.apply(guess, answer_name);
        }

        if !game.status.is_terminal() {
            if won == Some(true) {
                game.status = GameStatus::Won;
            } else if is_finished {
                game.status = GameStatus::Lost;
            }
        }

        game
    }

    pub fn from_record(record: &GameRecord, answer_name: &str) -> Self {
        Self::restore(
            record.guesses.clone(),
            record.won,
            record.is_finished,
            answer_name,
        )
    }

    /// Rebuild from an anonymous history entry. Entries written without the
    /// guess list are padded with unnamed guesses so the attempt count holds.
    pub fn from_local(record: &LocalGameRecord) -> Self {
        let count = (record.guess_count as usize)
            .max(record.guesses.len())
            .min(MAX_ATTEMPTS);
        let guesses = (0..count)
            .map(|index| Guess {
                attempt_number: index as u32 + 1,
                guess_name: record.guesses.get(index).cloned().unwrap_or_default(),
                created_at: String::new(),
            })
            .collect();

        let won = record.is_finished.then_some(record.won);
        Self::restore(guesses, won, record.is_finished, &record.answer_name)
    }

    /// Record a guess against `answer_name`. Guesses on a finished game are
    /// ignored and leave the state untouched.
    pub fn submit_guess(&mut self, guess_name: &str, answer_name: &str) -> GuessOutcome {
        if self.status.is_terminal() {
            warn!("Ignoring guess '{}' on a finished game", guess_name);
            return GuessOutcome {
                accepted: false,
                is_correct: false,
                attempt_number: None,
                status: self.status,
            };
        }

        let is_correct = self.apply(
            Guess {
                attempt_number: 0,
                guess_name: guess_name.to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
            answer_name,
        );
        let attempt_number = self.attempts_used();

        debug!(
            "Attempt {} '{}' -> {:?}",
            attempt_number, guess_name, self.status
        );

        GuessOutcome {
            accepted: true,
            is_correct,
            attempt_number: Some(attempt_number),
            status: self.status,
        }
    }

    /// Append `guess` as the next attempt and move the status on.
    fn apply(&mut self, mut guess: Guess, answer_name: &str) -> bool {
        let attempt_number = self.guesses.len() as u32 + 1;
        let is_correct = !guess.guess_name.is_empty()
            && guess.guess_name.to_lowercase() == answer_name.to_lowercase();

        guess.attempt_number = attempt_number;
        self.guesses.push(guess);

        self.status = if is_correct {
            GameStatus::Won
        } else if attempt_number as usize >= MAX_ATTEMPTS {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        };
        is_correct
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn last_guess(&self) -> Option<&Guess> {
        self.guesses.last()
    }

    pub fn attempts_used(&self) -> u32 {
        self.guesses.len() as u32
    }

    pub fn attempts_remaining(&self) -> u32 {
        (MAX_ATTEMPTS as u32).saturating_sub(self.attempts_used())
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// `Some(true)` once won, `Some(false)` once lost, `None` while undecided.
    pub fn won(&self) -> Option<bool> {
        match self.status {
            GameStatus::Won => Some(true),
            GameStatus::Lost => Some(false),
            _ => None,
        }
    }

    /// How many hint tiers are unlocked. A win unlocks everything at once;
    /// otherwise one tier per attempt, capped one below the attempt limit.
    pub fn hint_level(&self) -> u32 {
        if self.status == GameStatus::Won {
            MAX_ATTEMPTS as u32
        } else {
            self.attempts_used().min(MAX_ATTEMPTS as u32 - 1)
        }
    }

    /// The sprite shows on the final attempt and after a win.
    pub fn image_revealed(&self) -> bool {
        self.status == GameStatus::Won || self.attempts_used() as usize >= MAX_ATTEMPTS - 1
    }

    pub fn to_local_record(&self, date: &str, answer_name: &str) -> LocalGameRecord {
        LocalGameRecord {
            date: date.to_string(),
            won: self.status == GameStatus::Won,
            guess_count: self.attempts_used(),
            answer_name: answer_name.to_string(),
            is_finished: self.is_finished(),
            guesses: self
                .guesses
                .iter()
                .map(|guess| guess.guess_name.clone())
                .collect(),
        }
    }
}
