use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::PersistencePolicy;
use crate::local_history::LocalHistory;
use crate::pokedex::PokemonLookup;
use dexdle_core::{
    DailyGame, RecordStore, StoreError, compute_stats, format_day, locked_hints, revealed_hints,
    utc_today,
};
use dexdle_types::{
    AggregateStats, DailyPuzzle, GameError, GameId, GameView, GuessResponse, MAX_ATTEMPTS, PuzzleId,
    SpeciesMatch, User, UserId,
};

/// Upper bound on `limit` for species search.
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Today's puzzle for one player, whichever backend holds their game.
///
/// Signed-in players are served from the [`RecordStore`]; anonymous players
/// from the [`LocalHistory`] their client sends along. Both load into the same
/// [`DailyGame`] before any rule is applied.
pub struct DailyGameService {
    store: Arc<dyn RecordStore>,
    pokedex: Arc<dyn PokemonLookup>,
    policy: PersistencePolicy,
    search_limit: usize,
    game_locks: DashMap<(UserId, PuzzleId), Arc<Mutex<()>>>,
    fixed_date: Option<NaiveDate>,
}

impl DailyGameService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        pokedex: Arc<dyn PokemonLookup>,
        policy: PersistencePolicy,
    ) -> Self {
        Self {
            store,
            pokedex,
            policy,
            search_limit: 10,
            game_locks: DashMap::new(),
            fixed_date: None,
        }
    }

    /// Pin "today" to a given date instead of the UTC clock.
    pub fn with_fixed_date(mut self, date: NaiveDate) -> Self {
        self.fixed_date = Some(date);
        self
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        self
    }

    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    pub fn today(&self) -> String {
        format_day(self.fixed_date.unwrap_or_else(utc_today))
    }

    async fn todays_puzzle(&self) -> Result<DailyPuzzle, GameError> {
        let date = self.today();
        match self.store.get_puzzle_for_date(&date).await {
            Ok(Some(puzzle)) => Ok(puzzle),
            Ok(None) => {
                info!("No puzzle scheduled for {}", date);
                Err(GameError::PuzzleUnavailable { date })
            }
            Err(e) => {
                tracing::error!("Failed to load puzzle for {}: {}", date, e);
                Err(GameError::Internal {
                    message: "failed to load today's puzzle".to_string(),
                })
            }
        }
    }

    async fn load_user_game(
        &self,
        user: &User,
        puzzle: &DailyPuzzle,
    ) -> Result<(DailyGame, GameId), GameError> {
        let record = self
            .store
            .get_or_create_game(user.id, puzzle.id)
            .await
            .map_err(|e| {
                warn!("Failed to load game for user {}: {}", user.id, e);
                GameError::PersistenceFailure {
                    message: e.to_string(),
                }
            })?;
        let game = DailyGame::from_record(&record, &puzzle.answer_name);

        // A result write that failed earlier is retried on the next load
        if let Some(won) = game.won().filter(|_| !record.is_finished) {
            info!(
                "Recording missing result for user {} on {}",
                user.id, puzzle.available_on
            );
            if let Err(e) = self.store.finish_game(record.id, won).await {
                warn!(
                    "Result for user {} on {} still not saved: {}",
                    user.id, puzzle.available_on, e
                );
            }
        }

        Ok((game, record.id))
    }

    fn load_local_game(history: &LocalHistory, puzzle: &DailyPuzzle) -> DailyGame {
        match history.get(&puzzle.available_on) {
            Some(record) if record.answer_name.eq_ignore_ascii_case(&puzzle.answer_name) => {
                DailyGame::from_local(record)
            }
            Some(_) => {
                debug!("Ignoring local record for a different puzzle on {}", puzzle.available_on);
                DailyGame::new()
            }
            None => DailyGame::new(),
        }
    }

    pub async fn today_view(
        &self,
        user: Option<&User>,
        history: &LocalHistory,
    ) -> Result<GameView, GameError> {
        let puzzle = self.todays_puzzle().await?;
        let game = match user {
            Some(user) => self.load_user_game(user, &puzzle).await?.0,
            None => Self::load_local_game(history, &puzzle),
        };
        Ok(self.render_view(&puzzle, &game).await)
    }

    /// Apply one guess to today's game. Anonymous guesses are written back into
    /// `history`; the caller is responsible for returning it to the client.
    pub async fn submit_guess(
        &self,
        user: Option<&User>,
        history: &mut LocalHistory,
        guess: &str,
    ) -> Result<GuessResponse, GameError> {
        let guess = guess.trim();
        if guess.is_empty() {
            return Err(GameError::InvalidGuess {
                reason: "guess is empty".to_string(),
            });
        }

        let puzzle = self.todays_puzzle().await?;

        match user {
            Some(user) => {
                let key = (user.id, puzzle.id);
                let lock = self.game_lock(key);
                let result = {
                    let _guard = lock.lock().await;
                    self.submit_for_user(user, &puzzle, guess).await
                };
                drop(lock);
                self.game_locks
                    .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
                result
            }
            None => {
                let mut game = Self::load_local_game(history, &puzzle);
                let outcome = game.submit_guess(guess, &puzzle.answer_name);
                if outcome.accepted {
                    history.upsert(game.to_local_record(&puzzle.available_on, &puzzle.answer_name));
                }

                Ok(GuessResponse {
                    view: self.render_view(&puzzle, &game).await,
                    is_correct: outcome.is_correct,
                    persisted: true,
                })
            }
        }
    }

    fn game_lock(&self, key: (UserId, PuzzleId)) -> Arc<Mutex<()>> {
        self.game_locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    async fn submit_for_user(
        &self,
        user: &User,
        puzzle: &DailyPuzzle,
        guess: &str,
    ) -> Result<GuessResponse, GameError> {
        let (mut game, game_id) = self.load_user_game(user, puzzle).await?;
        let outcome = game.submit_guess(guess, &puzzle.answer_name);

        let mut persisted = true;
        if outcome.accepted {
            let guess_saved = self
                .store
                .append_guess(game_id, user.id, guess)
                .await
                .map(|_| ());
            // Under Strict a lost guess leaves the game open for a retry
            let finish = game
                .won()
                .filter(|_| self.policy == PersistencePolicy::BestEffort || guess_saved.is_ok());

            let mut writes: Vec<Result<(), StoreError>> = vec![guess_saved];
            if let Some(won) = finish {
                writes.push(self.store.finish_game(game_id, won).await);
            }

            for error in writes.into_iter().filter_map(Result::err) {
                match self.policy {
                    PersistencePolicy::BestEffort => {
                        warn!(
                            "Guess by {} on {} not saved: {}",
                            user.id, puzzle.available_on, error
                        );
                        persisted = false;
                    }
                    PersistencePolicy::Strict => {
                        warn!(
                            "Rejecting guess by {} on {}: {}",
                            user.id, puzzle.available_on, error
                        );
                        return Err(GameError::PersistenceFailure {
                            message: error.to_string(),
                        });
                    }
                }
            }
        }

        Ok(GuessResponse {
            view: self.render_view(puzzle, &game).await,
            is_correct: outcome.is_correct,
            persisted,
        })
    }

    pub async fn stats(
        &self,
        user: Option<&User>,
        history: &LocalHistory,
    ) -> Result<AggregateStats, GameError> {
        let Some(user) = user else {
            return Ok(history.stats());
        };

        let results = self
            .store
            .finished_games_with_dates(user.id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load history for {}: {}", user.id, e);
                GameError::Internal {
                    message: "failed to load game history".to_string(),
                }
            })?;
        Ok(compute_stats(&results))
    }

    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SpeciesMatch>, GameError> {
        let limit = limit.unwrap_or(self.search_limit).min(MAX_SEARCH_LIMIT);
        self.pokedex.search(query, limit).await.map_err(|e| {
            warn!("Species search for '{}' failed: {}", query, e);
            GameError::MetadataUnavailable
        })
    }

    async fn render_view(&self, puzzle: &DailyPuzzle, game: &DailyGame) -> GameView {
        let metadata = match self.pokedex.resolve_species(&puzzle.answer_name).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(
                    "No species data for '{}' on {}: {}",
                    puzzle.answer_name, puzzle.available_on, e
                );
                None
            }
        };

        let hint_level = game.hint_level();
        let (hints, image_url) = match &metadata {
            Some(species) => (
                revealed_hints(hint_level, species),
                species.sprite_url.clone().filter(|_| game.image_revealed()),
            ),
            None => (locked_hints(), None),
        };

        GameView {
            date: puzzle.available_on.clone(),
            status: game.status(),
            attempts_used: game.attempts_used(),
            max_attempts: MAX_ATTEMPTS as u32,
            guesses: game.guesses().to_vec(),
            hint_level,
            hints,
            image_url,
            answer: game.is_finished().then(|| puzzle.answer_name.clone()),
            metadata_available: metadata.is_some(),
        }
    }
}
