use std::sync::Arc;

use dexdle_core::{DailyGame, RecordStore, StoreError, compute_stats, parse_day};
use dexdle_persistence::{DatabaseStore, connection::connect_to_memory_database};
use dexdle_types::GameStatus;
use migration::{Migrator, MigratorTrait};
use uuid::Uuid;

async fn setup_store() -> DatabaseStore {
    let db = connect_to_memory_database().await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    DatabaseStore::new(db)
}

async fn seed(store: &DatabaseStore, first_day: &str, answers: &[&str]) {
    store
        .puzzles()
        .seed_puzzles(parse_day(first_day).unwrap(), answers)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_puzzle_lookup_by_date_string() {
    let store = setup_store().await;
    seed(&store, "2024-01-01", &["pikachu"]).await;

    let puzzle = store.get_puzzle_for_date("2024-01-01").await.unwrap().unwrap();
    assert_eq!(puzzle.answer_name, "pikachu");
    assert!(store.get_puzzle_for_date("2024-01-02").await.unwrap().is_none());
    assert!(store.get_puzzle_for_date("not-a-date").await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_game_creation_yields_one_game() {
    let store = Arc::new(setup_store().await);
    seed(&store, "2024-01-01", &["pikachu"]).await;
    let puzzle = store.get_puzzle_for_date("2024-01-01").await.unwrap().unwrap();
    let puzzle_id = puzzle.id;
    let user_id = Uuid::new_v4();

    let attempts = (0..8).map(|_| {
        let store = store.clone();
        tokio::spawn(async move { store.get_or_create_game(user_id, puzzle_id).await })
    });
    let games: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert!(games.iter().all(|game| game.id == games[0].id));
    let created = store.create_game(user_id, puzzle_id).await.unwrap();
    assert_eq!(created.id, games[0].id);
}

#[tokio::test]
async fn test_store_errors_keep_their_kind() {
    let store = setup_store().await;
    let result = store.finish_game(Uuid::new_v4(), true).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));

    let result = store.append_guess(Uuid::new_v4(), Uuid::new_v4(), "eevee").await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_state_machine_round_trip_through_store() {
    let store = setup_store().await;
    seed(&store, "2024-01-01", &["pikachu", "eevee", "mew"]).await;
    let user_id = Uuid::new_v4();

    for (date, guesses) in [
        ("2024-01-01", vec!["raichu", "pikachu"]),
        ("2024-01-02", vec!["eevee"]),
        ("2024-01-03", vec!["a", "b", "c", "d", "e", "f"]),
    ] {
        let puzzle = store.get_puzzle_for_date(date).await.unwrap().unwrap();
        let record = store.get_or_create_game(user_id, puzzle.id).await.unwrap();
        let mut game = DailyGame::from_record(&record, &puzzle.answer_name);

        for guess in guesses {
            let outcome = game.submit_guess(guess, &puzzle.answer_name);
            let stored = store.append_guess(record.id, user_id, guess).await.unwrap();
            assert_eq!(Some(stored.attempt_number), outcome.attempt_number);
            if let Some(won) = game.won() {
                store.finish_game(record.id, won).await.unwrap();
            }
        }

        let reloaded = store.get_game(user_id, puzzle.id).await.unwrap().unwrap();
        let restored = DailyGame::from_record(&reloaded, &puzzle.answer_name);
        assert_eq!(restored.status(), game.status());
        assert_eq!(restored.attempts_used(), game.attempts_used());
    }

    let last = store.get_puzzle_for_date("2024-01-03").await.unwrap().unwrap();
    let lost = store.get_game(user_id, last.id).await.unwrap().unwrap();
    assert_eq!(DailyGame::from_record(&lost, &last.answer_name).status(), GameStatus::Lost);

    let history = store.finished_games_with_dates(user_id).await.unwrap();
    let stats = compute_stats(&history);
    assert_eq!(stats.total_games, 3);
    assert_eq!(stats.total_wins, 2);
    assert_eq!(stats.best_streak, 2);
    assert_eq!(stats.current_streak, 0);
}
