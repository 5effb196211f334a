mod common;

use common::*;
use dexdle_core::{
    DailyGame, EvolutionNode, compute_stats, decode_roman, evolution_stage, revealed_hints,
    to_roman,
};
use dexdle_types::{GameStatus, MAX_ATTEMPTS};

#[test]
fn test_win_on_last_attempt_reveals_everything() {
    let mut game = DailyGame::new();
    let misses = ["bulbasaur", "charmander", "squirtle", "eevee", "snorlax"];
    let outcomes = play_guesses(&mut game, &misses, ANSWER);
    assert!(outcomes.iter().all(|outcome| !outcome.is_correct));
    assert!(game.image_revealed());

    let outcome = game.submit_guess("pikachu", ANSWER);
    assert!(outcome.is_correct);
    assert_eq!(game.won(), Some(true));
    assert_eq!(game.attempts_used(), MAX_ATTEMPTS as u32);

    let hints = revealed_hints(game.hint_level(), &pikachu_metadata());
    assert!(hints.iter().all(|row| row.revealed));
    assert_eq!(hints[0].value, "electric");
    assert_eq!(hints[1].value, "None");
    assert_eq!(hints[2].value, "2");
    assert_eq!(hints[3].value, "1");
}

#[test]
fn test_loss_keeps_generation_hint_locked_until_fifth_attempt() {
    let mut game = DailyGame::new();
    play_guesses(&mut game, &["a", "b", "c"], ANSWER);
    let hints = revealed_hints(game.hint_level(), &pikachu_metadata());
    assert!(hints[2].revealed);
    assert!(!hints[3].revealed);

    play_guesses(&mut game, &["d", "e", "f"], ANSWER);
    assert_eq!(game.status(), GameStatus::Lost);
    let hints = revealed_hints(game.hint_level(), &pikachu_metadata());
    assert!(hints.iter().all(|row| row.revealed));
}

#[test]
fn test_terminal_game_stays_terminal() {
    let mut game = DailyGame::new();
    play_guesses(&mut game, &["a", "b", "c", "d", "e", "f"], ANSWER);
    let attempts = game.attempts_used();

    for _ in 0..3 {
        let outcome = game.submit_guess(ANSWER, ANSWER);
        assert!(!outcome.accepted);
    }
    assert_eq!(game.attempts_used(), attempts);
    assert_eq!(game.status(), GameStatus::Lost);
}

#[test]
fn test_streak_scenarios() {
    let gap = compute_stats(&day_results(&[
        ("2024-01-01", true),
        ("2024-01-02", true),
        ("2024-01-04", true),
    ]));
    assert_eq!((gap.best_streak, gap.current_streak), (2, 1));

    let loss = compute_stats(&day_results(&[
        ("2024-01-01", true),
        ("2024-01-02", true),
        ("2024-01-03", false),
    ]));
    assert_eq!((loss.best_streak, loss.current_streak), (2, 0));

    let malformed = compute_stats(&day_results(&[
        ("2024-01-01", true),
        ("bad-date", true),
        ("2024-01-02", true),
    ]));
    let clean = compute_stats(&day_results(&[("2024-01-01", true), ("2024-01-02", true)]));
    assert_eq!(malformed, clean);
}

#[test]
fn test_local_history_feeds_statistics() {
    let mut monday = DailyGame::new();
    play_guesses(&mut monday, &["eevee", "pikachu"], ANSWER);
    let mut tuesday = DailyGame::new();
    play_guesses(&mut tuesday, &["pikachu"], ANSWER);

    let records = [
        monday.to_local_record("2024-01-01", ANSWER),
        tuesday.to_local_record("2024-01-02", ANSWER),
    ];
    let results: Vec<_> = records
        .iter()
        .filter(|record| record.is_finished)
        .map(|record| dexdle_types::DayResult::new(record.date.clone(), record.won))
        .collect();

    let stats = compute_stats(&results);
    assert_eq!(stats.total_games, 2);
    assert_eq!(stats.current_streak, 2);
}

#[test]
fn test_evolution_bfs_scenario() {
    let chain = EvolutionNode::with_evolutions(
        "A",
        vec![EvolutionNode::with_evolutions(
            "B",
            vec![EvolutionNode::new("C"), EvolutionNode::new("D")],
        )],
    );
    assert_eq!(evolution_stage(&chain, "D"), 3);
    assert_eq!(evolution_stage(&chain, "A"), 1);
    assert_eq!(evolution_stage(&chain, "Z"), 1);
    assert_eq!(evolution_stage(&pikachu_chain(), ANSWER), 2);
}

#[test]
fn test_generation_numerals_round_trip() {
    for generation in 1..=9u32 {
        let numeral = to_roman(generation);
        assert_eq!(decode_roman(&numeral), Some(generation));
        assert_eq!(
            dexdle_core::generation_ordinal(&format!("generation-{}", numeral)),
            Some(generation)
        );
    }
}
