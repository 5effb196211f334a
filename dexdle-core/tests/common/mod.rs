#![allow(dead_code)]

use dexdle_core::{DailyGame, EvolutionNode, GuessOutcome};
use dexdle_types::{DayResult, SpeciesMetadata};

pub const ANSWER: &str = "pikachu";

/// Plays the given guesses in order against `answer`, returning every outcome.
pub fn play_guesses(game: &mut DailyGame, guesses: &[&str], answer: &str) -> Vec<GuessOutcome> {
    guesses
        .iter()
        .map(|guess| game.submit_guess(guess, answer))
        .collect()
}

pub fn day_results(entries: &[(&str, bool)]) -> Vec<DayResult> {
    entries
        .iter()
        .map(|(date, won)| DayResult::new(*date, *won))
        .collect()
}

pub fn pikachu_metadata() -> SpeciesMetadata {
    SpeciesMetadata {
        name: ANSWER.to_string(),
        types: vec!["electric".to_string()],
        generation: "generation-i".to_string(),
        evolution_stage: 2,
        sprite_url: Some("https://example.test/sprites/25.png".to_string()),
    }
}

/// pichu -> pikachu -> raichu
pub fn pikachu_chain() -> EvolutionNode {
    EvolutionNode::with_evolutions(
        "pichu",
        vec![EvolutionNode::with_evolutions(
            "pikachu",
            vec![EvolutionNode::new("raichu")],
        )],
    )
}
