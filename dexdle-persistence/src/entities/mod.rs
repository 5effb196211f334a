pub mod prelude;

pub mod daily_puzzles;
pub mod games;
pub mod guesses;
pub mod profiles;
