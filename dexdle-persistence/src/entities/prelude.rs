pub use super::daily_puzzles::Entity as DailyPuzzles;
pub use super::games::Entity as Games;
pub use super::guesses::Entity as Guesses;
pub use super::profiles::Entity as Profiles;
