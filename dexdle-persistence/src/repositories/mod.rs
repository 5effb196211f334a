pub mod game_repository;
pub mod profile_repository;
pub mod puzzle_repository;

pub use game_repository::GameRepository;
pub use profile_repository::ProfileRepository;
pub use puzzle_repository::PuzzleRepository;
