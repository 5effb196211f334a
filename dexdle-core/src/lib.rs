pub mod day_key;
pub mod evolution;
pub mod game_state;
pub mod hints;
pub mod record_store;
pub mod search;
pub mod stats;

// Re-export main components
pub use day_key::*;
pub use evolution::*;
pub use game_state::*;
pub use hints::*;
pub use record_store::*;
pub use search::*;
pub use stats::*;
