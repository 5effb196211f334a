pub mod errors;
pub mod game;
pub mod local;
pub mod messages;
pub mod pokemon;
pub mod stats;
pub mod user;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use local::*;
pub use messages::*;
pub use pokemon::*;
pub use stats::*;
pub use user::*;
