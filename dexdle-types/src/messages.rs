use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GameError;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRequest {
    pub guess: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: GameError,
    pub message: String,
}

impl From<GameError> for ErrorResponse {
    fn from(error: GameError) -> Self {
        let message = error.to_string();
        Self { error, message }
    }
}
