use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Identity resolved from an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: String, // ISO 8601 string for simplicity
    pub updated_at: String,
}
