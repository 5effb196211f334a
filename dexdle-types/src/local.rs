use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The per-day record an anonymous player keeps on their own device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LocalGameRecord {
    pub date: String,
    pub won: bool,
    pub guess_count: u32,
    pub answer_name: String,
    pub is_finished: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guesses: Vec<String>,
}
