use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AggregateStats {
    pub total_games: u32,
    pub total_wins: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Stats already counted for days that are no longer listed one by one.
/// `last_date` is the latest day folded in; later results resume from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatsCheckpoint {
    pub stats: AggregateStats,
    pub last_date: Option<String>,
}
