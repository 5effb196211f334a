use std::collections::BTreeMap;

use dexdle_types::{AggregateStats, DayResult, StatsCheckpoint};
use tracing::debug;

use crate::day_key::to_utc_day_number;

/// Reduce a player's finished games to totals and streaks.
///
/// Several results for the same date collapse into one, won if any of them
/// was won. Dates that do not parse are dropped entirely: they count towards
/// nothing and neither break nor extend a streak.
pub fn compute_stats(results: &[DayResult]) -> AggregateStats {
    resume_stats(None, results).stats
}

/// Continue counting from `checkpoint`. Results dated on or before the
/// checkpoint's last day are already part of it and are skipped.
pub fn resume_stats(checkpoint: Option<&StatsCheckpoint>, results: &[DayResult]) -> StatsCheckpoint {
    // BTreeMap keeps dates in ascending order; zero-padded ISO dates sort
    // lexicographically in calendar order.
    let mut by_date: BTreeMap<&str, bool> = BTreeMap::new();
    for result in results {
        let won = by_date.entry(result.date.as_str()).or_insert(false);
        *won |= result.won;
    }

    let mut resumed = checkpoint.cloned().unwrap_or_default();
    let mut stats = resumed.stats;
    let mut streak = stats.current_streak;
    let floor = resumed.last_date.as_deref().and_then(to_utc_day_number);
    let mut previous_day = floor;

    for (date, won) in by_date {
        let Some(day) = to_utc_day_number(date) else {
            debug!("Skipping result with malformed date '{}'", date);
            continue;
        };
        if floor.is_some_and(|floor| day <= floor) {
            continue;
        }

        stats.total_games += 1;
        if won {
            stats.total_wins += 1;
            streak = match previous_day {
                Some(previous) if day == previous + 1 => streak + 1,
                _ => 1,
            };
            stats.best_streak = stats.best_streak.max(streak);
        } else {
            streak = 0;
        }
        previous_day = Some(day);
        resumed.last_date = Some(date.to_string());
    }

    stats.current_streak = streak;
    resumed.stats = stats;
    resumed
}
