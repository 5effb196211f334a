use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use dexdle_core::resume_stats;
use dexdle_types::{AggregateStats, DayResult, LocalGameRecord, MAX_ATTEMPTS, StatsCheckpoint};

pub const HISTORY_COOKIE: &str = "dexdle_history";

/// Browsers drop cookies over 4 KB, so only the most recent days are listed.
/// Older days live on in the history's stats checkpoint.
pub const MAX_HISTORY_ENTRIES: usize = 24;

const COOKIE_MAX_AGE_SECONDS: u64 = 60 * 60 * 24 * 400;

/// An anonymous player's per-day records, carried in a cookie.
///
/// At most one entry per date; entries are kept sorted by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<StatsCheckpoint>,
    records: Vec<LocalGameRecord>,
}

/// Cookie payloads accepted on the way in. Older clients sent a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    Current(LocalHistory),
    List(Vec<LocalGameRecord>),
}

impl LocalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the cookie value. Anything unreadable is treated as an empty
    /// history rather than an error.
    pub fn from_cookie(value: Option<&str>) -> Self {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Self::new();
        };

        let decoded = URL_SAFE_NO_PAD
            .decode(value.trim_end_matches('='))
            .map_err(|e| e.to_string())
            .and_then(|bytes| {
                serde_json::from_slice::<StoredHistory>(&bytes).map_err(|e| e.to_string())
            });

        let (summary, records) = match decoded {
            Ok(StoredHistory::Current(stored)) => (stored.summary, stored.records),
            Ok(StoredHistory::List(records)) => (None, records),
            Err(e) => {
                tracing::warn!("Discarding unreadable history cookie: {}", e);
                return Self::new();
            }
        };

        let mut history = Self {
            summary,
            records: Vec::new(),
        };
        for mut record in records {
            // Client-supplied counts are bounded by the attempt limit
            record.guesses.truncate(MAX_ATTEMPTS);
            record.guess_count = record.guess_count.min(MAX_ATTEMPTS as u32);
            history.insert(record);
        }
        history.fold_excess();
        history
    }

    pub fn to_cookie_value(&self) -> String {
        // Serializing plain data structs cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn set_cookie_header(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax; HttpOnly",
            HISTORY_COOKIE,
            self.to_cookie_value(),
            COOKIE_MAX_AGE_SECONDS
        )
    }

    pub fn get(&self, date: &str) -> Option<&LocalGameRecord> {
        self.records.iter().find(|record| record.date == date)
    }

    /// Replace the entry for `record.date`, or add it. Guess lists of every
    /// other day are dropped and the oldest entries folded into the summary.
    pub fn upsert(&mut self, record: LocalGameRecord) {
        let date = record.date.clone();
        self.insert(record);

        for other in self.records.iter_mut().filter(|r| r.date != date) {
            other.guesses.clear();
        }

        self.fold_excess();
    }

    fn fold_excess(&mut self) {
        let excess = self.records.len().saturating_sub(MAX_HISTORY_ENTRIES);
        if excess == 0 {
            return;
        }

        tracing::debug!("Folding {} old history entries into the summary", excess);
        let folded: Vec<DayResult> = self
            .records
            .drain(..excess)
            .filter(|record| record.is_finished)
            .map(|record| DayResult::new(record.date, record.won))
            .collect();
        self.summary = Some(resume_stats(self.summary.as_ref(), &folded));
    }

    fn insert(&mut self, record: LocalGameRecord) {
        match self.records.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => *existing = record,
            None => {
                self.records.push(record);
                self.records.sort_by(|a, b| a.date.cmp(&b.date));
            }
        }
    }

    pub fn finished_results(&self) -> Vec<DayResult> {
        self.records
            .iter()
            .filter(|record| record.is_finished)
            .map(|record| DayResult::new(record.date.clone(), record.won))
            .collect()
    }

    /// Totals and streaks over every day this history has seen, listed or
    /// folded.
    pub fn stats(&self) -> AggregateStats {
        resume_stats(self.summary.as_ref(), &self.finished_results()).stats
    }

    pub fn summary(&self) -> Option<&StatsCheckpoint> {
        self.summary.as_ref()
    }

    pub fn records(&self) -> &[LocalGameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
