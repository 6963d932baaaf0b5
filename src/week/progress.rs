//! Progress tracker: the persisted completion record and the only
//! operations allowed to mutate it.
//!
//! ## Record shape (JSON, camelCase to match what pages already stored)
//!
//! ```text
//! {
//!   "completedDays": ["rose", "propose"],
//!   "promises": ["Always listen"],
//!   "roseCount": 12, "chocolateMatches": 6, "hugCount": 20, "kissScore": 15
//! }
//! ```
//!
//! ## Lifecycle
//!
//! - **First visit:** empty defaults
//! - **Every page load:** stored JSON merged over defaults (stored values win,
//!   missing or unreadable fields keep their defaults)
//! - **Mutation:** only `mark_complete*` and `append_promise`, each followed by
//!   exactly one write; no-ops write nothing

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::week::days::DayId;
use crate::week::store::ProgressStore;

/// Longest promise kept, in characters (the input's `maxlength`).
pub const MAX_PROMISE_CHARS: usize = 80;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("invalid progress JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("could not serialize progress: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Persisted completion state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    /// Completed days, in completion order. Never holds duplicates.
    #[serde(deserialize_with = "lenient_days")]
    pub completed_days: Vec<DayId>,
    /// Promise Day entries, in insertion order. Duplicates allowed.
    #[serde(deserialize_with = "lenient_strings")]
    pub promises: Vec<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub rose_count: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub chocolate_matches: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub hug_count: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub kiss_score: u32,
}

impl ProgressRecord {
    /// Parse a stored blob, merging it over the defaults.
    pub fn from_json(json: &str) -> Result<Self, ProgressError> {
        serde_json::from_str(json).map_err(ProgressError::Json)
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        serde_json::to_string(self).map_err(ProgressError::Serialize)
    }

    pub fn is_complete(&self, day: DayId) -> bool {
        self.completed_days.contains(&day)
    }

    fn tally_slot(&mut self, day: DayId) -> Option<&mut u32> {
        match day {
            DayId::Rose => Some(&mut self.rose_count),
            DayId::Chocolate => Some(&mut self.chocolate_matches),
            DayId::Hug => Some(&mut self.hug_count),
            DayId::Kiss => Some(&mut self.kiss_score),
            _ => None,
        }
    }
}

/// Unknown day names are dropped, duplicates collapsed, order kept.
fn lenient_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<DayId>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let mut days = Vec::new();
    if let Value::Array(items) = raw {
        for item in items {
            if let Some(day) = item.as_str().and_then(DayId::from_slug) {
                if !days.contains(&day) {
                    days.push(day);
                }
            }
        }
    }
    Ok(days)
}

/// Non-string entries are dropped.
fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Anything that isn't a non-negative number reads as 0.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(raw
        .as_u64()
        .or_else(|| raw.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(0))
}

/// Owns the record and its store; the only path to mutate either.
#[derive(Debug)]
pub struct ProgressTracker<S> {
    record: ProgressRecord,
    store: S,
}

impl<S: ProgressStore> ProgressTracker<S> {
    /// Read whatever the store holds. Unreadable data falls back to defaults.
    pub fn load(store: S) -> Self {
        let record = match store.load() {
            Some(blob) if !blob.trim().is_empty() => match ProgressRecord::from_json(&blob) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "stored progress unreadable, starting fresh");
                    ProgressRecord::default()
                }
            },
            _ => ProgressRecord::default(),
        };
        Self { record, store }
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn is_complete(&self, day: DayId) -> bool {
        self.record.is_complete(day)
    }

    /// `(completed, total)`: total is always 8.
    pub fn completion_ratio(&self) -> (usize, usize) {
        (self.record.completed_days.len(), DayId::COUNT)
    }

    /// Mark a day complete. Returns `true` if this call changed anything;
    /// a repeat call is a no-op with no write.
    pub fn mark_complete(&mut self, day: DayId) -> bool {
        self.mark_complete_with_tally(day, None)
    }

    /// Like `mark_complete`, also recording the engine's final counter into
    /// the day's advisory field as part of the same single write.
    pub fn mark_complete_with_tally(&mut self, day: DayId, tally: Option<u32>) -> bool {
        if self.record.is_complete(day) {
            debug!(%day, "already complete");
            return false;
        }
        self.record.completed_days.push(day);
        if let (Some(value), Some(slot)) = (tally, self.record.tally_slot(day)) {
            *slot = value;
        }
        info!(%day, completed = self.record.completed_days.len(), "day completed");
        self.persist();
        true
    }

    /// Append a promise. Blank input is rejected silently; otherwise the
    /// trimmed text (capped at 80 characters) is stored and persisted.
    /// Returns the stored text.
    pub fn append_promise(&mut self, text: &str) -> Option<&str> {
        let trimmed = normalize_promise(text)?;
        self.record.promises.push(trimmed);
        self.persist();
        self.record.promises.last().map(String::as_str)
    }

    pub fn promises(&self) -> &[String] {
        &self.record.promises
    }

    /// Replace the in-memory record with a stored blob (page-load restore).
    /// Does not write back.
    pub fn restore(&mut self, blob: &str) -> Result<(), ProgressError> {
        if blob.trim().is_empty() {
            return Ok(());
        }
        self.record = ProgressRecord::from_json(blob)?;
        info!(
            completed = self.record.completed_days.len(),
            promises = self.record.promises.len(),
            "progress restored"
        );
        Ok(())
    }

    /// JSON of the current record; `{}` if serialization somehow fails.
    pub fn export_json(&self) -> String {
        self.record.to_json().unwrap_or_else(|_| "{}".to_string())
    }

    fn persist(&mut self) {
        match self.record.to_json() {
            Ok(json) => self.store.save(&json),
            Err(e) => warn!(error = %e, "progress not persisted"),
        }
    }
}

/// Trim and cap a promise; `None` for blank input.
pub fn normalize_promise(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_PROMISE_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::store::MemoryStore;

    fn fresh() -> ProgressTracker<MemoryStore> {
        ProgressTracker::load(MemoryStore::default())
    }

    #[test]
    fn first_load_is_empty() {
        let t = fresh();
        assert_eq!(t.record(), &ProgressRecord::default());
        assert_eq!(t.completion_ratio(), (0, 8));
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut t = fresh();
        assert!(t.mark_complete(DayId::Rose));
        assert!(!t.mark_complete(DayId::Rose));
        assert_eq!(t.record().completed_days, vec![DayId::Rose]);
        assert_eq!(t.store().writes.len(), 1);
    }

    #[test]
    fn ratio_counts_distinct_days() {
        let mut t = fresh();
        for (k, day) in DayId::ALL.iter().enumerate() {
            t.mark_complete(*day);
            t.mark_complete(*day);
            assert_eq!(t.completion_ratio(), (k + 1, 8));
        }
    }

    #[test]
    fn tally_is_recorded_only_on_first_completion() {
        let mut t = fresh();
        assert!(t.mark_complete_with_tally(DayId::Kiss, Some(17)));
        assert!(!t.mark_complete_with_tally(DayId::Kiss, Some(30)));
        assert_eq!(t.record().kiss_score, 17);
        // Days without an advisory counter ignore the tally.
        assert!(t.mark_complete_with_tally(DayId::Teddy, Some(4)));
        assert_eq!(t.store().writes.len(), 2);
    }

    #[test]
    fn blank_promises_are_rejected_without_write() {
        let mut t = fresh();
        assert!(t.append_promise("").is_none());
        assert!(t.append_promise("   \t ").is_none());
        assert!(t.promises().is_empty());
        assert!(t.store().writes.is_empty());
    }

    #[test]
    fn promises_are_trimmed_kept_in_order_and_may_repeat() {
        let mut t = fresh();
        assert_eq!(t.append_promise("  Always listen "), Some("Always listen"));
        t.append_promise("Dance in the kitchen");
        t.append_promise("Always listen");
        assert_eq!(
            t.promises(),
            &["Always listen", "Dance in the kitchen", "Always listen"]
        );
        assert_eq!(t.store().writes.len(), 3);
    }

    #[test]
    fn long_promises_are_capped() {
        let mut t = fresh();
        let long = "x".repeat(200);
        let stored = t.append_promise(&long).unwrap();
        assert_eq!(stored.chars().count(), MAX_PROMISE_CHARS);
    }

    #[test]
    fn stored_values_win_over_defaults() {
        let blob = r#"{"completedDays":["rose","hug"],"hugCount":20,"progress":25}"#;
        let t = ProgressTracker::load(MemoryStore::with_blob(blob));
        assert_eq!(t.record().completed_days, vec![DayId::Rose, DayId::Hug]);
        assert_eq!(t.record().hug_count, 20);
        assert!(t.record().promises.is_empty());
        assert_eq!(t.record().kiss_score, 0);
    }

    #[test]
    fn lenient_fields_drop_junk() {
        let blob = r#"{
            "completedDays": ["rose", "birthday", "rose", 7, "kiss"],
            "promises": ["one", 2, null, "three"],
            "roseCount": -4,
            "kissScore": "lots",
            "chocolateMatches": 6.0
        }"#;
        let r = ProgressRecord::from_json(blob).unwrap();
        assert_eq!(r.completed_days, vec![DayId::Rose, DayId::Kiss]);
        assert_eq!(r.promises, vec!["one", "three"]);
        assert_eq!(r.rose_count, 0);
        assert_eq!(r.kiss_score, 0);
        assert_eq!(r.chocolate_matches, 6);
    }

    #[test]
    fn malformed_blob_falls_back_to_defaults() {
        for blob in ["not json {{{", "null", "[1,2]", "42"] {
            let t = ProgressTracker::load(MemoryStore::with_blob(blob));
            assert_eq!(t.record(), &ProgressRecord::default(), "blob: {blob}");
        }
    }

    #[test]
    fn serialized_shape_uses_camel_case() {
        let mut t = fresh();
        t.mark_complete(DayId::Chocolate);
        t.append_promise("Be kind");
        let json = t.export_json();
        assert!(json.contains(r#""completedDays":["chocolate"]"#));
        assert!(json.contains(r#""promises":["Be kind"]"#));
        assert!(json.contains(r#""chocolateMatches":0"#));
    }

    #[test]
    fn restore_replaces_record_without_writing() {
        let mut t = fresh();
        t.restore(r#"{"completedDays":["valentine"],"promises":["p"]}"#)
            .unwrap();
        assert!(t.is_complete(DayId::Valentine));
        assert_eq!(t.promises(), &["p"]);
        assert!(t.store().writes.is_empty());
        assert!(t.restore("{oops").is_err());
        assert!(t.is_complete(DayId::Valentine));
        assert!(t.restore("  ").is_ok());
    }

    #[test]
    fn normalize_promise_rules() {
        assert_eq!(normalize_promise(" hi "), Some("hi".to_string()));
        assert_eq!(normalize_promise("\n"), None);
    }
}
