//! Triage desk: validation, classification, dedup and acceptance for one
//! stream of inbound reports.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TriageError;
use crate::store::{MemoryStore, NewReport, QueueEntry, ReportStore};
use crate::triage::{
    DuplicateVerdict, EntityRecord, Explanation, UrgencyLevel, check_duplicate, explain, extract,
};

const DEFAULT_SOURCE: &str = "sms";

/// Raw inbound report as handed over by a transport.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
}

/// Classification plus dedup verdict.  `queue_entry` is `None` when the
/// report was blocked as a duplicate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageOutcome {
    pub entities: EntityRecord,
    pub explanation: Explanation,
    pub duplicate: DuplicateVerdict,
    pub queue_entry: Option<QueueEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub processed: usize,
    pub critical: usize,
    pub duplicates_blocked: usize,
    pub by_source: BTreeMap<String, usize>,
}

struct DeskState {
    store: Box<dyn ReportStore>,
    duplicates_blocked: usize,
    /// Every classified submission per source, duplicates included.
    by_source: BTreeMap<String, usize>,
}

/// Stateful front of the classification core.
///
/// The dedup check and the append run under one lock, so report N+1 is
/// always compared against a corpus that already reflects report N.
pub struct TriageDesk {
    state: Mutex<DeskState>,
    backend: String,
}

impl TriageDesk {
    pub fn new(store: Box<dyn ReportStore>) -> Self {
        let backend = store.describe();
        Self {
            state: Mutex::new(DeskState {
                store,
                duplicates_blocked: 0,
                by_source: BTreeMap::new(),
            }),
            backend,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::default()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, DeskState>, TriageError> {
        self.state
            .lock()
            .map_err(|_| TriageError::Store(anyhow!("triage desk lock poisoned")))
    }

    /// Classify a report and accept it unless it duplicates an earlier one.
    pub fn submit(&self, submission: Submission) -> Result<TriageOutcome, TriageError> {
        let text = submission.message.as_deref().unwrap_or_default().trim();
        if text.is_empty() {
            return Err(TriageError::EmptyMessage);
        }

        let entities = extract(text);
        let explanation = explain(&entities);
        let source = submission
            .source
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.into());

        let mut state = self.lock()?;
        *state.by_source.entry(source.clone()).or_insert(0) += 1;
        let corpus = state.store.entries()?;
        let duplicate = check_duplicate(text, corpus.iter().map(|e| (e.id, e.full_text.as_str())));

        if duplicate.is_duplicate {
            state.duplicates_blocked += 1;
            info!(
                "Duplicate blocked: {}% match with #{}",
                duplicate.similarity,
                duplicate.match_id.unwrap_or_default()
            );
            return Ok(TriageOutcome {
                entities,
                explanation,
                duplicate,
                queue_entry: None,
            });
        }

        let entry = state.store.append(NewReport {
            source,
            sender: submission.sender.filter(|s| !s.trim().is_empty()),
            text: text.to_string(),
            received_at: Utc::now(),
            entities: entities.clone(),
            explanation: explanation.clone(),
        })?;
        info!(
            "Accepted #{} [{}] from {} (score {})",
            entry.id,
            entry.urgency.name(),
            entry.source,
            entities.urgency_score
        );

        Ok(TriageOutcome {
            entities,
            explanation,
            duplicate,
            queue_entry: Some(entry),
        })
    }

    /// Accepted reports, `critical` first, newest first within a level.
    pub fn queue(&self) -> Result<Vec<QueueEntry>, TriageError> {
        let mut entries = self.lock()?.store.entries()?;
        entries.sort_by_key(|e| (e.urgency.rank(), Reverse(e.id)));
        Ok(entries)
    }

    /// Drop every accepted report and reset the id, duplicate and source
    /// counters.
    pub fn clear(&self) -> Result<(), TriageError> {
        let mut state = self.lock()?;
        state.store.clear()?;
        state.duplicates_blocked = 0;
        state.by_source.clear();
        info!("Queue cleared");
        Ok(())
    }

    pub fn stats(&self) -> Result<QueueStats, TriageError> {
        let state = self.lock()?;
        let entries = state.store.entries()?;

        Ok(QueueStats {
            processed: entries.len(),
            critical: entries
                .iter()
                .filter(|e| e.urgency == UrgencyLevel::Critical)
                .count(),
            duplicates_blocked: state.duplicates_blocked,
            by_source: state.by_source.clone(),
        })
    }
}

impl fmt::Display for TriageDesk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TriageDesk(store={}, dedup_threshold={})",
            self.backend,
            crate::triage::dedup::DUPLICATE_THRESHOLD,
        )
    }
}
