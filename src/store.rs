//! Accepted-report stores: in-memory (default) and SQLite.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlite::State;
use tracing::info;

use crate::triage::{EntityRecord, Explanation, UrgencyLevel};

const PREVIEW_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A report that passed validation and dedup, before it has an id.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub source: String,
    pub sender: Option<String>,
    pub text: String,
    pub received_at: DateTime<Utc>,
    pub entities: EntityRecord,
    pub explanation: Explanation,
}

/// One accepted report in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub id: u64,
    pub source: String,
    pub sender: Option<String>,
    pub preview: String,
    pub full_text: String,
    pub urgency: UrgencyLevel,
    pub received_at: i64,
    pub time: String,
    pub entities: EntityRecord,
    pub explanation: Explanation,
}

impl QueueEntry {
    pub fn new(id: u64, report: NewReport) -> Self {
        Self {
            id,
            preview: preview(&report.text),
            urgency: report.entities.urgency,
            received_at: report.received_at.timestamp(),
            time: report.received_at.format("%H:%M").to_string(),
            source: report.source,
            sender: report.sender,
            full_text: report.text,
            entities: report.entities,
            explanation: report.explanation,
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}…")
    } else {
        text.to_string()
    }
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Owner of the accepted reports and their id counter.  Ids start at 1 and
/// restart at 1 after [`ReportStore::clear`].
pub trait ReportStore: Send {
    fn append(&mut self, report: NewReport) -> Result<QueueEntry>;

    /// All entries in acceptance order.
    fn entries(&self) -> Result<Vec<QueueEntry>>;

    fn clear(&mut self) -> Result<()>;

    fn describe(&self) -> String;
}

/// SQLite when `db_path` is set, memory otherwise.
pub fn open_store(db_path: Option<&str>) -> Result<Box<dyn ReportStore>> {
    match db_path {
        Some(path) => Ok(Box::new(SqliteStore::open(path)?)),
        None => Ok(Box::new(MemoryStore::default())),
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    entries: Vec<QueueEntry>,
    last_id: u64,
}

impl ReportStore for MemoryStore {
    fn append(&mut self, report: NewReport) -> Result<QueueEntry> {
        self.last_id += 1;
        let entry = QueueEntry::new(self.last_id, report);
        self.entries.push(entry.clone());
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<QueueEntry>> {
        Ok(self.entries.clone())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.last_id = 0;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// Entries are stored as JSON payloads next to a few indexed columns.
pub struct SqliteStore {
    conn: sqlite::Connection,
    path: String,
}

impl SqliteStore {
    /// Open (or create) the report database and ensure the schema exists.
    pub fn open(path: &str) -> Result<Self> {
        let conn = sqlite::open(path).with_context(|| format!("failed to open {path}"))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS reports (
                id          INTEGER PRIMARY KEY,
                urgency     TEXT    NOT NULL,
                source      TEXT    NOT NULL,
                received_at INTEGER NOT NULL,
                payload     TEXT    NOT NULL
             );",
        )?;
        info!("Report DB opened at {path}");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    fn last_id(&self) -> Result<u64> {
        let mut stmt = self.conn.prepare("SELECT COALESCE(MAX(id), 0) FROM reports")?;
        let mut last = 0;
        if let State::Row = stmt.next()? {
            last = stmt.read::<i64, _>(0)?;
        }
        Ok(last as u64)
    }
}

impl ReportStore for SqliteStore {
    fn append(&mut self, report: NewReport) -> Result<QueueEntry> {
        let entry = QueueEntry::new(self.last_id()? + 1, report);
        let payload = serde_json::to_string(&entry)?;

        let mut stmt = self.conn.prepare(
            "INSERT INTO reports (id, urgency, source, received_at, payload)
             VALUES (?, ?, ?, ?, ?)",
        )?;
        stmt.bind((1, entry.id as i64))?;
        stmt.bind((2, entry.urgency.name()))?;
        stmt.bind((3, entry.source.as_str()))?;
        stmt.bind((4, entry.received_at))?;
        stmt.bind((5, payload.as_str()))?;
        stmt.next()?;
        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<QueueEntry>> {
        let mut stmt = self.conn.prepare("SELECT payload FROM reports ORDER BY id")?;
        let mut entries = Vec::new();
        while let State::Row = stmt.next()? {
            let payload = stmt.read::<String, _>(0)?;
            entries.push(serde_json::from_str(&payload).context("corrupt report payload")?);
        }
        Ok(entries)
    }

    fn clear(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM reports")?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}
