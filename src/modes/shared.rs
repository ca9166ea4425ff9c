use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::desk::{Submission, TriageDesk};
use crate::store::open_store;

#[derive(Clone)]
pub(super) struct ServeCfg {
    pub bind_addr: SocketAddr,
    pub db_path: Option<String>,
}

#[derive(Clone)]
pub(super) struct ReplayCfg {
    pub input_path: String,
    pub db_path: Option<String>,
    pub pacing: Pacing,
}

/// How long to wait between two consecutive inbound reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Pacing {
    /// Push everything through as fast as the desk accepts it.
    Instant,
    /// Same pause after every report, timestamps ignored.
    Fixed(Duration),
    /// Replay the recorded gaps divided by `speed`, never waiting longer
    /// than `max_gap` through a quiet stretch.
    Recorded { speed: f64, max_gap: Duration },
}

impl Pacing {
    /// Gap before `next` given the previous report's timestamp.  A missing
    /// or backwards timestamp means no wait under `Recorded`.
    pub fn gap(&self, prev: Option<i64>, next: Option<i64>) -> Duration {
        match *self {
            Pacing::Instant => Duration::ZERO,
            Pacing::Fixed(step) => step,
            Pacing::Recorded { speed, max_gap } => {
                let (Some(prev), Some(next)) = (prev, next) else {
                    return Duration::ZERO;
                };
                let secs = (next - prev).max(0) as f64 / speed;
                Duration::from_secs_f64(secs).min(max_gap)
            }
        }
    }
}

/// One inbound report in a replay file (JSON lines).  `text` is accepted
/// for gateway exports that do not say `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct InboundEvent {
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(alias = "text")]
    pub message: String,
}

/// Parsed replay file.  `skipped` holds the 1-based numbers of lines that
/// were not valid reports.
#[derive(Debug, Default)]
pub(super) struct InboundBatch {
    pub events: Vec<InboundEvent>,
    pub skipped: Vec<usize>,
}

impl From<&InboundEvent> for Submission {
    fn from(event: &InboundEvent) -> Self {
        Submission {
            message: Some(event.message.clone()),
            source: event.source.clone(),
            sender: event.sender.clone(),
        }
    }
}

pub(super) fn must_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("Missing env var {key}"))
}

fn db_path_env() -> Option<String> {
    std::env::var("TRIAGE_DB_PATH")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(super) fn load_serve_cfg() -> Result<ServeCfg> {
    let raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());
    let mut bind_addr: SocketAddr = raw
        .parse()
        .with_context(|| format!("BIND_ADDR is not a socket address: {raw}"))?;
    if let Ok(port) = std::env::var("PORT") {
        bind_addr.set_port(port.trim().parse().context("PORT must be u16")?);
    }

    Ok(ServeCfg {
        bind_addr,
        db_path: db_path_env(),
    })
}

/// Unset or blank means `None`; anything else must parse.
fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("{key}={raw} is invalid: {e}")),
        _ => Ok(None),
    }
}

fn pacing_from(
    speed: Option<f64>,
    step_ms: Option<u64>,
    max_gap_ms: Option<u64>,
) -> Result<Pacing> {
    if let Some(step) = step_ms {
        return Ok(Pacing::Fixed(Duration::from_millis(step)));
    }
    match speed {
        Some(s) if s == 0.0 => Ok(Pacing::Instant),
        Some(s) if !(s > 0.0 && s.is_finite()) => {
            Err(anyhow!("REPLAY_SPEED must be a positive number, got {s}"))
        }
        _ => Ok(Pacing::Recorded {
            speed: speed.unwrap_or(1.0),
            max_gap: Duration::from_millis(max_gap_ms.unwrap_or(DEFAULT_MAX_GAP_MS)),
        }),
    }
}

const DEFAULT_MAX_GAP_MS: u64 = 5_000;

pub(super) fn load_replay_cfg() -> Result<ReplayCfg> {
    let pacing = pacing_from(
        env_parse("REPLAY_SPEED")?,
        env_parse("REPLAY_STEP_MS")?,
        env_parse("REPLAY_MAX_GAP_MS")?,
    )?;

    Ok(ReplayCfg {
        input_path: must_env("REPLAY_INPUT_PATH")?,
        db_path: db_path_env(),
        pacing,
    })
}

pub(super) fn open_desk(db_path: Option<&str>) -> Result<TriageDesk> {
    Ok(TriageDesk::new(open_store(db_path)?))
}

/// Read a JSONL replay file in arrival (file) order.  Malformed lines are
/// logged and skipped so one bad export row does not sink the drill.
pub(super) fn load_inbound_events(path: &str) -> Result<InboundBatch> {
    let file = File::open(path).with_context(|| format!("failed to open replay file {path}"))?;
    let reader = BufReader::new(file);

    let mut batch = InboundBatch::default();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<InboundEvent>(&line) {
            Ok(event) => batch.events.push(event),
            Err(e) => {
                warn!("Skipping line {line_no} of {path}: {e}");
                batch.skipped.push(line_no);
            }
        }
    }
    Ok(batch)
}

impl fmt::Display for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pacing::Instant => write!(f, "instant"),
            Pacing::Fixed(step) => write!(f, "every {}ms", step.as_millis()),
            Pacing::Recorded { speed, max_gap } => {
                write!(f, "recorded x{speed} (gap <= {}ms)", max_gap.as_millis())
            }
        }
    }
}

impl fmt::Display for ServeCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ServeCfg(bind={}, db={})",
            self.bind_addr,
            self.db_path.as_deref().unwrap_or("<memory>")
        )
    }
}
