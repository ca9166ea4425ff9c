use crate::desk::Submission;
use anyhow::{Result, anyhow};
use tracing::{info, warn};

use super::shared::{load_inbound_events, load_replay_cfg, open_desk};

pub(super) async fn run() -> Result<()> {
    let replay = load_replay_cfg()?;
    let batch = load_inbound_events(&replay.input_path)?;
    let events = batch.events;
    if events.is_empty() {
        return Err(anyhow!("Replay input has no reports: {}", replay.input_path));
    }

    let desk = open_desk(replay.db_path.as_deref())?;
    info!(
        "Replay started: {} reports from {} ({} lines skipped), pacing {}",
        events.len(),
        replay.input_path,
        batch.skipped.len(),
        replay.pacing
    );
    info!("Desk: {desk}");

    let mut accepted = 0usize;
    let mut duplicates = 0usize;
    let mut rejected = 0usize;
    let mut prev_ts = None;

    for (idx, event) in events.iter().enumerate() {
        if idx > 0 {
            let gap = replay.pacing.gap(prev_ts, event.timestamp);
            if !gap.is_zero() {
                tokio::time::sleep(gap).await;
            }
        }
        prev_ts = event.timestamp.or(prev_ts);

        let outcome = match desk.submit(Submission::from(event)) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Report {} rejected: {e}", idx + 1);
                rejected += 1;
                continue;
            }
        };

        match &outcome.queue_entry {
            Some(entry) => {
                accepted += 1;
                let exp = &outcome.explanation;
                println!(
                    "\n[#{} {} · score {}] {}\n  needs: {}\n  where: {}  scale: {}\n  → {}",
                    entry.id,
                    exp.urgency_level,
                    exp.total_score,
                    entry.preview,
                    exp.identified_needs.join(", "),
                    outcome.entities.location.as_deref().unwrap_or("?"),
                    exp.scale.map_or_else(|| "?".to_string(), |n| n.to_string()),
                    exp.recommendation,
                );
            }
            None => {
                duplicates += 1;
                println!(
                    "\n[DUPLICATE of #{} · {}%] {}",
                    outcome.duplicate.match_id.unwrap_or_default(),
                    outcome.duplicate.similarity,
                    event.message
                );
            }
        }
    }

    let stats = desk.stats()?;
    info!(
        "Replay complete: total={}, accepted={}, duplicates={}, rejected={}, skipped={}, critical={}",
        events.len(),
        accepted,
        duplicates,
        rejected,
        batch.skipped.len(),
        stats.critical
    );
    for (source, count) in &stats.by_source {
        info!("  {source}: {count}");
    }

    Ok(())
}
