//! Classification core for inbound emergency reports: need detection,
//! headcount and location extraction, weighted urgency scoring, and
//! token-set duplicate detection.
//!
//! Everything here is a pure function of its inputs.  The only state in
//! the pipeline is the accepted-report corpus, which the caller owns (see
//! [`crate::desk`]).
pub mod dedup;
pub mod explain;
pub mod kinds;
pub mod lexicon;
mod triage_tests;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::triage::dedup::{DuplicateVerdict, check_duplicate};
pub use crate::triage::explain::{Explanation, explain};
pub use crate::triage::kinds::{NeedCategory, UrgencyLevel};

use crate::triage::lexicon::{
    LOCATION_MAX_EXCLUSIVE, LOCATION_MIN_EXCLUSIVE, LOCATION_PATTERNS, NEED_KEYWORDS,
    QUANTITY_MAX_EXCLUSIVE, QUANTITY_MIN_EXCLUSIVE, QUANTITY_PATTERNS, RESCUE_DANGER_PATTERN,
    URGENCY_KEYWORDS,
};

static QUANTITY_MATCHERS: Lazy<Vec<Regex>> = Lazy::new(|| compile(QUANTITY_PATTERNS));

static LOCATION_MATCHERS: Lazy<Vec<Regex>> = Lazy::new(|| compile(LOCATION_PATTERNS));

static RESCUE_DANGER: Lazy<Regex> = Lazy::new(|| Regex::new(RESCUE_DANGER_PATTERN).unwrap());

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

// ───────────────────────────── Records ───────────────────────────────────

/// Keyword hits recorded for one urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyFactor {
    pub level: UrgencyLevel,
    pub hits: u32,
    pub weight: u32,
}

impl UrgencyFactor {
    pub fn points(&self) -> u32 {
        self.hits * self.weight
    }
}

/// Structured entities pulled out of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub needs: Vec<NeedCategory>,
    pub quantity: Option<u32>,
    pub location: Option<String>,
    pub urgency: UrgencyLevel,
    pub urgency_score: u32,
    pub factors: Vec<UrgencyFactor>,
}

/// Output of [`score_urgency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgencyAssessment {
    pub urgency: UrgencyLevel,
    pub score: u32,
    pub factors: Vec<UrgencyFactor>,
}

// ───────────────────────────── Extraction ────────────────────────────────

/// Classify a single message.  Never fails: a text with no matches yields
/// an empty, `low` record.
pub fn extract(text: &str) -> EntityRecord {
    let lower = text.to_lowercase();

    let needs = detect_needs(&lower);
    let quantity = detect_quantity(text);
    let location = detect_location(text);
    let assessment = score_urgency(&lower, &needs);

    debug!(
        "Extracted needs={needs:?} qty={quantity:?} loc={location:?} urgency={:?} score={}",
        assessment.urgency, assessment.score
    );

    EntityRecord {
        needs,
        quantity,
        location,
        urgency: assessment.urgency,
        urgency_score: assessment.score,
        factors: assessment.factors,
    }
}

/// Categories whose phrase list has at least one substring hit, in lexicon
/// order.
pub fn detect_needs(lower: &str) -> Vec<NeedCategory> {
    NEED_KEYWORDS
        .iter()
        .filter(|(_, phrases)| phrases.iter().any(|p| lower.contains(p)))
        .map(|&(category, _)| category)
        .collect()
}

/// First in-range figure.  Each pattern contributes only its first match;
/// an out-of-range figure falls through to the next pattern.
pub fn detect_quantity(text: &str) -> Option<u32> {
    QUANTITY_MATCHERS.iter().find_map(|re| {
        let caps = re.captures(text)?;
        let n: u32 = caps.get(1)?.as_str().parse().ok()?;
        (n > QUANTITY_MIN_EXCLUSIVE && n < QUANTITY_MAX_EXCLUSIVE).then_some(n)
    })
}

/// First plausible location mention.  Runs on the original text because
/// the patterns key off capitalization.
pub fn detect_location(text: &str) -> Option<String> {
    LOCATION_MATCHERS.iter().find_map(|re| {
        re.captures_iter(text).find_map(|caps| {
            let raw = caps.get(1).or_else(|| caps.get(0))?.as_str().trim();
            let len = raw.chars().count();
            (len > LOCATION_MIN_EXCLUSIVE && len < LOCATION_MAX_EXCLUSIVE)
                .then(|| raw.to_string())
        })
    })
}

// ───────────────────────────── Scoring ───────────────────────────────────

/// Weighted keyword score over lowercased text, mapped through the fixed
/// threshold table.
///
/// A rescue need plus an imminent-danger word forces `critical` and lifts
/// the score to at least 10.  The factor list is left as counted.
pub fn score_urgency(lower: &str, needs: &[NeedCategory]) -> UrgencyAssessment {
    let mut score = 0u32;
    let mut factors = Vec::new();

    for &(level, phrases) in URGENCY_KEYWORDS {
        let hits = phrases.iter().filter(|p| lower.contains(*p)).count() as u32;
        if hits > 0 {
            let factor = UrgencyFactor {
                level,
                hits,
                weight: level.weight(),
            };
            score += factor.points();
            factors.push(factor);
        }
    }

    let mut urgency = UrgencyLevel::from_score(score);

    if needs.contains(&NeedCategory::Rescue) && RESCUE_DANGER.is_match(lower) {
        if urgency != UrgencyLevel::Critical {
            debug!("Rescue override: {urgency:?} (score {score}) → Critical");
        }
        urgency = UrgencyLevel::Critical;
        score = score.max(10);
    }

    UrgencyAssessment {
        urgency,
        score,
        factors,
    }
}
