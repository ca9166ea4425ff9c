use serde::{Deserialize, Serialize};

use crate::triage::EntityRecord;

/// One scoring line as shown to a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringFactor {
    pub level: String,
    pub hits: u32,
    pub weight: u32,
    pub points: u32,
}

/// Human-readable rationale for a record's urgency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub urgency_level: String,
    pub urgency_description: String,
    pub scoring_factors: Vec<ScoringFactor>,
    pub total_score: u32,
    pub identified_needs: Vec<String>,
    pub scale: Option<u32>,
    pub recommendation: String,
}

/// Project `record` into an [`Explanation`].  Factors are ordered by
/// points, highest first; equal points keep their scoring order.
pub fn explain(record: &EntityRecord) -> Explanation {
    let mut factors = record.factors.clone();
    factors.sort_by_key(|f| std::cmp::Reverse(f.points()));

    Explanation {
        urgency_level: record.urgency.name().to_uppercase(),
        urgency_description: record.urgency.description().to_string(),
        scoring_factors: factors
            .iter()
            .map(|f| ScoringFactor {
                level: f.level.name().to_uppercase(),
                hits: f.hits,
                weight: f.weight,
                points: f.points(),
            })
            .collect(),
        total_score: record.urgency_score,
        identified_needs: record.needs.iter().map(|n| n.label().to_string()).collect(),
        scale: record.quantity,
        recommendation: record.urgency.recommendation().to_string(),
    }
}
