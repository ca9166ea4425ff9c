use serde::{Deserialize, Serialize};

// ───────────────────────────── Need categories ───────────────────────────

/// Aid categories a report can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedCategory {
    Medical,
    Rescue,
    Shelter,
    FoodWater,
    Transport,
    Clothing,
}

impl NeedCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Medical => "Medical Supplies",
            Self::Rescue => "Rescue Team",
            Self::Shelter => "Shelter",
            Self::FoodWater => "Food & Water",
            Self::Transport => "Transport",
            Self::Clothing => "Clothing & Blankets",
        }
    }
}

// ───────────────────────────── Urgency levels ────────────────────────────

/// Severity tiers, declared most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl UrgencyLevel {
    /// Points contributed by every keyword hit at this level.
    pub fn weight(&self) -> u32 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Queue position: `critical` sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Fixed score thresholds, evaluated top down.
    pub fn from_score(score: u32) -> Self {
        match score {
            10.. => Self::Critical,
            6..=9 => Self::High,
            3..=5 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Critical => "Immediate life-threatening situation detected",
            Self::High => "Severe emergency requiring rapid response",
            Self::Medium => "Significant need requiring timely action",
            Self::Low => "Non-urgent, can be addressed when resources allow",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Critical => "Immediate dispatch recommended. Activate mutual aid if needed.",
            Self::High => "Priority dispatch within 30 minutes. Prepare backup.",
            Self::Medium => "Scheduled response within 2–4 hours. Monitor for escalation.",
            Self::Low => "Queued response when available. No immediate action required.",
        }
    }
}
