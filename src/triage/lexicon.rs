use crate::triage::{NeedCategory, UrgencyLevel};

/// Trigger phrases for each need category.  Matching is plain substring
/// containment against lowercased text, so stems like `"collapse"` also
/// hit `"collapsed"`.  **Order matters**: it is the order needs are
/// reported in.
pub const NEED_KEYWORDS: &[(NeedCategory, &[&str])] = &[
    (
        NeedCategory::Medical,
        &[
            "medical",
            "medicine",
            "ambulance",
            "doctor",
            "nurse",
            "hospital",
            "injured",
            "injury",
            "injuries",
            "wound",
            "wounded",
            "bleeding",
            "first aid",
            "paramedic",
            "emt",
            "health",
            "clinic",
            "surgery",
            "medication",
            "prescription",
            "oxygen",
            "ventilator",
            "trauma",
            "fracture",
            "burn",
            "burns",
            "cardiac",
            "stroke",
            "insulin",
            "epipen",
            "bandage",
            "bandages",
            "stretcher",
        ],
    ),
    (
        NeedCategory::Rescue,
        &[
            "rescue",
            "trapped",
            "stuck",
            "collapsed",
            "collapse",
            "buried",
            "rubble",
            "debris",
            "pinned",
            "stranded",
            "missing",
            "search",
            "save",
            "help us",
            "can't get out",
            "blocked",
            "cave-in",
            "landslide",
            "avalanche",
            "sinking",
            "drowning",
            "flood",
            "fire",
            "burning",
            "smoke",
            "explosion",
        ],
    ),
    (
        NeedCategory::Shelter,
        &[
            "shelter",
            "housing",
            "homeless",
            "displaced",
            "evacuate",
            "evacuation",
            "roof",
            "tent",
            "tents",
            "camp",
            "refuge",
            "accommodation",
            "safe place",
            "safe zone",
            "no home",
            "house destroyed",
            "building destroyed",
            "nowhere to go",
            "sleeping outside",
            "exposed",
        ],
    ),
    (
        NeedCategory::FoodWater,
        &[
            "food",
            "water",
            "hungry",
            "thirsty",
            "starving",
            "dehydrated",
            "meals",
            "rations",
            "supplies",
            "provisions",
            "clean water",
            "drinking water",
            "baby formula",
            "infant",
            "nutrition",
            "canned food",
            "bottled water",
            "mre",
        ],
    ),
    (
        NeedCategory::Transport,
        &[
            "transport",
            "transportation",
            "vehicle",
            "bus",
            "truck",
            "helicopter",
            "airlift",
            "evacuate",
            "evacuation",
            "ride",
            "move",
            "relocate",
            "road blocked",
            "bridge out",
            "boat",
        ],
    ),
    (
        NeedCategory::Clothing,
        &[
            "blanket",
            "blankets",
            "clothing",
            "clothes",
            "coat",
            "coats",
            "jacket",
            "jackets",
            "warm",
            "freezing",
            "cold",
            "hypothermia",
            "sleeping bag",
            "shoes",
            "boots",
            "gloves",
            "socks",
        ],
    ),
];

// ───────────────────────── Urgency signals ───────────────────────────────

/// Trigger phrases per urgency level, most severe first.  Every distinct
/// phrase found counts as one hit worth [`UrgencyLevel::weight`] points.
pub const URGENCY_KEYWORDS: &[(UrgencyLevel, &[&str])] = &[
    (
        UrgencyLevel::Critical,
        &[
            "dying",
            "death",
            "dead",
            "life-threatening",
            "critical",
            "trapped",
            "collapse",
            "collapsed",
            "drowning",
            "bleeding out",
            "can't breathe",
            "cardiac arrest",
            "no pulse",
            "unconscious",
            "explosion",
            "active fire",
            "sinking",
            "buried alive",
            "children trapped",
            "babies",
            "infant",
            "newborn",
            "immediately",
            "now",
            "asap",
            "right now",
            "hurry",
        ],
    ),
    (
        UrgencyLevel::High,
        &[
            "urgent",
            "emergency",
            "severe",
            "serious",
            "badly",
            "injured",
            "injuries",
            "wound",
            "wounded",
            "broken",
            "stranded",
            "no access",
            "cut off",
            "isolated",
            "elderly",
            "disabled",
            "pregnant",
            "chronic illness",
            "running out",
            "almost gone",
            "last",
            "desperate",
        ],
    ),
    (
        UrgencyLevel::Medium,
        &[
            "need",
            "require",
            "request",
            "shortage",
            "low",
            "running low",
            "soon",
            "within hours",
            "by tomorrow",
            "limited",
            "insufficient",
            "not enough",
            "dwindling",
            "supplies needed",
            "assistance required",
            "help needed",
        ],
    ),
    (
        UrgencyLevel::Low,
        &[
            "when possible",
            "non-urgent",
            "minor",
            "slight",
            "eventually",
            "if available",
            "no rush",
            "whenever",
            "stable",
            "manageable",
            "coping",
            "getting by",
        ],
    ),
];

/// Imminent-danger words that force `critical` when a rescue need is
/// present.  Bare alternation, not phrase containment.
pub const RESCUE_DANGER_PATTERN: &str = r"trapped|collapse|drowning|fire";

// ───────────────────────── Quantity patterns ─────────────────────────────

/// Numeric patterns, tried in order.  Group 1 is the figure.
pub const QUANTITY_PATTERNS: &[&str] = &[
    // "12 people", "3 hundred families"
    r"(?i)([0-9]+)\s*(?:hundred|thousand)?\s*(?:people|persons|individuals|families|survivors|victims|residents|patients|children|elderly)",
    // "about 40", "at least 12"
    r"(?i)(?:about|approximately|around|nearly|over|more than|at least|roughly)\s*([0-9]+)",
    // "20 blankets"
    r"(?i)([0-9]+)\s*(?:blankets|meals|bottles|kits|units|boxes|cases|bags|tents|cots)",
    // "5 injured"
    r"(?i)([0-9]+)\s*(?:injured|hurt|wounded|trapped|missing|stranded|displaced)",
    r"([0-9]+)",
];

/// Exclusive bounds for an accepted figure.
pub const QUANTITY_MIN_EXCLUSIVE: u32 = 0;
pub const QUANTITY_MAX_EXCLUSIVE: u32 = 100_000;

// ───────────────────────── Location patterns ─────────────────────────────

/// Location patterns, tried in order against the original (not lowercased)
/// text.  Prepositions are case-insensitive; the place head must start
/// with a capital letter.  Group 1 is the place; patterns without a group
/// use the whole match.
pub const LOCATION_PATTERNS: &[&str] = &[
    // "on Main Street", "near the Oak Street Hospital"
    r"\b(?i:at|in|on|near|by|around|outside|inside)\s+(?i:the\s+)?([A-Z][a-zA-Z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Way|Place|Pl|Court|Ct|Highway|Hwy|Bridge|Park|Center|Centre|School|Hospital|Church|Station|Building|Tower|Mall|Market|Square|Plaza|District|Shelter|Camp|Hub|Block|Zone|Area))",
    // "in Riverside"
    r"\b(?i:at|in|on|near)\s+(?i:the\s+)?([A-Z][a-zA-Z\s]{3,30})",
    r"(?i)\b(?:downtown|uptown|midtown|east side|west side|north side|south side|city center)",
    // "5th Avenue", "3rd Floor"
    r"(?i)([0-9]+(?:st|nd|rd|th)\s+(?:Street|Avenue|Floor|Block))",
];

/// Exclusive bounds on the trimmed location length, in characters.
pub const LOCATION_MIN_EXCLUSIVE: usize = 2;
pub const LOCATION_MAX_EXCLUSIVE: usize = 60;
