// ─────────────────────────────── Tests ───────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::triage::dedup::{DUPLICATE_THRESHOLD, jaccard, tokenize};
    use crate::triage::*;

    fn tokens(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    // ── Need detection ──

    #[test]
    fn detects_rescue_from_stem() {
        let needs = detect_needs("we were rescued from the roof");
        assert!(needs.contains(&NeedCategory::Rescue));
        assert!(needs.contains(&NeedCategory::Shelter)); // "roof"
    }

    #[test]
    fn needs_follow_lexicon_order_without_repeats() {
        let needs = detect_needs("injured and bleeding, need an ambulance, food and water too");
        assert_eq!(needs, vec![NeedCategory::Medical, NeedCategory::FoodWater]);
    }

    #[test]
    fn no_needs_in_plain_text() {
        assert!(detect_needs("all quiet on our street tonight").is_empty());
    }

    // ── Quantity ──

    #[test]
    fn quantity_from_people_noun() {
        assert_eq!(detect_quantity("Building collapsed, 12 people trapped"), Some(12));
    }

    #[test]
    fn quantity_from_approximation_cue() {
        assert_eq!(detect_quantity("there are about 40 of us here"), Some(40));
    }

    #[test]
    fn quantity_rejects_zero_and_falls_through() {
        // "0 people" is the first pattern's only candidate; the
        // approximation pattern picks up the real figure.
        assert_eq!(detect_quantity("0 people hurt, about 30 waiting"), Some(30));
    }

    #[test]
    fn quantity_rejects_huge_figures() {
        assert_eq!(detect_quantity("150000 people affected"), None);
        assert_eq!(detect_quantity("99999999999999999999 people"), None);
    }

    #[test]
    fn quantity_ignores_non_ascii_digits() {
        // U+0663 is ARABIC-INDIC DIGIT THREE
        assert_eq!(detect_quantity("\u{0663} people here, 12 people trapped"), Some(12));
        assert_eq!(detect_quantity("\u{0663}\u{0660} people"), None);
    }

    #[test]
    fn quantity_absent_without_digits() {
        assert_eq!(detect_quantity("many people need help"), None);
    }

    // ── Location ──

    #[test]
    fn location_with_landmark_suffix() {
        assert_eq!(
            detect_location("Our building collapsed on Main Street. Please help").as_deref(),
            Some("Main Street")
        );
    }

    #[test]
    fn location_capitalized_phrase() {
        assert_eq!(
            detect_location("We are stuck in Riverside.").as_deref(),
            Some("Riverside")
        );
    }

    #[test]
    fn location_district_word() {
        assert_eq!(
            detect_location("flooding downtown, water rising").as_deref(),
            Some("downtown")
        );
    }

    #[test]
    fn ordinal_location_needs_ascii_digits() {
        assert_eq!(detect_location("water rising on the 3rd Floor").as_deref(), Some("3rd Floor"));
        assert_eq!(detect_location("water rising on the \u{0663}rd Floor"), None);
    }

    #[test]
    fn location_requires_capitalized_place() {
        assert_eq!(detect_location("we r at lincoln high school shelter"), None);
    }

    // ── Urgency scoring ──

    #[test]
    fn threshold_table() {
        assert_eq!(UrgencyLevel::from_score(0), UrgencyLevel::Low);
        assert_eq!(UrgencyLevel::from_score(2), UrgencyLevel::Low);
        assert_eq!(UrgencyLevel::from_score(3), UrgencyLevel::Medium);
        assert_eq!(UrgencyLevel::from_score(5), UrgencyLevel::Medium);
        assert_eq!(UrgencyLevel::from_score(6), UrgencyLevel::High);
        assert_eq!(UrgencyLevel::from_score(9), UrgencyLevel::High);
        assert_eq!(UrgencyLevel::from_score(10), UrgencyLevel::Critical);
        assert_eq!(UrgencyLevel::from_score(250), UrgencyLevel::Critical);
    }

    #[test]
    fn threshold_boundaries_from_text() {
        let cases = [
            ("minor issue, no rush", 2, UrgencyLevel::Low),
            ("this is urgent", 3, UrgencyLevel::Medium),
            ("urgent and severe", 6, UrgencyLevel::High),
            ("urgent, severe and serious", 9, UrgencyLevel::High),
            ("urgent, severe, serious, but stable", 10, UrgencyLevel::Critical),
        ];
        for (text, score, level) in cases {
            let rec = extract(text);
            assert_eq!(rec.urgency_score, score, "score for {text:?}");
            assert_eq!(rec.urgency, level, "level for {text:?}");
        }
    }

    #[test]
    fn factors_in_level_order() {
        let rec = extract("urgent, severe, serious, but stable");
        assert_eq!(
            rec.factors,
            vec![
                UrgencyFactor {
                    level: UrgencyLevel::High,
                    hits: 3,
                    weight: 3
                },
                UrgencyFactor {
                    level: UrgencyLevel::Low,
                    hits: 1,
                    weight: 1
                },
            ]
        );
    }

    #[test]
    fn rescue_override_forces_critical() {
        // keyword-only: trapped (4) + no rush (1) = 5 → medium
        let rec = extract("my cat is trapped up a tree, no rush");
        assert!(rec.needs.contains(&NeedCategory::Rescue));
        assert_eq!(rec.urgency, UrgencyLevel::Critical);
        assert_eq!(rec.urgency_score, 10);
        let raw: u32 = rec.factors.iter().map(|f| f.points()).sum();
        assert_eq!(raw, 5, "factors keep the independently counted hits");
    }

    #[test]
    fn rescue_override_never_lowers_score() {
        let rec = extract("building collapsed, people trapped, fire spreading, hurry now");
        assert_eq!(rec.urgency, UrgencyLevel::Critical);
        assert!(rec.urgency_score > 10);
    }

    #[test]
    fn danger_word_without_rescue_need_is_not_overridden() {
        let assessment = score_urgency("the fire is out", &[NeedCategory::Medical]);
        assert_eq!(assessment.urgency, UrgencyLevel::Low);
        assert_eq!(assessment.score, 0);
    }

    #[test]
    fn score_is_monotonic_under_keyword_additions() {
        let bases = ["", "we need water", "minor cuts, stable", "urgent help"];
        for base in bases {
            let before = extract(base).urgency_score;
            for &(_, phrases) in lexicon::URGENCY_KEYWORDS {
                for phrase in phrases {
                    let after = extract(&format!("{base} {phrase}")).urgency_score;
                    assert!(after >= before, "{base:?} + {phrase:?}: {after} < {before}");
                }
            }
        }
    }

    #[test]
    fn repeated_phrase_counts_once() {
        assert_eq!(extract("urgent urgent urgent").urgency_score, 3);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "HELP! Building collapsed on Main Street, 12 people trapped, need water ASAP";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn end_to_end_collapse_report() {
        let rec = extract("Building collapsed, 12 people trapped, please hurry");
        assert!(rec.needs.contains(&NeedCategory::Rescue));
        assert_eq!(rec.quantity, Some(12));
        assert_eq!(rec.urgency, UrgencyLevel::Critical);
        assert!(rec.urgency_score >= 10);
    }

    // ── Explanation ──

    #[test]
    fn explanation_sorts_factors_by_points() {
        let rec = extract("stable but need water, urgent");
        let exp = explain(&rec);
        let points: Vec<u32> = exp.scoring_factors.iter().map(|f| f.points).collect();
        assert_eq!(points, vec![3, 2, 1]);
        assert_eq!(exp.scoring_factors[0].level, "HIGH");
        assert_eq!(exp.urgency_level, "HIGH");
        assert_eq!(exp.total_score, 6);
    }

    #[test]
    fn explanation_ties_keep_scoring_order() {
        // medium: need + low = 4 points; critical: now = 4 points
        let rec = extract("need help now, supplies low");
        let exp = explain(&rec);
        let levels: Vec<&str> = exp.scoring_factors.iter().map(|f| f.level.as_str()).collect();
        assert_eq!(levels, vec!["CRITICAL", "MEDIUM"]);
    }

    #[test]
    fn explanation_labels_and_scale() {
        let rec = extract("Building collapsed, 12 people trapped, please hurry");
        let exp = explain(&rec);
        assert!(exp.identified_needs.contains(&"Rescue Team".to_string()));
        assert_eq!(exp.scale, Some(12));
        assert_eq!(exp.urgency_description, UrgencyLevel::Critical.description());
        assert_eq!(exp.recommendation, UrgencyLevel::Critical.recommendation());
    }

    #[test]
    fn explanation_does_not_touch_record() {
        let rec = extract("stable but need water, urgent");
        let copy = rec.clone();
        let _ = explain(&rec);
        assert_eq!(rec, copy);
    }

    // ── Dedup ──

    #[test]
    fn tokenize_strips_punctuation_and_short_tokens() {
        let t = tokenize("We're at 5th Ave!! 12 people, HELP");
        assert_eq!(t, tokens(&["were", "5th", "ave", "people", "help"]));
    }

    #[test]
    fn jaccard_bounds_and_symmetry() {
        let a = tokens(&["flood", "river", "road"]);
        let b = tokens(&["flood", "bridge"]);
        let empty = HashSet::new();
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert!((jaccard(&a, &b) - 0.25).abs() < 1e-9);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&a, &empty), 0.0);
    }

    #[test]
    fn identical_text_is_full_duplicate() {
        let text = "Water supply at the north camp is running low";
        let verdict = check_duplicate(text, [(7, text)]);
        assert!(verdict.is_duplicate);
        assert_eq!(verdict.similarity, 100);
        assert_eq!(verdict.match_id, Some(7));
    }

    #[test]
    fn near_duplicate_shelter_report() {
        let first = "we r at lincoln high school shelter. 200 families here n food almost gone";
        let second = "we are at lincoln high school shelter. 200 families and food is almost gone";
        let sim = jaccard(&tokenize(first), &tokenize(second));
        assert!(sim >= DUPLICATE_THRESHOLD, "similarity {sim}");

        let verdict = check_duplicate(second, [(1, first)]);
        assert!(verdict.is_duplicate);
        assert_eq!(verdict.similarity, 75);
        assert_eq!(verdict.match_id, Some(1));
    }

    #[test]
    fn unrelated_report_is_novel() {
        let collapse = "Building collapsed, 12 people trapped, please hurry";
        let water = "Water supply at the north camp is running low, need drinking water";
        assert!(jaccard(&tokenize(collapse), &tokenize(water)) < 0.2);
        assert_eq!(
            check_duplicate(water, [(1, collapse)]),
            DuplicateVerdict::novel()
        );
    }

    #[test]
    fn first_matching_entry_wins() {
        let text = "fire on industrial avenue spreading to warehouses";
        let corpus = [
            (1, "flooding on river road"),
            (2, "fire on industrial avenue spreading to warehouses"),
            (3, "fire on industrial avenue spreading to warehouses"),
        ];
        assert_eq!(check_duplicate(text, corpus).match_id, Some(2));
    }

    #[test]
    fn empty_corpus_is_novel() {
        let verdict = check_duplicate("anything at all", std::iter::empty());
        assert!(!verdict.is_duplicate);
    }
}
