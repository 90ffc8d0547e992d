//! Answer extraction and normalization.
//!
//! Converts whatever the generation backend produced into one canonical
//! answer string. Structured results are a direct match on their tagged
//! variant. Text results (the fallback path) go through heuristics: a
//! best-effort JSON sniff, then per-kind normalization — first integer for
//! numeric shapes, the fixed vocabulary for booleans, literal matching for
//! finite sets.
//!
//! Extraction never fails. When no recognizable value is found, the trimmed
//! text is returned unchanged so the mismatch is visible in the evaluation
//! instead of being silently papered over.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::answer::{RawResult, StructuredAnswer};
use crate::schema::Schema;

lazy_static! {
    /// First signed integer anywhere in a string.
    static ref SIGNED_INT_PATTERN: Regex = Regex::new(r"-?\d+").unwrap();
}

/// Field names probed when a JSON object is sniffed out of raw text, in
/// priority order. Different schema kinds name their payload field
/// differently; the first present scalar wins.
const FIELD_PRIORITY: &[&str] = &[
    "answer",
    "value",
    "selected_card",
    "pick",
    "damage_assignment",
    "mana_cost",
    "phase",
    "card_type",
    "zone",
    "explanation",
];

/// Canonical boolean literals.
const YES: &str = "yes";
const NO: &str = "no";

/// Extract the canonical answer string from a backend result.
pub fn extract(raw: &RawResult, schema: &Schema) -> String {
    match raw {
        RawResult::Structured(answer) => extract_structured(answer),
        RawResult::Text(text) => extract_text(text, schema),
    }
}

/// Structured mode: the variant itself names the payload.
fn extract_structured(answer: &StructuredAnswer) -> String {
    match answer {
        StructuredAnswer::Simple { answer } => answer.trim().to_string(),
        StructuredAnswer::Numeric { value } => value.to_string(),
        StructuredAnswer::Boolean { answer } => {
            let literal = if *answer { YES } else { NO };
            literal.to_string()
        }
        StructuredAnswer::Explanation { explanation } => explanation.trim().to_string(),
        StructuredAnswer::CardSelection { selected_card } => selected_card.trim().to_string(),
        StructuredAnswer::MultipleChoice { answer } => answer.trim().to_string(),
        StructuredAnswer::MultipleCardSelection { selected_cards } => {
            let cards: Vec<&str> = selected_cards.iter().map(|c| c.trim()).collect();
            cards.join(", ")
        }
        StructuredAnswer::NumericRange { value } => value.to_string(),
        StructuredAnswer::CombatAssignment {
            damage_assignment, ..
        } => damage_assignment.to_string(),
        StructuredAnswer::DraftPick { pick, .. } => pick.trim().to_string(),
        StructuredAnswer::ManaCost { mana_cost } => mana_cost.trim().to_string(),
        StructuredAnswer::Phase { phase } => phase.trim().to_string(),
        StructuredAnswer::TurnStep { step } => step.trim().to_string(),
        StructuredAnswer::CardType { card_type } => card_type.trim().to_string(),
        StructuredAnswer::Zone { zone } => zone.trim().to_string(),
        StructuredAnswer::Priority { action } => action.trim().to_string(),
    }
}

/// Text mode: JSON sniff, then per-kind heuristics.
fn extract_text(text: &str, schema: &Schema) -> String {
    let trimmed = text.trim();

    // Best-effort structured parse for JSON-looking text. Never
    // authoritative: any failure falls through to the plain heuristics.
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
            if let Some(field) = select_field(&map) {
                return normalize_for_schema(&field, schema);
            }
        }
    }

    normalize_for_schema(trimmed, schema)
}

/// Pick the payload out of a sniffed JSON object by field priority.
fn select_field(map: &serde_json::Map<String, Value>) -> Option<String> {
    for name in FIELD_PRIORITY {
        match map.get(*name) {
            Some(Value::String(s)) => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            Some(Value::Bool(b)) => return Some(b.to_string()),
            // Non-scalar payloads carry no single canonical string; keep
            // probing lower-priority fields.
            Some(_) | None => continue,
        }
    }
    None
}

/// Apply the schema kind's normalization to a candidate value.
fn normalize_for_schema(value: &str, schema: &Schema) -> String {
    if schema.is_numeric() {
        return match first_integer(value) {
            Some(n) => n.to_string(),
            None => value.to_string(),
        };
    }

    if matches!(schema, Schema::Boolean) {
        return match boolean_token(value) {
            Some(true) => YES.to_string(),
            Some(false) => NO.to_string(),
            None => value.to_string(),
        };
    }

    if let Some(literals) = schema.literal_set() {
        if let Some(matched) = match_literal(value, &literals) {
            return matched;
        }
    }

    value.to_string()
}

/// First signed integer token anywhere in the text.
pub fn first_integer(text: &str) -> Option<i64> {
    SIGNED_INT_PATTERN
        .find_iter(text)
        .find_map(|m| m.as_str().parse().ok())
}

/// Map a text token onto the fixed boolean vocabulary.
///
/// The token is lowercased and stripped of non-alphanumeric edge characters
/// first, so "Yes." maps while "nope" does not.
pub fn boolean_token(text: &str) -> Option<bool> {
    let token = text
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    match token.as_str() {
        "yes" | "true" | "y" | "1" => Some(true),
        "no" | "false" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Match text against a finite literal set, returning the canonical literal.
///
/// Exact case-insensitive equality wins; otherwise a literal contained in
/// the text wins if it is the only one.
fn match_literal(text: &str, literals: &[&str]) -> Option<String> {
    let lower = text.trim().to_lowercase();

    if let Some(exact) = literals.iter().find(|l| l.to_lowercase() == lower) {
        return Some(exact.to_string());
    }

    let contained: Vec<&&str> = literals
        .iter()
        .filter(|l| lower.contains(&l.to_lowercase()))
        .collect();
    match contained.as_slice() {
        [only] => Some(only.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawResult {
        RawResult::Text(s.to_string())
    }

    #[test]
    fn test_structured_boolean_canonical() {
        let raw = RawResult::Structured(StructuredAnswer::Boolean { answer: true });
        assert_eq!(extract(&raw, &Schema::Boolean), "yes");

        let raw = RawResult::Structured(StructuredAnswer::Boolean { answer: false });
        assert_eq!(extract(&raw, &Schema::Boolean), "no");
    }

    #[test]
    fn test_structured_numeric() {
        let raw = RawResult::Structured(StructuredAnswer::Numeric { value: 42 });
        assert_eq!(extract(&raw, &Schema::Numeric), "42");
    }

    #[test]
    fn test_structured_combat_assignment_yields_damage() {
        let raw = RawResult::Structured(StructuredAnswer::CombatAssignment {
            damage_assignment: 3,
            blockers: vec!["Llanowar Elves".to_string()],
        });
        assert_eq!(extract(&raw, &Schema::CombatAssignment), "3");
    }

    #[test]
    fn test_structured_card_list_joined() {
        let raw = RawResult::Structured(StructuredAnswer::MultipleCardSelection {
            selected_cards: vec!["Shock".to_string(), " Giant Growth ".to_string()],
        });
        assert_eq!(
            extract(&raw, &Schema::MultipleCardSelection),
            "Shock, Giant Growth"
        );
    }

    #[test]
    fn test_text_numeric_first_integer() {
        let schema = Schema::Numeric;
        assert_eq!(extract(&text("The answer is 42 damage."), &schema), "42");
        assert_eq!(extract(&text("You lose -3 life"), &schema), "-3");
    }

    #[test]
    fn test_text_numeric_soft_failure() {
        let schema = Schema::Numeric;
        assert_eq!(
            extract(&text("  no number here  "), &schema),
            "no number here"
        );
    }

    #[test]
    fn test_text_boolean_vocabulary() {
        let schema = Schema::Boolean;
        assert_eq!(extract(&text("TRUE"), &schema), "yes");
        assert_eq!(extract(&text("Yes."), &schema), "yes");
        assert_eq!(extract(&text(" n "), &schema), "no");
        assert_eq!(extract(&text("0"), &schema), "no");
        // Unrecognized text passes through unchanged.
        assert_eq!(extract(&text("nope"), &schema), "nope");
    }

    #[test]
    fn test_text_json_sniff() {
        let schema = Schema::Boolean;
        assert_eq!(extract(&text(r#"{"answer": "yes"}"#), &schema), "yes");
        assert_eq!(extract(&text(r#"{"answer": true}"#), &schema), "yes");

        let schema = Schema::Numeric;
        assert_eq!(extract(&text(r#"{"value": 7}"#), &schema), "7");
    }

    #[test]
    fn test_text_json_sniff_field_priority() {
        let schema = Schema::Simple;
        // "answer" outranks "explanation" regardless of object order.
        assert_eq!(
            extract(
                &text(r#"{"explanation": "because", "answer": "Serra Angel"}"#),
                &schema
            ),
            "Serra Angel"
        );
    }

    #[test]
    fn test_text_json_parse_failure_falls_through() {
        let schema = Schema::Numeric;
        // Braces but not valid JSON: plain heuristics still find the integer.
        assert_eq!(extract(&text("{value = 7}"), &schema), "7");
    }

    #[test]
    fn test_text_literal_match() {
        let schema = Schema::card_selection(vec![
            "Millstone".to_string(),
            "Serra Angel".to_string(),
        ])
        .unwrap();
        assert_eq!(extract(&text("serra angel"), &schema), "Serra Angel");
        assert_eq!(
            extract(&text("I would pick Serra Angel here."), &schema),
            "Serra Angel"
        );
        // Two candidates contained: ambiguous, pass through.
        assert_eq!(
            extract(&text("Millstone or Serra Angel"), &schema),
            "Millstone or Serra Angel"
        );
    }

    #[test]
    fn test_text_fixed_vocab_match() {
        assert_eq!(extract(&text("Upkeep"), &Schema::Phase), "upkeep");
        assert_eq!(
            extract(&text("It's a creature card."), &Schema::CardType),
            "creature"
        );
    }

    #[test]
    fn test_extraction_idempotent() {
        let schemas = [
            Schema::Boolean,
            Schema::Numeric,
            Schema::Simple,
            Schema::Phase,
            Schema::card_selection(vec!["Shock".to_string()]).unwrap(),
        ];
        let inputs = ["yes", "42", "Serra Angel", "upkeep", "Shock"];

        for (schema, input) in schemas.iter().zip(inputs) {
            let once = extract(&text(input), schema);
            let twice = extract(&RawResult::Text(once.clone()), schema);
            assert_eq!(once, twice, "schema: {}", schema.name());
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn numeric_extraction_idempotent(input in ".{0,60}") {
                let schema = Schema::Numeric;
                let once = extract(&RawResult::Text(input), &schema);
                let twice = extract(&RawResult::Text(once.clone()), &schema);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn boolean_extraction_idempotent(input in ".{0,60}") {
                let schema = Schema::Boolean;
                let once = extract(&RawResult::Text(input), &schema);
                let twice = extract(&RawResult::Text(once.clone()), &schema);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
